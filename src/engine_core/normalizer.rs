// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Payload normalizer.
//!
//! Strips configured prefix/suffix conventions from a completed scan
//! payload to recover the intended URL. Stripping is applied at most once
//! per side; absence of the configured literal is not an error. The
//! output is not required to be a valid URL; that is the policy
//! engine's concern.

use crate::config::{PrefixMode, PrefixRule, SuffixMode, SuffixRule};
use crate::engine_core::constants::scanner;
use crate::engine_core::models::NormalizedCode;

pub fn normalize(payload: &str, prefix: &PrefixRule, suffix: &SuffixRule) -> NormalizedCode {
    let after_prefix = strip_prefix(payload, prefix);
    let cleaned = strip_suffix(after_prefix, suffix);
    NormalizedCode::new(cleaned)
}

fn strip_prefix<'a>(input: &'a str, rule: &PrefixRule) -> &'a str {
    match rule.mode {
        PrefixMode::None => input,
        PrefixMode::Default => {
            // Longest matching well-known preamble wins.
            scanner::DEFAULT_PREFIXES
                .iter()
                .filter(|p| input.starts_with(*p))
                .max_by_key(|p| p.len())
                .map(|p| &input[p.len()..])
                .unwrap_or(input)
        }
        PrefixMode::Custom => match rule.value.as_deref() {
            Some(value) if !value.is_empty() => input.strip_prefix(value).unwrap_or(input),
            _ => input,
        },
    }
}

fn strip_suffix<'a>(input: &'a str, rule: &SuffixRule) -> &'a str {
    match rule.mode {
        SuffixMode::None => input,
        // The terminator is normally consumed upstream; stripping here is
        // a safeguard for captures that preserved it in the payload.
        SuffixMode::Enter => input
            .strip_suffix("\r\n")
            .or_else(|| input.strip_suffix('\n'))
            .or_else(|| input.strip_suffix('\r'))
            .unwrap_or(input),
        SuffixMode::Tab => input.strip_suffix('\t').unwrap_or(input),
        SuffixMode::Custom => match rule.value.as_deref() {
            Some(value) if !value.is_empty() => input.strip_suffix(value).unwrap_or(input),
            _ => input,
        },
    }
}
