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

use proptest::prelude::*;
use scangate::config::{Config, PrefixMode, PrefixRule, SuffixMode, SuffixRule};
use scangate::engine::evaluator::PolicyEvaluator;
use scangate::engine_core::buffer::CodeBuffer;
use scangate::engine_core::models::{
    BlockReason, ControlKey, KeyEvent, NormalizedCode, PolicyDecision,
};
use scangate::engine_core::normalizer;

proptest! {
    // evaluate is total: any string yields a decision, never a panic.
    #[test]
    fn evaluate_never_panics(input in "\\PC*") {
        let config = Config::default();
        let _ = PolicyEvaluator::evaluate(&NormalizedCode::new(input), &config);
    }

    // A host in both lists is always blocked as blocklisted.
    #[test]
    fn blocklist_wins_over_allowlist(host in "[a-z]{1,12}\\.[a-z]{2,4}") {
        let config = Config {
            allowlist: vec![host.clone()],
            blocklist: vec![host.clone()],
            ..Config::default()
        };
        let code = NormalizedCode::new(format!("https://{}/path", host));
        let decision = PolicyEvaluator::evaluate(&code, &config);
        prop_assert_eq!(decision, PolicyDecision::Blocked {
            host,
            reason: BlockReason::Blocklisted,
        });
    }

    // Empty allowlist means open-by-default for anything not blocked.
    #[test]
    fn empty_allowlist_allows_unblocked_hosts(host in "[a-z]{1,12}\\.[a-z]{2,4}") {
        let config = Config::default();
        let code = NormalizedCode::new(format!("https://{}", host));
        let decision = PolicyEvaluator::evaluate(&code, &config);
        prop_assert_eq!(decision, PolicyDecision::Allowed { host });
    }

    // Any printable sequence followed by the terminator reconstructs
    // exactly, with interleaved modifier keys ignored.
    #[test]
    fn buffer_reconstructs_payload(
        payload in "[a-zA-Z0-9:/.?=_-]{1,64}",
        modifier_slots in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let mut buffer = CodeBuffer::new(ControlKey::Enter);
        for (i, c) in payload.chars().enumerate() {
            if *modifier_slots.get(i % modifier_slots.len()).unwrap_or(&false) {
                prop_assert!(buffer.push(KeyEvent::Control(ControlKey::Other)).is_none());
            }
            prop_assert!(buffer.push(KeyEvent::Printable(c)).is_none());
        }
        let scan = buffer.push(KeyEvent::Control(ControlKey::Enter));
        prop_assert_eq!(scan.map(|s| s.payload), Some(payload));
    }

    // Normalization strips at most once per side and never panics.
    #[test]
    fn normalize_never_panics(payload in "\\PC*") {
        let prefix = PrefixRule { mode: PrefixMode::Default, value: None };
        let suffix = SuffixRule { mode: SuffixMode::Enter, value: None };
        let _ = normalizer::normalize(&payload, &prefix, &suffix);
    }

    // With stripping disabled, normalization is the identity.
    #[test]
    fn normalize_none_is_identity(payload in "\\PC*") {
        let prefix = PrefixRule { mode: PrefixMode::None, value: None };
        let suffix = SuffixRule { mode: SuffixMode::None, value: None };
        let code = normalizer::normalize(&payload, &prefix, &suffix);
        prop_assert_eq!(code.as_str(), payload.as_str());
    }
}
