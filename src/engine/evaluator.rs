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

//! Policy evaluation engine.
//!
//! This module implements the `PolicyEvaluator` which decides whether a
//! normalized scan code's host is trustworthy under the configured
//! allow/block lists. Evaluation is a pure function of its two inputs:
//! deterministic, total, and free of side effects. Malformed input is a
//! normal return value, never a fault.
//!
//! Precedence: the blocklist wins over the allowlist, giving the user an
//! unambiguous emergency override. An empty allowlist means "allow
//! everything not blocked" rather than "allow nothing", so a fresh
//! install is not silently locked out. Matching is exact-host only, with
//! no subdomain or wildcard semantics, to keep the contract auditable.

use crate::config::Config;
use crate::engine_core::constants::policy;
use crate::engine_core::models::{BlockReason, NormalizedCode, PolicyDecision};
use url::Url;

pub struct PolicyEvaluator;

impl PolicyEvaluator {
    pub fn evaluate(code: &NormalizedCode, config: &Config) -> PolicyDecision {
        let malformed = || PolicyDecision::Malformed {
            raw: code.as_str().to_string(),
        };

        let parsed = match Url::parse(code.as_str()) {
            Ok(url) => url,
            Err(_) => return malformed(),
        };

        if !policy::ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return malformed();
        }

        // Host without port, lowercased. A URL like "http://:8080" parses
        // but carries no host.
        let host = match parsed.host_str() {
            Some(h) if !h.is_empty() => h.to_lowercase(),
            _ => return malformed(),
        };

        if Self::contains_host(&config.blocklist, &host) {
            return PolicyDecision::Blocked {
                host,
                reason: BlockReason::Blocklisted,
            };
        }

        if !config.allowlist.is_empty() && !Self::contains_host(&config.allowlist, &host) {
            return PolicyDecision::Blocked {
                host,
                reason: BlockReason::NotAllowlisted,
            };
        }

        PolicyDecision::Allowed { host }
    }

    /// Evaluate operator-typed input, retrying scheme-less shorthand like
    /// "example.com" as https. The scan pipeline itself never takes this
    /// path; it exists for the one-shot CLI check.
    pub fn evaluate_input(raw: &str, config: &Config) -> PolicyDecision {
        let code = if raw.contains("://") {
            NormalizedCode::new(raw)
        } else {
            NormalizedCode::new(format!("https://{}", raw))
        };
        Self::evaluate(&code, config)
    }

    /// Case-insensitive exact-host membership
    fn contains_host(list: &[String], host: &str) -> bool {
        list.iter().any(|entry| entry.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allow: &[&str], block: &[&str]) -> Config {
        Config {
            allowlist: allow.iter().map(|s| s.to_string()).collect(),
            blocklist: block.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    fn eval(input: &str, config: &Config) -> PolicyDecision {
        PolicyEvaluator::evaluate(&NormalizedCode::new(input), config)
    }

    #[test]
    fn allowed_when_on_allowlist() {
        let decision = eval("https://good.com/x", &config(&["good.com"], &[]));
        assert_eq!(
            decision,
            PolicyDecision::Allowed {
                host: "good.com".to_string()
            }
        );
    }

    #[test]
    fn blocked_when_not_allowlisted() {
        let decision = eval("https://evil.com", &config(&["good.com"], &[]));
        assert_eq!(
            decision,
            PolicyDecision::Blocked {
                host: "evil.com".to_string(),
                reason: BlockReason::NotAllowlisted,
            }
        );
    }

    #[test]
    fn blocked_when_blocklisted() {
        let decision = eval("https://evil.com", &config(&[], &["evil.com"]));
        assert_eq!(
            decision,
            PolicyDecision::Blocked {
                host: "evil.com".to_string(),
                reason: BlockReason::Blocklisted,
            }
        );
    }

    #[test]
    fn empty_allowlist_allows_everything_not_blocked() {
        let decision = eval("https://anything.org", &config(&[], &["evil.com"]));
        assert_eq!(
            decision,
            PolicyDecision::Allowed {
                host: "anything.org".to_string()
            }
        );
    }

    #[test]
    fn blocklist_wins_over_allowlist() {
        let decision = eval("https://evil.com", &config(&["evil.com"], &["evil.com"]));
        assert_eq!(
            decision,
            PolicyDecision::Blocked {
                host: "evil.com".to_string(),
                reason: BlockReason::Blocklisted,
            }
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let decision = eval("https://GOOD.COM/path", &config(&["good.com"], &[]));
        assert!(matches!(decision, PolicyDecision::Allowed { host } if host == "good.com"));

        let decision = eval("https://evil.com", &config(&[], &["EVIL.com"]));
        assert!(matches!(
            decision,
            PolicyDecision::Blocked {
                reason: BlockReason::Blocklisted,
                ..
            }
        ));
    }

    #[test]
    fn exact_host_only_no_subdomain_match() {
        // sub.good.com is a different host than good.com
        let decision = eval("https://sub.good.com", &config(&["good.com"], &[]));
        assert!(matches!(
            decision,
            PolicyDecision::Blocked {
                reason: BlockReason::NotAllowlisted,
                ..
            }
        ));

        // substring of a blocklisted host is not blocked
        let decision = eval("https://notevil.com", &config(&[], &["evil.com"]));
        assert!(matches!(decision, PolicyDecision::Allowed { .. }));
    }

    #[test]
    fn port_is_not_part_of_the_host() {
        let decision = eval("https://good.com:8443/x", &config(&["good.com"], &[]));
        assert!(matches!(decision, PolicyDecision::Allowed { host } if host == "good.com"));
    }

    #[test]
    fn non_url_is_malformed() {
        let decision = eval("not a url", &Config::default());
        assert!(matches!(decision, PolicyDecision::Malformed { raw } if raw == "not a url"));
    }

    #[test]
    fn non_http_scheme_is_malformed() {
        for input in ["ftp://example.com", "javascript:alert(1)", "file:///etc/passwd"] {
            let decision = eval(input, &Config::default());
            assert!(
                matches!(decision, PolicyDecision::Malformed { .. }),
                "expected malformed for {input}"
            );
        }
    }

    #[test]
    fn url_without_host_is_malformed() {
        let decision = eval("http://", &Config::default());
        assert!(matches!(decision, PolicyDecision::Malformed { .. }));
    }

    #[test]
    fn empty_input_is_malformed() {
        let decision = eval("", &Config::default());
        assert!(matches!(decision, PolicyDecision::Malformed { .. }));
    }

    #[test]
    fn lenient_input_accepts_bare_domain() {
        let decision = PolicyEvaluator::evaluate_input("good.com/page", &config(&["good.com"], &[]));
        assert!(matches!(decision, PolicyDecision::Allowed { host } if host == "good.com"));
    }

    #[test]
    fn lenient_input_keeps_explicit_scheme() {
        let decision = PolicyEvaluator::evaluate_input("ftp://good.com", &Config::default());
        assert!(matches!(decision, PolicyDecision::Malformed { .. }));
    }
}
