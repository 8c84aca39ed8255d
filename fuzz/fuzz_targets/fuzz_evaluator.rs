// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use scangate::config::Config;
use scangate::engine::evaluator::PolicyEvaluator;
use scangate::engine_core::models::NormalizedCode;

#[derive(Debug, Arbitrary)]
struct FuzzPolicyInput {
    code: String,
    allowlist: Vec<String>,
    blocklist: Vec<String>,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    if let Ok(input) = FuzzPolicyInput::arbitrary(&mut unstructured) {
        let config = Config {
            allowlist: input.allowlist,
            blocklist: input.blocklist,
            ..Config::default()
        };
        // Evaluation must be total: any string input, any lists, always
        // a decision and never a panic.
        let _ = PolicyEvaluator::evaluate(&NormalizedCode::new(input.code), &config);
    }
});
