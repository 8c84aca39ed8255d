//! Domain policy engine.
//!
//! This module contains the logic for deciding whether a scanned URL's
//! host is trustworthy under the configured allow/block lists.

pub mod evaluator;
