//! Core domain logic.
//!
//! Pure data structures and pure functions: the code buffer, the payload
//! normalizer, domain models, and the collaborator trait contracts.
//! Nothing in here performs I/O.

pub mod buffer;
pub mod constants;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod traits;
