//! Pure domain logic for the perks service.
//!
//! Nothing in this crate performs I/O: it holds the shared id and timestamp
//! types, the domain error enum, and the perk validation rules used by the
//! HTTP layer before anything reaches the database.

pub mod error;
pub mod perk;
pub mod types;
pub mod validation;
