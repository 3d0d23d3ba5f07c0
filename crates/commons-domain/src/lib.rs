//! Domain types shared across Commons services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Services map these to and from their storage representation in `infra/`.

pub mod community;
pub mod locale;
pub mod pagination;
pub mod review;
pub mod user;
