//! Authentication shared across Commons services.
//!
//! Provides session-token verification, the [`identity::Session`] extractor,
//! and identity-provider webhook signature verification.

pub mod identity;
pub mod token;
pub mod webhook;
