//! Test utilities for Commons services.
//!
//! Provides [`auth::MockAuth`] for signed session tokens and
//! [`webhook::signed_headers`] for identity-provider webhook requests.
//! Import in tests only, never in production code.

pub mod auth;
pub mod webhook;
