//! Auth types shared across Booknet services.
//!
//! Provides the JWT service (verification for every consumer, issuance for the
//! auth service only) and the `BearerToken` request extractor.

pub mod bearer;
pub mod token;
