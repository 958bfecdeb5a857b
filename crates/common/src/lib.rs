//! # U-Home Common
//!
//! OAuth 2.0 authorization-code primitives shared by the client crates:
//! token types, state generation, the token endpoint client and the
//! in-memory token store.
//!
//! Everything here is free of process configuration; callers assemble an
//! [`auth::OAuthConfig`] and hand it in.

pub mod auth;
