//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, ratings, errors)
//! - `dialogue` - Intent catalog, router, session state and the dialogue controller

pub mod dialogue;
pub mod foundation;
