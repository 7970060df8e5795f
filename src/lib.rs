//! Koby - Rule-based zoning and property assistant
//!
//! This crate implements the dialogue engine behind the Koby chat widget:
//! intent routing over a fixed catalog, the conversation state machine, and
//! the property lookup and feedback services it talks to.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
