//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `discovery` - Discovery wizard session and its pure calculators
//! - `voice` - Voice call transcript, insights and turn-taking states
//! - `document` - Agreement document rendering

pub mod discovery;
pub mod document;
pub mod foundation;
pub mod voice;
