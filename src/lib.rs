//! Discovery Desk - Discovery sessions for an AI automation consultancy
//!
//! Two engines sit behind one HTTP surface:
//!
//! - a six-step discovery wizard that turns a business snapshot and its pain
//!   points into a value map, automation opportunities, success metrics and
//!   a value-share agreement (`domain::discovery`)
//! - a voice turn controller that runs a spoken discovery call, taking turns
//!   between the client's microphone and the agent's voice
//!   (`application::voice`)

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
