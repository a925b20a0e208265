//! Core domain types
//!
//! These types are shared between the engine (which produces them) and the
//! server/client pair (which carry them over the wire).

pub mod job;
pub mod outcome;
pub mod proxy;
pub mod record;
pub mod results;
