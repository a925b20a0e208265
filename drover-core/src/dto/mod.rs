//! Data Transfer Objects for the control surface
//!
//! Request and response bodies exchanged between the Drover server and its
//! clients (CLI, dashboards).

pub mod job;
pub mod proxy;
