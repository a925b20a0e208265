//! Drover Core
//!
//! Core types shared by the Drover batch engine, its HTTP surface and its clients.
//!
//! This crate contains:
//! - Domain types: records, proxies, attempt outcomes, job snapshots, results artifacts
//! - DTOs: request/response bodies for the control surface

pub mod domain;
pub mod dto;
