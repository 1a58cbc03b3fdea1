//! services/api/src/lib.rs
//!
//! The GeoWatch service: provider adapters, configuration and the REST layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod providers;
pub mod web;
