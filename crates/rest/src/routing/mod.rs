//! Route configuration for the DBBE search API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod dbbe_routes;

pub use dbbe_routes::create_routes;
