//! Common test utilities for API testing.
//!
//! - [`harness`] - test server around a seeded memory engine
//! - [`fixtures`] - DBBE sample records
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;
