//! Search engine backends.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | always | JSON documents evaluated in process; also an object store |
//! | Elasticsearch | `elasticsearch` | Query DSL over a live cluster |

pub mod elasticsearch;
pub mod memory;
