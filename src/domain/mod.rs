//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, checksummed)
//! - `wire.rs` — Raw serde structs matching registry requests and responses
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `client.rs` — Sub-client with the signed HTTP operations

pub mod delegate;
