//! HTTP layer — `RegistryHttp` for the delegate registry and JSON-RPC chain lookup.

pub mod client;
pub mod rpc;

pub use client::{RegistryHttp, DEFAULT_TIMEOUT};
pub use rpc::resolve_chain_id;
