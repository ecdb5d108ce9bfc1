//! Host APIs for system interactions.
//!
//! - [`process`] - Bounded subprocess execution for CLI tools
//! - [`rpc`] - Line-delimited JSON-RPC subprocess probing

pub mod process;
pub mod rpc;
