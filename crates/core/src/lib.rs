/// Core types for ledgerline: configuration, ABIs, argument encoding and the entry-point table
pub mod abi;
pub mod args;
pub mod config;
pub mod entry;
pub mod format;
pub mod product;
pub mod units;

pub use args::{ArgKind, ArgSpec};
pub use config::{ConnectionConfig, PrivateKey, Settings};
pub use entry::{EntryPoint, ENTRY_POINTS};
pub use format::{OutputKind, Rendered};
pub use product::Product;

/// Re-export the shared error types
pub use ledgerline_common::{Error, Result};
