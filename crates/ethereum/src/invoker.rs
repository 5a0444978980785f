/// Runs one entry point end to end: arguments, configuration, connection, call
use ethers::abi::Token;
use ledgerline_common::Result;
use ledgerline_core::abi::resolve_abi;
use ledgerline_core::format::render;
use ledgerline_core::{EntryPoint, Rendered, Settings};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::handle::{connect, ContractHandle, Receipt};

/// Result of an invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Outcome {
    /// Decoded and formatted return value of a read
    Read(Rendered),

    /// Receipt of a mined write
    Write(Receipt),
}

impl Outcome {
    /// Text printed for humans
    pub fn display(&self) -> String {
        match self {
            Outcome::Read(rendered) => rendered.display.clone(),
            Outcome::Write(receipt) => receipt.to_string(),
        }
    }

    /// Machine-readable form
    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Read(rendered) => json!({
                "result": rendered.value,
                "display": rendered.display,
            }),
            Outcome::Write(receipt) => json!({ "receipt": receipt }),
        }
    }
}

/// Call an entry point's method on a handle with already encoded arguments
pub async fn dispatch(
    handle: &ContractHandle,
    entry: &EntryPoint,
    args: Vec<Token>,
    decimals: u32,
) -> Result<Outcome> {
    if entry.requires_signer {
        let receipt = handle.call_write(entry.method, args).await?;
        Ok(Outcome::Write(receipt))
    } else {
        let tokens = handle.call_read(entry.method, args).await?;
        Ok(Outcome::Read(render(&tokens, entry.output, decimals)?))
    }
}

/// Validate raw arguments, then dispatch on an existing handle
pub async fn execute(
    handle: &ContractHandle,
    entry: &EntryPoint,
    raw: &[Option<String>],
    decimals: u32,
) -> Result<Outcome> {
    let args = entry.prepare(raw, decimals)?;
    dispatch(handle, entry, args, decimals).await
}

/// Run an entry point against the configured node.
///
/// Arguments are validated before configuration is resolved, and both happen
/// before any connection is made.
pub async fn run(
    settings: &Settings,
    entry: &EntryPoint,
    raw: &[Option<String>],
    decimals_override: Option<u32>,
) -> Result<Outcome> {
    let decimals = decimals_override.unwrap_or_else(|| settings.decimals(entry.product));
    let args = entry.prepare(raw, decimals)?;

    let config = settings.resolve(entry.product, entry.requires_signer)?;
    let abi = resolve_abi(entry.product, settings.abi_path(entry.product))?;

    debug!(product = %entry.product, method = entry.method, rpc_url = %config.rpc_url, decimals, "connecting");
    let handle = connect(&config, abi, entry.requires_signer).await?;
    dispatch(&handle, entry, args, decimals).await
}
