/// The seam between contract handles and the JSON-RPC client
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{decode, ParamType, Token};
use ethers::providers::{JsonRpcError, Middleware, MiddlewareError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionReceipt};
use ledgerline_common::{Error, Result};
use tracing::{debug, info};

/// Selector of the Solidity `Error(string)` revert payload
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Remote operations a contract handle needs
#[async_trait]
pub trait ContractBackend: Send + Sync {
    /// Execute a call without creating a transaction
    async fn call(&self, tx: TypedTransaction) -> Result<Bytes>;

    /// Sign and submit a transaction and wait for its receipt.
    /// `None` means the transaction was dropped before it was mined.
    async fn send(&self, tx: TypedTransaction) -> Result<Option<TransactionReceipt>>;

    /// Address of the signing account, if any
    fn signer(&self) -> Option<Address>;
}

/// Backend over any ethers middleware stack
pub struct MiddlewareBackend<M> {
    client: Arc<M>,
    signer: Option<Address>,
    confirmations: usize,
}

impl<M: Middleware> MiddlewareBackend<M> {
    /// Backend without a signer; `send` is still forwarded but the node will
    /// normally reject unsigned transactions
    pub fn read_only(client: M, confirmations: usize) -> Self {
        Self {
            client: Arc::new(client),
            signer: None,
            confirmations,
        }
    }

    /// Backend whose middleware signs with `signer`
    pub fn with_signer(client: M, signer: Address, confirmations: usize) -> Self {
        Self {
            client: Arc::new(client),
            signer: Some(signer),
            confirmations,
        }
    }
}

#[async_trait]
impl<M> ContractBackend for MiddlewareBackend<M>
where
    M: Middleware + 'static,
{
    async fn call(&self, tx: TypedTransaction) -> Result<Bytes> {
        debug!(to = ?tx.to(), "eth_call");
        self.client.call(&tx, None).await.map_err(classify)
    }

    async fn send(&self, tx: TypedTransaction) -> Result<Option<TransactionReceipt>> {
        let pending = self.client.send_transaction(tx, None).await.map_err(classify)?;
        info!(tx_hash = ?pending.tx_hash(), confirmations = self.confirmations, "transaction submitted, waiting to be mined");

        pending.confirmations(self.confirmations).await.map_err(classify)
    }

    fn signer(&self) -> Option<Address> {
        self.signer
    }
}

/// Split client failures into node rejections and transport failures
pub fn classify<E: MiddlewareError>(err: E) -> Error {
    match err.as_error_response() {
        Some(response) => Error::remote_call(describe_rpc_error(response)),
        None => Error::network(err.to_string()),
    }
}

/// Human-readable summary of a JSON-RPC error, including a decoded revert
/// reason when the node returned one
pub fn describe_rpc_error(response: &JsonRpcError) -> String {
    let reason = response
        .data
        .as_ref()
        .and_then(|data| data.as_str())
        .and_then(decode_revert_reason);

    match reason {
        Some(reason) if !response.message.contains(&reason) => {
            format!("{}: {} (code {})", response.message, reason, response.code)
        }
        _ => format!("{} (code {})", response.message, response.code),
    }
}

/// Decode an `Error(string)` revert payload given as 0x-hex
pub fn decode_revert_reason(data: &str) -> Option<String> {
    let bytes = ethers::utils::hex::decode(data.strip_prefix("0x").unwrap_or(data)).ok()?;
    if bytes.len() < 4 || bytes[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match decode(&[ParamType::String], &bytes[4..]).ok()?.pop()? {
        Token::String(reason) => Some(reason),
        _ => None,
    }
}
