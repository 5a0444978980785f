/// Contract handles and the read/write invocation primitives
use std::fmt;
use std::sync::Arc;

use ethers::abi::{Abi, Function, Token};
use ethers::types::{Address, TransactionRequest, H256, U256};
use ethers::utils::to_checksum;
use ledgerline_common::{Error, Result};
use ledgerline_core::ConnectionConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::ContractBackend;
use crate::provider::EthereumProvider;

/// Confirmation record of a mined, successful transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Transaction hash
    pub tx_hash: H256,

    /// Block the transaction was included in
    pub block_number: u64,

    /// Gas used by the transaction, when the node reports it
    pub gas_used: Option<U256>,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction {:?} mined in block {}", self.tx_hash, self.block_number)?;
        if let Some(gas_used) = self.gas_used {
            write!(f, " (gas used: {})", gas_used)?;
        }
        Ok(())
    }
}

/// A contract address and ABI bound to a backend, read-only or with a signer
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    abi: Abi,
    backend: Arc<dyn ContractBackend>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("signer", &self.backend.signer())
            .finish()
    }
}

impl ContractHandle {
    /// Bind an address and ABI to a backend
    pub fn new(address: Address, abi: Abi, backend: Arc<dyn ContractBackend>) -> Self {
        Self { address, abi, backend }
    }

    /// Contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether the handle can submit transactions
    pub fn is_writable(&self) -> bool {
        self.backend.signer().is_some()
    }

    /// Invoke a view method and decode its outputs
    pub async fn call_read(&self, method: &str, args: Vec<Token>) -> Result<Vec<Token>> {
        let function = self.function(method)?;
        let data = encode_call(function, &args)?;

        let tx = TransactionRequest::new().to(self.address).data(data);
        debug!(contract = %to_checksum(&self.address, None), method, "calling view method");
        let output = self.backend.call(tx.into()).await?;

        if output.is_empty() && !function.outputs.is_empty() {
            return Err(Error::remote_call(format!(
                "{} returned no data; is there a contract at {}?",
                method,
                to_checksum(&self.address, None)
            )));
        }

        function
            .decode_output(&output)
            .map_err(|e| Error::abi(format!("failed to decode {} output: {}", method, e)))
    }

    /// Submit a state-changing method and wait until it is mined
    pub async fn call_write(&self, method: &str, args: Vec<Token>) -> Result<Receipt> {
        let signer = self.backend.signer().ok_or_else(|| {
            Error::config(format!("{} changes state and needs a signer", method))
        })?;
        let function = self.function(method)?;
        let data = encode_call(function, &args)?;

        let tx = TransactionRequest::new().from(signer).to(self.address).data(data);
        info!(contract = %to_checksum(&self.address, None), method, from = %to_checksum(&signer, None), "submitting transaction");

        let receipt = self
            .backend
            .send(tx.into())
            .await?
            .ok_or_else(|| Error::remote_call(format!("{} transaction was dropped from the mempool", method)))?;

        let block_number = receipt.block_number.map(|n| n.as_u64()).unwrap_or_default();
        if receipt.status.map(|s| s.as_u64()) != Some(1) {
            warn!(tx_hash = ?receipt.transaction_hash, block_number, "transaction reverted");
            return Err(Error::remote_call(format!(
                "{} transaction {:?} reverted in block {}",
                method, receipt.transaction_hash, block_number
            )));
        }

        info!(tx_hash = ?receipt.transaction_hash, block_number, "transaction mined");
        Ok(Receipt {
            tx_hash: receipt.transaction_hash,
            block_number,
            gas_used: receipt.gas_used,
        })
    }

    fn function(&self, method: &str) -> Result<&Function> {
        self.abi
            .function(method)
            .map_err(|_| Error::abi(format!("method {} is not in the contract ABI", method)))
    }
}

fn encode_call(function: &Function, args: &[Token]) -> Result<Vec<u8>> {
    if args.len() != function.inputs.len() {
        return Err(Error::validation(format!(
            "{} takes {} argument(s), got {}",
            function.name,
            function.inputs.len(),
            args.len()
        )));
    }
    function
        .encode_input(args)
        .map_err(|e| Error::validation(format!("invalid arguments for {}: {}", function.name, e)))
}

/// Build a contract handle from resolved configuration.
///
/// HTTP endpoints are not contacted until the first call. With a signer and no
/// configured chain id, the chain id is fetched from the node here.
pub async fn connect(config: &ConnectionConfig, abi: Abi, needs_signer: bool) -> Result<ContractHandle> {
    let provider = EthereumProvider::connect(&config.rpc_url).await?;
    let backend = provider.into_backend(config, needs_signer).await?;
    Ok(ContractHandle::new(config.contract_address, abi, backend))
}
