/// Handle and invoker tests against a mocked backend
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{encode, Token};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256, U64};
use mockall::mock;

use ledgerline_common::Result;
use ledgerline_core::abi::builtin_abi;
use ledgerline_core::Product;

use crate::backend::ContractBackend;
use crate::handle::ContractHandle;

mod handle_tests;

mock! {
    pub Backend {}

    #[async_trait]
    impl ContractBackend for Backend {
        async fn call(&self, tx: TypedTransaction) -> Result<Bytes>;
        async fn send(&self, tx: TypedTransaction) -> Result<Option<TransactionReceipt>>;
        fn signer(&self) -> Option<Address>;
    }
}

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const ACCOUNT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub fn contract() -> Address {
    CONTRACT.parse().unwrap()
}

pub fn signer() -> Address {
    SIGNER.parse().unwrap()
}

/// Backend reporting the given signer
pub fn backend(signer: Option<Address>) -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_signer().return_const(signer);
    backend
}

/// Bind a mocked backend to a product's built-in ABI
pub fn handle(product: Product, backend: MockBackend) -> ContractHandle {
    ContractHandle::new(contract(), builtin_abi(product).unwrap(), Arc::new(backend))
}

/// ABI-encoded return data
pub fn returns(tokens: &[Token]) -> Bytes {
    Bytes::from(encode(tokens))
}

/// Mined receipt with the given status
pub fn receipt(status: u64, block: u64) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: H256::repeat_byte(0xab),
        status: Some(U64::from(status)),
        block_number: Some(U64::from(block)),
        gas_used: Some(U256::from(51_234u64)),
        ..Default::default()
    }
}
