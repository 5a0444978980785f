//! Reads through a real ethers provider backed by a mocked JSON-RPC transport

use std::sync::Arc;

use ethers::abi::{encode, Token};
use ethers::providers::Provider;
use ethers::types::{Address, Bytes, U256};
use ledgerline_core::abi::builtin_abi;
use ledgerline_core::entry::find;
use ledgerline_core::Product;
use ledgerline_ethereum::{execute, ContractHandle, MiddlewareBackend};

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[tokio::test]
async fn test_name_is_returned_unchanged() {
    let (provider, mock) = Provider::mocked();
    mock.push::<Bytes, _>(Bytes::from(encode(&[Token::String("Ledger Token".to_string())])))
        .unwrap();

    let backend = MiddlewareBackend::read_only(provider, 1);
    let address: Address = CONTRACT.parse().unwrap();
    let handle = ContractHandle::new(address, builtin_abi(Product::Token).unwrap(), Arc::new(backend));

    let result = handle.call_read("name", vec![]).await.unwrap();
    assert_eq!(result, vec![Token::String("Ledger Token".to_string())]);
}

#[tokio::test]
async fn test_total_deposits_through_entry_point() {
    let (provider, mock) = Provider::mocked();
    let total = U256::exp10(18) * U256::from(1_250u64);
    mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(total)])))
        .unwrap();

    let backend = MiddlewareBackend::read_only(provider, 1);
    let address: Address = CONTRACT.parse().unwrap();
    let handle = ContractHandle::new(address, builtin_abi(Product::Deposit).unwrap(), Arc::new(backend));

    let entry = find(Product::Deposit, "total-deposits").unwrap();
    let outcome = execute(&handle, entry, &[], 18).await.unwrap();
    assert_eq!(outcome.display(), "1250");
}

#[tokio::test]
async fn test_missing_response_is_a_network_error() {
    let (provider, _mock) = Provider::mocked();

    let backend = MiddlewareBackend::read_only(provider, 1);
    let address: Address = CONTRACT.parse().unwrap();
    let handle = ContractHandle::new(address, builtin_abi(Product::Token).unwrap(), Arc::new(backend));

    let err = handle.call_read("symbol", vec![]).await.unwrap_err();
    assert!(matches!(err, ledgerline_common::Error::Network(_)));
}
