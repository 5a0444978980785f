use ethers::abi::Token;
use ethers::types::{Bytes, H256, U256};
use ledgerline_common::Error;
use ledgerline_core::Product;

use super::*;

#[tokio::test]
async fn test_call_read_returns_decoded_value() {
    let mut backend = backend(None);
    let name = returns(&[Token::String("Ledger Token".to_string())]);
    backend
        .expect_call()
        .withf(|tx| tx.to_addr() == Some(&contract()) && tx.from().is_none())
        .times(1)
        .returning(move |_| Ok(name.clone()));

    let handle = handle(Product::Token, backend);
    assert!(!handle.is_writable());

    let result = handle.call_read("name", vec![]).await.unwrap();
    assert_eq!(result, vec![Token::String("Ledger Token".to_string())]);
}

#[tokio::test]
async fn test_call_read_encodes_arguments() {
    let mut backend = backend(None);
    let balance = returns(&[Token::Uint(U256::exp10(19))]);
    backend
        .expect_call()
        .withf(|tx| {
            // balanceOf(address) selector followed by one padded word
            let data = tx.data().map(|d| d.to_vec()).unwrap_or_default();
            data.len() == 36 && data[..4] == [0x70, 0xa0, 0x82, 0x31]
        })
        .times(1)
        .returning(move |_| Ok(balance.clone()));

    let handle = handle(Product::Token, backend);
    let account = Token::Address(ACCOUNT.parse().unwrap());
    let result = handle.call_read("balanceOf", vec![account]).await.unwrap();
    assert_eq!(result, vec![Token::Uint(U256::exp10(19))]);
}

#[tokio::test]
async fn test_call_read_with_empty_return_data() {
    let mut backend = backend(None);
    backend.expect_call().returning(|_| Ok(Bytes::new()));

    let handle = handle(Product::Token, backend);
    let err = handle.call_read("symbol", vec![]).await.unwrap_err();
    assert!(matches!(err, Error::RemoteCall(_)));
}

#[tokio::test]
async fn test_call_read_propagates_backend_errors() {
    let mut backend = backend(None);
    backend
        .expect_call()
        .returning(|_| Err(Error::network("connection refused")));

    let handle = handle(Product::Token, backend);
    let err = handle.call_read("name", vec![]).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn test_call_read_rejects_unknown_method_and_bad_arity() {
    let mut backend = backend(None);
    backend.expect_call().never();

    let handle = handle(Product::Deposit, backend);
    assert!(matches!(
        handle.call_read("balanceOf", vec![]).await,
        Err(Error::Abi(_))
    ));
    assert!(matches!(
        handle.call_read("depositCount", vec![]).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_call_write_returns_receipt() {
    let mut backend = backend(Some(signer()));
    backend
        .expect_send()
        .withf(|tx| tx.from() == Some(&signer()) && tx.to_addr() == Some(&contract()))
        .times(1)
        .returning(|_| Ok(Some(receipt(1, 42))));

    let handle = handle(Product::Token, backend);
    assert!(handle.is_writable());

    let args = vec![
        Token::Address(ACCOUNT.parse().unwrap()),
        Token::Uint(U256::exp10(19)),
    ];
    let result = handle.call_write("transfer", args).await.unwrap();
    assert_eq!(result.block_number, 42);
    assert_eq!(result.tx_hash, H256::repeat_byte(0xab));
    assert_eq!(result.gas_used, Some(U256::from(51_234u64)));
}

#[tokio::test]
async fn test_call_write_failed_status_is_an_error() {
    let mut backend = backend(Some(signer()));
    backend.expect_send().returning(|_| Ok(Some(receipt(0, 43))));

    let handle = handle(Product::CreditCard, backend);
    let args = vec![Token::Uint(U256::from(7u64))];
    let err = handle.call_write("freezeCard", args).await.unwrap_err();
    assert!(matches!(err, Error::RemoteCall(_)));
    assert!(err.to_string().contains("reverted in block 43"));
}

#[tokio::test]
async fn test_call_write_dropped_transaction() {
    let mut backend = backend(Some(signer()));
    backend.expect_send().returning(|_| Ok(None));

    let handle = handle(Product::Deposit, backend);
    let err = handle
        .call_write("withdraw", vec![Token::Uint(U256::zero())])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RemoteCall(_)));
}

#[tokio::test]
async fn test_call_write_without_signer() {
    let mut backend = backend(None);
    backend.expect_send().never();

    let handle = handle(Product::Token, backend);
    let err = handle
        .call_write("burn", vec![Token::Uint(U256::one())])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
