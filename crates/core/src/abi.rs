/// Static contract interfaces and JSON ABI loading
use std::fs;
use std::path::Path;

use ethers::abi::{parse_abi, Abi};
use ledgerline_common::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::product::Product;

/// ERC20 token with mint/burn and access control
pub const TOKEN_ABI: &[&str] = &[
    "function name() external view returns (string)",
    "function symbol() external view returns (string)",
    "function decimals() external view returns (uint8)",
    "function totalSupply() external view returns (uint256)",
    "function balanceOf(address account) external view returns (uint256)",
    "function allowance(address owner, address spender) external view returns (uint256)",
    "function MINTER_ROLE() external view returns (bytes32)",
    "function hasRole(bytes32 role, address account) external view returns (bool)",
    "function transfer(address to, uint256 amount) external returns (bool)",
    "function approve(address spender, uint256 amount) external returns (bool)",
    "function transferFrom(address from, address to, uint256 amount) external returns (bool)",
    "function mint(address to, uint256 amount) external",
    "function burn(uint256 amount) external",
    "function grantRole(bytes32 role, address account) external",
    "function revokeRole(bytes32 role, address account) external",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
];

/// Credit-card product
pub const CREDIT_CARD_ABI: &[&str] = &[
    "function ISSUER_ROLE() external view returns (bytes32)",
    "function hasRole(bytes32 role, address account) external view returns (bool)",
    "function grantRole(bytes32 role, address account) external",
    "function cardCount() external view returns (uint256)",
    "function getCard(uint256 cardId) external view returns (address holder, uint256 creditLimit, uint256 balance, bool active)",
    "function availableCredit(uint256 cardId) external view returns (uint256)",
    "function cardsOf(address holder) external view returns (uint256[])",
    "function issueCard(address holder, uint256 creditLimit) external returns (uint256)",
    "function charge(uint256 cardId, uint256 amount) external",
    "function repay(uint256 cardId, uint256 amount) external",
    "function setCreditLimit(uint256 cardId, uint256 creditLimit) external",
    "function freezeCard(uint256 cardId) external",
    "event CardIssued(uint256 indexed cardId, address indexed holder, uint256 creditLimit)",
];

/// Deposit product
pub const DEPOSIT_ABI: &[&str] = &[
    "function totalDeposits() external view returns (uint256)",
    "function interestRate() external view returns (uint256)",
    "function depositCount(address owner) external view returns (uint256)",
    "function getDeposit(address owner, uint256 index) external view returns (uint256 amount, uint256 startTime, uint256 period, bool withdrawn)",
    "function accruedInterest(address owner, uint256 index) external view returns (uint256)",
    "function deposit(uint256 amount, uint256 period) external",
    "function withdraw(uint256 index) external",
    "function setInterestRate(uint256 rateBps) external",
    "event Deposited(address indexed owner, uint256 indexed index, uint256 amount, uint256 period)",
];

/// Human-readable signatures for a product
pub fn signatures(product: Product) -> &'static [&'static str] {
    match product {
        Product::Token => TOKEN_ABI,
        Product::CreditCard => CREDIT_CARD_ABI,
        Product::Deposit => DEPOSIT_ABI,
    }
}

/// Built-in ABI for a product
pub fn builtin_abi(product: Product) -> Result<Abi> {
    parse_abi(signatures(product))
        .map_err(|e| Error::abi(format!("invalid built-in {} ABI: {}", product, e)))
}

/// Load an ABI from a JSON file: either a bare ABI array or a build artifact
/// carrying an `abi` key
pub fn load_abi_file(path: &Path) -> Result<Abi> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::abi(format!("failed to read ABI file {}: {}", path.display(), e)))?;
    let json: Value = serde_json::from_str(&content)
        .map_err(|e| Error::abi(format!("ABI file {} is not JSON: {}", path.display(), e)))?;

    let abi_value = match json {
        Value::Array(_) => json,
        Value::Object(mut object) => object
            .remove("abi")
            .ok_or_else(|| Error::abi(format!("no 'abi' key in {}", path.display())))?,
        _ => return Err(Error::abi(format!("unexpected ABI layout in {}", path.display()))),
    };

    let abi: Abi = serde_json::from_value(abi_value)
        .map_err(|e| Error::abi(format!("invalid ABI in {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), functions = abi.functions.len(), "loaded ABI file");
    Ok(abi)
}

/// The ABI to use for a product: the override file when given, else the built-in one
pub fn resolve_abi(product: Product, override_path: Option<&Path>) -> Result<Abi> {
    match override_path {
        Some(path) => load_abi_file(path),
        None => builtin_abi(product),
    }
}
