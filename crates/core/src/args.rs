/// Argument kinds accepted by entry points and their ABI encoding
use std::fmt;

use ethers::abi::{ParamType, Token};
use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use ledgerline_common::{Error, Result};
use serde::Serialize;

use crate::units::parse_amount;

/// How a raw user-supplied string is turned into an ABI token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// 20-byte hex account or contract address
    Address,

    /// Decimal token amount, scaled by the product's decimals
    Amount,

    /// Raw unsigned integer (indices, periods in seconds, basis points)
    Uint,

    /// 32-byte hex identifier such as an access-control role
    Bytes32,

    /// Boolean flag
    Bool,

    /// Free text
    Text,
}

impl ArgKind {
    /// ABI parameter type this kind encodes to
    pub fn param_type(&self) -> ParamType {
        match self {
            ArgKind::Address => ParamType::Address,
            ArgKind::Amount | ArgKind::Uint => ParamType::Uint(256),
            ArgKind::Bytes32 => ParamType::FixedBytes(32),
            ArgKind::Bool => ParamType::Bool,
            ArgKind::Text => ParamType::String,
        }
    }

    /// Short input hint shown next to prompts and in the form schema
    pub fn hint(&self) -> &'static str {
        match self {
            ArgKind::Address => "0x-prefixed address",
            ArgKind::Amount => "decimal amount, e.g. 10 or 2.5",
            ArgKind::Uint => "whole number",
            ArgKind::Bytes32 => "0x-prefixed 32-byte hex",
            ArgKind::Bool => "true or false",
            ArgKind::Text => "text",
        }
    }

    /// Encode a raw string into an ABI token
    pub fn encode(&self, name: &str, raw: &str, decimals: u32) -> Result<Token> {
        let value = raw.trim();
        match self {
            ArgKind::Address => {
                let address = value
                    .parse::<Address>()
                    .map_err(|_| Error::validation(format!("{}: '{}' is not a valid address", name, raw)))?;
                if !checksum_matches(value, &address) {
                    return Err(Error::validation(format!("{}: '{}' has a bad address checksum", name, raw)));
                }
                Ok(Token::Address(address))
            }
            ArgKind::Amount => parse_amount(value, decimals)
                .map(Token::Uint)
                .map_err(|e| Error::validation(format!("{}: {}", name, strip_prefix(&e)))),
            ArgKind::Uint => parse_uint(value)
                .map(Token::Uint)
                .ok_or_else(|| Error::validation(format!("{}: '{}' is not a whole number", name, raw))),
            ArgKind::Bytes32 => {
                let bytes = value
                    .strip_prefix("0x")
                    .and_then(|h| hex::decode(h).ok())
                    .filter(|b| b.len() == 32)
                    .ok_or_else(|| {
                        Error::validation(format!("{}: '{}' is not a 0x-prefixed 32-byte hex value", name, raw))
                    })?;
                Ok(Token::FixedBytes(bytes))
            }
            ArgKind::Bool => match value.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(Token::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(Token::Bool(false)),
                _ => Err(Error::validation(format!("{}: '{}' is not true or false", name, raw))),
            },
            ArgKind::Text => Ok(Token::String(raw.to_string())),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Address => "address",
            ArgKind::Amount => "amount",
            ArgKind::Uint => "uint",
            ArgKind::Bytes32 => "bytes32",
            ArgKind::Bool => "bool",
            ArgKind::Text => "text",
        };
        write!(f, "{}", name)
    }
}

/// One positional argument of an entry point
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArgSpec {
    /// Argument name, also the form field name
    pub name: &'static str,

    /// Encoding of the argument
    pub kind: ArgKind,

    /// Prompt shown when the value is missing
    pub prompt: &'static str,
}

impl ArgSpec {
    pub const fn new(name: &'static str, kind: ArgKind, prompt: &'static str) -> Self {
        Self { name, kind, prompt }
    }
}

/// Mixed-case input must be the EIP-55 form of the address; all-lowercase or
/// all-uppercase hex carries no checksum
pub fn checksum_matches(value: &str, address: &Address) -> bool {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let mixed = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());
    !mixed || to_checksum(address, None)[2..] == *digits
}

fn parse_uint(value: &str) -> Option<U256> {
    if let Some(hex_digits) = value.strip_prefix("0x") {
        if hex_digits.is_empty() {
            return None;
        }
        return U256::from_str_radix(hex_digits, 16).ok();
    }
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(value).ok()
}

// Keeps nested validation messages from repeating the category prefix
fn strip_prefix(err: &Error) -> String {
    match err {
        Error::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
