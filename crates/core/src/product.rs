/// Contract products reachable through ledgerline
use std::fmt;
use std::str::FromStr;

use ledgerline_common::Error;
use serde::Serialize;

/// One of the fixed contracts the tool talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// ERC20-like token with role-based access control
    Token,

    /// Credit-card product contract
    CreditCard,

    /// Deposit product contract
    Deposit,
}

impl Product {
    /// All products in display order
    pub const ALL: [Product; 3] = [Product::Token, Product::CreditCard, Product::Deposit];

    /// Short name used on the command line and in URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Token => "token",
            Product::CreditCard => "card",
            Product::Deposit => "deposit",
        }
    }

    /// Segment used in environment variable names
    pub fn env_segment(&self) -> &'static str {
        match self {
            Product::Token => "TOKEN",
            Product::CreditCard => "CREDIT_CARD",
            Product::Deposit => "DEPOSIT",
        }
    }

    /// Key used in the config file tables
    pub fn config_key(&self) -> &'static str {
        match self {
            Product::Token => "token",
            Product::CreditCard => "credit_card",
            Product::Deposit => "deposit",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Product {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(Product::Token),
            "card" | "credit-card" | "credit_card" => Ok(Product::CreditCard),
            "deposit" => Ok(Product::Deposit),
            other => Err(Error::validation(format!("unknown product '{}'", other))),
        }
    }
}
