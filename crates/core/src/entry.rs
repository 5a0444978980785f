/// Declarative table binding commands to contract methods
use ledgerline_common::{Error, Result};
use serde::Serialize;

use crate::args::{ArgKind, ArgSpec};
use crate::format::{FieldSpec, OutputKind};
use crate::product::Product;

/// One command bound to one contract method
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntryPoint {
    /// Contract the method lives on
    pub product: Product,

    /// Kebab-case command name used on the CLI and in URLs
    pub command: &'static str,

    /// Contract method name as it appears in the ABI
    pub method: &'static str,

    /// One-line description
    pub about: &'static str,

    /// Positional arguments, in ABI order
    pub args: &'static [ArgSpec],

    /// Whether the call changes state and needs a signer
    pub requires_signer: bool,

    /// Presentation of the return value for reads
    pub output: OutputKind,
}

impl EntryPoint {
    /// Validate and encode raw argument values.
    ///
    /// Every missing argument is reported in a single validation error before
    /// any value is parsed.
    pub fn prepare(&self, raw: &[Option<String>], decimals: u32) -> Result<Vec<ethers::abi::Token>> {
        if raw.len() > self.args.len() {
            return Err(Error::validation(format!(
                "{} {} takes {} argument(s), got {}",
                self.product,
                self.command,
                self.args.len(),
                raw.len()
            )));
        }

        let missing: Vec<&str> = self
            .args
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                raw.get(*i)
                    .and_then(|v| v.as_deref())
                    .map_or(true, |v| v.trim().is_empty())
            })
            .map(|(_, spec)| spec.name)
            .collect();
        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "{} {}: missing required argument(s): {}",
                self.product,
                self.command,
                missing.join(", ")
            )));
        }

        self.args
            .iter()
            .zip(raw)
            .map(|(spec, value)| spec.kind.encode(spec.name, value.as_deref().unwrap_or_default(), decimals))
            .collect()
    }

    /// Fully qualified name, e.g. `token balance-of`
    pub fn qualified_name(&self) -> String {
        format!("{} {}", self.product, self.command)
    }
}

const fn read(
    product: Product,
    command: &'static str,
    method: &'static str,
    about: &'static str,
    args: &'static [ArgSpec],
    output: OutputKind,
) -> EntryPoint {
    EntryPoint { product, command, method, about, args, requires_signer: false, output }
}

const fn write(
    product: Product,
    command: &'static str,
    method: &'static str,
    about: &'static str,
    args: &'static [ArgSpec],
) -> EntryPoint {
    EntryPoint { product, command, method, about, args, requires_signer: true, output: OutputKind::Plain }
}

const ACCOUNT: ArgSpec = ArgSpec::new("account", ArgKind::Address, "Account address");
const OWNER: ArgSpec = ArgSpec::new("owner", ArgKind::Address, "Owner address");
const SPENDER: ArgSpec = ArgSpec::new("spender", ArgKind::Address, "Spender address");
const TO: ArgSpec = ArgSpec::new("to", ArgKind::Address, "Recipient address");
const FROM: ArgSpec = ArgSpec::new("from", ArgKind::Address, "Sender address");
const AMOUNT: ArgSpec = ArgSpec::new("amount", ArgKind::Amount, "Amount");
const ROLE: ArgSpec = ArgSpec::new("role", ArgKind::Bytes32, "Role identifier (bytes32)");
const HOLDER: ArgSpec = ArgSpec::new("holder", ArgKind::Address, "Card holder address");
const CARD_ID: ArgSpec = ArgSpec::new("card_id", ArgKind::Uint, "Card id");
const CREDIT_LIMIT: ArgSpec = ArgSpec::new("credit_limit", ArgKind::Amount, "Credit limit");
const INDEX: ArgSpec = ArgSpec::new("index", ArgKind::Uint, "Deposit index");
const PERIOD: ArgSpec = ArgSpec::new("period", ArgKind::Uint, "Lock period in seconds");
const RATE_BPS: ArgSpec = ArgSpec::new("rate_bps", ArgKind::Uint, "Interest rate in basis points");

const CARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("holder", ArgKind::Address),
    FieldSpec::new("credit_limit", ArgKind::Amount),
    FieldSpec::new("balance", ArgKind::Amount),
    FieldSpec::new("active", ArgKind::Bool),
];

const DEPOSIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("amount", ArgKind::Amount),
    FieldSpec::new("start_time", ArgKind::Uint),
    FieldSpec::new("period", ArgKind::Uint),
    FieldSpec::new("withdrawn", ArgKind::Bool),
];

use OutputKind::{Amount as AmountOut, Plain};
use Product::{CreditCard as Card, Deposit, Token};

/// Every command ledgerline knows about
pub static ENTRY_POINTS: &[EntryPoint] = &[
    // Token
    read(Token, "name", "name", "Token name", &[], Plain),
    read(Token, "symbol", "symbol", "Token symbol", &[], Plain),
    read(Token, "decimals", "decimals", "Decimals declared by the token", &[], Plain),
    read(Token, "total-supply", "totalSupply", "Total token supply", &[], AmountOut),
    read(Token, "balance-of", "balanceOf", "Token balance of an account", &[ACCOUNT], AmountOut),
    read(Token, "allowance", "allowance", "Remaining allowance of a spender", &[OWNER, SPENDER], AmountOut),
    read(Token, "minter-role", "MINTER_ROLE", "Identifier of the minter role", &[], Plain),
    read(Token, "has-role", "hasRole", "Whether an account holds a role", &[ROLE, ACCOUNT], Plain),
    write(Token, "transfer", "transfer", "Transfer tokens to an account", &[TO, AMOUNT]),
    write(Token, "approve", "approve", "Approve a spender", &[SPENDER, AMOUNT]),
    write(Token, "transfer-from", "transferFrom", "Transfer tokens on behalf of an owner", &[FROM, TO, AMOUNT]),
    write(Token, "mint", "mint", "Mint new tokens", &[TO, AMOUNT]),
    write(Token, "burn", "burn", "Burn tokens held by the signer", &[AMOUNT]),
    write(Token, "grant-role", "grantRole", "Grant a role to an account", &[ROLE, ACCOUNT]),
    write(Token, "revoke-role", "revokeRole", "Revoke a role from an account", &[ROLE, ACCOUNT]),
    // Credit card
    read(Card, "issuer-role", "ISSUER_ROLE", "Identifier of the issuer role", &[], Plain),
    read(Card, "has-role", "hasRole", "Whether an account holds a role", &[ROLE, ACCOUNT], Plain),
    read(Card, "card-count", "cardCount", "Number of cards issued", &[], Plain),
    read(Card, "get-card", "getCard", "Details of a card", &[CARD_ID], OutputKind::Record(CARD_FIELDS)),
    read(Card, "available-credit", "availableCredit", "Unused credit on a card", &[CARD_ID], AmountOut),
    read(Card, "cards-of", "cardsOf", "Card ids held by an address", &[HOLDER], Plain),
    write(Card, "grant-role", "grantRole", "Grant a role to an account", &[ROLE, ACCOUNT]),
    write(Card, "issue-card", "issueCard", "Issue a card with a credit limit", &[HOLDER, CREDIT_LIMIT]),
    write(Card, "charge", "charge", "Charge an amount to a card", &[CARD_ID, AMOUNT]),
    write(Card, "repay", "repay", "Repay part of a card balance", &[CARD_ID, AMOUNT]),
    write(Card, "set-credit-limit", "setCreditLimit", "Change a card's credit limit", &[CARD_ID, CREDIT_LIMIT]),
    write(Card, "freeze-card", "freezeCard", "Freeze a card", &[CARD_ID]),
    // Deposit
    read(Deposit, "total-deposits", "totalDeposits", "Total amount deposited", &[], AmountOut),
    read(Deposit, "interest-rate", "interestRate", "Interest rate in basis points", &[], Plain),
    read(Deposit, "deposit-count", "depositCount", "Number of deposits of an owner", &[OWNER], Plain),
    read(Deposit, "get-deposit", "getDeposit", "Details of a deposit", &[OWNER, INDEX], OutputKind::Record(DEPOSIT_FIELDS)),
    read(Deposit, "accrued-interest", "accruedInterest", "Interest accrued on a deposit", &[OWNER, INDEX], AmountOut),
    write(Deposit, "deposit", "deposit", "Lock an amount for a period", &[AMOUNT, PERIOD]),
    write(Deposit, "withdraw", "withdraw", "Withdraw a matured deposit", &[INDEX]),
    write(Deposit, "set-interest-rate", "setInterestRate", "Set the interest rate", &[RATE_BPS]),
];

/// Look up an entry point by product and command (or raw method name)
pub fn find(product: Product, command: &str) -> Option<&'static EntryPoint> {
    ENTRY_POINTS
        .iter()
        .filter(|e| e.product == product)
        .find(|e| e.command == command || e.method == command)
}

/// Entry points of one product, in table order
pub fn for_product(product: Product) -> impl Iterator<Item = &'static EntryPoint> {
    ENTRY_POINTS.iter().filter(move |e| e.product == product)
}
