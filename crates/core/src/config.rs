//! Connection configuration: file loading, environment overrides and resolution

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ethers::types::Address;
use ledgerline_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::args::checksum_matches;
use crate::product::Product;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ledgerline.toml";

/// Prefix of every environment variable read by ledgerline
pub const ENV_PREFIX: &str = "LEDGERLINE";

/// Token amounts are scaled by this many decimals unless configured otherwise
pub const DEFAULT_DECIMALS: u32 = 18;

/// Blocks to wait for after a write is mined
pub const DEFAULT_CONFIRMATIONS: usize = 1;

/// Build the full environment variable name for a suffix
pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

/// Signing key, kept out of debug output
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Parse and normalise a 32-byte hex key, with or without `0x`
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if hex_part.len() != 64 {
            return Err(Error::config(format!(
                "private key must be 32 bytes of hex, got {} characters",
                hex_part.len()
            )));
        }
        let bytes = hex::decode(hex_part)
            .map_err(|_| Error::config("private key is not valid hex"))?;
        if bytes.iter().all(|b| *b == 0) {
            return Err(Error::config("private key must not be zero"));
        }
        Ok(Self(hex_part.to_lowercase()))
    }

    /// Hex encoding without the `0x` prefix
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted>)")
    }
}

/// Fully resolved connection settings for one product
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// JSON-RPC endpoint (http, https, ws or wss)
    pub rpc_url: String,

    /// Address of the product contract
    pub contract_address: Address,

    /// Signing key, present when writes are possible
    pub private_key: Option<PrivateKey>,

    /// Chain id for transaction signing; asked from the node when absent
    pub chain_id: Option<u64>,

    /// Confirmations to wait for after submitting a write
    pub confirmations: usize,
}

impl ConnectionConfig {
    /// Whether the configuration carries a signing key
    pub fn can_sign(&self) -> bool {
        self.private_key.is_some()
    }
}

/// Raw settings as read from the config file and the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON-RPC endpoint
    pub rpc_url: Option<String>,

    /// Chain id used when signing
    pub chain_id: Option<u64>,

    /// Confirmations to wait for on writes
    pub confirmations: Option<usize>,

    /// Contract addresses keyed by product (`token`, `credit_card`, `deposit`)
    pub contracts: HashMap<String, String>,

    /// Token decimals keyed by product
    pub decimals: HashMap<String, u32>,

    /// JSON ABI overrides keyed by product
    pub abi_paths: HashMap<String, PathBuf>,

    /// Signing key, environment only
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl Settings {
    /// Load settings from a file (or the default file when present) and apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {}", path.display(), e))
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|e| {
            Error::config(format!("failed to parse config file {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| lookup(&env_key(suffix)).filter(|v| !v.trim().is_empty());

        if let Some(rpc_url) = get("RPC_URL") {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(private_key) = get("PRIVATE_KEY") {
            self.private_key = Some(private_key);
        }
        if let Some(chain_id) = get("CHAIN_ID") {
            self.chain_id = Some(chain_id.trim().parse().map_err(|_| {
                Error::config(format!("invalid {} value: {}", env_key("CHAIN_ID"), chain_id))
            })?);
        }
        if let Some(confirmations) = get("CONFIRMATIONS") {
            self.confirmations = Some(confirmations.trim().parse().map_err(|_| {
                Error::config(format!(
                    "invalid {} value: {}",
                    env_key("CONFIRMATIONS"),
                    confirmations
                ))
            })?);
        }

        for product in Product::ALL {
            let segment = product.env_segment();
            if let Some(address) = get(&format!("{}_ADDRESS", segment)) {
                self.contracts.insert(product.config_key().to_string(), address);
            }
            if let Some(decimals) = get(&format!("{}_DECIMALS", segment)) {
                let parsed = decimals.trim().parse().map_err(|_| {
                    Error::config(format!(
                        "invalid {} value: {}",
                        env_key(&format!("{}_DECIMALS", segment)),
                        decimals
                    ))
                })?;
                self.decimals.insert(product.config_key().to_string(), parsed);
            }
            if let Some(abi_path) = get(&format!("{}_ABI", segment)) {
                self.abi_paths
                    .insert(product.config_key().to_string(), PathBuf::from(abi_path));
            }
        }

        Ok(())
    }

    /// Resolve the connection settings for a product. Never touches the network.
    pub fn resolve(&self, product: Product, needs_signer: bool) -> Result<ConnectionConfig> {
        let rpc_url = self
            .rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::config(format!("{} is not set", env_key("RPC_URL"))))?;
        validate_rpc_url(rpc_url)?;

        let address_var = env_key(&format!("{}_ADDRESS", product.env_segment()));
        let raw_address = self
            .contracts
            .get(product.config_key())
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::config(format!("{} is not set", address_var)))?;
        let contract_address = parse_contract_address(raw_address, &address_var)?;

        let private_key = match self.private_key.as_deref() {
            Some(raw) => Some(PrivateKey::parse(raw)?),
            None => None,
        };
        if needs_signer && private_key.is_none() {
            return Err(Error::config(format!(
                "{} is required for state-changing calls",
                env_key("PRIVATE_KEY")
            )));
        }

        Ok(ConnectionConfig {
            rpc_url: rpc_url.to_string(),
            contract_address,
            private_key,
            chain_id: self.chain_id,
            confirmations: self.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS),
        })
    }

    /// Decimals used to scale amounts for a product
    pub fn decimals(&self, product: Product) -> u32 {
        self.decimals
            .get(product.config_key())
            .copied()
            .unwrap_or(DEFAULT_DECIMALS)
    }

    /// Optional JSON ABI override for a product
    pub fn abi_path(&self, product: Product) -> Option<&Path> {
        self.abi_paths.get(product.config_key()).map(PathBuf::as_path)
    }
}

/// Check that an RPC URL has a supported scheme and a host
pub fn validate_rpc_url(url: &str) -> Result<()> {
    let rest = ["http://", "https://", "ws://", "wss://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .ok_or_else(|| {
            Error::config(format!(
                "RPC URL must start with http://, https://, ws:// or wss://: {}",
                url
            ))
        })?;

    let host = rest.split(['/', '?']).next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(Error::config(format!("RPC URL has no valid host: {}", url)));
    }
    Ok(())
}

fn parse_contract_address(raw: &str, var: &str) -> Result<Address> {
    let address: Address = raw
        .parse()
        .map_err(|_| Error::config(format!("{} is not a valid address: {}", var, raw)))?;
    if !checksum_matches(raw, &address) {
        return Err(Error::config(format!("{} has a bad address checksum: {}", var, raw)));
    }
    if address.is_zero() {
        return Err(Error::config(format!("{} must not be the zero address", var)));
    }
    Ok(address)
}
