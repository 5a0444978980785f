/// Common error types shared by the ledgerline crates

/// Error type for contract invocations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error with message
    #[error("{0}")]
    Generic(String),

    /// Required configuration value missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required user argument missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The node rejected a call or a transaction failed on chain
    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    /// RPC endpoint unreachable or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// ABI could not be loaded or does not match the request
    #[error("ABI error: {0}")]
    Abi(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Create a new generic error
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a new remote call error
    pub fn remote_call<S: Into<String>>(msg: S) -> Self {
        Error::RemoteCall(msg.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a new ABI error
    pub fn abi<S: Into<String>>(msg: S) -> Self {
        Error::Abi(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }

    /// Stable lowercase tag for the error category
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Generic(_) => "generic",
            Error::Config(_) => "configuration",
            Error::Validation(_) => "validation",
            Error::RemoteCall(_) => "remote_call",
            Error::Network(_) => "network",
            Error::Abi(_) => "abi",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }

    /// Process exit status used by the CLI. 2 is left to clap usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::Abi(_) => 3,
            Error::Validation(_) => 4,
            Error::RemoteCall(_) => 5,
            Error::Network(_) => 6,
            _ => 1,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
