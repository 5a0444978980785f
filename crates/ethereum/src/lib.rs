//! JSON-RPC side of ledgerline: providers, contract handles and invocation

pub mod backend;
pub mod handle;
pub mod invoker;
mod provider;

pub use backend::{classify, ContractBackend, MiddlewareBackend};
pub use handle::{connect, ContractHandle, Receipt};
pub use invoker::{dispatch, execute, run, Outcome};
pub use provider::EthereumProvider;

#[cfg(test)]
mod tests;
