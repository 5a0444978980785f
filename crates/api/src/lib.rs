//! Form API for the ledgerline entry points

pub mod http;

pub use http::{router, start_http_server, AppState, InvokeRequest};
