use std::sync::Arc;

use ethers::providers::{Http, JsonRpcClient, Provider, Ws};
use ethers::signers::{LocalWallet, Signer};
use ethers::middleware::SignerMiddleware;
use ledgerline_common::{Error, Result};
use ledgerline_core::ConnectionConfig;
use tracing::{debug, info};

use crate::backend::{ContractBackend, MiddlewareBackend};

/// Ethereum provider types
#[derive(Debug, Clone)]
pub enum EthereumProvider {
    /// HTTP provider
    Http(Provider<Http>),

    /// WebSocket provider
    Websocket(Provider<Ws>),
}

impl EthereumProvider {
    /// Create a provider for the URL's scheme. HTTP providers do not touch the
    /// network until the first request; WebSocket providers open the socket here.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        if rpc_url.starts_with("ws://") || rpc_url.starts_with("wss://") {
            let ws_provider = Provider::<Ws>::connect(rpc_url)
                .await
                .map_err(|e| Error::network(format!("Failed to connect to Ethereum node via WebSocket: {}", e)))?;

            Ok(Self::Websocket(ws_provider))
        } else {
            let http_provider = Provider::<Http>::try_from(rpc_url)
                .map_err(|e| Error::config(format!("Failed to create Ethereum HTTP provider: {}", e)))?;

            Ok(Self::Http(http_provider))
        }
    }

    /// Wrap the provider in a backend, read-only or signing
    pub async fn into_backend(
        self,
        config: &ConnectionConfig,
        needs_signer: bool,
    ) -> Result<Arc<dyn ContractBackend>> {
        match self {
            EthereumProvider::Http(provider) => build_backend(provider, config, needs_signer).await,
            EthereumProvider::Websocket(provider) => build_backend(provider, config, needs_signer).await,
        }
    }
}

async fn build_backend<P>(
    provider: Provider<P>,
    config: &ConnectionConfig,
    needs_signer: bool,
) -> Result<Arc<dyn ContractBackend>>
where
    P: JsonRpcClient + 'static,
{
    if !needs_signer {
        debug!("binding contract read-only");
        return Ok(Arc::new(MiddlewareBackend::read_only(provider, config.confirmations)));
    }

    let key = config
        .private_key
        .as_ref()
        .ok_or_else(|| Error::config("a private key is required for state-changing calls"))?;
    let wallet: LocalWallet = key
        .expose()
        .parse()
        .map_err(|e| Error::config(format!("Failed to parse private key: {}", e)))?;
    let signer = wallet.address();

    let client = match config.chain_id {
        Some(chain_id) => SignerMiddleware::new(provider, wallet.with_chain_id(chain_id)),
        None => SignerMiddleware::new_with_provider_chain(provider, wallet)
            .await
            .map_err(|e| Error::network(format!("Failed to fetch chain id from node: {}", e)))?,
    };

    info!(%signer, "binding contract with signer");
    Ok(Arc::new(MiddlewareBackend::with_signer(client, signer, config.confirmations)))
}
