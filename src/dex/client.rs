use crate::dex::state::EffectivePoolState;
use crate::errors::{AppError, Result};
use crate::models::{AssetDescriptor, PoolDescriptor, PoolReserves, PoolStatus};
use ethers::{
    contract::{ContractError, abigen},
    providers::{Http, Middleware, Provider},
    types::Address,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

abigen!(
    ConstantProductPair,
    r"[
        function token0() view returns (address)
        function token1() view returns (address)
        function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
    ]",
);

abigen!(
    Erc20Metadata,
    r"[
        function decimals() view returns (uint8)
        function symbol() view returns (string)
    ]",
);

/// Source of current on-chain pool state.
///
/// Each call returns a fresh snapshot; two consecutive fetches need not agree.
pub trait PoolStateFetcher: Send + Sync {
    fn fetch_pool_state(
        &self,
        pool_id: &str,
    ) -> impl Future<Output = Result<EffectivePoolState>> + Send;
}

/// Lower-case `0x`-prefixed hex form used as the asset / pool identifier.
pub fn address_id(addr: Address) -> String {
    format!("{:?}", addr)
}

/// Parse a pool or asset identifier into an EVM address.
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| AppError::NotFound(format!("{raw} is not a valid address")))
}

/// A revert or undecodable answer means the contract does not speak the
/// interface; anything else is a transport failure.
fn interface_error<M: Middleware>(
    e: ContractError<M>,
    not_found: impl FnOnce() -> String,
) -> AppError {
    match e {
        ContractError::Revert(_)
        | ContractError::AbiError(_)
        | ContractError::DecodingError(_)
        | ContractError::DetokenizationError(_) => AppError::NotFound(not_found()),
        ContractError::MiddlewareError { e } => AppError::Network(e.to_string()),
        ContractError::ProviderError { e } => AppError::Network(e.to_string()),
        other => AppError::Contract(other.to_string()),
    }
}

/// Reads Uniswap-V2 style constant-product pairs over JSON-RPC.
#[derive(Clone)]
pub struct EvmPairClient<M = Provider<Http>> {
    provider: Arc<M>,
}

impl EvmPairClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Config(format!("invalid RPC url {rpc_url}: {e}")))?;
        Ok(Self::with_provider(Arc::new(provider)))
    }
}

impl<M: Middleware + 'static> EvmPairClient<M> {
    pub fn with_provider(provider: Arc<M>) -> Self {
        Self { provider }
    }

    async fn asset(&self, token: Address) -> Result<AssetDescriptor> {
        let erc20 = Erc20Metadata::new(token, self.provider.clone());
        let not_a_token = || format!("{} is not an ERC-20 token", address_id(token));
        let decimals = erc20
            .decimals()
            .call()
            .await
            .map_err(|e| interface_error(e, not_a_token))?;
        // Some tokens return bytes32 or nothing for symbol(); the address is a fine label then.
        let symbol = match erc20.symbol().call().await {
            Ok(s) => Some(s),
            Err(e) => {
                debug!(token = %address_id(token), error = %e, "[DEX] symbol() unavailable");
                None
            }
        };
        Ok(AssetDescriptor {
            address: address_id(token),
            decimals,
            symbol,
        })
    }
}

impl<M: Middleware + 'static> PoolStateFetcher for EvmPairClient<M> {
    async fn fetch_pool_state(&self, pool_id: &str) -> Result<EffectivePoolState> {
        let pair_addr = parse_address(pool_id)?;
        let code = self
            .provider
            .get_code(pair_addr, None)
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        if code.as_ref().is_empty() {
            return Err(AppError::NotFound(format!("no contract at {pool_id}")));
        }

        let not_a_pair = || format!("{pool_id} is not a constant-product pair");
        let pair = ConstantProductPair::new(pair_addr, self.provider.clone());
        let token0 = pair
            .token_0()
            .call()
            .await
            .map_err(|e| interface_error(e, not_a_pair))?;
        let token1 = pair
            .token_1()
            .call()
            .await
            .map_err(|e| interface_error(e, not_a_pair))?;
        let (reserve0, reserve1, _ts) = pair
            .get_reserves()
            .call()
            .await
            .map_err(|e| interface_error(e, not_a_pair))?;

        let descriptor = PoolDescriptor {
            pool_id: address_id(pair_addr),
            asset_a: self.asset(token0).await?,
            asset_b: self.asset(token1).await?,
        };
        debug!(
            pool = %descriptor.pool_id,
            reserve0,
            reserve1,
            "[DEX] fetched pair reserves"
        );

        Ok(EffectivePoolState::new(
            descriptor,
            PoolReserves {
                base: reserve0,
                quote: reserve1,
            },
            PoolStatus::ALWAYS_ACTIVE,
        ))
    }
}

/// In-memory pool states keyed by pool id, for offline runs and tests.
#[derive(Clone, Default)]
pub struct StaticPoolFetcher {
    pools: Arc<RwLock<HashMap<String, EffectivePoolState>>>,
}

impl StaticPoolFetcher {
    pub fn new(states: impl IntoIterator<Item = EffectivePoolState>) -> Self {
        let pools = states
            .into_iter()
            .map(|state| (state.descriptor.pool_id.clone(), state))
            .collect();
        Self {
            pools: Arc::new(RwLock::new(pools)),
        }
    }

    pub async fn insert(&self, state: EffectivePoolState) {
        self.pools
            .write()
            .await
            .insert(state.descriptor.pool_id.clone(), state);
    }

    /// Simulate the pool moving on-chain between fetches.
    pub async fn update_reserves(
        &self,
        pool_id: &str,
        reserves: PoolReserves,
        status: PoolStatus,
    ) -> Result<()> {
        let mut pools = self.pools.write().await;
        let state = pools
            .get_mut(pool_id)
            .ok_or_else(|| AppError::NotFound(pool_id.to_string()))?;
        *state = state.with_fresh(reserves, status);
        Ok(())
    }
}

impl PoolStateFetcher for StaticPoolFetcher {
    async fn fetch_pool_state(&self, pool_id: &str) -> Result<EffectivePoolState> {
        self.pools
            .read()
            .await
            .get(pool_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(pool_id.to_string()))
    }
}
