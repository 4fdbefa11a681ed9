//! Constant-product pool quoting and pool-state access.

pub mod calc;
pub mod client;
pub mod state;

pub use calc::{
    CurveParams, FeeMode, FeeRate, ResolvedDirection, Slippage, StatusPolicy, compute_amount_out,
    quote, quote_amounts, resolve_direction,
};
pub use client::{EvmPairClient, PoolStateFetcher, StaticPoolFetcher};
pub use state::EffectivePoolState;
