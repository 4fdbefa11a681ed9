//! Shared data structures used throughout the application.

use serde::{Deserialize, Serialize};

/// One tradable asset in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Address / mint, unique within a venue.
    pub address: String,
    /// Decimal places; display only, never used by settlement arithmetic.
    pub decimals: u8,
    pub symbol: Option<String>,
}

impl AssetDescriptor {
    pub fn new(address: impl Into<String>, decimals: u8, symbol: Option<&str>) -> Self {
        Self {
            address: address.into(),
            decimals,
            symbol: symbol.map(str::to_string),
        }
    }

    /// Symbol if known and non-empty, otherwise the address.
    pub fn label(&self) -> &str {
        match self.symbol.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => &self.address,
        }
    }
}

/// The two assets composing a pool. A and B are fixed once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDescriptor {
    pub pool_id: String,
    pub asset_a: AssetDescriptor,
    pub asset_b: AssetDescriptor,
}

/// Reserve balances in base units. `base` belongs to asset A, `quote` to asset B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolReserves {
    pub base: u128,
    pub quote: u128,
}

impl PoolReserves {
    /// `(input_reserve, output_reserve)` aligned to the trade side.
    pub fn aligned(&self, side: Side) -> (u128, u128) {
        match side {
            Side::AtoB => (self.base, self.quote),
            Side::BtoA => (self.quote, self.base),
        }
    }
}

/// Raw venue-defined pool status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus(pub u64);

impl PoolStatus {
    /// Reported by venues that have no status flag (e.g. Uniswap V2 pairs).
    pub const ALWAYS_ACTIVE: PoolStatus = PoolStatus(1);
}

/// Which pool asset is being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Sell asset A, buy asset B.
    AtoB,
    /// Sell asset B, buy asset A.
    BtoA,
}

impl Side {
    pub fn reversed(self) -> Self {
        match self {
            Side::AtoB => Side::BtoA,
            Side::BtoA => Side::AtoB,
        }
    }
}

/// A trade to quote: input asset identifier and amount in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub input_asset: String,
    pub amount_in: u128,
}

impl TradeRequest {
    pub fn new(input_asset: impl Into<String>, amount_in: u128) -> Self {
        Self {
            input_asset: input_asset.into(),
            amount_in,
        }
    }
}

/// Quote computed fresh from the latest reserves. Amounts are base units of
/// the output asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub amount_out: u128,
    /// Settlement floor: `amount_out` reduced by the slippage tolerance.
    pub min_amount_out: u128,
    pub input_asset: AssetDescriptor,
    pub output_asset: AssetDescriptor,
}

/// Request shape for exposing the engine as a standalone service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub reserves: PoolReserves,
    pub side: Side,
    pub amount_in: u128,
    /// Tolerance fraction as a decimal string, e.g. `"0.01"`.
    pub slippage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub amount_out: u128,
    pub min_amount_out: u128,
}

/// Handle returned by the settlement layer for a submitted swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    pub id: String,
}

/// Network confirmation of a submitted swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub handle: TransactionHandle,
    /// Block / slot the transaction landed in, when the executor knows it.
    pub block: Option<u64>,
}

/// Completion signal of one arbitrage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Swap submitted and confirmed.
    Executed {
        quote: QuoteResult,
        confirmation: Confirmation,
    },
    /// Execution disabled; only the quote was computed.
    Quoted { quote: QuoteResult },
    /// The quote yields nothing, so no transaction was submitted.
    Skipped { quote: QuoteResult },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Executed { .. } | RunOutcome::Quoted { .. } => 0,
            RunOutcome::Skipped { .. } => 2,
        }
    }

    pub fn quote(&self) -> &QuoteResult {
        match self {
            RunOutcome::Executed { quote, .. }
            | RunOutcome::Quoted { quote }
            | RunOutcome::Skipped { quote } => quote,
        }
    }
}
