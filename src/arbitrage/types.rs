use crate::dex::Slippage;
use crate::models::QuoteResult;
use std::time::Duration;

/// Settings for one arbitrage run.
#[derive(Debug, Clone)]
pub struct ArbitrageConfig {
    pub slippage: Slippage,
    /// Deadline applied to every fetch, submit and confirm call.
    pub request_timeout: Duration,
    /// When false the run stops after quoting.
    pub execute: bool,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            slippage: Slippage::default(),
            request_timeout: Duration::from_secs(10),
            execute: false,
        }
    }
}

/// Quote of one venue for the shared request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueQuote {
    pub venue: String,
    pub pool_id: String,
    pub quote: QuoteResult,
}

/// Quotes of every venue for the same request, best `amount_out` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteComparison {
    pub ranked: Vec<VenueQuote>,
}

impl QuoteComparison {
    pub fn best(&self) -> Option<&VenueQuote> {
        self.ranked.first()
    }

    pub fn worst(&self) -> Option<&VenueQuote> {
        self.ranked.last()
    }

    /// Output difference between best and worst venue, base units. Reporting only.
    pub fn spread(&self) -> u128 {
        match (self.best(), self.worst()) {
            (Some(b), Some(w)) => b.quote.amount_out - w.quote.amount_out,
            _ => 0,
        }
    }
}
