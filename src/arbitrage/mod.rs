pub mod arbitrager;
pub mod evaluator;
pub mod types;

pub use arbitrager::Arbitrager;
pub use evaluator::compare_quotes;
pub use types::{ArbitrageConfig, QuoteComparison, VenueQuote};
