use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Local validation failures raised by the quote engine.
///
/// None of these are fatal: the caller rejects the trade request and
/// nothing is submitted on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Input asset {asset} does not match pool ({asset_a} / {asset_b})")]
    InvalidInputAsset {
        asset: String,
        asset_a: String,
        asset_b: String,
    },

    #[error("Pool is not active (status {0})")]
    PoolInactive(u64),

    #[error("Slippage tolerance must be within [0, 1], got {0}")]
    InvalidSlippage(String),

    #[error("Invalid fee rate {numerator}/{denominator}")]
    InvalidFeeRate { numerator: u64, denominator: u64 },

    #[error("Unknown fee mode {0:?}, expected \"truncated\" or \"scaled\"")]
    InvalidFeeMode(String),

    #[error("Division by zero: input reserve and input amount after fee are both zero")]
    DivisionByZero,

    #[error("Degenerate reserves: input {input_reserve}, output {output_reserve}")]
    DegenerateReserves {
        input_reserve: u128,
        output_reserve: u128,
    },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Pool not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {secs}s waiting for {operation}")]
    Timeout { operation: String, secs: u64 },

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Transaction construction error: {0}")]
    Construction(String),

    #[error("Venue {0} has no quoting implementation")]
    VenueUnimplemented(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl AppError {
    /// Whether the failure came from an external collaborator rather than
    /// local validation.
    pub fn is_collaborator_error(&self) -> bool {
        !matches!(
            self,
            AppError::Quote(_) | AppError::Config(_) | AppError::VenueUnimplemented(_)
        )
    }
}
