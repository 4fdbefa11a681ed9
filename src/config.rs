//! Configuration loader and application settings.

use crate::arbitrage::ArbitrageConfig;
use crate::dex::{FeeMode, FeeRate, Slippage};
use crate::errors::{AppError, Result};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// RPC endpoint for the EVM-compatible node.
    pub rpc_url: Url,
    /// Primary pool (pair address).
    pub pool_a: String,
    /// Optional second pool quoted for comparison.
    pub pool_b: Option<String>,
    /// Asset being sold.
    pub input_asset: String,
    /// Amount sold, base units.
    pub amount_in: u128,
    pub slippage: Slippage,
    /// Fee of the venue's deployed contract.
    pub fee: FeeRate,
    pub request_timeout: Duration,
    /// Run the (dry-run) execution path after quoting.
    pub execute: bool,
}

impl AppConfig {
    /// Load configuration from the process environment (`.env` is read by the caller).
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("Set {key} env var")))
        };

        let rpc_url = Url::parse(&required("RPC_URL")?)?;
        let pool_a = required("POOL_A")?;
        let pool_b = lookup("POOL_B").filter(|v| !v.trim().is_empty());
        let input_asset = required("INPUT_MINT")?;
        let amount_in = parse_var::<u128>("AMOUNT_IN", &required("AMOUNT_IN")?)?;

        let slippage = match lookup("SLIPPAGE") {
            Some(raw) => Slippage::from_str(&raw)?,
            None => Slippage::default(),
        };

        let fee_numerator = parse_opt(&lookup, "FEE_NUMERATOR", FeeRate::UNISWAP_V2.numerator)?;
        let fee_denominator =
            parse_opt(&lookup, "FEE_DENOMINATOR", FeeRate::UNISWAP_V2.denominator)?;
        let fee_mode = match lookup("FEE_MODE") {
            Some(raw) => raw.parse::<FeeMode>()?,
            None => FeeRate::UNISWAP_V2.mode,
        };
        let fee = FeeRate::new(fee_numerator, fee_denominator, fee_mode)?;

        let timeout_secs = parse_opt(&lookup, "REQUEST_TIMEOUT_SECS", 10u64)?;
        if timeout_secs == 0 {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be positive".into()));
        }

        let execute = lookup("EXECUTE").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Ok(Self {
            rpc_url,
            pool_a,
            pool_b,
            input_asset,
            amount_in,
            slippage,
            fee,
            request_timeout: Duration::from_secs(timeout_secs),
            execute,
        })
    }

    pub fn arbitrage_config(&self) -> ArbitrageConfig {
        ArbitrageConfig {
            slippage: self.slippage.clone(),
            request_timeout: self.request_timeout,
            execute: self.execute,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{key} has invalid value {raw:?}")))
}

fn parse_opt<L, T>(lookup: &L, key: &str, default: T) -> Result<T>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse_var(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QuoteError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("RPC_URL", "http://localhost:8545"),
        ("POOL_A", "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc"),
        ("INPUT_MINT", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        ("AMOUNT_IN", "1000000"),
    ];

    #[test]
    fn loads_with_defaults() {
        let cfg = AppConfig::from_lookup(env(&BASE)).unwrap();
        assert_eq!(cfg.amount_in, 1_000_000);
        assert_eq!(cfg.fee, FeeRate::UNISWAP_V2);
        assert_eq!(cfg.fee.mode, FeeMode::ScaledInput);
        assert_eq!(cfg.slippage, Slippage::default());
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(cfg.pool_b.is_none());
        assert!(!cfg.execute);
    }

    #[test]
    fn overrides_are_applied() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("POOL_B", "0x397FF1542f962076d0BFE58eA045FfA2d347ACa0"),
            ("SLIPPAGE", "0.005"),
            ("FEE_NUMERATOR", "25"),
            ("FEE_DENOMINATOR", "10000"),
            ("FEE_MODE", "truncated"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("EXECUTE", "1"),
        ]);
        let cfg = AppConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(cfg.fee, FeeRate::RAYDIUM_AMM_V4);
        assert_eq!(cfg.slippage, Slippage::from_bps(50).unwrap());
        assert!(cfg.pool_b.is_some());
        assert!(cfg.execute);
        assert_eq!(cfg.arbitrage_config().request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_required_var() {
        let err = AppConfig::from_lookup(env(&BASE[..3])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("AMOUNT_IN")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SLIPPAGE", "1.2"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Quote(QuoteError::InvalidSlippage(_)))
        ));

        let mut pairs = BASE.to_vec();
        pairs.push(("SLIPPAGE", "0.5e-20000000"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Quote(QuoteError::InvalidSlippage(_)))
        ));

        let mut pairs = BASE.to_vec();
        pairs.push(("FEE_MODE", "ceil"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Quote(QuoteError::InvalidFeeMode(_)))
        ));

        let mut pairs = BASE.to_vec();
        pairs.push(("FEE_NUMERATOR", "1000"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(AppError::Quote(QuoteError::InvalidFeeRate { .. }))
        ));

        let mut pairs = BASE.to_vec();
        pairs[3] = ("AMOUNT_IN", "-5");
        assert!(matches!(AppConfig::from_lookup(env(&pairs)), Err(AppError::Config(_))));

        let mut pairs = BASE.to_vec();
        pairs[0] = ("RPC_URL", "not a url");
        assert!(matches!(AppConfig::from_lookup(env(&pairs)), Err(AppError::UrlParse(_))));
    }
}
