use crate::models::{PoolDescriptor, PoolReserves, PoolStatus, Side};

/// Immutable point-in-time snapshot of a pool used for one quote: the static
/// descriptor combined with freshly fetched reserves and status.
///
/// On-chain state may move between fetch and execution; the quote's
/// `min_amount_out` is what protects the settlement, not this snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectivePoolState {
    pub descriptor: PoolDescriptor,
    pub reserves: PoolReserves,
    pub status: PoolStatus,
}

impl EffectivePoolState {
    pub fn new(descriptor: PoolDescriptor, reserves: PoolReserves, status: PoolStatus) -> Self {
        Self {
            descriptor,
            reserves,
            status,
        }
    }

    /// `(input_reserve, output_reserve)` aligned to the trade side.
    pub fn reserves_for(&self, side: Side) -> (u128, u128) {
        self.reserves.aligned(side)
    }

    /// Copy of this snapshot with newer reserves and status; the descriptor is kept.
    pub fn with_fresh(&self, reserves: PoolReserves, status: PoolStatus) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            reserves,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetDescriptor;

    fn state() -> EffectivePoolState {
        EffectivePoolState::new(
            PoolDescriptor {
                pool_id: "pool".into(),
                asset_a: AssetDescriptor::new("sol", 9, Some("SOL")),
                asset_b: AssetDescriptor::new("usdc", 6, Some("USDC")),
            },
            PoolReserves {
                base: 10,
                quote: 20,
            },
            PoolStatus(6),
        )
    }

    #[test]
    fn reserves_follow_side() {
        let s = state();
        assert_eq!(s.reserves_for(Side::AtoB), (10, 20));
        assert_eq!(s.reserves_for(Side::BtoA), (20, 10));
    }

    #[test]
    fn with_fresh_keeps_descriptor() {
        let s = state();
        let fresh = s.with_fresh(PoolReserves { base: 1, quote: 2 }, PoolStatus(2));
        assert_eq!(fresh.descriptor, s.descriptor);
        assert_eq!(fresh.reserves, PoolReserves { base: 1, quote: 2 });
        assert_eq!(fresh.status, PoolStatus(2));
    }
}
