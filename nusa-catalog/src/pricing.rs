use serde::{Deserialize, Serialize};

use crate::capacity::PartySize;
use crate::product::ProductSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Child unit price as a percentage of the adult price, used when a
    /// product has no explicit child price.
    pub child_price_ratio_percent: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            child_price_ratio_percent: 80,
        }
    }
}

/// Party pricing. All amounts are in the currency's smallest unit.
#[derive(Debug, Clone, Default)]
pub struct PricingCalculator {
    config: PricingConfig,
}

impl PricingCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Explicit child price, or the configured share of the adult price
    /// rounded half-up to the smallest unit.
    pub fn child_unit_price(&self, adult_unit_price: i64, child_unit_price: Option<i64>) -> i64 {
        child_unit_price.unwrap_or_else(|| {
            let scaled = adult_unit_price
                .saturating_mul(i64::from(self.config.child_price_ratio_percent))
                .saturating_add(50);
            scaled / 100
        })
    }

    /// `adults * adult_price + children * child_price`.
    pub fn price(
        &self,
        adult_count: u32,
        child_count: u32,
        adult_unit_price: i64,
        child_unit_price: Option<i64>,
    ) -> i64 {
        let adults = i64::from(adult_count).saturating_mul(adult_unit_price);
        if child_count == 0 {
            return adults;
        }
        let child_unit = self.child_unit_price(adult_unit_price, child_unit_price);
        adults.saturating_add(i64::from(child_count).saturating_mul(child_unit))
    }

    pub fn quote(&self, party: PartySize, product: &ProductSnapshot) -> i64 {
        self.price(
            party.adults,
            party.children,
            product.unit_price_adult,
            product.unit_price_child,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_explicit_child_price() {
        let pricing = PricingCalculator::default();
        assert_eq!(pricing.price(2, 1, 1000, Some(800)), 2800);
    }

    #[test]
    fn test_child_price_unused_without_children() {
        let pricing = PricingCalculator::default();
        assert_eq!(pricing.price(3, 0, 500, None), 1500);
    }

    #[test]
    fn test_default_child_ratio() {
        let pricing = PricingCalculator::default();
        assert_eq!(pricing.child_unit_price(1000, None), 800);
        assert_eq!(pricing.price(1, 2, 1000, None), 2600);

        // 0.8 * 999 = 799.2, rounded to the smallest unit
        assert_eq!(pricing.child_unit_price(999, None), 799);
        // 0.8 * 1001 = 800.8
        assert_eq!(pricing.child_unit_price(1001, None), 801);
    }

    #[test]
    fn test_configured_ratio() {
        let pricing = PricingCalculator::new(PricingConfig { child_price_ratio_percent: 50 });
        assert_eq!(pricing.price(1, 1, 250_000, None), 375_000);
    }

    proptest! {
        #[test]
        fn prop_total_is_linear(
            adults in 0u32..50,
            children in 0u32..50,
            adult_price in 0i64..10_000_000,
            child_price in 0i64..10_000_000,
        ) {
            let pricing = PricingCalculator::default();
            let total = pricing.price(adults, children, adult_price, Some(child_price));
            prop_assert_eq!(total, i64::from(adults) * adult_price + i64::from(children) * child_price);
            prop_assert!(total >= 0);
        }
    }
}
