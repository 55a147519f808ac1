//! Derived cart totals.
//!
//! Pure functions of a snapshot. Nothing here is cached: each query sums the
//! items it is given, so every figure shown on a page agrees with the others
//! as long as they come from the same snapshot.

use rust_decimal::Decimal;

use super::item::CartItem;

/// Shipping fee rule.
///
/// An empty cart ships for free. Otherwise a flat fee applies while the
/// subtotal is below `free_threshold`; at or above it shipping is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Fee charged below the threshold.
    pub flat_fee: Decimal,
    /// Subtotal from which shipping is free.
    pub free_threshold: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_fee: Decimal::from(20),
            free_threshold: Decimal::from(200),
        }
    }
}

impl ShippingPolicy {
    /// Fee for a cart with `item_count` entries worth `subtotal`.
    #[must_use]
    pub fn fee(&self, subtotal: Decimal, item_count: usize) -> Decimal {
        if item_count == 0 || subtotal >= self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Sum of the unit prices, unrounded.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.product.price).sum()
}

/// Shipping fee under `policy`.
#[must_use]
pub fn shipping_fee(items: &[CartItem], policy: &ShippingPolicy) -> Decimal {
    policy.fee(subtotal(items), items.len())
}

/// Subtotal plus shipping.
#[must_use]
pub fn grand_total(items: &[CartItem], policy: &ShippingPolicy) -> Decimal {
    subtotal(items) + shipping_fee(items, policy)
}

/// Subtotal, shipping and grand total of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl DerivedTotals {
    /// Compute all three figures from the same items.
    #[must_use]
    pub fn compute(items: &[CartItem], policy: &ShippingPolicy) -> Self {
        let subtotal = subtotal(items);
        let shipping = policy.fee(subtotal, items.len());
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}
