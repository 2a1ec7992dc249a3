//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

/// Thresholds and amounts used to derive cart totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// The customization discount applies when the cart holds strictly more
    /// customization units than this.
    pub discount_threshold: u64,

    /// Fraction taken off the subtotal when the discount applies.
    pub discount_rate: Percentage,

    /// Shipping is free when the subtotal is strictly above this amount.
    pub free_shipping_threshold: Decimal,

    /// Flat fee charged when shipping is not free.
    pub shipping_fee: Decimal,
}

impl PricingPolicy {
    /// Whether the customization discount applies to the given number of customization units.
    pub fn discount_applies(&self, total_customizations: u64) -> bool {
        total_customizations > self.discount_threshold
    }

    /// The discount rate as a plain fraction (e.g. `0.05`).
    pub fn discount_fraction(&self) -> Decimal {
        // `Percentage` only exposes its value through multiplication.
        self.discount_rate * Decimal::ONE
    }

    /// The discount amount on a subtotal, ignoring eligibility.
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        subtotal.saturating_mul(self.discount_fraction())
    }

    /// Whether a subtotal ships for free.
    pub fn ships_free(&self, subtotal: Decimal) -> bool {
        subtotal > self.free_shipping_threshold
    }

    /// Shipping cost for a subtotal.
    pub fn shipping_cost(&self, subtotal: Decimal) -> Decimal {
        if self.ships_free(subtotal) {
            Decimal::ZERO
        } else {
            self.shipping_fee
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            discount_threshold: 5,
            discount_rate: Percentage::from(Decimal::new(5, 2)),
            free_shipping_threshold: Decimal::new(200, 0),
            shipping_fee: Decimal::new(10, 0),
        }
    }
}

/// Snapshot of every derived pricing figure for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInfo {
    /// Sum of all line totals before discount
    pub subtotal: Decimal,

    /// Customization discount, zero when not eligible
    pub discount: Decimal,

    /// Subtotal after the discount
    pub final_price: Decimal,

    /// Whether shipping is free
    pub free_shipping: bool,

    /// Whether the customization discount applies
    pub has_discount: bool,

    /// Customization units across all lines
    pub total_customizations: u64,

    /// Shipping cost, zero when shipping is free
    pub shipping_cost: Decimal,
}

impl PricingInfo {
    /// Derives the pricing snapshot for a subtotal and customization count.
    pub fn derive(policy: &PricingPolicy, subtotal: Decimal, total_customizations: u64) -> Self {
        let has_discount = policy.discount_applies(total_customizations);

        let discount = if has_discount {
            policy.discount_on(subtotal)
        } else {
            Decimal::ZERO
        };

        Self {
            subtotal,
            discount,
            final_price: subtotal.saturating_sub(discount),
            free_shipping: policy.ships_free(subtotal),
            has_discount,
            total_customizations,
            shipping_cost: policy.shipping_cost(subtotal),
        }
    }

    /// Amount due: final price plus shipping.
    pub fn grand_total(&self) -> Decimal {
        self.final_price.saturating_add(self.shipping_cost)
    }
}
