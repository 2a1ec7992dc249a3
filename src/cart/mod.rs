//! Cart
//!
//! The cart owns an ordered list of [`CartLine`]s. Lines are identified by their product id and
//! customization set; adding a line that already exists bumps its quantity instead of creating a
//! duplicate. Mutations that reference a line which is not in the cart are silent no-ops.

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use tracing::debug;

use crate::{
    customizations::CustomizationSet,
    pricing::{PricingInfo, PricingPolicy},
    products::LineCandidate,
};

pub mod line;

pub use line::{CartLine, LineKey};

/// Shopping cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartLine>,
    policy: PricingPolicy,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart with the default pricing policy.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_policy(currency, PricingPolicy::default())
    }

    /// Create an empty cart with the given pricing policy.
    #[must_use]
    pub fn with_policy(currency: &'static Currency, policy: PricingPolicy) -> Self {
        Cart {
            items: Vec::new(),
            policy,
            currency,
        }
    }

    /// Add one unit of the candidate.
    ///
    /// If a line with the same product and customizations exists its quantity goes up by one and
    /// its name, price and image are left as first added. Otherwise a new line is appended.
    pub fn add_item(&mut self, candidate: LineCandidate) {
        self.add_item_quantity(candidate, 1);
    }

    /// Add `quantity` units of the candidate, as if [`Cart::add_item`] was called that many times.
    pub fn add_item_quantity(&mut self, candidate: LineCandidate, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let LineCandidate {
            product_id,
            name,
            unit_price,
            image_ref,
            customizations,
        } = candidate;

        let customizations = customizations.unwrap_or_default();

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&product_id, &customizations))
        {
            line.add(quantity);

            debug!(
                line = %line.key(),
                quantity = line.quantity(),
                "increased existing cart line"
            );

            return;
        }

        let line = CartLine::new(
            product_id,
            name,
            unit_price,
            image_ref,
            customizations,
            quantity,
        );

        debug!(line = %line.key(), quantity, "added cart line");

        self.items.push(line);
    }

    /// Remove the matching line entirely.
    pub fn remove_item(&mut self, product_id: &str, customizations: &CustomizationSet) {
        let Some(index) = self.position(product_id, customizations) else {
            return;
        };

        let line = self.items.remove(index);

        debug!(line = %line.key(), "removed cart line");
    }

    /// Add one unit to the matching line.
    pub fn increase_qty(&mut self, product_id: &str, customizations: &CustomizationSet) {
        let Some(line) = self.line_mut(product_id, customizations) else {
            return;
        };

        line.add(1);

        debug!(line = %line.key(), quantity = line.quantity(), "increased cart line");
    }

    /// Take one unit off the matching line, removing the line when none are left.
    pub fn decrease_qty(&mut self, product_id: &str, customizations: &CustomizationSet) {
        let Some(index) = self.position(product_id, customizations) else {
            return;
        };

        let Some(line) = self.items.get_mut(index) else {
            return;
        };

        if line.take_one() {
            debug!(line = %line.key(), quantity = line.quantity(), "decreased cart line");
        } else {
            let line = self.items.remove(index);

            debug!(line = %line.key(), "removed cart line at zero quantity");
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        debug!(lines = self.items.len(), "cleared cart");

        self.items.clear();
    }

    /// Total number of units across all lines.
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(u64::from(line.quantity())))
    }

    /// Subtotal: sum of `quantity × (unit price + customization prices)` over all lines.
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// Customization units: sum of `quantity × customization count` over all lines.
    pub fn total_customizations(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.customization_units()))
    }

    /// Whether the customization discount applies.
    pub fn has_customization_discount(&self) -> bool {
        self.policy.discount_applies(self.total_customizations())
    }

    /// Subtotal after the customization discount, if any.
    pub fn final_price(&self) -> Decimal {
        self.pricing_info().final_price
    }

    /// Whether shipping is free. Compared against the subtotal, not the discounted price.
    pub fn is_free_shipping(&self) -> bool {
        self.policy.ships_free(self.total_price())
    }

    /// Snapshot of every derived pricing figure.
    pub fn pricing_info(&self) -> PricingInfo {
        PricingInfo::derive(
            &self.policy,
            self.total_price(),
            self.total_customizations(),
        )
    }

    /// Get the line with the given identity.
    pub fn line(&self, product_id: &str, customizations: &CustomizationSet) -> Option<&CartLine> {
        self.items
            .iter()
            .find(|line| line.matches(product_id, customizations))
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.items.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the pricing policy.
    #[must_use]
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Get the display currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product_id: &str, customizations: &CustomizationSet) -> Option<usize> {
        self.items
            .iter()
            .position(|line| line.matches(product_id, customizations))
    }

    fn line_mut(
        &mut self,
        product_id: &str,
        customizations: &CustomizationSet,
    ) -> Option<&mut CartLine> {
        self.items
            .iter_mut()
            .find(|line| line.matches(product_id, customizations))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(iso::USD)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::customizations::{Customization, CustomizationError};

    use super::*;

    fn custom(id: &str, price: i64) -> Result<Customization, CustomizationError> {
        Customization::new(id, id, Decimal::new(price, 0))
    }

    fn fries() -> LineCandidate {
        LineCandidate::new("fries", "Fries", Decimal::new(3, 0), "fries.png")
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(GBP);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), GBP);
        assert_eq!(cart.policy(), &PricingPolicy::default());
    }

    #[test]
    fn add_item_normalises_missing_customizations() {
        let mut cart = Cart::default();

        cart.add_item(fries());
        cart.add_item(fries().with_customizations(CustomizationSet::empty()));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn first_snapshot_wins_on_merge() {
        let mut cart = Cart::default();

        cart.add_item(fries());
        cart.add_item(LineCandidate::new("fries", "Large Fries", Decimal::new(5, 0), "other.png"));

        let line = cart.line("fries", &CustomizationSet::empty());

        assert_eq!(line.map(CartLine::name), Some("Fries"));
        assert_eq!(line.map(CartLine::unit_price), Some(Decimal::new(3, 0)));
        assert_eq!(line.map(CartLine::image_ref), Some("fries.png"));
        assert_eq!(line.map(CartLine::quantity), Some(2));
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(fries());
        cart.add_item(
            LineCandidate::new("burger", "Burger", Decimal::TEN, "")
                .with_customizations([custom("cheese", 1)?]),
        );
        cart.add_item(fries());

        let keys: Vec<String> = cart.iter().map(|line| line.key().to_string()).collect();

        assert_eq!(keys, vec!["fries-no-custom", "burger-cheese"]);

        Ok(())
    }

    #[test]
    fn add_item_quantity_adds_units() {
        let mut cart = Cart::default();

        cart.add_item_quantity(fries(), 3);
        cart.add_item_quantity(fries(), 2);
        cart.add_item_quantity(fries(), 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn add_item_quantity_zero_creates_no_line() {
        let mut cart = Cart::default();

        cart.add_item_quantity(fries(), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn increase_and_decrease_adjust_quantity() {
        let mut cart = Cart::default();
        let none = CustomizationSet::empty();

        cart.add_item(fries());
        cart.increase_qty("fries", &none);
        cart.increase_qty("fries", &none);
        cart.decrease_qty("fries", &none);

        assert_eq!(cart.line("fries", &none).map(CartLine::quantity), Some(2));
    }

    #[test]
    fn remove_item_only_removes_matching_customizations() -> TestResult {
        let mut cart = Cart::default();
        let cheese = CustomizationSet::new([custom("cheese", 1)?]);

        cart.add_item(fries());
        cart.add_item(fries().with_customizations(cheese.clone()));
        cart.remove_item("fries", &cheese);

        assert_eq!(cart.len(), 1);
        assert!(cart.line("fries", &CustomizationSet::empty()).is_some());
        assert!(cart.line("fries", &cheese).is_none());

        Ok(())
    }

    #[test]
    fn clear_cart_empties_items() {
        let mut cart = Cart::default();

        cart.add_item(fries());
        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn pricing_info_uses_policy_shipping_fee() {
        let policy = PricingPolicy {
            shipping_fee: Decimal::new(50, 0),
            ..PricingPolicy::default()
        };
        let mut cart = Cart::with_policy(GBP, policy);

        cart.add_item(fries());

        let info = cart.pricing_info();

        assert_eq!(info.subtotal, Decimal::new(3, 0));
        assert_eq!(info.shipping_cost, Decimal::new(50, 0));
        assert_eq!(info.grand_total(), Decimal::new(53, 0));
    }

    #[test]
    fn final_price_matches_pricing_info() -> TestResult {
        let mut cart = Cart::default();
        let sides = [custom("a", 1)?, custom("b", 1)?, custom("c", 1)?];

        cart.add_item_quantity(fries().with_customizations(sides), 2);

        assert_eq!(cart.total_customizations(), 6);
        assert!(cart.has_customization_discount());
        assert_eq!(cart.final_price(), cart.pricing_info().final_price);
        assert_eq!(cart.final_price(), cart.total_price() * Decimal::new(95, 2));

        Ok(())
    }
}
