//! Cart lines

use std::fmt;

use rust_decimal::Decimal;

use crate::customizations::CustomizationSet;

/// One distinct product + customization-set entry in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product_id: String,
    name: String,
    unit_price: Decimal,
    image_ref: String,
    customizations: CustomizationSet,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(
        product_id: String,
        name: String,
        unit_price: Decimal,
        image_ref: String,
        customizations: CustomizationSet,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            name,
            unit_price,
            image_ref,
            customizations,
            quantity,
        }
    }

    /// Whether this line has the given identity.
    pub fn matches(&self, product_id: &str, customizations: &CustomizationSet) -> bool {
        self.product_id == product_id && &self.customizations == customizations
    }

    /// Product id
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Name captured when the line was created
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the line was created, excluding customizations
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Image reference captured when the line was created
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// The line's customizations
    pub fn customizations(&self) -> &CustomizationSet {
        &self.customizations
    }

    /// Quantity, always at least one while the line is in a cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Sum of customization prices for one unit.
    pub fn customizations_price(&self) -> Decimal {
        self.customizations.total_price()
    }

    /// Price of one unit including its customizations.
    pub fn unit_total(&self) -> Decimal {
        self.unit_price.saturating_add(self.customizations_price())
    }

    /// `quantity × unit_total`.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_total())
    }

    /// Customization units on this line (`quantity × count`).
    pub fn customization_units(&self) -> u64 {
        let count = u64::try_from(self.customizations.len()).unwrap_or(u64::MAX);

        u64::from(self.quantity).saturating_mul(count)
    }

    /// Stable display key for the line.
    pub fn key(&self) -> LineKey<'_> {
        LineKey { line: self }
    }

    pub(crate) fn add(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Takes one unit off. Returns `false` once nothing is left and the line must go.
    pub(crate) fn take_one(&mut self) -> bool {
        self.quantity = self.quantity.saturating_sub(1);
        self.quantity > 0
    }
}

/// Display key of a line: the product id followed by its customization ids,
/// or `no-custom` when there are none.
#[derive(Debug, Clone, Copy)]
pub struct LineKey<'a> {
    line: &'a CartLine,
}

impl fmt::Display for LineKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line.product_id)?;

        if self.line.customizations.is_empty() {
            return f.write_str("-no-custom");
        }

        for id in self.line.customizations.ids() {
            write!(f, "-{id}")?;
        }

        Ok(())
    }
}
