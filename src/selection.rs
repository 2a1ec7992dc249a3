//! Customization selection
//!
//! State behind a product detail view: the customizations the shopper has toggled on and the
//! quantity to add.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    cart::Cart,
    customizations::{Customization, CustomizationSet},
    products::Product,
};

/// Customizations and quantity chosen for a product before it goes into the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    selected: SmallVec<[Customization; 4]>,
    quantity: NonZeroU32,
}

impl Selection {
    /// An empty selection with a quantity of one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: SmallVec::new(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// Select the customization, or deselect it if one with the same id is already selected.
    pub fn toggle(&mut self, customization: Customization) {
        if let Some(pos) = self
            .selected
            .iter()
            .position(|entry| entry.id() == customization.id())
        {
            self.selected.remove(pos);
        } else {
            self.selected.push(customization);
        }
    }

    /// Whether a customization with the given id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|entry| entry.id() == id)
    }

    /// Selected customizations, in the order they were selected.
    pub fn customizations(&self) -> &[Customization] {
        &self.selected
    }

    /// Quantity to add.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Set the quantity; anything below one becomes one.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN);
    }

    /// Add one to the quantity.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Take one off the quantity, never going below one.
    pub fn decrement(&mut self) {
        self.set_quantity(self.quantity.get().saturating_sub(1));
    }

    /// Price of one unit of the product with the selected customizations.
    pub fn unit_total(&self, product: &Product) -> Decimal {
        self.selected
            .iter()
            .fold(product.price, |acc, entry| acc.saturating_add(entry.price()))
    }

    /// Price of the whole selection (`unit_total × quantity`).
    pub fn total(&self, product: &Product) -> Decimal {
        self.unit_total(product)
            .saturating_mul(Decimal::from(self.quantity.get()))
    }

    /// Add the selection to the cart.
    ///
    /// The selection is taken as is; callers toggle only customizations the product offers, e.g.
    /// from [`crate::fixtures::Fixture::customizations_for`].
    pub fn add_to_cart(&self, product: &Product, cart: &mut Cart) {
        let customizations: CustomizationSet = self.selected.iter().cloned().collect();

        cart.add_item_quantity(product.candidate(customizations), self.quantity.get());
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
