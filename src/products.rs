//! Products

use rust_decimal::Decimal;
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::customizations::CustomizationSet;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Menu category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name
    pub name: String,

    /// Category description
    pub description: String,
}

/// A read-only catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id, stable for the product's lifetime in the catalog
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Base unit price, before customizations
    pub price: Decimal,

    /// Image reference
    pub image_ref: String,

    /// Category id, if any
    pub category: Option<String>,

    /// Rating out of 5
    pub rating: f32,

    /// Calories per unit
    pub calories: u32,

    /// Protein grams per unit
    pub protein: u32,

    /// Ids of the customizations offered with this product
    pub customizations: SmallVec<[String; 8]>,
}

impl Product {
    /// Builds the candidate passed into the cart when this product is added
    /// with the given customizations.
    pub fn candidate(&self, customizations: CustomizationSet) -> LineCandidate {
        LineCandidate::new(&self.id, &self.name, self.price, &self.image_ref)
            .with_customizations(customizations)
    }

    /// Whether the customization is offered with this product.
    pub fn offers(&self, customization_id: &str) -> bool {
        self.customizations.iter().any(|id| id == customization_id)
    }
}

/// A product plus its chosen customizations, as supplied to [`crate::cart::Cart::add_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineCandidate {
    /// Product id
    pub product_id: String,

    /// Display name snapshot
    pub name: String,

    /// Unit price snapshot
    pub unit_price: Decimal,

    /// Image reference snapshot
    pub image_ref: String,

    /// Chosen customizations; `None` means no customizations
    pub customizations: Option<CustomizationSet>,
}

impl LineCandidate {
    /// Creates a candidate without customizations.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
            customizations: None,
        }
    }

    /// Attaches customizations to the candidate.
    #[must_use]
    pub fn with_customizations(mut self, customizations: impl Into<CustomizationSet>) -> Self {
        self.customizations = Some(customizations.into());
        self
    }
}
