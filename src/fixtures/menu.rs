//! Menu Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    customizations::{Customization, CustomizationKind},
    fixtures::FixtureError,
    products::Category,
};

/// Wrapper for a menu in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Currency code for every price in the menu (e.g. "USD")
    pub currency: String,

    /// Map of category key -> category fixture
    #[serde(default)]
    pub categories: FxHashMap<String, CategoryFixture>,

    /// Map of customization key -> customization fixture
    #[serde(default)]
    pub customizations: FxHashMap<String, CustomizationFixture>,

    /// Map of product key -> menu item fixture
    pub menu: FxHashMap<String, MenuItemFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,

    /// Category description
    #[serde(default)]
    pub description: String,
}

impl From<CategoryFixture> for Category {
    fn from(fixture: CategoryFixture) -> Self {
        Category {
            name: fixture.name,
            description: fixture.description,
        }
    }
}

/// Customization Fixture
#[derive(Debug, Deserialize)]
pub struct CustomizationFixture {
    /// Customization name
    pub name: String,

    /// Price per unit (e.g. "1.25")
    pub price: String,

    /// Kind label (topping, side, ...)
    #[serde(default, rename = "type")]
    pub kind: CustomizationKind,
}

impl CustomizationFixture {
    /// Convert to a [`Customization`] with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed or the id is empty.
    pub fn try_into_customization(self, id: &str) -> Result<Customization, FixtureError> {
        let price = parse_amount(&self.price)?;

        Ok(Customization::new(id, self.name, price)?.with_kind(self.kind))
    }
}

/// Menu Item Fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Image URL
    #[serde(default)]
    pub image_url: String,

    /// Base price (e.g. "9.99")
    pub price: String,

    /// Rating out of 5
    #[serde(default)]
    pub rating: f32,

    /// Calories per unit
    #[serde(default)]
    pub calories: u32,

    /// Protein grams per unit
    #[serde(default)]
    pub protein: u32,

    /// Category key
    #[serde(default)]
    pub category: Option<String>,

    /// Customization keys offered with the item
    #[serde(default)]
    pub customizations: Vec<String>,
}

/// Parse a decimal amount string (e.g. "2.99").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal number.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

/// Parse a currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
