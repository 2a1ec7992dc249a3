//! Fixtures
//!
//! YAML fixture sets for the menu catalog, pricing policies and cart session scripts.
//! Files live under a base path as `menus/<name>.yml`, `policies/<name>.yml` and
//! `sessions/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    customizations::{Customization, CustomizationError, CustomizationKind},
    fixtures::{menu::MenuFixture, policy::PolicyFixture},
    pricing::PricingPolicy,
    products::{Category, Product, ProductKey},
    session::{Session, SessionFixture},
};

pub mod menu;
pub mod policy;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between menus
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Invalid customization data
    #[error(transparent)]
    Customization(#[from] CustomizationError),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customization not found
    #[error("Customization not found: {0}")]
    CustomizationNotFound(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Customization exists in the menu but is not offered with the product
    #[error("Customization {customization} is not offered with {product}")]
    CustomizationNotOffered {
        /// Product key
        product: String,

        /// Customization key
        customization: String,
    },

    /// No menu loaded yet
    #[error("No menu loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// `SlotMap` to store the products with generated keys
    product_meta: SlotMap<ProductKey, Product>,

    /// String key -> `SlotMap` key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,

    /// Customizations by key
    customizations: FxHashMap<String, Customization>,

    /// Categories by key
    categories: FxHashMap<String, Category>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            product_meta: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            customizations: FxHashMap::default(),
            categories: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a menu (categories, customizations and products) from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price or currency is invalid,
    /// or if an item references a category or customization that neither this menu nor an earlier
    /// one defines. On error the fixture is left as it was.
    pub fn load_menu(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("menus").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: MenuFixture = serde_norway::from_str(&contents)?;

        let currency = menu::parse_currency(&fixture.currency)?;

        if let Some(existing_currency) = self.currency
            && existing_currency != currency
        {
            return Err(FixtureError::CurrencyMismatch(
                existing_currency.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        // Nothing is committed to `self` until the whole menu validates.
        let categories: FxHashMap<String, Category> = fixture
            .categories
            .into_iter()
            .map(|(key, category)| (key, category.into()))
            .collect();

        let customizations = fixture
            .customizations
            .into_iter()
            .map(|(key, customization_fixture)| {
                let customization = customization_fixture.try_into_customization(&key)?;

                Ok((key, customization))
            })
            .collect::<Result<FxHashMap<String, Customization>, FixtureError>>()?;

        let products = fixture
            .menu
            .into_iter()
            .map(|(key, item)| {
                if let Some(category) = &item.category
                    && !categories.contains_key(category)
                    && !self.categories.contains_key(category)
                {
                    return Err(FixtureError::CategoryNotFound(category.clone()));
                }

                if let Some(missing) = item.customizations.iter().find(|id| {
                    !customizations.contains_key(id.as_str())
                        && !self.customizations.contains_key(id.as_str())
                }) {
                    return Err(FixtureError::CustomizationNotFound(missing.clone()));
                }

                Ok(Product {
                    id: key,
                    name: item.name,
                    description: item.description,
                    price: menu::parse_amount(&item.price)?,
                    image_ref: item.image_url,
                    category: item.category,
                    rating: item.rating,
                    calories: item.calories,
                    protein: item.protein,
                    customizations: item.customizations.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<Product>, FixtureError>>()?;

        self.currency = Some(currency);
        self.categories.extend(categories);
        self.customizations.extend(customizations);

        for product in products {
            if let Some(existing) = self.product_keys.get(&product.id).copied() {
                if let Some(slot) = self.product_meta.get_mut(existing) {
                    *slot = product;
                }
            } else {
                let key = product.id.clone();
                let product_key = self.product_meta.insert(product);

                self.product_keys.insert(key, product_key);
            }
        }

        info!(
            menu = name,
            products = self.product_keys.len(),
            customizations = self.customizations.len(),
            "loaded menu fixture"
        );

        Ok(self)
    }

    /// Load a pricing policy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value is invalid.
    pub fn load_policy(&self, name: &str) -> Result<PricingPolicy, FixtureError> {
        let file_path = self.base_path.join("policies").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PolicyFixture = serde_norway::from_str(&contents)?;

        let policy = PricingPolicy::try_from(fixture)?;

        info!(policy = name, "loaded pricing policy fixture");

        Ok(policy)
    }

    /// Load a cart session script from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_session(&self, name: &str) -> Result<Session, FixtureError> {
        let file_path = self.base_path.join("sessions").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: SessionFixture = serde_norway::from_str(&contents)?;

        info!(
            session = name,
            commands = fixture.commands.len(),
            "loaded session fixture"
        );

        Ok(Session::from(fixture))
    }

    /// Load a menu fixture set by name
    ///
    /// # Errors
    ///
    /// Returns an error if the menu cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_menu(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        let product_key = self.product_key(key)?;

        self.product_meta
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a customization by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the customization is not found.
    pub fn customization(&self, key: &str) -> Result<&Customization, FixtureError> {
        self.customizations
            .get(key)
            .ok_or_else(|| FixtureError::CustomizationNotFound(key.to_string()))
    }

    /// Get a category by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found.
    pub fn category(&self, key: &str) -> Result<&Category, FixtureError> {
        self.categories
            .get(key)
            .ok_or_else(|| FixtureError::CategoryNotFound(key.to_string()))
    }

    /// Customizations offered with a product, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product or one of its customizations is not found.
    pub fn customizations_for(
        &self,
        product: &str,
    ) -> Result<SmallVec<[&Customization; 8]>, FixtureError> {
        let mut offered = self
            .product(product)?
            .customizations
            .iter()
            .map(|id| self.customization(id))
            .collect::<Result<SmallVec<[&Customization; 8]>, _>>()?;

        offered.sort_by(|left, right| left.id().cmp(right.id()));

        Ok(offered)
    }

    /// Customizations of one kind offered with a product (e.g. its toppings), ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product or one of its customizations is not found.
    pub fn customizations_of_kind(
        &self,
        product: &str,
        kind: &CustomizationKind,
    ) -> Result<SmallVec<[&Customization; 8]>, FixtureError> {
        let mut offered = self.customizations_for(product)?;

        offered.retain(|customization| customization.kind() == kind);

        Ok(offered)
    }

    /// All products, ordered by id
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.product_meta.values().collect();

        products.sort_by(|left, right| left.id.cmp(&right.id));

        products
    }

    /// Browse the menu, ordered by id
    ///
    /// `category` matches the product's category id exactly. `query` matches product names
    /// case-insensitively anywhere in the name. A `None` (or blank query) filter matches everything.
    pub fn menu(&self, category: Option<&str>, query: Option<&str>) -> Vec<&Product> {
        let query = query
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);

        let mut products: Vec<&Product> = self
            .product_meta
            .values()
            .filter(|product| {
                category.is_none_or(|category| product.category.as_deref() == Some(category))
            })
            .filter(|product| {
                query
                    .as_deref()
                    .is_none_or(|query| product.name.to_lowercase().contains(query))
            })
            .collect();

        products.sort_by(|left, right| left.id.cmp(&right.id));

        products
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Create an empty cart in the menu currency
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn cart(&self, policy: PricingPolicy) -> Result<Cart, FixtureError> {
        Ok(Cart::with_policy(self.currency()?, policy))
    }

}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
