//! Customizations
//!
//! Add-ons (toppings, sides, sizes, ...) that can be attached to a product at a per-unit price.

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Errors raised when constructing a customization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomizationError {
    /// The customization id was empty or whitespace.
    #[error("customization id must not be empty (name: {0:?})")]
    EmptyId(String),
}

/// The kind of a customization, as labelled by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum CustomizationKind {
    /// A topping, e.g. extra cheese.
    Topping,

    /// A side, e.g. fries.
    Side,

    /// A size upgrade.
    Size,

    /// A crust choice.
    Crust,

    /// No kind was given.
    #[default]
    Unspecified,

    /// Any other catalog label.
    Other(String),
}

impl From<&str> for CustomizationKind {
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "topping" | "toppings" => Self::Topping,
            "side" | "sides" => Self::Side,
            "size" => Self::Size,
            "crust" => Self::Crust,
            "" => Self::Unspecified,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CustomizationKind {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl fmt::Display for CustomizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topping => f.write_str("topping"),
            Self::Side => f.write_str("side"),
            Self::Size => f.write_str("size"),
            Self::Crust => f.write_str("crust"),
            Self::Unspecified => f.write_str("customization"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// A single customization. Identity is its `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customization {
    id: String,
    name: String,
    price: Decimal,
    kind: CustomizationKind,
}

impl Customization {
    /// Creates a new customization with an unspecified kind.
    ///
    /// The price is not validated; negative prices flow through totals unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::EmptyId`] if `id` is empty or whitespace.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, CustomizationError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(CustomizationError::EmptyId(name));
        }

        Ok(Self {
            id,
            name,
            price,
            kind: CustomizationKind::Unspecified,
        })
    }

    /// Sets the kind of the customization.
    #[must_use]
    pub fn with_kind(mut self, kind: CustomizationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the customization id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the per-unit price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the kind.
    pub fn kind(&self) -> &CustomizationKind {
        &self.kind
    }
}

/// The customizations chosen for one cart line.
///
/// Entries are kept ordered by id. When two entries share an id, the first one supplied wins.
/// Two sets are equal when they hold the same ids; names, kinds and prices are ignored.
#[derive(Debug, Clone, Default)]
pub struct CustomizationSet {
    entries: SmallVec<[Customization; 4]>,
}

impl CustomizationSet {
    /// Creates a new set from the given customizations.
    pub fn new(customizations: impl IntoIterator<Item = Customization>) -> Self {
        let mut entries: SmallVec<[Customization; 4]> = customizations.into_iter().collect();
        let supplied = entries.len();

        // Stable sort keeps the first-seen entry ahead of later duplicates.
        entries.sort_by(|left, right| left.id.cmp(&right.id));
        entries.dedup_by(|later, earlier| later.id == earlier.id);

        if entries.len() < supplied {
            debug!(
                dropped = supplied - entries.len(),
                "dropped customizations with duplicate ids"
            );
        }

        Self { entries }
    }

    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of distinct customizations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no customizations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the customizations, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Customization> {
        self.entries.iter()
    }

    /// Iterate over the ids, in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Customization::id)
    }

    /// Sum of the customization prices for a single unit.
    pub fn total_price(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, entry| acc.saturating_add(entry.price))
    }
}

impl PartialEq for CustomizationSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.ids().eq(other.ids())
    }
}

impl Eq for CustomizationSet {}

impl FromIterator<Customization> for CustomizationSet {
    fn from_iter<I: IntoIterator<Item = Customization>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Customization>> for CustomizationSet {
    fn from(customizations: Vec<Customization>) -> Self {
        Self::new(customizations)
    }
}

impl<const N: usize> From<[Customization; N]> for CustomizationSet {
    fn from(customizations: [Customization; N]) -> Self {
        Self::new(customizations)
    }
}
