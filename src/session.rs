//! Cart sessions
//!
//! A session is a recorded sequence of cart commands (the events a storefront UI would send)
//! that can be replayed against a [`Cart`] using a menu [`Fixture`] to resolve ids.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    customizations::CustomizationSet,
    fixtures::{Fixture, FixtureError},
};

/// Errors raised while replaying a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A command referenced a product or customization that is not in the menu.
    #[error("command {index} ({op}) failed: {source}")]
    Command {
        /// Position of the command in the session
        index: usize,

        /// Command name
        op: &'static str,

        /// Lookup failure
        #[source]
        source: FixtureError,
    },
}

/// Wrapper for a session in YAML
#[derive(Debug, Deserialize)]
pub struct SessionFixture {
    /// Commands, in the order they are replayed
    pub commands: Vec<CartCommand>,
}

/// A single cart command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartCommand {
    /// Add units of a product with customizations.
    Add {
        /// Product key
        product: String,

        /// Customization keys
        #[serde(default)]
        customizations: Vec<String>,

        /// Units to add
        #[serde(default = "default_quantity")]
        quantity: u32,
    },

    /// Remove a line.
    Remove {
        /// Product key
        product: String,

        /// Customization keys
        #[serde(default)]
        customizations: Vec<String>,
    },

    /// Add one unit to a line.
    Increase {
        /// Product key
        product: String,

        /// Customization keys
        #[serde(default)]
        customizations: Vec<String>,
    },

    /// Take one unit off a line.
    Decrease {
        /// Product key
        product: String,

        /// Customization keys
        #[serde(default)]
        customizations: Vec<String>,
    },

    /// Empty the cart.
    Clear,
}

fn default_quantity() -> u32 {
    1
}

impl CartCommand {
    /// Command name, as written in session files.
    pub fn op(&self) -> &'static str {
        match self {
            CartCommand::Add { .. } => "add",
            CartCommand::Remove { .. } => "remove",
            CartCommand::Increase { .. } => "increase",
            CartCommand::Decrease { .. } => "decrease",
            CartCommand::Clear => "clear",
        }
    }

    /// Apply the command to a cart.
    ///
    /// Adding requires the product to exist in the menu and to offer every customization. The
    /// other commands only need the customization ids to resolve; a product that is not in the
    /// cart is ignored by the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if a product or customization key is not in the menu, or if an
    /// added product does not offer one of the customizations.
    pub fn apply(&self, cart: &mut Cart, fixture: &Fixture) -> Result<(), FixtureError> {
        match self {
            CartCommand::Add {
                product,
                customizations,
                quantity,
            } => {
                let product = fixture.product(product)?;
                let customizations = resolve(fixture, customizations)?;

                if let Some(id) = customizations.ids().find(|id| !product.offers(id)) {
                    return Err(FixtureError::CustomizationNotOffered {
                        product: product.id.clone(),
                        customization: id.to_string(),
                    });
                }

                cart.add_item_quantity(product.candidate(customizations), *quantity);
            }
            CartCommand::Remove {
                product,
                customizations,
            } => cart.remove_item(product, &resolve(fixture, customizations)?),
            CartCommand::Increase {
                product,
                customizations,
            } => cart.increase_qty(product, &resolve(fixture, customizations)?),
            CartCommand::Decrease {
                product,
                customizations,
            } => cart.decrease_qty(product, &resolve(fixture, customizations)?),
            CartCommand::Clear => cart.clear_cart(),
        }

        Ok(())
    }
}

fn resolve(fixture: &Fixture, keys: &[String]) -> Result<CustomizationSet, FixtureError> {
    keys.iter()
        .map(|key| fixture.customization(key).cloned())
        .collect()
}

/// A replayable list of cart commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    commands: Vec<CartCommand>,
}

impl Session {
    /// Create a session from commands.
    pub fn new(commands: impl Into<Vec<CartCommand>>) -> Self {
        Self {
            commands: commands.into(),
        }
    }

    /// The commands, in replay order.
    pub fn commands(&self) -> &[CartCommand] {
        &self.commands
    }

    /// Replay every command against the cart, stopping at the first failure.
    ///
    /// Commands before the failing one stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Command`] for the first command whose ids do not resolve.
    pub fn replay(&self, cart: &mut Cart, fixture: &Fixture) -> Result<(), SessionError> {
        for (index, command) in self.commands.iter().enumerate() {
            command
                .apply(cart, fixture)
                .map_err(|source| SessionError::Command {
                    index,
                    op: command.op(),
                    source,
                })?;

            debug!(index, op = command.op(), "applied cart command");
        }

        info!(
            commands = self.commands.len(),
            lines = cart.len(),
            items = cart.total_items(),
            "replayed session"
        );

        Ok(())
    }
}

impl From<SessionFixture> for Session {
    fn from(fixture: SessionFixture) -> Self {
        Self::new(fixture.commands)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rust_decimal::Decimal;
    use tempfile::tempdir;
    use testresult::TestResult;

    use crate::pricing::PricingPolicy;

    use super::*;

    const MENU: &str = r#"
currency: USD
customizations:
  c1: { name: Cheese, price: "1", type: topping }
  c2: { name: Bacon, price: "1", type: topping }
  dip: { name: Dip, price: "0.5", type: side }
menu:
  burger:
    name: Burger
    price: "10"
    customizations: [c1, c2]
  fries:
    name: Fries
    price: "3"
    customizations: [dip]
"#;

    fn menu_fixture(base: &Path) -> Result<Fixture, FixtureError> {
        fs::create_dir_all(base.join("menus"))?;
        fs::write(base.join("menus").join("test.yml"), MENU)?;

        let mut fixture = Fixture::with_base_path(base);
        fixture.load_menu("test")?;

        Ok(fixture)
    }

    #[test]
    fn commands_parse_from_yaml() -> TestResult {
        let fixture: SessionFixture = serde_norway::from_str(
            "commands:\n  - { op: add, product: burger, customizations: [c1] }\n  - { op: decrease, product: fries }\n  - { op: clear }\n",
        )?;

        assert_eq!(
            fixture.commands,
            vec![
                CartCommand::Add {
                    product: "burger".to_string(),
                    customizations: vec!["c1".to_string()],
                    quantity: 1,
                },
                CartCommand::Decrease {
                    product: "fries".to_string(),
                    customizations: Vec::new(),
                },
                CartCommand::Clear,
            ]
        );

        Ok(())
    }

    #[test]
    fn replay_applies_commands_in_order() -> TestResult {
        let dir = tempdir()?;
        let fixture = menu_fixture(dir.path())?;
        let mut cart = fixture.cart(PricingPolicy::default())?;

        let session = Session::new(vec![
            CartCommand::Add {
                product: "burger".to_string(),
                customizations: vec!["c2".to_string(), "c1".to_string()],
                quantity: 5,
            },
            CartCommand::Increase {
                product: "burger".to_string(),
                customizations: vec!["c1".to_string(), "c2".to_string()],
            },
            CartCommand::Add {
                product: "fries".to_string(),
                customizations: Vec::new(),
                quantity: 1,
            },
            CartCommand::Decrease {
                product: "fries".to_string(),
                customizations: Vec::new(),
            },
        ]);

        session.replay(&mut cart, &fixture)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 6);
        assert_eq!(cart.total_price(), Decimal::new(72, 0));
        assert_eq!(cart.final_price(), Decimal::new(684, 1));

        Ok(())
    }

    #[test]
    fn replay_reports_failing_command() -> TestResult {
        let dir = tempdir()?;
        let fixture = menu_fixture(dir.path())?;
        let mut cart = fixture.cart(PricingPolicy::default())?;

        let session = Session::new(vec![
            CartCommand::Add {
                product: "fries".to_string(),
                customizations: Vec::new(),
                quantity: 2,
            },
            CartCommand::Add {
                product: "pizza".to_string(),
                customizations: Vec::new(),
                quantity: 1,
            },
        ]);

        let result = session.replay(&mut cart, &fixture);

        assert!(matches!(
            result,
            Err(SessionError::Command {
                index: 1,
                op: "add",
                source: FixtureError::ProductNotFound(_),
            })
        ));
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn adjusting_a_product_missing_from_the_cart_is_ignored() -> TestResult {
        let dir = tempdir()?;
        let fixture = menu_fixture(dir.path())?;
        let mut cart = fixture.cart(PricingPolicy::default())?;

        CartCommand::Remove {
            product: "ghost".to_string(),
            customizations: Vec::new(),
        }
        .apply(&mut cart, &fixture)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_customization_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let fixture = menu_fixture(dir.path())?;
        let mut cart = fixture.cart(PricingPolicy::default())?;

        let result = CartCommand::Increase {
            product: "burger".to_string(),
            customizations: vec!["ghost".to_string()],
        }
        .apply(&mut cart, &fixture);

        assert!(matches!(
            result,
            Err(FixtureError::CustomizationNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn adding_a_customization_the_product_does_not_offer_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let fixture = menu_fixture(dir.path())?;
        let mut cart = fixture.cart(PricingPolicy::default())?;

        let result = CartCommand::Add {
            product: "fries".to_string(),
            customizations: vec!["dip".to_string(), "c1".to_string()],
            quantity: 1,
        }
        .apply(&mut cart, &fixture);

        assert!(matches!(
            result,
            Err(FixtureError::CustomizationNotOffered { product, customization })
                if product == "fries" && customization == "c1"
        ));
        assert!(cart.is_empty());

        Ok(())
    }
}
