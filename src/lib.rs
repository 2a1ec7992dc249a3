//! Trolley
//!
//! Trolley is the cart engine behind a food-ordering storefront: it aggregates menu items and their
//! customizations into cart lines and derives the pricing shown at checkout.

pub mod cart;
pub mod config;
pub mod customizations;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod selection;
pub mod session;
pub mod summary;
