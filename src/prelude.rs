//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, LineKey},
    customizations::{Customization, CustomizationError, CustomizationKind, CustomizationSet},
    fixtures::{Fixture, FixtureError},
    pricing::{PricingInfo, PricingPolicy},
    products::{Category, LineCandidate, Product, ProductKey},
    selection::Selection,
    session::{CartCommand, Session, SessionError},
    summary::{PaymentSummary, SummaryError, format_amount},
};
