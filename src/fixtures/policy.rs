//! Pricing Policy Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, menu::parse_amount},
    pricing::PricingPolicy,
};

/// Pricing policy overrides in YAML. Missing keys keep the default policy values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFixture {
    /// Customization units the cart must exceed for the discount
    pub discount_threshold: Option<u64>,

    /// Discount rate (e.g. "5%" or "0.05")
    pub discount_rate: Option<String>,

    /// Subtotal the cart must exceed for free shipping (e.g. "200")
    pub free_shipping_threshold: Option<String>,

    /// Flat shipping fee (e.g. "10")
    pub shipping_fee: Option<String>,
}

impl TryFrom<PolicyFixture> for PricingPolicy {
    type Error = FixtureError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let defaults = PricingPolicy::default();

        Ok(PricingPolicy {
            discount_threshold: fixture
                .discount_threshold
                .unwrap_or(defaults.discount_threshold),
            discount_rate: fixture
                .discount_rate
                .as_deref()
                .map(parse_percentage)
                .transpose()?
                .unwrap_or(defaults.discount_rate),
            free_shipping_threshold: fixture
                .free_shipping_threshold
                .as_deref()
                .map(parse_amount)
                .transpose()?
                .unwrap_or(defaults.free_shipping_threshold),
            shipping_fee: fixture
                .shipping_fee
                .as_deref()
                .map(parse_amount)
                .transpose()?
                .unwrap_or(defaults.shipping_fee),
        })
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let (value, scale) = match trimmed.strip_suffix('%') {
        Some(points) => (points.trim(), Decimal::ONE_HUNDRED),
        None => (trimmed, Decimal::ONE),
    };

    let value = value
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    let fraction = value
        .checked_div(scale)
        .ok_or_else(|| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(fraction))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("5%")? * Decimal::ONE, Decimal::new(5, 2));
        assert_eq!(parse_percentage("0.05")? * Decimal::ONE, Decimal::new(5, 2));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        assert!(matches!(
            parse_percentage("lots%"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn empty_fixture_gives_default_policy() -> TestResult {
        let policy = PricingPolicy::try_from(PolicyFixture::default())?;

        assert_eq!(policy, PricingPolicy::default());

        Ok(())
    }

    #[test]
    fn fixture_overrides_selected_values() -> TestResult {
        let fixture: PolicyFixture =
            serde_norway::from_str("shipping_fee: \"50\"\ndiscount_rate: \"10%\"\n")?;

        let policy = PricingPolicy::try_from(fixture)?;

        assert_eq!(policy.shipping_fee, Decimal::new(50, 0));
        assert_eq!(policy.discount_fraction(), Decimal::new(10, 2));
        assert_eq!(policy.discount_threshold, 5);
        assert_eq!(policy.free_shipping_threshold, Decimal::new(200, 0));

        Ok(())
    }

    #[test]
    fn fixture_rejects_unknown_keys() {
        let result = serde_norway::from_str::<PolicyFixture>("shipping: \"50\"\n");

        assert!(result.is_err());
    }
}
