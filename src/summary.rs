//! Payment summary
//!
//! Renders a cart the way the storefront's cart screen shows it: a table of lines followed by the
//! payment rows. All rounding to the currency's minor unit happens here, once per displayed figure.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, pricing::PricingInfo};

/// Errors that can occur when writing a payment summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A displayed cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Line display key
    pub key: String,

    /// Product name
    pub name: String,

    /// Customization names, in id order
    pub customizations: Vec<String>,

    /// Unit price including customizations
    pub unit_total: Decimal,

    /// Quantity
    pub quantity: u32,

    /// Line total
    pub line_total: Decimal,
}

/// Snapshot of a cart for display.
#[derive(Debug, Clone)]
pub struct PaymentSummary {
    lines: Vec<SummaryLine>,
    total_items: u64,
    pricing: PricingInfo,
    discount_percent: Decimal,
    free_shipping_threshold: Decimal,
    currency: &'static Currency,
}

impl PaymentSummary {
    /// Take a display snapshot of the cart.
    pub fn new(cart: &Cart) -> Self {
        let lines = cart
            .iter()
            .map(|line| SummaryLine {
                key: line.key().to_string(),
                name: line.name().to_string(),
                customizations: line
                    .customizations()
                    .iter()
                    .map(|customization| customization.name().to_string())
                    .collect(),
                unit_total: line.unit_total(),
                quantity: line.quantity(),
                line_total: line.line_total(),
            })
            .collect();

        let policy = cart.policy();

        Self {
            lines,
            total_items: cart.total_items(),
            pricing: cart.pricing_info(),
            discount_percent: policy
                .discount_fraction()
                .saturating_mul(Decimal::ONE_HUNDRED)
                .normalize(),
            free_shipping_threshold: policy.free_shipping_threshold,
            currency: cart.currency(),
        }
    }

    /// Displayed lines.
    pub fn lines(&self) -> &[SummaryLine] {
        &self.lines
    }

    /// Pricing figures, unrounded.
    pub fn pricing(&self) -> &PricingInfo {
        &self.pricing
    }

    /// Label and value of each payment row, in display order.
    pub fn rows(&self) -> Vec<(String, String)> {
        let pricing = &self.pricing;

        let delivery = if pricing.free_shipping {
            format!(
                "FREE (Order {}+)",
                format_amount(self.free_shipping_threshold, self.currency)
            )
        } else {
            format_amount(pricing.shipping_cost, self.currency)
        };

        let discount_label = if pricing.has_discount {
            format!(
                "Discount ({}% - {} toppings)",
                self.discount_percent, pricing.total_customizations
            )
        } else {
            "Discount".to_string()
        };

        vec![
            (
                format!("Total Items ({})", self.total_items),
                format_amount(pricing.subtotal, self.currency),
            ),
            ("Delivery Fee".to_string(), delivery),
            (
                discount_label,
                format!("- {}", format_amount(pricing.discount, self.currency)),
            ),
            (
                "Total".to_string(),
                format_amount(pricing.grand_total(), self.currency),
            ),
        ]
    }

    /// Writes the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        if self.lines.is_empty() {
            writeln!(out, "Your cart is empty")?;

            return Ok(());
        }

        writeln!(out, "\n{}", self.lines_table())?;

        let rows = self.rows();

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();

        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }

    fn lines_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Customizations", "Unit Price", "Qty", "Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.customizations.join("\n"),
                format_amount(line.unit_total, self.currency),
                line.quantity.to_string(),
                format_amount(line.line_total, self.currency),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(2..5), Alignment::right());

        table.to_string()
    }
}

/// Format an amount in the given currency, rounded to the currency's minor unit.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> String {
    let rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, currency).to_string()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        customizations::{Customization, CustomizationSet},
        pricing::PricingPolicy,
        products::LineCandidate,
    };

    use super::*;

    fn burger_with(customizations: usize) -> TestResult<LineCandidate> {
        let set = (0..customizations)
            .map(|idx| Customization::new(format!("c{idx}"), format!("Topping {idx}"), Decimal::ONE))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(
            LineCandidate::new("burger", "Burger", Decimal::new(10, 0), "burger.png")
                .with_customizations(CustomizationSet::new(set)),
        )
    }

    fn render(summary: &PaymentSummary) -> TestResult<String> {
        let mut out = Vec::new();
        summary.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn format_amount_rounds_at_display_time() {
        assert_eq!(format_amount(Decimal::new(684, 1), USD), "$68.40");
        assert_eq!(format_amount(Decimal::new(12345, 3), GBP), "£12.35");
    }

    #[test]
    fn empty_cart_renders_empty_message() -> TestResult {
        let output = render(&PaymentSummary::new(&Cart::default()))?;

        assert_eq!(output, "Your cart is empty\n");

        Ok(())
    }

    #[test]
    fn summary_shows_discount_and_delivery_fee() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item_quantity(burger_with(2)?, 6);

        let summary = PaymentSummary::new(&cart);
        let rows = summary.rows();

        assert_eq!(
            rows,
            vec![
                ("Total Items (6)".to_string(), "$72.00".to_string()),
                ("Delivery Fee".to_string(), "$10.00".to_string()),
                (
                    "Discount (5% - 12 toppings)".to_string(),
                    "- $3.60".to_string()
                ),
                ("Total".to_string(), "$78.40".to_string()),
            ]
        );

        let output = render(&summary)?;

        assert!(output.contains("Burger"));
        assert!(output.contains("Topping 0"));
        assert!(output.contains("Total Items (6)"));
        assert!(output.contains("$78.40"));

        Ok(())
    }

    #[test]
    fn summary_shows_free_delivery_over_threshold() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item_quantity(burger_with(0)?, 21);

        let rows = PaymentSummary::new(&cart).rows();

        assert_eq!(
            rows.get(1),
            Some(&(
                "Delivery Fee".to_string(),
                "FREE (Order $200.00+)".to_string()
            ))
        );
        assert_eq!(
            rows.get(2),
            Some(&("Discount".to_string(), "- $0.00".to_string()))
        );
        assert_eq!(
            rows.get(3),
            Some(&("Total".to_string(), "$210.00".to_string()))
        );

        Ok(())
    }

    #[test]
    fn summary_uses_policy_shipping_fee() -> TestResult {
        let policy = PricingPolicy {
            shipping_fee: Decimal::new(50, 0),
            ..PricingPolicy::default()
        };
        let mut cart = Cart::with_policy(USD, policy);

        cart.add_item(burger_with(0)?);

        let rows = PaymentSummary::new(&cart).rows();

        assert_eq!(
            rows.last(),
            Some(&("Total".to_string(), "$60.00".to_string()))
        );

        Ok(())
    }

    #[test]
    fn summary_lines_snapshot_cart_lines() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item(burger_with(1)?);

        let summary = PaymentSummary::new(&cart);
        let line = summary.lines().first().ok_or("missing line")?;

        assert_eq!(line.key, "burger-c0");
        assert_eq!(line.customizations, vec!["Topping 0".to_string()]);
        assert_eq!(line.unit_total, Decimal::new(11, 0));
        assert_eq!(line.line_total, Decimal::new(11, 0));

        Ok(())
    }
}
