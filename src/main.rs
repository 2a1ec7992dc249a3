//! Trolley CLI
//!
//! Loads a menu, replays a cart session against it and prints the payment summary.

use std::io;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use trolley::{
    config::Config,
    fixtures::Fixture,
    observability,
    pricing::PricingPolicy,
    summary::PaymentSummary,
};

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|error| error.exit());

    observability::init(&config.logging).context("failed to initialise logging")?;

    run(&config).inspect_err(|error| error!(error = %format!("{error:#}"), "trolley failed"))
}

fn run(config: &Config) -> Result<()> {
    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture
        .load_menu(&config.menu)
        .with_context(|| format!("failed to load menu '{}'", config.menu))?;

    let policy = match &config.policy {
        Some(name) => fixture
            .load_policy(name)
            .with_context(|| format!("failed to load pricing policy '{name}'"))?,
        None => {
            debug!("using built-in pricing policy");

            PricingPolicy::default()
        }
    };

    let session_name = config.session_name();
    let session = fixture
        .load_session(session_name)
        .with_context(|| format!("failed to load session '{session_name}'"))?;

    let mut cart = fixture.cart(policy)?;

    session
        .replay(&mut cart, &fixture)
        .with_context(|| format!("failed to replay session '{session_name}'"))?;

    info!(
        lines = cart.len(),
        items = cart.total_items(),
        final_price = %cart.final_price(),
        "cart ready"
    );

    PaymentSummary::new(&cart)
        .write_to(io::stdout().lock())
        .context("failed to write payment summary")?;

    Ok(())
}
