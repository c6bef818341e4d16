//! Utils

use clap::Parser;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct CheckoutDemoArgs {
    /// Number of cart lines to take from the fixture
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the catalog & cart
    #[clap(short, long, default_value = "market")]
    pub fixture: String,

    /// Output file path for the rendered bill
    #[clap(short, long)]
    pub out: Option<String>,
}
