//! Checkout Demo
//!
//! Loads a fixture catalog and cart, consolidates the cart, places the
//! orders, and renders the bill.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of cart lines taken from the fixture
//! Use `-o` to also write the rendered bill to a file

use std::{fs::File, io};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use farm2home::{
    bill::Bill, consolidation::consolidate, fixtures::Fixture, orders::OrderBook,
    utils::CheckoutDemoArgs,
};

/// Checkout Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = CheckoutDemoArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut catalog = fixture.catalog()?;
    let cart = fixture.cart(args.n)?;

    let consolidated = consolidate(cart.lines());

    let mut orders = OrderBook::new();
    let placed = orders.place_cart(&mut catalog, "demo-buyer", &consolidated, Utc::now())?;

    let bill = Bill::from_cart(&cart, Utc::now())?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    bill.write_to(&mut handle)?;

    println!("Placed {} orders", placed.len());

    if let Some(out) = args.out.as_deref() {
        bill.write_to(File::create(out)?)?;
        println!("Bill written to {out}");
    }

    Ok(())
}
