//! Bill
//!
//! The exportable representation of a consolidated cart: ordered rows plus a
//! grand total and a generation timestamp. [`Bill::write_to`] is the bundled
//! text renderer; PDF or other document output consumes the same [`Bill`]
//! shape through an external renderer.

use std::io;

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    consolidation::{ConsolidatedLine, consolidate, grand_total},
};

/// Shop name printed at the top of rendered bills.
const BILL_TITLE: &str = "Farm2Home";

/// Errors that can occur when building or rendering a bill.
#[derive(Debug, Error)]
pub enum BillError {
    /// Attempted to generate a bill from a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// IO error
    #[error("IO error")]
    Io,
}

/// One row of a bill: a consolidated product with its summed line total.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    /// Product name
    pub name: String,

    /// Total units billed
    pub quantity: u32,

    /// Unit price times quantity
    pub line_total: Money<'static, Currency>,
}

/// Finalized, totals-included representation of a consolidated cart.
#[derive(Debug, Clone)]
pub struct Bill {
    rows: Vec<BillRow>,
    grand_total: Money<'static, Currency>,
    generated_at: DateTime<Utc>,
    currency: &'static Currency,
}

impl Bill {
    /// Consolidate a cart and build its bill.
    ///
    /// # Errors
    ///
    /// Returns [`BillError::EmptyCart`] if the cart has no lines.
    pub fn from_cart(cart: &Cart, generated_at: DateTime<Utc>) -> Result<Self, BillError> {
        if cart.is_empty() {
            return Err(BillError::EmptyCart);
        }

        let consolidated = consolidate(cart.lines());

        Self::from_consolidated(&consolidated, cart.currency(), generated_at)
    }

    /// Build a bill from already-consolidated rows.
    ///
    /// # Errors
    ///
    /// Returns [`BillError::EmptyCart`] if there are no rows.
    pub fn from_consolidated(
        consolidated: &[ConsolidatedLine],
        currency: &'static Currency,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, BillError> {
        if consolidated.is_empty() {
            return Err(BillError::EmptyCart);
        }

        let rows = consolidated
            .iter()
            .map(|line| BillRow {
                name: line.name.clone(),
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        Ok(Bill {
            rows,
            grand_total: grand_total(consolidated, currency),
            generated_at,
            currency,
        })
    }

    /// The bill rows, in consolidated (first-occurrence) order.
    #[must_use]
    pub fn rows(&self) -> &[BillRow] {
        &self.rows
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }

    /// When the bill was generated.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Render the bill as a table with a trailing total row.
    ///
    /// # Errors
    ///
    /// Returns [`BillError::Io`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), BillError> {
        let date = self.generated_at.format("%d/%m/%Y");
        let time = self.generated_at.format("%H:%M:%S");

        writeln!(out, "{BILL_TITLE}").map_err(|_err| BillError::Io)?;
        writeln!(out, "Date: {date}  Time: {time}").map_err(|_err| BillError::Io)?;

        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Qty", "Amount"]);

        for (idx, row) in self.rows.iter().enumerate() {
            builder.push_record([
                format!("{}", idx + 1),
                row.name.clone(),
                format!("{}", row.quantity),
                format!("{}", row.line_total),
            ]);
        }

        // Trailing total row, separated from the items above.
        let total_row = self.rows.len() + 1;

        builder.push_record([
            String::new(),
            "Total".to_string(),
            String::new(),
            format!("{}", self.grand_total),
        ]);

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);
        theme.insert_horizontal_line(total_row, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..4), Alignment::right());
        table.modify((total_row, 1), Color::BOLD);
        table.modify((total_row, 3), Color::BOLD);

        writeln!(out, "{table}").map_err(|_err| BillError::Io)
    }
}
