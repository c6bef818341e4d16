//! Consolidation
//!
//! Pure functions that collapse a raw sequence of cart lines into one row per
//! product. Nothing here mutates the cart or holds state between calls: every
//! function maps an input snapshot to a new derived value.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tracing::warn;

use crate::{cart::CartLine, products::ProductId};

/// One product's merged cart presence: summed quantity at a single unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedLine {
    /// Id of the product
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Price per unit
    pub unit_price: Money<'static, Currency>,

    /// Total units across all merged lines
    pub quantity: u32,
}

impl ConsolidatedLine {
    /// The price of this row: unit price times quantity, exact in minor units.
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        Money::from_minor(
            self.unit_price.to_minor_units() * i64::from(self.quantity),
            self.unit_price.currency(),
        )
    }
}

/// Group cart lines by product id, summing quantities.
///
/// Output rows appear in order of each product's first occurrence in the
/// input, so the result is deterministic for identical input. Name and unit
/// price are taken from the first-seen line of each group; later lines with a
/// diverging price do not overwrite it. Zero-quantity lines should have been
/// rejected at the cart boundary; if one slips through it is skipped with a
/// warning rather than contributing to any total.
#[must_use]
pub fn consolidate(lines: &[CartLine]) -> Vec<ConsolidatedLine> {
    let mut by_product: FxHashMap<ProductId, usize> = FxHashMap::default();
    let mut consolidated: Vec<ConsolidatedLine> = Vec::new();

    for line in lines {
        if line.quantity == 0 {
            warn!(product_id = %line.product_id, "skipping zero-quantity cart line");
            continue;
        }

        if let Some(&idx) = by_product.get(&line.product_id) {
            if let Some(row) = consolidated.get_mut(idx) {
                row.quantity = row.quantity.saturating_add(line.quantity);
            }
        } else {
            by_product.insert(line.product_id.clone(), consolidated.len());

            consolidated.push(ConsolidatedLine {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
            });
        }
    }

    consolidated
}

/// Sum the line totals of consolidated rows. Zero for an empty slice.
#[must_use]
pub fn grand_total(
    consolidated: &[ConsolidatedLine],
    currency: &'static Currency,
) -> Money<'static, Currency> {
    let minor: i64 = consolidated
        .iter()
        .map(|row| row.line_total().to_minor_units())
        .sum();

    Money::from_minor(minor, currency)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn line(id: &str, name: &str, price_minor: i64, quantity: u32) -> CartLine {
        CartLine::with_quantity(
            &Product::new(id, name, Money::from_minor(price_minor, INR), 100),
            quantity,
        )
    }

    #[test]
    fn consolidate_merges_duplicates_and_sums_quantities() {
        let lines = [
            line("p1", "Tomato", 2000, 1),
            line("p1", "Tomato", 2000, 1),
            line("p2", "Onion", 1500, 1),
        ];

        let consolidated = consolidate(&lines);

        assert_eq!(
            consolidated,
            vec![
                ConsolidatedLine {
                    product_id: ProductId::from("p1"),
                    name: "Tomato".to_string(),
                    unit_price: Money::from_minor(2000, INR),
                    quantity: 2,
                },
                ConsolidatedLine {
                    product_id: ProductId::from("p2"),
                    name: "Onion".to_string(),
                    unit_price: Money::from_minor(1500, INR),
                    quantity: 1,
                },
            ]
        );

        assert_eq!(
            grand_total(&consolidated, INR),
            Money::from_minor(5500, INR)
        );
    }

    #[test]
    fn consolidate_keeps_first_occurrence_order() {
        let lines = [
            line("a", "Apple", 100, 1),
            line("b", "Banana", 200, 1),
            line("a", "Apple", 100, 1),
            line("c", "Carrot", 300, 1),
        ];

        let consolidated = consolidate(&lines);

        let ids: Vec<&str> = consolidated
            .iter()
            .map(|row| row.product_id.as_str())
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn consolidate_conserves_quantity() {
        let lines = [
            line("a", "Apple", 100, 2),
            line("b", "Banana", 200, 5),
            line("a", "Apple", 100, 3),
            line("b", "Banana", 200, 1),
        ];

        let input_quantity: u32 = lines.iter().map(|l| l.quantity).sum();
        let output_quantity: u32 = consolidate(&lines).iter().map(|row| row.quantity).sum();

        assert_eq!(input_quantity, output_quantity);
    }

    #[test]
    fn consolidate_conserves_total() {
        let lines = [
            line("a", "Apple", 125, 2),
            line("b", "Banana", 240, 5),
            line("a", "Apple", 125, 3),
        ];

        let input_minor: i64 = lines
            .iter()
            .map(|l| l.line_total().to_minor_units())
            .sum();

        let consolidated = consolidate(&lines);

        assert_eq!(
            grand_total(&consolidated, INR),
            Money::from_minor(input_minor, INR)
        );
    }

    #[test]
    fn consolidate_of_unique_lines_is_identity() {
        let lines = [
            line("a", "Apple", 100, 1),
            line("b", "Banana", 200, 1),
            line("c", "Carrot", 300, 1),
        ];

        let once = consolidate(&lines);

        assert_eq!(once.len(), 3);

        for (row, original) in once.iter().zip(lines.iter()) {
            assert_eq!(row.product_id, original.product_id);
            assert_eq!(row.quantity, original.quantity);
            assert_eq!(row.unit_price, original.unit_price);
        }
    }

    #[test]
    fn consolidate_uses_first_seen_price_on_divergence() {
        let mut second = line("a", "Apple", 120, 1);
        second.unit_price = Money::from_minor(150, INR);

        let lines = [line("a", "Apple", 120, 1), second];

        let consolidated = consolidate(&lines);

        let row = consolidated.first().expect("expected one row");
        assert_eq!(row.unit_price, Money::from_minor(120, INR));
        assert_eq!(row.quantity, 2);
    }

    #[test]
    fn consolidate_skips_zero_quantity_lines() {
        let lines = [line("a", "Apple", 100, 0), line("b", "Banana", 200, 2)];

        let consolidated = consolidate(&lines);

        assert_eq!(consolidated.len(), 1);
        assert_eq!(
            grand_total(&consolidated, INR),
            Money::from_minor(400, INR)
        );
    }

    #[test]
    fn empty_input_yields_empty_output_and_zero_total() {
        let consolidated = consolidate(&[]);

        assert!(consolidated.is_empty());
        assert_eq!(grand_total(&consolidated, INR), Money::from_minor(0, INR));
    }

    #[test]
    fn line_total_is_exact_in_minor_units() {
        let row = ConsolidatedLine {
            product_id: ProductId::from("p1"),
            name: "Tomato".to_string(),
            unit_price: Money::from_minor(2033, INR),
            quantity: 3,
        };

        assert_eq!(row.line_total(), Money::from_minor(6099, INR));
    }
}
