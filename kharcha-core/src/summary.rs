//! Category summary: totals, per-category subtotals, and percentage shares.

use std::collections::HashMap;

use crate::record::ExpenseRecord;

/// Sentinel report body when a window holds no records.
pub const NO_EXPENSES: &str = "No expenses found";

/// One category's slice of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub subtotal: f64,
    /// Share of the grand total, 0..=100.
    pub percentage: f64,
}

/// Aggregated view of a filtered record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: f64,
    /// Sorted descending by subtotal; ties keep first-seen input order.
    pub shares: Vec<CategoryShare>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Render the multi-line report: total line, blank line, category header,
    /// one line per group.
    pub fn render(&self, currency: &str) -> String {
        if self.is_empty() {
            return NO_EXPENSES.to_string();
        }

        let mut lines = vec![
            format!("**Total:** {currency}{:.2}", self.total),
            String::new(),
            "**By Category:**".to_string(),
        ];
        for share in &self.shares {
            lines.push(format!(
                "- {}: {currency}{:.2} ({:.1}%)",
                share.category, share.subtotal, share.percentage
            ));
        }
        lines.join("\n")
    }
}

/// Group records by exact category label and compute subtotals and shares.
///
/// Empty input yields total 0 and no shares; the percentage division is
/// never reached in that case.
pub fn summarize(records: &[ExpenseRecord]) -> Summary {
    if records.is_empty() {
        return Summary {
            total: 0.0,
            shares: Vec::new(),
        };
    }

    let total: f64 = records.iter().map(|r| r.amount).sum();

    // Group preserving first-seen order so the later stable sort can break
    // subtotal ties by input position.
    let mut order: Vec<String> = Vec::new();
    let mut subtotals: HashMap<String, f64> = HashMap::new();
    for rec in records {
        let label = rec.category_label().to_string();
        if !subtotals.contains_key(&label) {
            order.push(label.clone());
        }
        *subtotals.entry(label).or_insert(0.0) += rec.amount;
    }

    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|category| {
            let subtotal = subtotals[&category];
            CategoryShare {
                subtotal,
                percentage: subtotal / total * 100.0,
                category,
            }
        })
        .collect();

    // Sort by subtotal descending; sort_by is stable
    shares.sort_by(|a, b| b.subtotal.partial_cmp(&a.subtotal).unwrap());

    Summary { total, shares }
}
