//! Aggregation over ledger rows: totals, balance, category and month
//! breakdowns. Pure reductions over already-fetched data.

use std::collections::HashMap;

use chrono::Datelike;

use crate::entry::{IncomeEntry, LedgerEntry};

pub fn expense_total(entries: &[LedgerEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

pub fn income_total(rows: &[IncomeEntry]) -> f64 {
    rows.iter().map(|r| r.amount).sum()
}

pub fn balance(income: &[IncomeEntry], expenses: &[LedgerEntry]) -> f64 {
    income_total(income) - expense_total(expenses)
}

/// Per-category totals, largest first.
pub fn by_category(entries: &[LedgerEntry]) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for e in entries {
        *totals.entry(e.category.clone()).or_insert(0.0) += e.amount;
    }
    let mut out: Vec<_> = totals.into_iter().collect();
    out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Per-month (`YYYY-MM`) totals, oldest first.
pub fn by_month(entries: &[LedgerEntry]) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for e in entries {
        let bucket = format!("{:04}-{:02}", e.date.year(), e.date.month());
        *totals.entry(bucket).or_insert(0.0) += e.amount;
    }
    let mut out: Vec<_> = totals.into_iter().collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}
