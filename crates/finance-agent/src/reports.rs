//! Dashboard rendering (console tables) and CSV exports

use anyhow::Result;
use csv::Writer;
use finance_core::{Aggregate, CategoryTotal, TimeBucket};
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::constants;

/// Placeholder for an empty snapshot
pub const NO_DATA_MESSAGE: &str =
    "No financial data yet. Upload documents to see charts and statistics.";

/// Format as US dollars with thousands separators, e.g. "$1,234.56"
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Share of each category in the category chart, as whole percents
fn shares(categories: &[CategoryTotal]) -> Vec<f64> {
    let total: f64 = categories.iter().map(|c| c.value).sum();
    categories
        .iter()
        .map(|c| if total > 0.0 { c.value / total * 100.0 } else { 0.0 })
        .collect()
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Amount")]
    value: String,
    #[tabled(rename = "Entries")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Date")]
    label: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
}

fn category_table(categories: &[CategoryTotal]) -> String {
    let rows = categories
        .iter()
        .zip(shares(categories))
        .map(|(c, share)| CategoryRow {
            name: c.name.clone(),
            value: format_usd(c.value),
            count: c.count,
            share: format!("{:.0}%", share),
        });
    Table::new(rows).with(Style::rounded()).to_string()
}

fn bucket_table(buckets: &[TimeBucket]) -> String {
    let rows = buckets.iter().map(|b| BucketRow {
        label: b.label.clone(),
        income: format_usd(b.income),
        expense: format_usd(b.expense),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Full dashboard text for a non-empty snapshot
pub fn render_dashboard(result: &Aggregate) -> String {
    let mut out = String::new();

    out.push_str("=============================================\n");
    out.push_str("Financial Overview\n");
    out.push_str("=============================================\n");
    out.push_str(&format!(
        "  Total Income:   {:>16}\n",
        format_usd(result.totals.income)
    ));
    out.push_str(&format!(
        "  Total Expenses: {:>16}\n",
        format_usd(result.totals.expense)
    ));
    out.push_str(&format!(
        "  Net:            {:>16}\n",
        format_usd(result.totals.net())
    ));

    if !result.category_totals.is_empty() {
        out.push_str("\nExpenses by Category\n");
        out.push_str(&category_table(&result.category_totals));
        out.push('\n');
    }

    if !result.time_buckets.is_empty() {
        out.push_str("\nIncome vs Expenses\n");
        out.push_str(&bucket_table(&result.time_buckets));
        out.push('\n');
    }

    out
}

/// Print the dashboard, or the placeholder when there is no data
pub fn print_dashboard(result: Option<&Aggregate>) {
    match result {
        Some(result) => print!("{}", render_dashboard(result)),
        None => println!("{}", NO_DATA_MESSAGE),
    }
}

/// Write category_totals.csv, time_buckets.csv and totals.csv
pub fn export_csv(output_dir: &Path, result: &Aggregate) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let categories = output_dir.join(constants::CATEGORY_TOTALS_FILENAME);
    let mut wtr = Writer::from_path(&categories)?;
    wtr.write_record(["Category", "Amount", "Count"])?;
    for c in &result.category_totals {
        wtr.write_record([
            c.name.as_str(),
            &format!("{:.2}", c.value),
            &c.count.to_string(),
        ])?;
    }
    wtr.flush()?;

    let buckets = output_dir.join(constants::TIME_BUCKETS_FILENAME);
    let mut wtr = Writer::from_path(&buckets)?;
    wtr.write_record(["Date", "Income", "Expense"])?;
    for b in &result.time_buckets {
        wtr.write_record([
            b.label.as_str(),
            &format!("{:.2}", b.income),
            &format!("{:.2}", b.expense),
        ])?;
    }
    wtr.flush()?;

    let totals = output_dir.join(constants::TOTALS_FILENAME);
    let mut wtr = Writer::from_path(&totals)?;
    wtr.write_record(["Income", "Expense", "Net"])?;
    wtr.write_record([
        format!("{:.2}", result.totals.income),
        format!("{:.2}", result.totals.expense),
        format!("{:.2}", result.totals.net()),
    ])?;
    wtr.flush()?;

    Ok(vec![categories, buckets, totals])
}
