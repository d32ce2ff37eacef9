//! Chart aggregation
//!
//! Turns a snapshot of financial records into the three dashboard views:
//! per-category totals, an income/expense series per day, and grand totals.
//! All amounts are accumulated as absolute values; the sign only matters for
//! deciding whether a record is income or expense (see [`is_income`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::buckets::OrderedBuckets;
use crate::record::FinancialRecord;

/// Maximum number of categories handed to the pie chart
pub const CATEGORY_LIMIT: usize = 6;

/// Maximum number of daily buckets handed to the bar chart
pub const BUCKET_LIMIT: usize = 10;

/// Total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
    pub count: usize,
}

/// Income and expense for one display date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Income and expense over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    /// Add one record's absolute amount to the matching side
    pub fn record(&mut self, record: &FinancialRecord) {
        let amount = record.amount_value().abs();
        if is_income(record) {
            self.income += amount;
        } else {
            self.expense += amount;
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Everything the dashboard charts need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub category_totals: Vec<CategoryTotal>,
    pub time_buckets: Vec<TimeBucket>,
    pub totals: Totals,
}

/// How the daily series is cut down to `bucket_limit` entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketWindow {
    /// Group by display label in input order, keep the last buckets seen and
    /// reverse them. Only yields the most recent dates when the input is
    /// sorted newest first.
    #[default]
    InputOrder,
    /// Group by calendar date, keep the most recent dates, oldest first.
    Chronological,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub category_limit: usize,
    pub bucket_limit: usize,
    pub window: BucketWindow,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            category_limit: CATEGORY_LIMIT,
            bucket_limit: BUCKET_LIMIT,
            window: BucketWindow::InputOrder,
        }
    }
}

/// Income/expense classification.
///
/// A record is income when it is tagged `income` (whatever its sign) or when
/// its amount is strictly positive. Everything else is expense.
pub fn is_income(record: &FinancialRecord) -> bool {
    record.is_income_tagged() || record.amount_value() > 0.0
}

/// Aggregate with the dashboard defaults. Returns `None` for an empty snapshot.
pub fn aggregate(records: &[FinancialRecord]) -> Option<Aggregate> {
    aggregate_with(records, &AggregateOptions::default())
}

pub fn aggregate_with(records: &[FinancialRecord], options: &AggregateOptions) -> Option<Aggregate> {
    if records.is_empty() {
        return None;
    }

    Some(Aggregate {
        category_totals: category_totals(records, options.category_limit),
        time_buckets: time_buckets(records, options.bucket_limit, options.window),
        totals: totals(records),
    })
}

#[derive(Default)]
struct CategoryAccumulator {
    value: f64,
    count: usize,
}

/// Per-category totals in first-seen order, truncated to `limit`.
///
/// Every record opens its category, but only non-zero amounts add to the
/// value and the count.
pub fn category_totals(records: &[FinancialRecord], limit: usize) -> Vec<CategoryTotal> {
    let mut buckets: OrderedBuckets<String, CategoryAccumulator> = OrderedBuckets::new();

    for record in records {
        let acc = buckets.entry(record.category_label().to_string());
        let amount = record.amount_value();
        if amount != 0.0 {
            acc.value += amount.abs();
            acc.count += 1;
        }
    }

    buckets
        .into_entries()
        .into_iter()
        .take(limit)
        .map(|(name, acc)| CategoryTotal {
            name,
            value: acc.value,
            count: acc.count,
        })
        .collect()
}

/// Short display label for a bucket, e.g. "Jan 1"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Daily income/expense series. Records without a usable date are skipped.
pub fn time_buckets(
    records: &[FinancialRecord],
    limit: usize,
    window: BucketWindow,
) -> Vec<TimeBucket> {
    let dated: Vec<(NaiveDate, &FinancialRecord)> = records
        .iter()
        .filter_map(|r| r.parsed_date().map(|d| (d, r)))
        .collect();

    let skipped = records.len() - dated.len();
    if skipped > 0 {
        tracing::debug!(skipped, "records without a usable date left out of the daily series");
    }

    match window {
        BucketWindow::InputOrder => {
            let mut buckets: OrderedBuckets<String, Totals> = OrderedBuckets::new();
            for (date, record) in dated {
                buckets.entry(date_label(date)).record(record);
            }

            let entries = buckets.into_entries();
            let start = entries.len().saturating_sub(limit);
            entries
                .into_iter()
                .skip(start)
                .rev()
                .map(|(label, flow)| to_bucket(label, flow))
                .collect()
        }
        BucketWindow::Chronological => {
            let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
            for (date, record) in dated {
                by_date.entry(date).or_default().record(record);
            }

            let start = by_date.len().saturating_sub(limit);
            by_date
                .into_iter()
                .skip(start)
                .map(|(date, flow)| to_bucket(date_label(date), flow))
                .collect()
        }
    }
}

fn to_bucket(label: String, flow: Totals) -> TimeBucket {
    TimeBucket {
        label,
        income: flow.income,
        expense: flow.expense,
    }
}

/// Grand totals over every record
pub fn totals(records: &[FinancialRecord]) -> Totals {
    records.iter().fold(Totals::default(), |mut acc, record| {
        acc.record(record);
        acc
    })
}
