//! Finance Agent core
//!
//! Record model for the hosted `financial_data` table and the aggregation that
//! feeds the dashboard charts. Pure and synchronous; fetching and rendering
//! live in the `finance-agent` binary.

pub mod aggregate;
pub mod buckets;
pub mod load;
pub mod record;

pub use aggregate::{
    aggregate, aggregate_with, is_income, Aggregate, AggregateOptions, BucketWindow,
    CategoryTotal, TimeBucket, Totals,
};
pub use load::LoadError;
pub use record::FinancialRecord;
