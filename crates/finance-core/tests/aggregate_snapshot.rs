use finance_core::aggregate::{category_totals, totals};
use finance_core::load;
use finance_core::{aggregate, aggregate_with, AggregateOptions, BucketWindow, FinancialRecord};
use std::io::Write;

fn records(json: &str) -> Vec<FinancialRecord> {
    load::from_json_str(json).unwrap()
}

#[test]
fn test_food_example() {
    let input = records(
        r#"[
            {"date": "2024-01-01", "amount": 100, "category": "Food", "dataType": "expense"},
            {"date": "2024-01-01", "amount": -20, "category": "Food"}
        ]"#,
    );
    let result = aggregate(&input).unwrap();

    assert_eq!(result.category_totals.len(), 1);
    assert_eq!(result.category_totals[0].name, "Food");
    assert_eq!(result.category_totals[0].value, 120.0);
    assert_eq!(result.category_totals[0].count, 2);

    // Positive amount makes the first row income even though it is tagged expense
    assert_eq!(result.totals.income, 100.0);
    assert_eq!(result.totals.expense, 20.0);

    assert_eq!(result.time_buckets.len(), 1);
    assert_eq!(result.time_buckets[0].label, "Jan 1");
    assert_eq!(result.time_buckets[0].income, 100.0);
    assert_eq!(result.time_buckets[0].expense, 20.0);
}

#[test]
fn test_income_tag_overrides_sign() {
    let input = records(r#"[{"dataType": "income", "amount": -50}]"#);
    let result = aggregate(&input).unwrap();
    assert_eq!(result.totals.income, 50.0);
    assert_eq!(result.totals.expense, 0.0);
}

#[test]
fn test_untagged_sign_decides() {
    let input = records(r#"[{"amount": 30}, {"amount": -30}]"#);
    let result = aggregate(&input).unwrap();
    assert_eq!(result.totals.income, 30.0);
    assert_eq!(result.totals.expense, 30.0);
}

#[test]
fn test_category_sum_matches_grand_total() {
    let input = records(
        r#"[
            {"amount": 12.5, "category": "Salary", "data_type": "income"},
            {"amount": -40, "category": "Rent"},
            {"amount": "-7.25", "category": "Food"},
            {"amount": 0, "category": "Food"},
            {"amount": null},
            {"amount": -3, "category": "Rent", "data_type": "income"}
        ]"#,
    );
    let cats = category_totals(&input, usize::MAX);
    let grand = totals(&input);

    let category_sum: f64 = cats.iter().map(|c| c.value).sum();
    assert!((category_sum - (grand.income + grand.expense)).abs() < 1e-9);
    assert!(grand.income >= 0.0 && grand.expense >= 0.0);
}

#[test]
fn test_all_negative_and_all_positive_totals_non_negative() {
    let negative: Vec<_> = (1..=20)
        .map(|i| FinancialRecord {
            amount: Some(-(i as f64)),
            ..Default::default()
        })
        .collect();
    let positive: Vec<_> = negative
        .iter()
        .map(|r| FinancialRecord {
            amount: r.amount.map(|a| -a),
            ..Default::default()
        })
        .collect();

    let neg = aggregate(&negative).unwrap().totals;
    assert_eq!(neg.income, 0.0);
    assert_eq!(neg.expense, 210.0);

    let pos = aggregate(&positive).unwrap().totals;
    assert_eq!(pos.income, 210.0);
    assert_eq!(pos.expense, 0.0);
}

#[test]
fn test_view_sizes_are_capped() {
    let input: Vec<_> = (0..40)
        .map(|i| FinancialRecord {
            date: Some(format!("2024-{:02}-{:02}", 1 + i % 12, 1 + i % 28)),
            amount: Some(-1.0),
            category: Some(format!("cat-{}", i)),
            ..Default::default()
        })
        .collect();

    for window in [BucketWindow::InputOrder, BucketWindow::Chronological] {
        let options = AggregateOptions {
            window,
            ..Default::default()
        };
        let result = aggregate_with(&input, &options).unwrap();
        assert_eq!(result.category_totals.len(), 6);
        assert_eq!(result.time_buckets.len(), 10);
        assert_eq!(result.totals.expense, 40.0);
    }
}

#[test]
fn test_undated_record_only_in_totals() {
    let input = records(
        r#"[
            {"date": "2024-06-30", "amount": -10, "category": "Food"},
            {"date": "garbage", "amount": -99, "category": "Food"},
            {"amount": 5}
        ]"#,
    );
    let result = aggregate(&input).unwrap();

    let bucketed: f64 = result
        .time_buckets
        .iter()
        .map(|b| b.income + b.expense)
        .sum();
    assert_eq!(bucketed, 10.0);
    assert_eq!(result.totals.expense, 109.0);
    assert_eq!(result.totals.income, 5.0);
    assert_eq!(result.category_totals[0].value, 109.0);
    assert_eq!(result.category_totals[1].name, "Uncategorized");
}

#[test]
fn test_empty_file_is_no_data() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"[]").unwrap();

    let input = load::from_path(file.path()).unwrap();
    assert!(aggregate(&input).is_none());
}

#[test]
fn test_csv_export_round_into_aggregate() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "date,amount,category,data_type").unwrap();
    writeln!(file, "2024-02-02,-15,Food,expense").unwrap();
    writeln!(file, "2024-02-01,2500,Salary,income").unwrap();
    writeln!(file, "2024-02-01,-5,,").unwrap();

    let input = load::from_path(file.path()).unwrap();
    let result = aggregate(&input).unwrap();

    let names: Vec<_> = result.category_totals.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Food", "Salary", "Uncategorized"]);
    let labels: Vec<_> = result.time_buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["Feb 1", "Feb 2"]);
    assert_eq!(result.totals.income, 2500.0);
    assert_eq!(result.totals.expense, 20.0);
}
