//! Testing utilities for the Lab Desk workspace
//!
//! Shared fixtures for records and work trees.

#![allow(missing_docs)]

use chrono::NaiveDate;
use lab_records::Record;
use lab_workflow::{Assignment, Order, Sample, Test, TestStatus, WorkTree};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn assignment(assignee: &str) -> Assignment {
    Assignment::new(assignee, date(2024, 6, 30))
}

/// `count` records with `id` 1..=count and a matching `name`
pub fn numbered_records(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            Record::new()
                .with("id", i)
                .with("name", format!("Record {i}"))
        })
        .collect()
}

/// Three products priced 250, 200, 350 in that order
pub fn priced_records() -> Vec<Record> {
    vec![
        Record::new().with("name", "Beaker").with("price", 250.0),
        Record::new().with("name", "Flask").with("price", 200.0),
        Record::new().with("name", "Pipette").with("price", 350.0),
    ]
}

/// Records mixing numbers, numeric text, dates, blanks and nested objects
pub fn mixed_records() -> Vec<Record> {
    vec![
        Record::new()
            .with("code", "10")
            .with("received", date(2024, 3, 1))
            .with("client", Record::new().with("name", "Acme Labs")),
        Record::new()
            .with("code", 9.0)
            .with("received", "2024-01-15")
            .with("client", Record::new().with("name", "beta corp")),
        Record::new()
            .with("code", "alpha")
            .with("client", Record::new().with("name", "Gamma")),
        Record::new().with("received", date(2023, 12, 31)),
    ]
}

/// Two orders:
///
/// - `ORD-1` with sample `S-1` (tests `T-1`, `T-2`, `T-3`) and `S-2` (test `T-4`)
/// - `ORD-2` with sample `S-3` (test `T-5`, already completed)
pub fn sample_tree() -> WorkTree {
    let first = Order::new("ORD-1", "Acme Labs")
        .with_sample(
            Sample::new("S-1", "Groundwater")
                .with_test(Test::new("T-1", "pH"))
                .with_test(Test::new("T-2", "Lead"))
                .with_test(Test::new("T-3", "Nitrate")),
        )
        .with_sample(Sample::new("S-2", "Soil").with_test(Test::new("T-4", "Moisture")));

    let second = Order::new("ORD-2", "Beta Corp").with_sample(
        Sample::new("S-3", "Effluent").with_test(
            Test::new("T-5", "COD")
                .with_analyst("Priya", date(2024, 5, 1))
                .with_status(TestStatus::Completed),
        ),
    );

    WorkTree::from_orders([first, second]).unwrap()
}
