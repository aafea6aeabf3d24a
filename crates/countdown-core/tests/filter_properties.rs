//! Property-based tests for the failure filter.
//!
//! Uses proptest to validate:
//! - Aggregates of only ignorable records report success
//! - Records of any other type always survive filtering
//! - Singular errors pass through unchanged
//! - Filtering is idempotent

use countdown_core::{filter_failure, AggregateFailure, ErrorRecord, ReleaseFailure, SingularError};
use proptest::prelude::*;

const TOKENS: &[&str] = &["issue", "pull", "pr"];

/// A path segment guaranteed to contain no ignorable token
fn neutral_segment() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_filter("must not mention issues or pull requests", |s| {
        !TOKENS.iter().any(|t| s.contains(t))
    })
}

/// A NOT_FOUND record whose path mentions an issue or pull request
fn ignorable_record() -> impl Strategy<Value = ErrorRecord> {
    (
        prop::collection::vec(neutral_segment(), 0..3),
        prop::sample::select(TOKENS.to_vec()),
        "[a-zA-Z]{0,6}",
        prop::collection::vec(neutral_segment(), 0..3),
    )
        .prop_map(|(before, token, suffix, after)| {
            let mut path = before;
            path.push(format!("{}{}", token, suffix));
            path.extend(after);
            ErrorRecord::not_found(path)
        })
}

/// A record whose type is not NOT_FOUND
fn other_type_record() -> impl Strategy<Value = ErrorRecord> {
    (
        "[A-Z_]{3,16}".prop_filter("must differ from NOT_FOUND", |t| t != "NOT_FOUND"),
        prop::collection::vec("[a-zA-Z]{1,10}", 0..4),
    )
        .prop_map(|(error_type, path)| ErrorRecord::new(error_type, path))
}

/// A NOT_FOUND record whose path holds no ignorable token
fn significant_not_found() -> impl Strategy<Value = ErrorRecord> {
    prop::collection::vec(neutral_segment(), 1..4)
        .prop_filter("joined path must not form a token", |path| {
            let joined = path.join(".");
            !TOKENS.iter().any(|t| joined.contains(t))
        })
        .prop_map(|path| ErrorRecord::not_found(path))
}

fn significant_record() -> impl Strategy<Value = ErrorRecord> {
    prop_oneof![other_type_record(), significant_not_found()]
}

fn aggregate(records: &[ErrorRecord]) -> ReleaseFailure {
    ReleaseFailure::Aggregate(AggregateFailure::new(records.to_vec()))
}

proptest! {
    /// Property: only ignorable records means the run is reported successful
    #[test]
    fn prop_all_ignorable_is_success(records in prop::collection::vec(ignorable_record(), 0..8)) {
        prop_assert_eq!(filter_failure(aggregate(&records), &records), None);
    }

    /// Property: a significant record is always kept, in order, without the noise
    #[test]
    fn prop_significant_records_survive(
        noise in prop::collection::vec(ignorable_record(), 0..5),
        significant in prop::collection::vec(significant_record(), 1..5),
    ) {
        let mut records = noise;
        records.extend(significant.iter().cloned());

        let result = filter_failure(aggregate(&records), &records);
        prop_assert!(result.is_some());
        let result = result.unwrap();
        prop_assert!(result.is_aggregate());
        prop_assert_eq!(result.errors(), significant.as_slice());
    }

    /// Property: singular errors are returned exactly as given
    #[test]
    fn prop_singular_unchanged(
        name in "[A-Za-z]{1,20}",
        message in ".{0,60}",
        records in prop::collection::vec(ignorable_record(), 0..4),
    ) {
        let error = ReleaseFailure::Singular(SingularError::new(name, message));
        prop_assert_eq!(filter_failure(error.clone(), &records), Some(error));
    }

    /// Property: filtering an already-filtered failure changes nothing
    #[test]
    fn prop_idempotent(
        noise in prop::collection::vec(ignorable_record(), 0..5),
        significant in prop::collection::vec(significant_record(), 0..5),
    ) {
        let mut records = significant;
        records.extend(noise);

        let once = filter_failure(aggregate(&records), &records);
        let twice = once
            .clone()
            .and_then(|failure| {
                let errors = failure.errors().to_vec();
                filter_failure(failure, &errors)
            });
        prop_assert_eq!(once, twice);
    }
}
