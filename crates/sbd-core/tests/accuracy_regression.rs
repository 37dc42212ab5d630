//! Scenario tests for the shape-based distance with deterministic model stubs.

mod common;

use approx::assert_relative_eq;
use sbd_core::{Group, Partition, SbdError, distance_flat};

use common::{Predict, StubFactory, swap_groups};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn partition(n1: usize, n1_total: usize, n2: usize, n2_total: usize) -> Partition {
    Partition::new(n1, n1_total, n2, n2_total).expect("valid test partition")
}

#[rustfmt::skip]
const IDENTITY_4: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

// ---------------------------------------------------------------------------
// a) perfect self-predictor gives zero
// ---------------------------------------------------------------------------

#[test]
fn perfect_fit_on_identity_is_zero() {
    let result = distance_flat(
        &IDENTITY_4,
        &partition(2, 2, 2, 2),
        &StubFactory(Predict::OwnBlock),
    )
    .unwrap();
    assert_eq!(result.first_term, 0.0);
    assert_eq!(result.second_term, 0.0);
    assert_eq!(result.distance.value(), 0.0);
}

// ---------------------------------------------------------------------------
// b) pass-through prediction on identity compares each diagonal block to zeros
// ---------------------------------------------------------------------------

#[test]
fn pass_through_on_identity() {
    let result = distance_flat(
        &IDENTITY_4,
        &partition(2, 2, 2, 2),
        &StubFactory(Predict::PassThrough),
    )
    .unwrap();
    assert_relative_eq!(result.first_term, 0.5);
    assert_relative_eq!(result.second_term, 0.5);
    assert_relative_eq!(result.distance.value(), 1.0);
}

// ---------------------------------------------------------------------------
// c) zeros against ones in both groups
// ---------------------------------------------------------------------------

#[test]
fn zero_own_blocks_against_unit_cross_blocks() {
    #[rustfmt::skip]
    let x = [
        0.0, 0.0, 1.0, 1.0,
        0.0, 0.0, 1.0, 1.0,
        1.0, 1.0, 0.0, 0.0,
        1.0, 1.0, 0.0, 0.0,
    ];
    let result = distance_flat(&x, &partition(2, 2, 2, 2), &StubFactory(Predict::PassThrough))
        .unwrap();
    assert_relative_eq!(result.first_term, 1.0);
    assert_relative_eq!(result.second_term, 1.0);
    assert_relative_eq!(result.distance.value(), 2.0);
}

// ---------------------------------------------------------------------------
// d) no cross-domain variation gives a zero group term
// ---------------------------------------------------------------------------

#[test]
fn identical_own_and_cross_blocks_give_zero_term() {
    #[rustfmt::skip]
    let x = [
        3.0, 4.0, 3.0, 4.0,
        5.0, 6.0, 5.0, 6.0,
        9.0, 9.0, 1.0, 2.0,
        9.0, 9.0, 3.0, 4.0,
    ];
    let result = distance_flat(&x, &partition(2, 2, 2, 2), &StubFactory(Predict::PassThrough))
        .unwrap();
    assert_eq!(result.first_term, 0.0);
    assert!(result.second_term > 0.0);
}

// ---------------------------------------------------------------------------
// e) minimal groups
// ---------------------------------------------------------------------------

#[test]
fn single_row_groups_are_finite() {
    let x = [3.0, 5.0, 7.0, 2.0];
    let result = distance_flat(&x, &partition(1, 1, 1, 1), &StubFactory(Predict::PassThrough))
        .unwrap();
    assert_relative_eq!(result.first_term, 4.0);
    assert_relative_eq!(result.second_term, 25.0);
    assert!(result.distance.value().is_finite());
}

// ---------------------------------------------------------------------------
// f) unequal group sizes with row-mean prediction
// ---------------------------------------------------------------------------

#[test]
fn unequal_groups_row_mean() {
    // n1 = 1, n1_total = 2, n2 = 2, n2_total = 1
    #[rustfmt::skip]
    let x = [
        1.0, 3.0, 6.0,
        2.0, 4.0, 0.0,
        8.0, 8.0, 5.0,
    ];
    let result = distance_flat(&x, &partition(1, 2, 2, 1), &StubFactory(Predict::RowMean))
        .unwrap();
    // group 1: fitted [1, 3], predicted [6, 6] -> (25 + 9) / 2
    assert_relative_eq!(result.first_term, 17.0);
    // group 2: fitted [0, 5], predicted [3, 8] -> (9 + 9) / 2
    assert_relative_eq!(result.second_term, 9.0);
}

// ---------------------------------------------------------------------------
// g) relabeling the groups gives the same distance
// ---------------------------------------------------------------------------

#[test]
fn swapping_groups_preserves_distance() {
    let p = partition(2, 3, 1, 2);
    let x: Vec<f64> = (0..15).map(|v| ((v * 7) % 11) as f64).collect();
    let factory = StubFactory(Predict::RowMean);

    let forward = distance_flat(&x, &p, &factory).unwrap();
    let backward = distance_flat(&swap_groups(&x, &p), &p.swapped(), &factory).unwrap();

    assert_eq!(forward.first_term, backward.second_term);
    assert_eq!(forward.second_term, backward.first_term);
    assert_eq!(forward.distance, backward.distance);
}

// ---------------------------------------------------------------------------
// h) dimension and model errors
// ---------------------------------------------------------------------------

#[test]
fn short_buffer_is_invalid_dimensions() {
    let result = distance_flat(
        &IDENTITY_4[..15],
        &partition(2, 2, 2, 2),
        &StubFactory(Predict::OwnBlock),
    );
    assert!(matches!(
        result,
        Err(SbdError::InvalidDimensions {
            expected: 16,
            got: 15
        })
    ));
}

#[test]
fn pass_through_with_mismatched_cross_block_fails_for_group() {
    // xy is 1x2 while the first model's output is 1x1.
    let x = [0.0, 1.0, 1.0, 2.0, 2.0, 2.0];
    let result = distance_flat(&x, &partition(1, 1, 1, 2), &StubFactory(Predict::PassThrough));
    assert!(matches!(
        result,
        Err(SbdError::Fit {
            group: Group::First,
            ..
        })
    ));
}

// ---------------------------------------------------------------------------
// i) finite group terms whose sum overflows
// ---------------------------------------------------------------------------

#[test]
fn overflowing_total_is_an_error() {
    // Each term is 1.69e308, finite on its own; the sum is not.
    let x = [0.0, 1.3e154, 1.3e154, 0.0];
    let result = distance_flat(&x, &partition(1, 1, 1, 1), &StubFactory(Predict::PassThrough));
    match result {
        Err(SbdError::NonFiniteDistance {
            first_term,
            second_term,
        }) => {
            assert!(first_term.is_finite());
            assert!(second_term.is_finite());
        }
        other => panic!("expected NonFiniteDistance, got {other:?}"),
    }
}

#[test]
fn large_cross_block_mean_stays_finite() {
    // Two squares of 1.69e308 would overflow if summed before dividing.
    let x = [0.0, 0.0, 1.3e154, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let result = distance_flat(&x, &partition(1, 2, 2, 1), &StubFactory(Predict::RowMean));
    let result = result.unwrap();
    assert_relative_eq!(result.first_term, 1.3e154 * 1.3e154, max_relative = 1e-12);
    assert_eq!(result.second_term, 0.0);
    assert!(result.distance.value().is_finite());
}
