//! Tests for input validation.

use mls_rs::internals::algorithms::solver::SupportRadius;
use mls_rs::internals::engine::validator::Validator;
use mls_rs::internals::math::neighborhood::KnnQuery;
use mls_rs::internals::primitives::errors::{ErrorKind, MlsError};

#[test]
fn test_validate_dimensions() {
    assert!(Validator::validate_dimensions(3, 3).is_ok());
    assert_eq!(
        Validator::validate_dimensions(2, 3),
        Err(MlsError::DimensionMismatch {
            source_dim: 2,
            target_dim: 3
        })
    );
    assert_eq!(
        Validator::validate_dimensions(0, 0),
        Err(MlsError::EmptyDimension)
    );
}

#[test]
fn test_validate_neighbor_count() {
    assert!(Validator::validate_neighbor_count(1, 1).is_ok());
    assert!(Validator::validate_neighbor_count(5, 10).is_ok());
    assert_eq!(
        Validator::validate_neighbor_count(0, 10),
        Err(MlsError::InvalidNeighborCount { k: 0, n: 10 })
    );
    assert_eq!(
        Validator::validate_neighbor_count(11, 10),
        Err(MlsError::InvalidNeighborCount { k: 11, n: 10 })
    );
    assert_eq!(
        Validator::validate_neighbor_count(1, 0),
        Err(MlsError::InvalidNeighborCount { k: 1, n: 0 })
    );
}

#[test]
fn test_validate_support_radius() {
    assert!(Validator::validate_support_radius(&SupportRadius::<f64>::default()).is_ok());
    assert!(Validator::validate_support_radius(&SupportRadius::Fixed(0.3_f64)).is_ok());
    assert_eq!(
        Validator::validate_support_radius(&SupportRadius::Fixed(0.0_f64)),
        Err(MlsError::InvalidSupportRadius(0.0))
    );
    assert_eq!(
        Validator::validate_support_radius(&SupportRadius::FarthestNeighbor { scale: -2.0_f64 }),
        Err(MlsError::InvalidSupportRadius(-2.0))
    );
    assert!(
        Validator::validate_support_radius(&SupportRadius::Fixed(f64::INFINITY)).is_err()
    );
}

#[test]
fn test_validate_rcond() {
    assert!(Validator::validate_rcond(0.0_f64).is_ok());
    assert!(Validator::validate_rcond(1e-10_f64).is_ok());
    assert_eq!(
        Validator::validate_rcond(1.0_f64),
        Err(MlsError::InvalidRcond(1.0))
    );
    assert_eq!(
        Validator::validate_rcond(-0.5_f64),
        Err(MlsError::InvalidRcond(-0.5))
    );
    assert!(Validator::validate_rcond(f64::NAN).is_err());
}

#[test]
fn test_validate_threads() {
    assert!(Validator::validate_threads(None).is_ok());
    assert!(Validator::validate_threads(Some(4)).is_ok());
    let err = Validator::validate_threads(Some(0)).unwrap_err();
    assert!(matches!(err, MlsError::ExecutionContext(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_validate_no_duplicates() {
    assert!(Validator::validate_no_duplicates(None).is_ok());
    assert_eq!(
        Validator::validate_no_duplicates(Some("neighbors")),
        Err(MlsError::DuplicateParameter {
            parameter: "neighbors"
        })
    );
}

#[test]
fn test_validate_query() {
    let good = KnnQuery::uniform(vec![0, 1, 1, 2], 2, 2);
    assert!(Validator::validate_query(&good, 2, 2, 3).is_ok());

    // Wrong target count
    assert!(Validator::validate_query(&good, 3, 2, 3).is_err());
    // Wrong k
    assert!(Validator::validate_query(&good, 2, 1, 3).is_err());
    // Index out of range
    assert!(Validator::validate_query(&good, 2, 2, 2).is_err());

    let decreasing = KnnQuery {
        indices: vec![0, 1],
        offsets: vec![2, 0],
    };
    assert!(matches!(
        Validator::validate_query(&decreasing, 1, 2, 3),
        Err(MlsError::MalformedQuery(_))
    ));

    let overflowing = KnnQuery {
        indices: vec![0, 1],
        offsets: vec![1, 3],
    };
    assert!(Validator::validate_query(&overflowing, 1, 2, 3).is_err());
}

#[test]
fn test_validate_query_ignores_padding() {
    // Segments are indices[1..3] and indices[3..5]; the ends are sentinels.
    let padded = KnnQuery {
        indices: vec![usize::MAX, 0, 2, 1, 2, usize::MAX],
        offsets: vec![1, 3, 5],
    };
    assert!(Validator::validate_query(&padded, 2, 2, 3).is_ok());

    let bad_segment = KnnQuery {
        indices: vec![usize::MAX, 0, 2, 1, 3, usize::MAX],
        offsets: vec![1, 3, 5],
    };
    assert!(matches!(
        Validator::validate_query(&bad_segment, 2, 2, 3),
        Err(MlsError::MalformedQuery(msg)) if msg.contains("target 1")
    ));
}

#[test]
fn test_validate_field_len() {
    assert!(Validator::validate_field_len(4, 4).is_ok());
    assert_eq!(
        Validator::validate_field_len(4, 3),
        Err(MlsError::SourceLengthMismatch {
            expected: 4,
            got: 3
        })
    );
}
