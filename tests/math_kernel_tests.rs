//! Tests for the Wendland kernels.
//!
//! ## Test Organization
//!
//! 1. **Values** - Closed forms at known points
//! 2. **Support** - Zero outside the unit ball, continuity at the boundary
//! 3. **Selection** - Mapping from smoothness order

use approx::assert_relative_eq;

use mls_rs::internals::math::kernel::WeightFunction;
use mls_rs::internals::primitives::errors::MlsError;

const ALL: [WeightFunction; 4] = [
    WeightFunction::Wendland0,
    WeightFunction::Wendland2,
    WeightFunction::Wendland4,
    WeightFunction::Wendland6,
];

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_kernel_values_at_origin() {
    assert_relative_eq!(WeightFunction::Wendland0.evaluate(0.0_f64), 1.0);
    assert_relative_eq!(WeightFunction::Wendland2.evaluate(0.0_f64), 1.0);
    assert_relative_eq!(WeightFunction::Wendland4.evaluate(0.0_f64), 3.0);
    assert_relative_eq!(WeightFunction::Wendland6.evaluate(0.0_f64), 1.0);
}

#[test]
fn test_kernel_values_at_half() {
    let r = 0.5_f64;
    assert_relative_eq!(WeightFunction::Wendland0.evaluate(r), 0.25);
    assert_relative_eq!(WeightFunction::Wendland2.evaluate(r), 0.0625 * 3.0);
    assert_relative_eq!(
        WeightFunction::Wendland4.evaluate(r),
        0.5_f64.powi(6) * (35.0 * 0.25 + 9.0 + 3.0)
    );
    assert_relative_eq!(
        WeightFunction::Wendland6.evaluate(r),
        0.5_f64.powi(8) * (32.0 * 0.125 + 25.0 * 0.25 + 4.0 + 1.0)
    );
}

#[test]
fn test_kernel_symmetric_in_sign() {
    for wf in ALL {
        assert_relative_eq!(wf.evaluate(-0.3_f64), wf.evaluate(0.3_f64));
    }
}

#[test]
fn test_kernel_monotone_decreasing() {
    for wf in ALL {
        let mut prev = wf.evaluate(0.0_f64);
        for i in 1..100 {
            let v = wf.evaluate(i as f64 / 100.0);
            assert!(v > 0.0, "{} vanished inside support", wf.name());
            assert!(v < prev, "{} not decreasing at {}", wf.name(), i);
            prev = v;
        }
    }
}

// ============================================================================
// Support
// ============================================================================

#[test]
fn test_kernel_zero_outside_support() {
    for wf in ALL {
        assert_eq!(wf.evaluate(1.0_f64), 0.0);
        assert_eq!(wf.evaluate(1.5_f64), 0.0);
        assert_eq!(wf.evaluate(f64::INFINITY), 0.0);
    }
}

#[test]
fn test_kernel_continuous_at_boundary() {
    for wf in ALL {
        assert!(wf.evaluate(1.0_f64 - 1e-6) < 1e-10);
    }
}

#[test]
fn test_kernel_f32() {
    assert_relative_eq!(
        WeightFunction::Wendland2.evaluate(0.25_f32),
        0.75_f32.powi(4) * 2.0,
        epsilon = 1e-6
    );
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_from_smoothness() {
    for wf in ALL {
        assert_eq!(WeightFunction::from_smoothness(wf.smoothness()), Ok(wf));
    }
    for bad in [1, 3, 5, 8] {
        assert_eq!(
            WeightFunction::from_smoothness(bad),
            Err(MlsError::InvalidKernelOrder(bad))
        );
    }
}

#[test]
fn test_default_is_lowest_order() {
    assert_eq!(WeightFunction::default(), WeightFunction::Wendland0);
    assert_eq!(WeightFunction::default().name(), "Wendland0");
}
