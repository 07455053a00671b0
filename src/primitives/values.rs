//! Field value types accepted by `interpolate`.
//!
//! A field value is anything that can be accumulated as a weighted sum of
//! source values. Scalars are supported in both precisions; fixed-size
//! arrays transfer vector fields component-wise with the same weights.

use num_traits::AsPrimitive;

/// A value that can be formed as `Σ wⱼ · vⱼ` with weights of type `T`.
pub trait FieldValue<T>: Copy + Send + Sync {
    /// The additive identity.
    fn zeroed() -> Self;

    /// `self += weight * value`.
    fn add_scaled(&mut self, weight: T, value: Self);
}

impl<T: AsPrimitive<f64>> FieldValue<T> for f64 {
    #[inline]
    fn zeroed() -> Self {
        0.0
    }

    #[inline]
    fn add_scaled(&mut self, weight: T, value: Self) {
        *self += weight.as_() * value;
    }
}

impl<T: AsPrimitive<f32>> FieldValue<T> for f32 {
    #[inline]
    fn zeroed() -> Self {
        0.0
    }

    #[inline]
    fn add_scaled(&mut self, weight: T, value: Self) {
        *self += weight.as_() * value;
    }
}

impl<T: Copy, V: FieldValue<T>, const N: usize> FieldValue<T> for [V; N] {
    #[inline]
    fn zeroed() -> Self {
        [V::zeroed(); N]
    }

    #[inline]
    fn add_scaled(&mut self, weight: T, value: Self) {
        for (acc, v) in self.iter_mut().zip(value) {
            acc.add_scaled(weight, v);
        }
    }
}
