use std::fmt;

// Element — Compile-time numeric parametrization of buffers
//
// The router is type-oblivious: it only moves fixed-size contiguous blocks,
// and the one place it *reads* values (the selector) goes through f64. So
// the element type is a generic parameter resolved at compile time, not a
// runtime tag — Tensor<f32> and Tensor<f64> are distinct monomorphized
// types and there is no dynamic dispatch on dtype anywhere.

/// Trait implemented by numeric types that can be stored in a tensor.
///
/// Provides conversions to/from f64 (used when decoding selector values)
/// and a short name for diagnostics.
pub trait Element:
    Copy + Send + Sync + 'static + fmt::Debug + PartialEq + num_traits::NumCast
{
    /// Short lowercase type name for diagnostics (e.g. "f32").
    const NAME: &'static str;

    /// Convert this value to f64.
    fn to_f64(self) -> f64;

    /// Create a value of this type from f64.
    fn from_f64(v: f64) -> Self;

    /// The zero value.
    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    /// The one value.
    fn one() -> Self {
        Self::from_f64(1.0)
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Element for f64 {
    const NAME: &'static str = "f64";
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for half::f16 {
    const NAME: &'static str = "f16";
    fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }
}

impl Element for half::bf16 {
    const NAME: &'static str = "bf16";
    fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }
}
