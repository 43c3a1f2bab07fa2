//! Numeric reductions.
//!
//! Sum, average, min, max, median and mode are available on sequences of the
//! primitive integer and float types. Sums are accumulated without drift: integer
//! kinds add exactly in `i128` and float kinds use Neumaier-compensated summation.

use std::cmp::Ordering;

use ahash::AHashMap;
use num_traits::ToPrimitive;
use quarry_common::{Error, Result};

use crate::Sequence;

/// Family a [`Numeric`] type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Signed,
    Unsigned,
    Float,
}

/// Element types the numeric reductions accept.
///
/// Implemented for `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32` and `f64`.
pub trait Numeric: Copy + PartialOrd + ToPrimitive + Send + Sync + sealed::Sealed + 'static {
    const KIND: NumericKind;

    /// A value that is equal for equal numbers and different otherwise. Float
    /// zeros share one key.
    #[doc(hidden)]
    fn frequency_key(self) -> u64;

    #[doc(hidden)]
    fn is_nan(self) -> bool;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_integer {
    ($kind:ident: $($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Numeric for $t {
            const KIND: NumericKind = NumericKind::$kind;

            #[inline]
            fn frequency_key(self) -> u64 {
                self as i64 as u64
            }

            #[inline]
            fn is_nan(self) -> bool {
                false
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Numeric for $t {
            const KIND: NumericKind = NumericKind::Float;

            #[inline]
            fn frequency_key(self) -> u64 {
                if self == 0.0 { 0 } else { (self as f64).to_bits() }
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }
    )*};
}

impl_integer!(Signed: i8, i16, i32, i64, isize);
impl_integer!(Unsigned: u8, u16, u32, u64, usize);
impl_float!(f32, f64);

/// Running total that stays exact for integers as long as `i128` allows.
#[derive(Default)]
struct Accumulator {
    exact: i128,
    inexact: Option<FloatSum>,
    count: usize,
}

impl Accumulator {
    fn add<T: Numeric>(&mut self, value: T) {
        self.count += 1;
        if let Some(sum) = self.inexact.as_mut() {
            sum.add(value.to_f64().unwrap_or(f64::NAN));
            return;
        }
        let next = match T::KIND {
            NumericKind::Float => None,
            NumericKind::Signed | NumericKind::Unsigned => value
                .to_i128()
                .and_then(|v| self.exact.checked_add(v)),
        };
        match next {
            Some(next) => self.exact = next,
            None => {
                let mut sum = FloatSum::default();
                sum.add(self.exact as f64);
                sum.add(value.to_f64().unwrap_or(f64::NAN));
                self.inexact = Some(sum);
            }
        }
    }

    fn total(&self) -> f64 {
        match &self.inexact {
            Some(sum) => sum.total(),
            None => self.exact as f64,
        }
    }

    fn mean(&self) -> f64 {
        match &self.inexact {
            Some(sum) => sum.mean(self.count),
            None => self.exact as f64 / self.count as f64,
        }
    }
}

/// `2^512`. Magnitudes at or above it are summed scaled down by this factor.
const LARGE: f64 = f64::from_bits(0x5ff0_0000_0000_0000);
/// `2^-512`.
const LARGE_INV: f64 = f64::from_bits(0x1ff0_0000_0000_0000);

/// Compensated float sum split by magnitude, so an intermediate total can exceed
/// `f64::MAX` as long as the final one does not.
#[derive(Default)]
struct FloatSum {
    small: NeumaierSum,
    large: NeumaierSum,
}

impl FloatSum {
    fn add(&mut self, value: f64) {
        if value.abs() >= LARGE {
            self.large.add(value * LARGE_INV);
        } else {
            self.small.add(value);
        }
    }

    fn total(&self) -> f64 {
        self.large.total() * LARGE + self.small.total()
    }

    fn mean(&self, count: usize) -> f64 {
        let n = count as f64;
        self.large.total() / n * LARGE + self.small.total() / n
    }
}

#[derive(Default)]
struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if t.is_finite() {
            if self.sum.abs() >= value.abs() {
                self.compensation += (self.sum - t) + value;
            } else {
                self.compensation += (value - t) + self.sum;
            }
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        if self.sum.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }
}

impl<'a, T: Numeric> Sequence<'a, T> {
    /// Sum of all elements; `0.0` for an empty sequence.
    ///
    /// The result is infinite only when the exact sum lies outside the `f64`
    /// range, not when a running total would.
    pub fn sum(&self) -> f64 {
        self.accumulate().total()
    }

    /// Arithmetic mean. Fails with `EmptyCollection` on an empty sequence.
    pub fn average(&self) -> Result<f64> {
        let acc = self.accumulate();
        if acc.count == 0 {
            return Err(Error::empty_collection("average"));
        }
        Ok(acc.mean())
    }

    /// Smallest element. NaNs are ignored unless nothing else is present.
    pub fn min(&self) -> Result<T> {
        self.extreme(Ordering::Less)
            .ok_or_else(|| Error::empty_collection("min"))
    }

    /// Largest element. NaNs are ignored unless nothing else is present.
    pub fn max(&self) -> Result<T> {
        self.extreme(Ordering::Greater)
            .ok_or_else(|| Error::empty_collection("max"))
    }

    /// Middle element of the sorted sequence, or the mean of the two middle
    /// elements when the length is even. NaNs are excluded; a sequence of only
    /// NaNs has a NaN median.
    pub fn median(&self) -> Result<f64> {
        let mut items = self.to_vec();
        if items.is_empty() {
            return Err(Error::empty_collection("median"));
        }
        items.retain(|v| !v.is_nan());
        if items.is_empty() {
            return Ok(f64::NAN);
        }
        items.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mid = items.len() / 2;
        let at = |i: usize| items[i].to_f64().unwrap_or(f64::NAN);
        if items.len() % 2 == 1 {
            Ok(at(mid))
        } else {
            Ok((at(mid - 1) + at(mid)) / 2.0)
        }
    }

    /// Most frequent element. Among equally frequent elements the one seen first
    /// wins.
    pub fn mode(&self) -> Result<T> {
        // key -> (frequency, first position, value)
        let mut counts: AHashMap<u64, (usize, usize, T)> = AHashMap::new();
        for (position, item) in self.iter().enumerate() {
            counts
                .entry(item.frequency_key())
                .and_modify(|entry| entry.0 += 1)
                .or_insert((1, position, item));
        }
        counts
            .into_values()
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, _, value)| value)
            .ok_or_else(|| Error::empty_collection("mode"))
    }

    fn accumulate(&self) -> Accumulator {
        let mut acc = Accumulator::default();
        for item in self.iter() {
            acc.add(item);
        }
        acc
    }

    fn extreme(&self, wanted: Ordering) -> Option<T> {
        self.iter().fold(None, |best, item| match best {
            None => Some(item),
            Some(current) if current.is_nan() && !item.is_nan() => Some(item),
            Some(current) if item.partial_cmp(&current) == Some(wanted) => Some(item),
            keep => keep,
        })
    }
}
