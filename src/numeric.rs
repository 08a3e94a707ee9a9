use rand::Rng;
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Value type of a squared distance.
///
/// Signed and wide enough that `(a - b)^2` summed over three channels
/// cannot wrap for any supported channel type.
pub trait Distance:
    Copy
    + PartialOrd
    + Debug
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Lossy conversion used for objective bookkeeping only
    fn to_f64(self) -> f64;
}

macro_rules! impl_distance {
    ($($t:ty),* $(,)?) => {$(
        impl Distance for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_distance!(i64, i128, f32, f64);

/// A single numeric channel of an element (a grey level, one color component, ...).
pub trait Channel: Copy + PartialOrd + Debug + Default + Send + Sync + 'static {
    /// Widened signed type distances are computed in
    type Distance: Distance;

    /// Widened type sums are accumulated in when computing a mean
    type Accumulator: Copy + Default + Add<Output = Self::Accumulator>;

    fn widen(self) -> Self::Distance;

    fn accumulate(self) -> Self::Accumulator;

    /// Mean of `count` values summing to `sum`.
    ///
    /// Integer channels round to nearest as `(sum + count / 2) / count`.
    /// Returns zero when `count` is zero.
    fn mean_from(sum: Self::Accumulator, count: usize) -> Self;

    /// Uniform draw from the closed range `[lo, hi]`
    fn sample_between<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self;
}

macro_rules! impl_integer_channel {
    ($($t:ty => $wide:ty),* $(,)?) => {$(
        impl Channel for $t {
            type Distance = $wide;
            type Accumulator = $wide;

            #[inline]
            fn widen(self) -> $wide {
                <$wide>::from(self)
            }

            #[inline]
            fn accumulate(self) -> $wide {
                <$wide>::from(self)
            }

            fn mean_from(sum: $wide, count: usize) -> Self {
                if count == 0 {
                    return 0;
                }
                let count = count as $wide;
                ((sum + count / 2) / count) as $t
            }

            fn sample_between<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
                if lo >= hi {
                    return lo;
                }
                rng.gen_range(lo..=hi)
            }
        }
    )*};
}

impl_integer_channel!(
    u8 => i64,
    u16 => i64,
    u32 => i128,
    i8 => i64,
    i16 => i64,
    i32 => i128,
);

macro_rules! impl_float_channel {
    ($($t:ty),* $(,)?) => {$(
        impl Channel for $t {
            type Distance = $t;
            type Accumulator = f64;

            #[inline]
            fn widen(self) -> $t {
                self
            }

            #[inline]
            fn accumulate(self) -> f64 {
                f64::from(self)
            }

            fn mean_from(sum: f64, count: usize) -> Self {
                if count == 0 {
                    return 0.0;
                }
                (sum / count as f64) as $t
            }

            /// Interpolates in `f64` with each end scaled separately, so ranges
            /// whose width overflows the channel type are still sampled.
            /// NaN bounds yield NaN.
            fn sample_between<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
                if lo >= hi {
                    return lo;
                }
                let t: f64 = rng.gen();
                let value = (f64::from(lo) * (1.0 - t) + f64::from(hi) * t) as $t;
                if value < lo {
                    lo
                } else if value > hi {
                    hi
                } else {
                    value
                }
            }
        }
    )*};
}

impl_float_channel!(f32, f64);

/// Minimum and maximum of a stream of channel values, `None` if it is empty
pub(crate) fn channel_extrema<C: Channel>(values: impl IntoIterator<Item = C>) -> Option<(C, C)> {
    let mut values = values.into_iter();
    let first = values.next()?;

    Some(values.fold((first, first), |(min, max), v| {
        (
            if v < min { v } else { min },
            if v > max { v } else { max },
        )
    }))
}

/// Extrema of every `stride`-th value of an interleaved buffer, starting at `offset`
#[inline]
pub(crate) fn extrema_by_stride<C: Channel>(
    values: &[C],
    offset: usize,
    stride: usize,
) -> Option<(C, C)> {
    channel_extrema(values.iter().skip(offset).step_by(stride).copied())
}
