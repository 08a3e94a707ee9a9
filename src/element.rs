use crate::numeric::{channel_extrema, extrema_by_stride, Channel, Distance};
use ndarray::ArrayView1;
use rand::Rng;
use std::fmt::Debug;

/// Per-channel minimum and maximum of a sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

/// Everything the clustering engine needs to know about the type it clusters.
///
/// Implemented for every [`Channel`] scalar (grey levels) and for `[C; 2]`
/// and `[C; 3]` vectors of channels (two-channel chroma, RGB/Lab colors).
/// All operations are stateless; randomness comes from the caller's generator.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Type of a squared distance between two elements
    type Distance: Distance;

    /// Per-channel extrema of `samples`, computed independently for each
    /// channel. `None` if `samples` is empty.
    fn bounds(samples: &ArrayView1<Self>) -> Option<Bounds<Self>>;

    /// Element whose channels are drawn independently and uniformly within `bounds`
    fn random_sample<R: Rng + ?Sized>(bounds: &Bounds<Self>, rng: &mut R) -> Self;

    /// Squared Euclidean distance, computed in the widened [`Self::Distance`] type
    fn distance(a: &Self, b: &Self) -> Self::Distance;

    /// Per-channel arithmetic mean. An empty input yields the zero element.
    fn mean<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a;
}

macro_rules! impl_scalar_element {
    ($($t:ty),* $(,)?) => {$(
        impl Element for $t {
            type Distance = <$t as Channel>::Distance;

            fn bounds(samples: &ArrayView1<Self>) -> Option<Bounds<Self>> {
                let (min, max) = channel_extrema(samples.iter().copied())?;
                Some(Bounds { min, max })
            }

            #[inline]
            fn random_sample<R: Rng + ?Sized>(bounds: &Bounds<Self>, rng: &mut R) -> Self {
                <$t>::sample_between(bounds.min, bounds.max, rng)
            }

            #[inline]
            fn distance(a: &Self, b: &Self) -> <$t as Channel>::Distance {
                let d = a.widen() - b.widen();
                d * d
            }

            fn mean<'a, I>(samples: I) -> Self
            where
                I: IntoIterator<Item = &'a Self>,
                Self: 'a,
            {
                let (sum, count) = samples
                    .into_iter()
                    .fold((<<$t as Channel>::Accumulator>::default(), 0usize), |(sum, count), &v| {
                        (sum + v.accumulate(), count + 1)
                    });
                <$t>::mean_from(sum, count)
            }
        }
    )*};
}

impl_scalar_element!(u8, u16, u32, i8, i16, i32, f32, f64);

// Shared bodies of the 2- and 3-channel impls below.

fn vector_bounds<C: Channel, const N: usize>(samples: &ArrayView1<[C; N]>) -> Option<Bounds<[C; N]>> {
    let first = *samples.iter().next()?;
    let (mut min, mut max) = (first, first);

    for channel in 0..N {
        // Contiguous views are scanned as one interleaved buffer
        let (lo, hi) = match samples.as_slice() {
            Some(contiguous) => extrema_by_stride(contiguous.as_flattened(), channel, N),
            None => channel_extrema(samples.iter().map(|s| s[channel])),
        }?;
        min[channel] = lo;
        max[channel] = hi;
    }

    Some(Bounds { min, max })
}

fn vector_random_sample<C: Channel, R: Rng + ?Sized, const N: usize>(
    bounds: &Bounds<[C; N]>,
    rng: &mut R,
) -> [C; N] {
    std::array::from_fn(|channel| {
        C::sample_between(bounds.min[channel], bounds.max[channel], rng)
    })
}

#[inline]
fn vector_distance<C: Channel, const N: usize>(a: &[C; N], b: &[C; N]) -> C::Distance {
    a.iter()
        .zip(b)
        .fold(C::Distance::default(), |acc, (&x, &y)| {
            let d = x.widen() - y.widen();
            acc + d * d
        })
}

fn vector_mean<'a, C: Channel, const N: usize>(
    samples: impl IntoIterator<Item = &'a [C; N]>,
) -> [C; N] {
    let mut sums = [C::Accumulator::default(); N];
    let mut count = 0usize;

    for sample in samples {
        for (sum, &v) in sums.iter_mut().zip(sample) {
            *sum = *sum + v.accumulate();
        }
        count += 1;
    }

    sums.map(|sum| C::mean_from(sum, count))
}

macro_rules! impl_vector_element {
    ($($n:literal),* $(,)?) => {$(
        impl<C: Channel> Element for [C; $n] {
            type Distance = C::Distance;

            fn bounds(samples: &ArrayView1<Self>) -> Option<Bounds<Self>> {
                vector_bounds(samples)
            }

            fn random_sample<R: Rng + ?Sized>(bounds: &Bounds<Self>, rng: &mut R) -> Self {
                vector_random_sample(bounds, rng)
            }

            #[inline]
            fn distance(a: &Self, b: &Self) -> C::Distance {
                vector_distance(a, b)
            }

            fn mean<'a, I>(samples: I) -> Self
            where
                I: IntoIterator<Item = &'a Self>,
                Self: 'a,
            {
                vector_mean(samples)
            }
        }
    )*};
}

impl_vector_element!(2, 3);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, s, Array1};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scalar_bounds() {
        let samples = arr1(&[7u8, 3, 250, 12]);
        let bounds = u8::bounds(&samples.view()).unwrap();

        assert_eq!(bounds, Bounds { min: 3, max: 250 });
    }

    #[test]
    fn test_bounds_of_empty_input() {
        let samples: Array1<f32> = Array1::from_vec(vec![]);
        assert!(f32::bounds(&samples.view()).is_none());

        let samples: Array1<[u8; 3]> = Array1::from_vec(vec![]);
        assert!(<[u8; 3]>::bounds(&samples.view()).is_none());
    }

    #[test]
    fn test_vector_bounds_are_per_channel() {
        let samples = arr1(&[[10u8, 200, 5], [40, 100, 6], [20, 150, 1]]);
        let bounds = <[u8; 3]>::bounds(&samples.view()).unwrap();

        // Neither corner is one of the samples
        assert_eq!(bounds.min, [10, 100, 1]);
        assert_eq!(bounds.max, [40, 200, 6]);
    }

    #[test]
    fn test_vector_bounds_on_strided_view() {
        let samples = arr1(&[[0i16, 9], [100, -100], [5, 4], [-50, 50]]);
        // Every other row: [0, 9] and [5, 4]
        let every_other = samples.slice(s![..;2]);
        let bounds = <[i16; 2]>::bounds(&every_other).unwrap();

        assert_eq!(bounds.min, [0, 4]);
        assert_eq!(bounds.max, [5, 9]);
    }

    #[test]
    fn test_random_sample_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let bounds = Bounds {
            min: [10u8, 0, 128],
            max: [20, 255, 128],
        };

        for _ in 0..500 {
            let v = <[u8; 3]>::random_sample(&bounds, &mut rng);
            assert!((10..=20).contains(&v[0]));
            assert_eq!(v[2], 128);
        }
    }

    #[test]
    fn test_distance_widens_unsigned_channels() {
        assert_eq!(u8::distance(&0, &255), 65_025);
        assert_eq!(u8::distance(&255, &0), 65_025);
        assert_eq!(<[u8; 3]>::distance(&[0, 0, 0], &[255, 255, 255]), 3 * 65_025);
        assert_eq!(<[u16; 2]>::distance(&[3, 0], &[0, 4]), 25);
    }

    #[test]
    fn test_float_distance() {
        assert_relative_eq!(<[f32; 2]>::distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_relative_eq!(f64::distance(&-1.5, &1.5), 9.0);
    }

    #[test]
    fn test_scalar_mean_rounds() {
        assert_eq!(u8::mean(&[1, 2, 3, 4, 5]), 3);
        assert_eq!(u8::mean(&[0, 1, 0, 1]), 1);
        assert_eq!(u8::mean(&[255, 255, 254]), 255);
    }

    #[test]
    fn test_vector_mean() {
        let samples = [[0u8, 10, 255], [1, 20, 255], [2, 31, 253]];
        assert_eq!(<[u8; 3]>::mean(&samples), [1, 20, 254]);

        let samples = [[0.0f32, 1.0], [1.0, 3.0]];
        let mean = <[f32; 2]>::mean(&samples);
        assert_relative_eq!(mean[0], 0.5);
        assert_relative_eq!(mean[1], 2.0);
    }

    #[test]
    fn test_mean_of_empty_subset_is_zero() {
        let empty: [[u8; 2]; 0] = [];
        assert_eq!(<[u8; 2]>::mean(&empty), [0, 0]);
        assert_eq!(i32::mean(&[] as &[i32]), 0);
    }
}
