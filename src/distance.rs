use crate::element::Element;
use crate::numeric::Distance;
use ndarray::{Array1, ArrayView1};

/// Find the centroid nearest to `sample`
///
/// Linear scan over all centroids; on equal distances the lowest index wins.
///
/// # Returns
/// * `(index, distance)` - Index of the nearest centroid and its squared distance
///
/// # Panics
/// Panics if `centroids` is empty.
#[inline]
pub fn find_nearest_centroid<T: Element>(
    centroids: &ArrayView1<T>,
    sample: &T,
) -> (usize, T::Distance) {
    let mut best_label = 0;
    let mut best_dist = T::distance(&centroids[0], sample);

    for (j, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = T::distance(centroid, sample);
        if dist < best_dist {
            best_dist = dist;
            best_label = j;
        }
    }

    (best_label, best_dist)
}

/// Assign every sample to its nearest centroid
///
/// # Returns
/// * `labels` - Cluster assignment for each sample (n_samples,)
/// * `distances` - Squared distance from each sample to its centroid (n_samples,)
pub fn assign_labels<T: Element>(
    samples: &ArrayView1<T>,
    centroids: &ArrayView1<T>,
) -> (Array1<usize>, Array1<T::Distance>) {
    let mut labels = Array1::zeros(samples.len());
    let mut distances = Array1::from_elem(samples.len(), T::Distance::default());

    for ((sample, label), dist) in samples
        .iter()
        .zip(labels.iter_mut())
        .zip(distances.iter_mut())
    {
        (*label, *dist) = find_nearest_centroid(centroids, sample);
    }

    (labels, distances)
}

/// Sum of squared distances from each sample to the centroid it is labelled with
pub fn compute_objective<T: Element>(
    samples: &ArrayView1<T>,
    centroids: &ArrayView1<T>,
    labels: &ArrayView1<usize>,
) -> f64 {
    samples
        .iter()
        .zip(labels.iter())
        .map(|(sample, &label)| T::distance(&centroids[label], sample).to_f64())
        .sum()
}
