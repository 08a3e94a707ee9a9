use crate::config::KMeansConfig;
use crate::distance::find_nearest_centroid;
use crate::element::{Bounds, Element};
use crate::error::KMeansError;
use crate::numeric::Distance;
use log::{log, warn, Level};
use ndarray::{Array1, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Label held by every sample before the first assignment pass
const UNASSIGNED: usize = usize::MAX;

/// Bookkeeping for one assignment pass and the update that followed it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// 1-based pass number
    pub iteration: usize,
    /// Samples whose label changed during the assignment pass
    pub changed: usize,
    /// Sum of squared distances at the end of the assignment pass
    pub objective: f64,
    /// Empty clusters reseeded during the update
    pub recovered: usize,
}

/// Result of the k-means algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult<T> {
    pub centroids: Array1<T>,
    pub labels: Array1<usize>,
    /// Number of assignment passes run, including the final pass that
    /// confirms the labels; a run that is settled after its first pass reports 2
    pub n_iterations: usize,
    /// Whether the last iteration left the labels as the previous one did
    pub converged: bool,
    /// Objective of the last assignment pass
    pub objective: f64,
    pub history: Vec<IterationStats>,
}

impl<T> KMeansResult<T> {
    /// Number of samples assigned to each cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in self.labels.iter() {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Generator owned by a single run: seeded when a seed is configured,
/// from OS entropy otherwise.
pub(crate) fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Run Lloyd's algorithm
///
/// Centroids start uniformly random within the per-channel bounds of the
/// data. Each iteration assigns every sample to its nearest centroid, reseeds
/// empty clusters with far-off samples, then moves every centroid to the mean
/// of its members. The run ends once an iteration (assignment plus repairs)
/// leaves every label where the previous iteration left it, or fails with
/// [`KMeansError::NonConvergence`] once `config.max_iters` passes have run.
/// At least one pass always runs.
///
/// Repeating the same repair counts as settled: with fewer distinct values
/// than clusters, the reseeded sample falls back to the lowest tied centroid
/// on every pass and is stolen again by the same empty cluster.
///
/// Float samples must be finite; NaN or infinite channels give meaningless
/// centroids.
pub fn lloyd<T: Element, R: Rng + ?Sized>(
    samples: &ArrayView1<T>,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<KMeansResult<T>, KMeansError<T>> {
    let n_samples = samples.len();
    let k = config.k;

    // Validate inputs
    let bounds = T::bounds(samples).ok_or(KMeansError::EmptyInput)?;

    if k == 0 || k > n_samples {
        return Err(KMeansError::InvalidClusterCount { k, n_samples });
    }

    let level = if config.verbose {
        Level::Info
    } else {
        Level::Debug
    };
    log!(
        level,
        "Training k-means: {} samples, {} clusters, bounds {:?}..{:?}",
        n_samples,
        k,
        bounds.min,
        bounds.max
    );

    let mut centroids = initialize_centroids(&bounds, k, rng);
    let mut labels = Array1::from_elem(n_samples, UNASSIGNED);
    let mut settled = labels.clone();
    let mut distances = Array1::from_elem(n_samples, T::Distance::default());
    let mut history = Vec::new();

    loop {
        let iter_start = Instant::now();
        let iteration = history.len() + 1;

        let (changed, objective) =
            assign_step(samples, &centroids.view(), &mut labels, &mut distances);
        let recovered = recover_empty_clusters(&mut labels, &distances.view(), k);
        update_centroids(samples, &labels.view(), &mut centroids);

        history.push(IterationStats {
            iteration,
            changed,
            objective,
            recovered,
        });

        log!(
            level,
            "  Iteration {}: changed = {}, objective = {:.6}, time = {:.4}s",
            iteration,
            changed,
            objective,
            iter_start.elapsed().as_secs_f64()
        );
        if recovered > 0 {
            log!(level, "  Reseeded {} empty clusters", recovered);
        }

        // Same labels as after the previous repairs, so the same centroids too
        let converged = labels == settled;
        settled.assign(&labels);
        let capped = config.max_iters.is_some_and(|max| iteration >= max);

        if converged || capped {
            let result = KMeansResult {
                centroids,
                labels,
                n_iterations: iteration,
                converged,
                objective,
                history,
            };

            if converged {
                log!(
                    level,
                    "  Converged after {} iterations (objective {:.6})",
                    iteration,
                    objective
                );
                return Ok(result);
            }

            warn!(
                "k-means stopped at the iteration cap ({}) before converging",
                iteration
            );
            return Err(KMeansError::NonConvergence(Box::new(result)));
        }
    }
}

/// Draw `k` centroids uniformly within `bounds`
fn initialize_centroids<T: Element, R: Rng + ?Sized>(
    bounds: &Bounds<T>,
    k: usize,
    rng: &mut R,
) -> Array1<T> {
    (0..k).map(|_| T::random_sample(bounds, rng)).collect()
}

/// Relabel every sample with its nearest centroid, recording the distance to it.
///
/// Returns the number of changed labels and the objective of the new labelling.
fn assign_step<T: Element>(
    samples: &ArrayView1<T>,
    centroids: &ArrayView1<T>,
    labels: &mut Array1<usize>,
    distances: &mut Array1<T::Distance>,
) -> (usize, f64) {
    let mut changed = 0;
    let mut objective = 0.0;

    for ((sample, label), dist) in samples
        .iter()
        .zip(labels.iter_mut())
        .zip(distances.iter_mut())
    {
        let (nearest, d) = find_nearest_centroid(centroids, sample);
        objective += d.to_f64();
        *dist = d;

        if nearest != *label {
            changed += 1;
            *label = nearest;
        }
    }

    (changed, objective)
}

/// Give every empty cluster one sample, in ascending cluster order.
///
/// Each empty cluster takes the sample farthest from the centroid it was
/// assigned to in the last pass (first one on ties). Only samples whose
/// cluster still has two or more members are eligible, so a sample is never
/// taken twice and no donor is left empty. Returns the number of clusters
/// reseeded.
fn recover_empty_clusters<D: Distance>(
    labels: &mut Array1<usize>,
    distances: &ArrayView1<D>,
    k: usize,
) -> usize {
    let mut sizes = vec![0usize; k];
    for &label in labels.iter() {
        sizes[label] += 1;
    }

    let mut recovered = 0;
    for cluster in 0..k {
        if sizes[cluster] > 0 {
            continue;
        }

        // With k <= n_samples some cluster always has two members while another is empty
        let Some(outlier) = farthest_donor(&labels.view(), distances, &sizes) else {
            break;
        };

        sizes[labels[outlier]] -= 1;
        sizes[cluster] += 1;
        labels[outlier] = cluster;
        recovered += 1;
    }

    recovered
}

fn farthest_donor<D: Distance>(
    labels: &ArrayView1<usize>,
    distances: &ArrayView1<D>,
    sizes: &[usize],
) -> Option<usize> {
    let mut best: Option<(usize, D)> = None;

    for (i, (&label, &dist)) in labels.iter().zip(distances.iter()).enumerate() {
        if sizes[label] < 2 {
            continue;
        }
        if best.map_or(true, |(_, best_dist)| dist > best_dist) {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Move each centroid to the mean of the samples labelled with it
fn update_centroids<T: Element>(
    samples: &ArrayView1<T>,
    labels: &ArrayView1<usize>,
    centroids: &mut Array1<T>,
) {
    for (cluster, centroid) in centroids.iter_mut().enumerate() {
        *centroid = T::mean(
            samples
                .iter()
                .zip(labels.iter())
                .filter(|&(_, &label)| label == cluster)
                .map(|(sample, _)| sample),
        );
    }
}
