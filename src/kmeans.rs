use crate::algorithm::{lloyd, make_rng, KMeansResult};
use crate::config::KMeansConfig;
use crate::distance::assign_labels;
use crate::element::Element;
use crate::error::KMeansError;
use ndarray::{Array1, ArrayView1};
use rand::Rng;

/// Cluster `samples` into `k` groups with an entropy-seeded generator.
///
/// Returns `k` centroids and one label in `0..k` per sample. Runs until
/// convergence with no iteration cap.
///
/// # Errors
///
/// - [`KMeansError::EmptyInput`] if `samples` is empty
/// - [`KMeansError::InvalidClusterCount`] unless `1 <= k <= samples.len()`
pub fn cluster<T: Element>(
    samples: &ArrayView1<T>,
    k: usize,
) -> Result<KMeansResult<T>, KMeansError<T>> {
    cluster_with_config(samples, &KMeansConfig::new(k))
}

/// Cluster `samples` with a custom configuration.
///
/// A configured seed makes the run reproducible. Each call owns its own
/// generator, so concurrent calls are independent.
///
/// # Errors
///
/// As [`cluster`], plus [`KMeansError::NonConvergence`] with the partial
/// result when `config.max_iters` passes run without converging.
pub fn cluster_with_config<T: Element>(
    samples: &ArrayView1<T>,
    config: &KMeansConfig,
) -> Result<KMeansResult<T>, KMeansError<T>> {
    let mut rng = make_rng(config.seed);
    lloyd(samples, config, &mut rng)
}

/// Cluster `samples` drawing initial centroids from a caller-supplied generator.
///
/// `config.seed` is ignored.
pub fn cluster_with_rng<T: Element, R: Rng + ?Sized>(
    samples: &ArrayView1<T>,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<KMeansResult<T>, KMeansError<T>> {
    lloyd(samples, config, rng)
}

/// Lloyd's k-means over any [`Element`] type.
///
/// # Example
///
/// ```
/// use typedkmeans_rs::KMeans;
/// use ndarray::arr1;
///
/// let grey = arr1(&[3u8, 5, 4, 200, 210, 205]);
///
/// let mut kmeans = KMeans::new(2);
/// kmeans.train(&grey.view()).unwrap();
///
/// let labels = kmeans.predict(&arr1(&[0u8, 255]).view()).unwrap();
/// assert_ne!(labels[0], labels[1]);
/// ```
pub struct KMeans<T: Element> {
    /// Model configuration
    config: KMeansConfig,

    /// Result of the last successful training run
    result: Option<KMeansResult<T>>,
}

impl<T: Element> KMeans<T> {
    /// Create a new model with default configuration and `k` clusters.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a new model with custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            result: None,
        }
    }

    /// Train the model on the given samples.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `samples` is empty
    /// - k is 0 or larger than the number of samples
    /// - the iteration cap was reached (the model keeps its previous state;
    ///   the partial result travels in the error)
    pub fn train(&mut self, samples: &ArrayView1<T>) -> Result<(), KMeansError<T>> {
        let result = cluster_with_config(samples, &self.config)?;
        self.result = Some(result);
        Ok(())
    }

    /// Fit the model to the samples.
    ///
    /// Equivalent to `train()`, returning `&mut Self` for method chaining.
    pub fn fit(&mut self, samples: &ArrayView1<T>) -> Result<&mut Self, KMeansError<T>> {
        self.train(samples)?;
        Ok(self)
    }

    /// Label each sample with its nearest trained centroid.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::NotFitted`] if the model has not been trained.
    pub fn predict(&self, samples: &ArrayView1<T>) -> Result<Array1<usize>, KMeansError<T>> {
        let centroids = self.centroids().ok_or(KMeansError::NotFitted)?;
        let (labels, _) = assign_labels(samples, &centroids.view());
        Ok(labels)
    }

    /// Fit the model and label the training samples in one call.
    pub fn fit_predict(
        &mut self,
        samples: &ArrayView1<T>,
    ) -> Result<Array1<usize>, KMeansError<T>> {
        self.train(samples)?;
        self.predict(samples)
    }

    /// Centroids of the fitted model, `None` before training.
    pub fn centroids(&self) -> Option<&Array1<T>> {
        self.result.as_ref().map(|r| &r.centroids)
    }

    /// Labels of the training samples, `None` before training.
    pub fn labels(&self) -> Option<&Array1<usize>> {
        self.result.as_ref().map(|r| &r.labels)
    }

    /// Full result of the last training run.
    pub fn result(&self) -> Option<&KMeansResult<T>> {
        self.result.as_ref()
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_kmeans_new() {
        let kmeans = KMeans::<u8>::new(10);
        assert_eq!(kmeans.k(), 10);
        assert!(kmeans.centroids().is_none());
        assert!(kmeans.labels().is_none());
    }

    #[test]
    fn test_kmeans_train() {
        let samples = arr1(&[[0.0f32, 0.0], [0.1, 0.2], [5.0, 5.0], [5.2, 4.9]]);
        let mut kmeans = KMeans::with_config(KMeansConfig::new(2).with_seed(1));

        kmeans.train(&samples.view()).unwrap();

        assert_eq!(kmeans.centroids().unwrap().len(), 2);
        assert_eq!(kmeans.labels().unwrap().len(), 4);
        assert!(kmeans.result().unwrap().converged);
    }

    #[test]
    fn test_kmeans_fit_predict_matches_training_labels() {
        let samples = arr1(&[10u16, 12, 11, 900, 905, 910, 450]);
        let mut kmeans = KMeans::with_config(KMeansConfig::new(3).with_seed(5));

        let labels = kmeans.fit_predict(&samples.view()).unwrap();

        assert_eq!(&labels, kmeans.labels().unwrap());
    }

    #[test]
    fn test_kmeans_predict_before_fit() {
        let kmeans = KMeans::<[u8; 3]>::new(2);
        let result = kmeans.predict(&arr1(&[[1u8, 2, 3]]).view());
        assert!(matches!(result, Err(KMeansError::NotFitted)));
    }

    #[test]
    fn test_kmeans_k_zero() {
        let mut kmeans = KMeans::new(0);
        let result = kmeans.train(&arr1(&[1i32, 2, 3]).view());
        assert!(matches!(
            result,
            Err(KMeansError::InvalidClusterCount { k: 0, .. })
        ));
        assert!(kmeans.centroids().is_none());
    }

    #[test]
    fn test_cluster_with_rng_matches_seeded_config() {
        let samples = arr1(&[1i8, -100, 3, 90, -95, 88, 0]);
        let config = KMeansConfig::new(3).with_seed(77);

        let seeded = cluster_with_config(&samples.view(), &config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let injected = cluster_with_rng(&samples.view(), &config, &mut rng).unwrap();

        assert_eq!(seeded, injected);
    }
}
