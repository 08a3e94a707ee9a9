/// Configuration for the k-means engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of assignment passes.
    /// `None` runs until a pass changes no assignment, however long that takes.
    pub max_iters: Option<usize>,

    /// Random seed for centroid initialization.
    /// `None` draws a fresh seed from the operating system on every run.
    pub seed: Option<u64>,

    /// Log per-iteration progress at `info` instead of `debug`
    pub verbose: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            max_iters: None,
            seed: None,
            verbose: false,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = Some(max_iters);
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
