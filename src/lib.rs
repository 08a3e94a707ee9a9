//! # typedkmeans-rs
//!
//! Lloyd's k-means clustering over strongly typed elements: grey levels,
//! two-channel and three-channel vectors (RGB, Lab, chroma pairs), with
//! integer or floating point channels.
//!
//! ## Features
//!
//! - **One engine, any element shape**: the loop is written once against the
//!   [`Element`] trait, implemented for scalars, `[C; 2]` and `[C; 3]`
//! - **Overflow-free integer arithmetic**: distances and sums are computed in
//!   widened signed types, so `u8` pixels never wrap
//! - **Empty-cluster recovery**: a cluster that loses all its members is
//!   reseeded with the sample farthest from its own centroid
//! - **Reproducible**: every run owns a ChaCha generator, seeded on request
//! - **ndarray compatible**: samples in as `ArrayView1`, results out as `Array1`
//!
//! ## Example
//!
//! ```rust
//! use typedkmeans_rs::{cluster_with_config, KMeansConfig};
//! use ndarray::arr1;
//!
//! let pixels = arr1(&[
//!     [12u8, 40, 200],
//!     [10, 38, 198],
//!     [250, 250, 240],
//!     [248, 251, 239],
//! ]);
//!
//! let config = KMeansConfig::new(2).with_seed(42).with_max_iters(100);
//! let result = cluster_with_config(&pixels.view(), &config).unwrap();
//!
//! assert_eq!(result.centroids.len(), 2);
//! assert_eq!(result.labels[0], result.labels[1]);
//! assert_ne!(result.labels[0], result.labels[2]);
//! ```
//!
//! ## Degenerate input
//!
//! With fewer distinct values than clusters, the spare clusters are
//! reseeded with the same sample on every iteration. The run still ends,
//! with every cluster populated:
//!
//! ```rust
//! use typedkmeans_rs::cluster;
//! use ndarray::arr1;
//!
//! let flat = arr1(&[5u8, 5, 5, 5]);
//! let result = cluster(&flat.view(), 2).unwrap();
//!
//! assert!(result.converged);
//! assert_eq!(result.centroids.to_vec(), vec![5, 5]);
//! assert_eq!(result.cluster_sizes(), vec![3, 1]);
//! ```
//!
//! ## Iteration cap
//!
//! With `max_iters` set, a run that has not settled in time returns its
//! partial result inside the error:
//!
//! ```rust
//! use typedkmeans_rs::{cluster_with_config, KMeansConfig, KMeansError};
//! use ndarray::arr1;
//!
//! let grey = arr1(&[0u8, 10, 200, 210]);
//! let config = KMeansConfig::new(2).with_seed(0).with_max_iters(1);
//!
//! match cluster_with_config(&grey.view(), &config) {
//!     Err(KMeansError::NonConvergence(partial)) => {
//!         assert_eq!(partial.n_iterations, 1);
//!         assert_eq!(partial.labels.len(), 4);
//!     }
//!     other => panic!("expected non-convergence, got {:?}", other),
//! }
//! ```
//!
//! Float samples must be finite.

mod algorithm;
mod config;
mod distance;
mod element;
mod error;
mod kmeans;
mod numeric;

pub use algorithm::{IterationStats, KMeansResult};
pub use config::KMeansConfig;
pub use distance::{assign_labels, compute_objective, find_nearest_centroid};
pub use element::{Bounds, Element};
pub use error::KMeansError;
pub use kmeans::{cluster, cluster_with_config, cluster_with_rng, KMeans};
pub use numeric::{Channel, Distance};
