//! Cluster the rows of a .npy matrix
//!
//! Reads an `(n_samples, n_channels)` f32 array with 1, 2 or 3 channels,
//! clusters the rows, and saves the centroids `(k, n_channels)` and the
//! labels `(n_samples,)` as .npy files. A run that hits the iteration cap
//! still saves its partial result, then exits with status 2.
//!
//! Usage: `cluster-npy <input.npy> <centroids.npy> <labels.npy> <k> [seed] [max_iters]`

use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use typedkmeans_rs::{cluster_with_config, Element, KMeansConfig, KMeansError, KMeansResult};

/// Centroids and labels ready to be written, plus the convergence flag
#[derive(Debug)]
struct Outcome {
    centroids: Array2<f32>,
    labels: Array1<i64>,
    converged: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if !(5..=7).contains(&args.len()) {
        eprintln!(
            "Usage: {} <input.npy> <centroids.npy> <labels.npy> <k> [seed] [max_iters]",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let centroids_path = &args[2];
    let labels_path = &args[3];
    let k: usize = args[4].parse()?;

    let mut config = KMeansConfig::new(k).with_verbose(true);
    if let Some(seed) = args.get(5) {
        config = config.with_seed(seed.parse()?);
    }
    if let Some(max_iters) = args.get(6) {
        config = config.with_max_iters(max_iters.parse()?);
    }

    // Read input data
    let reader = BufReader::new(File::open(input_path)?);
    let data: Array2<f32> = Array2::read_npy(reader)?;

    info!(
        "Loaded data: {} samples x {} channels",
        data.nrows(),
        data.ncols()
    );

    let outcome = cluster_rows(&data.view(), &config)?;

    outcome
        .centroids
        .write_npy(BufWriter::new(File::create(centroids_path)?))?;
    outcome
        .labels
        .write_npy(BufWriter::new(File::create(labels_path)?))?;

    info!(
        "Saved centroids {:?} to {} and labels to {}",
        outcome.centroids.shape(),
        centroids_path,
        labels_path
    );

    if !outcome.converged {
        warn!("Result did not converge; saved the last iteration");
        std::process::exit(2);
    }

    Ok(())
}

/// Cluster the rows of `data`, picking the element shape from the column count
fn cluster_rows(data: &ArrayView2<f32>, config: &KMeansConfig) -> Result<Outcome, Box<dyn Error>> {
    if data.iter().any(|v| !v.is_finite()) {
        return Err("input contains NaN or infinite values".into());
    }

    match data.ncols() {
        1 => run(data, config, |row| row[0], |c| vec![*c]),
        2 => run(data, config, |row| [row[0], row[1]], |c| c.to_vec()),
        3 => run(data, config, |row| [row[0], row[1], row[2]], |c| c.to_vec()),
        n => Err(format!("expected 1, 2 or 3 channels, got {}", n).into()),
    }
}

fn run<T: Element>(
    data: &ArrayView2<f32>,
    config: &KMeansConfig,
    from_row: impl Fn(ArrayView1<f32>) -> T,
    to_row: impl Fn(&T) -> Vec<f32>,
) -> Result<Outcome, Box<dyn Error>> {
    let samples: Array1<T> = data.rows().into_iter().map(from_row).collect();

    let (result, converged): (KMeansResult<T>, bool) =
        match cluster_with_config(&samples.view(), config) {
            Ok(result) => (result, true),
            Err(KMeansError::NonConvergence(partial)) => (*partial, false),
            Err(err) => return Err(err.into()),
        };

    let n_channels = data.ncols();
    let centroids = Array2::from_shape_vec(
        (result.centroids.len(), n_channels),
        result.centroids.iter().flat_map(&to_row).collect(),
    )?;
    let labels = result.labels.mapv(|label| label as i64);

    Ok(Outcome {
        centroids,
        labels,
        converged,
    })
}
