//! # Truncated sparse similarity
//!
//! Builds an `N×N` sparse similarity matrix from a dense `N×D` dataset
//! without ever holding the dense `N×N` result.
//!
//! ## Algorithm
//!
//! 1. **Preparation**: for `cosine`, every row is normalised to unit L2 norm
//!    once; the prepared dataset is shared read-only by all workers
//! 2. **Blocks**: `[0, N)` is split into contiguous blocks of `block_size` rows
//!    (the last one may be shorter); each block is one unit of parallel work
//! 3. **Block similarity**: each block is compared against the *entire*
//!    dataset, producing a dense `block_size × N` buffer
//! 4. **Truncation**: entries below `thresh` are zeroed, or with `binary`
//!    every entry becomes `1` (≥ thresh) or `0`
//! 5. **Sparsification**: each buffer becomes a CSR block, zeros dropped
//! 6. **Stacking**: blocks are stacked row-wise in block order
//! 7. **Finalisation**: diagonal forced to `diag_value` (if any), explicit
//!    zeros eliminated
//!
//! Peak memory per worker is `O(block_size × N)`; larger blocks amortise the
//! per-block overhead at the price of memory.
//!
//! ## Metrics
//!
//! - `cosine`: dot product of unit-norm rows, in `[-1, 1]`
//! - `hamming`: `(A·Bᵗ + (1−A)·(1−B)ᵗ) / D`, the fraction of matching
//!   positions for 0/1 data, in `[0, 1]`
//! - custom: any `Fn(block_rows, full_dataset) -> block_rows × N` buffer

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, info, trace, warn};
use simscale_core::distance::{cosine_block, hamming_block};
use simscale_core::sparse::{dense_block_to_csr, eliminate_zeros, empty, set_diag};
use simscale_core::Dataset;
use sprs::CsMat;

use crate::error::{SimResult, SimScaleError};
use crate::executor::{ExecutionStrategy, Executor, Parallelism};

/// Caller-supplied similarity: `(block_rows, full_dataset) -> row-major block_rows × N`
pub type MetricFn = Arc<dyn Fn(&Dataset, &Dataset) -> SimResult<Vec<f64>> + Send + Sync>;

/// Similarity metric
#[derive(Clone)]
pub enum Metric {
    Cosine,
    Hamming,
    Custom(MetricFn),
}

impl Metric {
    /// Wrap a closure as a custom metric
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Dataset, &Dataset) -> SimResult<Vec<f64>> + Send + Sync + 'static,
    {
        Metric::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Hamming => "hamming",
            Metric::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Metric::{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = SimScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            "hamming" => Ok(Metric::Hamming),
            other => Err(SimScaleError::Config(format!(
                "invalid metric `{}`: use one of the built-in options (cosine, hamming) or a custom function",
                other
            ))),
        }
    }
}

/// Parameters of [`truncated_sparse_similarity`]
#[derive(Debug, Clone)]
pub struct SimilarityParams {
    pub metric: Metric,
    pub block_size: usize,      // rows per unit of parallel work
    pub thresh: Option<f64>,    // lower cutoff, `None` keeps every value
    pub diag_value: Option<f64>, // forced diagonal, `None` leaves it as computed
    pub binary: bool,           // 1/0 instead of raw similarities
    pub parallelism: Parallelism,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            metric: Metric::Hamming,
            block_size: 1,
            thresh: Some(0.9),
            diag_value: Some(0.0),
            binary: false,
            parallelism: Parallelism::default(),
        }
    }
}

impl SimilarityParams {
    pub fn validate(&self) -> SimResult<()> {
        if self.block_size == 0 {
            return Err(SimScaleError::Config(
                "block_size must be a positive integer".to_string(),
            ));
        }
        if let Some(t) = self.thresh {
            if t.is_nan() {
                return Err(SimScaleError::Config("thresh must not be NaN".to_string()));
            }
        }
        if matches!(self.parallelism, Parallelism::Workers(0)) {
            return Err(SimScaleError::Config(
                "parallelism must use at least one worker".to_string(),
            ));
        }
        Ok(())
    }
}

/// Threshold/binarisation policy applied to each block
#[derive(Debug, Clone, Copy)]
struct Truncation {
    thresh: Option<f64>,
    binary: bool,
}

impl Truncation {
    #[inline]
    fn apply(&self, v: f64) -> f64 {
        match (self.thresh, self.binary) {
            (Some(t), true) => {
                if v >= t {
                    1.0
                } else {
                    0.0
                }
            }
            (Some(t), false) => {
                if v < t {
                    0.0
                } else {
                    v
                }
            }
            // no threshold: any computed, non-zero similarity counts
            (None, true) => {
                if v != 0.0 && !v.is_nan() {
                    1.0
                } else {
                    0.0
                }
            }
            (None, false) => v,
        }
    }
}

/// Contiguous row blocks covering `[0, n)`
pub fn block_ranges(n: usize, block_size: usize) -> Vec<Range<usize>> {
    (0..n)
        .step_by(block_size.max(1))
        .map(|start| start..(start + block_size).min(n))
        .collect()
}

/// Sparse, thresholded similarity of every row of `dataset` against every row.
///
/// # Errors
///
/// - `Config` for a zero block size, a NaN threshold or zero workers
/// - `Shape` for a dataset with rows but no columns, or a custom metric
///   returning a buffer of the wrong length
/// - `Compute` (or whatever it returns) when a custom metric fails
///
/// Any error aborts the whole computation; partial blocks are discarded.
///
/// # Examples
///
/// ```
/// use simscale::similarity::{truncated_sparse_similarity, Metric, SimilarityParams};
/// use simscale::executor::Parallelism;
/// use simscale_core::Dataset;
///
/// let dataset = Dataset::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.1], vec![0.0, 1.0]]).unwrap();
/// let params = SimilarityParams {
///     metric: Metric::Cosine,
///     thresh: Some(0.5),
///     diag_value: None,
///     parallelism: Parallelism::Sequential,
///     ..Default::default()
/// };
///
/// let sim = truncated_sparse_similarity(&dataset, &params).unwrap();
/// assert_eq!(sim.shape(), (3, 3));
/// assert!(sim.get(0, 2).is_none());
/// ```
pub fn truncated_sparse_similarity(
    dataset: &Dataset,
    params: &SimilarityParams,
) -> SimResult<CsMat<f64>> {
    params.validate()?;
    let executor = ExecutionStrategy::from_parallelism(params.parallelism)?;
    truncated_sparse_similarity_with(dataset, params, &executor)
}

/// Same as [`truncated_sparse_similarity`] with an explicit executor.
pub fn truncated_sparse_similarity_with<E: Executor>(
    dataset: &Dataset,
    params: &SimilarityParams,
    executor: &E,
) -> SimResult<CsMat<f64>> {
    params.validate()?;
    let (n, d) = dataset.shape();

    info!(
        "Computing {} similarity for {} items with {} features",
        params.metric.name(),
        n,
        d
    );
    debug!(
        "Similarity parameters: block_size={}, thresh={:?}, diag_value={:?}, binary={}, workers={}",
        params.block_size,
        params.thresh,
        params.diag_value,
        params.binary,
        executor.degree()
    );

    if n == 0 {
        return Ok(empty(0, 0));
    }
    if d == 0 {
        return Err(SimScaleError::Shape(format!(
            "dataset has {} rows but no columns",
            n
        )));
    }
    if matches!(params.metric, Metric::Hamming) && !dataset.is_binary() {
        warn!("Hamming similarity expects 0/1 data; values outside {{0, 1}} found");
    }

    let start = std::time::Instant::now();

    // Step 1: shared, read-only preparation
    let normalised = match params.metric {
        Metric::Cosine => Some(dataset.normalised_rows()),
        _ => None,
    };

    // Step 2-5: per-block similarity, truncation and sparsification
    let blocks = block_ranges(n, params.block_size);
    let truncation = Truncation {
        thresh: params.thresh,
        binary: params.binary,
    };
    trace!("Dispatching {} blocks", blocks.len());

    let sparse_blocks: Vec<CsMat<f64>> = executor.try_map(blocks, |range| {
        let rows: Vec<usize> = range.clone().collect();
        let mut values = match &params.metric {
            Metric::Cosine => cosine_block(normalised.as_ref().unwrap_or(dataset), &rows),
            Metric::Hamming => hamming_block(dataset, &rows),
            Metric::Custom(f) => {
                let block = dataset.select_rows(&rows)?;
                let values = f(&block, dataset)?;
                if values.len() != rows.len() * n {
                    return Err(SimScaleError::Shape(format!(
                        "custom metric returned {} values for a {}x{} block",
                        values.len(),
                        rows.len(),
                        n
                    )));
                }
                values
            }
        };

        values.iter_mut().for_each(|v| *v = truncation.apply(*v));
        trace!("Block {:?} computed", range);

        Ok(dense_block_to_csr(&values, rows.len(), n)?)
    })?;
    debug!("Block computation time: {:?}", start.elapsed());

    // Step 6: stack in block order
    let views: Vec<_> = sparse_blocks.iter().map(|b| b.view()).collect();
    let mut sim: CsMat<f64> = sprs::vstack(&views);

    // Step 7: finalise
    if let Some(diag) = params.diag_value {
        sim = set_diag(&sim, diag);
    }
    let sim = eliminate_zeros(&sim);

    info!(
        "Built sparse similarity matrix ({}x{}) with {} non-zeros in {:?}",
        sim.rows(),
        sim.cols(),
        sim.nnz(),
        start.elapsed()
    );

    Ok(sim)
}
