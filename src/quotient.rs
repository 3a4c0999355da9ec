//! # Quotient similarity
//!
//! Reduces an `N×N` similarity matrix to a `G×G` matrix over the `G` groups of
//! a partition of its rows.
//!
//! ## Algorithm (two passes of row aggregation)
//!
//! 1. **Rows**: every group's rows are reduced to one row with the
//!    aggregation; the `G` rows are stacked in partition order (`G×N`)
//! 2. **Columns**: the intermediate matrix is transposed (`N×G`) and reduced
//!    again with the same partition (`G×G`)
//! 3. **Finalisation**: diagonal forced to `diag_value` (if any), explicit
//!    zeros eliminated
//!
//! Entry `(i, j)` of the result is the aggregate of all original entries
//! between group `i` and group `j`. With `sum` this is the adjacency matrix of
//! the weighted quotient graph.
//!
//! Each group is one unit of parallel work; pass 2 starts only after every
//! group of pass 1 is done.
//!
//! The engine assumes a symmetric input and does not check it; see
//! `simscale_core::sparse::is_symmetric`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, info, trace};
use simscale_core::partition::validate_row_partition;
use simscale_core::sparse::{
    as_csr, dense_to_csvec, dense_to_sparse, eliminate_zeros, set_diag, stack_rows, transpose,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::{CsMat, CsVec};

use crate::error::{SimResult, SimScaleError};
use crate::executor::{ExecutionStrategy, Executor, Parallelism};

/// Caller-supplied aggregation: `(matrix, index_block) -> 1×ncols row`
pub type AggFn = Arc<dyn Fn(&CsMat<f64>, &[usize]) -> SimResult<CsVec<f64>> + Send + Sync>;

/// Names accepted by `Aggregation::from_str`
pub const AGGREGATION_NAMES: [&str; 5] = ["sum", "min", "max", "mean", "getnnz"];

/// Reduction applied to the rows of a group
#[derive(Clone)]
pub enum Aggregation {
    Sum,
    Min,
    Max,
    Mean,
    /// Number of non-zero entries per column
    CountNonZero,
    Custom(AggFn),
}

impl Aggregation {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CsMat<f64>, &[usize]) -> SimResult<CsVec<f64>> + Send + Sync + 'static,
    {
        Aggregation::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Mean => "mean",
            Aggregation::CountNonZero => "getnnz",
            Aggregation::Custom(_) => "custom",
        }
    }

    /// Built-ins that keep a symmetric input symmetric
    pub fn preserves_symmetry(&self) -> bool {
        matches!(
            self,
            Aggregation::Sum | Aggregation::Min | Aggregation::Max | Aggregation::Mean
        )
    }

    /// Reduce the rows `group` of the CSR matrix `m` to a single row.
    pub fn aggregate(&self, m: &CsMat<f64>, group: &[usize]) -> SimResult<CsVec<f64>> {
        let (rows, cols) = m.shape();
        if let Some(&bad) = group.iter().find(|&&r| r >= rows) {
            return Err(SimScaleError::Validation(format!(
                "row index {} out of bounds for {} rows",
                bad, rows
            )));
        }

        if let Aggregation::Custom(f) = self {
            let row = f(m, group)?;
            if row.dim() != cols {
                return Err(SimScaleError::Shape(format!(
                    "custom aggregation returned a row of dimension {}, expected {}",
                    row.dim(),
                    cols
                )));
            }
            return Ok(row);
        }

        Ok(dense_to_csvec(&self.reduce_dense(m, group)))
    }

    /// Built-in reductions over a dense accumulator of length `cols`.
    ///
    /// Implicit zeros take part in `min`, `max` and `mean`: a column with
    /// fewer stored entries than rows in the group also "sees" a 0.
    fn reduce_dense(&self, m: &CsMat<f64>, group: &[usize]) -> Vec<f64> {
        let cols = m.cols();
        if group.is_empty() {
            return vec![0.0; cols];
        }

        let mut acc = match self {
            Aggregation::Min => vec![f64::INFINITY; cols],
            Aggregation::Max => vec![f64::NEG_INFINITY; cols],
            _ => vec![0.0; cols],
        };
        let mut stored = vec![0usize; cols];

        for &r in group {
            let row = match m.outer_view(r) {
                Some(row) => row,
                None => continue,
            };
            for (j, &v) in row.iter() {
                stored[j] += 1;
                match self {
                    Aggregation::Sum | Aggregation::Mean => acc[j] += v,
                    Aggregation::Min => acc[j] = acc[j].min(v),
                    Aggregation::Max => acc[j] = acc[j].max(v),
                    Aggregation::CountNonZero => {
                        if v != 0.0 {
                            acc[j] += 1.0;
                        }
                    }
                    Aggregation::Custom(_) => {}
                }
            }
        }

        let len = group.len();
        match self {
            Aggregation::Min | Aggregation::Max => {
                for (a, &s) in acc.iter_mut().zip(stored.iter()) {
                    if s < len {
                        *a = if matches!(self, Aggregation::Min) {
                            a.min(0.0)
                        } else {
                            a.max(0.0)
                        };
                    }
                }
            }
            Aggregation::Mean => {
                let scale = 1.0 / len as f64;
                acc.iter_mut().for_each(|a| *a *= scale);
            }
            _ => {}
        }

        acc
    }
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aggregation::{}", self.name())
    }
}

impl FromStr for Aggregation {
    type Err = SimScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Aggregation::Sum),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "mean" => Ok(Aggregation::Mean),
            "getnnz" | "count_nonzero" => Ok(Aggregation::CountNonZero),
            other => Err(SimScaleError::Config(format!(
                "unknown aggregation `{}`: pick one of ({}) or specify a function",
                other,
                AGGREGATION_NAMES.join(", ")
            ))),
        }
    }
}

/// Parameters of [`quotient_similarity`]
#[derive(Debug, Clone)]
pub struct QuotientParams {
    pub agg: Aggregation,
    pub diag_value: Option<f64>, // forced diagonal of the G×G result
    pub check: bool,             // validate the partition before computing
    pub parallelism: Parallelism,
}

impl Default for QuotientParams {
    fn default() -> Self {
        Self {
            agg: Aggregation::Sum,
            diag_value: None,
            check: false,
            parallelism: Parallelism::default(),
        }
    }
}

/// Aggregate the rows of `m` group by group, in partition order (`G × ncols`).
pub fn merge_row_partition(
    m: &CsMat<f64>,
    partition: &[Vec<usize>],
    agg: &Aggregation,
    parallelism: Parallelism,
) -> SimResult<CsMat<f64>> {
    let executor = ExecutionStrategy::from_parallelism(parallelism)?;
    merge_row_partition_with(m, partition, agg, &executor)
}

/// Same as [`merge_row_partition`] with an explicit executor.
pub fn merge_row_partition_with<E: Executor>(
    m: &CsMat<f64>,
    partition: &[Vec<usize>],
    agg: &Aggregation,
    executor: &E,
) -> SimResult<CsMat<f64>> {
    let csr = as_csr(m);
    let matrix: &CsMat<f64> = &csr;

    let groups: Vec<&[usize]> = partition.iter().map(|g| g.as_slice()).collect();
    let rows = executor.try_map(groups, |group| {
        trace!("Aggregating group of {} rows", group.len());
        agg.aggregate(matrix, group)
    })?;

    Ok(stack_rows(&rows, matrix.cols())?)
}

/// Group-by-group similarity of `m` under `partition`.
///
/// # Errors
///
/// - `Shape` if `m` is not square
/// - `Validation` if `params.check` is set and `partition` is not a partition
///   of `[0, rows - 1]`, or (always) if an index is out of bounds
/// - `Config` for zero workers
/// - whatever a custom aggregation returns
///
/// # Examples
///
/// ```
/// use simscale::executor::Parallelism;
/// use simscale::quotient::{quotient_similarity, QuotientParams};
/// use sprs::TriMat;
///
/// let mut t = TriMat::new((3, 3));
/// t.add_triplet(0, 1, 0.5);
/// t.add_triplet(1, 0, 0.5);
/// t.add_triplet(1, 2, 0.25);
/// t.add_triplet(2, 1, 0.25);
/// let m = t.to_csr();
///
/// let params = QuotientParams { check: true, parallelism: Parallelism::Sequential, ..Default::default() };
/// let q = quotient_similarity(&m, &[vec![0, 1], vec![2]], &params).unwrap();
///
/// assert_eq!(q.shape(), (2, 2));
/// assert_eq!(q.get(0, 0), Some(&1.0));
/// assert_eq!(q.get(0, 1), Some(&0.25));
/// ```
pub fn quotient_similarity(
    m: &CsMat<f64>,
    partition: &[Vec<usize>],
    params: &QuotientParams,
) -> SimResult<CsMat<f64>> {
    let executor = ExecutionStrategy::from_parallelism(params.parallelism)?;
    quotient_similarity_with(m, partition, params, &executor)
}

/// Dense input: converted to CSR, then as [`quotient_similarity`].
pub fn quotient_similarity_dense(
    m: &DenseMatrix<f64>,
    partition: &[Vec<usize>],
    params: &QuotientParams,
) -> SimResult<CsMat<f64>> {
    quotient_similarity(&dense_to_sparse(m), partition, params)
}

/// Same as [`quotient_similarity`] with an explicit executor.
pub fn quotient_similarity_with<E: Executor>(
    m: &CsMat<f64>,
    partition: &[Vec<usize>],
    params: &QuotientParams,
    executor: &E,
) -> SimResult<CsMat<f64>> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(SimScaleError::Shape(format!(
            "similarity matrix must be square, got {}x{}",
            rows, cols
        )));
    }

    info!(
        "Computing quotient similarity: {} items into {} groups ({})",
        rows,
        partition.len(),
        params.agg.name()
    );
    debug!(
        "Quotient parameters: diag_value={:?}, check={}, workers={}",
        params.diag_value,
        params.check,
        executor.degree()
    );

    if params.check {
        validate_row_partition(partition, rows)?;
        debug!("Partition validated over [0, {})", rows);
    }

    let start = std::time::Instant::now();

    // Pass 1: rows (G×N)
    let merged_rows = merge_row_partition_with(m, partition, &params.agg, executor)?;
    debug!(
        "Row aggregation: {}x{} with {} non-zeros in {:?}",
        merged_rows.rows(),
        merged_rows.cols(),
        merged_rows.nnz(),
        start.elapsed()
    );

    // Pass 2: columns, by aggregating the rows of the transpose (N×G → G×G)
    let transposed = transpose(&merged_rows);
    let mut result = merge_row_partition_with(&transposed, partition, &params.agg, executor)?;

    if let Some(diag) = params.diag_value {
        result = set_diag(&result, diag);
    }
    let result = eliminate_zeros(&result);

    info!(
        "Built quotient matrix ({}x{}) with {} non-zeros in {:?}",
        result.rows(),
        result.cols(),
        result.nnz(),
        start.elapsed()
    );

    Ok(result)
}
