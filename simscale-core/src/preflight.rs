// simscale-core/src/preflight.rs
//! Preflight stage: turn a grid of dynamic cells into a `Dataset`
//!
//! - Shape check (every row has the same number of cells)
//! - Element kind inference: a grid made only of booleans, only of integers
//!   or only of floats keeps its kind
//! - Anything else goes through ONE explicit conversion to the fallback kind;
//!   a cell that cannot be converted fails the whole grid with a type error
//! - NaN accounting (missing cells under a float fallback)

use crate::dtype::{Cell, DType};
use crate::error::{CoreError, CoreResult};
use crate::matrix::Dataset;

/// Configuration for the preflight stage
#[derive(Debug, Clone)]
pub struct PreflightConfig {
    /// Kind used when the grid is not homogeneous (default: float64)
    pub fallback: DType,

    /// Reject grids that end up containing NaN (default: false)
    pub reject_nan: bool,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            fallback: DType::Float64,
            reject_nan: false,
        }
    }
}

impl PreflightConfig {
    pub fn with_fallback(fallback: DType) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Fallback to float64 and refuse missing values
    pub fn strict() -> Self {
        Self {
            fallback: DType::Float64,
            reject_nan: true,
        }
    }
}

/// Output of the preflight stage
#[derive(Debug, Clone)]
pub struct PreflightOutput {
    pub dataset: Dataset,

    /// Was the fallback conversion applied?
    pub converted: bool,

    /// Number of NaN values in the resulting dataset
    pub nan_count: usize,
}

impl PreflightOutput {
    pub fn summary(&self) -> String {
        format!(
            "Preflight: {}x{} {}, converted={}, nan={}",
            self.dataset.nrows(),
            self.dataset.ncols(),
            self.dataset.dtype(),
            self.converted,
            self.nan_count
        )
    }
}

/// Preflight stage executor
pub struct PreflightStage {
    config: PreflightConfig,
}

impl PreflightStage {
    pub fn new(config: PreflightConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PreflightConfig::default())
    }

    pub fn execute(&self, cells: &[Vec<Cell>]) -> CoreResult<PreflightOutput> {
        let nrows = cells.len();
        let ncols = cells.first().map(|r| r.len()).unwrap_or(0);

        log::info!("Preflight: analysing {} rows × {} cells", nrows, ncols);

        if let Some((i, row)) = cells.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(CoreError::Shape(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                ncols
            )));
        }

        let (dtype, converted) = match infer_dtype(cells) {
            Some(native) => {
                log::debug!("  ✓ homogeneous grid of {}", native);
                (native, false)
            }
            None => {
                log::warn!(
                    "  ⚠️  heterogeneous or unsupported cells, converting to {}",
                    self.config.fallback
                );
                (self.config.fallback, true)
            }
        };

        let mut data = Vec::with_capacity(nrows * ncols);
        for row in cells {
            for cell in row {
                data.push(cell.convert(dtype)?);
            }
        }

        let nan_count = data.iter().filter(|v| v.is_nan()).count();
        if nan_count > 0 {
            if self.config.reject_nan {
                return Err(CoreError::Type(format!(
                    "{} missing or NaN values found",
                    nan_count
                )));
            }
            log::warn!("  ⚠️  {} NaN values in dataset", nan_count);
        }

        let output = PreflightOutput {
            dataset: Dataset::from_converted(data, nrows, ncols, dtype),
            converted,
            nan_count,
        };
        log::info!("{}", output.summary());

        Ok(output)
    }
}

/// Common native kind of every cell, if there is one.
fn infer_dtype(cells: &[Vec<Cell>]) -> Option<DType> {
    let mut kinds = cells.iter().flatten().map(Cell::native_dtype);
    let first = match kinds.next() {
        Some(kind) => kind?,
        // empty grid: nothing to convert
        None => return Some(DType::Float64),
    };

    kinds.all(|k| k == Some(first)).then_some(first)
}

/// Convenience wrapper: run preflight with `fallback` and return the dataset.
pub fn dataset_from_cells(cells: &[Vec<Cell>], fallback: DType) -> CoreResult<Dataset> {
    PreflightStage::new(PreflightConfig::with_fallback(fallback))
        .execute(cells)
        .map(|out| out.dataset)
}
