// simscale-core/src/matrix.rs
use log::trace;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::dtype::{DType, Element, MAX_EXACT_INT};
use crate::error::{CoreError, CoreResult};

/// Dense row-major dataset: `nrows` items, `ncols` features each.
///
/// Values are stored as `f64` regardless of the source kind; `dtype` keeps
/// track of what the caller handed in. Integers are only accepted up to
/// `±2^53`, the range `f64` represents exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
    dtype: DType,
}

fn check_exact<T: Element>(value: T, position: usize) -> CoreResult<f64> {
    if !value.fits_f64() {
        return Err(CoreError::Type(format!(
            "item {} of {} is outside ±{} and cannot be stored exactly",
            position,
            T::DTYPE,
            MAX_EXACT_INT
        )));
    }
    Ok(value.to_f64())
}

impl Dataset {
    /// Build from a flat row-major buffer of a supported element kind.
    pub fn from_vec<T: Element>(data: Vec<T>, nrows: usize, ncols: usize) -> CoreResult<Self> {
        if data.len() != nrows * ncols {
            return Err(CoreError::Shape(format!(
                "buffer of length {} cannot be viewed as {}x{}",
                data.len(),
                nrows,
                ncols
            )));
        }

        let data = data
            .into_iter()
            .enumerate()
            .map(|(k, v)| check_exact(v, k))
            .collect::<CoreResult<Vec<f64>>>()?;

        Ok(Self {
            data,
            nrows,
            ncols,
            dtype: T::DTYPE,
        })
    }

    /// Build from rows; every row must have the same length.
    pub fn from_rows<T: Element>(rows: &[Vec<T>]) -> CoreResult<Self> {
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * ncols);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(CoreError::Shape(format!(
                    "row {} has {} items, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            for (j, &v) in row.iter().enumerate() {
                data.push(check_exact(v, i * ncols + j)?);
            }
        }

        Ok(Self {
            data,
            nrows: rows.len(),
            ncols,
            dtype: T::DTYPE,
        })
    }

    /// Already-converted values with an explicit source kind (used by preflight).
    pub(crate) fn from_converted(
        data: Vec<f64>,
        nrows: usize,
        ncols: usize,
        dtype: DType,
    ) -> Self {
        debug_assert_eq!(data.len(), nrows * ncols);
        Self {
            data,
            nrows,
            ncols,
            dtype,
        }
    }

    /// Copy the contents of a smartcore dense matrix (rows are items).
    pub fn from_dense_matrix(matrix: &DenseMatrix<f64>) -> Self {
        let (nrows, ncols) = matrix.shape();
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(*matrix.get((i, j)));
            }
        }

        Self {
            data,
            nrows,
            ncols,
            dtype: DType::Float64,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.nrows).map(move |i| self.row(i))
    }

    /// New dataset holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> CoreResult<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.ncols);
        for &i in indices {
            if i >= self.nrows {
                return Err(CoreError::Validation(format!(
                    "row index {} out of bounds for {} rows",
                    i, self.nrows
                )));
            }
            data.extend_from_slice(self.row(i));
        }

        Ok(Self {
            data,
            nrows: indices.len(),
            ncols: self.ncols,
            dtype: self.dtype,
        })
    }

    /// L2 norm of every row
    pub fn row_norms(&self) -> Vec<f64> {
        self.rows()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect()
    }

    /// Every row scaled to unit L2 norm. Zero rows stay zero.
    pub fn normalised_rows(&self) -> Self {
        let norms = self.row_norms();
        trace!("Normalising {} rows to unit L2 norm", self.nrows);

        let mut data = Vec::with_capacity(self.data.len());
        for (row, norm) in self.rows().zip(norms) {
            let scale = 1.0 / norm.max(1e-10);
            data.extend(row.iter().map(|v| v * scale));
        }

        Self {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
            dtype: DType::Float64,
        }
    }

    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                data[j * self.nrows + i] = self.data[i * self.ncols + j];
            }
        }

        Self {
            data,
            nrows: self.ncols,
            ncols: self.nrows,
            dtype: self.dtype,
        }
    }

    /// True when every value is exactly 0 or 1 (the domain of the hamming formula).
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0 || v == 1.0)
    }
}
