// simscale-core/src/sparse.rs
//! CSR helpers used by the similarity and quotient engines.
//!
//! All functions return new matrices; inputs are never modified.

use std::borrow::Cow;

use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::{CsMat, CsVec, TriMat};

use crate::error::{CoreError, CoreResult};

/// Borrow `m` if it is CSR, otherwise rebuild it as CSR.
pub fn as_csr(m: &CsMat<f64>) -> Cow<'_, CsMat<f64>> {
    if m.is_csr() {
        Cow::Borrowed(m)
    } else {
        let mut triplets = TriMat::with_capacity(m.shape(), m.nnz());
        for (&v, (i, j)) in m.iter() {
            triplets.add_triplet(i, j, v);
        }
        Cow::Owned(triplets.to_csr())
    }
}

/// Empty `rows × cols` CSR matrix
pub fn empty(rows: usize, cols: usize) -> CsMat<f64> {
    CsMat::new((rows, cols), vec![0; rows + 1], Vec::new(), Vec::new())
}

/// Dense row-major buffer to CSR, skipping zeros.
pub fn dense_block_to_csr(values: &[f64], nrows: usize, ncols: usize) -> CoreResult<CsMat<f64>> {
    if values.len() != nrows * ncols {
        return Err(CoreError::Shape(format!(
            "block buffer of length {} is not {}x{}",
            values.len(),
            nrows,
            ncols
        )));
    }

    let mut indptr = Vec::with_capacity(nrows + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0);

    for row in 0..nrows {
        for (j, &v) in values[row * ncols..(row + 1) * ncols].iter().enumerate() {
            if v != 0.0 {
                indices.push(j);
                data.push(v);
            }
        }
        indptr.push(indices.len());
    }

    Ok(CsMat::new((nrows, ncols), indptr, indices, data))
}

/// Dense vector to a sparse row, skipping zeros.
pub fn dense_to_csvec(values: &[f64]) -> CsVec<f64> {
    let (indices, data): (Vec<usize>, Vec<f64>) = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0.0)
        .map(|(j, &v)| (j, v))
        .unzip();

    CsVec::new(values.len(), indices, data)
}

/// Stack sparse rows into a `rows.len() × ncols` CSR matrix, in order.
pub fn stack_rows(rows: &[CsVec<f64>], ncols: usize) -> CoreResult<CsMat<f64>> {
    let nnz = rows.iter().map(|r| r.nnz()).sum();
    let mut indptr = Vec::with_capacity(rows.len() + 1);
    let mut indices = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);
    indptr.push(0);

    for (i, row) in rows.iter().enumerate() {
        if row.dim() != ncols {
            return Err(CoreError::Shape(format!(
                "row {} has dimension {}, expected {}",
                i,
                row.dim(),
                ncols
            )));
        }
        for (j, &v) in row.iter() {
            indices.push(j);
            data.push(v);
        }
        indptr.push(indices.len());
    }

    Ok(CsMat::new((rows.len(), ncols), indptr, indices, data))
}

/// Copy of `m` with every diagonal entry set to `value`.
///
/// Like a dense `setdiag`, all `min(rows, cols)` diagonal positions are
/// written, so `value == 0.0` leaves explicit zeros for `eliminate_zeros`.
pub fn set_diag(m: &CsMat<f64>, value: f64) -> CsMat<f64> {
    let (rows, cols) = m.shape();
    let diag_len = rows.min(cols);
    let mut triplets = TriMat::with_capacity((rows, cols), m.nnz() + diag_len);

    for (&v, (i, j)) in m.iter() {
        if i != j {
            triplets.add_triplet(i, j, v);
        }
    }
    for i in 0..diag_len {
        triplets.add_triplet(i, i, value);
    }

    triplets.to_csr()
}

/// Copy of `m` without stored zeros (canonical sparse form).
pub fn eliminate_zeros(m: &CsMat<f64>) -> CsMat<f64> {
    let csr = as_csr(m);
    let (rows, cols) = csr.shape();

    let mut indptr = Vec::with_capacity(rows + 1);
    let mut indices = Vec::with_capacity(csr.nnz());
    let mut data = Vec::with_capacity(csr.nnz());
    indptr.push(0);

    for row in csr.outer_iterator() {
        for (j, &v) in row.iter() {
            if v != 0.0 {
                indices.push(j);
                data.push(v);
            }
        }
        indptr.push(indices.len());
    }

    CsMat::new((rows, cols), indptr, indices, data)
}

/// Owned CSR transpose
pub fn transpose(m: &CsMat<f64>) -> CsMat<f64> {
    let (rows, cols) = m.shape();
    let mut triplets = TriMat::with_capacity((cols, rows), m.nnz());

    for (&v, (i, j)) in m.iter() {
        triplets.add_triplet(j, i, v);
    }

    triplets.to_csr()
}

/// Numerical symmetry check with absolute tolerance `tol`.
///
/// Entries missing on one side compare against an implicit zero.
pub fn is_symmetric(m: &CsMat<f64>, tol: f64) -> bool {
    if m.rows() != m.cols() {
        return false;
    }

    m.iter().all(|(&v, (i, j))| {
        let mirrored = m.get(j, i).copied().unwrap_or(0.0);
        (v - mirrored).abs() <= tol
    })
}

/// Fraction of zero entries
pub fn sparsity(m: &CsMat<f64>) -> f64 {
    let (rows, cols) = m.shape();
    let total = rows * cols;
    if total == 0 {
        return 0.0;
    }

    1.0 - (m.nnz() as f64) / (total as f64)
}

/// Dense rows of `m` (small matrices, tests and logging)
pub fn to_dense_rows(m: &CsMat<f64>) -> Vec<Vec<f64>> {
    let (rows, cols) = m.shape();
    let mut dense = vec![vec![0.0; cols]; rows];

    for (&v, (i, j)) in m.iter() {
        dense[i][j] = v;
    }

    dense
}

/// Dense copy of `sparse`; `(i, j)` of the result is `(i, j)` of the input.
pub fn sparse_to_dense(sparse: &CsMat<f64>) -> DenseMatrix<f64> {
    let (rows, cols) = sparse.shape();
    let mut data = vec![0.0; rows * cols];

    // row-major buffer, so the iterator must be read along axis 0
    for (&value, (row_idx, col_idx)) in sparse.iter() {
        data[row_idx * cols + col_idx] = value;
    }

    DenseMatrix::<f64>::from_iterator(data.into_iter(), rows, cols, 0)
}

pub fn dense_to_sparse(dense: &DenseMatrix<f64>) -> CsMat<f64> {
    let (rows, cols) = dense.shape();
    let mut triplets = TriMat::new((rows, cols));

    for i in 0..rows {
        for j in 0..cols {
            let v = *dense.get((i, j));
            if v != 0.0 {
                triplets.add_triplet(i, j, v);
            }
        }
    }

    triplets.to_csr()
}
