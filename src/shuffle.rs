//! Symmetric reordering of a similarity matrix.
//!
//! Reordering the items of an `N×N` similarity matrix means permuting its rows
//! *and* its columns the same way: `P · M · Pᵗ`, where `P` is the row-shuffle
//! matrix of the new order. Entry `(i, j)` of the result is
//! `M[new_order[i]][new_order[j]]`.

use log::debug;
use simscale_core::partition::is_zero_based_permutation;
use simscale_core::sparse::{as_csr, empty, transpose};
use sprs::CsMat;

use crate::error::{SimResult, SimScaleError};

/// Sparse `N×N` matrix with a single 1 per row, at column `new_order[row]`.
///
/// Left-multiplying by it moves row `new_order[i]` to position `i`.
pub fn row_shuffle_matrix(new_order: &[usize]) -> SimResult<CsMat<f64>> {
    if !is_zero_based_permutation(new_order) {
        return Err(SimScaleError::Validation(format!(
            "new order is not a permutation of [0, {})",
            new_order.len()
        )));
    }

    let n = new_order.len();
    Ok(CsMat::new(
        (n, n),
        (0..=n).collect(),
        new_order.to_vec(),
        vec![1.0; n],
    ))
}

/// Reorder the rows and columns of a square matrix.
///
/// # Errors
///
/// - `Shape` if `m` is not square or `new_order` has the wrong length
/// - `Validation` if `new_order` is not a permutation of `[0, N)`
///
/// # Examples
///
/// ```
/// use simscale::shuffle::sim_matrix_shuffle;
/// use sprs::TriMat;
///
/// let mut t = TriMat::new((2, 2));
/// t.add_triplet(0, 0, 1.0);
/// t.add_triplet(0, 1, 2.0);
/// t.add_triplet(1, 0, 2.0);
/// t.add_triplet(1, 1, 3.0);
///
/// let shuffled = sim_matrix_shuffle(&t.to_csr(), &[1, 0]).unwrap();
/// assert_eq!(shuffled.get(0, 0), Some(&3.0));
/// assert_eq!(shuffled.get(1, 1), Some(&1.0));
/// ```
pub fn sim_matrix_shuffle(m: &CsMat<f64>, new_order: &[usize]) -> SimResult<CsMat<f64>> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(SimScaleError::Shape(format!(
            "similarity matrix must be square, got {}x{}",
            rows, cols
        )));
    }
    if new_order.len() != rows {
        return Err(SimScaleError::Shape(format!(
            "new order has {} entries for a {}x{} matrix",
            new_order.len(),
            rows,
            cols
        )));
    }
    if rows == 0 {
        return Ok(empty(0, 0));
    }

    let p = row_shuffle_matrix(new_order)?;
    let csr = as_csr(m);
    let m: &CsMat<f64> = &csr;

    let shuffled: CsMat<f64> = &(&p * m) * &transpose(&p);
    debug!(
        "Shuffled {}x{} matrix with {} non-zeros",
        rows,
        cols,
        shuffled.nnz()
    );

    Ok(shuffled)
}

/// Order that undoes `new_order`: shuffling by `new_order` then by the
/// inverse restores the original matrix.
pub fn inverse_permutation(new_order: &[usize]) -> SimResult<Vec<usize>> {
    if !is_zero_based_permutation(new_order) {
        return Err(SimScaleError::Validation(format!(
            "new order is not a permutation of [0, {})",
            new_order.len()
        )));
    }

    let mut inverse = vec![0; new_order.len()];
    for (i, &p) in new_order.iter().enumerate() {
        inverse[p] = i;
    }
    Ok(inverse)
}
