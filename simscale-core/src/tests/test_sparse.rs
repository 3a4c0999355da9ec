use approx::assert_relative_eq;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::{CsMat, CsVec, TriMat};

use crate::error::CoreError;
use crate::sparse::*;

fn small() -> CsMat<f64> {
    let mut t = TriMat::new((3, 3));
    t.add_triplet(0, 0, 1.0);
    t.add_triplet(0, 1, 0.9);
    t.add_triplet(1, 0, 0.9);
    t.add_triplet(1, 2, 0.6);
    t.add_triplet(2, 1, 0.6);
    t.add_triplet(2, 2, 0.0);
    t.to_csr()
}

#[test]
fn test_set_diag_and_eliminate_zeros() {
    crate::init();
    let m = small();

    let with_diag = set_diag(&m, 0.5);
    let dense = to_dense_rows(&with_diag);
    for i in 0..3 {
        assert_eq!(dense[i][i], 0.5);
    }
    assert_eq!(dense[0][1], 0.9);

    let zero_diag = set_diag(&m, 0.0);
    let canonical = eliminate_zeros(&zero_diag);
    assert_eq!(canonical.nnz(), 4);
    assert!(canonical.iter().all(|(&v, _)| v != 0.0));
}

#[test]
fn test_set_diag_rectangular() {
    let mut t = TriMat::new((2, 4));
    t.add_triplet(1, 3, 2.0);
    let m: CsMat<f64> = t.to_csr();

    let d = to_dense_rows(&set_diag(&m, 1.0));
    assert_eq!(d, vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 2.0]]);
}

#[test]
fn test_transpose_and_symmetry() {
    let mut t = TriMat::new((2, 3));
    t.add_triplet(0, 2, 4.0);
    t.add_triplet(1, 0, 1.5);
    let m: CsMat<f64> = t.to_csr();

    let mt = transpose(&m);
    assert_eq!(mt.shape(), (3, 2));
    assert_eq!(
        to_dense_rows(&mt),
        vec![vec![0.0, 1.5], vec![0.0, 0.0], vec![4.0, 0.0]]
    );

    assert!(is_symmetric(&small(), 1e-12));
    assert!(!is_symmetric(&m, 1e-12));

    let mut asym = TriMat::new((2, 2));
    asym.add_triplet(0, 1, 1.0);
    let asym: CsMat<f64> = asym.to_csr();
    assert!(!is_symmetric(&asym, 1e-12));
}

#[test]
fn test_dense_block_to_csr() {
    let block = dense_block_to_csr(&[0.0, 1.0, 0.0, 2.0, 0.0, 3.0], 2, 3).unwrap();
    assert_eq!(block.shape(), (2, 3));
    assert_eq!(block.nnz(), 3);
    assert_eq!(to_dense_rows(&block), vec![vec![0.0, 1.0, 0.0], vec![2.0, 0.0, 3.0]]);

    assert!(matches!(
        dense_block_to_csr(&[1.0, 2.0], 2, 3),
        Err(CoreError::Shape(_))
    ));
}

#[test]
fn test_stack_rows() {
    let rows = vec![
        dense_to_csvec(&[0.0, 1.0, 0.0]),
        dense_to_csvec(&[0.0, 0.0, 0.0]),
        dense_to_csvec(&[3.0, 0.0, 2.0]),
    ];

    let stacked = stack_rows(&rows, 3).unwrap();
    assert_eq!(stacked.shape(), (3, 3));
    assert_eq!(stacked.nnz(), 3);
    assert_eq!(to_dense_rows(&stacked)[2], vec![3.0, 0.0, 2.0]);

    let wrong = vec![CsVec::new(2, vec![0], vec![1.0])];
    assert!(matches!(stack_rows(&wrong, 3), Err(CoreError::Shape(_))));
}

#[test]
fn test_dense_interop_roundtrip_values() {
    let dense = DenseMatrix::from_2d_vec(&vec![vec![1.0, 0.0], vec![0.25, 2.0]]).unwrap();

    let sparse = dense_to_sparse(&dense);
    assert_eq!(sparse.nnz(), 3);

    let back = sparse_to_dense(&sparse);
    assert_eq!(back.shape(), (2, 2));
    assert_relative_eq!(*back.get((1, 0)), 0.25);
    assert_relative_eq!(*back.get((0, 1)), 0.0);
}

#[test]
fn test_dense_interop_keeps_orientation() {
    let mut t = TriMat::new((2, 3));
    t.add_triplet(0, 1, 2.0);
    t.add_triplet(1, 2, -1.5);
    let sparse: CsMat<f64> = t.to_csr();

    let dense = sparse_to_dense(&sparse);
    assert_eq!(dense.shape(), (2, 3));
    assert_relative_eq!(*dense.get((0, 1)), 2.0);
    assert_relative_eq!(*dense.get((1, 0)), 0.0);
    assert_relative_eq!(*dense.get((1, 2)), -1.5);

    let back = dense_to_sparse(&dense);
    assert_eq!(back.shape(), (2, 3));
    assert_eq!(to_dense_rows(&back), to_dense_rows(&sparse));
}

#[test]
fn test_sparsity() {
    let m = eliminate_zeros(&small());
    // 5 non-zeros out of 9
    assert_relative_eq!(sparsity(&m), 1.0 - 5.0 / 9.0);
}
