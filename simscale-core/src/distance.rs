// simscale-core/src/distance.rs
//! Similarity kernels for row comparisons
//!
//! Implements:
//! - Cosine similarity (slice version and block-vs-dataset version)
//! - Hamming similarity `1 - hamming distance`, for 0/1-valued rows
//!
//! Block kernels return a dense row-major `block_rows × N` buffer: the
//! similarity of every row in the block against every row of the dataset.

use crate::matrix::Dataset;

/// Dot product of two equally sized slices
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity: cos(θ) = (a·b) / (||a|| ||b||)
///
/// Zero vectors have similarity 0 with everything.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = dot(a, a).sqrt();
    let norm_b = dot(b, b).sqrt();

    dot(a, b) / (norm_a * norm_b).max(1e-10)
}

/// Hamming similarity between two 0/1 rows: the fraction of matching positions.
///
/// Computed as `(a·b + (1-a)·(1-b)) / D`, i.e. matching ones plus matching
/// zeros, without building a distance vector.
pub fn hamming_similarity(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    let d = a.len() as f64;

    let matches: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| x * y + (1.0 - x) * (1.0 - y))
        .sum();

    matches / d
}

/// Cosine block kernel.
///
/// `normalised` must already hold unit-norm rows (see `Dataset::normalised_rows`)
/// so each entry is a plain dot product.
pub fn cosine_block(normalised: &Dataset, block: &[usize]) -> Vec<f64> {
    let n = normalised.nrows();
    let mut out = Vec::with_capacity(block.len() * n);

    for &i in block {
        let row_i = normalised.row(i);
        out.extend(normalised.rows().map(|row_j| dot(row_i, row_j)));
    }

    out
}

/// Hamming block kernel
pub fn hamming_block(dataset: &Dataset, block: &[usize]) -> Vec<f64> {
    let n = dataset.nrows();
    let mut out = Vec::with_capacity(block.len() * n);

    for &i in block {
        let row_i = dataset.row(i);
        out.extend(dataset.rows().map(|row_j| hamming_similarity(row_i, row_j)));
    }

    out
}
