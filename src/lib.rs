//! # simscale
//!
//! Large sparse pairwise-similarity matrices over row-vector datasets:
//!
//! - [`similarity`]: truncated similarity (cosine, hamming or custom) computed
//!   block by block against the full dataset, thresholded and sparsified
//! - [`quotient`]: reduction of a similarity matrix under a partition of its
//!   rows into groups (two passes of row aggregation)
//! - [`shuffle`]: permutation matrices and symmetric reordering
//! - [`executor`]: the execution strategy the engines fan out on
//! - [`builder`]: fluent configuration of both engines
//!
//! Data model, metric kernels, sparse helpers and partition validation live in
//! `simscale_core`; [`prelude`] re-exports what most callers need from both.
//!
//! ```
//! use simscale::prelude::*;
//!
//! let dataset = Dataset::from_rows(&[
//!     vec![1.0, 0.0, 1.0],
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//! ])
//! .unwrap();
//!
//! let sim = SimilarityBuilder::new()
//!     .with_threshold(Some(0.5))
//!     .with_sequential()
//!     .build(&dataset)
//!     .unwrap();
//!
//! let q = QuotientBuilder::new()
//!     .with_check(true)
//!     .with_sequential()
//!     .build(&sim, &[vec![0, 1], vec![2]])
//!     .unwrap();
//! assert_eq!(q.shape(), (2, 2));
//! ```

pub mod builder;
pub mod error;
pub mod executor;
pub mod quotient;
pub mod shuffle;
pub mod similarity;

pub mod prelude {
    pub use crate::builder::{ConfigValue, QuotientBuilder, SimilarityBuilder};
    pub use crate::error::{SimResult, SimScaleError};
    pub use crate::executor::{ExecutionStrategy, Executor, Parallelism};
    pub use crate::quotient::{
        merge_row_partition, quotient_similarity, quotient_similarity_dense, Aggregation,
        QuotientParams,
    };
    pub use crate::shuffle::{inverse_permutation, row_shuffle_matrix, sim_matrix_shuffle};
    pub use crate::similarity::{truncated_sparse_similarity, Metric, SimilarityParams};
    pub use simscale_core::partition::{is_partition, is_permutation, sort_partition_by_min};
    pub use simscale_core::{Cell, DType, Dataset};
}

#[cfg(test)]
mod tests;
