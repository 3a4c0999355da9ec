// simscale-core/src/partition.rs
//! Partition and permutation validation.
//!
//! A partition is a list of groups of row indices; it is valid for the range
//! `[start, end]` when every index of the range appears in exactly one group
//! and no group is empty or repeats an index.

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

/// Check that `p` is a permutation of `{min(p) ..= max(p)}`.
///
/// An empty slice is not a permutation.
pub fn is_permutation(p: &[usize]) -> bool {
    let (min, max) = match (p.iter().min(), p.iter().max()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return false,
    };

    if p.len() != max - min + 1 {
        return false;
    }

    let seen: HashSet<usize> = p.iter().copied().collect();
    seen.len() == p.len()
}

/// Check that `p` is a permutation of `[0, p.len())`.
pub fn is_zero_based_permutation(p: &[usize]) -> bool {
    is_permutation(p) && p.iter().min() == Some(&0)
}

/// Check that `groups` is a partition of `[start, end]`.
///
/// `start` and `end` default to the minimum and maximum of all indices.
pub fn is_partition(groups: &[Vec<usize>], start: Option<usize>, end: Option<usize>) -> bool {
    validate_partition(groups, start, end).is_ok()
}

/// Like [`is_partition`], but explains what is wrong.
pub fn validate_partition(
    groups: &[Vec<usize>],
    start: Option<usize>,
    end: Option<usize>,
) -> CoreResult<()> {
    let flat: Vec<usize> = groups.iter().flatten().copied().collect();

    let start = match start.or_else(|| flat.iter().min().copied()) {
        Some(s) => s,
        None => return Err(CoreError::Validation("partition is empty".to_string())),
    };
    let end = match end.or_else(|| flat.iter().max().copied()) {
        Some(e) => e,
        None => return Err(CoreError::Validation("partition is empty".to_string())),
    };

    if end < start {
        return Err(CoreError::Validation(format!(
            "invalid index range [{}, {}]",
            start, end
        )));
    }

    if let Some(g) = groups.iter().position(|g| g.is_empty()) {
        return Err(CoreError::Validation(format!("group {} is empty", g)));
    }

    let mut seen = HashSet::with_capacity(flat.len());
    for (g, group) in groups.iter().enumerate() {
        for &idx in group {
            if idx < start || idx > end {
                return Err(CoreError::Validation(format!(
                    "index {} in group {} is outside [{}, {}]",
                    idx, g, start, end
                )));
            }
            if !seen.insert(idx) {
                return Err(CoreError::Validation(format!(
                    "index {} appears more than once (group {})",
                    idx, g
                )));
            }
        }
    }

    let expected = end - start + 1;
    if seen.len() != expected {
        return Err(CoreError::Validation(format!(
            "partition covers {} of the {} indices in [{}, {}]",
            seen.len(),
            expected,
            start,
            end
        )));
    }

    Ok(())
}

/// Validate `groups` as a partition of the rows of an `n`-row matrix.
///
/// The empty partition is only valid for `n == 0`.
pub fn validate_row_partition(groups: &[Vec<usize>], n: usize) -> CoreResult<()> {
    if n == 0 {
        return if groups.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(
                "non-empty partition for a matrix with no rows".to_string(),
            ))
        };
    }

    validate_partition(groups, Some(0), Some(n - 1))
}

/// Sort the groups of a partition by a key computed from each group.
///
/// The sort is stable, so groups with equal keys keep their relative order.
pub fn sort_partition<K, F>(groups: &[Vec<usize>], by: F, reverse: bool) -> Vec<Vec<usize>>
where
    K: Ord,
    F: Fn(&[usize]) -> K,
{
    let mut keyed: Vec<(K, &Vec<usize>)> = groups.iter().map(|g| (by(g), g)).collect();
    if reverse {
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
    } else {
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
    }

    keyed.into_iter().map(|(_, g)| g.clone()).collect()
}

/// Sort groups by their smallest index (empty groups first).
pub fn sort_partition_by_min(groups: &[Vec<usize>]) -> Vec<Vec<usize>> {
    sort_partition(groups, |g| g.iter().min().copied(), false)
}
