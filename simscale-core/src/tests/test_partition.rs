use crate::error::CoreError;
use crate::partition::*;

#[test]
fn test_is_permutation() {
    assert!(is_permutation(&[0, 5, 2, 3, 4, 1]));
    assert!(is_permutation(&[3, 2, 4]), "offset ranges are permutations");
    assert!(!is_permutation(&[0, 2]), "gap");
    assert!(!is_permutation(&[0, 1, 1, 2]), "repeated index");
    assert!(!is_permutation(&[]));

    assert!(is_zero_based_permutation(&[1, 0, 2]));
    assert!(!is_zero_based_permutation(&[3, 2, 4]));
}

#[test]
fn test_is_partition_default_range() {
    let partition = vec![vec![1, 2, 3], vec![4, 5], vec![0]];
    assert!(is_partition(&partition, None, None));
    assert!(is_partition(&partition, Some(0), Some(5)));

    // declared range larger than the covered one
    assert!(!is_partition(&partition, Some(0), Some(6)));
}

#[test]
fn test_is_partition_rejects_overlap_and_gaps() {
    let overlap = vec![vec![0, 1], vec![1, 2]];
    assert!(!is_partition(&overlap, None, None));

    let gap = vec![vec![0, 1], vec![3]];
    assert!(!is_partition(&gap, None, None));

    let duplicate_in_group = vec![vec![0, 0, 1], vec![2]];
    assert!(!is_partition(&duplicate_in_group, None, None));

    let empty_group = vec![vec![0, 1], vec![]];
    assert!(!is_partition(&empty_group, None, None));

    assert!(!is_partition(&[], None, None));
}

#[test]
fn test_validate_partition_messages() {
    let err = validate_partition(&[vec![0, 1], vec![1, 2]], None, None).unwrap_err();
    match err {
        CoreError::Validation(msg) => assert!(msg.contains("more than once"), "got {}", msg),
        other => panic!("unexpected error {:?}", other),
    }

    let err = validate_partition(&[vec![0, 7]], Some(0), Some(3)).unwrap_err();
    assert!(matches!(err, CoreError::Validation(msg) if msg.contains("outside")));
}

#[test]
fn test_validate_row_partition() {
    assert!(validate_row_partition(&[vec![2, 0], vec![1]], 3).is_ok());
    assert!(validate_row_partition(&[vec![2, 0]], 3).is_err());
    assert!(validate_row_partition(&[], 0).is_ok());
    assert!(validate_row_partition(&[vec![0]], 0).is_err());
}

#[test]
fn test_sort_partition() {
    let partition = vec![vec![1, 2, 3], vec![4, 5], vec![0]];

    let sorted = sort_partition_by_min(&partition);
    assert_eq!(sorted, vec![vec![0], vec![1, 2, 3], vec![4, 5]]);

    let by_size_desc = sort_partition(&partition, |g| g.len(), true);
    assert_eq!(by_size_desc, vec![vec![1, 2, 3], vec![4, 5], vec![0]]);

    let by_max = sort_partition(&partition, |g| g.iter().max().copied(), false);
    assert_eq!(by_max, vec![vec![0], vec![1, 2, 3], vec![4, 5]]);
}
