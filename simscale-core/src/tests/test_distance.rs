use crate::distance::*;
use crate::matrix::Dataset;

#[test]
fn test_cosine_similarity() {
    crate::init();

    // Parallel vectors
    let sim = cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]);
    assert!(
        (sim - 1.0).abs() < 1e-12,
        "Parallel vectors should have cos=1, got {}",
        sim
    );

    // Orthogonal vectors
    let sim_ortho = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
    assert!(
        sim_ortho.abs() < 1e-12,
        "Orthogonal vectors should have cos=0, got {}",
        sim_ortho
    );

    // Opposite vectors
    let sim_opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
    assert!((sim_opposite + 1.0).abs() < 1e-12);
}

#[test]
fn test_cosine_zero_vector_is_finite() {
    let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]);
    assert!(sim.is_finite());
    assert_eq!(sim, 0.0);
}

#[test]
fn test_hamming_similarity() {
    // 2 of 4 positions match
    let sim = hamming_similarity(&[1.0, 1.0, 1.0, 1.0], &[0.0, 1.0, 0.0, 1.0]);
    assert!((sim - 0.5).abs() < 1e-12);

    // matching zeros count as matches
    let sim = hamming_similarity(&[0.0, 1.0, 0.0, 1.0], &[0.0, 0.0, 0.0, 1.0]);
    assert!((sim - 0.75).abs() < 1e-12);

    let sim_self = hamming_similarity(&[1.0, 0.0, 1.0], &[1.0, 0.0, 1.0]);
    assert_eq!(sim_self, 1.0);
}

#[test]
fn test_cosine_block_matches_slice_version() {
    crate::init();

    let dataset = Dataset::from_rows(&[
        vec![1.0, 1.0, 1.0, 1.0],
        vec![0.0, 1.0, 0.0, 2.0],
        vec![2.2, 2.0, 2.2, 0.5],
    ])
    .unwrap();
    let normalised = dataset.normalised_rows();

    let block = cosine_block(&normalised, &[2, 0]);
    assert_eq!(block.len(), 2 * 3);

    for (b, &i) in [2usize, 0].iter().enumerate() {
        for j in 0..3 {
            let expected = cosine_similarity(dataset.row(i), dataset.row(j));
            assert!(
                (block[b * 3 + j] - expected).abs() < 1e-12,
                "Block and slice versions should match at ({}, {})",
                i,
                j
            );
        }
    }
}

#[test]
fn test_hamming_block() {
    let dataset = Dataset::from_rows(&[
        vec![1, 1, 1, 1],
        vec![0, 1, 0, 1],
        vec![0, 0, 0, 1],
    ])
    .unwrap();

    let block = hamming_block(&dataset, &[1]);
    assert_eq!(block, vec![0.5, 1.0, 0.75]);
}
