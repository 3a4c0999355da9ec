use serial_test::serial;

use crate::error::SimScaleError;
use crate::executor::{ExecutionStrategy, Executor, Parallelism, PoolExecutor, Sequential};
use crate::tests::init;

#[test]
fn test_from_n_jobs() {
    assert_eq!(Parallelism::from_n_jobs(1).unwrap(), Parallelism::Sequential);
    assert_eq!(Parallelism::from_n_jobs(-1).unwrap(), Parallelism::AllAvailable);
    assert_eq!(Parallelism::from_n_jobs(4).unwrap(), Parallelism::Workers(4));
    assert!(matches!(
        Parallelism::from_n_jobs(0),
        Err(SimScaleError::Config(_))
    ));

    // all CPUs but one, never below one worker
    match Parallelism::from_n_jobs(-2).unwrap() {
        Parallelism::Workers(n) => assert!(n >= 1),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        Parallelism::from_n_jobs(-100_000).unwrap(),
        Parallelism::Workers(1)
    );
}

#[test]
fn test_requested_workers() {
    assert_eq!(Parallelism::Sequential.requested_workers(), 1);
    assert_eq!(Parallelism::Workers(3).requested_workers(), 3);
    assert!(Parallelism::AllAvailable.requested_workers() >= 1);
}

#[test]
fn test_sequential_try_map_keeps_order() {
    let out = Sequential
        .try_map((0..10).collect(), |i: usize| Ok(i * i))
        .unwrap();
    assert_eq!(out, (0..10).map(|i| i * i).collect::<Vec<_>>());
}

#[test]
#[serial]
fn test_pool_try_map_keeps_order() {
    init();
    let pool = PoolExecutor::new(4).unwrap();
    assert_eq!(pool.degree(), 4);

    let out = pool
        .try_map((0..1000).collect(), |i: usize| {
            // uneven work so completion order differs from input order
            let spin = (1000 - i) % 17;
            let acc: usize = (0..spin * 100).sum();
            std::hint::black_box(acc);
            Ok(i)
        })
        .unwrap();
    assert_eq!(out, (0..1000).collect::<Vec<_>>());
}

#[test]
#[serial]
fn test_first_error_aborts() {
    let strategy = ExecutionStrategy::from_parallelism(Parallelism::Workers(3)).unwrap();

    let result: Result<Vec<usize>, _> = strategy.try_map((0..50).collect(), |i: usize| {
        if i == 17 {
            Err(SimScaleError::Compute(format!("unit {} failed", i)))
        } else {
            Ok(i)
        }
    });

    assert_eq!(
        result.unwrap_err(),
        SimScaleError::Compute("unit 17 failed".to_string())
    );
}

#[test]
#[serial]
fn test_strategy_selection() {
    let sequential = ExecutionStrategy::from_parallelism(Parallelism::Sequential).unwrap();
    assert!(!sequential.is_parallel());
    assert_eq!(sequential.degree(), 1);

    let single = ExecutionStrategy::from_parallelism(Parallelism::Workers(1)).unwrap();
    assert!(!single.is_parallel());

    let pool = ExecutionStrategy::from_parallelism(Parallelism::Workers(2)).unwrap();
    assert!(pool.is_parallel());
    assert_eq!(pool.degree(), 2);

    assert!(matches!(
        ExecutionStrategy::from_parallelism(Parallelism::Workers(0)),
        Err(SimScaleError::Config(_))
    ));
}

#[test]
fn test_parallelism_display() {
    assert_eq!(Parallelism::Sequential.to_string(), "sequential");
    assert_eq!(Parallelism::Workers(8).to_string(), "workers(8)");
    assert_eq!(Parallelism::AllAvailable.to_string(), "all-available");
    assert_eq!(Parallelism::default(), Parallelism::AllAvailable);
}
