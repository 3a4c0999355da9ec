//! Execution strategies for the data-parallel fan-out.
//!
//! Both engines express their work as an ordered list of independent units
//! (row blocks, partition groups) and hand it to an [`Executor`]. Results come
//! back in input order whatever the completion order, and the first error
//! aborts the whole batch.
//!
//! The strategy is chosen from [`Parallelism`] (configuration), never by
//! probing the environment. If a thread pool cannot be created the strategy
//! degrades to [`Sequential`] and says so in the logs; outputs are identical.

use std::fmt;
use std::num::NonZeroUsize;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimScaleError};

/// Requested degree of parallelism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parallelism {
    /// Run every unit of work on the caller thread
    Sequential,
    /// Dedicated pool with this many worker threads (`Workers(1)` is sequential)
    Workers(usize),
    /// One worker per available CPU
    AllAvailable,
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::AllAvailable
    }
}

impl Parallelism {
    /// Map a joblib-style `n_jobs` value: `1` sequential, `n > 1` workers,
    /// `-1` all CPUs, `-2` all CPUs but one, and so on. `0` is rejected.
    pub fn from_n_jobs(n_jobs: i64) -> SimResult<Self> {
        match n_jobs {
            0 => Err(SimScaleError::Config(
                "n_jobs must be a non-zero integer".to_string(),
            )),
            1 => Ok(Parallelism::Sequential),
            -1 => Ok(Parallelism::AllAvailable),
            n if n > 1 => Ok(Parallelism::Workers(n as usize)),
            n => {
                let cpus = available_cpus() as i64;
                Ok(Parallelism::Workers((cpus + 1 + n).max(1) as usize))
            }
        }
    }

    /// Number of workers this setting asks for.
    pub fn requested_workers(&self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Workers(n) => *n,
            Parallelism::AllAvailable => available_cpus(),
        }
    }
}

impl fmt::Display for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parallelism::Sequential => write!(f, "sequential"),
            Parallelism::Workers(n) => write!(f, "workers({})", n),
            Parallelism::AllAvailable => write!(f, "all-available"),
        }
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Ordered, fallible map over independent units of work.
pub trait Executor {
    /// Effective degree of parallelism
    fn degree(&self) -> usize;

    /// Apply `f` to every item; results are in item order. The first error wins.
    fn try_map<T, R, F>(&self, items: Vec<T>, f: F) -> SimResult<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> SimResult<R> + Send + Sync;
}

/// Caller-thread execution; always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Executor for Sequential {
    fn degree(&self) -> usize {
        1
    }

    fn try_map<T, R, F>(&self, items: Vec<T>, f: F) -> SimResult<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> SimResult<R> + Send + Sync,
    {
        items.into_iter().map(f).collect()
    }
}

/// Dedicated rayon thread pool.
pub struct PoolExecutor {
    pool: rayon::ThreadPool,
}

impl PoolExecutor {
    pub fn new(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("simscale-worker-{}", i))
            .build()?;
        Ok(Self { pool })
    }
}

impl fmt::Debug for PoolExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolExecutor")
            .field("num_threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl Executor for PoolExecutor {
    fn degree(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn try_map<T, R, F>(&self, items: Vec<T>, f: F) -> SimResult<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> SimResult<R> + Send + Sync,
    {
        // indexed collect keeps input order
        self.pool
            .install(|| items.into_par_iter().with_min_len(1).map(&f).collect())
    }
}

/// Strategy selected from a [`Parallelism`] setting
#[derive(Debug)]
pub enum ExecutionStrategy {
    Sequential(Sequential),
    Pool(PoolExecutor),
}

impl ExecutionStrategy {
    pub fn from_parallelism(parallelism: Parallelism) -> SimResult<Self> {
        let workers = match parallelism {
            Parallelism::Workers(0) => {
                return Err(SimScaleError::Config(
                    "parallelism must use at least one worker".to_string(),
                ));
            }
            p => p.requested_workers(),
        };

        if workers <= 1 {
            debug!("Execution strategy: sequential");
            return Ok(ExecutionStrategy::Sequential(Sequential));
        }

        match PoolExecutor::new(workers) {
            Ok(pool) => {
                debug!("Execution strategy: thread pool with {} workers", workers);
                Ok(ExecutionStrategy::Pool(pool))
            }
            Err(e) => {
                warn!(
                    "Could not start a pool of {} workers ({}); falling back to sequential execution",
                    workers, e
                );
                Ok(ExecutionStrategy::Sequential(Sequential))
            }
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionStrategy::Pool(_))
    }
}

impl Executor for ExecutionStrategy {
    fn degree(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential(s) => s.degree(),
            ExecutionStrategy::Pool(p) => p.degree(),
        }
    }

    fn try_map<T, R, F>(&self, items: Vec<T>, f: F) -> SimResult<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> SimResult<R> + Send + Sync,
    {
        match self {
            ExecutionStrategy::Sequential(s) => s.try_map(items, f),
            ExecutionStrategy::Pool(p) => p.try_map(items, f),
        }
    }
}
