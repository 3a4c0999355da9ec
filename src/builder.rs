//! Fluent builders for the two engines.
//!
//! ```
//! use simscale::builder::SimilarityBuilder;
//! use simscale_core::Dataset;
//!
//! let dataset = Dataset::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
//! let sim = SimilarityBuilder::new()
//!     .with_metric_name("hamming")
//!     .unwrap()
//!     .with_threshold(Some(0.5))
//!     .with_sequential()
//!     .build(&dataset)
//!     .unwrap();
//! assert_eq!(sim.get(0, 1), Some(&1.0));
//! ```

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use simscale_core::preflight::{PreflightConfig, PreflightStage};
use simscale_core::{Cell, DType, Dataset};
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::CsMat;

use crate::error::SimResult;
use crate::executor::Parallelism;
use crate::quotient::{quotient_similarity, quotient_similarity_dense, Aggregation, QuotientParams};
use crate::similarity::{truncated_sparse_similarity, Metric, SimilarityParams};

#[derive(Debug, Clone, Default)]
pub struct SimilarityBuilder {
    params: SimilarityParams,
}

impl SimilarityBuilder {
    pub fn new() -> Self {
        debug!("Creating SimilarityBuilder with default parameters");
        Self::default()
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        info!("Setting metric: {}", metric.name());
        self.params.metric = metric;
        self
    }

    /// Built-in metric by name (`cosine`, `hamming`).
    pub fn with_metric_name(self, name: &str) -> SimResult<Self> {
        let metric = name.parse::<Metric>()?;
        Ok(self.with_metric(metric))
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        info!("Setting block size: {}", block_size);
        self.params.block_size = block_size;
        self
    }

    pub fn with_threshold(mut self, thresh: Option<f64>) -> Self {
        info!("Setting threshold: {:?}", thresh);
        self.params.thresh = thresh;
        self
    }

    pub fn with_diag_value(mut self, diag_value: Option<f64>) -> Self {
        info!("Setting diagonal value: {:?}", diag_value);
        self.params.diag_value = diag_value;
        self
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        info!("Setting binary output: {}", binary);
        self.params.binary = binary;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        info!("Setting parallelism: {}", parallelism);
        self.params.parallelism = parallelism;
        self
    }

    pub fn with_sequential(self) -> Self {
        self.with_parallelism(Parallelism::Sequential)
    }

    /// joblib-style worker count (`-1` for all CPUs).
    pub fn with_n_jobs(self, n_jobs: i64) -> SimResult<Self> {
        let parallelism = Parallelism::from_n_jobs(n_jobs)?;
        Ok(self.with_parallelism(parallelism))
    }

    pub fn params(&self) -> &SimilarityParams {
        &self.params
    }

    pub fn build(&self, dataset: &Dataset) -> SimResult<CsMat<f64>> {
        debug!("Building similarity with {}", self);
        truncated_sparse_similarity(dataset, &self.params)
    }

    pub fn build_from_dense(&self, matrix: &DenseMatrix<f64>) -> SimResult<CsMat<f64>> {
        self.build(&Dataset::from_dense_matrix(matrix))
    }

    /// Convert a grid of dynamic cells to `fallback` (when their kinds are
    /// mixed or unsupported), then build.
    pub fn build_from_cells(&self, cells: &[Vec<Cell>], fallback: DType) -> SimResult<CsMat<f64>> {
        let output = PreflightStage::new(PreflightConfig::with_fallback(fallback)).execute(cells)?;
        info!("{}", output.summary());
        self.build(&output.dataset)
    }

    pub fn config_typed(&self) -> HashMap<String, ConfigValue> {
        let p = &self.params;
        let mut config = HashMap::new();

        config.insert(
            "metric".to_string(),
            ConfigValue::String(p.metric.name().to_string()),
        );
        config.insert("block_size".to_string(), ConfigValue::Usize(p.block_size));
        config.insert("thresh".to_string(), ConfigValue::OptionF64(p.thresh));
        config.insert(
            "diag_value".to_string(),
            ConfigValue::OptionF64(p.diag_value),
        );
        config.insert("binary".to_string(), ConfigValue::Bool(p.binary));
        config.insert(
            "parallelism".to_string(),
            ConfigValue::String(p.parallelism.to_string()),
        );

        config
    }
}

impl fmt::Display for SimilarityBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        write!(
            f,
            "SimilarityBuilder {{ metric: {}, block_size: {}, thresh: {:?}, diag_value: {:?}, binary: {}, parallelism: {} }}",
            p.metric.name(),
            p.block_size,
            p.thresh,
            p.diag_value,
            p.binary,
            p.parallelism
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuotientBuilder {
    params: QuotientParams,
}

impl QuotientBuilder {
    pub fn new() -> Self {
        debug!("Creating QuotientBuilder with default parameters");
        Self::default()
    }

    pub fn with_agg(mut self, agg: Aggregation) -> Self {
        info!("Setting aggregation: {}", agg.name());
        self.params.agg = agg;
        self
    }

    /// Built-in aggregation by name (`sum`, `min`, `max`, `mean`, `getnnz`).
    pub fn with_agg_name(self, name: &str) -> SimResult<Self> {
        let agg = name.parse::<Aggregation>()?;
        Ok(self.with_agg(agg))
    }

    pub fn with_diag_value(mut self, diag_value: Option<f64>) -> Self {
        info!("Setting diagonal value: {:?}", diag_value);
        self.params.diag_value = diag_value;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        info!("Setting partition check: {}", check);
        self.params.check = check;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        info!("Setting parallelism: {}", parallelism);
        self.params.parallelism = parallelism;
        self
    }

    pub fn with_sequential(self) -> Self {
        self.with_parallelism(Parallelism::Sequential)
    }

    pub fn with_n_jobs(self, n_jobs: i64) -> SimResult<Self> {
        let parallelism = Parallelism::from_n_jobs(n_jobs)?;
        Ok(self.with_parallelism(parallelism))
    }

    pub fn params(&self) -> &QuotientParams {
        &self.params
    }

    pub fn build(&self, m: &CsMat<f64>, partition: &[Vec<usize>]) -> SimResult<CsMat<f64>> {
        debug!("Building quotient with {}", self);
        quotient_similarity(m, partition, &self.params)
    }

    pub fn build_from_dense(
        &self,
        m: &DenseMatrix<f64>,
        partition: &[Vec<usize>],
    ) -> SimResult<CsMat<f64>> {
        quotient_similarity_dense(m, partition, &self.params)
    }

    pub fn config_typed(&self) -> HashMap<String, ConfigValue> {
        let p = &self.params;
        let mut config = HashMap::new();

        config.insert(
            "agg".to_string(),
            ConfigValue::String(p.agg.name().to_string()),
        );
        config.insert(
            "diag_value".to_string(),
            ConfigValue::OptionF64(p.diag_value),
        );
        config.insert("check".to_string(), ConfigValue::Bool(p.check));
        config.insert(
            "parallelism".to_string(),
            ConfigValue::String(p.parallelism.to_string()),
        );

        config
    }
}

impl fmt::Display for QuotientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        write!(
            f,
            "QuotientBuilder {{ agg: {}, diag_value: {:?}, check: {}, parallelism: {} }}",
            p.agg.name(),
            p.diag_value,
            p.check,
            p.parallelism
        )
    }
}

/// Configuration value that can hold different types while preserving type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Bool(bool),
    Usize(usize),
    OptionF64(Option<f64>),
    String(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ConfigValue::Usize(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::OptionF64(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}
