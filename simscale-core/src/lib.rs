//! # simscale-core
//!
//! Data model and numeric building blocks shared by the `simscale` engines:
//!
//! - [`matrix::Dataset`]: dense row-major dataset, one row per item
//! - [`dtype`]: supported element kinds and explicit fallback conversion
//! - [`preflight`]: validation/conversion of dynamic grids into a `Dataset`
//! - [`distance`]: cosine and hamming similarity kernels (row and block level)
//! - [`sparse`]: CSR helpers on top of `sprs` (diagonal, zero elimination,
//!   transpose, row stacking, dense interop)
//! - [`partition`]: partition and permutation validation
//!
//! Nothing here schedules work: the parallel fan-out lives in `simscale`.

pub mod distance;
pub mod dtype;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod preflight;
pub mod sparse;

pub use dtype::{Cell, DType, Element};
pub use error::{CoreError, CoreResult};
pub use matrix::Dataset;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub(crate) fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");

        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
}
