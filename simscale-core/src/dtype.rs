//! Element kinds accepted by the similarity engine.
//!
//! A `Dataset` is always stored as `f64`, but it remembers which of the five
//! supported kinds it was built from. Anything else (mixed columns, text,
//! missing values, unsigned integers) arrives as a grid of [`Cell`] values and
//! must go through one explicit conversion to a fallback [`DType`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Supported homogeneous element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

impl Default for DType {
    /// `float64` covers every convertible input, at the price of memory.
    fn default() -> Self {
        DType::Float64
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" | "boolean" => Ok(DType::Bool),
            "int32" => Ok(DType::Int32),
            "int64" => Ok(DType::Int64),
            "float32" => Ok(DType::Float32),
            "float64" => Ok(DType::Float64),
            other => Err(CoreError::Type(format!(
                "unsupported element type `{}`: expected one of bool, int32, int64, float32, float64",
                other
            ))),
        }
    }
}

/// Statically typed element of a supported kind.
/// Largest integer magnitude an `f64` holds exactly.
pub const MAX_EXACT_INT: i64 = 1 << 53;

pub trait Element: Copy + Send + Sync {
    const DTYPE: DType;

    fn to_f64(self) -> f64;

    /// Does `to_f64` keep the value exactly?
    #[inline]
    fn fits_f64(self) -> bool {
        true
    }
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::Int32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for i64 {
    const DTYPE: DType = DType::Int64;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn fits_f64(self) -> bool {
        (-MAX_EXACT_INT..=MAX_EXACT_INT).contains(&self)
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::Float32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::Float64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// A dynamically typed value, as found in heterogeneous or loosely typed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Kind this cell has on its own, if it is one of the supported kinds.
    pub fn native_dtype(&self) -> Option<DType> {
        match self {
            Cell::Bool(_) => Some(DType::Bool),
            Cell::Int(_) => Some(DType::Int64),
            Cell::Float(_) => Some(DType::Float64),
            Cell::UInt(_) | Cell::Text(_) | Cell::Missing => None,
        }
    }

    /// Convert to `target`, failing when the value cannot be represented.
    pub fn convert(&self, target: DType) -> CoreResult<f64> {
        match target {
            DType::Bool => self.to_bool().map(|b| b.to_f64()),
            DType::Int32 => self.to_int(i32::MIN as i64, i32::MAX as i64, target),
            DType::Int64 => self.to_int(-MAX_EXACT_INT, MAX_EXACT_INT, target),
            DType::Float32 => self.to_float().map(|v| v as f32 as f64),
            DType::Float64 => self.to_float(),
        }
    }

    fn to_bool(&self) -> CoreResult<bool> {
        let numeric = match self {
            Cell::Bool(b) => return Ok(*b),
            Cell::Int(v) => *v as f64,
            Cell::UInt(v) => *v as f64,
            Cell::Float(v) => *v,
            Cell::Text(s) => match s.trim() {
                "true" | "True" => return Ok(true),
                "false" | "False" => return Ok(false),
                other => parse_number(other).ok_or_else(|| self.error(DType::Bool))?,
            },
            Cell::Missing => return Err(self.error(DType::Bool)),
        };

        if numeric == 0.0 {
            Ok(false)
        } else if numeric == 1.0 {
            Ok(true)
        } else {
            Err(self.error(DType::Bool))
        }
    }

    fn to_int(&self, min: i64, max: i64, target: DType) -> CoreResult<f64> {
        let value: i64 = match self {
            Cell::Bool(b) => *b as i64,
            Cell::Int(v) => *v,
            Cell::UInt(v) => i64::try_from(*v).map_err(|_| self.error(target))?,
            Cell::Float(v) => float_to_int(*v).ok_or_else(|| self.error(target))?,
            Cell::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => parse_number(trimmed)
                        .and_then(float_to_int)
                        .ok_or_else(|| self.error(target))?,
                }
            }
            Cell::Missing => return Err(self.error(target)),
        };

        if value < min || value > max {
            return Err(CoreError::Type(format!(
                "value {} does not fit in {}",
                value, target
            )));
        }
        Ok(value as f64)
    }

    fn to_float(&self) -> CoreResult<f64> {
        match self {
            Cell::Bool(b) => Ok(b.to_f64()),
            Cell::Int(v) => Ok(*v as f64),
            Cell::UInt(v) => Ok(*v as f64),
            Cell::Float(v) => Ok(*v),
            Cell::Text(s) => parse_number(s.trim()).ok_or_else(|| self.error(DType::Float64)),
            Cell::Missing => Ok(f64::NAN),
        }
    }

    fn error(&self, target: DType) -> CoreError {
        CoreError::Type(format!(
            "cannot convert {:?} to {}; do all rows have the same number of items, \
             or is a missing value hiding somewhere?",
            self, target
        ))
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<u64> for Cell {
    fn from(v: u64) -> Self {
        Cell::UInt(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Missing, Into::into)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

fn float_to_int(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
