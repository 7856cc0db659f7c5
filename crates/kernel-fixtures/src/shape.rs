//! Per-argument shape qualifiers.
//!
//! Some kernels only accept a scalar for a given argument (a map lookup key,
//! for example) while most accept either representation. [`ArgShape`] lets a
//! fixture pin the representation of each column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FixtureError;

/// Shape qualifier for one declared argument type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgShape {
    /// Array for row-list payloads, scalar for a bare payload.
    #[default]
    Any,
    /// Always a full column.
    Array,
    /// Always a single value broadcast across rows.
    Scalar,
}

impl ArgShape {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Array => "array",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgShape {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "array" => Ok(Self::Array),
            "scalar" => Ok(Self::Scalar),
            other => Err(FixtureError::Config {
                message: format!("unknown arg shape '{other}' (expected any, array or scalar)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_any() {
        assert_eq!(ArgShape::default(), ArgShape::Any);
    }

    #[test]
    fn serde_roundtrip_all_variants() {
        for shape in [ArgShape::Any, ArgShape::Array, ArgShape::Scalar] {
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{shape}\""));
            let back: ArgShape = serde_json::from_str(&json).unwrap();
            assert_eq!(shape, back);
        }
    }

    #[test]
    fn parse_rejects_unknown_shape() {
        assert_eq!("scalar".parse::<ArgShape>().unwrap(), ArgShape::Scalar);
        let err = "column".parse::<ArgShape>().unwrap_err();
        assert!(err.to_string().contains("unknown arg shape"), "got: {err}");
    }
}
