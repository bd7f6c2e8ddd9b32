//! Samples and labelled groups
//!
//! A `Sample` is a non-empty sequence of finite reals. Parsing is fail-fast:
//! a single malformed token rejects the whole input, nothing is skipped.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error type for sample parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("sample is empty")]
    Empty,

    #[error("'{token}' (value {position}) is not a valid number")]
    InvalidToken { token: String, position: usize },

    #[error("'{token}' (value {position}) is not a finite number")]
    NonFinite { token: String, position: usize },

    #[error("'{0}' is missing a 'label:' prefix")]
    MissingLabel(String),
}

/// Non-empty ordered sequence of finite reals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Validate already-numeric data
    pub fn new(values: Vec<f64>) -> Result<Self, SampleError> {
        if values.is_empty() {
            return Err(SampleError::Empty);
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(SampleError::NonFinite {
                token: values[i].to_string(),
                position: i + 1,
            });
        }
        Ok(Self { values })
    }

    /// Parse a delimited list: `1,2,3` or `1 2 3`
    pub fn parse(text: &str) -> Result<Self, SampleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SampleError::Empty);
        }

        let tokens: Vec<&str> = if text.contains(',') {
            text.split(',').map(str::trim).collect()
        } else {
            text.split_whitespace().collect()
        };

        let mut values = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let value: f64 = token.parse().map_err(|_| SampleError::InvalidToken {
                token: token.to_string(),
                position: i + 1,
            })?;
            if !value.is_finite() {
                return Err(SampleError::NonFinite {
                    token: token.to_string(),
                    position: i + 1,
                });
            }
            values.push(value);
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl FromStr for Sample {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<f64>> for Sample {
    type Error = SampleError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Sample> for Vec<f64> {
    fn from(sample: Sample) -> Self {
        sample.values
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// A sample with a label, written `label: x1,x2,...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub sample: Sample,
}

impl Group {
    /// Parse one labelled group. `index` is 1-based and names unlabelled groups.
    pub fn parse(text: &str, index: usize) -> Result<Self, SampleError> {
        let (label, data) = text
            .split_once(':')
            .ok_or_else(|| SampleError::MissingLabel(text.trim().to_string()))?;

        let label = label.trim();
        let label = if label.is_empty() {
            format!("group{}", index)
        } else {
            label.to_string()
        };

        Ok(Self {
            label,
            sample: Sample::parse(data)?,
        })
    }
}

/// Parse a sequence of labelled groups, stopping at the first bad one
pub fn parse_groups<'a, I>(items: I) -> Result<Vec<Group>, SampleError>
where
    I: IntoIterator<Item = &'a str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Group::parse(item, i + 1))
        .collect()
}
