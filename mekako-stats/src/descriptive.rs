//! Descriptive statistics: mean, median, variance, stddev, five-number summary

use crate::helpers::{extract_sample, mean, quantile_sorted, require_min_len, sample_variance, sorted, to_value};
use mekako_core::{Sample, StatError};
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

/// Count, moments and quartiles of a sample. Quartiles are linearly
/// interpolated; `std` is the sample standard deviation (0 for one value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Summary {
    pub fn of(sample: &Sample) -> Self {
        let data = sample.values();
        let s = sorted(data);
        let std = if data.len() > 1 { sample_variance(data).sqrt() } else { 0.0 };
        Self {
            count: data.len(),
            mean: mean(data),
            std,
            min: s[0],
            q1: quantile_sorted(&s, 0.25),
            median: quantile_sorted(&s, 0.5),
            q3: quantile_sorted(&s, 0.75),
            max: s[s.len() - 1],
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

impl From<Summary> for Value {
    fn from(s: Summary) -> Self {
        Value::object([
            ("count", Value::from(s.count as u64)),
            ("mean", Value::Number(s.mean)),
            ("std", Value::Number(s.std)),
            ("min", Value::Number(s.min)),
            ("q1", Value::Number(s.q1)),
            ("median", Value::Number(s.median)),
            ("q3", Value::Number(s.q3)),
            ("max", Value::Number(s.max)),
        ])
    }
}

/// Sample variance (n − 1), at least two values
pub fn variance(data: &[f64]) -> Result<f64, StatError> {
    require_min_len("variance", "data", data, 2)?;
    Ok(sample_variance(data))
}

pub fn stddev(data: &[f64]) -> Result<f64, StatError> {
    require_min_len("stddev", "data", data, 2)?;
    Ok(sample_variance(data).sqrt())
}

static VALUES_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "values",
    typ: "List<Number> | Number...",
    description: "Sample values",
    optional: false,
    default: None,
}];

// ============ Mean ============

pub struct Mean;

static MEAN_EXAMPLES: [&str; 3] = ["mean(1, 2, 3, 4, 5) → 3", "mean([10, 20, 30]) → 20", "mean(\"1 2 3\") → 2"];

static MEAN_RELATED: [&str; 2] = ["median", "summary"];

impl FunctionPlugin for Mean {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mean",
            description: "Arithmetic mean of values",
            usage: "mean(values) or mean(a, b, c, ...)",
            args: &VALUES_ARGS,
            returns: "Number",
            examples: &MEAN_EXAMPLES,
            category: "stats/descriptive",
            source: None,
            related: &MEAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_sample("mean", args) {
            Ok(sample) => Value::Number(mean(sample.values())),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Median ============

pub struct Median;

static MEDIAN_EXAMPLES: [&str; 2] = ["median(1, 2, 3, 4, 5) → 3", "median(1, 2, 3, 4) → 2.5"];

static MEDIAN_RELATED: [&str; 2] = ["mean", "summary"];

impl FunctionPlugin for Median {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "median",
            description: "Middle value (average of the two middle values for even counts)",
            usage: "median(values)",
            args: &VALUES_ARGS,
            returns: "Number",
            examples: &MEDIAN_EXAMPLES,
            category: "stats/descriptive",
            source: None,
            related: &MEDIAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match extract_sample("median", args) {
            Ok(sample) => Value::Number(crate::helpers::median(sample.values())),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ Variance ============

pub struct Variance;

static VARIANCE_EXAMPLES: [&str; 1] = ["variance(2, 4, 4, 4, 5, 5, 7, 9) → 4.571"];

static VARIANCE_RELATED: [&str; 2] = ["stddev", "levene"];

impl FunctionPlugin for Variance {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "variance",
            description: "Sample variance (divides by n-1)",
            usage: "variance(values)",
            args: &VALUES_ARGS,
            returns: "Number",
            examples: &VARIANCE_EXAMPLES,
            category: "stats/descriptive",
            source: None,
            related: &VARIANCE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(extract_sample("variance", args).and_then(|s| variance(s.values())))
    }
}

// ============ Stddev ============

pub struct Stddev;

static STDDEV_EXAMPLES: [&str; 1] = ["stddev(2, 4, 4, 4, 5, 5, 7, 9) → 2.138"];

static STDDEV_RELATED: [&str; 2] = ["variance", "ci"];

impl FunctionPlugin for Stddev {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "stddev",
            description: "Sample standard deviation",
            usage: "stddev(values)",
            args: &VALUES_ARGS,
            returns: "Number",
            examples: &STDDEV_EXAMPLES,
            category: "stats/descriptive",
            source: None,
            related: &STDDEV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(extract_sample("stddev", args).and_then(|s| stddev(s.values())))
    }
}

// ============ Summary ============

pub struct SummaryStats;

static SUMMARY_EXAMPLES: [&str; 1] = ["summary(1, 2, 3, 4) → {count: 4, mean: 2.5, q1: 1.75, ...}"];

static SUMMARY_RELATED: [&str; 3] = ["mean", "median", "stddev"];

impl FunctionPlugin for SummaryStats {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "summary",
            description: "Count, mean, standard deviation and five-number summary",
            usage: "summary(values)",
            args: &VALUES_ARGS,
            returns: "Object",
            examples: &SUMMARY_EXAMPLES,
            category: "stats/descriptive",
            source: None,
            related: &SUMMARY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(extract_sample("summary", args).map(|s| Summary::of(&s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    #[test]
    fn test_mean_forms() {
        let varargs: Vec<Value> = [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().map(Value::Number).collect();
        assert_eq!(Mean.call(&varargs, &eval_ctx()).as_number(), Some(3.0));
        let text = vec![Value::from("10 20 30")];
        assert_eq!(Mean.call(&text, &eval_ctx()).as_number(), Some(20.0));
    }

    #[test]
    fn test_mean_bad_token() {
        let result = Mean.call(&[Value::from("1,two,3")], &eval_ctx());
        assert!(result.as_error().unwrap().is_parse());
    }

    #[test]
    fn test_median_even() {
        let args = vec![Value::from(vec![4.0, 1.0, 3.0, 2.0])];
        assert_eq!(Median.call(&args, &eval_ctx()).as_number(), Some(2.5));
    }

    #[test]
    fn test_variance_and_stddev() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&data).unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert!((stddev(&data).unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(variance(&[1.0]).unwrap_err().is_domain());
    }

    #[test]
    fn test_variance_plugin_single_value() {
        let result = Variance.call(&[Value::Number(3.0)], &eval_ctx());
        assert!(result.as_error().unwrap().is_domain());
    }

    #[test]
    fn test_summary() {
        let sample = Sample::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let s = Summary::of(&sample);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.iqr(), 1.5);
    }

    #[test]
    fn test_summary_single_value() {
        let s = Summary::of(&Sample::new(vec![7.0]).unwrap());
        assert_eq!(s.std, 0.0);
        assert_eq!(s.q1, 7.0);
        assert_eq!(s.q3, 7.0);
    }

    #[test]
    fn test_summary_plugin_shape() {
        let result = SummaryStats.call(&[Value::from("1,2,3,4")], &eval_ctx());
        let obj = result.as_object().unwrap();
        for key in ["count", "mean", "std", "min", "q1", "median", "q3", "max"] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(result.get("count").as_number(), Some(4.0));
    }
}
