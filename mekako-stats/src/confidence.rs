//! Confidence intervals: mean, proportion, difference of means

use crate::distributions::{ContinuousDistribution, Normal, StudentT};
use crate::helpers::{
    count_arg, mean, number_arg, optional_number_arg, require_args, require_confidence,
    require_min_len, require_positive, sample_arg, sample_variance, to_value,
};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Symmetric interval `estimate ± margin`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
    pub estimate: f64,
    pub margin: f64,
}

impl ConfidenceInterval {
    fn around(estimate: f64, margin: f64, confidence_level: f64) -> Self {
        Self {
            lower: estimate - margin,
            upper: estimate + margin,
            confidence_level,
            estimate,
            margin,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl From<ConfidenceInterval> for Value {
    fn from(ci: ConfidenceInterval) -> Self {
        Value::object([
            ("lower", Value::Number(ci.lower)),
            ("upper", Value::Number(ci.upper)),
            ("confidence_level", Value::Number(ci.confidence_level)),
            ("estimate", Value::Number(ci.estimate)),
            ("margin", Value::Number(ci.margin)),
        ])
    }
}

fn two_sided(level: f64) -> f64 {
    (1.0 + level) / 2.0
}

fn require_count(func: &str, name: &str, n: f64, min: f64) -> Result<(), StatError> {
    if n.fract() != 0.0 || n < min {
        return Err(StatError::invalid_argument(
            func,
            name,
            &format!("an integer ≥ {}", min),
            n,
        ));
    }
    Ok(())
}

/// t interval for a mean from summary statistics
pub fn ci_mean(sample_mean: f64, std: f64, n: f64, confidence: f64) -> Result<ConfidenceInterval, StatError> {
    const F: &str = "ci_mean";
    require_positive(F, "std", std)?;
    require_count(F, "n", n, 2.0)?;
    require_confidence(F, confidence)?;

    let t = StudentT::new(n - 1.0)?.quantile(two_sided(confidence))?;
    Ok(ConfidenceInterval::around(sample_mean, t * std / n.sqrt(), confidence))
}

/// t interval for the mean of a raw sample
pub fn ci_mean_sample(sample: &[f64], confidence: f64) -> Result<ConfidenceInterval, StatError> {
    require_min_len("ci", "sample", sample, 2)?;
    let std = sample_variance(sample).sqrt();
    if std == 0.0 {
        return Err(StatError::domain_error("ci(): sample has zero variance, the interval is degenerate")
            .in_function("ci")
            .for_argument("sample"));
    }
    ci_mean(mean(sample), std, sample.len() as f64, confidence)
}

/// Wald interval for a proportion. Zero successes are rejected.
pub fn ci_proportion(successes: u64, n: u64, confidence: f64) -> Result<ConfidenceInterval, StatError> {
    const F: &str = "ci_proportion";
    if n == 0 {
        return Err(StatError::invalid_argument(F, "n", "> 0", n));
    }
    if successes == 0 {
        return Err(StatError::invalid_argument(F, "successes", "> 0", successes));
    }
    if successes > n {
        return Err(StatError::invalid_argument(F, "successes", &format!("≤ n ({})", n), successes));
    }
    require_confidence(F, confidence)?;

    let p = successes as f64 / n as f64;
    let z = Normal::standard().quantile(two_sided(confidence))?;
    let margin = z * (p * (1.0 - p) / n as f64).sqrt();
    Ok(ConfidenceInterval::around(p, margin, confidence))
}

/// Interval for m1 − m2 with unpooled standard error and n1 + n2 − 2 df
pub fn ci_diff(
    mean1: f64,
    std1: f64,
    n1: f64,
    mean2: f64,
    std2: f64,
    n2: f64,
    confidence: f64,
) -> Result<ConfidenceInterval, StatError> {
    const F: &str = "ci_diff";
    require_positive(F, "std1", std1)?;
    require_positive(F, "std2", std2)?;
    require_count(F, "n1", n1, 1.0)?;
    require_count(F, "n2", n2, 1.0)?;
    if n1 + n2 < 3.0 {
        return Err(StatError::invalid_argument(F, "n1 + n2", "≥ 3", n1 + n2));
    }
    require_confidence(F, confidence)?;

    let se = (std1 * std1 / n1 + std2 * std2 / n2).sqrt();
    let t = StudentT::new(n1 + n2 - 2.0)?.quantile(two_sided(confidence))?;
    Ok(ConfidenceInterval::around(mean1 - mean2, t * se, confidence))
}

// ============ Plugins ============

fn confidence_arg(func: &str, args: &[Value], idx: usize) -> Result<f64, StatError> {
    optional_number_arg(func, args, idx, "confidence", DEFAULT_CONFIDENCE)
}

pub struct Ci;

static CI_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "list",
        typ: "List<Number>",
        description: "Sample data",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "confidence",
        typ: "Number",
        description: "Confidence level in (0, 1)",
        optional: true,
        default: Some("0.95"),
    },
];

static CI_EXAMPLES: [&str; 2] = ["ci([1,2,3,4,5]) → {lower: 1.037, upper: 4.963, ...}", "ci([1,2,3,4,5], 0.99)"];

static CI_RELATED: [&str; 2] = ["moe", "ci_mean"];

impl FunctionPlugin for Ci {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ci",
            description: "Confidence interval for the mean of a sample",
            usage: "ci(list, [confidence])",
            args: &CI_ARGS,
            returns: "Object",
            examples: &CI_EXAMPLES,
            category: "stats/confidence",
            source: None,
            related: &CI_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("ci", args, 1, 2)?;
            let sample = sample_arg("ci", args, 0, "list")?;
            ci_mean_sample(sample.values(), confidence_arg("ci", args, 1)?)
        };
        to_value(run())
    }
}

pub struct Moe;

static MOE_EXAMPLES: [&str; 1] = ["moe([1,2,3,4,5]) → 1.963"];

static MOE_RELATED: [&str; 1] = ["ci"];

impl FunctionPlugin for Moe {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "moe",
            description: "Margin of error for the mean of a sample",
            usage: "moe(list, [confidence])",
            args: &CI_ARGS,
            returns: "Number",
            examples: &MOE_EXAMPLES,
            category: "stats/confidence",
            source: None,
            related: &MOE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("moe", args, 1, 2)?;
            let sample = sample_arg("moe", args, 0, "list")?;
            let ci = ci_mean_sample(sample.values(), confidence_arg("moe", args, 1)?)?;
            Ok(ci.margin)
        };
        to_value(run())
    }
}

pub struct CiMean;

static CI_MEAN_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("mean", "Number", "Sample mean"),
    ArgMeta::required("std", "Number", "Sample standard deviation (> 0)"),
    ArgMeta::required("n", "Number", "Sample size (integer ≥ 2)"),
    ArgMeta::optional("confidence", "Number", "Confidence level in (0, 1)", "0.95"),
];

static CI_MEAN_EXAMPLES: [&str; 1] = ["ci_mean(100, 15, 30) → {lower: 94.40, upper: 105.60, ...}"];

static CI_MEAN_RELATED: [&str; 2] = ["ci", "t_test_1_stats"];

impl FunctionPlugin for CiMean {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ci_mean",
            description: "Confidence interval for a mean from summary statistics",
            usage: "ci_mean(mean, std, n, [confidence])",
            args: &CI_MEAN_ARGS,
            returns: "Object",
            examples: &CI_MEAN_EXAMPLES,
            category: "stats/confidence",
            source: None,
            related: &CI_MEAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "ci_mean";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 3, 4)?;
            ci_mean(
                number_arg(F, args, 0, "mean")?,
                number_arg(F, args, 1, "std")?,
                number_arg(F, args, 2, "n")?,
                confidence_arg(F, args, 3)?,
            )
        };
        to_value(run())
    }
}

pub struct CiProportion;

static CI_PROPORTION_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("successes", "Number", "Number of successes (1 ≤ successes ≤ n)"),
    ArgMeta::required("n", "Number", "Number of trials (> 0)"),
    ArgMeta::optional("confidence", "Number", "Confidence level in (0, 1)", "0.95"),
];

static CI_PROPORTION_EXAMPLES: [&str; 1] = ["ci_proportion(40, 100) → {lower: 0.304, upper: 0.496, ...}"];

static CI_PROPORTION_RELATED: [&str; 1] = ["binom_cdf"];

impl FunctionPlugin for CiProportion {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ci_proportion",
            description: "Normal-approximation interval for a proportion",
            usage: "ci_proportion(successes, n, [confidence])",
            args: &CI_PROPORTION_ARGS,
            returns: "Object",
            examples: &CI_PROPORTION_EXAMPLES,
            category: "stats/confidence",
            source: None,
            related: &CI_PROPORTION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "ci_proportion";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 2, 3)?;
            ci_proportion(
                count_arg(F, args, 0, "successes")?,
                count_arg(F, args, 1, "n")?,
                confidence_arg(F, args, 2)?,
            )
        };
        to_value(run())
    }
}

pub struct CiDiff;

static CI_DIFF_ARGS: [ArgMeta; 7] = [
    ArgMeta::required("mean1", "Number", "Mean of group 1"),
    ArgMeta::required("std1", "Number", "Standard deviation of group 1 (> 0)"),
    ArgMeta::required("n1", "Number", "Size of group 1"),
    ArgMeta::required("mean2", "Number", "Mean of group 2"),
    ArgMeta::required("std2", "Number", "Standard deviation of group 2 (> 0)"),
    ArgMeta::required("n2", "Number", "Size of group 2"),
    ArgMeta::optional("confidence", "Number", "Confidence level in (0, 1)", "0.95"),
];

static CI_DIFF_EXAMPLES: [&str; 1] = ["ci_diff(10, 2, 20, 8, 3, 25)"];

static CI_DIFF_RELATED: [&str; 2] = ["t_test_2_stats", "ci_mean"];

impl FunctionPlugin for CiDiff {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ci_diff",
            description: "Confidence interval for a difference of two means",
            usage: "ci_diff(mean1, std1, n1, mean2, std2, n2, [confidence])",
            args: &CI_DIFF_ARGS,
            returns: "Object",
            examples: &CI_DIFF_EXAMPLES,
            category: "stats/confidence",
            source: None,
            related: &CI_DIFF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "ci_diff";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 6, 7)?;
            ci_diff(
                number_arg(F, args, 0, "mean1")?,
                number_arg(F, args, 1, "std1")?,
                number_arg(F, args, 2, "n1")?,
                number_arg(F, args, 3, "mean2")?,
                number_arg(F, args, 4, "std2")?,
                number_arg(F, args, 5, "n2")?,
                confidence_arg(F, args, 6)?,
            )
        };
        to_value(run())
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
    fn test_ci_mean_example() {
        let ci = ci_mean(100.0, 15.0, 30.0, 0.95).unwrap();
        assert!((ci.lower - 94.4).abs() < 0.01, "lower = {}", ci.lower);
        assert!((ci.upper - 105.6).abs() < 0.01, "upper = {}", ci.upper);
        assert!(ci.contains(100.0));
        assert!((ci.width() - 2.0 * ci.margin).abs() < 1e-12);
    }

    #[test]
    fn test_ci_mean_rejects_bad_input() {
        assert!(ci_mean(0.0, 0.0, 10.0, 0.95).unwrap_err().is_domain());
        assert!(ci_mean(0.0, 1.0, 1.0, 0.95).unwrap_err().is_domain());
        assert!(ci_mean(0.0, 1.0, 10.0, 1.0).unwrap_err().is_domain());
        assert!(ci_mean(0.0, 1.0, 10.0, 0.0).unwrap_err().is_domain());
    }

    #[test]
    fn test_wider_level_wider_interval() {
        let narrow = ci_mean(0.0, 1.0, 20.0, 0.90).unwrap();
        let wide = ci_mean(0.0, 1.0, 20.0, 0.99).unwrap();
        assert!(wide.width() > narrow.width());
    }

    #[test]
    fn test_ci_mean_sample() {
        let ci = ci_mean_sample(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.95).unwrap();
        // t(0.975, 4) = 2.776445, s = sqrt(2.5)
        let margin = 2.776_445 * 2.5f64.sqrt() / 5f64.sqrt();
        assert!((ci.margin - margin).abs() < 1e-5);
        assert_eq!(ci.estimate, 3.0);
        assert!(ci_mean_sample(&[2.0, 2.0], 0.95).unwrap_err().is_domain());
    }

    #[test]
    fn test_ci_proportion() {
        let ci = ci_proportion(40, 100, 0.95).unwrap();
        let margin = 1.959_964 * (0.24f64 / 100.0).sqrt();
        assert!((ci.margin - margin).abs() < 1e-6);
        assert_eq!(ci.estimate, 0.4);
    }

    #[test]
    fn test_ci_proportion_rejects_zero_successes() {
        let err = ci_proportion(0, 10, 0.95).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("successes must be > 0"));
        assert!(ci_proportion(11, 10, 0.95).unwrap_err().is_domain());
        assert!(ci_proportion(1, 0, 0.95).unwrap_err().is_domain());
    }

    #[test]
    fn test_ci_diff() {
        let ci = ci_diff(10.0, 2.0, 20.0, 8.0, 3.0, 25.0, 0.95).unwrap();
        assert_eq!(ci.estimate, 2.0);
        assert!(ci.lower < 2.0 && ci.upper > 2.0);
        assert!(ci_diff(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.95).unwrap_err().is_domain());
        assert!(ci_diff(1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 0.95).is_ok());
    }

    #[test]
    fn test_ci_plugin_default_level() {
        let args = vec![Value::from(vec![1.0, 2.0, 3.0, 4.0, 5.0])];
        let result = Ci.call(&args, &eval_ctx());
        assert_eq!(result.get("confidence_level").as_number(), Some(0.95));

        let margin = Moe.call(&args, &eval_ctx()).as_number().unwrap();
        assert!((result.get("margin").as_number().unwrap() - margin).abs() < 1e-12);
    }

    #[test]
    fn test_ci_proportion_plugin_fractional_count() {
        let args = vec![Value::Number(2.5), Value::Number(10.0)];
        assert!(CiProportion.call(&args, &eval_ctx()).as_error().unwrap().is_domain());
    }
}
