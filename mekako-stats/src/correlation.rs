//! Bivariate correlation: Pearson and Spearman

use crate::distributions::StudentT;
use crate::helpers::{
    binary_scale, extract_two_samples, ranks, require_args, require_equal_len, require_min_len, Moments,
};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

/// Correlation coefficient with its two-sided p-value (H₀: ρ = 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

impl From<CorrelationResult> for Value {
    fn from(c: CorrelationResult) -> Self {
        Value::object([
            ("r", Value::Number(c.r)),
            ("p_value", Value::Number(c.p_value)),
            ("n", Value::from(c.n as u64)),
        ])
    }
}

/// Pearson product-moment correlation
pub fn pearson(x: &[f64], y: &[f64]) -> Result<CorrelationResult, StatError> {
    correlate("pearson", x, y)
}

/// Spearman rank correlation: Pearson on average ranks
pub fn spearman(x: &[f64], y: &[f64]) -> Result<CorrelationResult, StatError> {
    const F: &str = "spearman";
    check_pairs(F, x, y)?;
    correlate(F, &ranks(x), &ranks(y))
}

fn check_pairs(func: &str, x: &[f64], y: &[f64]) -> Result<(), StatError> {
    require_equal_len(func, x, y)?;
    require_min_len(func, "x", x, 2)
}

fn correlate(func: &str, x: &[f64], y: &[f64]) -> Result<CorrelationResult, StatError> {
    check_pairs(func, x, y)?;

    // r is scale free; power-of-two scaling keeps the squares finite
    let (cx, cy) = (binary_scale(x), binary_scale(y));
    let xs: Vec<f64> = x.iter().map(|v| v / cx).collect();
    let ys: Vec<f64> = y.iter().map(|v| v / cy).collect();
    let Moments { sxx, syy, sxy, .. } = Moments::of(&xs, &ys);

    if sxx == 0.0 || syy == 0.0 {
        let which = if sxx == 0.0 { "x" } else { "y" };
        return Err(StatError::domain_error(format!(
            "{}(): {} is constant, correlation is undefined",
            func, which
        ))
        .in_function(func)
        .for_argument(which));
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    let n = x.len();
    Ok(CorrelationResult {
        r,
        p_value: correlation_p_value(r, n)?,
        n,
    })
}

/// Two-sided p for r under H₀: ρ = 0, from t with n − 2 df
pub(crate) fn correlation_p_value(r: f64, n: usize) -> Result<f64, StatError> {
    if n <= 2 {
        return Ok(1.0);
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    Ok(StudentT::new(df)?.two_sided_p(t))
}

// ============ Plugins ============

static PAIR_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "x",
        typ: "List<Number>",
        description: "First variable",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "y",
        typ: "List<Number>",
        description: "Second variable (same length)",
        optional: false,
        default: None,
    },
];

pub struct Correlation;

static CORRELATION_EXAMPLES: [&str; 1] = ["correlation([1,2,3,4], [2,4,5,8])"];

static CORRELATION_RELATED: [&str; 2] = ["spearman", "linear_reg"];

impl FunctionPlugin for Correlation {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "correlation",
            description: "Pearson correlation coefficient with p-value",
            usage: "correlation(x, y)",
            args: &PAIR_ARGS,
            returns: "Object",
            examples: &CORRELATION_EXAMPLES,
            category: "stats/bivariate",
            source: None,
            related: &CORRELATION_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("correlation", args, 2, 2)?;
            let (x, y) = extract_two_samples("correlation", args)?;
            pearson(x.values(), y.values())
        };
        crate::hypothesis::decision_value(run(), ctx.alpha())
    }
}

pub struct Spearman;

static SPEARMAN_EXAMPLES: [&str; 1] = ["spearman([1,2,3,4], [1,4,9,16]) → r = 1"];

static SPEARMAN_RELATED: [&str; 1] = ["correlation"];

impl FunctionPlugin for Spearman {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "spearman",
            description: "Spearman rank correlation with p-value",
            usage: "spearman(x, y)",
            args: &PAIR_ARGS,
            returns: "Object",
            examples: &SPEARMAN_EXAMPLES,
            category: "stats/bivariate",
            source: None,
            related: &SPEARMAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("spearman", args, 2, 2)?;
            let (x, y) = extract_two_samples("spearman", args)?;
            spearman(x.values(), y.values())
        };
        crate::hypothesis::decision_value(run(), ctx.alpha())
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
    fn test_pearson_perfect() {
        let c = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((c.r - 1.0).abs() < 1e-12);
        assert!(c.p_value < 1e-6);
        assert_eq!(c.n, 4);

        let neg = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((neg.r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let c = pearson(&x, &y).unwrap();
        // sxy = 6, sxx = 10, syy = 6
        assert!((c.r - 6.0 / 60f64.sqrt()).abs() < 1e-12);
        assert!(c.p_value > 0.1 && c.p_value < 0.2);
    }

    #[test]
    fn test_two_points_has_unit_p() {
        let c = pearson(&[1.0, 2.0], &[5.0, 3.0]).unwrap();
        assert!((c.r + 1.0).abs() < 1e-12);
        assert_eq!(c.p_value, 1.0);
    }

    #[test]
    fn test_mismatched_lengths_are_domain_errors() {
        let err = pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("equal length"));
        assert!(spearman(&[1.0, 2.0], &[1.0]).unwrap_err().is_domain());
    }

    #[test]
    fn test_constant_input() {
        let err = pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.context.unwrap().argument.as_deref(), Some("y"));
    }

    #[test]
    fn test_pearson_huge_magnitudes() {
        let c = pearson(&[1e200, -1e200, 0.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((c.r + 0.5).abs() < 1e-12, "r = {}", c.r);
        assert!(c.p_value > 0.5 && c.p_value < 1.0);

        let tiny = pearson(&[1e-300, 2e-300, 3e-300], &[3.0, 2.0, 1.0]).unwrap();
        assert!((tiny.r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spearman_monotone() {
        let c = spearman(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 8.0, 27.0, 64.0, 125.0]).unwrap();
        assert!((c.r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spearman_with_ties() {
        let c = spearman(&[1.0, 2.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(c.r > 0.9 && c.r < 1.0);
    }

    #[test]
    fn test_correlation_plugin() {
        let args = vec![Value::from("1,2,3,4"), Value::from("2,4,6,8")];
        let result = Correlation.call(&args, &eval_ctx());
        assert!((result.get("r").as_number().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(result.get("reject").as_bool(), Some(true));

        let bad = vec![Value::from("1,2,3"), Value::from("1,2")];
        assert!(Correlation.call(&bad, &eval_ctx()).as_error().unwrap().is_domain());
    }
}
