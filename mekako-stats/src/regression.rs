//! Simple linear regression

use crate::distributions::StudentT;
use crate::helpers::{
    binary_scale, extract_two_samples, require_args, require_equal_len, require_finite, require_min_len,
    Moments,
};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

// Keeps the t statistic finite when |r| = 1
const TINY: f64 = 1.0e-20;

/// Least-squares fit of y = intercept + slope · x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    /// Two-sided p for H₀: slope = 0
    pub p_value: f64,
    pub std_err: f64,
    pub intercept_std_err: f64,
}

impl RegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

impl From<RegressionResult> for Value {
    fn from(r: RegressionResult) -> Self {
        Value::object([
            ("slope", Value::Number(r.slope)),
            ("intercept", Value::Number(r.intercept)),
            ("r", Value::Number(r.r)),
            ("r_squared", Value::Number(r.r_squared)),
            ("p_value", Value::Number(r.p_value)),
            ("std_err", Value::Number(r.std_err)),
            ("intercept_std_err", Value::Number(r.intercept_std_err)),
        ])
    }
}

pub fn linregress(x: &[f64], y: &[f64]) -> Result<RegressionResult, StatError> {
    const F: &str = "linregress";
    require_equal_len(F, x, y)?;
    require_min_len(F, "x", x, 2)?;

    let n = x.len() as f64;
    // moments of the data scaled by powers of two, so squares cannot overflow
    let (cx, cy) = (binary_scale(x), binary_scale(y));
    let xs: Vec<f64> = x.iter().map(|v| v / cx).collect();
    let ys: Vec<f64> = y.iter().map(|v| v / cy).collect();
    let Moments { mx, my, sxx, syy, sxy } = Moments::of(&xs, &ys);

    if sxx == 0.0 {
        return Err(StatError::domain_error(format!(
            "{}(): x is constant, the slope is undefined",
            F
        ))
        .in_function(F)
        .for_argument("x"));
    }

    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    let slope = sxy / sxx * (cy / cx);
    let intercept = my * cy - slope * (mx * cx);

    let (p_value, std_err, intercept_std_err) = if x.len() == 2 {
        // two points fit exactly
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0, 0.0)
    } else {
        let df = n - 2.0;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        let p = StudentT::new(df)?.two_sided_p(t);
        let se = ((1.0 - r * r) * syy / sxx / df).max(0.0).sqrt();
        (p, se * (cy / cx), se * cy * (sxx + mx * mx).sqrt())
    };

    require_finite(F, "the fitted line", &[slope, intercept, std_err, intercept_std_err])?;

    Ok(RegressionResult {
        slope,
        intercept,
        r,
        r_squared: (r * r).clamp(0.0, 1.0),
        p_value,
        std_err,
        intercept_std_err,
    })
}

// ============ LinearReg ============

pub struct LinearReg;

static LINEAR_REG_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "x",
        typ: "List<Number>",
        description: "Independent variable",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "y",
        typ: "List<Number>",
        description: "Dependent variable (same length)",
        optional: false,
        default: None,
    },
];

static LINEAR_REG_EXAMPLES: [&str; 1] = ["linear_reg([1,2,3,4], [2,4,6,8]) → {slope: 2, intercept: 0, ...}"];

static LINEAR_REG_RELATED: [&str; 1] = ["correlation"];

impl FunctionPlugin for LinearReg {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "linear_reg",
            description: "Simple linear regression with standard errors and slope p-value",
            usage: "linear_reg(x, y)",
            args: &LINEAR_REG_ARGS,
            returns: "Object",
            examples: &LINEAR_REG_EXAMPLES,
            category: "stats/regression",
            source: None,
            related: &LINEAR_REG_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("linear_reg", args, 2, 2)?;
            let (x, y) = extract_two_samples("linear_reg", args)?;
            linregress(x.values(), y.values())
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
    fn test_perfect_line() {
        let fit = linregress(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.std_err.abs() < 1e-6);
        assert!(fit.p_value < 1e-6);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_fit() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linregress(&x, &y).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        assert!((fit.r_squared - 0.6).abs() < 1e-12);
        // residual variance 2.4 / 3 = 0.8, slope se = sqrt(0.8 / 10)
        assert!((fit.std_err - 0.08f64.sqrt()).abs() < 1e-12);
        assert!((fit.intercept_std_err - 0.08f64.sqrt() * 11f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_two_points() {
        let fit = linregress(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.std_err, 0.0);

        let flat = linregress(&[0.0, 1.0], &[2.0, 2.0]).unwrap();
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.p_value, 1.0);
        assert_eq!(flat.r, 0.0);
    }

    #[test]
    fn test_constant_x_is_domain_error() {
        let err = linregress(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_domain());
        assert!(linregress(&[1.0, 2.0], &[1.0]).unwrap_err().is_domain());
        assert!(linregress(&[1.0], &[1.0]).unwrap_err().is_domain());
    }

    #[test]
    fn test_huge_magnitudes_do_not_overflow_moments() {
        let fit = linregress(&[1e200, -1e200, 0.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((fit.r + 0.5).abs() < 1e-12);
        assert!((fit.slope * 1e200 + 0.5).abs() < 1e-12);
        assert!((fit.intercept - 2.0).abs() < 1e-12);
        assert!(fit.std_err.is_finite() && fit.intercept_std_err.is_finite());
    }

    #[test]
    fn test_unrepresentable_slope_is_computation_error() {
        let err = linregress(&[1e-300, 2e-300, 4e-300], &[1e300, -1e300, 0.0]).unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_linear_reg_plugin() {
        let args = vec![Value::from(vec![1.0, 2.0, 3.0]), Value::from(vec![2.0, 4.0, 6.0])];
        let result = LinearReg.call(&args, &eval_ctx());
        assert!((result.get("slope").as_number().unwrap() - 2.0).abs() < 1e-12);
        assert!(result.get("intercept_std_err").as_number().is_some());
    }
}
