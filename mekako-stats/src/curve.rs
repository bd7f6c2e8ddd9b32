//! Density curves for plotting
//!
//! Continuous families are sampled on an evenly spaced grid, discrete
//! families on the integers of the window.

use crate::distributions::{Distribution, DistributionFamily};
use crate::helpers::{number_arg, require_args, require_finite, sample_arg, to_value};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use mekako_plugin::MAX_CURVE_POINTS;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampled density (or mass) of one distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub family: DistributionFamily,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl From<Curve> for Value {
    fn from(c: Curve) -> Self {
        Value::object([
            ("family", Value::Text(c.family.to_string())),
            ("x", Value::from(c.x)),
            ("y", Value::from(c.y)),
        ])
    }
}

/// Largest integer every f64 below it represents exactly (2^53)
pub const MAX_DISCRETE_X: f64 = 9_007_199_254_740_992.0;

/// `points` evenly spaced values from `low` to `high` inclusive
pub fn linspace(low: f64, high: f64, points: usize) -> Vec<f64> {
    if points == 1 {
        return vec![low];
    }
    let step = (high - low) / (points - 1) as f64;
    (0..points)
        .map(|i| if i == points - 1 { high } else { low + step * i as f64 })
        .collect()
}

/// Sample a family's density over `range` (or its default plot window).
///
/// Discrete windows are clipped to the non-negative integers; when the
/// window holds more than `points` integers it is strided.
pub fn density_curve(
    family: DistributionFamily,
    params: &[f64],
    range: Option<(f64, f64)>,
    points: usize,
) -> Result<Curve, StatError> {
    const F: &str = "density_curve";
    if !(2..=MAX_CURVE_POINTS).contains(&points) {
        return Err(StatError::invalid_argument(
            F,
            "points",
            &format!("between 2 and {}", MAX_CURVE_POINTS),
            points,
        ));
    }
    if let Some((low, high)) = range {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(StatError::domain_error(format!(
                "{}(): range must be finite with low < high, got [{}, {}]",
                F, low, high
            ))
            .in_function(F)
            .for_argument("range"));
        }
    }

    let (x, y) = match family.build(params).map_err(|e| e.in_function(F))? {
        Distribution::Continuous(dist) => {
            let (low, high) = range.unwrap_or_else(|| dist.plot_range());
            require_finite(F, "the plot window", &[low, high, high - low])?;
            let x = linspace(low, high, points);
            let y = dist.pdf_curve(&x);
            (x, y)
        }
        Distribution::Discrete(dist) => {
            let (low, high) = match range {
                Some((a, b)) => (a.max(0.0).ceil(), b.floor()),
                None => {
                    let (a, b) = dist.plot_range();
                    (a as f64, b as f64)
                }
            };
            if high < low {
                return Err(StatError::domain_error(format!(
                    "{}(): range holds no non-negative integers",
                    F
                ))
                .in_function(F)
                .for_argument("range"));
            }
            if high > MAX_DISCRETE_X {
                return Err(StatError::invalid_argument(
                    F,
                    "range",
                    &format!("within [0, {}] for discrete families", MAX_DISCRETE_X),
                    high,
                ));
            }
            let (low, high) = (low as u64, high as u64);
            let count = high - low + 1;
            let stride = count.div_ceil(points as u64).max(1);
            let ks: Vec<u64> = (low..=high).step_by(stride as usize).collect();
            let y = ks.iter().map(|k| dist.pmf(*k)).collect();
            (ks.into_iter().map(|k| k as f64).collect(), y)
        }
    };

    debug!(family = %family, points = x.len(), "density curve");
    Ok(Curve { family, x, y })
}

// ============ Plugin ============

pub struct DensityCurve;

static DENSITY_CURVE_ARGS: [ArgMeta; 4] = [
    ArgMeta {
        name: "family",
        typ: "Text",
        description: "normal, exponential, gamma, beta, uniform, t, f, chi2, binomial or poisson",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "params",
        typ: "List<Number>",
        description: "Family parameters in order, e.g. [mean, std] for normal",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "low",
        typ: "Number",
        description: "Window start (defaults to the family's plot window)",
        optional: true,
        default: None,
    },
    ArgMeta {
        name: "high",
        typ: "Number",
        description: "Window end",
        optional: true,
        default: None,
    },
];

static DENSITY_CURVE_EXAMPLES: [&str; 3] = [
    "density_curve(\"normal\", [0, 1]) → {x: [...], y: [...]}",
    "density_curve(\"poisson\", [3])",
    "density_curve(\"t\", [5], -3, 3)",
];

static DENSITY_CURVE_RELATED: [&str; 2] = ["norm_pdf", "binom_pmf"];

impl FunctionPlugin for DensityCurve {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "density_curve",
            description: "Sample a distribution's density for plotting",
            usage: "density_curve(family, params, [low, high])",
            args: &DENSITY_CURVE_ARGS,
            returns: "Object",
            examples: &DENSITY_CURVE_EXAMPLES,
            category: "stats/distributions",
            source: None,
            related: &DENSITY_CURVE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "density_curve";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 2, 4)?;
            let family: DistributionFamily = match &args[0] {
                Value::Text(name) => name.parse().map_err(|e: StatError| e.in_function(F))?,
                Value::Error(e) => return Err(e.clone()),
                other => return Err(StatError::arg_type(F, "family", "Text", other.type_name())),
            };
            let params = sample_arg(F, args, 1, "params")?;
            let range = match args.len() {
                2 => None,
                3 => return Err(StatError::arg_count(F, 4, 3).with_note("low and high come together")),
                _ => Some((number_arg(F, args, 2, "low")?, number_arg(F, args, 3, "high")?)),
            };
            density_curve(family, params.values(), range, ctx.config.curve_points)
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
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(-1.0, 1.0, 2), vec![-1.0, 1.0]);
    }

    #[test]
    fn test_normal_curve_default_window() {
        let c = density_curve(DistributionFamily::Normal, &[10.0, 2.0], None, 101).unwrap();
        assert_eq!(c.x.len(), 101);
        assert_eq!(c.x[0], 2.0);
        assert_eq!(c.x[100], 18.0);
        // peak at the mean
        let peak = c.y[50];
        assert!(c.y.iter().all(|y| *y <= peak && *y >= 0.0));
    }

    #[test]
    fn test_explicit_range() {
        let c = density_curve(DistributionFamily::Exponential, &[1.0], Some((0.0, 2.0)), 3).unwrap();
        assert_eq!(c.x, vec![0.0, 1.0, 2.0]);
        assert!((c.y[1] - (-1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_discrete_curve_on_integers() {
        let c = density_curve(DistributionFamily::Binomial, &[4.0, 0.5], None, 1000).unwrap();
        assert_eq!(c.x, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!((c.y[2] - 0.375).abs() < 1e-12);
        assert!((c.y.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_discrete_range_is_clipped_and_strided() {
        let c = density_curve(DistributionFamily::Poisson, &[3.0], Some((-5.0, 2.5)), 10).unwrap();
        assert_eq!(c.x, vec![0.0, 1.0, 2.0]);

        let strided = density_curve(DistributionFamily::Poisson, &[50.0], Some((0.0, 99.0)), 10).unwrap();
        assert_eq!(strided.x.len(), 10);
        assert_eq!(strided.x[1], 10.0);
    }

    #[test]
    fn test_huge_discrete_windows_are_rejected() {
        let err = density_curve(DistributionFamily::Poisson, &[1e300], None, 1000).unwrap_err();
        assert!(err.is_domain());
        let err = density_curve(DistributionFamily::Binomial, &[10.0, 0.5], Some((0.0, 1e30)), 100).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_large_discrete_window_is_strided() {
        let c = density_curve(DistributionFamily::Poisson, &[1e12], None, 1000).unwrap();
        assert!(c.x.len() <= 1000 && c.x.len() > 900);
        assert!(c.x.iter().all(|x| x.fract() == 0.0));
        assert!(c.y.iter().all(|y| y.is_finite() && *y >= 0.0));
    }

    #[test]
    fn test_overflowing_window_is_computation_error() {
        let err = density_curve(DistributionFamily::Normal, &[0.0, 1e308], None, 10).unwrap_err();
        assert!(err.is_computation());
        let err = density_curve(DistributionFamily::Uniform, &[0.0, 1.0], Some((-1e308, 1e308)), 10).unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_bad_inputs() {
        assert!(density_curve(DistributionFamily::Normal, &[0.0, 1.0], Some((1.0, 1.0)), 10)
            .unwrap_err()
            .is_domain());
        assert!(density_curve(DistributionFamily::Normal, &[0.0, -1.0], None, 10)
            .unwrap_err()
            .is_domain());
        assert!(density_curve(DistributionFamily::Normal, &[0.0, 1.0], None, 1)
            .unwrap_err()
            .is_domain());
        assert!(density_curve(DistributionFamily::Normal, &[0.0, 1.0], None, MAX_CURVE_POINTS + 1)
            .unwrap_err()
            .is_domain());
    }

    #[test]
    fn test_density_curve_plugin_uses_config_points() {
        let args = vec![Value::from("normal"), Value::from(vec![0.0, 1.0])];
        let result = DensityCurve.call(&args, &eval_ctx());
        assert_eq!(result.get("x").as_list().unwrap().len(), 1000);
        assert_eq!(result.get("family").as_text(), Some("normal"));

        let registry = Arc::new(PluginRegistry::new());
        let ctx = EvalContext::with_config(registry, StatConfig::default().with_curve_points(11));
        let small = DensityCurve.call(&args, &ctx);
        assert_eq!(small.get("y").as_list().unwrap().len(), 11);
    }

    #[test]
    fn test_density_curve_plugin_unknown_family() {
        let args = vec![Value::from("cauchy"), Value::from(vec![0.0, 1.0])];
        let result = DensityCurve.call(&args, &eval_ctx());
        assert!(result.as_error().unwrap().is_parse());
    }
}
