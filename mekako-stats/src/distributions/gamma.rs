//! Gamma distribution with shape k and scale θ

use super::{check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::{gamma_p, gamma_q, ln_gamma};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gamma {
    shape: f64,
    scale: f64,
}

impl Gamma {
    pub fn new(shape: f64, scale: f64) -> Result<Self, StatError> {
        check_positive("gamma", "shape", shape)?;
        check_positive("gamma", "scale", scale)?;
        Ok(Self { shape, scale })
    }

    /// Parameters already checked by the caller
    pub(crate) fn from_validated(shape: f64, scale: f64) -> Self {
        Self { shape, scale }
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl ContinuousDistribution for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        if x == 0.0 {
            // Density diverges at the origin for shape < 1
            return if self.shape < 1.0 {
                f64::INFINITY
            } else if self.shape == 1.0 {
                1.0 / self.scale
            } else {
                0.0
            };
        }
        let k = self.shape;
        ((k - 1.0) * x.ln() - x / self.scale - ln_gamma(k) - k * self.scale.ln()).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        gamma_p(self.shape, x / self.scale)
    }

    fn sf(&self, x: f64) -> f64 {
        gamma_q(self.shape, x / self.scale)
    }

    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (0.0, 5.0 * self.shape * self.scale)
    }
}

static GAMMA_PARAMS: [(&str, Option<f64>); 2] = [("shape", None), ("scale", Some(1.0))];

fn build(params: &[f64]) -> Result<Gamma, StatError> {
    Gamma::new(params[0], params[1])
}

static GAMMA_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("x", "Number", "Value (or probability for gamma_inv)"),
    ArgMeta::required("shape", "Number", "Shape k (must be > 0)"),
    ArgMeta::optional("scale", "Number", "Scale θ (must be > 0)", "1"),
];

static GAMMA_RELATED: [&str; 4] = ["gamma_pdf", "gamma_cdf", "gamma_inv", "chi_cdf"];

pub struct GammaPdf;

static GAMMA_PDF_EXAMPLES: [&str; 1] = ["gamma_pdf(2, 2, 1) → 0.2707..."];

impl FunctionPlugin for GammaPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "gamma_pdf",
            description: "Gamma probability density",
            usage: "gamma_pdf(x, shape, [scale])",
            args: &GAMMA_ARGS,
            returns: "Number",
            examples: &GAMMA_PDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &GAMMA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("gamma_pdf", args, &GAMMA_PARAMS, build, Op::Pdf)
    }
}

pub struct GammaCdf;

static GAMMA_CDF_EXAMPLES: [&str; 1] = ["gamma_cdf(2, 2, 1) → 0.5939..."];

impl FunctionPlugin for GammaCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "gamma_cdf",
            description: "Gamma cumulative distribution",
            usage: "gamma_cdf(x, shape, [scale])",
            args: &GAMMA_ARGS,
            returns: "Number",
            examples: &GAMMA_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &GAMMA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("gamma_cdf", args, &GAMMA_PARAMS, build, Op::Cdf)
    }
}

pub struct GammaInv;

static GAMMA_INV_EXAMPLES: [&str; 1] = ["gamma_inv(0.5, 2, 1) → 1.6783..."];

impl FunctionPlugin for GammaInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "gamma_inv",
            description: "Gamma quantile (inverse CDF)",
            usage: "gamma_inv(p, shape, [scale])",
            args: &GAMMA_ARGS,
            returns: "Number",
            examples: &GAMMA_INV_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &GAMMA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("gamma_inv", args, &GAMMA_PARAMS, build, Op::Inv)
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
    fn test_pdf_values() {
        let d = Gamma::new(2.0, 1.0).unwrap();
        // x e^-x
        assert!((d.pdf(2.0) - 2.0 * (-2f64).exp()).abs() < 1e-14);
        assert_eq!(d.pdf(-1.0), 0.0);
        assert_eq!(d.pdf(0.0), 0.0);
    }

    #[test]
    fn test_pdf_at_origin() {
        assert_eq!(Gamma::new(0.5, 1.0).unwrap().pdf(0.0), f64::INFINITY);
        assert_eq!(Gamma::new(1.0, 4.0).unwrap().pdf(0.0), 0.25);
    }

    #[test]
    fn test_cdf_matches_closed_form() {
        // shape 2: 1 - e^-x (1 + x)
        let d = Gamma::new(2.0, 1.0).unwrap();
        let expected = 1.0 - (-2f64).exp() * 3.0;
        assert!((d.cdf(2.0) - expected).abs() < 1e-12);
        assert!((d.sf(2.0) - (1.0 - expected)).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_roundtrip() {
        let d = Gamma::new(0.7, 3.0).unwrap();
        for p in [0.01, 0.3, 0.5, 0.9, 0.999] {
            let x = d.quantile(p).unwrap();
            assert!((d.cdf(x) - p).abs() < 1e-9, "p = {}", p);
        }
    }

    #[test]
    fn test_plugin_requires_shape() {
        let result = GammaPdf.call(&[Value::Number(1.0)], &eval_ctx());
        assert!(result.is_error());
        let result = GammaInv.call(&[Value::Number(0.5), Value::Number(2.0)], &eval_ctx());
        assert!((result.as_number().unwrap() - 1.678_346_990_016_661_4).abs() < 1e-8);
    }
}
