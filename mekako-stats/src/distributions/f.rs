//! F distribution (Fisher-Snedecor)

use super::{check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::{beta_i, ln_beta};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FisherF {
    dfn: f64,
    dfd: f64,
}

impl FisherF {
    pub fn new(dfn: f64, dfd: f64) -> Result<Self, StatError> {
        check_positive("f", "dfn", dfn)?;
        check_positive("f", "dfd", dfd)?;
        Ok(Self { dfn, dfd })
    }
}

impl ContinuousDistribution for FisherF {
    fn name(&self) -> &'static str {
        "f"
    }

    fn pdf(&self, x: f64) -> f64 {
        let (d1, d2) = (self.dfn, self.dfd);
        if x < 0.0 {
            return 0.0;
        }
        if x == 0.0 {
            return if d1 < 2.0 {
                f64::INFINITY
            } else if d1 == 2.0 {
                1.0
            } else {
                0.0
            };
        }
        let log_num = 0.5 * (d1 * (d1 * x).ln() + d2 * d2.ln() - (d1 + d2) * (d1 * x + d2).ln());
        (log_num - x.ln() - ln_beta(d1 / 2.0, d2 / 2.0)).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let (d1, d2) = (self.dfn, self.dfd);
        beta_i(d1 / 2.0, d2 / 2.0, d1 * x / (d1 * x + d2))
    }

    fn sf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        let (d1, d2) = (self.dfn, self.dfd);
        beta_i(d2 / 2.0, d1 / 2.0, d2 / (d2 + d1 * x))
    }

    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (0.0, 5.0)
    }
}

static F_PARAMS: [(&str, Option<f64>); 2] = [("dfn", None), ("dfd", None)];

fn build(params: &[f64]) -> Result<FisherF, StatError> {
    FisherF::new(params[0], params[1])
}

static F_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("x", "Number", "Value (or probability for f_inv)"),
    ArgMeta::required("dfn", "Number", "Numerator degrees of freedom (must be > 0)"),
    ArgMeta::required("dfd", "Number", "Denominator degrees of freedom (must be > 0)"),
];

static F_RELATED: [&str; 3] = ["f_pdf", "f_cdf", "anova"];

pub struct FPdf;

impl FunctionPlugin for FPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "f_pdf",
            description: "F distribution probability density",
            usage: "f_pdf(x, dfn, dfd)",
            args: &F_ARGS,
            returns: "Number",
            examples: &["f_pdf(1, 5, 10) → 0.4954..."],
            category: "stats/distribution",
            source: None,
            related: &F_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("f_pdf", args, &F_PARAMS, build, Op::Pdf)
    }
}

pub struct FCdf;

impl FunctionPlugin for FCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "f_cdf",
            description: "F distribution cumulative probability",
            usage: "f_cdf(x, dfn, dfd)",
            args: &F_ARGS,
            returns: "Number",
            examples: &["f_cdf(2, 5, 10) → 0.8358..."],
            category: "stats/distribution",
            source: None,
            related: &F_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("f_cdf", args, &F_PARAMS, build, Op::Cdf)
    }
}

pub struct FInv;

impl FunctionPlugin for FInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "f_inv",
            description: "F distribution quantile (inverse CDF)",
            usage: "f_inv(p, dfn, dfd)",
            args: &F_ARGS,
            returns: "Number",
            examples: &["f_inv(0.95, 2, 10) → 4.1028..."],
            category: "stats/distribution",
            source: None,
            related: &F_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("f_inv", args, &F_PARAMS, build, Op::Inv)
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
    fn test_dfn_two_is_exponential_like() {
        // F(2, d2) has cdf 1 - (1 + 2x/d2)^(-d2/2)
        let d = FisherF::new(2.0, 10.0).unwrap();
        let x = 1.5;
        let expected = 1.0 - (1.0 + 2.0 * x / 10.0f64).powf(-5.0);
        assert!((d.cdf(x) - expected).abs() < 1e-12);
        assert!((d.sf(x) - (1.0 - expected)).abs() < 1e-12);
        assert_eq!(d.pdf(0.0), 1.0);
    }

    #[test]
    fn test_pdf_integrates_roughly_to_cdf() {
        let d = FisherF::new(5.0, 10.0).unwrap();
        let n = 20_000;
        let h = 2.0 / n as f64;
        let area: f64 = (0..n).map(|i| d.pdf((i as f64 + 0.5) * h) * h).sum();
        assert!((area - d.cdf(2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_f_inv_critical_value() {
        let args = vec![Value::Number(0.95), Value::Number(2.0), Value::Number(10.0)];
        let result = FInv.call(&args, &eval_ctx());
        assert!((result.as_number().unwrap() - 4.102_821_015).abs() < 1e-6);
    }
}
