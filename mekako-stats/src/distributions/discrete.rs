//! Discrete distributions: binomial, Poisson

use super::{check_positive, DiscreteDistribution};
use crate::helpers::{count_arg, number_arg, require_args, to_value};
use crate::special::{beta_i, gamma_p, gamma_q, ln_gamma};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

// ============ Binomial ============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    pub fn new(n: u64, p: f64) -> Result<Self, StatError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatError::invalid_argument("binomial", "p", "in [0, 1]", p));
        }
        Ok(Self { n, p })
    }
}

/// log C(n, k)
fn log_binomial(n: u64, k: u64) -> f64 {
    let (n, k) = (n as f64, k as f64);
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

impl DiscreteDistribution for Binomial {
    fn name(&self) -> &'static str {
        "binomial"
    }

    fn pmf(&self, k: u64) -> f64 {
        let (n, p) = (self.n, self.p);
        if k > n {
            return 0.0;
        }
        if p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if p == 1.0 {
            return if k == n { 1.0 } else { 0.0 };
        }
        let log_prob = k as f64 * p.ln() + (n - k) as f64 * (-p).ln_1p();
        (log_binomial(n, k) + log_prob).exp()
    }

    fn cdf(&self, k: u64) -> f64 {
        let (n, p) = (self.n, self.p);
        if k >= n || p == 0.0 {
            return 1.0;
        }
        if p == 1.0 {
            return 0.0;
        }
        // P(X ≤ k) = I_{1-p}(n - k, k + 1)
        beta_i((n - k) as f64, k as f64 + 1.0, 1.0 - p)
    }

    fn sf(&self, k: u64) -> f64 {
        let (n, p) = (self.n, self.p);
        if k >= n || p == 0.0 {
            return 0.0;
        }
        if p == 1.0 {
            return 1.0;
        }
        beta_i(k as f64 + 1.0, (n - k) as f64, p)
    }

    fn plot_range(&self) -> (u64, u64) {
        (0, self.n)
    }
}

/// P(X = k) for X ~ Binomial(n, p)
pub fn binomial_pmf(n: u64, k: u64, p: f64) -> Result<f64, StatError> {
    Ok(Binomial::new(n, p)?.pmf(k))
}

// ============ Poisson ============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self, StatError> {
        check_positive("poisson", "lambda", lambda)?;
        Ok(Self { lambda })
    }
}

impl DiscreteDistribution for Poisson {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn pmf(&self, k: u64) -> f64 {
        let k = k as f64;
        (k * self.lambda.ln() - self.lambda - ln_gamma(k + 1.0)).exp()
    }

    fn cdf(&self, k: u64) -> f64 {
        gamma_q(k as f64 + 1.0, self.lambda)
    }

    fn sf(&self, k: u64) -> f64 {
        gamma_p(k as f64 + 1.0, self.lambda)
    }

    fn plot_range(&self) -> (u64, u64) {
        let spread = 5.0 * self.lambda.sqrt();
        let lower = (self.lambda - spread).floor().max(0.0);
        let upper = (self.lambda + spread).ceil().max(10.0);
        // `as` saturates; callers reject windows beyond exact f64 integers
        (lower as u64, upper as u64)
    }
}

/// P(X = k) for X ~ Poisson(λ)
pub fn poisson_pmf(k: u64, lambda: f64) -> Result<f64, StatError> {
    Ok(Poisson::new(lambda)?.pmf(k))
}

// ============ Plugins ============

static BINOM_ARGS: [ArgMeta; 3] = [
    ArgMeta {
        name: "k",
        typ: "Number",
        description: "Number of successes (integer ≥ 0)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "n",
        typ: "Number",
        description: "Number of trials (integer ≥ 0)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "p",
        typ: "Number",
        description: "Probability of success (0 ≤ p ≤ 1)",
        optional: false,
        default: None,
    },
];

fn binomial_args(func: &str, args: &[Value]) -> Result<(u64, Binomial), StatError> {
    require_args(func, args, 3, 3)?;
    let k = count_arg(func, args, 0, "k")?;
    let n = count_arg(func, args, 1, "n")?;
    let p = number_arg(func, args, 2, "p")?;
    let dist = Binomial::new(n, p).map_err(|e| e.in_function(func))?;
    Ok((k, dist))
}

pub struct BinomPmf;

static BINOM_PMF_EXAMPLES: [&str; 1] = ["binom_pmf(3, 10, 0.5) → 0.117..."];

static BINOM_PMF_RELATED: [&str; 2] = ["binom_cdf", "poisson_pmf"];

impl FunctionPlugin for BinomPmf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "binom_pmf",
            description: "Binomial probability mass function",
            usage: "binom_pmf(k, n, p)",
            args: &BINOM_ARGS,
            returns: "Number",
            examples: &BINOM_PMF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &BINOM_PMF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(binomial_args("binom_pmf", args).map(|(k, d)| d.pmf(k)))
    }
}

pub struct BinomCdf;

static BINOM_CDF_EXAMPLES: [&str; 1] = ["binom_cdf(5, 10, 0.5) → 0.623..."];

static BINOM_CDF_RELATED: [&str; 2] = ["binom_pmf", "poisson_cdf"];

impl FunctionPlugin for BinomCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "binom_cdf",
            description: "Binomial cumulative distribution function",
            usage: "binom_cdf(k, n, p)",
            args: &BINOM_ARGS,
            returns: "Number",
            examples: &BINOM_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &BINOM_CDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(binomial_args("binom_cdf", args).map(|(k, d)| d.cdf(k)))
    }
}

static POISSON_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "k",
        typ: "Number",
        description: "Number of events (integer ≥ 0)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "λ",
        typ: "Number",
        description: "Expected rate (must be > 0)",
        optional: false,
        default: None,
    },
];

fn poisson_args(func: &str, args: &[Value]) -> Result<(u64, Poisson), StatError> {
    require_args(func, args, 2, 2)?;
    let k = count_arg(func, args, 0, "k")?;
    let lambda = number_arg(func, args, 1, "lambda")?;
    let dist = Poisson::new(lambda).map_err(|e| e.in_function(func))?;
    Ok((k, dist))
}

pub struct PoissonPmf;

static POISSON_PMF_EXAMPLES: [&str; 1] = ["poisson_pmf(3, 2.5) → 0.2137..."];

static POISSON_PMF_RELATED: [&str; 2] = ["poisson_cdf", "binom_pmf"];

impl FunctionPlugin for PoissonPmf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "poisson_pmf",
            description: "Poisson probability mass function",
            usage: "poisson_pmf(k, λ)",
            args: &POISSON_ARGS,
            returns: "Number",
            examples: &POISSON_PMF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &POISSON_PMF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(poisson_args("poisson_pmf", args).map(|(k, d)| d.pmf(k)))
    }
}

pub struct PoissonCdf;

static POISSON_CDF_EXAMPLES: [&str; 1] = ["poisson_cdf(3, 2.5) → 0.7575..."];

static POISSON_CDF_RELATED: [&str; 2] = ["poisson_pmf", "binom_cdf"];

impl FunctionPlugin for PoissonCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "poisson_cdf",
            description: "Poisson cumulative distribution function",
            usage: "poisson_cdf(k, λ)",
            args: &POISSON_ARGS,
            returns: "Number",
            examples: &POISSON_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &POISSON_CDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(poisson_args("poisson_cdf", args).map(|(k, d)| d.cdf(k)))
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
    fn test_binomial_pmf() {
        // C(10,3) / 1024
        let expected = 120.0 / 1024.0;
        assert!((binomial_pmf(10, 3, 0.5).unwrap() - expected).abs() < 1e-12);
        assert_eq!(binomial_pmf(5, 6, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_binomial_edge_probabilities() {
        assert_eq!(binomial_pmf(4, 0, 0.0).unwrap(), 1.0);
        assert_eq!(binomial_pmf(4, 4, 1.0).unwrap(), 1.0);
        assert_eq!(binomial_pmf(4, 2, 1.0).unwrap(), 0.0);
        assert!(binomial_pmf(4, 2, 1.2).unwrap_err().is_domain());
    }

    #[test]
    fn test_binomial_cdf_sums_pmf() {
        let d = Binomial::new(12, 0.3).unwrap();
        let mut total = 0.0;
        for k in 0..=12 {
            total += d.pmf(k);
            assert!((d.cdf(k) - total).abs() < 1e-12, "k = {}", k);
            assert!((d.sf(k) - (1.0 - total)).abs() < 1e-12, "k = {}", k);
        }
    }

    #[test]
    fn test_poisson() {
        let expected = 2.5f64.powi(3) * (-2.5f64).exp() / 6.0;
        assert!((poisson_pmf(3, 2.5).unwrap() - expected).abs() < 1e-12);
        assert!(poisson_pmf(3, 0.0).unwrap_err().is_domain());

        let d = Poisson::new(2.5).unwrap();
        let total: f64 = (0..=3).map(|k| d.pmf(k)).sum();
        assert!((d.cdf(3) - total).abs() < 1e-12);
        assert_eq!(d.plot_range(), (0, 11));
    }

    #[test]
    fn test_extreme_counts_stay_finite() {
        let wide = Binomial::new(u64::MAX, 0.5).unwrap();
        assert_eq!(wide.pmf(0), 0.0);
        assert_eq!(wide.cdf(u64::MAX), 1.0);

        let d = Poisson::new(1.0).unwrap();
        assert!((d.cdf(u64::MAX) - 1.0).abs() < 1e-12);
        assert!(d.sf(u64::MAX).abs() < 1e-12);
    }

    #[test]
    fn test_poisson_window_centres_on_lambda() {
        assert_eq!(Poisson::new(100.0).unwrap().plot_range(), (50, 150));
    }

    #[test]
    fn test_count_of_two_to_the_64_is_rejected() {
        let binom = vec![Value::Number(0.0), Value::Number(18_446_744_073_709_551_616.0), Value::Number(0.5)];
        assert!(BinomPmf.call(&binom, &eval_ctx()).as_error().unwrap().is_domain());
        let poisson = vec![Value::Number(18_446_744_073_709_551_616.0), Value::Number(1.0)];
        assert!(PoissonCdf.call(&poisson, &eval_ctx()).as_error().unwrap().is_domain());
    }

    #[test]
    fn test_binom_pmf_plugin() {
        let args = vec![Value::Number(3.0), Value::Number(10.0), Value::Number(0.5)];
        let result = BinomPmf.call(&args, &eval_ctx());
        assert!((result.as_number().unwrap() - 0.117_187_5).abs() < 1e-12);
    }

    #[test]
    fn test_binom_plugin_rejects_fractional_k() {
        let args = vec![Value::Number(2.5), Value::Number(10.0), Value::Number(0.5)];
        assert!(BinomCdf.call(&args, &eval_ctx()).as_error().unwrap().is_domain());
    }

    #[test]
    fn test_poisson_cdf_plugin() {
        let args = vec![Value::Number(3.0), Value::Number(2.5)];
        let result = PoissonCdf.call(&args, &eval_ctx());
        assert!((result.as_number().unwrap() - 0.757_576_133).abs() < 1e-8);
    }
}
