//! Probability distributions
//!
//! Every continuous family implements [`ContinuousDistribution`], the two
//! discrete families implement [`DiscreteDistribution`]. Constructors
//! validate parameters and never clamp.

pub mod beta;
pub mod chi;
pub mod discrete;
pub mod exponential;
pub mod f;
pub mod gamma;
pub mod normal;
pub mod t;
pub mod uniform;

pub use beta::{Beta, BetaCdf, BetaInv, BetaPdf};
pub use chi::{ChiCdf, ChiInv, ChiPdf, ChiSquared};
pub use discrete::{BinomCdf, BinomPmf, Binomial, Poisson, PoissonCdf, PoissonPmf};
pub use exponential::{ExpCdf, ExpInv, ExpPdf, Exponential};
pub use f::{FCdf, FInv, FPdf, FisherF};
pub use gamma::{Gamma, GammaCdf, GammaInv, GammaPdf};
pub use normal::{NormCdf, NormInv, NormPdf, Normal};
pub use t::{StudentT, TCdf, TInv, TPdf};
pub use uniform::{UnifCdf, UnifInv, UnifPdf, Uniform};

use crate::helpers::{number_arg, optional_number_arg, require_args};
use crate::special::{invert_cdf, NumericError};
use mekako_core::{StatError, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape shared by every continuous family
pub trait ContinuousDistribution: Send + Sync {
    /// Family name used in error messages
    fn name(&self) -> &'static str;

    fn pdf(&self, x: f64) -> f64;

    fn cdf(&self, x: f64) -> f64;

    /// Upper tail, computed directly where cancellation matters
    fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Smallest and largest values of the support (possibly infinite)
    fn support(&self) -> (f64, f64);

    /// Default window for plotting the density
    fn plot_range(&self) -> (f64, f64);

    /// Inverse CDF for p strictly inside (0, 1)
    fn interior_quantile(&self, p: f64) -> Result<f64, NumericError> {
        let (lo, hi) = self.support();
        let (a, b) = self.plot_range();
        invert_cdf(|x| self.cdf(x), p, lo, hi, a + (b - a) / 2.0)
    }

    /// Inverse CDF. `quantile(0)` and `quantile(1)` are the support bounds.
    fn quantile(&self, p: f64) -> Result<f64, StatError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatError::invalid_argument(
                &format!("{}_quantile", self.name()),
                "p",
                "in [0, 1]",
                p,
            ));
        }
        let (lo, hi) = self.support();
        if p == 0.0 {
            return Ok(lo);
        }
        if p == 1.0 {
            return Ok(hi);
        }
        Ok(self.interior_quantile(p)?)
    }

    fn pdf_curve(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.pdf(x)).collect()
    }
}

/// Shape shared by the integer-valued families
pub trait DiscreteDistribution: Send + Sync {
    fn name(&self) -> &'static str;

    fn pmf(&self, k: u64) -> f64;

    fn cdf(&self, k: u64) -> f64;

    fn sf(&self, k: u64) -> f64 {
        1.0 - self.cdf(k)
    }

    /// Inclusive integer window for plotting the mass
    fn plot_range(&self) -> (u64, u64);
}

/// Any family, built by name
pub enum Distribution {
    Continuous(Box<dyn ContinuousDistribution>),
    Discrete(Box<dyn DiscreteDistribution>),
}

impl std::fmt::Debug for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distribution::Continuous(_) => f.write_str("Distribution::Continuous(..)"),
            Distribution::Discrete(_) => f.write_str("Distribution::Discrete(..)"),
        }
    }
}

/// Named distribution families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFamily {
    Normal,
    Exponential,
    Gamma,
    Beta,
    Uniform,
    StudentT,
    F,
    ChiSquared,
    Binomial,
    Poisson,
}

impl DistributionFamily {
    pub const ALL: [DistributionFamily; 10] = [
        Self::Normal,
        Self::Exponential,
        Self::Gamma,
        Self::Beta,
        Self::Uniform,
        Self::StudentT,
        Self::F,
        Self::ChiSquared,
        Self::Binomial,
        Self::Poisson,
    ];

    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Normal => &["mean", "std"],
            Self::Exponential => &["scale"],
            Self::Gamma => &["shape", "scale"],
            Self::Beta => &["a", "b"],
            Self::Uniform => &["low", "high"],
            Self::StudentT => &["df"],
            Self::F => &["dfn", "dfd"],
            Self::ChiSquared => &["df"],
            Self::Binomial => &["n", "p"],
            Self::Poisson => &["lambda"],
        }
    }

    pub fn is_discrete(self) -> bool {
        matches!(self, Self::Binomial | Self::Poisson)
    }

    /// Build a distribution from parameters in `param_names()` order
    pub fn build(self, params: &[f64]) -> Result<Distribution, StatError> {
        let names = self.param_names();
        if params.len() != names.len() {
            return Err(StatError::arg_count(&self.to_string(), names.len(), params.len()));
        }
        let dist = match self {
            Self::Normal => Distribution::Continuous(Box::new(Normal::new(params[0], params[1])?)),
            Self::Exponential => Distribution::Continuous(Box::new(Exponential::new(params[0])?)),
            Self::Gamma => Distribution::Continuous(Box::new(Gamma::new(params[0], params[1])?)),
            Self::Beta => Distribution::Continuous(Box::new(Beta::new(params[0], params[1])?)),
            Self::Uniform => Distribution::Continuous(Box::new(Uniform::new(params[0], params[1])?)),
            Self::StudentT => Distribution::Continuous(Box::new(StudentT::new(params[0])?)),
            Self::F => Distribution::Continuous(Box::new(FisherF::new(params[0], params[1])?)),
            Self::ChiSquared => Distribution::Continuous(Box::new(ChiSquared::new(params[0])?)),
            Self::Binomial => {
                let n = crate::helpers::as_count("binomial", "n", params[0])?;
                Distribution::Discrete(Box::new(Binomial::new(n, params[1])?))
            }
            Self::Poisson => Distribution::Discrete(Box::new(Poisson::new(params[0])?)),
        };
        Ok(dist)
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Exponential => "exponential",
            Self::Gamma => "gamma",
            Self::Beta => "beta",
            Self::Uniform => "uniform",
            Self::StudentT => "t",
            Self::F => "f",
            Self::ChiSquared => "chi2",
            Self::Binomial => "binomial",
            Self::Poisson => "poisson",
        };
        f.write_str(name)
    }
}

impl FromStr for DistributionFamily {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "norm" | "gaussian" => Ok(Self::Normal),
            "exponential" | "expon" | "exp" => Ok(Self::Exponential),
            "gamma" => Ok(Self::Gamma),
            "beta" => Ok(Self::Beta),
            "uniform" | "unif" => Ok(Self::Uniform),
            "t" | "student" | "student_t" | "studentt" => Ok(Self::StudentT),
            "f" | "fisher" => Ok(Self::F),
            "chi2" | "chisquared" | "chi_squared" | "chi-squared" | "chi" => Ok(Self::ChiSquared),
            "binomial" | "binom" => Ok(Self::Binomial),
            "poisson" => Ok(Self::Poisson),
            other => Err(StatError::parse_error(format!("unknown distribution '{}'", other))
                .with_suggestion(
                    "Use one of: normal, exponential, gamma, beta, uniform, t, f, chi2, binomial, poisson",
                )),
        }
    }
}

// ========== Shared parameter checks ==========

pub(crate) fn check_finite(dist: &str, name: &str, x: f64) -> Result<(), StatError> {
    if !x.is_finite() {
        return Err(StatError::invalid_argument(dist, name, "finite", x));
    }
    Ok(())
}

pub(crate) fn check_positive(dist: &str, name: &str, x: f64) -> Result<(), StatError> {
    check_finite(dist, name, x)?;
    if x <= 0.0 {
        return Err(StatError::invalid_argument(dist, name, "> 0", x));
    }
    Ok(())
}

// ========== Plugin plumbing ==========

/// Which continuous operation a plugin exposes
#[derive(Debug, Clone, Copy)]
pub(crate) enum Op {
    Pdf,
    Cdf,
    Inv,
}

/// Shared body of the `*_pdf` / `*_cdf` / `*_inv` plugins. The first
/// argument is x (or p), then the family parameters, each with an
/// optional default.
pub(crate) fn eval_continuous<D, B>(
    func: &str,
    args: &[Value],
    params: &[(&str, Option<f64>)],
    build: B,
    op: Op,
) -> Value
where
    D: ContinuousDistribution,
    B: Fn(&[f64]) -> Result<D, StatError>,
{
    let run = || -> Result<f64, StatError> {
        let required = 1 + params.iter().filter(|(_, d)| d.is_none()).count();
        require_args(func, args, required, 1 + params.len())?;

        let first = number_arg(func, args, 0, if matches!(op, Op::Inv) { "p" } else { "x" })?;
        let mut values = Vec::with_capacity(params.len());
        for (i, (name, default)) in params.iter().enumerate() {
            let v = match default {
                Some(d) => optional_number_arg(func, args, i + 1, name, *d)?,
                None => number_arg(func, args, i + 1, name)?,
            };
            values.push(v);
        }

        let dist = build(&values).map_err(|e| e.in_function(func))?;
        match op {
            Op::Pdf => Ok(dist.pdf(first)),
            Op::Cdf => Ok(dist.cdf(first)),
            Op::Inv => dist.quantile(first).map_err(|e| e.in_function(func)),
        }
    };

    match run() {
        Ok(v) => Value::Number(v),
        Err(e) => Value::Error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_aliases() {
        assert_eq!("Norm".parse::<DistributionFamily>().unwrap(), DistributionFamily::Normal);
        assert_eq!("chi-squared".parse::<DistributionFamily>().unwrap(), DistributionFamily::ChiSquared);
        assert_eq!("student".parse::<DistributionFamily>().unwrap(), DistributionFamily::StudentT);
        assert!("cauchy".parse::<DistributionFamily>().unwrap_err().is_parse());
    }

    #[test]
    fn test_display_parses_back() {
        for family in DistributionFamily::ALL {
            assert_eq!(family.to_string().parse::<DistributionFamily>().unwrap(), family);
        }
    }

    #[test]
    fn test_build_checks_arity_and_params() {
        assert!(DistributionFamily::Normal.build(&[0.0]).is_err());
        assert!(DistributionFamily::Normal.build(&[0.0, -1.0]).unwrap_err().is_domain());
        assert!(DistributionFamily::Binomial.build(&[2.5, 0.5]).unwrap_err().is_domain());
        assert!(matches!(
            DistributionFamily::Poisson.build(&[3.0]).unwrap(),
            Distribution::Discrete(_)
        ));
    }

    #[test]
    fn test_quantile_rejects_bad_probability() {
        let dist = Normal::new(0.0, 1.0).unwrap();
        let err = dist.quantile(1.5).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("p must be in [0, 1]"));
    }

    #[test]
    fn test_continuous_families_cover_unit_mass() {
        for family in DistributionFamily::ALL {
            let params: Vec<f64> = match family {
                DistributionFamily::Uniform => vec![-1.0, 3.0],
                DistributionFamily::Normal => vec![2.0, 0.5],
                DistributionFamily::Binomial => vec![10.0, 0.3],
                _ => vec![2.5; family.param_names().len()],
            };
            if let Distribution::Continuous(d) = family.build(&params).unwrap() {
                let (lo, hi) = d.support();
                assert!(d.cdf(lo) < 1e-9, "{} cdf at lower bound", family);
                assert!((d.cdf(hi) - 1.0).abs() < 1e-9, "{} cdf at upper bound", family);
                let (a, b) = d.plot_range();
                for i in 0..=20 {
                    let x = a + (b - a) * i as f64 / 20.0;
                    assert!(d.pdf(x) >= 0.0, "{} pdf({}) negative", family, x);
                }
            }
        }
    }
}
