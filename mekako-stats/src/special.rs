//! Special functions and root finding
//!
//! Thin guards around `statrs::function` (whose unchecked variants panic
//! outside their domain) plus the bracketing bisection used for quantiles
//! without a closed form.

use mekako_core::StatError;
use statrs::function::{beta, erf, gamma};
use thiserror::Error;
use tracing::trace;

/// Failures of the numeric routines themselves
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    #[error("no bracket found for target {target} after {expansions} expansions")]
    NoBracket { target: f64, expansions: usize },

    #[error("result is not finite ({0})")]
    NonFinite(&'static str),
}

impl From<NumericError> for StatError {
    fn from(err: NumericError) -> Self {
        StatError::computation_error(err.to_string())
    }
}

pub fn ln_gamma(x: f64) -> f64 {
    gamma::ln_gamma(x)
}

pub fn ln_beta(a: f64, b: f64) -> f64 {
    beta::ln_beta(a, b)
}

/// Regularised lower incomplete gamma P(a, x), a > 0
pub fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x.is_infinite() {
        1.0
    } else {
        gamma::gamma_lr(a, x)
    }
}

/// Regularised upper incomplete gamma Q(a, x), a > 0
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        1.0
    } else if x.is_infinite() {
        0.0
    } else {
        gamma::gamma_ur(a, x)
    }
}

/// Regularised incomplete beta I_x(a, b), a, b > 0
pub fn beta_i(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        beta::beta_reg(a, b, x)
    }
}

pub fn erfc(x: f64) -> f64 {
    erf::erfc(x)
}

/// Inverse complementary error function on (0, 2)
pub fn erfc_inv(y: f64) -> f64 {
    if y <= 0.0 {
        f64::INFINITY
    } else if y >= 2.0 {
        f64::NEG_INFINITY
    } else {
        erf::erfc_inv(y)
    }
}

const MAX_EXPANSIONS: usize = 1100;
const MAX_BISECTIONS: usize = 2000;

/// Solve `cdf(x) = target` for non-decreasing `cdf` on `[lower, upper]`.
///
/// Infinite bounds are replaced by a finite bracket found by doubling away
/// from `start`.
pub fn invert_cdf<F>(cdf: F, target: f64, lower: f64, upper: f64, start: f64) -> Result<f64, NumericError>
where
    F: Fn(f64) -> f64,
{
    let mut lo = lower;
    let mut hi = upper;

    if hi.is_infinite() {
        let mut step = start.abs().max(1.0);
        hi = if lo.is_finite() { lo.max(start) + step } else { start + step };
        let mut expansions = 0;
        while cdf(hi) < target {
            expansions += 1;
            if expansions > MAX_EXPANSIONS || !hi.is_finite() {
                return Err(NumericError::NoBracket { target, expansions });
            }
            if lo.is_finite() {
                lo = lo.max(hi);
            }
            step *= 2.0;
            hi += step;
            trace!(hi, expansions, "expanding upper bracket");
        }
    }

    if lo.is_infinite() {
        let mut step = start.abs().max(1.0);
        lo = hi.min(start) - step;
        let mut expansions = 0;
        while cdf(lo) > target {
            expansions += 1;
            if expansions > MAX_EXPANSIONS || !lo.is_finite() {
                return Err(NumericError::NoBracket { target, expansions });
            }
            hi = hi.min(lo);
            step *= 2.0;
            lo -= step;
            trace!(lo, expansions, "expanding lower bracket");
        }
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = lo + (hi - lo) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        let value = cdf(mid);
        if (value - target).abs() <= 1e-15 {
            return Ok(mid);
        }
        if value < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let x = lo + (hi - lo) / 2.0;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(NumericError::NonFinite("quantile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_at_boundaries() {
        assert_eq!(gamma_p(2.0, 0.0), 0.0);
        assert_eq!(gamma_q(2.0, 0.0), 1.0);
        assert_eq!(gamma_p(2.0, f64::INFINITY), 1.0);
        assert_eq!(beta_i(2.0, 3.0, -0.5), 0.0);
        assert_eq!(beta_i(2.0, 3.0, 1.0), 1.0);
        assert_eq!(erfc_inv(0.0), f64::INFINITY);
    }

    #[test]
    fn test_known_values() {
        // Γ(5) = 24
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < 1e-12);
        // P(1, x) = 1 - e^-x
        assert!((gamma_p(1.0, 2.0) - (1.0 - (-2f64).exp())).abs() < 1e-12);
        // I_x(1, 1) = x
        assert!((beta_i(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_invert_cdf_bounded() {
        let x = invert_cdf(|x| x * x, 0.25, 0.0, 1.0, 0.5).unwrap();
        assert!((x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invert_cdf_expands_bracket() {
        // exponential with scale 1000: median at 1000 ln 2
        let cdf = |x: f64| if x <= 0.0 { 0.0 } else { 1.0 - (-x / 1000.0).exp() };
        let x = invert_cdf(cdf, 0.5, 0.0, f64::INFINITY, 1.0).unwrap();
        assert!((x - 1000.0 * 2f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_invert_cdf_two_sided() {
        let logistic = |x: f64| 1.0 / (1.0 + (-x).exp());
        let x = invert_cdf(logistic, 0.1, f64::NEG_INFINITY, f64::INFINITY, 0.0).unwrap();
        assert!((logistic(x) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invert_cdf_no_bracket() {
        let err = invert_cdf(|_| 0.5, 0.9, 0.0, f64::INFINITY, 1.0).unwrap_err();
        assert!(matches!(err, NumericError::NoBracket { .. }));
        let stat: StatError = err.into();
        assert!(stat.is_computation());
    }
}
