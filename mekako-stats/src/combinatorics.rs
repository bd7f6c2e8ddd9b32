//! Combinatorics: factorial, combination, permutation
//!
//! Results are exact (`UBig`). Arguments above [`MAX_EXACT_ARGUMENT`] are
//! rejected for performance.

use crate::helpers::{number_arg, require_args, to_value};
use dashu_int::UBig;
use mekako_core::StatError;
use mekako_plugin::prelude::*;

/// Largest n accepted by the exact routines
pub const MAX_EXACT_ARGUMENT: i64 = 100_000;

fn check_argument(func: &str, name: &str, n: i64) -> Result<u64, StatError> {
    if n < 0 {
        return Err(StatError::invalid_argument(func, name, "a non-negative integer", n));
    }
    if n > MAX_EXACT_ARGUMENT {
        return Err(StatError::invalid_argument(
            func,
            name,
            &format!("at most {} for performance", MAX_EXACT_ARGUMENT),
            n,
        ));
    }
    Ok(n as u64)
}

fn check_pair(func: &str, n: i64, k: i64) -> Result<(u64, u64), StatError> {
    let n = check_argument(func, "n", n)?;
    let k = check_argument(func, "k", k)?;
    if k > n {
        return Err(StatError::domain_error(format!(
            "{}(): k must be ≤ n, got n = {}, k = {}",
            func, n, k
        ))
        .in_function(func)
        .for_argument("k"));
    }
    Ok((n, k))
}

/// Product of the integers in `lo..=hi`, split in halves so the big
/// multiplications stay balanced
fn range_product(lo: u64, hi: u64) -> UBig {
    if lo > hi {
        return UBig::ONE;
    }
    if hi - lo < 16 {
        return (lo..=hi).fold(UBig::ONE, |acc, i| acc * UBig::from(i));
    }
    let mid = lo + (hi - lo) / 2;
    range_product(lo, mid) * range_product(mid + 1, hi)
}

/// n!
pub fn factorial(n: i64) -> Result<UBig, StatError> {
    let n = check_argument("factorial", "n", n)?;
    Ok(range_product(1, n))
}

/// C(n, k) = n! / (k! (n - k)!)
pub fn combination(n: i64, k: i64) -> Result<UBig, StatError> {
    let (n, k) = check_pair("combination", n, k)?;
    let k = k.min(n - k);
    Ok(range_product(n - k + 1, n) / range_product(1, k))
}

/// P(n, k) = n! / (n - k)!
pub fn permutation(n: i64, k: i64) -> Result<UBig, StatError> {
    let (n, k) = check_pair("permutation", n, k)?;
    Ok(range_product(n - k + 1, n))
}

/// Integer argument. Fractions are domain errors, not truncated.
fn integer_arg(func: &str, args: &[Value], idx: usize, name: &str) -> Result<i64, StatError> {
    if let Some(Value::Integer(n)) = args.get(idx) {
        return i64::try_from(n).map_err(|_| {
            StatError::invalid_argument(func, name, &format!("at most {}", MAX_EXACT_ARGUMENT), n)
        });
    }
    let x = number_arg(func, args, idx, name)?;
    if x.fract() != 0.0 || x.abs() > i64::MAX as f64 {
        return Err(StatError::invalid_argument(func, name, "an integer", x));
    }
    Ok(x as i64)
}

// ============ Factorial ============

pub struct Factorial;

static FACTORIAL_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "n",
    typ: "Number",
    description: "Non-negative integer",
    optional: false,
    default: None,
}];

static FACTORIAL_EXAMPLES: [&str; 2] = ["factorial(5) → 120", "factorial(0) → 1"];

static FACTORIAL_RELATED: [&str; 2] = ["combination", "permutation"];

impl FunctionPlugin for Factorial {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "factorial",
            description: "Exact factorial n!",
            usage: "factorial(n)",
            args: &FACTORIAL_ARGS,
            returns: "Integer",
            examples: &FACTORIAL_EXAMPLES,
            category: "stats/combinatorics",
            source: None,
            related: &FACTORIAL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value((|| {
            require_args("factorial", args, 1, 1)?;
            factorial(integer_arg("factorial", args, 0, "n")?)
        })())
    }
}

// ============ Combination ============

pub struct Combination;

static PAIR_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "n",
        typ: "Number",
        description: "Total items (integer ≥ 0)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "k",
        typ: "Number",
        description: "Items chosen (0 ≤ k ≤ n)",
        optional: false,
        default: None,
    },
];

static COMBINATION_EXAMPLES: [&str; 1] = ["combination(5, 2) → 10"];

static COMBINATION_RELATED: [&str; 2] = ["permutation", "binom_pmf"];

impl FunctionPlugin for Combination {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "combination",
            description: "Number of k-element subsets of n items, C(n, k)",
            usage: "combination(n, k)",
            args: &PAIR_ARGS,
            returns: "Integer",
            examples: &COMBINATION_EXAMPLES,
            category: "stats/combinatorics",
            source: None,
            related: &COMBINATION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value((|| {
            require_args("combination", args, 2, 2)?;
            combination(
                integer_arg("combination", args, 0, "n")?,
                integer_arg("combination", args, 1, "k")?,
            )
        })())
    }
}

// ============ Permutation ============

pub struct Permutation;

static PERMUTATION_EXAMPLES: [&str; 1] = ["permutation(5, 2) → 20"];

static PERMUTATION_RELATED: [&str; 2] = ["combination", "factorial"];

impl FunctionPlugin for Permutation {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "permutation",
            description: "Number of ordered k-arrangements of n items, P(n, k)",
            usage: "permutation(n, k)",
            args: &PAIR_ARGS,
            returns: "Integer",
            examples: &PERMUTATION_EXAMPLES,
            category: "stats/combinatorics",
            source: None,
            related: &PERMUTATION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value((|| {
            require_args("permutation", args, 2, 2)?;
            permutation(
                integer_arg("permutation", args, 0, "n")?,
                integer_arg("permutation", args, 1, "k")?,
            )
        })())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    fn big(s: &str) -> UBig {
        s.parse().unwrap()
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), UBig::ONE);
        assert_eq!(factorial(5).unwrap(), UBig::from(120u32));
        assert_eq!(
            factorial(25).unwrap(),
            big("15511210043330985984000000")
        );
    }

    #[test]
    fn test_factorial_negative() {
        let err = factorial(-1).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("n must be a non-negative integer"));
    }

    #[test]
    fn test_factorial_limit() {
        assert!(factorial(MAX_EXACT_ARGUMENT + 1).unwrap_err().is_domain());
    }

    #[test]
    fn test_combination() {
        assert_eq!(combination(5, 2).unwrap(), UBig::from(10u32));
        assert_eq!(combination(7, 0).unwrap(), UBig::ONE);
        assert_eq!(combination(7, 7).unwrap(), UBig::ONE);
        assert_eq!(combination(100, 50).unwrap(), big("100891344545564193334812497256"));
        assert!(combination(3, 5).unwrap_err().is_domain());
        assert!(combination(-3, 1).unwrap_err().is_domain());
    }

    #[test]
    fn test_combination_symmetry() {
        for k in 0..=30 {
            assert_eq!(combination(30, k).unwrap(), combination(30, 30 - k).unwrap());
        }
    }

    #[test]
    fn test_permutation() {
        assert_eq!(permutation(5, 2).unwrap(), UBig::from(20u32));
        assert_eq!(permutation(6, 6).unwrap(), factorial(6).unwrap());
        assert_eq!(permutation(6, 0).unwrap(), UBig::ONE);
    }

    #[test]
    fn test_factorial_plugin() {
        let result = Factorial.call(&[Value::Number(20.0)], &eval_ctx());
        assert_eq!(result.as_integer(), Some(&big("2432902008176640000")));
        assert_eq!(result.to_string(), "2432902008176640000");
    }

    #[test]
    fn test_plugin_rejects_fraction() {
        let result = Combination.call(&[Value::Number(5.5), Value::Number(2.0)], &eval_ctx());
        assert!(result.as_error().unwrap().is_domain());
        let result = Permutation.call(&[Value::from("6"), Value::from("2")], &eval_ctx());
        assert_eq!(result.as_integer(), Some(&UBig::from(30u32)));
    }
}
