//! Helper functions for statistical operations
//!
//! Argument extraction from `Value`s and the small numeric kernels shared
//! by every module.

use mekako_core::{Group, Sample, StatError, Value};

// ========== Argument Extraction ==========

/// Check argument count is within `min..=max`
pub fn require_args(func: &str, args: &[Value], min: usize, max: usize) -> Result<(), StatError> {
    if args.len() < min || args.len() > max {
        return Err(StatError::arg_count(func, min, args.len()));
    }
    Ok(())
}

/// Numeric argument at `idx`. Text is parsed, errors propagate.
pub fn number_arg(func: &str, args: &[Value], idx: usize, name: &str) -> Result<f64, StatError> {
    let value = args
        .get(idx)
        .ok_or_else(|| StatError::arg_count(func, idx + 1, args.len()))?;
    let n = match value {
        Value::Number(n) => *n,
        Value::Text(_) | Value::Integer(_) => match value.to_number() {
            Value::Number(n) => n,
            Value::Error(e) => return Err(e.in_function(func).for_argument(name)),
            _ => return Err(StatError::arg_type(func, name, "Number", value.type_name())),
        },
        Value::Error(e) => return Err(e.clone()),
        other => return Err(StatError::arg_type(func, name, "Number", other.type_name())),
    };
    if !n.is_finite() {
        return Err(StatError::invalid_argument(func, name, "finite", n));
    }
    Ok(n)
}

/// Optional numeric argument, `default` when absent or Null
pub fn optional_number_arg(
    func: &str,
    args: &[Value],
    idx: usize,
    name: &str,
    default: f64,
) -> Result<f64, StatError> {
    match args.get(idx) {
        None | Some(Value::Null) => Ok(default),
        Some(_) => number_arg(func, args, idx, name),
    }
}

/// Non-negative integer argument (counts, sizes)
pub fn count_arg(func: &str, args: &[Value], idx: usize, name: &str) -> Result<u64, StatError> {
    if let Some(Value::Integer(n)) = args.get(idx) {
        return u64::try_from(n)
            .map_err(|_| StatError::invalid_argument(func, name, "a machine-sized integer", n));
    }
    let n = number_arg(func, args, idx, name)?;
    as_count(func, name, n)
}

/// Convert a real to a count, rejecting negatives and fractions
pub fn as_count(func: &str, name: &str, n: f64) -> Result<u64, StatError> {
    // u64::MAX as f64 rounds up to 2^64, which does not fit
    if n < 0.0 || n.fract() != 0.0 || n >= u64::MAX as f64 {
        return Err(StatError::invalid_argument(func, name, "a non-negative integer", n));
    }
    Ok(n as u64)
}

/// Sample argument: a List of numbers, delimited Text, or a single Number
pub fn sample_arg(func: &str, args: &[Value], idx: usize, name: &str) -> Result<Sample, StatError> {
    let value = args
        .get(idx)
        .ok_or_else(|| StatError::arg_count(func, idx + 1, args.len()))?;
    sample_from_value(func, name, value)
}

fn sample_from_value(func: &str, name: &str, value: &Value) -> Result<Sample, StatError> {
    match value {
        Value::Text(s) => Sample::parse(s).map_err(|e| StatError::from(e).in_function(func).for_argument(name)),
        Value::Number(n) => Sample::new(vec![*n]).map_err(StatError::from),
        Value::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Number(n) => values.push(*n),
                    Value::Error(e) => return Err(e.clone()),
                    other => return Err(StatError::arg_type(func, name, "List<Number>", other.type_name())),
                }
            }
            Sample::new(values).map_err(|e| StatError::from(e).in_function(func).for_argument(name))
        }
        Value::Error(e) => Err(e.clone()),
        other => Err(StatError::arg_type(func, name, "List<Number>", other.type_name())),
    }
}

/// Varargs sample: `f(1, 2, 3)`, `f([1, 2, 3])` or `f("1,2,3")`
pub fn extract_sample(func: &str, args: &[Value]) -> Result<Sample, StatError> {
    if args.is_empty() {
        return Err(StatError::arg_count(func, 1, 0));
    }
    if args.len() == 1 {
        return sample_arg(func, args, 0, "data");
    }

    let mut values = Vec::with_capacity(args.len());
    for (i, _) in args.iter().enumerate() {
        values.push(number_arg(func, args, i, "data")?);
    }
    Sample::new(values).map_err(StatError::from)
}

/// Two samples in the first two arguments
pub fn extract_two_samples(func: &str, args: &[Value]) -> Result<(Sample, Sample), StatError> {
    Ok((sample_arg(func, args, 0, "x")?, sample_arg(func, args, 1, "y")?))
}

/// Labelled groups, one per argument. Text must read `label: x1,x2,...`;
/// a bare List becomes `group<N>`.
pub fn extract_groups(func: &str, args: &[Value]) -> Result<Vec<Group>, StatError> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| match arg {
            Value::Text(s) => Group::parse(s, i + 1)
                .map_err(|e| StatError::from(e).in_function(func).with_note(format!("group {}", i + 1))),
            other => Ok(Group {
                label: format!("group{}", i + 1),
                sample: sample_from_value(func, "group", other)?,
            }),
        })
        .collect()
}

/// Lift a typed result into a registry value
pub fn to_value<T: Into<Value>>(result: Result<T, StatError>) -> Value {
    match result {
        Ok(v) => v.into(),
        Err(e) => Value::Error(e),
    }
}

// ========== Validation ==========

pub fn require_min_len(func: &str, name: &str, data: &[f64], min: usize) -> Result<(), StatError> {
    if data.len() < min {
        return Err(StatError::invalid_argument(
            func,
            name,
            &format!("at least {} values", min),
            data.len(),
        ));
    }
    Ok(())
}

pub fn require_positive(func: &str, name: &str, x: f64) -> Result<(), StatError> {
    if !(x > 0.0) || !x.is_finite() {
        return Err(StatError::invalid_argument(func, name, "> 0", x));
    }
    Ok(())
}

pub fn require_confidence(func: &str, level: f64) -> Result<(), StatError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatError::invalid_argument(func, "confidence", "in (0, 1)", level));
    }
    Ok(())
}

pub fn require_equal_len(func: &str, x: &[f64], y: &[f64]) -> Result<(), StatError> {
    if x.len() != y.len() {
        return Err(StatError::domain_error(format!(
            "{}(): samples must have equal length, got {} and {}",
            func,
            x.len(),
            y.len()
        ))
        .in_function(func));
    }
    Ok(())
}

/// Fail with a ComputationError when an intermediate overflowed
pub fn require_finite(func: &str, what: &str, values: &[f64]) -> Result<(), StatError> {
    if values.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(StatError::computation_error(format!("{}(): {} is not finite", func, what)).in_function(func))
}

// ========== Numeric Kernels ==========

/// Power of two that brings the largest magnitude into [1, 2).
/// Dividing by it is exact, so moments can be formed without overflow.
pub fn binary_scale(data: &[f64]) -> f64 {
    let max_abs = data.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_abs == 0.0 || !max_abs.is_finite() {
        return 1.0;
    }
    max_abs.log2().floor().exp2()
}

/// Means and population (biased) second moments of paired data
pub struct Moments {
    pub mx: f64,
    pub my: f64,
    pub sxx: f64,
    pub syy: f64,
    pub sxy: f64,
}

impl Moments {
    pub fn of(x: &[f64], y: &[f64]) -> Self {
        let n = x.len() as f64;
        let mx = mean(x);
        let my = mean(y);
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (a, b) in x.iter().zip(y) {
            sxx += (a - mx) * (a - mx);
            syy += (b - my) * (b - my);
            sxy += (a - mx) * (b - my);
        }
        Self {
            mx,
            my,
            sxx: sxx / n,
            syy: syy / n,
            sxy: sxy / n,
        }
    }
}

pub fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (n - 1 denominator). Callers ensure `len >= 2`.
pub fn sample_variance(data: &[f64]) -> f64 {
    let m = mean(data);
    let ss: f64 = data.iter().map(|x| (x - m) * (x - m)).sum();
    ss / (data.len() - 1) as f64
}

pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linearly interpolated quantile of sorted data, `q` in [0, 1]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi || hi >= n {
        return sorted[lo.min(n - 1)];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

pub fn median(data: &[f64]) -> f64 {
    quantile_sorted(&sorted(data), 0.5)
}

/// 1-based ranks, ties get the average rank
pub fn ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut indexed: Vec<(f64, usize)> = data.iter().copied().zip(0..n).collect();
    indexed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut result = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].0 == indexed[i].0 {
            j += 1;
        }
        let avg_rank = (i + j + 1) as f64 / 2.0;
        for item in &indexed[i..j] {
            result[item.1] = avg_rank;
        }
        i = j;
    }
    result
}

/// Sizes of the tie groups (only groups larger than one)
pub fn tie_sizes(data: &[f64]) -> Vec<usize> {
    let sorted = sorted(data);
    let mut sizes = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > 1 {
            sizes.push(j - i);
        }
        i = j;
    }
    sizes
}

/// Σ(t³ − t) over tie groups
pub fn tie_term(data: &[f64]) -> f64 {
    tie_sizes(data)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sample_forms() {
        let list = vec![Value::from(vec![1.0, 2.0, 3.0])];
        assert_eq!(extract_sample("f", &list).unwrap().len(), 3);

        let varargs = vec![Value::Number(1.0), Value::Number(2.0)];
        assert_eq!(extract_sample("f", &varargs).unwrap().values(), &[1.0, 2.0]);

        let text = vec![Value::from("4, 5, 6")];
        assert_eq!(extract_sample("f", &text).unwrap().values(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_extract_sample_bad_text_is_parse_error() {
        let err = extract_sample("mean", &[Value::from("1,x,3")]).unwrap_err();
        assert!(err.is_parse());
        assert!(err.message.contains("'x'"));
    }

    #[test]
    fn test_as_count_rejects_two_to_the_64() {
        assert!(as_count("f", "n", 18_446_744_073_709_551_616.0).unwrap_err().is_domain());
        assert_eq!(as_count("f", "n", 9_007_199_254_740_992.0).unwrap(), 1 << 53);
    }

    #[test]
    fn test_binary_scale_is_a_power_of_two() {
        assert_eq!(binary_scale(&[3.0, -1.0]), 2.0);
        assert_eq!(binary_scale(&[0.0, 0.0]), 1.0);
        let s = binary_scale(&[1e200, -1e200, 0.0]);
        assert!(1e200 / s >= 1.0 && 1e200 / s < 2.0);
        assert_eq!(s.log2().fract(), 0.0);
    }

    #[test]
    fn test_count_arg() {
        let args = vec![Value::Number(5.0), Value::Number(2.5), Value::Number(-1.0)];
        assert_eq!(count_arg("f", &args, 0, "n").unwrap(), 5);
        assert!(count_arg("f", &args, 1, "n").unwrap_err().is_domain());
        assert!(count_arg("f", &args, 2, "n").unwrap_err().is_domain());
    }

    #[test]
    fn test_extract_groups() {
        let args = vec![Value::from("a: 1,2"), Value::from(vec![3.0, 4.0])];
        let groups = extract_groups("anova", &args).unwrap();
        assert_eq!(groups[0].label, "a");
        assert_eq!(groups[1].label, "group2");
        assert!(extract_groups("anova", &[Value::from("1,2")]).unwrap_err().is_parse());
    }

    #[test]
    fn test_mean_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), 5.0);
        assert!((sample_variance(&data) - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_sorted() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&data, 0.5), 2.5);
        assert_eq!(quantile_sorted(&data, 0.25), 1.75);
        assert_eq!(quantile_sorted(&data, 1.0), 4.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_ranks_with_ties() {
        assert_eq!(ranks(&[10.0, 20.0, 20.0, 30.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(tie_sizes(&[1.0, 1.0, 2.0, 3.0, 3.0, 3.0]), vec![2, 3]);
        assert_eq!(tie_term(&[1.0, 1.0]), 6.0);
    }
}
