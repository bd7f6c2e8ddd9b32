//! Rank-based tests and Levene's test for equal variances
//!
//! Mann-Whitney and Wilcoxon pick the exact null distribution for small
//! untied samples and fall back to the normal approximation otherwise.

use crate::distributions::{ChiSquared, ContinuousDistribution, Normal};
use crate::helpers::{
    extract_groups, extract_two_samples, median, ranks, require_args, require_equal_len,
    require_min_len, tie_sizes, tie_term,
};
use crate::hypothesis::{decision_value, FTestResult, TestResult};
use mekako_core::{Group, StatError};
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Largest smaller sample for which Mann-Whitney uses the exact distribution
pub const MANN_WHITNEY_EXACT_MAX: usize = 8;

/// Largest number of pairs for which Wilcoxon uses the exact distribution
pub const WILCOXON_EXACT_MAX: usize = 50;

// Cap on the exact U table (n1 · n2 + 1 entries)
const MANN_WHITNEY_TABLE_MAX: usize = 1_000_000;

/// How a rank test's p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PValueMethod {
    Exact,
    Normal,
}

impl fmt::Display for PValueMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PValueMethod::Exact => write!(f, "exact"),
            PValueMethod::Normal => write!(f, "normal"),
        }
    }
}

/// Two-sample rank test outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub method: PValueMethod,
}

impl RankTestResult {
    pub fn reject(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

impl From<RankTestResult> for Value {
    fn from(r: RankTestResult) -> Self {
        Value::object([
            ("statistic", Value::Number(r.statistic)),
            ("p_value", Value::Number(r.p_value)),
            ("method", Value::Text(r.method.to_string())),
        ])
    }
}

fn all_identical(func: &str) -> StatError {
    StatError::domain_error(format!("{}(): all observations are identical, ranks carry no information", func))
        .in_function(func)
}

// ============ Mann-Whitney U ============

/// Mann-Whitney U test, two-sided. The statistic is U of the first sample.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<RankTestResult, StatError> {
    const F: &str = "mann_whitney";
    require_min_len(F, "x", x, 2)?;
    require_min_len(F, "y", y, 2)?;

    let n1 = x.len();
    let n2 = y.len();
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let r = ranks(&pooled);
    let r1: f64 = r[..n1].iter().sum();

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u_max = u1.max(u2);

    let has_ties = !tie_sizes(&pooled).is_empty();
    let small = n1.min(n2);
    let large = n1.max(n2);
    let exact = !has_ties && small <= MANN_WHITNEY_EXACT_MAX && small * large < MANN_WHITNEY_TABLE_MAX;

    if exact {
        let dist = mann_whitney_distribution(small, large);
        // U takes integer values when there are no ties
        let from = u_max.round() as usize;
        let upper: f64 = dist[from.min(dist.len())..].iter().sum();
        debug!(n1, n2, u = u1, "mann_whitney exact");
        return Ok(RankTestResult {
            statistic: u1,
            p_value: (2.0 * upper).min(1.0),
            method: PValueMethod::Exact,
        });
    }

    let n = n1f + n2f;
    let ties = tie_term(&pooled);
    let variance = n1f * n2f / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(all_identical(F));
    }
    let z = (u_max - n1f * n2f / 2.0 - 0.5) / variance.sqrt();
    let p = (2.0 * Normal::standard().sf(z)).clamp(0.0, 1.0);
    debug!(n1, n2, u = u1, z, "mann_whitney normal approximation");
    Ok(RankTestResult {
        statistic: u1,
        p_value: p,
        method: PValueMethod::Normal,
    })
}

/// Null probabilities of U for sample sizes `m ≤ n`, indexed by U.
///
/// The counts are the coefficients of the Gaussian binomial [m+n choose m]_q,
/// built one factor (1 − q^{n+i}) / (1 − q^i) at a time and kept normalised.
fn mann_whitney_distribution(m: usize, n: usize) -> Vec<f64> {
    let mut poly = vec![0.0; m * n + 1];
    poly[0] = 1.0;
    let mut degree = 0;

    for i in 1..=m {
        let shift = n + i;
        let new_degree = degree + n;
        // multiply by (1 − q^shift), dropping terms above new_degree
        for k in (shift..=new_degree).rev() {
            poly[k] -= poly[k - shift];
        }
        // divide by (1 − q^i)
        for k in i..=new_degree {
            poly[k] += poly[k - i];
        }
        degree = new_degree;
        // scale so the coefficients sum to one
        let norm = i as f64 / (n + i) as f64;
        for c in poly.iter_mut().take(degree + 1) {
            *c *= norm;
        }
    }
    poly
}

// ============ Wilcoxon signed-rank ============

/// Wilcoxon signed-rank test on paired samples, two-sided.
/// Zero differences are dropped; the statistic is min(W⁺, W⁻).
pub fn wilcoxon(x: &[f64], y: &[f64]) -> Result<RankTestResult, StatError> {
    const F: &str = "wilcoxon";
    require_equal_len(F, x, y)?;
    require_min_len(F, "x", x, 2)?;

    let diffs: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    if diffs.is_empty() {
        return Err(StatError::domain_error(format!("{}(): every paired difference is zero", F)).in_function(F));
    }
    let dropped = x.len() - diffs.len();

    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let r = ranks(&magnitudes);
    // fold from +0.0: an empty f64 sum is -0.0
    let rank_sum = |positive: bool| {
        diffs
            .iter()
            .zip(&r)
            .filter(|(d, _)| (**d > 0.0) == positive)
            .fold(0.0, |acc, (_, r)| acc + r)
    };
    let (w_plus, w_minus) = (rank_sum(true), rank_sum(false));
    let t = w_plus.min(w_minus);

    let n = diffs.len();
    let ties = tie_term(&magnitudes);
    if n <= WILCOXON_EXACT_MAX && dropped == 0 && ties == 0.0 {
        let dist = signed_rank_distribution(n);
        let lower: f64 = dist[..=(t.round() as usize).min(dist.len() - 1)].iter().sum();
        debug!(n, t, "wilcoxon exact");
        return Ok(RankTestResult {
            statistic: t,
            p_value: (2.0 * lower).min(1.0),
            method: PValueMethod::Exact,
        });
    }

    let nf = n as f64;
    let expected = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
    if variance <= 0.0 {
        return Err(all_identical(F));
    }
    let z = (t - expected) / variance.sqrt();
    let p = (2.0 * Normal::standard().sf(z.abs())).clamp(0.0, 1.0);
    debug!(n, dropped, t, z, "wilcoxon normal approximation");
    Ok(RankTestResult {
        statistic: t,
        p_value: p,
        method: PValueMethod::Normal,
    })
}

/// Null probabilities of W⁺ for n untied pairs, indexed by W⁺
fn signed_rank_distribution(n: usize) -> Vec<f64> {
    let max = n * (n + 1) / 2;
    let mut counts = vec![0.0; max + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for w in (rank..=max).rev() {
            counts[w] += counts[w - rank];
        }
    }
    let total = 2f64.powi(n as i32);
    counts.into_iter().map(|c| c / total).collect()
}

// ============ Kruskal-Wallis ============

/// Kruskal-Wallis H test with tie correction
pub fn kruskal(groups: &[&[f64]]) -> Result<TestResult, StatError> {
    const F: &str = "kruskal";
    if groups.len() < 2 {
        return Err(StatError::invalid_argument(F, "groups", "at least 2 groups", groups.len()));
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(StatError::invalid_argument(F, "groups", "non-empty", "an empty group"));
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    let correction = 1.0 - tie_term(&pooled) / (n * n * n - n);
    if correction <= 0.0 {
        return Err(all_identical(F));
    }

    let r = ranks(&pooled);
    let mut offset = 0;
    let mut sum = 0.0;
    for g in groups {
        let rank_sum: f64 = r[offset..offset + g.len()].iter().sum();
        sum += rank_sum * rank_sum / g.len() as f64;
        offset += g.len();
    }

    let h = (12.0 / (n * (n + 1.0)) * sum - 3.0 * (n + 1.0)) / correction;
    let df = (groups.len() - 1) as f64;
    let p = ChiSquared::new(df)?.sf(h);
    Ok(TestResult::new(h, Some(df), p))
}

// ============ Friedman ============

/// Friedman test. Each row is one subject measured under every treatment.
pub fn friedman(subjects: &[&[f64]]) -> Result<TestResult, StatError> {
    const F: &str = "friedman";
    if subjects.len() < 2 {
        return Err(StatError::invalid_argument(F, "subjects", "at least 2 subjects", subjects.len()));
    }
    let k = subjects[0].len();
    if k < 3 {
        return Err(StatError::invalid_argument(F, "treatments", "at least 3 per subject", k));
    }
    if let Some((i, row)) = subjects.iter().enumerate().find(|(_, row)| row.len() != k) {
        return Err(StatError::domain_error(format!(
            "{}(): every subject needs {} measurements, subject {} has {}",
            F,
            k,
            i + 1,
            row.len()
        ))
        .in_function(F));
    }

    let n = subjects.len() as f64;
    let kf = k as f64;
    let mut column_sums = vec![0.0; k];
    let mut ties = 0.0;
    for row in subjects {
        for (sum, r) in column_sums.iter_mut().zip(ranks(row)) {
            *sum += r;
        }
        ties += tie_term(row);
    }

    let correction = 1.0 - ties / (kf * (kf * kf - 1.0) * n);
    if correction <= 0.0 {
        return Err(all_identical(F));
    }
    let ss: f64 = column_sums.iter().map(|r| r * r).sum();
    let statistic = (12.0 / (kf * n * (kf + 1.0)) * ss - 3.0 * n * (kf + 1.0)) / correction;
    let df = kf - 1.0;
    let p = ChiSquared::new(df)?.sf(statistic);
    Ok(TestResult::new(statistic, Some(df), p))
}

// ============ Levene ============

/// Levene's test for equal variances, centred on group medians
pub fn levene(groups: &[&[f64]]) -> Result<FTestResult, StatError> {
    const F: &str = "levene";
    if groups.len() < 2 {
        return Err(StatError::invalid_argument(F, "groups", "at least 2 groups", groups.len()));
    }
    for g in groups {
        require_min_len(F, "group", g, 2)?;
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let m = median(g);
            g.iter().map(|x| (x - m).abs()).collect()
        })
        .collect();

    let k = groups.len() as f64;
    let n: f64 = deviations.iter().map(|d| d.len() as f64).sum();
    let group_means: Vec<f64> = deviations.iter().map(|d| d.iter().sum::<f64>() / d.len() as f64).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(d, m)| d.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(d, m)| d.iter().map(|z| (z - m).powi(2)).sum::<f64>())
        .sum();

    if within == 0.0 {
        return Err(StatError::computation_error(
            "levene(): absolute deviations are constant within every group, W is undefined",
        ));
    }

    let statistic = (n - k) / (k - 1.0) * between / within;
    FTestResult::from_statistic(statistic, k - 1.0, n - k)
}

// ============ Plugins ============

fn group_slices(groups: &[Group]) -> Vec<&[f64]> {
    groups.iter().map(|g| g.sample.values()).collect()
}


pub struct MannWhitney;

static MANN_WHITNEY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("list1", "List<Number>", "First sample (≥ 2 values)"),
    ArgMeta::required("list2", "List<Number>", "Second sample (≥ 2 values)"),
];

static MANN_WHITNEY_EXAMPLES: [&str; 2] = ["mann_whitney([1,2,3], [4,5,6]) → U = 0, p = 0.1", "mann_whitney(\"1 2 3\", \"4 5 6\")"];

static MANN_WHITNEY_RELATED: [&str; 2] = ["t_test_2", "kruskal"];

impl FunctionPlugin for MannWhitney {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mann_whitney",
            description: "Mann-Whitney U test for two independent samples",
            usage: "mann_whitney(list1, list2)",
            args: &MANN_WHITNEY_ARGS,
            returns: "Object",
            examples: &MANN_WHITNEY_EXAMPLES,
            category: "stats/nonparametric",
            source: None,
            related: &MANN_WHITNEY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("mann_whitney", args, 2, 2)?;
            let (x, y) = extract_two_samples("mann_whitney", args)?;
            mann_whitney_u(x.values(), y.values())
        };
        decision_value(run(), ctx.alpha())
    }
}

pub struct Wilcoxon;

static WILCOXON_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("list1", "List<Number>", "First measurement"),
    ArgMeta::required("list2", "List<Number>", "Second measurement (same length)"),
];

static WILCOXON_EXAMPLES: [&str; 1] = ["wilcoxon([6,7,8,9,10], [5,5,5,5,5]) → T = 0, p = 0.0625"];

static WILCOXON_RELATED: [&str; 1] = ["t_test_paired"];

impl FunctionPlugin for Wilcoxon {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "wilcoxon",
            description: "Wilcoxon signed-rank test for paired samples",
            usage: "wilcoxon(list1, list2)",
            args: &WILCOXON_ARGS,
            returns: "Object",
            examples: &WILCOXON_EXAMPLES,
            category: "stats/nonparametric",
            source: None,
            related: &WILCOXON_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("wilcoxon", args, 2, 2)?;
            let (x, y) = extract_two_samples("wilcoxon", args)?;
            wilcoxon(x.values(), y.values())
        };
        decision_value(run(), ctx.alpha())
    }
}

static GROUP_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "groups",
    "Text | List<Number>",
    "Two or more groups, each 'label: x1,x2,...' or a list",
)];

pub struct Kruskal;

static KRUSKAL_EXAMPLES: [&str; 1] = ["kruskal(\"a: 1,2,3\", \"b: 4,5,6\", \"c: 7,8,9\") → H = 7.2"];

static KRUSKAL_RELATED: [&str; 2] = ["anova", "mann_whitney"];

impl FunctionPlugin for Kruskal {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "kruskal",
            description: "Kruskal-Wallis H test across independent groups",
            usage: "kruskal(group1, group2, ...)",
            args: &GROUP_ARGS,
            returns: "Object",
            examples: &KRUSKAL_EXAMPLES,
            category: "stats/nonparametric",
            source: None,
            related: &KRUSKAL_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            let groups = extract_groups("kruskal", args)?;
            kruskal(&group_slices(&groups))
        };
        decision_value(run(), ctx.alpha())
    }
}

pub struct Friedman;

static FRIEDMAN_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "subjects",
    "Text | List<Number>",
    "One row per subject, each 'label: t1,t2,t3,...' with the same treatment count",
)];

static FRIEDMAN_EXAMPLES: [&str; 1] = ["friedman(\"s1: 1,2,3\", \"s2: 1,2,3\", \"s3: 1,2,3\") → χ² = 6"];

static FRIEDMAN_RELATED: [&str; 2] = ["kruskal", "wilcoxon"];

impl FunctionPlugin for Friedman {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "friedman",
            description: "Friedman test for repeated measures",
            usage: "friedman(subject1, subject2, ...)",
            args: &FRIEDMAN_ARGS,
            returns: "Object",
            examples: &FRIEDMAN_EXAMPLES,
            category: "stats/nonparametric",
            source: None,
            related: &FRIEDMAN_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            let subjects = extract_groups("friedman", args)?;
            friedman(&group_slices(&subjects))
        };
        decision_value(run(), ctx.alpha())
    }
}

pub struct Levene;

static LEVENE_EXAMPLES: [&str; 1] = ["levene(\"a: 1,2,3\", \"b: 1,3,5\") → W = 0.8"];

static LEVENE_RELATED: [&str; 2] = ["anova", "variance"];

impl FunctionPlugin for Levene {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "levene",
            description: "Levene's test for equality of variances (median-centred)",
            usage: "levene(group1, group2, ...)",
            args: &GROUP_ARGS,
            returns: "Object",
            examples: &LEVENE_EXAMPLES,
            category: "stats/nonparametric",
            source: None,
            related: &LEVENE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            let groups = extract_groups("levene", args)?;
            levene(&group_slices(&groups))
        };
        decision_value(run(), ctx.alpha())
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
    fn test_mann_whitney_distribution_sums_to_one() {
        for (m, n) in [(1, 1), (3, 3), (4, 7), (8, 20)] {
            let dist = mann_whitney_distribution(m, n);
            assert_eq!(dist.len(), m * n + 1);
            let total: f64 = dist.iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "m={} n={} total={}", m, n, total);
            // symmetric around mn/2
            assert!((dist[0] - dist[m * n]).abs() < 1e-15);
        }
        // [4 choose 2]_q = 1 + q + 2q² + q³ + q⁴
        let d = mann_whitney_distribution(2, 2);
        let expected = [1.0, 1.0, 2.0, 1.0, 1.0].map(|c| c / 6.0);
        for (a, b) in d.iter().zip(expected) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_mann_whitney_exact() {
        let r = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.method, PValueMethod::Exact);
        assert!((r.p_value - 0.1).abs() < 1e-12);

        let flipped = mann_whitney_u(&[4.0, 5.0, 6.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(flipped.statistic, 9.0);
        assert!((flipped.p_value - r.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_ties_use_normal() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [2.0, 3.0, 4.0, 5.0];
        let r = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(r.method, PValueMethod::Normal);
        assert!(r.p_value > 0.0 && r.p_value <= 1.0);
        assert!(mann_whitney_u(&[1.0, 1.0], &[1.0, 1.0]).unwrap_err().is_domain());
        assert!(mann_whitney_u(&[1.0], &[2.0, 3.0]).unwrap_err().is_domain());
    }

    #[test]
    fn test_signed_rank_distribution() {
        let d = signed_rank_distribution(3);
        // subsets of {1,2,3}: sums 0,1,2,3,3,4,5,6
        assert_eq!(d.len(), 7);
        assert!((d[3] - 0.25).abs() < 1e-15);
        assert!((d.iter().sum::<f64>() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_wilcoxon_exact() {
        let x = [6.0, 7.0, 8.0, 9.0, 10.0];
        let y = [5.0; 5];
        let r = wilcoxon(&x, &y).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!(r.statistic.is_sign_positive());
        assert_eq!(r.method, PValueMethod::Exact);
        assert!((r.p_value - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_wilcoxon_zeros_dropped() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let r = wilcoxon(&x, &y).unwrap();
        assert_eq!(r.method, PValueMethod::Normal);
        assert_eq!(r.statistic, 0.0);

        let err = wilcoxon(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("zero"));
        assert!(wilcoxon(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err().is_domain());
    }

    #[test]
    fn test_kruskal() {
        let r = kruskal(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]).unwrap();
        assert!((r.statistic - 7.2).abs() < 1e-10);
        assert_eq!(r.degrees_of_freedom, Some(2.0));
        assert!((r.p_value - (-3.6f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_kruskal_all_identical() {
        let err = kruskal(&[&[2.0, 2.0], &[2.0, 2.0]]).unwrap_err();
        assert!(err.is_domain());
        assert!(kruskal(&[&[1.0, 2.0]]).unwrap_err().is_domain());
    }

    #[test]
    fn test_friedman() {
        let row = [1.0, 2.0, 3.0];
        let r = friedman(&[&row, &row, &row]).unwrap();
        assert!((r.statistic - 6.0).abs() < 1e-10);
        assert_eq!(r.degrees_of_freedom, Some(2.0));
        assert!((r.p_value - (-3f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_friedman_shape_errors() {
        let row = [1.0, 2.0, 3.0];
        assert!(friedman(&[&row]).unwrap_err().is_domain());
        assert!(friedman(&[&[1.0, 2.0], &[2.0, 1.0]]).unwrap_err().is_domain());
        assert!(friedman(&[&row, &[1.0, 2.0]]).unwrap_err().is_domain());
        assert!(friedman(&[&[5.0, 5.0, 5.0], &[1.0, 1.0, 1.0]]).unwrap_err().is_domain());
    }

    #[test]
    fn test_levene() {
        let r = levene(&[&[1.0, 2.0, 3.0], &[1.0, 3.0, 5.0]]).unwrap();
        assert!((r.statistic - 0.8).abs() < 1e-12);
        assert_eq!(r.df_between, 1.0);
        assert_eq!(r.df_within, 4.0);
        assert!(r.p_value > 0.4);
        assert!(levene(&[&[1.0, 2.0], &[3.0]]).unwrap_err().is_domain());
    }

    #[test]
    fn test_mann_whitney_plugin_whitespace_samples() {
        let args = vec![Value::from("1 2 3"), Value::from("4 5 6")];
        let result = MannWhitney.call(&args, &eval_ctx());
        assert_eq!(result.get("statistic").as_number(), Some(0.0));
        assert_eq!(result.get("method").as_text(), Some("exact"));
        assert_eq!(result.get("reject").as_bool(), Some(false));
    }

    #[test]
    fn test_friedman_plugin_rows() {
        let args = vec![Value::from("s1: 1,2,3"), Value::from("s2: 1,2,3"), Value::from("s3: 1,2,3")];
        let result = Friedman.call(&args, &eval_ctx());
        assert!((result.get("statistic").as_number().unwrap() - 6.0).abs() < 1e-10);
        assert_eq!(result.get("reject").as_bool(), Some(true));
    }

    #[test]
    fn test_levene_plugin_missing_label() {
        let args = vec![Value::from("a: 1,2,3"), Value::from("1,3,5")];
        let result = Levene.call(&args, &eval_ctx());
        assert!(result.as_error().unwrap().is_parse());
    }
}
