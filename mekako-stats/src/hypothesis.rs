//! Parametric hypothesis tests: t, z, chi-square goodness of fit, one-way ANOVA
//!
//! Every test is a typed function returning a result struct; the plugins
//! below wrap them and add the reject decision for the configured alpha.

use crate::distributions::{ChiSquared, ContinuousDistribution, FisherF, Normal, StudentT};
use crate::helpers::{
    extract_groups, extract_two_samples, mean, number_arg, require_args, require_equal_len,
    require_min_len, require_positive, sample_arg, sample_variance,
};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============ Results ============

/// Outcome of a test with a single reference distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub statistic: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<f64>,
    pub p_value: f64,
}

impl TestResult {
    pub fn new(statistic: f64, degrees_of_freedom: Option<f64>, p_value: f64) -> Self {
        Self {
            statistic,
            degrees_of_freedom,
            p_value: p_value.clamp(0.0, 1.0),
        }
    }

    /// Reject H₀ at significance level `alpha`
    pub fn reject(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

impl From<TestResult> for Value {
    fn from(r: TestResult) -> Self {
        Value::object([
            ("statistic", Value::Number(r.statistic)),
            ("df", Value::from(r.degrees_of_freedom)),
            ("p_value", Value::Number(r.p_value)),
        ])
    }
}

/// Outcome of an F-distributed test (ANOVA, Levene)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FTestResult {
    pub statistic: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub p_value: f64,
}

impl FTestResult {
    pub(crate) fn from_statistic(statistic: f64, df_between: f64, df_within: f64) -> Result<Self, StatError> {
        let p_value = FisherF::new(df_between, df_within)?.sf(statistic);
        Ok(Self {
            statistic,
            df_between,
            df_within,
            p_value: p_value.clamp(0.0, 1.0),
        })
    }

    pub fn reject(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

impl From<FTestResult> for Value {
    fn from(r: FTestResult) -> Self {
        Value::object([
            ("statistic", Value::Number(r.statistic)),
            ("df_between", Value::Number(r.df_between)),
            ("df_within", Value::Number(r.df_within)),
            ("p_value", Value::Number(r.p_value)),
        ])
    }
}

/// Attach `reject` and `alpha` to an object result carrying `p_value`
pub(crate) fn with_decision(result: Value, alpha: f64) -> Value {
    match result {
        Value::Object(mut map) => {
            if let Some(p) = map.get("p_value").and_then(Value::as_number) {
                map.insert("reject".to_string(), Value::Bool(p < alpha));
                map.insert("alpha".to_string(), Value::Number(alpha));
            }
            Value::Object(map)
        }
        other => other,
    }
}

pub(crate) fn decision_value<T: Into<Value>>(result: Result<T, StatError>, alpha: f64) -> Value {
    match result {
        Ok(r) => with_decision(r.into(), alpha),
        Err(e) => Value::Error(e),
    }
}

// ============ Typed tests ============

/// How the two-sample t-test treats the group variances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceAssumption {
    /// Welch-Satterthwaite, no equal-variance assumption
    #[default]
    Welch,
    /// Pooled variance, df = n1 + n2 - 2
    Pooled,
}

impl FromStr for VarianceAssumption {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "welch" | "unequal" => Ok(Self::Welch),
            "pooled" | "equal" | "student" => Ok(Self::Pooled),
            other => Err(StatError::parse_error(format!("unknown variance assumption '{}'", other))
                .with_suggestion("Use 'welch' or 'pooled'")),
        }
    }
}

fn require_size(func: &str, name: &str, n: f64, min: f64) -> Result<(), StatError> {
    if n.fract() != 0.0 || n < min {
        return Err(StatError::invalid_argument(
            func,
            name,
            &format!("an integer ≥ {}", min),
            n,
        ));
    }
    Ok(())
}

fn t_result(func: &str, t: f64, df: f64) -> Result<TestResult, StatError> {
    if !t.is_finite() {
        return Err(StatError::computation_error(format!("{}(): t statistic is not finite", func)));
    }
    let p = StudentT::new(df)?.two_sided_p(t);
    Ok(TestResult::new(t, Some(df), p))
}

/// One-sample t-test from summary statistics
pub fn ttest_1samp_from_stats(
    sample_mean: f64,
    population_mean: f64,
    sample_std: f64,
    n: f64,
) -> Result<TestResult, StatError> {
    const F: &str = "ttest_1samp";
    require_positive(F, "sample_std", sample_std)?;
    require_size(F, "n", n, 2.0)?;
    let t = (sample_mean - population_mean) / (sample_std / n.sqrt());
    t_result(F, t, n - 1.0)
}

/// One-sample t-test on raw data
pub fn ttest_1samp(sample: &[f64], population_mean: f64) -> Result<TestResult, StatError> {
    require_min_len("ttest_1samp", "sample", sample, 2)?;
    let s = sample_variance(sample).sqrt();
    ttest_1samp_from_stats(mean(sample), population_mean, s, sample.len() as f64)
}

/// One-sample z-test with known population standard deviation
pub fn ztest_1samp(
    sample_mean: f64,
    population_mean: f64,
    population_std: f64,
    n: f64,
) -> Result<TestResult, StatError> {
    const F: &str = "ztest";
    require_positive(F, "population_std", population_std)?;
    require_size(F, "n", n, 1.0)?;
    let z = (sample_mean - population_mean) / (population_std / n.sqrt());
    let p = 2.0 * Normal::standard().sf(z.abs());
    Ok(TestResult::new(z, None, p))
}

/// Independent two-sample t-test from summary statistics
pub fn ttest_ind_from_stats(
    mean1: f64,
    std1: f64,
    n1: f64,
    mean2: f64,
    std2: f64,
    n2: f64,
    assumption: VarianceAssumption,
) -> Result<TestResult, StatError> {
    const F: &str = "ttest_ind";
    require_positive(F, "std1", std1)?;
    require_positive(F, "std2", std2)?;
    require_size(F, "n1", n1, 2.0)?;
    require_size(F, "n2", n2, 2.0)?;

    let v1 = std1 * std1 / n1;
    let v2 = std2 * std2 / n2;
    let (se, df) = match assumption {
        VarianceAssumption::Welch => {
            let df = (v1 + v2).powi(2) / (v1 * v1 / (n1 - 1.0) + v2 * v2 / (n2 - 1.0));
            ((v1 + v2).sqrt(), df)
        }
        VarianceAssumption::Pooled => {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * std1 * std1 + (n2 - 1.0) * std2 * std2) / df;
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
    };

    t_result(F, (mean1 - mean2) / se, df)
}

/// Independent two-sample t-test on raw data
pub fn ttest_ind(x: &[f64], y: &[f64], assumption: VarianceAssumption) -> Result<TestResult, StatError> {
    require_min_len("ttest_ind", "x", x, 2)?;
    require_min_len("ttest_ind", "y", y, 2)?;
    ttest_ind_from_stats(
        mean(x),
        sample_variance(x).sqrt(),
        x.len() as f64,
        mean(y),
        sample_variance(y).sqrt(),
        y.len() as f64,
        assumption,
    )
}

/// Paired t-test from the mean and standard deviation of the differences
pub fn ttest_rel_from_stats(mean_diff: f64, std_diff: f64, n: f64) -> Result<TestResult, StatError> {
    const F: &str = "ttest_rel";
    require_positive(F, "std_diff", std_diff)?;
    require_size(F, "n", n, 2.0)?;
    t_result(F, mean_diff / (std_diff / n.sqrt()), n - 1.0)
}

/// Paired t-test on two equal-length samples
pub fn ttest_rel(x: &[f64], y: &[f64]) -> Result<TestResult, StatError> {
    require_equal_len("ttest_rel", x, y)?;
    require_min_len("ttest_rel", "x", x, 2)?;
    let diffs: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
    ttest_rel_from_stats(mean(&diffs), sample_variance(&diffs).sqrt(), diffs.len() as f64)
}

/// Chi-square goodness of fit: Σ(O − E)²/E with len − 1 degrees of freedom
pub fn chisquare(observed: &[f64], expected: &[f64]) -> Result<TestResult, StatError> {
    const F: &str = "chisquare";
    require_equal_len(F, observed, expected)?;
    require_min_len(F, "observed", observed, 2)?;
    if let Some(o) = observed.iter().find(|o| **o < 0.0) {
        return Err(StatError::invalid_argument(F, "observed", "all ≥ 0", o));
    }
    if let Some(e) = expected.iter().find(|e| **e <= 0.0) {
        return Err(StatError::invalid_argument(F, "expected", "all > 0", e));
    }

    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .map(|(o, e)| (o - e) * (o - e) / e)
        .sum();
    let df = (observed.len() - 1) as f64;
    let p = ChiSquared::new(df)?.sf(statistic);
    Ok(TestResult::new(statistic, Some(df), p))
}

/// One-way ANOVA across two or more groups
pub fn f_oneway(groups: &[&[f64]]) -> Result<FTestResult, StatError> {
    const F: &str = "anova";
    if groups.len() < 2 {
        return Err(StatError::invalid_argument(F, "groups", "at least 2 groups", groups.len()));
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(StatError::invalid_argument(F, "groups", "non-empty", "an empty group"));
    }

    let k = groups.len() as f64;
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let n = total as f64;
    if total <= groups.len() {
        return Err(StatError::invalid_argument(F, "groups", "more observations than groups", total));
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let m = mean(g);
        ss_between += g.len() as f64 * (m - grand_mean).powi(2);
        ss_within += g.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    }

    if ss_within == 0.0 {
        return Err(StatError::computation_error(
            "anova(): within-group variance is zero, F is undefined",
        ));
    }

    let df_between = k - 1.0;
    let df_within = n - k;
    let statistic = (ss_between / df_between) / (ss_within / df_within);
    FTestResult::from_statistic(statistic, df_between, df_within)
}

// ============ Plugins ============

fn assumption_arg(func: &str, args: &[Value], idx: usize) -> Result<VarianceAssumption, StatError> {
    match args.get(idx) {
        None | Some(Value::Null) => Ok(VarianceAssumption::default()),
        Some(Value::Bool(true)) => Ok(VarianceAssumption::Pooled),
        Some(Value::Bool(false)) => Ok(VarianceAssumption::Welch),
        Some(Value::Text(s)) => s.parse().map_err(|e: StatError| e.in_function(func)),
        Some(Value::Error(e)) => Err(e.clone()),
        Some(other) => Err(StatError::arg_type(func, "variance", "Text or Bool", other.type_name())),
    }
}

// ============ One-Sample T-Test ============

pub struct TTest1;

static T_TEST_1_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "list",
        typ: "List<Number>",
        description: "Sample data",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "μ0",
        typ: "Number",
        description: "Hypothesized population mean",
        optional: false,
        default: None,
    },
];

static T_TEST_1_EXAMPLES: [&str; 1] = ["t_test_1([1,2,3,4,5], 3)"];

static T_TEST_1_RELATED: [&str; 2] = ["t_test_1_stats", "ci"];

impl FunctionPlugin for TTest1 {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_1",
            description: "One-sample t-test on raw data",
            usage: "t_test_1(list, μ0)",
            args: &T_TEST_1_ARGS,
            returns: "Object",
            examples: &T_TEST_1_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_1_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("t_test_1", args, 2, 2)?;
            let sample = sample_arg("t_test_1", args, 0, "list")?;
            let mu0 = number_arg("t_test_1", args, 1, "μ0")?;
            ttest_1samp(sample.values(), mu0)
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ One-Sample T-Test from statistics ============

pub struct TTest1Stats;

static T_TEST_1_STATS_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("mean", "Number", "Sample mean"),
    ArgMeta::required("μ0", "Number", "Hypothesized population mean"),
    ArgMeta::required("std", "Number", "Sample standard deviation (> 0)"),
    ArgMeta::required("n", "Number", "Sample size (integer ≥ 2)"),
];

static T_TEST_1_STATS_EXAMPLES: [&str; 1] = ["t_test_1_stats(105, 100, 15, 30) → t = 1.8257, p = 0.0781"];

static T_TEST_1_STATS_RELATED: [&str; 2] = ["t_test_1", "z_test"];

impl FunctionPlugin for TTest1Stats {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_1_stats",
            description: "One-sample t-test from summary statistics",
            usage: "t_test_1_stats(mean, μ0, std, n)",
            args: &T_TEST_1_STATS_ARGS,
            returns: "Object",
            examples: &T_TEST_1_STATS_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_1_STATS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "t_test_1_stats";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 4, 4)?;
            ttest_1samp_from_stats(
                number_arg(F, args, 0, "mean")?,
                number_arg(F, args, 1, "μ0")?,
                number_arg(F, args, 2, "std")?,
                number_arg(F, args, 3, "n")?,
            )
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ Z-Test ============

pub struct ZTest;

static Z_TEST_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("mean", "Number", "Sample mean"),
    ArgMeta::required("μ0", "Number", "Hypothesized population mean"),
    ArgMeta::required("σ", "Number", "Population standard deviation (> 0)"),
    ArgMeta::required("n", "Number", "Sample size (integer ≥ 1)"),
];

static Z_TEST_EXAMPLES: [&str; 1] = ["z_test(105, 100, 15, 30) → z = 1.8257, p = 0.0679"];

static Z_TEST_RELATED: [&str; 2] = ["t_test_1_stats", "norm_cdf"];

impl FunctionPlugin for ZTest {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "z_test",
            description: "One-sample z-test with known σ",
            usage: "z_test(mean, μ0, σ, n)",
            args: &Z_TEST_ARGS,
            returns: "Object",
            examples: &Z_TEST_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &Z_TEST_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("z_test", args, 4, 4)?;
            ztest_1samp(
                number_arg("z_test", args, 0, "mean")?,
                number_arg("z_test", args, 1, "μ0")?,
                number_arg("z_test", args, 2, "σ")?,
                number_arg("z_test", args, 3, "n")?,
            )
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ Two-Sample T-Test ============

pub struct TTest2;

static T_TEST_2_ARGS: [ArgMeta; 3] = [
    ArgMeta {
        name: "list1",
        typ: "List<Number>",
        description: "First sample",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "list2",
        typ: "List<Number>",
        description: "Second sample",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "variance",
        typ: "Text",
        description: "'welch' or 'pooled'",
        optional: true,
        default: Some("welch"),
    },
];

static T_TEST_2_EXAMPLES: [&str; 2] = ["t_test_2([1,2,3], [4,5,6])", "t_test_2([1,2,3], [4,5,6], \"pooled\")"];

static T_TEST_2_RELATED: [&str; 2] = ["t_test_2_stats", "t_test_paired"];

impl FunctionPlugin for TTest2 {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_2",
            description: "Independent two-sample t-test (Welch's by default)",
            usage: "t_test_2(list1, list2, [variance])",
            args: &T_TEST_2_ARGS,
            returns: "Object",
            examples: &T_TEST_2_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_2_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("t_test_2", args, 2, 3)?;
            let (x, y) = extract_two_samples("t_test_2", args)?;
            let assumption = assumption_arg("t_test_2", args, 2)?;
            ttest_ind(x.values(), y.values(), assumption)
        };
        decision_value(run(), ctx.alpha())
    }
}

pub struct TTest2Stats;

static T_TEST_2_STATS_ARGS: [ArgMeta; 7] = [
    ArgMeta::required("mean1", "Number", "Mean of group 1"),
    ArgMeta::required("std1", "Number", "Standard deviation of group 1 (> 0)"),
    ArgMeta::required("n1", "Number", "Size of group 1 (integer ≥ 2)"),
    ArgMeta::required("mean2", "Number", "Mean of group 2"),
    ArgMeta::required("std2", "Number", "Standard deviation of group 2 (> 0)"),
    ArgMeta::required("n2", "Number", "Size of group 2 (integer ≥ 2)"),
    ArgMeta::optional("variance", "Text", "'welch' or 'pooled'", "welch"),
];

static T_TEST_2_STATS_EXAMPLES: [&str; 1] = ["t_test_2_stats(10, 2, 20, 11, 2.5, 25)"];

static T_TEST_2_STATS_RELATED: [&str; 2] = ["t_test_2", "ci_diff"];

impl FunctionPlugin for TTest2Stats {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_2_stats",
            description: "Independent two-sample t-test from summary statistics",
            usage: "t_test_2_stats(mean1, std1, n1, mean2, std2, n2, [variance])",
            args: &T_TEST_2_STATS_ARGS,
            returns: "Object",
            examples: &T_TEST_2_STATS_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_2_STATS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "t_test_2_stats";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 6, 7)?;
            ttest_ind_from_stats(
                number_arg(F, args, 0, "mean1")?,
                number_arg(F, args, 1, "std1")?,
                number_arg(F, args, 2, "n1")?,
                number_arg(F, args, 3, "mean2")?,
                number_arg(F, args, 4, "std2")?,
                number_arg(F, args, 5, "n2")?,
                assumption_arg(F, args, 6)?,
            )
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ Paired T-Test ============

pub struct TTestPaired;

static T_TEST_PAIRED_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("list1", "List<Number>", "Before / first measurement"),
    ArgMeta::required("list2", "List<Number>", "After / second measurement (same length)"),
];

static T_TEST_PAIRED_EXAMPLES: [&str; 1] = ["t_test_paired([5,6,7], [6,8,9])"];

static T_TEST_PAIRED_RELATED: [&str; 2] = ["t_test_paired_stats", "wilcoxon"];

impl FunctionPlugin for TTestPaired {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_paired",
            description: "Paired t-test on two equal-length samples",
            usage: "t_test_paired(list1, list2)",
            args: &T_TEST_PAIRED_ARGS,
            returns: "Object",
            examples: &T_TEST_PAIRED_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_PAIRED_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("t_test_paired", args, 2, 2)?;
            let (x, y) = extract_two_samples("t_test_paired", args)?;
            ttest_rel(x.values(), y.values())
        };
        decision_value(run(), ctx.alpha())
    }
}

pub struct TTestPairedStats;

static T_TEST_PAIRED_STATS_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("mean_diff", "Number", "Mean of the differences"),
    ArgMeta::required("std_diff", "Number", "Standard deviation of the differences (> 0)"),
    ArgMeta::required("n", "Number", "Number of pairs (integer ≥ 2)"),
];

static T_TEST_PAIRED_STATS_EXAMPLES: [&str; 1] = ["t_test_paired_stats(1.2, 2, 15)"];

static T_TEST_PAIRED_STATS_RELATED: [&str; 1] = ["t_test_paired"];

impl FunctionPlugin for TTestPairedStats {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_test_paired_stats",
            description: "Paired t-test from the differences' summary statistics",
            usage: "t_test_paired_stats(mean_diff, std_diff, n)",
            args: &T_TEST_PAIRED_STATS_ARGS,
            returns: "Object",
            examples: &T_TEST_PAIRED_STATS_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &T_TEST_PAIRED_STATS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "t_test_paired_stats";
        let run = || -> Result<_, StatError> {
            require_args(F, args, 3, 3)?;
            ttest_rel_from_stats(
                number_arg(F, args, 0, "mean_diff")?,
                number_arg(F, args, 1, "std_diff")?,
                number_arg(F, args, 2, "n")?,
            )
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ Chi-Square Test ============

pub struct ChiTest;

static CHI_TEST_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "observed",
        typ: "List<Number>",
        description: "Observed frequencies",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "expected",
        typ: "List<Number>",
        description: "Expected frequencies (all > 0)",
        optional: false,
        default: None,
    },
];

static CHI_TEST_EXAMPLES: [&str; 1] = ["chi_test([10, 20, 30], [20, 20, 20]) → χ² = 10"];

static CHI_TEST_RELATED: [&str; 2] = ["chi_cdf", "anova"];

impl FunctionPlugin for ChiTest {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "chi_test",
            description: "Chi-square goodness-of-fit test",
            usage: "chi_test(observed, expected)",
            args: &CHI_TEST_ARGS,
            returns: "Object",
            examples: &CHI_TEST_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &CHI_TEST_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            require_args("chi_test", args, 2, 2)?;
            let observed = sample_arg("chi_test", args, 0, "observed")?;
            let expected = sample_arg("chi_test", args, 1, "expected")?;
            chisquare(observed.values(), expected.values())
        };
        decision_value(run(), ctx.alpha())
    }
}

// ============ ANOVA ============

pub struct Anova;

static ANOVA_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "groups",
    typ: "Text | List<Number>",
    description: "Two or more groups, each 'label: x1,x2,...' or a list",
    optional: false,
    default: None,
}];

static ANOVA_EXAMPLES: [&str; 1] = ["anova(\"a: 1,2,3\", \"b: 4,5,6\", \"c: 7,8,9\")"];

static ANOVA_RELATED: [&str; 2] = ["kruskal", "levene"];

impl FunctionPlugin for Anova {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "anova",
            description: "One-way analysis of variance",
            usage: "anova(group1, group2, ...)",
            args: &ANOVA_ARGS,
            returns: "Object",
            examples: &ANOVA_EXAMPLES,
            category: "stats/hypothesis",
            source: None,
            related: &ANOVA_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let run = || -> Result<_, StatError> {
            let groups = extract_groups("anova", args)?;
            let slices: Vec<&[f64]> = groups.iter().map(|g| g.sample.values()).collect();
            f_oneway(&slices)
        };
        decision_value(run(), ctx.alpha())
    }
}
