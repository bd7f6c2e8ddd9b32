//! Mekako Statistics
//!
//! Probability distributions, hypothesis tests, confidence intervals,
//! correlation and regression, exact combinatorics and simulation.
//!
//! Every operation is available twice: as a typed function returning
//! `Result<T, StatError>`, and as a registry plugin that returns
//! `Value::Error` instead of panicking.

mod helpers;
mod special;

pub mod combinatorics;
pub mod confidence;
pub mod correlation;
pub mod curve;
pub mod descriptive;
pub mod distributions;
pub mod hypothesis;
pub mod nonparametric;
pub mod regression;
pub mod simulation;

pub use combinatorics::{combination, factorial, permutation};
pub use confidence::{ci_diff, ci_mean, ci_mean_sample, ci_proportion, ConfidenceInterval};
pub use correlation::{pearson, spearman, CorrelationResult};
pub use curve::{density_curve, Curve};
pub use descriptive::Summary;
pub use distributions::{
    ContinuousDistribution, DiscreteDistribution, Distribution, DistributionFamily,
};
pub use hypothesis::{
    chisquare, f_oneway, ttest_1samp, ttest_1samp_from_stats, ttest_ind, ttest_ind_from_stats,
    ttest_rel, ttest_rel_from_stats, ztest_1samp, FTestResult, TestResult, VarianceAssumption,
};
pub use nonparametric::{friedman, kruskal, levene, mann_whitney_u, wilcoxon, PValueMethod, RankTestResult};
pub use regression::{linregress, RegressionResult};
pub use simulation::{coin_flip, dice_roll, CoinFlips, DiceRolls};
pub use special::NumericError;

use mekako_plugin::PluginRegistry;

/// Load statistics functions and commands into registry
pub fn load_stats_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Descriptive
        .with_function(descriptive::Mean)
        .with_function(descriptive::Median)
        .with_function(descriptive::Variance)
        .with_function(descriptive::Stddev)
        .with_function(descriptive::SummaryStats)

        // Distributions - Normal
        .with_function(distributions::NormPdf)
        .with_function(distributions::NormCdf)
        .with_function(distributions::NormInv)
        // Distributions - Exponential, Gamma, Beta, Uniform
        .with_function(distributions::ExpPdf)
        .with_function(distributions::ExpCdf)
        .with_function(distributions::ExpInv)
        .with_function(distributions::GammaPdf)
        .with_function(distributions::GammaCdf)
        .with_function(distributions::GammaInv)
        .with_function(distributions::BetaPdf)
        .with_function(distributions::BetaCdf)
        .with_function(distributions::BetaInv)
        .with_function(distributions::UnifPdf)
        .with_function(distributions::UnifCdf)
        .with_function(distributions::UnifInv)
        // Distributions - Student's t
        .with_function(distributions::TPdf)
        .with_function(distributions::TCdf)
        .with_function(distributions::TInv)
        // Distributions - Chi-squared
        .with_function(distributions::ChiPdf)
        .with_function(distributions::ChiCdf)
        .with_function(distributions::ChiInv)
        // Distributions - F
        .with_function(distributions::FPdf)
        .with_function(distributions::FCdf)
        .with_function(distributions::FInv)
        // Distributions - Discrete
        .with_function(distributions::BinomPmf)
        .with_function(distributions::BinomCdf)
        .with_function(distributions::PoissonPmf)
        .with_function(distributions::PoissonCdf)
        .with_function(curve::DensityCurve)

        // Combinatorics
        .with_function(combinatorics::Factorial)
        .with_function(combinatorics::Combination)
        .with_function(combinatorics::Permutation)

        // Parametric tests
        .with_function(hypothesis::TTest1)
        .with_function(hypothesis::TTest1Stats)
        .with_function(hypothesis::ZTest)
        .with_function(hypothesis::TTest2)
        .with_function(hypothesis::TTest2Stats)
        .with_function(hypothesis::TTestPaired)
        .with_function(hypothesis::TTestPairedStats)
        .with_function(hypothesis::ChiTest)
        .with_function(hypothesis::Anova)

        // Rank tests and Levene
        .with_function(nonparametric::MannWhitney)
        .with_function(nonparametric::Wilcoxon)
        .with_function(nonparametric::Kruskal)
        .with_function(nonparametric::Friedman)
        .with_function(nonparametric::Levene)

        // Bivariate
        .with_function(correlation::Correlation)
        .with_function(correlation::Spearman)
        .with_function(regression::LinearReg)

        // Confidence intervals
        .with_function(confidence::Ci)
        .with_function(confidence::Moe)
        .with_function(confidence::CiMean)
        .with_function(confidence::CiProportion)
        .with_function(confidence::CiDiff)

        // Simulation
        .with_command(simulation::CoinFlip)
        .with_command(simulation::DiceRoll)
}

/// Create registry with the statistics library
pub fn standard_registry() -> PluginRegistry {
    load_stats_library(PluginRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mekako_core::Value;
    use mekako_plugin::{EvalContext, StatConfig};
    use std::sync::Arc;

    fn ctx() -> EvalContext {
        EvalContext::new(Arc::new(standard_registry()))
    }

    #[test]
    fn test_every_function_has_metadata() {
        let registry = standard_registry();
        assert_eq!(registry.function_count(), 59);
        let listing = registry.list_functions(None);
        assert!(listing.as_list().is_some() || listing.as_object().is_some());
        assert!(registry.get_function("t_test_1_stats").is_some());
        assert!(registry.get_command("coin_flip").is_some());
    }

    #[test]
    fn test_call_through_registry() {
        let ctx = ctx();
        let args: Vec<Value> = [105.0, 100.0, 15.0, 30.0].into_iter().map(Value::Number).collect();
        let result = ctx.registry.call_function("t_test_1_stats", &args, &ctx);
        assert!((result.get("statistic").as_number().unwrap() - 1.8257).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_function_suggests() {
        let ctx = ctx();
        let result = ctx.registry.call_function("t_tst_1", &[], &ctx);
        let err = result.as_error().unwrap();
        assert_eq!(err.code, mekako_core::codes::UNDEFINED_FUNC);
    }

    #[test]
    fn test_seeded_coin_flip_command() {
        let registry = Arc::new(standard_registry());
        let config = StatConfig::default().with_seed(5);
        let mut a = EvalContext::with_config(registry.clone(), config.clone());
        let mut b = EvalContext::with_config(registry.clone(), config);
        let args = [Value::Number(1000.0)];
        let ra = registry.execute_command("coin_flip", &args, &mut a);
        let rb = registry.execute_command("coin_flip", &args, &mut b);
        assert_eq!(ra.get("heads").as_number(), rb.get("heads").as_number());
        let heads = ra.get("heads").as_number().unwrap();
        let tails = ra.get("tails").as_number().unwrap();
        assert_eq!(heads + tails, 1000.0);
    }
}
