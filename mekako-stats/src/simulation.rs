//! Coin and dice simulation
//!
//! The typed functions take any `rand::Rng`; the commands draw from the
//! context's generator, so a seeded context replays the same outcomes.

use crate::helpers::{as_count, count_arg, optional_number_arg, require_args, to_value};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAX_FLIPS: u64 = 1_000_000;
pub const MAX_DICE: u64 = 1000;
pub const MIN_SIDES: u64 = 2;
pub const MAX_SIDES: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinFlips {
    pub flips: u64,
    pub heads: u64,
    pub tails: u64,
}

impl CoinFlips {
    pub fn heads_ratio(&self) -> f64 {
        self.heads as f64 / self.flips as f64
    }
}

impl From<CoinFlips> for Value {
    fn from(c: CoinFlips) -> Self {
        Value::object([
            ("flips", Value::from(c.flips)),
            ("heads", Value::from(c.heads)),
            ("tails", Value::from(c.tails)),
            ("heads_ratio", Value::Number(c.heads_ratio())),
            ("tails_ratio", Value::Number(c.tails as f64 / c.flips as f64)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceRolls {
    pub dice: u64,
    pub sides: u64,
    pub rolls: Vec<u64>,
    pub total: u64,
    pub mean: f64,
}

impl From<DiceRolls> for Value {
    fn from(d: DiceRolls) -> Self {
        Value::object([
            ("dice", Value::from(d.dice)),
            ("sides", Value::from(d.sides)),
            ("rolls", Value::List(d.rolls.into_iter().map(Value::from).collect())),
            ("total", Value::from(d.total)),
            ("mean", Value::Number(d.mean)),
        ])
    }
}

/// Flip a fair coin `n` times, 1 ≤ n ≤ 1 000 000
pub fn coin_flip<R: Rng + ?Sized>(n: u64, rng: &mut R) -> Result<CoinFlips, StatError> {
    if !(1..=MAX_FLIPS).contains(&n) {
        return Err(StatError::invalid_argument(
            "coin_flip",
            "n",
            &format!("between 1 and {}", MAX_FLIPS),
            n,
        ));
    }
    let heads = (0..n).filter(|_| rng.gen_bool(0.5)).count() as u64;
    debug!(n, heads, "coin_flip");
    Ok(CoinFlips {
        flips: n,
        heads,
        tails: n - heads,
    })
}

/// Roll `dice` fair dice with `sides` faces each
pub fn dice_roll<R: Rng + ?Sized>(dice: u64, sides: u64, rng: &mut R) -> Result<DiceRolls, StatError> {
    const F: &str = "dice_roll";
    if !(1..=MAX_DICE).contains(&dice) {
        return Err(StatError::invalid_argument(F, "dice", &format!("between 1 and {}", MAX_DICE), dice));
    }
    if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
        return Err(StatError::invalid_argument(
            F,
            "sides",
            &format!("between {} and {}", MIN_SIDES, MAX_SIDES),
            sides,
        ));
    }

    let rolls: Vec<u64> = (0..dice).map(|_| rng.gen_range(1..=sides)).collect();
    let total: u64 = rolls.iter().sum();
    debug!(dice, sides, total, "dice_roll");
    Ok(DiceRolls {
        dice,
        sides,
        rolls,
        total,
        mean: total as f64 / dice as f64,
    })
}

// ============ Commands ============

pub struct CoinFlip;

static COIN_FLIP_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "n",
    typ: "Number",
    description: "Number of flips (1 to 1,000,000)",
    optional: false,
    default: None,
}];

static COIN_FLIP_EXAMPLES: [&str; 1] = ["coin_flip(100) → {heads: 47, tails: 53, ...}"];

impl CommandPlugin for CoinFlip {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            name: "coin_flip",
            description: "Simulate fair coin flips",
            args: &COIN_FLIP_ARGS,
            examples: &COIN_FLIP_EXAMPLES,
        }
    }

    fn execute(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let mut run = || -> Result<_, StatError> {
            require_args("coin_flip", args, 1, 1)?;
            let n = count_arg("coin_flip", args, 0, "n")?;
            coin_flip(n, &mut ctx.rng)
        };
        to_value(run())
    }
}

pub struct DiceRoll;

static DICE_ROLL_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "dice",
        typ: "Number",
        description: "Number of dice (1 to 1000)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "sides",
        typ: "Number",
        description: "Faces per die (2 to 100)",
        optional: true,
        default: Some("6"),
    },
];

static DICE_ROLL_EXAMPLES: [&str; 2] = ["dice_roll(3) → {rolls: [2, 6, 4], total: 12, ...}", "dice_roll(2, 20)"];

impl CommandPlugin for DiceRoll {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            name: "dice_roll",
            description: "Simulate rolling fair dice",
            args: &DICE_ROLL_ARGS,
            examples: &DICE_ROLL_EXAMPLES,
        }
    }

    fn execute(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let mut run = || -> Result<_, StatError> {
            require_args("dice_roll", args, 1, 2)?;
            let dice = count_arg("dice_roll", args, 0, "dice")?;
            let sides = optional_number_arg("dice_roll", args, 1, "sides", 6.0)?;
            let sides = as_count("dice_roll", "sides", sides)?;
            dice_roll(dice, sides, &mut ctx.rng)
        };
        to_value(run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    #[test]
    fn test_coin_flip_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = coin_flip(1000, &mut rng).unwrap();
        assert_eq!(c.heads + c.tails, 1000);
        assert!(c.heads > 400 && c.heads < 600);
    }

    #[test]
    fn test_coin_flip_large_is_near_half() {
        for seed in [1, 2, 3] {
            let mut rng = StdRng::seed_from_u64(seed);
            let c = coin_flip(MAX_FLIPS, &mut rng).unwrap();
            assert!((c.heads_ratio() - 0.5).abs() < 0.01, "seed {} ratio {}", seed, c.heads_ratio());
        }
    }

    #[test]
    fn test_coin_flip_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(coin_flip(0, &mut rng).unwrap_err().is_domain());
        assert!(coin_flip(MAX_FLIPS + 1, &mut rng).unwrap_err().is_domain());
        assert_eq!(coin_flip(1, &mut rng).unwrap().flips, 1);
    }

    #[test]
    fn test_dice_roll() {
        let mut rng = StdRng::seed_from_u64(42);
        let d = dice_roll(500, 6, &mut rng).unwrap();
        assert_eq!(d.rolls.len(), 500);
        assert!(d.rolls.iter().all(|r| (1..=6).contains(r)));
        assert_eq!(d.total, d.rolls.iter().sum::<u64>());
        assert!((d.mean - d.total as f64 / 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_dice_roll_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(dice_roll(0, 6, &mut rng).unwrap_err().is_domain());
        assert!(dice_roll(1001, 6, &mut rng).unwrap_err().is_domain());
        assert!(dice_roll(1, 1, &mut rng).unwrap_err().is_domain());
        assert!(dice_roll(1, 101, &mut rng).unwrap_err().is_domain());
        assert!(dice_roll(1000, 100, &mut rng).is_ok());
    }

    #[test]
    fn test_seeded_commands_replay() {
        let args = vec![Value::Number(20.0), Value::Number(20.0)];
        let mut a = eval_ctx().with_seed(11);
        let mut b = eval_ctx().with_seed(11);
        let ra = DiceRoll.execute(&args, &mut a);
        let rb = DiceRoll.execute(&args, &mut b);
        assert_eq!(ra.get("total").as_number(), rb.get("total").as_number());
        assert_eq!(format!("{:?}", ra.get("rolls")), format!("{:?}", rb.get("rolls")));
    }

    #[test]
    fn test_dice_rolls_serialize() {
        let mut rng = StdRng::seed_from_u64(3);
        let d = dice_roll(4, 6, &mut rng).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let back: DiceRolls = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_coin_flip_command_rejects_fraction() {
        let result = CoinFlip.execute(&[Value::Number(2.5)], &mut eval_ctx());
        assert!(result.as_error().unwrap().is_domain());
        let ok = CoinFlip.execute(&[Value::Number(10.0)], &mut eval_ctx());
        assert_eq!(ok.get("flips").as_number(), Some(10.0));
    }
}
