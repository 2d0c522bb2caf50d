//! Common test utilities for building block models and sample data.
use dankai::prelude::*;
use dankai::model::{Condition, ConditionGroup, ConditionOperator, LogicBlock, Stage};
use rand::Rng;
use rand::rngs::StdRng;

/// A stage guarded by a single condition group.
#[allow(dead_code)]
pub fn stage(id: &str, content: &str, conditions: Vec<Condition>) -> Stage {
    Stage::new(id, id, content).with_group(ConditionGroup::new(format!("{id}_g1"), conditions))
}

/// Creates the temperature block used across the tests.
///
/// Logic: `temp < 50` -> "cold", `temp >= 50` -> "warm", otherwise "unknown"
#[allow(dead_code)]
pub fn create_temperature_block() -> LogicBlock {
    LogicBlock::new("weather", "Weather")
        .with_stage(stage(
            "cold",
            "cold",
            vec![Condition::new("temp", ConditionOperator::Less, "50")],
        ))
        .with_stage(stage(
            "warm",
            "warm",
            vec![Condition::new("temp", ConditionOperator::GreaterEqual, "50")],
        ))
        .with_default("unknown")
}

/// Creates a block whose only stage matches `mood == "a" || mood === "b"`.
#[allow(dead_code)]
pub fn create_two_group_block() -> LogicBlock {
    LogicBlock::new("mood", "Mood")
        .with_stage(
            Stage::new("match", "Match", "matched")
                .with_group(ConditionGroup::new(
                    "ga",
                    vec![Condition::new("mood", ConditionOperator::Equal, "a")],
                ))
                .with_group(ConditionGroup::new(
                    "gb",
                    vec![Condition::new("mood", ConditionOperator::Is, "b")],
                )),
        )
        .with_default("fallthrough")
}

/// Builds sample data from `(path, input)` pairs; paths get the default `stat_data.` prefix.
#[allow(dead_code)]
pub fn sample(pairs: &[(&str, &str)]) -> SampleData {
    let config = TemplateConfig::default();
    let mut data = SampleData::new();
    for (path, raw) in pairs {
        data.set_input(config.qualified_path(path), raw);
    }
    data
}

/// Numeric variables: sampled as numbers and compared with every operator.
#[allow(dead_code)]
pub const NUMERIC_PATHS: [&str; 3] = ["hp", "stats.level", "day"];
/// Text variables: sampled as words and compared with equality operators only.
#[allow(dead_code)]
pub const TEXT_PATHS: [&str; 2] = ["weather", "mood"];
#[allow(dead_code)]
pub const WORDS: [&str; 8] = ["sunny", "rain", "it's", "calm", "开心", "aé", "Infinity", ""];
/// Boolean variables: sampled as `true`/`false` and compared with every operator.
#[allow(dead_code)]
pub const BOOL_PATHS: [&str; 1] = ["flags.active"];

/// Numeric operands, including spellings that are not canonical numerals.
const NUMERIC_OPERANDS: [&str; 11] = [
    "0", "10", "25", "50", "-5", "2.5", "007", "5.0", "", "Infinity", "开心",
];
const BOOL_OPERANDS: [&str; 6] = ["true", "false", "1", "0", "", "开心"];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn random_operator(rng: &mut StdRng) -> ConditionOperator {
    match rng.random_range(0..10) {
        0 => ConditionOperator::Less,
        1 => ConditionOperator::LessEqual,
        2 => ConditionOperator::Equal,
        3 => ConditionOperator::Greater,
        4 => ConditionOperator::GreaterEqual,
        5 | 6 => ConditionOperator::Range,
        7 => ConditionOperator::Is,
        8 => ConditionOperator::IsNot,
        _ => ConditionOperator::Unknown,
    }
}

fn random_condition(rng: &mut StdRng) -> Condition {
    if rng.random_bool(0.15) {
        let path = pick(rng, &BOOL_PATHS);
        let operator = random_operator(rng);
        let mut condition = Condition::new(path, operator, pick(rng, &BOOL_OPERANDS));
        if operator == ConditionOperator::Range {
            condition.end_value = Some(pick(rng, &BOOL_OPERANDS).to_string());
        }
        return condition;
    }
    if rng.random_bool(0.3) {
        let operator = match rng.random_range(0..3) {
            0 => ConditionOperator::Equal,
            1 => ConditionOperator::Is,
            _ => ConditionOperator::IsNot,
        };
        return Condition::new(pick(rng, &TEXT_PATHS), operator, pick(rng, &WORDS));
    }

    let path = pick(rng, &NUMERIC_PATHS);
    let operand = pick(rng, &NUMERIC_OPERANDS);
    let operator = random_operator(rng);
    let mut condition = Condition::new(path, operator, operand);
    if operator == ConditionOperator::Range && rng.random_bool(0.9) {
        condition.end_value = Some(pick(rng, &NUMERIC_OPERANDS).to_string());
    }
    condition
}

/// Generates a random block with unique stage and group ids.
#[allow(dead_code)]
pub fn random_block(rng: &mut StdRng, index: usize) -> LogicBlock {
    let mut block = LogicBlock::new(format!("b{index}"), format!("Block {index}"))
        .with_default(format!("default {index}"));
    if rng.random_bool(0.1) {
        block = block.disabled();
    }

    for s in 0..rng.random_range(0..5) {
        let content = match rng.random_range(0..6) {
            0 => String::new(),
            1 => format!("b{index}s{s} \n\n"),
            _ => format!("b{index}s{s}"),
        };
        let mut stage = Stage::new(format!("b{index}s{s}"), format!("Stage {s}"), content);
        for g in 0..rng.random_range(0..3) {
            let conditions = (0..rng.random_range(0..3))
                .map(|_| random_condition(rng))
                .collect();
            stage = stage.with_group(ConditionGroup::new(format!("b{index}s{s}g{g}"), conditions));
        }
        block = block.with_stage(stage);
    }
    block
}

/// Samples every variable, leaving some of them missing.
#[allow(dead_code)]
pub fn random_sample(rng: &mut StdRng) -> SampleData {
    let config = TemplateConfig::default();
    let mut data = SampleData::new();
    for path in NUMERIC_PATHS {
        if rng.random_bool(0.85) {
            let path = config.qualified_path(path);
            match rng.random_range(0..6) {
                0 => data.insert(path, Value::Number(f64::from(rng.random_range(-10..60_i32)))),
                1 => data.insert(path, Value::Number(2.5)),
                2 => data.insert(path, Value::Number(50.0)),
                3 => data.set_input(path, pick(rng, &["Infinity", "-Infinity", "0x10"])),
                _ => data.insert(
                    path,
                    Value::Number(f64::from(rng.random_range(0..30_i32)) / 2.0),
                ),
            };
        }
    }
    for path in TEXT_PATHS {
        if rng.random_bool(0.85) {
            data.insert(config.qualified_path(path), Value::Text(pick(rng, &WORDS).to_string()));
        }
    }
    for path in BOOL_PATHS {
        if rng.random_bool(0.85) {
            data.insert(config.qualified_path(path), Value::Bool(rng.random_bool(0.5)));
        }
    }
    data
}
