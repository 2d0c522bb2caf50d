use clap::Parser;
use dankai::config::TemplateConfig;
use dankai::model::{Condition, ConditionGroup, ConditionOperator, LogicBlock, Stage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value as Json};
use std::fs;

/// A CLI tool to generate logic blocks and sample data for the Dankai simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated blocks JSON to
    #[arg(long, default_value = "generated_blocks.json")]
    blocks_output: String,

    /// The path to write the generated sample data JSON to
    #[arg(long, default_value = "generated_data.json")]
    data_output: String,

    /// Number of logic blocks to generate
    #[arg(long, default_value_t = 3)]
    blocks: usize,

    /// The maximum number of stages per block
    #[arg(long, default_value_t = 4)]
    max_stages: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

/// Numeric state variables the generated conditions read.
const NUMERIC_VARIABLES: [&str; 4] = ["player.hp", "player.mp", "world.day", "relation.affection"];
/// Text state variables, compared with equality operators only.
const TEXT_VARIABLES: [&str; 2] = ["world.weather", "player.mood"];
const TEXT_CHOICES: [&str; 4] = ["sunny", "rain", "calm", "angry"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.max_stages == 0 {
        eprintln!("Error: --max-stages must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating {} logic blocks (1 to {} stages each)...",
        cli.blocks, cli.max_stages
    );

    let blocks: Vec<LogicBlock> = (0..cli.blocks)
        .map(|i| generate_block(&mut rng, i, cli.max_stages))
        .collect();
    fs::write(&cli.blocks_output, serde_json::to_string_pretty(&blocks)?)?;
    println!("-> Saved blocks to '{}'", cli.blocks_output);

    let sample = generate_sample(&mut rng, &TemplateConfig::default());
    fs::write(&cli.data_output, serde_json::to_string_pretty(&sample)?)?;
    println!(
        "-> Saved {} sample values to '{}'",
        sample.len(),
        cli.data_output
    );

    Ok(())
}

fn generate_block(rng: &mut StdRng, index: usize, max_stages: usize) -> LogicBlock {
    let stage_count = rng.random_range(1..=max_stages);
    let mut block = LogicBlock::new(format!("block_{}", index + 1), format!("Block {}", index + 1))
        .with_default(format!("Block {} default", index + 1));

    for s in 0..stage_count {
        let group_count = rng.random_range(1..=2);
        let mut stage = Stage::new(
            format!("stage_{}_{}", index + 1, s + 1),
            format!("Stage {}", s + 1),
            format!("Block {} stage {}", index + 1, s + 1),
        );
        for g in 0..group_count {
            let conditions = (0..rng.random_range(1..=2))
                .map(|_| generate_condition(rng))
                .collect();
            stage = stage.with_group(ConditionGroup::new(
                format!("group_{}_{}_{}", index + 1, s + 1, g + 1),
                conditions,
            ));
        }
        block = block.with_stage(stage);
    }
    block
}

fn generate_condition(rng: &mut StdRng) -> Condition {
    if rng.random_bool(0.25) {
        let path = TEXT_VARIABLES[rng.random_range(0..TEXT_VARIABLES.len())];
        let value = TEXT_CHOICES[rng.random_range(0..TEXT_CHOICES.len())];
        let operator = match rng.random_range(0..3) {
            0 => ConditionOperator::Equal,
            1 => ConditionOperator::Is,
            _ => ConditionOperator::IsNot,
        };
        return Condition::new(path, operator, value);
    }

    let path = NUMERIC_VARIABLES[rng.random_range(0..NUMERIC_VARIABLES.len())];
    let value = rng.random_range(0..100);
    match rng.random_range(0..8) {
        0 => Condition::new(path, ConditionOperator::Less, value.to_string()),
        1 => Condition::new(path, ConditionOperator::LessEqual, value.to_string()),
        2 => Condition::new(path, ConditionOperator::Equal, value.to_string()),
        3 => Condition::new(path, ConditionOperator::Greater, value.to_string()),
        4 => Condition::new(path, ConditionOperator::GreaterEqual, value.to_string()),
        5 => Condition::new(path, ConditionOperator::Is, value.to_string()),
        6 => Condition::new(path, ConditionOperator::IsNot, value.to_string()),
        _ => Condition::range(
            path,
            value.to_string(),
            (value + rng.random_range(1..30)).to_string(),
        ),
    }
}

/// Samples every variable, leaving roughly one in ten missing.
fn generate_sample(rng: &mut StdRng, config: &TemplateConfig) -> Map<String, Json> {
    let mut sample = Map::new();
    for path in NUMERIC_VARIABLES {
        if rng.random_bool(0.9) {
            sample.insert(
                config.qualified_path(path),
                Json::from(rng.random_range(0..100)),
            );
        }
    }
    for path in TEXT_VARIABLES {
        if rng.random_bool(0.9) {
            let choice = TEXT_CHOICES[rng.random_range(0..TEXT_CHOICES.len())];
            sample.insert(config.qualified_path(path), Json::from(choice));
        }
    }
    sample
}
