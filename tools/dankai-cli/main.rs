use clap::{Parser, ValueEnum};
use dankai::evaluator::Selection;
use dankai::model::LogicBlock;
use dankai::prelude::*;
use dankai::validation::validate;
use dankai::variables::VariableCatalog;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// CLI-side mirror of the fallback policy for clap.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyCli {
    FirstEnabled,
    PerBlock,
}

/// Compile staged template blocks and simulate them against sample values
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the logic blocks JSON file
    blocks_path: Option<String>,
    /// Optional path to the sample data JSON file for evaluation
    sample_data_path: Option<String>,

    /// Optional template configuration JSON (accessor, pathPrefix, ...)
    #[arg(short, long)]
    config: Option<String>,

    /// Which default content to show when no stage matches
    #[arg(short, long, value_enum)]
    policy: Option<PolicyCli>,

    /// Optional YAML variable catalog, used for validation and default samples
    #[arg(short, long)]
    variables: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

struct RunOptions {
    blocks_path: String,
    sample_data_path: Option<String>,
    config_path: Option<String>,
    variables_path: Option<String>,
    policy: Option<FallbackPolicy>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.human {
        run_interactive();
    } else {
        run_non_interactive(cli);
    }
}

fn run(options: RunOptions) {
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let blocks_json = read_file(&options.blocks_path, "blocks");
    let blocks: Vec<LogicBlock> = serde_json::from_str(&blocks_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse blocks JSON: {}", e)));

    let mut config = match &options.config_path {
        Some(path) => serde_json::from_str::<TemplateConfig>(&read_file(path, "config"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse config JSON: {}", e))),
        None => TemplateConfig::default(),
    };
    if let Some(policy) = options.policy {
        config.fallback_policy = policy;
    }

    let catalog = options.variables_path.as_ref().map(|path| {
        VariableCatalog::from_yaml(&read_file(path, "variables"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse variables: {}", e)))
    });

    let sample_data = match (&options.sample_data_path, &catalog) {
        (Some(path), _) => SampleData::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load sample data from '{}': {}", path, e))
        }),
        (None, Some(catalog)) => {
            println!("No sample data file provided. Using catalog values.");
            SampleData::from_catalog(catalog, &config)
        }
        (None, None) => {
            println!("No sample data file provided. Every variable is missing.");
            SampleData::default()
        }
    };
    let load_duration = load_start.elapsed();

    // --- 2. Validation ---
    let findings = validate(&blocks, catalog.as_ref());
    if !findings.is_empty() {
        println!("\n--- Validation ---");
        for finding in &findings {
            println!("  {}", finding);
        }
    }

    // --- 3. Compilation ---
    println!("\nCompiling {} logic blocks...", blocks.len());
    let compile_start = Instant::now();
    let compiler = Compiler::builder().with_config(config.clone()).build();
    let compiled = compiler
        .compile(&blocks)
        .unwrap_or_else(|e| exit_with_error(&format!("Template generation failed: {}", e)));
    let compile_duration = compile_start.elapsed();
    println!(
        "Compilation successful! {} active blocks in {:?}",
        compiled.blocks.len(),
        compile_duration
    );
    println!("\n--- Template ---\n{}", compiled.source);

    // --- 4. Simulation ---
    let eval_start = Instant::now();
    let evaluator = Evaluator::new(&blocks, config.clone());
    let result = evaluator.eval(&sample_data);
    let eval_duration = eval_start.elapsed();

    println!("\n--- Simulation ---");
    for outcome in &result.outcomes {
        match &outcome.selection {
            Selection::Stage { index, name, .. } => println!(
                "  {} -> stage #{} '{}'\n     Reason: {}",
                outcome.block_name,
                index + 1,
                name,
                outcome.reason
            ),
            Selection::Default => println!("  {} -> default content", outcome.block_name),
        }
    }

    // --- 5. Rendered preview ---
    let render_start = Instant::now();
    let renderer = ReferenceRenderer::from_config(&config);
    let rendered = evaluator.try_preview(Some(&renderer), &compiled.source, &sample_data);
    let render_duration = render_start.elapsed();

    println!("\n--- Preview ---");
    match &rendered {
        Ok(text) => {
            println!("{}", text);
            if *text == result.content {
                println!("\n  -> Rendered output matches the simulation");
            } else {
                println!("\n  -> Rendered output differs from the simulation:\n{}", result.content);
            }
        }
        Err(e) => println!("Preview error: {}", e),
    }

    let total_duration = total_start.elapsed();
    println!("\n--- Dataset Summary ---");
    println!("Sample Values:        {}", sample_data.values().len());
    println!("Fallback Policy:      {:?}", config.fallback_policy);

    println!("\n--- Performance Summary ---");
    println!("File Loading:         {:?}", load_duration);
    println!("Compilation:          {:?}", compile_duration);
    println!("Simulation:           {:?}", eval_duration);
    println!("Rendering:            {:?}", render_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_duration);
    println!();
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let blocks_path = cli.blocks_path.unwrap_or_else(|| {
        exit_with_error("Blocks path is required in non-interactive mode.");
    });

    run(RunOptions {
        blocks_path,
        sample_data_path: cli.sample_data_path,
        config_path: cli.config,
        variables_path: cli.variables,
        policy: cli.policy.map(|p| match p {
            PolicyCli::FirstEnabled => FallbackPolicy::FirstEnabledBlock,
            PolicyCli::PerBlock => FallbackPolicy::PerBlock,
        }),
    });
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    println!("--- Dankai Interactive Mode ---");

    let blocks_path = prompt_for_input("Enter logic blocks path", Some("data/blocks.json"));
    let sample_data_path = optional(prompt_for_input(
        "Enter sample data path (optional)",
        Some("data/sample_data.json"),
    ));
    let variables_path = optional(prompt_for_input("Enter variable YAML path (optional)", None));

    let policy = loop {
        println!("\nWhat should a block show when no stage matches?");
        println!("  1: Default content of the first enabled block");
        println!("  2: The block's own default content");
        let choice_str = prompt_for_input("Enter choice", Some("1"));

        match choice_str.trim() {
            "1" => break FallbackPolicy::FirstEnabledBlock,
            "2" => break FallbackPolicy::PerBlock,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };

    run(RunOptions {
        blocks_path,
        sample_data_path,
        config_path: None,
        variables_path,
        policy: Some(policy),
    });
}

fn optional(input: String) -> Option<String> {
    if input.is_empty() { None } else { Some(input) }
}

fn read_file(path: &str, what: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read {} file '{}': {}", what, path, e))
    })
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
