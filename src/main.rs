use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use wealth_score::assets::types::AssetRow;
use wealth_score::narrative::{
    build_prompt, render_stream, NarrativeClient, NarrativeConfig, FALLBACK_NARRATIVE,
};
use wealth_score::report::{build_report, to_json};
use wealth_score::scoring::{validate_model, ScoreResult, WealthModel};
use wealth_score::warnln;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
#[allow(dead_code)]
const EXIT_NETWORK: i32 = 2;
const EXIT_INPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score the asset table and print the comparison report (default if no subcommand)
    Score {
        /// Emit the report as JSON for charting tools
        #[arg(long)]
        json: bool,
    },
    /// Score the asset table, then stream an advisor narrative below the report
    Narrate,
    /// Write a starter asset table and config file
    Init {
        /// Where to write the starter asset table
        #[arg(long, default_value = "assets.csv")]
        assets: PathBuf,
        /// Overwrite existing files without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "wealth-score")]
#[command(about = "Six-dimension wealth score comparison, before and after planning", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wealth-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the asset table CSV (overrides the config file)
    #[arg(short, long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Score { json: false });
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match wealth_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Init writes starter files and is done; it never loads an asset table.
    if let Commands::Init { assets, force } = &command {
        if let Err(e) = wealth_score::config::run_init(assets, *force) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let model = config.wealth_model();

    let assets_path = cli
        .assets
        .clone()
        .or_else(|| config.assets_file.clone())
        .unwrap_or_else(|| PathBuf::from("assets.csv"));

    if cli.verbose {
        eprintln!("Loading assets from {}", assets_path.display());
    }

    // In JSON mode stdout is the machine contract: capture warnings so they
    // land in the report payload instead of the terminal.
    let json_output = matches!(command, Commands::Score { json: true });
    if json_output {
        wealth_score::warnings::capture();
    }

    let loaded = match wealth_score::assets::load_assets_file(&assets_path, &model) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Input error: {}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    for warning in &loaded.warnings {
        warnln!("{}", warning);
    }
    for warning in validate_model(&model) {
        warnln!("{}", warning);
    }

    if cli.verbose {
        eprintln!(
            "Loaded {} asset rows in {:?}",
            loaded.rows.len(),
            start_time.elapsed()
        );
    }

    let captured_warnings = if json_output {
        wealth_score::warnings::drain()
    } else {
        Vec::new()
    };
    let report = build_report(&loaded.rows, &model, captured_warnings);

    match command {
        Commands::Score { json: true } => match to_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Score { json: false } => {
            let use_colors = wealth_score::output::should_use_colors();
            println!("{}", wealth_score::output::format_report(&report, use_colors));
        }
        Commands::Narrate => {
            let use_colors = wealth_score::output::should_use_colors();
            println!("{}", wealth_score::output::format_report(&report, use_colors));
            println!();

            // The narrative needs a key; everything past that point degrades
            // to the fallback text instead of failing the run.
            let api_key = match wealth_score::credentials::setup_api_key_if_missing().await {
                Ok(key) => key,
                Err(e) => {
                    eprintln!("Credential error: {}", e);
                    std::process::exit(EXIT_AUTH);
                }
            };

            match run_narrative(
                &config.narrative(),
                &loaded.rows,
                &model,
                &report.result,
                api_key,
                cli.verbose,
            )
            .await
            {
                Ok(written) if written > 0 => println!(),
                Ok(_) => {
                    warnln!("narrative service produced no text");
                    println!("{}", FALLBACK_NARRATIVE);
                }
                Err(e) => {
                    warnln!("narrative unavailable: {}", e);
                    println!("{}", FALLBACK_NARRATIVE);
                }
            }
        }
        Commands::Init { .. } => unreachable!("handled before loading assets"),
    }

    if cli.verbose {
        eprintln!();
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Request the narrative and stream it to stdout as it arrives.
/// Returns the number of characters written.
async fn run_narrative(
    narrative_config: &NarrativeConfig,
    rows: &[AssetRow],
    model: &WealthModel,
    result: &ScoreResult,
    api_key: String,
    verbose: bool,
) -> anyhow::Result<usize> {
    let client = NarrativeClient::new(narrative_config, api_key)?;
    let prompt = build_prompt(rows, model, result);

    if verbose {
        eprintln!(
            "Requesting narrative from {} ({} prompt chars)",
            narrative_config.endpoint(),
            prompt.chars().count()
        );
    }

    let stream = client.open_stream(&prompt).await?;

    let mut stdout = std::io::stdout().lock();
    let (written, stream_error) = render_stream(stream, &mut stdout).await;
    if let Some(e) = stream_error {
        warnln!("{}", e);
    }
    Ok(written)
}
