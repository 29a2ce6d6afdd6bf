//! Step Synth - Workflow Step Synthesis
//!
//! Turns a captured session of input events and screen observations into
//! confidence-scored workflow steps.

use std::path::{Path, PathBuf};
use step_synth::app::cli::{Cli, Commands, ConfigAction};
use step_synth::app::config::Config;
use step_synth::synthesis::quality::QualityChecker;
use step_synth::{CaptureSession, StepSynthesizer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Logs go to stderr so stdout stays clean JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config_path();
    let config = cli.load_config()?;

    match cli.command {
        Commands::Synthesize {
            input,
            output,
            report,
        } => {
            run_synthesize(&input, output, report, &config)?;
        }
        Commands::Validate { input } => {
            run_validate(&input)?;
        }
        Commands::Init { force } => {
            run_init(force, &config, &config_path)?;
        }
        Commands::Config { action } => {
            run_config(action, &config, &config_path)?;
        }
    }

    Ok(())
}

fn load_session(input: &Path) -> anyhow::Result<CaptureSession> {
    if !input.exists() {
        anyhow::bail!("Session file not found: {:?}", input);
    }

    let session = CaptureSession::load(input)?;
    info!(
        name = %session.metadata.name,
        events = session.events.len(),
        observations = session.observations.len(),
        "Loaded capture session"
    );
    Ok(session)
}

fn run_synthesize(
    input: &Path,
    output: Option<PathBuf>,
    report: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let session = load_session(input)?;
    let synthesizer = StepSynthesizer::new(config.synthesis())?;
    let result = session.synthesize(&synthesizer)?;

    let mut document = serde_json::to_value(&result)?;
    if report {
        let quality = QualityChecker::new(config.report.min_confidence).check(&result);
        if !quality.passed {
            warn!(
                errors = quality.errors.len(),
                min_confidence = quality.min_confidence,
                "Some steps are below the confidence floor"
            );
        }
        if let Some(fields) = document.as_object_mut() {
            fields.insert("quality".to_string(), serde_json::to_value(&quality)?);
        }
    }

    let json = if config.report.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            info!("Wrote {} steps to {:?}", result.summary.total_steps, path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_validate(input: &Path) -> anyhow::Result<()> {
    info!("Validating {:?}", input);

    match load_session(input) {
        Ok(session) => {
            println!("Validation PASSED");
            println!("  Name: {}", session.metadata.name);
            println!("  Events: {}", session.events.len());
            println!("  Observations: {}", session.observations.len());
            println!("  Time span: {:.2}s", session.time_span());
            Ok(())
        }
        Err(e) => {
            println!("Validation FAILED:");
            println!("  - {}", e);
            anyhow::bail!("Session {:?} is invalid", input)
        }
    }
}

fn run_init(force: bool, config: &Config, config_path: &PathBuf) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save(config_path)?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config, config_path: &PathBuf) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Get { key } => match config.get(&key)? {
            Some(v) => println!("{} = {}", key, v),
            None => anyhow::bail!("Configuration key '{}' not found", key),
        },
        ConfigAction::Set { key, value } => {
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'step-synth init' first.");
            }

            let updated = config.with_value(&key, &value)?;
            updated.save(config_path)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}
