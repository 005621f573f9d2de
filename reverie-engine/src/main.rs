//! reverie - journal analysis CLI
//!
//! Runs the analysis engine in-process and prints JSON to stdout. Logs go to
//! stderr (and optionally a file from `[logging] file`).
//!
//! Configuration priority: CLI `--config` → `REVERIE_*` environment →
//! TOML file → compiled defaults.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reverie_common::config::{default_config_path, load_config, write_toml_config, TomlConfig};
use reverie_common::SystemClock;
use reverie_engine::{
    categorize_emotion, emotion_color, related_emotions_for_label, resolve, AnalysisCache,
    AnalysisOrchestrator, HttpAnalysisClient, ScenarioCache, ScenarioGenerator,
    ScenarioOrchestrator, ScenarioRequest, TextAnalyzer,
};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "reverie")]
#[command(about = "Journal analysis engine")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a journal entry (content read from stdin when omitted)
    Analyze {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(long)]
        content: Option<String>,
        /// Skip the external service even if one is configured
        #[arg(long)]
        offline: bool,
    },
    /// Resolve an emotion label to its core emotion
    Resolve { label: String },
    /// Place an emotion label in the taxonomy
    Categorize { label: String },
    /// List emotions related to a label's core emotion
    Related { label: String },
    /// Display color for an emotion label
    Color { label: String },
    /// Build a CBT practice session for an automatic thought
    Practice {
        #[arg(long)]
        thought: String,
        #[arg(long = "distortion")]
        distortions: Vec<String>,
        #[arg(long)]
        emotion: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        offline: bool,
    },
    /// Write a default config file (per-user location unless a path is given)
    InitConfig {
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A broken existing file must not block writing a fresh one
    let config = match &args.command {
        Command::InitConfig { .. } => TomlConfig::default(),
        _ => load_config(args.config.as_deref()).context("Failed to load configuration")?,
    };
    init_tracing(&config)?;

    let output = match args.command {
        Command::Analyze {
            title,
            content,
            offline,
        } => {
            let content = match content {
                Some(content) => content,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read entry from stdin")?;
                    buf
                }
            };

            let client = online_client(&config, offline)?;
            let analyzer = client.map(|c| c as Arc<dyn TextAnalyzer>);
            let cache = AnalysisCache::from_settings(&config.analysis, Arc::new(SystemClock));
            let orchestrator = AnalysisOrchestrator::new(analyzer, cache)
                .with_similarity_threshold(config.analysis.similarity_threshold);

            let (result, source) = orchestrator.analyze_with_source(&title, &content).await?;
            info!(source = ?source, "Analysis finished");
            serde_json::to_value(result)?
        }
        Command::Resolve { label } => json!({
            "label": label,
            "core": resolve(&label),
        }),
        Command::Categorize { label } => json!({
            "label": label,
            "category": categorize_emotion(&label),
        }),
        Command::Related { label } => json!({
            "label": label,
            "related": related_emotions_for_label(&label),
        }),
        Command::Color { label } => json!({
            "label": label,
            "color": emotion_color(&label),
        }),
        Command::Practice {
            thought,
            distortions,
            emotion,
            instructions,
            offline,
        } => {
            let client = online_client(&config, offline)?;
            let generator = client.map(|c| c as Arc<dyn ScenarioGenerator>);
            let cache = ScenarioCache::from_settings(&config.scenarios, Arc::new(SystemClock));
            let orchestrator = ScenarioOrchestrator::new(generator, cache);
            let request = ScenarioRequest {
                thought,
                distortions,
                emotion,
                instructions,
            };
            serde_json::to_value(orchestrator.practice_session(&request).await?)?
        }
        Command::InitConfig { path, force } => init_config(path, force)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn online_client(config: &TomlConfig, offline: bool) -> Result<Option<Arc<HttpAnalysisClient>>> {
    if offline {
        return Ok(None);
    }
    let client = HttpAnalysisClient::from_settings(&config.analysis)
        .context("Failed to create analysis client")?;
    match &client {
        Some(_) => info!(model = %config.analysis.model, "Using external analysis service"),
        None => info!("No analysis endpoint configured, running offline"),
    }
    Ok(client.map(Arc::new))
}

/// Write compiled defaults as a starter config file
fn init_config(path: Option<PathBuf>, force: bool) -> Result<serde_json::Value> {
    let target = path
        .or_else(default_config_path)
        .context("No config directory on this platform, pass a path")?;
    if target.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }
    write_toml_config(&TomlConfig::default(), &target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!(path = %target.display(), "Wrote default configuration");
    Ok(json!({ "written": target }))
}

/// stderr logging, plus a plain-text file layer when `[logging] file` is set
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_common::config::read_toml_config;

    #[test]
    fn test_init_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let output = init_config(Some(path.clone()), false).unwrap();
        assert_eq!(output["written"], json!(path));

        let written = read_toml_config(&path).unwrap();
        assert_eq!(written.analysis.ttl_hours, TomlConfig::default().analysis.ttl_hours);
    }

    #[test]
    fn test_init_config_keeps_existing_file_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        assert!(init_config(Some(path.clone()), false).is_err());
        assert!(std::fs::read_to_string(&path).unwrap().contains("debug"));

        init_config(Some(path.clone()), true).unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("\"debug\""));
    }
}
