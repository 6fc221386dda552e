#![deny(unsafe_code)]

//! maxtag CLI — configuration and model-inspection tooling.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use maxtag_core::{Language, TagVocabulary};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// maxtag — feature-space tooling for a maximum-entropy tagger.
#[derive(Parser)]
#[command(name = "maxtag", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "maxtag.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },

    /// List the supported language presets.
    Languages,

    /// Show the closed-class tag preset for a language.
    Tags {
        /// Language name (empty for the neutral preset).
        language: String,
    },

    /// Inspect a saved tag vocabulary file.
    Inspect {
        /// Path to the vocabulary file.
        file: PathBuf,

        /// Language the vocabulary was trained for.
        #[arg(long, default_value = "")]
        language: String,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Config { show } => cmd_config(&cli.config, show).await?,
        Commands::Languages => cmd_languages(),
        Commands::Tags { language } => cmd_tags(&language)?,
        Commands::Inspect {
            file,
            language,
            json,
        } => cmd_inspect(&file, &language, json)?,
    }

    Ok(())
}

async fn cmd_config(config_path: &Path, show: bool) -> Result<()> {
    let config = load_config(config_path).await?;
    if show {
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

fn cmd_languages() {
    for language in Language::ALL {
        let name = if language.name().is_empty() {
            "(neutral)"
        } else {
            language.name()
        };
        println!(
            "{name:<12} {} closed-class tags",
            language.closed_class_preset().len()
        );
    }
}

fn cmd_tags(language: &str) -> Result<()> {
    let language: Language = language
        .parse()
        .with_context(|| format!("no preset for language {language:?}"))?;
    for tag in language.closed_class_preset() {
        println!("{tag}");
    }
    Ok(())
}

fn cmd_inspect(file: &Path, language: &str, json: bool) -> Result<()> {
    let language: Language = language
        .parse()
        .with_context(|| format!("no preset for language {language:?}"))?;

    let mut reader = BufReader::new(
        File::open(file).with_context(|| format!("failed to open '{}'", file.display()))?,
    );
    let vocabulary = TagVocabulary::read_from(&mut reader, language)
        .with_context(|| format!("failed to read vocabulary from '{}'", file.display()))?;
    info!(tags = vocabulary.len(), "inspecting vocabulary");

    let summary = vocabulary.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{:<6} {:<12} class", "id", "tag");
        for tag in &summary.tags {
            let class = if tag.closed { "closed" } else { "open" };
            println!("{:<6} {:<12} {class}", tag.id, tag.tag);
        }
        println!("{} tags total", summary.size);
    }
    Ok(())
}

async fn load_config(path: &Path) -> Result<maxtag_config::TaggerConfig> {
    if path.exists() {
        maxtag_config::TaggerConfig::load(path)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(maxtag_config::TaggerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_load_config_defaults_when_missing() {
        let config = load_config(Path::new("/nonexistent/maxtag.toml"))
            .await
            .unwrap();
        assert_eq!(config.tags.language, "");
    }

    #[tokio::test]
    async fn test_load_config_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("maxtag.toml");
        tokio::fs::write(&path, "[tags]\nlanguage = \"french\"\n")
            .await
            .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.tags.language, "french");
    }

    #[test]
    fn test_parse_inspect_flags() {
        let cli = Cli::parse_from([
            "maxtag", "inspect", "model.tags", "--language", "english", "--json",
        ]);
        match cli.command {
            Commands::Inspect {
                file,
                language,
                json,
            } => {
                assert_eq!(file, PathBuf::from("model.tags"));
                assert_eq!(language, "english");
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }
}
