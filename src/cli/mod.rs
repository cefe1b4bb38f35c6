//! CLI command definitions and handlers

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::DetectorConfig;
use crate::detector::Detector;

/// Glossa - statistical language identification
///
/// Compares a text's character n-gram distribution against
/// precompiled per-language profiles.
#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the per-language profile files
    #[arg(long, global = true, default_value = "profiles")]
    pub profiles: PathBuf,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the language of a text
    Detect {
        /// Text to classify (reads stdin when omitted)
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Maximum number of candidates to report
        #[arg(long)]
        max: Option<usize>,

        /// Report every language regardless of the probability threshold
        #[arg(long)]
        all: bool,
    },

    /// List the languages the loaded profiles cover
    Langs,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    match cli.command {
        Commands::Detect {
            text,
            file,
            format,
            max,
            all,
        } => {
            if max.is_some() {
                config.max = max;
            }
            if all {
                config.prob_threshold = -1.0;
            }
            let detector = Detector::from_profiles_dir(&cli.profiles, config)?;
            let text = read_input(text, file)?;
            let languages = detector.detect_all(&text);
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&languages)?),
                _ => {
                    if languages.is_empty() {
                        println!("no language detected");
                    } else {
                        for language in &languages {
                            println!("{language}");
                        }
                    }
                }
            }
        }

        Commands::Langs => {
            let detector = Detector::from_profiles_dir(&cli.profiles, config)?;
            for code in detector.languages() {
                println!("{code}");
            }
        }
    }

    Ok(())
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}
