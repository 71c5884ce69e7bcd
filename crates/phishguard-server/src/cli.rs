use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "phishguard")]
#[command(
    author,
    version,
    about = "Hybrid phishing detection: statistical classifier plus explainable rules"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "phishguard.yaml")]
    pub config: PathBuf,

    /// JSON model file (overrides model_path)
    #[arg(short, long, global = true, env = "PHISHGUARD_MODEL")]
    pub model: Option<PathBuf>,

    /// YAML rule set (overrides rules_path)
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one message (reads stdin when TEXT is omitted)
    Analyze {
        /// Message text
        text: Option<String>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare classifier-only and hybrid results on a labeled JSON Lines file
    Evaluate {
        /// File with one {"message": ..., "label": "ham"|"spam"} object per line
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP service
    Serve {
        /// Listen address
        #[arg(short = 'l', long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// CLI values that take precedence over file and environment settings
    pub fn overrides(&self) -> Overrides {
        let (listen, port) = match &self.command {
            Commands::Serve { listen, port } => (listen.clone(), *port),
            _ => (None, None),
        };

        Overrides {
            model_path: self.model.clone(),
            rules_path: self.rules.clone(),
            listen,
            port,
        }
    }
}
