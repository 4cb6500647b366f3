//! Command-line argument parsing for HealthBuddy
//!
//! Provides clap-based CLI with subcommands, config overrides and
//! verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::config::Config;

/// HealthBuddy - Symptom-based condition prediction with tiered fallback
#[derive(Parser, Debug)]
#[command(name = "healthbuddy")]
#[command(version)]
#[command(about = "Predict a likely condition from reported symptoms", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference data directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Trained model artifact directory
    #[arg(long, global = true)]
    pub model_dir: Option<String>,

    /// Skip the trained model tier
    #[arg(long, global = true)]
    pub no_model: bool,

    /// Prediction history database
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Do not record predictions
    #[arg(long, global = true)]
    pub no_record: bool,

    /// Verbosity level: -v (debug), -vv (trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Predict the most likely condition for a set of symptoms
    Predict {
        /// Symptom identifiers, e.g. skin_rash itching (or comma separated)
        #[arg(required = true, value_delimiter = ',')]
        symptoms: Vec<String>,

        /// User the prediction is recorded for
        #[arg(short, long, default_value_t = 0)]
        user: i64,

        /// Print the JSON response
        #[arg(long)]
        json: bool,
    },

    /// Self-care advice for symptoms at a given severity
    Advice {
        /// mild, moderate or severe
        #[arg(short, long, value_parser = ["mild", "moderate", "severe"])]
        severity: String,

        /// Symptom identifiers
        #[arg(required = true, value_delimiter = ',')]
        symptoms: Vec<String>,

        /// Print the JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show recorded predictions for a user
    History {
        #[arg(short, long)]
        user: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Run system diagnostics
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    /// Check if should show per-tier details in the summary
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
        }
        if let Some(dir) = &self.model_dir {
            config.model.dir = dir.clone();
        }
        if self.no_model {
            config.model.enabled = false;
        }
        if let Some(db) = &self.database {
            config.storage.database = db.clone();
        }
        if self.no_record {
            config.storage.record_predictions = false;
        }
    }
}
