//! HealthBuddy - Main CLI Entry Point

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::warn;

use healthbuddy::{
    advice::{generate_advice, AdviceSeverity, HealthAdvice},
    cli::{Args, Commands, Config, Verbosity},
    doctor::Doctor,
    engine::InferenceEngine,
    logging,
    persistence::{PredictionRecorder, SqlitePredictionStore},
    types::PredictionResult,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    logging::init(&logging::level_for(&config.logging.level, args.verbose, args.quiet));

    match &args.command {
        Commands::Predict { symptoms, user, json } => {
            run_predict(&config, args.verbosity(), symptoms, *user, *json).await?;
        }
        Commands::Advice { severity, symptoms, json } => {
            run_advice(severity, symptoms, *json)?;
        }
        Commands::History { user, limit } => {
            show_history(&config, *user, *limit)?;
        }
        Commands::Doctor => {
            let report = Doctor::run(&config);
            report.display();
            if !report.healthy() {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

async fn run_predict(
    config: &Config,
    verbosity: Verbosity,
    symptoms: &[String],
    user: i64,
    json: bool,
) -> Result<()> {
    let engine = InferenceEngine::load(config);

    let recorder = if config.storage.record_predictions {
        match SqlitePredictionStore::open(&config.database_path()) {
            Ok(store) => Some(Arc::new(PredictionRecorder::spawn(Arc::new(store)))),
            Err(e) => {
                warn!(error = %e, "prediction history unavailable");
                None
            }
        }
    } else {
        None
    };

    let engine = match &recorder {
        Some(recorder) => engine.with_sink(recorder.clone()),
        None => engine,
    };

    let result = engine.infer(user, symptoms).context("Prediction failed")?;
    drop(engine);

    if let Some(recorder) = recorder {
        match Arc::try_unwrap(recorder) {
            Ok(recorder) => {
                recorder.shutdown().await;
            }
            Err(_) => warn!("prediction recorder still shared, pending records dropped"),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_prediction(&result, verbosity);
    }

    Ok(())
}

fn display_prediction(result: &PredictionResult, verbosity: Verbosity) {
    println!(
        "\n{} {} ({:.0}% confidence)",
        "Predicted condition:".bold(),
        result.condition.green().bold(),
        result.confidence * 100.0
    );
    println!("\n{}", result.description);

    if !result.precautions.is_empty() {
        println!("\n{}", "Precautions:".bold());
        for precaution in &result.precautions {
            println!("  - {}", precaution);
        }
    }

    if verbosity.show_details() {
        let symptoms: Vec<&str> = result.top_symptoms.iter().map(|s| s.symptom.as_str()).collect();
        println!("\n{} {}", "Symptoms:".dimmed(), symptoms.join(", "));
        println!("{} {}", "Answered by:".dimmed(), result.tier);
    }
    println!();
}

fn run_advice(severity: &str, symptoms: &[String], json: bool) -> Result<()> {
    let severity: AdviceSeverity = severity.parse()?;
    let advice = generate_advice(symptoms, severity)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        display_advice(&advice);
    }
    Ok(())
}

fn display_advice(advice: &HealthAdvice) {
    let section = |title: &str, lines: &[String]| {
        if lines.is_empty() {
            return;
        }
        println!("\n{}", title.bold());
        for line in lines {
            println!("  - {}", line);
        }
    };

    println!("\n{} {}", "Severity:".bold(), advice.severity.to_string().yellow());
    section("Immediate actions", &advice.immediate_actions);
    section("Home care", &advice.home_care);
    section("Medical advice", &advice.medical_advice);

    println!("\n{}", "Resources".bold());
    for resource in &advice.resources {
        println!("  {} - {}", resource.title.cyan(), resource.url);
    }
    println!();
}

fn show_history(config: &Config, user: i64, limit: usize) -> Result<()> {
    let path = config.database_path();
    let store = SqlitePredictionStore::open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records = store.recent_for_user(user, limit)?;

    if records.is_empty() {
        println!("No predictions recorded for user {}", user);
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {:<28} {:>4.0}%  {:<18} {}",
            record.predicted_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            record.condition.green(),
            record.confidence * 100.0,
            record.tier.name(),
            record.symptoms.join(", ")
        );
    }
    Ok(())
}
