use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cycle_engine::algorithms::PhaseEvidence;
use cycle_engine::db::{services, RepositoryConfig, RepositoryFactory};
use cycle_engine::models::{Severity, SymptomObservation};
use cycle_engine::parsing::parse_history_json;

/// Estimate the menstrual cycle phase for a date
#[derive(Parser, Debug)]
#[command(
    name = "cycle-forecast",
    version,
    about = "Estimate the menstrual cycle phase for a date",
    long_about = "Loads a cycle history, stores it through the configured repository and \
                  prints phase probabilities, the next expected period and cycle regularity \
                  as JSON.\n\n\
                  Examples:\n  \
                  cycle-forecast --history history.json --date 2024-03-15\n  \
                  cycle-forecast --date 2024-03-15 --symptom cramps:pain:2 --lh-positive"
)]
struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "History JSON file; when omitted the stored history is used"
    )]
    history: Option<PathBuf>,

    #[arg(
        short = 'd',
        long,
        value_name = "YYYY-MM-DD",
        help = "Target date (defaults to today)"
    )]
    date: Option<NaiveDate>,

    #[arg(
        short = 's',
        long = "symptom",
        value_name = "NAME:CATEGORY:SEVERITY",
        value_parser = parse_symptom_arg,
        help = "Symptom observed on the target date (repeatable)"
    )]
    symptoms: Vec<SymptomArg>,

    #[arg(long, value_name = "CELSIUS", help = "Basal body temperature on the target date")]
    basal_temp: Option<f64>,

    #[arg(long, conflicts_with = "lh_negative", help = "LH test was positive")]
    lh_positive: bool,

    #[arg(long, help = "LH test was negative")]
    lh_negative: bool,

    #[arg(short = 'c', long, value_name = "FILE", help = "Path to forecast.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Pretty-print the JSON output")]
    pretty: bool,
}

#[derive(Debug, Clone)]
struct SymptomArg {
    name: String,
    category: String,
    severity: Severity,
}

fn parse_symptom_arg(s: &str) -> Result<SymptomArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [name, category, severity] = parts.as_slice() else {
        return Err(format!("expected NAME:CATEGORY:SEVERITY, got '{}'", s));
    };

    if name.trim().is_empty() {
        return Err("symptom name must not be empty".to_string());
    }
    let severity = severity
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid severity '{}': {}", severity, e))
        .and_then(Severity::try_from)?;

    Ok(SymptomArg {
        name: name.trim().to_string(),
        category: category.trim().to_string(),
        severity,
    })
}

impl CliArgs {
    fn lh_test(&self) -> Option<bool> {
        match (self.lh_positive, self.lh_negative) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    fn evidence(&self, target: NaiveDate) -> PhaseEvidence {
        let symptoms = (!self.symptoms.is_empty()).then(|| {
            self.symptoms
                .iter()
                .map(|s| SymptomObservation::new(&s.name, &s.category, s.severity, target))
                .collect()
        });

        PhaseEvidence {
            symptoms,
            basal_temp: self.basal_temp,
            lh_test_positive: self.lh_test(),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RepositoryConfig> {
    match path {
        Some(path) => RepositoryConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(RepositoryConfig::from_default_location().unwrap_or_else(|e| {
            info!("{}; using in-memory defaults", e);
            RepositoryConfig::default()
        })),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = CliArgs::parse();
    let target = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let config = load_config(args.config.as_ref())?;
    let repo = RepositoryFactory::create(&config)
        .await
        .context("Failed to create repository")?;
    let key = config.history.key.as_str();

    if let Some(path) = &args.history {
        let records = parse_history_json(path)?;
        info!("Loaded {} records from {}", records.len(), path.display());
        services::store_history(repo.as_ref(), key, &records).await?;
    } else {
        warn!("No --history given; forecasting from stored history '{}'", key);
    }

    let report = services::forecast(repo.as_ref(), key, target, &args.evidence(target)).await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}
