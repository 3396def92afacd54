//! Health Journal CLI
//!
//! Command-line interface for health journal operations:
//! - Log entries
//! - List entries
//! - Analyze patterns, score and insights (remote or on a local file)
//! - Import entries from CSV
//! - Check status

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use health_journal::analysis::{PatternAnalysis, PatternEngine};
use health_journal::api::dto::AnalyzeRequest;
use health_journal::journal::{
    import_csv_file, parse_date, validate_inputs, EntryInput, HealthEntry, SymptomInput,
};
use health_journal::scoring::{HealthScore, HealthScorer, Insight};

#[derive(Parser)]
#[command(name = "health-journal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local symptom journal with deterministic pattern analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

/// Window and source shared by the analysis commands
#[derive(clap::Args)]
pub struct AnalysisArgs {
    /// Time range (e.g., 7d, 30d, 4w, 3m)
    #[arg(short, long, default_value = "30d")]
    last: String,
    /// End of the window (RFC 3339 or YYYY-MM-DD, default: now)
    #[arg(short, long)]
    reference: Option<String>,
    /// Analyze a local JSON or CSV file instead of the server's journal
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a health entry
    Log {
        /// Symptoms as name:severity (e.g., headache:6)
        symptoms: Vec<String>,
        /// Date the symptoms pertain to (default: now). Supports "now", "yesterday", RFC 3339, YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short, long, default_value = "")]
        text: String,
        /// Mood from 1 to 5
        #[arg(short, long)]
        mood: Option<i64>,
        /// Tags
        #[arg(short = 'T', long)]
        tags: Vec<String>,
    },

    /// List entries, newest first
    Entries {
        /// Time range (e.g., 7d, 30d); all entries when omitted
        #[arg(short, long)]
        last: Option<String>,
    },

    /// Detect trends, correlations, patterns and predictions
    Analyze(AnalysisArgs),

    /// Compute the health score
    Score(AnalysisArgs),

    /// Show rule-based insights
    Insights(AnalysisArgs),

    /// Import entries from CSV
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show system status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let json_output = cli.format == "json";

    match cli.command {
        Commands::Log {
            symptoms,
            date,
            text,
            mood,
            tags,
        } => {
            let date = match date.as_deref() {
                None | Some("now") => Utc::now().to_rfc3339(),
                Some("yesterday") => (Utc::now() - chrono::Duration::days(1)).to_rfc3339(),
                Some(s) => s.to_string(),
            };

            let symptoms = symptoms
                .iter()
                .map(|s| parse_symptom(s))
                .collect::<Result<Vec<_>>>()?;

            let input = EntryInput {
                date: Some(date),
                input_text: text,
                symptoms,
                mood: mood.map(Into::into),
                tags,
                ..Default::default()
            };

            let response = client
                .post(format!("{}/api/v1/entries", cli.api_url))
                .json(&input)
                .send()
                .await
                .with_context(|| format!("Cannot connect to API at {}", cli.api_url))?;

            let entry: HealthEntry = read_json(response).await?;
            println!(
                "Logged entry {} ({} symptoms) at {}",
                entry.id,
                entry.symptoms.len(),
                entry.date.format("%Y-%m-%dT%H:%M:%SZ")
            );
        }

        Commands::Entries { last } => {
            let mut url = format!("{}/api/v1/entries", cli.api_url);
            if let Some(last) = last {
                url.push_str(&format!("?days={}", parse_days(&last)?));
            }

            let response = client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Cannot connect to API at {}", cli.api_url))?;
            let data: serde_json::Value = read_json(response).await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let entries: Vec<HealthEntry> = serde_json::from_value(data["entries"].clone())?;
                print_entries(&entries);
            }
        }

        Commands::Analyze(args) => {
            let analysis: PatternAnalysis = match &args.file {
                Some(path) => {
                    let (entries, days, reference) = local_input(path, &args)?;
                    PatternEngine::default().analyze(&entries, days, reference)?
                }
                None => post_analysis(&client, &cli.api_url, "analyze", &args).await?,
            };

            if json_output {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }

        Commands::Score(args) => {
            let score: HealthScore = match &args.file {
                Some(path) => {
                    let (entries, days, reference) = local_input(path, &args)?;
                    HealthScorer::default().score(&entries, days, reference)?
                }
                None => post_analysis(&client, &cli.api_url, "score", &args).await?,
            };

            if json_output {
                println!("{}", serde_json::to_string_pretty(&score)?);
            } else {
                print_score(&score);
            }
        }

        Commands::Insights(args) => {
            let insights: Vec<Insight> = match &args.file {
                Some(path) => {
                    let (entries, days, reference) = local_input(path, &args)?;
                    HealthScorer::default().insights(&entries, days, reference)?
                }
                None => post_analysis(&client, &cli.api_url, "insights", &args).await?,
            };

            if json_output {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                print_insights(&insights);
            }
        }

        Commands::Import { path, dry_run } => {
            if !path.exists() {
                bail!("File not found: {:?}", path);
            }

            let result = import_csv_file(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);
            println!("  Entries: {}", result.entries.len());

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            // Catch invalid entries before anything is sent
            let entries = validate_inputs(result.entries.clone(), Utc::now())?;

            if dry_run {
                println!();
                println!("(Dry run - no data was imported)");
            } else if !entries.is_empty() {
                println!();
                println!("Importing data...");

                let response = client
                    .post(format!("{}/api/v1/entries/batch", cli.api_url))
                    .json(&serde_json::json!({ "entries": result.entries }))
                    .send()
                    .await
                    .with_context(|| format!("Cannot connect to API at {}", cli.api_url))?;
                let body: serde_json::Value = read_json(response).await?;

                println!("  Imported: {}", body["accepted"].as_u64().unwrap_or(0));
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Health Journal v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Entries: {}", health["entries"].as_u64().unwrap_or(0));
                    println!(
                        "Persistence: {}",
                        if health["persistent"].as_bool().unwrap_or(false) {
                            "on"
                        } else {
                            "off (in memory)"
                        }
                    );

                    if let Some(uptime) = health["uptimeSeconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Cannot connect to health journal API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin health-journal");
                    return Err(e.into());
                }
            }
        }

        Commands::Config { output } => {
            let config = health_journal::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// POST an analysis request for the server's journal
async fn post_analysis<T: DeserializeOwned>(
    client: &reqwest::Client,
    api_url: &str,
    endpoint: &str,
    args: &AnalysisArgs,
) -> Result<T> {
    let request = AnalyzeRequest {
        entries: None,
        timeframe_days: Some(parse_days(&args.last)?),
        reference_time: args.reference.clone(),
    };

    let response = client
        .post(format!("{}/api/v1/{}", api_url, endpoint))
        .json(&request)
        .send()
        .await
        .with_context(|| format!("Cannot connect to API at {}", api_url))?;

    read_json(response).await
}

/// Decode a successful response or turn the error body into an error
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("Request failed ({}): {}", status, text);
    }
    Ok(response.json().await?)
}

/// Entries and window for a local analysis run
fn local_input(
    path: &Path,
    args: &AnalysisArgs,
) -> Result<(Vec<HealthEntry>, i64, chrono::DateTime<Utc>)> {
    let entries = load_entries_file(path)?;
    let days = parse_days(&args.last)?;
    let reference = match args.reference.as_deref() {
        Some(raw) => match parse_date(raw) {
            Some(at) => at,
            None => bail!("Invalid reference time: {}", raw),
        },
        None => Utc::now(),
    };
    Ok((entries, days, reference))
}

/// Load entries from a JSON array or a CSV file
fn load_entries_file(path: &Path) -> Result<Vec<HealthEntry>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let inputs: Vec<EntryInput> = if is_csv {
        let result = import_csv_file(path)?;
        if result.rows_failed > 0 {
            eprintln!("Skipped {} malformed CSV rows", result.rows_failed);
        }
        result.entries
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{:?} is not a JSON array of entries", path))?
    };

    Ok(validate_inputs(inputs, Utc::now())?)
}

/// Parse `name:severity`
fn parse_symptom(raw: &str) -> Result<SymptomInput> {
    let (name, severity) = match raw.rsplit_once(':') {
        Some(parts) => parts,
        None => bail!("Invalid symptom '{}'. Use name:severity, e.g. headache:6", raw),
    };
    let severity: i64 = severity
        .trim()
        .parse()
        .with_context(|| format!("Invalid severity in '{}'", raw))?;

    Ok(SymptomInput::new(name.trim(), severity))
}

/// Parse a time range into whole days
fn parse_days(s: &str) -> Result<i64> {
    let s = s.trim().to_lowercase();

    if let Some(days) = s.strip_suffix('d') {
        Ok(days.parse()?)
    } else if let Some(weeks) = s.strip_suffix('w') {
        Ok(weeks.parse::<i64>()? * 7)
    } else if let Some(months) = s.strip_suffix('m') {
        Ok(months.parse::<i64>()? * 30)
    } else if let Some(years) = s.strip_suffix('y') {
        Ok(years.parse::<i64>()? * 365)
    } else {
        bail!("Invalid duration format: {}. Use: 7d, 4w, 3m, 1y", s)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_entries(entries: &[HealthEntry]) {
    if entries.is_empty() {
        println!("No entries yet.");
        println!();
        println!("Log your first entry with:");
        println!("  health-journal log headache:5 --text \"after lunch\"");
        return;
    }

    println!("{:<12} {:<38} {:<5} {}", "Date", "ID", "Mood", "Symptoms");
    println!("{}", "-".repeat(80));

    for entry in entries {
        let symptoms = entry
            .symptoms
            .iter()
            .map(|s| format!("{}:{}", s.name, s.severity))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<12} {:<38} {:<5} {}",
            entry.date.format("%Y-%m-%d"),
            entry.id,
            entry.mood.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
            symptoms
        );
    }
}

fn print_analysis(analysis: &PatternAnalysis) {
    println!("{}", analysis.summary);

    if !analysis.trends.is_empty() {
        println!();
        println!("{:<20} {:<11} {:>8} {:<7} {:>6}", "Trend", "Direction", "Rate", "Signif", "Points");
        println!("{}", "-".repeat(56));
        for t in &analysis.trends {
            println!(
                "{:<20} {:<11} {:>+8.3} {:<7} {:>6}",
                t.symptom, t.direction, t.rate, t.significance, t.data_points
            );
        }
    }

    if !analysis.correlations.is_empty() {
        println!();
        println!("{:<20} {:<20} {:>7} {:>6} {:<7}", "Symptom A", "Symptom B", "r", "n", "Signif");
        println!("{}", "-".repeat(64));
        for c in &analysis.correlations {
            println!(
                "{:<20} {:<20} {:>+7.3} {:>6} {:<7}",
                c.symptom_a, c.symptom_b, c.coefficient, c.sample_size, c.significance
            );
        }
    }

    if !analysis.patterns.is_empty() {
        println!();
        println!("Patterns:");
        for p in &analysis.patterns {
            println!("  - {}", p.description);
        }
    }

    if !analysis.predictions.is_empty() {
        println!();
        println!("Predictions:");
        for p in &analysis.predictions {
            println!(
                "  - {}: {} within {} days (confidence {:.2})",
                p.symptom, p.likelihood, p.timeframe_days, p.confidence
            );
        }
    }
}

fn print_score(score: &HealthScore) {
    println!("Health score: {:.0} ({:?})", score.overall, score.trend);

    if !score.factors.is_empty() {
        println!();
        println!("{:<18} {:>6} {:>7} {:<7}", "Factor", "Score", "Weight", "Trend");
        println!("{}", "-".repeat(42));
        for f in &score.factors {
            println!("{:<18} {:>6.1} {:>7.1} {:?}", f.name, f.score, f.weight, f.trend);
        }
    }
}

fn print_insights(insights: &[Insight]) {
    for insight in insights {
        println!("[{:?}] {}", insight.severity, insight.title);
        println!("    {}", insight.description);
        if let Some(recommendation) = &insight.recommendation {
            println!("    -> {}", recommendation);
        }
    }
}
