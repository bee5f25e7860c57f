use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use liftlog::api::{ErrorResponse, SearchRequest, SuggestRequest};
use liftlog::logging::init_logging;
use liftlog::parser::render_sets;
use liftlog::recovery::RecoveryStatus;
use liftlog::{AppConfig, Engine, ExerciseMappingTable, LiftLogError, MuscleGroupResolver};

/// liftlog - workout log analytics
///
/// Reads a freeform workout journal and reports muscle group recovery,
/// strength trends, plateaus and progressive overload suggestions.
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(version)]
#[command(about = "Workout log analytics and progressive overload suggestions", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Workout journal to read instead of the configured one
    #[arg(short, long, value_name = "FILE", global = true)]
    journal: Option<PathBuf>,

    /// Evaluate as of this date instead of today
    #[arg(long, value_name = "YYYY-MM-DD", global = true)]
    today: Option<NaiveDate>,

    /// Print JSON responses
    #[arg(long, global = true)]
    json: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse workout text and show how each line was understood
    Parse {
        /// Workout text, one exercise per line
        text: String,
    },

    /// Suggest next loads for a planned workout ("-" reads stdin)
    Suggest { text: String },

    /// Show recovery status per muscle group
    Recovery,

    /// Build a workout for the most neglected muscle groups
    Neglected,

    /// Strength trends, consistency, plateaus and muscle balance
    Analytics {
        /// Ask the advisory service to narrate each insight
        #[arg(long)]
        narrate: bool,
    },

    /// Search the journal
    Search { query: String },

    /// Generate a theme for the entry at a position in the journal
    Theme {
        position: usize,

        /// Store the theme in the journal (JSON journals only)
        #[arg(long)]
        save: bool,
    },

    /// List lines that could not be parsed and exercises with no mapping
    Diagnose {
        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or create the configuration file
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<LiftLogError>() {
            Some(err) if json => {
                let body = ErrorResponse::from(err);
                println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
            }
            Some(err) => eprintln!("{} {}", "Error:".red().bold(), err.user_message()),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };
    if let Some(journal) = cli.journal {
        config.journal = journal;
    }
    config.logging.level = config.logging.level.raised_by(cli.verbose);
    init_logging(&config.logging)?;

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let json = cli.json;

    match cli.command {
        Commands::Config { show, init } => cmd_config(config, cli.config, show, init),
        Commands::Parse { text } => cmd_parse(&config, &text, json),
        command => {
            let engine = Engine::new(config)?;
            let mut log = engine.load_journal()?;

            match command {
                Commands::Suggest { text } => {
                    let workout = if text == "-" {
                        let mut buffer = String::new();
                        std::io::stdin()
                            .read_to_string(&mut buffer)
                            .context("Failed to read workout from stdin")?;
                        buffer
                    } else {
                        text
                    };
                    let response = engine.suggest(&SuggestRequest { workout }, log.entries(), today)?;
                    if json {
                        return print_json(&response);
                    }
                    print_suggestions(&response.suggestions);
                }
                Commands::Recovery => {
                    let response = engine.recovery(log.entries(), today);
                    if json {
                        return print_json(&response);
                    }
                    println!("{}", response.recovery_status.bold());
                    print_recovery(&response.groups);
                }
                Commands::Neglected => {
                    let response = engine.neglected_workout(log.entries(), today);
                    if json {
                        return print_json(&response);
                    }
                    match (&response.workout, &response.target_group) {
                        (Some(workout), Some(group)) => {
                            println!("{} {}", "Focus:".cyan().bold(), group);
                            println!("{}", workout);
                        }
                        _ => println!("{}", response.message.unwrap_or_default().yellow()),
                    }
                }
                Commands::Analytics { narrate } => {
                    let response = engine.analytics(log.entries(), today, narrate);
                    if json {
                        return print_json(&response);
                    }
                    print_analytics(&response);
                }
                Commands::Search { query } => {
                    let response = engine.search(&SearchRequest { query }, log.entries());
                    if json {
                        return print_json(&response);
                    }
                    if let Some(notice) = &response.advisory_notice {
                        eprintln!("{}", notice.yellow());
                    }
                    if response.workout_indices.is_empty() {
                        println!("{}", "No matching workouts".dimmed());
                    }
                    for &position in &response.workout_indices {
                        if let Some(entry) = log.entries().get(position) {
                            let first_line = entry.text.lines().next().unwrap_or_default();
                            println!("[{}] {}  {}", position, entry.date.to_string().cyan(), first_line);
                        }
                    }
                }
                Commands::Theme { position, save } => {
                    let entry = log
                        .entries()
                        .get(position)
                        .cloned()
                        .ok_or_else(|| LiftLogError::Validation(format!("no entry at position {}", position)))?;
                    let response = engine.theme_response(&entry);
                    if save {
                        if let Some(theme) = &response.theme {
                            save_theme(&engine, &mut log, &entry, theme)?;
                        }
                    }
                    if json {
                        return print_json(&response);
                    }
                    match (&response.theme, &response.message) {
                        (Some(theme), _) => println!("{}", theme.green().bold()),
                        (None, Some(message)) => println!("{}", message.yellow()),
                        (None, None) => {}
                    }
                }
                Commands::Diagnose { output } => {
                    let report = engine.diagnostics(log.entries());
                    if let Some(path) = output {
                        report.save_to_file(&path)?;
                    }
                    if json {
                        return print_json(&report);
                    }
                    if report.is_clean() {
                        println!("{}", "✓ Every line parsed and every exercise is mapped".green());
                    }
                    for line in &report.skipped_lines {
                        println!(
                            "{} {} line {}: {} ({})",
                            "skipped".yellow(),
                            line.date,
                            line.line,
                            line.text,
                            line.reason
                        );
                    }
                    for name in &report.unmatched_exercises {
                        println!("{} {}", "unmapped".yellow(), name);
                    }
                    for warning in &report.warnings {
                        println!("{} {}", "warning".red(), warning);
                    }
                }
                Commands::Config { .. } | Commands::Parse { .. } => {}
            }
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_config(mut config: AppConfig, path: Option<PathBuf>, show: bool, init: bool) -> Result<()> {
    let path = path.unwrap_or_else(AppConfig::default_config_path);
    if init {
        if path.exists() {
            println!("{} {}", "Config already exists:".yellow(), path.display());
        } else {
            config.save_to_file(&path)?;
            println!("{} {}", "✓ Wrote default config to".green(), path.display());
        }
    }
    if show || !init {
        println!("{}", toml::to_string_pretty(&config).context("Failed to render configuration")?);
    }
    Ok(())
}

fn cmd_parse(config: &AppConfig, text: &str, json: bool) -> Result<()> {
    let table = match &config.mapping {
        Some(path) => ExerciseMappingTable::load_from_file(path).map_err(LiftLogError::from)?,
        None => ExerciseMappingTable::builtin(),
    };
    let resolver = MuscleGroupResolver::new(std::sync::Arc::new(table));
    let parsed = liftlog::parse_workout_text(text);

    if json {
        let exercises: Vec<_> = parsed
            .exercises
            .iter()
            .map(|p| {
                serde_json::json!({
                    "performance": p,
                    "exercise": resolver.resolve(&p.exercise_name),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "exercises": exercises,
            "cardio": parsed.cardio,
            "skipped": parsed.skipped,
        }));
    }

    #[derive(Tabled)]
    struct ParsedRow {
        #[tabled(rename = "Exercise")]
        exercise: String,
        #[tabled(rename = "Sets")]
        sets: String,
        #[tabled(rename = "Muscle groups")]
        groups: String,
    }

    let rows: Vec<ParsedRow> = parsed
        .exercises
        .iter()
        .map(|p| {
            let exercise = resolver.resolve(&p.exercise_name);
            ParsedRow {
                exercise: exercise.canonical_name,
                sets: render_sets(&p.sets),
                groups: if exercise.unmatched {
                    "(unmapped)".to_string()
                } else {
                    exercise.muscle_groups.into_iter().collect::<Vec<_>>().join(", ")
                },
            }
        })
        .collect();
    if !rows.is_empty() {
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    for cardio in &parsed.cardio {
        println!("{} {}", "cardio".cyan(), cardio.text);
    }
    for skipped in &parsed.skipped {
        println!("{} line {}: {} ({})", "skipped".yellow(), skipped.line, skipped.text, skipped.reason);
    }
    Ok(())
}

fn save_theme(
    engine: &Engine,
    log: &mut liftlog::WorkoutLog,
    entry: &liftlog::WorkoutEntry,
    theme: &str,
) -> Result<()> {
    let journal = &engine.config().journal;
    if !liftlog::WorkoutLog::keeps_metadata(journal) {
        eprintln!("{}", "Themes are only stored in JSON journals".yellow());
        return Ok(());
    }
    log.set_theme(entry.id, Some(theme.to_string()))
        .map_err(LiftLogError::from)?;
    log.save(journal)?;
    Ok(())
}

fn print_suggestions(suggestions: &[liftlog::OverloadSuggestion]) {
    if suggestions.is_empty() {
        println!("{}", "No previously logged exercises in this workout".dimmed());
        return;
    }

    #[derive(Tabled)]
    struct SuggestionRow {
        #[tabled(rename = "Exercise")]
        exercise: String,
        #[tabled(rename = "Last")]
        last: String,
        #[tabled(rename = "Suggested")]
        suggested: String,
        #[tabled(rename = "Why")]
        reason: String,
        #[tabled(rename = "Last done")]
        last_done: String,
    }

    let rows: Vec<SuggestionRow> = suggestions
        .iter()
        .map(|s| SuggestionRow {
            exercise: s.exercise.clone(),
            last: s.last_performance.clone(),
            suggested: s.suggested.clone(),
            reason: s.reason.clone(),
            last_done: s.last_done.clone(),
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));
}

fn print_recovery(groups: &[liftlog::recovery::MuscleGroupStatus]) {
    #[derive(Tabled)]
    struct RecoveryRow {
        #[tabled(rename = "Group")]
        group: String,
        #[tabled(rename = "Last trained")]
        last_trained: String,
        #[tabled(rename = "Days")]
        days: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<RecoveryRow> = groups
        .iter()
        .map(|s| RecoveryRow {
            group: s.group.clone(),
            last_trained: s.last_trained_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            days: s.days_since.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            status: s.status.to_string(),
        })
        .collect();
    if !rows.is_empty() {
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }

    let neglected: Vec<&str> = groups
        .iter()
        .filter(|s| s.status == RecoveryStatus::Neglected)
        .map(|s| s.group.as_str())
        .collect();
    if !neglected.is_empty() {
        println!("{} {}", "Neglected:".red().bold(), neglected.join(", "));
    }
}

fn print_analytics(response: &liftlog::api::AnalyticsResponse) {
    let analytics = &response.analytics;
    for (report, insight) in analytics.insights() {
        let text = response.narrative.get(report).map(String::as_str).unwrap_or(insight);
        println!("{} {}", format!("{}:", report.replace('_', " ")).cyan().bold(), text);
    }
    if let Some(notice) = &response.advisory_notice {
        eprintln!("{}", notice.yellow());
    }

    if !analytics.strength_trends.exercises.is_empty() {
        #[derive(Tabled)]
        struct TrendRow {
            #[tabled(rename = "Exercise")]
            exercise: String,
            #[tabled(rename = "From")]
            earliest: String,
            #[tabled(rename = "To")]
            latest: String,
            #[tabled(rename = "Change")]
            change: String,
        }

        let rows: Vec<TrendRow> = analytics
            .strength_trends
            .exercises
            .iter()
            .map(|t| TrendRow {
                exercise: t.exercise.clone(),
                earliest: t.earliest.clone(),
                latest: t.latest.clone(),
                change: match t.percent {
                    Some(p) => format!("{:+} {} ({:+.1}%)", t.improvement, t.unit, p),
                    None => format!("{:+} {}", t.improvement, t.unit),
                },
            })
            .collect();
        println!("\n{}", Table::new(&rows).with(Style::rounded()));
    }

    for plateau in &analytics.plateaus.exercises {
        println!(
            "{} {} at {} for {} weeks",
            "plateau".yellow(),
            plateau.exercise,
            plateau.current,
            plateau.weeks_stagnant
        );
    }
    for group in &analytics.muscle_balance.imbalances {
        println!(
            "{} {} {}x ({:.0}% of max)",
            "imbalance".yellow(),
            group.group,
            group.count,
            group.vs_max
        );
    }
}
