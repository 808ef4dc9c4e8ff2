use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Track users and the calories they burn exercising", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered users
    Users,

    /// List the exercises that can be logged and what each one needs
    Exercises,

    /// Register a new user
    NewUser {
        name: String,

        /// Body weight in kilograms
        #[arg(long, allow_negative_numbers = true)]
        weight: f64,
    },

    /// Show a user's weight and activity history
    Show { name: String },

    /// Estimate calories for an exercise and add it to the user's history
    Log {
        name: String,

        /// Exercise name (see `fitlog exercises`)
        exercise: String,

        /// Duration in seconds
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<f64>,

        /// Distance covered (running)
        #[arg(long, allow_negative_numbers = true)]
        distance: Option<f64>,

        /// Repetition count
        #[arg(long, allow_negative_numbers = true)]
        count: Option<f64>,

        /// Dry run - show the estimate without logging
        #[arg(long)]
        dry_run: bool,
    },

    /// Update a user's body weight
    Weight {
        name: String,

        /// New body weight in kilograms
        #[arg(allow_negative_numbers = true)]
        weight: f64,
    },

    /// Export a user's activity history to CSV
    Export {
        name: String,

        /// Output file (defaults to <data-dir>/<name>_history.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Only warnings by default; RUST_LOG still overrides
    fitlog_core::logging::init_with_level("warn");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let users_path = config.users_path();
    tracing::debug!("Using users file {:?}", users_path);

    let mut registry = UserRegistry::open(JsonFileStore::new(users_path));

    match cli.command {
        Commands::Users => cmd_users(&registry),
        Commands::Exercises => cmd_exercises(),
        Commands::NewUser { name, weight } => {
            let user = registry.create_user(&name, weight)?;
            println!("✓ Created user {} ({} kg)", user.identifier(), user.body_weight());
            Ok(())
        }
        Commands::Show { name } => cmd_show(registry.find_user(&name)?),
        Commands::Log {
            name,
            exercise,
            duration,
            distance,
            count,
            dry_run,
        } => {
            let inputs = ExerciseInputs {
                duration_secs: duration,
                distance,
                count,
            };
            cmd_log(&mut registry, &config, &name, &exercise, &inputs, dry_run)
        }
        Commands::Weight { name, weight } => {
            let change = registry.change_weight(&name, weight)?;
            println!("✓ Weight updated to {} kg", change.current);
            println!("  {}", weight_message(&change));
            Ok(())
        }
        Commands::Export { name, out } => {
            let user = registry.find_user(&name)?;
            let csv_path =
                out.unwrap_or_else(|| default_export_path(&config.data.data_dir, &name));
            let count = export_history(user, &csv_path)?;
            println!("✓ Exported {} activities", count);
            println!("  CSV: {}", csv_path.display());
            Ok(())
        }
    }
}

/// `<data_dir>/<name>_history.csv`, with path separators in `name` replaced
/// so the file always lands directly inside `data_dir`
fn default_export_path(data_dir: &Path, name: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if std::path::is_separator(c) { '_' } else { c })
        .collect();
    data_dir.join(format!("{}_history.csv", stem))
}

fn cmd_users(registry: &UserRegistry) -> Result<()> {
    if registry.is_empty() {
        println!("No users yet - create one with `fitlog new-user`.");
        return Ok(());
    }

    for identifier in registry.list_identifiers() {
        println!("{}", identifier);
    }
    Ok(())
}

fn cmd_exercises() -> Result<()> {
    for kind in ExerciseKind::ALL {
        let needs = match kind.input_class() {
            InputClass::Duration => "--duration",
            InputClass::DistanceDuration => "--duration --distance",
            InputClass::Repetitions => "--count",
        };
        println!("  {:<10} {}", kind, needs);
    }
    Ok(())
}

fn cmd_show(user: &UserRecord) -> Result<()> {
    println!("\n  {}", user.identifier());
    println!("  Weight: {} kg", user.body_weight());
    println!();

    if user.history().is_empty() {
        println!("  No activities logged yet.");
    } else {
        for activity in user.history() {
            println!(
                "  {}  {:<10} {:>8.0} kcal",
                activity.date(),
                activity.kind(),
                activity.energy_kcal()
            );
        }
        println!();
        println!("  Total: {:.0} kcal", user.total_energy());
    }

    println!();
    Ok(())
}

fn cmd_log(
    registry: &mut UserRegistry,
    config: &Config,
    name: &str,
    exercise: &str,
    inputs: &ExerciseInputs,
    dry_run: bool,
) -> Result<()> {
    let kind: ExerciseKind = exercise.parse()?;
    let weight = registry.find_user(name)?.body_weight();
    let energy = config.coefficients.estimate(kind, weight, inputs)?;

    if dry_run {
        println!("{} would burn about {:.0} kcal", kind, energy);
        println!("\n[Dry run - not logging activity]");
        return Ok(());
    }

    registry.record(name, kind, energy)?;
    println!("✓ Logged {}: {:.0} kcal burned", kind, energy);
    Ok(())
}

fn weight_message(change: &WeightChange) -> &'static str {
    let difference = change.difference();
    if difference < 0.0 {
        "Nice work - you're lighter than last time!"
    } else if difference > 0.0 {
        "You're up a little since last time. Keep logging those workouts!"
    } else {
        "Holding steady."
    }
}

/// User-facing message for each kind of failure
fn describe_error(error: &Error) -> String {
    match error {
        Error::DuplicateIdentifier(name) => {
            format!("The username '{}' is already taken. Pick another one.", name)
        }
        Error::InvalidWeight(weight) => {
            format!("Weight must be greater than zero (got {}).", weight)
        }
        Error::NotFound(name) => {
            format!(
                "No user named '{}'. Run `fitlog users` to see who is registered.",
                name
            )
        }
        Error::UnknownExercise(name) => {
            format!(
                "Unknown exercise '{}'. Run `fitlog exercises` for the list.",
                name
            )
        }
        Error::MissingInput { kind, field } => {
            format!("Logging {} needs a {}: pass --{} <value>.", kind, field, field)
        }
        Error::InvalidInput { kind, field } => {
            format!("The {} for {} must be a non-negative number.", field, kind)
        }
        other => format!("Error: {}", other),
    }
}
