use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use std::fmt;

use setbook::Logbook;
use setbook::catalog::{SeedOutcome, TaxonomyKind};
use setbook::db::models::{NewSet, NewUser, WorkoutOrder};
use setbook::logging;

#[derive(Parser, Debug)]
#[command(version, about = "Setbook - workout log and exercise catalog", long_about = None)]
struct Args {
    /// SQLite database file. Falls back to DATABASE_URL.
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Created,
    Due,
    Name,
}

impl From<OrderArg> for WorkoutOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Created => WorkoutOrder::CreatedAt,
            OrderArg::Due => WorkoutOrder::DueDate,
            OrderArg::Name => WorkoutOrder::Name,
        }
    }
}

impl fmt::Display for OrderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderArg::Created => write!(f, "created"),
            OrderArg::Due => write!(f, "due"),
            OrderArg::Name => write!(f, "name"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the exercise catalog (no-op when already present)
    Seed {
        /// Wipe every table before seeding
        #[arg(long)]
        reset: bool,
    },
    /// List catalog exercises, or show one in detail
    Exercises { name: Option<String> },
    /// List categories, muscles or equipment
    Taxonomy {
        #[arg(value_parser = parse_kind)]
        kind: TaxonomyKind,
    },
    AddUser {
        first_name: String,
        last_name: String,
        /// Credential hash produced by the auth layer
        #[arg(long)]
        password_hash: String,
    },
    NewWorkout {
        #[arg(short, long)]
        user: String,
        name: String,
        /// RFC 3339 timestamp or YYYY-MM-DD (midnight UTC)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// List all workouts for a user
    ListWorkouts {
        #[arg(short, long)]
        user: String,
        #[arg(short, long, default_value_t = OrderArg::Created)]
        order: OrderArg,
        #[arg(long)]
        completed: bool,
        #[arg(short, long)]
        verbose: bool,
    },
    AddExercises {
        workout: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    AddSet {
        workout: String,
        exercise: String,
        reps: i64,
        weight: f64,
    },
    UpdateSet {
        set: String,
        reps: i64,
        weight: f64,
    },
    DeleteSet { set: String },
    Comment { workout: String, text: String },
    Complete { workout: String },
    DeleteWorkout {
        #[arg(short, long)]
        user: String,
        workout: String,
    },
}

fn parse_kind(s: &str) -> Result<TaxonomyKind, String> {
    s.parse()
}

fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        .map_err(|e| format!("invalid due date '{}': {}", s, e))
}

async fn open_logbook(database: Option<String>) -> Result<Logbook> {
    let logbook = match database {
        Some(path) => Logbook::new(&path).await,
        None => Logbook::from_env().await,
    };
    logbook.context("failed to open logbook")
}

async fn list_workouts(
    logbook: &Logbook,
    user: &str,
    order: OrderArg,
    completed: bool,
    verbose: bool,
) -> Result<()> {
    let workouts = if completed {
        logbook.get_completed_workouts(user).await?
    } else {
        logbook.get_all_workouts(user, order.into()).await?
    };

    if workouts.is_empty() {
        println!("No workouts found.");
    }
    for workout in workouts {
        println!("{}", workout);
        if verbose {
            for comment in &workout.comments {
                println!("\t# {}", comment);
            }
            for set in logbook.get_sets_for_workout(&workout.id).await? {
                println!("\t{} ({})", set, set.id);
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    if !logging::set_log_level(&args.log_level) {
        eprintln!("Unknown log level '{}', logging disabled", args.log_level);
    }

    let logbook = open_logbook(args.database).await?;

    match args.command {
        Commands::Seed { reset } => {
            let outcome = if reset {
                logbook.reset().await?
            } else {
                logbook
                    .seed_catalog(setbook::catalog::DEFAULT_CATALOG)
                    .await?
            };
            match outcome {
                SeedOutcome::Seeded { exercises, links } => {
                    println!("Seeded {} exercises with {} links", exercises, links)
                }
                SeedOutcome::Skipped { existing } => {
                    println!("Catalog already has {} exercises", existing)
                }
            }
        }
        Commands::Exercises { name: Some(name) } => {
            println!("{}", logbook.get_exercise(&name).await?);
        }
        Commands::Exercises { name: None } => {
            for exercise in logbook.get_all_exercises().await? {
                println!("{}: {}", exercise.name, exercise.description);
            }
        }
        Commands::Taxonomy { kind } => {
            for entity in logbook.get_taxonomy(kind).await? {
                println!("{}\t{}", entity.id, entity.name);
            }
        }
        Commands::AddUser {
            first_name,
            last_name,
            password_hash,
        } => {
            let user = logbook
                .create_user(&NewUser {
                    first_name,
                    last_name,
                    password_hash,
                })
                .await?;
            println!("Created user {} {} ({})", user.first_name, user.last_name, user.id);
        }
        Commands::NewWorkout { user, name, due } => {
            let workout = logbook.new_workout(&user, &name, due).await?;
            println!("Created workout: {}", workout);
        }
        Commands::ListWorkouts {
            user,
            order,
            completed,
            verbose,
        } => list_workouts(&logbook, &user, order, completed, verbose).await?,
        Commands::AddExercises { workout, names } => {
            let added = logbook.add_exercises_to_workout(&workout, &names).await?;
            println!("Linked {} new exercises", added);
        }
        Commands::AddSet {
            workout,
            exercise,
            reps,
            weight,
        } => {
            let set = logbook
                .add_set(
                    &workout,
                    &NewSet {
                        exercise_name: exercise,
                        reps,
                        weight,
                    },
                )
                .await?;
            println!("Added {} ({})", set, set.id);
        }
        Commands::UpdateSet { set, reps, weight } => {
            let set = logbook.update_set(&set, reps, weight).await?;
            println!("Updated {}", set);
        }
        Commands::DeleteSet { set } => {
            logbook.delete_set(&set).await?;
            println!("Deleted set {}", set);
        }
        Commands::Comment { workout, text } => {
            let workout = logbook.add_comment(&workout, &text).await?;
            println!("{} now has {} comments", workout.name, workout.comments.len());
        }
        Commands::Complete { workout } => {
            let workout = logbook.complete_workout(&workout).await?;
            println!("Completed: {}", workout);
        }
        Commands::DeleteWorkout { user, workout } => {
            let sets = logbook.delete_workout(&user, &workout).await?;
            println!("Deleted workout {} and {} sets", workout, sets);
        }
    }

    logbook.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn due_accepts_plain_dates_and_rfc3339() {
        assert_eq!(
            parse_due("2024-01-10").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_due("2024-01-10T08:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap()
        );
        assert!(parse_due("next tuesday").is_err());
    }

    #[test]
    fn cli_parses_workout_listing() {
        let args = Args::try_parse_from([
            "setbook", "list-workouts", "--user", "u1", "--order", "due", "-v",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Commands::ListWorkouts {
                order: OrderArg::Due,
                verbose: true,
                ..
            }
        ));
    }
}
