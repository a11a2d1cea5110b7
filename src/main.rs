use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use learnmate::models::{Difficulty, LearningStyle, StudentInfo, SubjectPreference};
use learnmate::{AppConfig, OpenAiClient, Store, service};

/// Learnmate CLI: personalized learning plans, quizzes, and an
/// interactive assistant backed by a completion service.
#[derive(Parser, Debug)]
#[command(name = "learnmate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage student records and preferences
    Student {
        #[command(subcommand)]
        command: StudentCommand,
    },

    /// Generate and inspect learning plans
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Generate and evaluate quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },

    /// Generate and list learning resources
    Resources {
        #[command(subcommand)]
        command: ResourceCommand,
    },

    /// Chat with the learning assistant
    Chat {
        #[arg(short, long)]
        email: String,

        /// New user message
        #[arg(short, long)]
        message: String,
    },
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    /// Register a new student
    Register {
        #[arg(short, long)]
        email: String,
    },

    /// Save onboarding info
    Info {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        age: u32,

        #[arg(long)]
        gender: String,

        /// visual, auditory, reading_writing, or kinesthetic
        #[arg(long)]
        style: String,
    },

    /// Save a subject preference
    Subject {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        subject: String,

        /// visual, auditory, reading_writing, or kinesthetic
        #[arg(long)]
        style: String,

        #[arg(long, default_value = "")]
        goal: String,

        /// Favorite topic as TOPIC=REASON (repeatable)
        #[arg(long = "favorite")]
        favorite_topics: Vec<String>,

        /// Weak topic as TOPIC=REASON (repeatable)
        #[arg(long = "weak")]
        weak_topics: Vec<String>,
    },

    /// Add a learning goal
    Goal {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        text: String,

        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Record a resource access
    LogResource {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        resource_id: i64,

        #[arg(long, default_value = "")]
        feedback: String,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Generate and save a weekly learning plan from the student's profile
    Generate {
        #[arg(short, long)]
        email: String,
    },

    /// Show the most recent learning plan
    Show {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// Generate and save a quiz
    Generate {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        topic: String,

        /// beginner, intermediate, or advanced
        #[arg(short, long)]
        level: String,
    },

    /// Grade submitted answers and let the evaluator score the attempt
    Evaluate {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        quiz_id: i64,

        /// Answers as a JSON object of question id to option key,
        /// e.g. '{"1": "A", "2": "C"}'
        #[arg(short, long)]
        answers: String,
    },
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// Generate and save resource suggestions from the profile and plan
    Generate {
        #[arg(short, long)]
        email: String,
    },

    /// List the resource catalog
    List,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "learnmate=debug"
    } else {
        "learnmate=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
        }
        Err(e) => {
            // single flat error surface, whatever the failure kind
            eprintln!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Value> {
    let config = AppConfig::load_or_default(cli.config.as_ref())?;

    let db_path = config.resolve_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {parent:?}"))?;
    }
    let store = Store::open(&db_path)?;

    match cli.command {
        Command::Student { command } => run_student(&store, command),

        Command::Plan { command } => match command {
            PlanCommand::Generate { email } => {
                let client = OpenAiClient::from_config(&config.completion)?;
                let plan = service::generate_and_store_plan(&store, &client, &email).await?;
                Ok(json!({
                    "message": "Plan generated and saved successfully.",
                    "plan": plan,
                }))
            }
            PlanCommand::Show { email } => {
                let plan = service::latest_plan(&store, &email)?;
                Ok(serde_json::to_value(plan)?)
            }
        },

        Command::Quiz { command } => match command {
            QuizCommand::Generate {
                email,
                subject,
                topic,
                level,
            } => {
                let level: Difficulty = level.parse().map_err(anyhow::Error::msg)?;
                let client = OpenAiClient::from_config(&config.completion)?;
                let quiz = service::generate_and_store_quiz(
                    &store, &client, &email, &subject, &topic, level,
                )
                .await?;
                Ok(json!({
                    "message": "Quiz created successfully.",
                    "quiz_id": quiz.id,
                    "quiz": quiz,
                }))
            }
            QuizCommand::Evaluate {
                email,
                quiz_id,
                answers,
            } => {
                let answers: BTreeMap<i64, String> = serde_json::from_str(&answers)
                    .context("answers must be a JSON object of question id to option key")?;
                let client = OpenAiClient::from_config(&config.completion)?;
                let outcome =
                    service::evaluate_and_store_quiz(&store, &client, &email, quiz_id, &answers)
                        .await?;
                Ok(json!({
                    "message": "Quiz evaluated successfully.",
                    "score": outcome.score,
                    "feedback": outcome.feedback,
                }))
            }
        },

        Command::Resources { command } => match command {
            ResourceCommand::Generate { email } => {
                let client = OpenAiClient::from_config(&config.completion)?;
                let created = service::generate_and_store_resources(&store, &client, &email).await?;
                Ok(json!({
                    "message": "Resources generated and saved successfully.",
                    "created": created,
                }))
            }
            ResourceCommand::List => {
                let resources = store.list_resources()?;
                Ok(serde_json::to_value(resources)?)
            }
        },

        Command::Chat { email, message } => {
            let client = OpenAiClient::from_config(&config.completion)?;
            let response = service::chat(&store, &client, &email, &message).await?;
            Ok(json!({ "response": response }))
        }
    }
}

fn run_student(store: &Store, command: StudentCommand) -> Result<Value> {
    match command {
        StudentCommand::Register { email } => {
            store.register_student(&email)?;
            Ok(json!({ "message": "Student registered successfully." }))
        }
        StudentCommand::Info {
            email,
            full_name,
            age,
            gender,
            style,
        } => {
            let preferred_learning_style: LearningStyle =
                style.parse().map_err(anyhow::Error::msg)?;
            store.upsert_info(
                &email,
                &StudentInfo {
                    full_name,
                    age,
                    gender,
                    preferred_learning_style,
                },
            )?;
            Ok(json!({ "message": "Student info saved." }))
        }
        StudentCommand::Subject {
            email,
            subject,
            style,
            goal,
            favorite_topics,
            weak_topics,
        } => {
            let preferred_style: LearningStyle = style.parse().map_err(anyhow::Error::msg)?;
            store.upsert_subject_preference(
                &email,
                &SubjectPreference {
                    subject,
                    preferred_style,
                    favorite_topics: parse_topic_map(&favorite_topics)?,
                    weak_topics: parse_topic_map(&weak_topics)?,
                    goal,
                },
            )?;
            Ok(json!({ "message": "Subject preference saved." }))
        }
        StudentCommand::Goal {
            email,
            text,
            subject,
        } => {
            store.add_goal(&email, &text, subject.as_deref())?;
            Ok(json!({ "message": "Learning goal added." }))
        }
        StudentCommand::LogResource {
            email,
            resource_id,
            feedback,
        } => {
            store.log_resource_access(&email, resource_id, &feedback)?;
            Ok(json!({ "message": "Resource access logged." }))
        }
    }
}

/// Parse repeated TOPIC=REASON entries into a topic map.
fn parse_topic_map(entries: &[String]) -> Result<BTreeMap<String, String>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(topic, reason)| (topic.trim().to_string(), reason.trim().to_string()))
                .ok_or_else(|| anyhow::anyhow!("expected TOPIC=REASON, got '{entry}'"))
        })
        .collect()
}
