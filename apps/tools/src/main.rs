use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    analytics::{calculate_roi, RoiInputs},
    catalog, prepare_database_url,
    projects::{completion_percent, ProjectDraft, ProjectFilter, ProjectService, ProjectSort},
    ProjectError,
};
use shared::domain::{ProjectId, ProjectStatus, UserId};
use storage::Storage;
use tracing::{info, warn};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/studio.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateProject {
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "blog")]
        category: String,
        #[arg(long = "keyword", required = true)]
        keywords: Vec<String>,
        #[arg(long, default_value = "US")]
        country: String,
        #[arg(long, default_value_t = 10)]
        goal: u32,
        #[arg(long, default_value = "3 months")]
        timeline: String,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        owner_user_id: Option<i64>,
    },
    ListProjects {
        #[arg(long)]
        status: Option<ProjectStatus>,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        by_name: bool,
    },
    SetStatus {
        project_id: i64,
        status: ProjectStatus,
    },
    DeleteProject {
        project_id: i64,
    },
    ShowSession,
    ClearSession,
    Roi {
        #[arg(long)]
        subscription: Option<f64>,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        hourly_rate: Option<f64>,
        #[arg(long)]
        traffic_increase: Option<f64>,
        #[arg(long)]
        conversion_rate: Option<f64>,
        #[arg(long)]
        order_value: Option<f64>,
    },
    Suggest {
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    // Pure lookups never touch the database.
    match &cli.command {
        Command::Roi {
            subscription,
            hours,
            hourly_rate,
            traffic_increase,
            conversion_rate,
            order_value,
        } => {
            let defaults = RoiInputs::default();
            let inputs = RoiInputs {
                tool_subscription: subscription.unwrap_or(defaults.tool_subscription),
                time_investment_hours: hours.unwrap_or(defaults.time_investment_hours),
                hourly_rate: hourly_rate.unwrap_or(defaults.hourly_rate),
                traffic_increase: traffic_increase.unwrap_or(defaults.traffic_increase),
                conversion_rate: conversion_rate.unwrap_or(defaults.conversion_rate),
                avg_order_value: order_value.unwrap_or(defaults.avg_order_value),
                ..defaults
            };
            println!("{}", serde_json::to_string_pretty(&calculate_roi(&inputs))?);
            return Ok(());
        }
        Command::Suggest { query } => {
            for suggestion in catalog::suggest_keywords(query) {
                println!(
                    "{:<20} volume={:<6} difficulty={} ({})",
                    suggestion.keyword,
                    suggestion.volume,
                    suggestion.difficulty,
                    suggestion.difficulty_band()
                );
            }
            return Ok(());
        }
        _ => {}
    }

    let database_url = prepare_database_url(&cli.database_url)?;
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open {database_url}"))?;
    let projects = ProjectService::new(storage.clone());
    info!(%database_url, "opened studio database");

    match cli.command {
        Command::CreateProject {
            name,
            description,
            category,
            keywords,
            country,
            goal,
            timeline,
            template,
            owner_user_id,
        } => {
            let mut draft = ProjectDraft {
                name,
                description,
                category,
                target_country: country,
                content_goal: goal,
                timeline,
                use_template: template.is_some(),
                template,
                ..ProjectDraft::default()
            };
            for keyword in &keywords {
                draft.add_keyword(keyword);
            }
            match projects.create(owner_user_id.map(UserId), draft).await {
                Ok(project) => println!("created project_id={}", project.id.0),
                Err(ProjectError::Invalid(errors)) => {
                    warn!(invalid_fields = errors.len(), "project draft rejected");
                    for field in errors.iter() {
                        eprintln!("{}: {}", field.field, field.message);
                    }
                    anyhow::bail!("project draft is invalid");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::ListProjects {
            status,
            query,
            by_name,
        } => {
            let sort = if by_name {
                ProjectSort::Name
            } else {
                ProjectSort::RecentlyUpdated
            };
            let filter = ProjectFilter { status, query };
            for project in projects.list(None, &filter, sort).await? {
                println!(
                    "{:>4}  {:<9}  {:>3}%  {}",
                    project.id.0,
                    project.status,
                    completion_percent(&project),
                    project.name
                );
            }
        }
        Command::SetStatus { project_id, status } => {
            let project = projects.set_status(ProjectId(project_id), status).await?;
            println!("project_id={} status={}", project.id.0, project.status);
        }
        Command::DeleteProject { project_id } => {
            projects.delete(ProjectId(project_id)).await?;
            println!("deleted project_id={project_id}");
        }
        Command::ShowSession => match storage.load_session_blob().await? {
            Some(blob) => {
                info!(bytes = blob.len(), "saved session found");
                println!("{blob}");
            }
            None => println!("no saved session"),
        },
        Command::ClearSession => {
            let cleared = storage.clear_session().await?;
            info!(cleared, "saved session cleared by admin");
            println!("session cleared={cleared}");
        }
        Command::Roi { .. } | Command::Suggest { .. } => {}
    }

    Ok(())
}
