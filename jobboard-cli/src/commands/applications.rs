use anyhow::{Context, Result};
use clap::Subcommand;
use shared::models::{
    Application, ApplicationDraft, ApplicationFilterPatch, ApplicationStatus, EntityId,
};

use super::{Session, print_json, truncate};

#[derive(Subcommand, Debug)]
pub enum ApplicationsCommand {
    /// List your applications
    List {
        #[arg(
            long,
            short,
            help = "Only applications with this status (pending, reviewing, interview, accepted, rejected, withdrawn)"
        )]
        status: Option<ApplicationStatus>,

        #[arg(long, short, default_value_t = 1, help = "Page number, starting at 1")]
        page: u32,

        #[arg(long, help = "Applications per page (defaults to the configured page size)")]
        limit: Option<u32>,
    },

    /// Apply for a job
    Apply {
        /// Id of the job to apply for
        job_id: EntityId,

        #[arg(long, help = "Cover letter text")]
        cover_letter: Option<String>,

        #[arg(long, help = "URL of the CV to attach")]
        cv_url: Option<String>,
    },

    /// Withdraw an application
    Withdraw {
        /// Application id
        id: EntityId,
    },
}

/// Runs an `applications` subcommand. Every subcommand needs a session.
///
/// # Errors
/// Returns an error if no session is stored or the request fails.
pub async fn run(session: &Session, command: ApplicationsCommand, json: bool) -> Result<()> {
    session.require_login()?;
    let applications = session.context.applications();

    match command {
        ApplicationsCommand::List {
            status,
            page,
            limit,
        } => {
            applications.set_filters(ApplicationFilterPatch {
                status: Some(status),
                no: Some(page),
                limit: Some(limit.unwrap_or(session.config.page_size)),
                ..ApplicationFilterPatch::default()
            });
            let page = applications
                .fetch()
                .await
                .context("failed to list applications")?;
            if json {
                return print_json(&page);
            }
            print_table(&page.items);
            println!("{} of {} applications", page.items.len(), page.total);
        }
        ApplicationsCommand::Apply {
            job_id,
            cover_letter,
            cv_url,
        } => {
            let draft = ApplicationDraft {
                job_id,
                cover_letter: cover_letter.unwrap_or_default(),
                cv_url,
            };
            let application = applications
                .apply(&draft)
                .await
                .with_context(|| format!("failed to apply for job {job_id}"))?;
            if json {
                return print_json(&application);
            }
            println!(
                "Applied for \"{}\" (application #{})",
                application.job.title, application.id
            );
        }
        ApplicationsCommand::Withdraw { id } => {
            let application = applications
                .withdraw(id)
                .await
                .with_context(|| format!("failed to withdraw application {id}"))?;
            if json {
                return print_json(&application);
            }
            println!("Application #{} is now {}", application.id, application.status);
        }
    }
    Ok(())
}

fn print_table(applications: &[Application]) {
    println!("{:>6}  {:<36}  {:<20}  {}", "ID", "JOB", "COMPANY", "STATUS");
    for application in applications {
        println!(
            "{:>6}  {:<36}  {:<20}  {}",
            application.id,
            truncate(&application.job.title, 36),
            truncate(&application.job.company_name, 20),
            application.status
        );
    }
}
