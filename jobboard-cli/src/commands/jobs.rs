use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shared::models::{EntityId, FilterSet, Job, JobFilterPatch, JobStatus};

use super::{Session, print_json, truncate};

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// List jobs matching the given filters
    List(ListArgs),

    /// Show one job in full
    Show {
        /// Job id
        id: EntityId,
    },

    /// Save a job, or unsave it if it is already saved
    Save {
        /// Job id
        id: EntityId,
    },

    /// List your saved jobs
    Saved,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Text to search for in job titles
    #[arg(long, short, help = "Text to search for in job titles")]
    pub name: Option<String>,

    #[arg(long, short, help = "Only jobs in this location")]
    pub location: Option<String>,

    #[arg(long, help = "Only jobs posted by this company id")]
    pub company: Option<EntityId>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Only jobs in these category ids (comma separated)"
    )]
    pub category: Vec<EntityId>,

    #[arg(long, short, help = "Only jobs with this status (draft, open, closed)")]
    pub status: Option<JobStatus>,

    #[arg(long, short, default_value_t = 1, help = "Page number, starting at 1")]
    pub page: u32,

    #[arg(long, help = "Jobs per page (defaults to the configured page size)")]
    pub limit: Option<u32>,
}

impl ListArgs {
    fn into_patch(self, page_size: u32) -> JobFilterPatch {
        JobFilterPatch {
            name: self.name,
            category_ids: Some(self.category),
            location: self.location,
            company_id: Some(self.company),
            status: Some(self.status),
            no: Some(self.page),
            limit: Some(self.limit.unwrap_or(page_size)),
        }
    }
}

/// Runs a `jobs` subcommand.
///
/// # Errors
/// Returns an error if the request fails or the command needs a session
/// and none is stored.
pub async fn run(session: &Session, command: JobsCommand, json: bool) -> Result<()> {
    let jobs = session.context.jobs();
    match command {
        JobsCommand::List(args) => {
            jobs.set_filters(args.into_patch(session.config.page_size));
            let page = jobs.fetch().await.context("failed to list jobs")?;
            if json {
                return print_json(&page);
            }
            let pagination = jobs.select(|list| list.filters().pagination());
            print_table(&page.items);
            println!(
                "Page {} · showing {} of {} jobs",
                pagination.no,
                page.items.len(),
                page.total
            );
        }
        JobsCommand::Show { id } => {
            let job = jobs.get(id).await.with_context(|| format!("failed to load job {id}"))?;
            if json {
                return print_json(&job);
            }
            print_details(&job);
        }
        JobsCommand::Save { id } => {
            session.require_login()?;
            jobs.load_saved().await.context("failed to load saved jobs")?;
            let saved = jobs
                .toggle_saved(id)
                .await
                .with_context(|| format!("failed to update saved state of job {id}"))?;
            if saved {
                println!("Saved job {id}");
            } else {
                println!("Removed job {id} from saved jobs");
            }
        }
        JobsCommand::Saved => {
            session.require_login()?;
            let ids = jobs.load_saved().await.context("failed to load saved jobs")?;
            let mut saved = Vec::with_capacity(ids.len());
            for id in ids {
                saved.push(jobs.get(id).await.with_context(|| format!("failed to load job {id}"))?);
            }
            if json {
                return print_json(&saved);
            }
            if saved.is_empty() {
                println!("No saved jobs");
            } else {
                print_table(&saved);
            }
        }
    }
    Ok(())
}

fn print_table(jobs: &[Job]) {
    println!(
        "{:>6}  {:<36}  {:<20}  {:<16}  {}",
        "ID", "TITLE", "COMPANY", "LOCATION", "STATUS"
    );
    for job in jobs {
        println!(
            "{:>6}  {:<36}  {:<20}  {:<16}  {}",
            job.id,
            truncate(&job.title, 36),
            truncate(&job.company_name, 20),
            truncate(&job.location, 16),
            job.status
        );
    }
}

fn print_details(job: &Job) {
    println!("{} (#{})", job.title, job.id);
    if !job.company_name.is_empty() {
        println!("Company:    {}", job.company_name);
    }
    if !job.location.is_empty() {
        println!("Location:   {}", job.location);
    }
    match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) => println!("Salary:     {min} - {max}"),
        (Some(min), None) => println!("Salary:     from {min}"),
        (None, Some(max)) => println!("Salary:     up to {max}"),
        (None, None) => {}
    }
    println!("Status:     {}", job.status);
    println!("Applicants: {}", job.applicant_count);
    if let Some(created_at) = job.created_at {
        println!("Posted:     {}", created_at.format("%Y-%m-%d"));
    }
    if !job.description.is_empty() {
        println!();
        println!("{}", job.description);
    }
}
