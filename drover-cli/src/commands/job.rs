//! Job command handlers
//!
//! Handles submitting a batch, watching its progress, pausing, resuming,
//! resetting, and fetching the results artifact.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use drover_client::{ClientError, DroverClient};
use drover_core::domain::job::{JobPhase, JobSnapshot, WorkerStatus};
use drover_core::domain::outcome::FailureKind;
use std::time::Duration;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a batch from an `identifier,secret` file
    Submit {
        /// Path to the input file
        file: String,
    },
    /// Show the current job status
    Status {
        /// Keep refreshing until the job leaves the active slot
        #[arg(short, long)]
        watch: bool,

        /// Refresh interval in seconds when watching
        #[arg(long, default_value = "5")]
        interval: u64,
    },
    /// Pause the running job
    Pause,
    /// Resume a paused job
    Resume,
    /// Cancel any active job and clear uploaded batches
    Reset,
    /// Show or download the last results artifact
    Results {
        /// Write the artifact to this path instead of printing its location
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = DroverClient::new(&config.server_url);

    match command {
        JobCommands::Submit { file } => submit_job(&client, &file).await,
        JobCommands::Status { watch, interval } => {
            if watch {
                watch_status(&client, Duration::from_secs(interval.max(1))).await
            } else {
                show_status(&client).await.map(|_| ())
            }
        }
        JobCommands::Pause => control(&client, Control::Pause).await,
        JobCommands::Resume => control(&client, Control::Resume).await,
        JobCommands::Reset => control(&client, Control::Reset).await,
        JobCommands::Results { output } => results(&client, output).await,
    }
}

async fn submit_job(client: &DroverClient, file: &str) -> Result<()> {
    let text =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read batch: {}", file))?;

    let submitted = match client.upload_job(text).await {
        Ok(resp) => resp,
        Err(e) if e.is_conflict() => {
            println!("{}", "✗ A job is already running".red());
            println!(
                "  {}",
                "Use 'drover job status' to follow it or 'drover job reset' to cancel it."
                    .dimmed()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "✓ Job submitted".green());
    println!("  ID:      {}", submitted.job_id.to_string().cyan());
    println!("  Records: {}", submitted.total);
    println!("  Workers: {}", submitted.workers);

    Ok(())
}

async fn show_status(client: &DroverClient) -> Result<JobSnapshot> {
    let snapshot = client.job_status().await?;
    print_snapshot(&snapshot);
    Ok(snapshot)
}

async fn watch_status(client: &DroverClient, interval: Duration) -> Result<()> {
    loop {
        let snapshot = show_status(client).await?;
        if !snapshot.is_running && !snapshot.is_paused {
            return Ok(());
        }
        println!("{}", "─".repeat(60).dimmed());
        tokio::time::sleep(interval).await;
    }
}

/// State-changing job actions that answer with a [`ControlResponse`]
///
/// [`ControlResponse`]: drover_core::dto::job::ControlResponse
#[derive(Debug, Clone, Copy)]
enum Control {
    Pause,
    Resume,
    Reset,
}

async fn control(client: &DroverClient, action: Control) -> Result<()> {
    let result = match action {
        Control::Pause => client.pause_job().await,
        Control::Resume => client.resume_job().await,
        Control::Reset => client.reset_job().await,
    };

    match result {
        Ok(resp) => {
            println!("{} {}", "✓".green(), resp.message);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{}", "No active job.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn results(client: &DroverClient, output: Option<String>) -> Result<()> {
    let Some(output) = output else {
        let location = client.results_location().await?;
        match location.path {
            Some(path) => println!("{} {}", "Results:".bold(), path.cyan()),
            None => println!("{}", "No results available yet.".yellow()),
        }
        return Ok(());
    };

    let bytes = match client.download_results().await {
        Ok(bytes) => bytes,
        Err(ClientError::ApiError { status: 404, .. }) => {
            println!("{}", "No results available yet.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::write(&output, &bytes).with_context(|| format!("Failed to write {}", output))?;
    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        bytes.len(),
        output.cyan()
    );

    Ok(())
}

/// Print a job snapshot
fn print_snapshot(snapshot: &JobSnapshot) {
    let (Some(job_id), Some(phase)) = (snapshot.job_id, snapshot.phase) else {
        println!("{}", "No job has been submitted.".yellow());
        return;
    };

    println!("{}", "Job Status:".bold());
    println!("  ID:         {}", job_id.to_string().cyan());
    println!("  Phase:      {}", colorize_phase(phase));
    println!(
        "  Progress:   {}/{} ({:.1}%)",
        snapshot.processed, snapshot.total, snapshot.percent
    );
    println!(
        "  Success:    {} ({:.1}%)",
        snapshot.success.to_string().green(),
        snapshot.success_rate
    );
    println!("  Failure:    {}", snapshot.failure.to_string().red());
    if snapshot.captcha_count > 0 {
        println!(
            "  Challenges: {}",
            snapshot.captcha_count.to_string().yellow()
        );
    }
    if snapshot.skipped > 0 {
        println!("  Skipped:    {}", snapshot.skipped.to_string().dimmed());
    }
    println!(
        "  Throughput: {:.1}/min, ETA {}",
        snapshot.throughput_per_minute,
        format_eta(snapshot.eta_seconds)
    );

    if let Some(started) = snapshot.started_at {
        println!("  Started:    {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(completed) = snapshot.completed_at {
        println!("  Finished:   {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }

    if snapshot.failure > 0 {
        println!("\n{}", "Failures:".bold());
        for kind in FailureKind::ALL {
            let count = snapshot.failure_breakdown.get(kind);
            if count > 0 {
                println!("  {:<22} {}", kind.to_string(), count);
            }
        }
    }

    if !snapshot.workers.is_empty() {
        println!("\n{}", "Workers:".bold());
        for worker in &snapshot.workers {
            println!(
                "  {} {}/{} ok={} fail={} {}",
                format!("#{:<3}", worker.worker_id).dimmed(),
                worker.processed,
                worker.assigned,
                worker.success,
                worker.failure,
                colorize_worker(worker.status, worker.status_line())
            );
        }
    }
}

fn format_eta(eta_seconds: Option<u64>) -> String {
    match eta_seconds {
        None => "unknown".to_string(),
        Some(secs) if secs >= 3600 => format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60),
        Some(secs) if secs >= 60 => format!("{}m{:02}s", secs / 60, secs % 60),
        Some(secs) => format!("{}s", secs),
    }
}

/// Colorize job phase for display
fn colorize_phase(phase: JobPhase) -> ColoredString {
    let phase_str = phase.to_string();
    match phase {
        JobPhase::Running => phase_str.cyan(),
        JobPhase::Paused => phase_str.yellow(),
        JobPhase::Completed => phase_str.green(),
        JobPhase::Cancelled => phase_str.dimmed(),
        JobPhase::Errored => phase_str.red(),
    }
}

fn colorize_worker(status: WorkerStatus, line: String) -> ColoredString {
    match status {
        WorkerStatus::Running => line.cyan(),
        WorkerStatus::Paused | WorkerStatus::Waiting => line.yellow(),
        WorkerStatus::Completed => line.green(),
        WorkerStatus::Errored => line.red(),
        WorkerStatus::Idle | WorkerStatus::Cancelled => line.dimmed(),
    }
}
