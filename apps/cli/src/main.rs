use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use client_core::{
    initialize, CategorizerBackend, ClearPolicy, Controller, ControllerOptions,
    HttpCategorizerBackend, UiHandles, WorkflowState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod local;
mod report;
mod terminal;

use local::LocalCategorizerBackend;
use report::{run_report, ReportArgs};
use terminal::{FileForm, TerminalReview};

#[derive(Parser, Debug)]
#[command(name = "notecat", about = "Sort notes into keyword categories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categorize in-process without a server.
    Categorize {
        #[command(flatten)]
        workflow: WorkflowArgs,
    },
    /// Categorize through a running server.
    Submit {
        #[arg(long, default_value = "http://127.0.0.1:53691")]
        server_url: String,
        /// Per-request timeout; no timeout when omitted.
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[command(flatten)]
        workflow: WorkflowArgs,
    },
    /// Print the categorized report for two files without reviewing.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct WorkflowArgs {
    /// File with one `<name>: <keywords>` category per line.
    #[arg(long)]
    category_path: PathBuf,
    /// File with one note per line.
    #[arg(long)]
    notes_path: PathBuf,
    /// Append per-category time totals to the report.
    #[arg(long)]
    add_times: bool,
    /// Print the report and skip the interactive review.
    #[arg(long)]
    no_review: bool,
    #[arg(long, value_enum, default_value_t = ClearPolicyArg::Optimistic)]
    clear_policy: ClearPolicyArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ClearPolicyArg {
    Optimistic,
    Confirm,
}

impl From<ClearPolicyArg> for ClearPolicy {
    fn from(value: ClearPolicyArg) -> Self {
        match value {
            ClearPolicyArg::Optimistic => ClearPolicy::Optimistic,
            ClearPolicyArg::Confirm => ClearPolicy::ConfirmThenClear,
        }
    }
}

impl WorkflowArgs {
    fn options(&self) -> ControllerOptions {
        ControllerOptions {
            clear_policy: self.clear_policy.into(),
            add_times: self.add_times,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let (backend, workflow): (Arc<dyn CategorizerBackend>, WorkflowArgs) = match cli.command {
        Command::Categorize { workflow } => (Arc::new(LocalCategorizerBackend::new()), workflow),
        Command::Submit {
            server_url,
            timeout_secs,
            workflow,
        } => {
            let backend = HttpCategorizerBackend::with_timeout(
                &server_url,
                timeout_secs.map(Duration::from_secs),
            )?;
            info!(url = %backend.base_url(), "using remote categorizer");
            (Arc::new(backend), workflow)
        }
        Command::Report(args) => return run_report(&args, &mut io::stdout().lock()),
    };

    let form = FileForm::from_paths(&workflow.category_path, &workflow.notes_path, io::stdout())?;
    let review = TerminalReview::new(io::stdin().lock(), io::stdout());
    let controller = initialize(UiHandles { form, review }, backend, workflow.options());

    let summary = run_workflow(&controller, !workflow.no_review).await?;
    info!(
        notes = summary.notes,
        rounds = summary.review_rounds,
        unresolved = summary.unresolved,
        "done"
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorkflowSummary {
    notes: usize,
    review_rounds: usize,
    /// Notes still uncategorized when the workflow stopped.
    unresolved: usize,
}

/// Submits the form, then keeps sending review selections while notes are
/// pending and the previous round assigned at least one of them.
async fn run_workflow<Rd, W>(
    controller: &Controller<FileForm<W>, TerminalReview<Rd, W>>,
    review: bool,
) -> Result<WorkflowSummary>
where
    Rd: BufRead,
    W: Write,
{
    let first = controller.submit().await?;
    let mut review_rounds = 0;

    while review && controller.state().await == WorkflowState::ReviewPending {
        let round = controller.submit_update().await?;
        review_rounds += 1;
        if round.sent == 0 {
            info!("no selections made; leaving the remaining notes uncategorized");
            break;
        }
    }

    Ok(WorkflowSummary {
        notes: first.sent,
        review_rounds,
        unresolved: controller.pending_notes().await.len(),
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
