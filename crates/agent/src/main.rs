//! `guardpost-agent` -- guard-side check-in client.
//!
//! Runs one check-in at a checkpoint: reads a fresh position from the
//! device's position file, checks it against the checkpoint, walks the guard
//! through the checklist on the terminal, and submits the patrol record to
//! the API (which measures the distance again before accepting it).
//!
//! ```text
//! guardpost-agent <checkpoint-id>
//! ```
//!
//! # Environment variables
//!
//! | Variable                | Required | Default | Description                              |
//! |-------------------------|----------|---------|------------------------------------------|
//! | `GUARDPOST_API_URL`     | yes      | --      | API base URL, e.g. `http://host:3000`    |
//! | `GUARD_ID`              | yes      | --      | Integer ID of the guard on duty          |
//! | `POSITION_FILE`         | yes      | --      | JSON file with the device's latest fix   |
//! | `POSITION_TIMEOUT_SECS` | no       | `10`    | Seconds to wait for a fresh fix          |

use anyhow::{bail, Context};
use guardpost_core::geo::whole_meters;
use guardpost_core::session::{Actor, CheckInSession, SessionState};
use guardpost_core::types::DbId;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guardpost_agent::checklist::{confirm, prompt_checklist, PromptOutcome};
use guardpost_agent::config::AgentConfig;
use guardpost_agent::position::FilePositionSource;
use guardpost_agent::remote::RemoteRecordStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guardpost_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|err| {
        tracing::error!(error = %err, "Invalid agent configuration");
        std::process::exit(1);
    });

    let checkpoint_id: DbId = std::env::args()
        .nth(1)
        .unwrap_or_else(|| {
            tracing::error!("Usage: guardpost-agent <checkpoint-id>");
            std::process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            tracing::error!("Checkpoint id must be a valid integer");
            std::process::exit(1);
        });

    tracing::info!(
        guard_id = config.guard_id,
        checkpoint_id,
        api_url = %config.api_url,
        position_file = %config.position_file.display(),
        "Starting guardpost-agent",
    );

    if let Err(err) = run(&config, checkpoint_id).await {
        tracing::error!(error = %format!("{err:#}"), "Check-in did not complete");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(config: &AgentConfig, checkpoint_id: DbId) -> anyhow::Result<()> {
    let store = RemoteRecordStore::new(config.api_url.clone());
    let source = FilePositionSource::new(config.position_file.clone());
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    let guard = store
        .fetch_guard(config.guard_id)
        .await
        .with_context(|| format!("failed to load guard {}", config.guard_id))?;
    let checkpoint = store
        .fetch_checkpoint(checkpoint_id)
        .await
        .with_context(|| format!("failed to load checkpoint {checkpoint_id}"))?;

    println!("{}: checking in at {}", guard.name, checkpoint.name);

    let mut session = CheckInSession::new(Actor {
        guard_id: guard.id,
        name: guard.name,
    });
    session.select_checkpoint(checkpoint);

    println!("Getting your location...");
    let state = session
        .acquire_position(&source, config.position_timeout)
        .await?;
    match state {
        SessionState::ReadyToFill { form } => {
            println!(
                "Location verified: {}m from {}",
                whole_meters(form.distance_m),
                form.checkpoint.name
            );
        }
        other => {
            let guidance = other
                .guidance()
                .unwrap_or_else(|| format!("Cannot check in while {}", other.name()));
            bail!(guidance);
        }
    }

    loop {
        match prompt_checklist(&mut session, &mut stdin, &mut stdout).await? {
            PromptOutcome::Complete => {}
            PromptOutcome::Incomplete(remaining) => {
                println!(
                    "All checklist items must be completed before submitting. Remaining: {}",
                    remaining.join(", ")
                );
                continue;
            }
            PromptOutcome::Quit => {
                session.cancel()?;
                bail!("Check-in cancelled");
            }
        }

        println!("Submitting patrol...");
        match session.submit(&store).await? {
            SessionState::Completed { record } => {
                tracing::info!(
                    record_id = record.id,
                    distance_m = record.distance_m,
                    "Patrol submitted",
                );
                println!(
                    "Patrol recorded at {} ({}m from {})",
                    record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    whole_meters(record.distance_m),
                    record.checkpoint_name
                );
                return Ok(());
            }
            SessionState::SubmitFailed { error, .. } => {
                println!("Submission failed: {error}");
                // Rejections would fail the same way again; only backend
                // failures are worth resubmitting.
                if error.rejection().is_some()
                    || !confirm("Retry?", &mut stdin, &mut stdout).await?
                {
                    bail!("Patrol was not recorded: {error}");
                }
                session.retry()?;
            }
            other => bail!("Unexpected session state after submit: {}", other.name()),
        }
    }
}
