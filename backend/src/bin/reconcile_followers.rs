//! Recompute cause follower counters from the association table.
//!
//! The unfollow cascade is not transactional, so a crash between its two
//! writes leaves a counter one higher than the live association count. This
//! tool reports that drift and, unless `--dry-run` is given, overwrites the
//! stored counter.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_causes::domain::{CauseId, FollowerCountReconciler};
use user_causes::outbound::persistence::{
    DbPool, DieselCauseRepository, DieselUserCauseRepository, PoolConfig,
};

const DATABASE_URL_ENV: &str = "USER_CAUSES_DATABASE_URL";

/// `reconcile-followers` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-followers",
    about = "Correct cause follower counters that drifted from the association table",
    version
)]
struct CliArgs {
    /// Causes to reconcile.
    #[arg(required = true, value_name = "cause_id", value_parser = parse_cause_id)]
    cause_ids: Vec<CauseId>,
    /// Report drift without writing corrected counters.
    #[arg(long)]
    dry_run: bool,
    /// Database connection URL. Falls back to `USER_CAUSES_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_cause_id(raw: &str) -> std::result::Result<CauseId, String> {
    CauseId::new(raw).map_err(|err| err.to_string())
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    match explicit {
        Some(value) if value.trim().is_empty() => {
            Err(eyre!("--database-url must not be empty when provided"))
        }
        Some(value) => Ok(value),
        None => env::var(DATABASE_URL_ENV)
            .wrap_err_with(|| format!("database URL missing: set --database-url or {DATABASE_URL_ENV}")),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("create database pool")?;
    let reconciler = FollowerCountReconciler::new(
        Arc::new(DieselUserCauseRepository::new(pool.clone())),
        Arc::new(DieselCauseRepository::new(pool)),
    )
    .dry_run(args.dry_run);

    let mut failures = 0usize;
    for cause_id in &args.cause_ids {
        match reconciler.reconcile(cause_id).await {
            Ok(report) => println!(
                "{}\tstored={}\tlive={}\tdrift={}\tcorrected={}",
                report.cause_id,
                report.stored,
                report.live,
                report.drift(),
                report.corrected
            ),
            Err(err) => {
                error!(%cause_id, error = %err, "reconciliation failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(eyre!("{failures} cause(s) could not be reconciled"));
    }
    Ok(())
}
