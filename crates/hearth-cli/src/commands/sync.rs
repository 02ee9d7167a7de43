//! Sync command implementation
//!
//! Scans every location, reconciles them under the chosen strategy, prints
//! the plan, and applies it unless told not to.

use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use hearth_core::{
    Central, ExecuteOptions, ExecutionReport, LocationId, OperationKind, Plan, PlanExecutor,
    StrategyKind, SyncEngine, SyncStrategy,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{central_path, logical_name};
use crate::error::{CliError, Result};

/// Arguments of the sync command
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub locations: Vec<PathBuf>,
    pub hearth: Option<String>,
    pub strategy: StrategyKind,
    pub no_commit: bool,
    pub json: bool,
    pub name: Option<String>,
}

#[derive(Serialize)]
struct SyncOutput<'a> {
    locations: &'a [PathBuf],
    plan: &'a Plan,
    report: Option<&'a ExecutionReport>,
}

/// Run the sync command
///
/// The first location is the master. With `--hearth`, locations come from
/// the central registry (primary source first) and `last_synced` is
/// recorded after a successful committed run that left no conflicts.
pub async fn run_sync(
    central: Option<PathBuf>,
    args: SyncArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut registry = None;
    let (locations, name) = match &args.hearth {
        Some(hearth) => {
            let central = Central::load(&central_path(central)?)?;
            let locations = central.hearth(hearth)?.locations()?;
            registry = Some(central);
            (locations, args.name.clone().unwrap_or_else(|| hearth.clone()))
        }
        None => {
            let first = args
                .locations
                .first()
                .ok_or_else(|| CliError::user("Give at least two locations or --hearth"))?;
            let name = logical_name(args.name.clone(), first)?;
            (args.locations.clone(), name)
        }
    };

    let strategy = SyncStrategy::with_master(args.strategy, LocationId(0));
    let engine = SyncEngine::new(locations.iter().cloned()).named(name);
    let plan = engine.plan(&strategy, cancel).await?;

    let report = if args.no_commit {
        None
    } else {
        let executor = PlanExecutor::new(locations.iter().cloned());
        Some(executor.execute(&plan, &ExecuteOptions::default())?)
    };

    if args.json {
        let output = SyncOutput {
            locations: &locations,
            plan: &plan,
            report: report.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_plan(&locations, &plan);
        match &report {
            Some(report) => print_report(report),
            None if !plan.is_empty() => {
                println!();
                println!("Run without {} to apply.", "--no-commit".cyan());
            }
            None => {}
        }
    }

    match report {
        Some(report) if !report.success => Err(CliError::user(format!(
            "{} operation(s) failed",
            report.errors.len()
        ))),
        Some(_) => {
            let Some(mut central) = registry else {
                return Ok(());
            };
            if plan.conflicts().is_empty() {
                central.mark_synced(Utc::now());
                central.save(false)?;
            } else {
                warn!(
                    conflicts = plan.conflicts().len(),
                    "Locations did not converge, last sync time left unchanged"
                );
                if !args.json {
                    println!();
                    println!(
                        "{} Partial sync: {} conflict(s) skipped, not marked as synced.",
                        "!".yellow().bold(),
                        plan.conflicts().len()
                    );
                }
            }
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_plan(locations: &[PathBuf], plan: &Plan) {
    println!(
        "{} {} across {} locations",
        "=>".blue().bold(),
        plan.strategy().kind().to_string().bold(),
        locations.len()
    );
    for (index, location) in locations.iter().enumerate() {
        let role = if index == 0 { " (master)".yellow().to_string() } else { String::new() };
        println!("   {} {}{role}", LocationId(index).to_string().dimmed(), location.display());
    }
    println!();

    if plan.is_empty() {
        println!("{} Nothing to do.", "OK".green().bold());
    }
    for op in plan.operations() {
        let line = op.to_string();
        match op.kind {
            OperationKind::Copy => println!("   {} {}", "+".green(), line),
            OperationKind::Delete => println!("   {} {}", "-".red(), line),
        }
    }
    for conflict in plan.conflicts() {
        println!("   {} skipped: {conflict}", "!".yellow());
    }
}

fn print_report(report: &ExecutionReport) {
    if report.actions.is_empty() && report.errors.is_empty() {
        return;
    }
    println!();
    for action in &report.actions {
        println!("   {} {action}", "OK".green());
    }
    for error in &report.errors {
        println!("   {} {error}", "FAILED".red().bold());
    }
}
