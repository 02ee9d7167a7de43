//! Compare command implementation

use std::path::PathBuf;

use hearth_core::{DiffResult, SyncEngine};
use hearth_fs::SegmentPath;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::logical_name;
use crate::error::Result;

/// Run the compare command
pub async fn run_compare(
    first: PathBuf,
    second: PathBuf,
    name: Option<String>,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let name = logical_name(name, &first)?;
    let engine = SyncEngine::new([first.clone(), second.clone()]).named(name);
    let result = engine.compare(cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&result))?);
        return Ok(());
    }

    println!(
        "Comparing '{}' to '{}' ...",
        first.display(),
        second.display()
    );
    print_section("Contents from first directory", result.sorted_only_in_a());
    print_section("Contents from second directory", result.sorted_only_in_b());
    print_section("Contents in both directories", result.sorted_in_both());
    Ok(())
}

fn print_section(heading: &str, paths: Vec<&SegmentPath>) {
    println!("{heading}");
    if paths.is_empty() {
        println!("\tNo contents");
    }
    for path in paths {
        println!("\t{path}");
    }
}

fn to_json(result: &DiffResult) -> serde_json::Value {
    json!({
        "only_in_a": result.sorted_only_in_a(),
        "only_in_b": result.sorted_only_in_b(),
        "in_both": result.sorted_in_both(),
        "identical": result.is_identical(),
    })
}
