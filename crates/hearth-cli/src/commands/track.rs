//! Track command implementation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use colored::Colorize;
use hearth_core::{Central, Error as CoreError, HearthInfo};

use crate::error::{CliError, Result};

/// Run the track command
pub fn run_track(
    central_path: &Path,
    name: &str,
    primary: (String, PathBuf),
    sources: Vec<(String, PathBuf)>,
    description: &str,
) -> Result<()> {
    let mut central = match Central::load(central_path) {
        Ok(central) => central,
        Err(CoreError::ConfigNotFound { .. }) => {
            return Err(CliError::user(
                "Current system is uninitialized. Run 'hearth init' first.",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let (primary_name, primary_path) = primary;
    let mut all_sources = BTreeMap::from([(primary_name.clone(), primary_path)]);
    for (source, path) in sources {
        if all_sources.insert(source.clone(), path).is_some() {
            return Err(CliError::user(format!("Source '{source}' given twice")));
        }
    }

    let info = HearthInfo {
        name: name.to_string(),
        description: description.to_string(),
        primary_source: primary_name,
        sources: all_sources,
    };
    let source_count = info.sources.len();
    let replaced = central.track(info)?.is_some();
    central.save(false)?;

    let verb = if replaced { "Updated" } else { "Tracking" };
    println!(
        "{} {verb} hearth {} with {source_count} source(s)",
        "OK".green().bold(),
        name.cyan()
    );
    Ok(())
}
