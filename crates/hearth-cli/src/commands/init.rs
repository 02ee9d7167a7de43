//! Init command implementation

use std::path::Path;

use colored::Colorize;
use hearth_core::Central;
use tracing::info;

use super::list::mounted_devices;
use crate::error::Result;

/// Run the init command
///
/// Hearths already in an existing registry are kept; the device table is
/// refreshed.
pub fn run_init(central_path: &Path) -> Result<()> {
    let mut central = if central_path.is_file() {
        Central::load(central_path)?
    } else {
        Central::new(central_path)
    };

    for device in mounted_devices() {
        central.add_device(device);
    }
    central.save(true)?;

    info!(path = %central_path.display(), "Initialized central registry");
    println!(
        "{} Initialized hearth into '{}'",
        "OK".green().bold(),
        central_path.display()
    );
    Ok(())
}
