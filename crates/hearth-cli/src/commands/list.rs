//! List command implementation

use std::path::Path;

use colored::Colorize;
use hearth_core::{Central, Device, Error as CoreError};
use sysinfo::Disks;

use crate::error::Result;

/// Every disk mounted right now.
///
/// Disks that report no name are named after their mount point.
pub fn mounted_devices() -> Vec<Device> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .map(|disk| {
            let name = disk.name().to_string_lossy().into_owned();
            let mountpoint = disk.mount_point().to_path_buf();
            Device {
                name: if name.is_empty() {
                    mountpoint.display().to_string()
                } else {
                    name
                },
                mountpoint,
            }
        })
        .collect()
}

/// Run the list command
pub fn run_list(central_path: &Path, devices: bool) -> Result<()> {
    if devices {
        println!("{}", "Mounted devices:".bold());
        let mounted = mounted_devices();
        if mounted.is_empty() {
            println!("   {}", "none detected".dimmed());
        }
        for device in mounted {
            println!(
                "   {} {} {}",
                "-".cyan(),
                device.name,
                device.mountpoint.display().to_string().dimmed()
            );
        }
        return Ok(());
    }

    let central = match Central::load(central_path) {
        Ok(central) => central,
        Err(CoreError::ConfigNotFound { .. }) => {
            println!(
                "Current system is uninitialized. Run {} first.",
                "hearth init".cyan()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Hearths:".bold());
    if central.hearths.is_empty() {
        println!("   {}", "none tracked".dimmed());
    }
    for info in central.hearths.values() {
        println!("   {} {}", "*".green(), info.name.bold());
        if !info.description.is_empty() {
            println!("     {}", info.description.dimmed());
        }
        for (name, path) in &info.sources {
            let marker = if *name == info.primary_source {
                " (primary)".yellow().to_string()
            } else {
                String::new()
            };
            println!("     {name}: {}{marker}", path.display());
        }
    }

    println!();
    println!("{}", "Devices:".bold());
    for device in central.devices.values() {
        println!(
            "   {} {} {}",
            "-".cyan(),
            device.name,
            device.mountpoint.display().to_string().dimmed()
        );
    }

    println!();
    println!("Last modified: {}", central.last_modified.to_rfc3339());
    match central.last_synced {
        Some(at) => println!("Last synced:   {}", at.to_rfc3339()),
        None => println!("Last synced:   {}", "never".dimmed()),
    }
    Ok(())
}
