//! `facecap list`

use crate::error::Result;
use capture::DeviceListingEntry;
use logging::Logger;
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(preview_dir: Option<&Path>, logger: &Logger) -> Result<()> {
    let entries = capture::list_devices(logger.for_component("Devices"));

    if entries.is_empty() {
        println!("No capture devices found");
        return Ok(());
    }

    for (index, entry) in entries.iter().enumerate() {
        println!("{}", describe(index, entry));
    }

    if let Some(dir) = preview_dir {
        let written = save_previews(&entries, dir)?;
        for path in &written {
            println!("Preview written to {}", path.display());
        }
        logger.info(&format!("Saved {} preview(s) to {}", written.len(), dir.display()));
    }

    Ok(())
}

/// One human-readable block per device.
pub fn describe(index: usize, entry: &DeviceListingEntry) -> String {
    let resolutions = if entry.resolutions().is_empty() {
        "none".to_string()
    } else {
        entry
            .resolutions()
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let family = entry
        .family()
        .map(|f| f.to_string())
        .unwrap_or_else(|| "none".to_string());
    let chosen = entry
        .chosen()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "none".to_string());
    let preview = if entry.preview().is_empty() {
        "no preview".to_string()
    } else {
        let (w, h) = entry.preview().size();
        format!("preview {}x{}", w, h)
    };

    format!(
        "[{}] {}\n    format: {}\n    resolutions: {}\n    chosen: {} ({})",
        index,
        entry.name(),
        family,
        resolutions,
        chosen,
        preview
    )
}

/// Writes every non-empty preview as `device_<index>.png` under `dir`.
pub fn save_previews(entries: &[DeviceListingEntry], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.preview().is_empty() {
            continue;
        }
        let path = dir.join(format!("device_{}.png", index));
        entry.preview().save(&path)?;
        written.push(path);
    }
    Ok(written)
}
