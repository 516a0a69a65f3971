use anyhow::{bail, Context, Result};
use regnie::{LineEnding, RegnieRaster};
use std::path::PathBuf;

pub fn run(raster: PathBuf) -> Result<()> {
    if !raster.exists() {
        bail!("Raster not found: {}", raster.display());
    }

    let grid = RegnieRaster::from_file(&raster).context("Failed to load raster")?;
    let stats = grid.stats().context("Failed to read raster values")?;
    let geometry = grid.geometry();
    let extent = geometry.extent();

    let name = raster
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raster.display().to_string());

    let line_ending = match grid.line_ending() {
        LineEnding::Lf => "LF (\\n)",
        LineEnding::CrLf => "CRLF (\\r\\n)",
        LineEnding::Auto => "unknown",
    };

    println!("Raster: {}", name);
    println!("Path: {}", raster.display());
    println!();
    println!(
        "Grid: {} columns x {} rows ({} cells)",
        geometry.width,
        geometry.height,
        geometry.cells()
    );
    println!("Line ending: {}", line_ending);
    println!(
        "Cell centers: {:.6}N to {:.6}N, {:.6}E to {:.6}E",
        extent.south, extent.north, extent.west, extent.east
    );
    println!("File size: {}", format_size(grid.size() as u64));
    println!();

    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        println!("Min value: {}", min);
        println!("Max value: {}", max);
    }

    if stats.missing > 0 {
        println!(
            "Missing cells: {} ({:.1}%)",
            stats.missing,
            stats.missing_ratio() * 100.0
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
