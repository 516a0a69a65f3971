use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regnie::{
    convert::is_same_file, convert_with_progress, filename::output_path, ConvertOptions,
    LineEnding, OutputSchema,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub fn run(
    raster: PathBuf,
    all: bool,
    join: bool,
    output: Option<PathBuf>,
    line_ending: LineEnding,
    quiet: bool,
) -> Result<()> {
    if !raster.exists() {
        bail!("REGNIE input file '{}' not found", raster.display());
    }
    if !raster.is_file() {
        bail!("REGNIE input '{}' is not a file", raster.display());
    }

    let schema = if join {
        OutputSchema::Join
    } else {
        OutputSchema::Full
    };
    let options = ConvertOptions {
        skip_missing: !all,
        schema,
        line_ending,
        ..ConvertOptions::default()
    };

    if all {
        println!("Writing all cells, missing values as -1.");
        println!("Note: this produces a larger output file.");
    }

    let csv_path = output.unwrap_or_else(|| output_path(&raster, schema));
    if is_same_file(&raster, &csv_path) {
        bail!(
            "Output path '{}' is the input raster; choose another output file",
            csv_path.display()
        );
    }

    // Nothing at the output path is touched until the input is open.
    let input = File::open(&raster)
        .with_context(|| format!("Failed to open input file {}", raster.display()))?;
    let output = File::create(&csv_path)
        .with_context(|| format!("Failed to create output file {}", csv_path.display()))?;

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(options.geometry.height as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})",
            )?
            .progress_chars("#>-"),
    );

    tracing::debug!(
        input = %raster.display(),
        output = %csv_path.display(),
        skip_missing = options.skip_missing,
        schema = ?options.schema,
        line_ending = %options.line_ending,
        "Converting raster"
    );

    let result = convert_with_progress(input, BufWriter::new(output), &options, |_| pb.inc(1));
    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon();
            // The file at csv_path was created by this run.
            remove_partial_output(&csv_path);
            return Err(e).with_context(|| format!("Failed to convert {}", raster.display()));
        }
    };
    pb.finish_and_clear();

    tracing::info!(
        output = %csv_path.display(),
        records = stats.records,
        missing = stats.missing,
        "CSV written"
    );

    println!("-> {}", csv_path.display());
    println!();
    println!("Values are written as integers; mind the scaling of the product!");
    println!("Monthly and yearly precipitation totals are in mm, daily totals in mm/10.");

    Ok(())
}

fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "Removed partial output file"),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Could not remove partial output file"
        ),
    }
}
