use anyhow::{bail, Context, Result};
use regnie::{GridIndex, RegnieRaster};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct CellResponse {
    row: usize,
    column: usize,
    lat: f64,
    lon: f64,
    value: Option<i32>,
}

pub fn run(
    raster: PathBuf,
    lat: Option<f64>,
    lon: Option<f64>,
    row: Option<usize>,
    col: Option<usize>,
    json: bool,
) -> Result<()> {
    if !raster.exists() {
        bail!("Raster not found: {}", raster.display());
    }

    let grid = RegnieRaster::from_file(&raster).context("Failed to load raster")?;

    let index = match (lat, lon, row, col) {
        (Some(lat), Some(lon), _, _) => grid
            .geometry()
            .cell_at(lat, lon)
            .context("Coordinates outside the REGNIE grid")?,
        (_, _, Some(row), Some(col)) => GridIndex::new(row, col),
        _ => bail!("Specify a cell with --lat/--lon or --row/--col"),
    };

    let value = grid
        .value(index)
        .with_context(|| format!("Failed to read cell ({}, {})", index.row, index.column))?;
    let (center_lat, center_lon) = grid.geometry().cell_center(index);

    if json {
        let response = CellResponse {
            row: index.row,
            column: index.column,
            lat: center_lat,
            lon: center_lon,
            value,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match value {
            Some(value) => println!("{}", value),
            None => println!("missing"),
        }
    }

    Ok(())
}
