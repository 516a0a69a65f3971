//! # REGNIE - Precipitation Raster Library
//!
//! Reads REGNIE precipitation rasters published by the German weather service
//! (DWD) and converts them into CSV tables that a GIS can load as point
//! layers or join against REGNIE polygons.
//!
//! ## Features
//!
//! - **Streaming**: Single-pass conversion without loading the grid into memory
//! - **Exact Coordinates**: Cell centers computed from the REGNIE grid definition
//! - **Two Schemas**: Full (`LAT,LON,ID,VAL`) and join (`ID,VAL`) output
//! - **Random Access**: Memory-mapped lookups of single cells by index or coordinate
//!
//! ## Quick Start
//!
//! ```ignore
//! use regnie::{convert_file, filename::output_path, ConvertOptions, OutputSchema};
//!
//! let options = ConvertOptions::default();
//! let output = output_path("ra050120", OutputSchema::Full);
//! let stats = convert_file("ra050120", &output, &options)?;
//! println!("{} records written to {}", stats.records, output.display());
//! ```
//!
//! ## REGNIE Data Format
//!
//! A REGNIE raster is a text file holding a fixed grid:
//!
//! - **611** columns west → east, 60 arc-seconds apart
//! - **971** rows north → south, 30 arc-seconds apart
//!
//! Each cell is a 4-character integer; rows end with a line terminator. The
//! value -999 marks unmeasured cells. Monthly and yearly totals are in mm,
//! daily totals in mm/10. Values are never rescaled by this library.

pub mod convert;
pub mod error;
pub mod filename;
pub mod grid;
pub mod raster;
pub mod reader;

// Re-export main types at crate root for convenience
pub use convert::{
    convert, convert_file, convert_file_with_progress, convert_with_progress, ConvertOptions,
    ConvertStats, OutputSchema, CSV_MISSING_VALUE,
};
pub use error::{RegnieError, Result};
pub use grid::{cell_center, GridGeometry, GridIndex};
pub use raster::{RasterStats, RegnieRaster};
pub use reader::{Cell, LineEnding, RasterReader, MISSING_VALUE};
