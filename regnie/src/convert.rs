//! Conversion of REGNIE rasters into GIS-ready CSV.
//!
//! Two output schemas are supported:
//!
//! - [`OutputSchema::Full`]: `LAT,LON,ID,VAL`, one row per cell with the
//!   geographic center of the cell.
//! - [`OutputSchema::Join`]: `ID,VAL`, meant to be joined against a REGNIE
//!   polygon dataset keyed by the same id sequence.
//!
//! Ids start at 1 and count emitted records only. With missing values
//! skipped, ids are therefore *not* cell positions, but they are stable for
//! identical input and options.
//!
//! Missing cells are written as [`CSV_MISSING_VALUE`] when they are not
//! skipped. Values are passed through unscaled.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{RegnieError, Result};
use crate::grid::GridGeometry;
use crate::reader::{LineEnding, RasterReader};

/// Value written for an unmeasured cell.
pub const CSV_MISSING_VALUE: i32 = -1;

/// Header of the full schema.
pub const FULL_HEADER: [&str; 4] = ["LAT", "LON", "ID", "VAL"];

/// Header of the join schema.
pub const JOIN_HEADER: [&str; 2] = ["ID", "VAL"];

/// Layout of the CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSchema {
    /// Coordinates, id and value.
    #[default]
    Full,
    /// Id and value only.
    Join,
}

impl OutputSchema {
    /// Column names written as the first line.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            OutputSchema::Full => &FULL_HEADER,
            OutputSchema::Join => &JOIN_HEADER,
        }
    }
}

/// Options for a single conversion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Grid dimensions and coordinate origin.
    pub geometry: GridGeometry,
    /// Drop missing cells instead of writing them as [`CSV_MISSING_VALUE`].
    pub skip_missing: bool,
    /// Output layout.
    pub schema: OutputSchema,
    /// Row terminator handling of the input.
    pub line_ending: LineEnding,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::REGNIE,
            skip_missing: true,
            schema: OutputSchema::Full,
            line_ending: LineEnding::Auto,
        }
    }
}

/// Counters from a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Cells read from the raster.
    pub cells: u64,
    /// Data records written (header excluded).
    pub records: u64,
    /// Cells holding a missing value, whether skipped or written.
    pub missing: u64,
}

/// Convert a raster stream into CSV.
///
/// # Errors
///
/// Fails on the first malformed or truncated field and on any write error.
/// Output written up to that point is left in `output`.
///
/// # Example
///
/// ```
/// use regnie::{convert, ConvertOptions, GridGeometry, OutputSchema};
///
/// let options = ConvertOptions {
///     geometry: GridGeometry { width: 2, height: 1, ..GridGeometry::REGNIE },
///     schema: OutputSchema::Join,
///     ..ConvertOptions::default()
/// };
///
/// let mut csv = Vec::new();
/// let stats = convert(&b"-999  42\n"[..], &mut csv, &options).unwrap();
///
/// assert_eq!(String::from_utf8(csv).unwrap(), "ID,VAL\n1,42\n");
/// assert_eq!(stats.missing, 1);
/// ```
pub fn convert<R: Read, W: Write>(
    input: R,
    output: W,
    options: &ConvertOptions,
) -> Result<ConvertStats> {
    convert_with_progress(input, output, options, |_| {})
}

/// Like [`convert`], calling `on_row` with the 1-based row number after each
/// completed row.
pub fn convert_with_progress<R, W, F>(
    input: R,
    output: W,
    options: &ConvertOptions,
    mut on_row: F,
) -> Result<ConvertStats>
where
    R: Read,
    W: Write,
    F: FnMut(usize),
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(output);
    writer.write_record(options.schema.header())?;

    let geometry = options.geometry;
    let mut stats = ConvertStats::default();
    let mut id: u64 = 1;

    for cell in RasterReader::new(input, geometry, options.line_ending) {
        let cell = cell?;
        stats.cells += 1;

        let missing = cell.is_missing();
        if missing {
            stats.missing += 1;
        }

        if !(missing && options.skip_missing) {
            let value = if missing {
                CSV_MISSING_VALUE
            } else {
                cell.value
            };

            match options.schema {
                OutputSchema::Full => {
                    let (lat, lon) = geometry.cell_center(cell.index);
                    writer.write_record(&[
                        format!("{:.6}", lat),
                        format!("{:.6}", lon),
                        id.to_string(),
                        value.to_string(),
                    ])?;
                }
                OutputSchema::Join => {
                    writer.write_record(&[id.to_string(), value.to_string()])?;
                }
            }

            id += 1;
            stats.records += 1;
        }

        if cell.index.column == geometry.width {
            on_row(cell.index.row);
        }
    }

    writer.flush()?;
    Ok(stats)
}

/// Convert a raster file into a CSV file, creating or overwriting `output`.
///
/// # Errors
///
/// Returns [`RegnieError::FileNotFound`] if `input` does not exist,
/// [`RegnieError::OutputIsInput`] if `output` resolves to `input`, plus any
/// error from [`convert`].
pub fn convert_file<P, Q>(input: P, output: Q, options: &ConvertOptions) -> Result<ConvertStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    convert_file_with_progress(input, output, options, |_| {})
}

/// Like [`convert_file`], reporting completed rows to `on_row`.
pub fn convert_file_with_progress<P, Q, F>(
    input: P,
    output: Q,
    options: &ConvertOptions,
    on_row: F,
) -> Result<ConvertStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(usize),
{
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(RegnieError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    if is_same_file(input, output) {
        return Err(RegnieError::OutputIsInput {
            path: output.to_path_buf(),
        });
    }

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        skip_missing = options.skip_missing,
        schema = ?options.schema,
        line_ending = %options.line_ending,
        "Converting raster"
    );

    let reader = File::open(input)?;
    let writer = BufWriter::new(File::create(output)?);
    let stats = convert_with_progress(reader, writer, options, on_row)?;

    tracing::info!(
        cells = stats.cells,
        records = stats.records,
        missing = stats.missing,
        "Conversion finished"
    );

    Ok(stats)
}

/// Whether both paths resolve to the same existing file.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
