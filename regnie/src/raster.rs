//! Random access to a whole REGNIE raster file.
//!
//! [`RegnieRaster`] memory-maps a raster file and reads single cells by
//! offset. The row terminator width is detected from the file size, so the
//! file must hold exactly one full grid.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{RegnieError, Result};
use crate::grid::{GridGeometry, GridIndex};
use crate::reader::{parse_field, LineEnding, FIELD_WIDTH};

/// Summary of the values in a raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Total number of cells.
    pub cells: u64,
    /// Number of missing cells.
    pub missing: u64,
    /// Smallest measured value, if any cell is measured.
    pub min: Option<i32>,
    /// Largest measured value, if any cell is measured.
    pub max: Option<i32>,
}

impl RasterStats {
    /// Fraction of missing cells (0.0 to 1.0).
    pub fn missing_ratio(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            self.missing as f64 / self.cells as f64
        }
    }
}

/// A memory-mapped REGNIE raster for cell lookups.
///
/// # Example
///
/// ```ignore
/// use regnie::RegnieRaster;
///
/// let raster = RegnieRaster::from_file("ra050120")?;
/// if let Some(value) = raster.value_at(51.34, 12.37)? {
///     println!("Precipitation: {}", value);
/// }
/// ```
pub struct RegnieRaster {
    data: Mmap,
    geometry: GridGeometry,
    /// Detected terminator layout, `Lf` or `CrLf`
    line_ending: LineEnding,
}

impl RegnieRaster {
    /// Load a REGNIE raster file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be memory-mapped
    /// - The file size doesn't match a 611×971 grid with `\n` or `\r\n` rows
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_geometry(path, GridGeometry::REGNIE)
    }

    /// Load a raster file laid out according to `geometry`.
    pub fn from_file_with_geometry<P: AsRef<Path>>(path: P, geometry: GridGeometry) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RegnieError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. We open the file read-only and don't expose the mapping.
        let mmap = unsafe { Mmap::map(&file)? };

        let line_ending = detect_line_ending(mmap.len(), &geometry)
            .ok_or(RegnieError::InvalidFileSize { size: mmap.len() })?;

        tracing::debug!(
            path = %path.display(),
            size = mmap.len(),
            line_ending = %line_ending,
            "Mapped raster"
        );

        Ok(Self {
            data: mmap,
            geometry,
            line_ending,
        })
    }

    /// Value of a cell, or `None` if the cell is missing.
    ///
    /// # Errors
    ///
    /// Returns [`RegnieError::InvalidIndex`] if the index is outside the grid
    /// and [`RegnieError::MalformedRaster`] if the field does not parse.
    pub fn value(&self, index: GridIndex) -> Result<Option<i32>> {
        if !self.geometry.contains(index) {
            return Err(RegnieError::InvalidIndex {
                row: index.row,
                column: index.column,
            });
        }

        let offset = (index.row - 1) * self.row_stride() + (index.column - 1) * FIELD_WIDTH;
        let field = &self.data[offset..offset + FIELD_WIDTH];
        let value = parse_field(field).map_err(|reason| RegnieError::MalformedRaster {
            row: index.row,
            column: index.column,
            reason,
        })?;

        Ok((value >= 0).then_some(value))
    }

    /// Value of the cell whose center is nearest to `(lat, lon)`.
    ///
    /// # Errors
    ///
    /// Returns [`RegnieError::OutOfBounds`] if the point lies outside the grid.
    pub fn value_at(&self, lat: f64, lon: f64) -> Result<Option<i32>> {
        let index = self.geometry.cell_at(lat, lon)?;
        self.value(index)
    }

    /// Scan every cell and summarize the values.
    pub fn stats(&self) -> Result<RasterStats> {
        let mut stats = RasterStats::default();

        for row in 1..=self.geometry.height {
            for column in 1..=self.geometry.width {
                stats.cells += 1;
                match self.value(GridIndex::new(row, column))? {
                    Some(value) => {
                        stats.min = Some(stats.min.map_or(value, |m| m.min(value)));
                        stats.max = Some(stats.max.map_or(value, |m| m.max(value)));
                    }
                    None => stats.missing += 1,
                }
            }
        }

        Ok(stats)
    }

    /// Returns the grid geometry.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Returns the detected row terminator (`Lf` or `CrLf`).
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Size of the mapped file in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn row_stride(&self) -> usize {
        self.geometry.width * FIELD_WIDTH + self.line_ending.width().unwrap_or(1)
    }
}

/// Match a file size against the layouts of `geometry`, with or without a
/// terminator after the last row.
fn detect_line_ending(size: usize, geometry: &GridGeometry) -> Option<LineEnding> {
    [LineEnding::Lf, LineEnding::CrLf]
        .into_iter()
        .find(|line_ending| {
            let terminator = line_ending.width().unwrap_or(1);
            let full = geometry.height * (geometry.width * FIELD_WIDTH + terminator);
            size == full || size + terminator == full
        })
}
