//! Streaming decoder for REGNIE raster files.
//!
//! A REGNIE file stores the grid row by row from north to south, each row
//! west to east, as 4-character fixed-width integers. Rows are separated by
//! a line terminator. Unmeasured cells hold the sentinel [`MISSING_VALUE`].
//!
//! [`RasterReader`] walks the file in a single pass and yields one [`Cell`]
//! per grid point, without seeking.

use std::fmt;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::str::FromStr;

use crate::error::{RegnieError, Result};
use crate::grid::{GridGeometry, GridIndex};

/// Width of one value field in characters.
pub const FIELD_WIDTH: usize = 4;

/// Sentinel marking an unmeasured cell in the raster file.
pub const MISSING_VALUE: i32 = -999;

/// How rows are terminated in the raster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// One character after each row (`\n`).
    Lf,
    /// Two characters after each row (`\r\n`).
    CrLf,
    /// `\n`, `\r\n` or a lone `\r`.
    #[default]
    Auto,
}

impl LineEnding {
    /// Number of bytes in a terminator, if fixed.
    pub fn width(&self) -> Option<usize> {
        match self {
            LineEnding::Lf => Some(1),
            LineEnding::CrLf => Some(2),
            LineEnding::Auto => None,
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineEnding::Lf => "lf",
            LineEnding::CrLf => "crlf",
            LineEnding::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" | "unix" => Ok(LineEnding::Lf),
            "crlf" | "windows" => Ok(LineEnding::CrLf),
            "auto" => Ok(LineEnding::Auto),
            other => Err(format!(
                "unknown line ending '{}' (expected auto, lf or crlf)",
                other
            )),
        }
    }
}

/// One decoded grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub index: GridIndex,
    pub value: i32,
}

impl Cell {
    /// Whether the cell is unmeasured.
    ///
    /// Valid measurements are never negative, so any negative value counts,
    /// not only [`MISSING_VALUE`].
    pub fn is_missing(&self) -> bool {
        self.value < 0
    }
}

/// Parse one fixed-width field into an integer.
///
/// Surrounding blanks are ignored, so `" -12"` and `"  7 "` are valid.
pub fn parse_field(field: &[u8]) -> std::result::Result<i32, String> {
    let text = std::str::from_utf8(field).map_err(|_| "field is not valid text".to_string())?;
    text.trim()
        .parse::<i32>()
        .map_err(|e| format!("cannot parse '{}' as integer: {}", text, e))
}

/// Iterator over the cells of a raster stream in row-major order.
///
/// Yields exactly `geometry.cells()` items on a well-formed stream. The first
/// error ends the iteration.
///
/// # Example
///
/// ```
/// use regnie::{GridGeometry, LineEnding, RasterReader};
///
/// let geometry = GridGeometry { width: 2, height: 1, ..GridGeometry::REGNIE };
/// let data = b"  12-999\n";
/// let cells: Vec<_> = RasterReader::new(&data[..], geometry, LineEnding::Lf)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(cells[0].value, 12);
/// assert!(cells[1].is_missing());
/// ```
pub struct RasterReader<R: Read> {
    inner: BufReader<R>,
    geometry: GridGeometry,
    line_ending: LineEnding,
    row: usize,
    column: usize,
    /// A row was completed and its terminator is still unread.
    pending_terminator: bool,
    failed: bool,
}

impl<R: Read> RasterReader<R> {
    pub fn new(reader: R, geometry: GridGeometry, line_ending: LineEnding) -> Self {
        Self {
            inner: BufReader::new(reader),
            geometry,
            line_ending,
            row: 1,
            column: 1,
            pending_terminator: false,
            failed: false,
        }
    }

    /// Returns the geometry this reader walks.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn read_cell(&mut self) -> Result<Cell> {
        if self.pending_terminator {
            self.skip_terminator()?;
            self.pending_terminator = false;
        }

        let index = GridIndex::new(self.row, self.column);
        let mut field = [0u8; FIELD_WIDTH];
        self.inner.read_exact(&mut field).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                RegnieError::TruncatedRaster {
                    row: index.row,
                    column: index.column,
                }
            } else {
                RegnieError::Io(e)
            }
        })?;

        let value = parse_field(&field).map_err(|reason| RegnieError::MalformedRaster {
            row: index.row,
            column: index.column,
            reason,
        })?;

        if self.column == self.geometry.width {
            self.column = 1;
            self.row += 1;
            self.pending_terminator = true;
        } else {
            self.column += 1;
        }

        Ok(Cell { index, value })
    }

    /// End of stream while skipping is fine: the last row may lack a terminator.
    fn skip_terminator(&mut self) -> Result<()> {
        match self.line_ending {
            LineEnding::Lf | LineEnding::CrLf => {
                let width = self.line_ending.width().unwrap_or(1);
                for _ in 0..width {
                    if self.read_byte()?.is_none() {
                        break;
                    }
                }
            }
            LineEnding::Auto => {
                if self.read_byte()? == Some(b'\r') && self.peek_byte()? == Some(b'\n') {
                    self.inner.consume(1);
                }
            }
        }
        Ok(())
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for RasterReader<R> {
    type Item = Result<Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.row > self.geometry.height {
            return None;
        }

        let cell = self.read_cell();
        if cell.is_err() {
            self.failed = true;
        }
        Some(cell)
    }
}
