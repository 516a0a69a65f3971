//! Output filename utilities.
//!
//! The CSV output sits next to the raster file: same directory, same base
//! name with the extension stripped, followed by a schema suffix.
//!
//! | Schema | Suffix |
//! |--------|--------|
//! | Full   | `_full.csv` |
//! | Join   | `_join.csv` |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::convert::OutputSchema;

/// Suffix of full-schema output files.
pub const FULL_SUFFIX: &str = "_full.csv";

/// Suffix of join-schema output files.
pub const JOIN_SUFFIX: &str = "_join.csv";

/// Returns the filename suffix for a schema.
pub fn suffix(schema: OutputSchema) -> &'static str {
    match schema {
        OutputSchema::Full => FULL_SUFFIX,
        OutputSchema::Join => JOIN_SUFFIX,
    }
}

/// Derive the CSV output path for a raster file.
///
/// Only the last extension is removed.
///
/// # Examples
///
/// ```
/// use regnie::filename::output_path;
/// use regnie::OutputSchema;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     output_path("data/ra050120.asc", OutputSchema::Full),
///     PathBuf::from("data/ra050120_full.csv")
/// );
/// assert_eq!(
///     output_path("ra0501m", OutputSchema::Join),
///     PathBuf::from("ra0501m_join.csv")
/// );
/// ```
pub fn output_path<P: AsRef<Path>>(input: P, schema: OutputSchema) -> PathBuf {
    let input = input.as_ref();
    let mut name: OsString = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("regnie"));
    name.push(suffix(schema));
    input.with_file_name(name)
}
