//! Text resources read and written by the simulation.
//!
//! Every reader takes any `R: Read`, skips blank lines and `#` comments, and
//! reports malformed content as [`HydroSieveError::MeshIoParse`] with the
//! offending line number.

pub mod boundary_description;
pub mod cell_values;
pub mod forcing;
pub mod geo;
pub mod gnuplot;
pub mod initial_state;
pub mod result;
pub mod vtk;

pub use boundary_description::read_boundary_description;
pub use cell_values::{read_id_values, read_id_values_path};
pub use forcing::{ForcingFiles, read_forcing_series};
pub use geo::{GeoMesh, GeoMeshReader};
pub use initial_state::read_initial_state;
pub use result::{OutputMode, ResultSink, ResultWriter};

use crate::mesh_error::HydroSieveError;
use std::io::Read;
use std::str::FromStr;

/// Cursor over the non-blank, non-comment lines of a text resource.
pub(crate) struct RelevantLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> RelevantLines<'a> {
    pub(crate) fn new(contents: &'a str) -> Self {
        Self {
            inner: contents.lines().enumerate(),
        }
    }

    /// Next relevant line as `(1-based line number, tokens)`.
    ///
    /// Anything after a `#` is a comment.
    pub(crate) fn next_tokens(&mut self) -> Option<(usize, Vec<&'a str>)> {
        for (idx, line) in self.inner.by_ref() {
            let content = line.split('#').next().unwrap_or_default();
            let tokens: Vec<&str> = content.split_whitespace().collect();
            if !tokens.is_empty() {
                return Some((idx + 1, tokens));
            }
        }
        None
    }

    /// Like [`Self::next_tokens`] but end of input is an error.
    pub(crate) fn expect_tokens(&mut self, what: &str) -> Result<(usize, Vec<&'a str>), HydroSieveError> {
        self.next_tokens()
            .ok_or_else(|| HydroSieveError::MeshIoParse(format!("unexpected end of input, expected {what}")))
    }
}

pub(crate) fn read_all<R: Read>(mut reader: R) -> Result<String, HydroSieveError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse token `idx` of a line, naming `what` in the error.
pub(crate) fn parse_token<T: FromStr>(
    tokens: &[&str],
    idx: usize,
    what: &str,
    line: usize,
) -> Result<T, HydroSieveError> {
    let raw = tokens
        .get(idx)
        .ok_or_else(|| HydroSieveError::MeshIoParse(format!("line {line}: missing {what}")))?;
    raw.parse::<T>()
        .map_err(|_| HydroSieveError::MeshIoParse(format!("line {line}: invalid {what}: {raw}")))
}

/// Parse token `idx` if present.
pub(crate) fn parse_optional<T: FromStr>(
    tokens: &[&str],
    idx: usize,
    what: &str,
    line: usize,
) -> Result<Option<T>, HydroSieveError> {
    if idx < tokens.len() {
        parse_token(tokens, idx, what, line).map(Some)
    } else {
        Ok(None)
    }
}
