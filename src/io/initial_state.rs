//! Reader for the initial `h u v` state.

use crate::data::CellState;
use crate::io::{RelevantLines, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use std::io::Read;

/// Read exactly `cells` `h u v` triples, in mesh cell order.
///
/// Extra lines after the last triple are ignored.
pub fn read_initial_state<R: Read>(reader: R, cells: usize) -> Result<Vec<CellState>, HydroSieveError> {
    let contents = read_all(reader)?;
    let mut lines = RelevantLines::new(&contents);
    let mut states = Vec::with_capacity(cells);
    while states.len() < cells {
        let Some((line, t)) = lines.next_tokens() else {
            return Err(HydroSieveError::InitialStateLength {
                expected: cells,
                found: states.len(),
            });
        };
        states.push(CellState {
            h: parse_token(&t, 0, "h", line)?,
            u: parse_token(&t, 1, "u", line)?,
            v: parse_token(&t, 2, "v", line)?,
        });
    }
    Ok(states)
}
