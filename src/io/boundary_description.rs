//! Reader for the boundary-condition description.
//!
//! The resource starts with the number of described groups, followed by one
//! `group namespace [args...]` line per group.

use crate::boundary::BoundaryDescription;
use crate::io::{RelevantLines, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use std::io::Read;

pub fn read_boundary_description<R: Read>(reader: R) -> Result<BoundaryDescription, HydroSieveError> {
    let contents = read_all(reader)?;
    let mut lines = RelevantLines::new(&contents);
    let (line, t) = lines.expect_tokens("boundary condition count")?;
    let count: usize = parse_token(&t, 0, "boundary condition count", line)?;

    let mut description = BoundaryDescription::new();
    for _ in 0..count {
        let (line, t) = lines.expect_tokens("boundary condition record")?;
        let group: u32 = parse_token(&t, 0, "group number", line)?;
        let namespace = t
            .get(1)
            .ok_or_else(|| HydroSieveError::MeshIoParse(format!("line {line}: missing namespace")))?;
        let args = t[2..].iter().map(|s| s.to_string()).collect();
        description.insert(group, *namespace, args)?;
    }
    Ok(description)
}
