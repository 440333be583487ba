//! Reader for `id value` tables (Manning patches, cell bed elevations).
//!
//! The resource holds an entry count followed by that many `id value` lines.

use crate::io::{RelevantLines, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use std::io::Read;
use std::path::Path;

/// Read every `id value` pair, in file order.
pub fn read_id_values<R: Read>(reader: R) -> Result<Vec<(i64, f64)>, HydroSieveError> {
    let contents = read_all(reader)?;
    let mut lines = RelevantLines::new(&contents);
    let (line, t) = lines.expect_tokens("entry count")?;
    let count: usize = parse_token(&t, 0, "entry count", line)?;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, t) = lines.expect_tokens("id value entry")?;
        values.push((parse_token(&t, 0, "id", line)?, parse_token(&t, 1, "value", line)?));
    }
    Ok(values)
}

/// [`read_id_values`] on a file.
pub fn read_id_values_path(path: impl AsRef<Path>) -> Result<Vec<(i64, f64)>, HydroSieveError> {
    let path = path.as_ref();
    log::debug!("reading id/value table {}", path.display());
    read_id_values(std::io::BufReader::new(std::fs::File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_declared_entries() {
        let text = "# land uses\n2\n1 0.03\n2   0.05 # forest\n";
        assert_eq!(read_id_values(text.as_bytes()).unwrap(), vec![(1, 0.03), (2, 0.05)]);
    }

    #[test]
    fn short_table_is_an_error() {
        assert!(matches!(
            read_id_values("3\n1 0.1\n".as_bytes()),
            Err(HydroSieveError::MeshIoParse(_))
        ));
    }
}
