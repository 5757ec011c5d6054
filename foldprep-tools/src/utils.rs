use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use foldprep_msa::consts::QUERY_DESCRIPTION;

use crate::config::DatabaseConfig;
use crate::errors::{Result, SearchToolError};

pub(crate) fn check_database(database: &DatabaseConfig) -> Result<()> {
    if database.path.exists() {
        Ok(())
    } else {
        Err(SearchToolError::DatabaseMissing {
            name: database.name.clone(),
            path: database.path.clone(),
        })
    }
}

pub(crate) fn write_query_fasta(path: &Path, sequence: &str) -> Result<()> {
    write_fasta(path, [(QUERY_DESCRIPTION, sequence)])
}

pub(crate) fn write_fasta<'a>(path: &Path, records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
    let mut fasta = String::new();
    for (name, sequence) in records {
        fasta.push('>');
        fasta.push_str(name);
        fasta.push('\n');
        fasta.push_str(sequence);
        fasta.push('\n');
    }
    fs::write(path, fasta)?;
    Ok(())
}

/// Read a file a tool was asked to write. A missing file means the tool produced no output.
pub(crate) fn read_tool_output(tool: &str, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SearchToolError::Unparsable {
            tool: tool.to_string(),
            message: format!("no output written to {}", path.display()),
        },
        _ => SearchToolError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_fasta() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hits.fasta");
        write_fasta(&path, [("a", "ACGU"), ("b", "GGU")]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ">a\nACGU\n>b\nGGU\n");
    }

    #[rstest]
    fn test_missing_output_is_unparsable() {
        let dir = tempdir().unwrap();
        let err = read_tool_output("nhmmer", &dir.path().join("out.sto")).unwrap_err();
        assert!(matches!(err, SearchToolError::Unparsable { .. }));
    }
}
