//! Looking up template structures and their release dates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use foldprep_core::utils::read_to_string;
use tracing::debug;

use crate::consts::{DEPOSITION_DATE_ITEM, MMCIF_DATE_FORMAT, MMCIF_EXTENSIONS, REVISION_DATE_ITEM};
use crate::errors::{Result, TemplateError};

///
/// Source of template structures, addressed by PDB id.
///
pub trait StructureStore: Send + Sync {
    /// Release date of an entry, if the entry records one.
    fn release_date(&self, pdb_id: &str) -> Result<Option<NaiveDate>>;

    /// The full mmCIF text of an entry.
    fn get_mmcif(&self, pdb_id: &str) -> Result<String>;
}

///
/// A directory of mmCIF files named `<pdb_id>.cif` or `<pdb_id>.cif.gz`.
///
/// Release dates are read from the file once and remembered.
///
#[derive(Debug)]
pub struct DirectoryStructureStore {
    directory: PathBuf,
    release_dates: Mutex<HashMap<String, Option<NaiveDate>>>,
}

impl DirectoryStructureStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            release_dates: Mutex::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn find(&self, pdb_id: &str) -> Result<PathBuf> {
        let stem = pdb_id.to_ascii_lowercase();
        MMCIF_EXTENSIONS
            .iter()
            .map(|ext| self.directory.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| TemplateError::StructureNotFound(pdb_id.to_string()))
    }
}

impl StructureStore for DirectoryStructureStore {
    fn release_date(&self, pdb_id: &str) -> Result<Option<NaiveDate>> {
        let key = pdb_id.to_ascii_lowercase();
        if let Some(date) = self
            .release_dates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*date);
        }

        let date = parse_release_date(&self.get_mmcif(pdb_id)?);
        debug!("Release date of {}: {:?}", key, date);
        self.release_dates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, date);
        Ok(date)
    }

    fn get_mmcif(&self, pdb_id: &str) -> Result<String> {
        let path = self.find(pdb_id)?;
        read_to_string(&path).map_err(|e| TemplateError::StructureUnreadable {
            id: pdb_id.to_string(),
            message: format!("{:#}", e),
        })
    }
}

///
/// Release date of an mmCIF entry: the earliest revision date, or the initial
/// deposition date when there is no revision history.
///
pub fn parse_release_date(mmcif: &str) -> Option<NaiveDate> {
    let parse = |value: &String| NaiveDate::parse_from_str(value, MMCIF_DATE_FORMAT).ok();
    item_values(mmcif, REVISION_DATE_ITEM)
        .iter()
        .filter_map(parse)
        .min()
        .or_else(|| item_values(mmcif, DEPOSITION_DATE_ITEM).iter().find_map(parse))
}

///
/// All values of one mmCIF data item, whether written as a single `key value`
/// pair or as a column of a `loop_`.
///
fn item_values(mmcif: &str, item: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut lines = mmcif.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line == "loop_" {
            let mut columns: Vec<&str> = Vec::new();
            while let Some(&next) = lines.peek() {
                let next = next.trim();
                if !next.starts_with('_') {
                    break;
                }
                columns.push(next.split_whitespace().next().unwrap_or(next));
                lines.next();
            }
            let column = columns.iter().position(|c| *c == item);

            let mut row: Vec<String> = Vec::new();
            while let Some(&next) = lines.peek() {
                let trimmed = next.trim();
                if trimmed.starts_with('_')
                    || trimmed.starts_with('#')
                    || trimmed.starts_with("loop_")
                    || trimmed.starts_with("data_")
                {
                    break;
                }
                lines.next();
                match next.strip_prefix(';') {
                    // multi-line text field, closed by a line starting with `;`
                    Some(first) => {
                        let mut text = first.to_string();
                        for continuation in lines.by_ref() {
                            if continuation.starts_with(';') {
                                break;
                            }
                            text.push('\n');
                            text.push_str(continuation);
                        }
                        row.push(text);
                    }
                    None => row.extend(tokenize(trimmed).into_iter().map(str::to_string)),
                }
                while !columns.is_empty() && row.len() >= columns.len() {
                    if let Some(column) = column {
                        values.push(row[column].clone());
                    }
                    row.drain(..columns.len());
                }
            }
        } else if let Some(rest) = line.strip_prefix(item) {
            if rest.starts_with(char::is_whitespace) {
                if let Some(value) = tokenize(rest).first() {
                    values.push(value.to_string());
                }
            }
        }
    }
    values
}

///
/// Split an mmCIF data line into tokens. Quoted tokens may contain spaces; a
/// quote only closes a token when followed by whitespace or the end of the line.
///
fn tokenize(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if bytes[i] == b'\'' || bytes[i] == b'"' {
            let quote = bytes[i];
            let start = i + 1;
            let mut end = start;
            while end < bytes.len()
                && !(bytes[end] == quote && (end + 1 == bytes.len() || bytes[end + 1].is_ascii_whitespace()))
            {
                end += 1;
            }
            tokens.push(&line[start..end]);
            i = end + 1;
        } else {
            let start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            tokens.push(&line[start..i]);
        }
    }
    tokens
}
