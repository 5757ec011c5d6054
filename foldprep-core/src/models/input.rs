use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chain::Chain;
use crate::consts::{JSON_DIALECT, JSON_VERSION};
use crate::errors::{CoreError, Result};
use crate::utils::{get_dynamic_reader, get_dynamic_writer};

///
/// A fold input: an ordered list of chains plus the top-level metadata that
/// travels with them. Treated as an immutable value; processing produces a new
/// `FoldInput` via [`FoldInput::with_chains`].
///
#[derive(Debug, Clone, PartialEq)]
pub struct FoldInput {
    pub name: String,
    pub model_seeds: Vec<u64>,
    pub chains: Vec<Chain>,
    pub bonded_atom_pairs: Option<Value>,
    pub user_ccd: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoldInputJson {
    #[serde(default = "default_dialect")]
    dialect: String,
    #[serde(default = "default_version")]
    version: u32,
    name: String,
    #[serde(default)]
    model_seeds: Vec<u64>,
    sequences: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bonded_atom_pairs: Option<Value>,
    #[serde(default, rename = "userCCD", skip_serializing_if = "Option::is_none")]
    user_ccd: Option<String>,
}

fn default_dialect() -> String {
    JSON_DIALECT.to_string()
}

fn default_version() -> u32 {
    JSON_VERSION
}

impl FoldInput {
    pub fn new(name: impl Into<String>, chains: Vec<Chain>) -> Self {
        Self {
            name: name.into(),
            model_seeds: vec![1],
            chains,
            bonded_atom_pairs: None,
            user_ccd: None,
        }
    }

    ///
    /// Replace all chains, keeping the metadata. The original value is untouched.
    ///
    pub fn with_chains(&self, chains: Vec<Chain>) -> Self {
        Self {
            name: self.name.clone(),
            model_seeds: self.model_seeds.clone(),
            chains,
            bonded_atom_pairs: self.bonded_atom_pairs.clone(),
            user_ccd: self.user_ccd.clone(),
        }
    }

    ///
    /// Parse a fold input from its JSON text.
    ///
    /// A sequence entry whose `id` is a list is expanded into one chain per id,
    /// each carrying a copy of the entry's fields.
    ///
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FoldInputJson = serde_json::from_str(json)?;
        if raw.dialect != JSON_DIALECT {
            return Err(CoreError::UnsupportedDialect(raw.dialect));
        }

        let mut chains = Vec::with_capacity(raw.sequences.len());
        for entry in raw.sequences {
            chains.extend(expand_sequence_entry(entry)?);
        }

        let mut seen = HashSet::new();
        for chain in chains.iter() {
            if !seen.insert(chain.id().to_string()) {
                return Err(CoreError::DuplicateChainId(chain.id().to_string()));
            }
        }

        Ok(FoldInput {
            name: raw.name,
            model_seeds: raw.model_seeds,
            chains,
            bonded_atom_pairs: raw.bonded_atom_pairs,
            user_ccd: raw.user_ccd,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let sequences = self
            .chains
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let raw = FoldInputJson {
            dialect: JSON_DIALECT.to_string(),
            version: JSON_VERSION,
            name: self.name.clone(),
            model_seeds: self.model_seeds.clone(),
            sequences,
            bonded_atom_pairs: self.bonded_atom_pairs.clone(),
            user_ccd: self.user_ccd.clone(),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    ///
    /// Read a fold input from a (possibly gzip'd) JSON file.
    ///
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let mut json = String::new();
        get_dynamic_reader(path)?
            .read_to_string(&mut json)
            .with_context(|| format!("Failed to read fold input: {:?}", path))?;
        FoldInput::from_json(&json)
            .with_context(|| format!("Failed to parse fold input: {:?}", path))
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        let mut writer = get_dynamic_writer(path)?;
        writer
            .write_all(json.as_bytes())
            .with_context(|| format!("Failed to write fold input: {:?}", path))?;
        writer.flush()?;
        Ok(())
    }
}

fn expand_sequence_entry(entry: Value) -> Result<Vec<Chain>> {
    let Value::Object(map) = entry else {
        return Err(CoreError::InvalidEntry(format!(
            "expected an object, found {}",
            entry
        )));
    };
    if map.len() != 1 {
        return Err(CoreError::InvalidEntry(format!(
            "expected exactly one chain kind, found {:?}",
            map.keys().collect::<Vec<_>>()
        )));
    }
    let Some((kind, body)) = map.into_iter().next() else {
        return Ok(Vec::new());
    };

    let ids: Vec<String> = match body.get("id") {
        Some(Value::String(id)) => vec![id.clone()],
        Some(Value::Array(ids)) => ids
            .iter()
            .map(|id| {
                id.as_str().map(str::to_string).ok_or_else(|| {
                    CoreError::InvalidEntry(format!("{} chain id is not a string: {}", kind, id))
                })
            })
            .collect::<Result<_>>()?,
        _ => {
            return Err(CoreError::InvalidEntry(format!(
                "{} entry is missing an id",
                kind
            )));
        }
    };

    ids.into_iter()
        .map(|id| {
            let mut body = body.clone();
            body["id"] = Value::String(id);
            let mut wrapped = serde_json::Map::new();
            wrapped.insert(kind.clone(), body);
            Ok(serde_json::from_value::<Chain>(Value::Object(wrapped))?)
        })
        .collect()
}
