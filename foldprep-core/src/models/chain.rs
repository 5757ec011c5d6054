use serde::{Deserialize, Serialize};

use super::polymer::PolymerType;
use super::template::Template;

///
/// Protein chain. The MSA and template fields are either supplied by the user or
/// filled in by the data pipeline.
///
/// `None` means "not provided", while `Some("")` / `Some(vec![])` are explicit
/// empty values that tell the pipeline not to search.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinChain {
    pub id: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpaired_msa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_msa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<Template>>,
}

impl ProteinChain {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            modifications: Vec::new(),
            unpaired_msa: None,
            paired_msa: None,
            templates: None,
        }
    }

    ///
    /// Build a copy of this chain with all three search-derived fields set.
    ///
    pub fn with_msas_and_templates(
        &self,
        unpaired_msa: String,
        paired_msa: String,
        templates: Vec<Template>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            sequence: self.sequence.clone(),
            modifications: self.modifications.clone(),
            unpaired_msa: Some(unpaired_msa),
            paired_msa: Some(paired_msa),
            templates: Some(templates),
        }
    }
}

///
/// RNA chain. Only an unpaired MSA is searched for RNA.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RnaChain {
    pub id: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpaired_msa: Option<String>,
}

impl RnaChain {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            modifications: Vec::new(),
            unpaired_msa: None,
        }
    }

    pub fn with_unpaired_msa(&self, unpaired_msa: String) -> Self {
        Self {
            id: self.id.clone(),
            sequence: self.sequence.clone(),
            modifications: self.modifications.clone(),
            unpaired_msa: Some(unpaired_msa),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaChain {
    pub id: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ligand {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccd_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

///
/// One entry of a fold input. The set of variants is closed, so every dispatch
/// over chains is an exhaustive `match`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Protein(ProteinChain),
    Rna(RnaChain),
    Dna(DnaChain),
    Ligand(Ligand),
}

impl Chain {
    pub fn id(&self) -> &str {
        match self {
            Chain::Protein(c) => &c.id,
            Chain::Rna(c) => &c.id,
            Chain::Dna(c) => &c.id,
            Chain::Ligand(c) => &c.id,
        }
    }

    /// Polymer type, or `None` for ligands.
    pub fn polymer_type(&self) -> Option<PolymerType> {
        match self {
            Chain::Protein(_) => Some(PolymerType::Protein),
            Chain::Rna(_) => Some(PolymerType::Rna),
            Chain::Dna(_) => Some(PolymerType::Dna),
            Chain::Ligand(_) => None,
        }
    }

    pub fn sequence(&self) -> Option<&str> {
        match self {
            Chain::Protein(c) => Some(&c.sequence),
            Chain::Rna(c) => Some(&c.sequence),
            Chain::Dna(c) => Some(&c.sequence),
            Chain::Ligand(_) => None,
        }
    }
}
