use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DNA_CHAIN, PROTEIN_CHAIN, RNA_CHAIN};

///
/// Polymer type of a chain or of the chains a search applies to.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolymerType {
    Protein,
    Rna,
    Dna,
}

impl PolymerType {
    /// The mmCIF `_entity_poly.type` name for this polymer type.
    pub fn mmcif_name(&self) -> &'static str {
        match self {
            PolymerType::Protein => PROTEIN_CHAIN,
            PolymerType::Rna => RNA_CHAIN,
            PolymerType::Dna => DNA_CHAIN,
        }
    }
}

impl Display for PolymerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolymerType::Protein => "protein",
            PolymerType::Rna => "rna",
            PolymerType::Dna => "dna",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PolymerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" | "polypeptide(l)" => Ok(PolymerType::Protein),
            "rna" | "polyribonucleotide" => Ok(PolymerType::Rna),
            "dna" | "polydeoxyribonucleotide" => Ok(PolymerType::Dna),
            _ => Err(format!("Unknown polymer type: {}", s)),
        }
    }
}
