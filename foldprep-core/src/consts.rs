//! Constants shared across the foldprep crates.

/// Dialect string written to and expected in fold input JSON files.
pub const JSON_DIALECT: &str = "alphafold3";

/// Highest fold input JSON version this crate writes.
pub const JSON_VERSION: u32 = 2;

// mmCIF entity_poly types
pub const PROTEIN_CHAIN: &str = "polypeptide(L)";
pub const RNA_CHAIN: &str = "polyribonucleotide";
pub const DNA_CHAIN: &str = "polydeoxyribonucleotide";

/// Characters that may appear in an aligned row but are not residues.
pub const GAP_CHARS: &[char] = &['-', '.'];
