pub const REVISION_DATE_ITEM: &str = "_pdbx_audit_revision_history.revision_date";
pub const DEPOSITION_DATE_ITEM: &str = "_pdbx_database_status.recvd_initial_deposition_date";
pub const MMCIF_DATE_FORMAT: &str = "%Y-%m-%d";

// tried in order when looking up a structure
pub const MMCIF_EXTENSIONS: &[&str] = &["cif", "cif.gz"];

/// Separates the PDB id from the chain id in a seqres target name, e.g. `1abc_A`.
pub const CHAIN_SEPARATOR: char = '_';
