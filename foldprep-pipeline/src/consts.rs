// protein databases
pub const UNIREF90: &str = "uniref90";
pub const MGNIFY: &str = "mgnify";
pub const SMALL_BFD: &str = "small_bfd";
pub const UNIPROT_CLUSTER_ANNOT: &str = "uniprot_cluster_annot";

// RNA databases
pub const NT_RNA: &str = "nt_rna";
pub const RFAM_RNA: &str = "rfam_rna";
pub const RNA_CENTRAL_RNA: &str = "rna_central_rna";

pub const UNIREF90_MAX_SEQUENCES: usize = 10_000;
pub const MGNIFY_MAX_SEQUENCES: usize = 5_000;
pub const SMALL_BFD_MAX_SEQUENCES: usize = 5_000;
pub const UNIPROT_MAX_SEQUENCES: usize = 50_000;
pub const RNA_MAX_SEQUENCES: usize = 10_000;

pub const JACKHMMER_N_ITER: u32 = 1;
pub const JACKHMMER_E_VALUE: f64 = 1e-4;
pub const NHMMER_E_VALUE: f64 = 1e-3;
pub const NHMMER_ALPHABET: &str = "rna";

pub const DEFAULT_N_CPU: usize = 8;

/// Templates released after this date are not used unless configured otherwise.
pub const DEFAULT_MAX_TEMPLATE_DATE: (i32, u32, u32) = (2021, 9, 30);
