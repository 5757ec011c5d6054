//! Data pipeline configuration: tool binaries, database locations and tunables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_TEMPLATE_DATE, DEFAULT_N_CPU};

///
/// Paths to the HMMER binaries. Bare names are looked up on `PATH`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolBinaries {
    pub jackhmmer: PathBuf,
    pub nhmmer: PathBuf,
    pub hmmalign: PathBuf,
    pub hmmsearch: PathBuf,
    pub hmmbuild: PathBuf,
}

impl Default for ToolBinaries {
    fn default() -> Self {
        Self {
            jackhmmer: PathBuf::from("jackhmmer"),
            nhmmer: PathBuf::from("nhmmer"),
            hmmalign: PathBuf::from("hmmalign"),
            hmmsearch: PathBuf::from("hmmsearch"),
            hmmbuild: PathBuf::from("hmmbuild"),
        }
    }
}

///
/// Locations of the sequence databases and the mmCIF directory.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasePaths {
    pub small_bfd: PathBuf,
    pub mgnify: PathBuf,
    pub uniprot_cluster_annot: PathBuf,
    pub uniref90: PathBuf,
    pub ntrna: PathBuf,
    pub rfam: PathBuf,
    pub rna_central: PathBuf,
    pub seqres: PathBuf,
    pub pdb_mmcif_dir: PathBuf,
}

impl DatabasePaths {
    fn paths_mut(&mut self) -> [&mut PathBuf; 9] {
        [
            &mut self.small_bfd,
            &mut self.mgnify,
            &mut self.uniprot_cluster_annot,
            &mut self.uniref90,
            &mut self.ntrna,
            &mut self.rfam,
            &mut self.rna_central,
            &mut self.seqres,
            &mut self.pdb_mmcif_dir,
        ]
    }
}

fn default_n_cpu() -> usize {
    DEFAULT_N_CPU
}

fn default_max_template_date() -> NaiveDate {
    let (year, month, day) = DEFAULT_MAX_TEMPLATE_DATE;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

///
/// Top level configuration of a data pipeline run.
///
/// Example (YAML):
///
/// ```yaml
/// databases:
///   small_bfd: bfd-first_non_consensus_sequences.fasta
///   mgnify: mgy_clusters_2022_05.fa
///   uniprot_cluster_annot: uniprot_all_2021_04.fa
///   uniref90: uniref90_2022_05.fa
///   ntrna: nt_rna_2023_02_23_clust_seq_id_90_cov_80_rep_seq.fasta
///   rfam: rfam_14_9_clust_seq_id_90_cov_80_rep_seq.fasta
///   rna_central: rnacentral_active_seq_id_90_cov_80_linclust.fasta
///   seqres: pdb_seqres_2022_09_28.fasta
///   pdb_mmcif_dir: mmcif_files
/// jackhmmer_n_cpu: 8
/// max_template_date: 2021-09-30
/// search_timeout_secs: 7200
/// ```
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPipelineConfig {
    #[serde(default = "default_n_cpu")]
    pub jackhmmer_n_cpu: usize,
    #[serde(default = "default_n_cpu")]
    pub nhmmer_n_cpu: usize,
    #[serde(default = "default_max_template_date")]
    pub max_template_date: NaiveDate,
    /// Kill any single tool run that takes longer than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_timeout_secs: Option<u64>,
    /// Number of chains processed at once; defaults to the number of CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<usize>,
    // tables last so the TOML form is valid
    #[serde(default)]
    pub binaries: ToolBinaries,
    pub databases: DatabasePaths,
}

impl DataPipelineConfig {
    pub fn new(binaries: ToolBinaries, databases: DatabasePaths) -> Self {
        Self {
            binaries,
            databases,
            jackhmmer_n_cpu: DEFAULT_N_CPU,
            nhmmer_n_cpu: DEFAULT_N_CPU,
            max_template_date: default_max_template_date(),
            search_timeout_secs: None,
            num_workers: None,
        }
    }

    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_secs.map(Duration::from_secs)
    }

    ///
    /// Load a config from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
    /// Relative database paths are resolved against the file's directory.
    ///
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config from {:?}", path))?;
        let mut config: Self = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {:?}", path))?,
            Some("toml") => {
                toml::from_str(&content).with_context(|| format!("Failed to parse TOML config {:?}", path))?
            }
            _ => bail!("Unrecognized config format (expected .yaml, .yml or .toml): {:?}", path),
        };

        if let Some(config_dir) = path.parent() {
            for database in config.databases.paths_mut() {
                if database.is_relative() {
                    *database = config_dir.join(&*database);
                }
            }
        }
        Ok(config)
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => bail!("Unrecognized config format (expected .yaml, .yml or .toml): {:?}", path),
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write pipeline config to {:?}", path))?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
