//! Configuration value objects for the search tools.
//!
//! Every type here is an immutable value with content-based equality, so a bundle
//! of configs can serve as part of a cache key.

use std::path::PathBuf;

use chrono::NaiveDate;
use foldprep_core::PolymerType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub path: PathBuf,
}

impl DatabaseConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Iterative protein search with jackhmmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackhmmerConfig {
    pub binary_path: PathBuf,
    pub database_config: DatabaseConfig,
    pub n_cpu: usize,
    pub n_iter: u32,
    pub e_value: f64,
    pub z_value: Option<f64>,
    pub max_sequences: usize,
}

/// Nucleotide search with nhmmer; hits are realigned to the query with hmmalign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NhmmerConfig {
    pub binary_path: PathBuf,
    pub hmmalign_binary_path: PathBuf,
    pub hmmbuild_binary_path: PathBuf,
    pub database_config: DatabaseConfig,
    pub n_cpu: usize,
    pub e_value: f64,
    pub max_sequences: usize,
    pub alphabet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum MsaToolConfig {
    Jackhmmer(JackhmmerConfig),
    Nhmmer(NhmmerConfig),
}

///
/// Everything needed to run one MSA search: the tool and its tuning, the database,
/// the polymer type the search applies to, and an optional crop of the result.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub config: MsaToolConfig,
    pub chain_poly_type: PolymerType,
    pub crop_size: Option<usize>,
}

impl RunConfig {
    pub fn database(&self) -> &DatabaseConfig {
        match &self.config {
            MsaToolConfig::Jackhmmer(c) => &c.database_config,
            MsaToolConfig::Nhmmer(c) => &c.database_config,
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match &self.config {
            MsaToolConfig::Jackhmmer(_) => "jackhmmer",
            MsaToolConfig::Nhmmer(_) => "nhmmer",
        }
    }
}

/// Profile building (hmmbuild) and profile search (hmmsearch) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmsearchConfig {
    pub hmmsearch_binary_path: PathBuf,
    pub hmmbuild_binary_path: PathBuf,
    pub filter_f1: f64,
    pub filter_f2: f64,
    pub filter_f3: f64,
    pub e_value: f64,
    pub inc_e: f64,
    pub dom_e: f64,
    pub incdom_e: f64,
    pub alphabet: String,
}

impl HmmsearchConfig {
    ///
    /// Permissive settings: high e-value cutoffs so that recall is decided by the
    /// template filter rather than by the search.
    ///
    pub fn permissive(hmmsearch_binary_path: PathBuf, hmmbuild_binary_path: PathBuf) -> Self {
        Self {
            hmmsearch_binary_path,
            hmmbuild_binary_path,
            filter_f1: 0.1,
            filter_f2: 0.1,
            filter_f3: 0.1,
            e_value: 100.0,
            inc_e: 100.0,
            dom_e: 100.0,
            incdom_e: 100.0,
            alphabet: "amino".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateToolConfig {
    pub database_path: PathBuf,
    pub chain_poly_type: PolymerType,
    pub hmmsearch_config: HmmsearchConfig,
}

///
/// Template filtering policy. Each threshold is independent; `None` disables it.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFilterConfig {
    pub max_subsequence_ratio: Option<f64>,
    pub min_align_ratio: Option<f64>,
    pub min_hit_length: Option<usize>,
    pub deduplicate_sequences: bool,
    pub max_hits: Option<usize>,
    pub max_template_date: NaiveDate,
}

impl TemplateFilterConfig {
    pub fn with_max_template_date(max_template_date: NaiveDate) -> Self {
        Self {
            max_subsequence_ratio: Some(0.95),
            min_align_ratio: Some(0.1),
            min_hit_length: Some(10),
            deduplicate_sequences: true,
            max_hits: Some(4),
            max_template_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub template_tool_config: TemplateToolConfig,
    pub filter_config: TemplateFilterConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn uniref90() -> RunConfig {
        RunConfig {
            config: MsaToolConfig::Jackhmmer(JackhmmerConfig {
                binary_path: "jackhmmer".into(),
                database_config: DatabaseConfig::new("uniref90", "/db/uniref90.fasta"),
                n_cpu: 8,
                n_iter: 1,
                e_value: 1e-4,
                z_value: None,
                max_sequences: 10_000,
            }),
            chain_poly_type: PolymerType::Protein,
            crop_size: None,
        }
    }

    #[rstest]
    fn test_run_config_equality_is_by_value(uniref90: RunConfig) {
        let same = uniref90.clone();
        assert_eq!(same, uniref90);

        let mut other = uniref90.clone();
        if let MsaToolConfig::Jackhmmer(c) = &mut other.config {
            c.max_sequences = 5_000;
        }
        assert_ne!(other, uniref90);

        let mut cropped = uniref90.clone();
        cropped.crop_size = Some(100);
        assert_ne!(cropped, uniref90);
    }

    #[rstest]
    fn test_run_config_accessors(uniref90: RunConfig) {
        assert_eq!(uniref90.database().name, "uniref90");
        assert_eq!(uniref90.tool_name(), "jackhmmer");
    }

    #[rstest]
    fn test_tool_config_is_tagged(uniref90: RunConfig) {
        let value = serde_json::to_value(&uniref90).unwrap();
        assert_eq!(value["config"]["tool"], "jackhmmer");
        assert_eq!(value["chain_poly_type"], "protein");
    }

    #[rstest]
    fn test_filter_defaults() {
        let date = NaiveDate::from_ymd_opt(2021, 9, 30).unwrap();
        let filter = TemplateFilterConfig::with_max_template_date(date);
        assert_eq!(filter.max_hits, Some(4));
        assert_eq!(filter.min_hit_length, Some(10));
        assert!(filter.deduplicate_sequences);
    }
}
