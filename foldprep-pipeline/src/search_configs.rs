//! The fixed set of searches run for each polymer type.

use foldprep_core::PolymerType;
use foldprep_tools::{
    DatabaseConfig, HmmsearchConfig, JackhmmerConfig, MsaToolConfig, NhmmerConfig, RunConfig,
    TemplateFilterConfig, TemplateToolConfig, TemplatesConfig,
};
use serde::Serialize;

use crate::config::DataPipelineConfig;
use crate::consts::*;

///
/// Protein searches: three unpaired sources, one paired source and the template search.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinSearchConfigs {
    pub uniref90: RunConfig,
    pub mgnify: RunConfig,
    pub small_bfd: RunConfig,
    pub uniprot: RunConfig,
    pub templates: TemplatesConfig,
}

///
/// RNA searches, each merged into the unpaired MSA.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RnaSearchConfigs {
    pub nt_rna: RunConfig,
    pub rfam_rna: RunConfig,
    pub rna_central_rna: RunConfig,
}

fn jackhmmer(config: &DataPipelineConfig, database: DatabaseConfig, max_sequences: usize) -> RunConfig {
    RunConfig {
        config: MsaToolConfig::Jackhmmer(JackhmmerConfig {
            binary_path: config.binaries.jackhmmer.clone(),
            database_config: database,
            n_cpu: config.jackhmmer_n_cpu,
            n_iter: JACKHMMER_N_ITER,
            e_value: JACKHMMER_E_VALUE,
            z_value: None,
            max_sequences,
        }),
        chain_poly_type: PolymerType::Protein,
        crop_size: None,
    }
}

fn nhmmer(config: &DataPipelineConfig, database: DatabaseConfig) -> RunConfig {
    RunConfig {
        config: MsaToolConfig::Nhmmer(NhmmerConfig {
            binary_path: config.binaries.nhmmer.clone(),
            hmmalign_binary_path: config.binaries.hmmalign.clone(),
            hmmbuild_binary_path: config.binaries.hmmbuild.clone(),
            database_config: database,
            n_cpu: config.nhmmer_n_cpu,
            e_value: NHMMER_E_VALUE,
            max_sequences: RNA_MAX_SEQUENCES,
            alphabet: Some(NHMMER_ALPHABET.to_string()),
        }),
        chain_poly_type: PolymerType::Rna,
        crop_size: None,
    }
}

impl ProteinSearchConfigs {
    pub fn from_config(config: &DataPipelineConfig) -> Self {
        let databases = &config.databases;
        Self {
            uniref90: jackhmmer(
                config,
                DatabaseConfig::new(UNIREF90, &databases.uniref90),
                UNIREF90_MAX_SEQUENCES,
            ),
            mgnify: jackhmmer(
                config,
                DatabaseConfig::new(MGNIFY, &databases.mgnify),
                MGNIFY_MAX_SEQUENCES,
            ),
            small_bfd: jackhmmer(
                config,
                DatabaseConfig::new(SMALL_BFD, &databases.small_bfd),
                SMALL_BFD_MAX_SEQUENCES,
            ),
            uniprot: jackhmmer(
                config,
                DatabaseConfig::new(UNIPROT_CLUSTER_ANNOT, &databases.uniprot_cluster_annot),
                UNIPROT_MAX_SEQUENCES,
            ),
            templates: TemplatesConfig {
                template_tool_config: TemplateToolConfig {
                    database_path: databases.seqres.clone(),
                    chain_poly_type: PolymerType::Protein,
                    hmmsearch_config: HmmsearchConfig::permissive(
                        config.binaries.hmmsearch.clone(),
                        config.binaries.hmmbuild.clone(),
                    ),
                },
                filter_config: TemplateFilterConfig::with_max_template_date(config.max_template_date),
            },
        }
    }
}

impl RnaSearchConfigs {
    pub fn from_config(config: &DataPipelineConfig) -> Self {
        let databases = &config.databases;
        Self {
            nt_rna: nhmmer(config, DatabaseConfig::new(NT_RNA, &databases.ntrna)),
            rfam_rna: nhmmer(config, DatabaseConfig::new(RFAM_RNA, &databases.rfam)),
            rna_central_rna: nhmmer(config, DatabaseConfig::new(RNA_CENTRAL_RNA, &databases.rna_central)),
        }
    }
}
