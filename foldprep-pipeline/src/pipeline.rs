//! Per-chain processing: fill in MSAs and templates for protein and RNA chains.

use std::sync::Arc;
use std::time::Instant;

use foldprep_core::{Chain, ProteinChain, RnaChain};
use foldprep_msa::{Msa, merge};
use foldprep_templates::{DirectoryStructureStore, StructureStore, Templates, search_and_filter};
use foldprep_tools::{HmmerSearchInvoker, SearchInvoker, TemplateSearcher};
use tracing::info;

use crate::cache::{CacheKey, SequenceCache};
use crate::config::DataPipelineConfig;
use crate::errors::Result;
use crate::search_configs::{ProteinSearchConfigs, RnaSearchConfigs};
use crate::validation::{ProteinOverrides, validate_protein_overrides};

///
/// Everything searched for one protein sequence. Templates are kept as hits;
/// structures are resolved per chain.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinSearchResult {
    pub unpaired_msa: Msa,
    pub paired_msa: Msa,
    pub templates: Templates,
}

///
/// Runs the searches for each chain of a fold input.
///
/// Results are cached per sequence for the lifetime of the pipeline, so chains
/// sharing a sequence are searched once.
///
pub struct DataPipeline {
    protein_searches: ProteinSearchConfigs,
    rna_searches: RnaSearchConfigs,
    invoker: Arc<dyn SearchInvoker>,
    template_searcher: Arc<dyn TemplateSearcher>,
    structure_store: Arc<dyn StructureStore>,
    protein_cache: SequenceCache<ProteinSearchResult>,
    rna_cache: SequenceCache<Msa>,
}

impl DataPipeline {
    pub fn new(
        config: &DataPipelineConfig,
        invoker: Arc<dyn SearchInvoker>,
        template_searcher: Arc<dyn TemplateSearcher>,
        structure_store: Arc<dyn StructureStore>,
    ) -> Self {
        Self {
            protein_searches: ProteinSearchConfigs::from_config(config),
            rna_searches: RnaSearchConfigs::from_config(config),
            invoker,
            template_searcher,
            structure_store,
            protein_cache: SequenceCache::new(),
            rna_cache: SequenceCache::new(),
        }
    }

    ///
    /// A pipeline running the HMMER binaries and reading structures from the
    /// configured mmCIF directory.
    ///
    pub fn from_config(config: &DataPipelineConfig) -> Self {
        let hmmer = Arc::new(match config.search_timeout() {
            Some(timeout) => HmmerSearchInvoker::with_timeout(timeout),
            None => HmmerSearchInvoker::new(),
        });
        let store = Arc::new(DirectoryStructureStore::new(&config.databases.pdb_mmcif_dir));
        Self::new(config, hmmer.clone(), hmmer, store)
    }

    pub fn protein_searches(&self) -> &ProteinSearchConfigs {
        &self.protein_searches
    }

    pub fn rna_searches(&self) -> &RnaSearchConfigs {
        &self.rna_searches
    }

    /// Fill in a chain's MSAs (and templates, for protein). Other polymers pass through.
    pub fn process_chain(&self, chain: &Chain) -> Result<Chain> {
        match chain {
            Chain::Protein(protein) => Ok(Chain::Protein(self.process_protein_chain(protein)?)),
            Chain::Rna(rna) => Ok(Chain::Rna(self.process_rna_chain(rna)?)),
            Chain::Dna(_) | Chain::Ligand(_) => Ok(chain.clone()),
        }
    }

    pub fn process_protein_chain(&self, chain: &ProteinChain) -> Result<ProteinChain> {
        if validate_protein_overrides(chain)? == ProteinOverrides::Complete {
            info!(
                "Skipping MSA and template search for protein chain {} because it already has MSAs and templates",
                chain.id
            );
            return Ok(chain.clone());
        }

        let key = CacheKey::new(&chain.sequence, &self.protein_searches)?;
        let result = self
            .protein_cache
            .get_or_compute(key, || self.search_protein(&chain.sequence))?;

        let templates = result.templates.resolve(self.structure_store.as_ref());
        info!(
            "Protein chain {}: {} unpaired rows, {} paired rows, {} templates",
            chain.id,
            result.unpaired_msa.depth(),
            result.paired_msa.depth(),
            templates.len()
        );
        Ok(chain.with_msas_and_templates(
            result.unpaired_msa.to_a3m(),
            result.paired_msa.to_a3m(),
            templates,
        ))
    }

    pub fn process_rna_chain(&self, chain: &RnaChain) -> Result<RnaChain> {
        if chain.unpaired_msa.as_deref().is_some_and(|msa| !msa.is_empty()) {
            info!("Skipping MSA search for RNA chain {} because it already has an MSA", chain.id);
            return Ok(chain.clone());
        }

        let key = CacheKey::new(&chain.sequence, &self.rna_searches)?;
        let msa = self.rna_cache.get_or_compute(key, || self.search_rna(&chain.sequence))?;
        Ok(chain.with_unpaired_msa(msa.to_a3m()))
    }

    fn search_protein(&self, sequence: &str) -> Result<ProteinSearchResult> {
        let searches = &self.protein_searches;
        info!("Getting protein MSAs for sequence {}", sequence);
        let start = Instant::now();

        // one tool run at a time per sequence; parallelism is across chains
        let uniref90 = self.invoker.search(sequence, &searches.uniref90)?;
        let mgnify = self.invoker.search(sequence, &searches.mgnify)?;
        let small_bfd = self.invoker.search(sequence, &searches.small_bfd)?;
        let uniprot = self.invoker.search(sequence, &searches.uniprot)?;
        info!(
            "Getting protein MSAs took {:.2} seconds for sequence {}",
            start.elapsed().as_secs_f64(),
            sequence
        );

        let start = Instant::now();
        let templates = search_and_filter(
            sequence,
            &uniref90,
            &searches.templates,
            self.template_searcher.as_ref(),
            self.structure_store.as_ref(),
        )?;
        info!(
            "Getting protein templates took {:.2} seconds for sequence {}",
            start.elapsed().as_secs_f64(),
            sequence
        );

        let unpaired_msa = merge(&[uniref90, small_bfd, mgnify], true)?;
        let paired_msa = merge(&[uniprot], false)?;
        Ok(ProteinSearchResult {
            unpaired_msa,
            paired_msa,
            templates,
        })
    }

    fn search_rna(&self, sequence: &str) -> Result<Msa> {
        let searches = &self.rna_searches;
        info!("Getting RNA MSAs for sequence {}", sequence);
        let start = Instant::now();

        let nt_rna = self.invoker.search(sequence, &searches.nt_rna)?;
        let rfam = self.invoker.search(sequence, &searches.rfam_rna)?;
        let rna_central = self.invoker.search(sequence, &searches.rna_central_rna)?;
        let msa = merge(&[rfam, rna_central, nt_rna], true)?;

        info!(
            "Getting RNA MSAs took {:.2} seconds for sequence {} ({} rows)",
            start.elapsed().as_secs_f64(),
            sequence,
            msa.depth()
        );
        Ok(msa)
    }
}
