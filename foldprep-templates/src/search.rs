use std::time::Instant;

use foldprep_msa::Msa;
use foldprep_tools::{TemplateSearcher, TemplatesConfig};
use tracing::info;

use crate::errors::Result;
use crate::store::StructureStore;
use crate::templates::Templates;

///
/// Search for templates with a profile built from `profile_msa`, then filter the
/// hits. Structures are not resolved here; release dates are looked up only for
/// the hits the filter reaches.
///
/// # Arguments
/// - query_sequence: the chain sequence
/// - profile_msa: alignment the search profile is built from
/// - config: template search and filter settings
/// - searcher: runs the profile search
/// - store: source of release dates for the date cutoff
///
pub fn search_and_filter(
    query_sequence: &str,
    profile_msa: &Msa,
    config: &TemplatesConfig,
    searcher: &dyn TemplateSearcher,
    store: &dyn StructureStore,
) -> Result<Templates> {
    let start = Instant::now();
    let output = searcher.search_templates(profile_msa, &config.template_tool_config)?;
    let templates = Templates::from_hmmsearch(query_sequence, &output)?;
    info!(
        "Template search found {} hits in {:.2} seconds",
        templates.len(),
        start.elapsed().as_secs_f64()
    );

    let filtered = templates.filter(&config.filter_config, store);
    info!("{} of {} template hits kept after filtering", filtered.len(), templates.len());
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TemplateError;
    use chrono::NaiveDate;
    use foldprep_core::PolymerType;
    use foldprep_tools::{
        HmmsearchConfig, HmmsearchOutput, SearchToolError, TemplateFilterConfig, TemplateToolConfig,
    };
    use pretty_assertions::assert_eq;
    use rstest::*;

    struct CannedSearcher(Option<HmmsearchOutput>);

    impl TemplateSearcher for CannedSearcher {
        fn search_templates(
            &self,
            _profile_msa: &Msa,
            _config: &TemplateToolConfig,
        ) -> foldprep_tools::Result<HmmsearchOutput> {
            self.0.clone().ok_or_else(|| SearchToolError::Failed {
                tool: "hmmsearch".to_string(),
                status: "exit status: 1".to_string(),
                stderr: String::new(),
            })
        }
    }

    struct DatedStore;

    impl StructureStore for DatedStore {
        fn release_date(&self, pdb_id: &str) -> Result<Option<NaiveDate>> {
            Ok(match pdb_id {
                "2new" => NaiveDate::from_ymd_opt(2023, 1, 1),
                _ => NaiveDate::from_ymd_opt(2010, 1, 1),
            })
        }

        fn get_mmcif(&self, pdb_id: &str) -> Result<String> {
            Ok(format!("data_{}\n", pdb_id))
        }
    }

    #[fixture]
    fn config() -> TemplatesConfig {
        TemplatesConfig {
            template_tool_config: TemplateToolConfig {
                database_path: "/db/pdb_seqres.fasta".into(),
                chain_poly_type: PolymerType::Protein,
                hmmsearch_config: HmmsearchConfig::permissive("hmmsearch".into(), "hmmbuild".into()),
            },
            filter_config: TemplateFilterConfig {
                min_hit_length: Some(3),
                ..TemplateFilterConfig::with_max_template_date(NaiveDate::from_ymd_opt(2021, 9, 30).unwrap())
            },
        }
    }

    #[rstest]
    fn test_search_and_filter(config: TemplatesConfig) {
        let output = HmmsearchOutput {
            sto: "# STOCKHOLM 1.0\n\
                  1old_A/1-4 MRVL\n\
                  2new_A/1-4 MKIL\n\
                  #=GC RF    xxxx\n\
                  //\n"
                .to_string(),
            tblout: "1old_A - query - 1e-5 20.0 0.0\n2new_A - query - 1e-9 30.0 0.0\n".to_string(),
        };
        let msa = Msa::from_empty("MKVL", PolymerType::Protein);
        let templates =
            search_and_filter("MKVL", &msa, &config, &CannedSearcher(Some(output)), &DatedStore).unwrap();

        let names: Vec<&str> = templates.hits().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["1old_A/1-4"]);
        assert_eq!(templates.resolve(&DatedStore)[0].mmcif, "data_1old\n");
    }

    #[rstest]
    fn test_search_failure_propagates(config: TemplatesConfig) {
        let msa = Msa::from_empty("MKVL", PolymerType::Protein);
        let err = search_and_filter("MKVL", &msa, &config, &CannedSearcher(None), &DatedStore).unwrap_err();
        assert!(matches!(err, TemplateError::SearchTool(SearchToolError::Failed { .. })));
    }
}
