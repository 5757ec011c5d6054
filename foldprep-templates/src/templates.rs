//! A query's template hits: filtering and resolution to structures.

use foldprep_core::Template;
use foldprep_tools::{HmmsearchOutput, TemplateFilterConfig};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::hit::{TemplateHit, parse_hits};
use crate::store::StructureStore;

///
/// Template hits for one query sequence, in ranked order once filtered.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    query_sequence: String,
    hits: Vec<TemplateHit>,
}

impl Templates {
    pub fn new(query_sequence: &str, hits: Vec<TemplateHit>) -> Self {
        Self {
            query_sequence: query_sequence.to_string(),
            hits,
        }
    }

    pub fn from_hmmsearch(query_sequence: &str, output: &HmmsearchOutput) -> Result<Self> {
        Ok(Self::new(query_sequence, parse_hits(query_sequence, output)?))
    }

    pub fn query_sequence(&self) -> &str {
        &self.query_sequence
    }

    pub fn hits(&self) -> &[TemplateHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    ///
    /// Rank hits by score (descending, ties by name) and keep those that pass
    /// every filter, up to `max_hits`.
    ///
    /// Release dates not already on a hit are looked up in `store` as the ranked
    /// walk reaches the hit, so hits below the cap are never read. A hit whose
    /// lookup fails keeps its place; resolving it later drops it.
    ///
    /// Filters, in order:
    /// - released strictly after `max_template_date`, or the entry records no date
    /// - the hit is a subsequence of the query covering more than `max_subsequence_ratio` of it
    /// - with `deduplicate_sequences`: the hit repeats, or is contained in, an
    ///   already kept hit, at a length ratio of at least `max_subsequence_ratio`
    /// - aligned length below `min_align_ratio` of the query or below `min_hit_length`
    ///
    pub fn filter(&self, config: &TemplateFilterConfig, store: &dyn StructureStore) -> Templates {
        let mut ranked: Vec<&TemplateHit> = self.hits.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

        let mut kept: Vec<TemplateHit> = Vec::new();
        for hit in ranked {
            if config.max_hits.is_some_and(|max_hits| kept.len() >= max_hits) {
                break;
            }
            let mut hit = hit.clone();
            let readable = match hit.release_date {
                Some(_) => true,
                None => match store.release_date(&hit.pdb_id) {
                    Ok(date) => {
                        hit.release_date = date;
                        true
                    }
                    Err(e) => {
                        warn!("No release date for template {}: {}", hit.name, e);
                        false
                    }
                },
            };
            match self.rejection(&hit, readable, &kept, config) {
                Some(reason) => debug!("Dropping template {}: {}", hit.name, reason),
                None => kept.push(hit),
            }
        }
        Templates::new(&self.query_sequence, kept)
    }

    fn rejection(
        &self,
        hit: &TemplateHit,
        readable: bool,
        kept: &[TemplateHit],
        config: &TemplateFilterConfig,
    ) -> Option<&'static str> {
        match hit.release_date {
            // the structure could not be read; resolution drops it
            None if !readable => {}
            None => return Some("no release date recorded"),
            Some(date) if date > config.max_template_date => return Some("released after the cutoff"),
            Some(_) => {}
        }

        let query_length = self.query_sequence.len();
        let hit_length = hit.hit_sequence.len();
        if let Some(max_ratio) = config.max_subsequence_ratio {
            let ratio = hit_length as f64 / query_length.max(1) as f64;
            if ratio > max_ratio && self.query_sequence.to_ascii_uppercase().contains(&hit.hit_sequence) {
                return Some("subsequence of the query");
            }
        }

        if config.deduplicate_sequences {
            let duplicate = kept.iter().any(|other| {
                if other.hit_sequence == hit.hit_sequence {
                    return true;
                }
                config.max_subsequence_ratio.is_some_and(|max_ratio| {
                    other.hit_sequence.contains(&hit.hit_sequence)
                        && hit_length as f64 / other.hit_sequence.len().max(1) as f64 >= max_ratio
                })
            });
            if duplicate {
                return Some("duplicate of a higher ranked hit");
            }
        }

        if config
            .min_align_ratio
            .is_some_and(|min_ratio| hit.align_ratio(query_length) < min_ratio)
        {
            return Some("alignment covers too little of the query");
        }
        if config
            .min_hit_length
            .is_some_and(|min_length| hit.aligned_length() < min_length)
        {
            return Some("alignment too short");
        }
        None
    }

    ///
    /// Resolve each hit to its structure, pairing hits with the entry's mmCIF text.
    /// Hits whose structure cannot be resolved are dropped with a warning.
    ///
    pub fn get_hits_with_structures(&self, store: &dyn StructureStore) -> Vec<(&TemplateHit, String)> {
        self.hits
            .iter()
            .filter_map(|hit| match store.get_mmcif(&hit.pdb_id) {
                Ok(mmcif) => Some((hit, mmcif)),
                Err(e) => {
                    warn!("Dropping template {}: {}", hit.name, e);
                    None
                }
            })
            .collect()
    }

    /// Resolve hits to the template artifacts written to the fold input.
    pub fn resolve(&self, store: &dyn StructureStore) -> Vec<Template> {
        self.get_hits_with_structures(store)
            .into_iter()
            .map(|(hit, mmcif)| Template::new(mmcif, hit.query_to_hit_mapping.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TemplateError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const QUERY: &str = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWERVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWUAEYISPLESLGLKVSEPAGRTVLGG";

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    /// A hit aligning `length` residues starting at query residue `offset`,
    /// with a template sequence distinct per name.
    fn hit(name: &str, score: f64, offset: usize, length: usize, release_date: Option<NaiveDate>) -> TemplateHit {
        let query_to_hit_mapping: BTreeMap<usize, usize> = (0..length).map(|i| (offset + i, i)).collect();
        TemplateHit {
            name: name.to_string(),
            pdb_id: name[..4].to_string(),
            chain_id: "A".to_string(),
            query_to_hit_mapping,
            hit_sequence: format!("{}{}", name.to_ascii_uppercase().replace('_', "W"), "G".repeat(length)),
            identity: 0.5,
            score,
            release_date,
        }
    }

    #[fixture]
    fn config() -> TemplateFilterConfig {
        TemplateFilterConfig::with_max_template_date(NaiveDate::from_ymd_opt(2021, 9, 30).unwrap())
    }

    fn names(templates: &Templates) -> Vec<&str> {
        templates.hits().iter().map(|h| h.name.as_str()).collect()
    }

    #[rstest]
    fn test_date_cutoff(config: TemplateFilterConfig) {
        let templates = Templates::new(
            QUERY,
            vec![
                hit("1old_A", 50.0, 0, 100, date(2020, 1, 1)),
                hit("2new_A", 90.0, 0, 100, date(2022, 6, 1)),
                hit("3cut_A", 40.0, 0, 100, date(2021, 9, 30)),
                hit("4unk_A", 95.0, 0, 100, None),
            ],
        );
        assert_eq!(names(&templates.filter(&config, &NoDates)), vec!["1old_A", "3cut_A"]);
    }

    #[rstest]
    fn test_cap_keeps_top_scores_with_ties_by_name(config: TemplateFilterConfig) {
        let scores = [10.0, 80.0, 30.0, 80.0, 50.0, 20.0, 70.0, 60.0, 40.0, 5.0];
        let hits = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| hit(&format!("{}h{:02}_A", i, i), score, 0, 100, date(2019, 1, 1)))
            .collect();
        let filtered = Templates::new(QUERY, hits).filter(&config, &NoDates);
        assert_eq!(filtered.len(), 4);
        assert_eq!(names(&filtered), vec!["1h01_A", "3h03_A", "6h06_A", "7h07_A"]);
        let kept_scores: Vec<f64> = filtered.hits().iter().map(|h| h.score).collect();
        assert_eq!(kept_scores, vec![80.0, 80.0, 70.0, 60.0]);
    }

    #[rstest]
    fn test_alignment_quality(config: TemplateFilterConfig) {
        let templates = Templates::new(
            QUERY,
            vec![
                hit("1big_A", 50.0, 0, 120, date(2019, 1, 1)),
                // 9 residues: under min_hit_length
                hit("2sml_A", 40.0, 0, 9, date(2019, 1, 1)),
                // 20 of 247 residues: under min_align_ratio
                hit("3frg_A", 30.0, 0, 20, date(2019, 1, 1)),
            ],
        );
        assert_eq!(names(&templates.filter(&config, &NoDates)), vec!["1big_A"]);
    }

    #[rstest]
    fn test_subsequence_of_query_is_dropped(config: TemplateFilterConfig) {
        let mut self_hit = hit("1slf_A", 99.0, 0, QUERY.len(), date(2019, 1, 1));
        self_hit.hit_sequence = QUERY.to_string();
        let mut partial = hit("2prt_A", 98.0, 0, 100, date(2019, 1, 1));
        partial.hit_sequence = QUERY[..100].to_string();

        let templates = Templates::new(QUERY, vec![self_hit, partial]);
        assert_eq!(names(&templates.filter(&config, &NoDates)), vec!["2prt_A"]);
    }

    #[rstest]
    fn test_duplicates_of_kept_hits_are_dropped(mut config: TemplateFilterConfig) {
        let first = hit("1aaa_A", 90.0, 0, 100, date(2019, 1, 1));
        let mut same = hit("1aaa_B", 80.0, 0, 100, date(2019, 1, 1));
        same.hit_sequence = first.hit_sequence.clone();
        let mut contained = hit("2bbb_A", 70.0, 0, 100, date(2019, 1, 1));
        contained.hit_sequence = first.hit_sequence[1..].to_string();
        let different = hit("3ccc_A", 60.0, 0, 100, date(2019, 1, 1));

        let templates = Templates::new(QUERY, vec![first, same, contained, different]);
        assert_eq!(names(&templates.filter(&config, &NoDates)), vec!["1aaa_A", "3ccc_A"]);

        config.deduplicate_sequences = false;
        assert_eq!(templates.filter(&config, &NoDates).len(), 4);
    }

    /// Every entry exists but none records a release date.
    struct NoDates;

    impl StructureStore for NoDates {
        fn release_date(&self, _pdb_id: &str) -> Result<Option<NaiveDate>> {
            Ok(None)
        }

        fn get_mmcif(&self, pdb_id: &str) -> Result<String> {
            Ok(format!("data_{}\n", pdb_id))
        }
    }

    /// Serves `1old` and `2aaa`..`9aaa`; `0aaa` cannot be read. Counts date lookups.
    #[derive(Default)]
    struct CountingStore {
        date_lookups: AtomicUsize,
    }

    impl StructureStore for CountingStore {
        fn release_date(&self, pdb_id: &str) -> Result<Option<NaiveDate>> {
            self.date_lookups.fetch_add(1, Ordering::SeqCst);
            match pdb_id {
                "0aaa" => Err(TemplateError::StructureNotFound(pdb_id.to_string())),
                "1old" => Ok(date(2020, 1, 1)),
                _ => Ok(date(2015, 3, 1)),
            }
        }

        fn get_mmcif(&self, pdb_id: &str) -> Result<String> {
            match pdb_id {
                "0aaa" => Err(TemplateError::StructureNotFound(pdb_id.to_string())),
                _ => Ok(format!("data_{}\n", pdb_id.to_ascii_uppercase())),
            }
        }
    }

    #[rstest]
    fn test_release_dates_are_looked_up_only_for_walked_hits(config: TemplateFilterConfig) {
        let hits = (0..10)
            .map(|i| hit(&format!("{}aaa_A", i), 100.0 - i as f64, 0, 100, None))
            .collect();
        let store = CountingStore::default();

        let filtered = Templates::new(QUERY, hits).filter(&config, &store);

        assert_eq!(store.date_lookups.load(Ordering::SeqCst), 4);
        // the unreadable top hit keeps its slot until resolution
        assert_eq!(names(&filtered), vec!["0aaa_A", "1aaa_A", "2aaa_A", "3aaa_A"]);
        assert_eq!(filtered.hits()[1].release_date, date(2015, 3, 1));

        let resolved = filtered.resolve(&store);
        let mmcifs: Vec<&str> = resolved.iter().map(|t| t.mmcif.as_str()).collect();
        assert_eq!(mmcifs, vec!["data_1AAA\n", "data_2AAA\n", "data_3AAA\n"]);
    }

    #[rstest]
    fn test_known_dates_skip_the_store(config: TemplateFilterConfig) {
        let store = CountingStore::default();
        let templates = Templates::new(QUERY, vec![hit("5kno_A", 50.0, 0, 100, date(2019, 1, 1))]);
        assert_eq!(templates.filter(&config, &store).len(), 1);
        assert_eq!(store.date_lookups.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn test_resolution_maps_query_to_template(config: TemplateFilterConfig) {
        let store = CountingStore::default();
        let filtered = Templates::new(QUERY, vec![hit("1old_A", 50.0, 3, 100, None)]).filter(&config, &store);
        assert_eq!(filtered.hits()[0].release_date, date(2020, 1, 1));

        let resolved = filtered.resolve(&store);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].mmcif, "data_1OLD\n");
        assert_eq!(resolved[0].query_to_template_map.get(&3), Some(&0));
    }
}
