use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

///
/// A structural template as consumed downstream: the template structure in
/// mmCIF form plus the mapping from query residue index to template residue index.
///
/// In JSON the mapping is written as two parallel index lists.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateJson", into = "TemplateJson")]
pub struct Template {
    pub mmcif: String,
    pub query_to_template_map: BTreeMap<usize, usize>,
}

impl Template {
    pub fn new(mmcif: String, query_to_template_map: BTreeMap<usize, usize>) -> Self {
        Self {
            mmcif,
            query_to_template_map,
        }
    }

    pub fn query_indices(&self) -> Vec<usize> {
        self.query_to_template_map.keys().copied().collect()
    }

    pub fn template_indices(&self) -> Vec<usize> {
        self.query_to_template_map.values().copied().collect()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateJson {
    mmcif: String,
    query_indices: Vec<usize>,
    template_indices: Vec<usize>,
}

impl TryFrom<TemplateJson> for Template {
    type Error = CoreError;

    fn try_from(value: TemplateJson) -> Result<Self, Self::Error> {
        if value.query_indices.len() != value.template_indices.len() {
            return Err(CoreError::TemplateIndexMismatch(
                value.query_indices.len(),
                value.template_indices.len(),
            ));
        }
        let query_to_template_map = value
            .query_indices
            .into_iter()
            .zip(value.template_indices)
            .collect();
        Ok(Template {
            mmcif: value.mmcif,
            query_to_template_map,
        })
    }
}

impl From<Template> for TemplateJson {
    fn from(value: Template) -> Self {
        let (query_indices, template_indices) = value.query_to_template_map.into_iter().unzip();
        TemplateJson {
            mmcif: value.mmcif,
            query_indices,
            template_indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_template_json_shape() {
        let template = Template::new("data_1ABC\n".to_string(), BTreeMap::from([(0, 3), (2, 5)]));
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["queryIndices"], serde_json::json!([0, 2]));
        assert_eq!(value["templateIndices"], serde_json::json!([3, 5]));

        let back: Template = serde_json::from_value(value).unwrap();
        assert_eq!(back, template);
    }

    #[rstest]
    fn test_template_index_mismatch() {
        let value = serde_json::json!({
            "mmcif": "",
            "queryIndices": [0, 1],
            "templateIndices": [0],
        });
        let err = serde_json::from_value::<Template>(value).unwrap_err();
        assert!(err.to_string().contains("2 query indices but 1 template indices"));
    }
}
