use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::core::extract_region_parts;
use crate::io::AdapterError;
use crate::models::BuyerCard;

/// Buyer-side profile attached to a labeled query
///
/// `max_rent` and `area_m2` appear in exported datasets but carry no
/// signal the scorer consumes; they are parsed and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvalProfile {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub max_rent: Option<f64>,
    #[serde(default)]
    pub area_m2: Option<f64>,
}

/// One labeled query: a buyer profile plus the seller ids considered a
/// correct match for it
#[derive(Debug, Clone, Deserialize)]
pub struct LabeledExample {
    #[serde(default)]
    pub qid: Option<String>,
    #[serde(default)]
    pub profile: EvalProfile,
    #[serde(default, deserialize_with = "de_id_list")]
    pub positives: Vec<String>,
}

/// Accept both string and numeric ids in the positives list
fn de_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

impl LabeledExample {
    /// Project the profile into a synthetic buyer card for scoring
    ///
    /// The single free-text category is applied at every category level
    /// so it can match sellers wherever their catalog entry places it.
    pub fn to_query_card(&self, id: &str) -> BuyerCard {
        BuyerCard {
            id: id.to_string(),
            product_code: String::new(),
            grade: None,
            budget: self.profile.budget,
            region: extract_region_parts(self.profile.region.as_deref().unwrap_or("")),
            brand: None,
            category_major: self.profile.category.clone(),
            category_mid: self.profile.category.clone(),
            category_minor: self.profile.category.clone(),
        }
    }
}

/// Load labeled examples from a JSONL file, one example per line
pub fn load_examples(path: &Path) -> Result<Vec<LabeledExample>, AdapterError> {
    let file = File::open(path).map_err(|source| AdapterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut examples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| AdapterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            continue;
        }
        let example =
            serde_json::from_str::<LabeledExample>(trimmed).map_err(|source| AdapterError::Json {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        examples.push(example);
    }
    Ok(examples)
}
