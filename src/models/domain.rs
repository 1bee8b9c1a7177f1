use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Seller listing (양도자) loaded from CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub name: String,
    pub address: String,
    pub product_code: String,
    pub grade: Option<String>,
    pub price: Option<f64>,
}

/// Buyer inquiry (양수자) loaded from CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buyer {
    pub id: String,
    pub name: String,
    pub address: String,
    pub interested_product_code: String,
    pub grade: Option<String>,
    pub budget: Option<f64>,
}

/// One product row from the catalog workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMeta {
    pub code: String,
    pub brand: Option<String>,
    pub category_major: Option<String>,
    pub category_mid: Option<String>,
    pub category_minor: Option<String>,
}

/// Product catalog keyed by product code
///
/// Duplicate codes keep the first row seen, matching the source
/// workbook's row order.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    entries: HashMap<String, ProductMeta>,
}

impl ProductCatalog {
    pub fn from_rows(rows: Vec<ProductMeta>) -> Self {
        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            entries.entry(row.code.clone()).or_insert(row);
        }
        Self { entries }
    }

    /// Metadata for a product code, `None` when the code is not listed
    pub fn resolve(&self, code: &str) -> Option<&ProductMeta> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// City and district tokens extracted from a road address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionParts {
    pub city: String,
    pub district: String,
}

/// Seller record joined with catalog metadata, ready for scoring
#[derive(Debug, Clone)]
pub struct SellerCard {
    pub id: String,
    pub product_code: String,
    pub grade: Option<String>,
    pub price: Option<f64>,
    pub region: RegionParts,
    pub brand: Option<String>,
    pub category_major: Option<String>,
    pub category_mid: Option<String>,
    pub category_minor: Option<String>,
}

/// Buyer record joined with catalog metadata, ready for scoring
///
/// `product_code` here is the code the buyer is interested in, so the
/// two card types score symmetrically.
#[derive(Debug, Clone)]
pub struct BuyerCard {
    pub id: String,
    pub product_code: String,
    pub grade: Option<String>,
    pub budget: Option<f64>,
    pub region: RegionParts,
    pub brand: Option<String>,
    pub category_major: Option<String>,
    pub category_mid: Option<String>,
    pub category_minor: Option<String>,
}

/// Grade labels mapped onto a comparable ordinal scale
///
/// Labels are matched case-insensitively: keys are lowercased on entry
/// because file-backed config sources do not preserve key casing.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GradeTable {
    ordinals: BTreeMap<String, u8>,
}

impl GradeTable {
    pub fn from_pairs(pairs: &[(&str, u8)]) -> Self {
        Self {
            ordinals: pairs
                .iter()
                .map(|(label, ordinal)| (normalize_grade_label(label), *ordinal))
                .collect(),
        }
    }

    /// Ordinal for a grade label, `None` when the label is not in the table
    pub fn ordinal(&self, label: &str) -> Option<u8> {
        let label = label.trim();
        // exact hit first; Korean labels never need the lowercased retry
        self.ordinals
            .get(label)
            .or_else(|| self.ordinals.get(&label.to_lowercase()))
            .copied()
    }
}

fn normalize_grade_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl<'de> Deserialize<'de> for GradeTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, u8>::deserialize(deserializer)?;
        Ok(Self {
            ordinals: raw
                .into_iter()
                .map(|(label, ordinal)| (normalize_grade_label(&label), ordinal))
                .collect(),
        })
    }
}

impl Default for GradeTable {
    fn default() -> Self {
        Self::from_pairs(&[("프리미엄", 3), ("스탠다드", 2), ("베이직", 1), ("일반", 2)])
    }
}

/// Relative importance of each scoring component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    #[serde(default = "default_product_weight")]
    pub product: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_region_weight")]
    pub region: f64,
    #[serde(default = "default_grade_weight")]
    pub grade: f64,
}

impl MatchWeights {
    /// Build weights from a name -> value mapping, e.g. a parsed CLI
    /// JSON argument
    ///
    /// Unknown names are dropped and missing names become 0.
    /// `category` is accepted as an alias for `product`.
    pub fn from_map(map: &HashMap<String, f64>) -> Self {
        let get = |name: &str| map.get(name).copied().unwrap_or(0.0);
        Self {
            product: map
                .get("product")
                .or_else(|| map.get("category"))
                .copied()
                .unwrap_or(0.0),
            price: get("price"),
            region: get("region"),
            grade: get("grade"),
        }
    }

    /// Rescale so the components sum to 1.0, preserving their ratios
    ///
    /// Negative components are treated as 0. When nothing positive
    /// remains every weight collapses to 0 and all pairs score 0.
    pub fn normalized(&self) -> Self {
        let product = self.product.max(0.0);
        let price = self.price.max(0.0);
        let region = self.region.max(0.0);
        let grade = self.grade.max(0.0);
        let total = product + price + region + grade;

        if total <= 0.0 {
            return Self {
                product: 0.0,
                price: 0.0,
                region: 0.0,
                grade: 0.0,
            };
        }

        Self {
            product: product / total,
            price: price / total,
            region: region / total,
            grade: grade / total,
        }
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            product: default_product_weight(),
            price: default_price_weight(),
            region: default_region_weight(),
            grade: default_grade_weight(),
        }
    }
}

fn default_product_weight() -> f64 { 0.40 }
fn default_price_weight() -> f64 { 0.25 }
fn default_region_weight() -> f64 { 0.20 }
fn default_grade_weight() -> f64 { 0.15 }

/// Component scores computed for one seller-buyer pair
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PairFeatures {
    pub product_code_exact: bool,
    pub cat_sim: f64,
    pub price_fit: f64,
    pub region_sim: f64,
    pub grade_sim: f64,
}

/// Scored and ranked seller-buyer pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPair {
    pub seller_id: String,
    pub buyer_id: String,
    pub features: PairFeatures,
    pub score: f64,
    pub explanation: String,
    pub rank_for_seller: u32,
    pub rank_for_buyer: u32,
}
