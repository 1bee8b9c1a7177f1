// Core algorithm exports
pub mod explain;
pub mod matcher;
pub mod region;
pub mod scoring;

pub use explain::build_explanation;
pub use matcher::{build_buyer_cards, build_seller_cards, EngineError, MatchOutput, Matcher};
pub use region::{extract_region_parts, region_score, region_score_text};
pub use scoring::{
    calculate_category_score, calculate_grade_score, calculate_price_fit, score_pair,
};
