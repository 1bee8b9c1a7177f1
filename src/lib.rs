//! Sajang Match - Matching engine for a business-transfer marketplace
//!
//! This library scores and ranks 양도자 (seller) listings against 양수자
//! (buyer) inquiries over product, price, region and grade signals, and
//! calibrates a decision threshold against labeled evaluation data.

pub mod config;
pub mod core;
pub mod eval;
pub mod io;
pub mod models;

// Re-export commonly used types
pub use core::{score_pair, Matcher, MatchOutput};
pub use models::{
    Buyer, GradeTable, MatchPair, MatchRequest, MatchWeights, ProductCatalog, Seller,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let weights = MatchWeights::default().normalized();
        let total = weights.product + weights.price + weights.region + weights.grade;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
