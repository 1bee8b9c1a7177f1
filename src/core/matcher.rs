use thiserror::Error;

use crate::core::explain::build_explanation;
use crate::core::region::extract_region_parts;
use crate::core::scoring::score_pair;
use crate::models::{
    Buyer, BuyerCard, GradeTable, MatchPair, MatchRequest, MatchWeights, PairFeatures,
    ProductCatalog, Seller, SellerCard,
};

/// Errors raised when building a matcher from a request
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid topk {0}: must be at least 1")]
    InvalidTopK(usize),
}

/// Result of one full matching run
#[derive(Debug)]
pub struct MatchOutput {
    /// Top pairs grouped by seller, in seller input order, best rank first
    pub for_sellers: Vec<MatchPair>,
    /// Top pairs grouped by buyer, in buyer input order, best rank first
    pub for_buyers: Vec<MatchPair>,
    /// Number of pairs actually scored
    pub pair_count: usize,
}

/// One scored pair before ranking; indices refer back into the card slices
#[derive(Debug, Clone, Copy)]
struct ScoredPair {
    s_idx: usize,
    b_idx: usize,
    features: PairFeatures,
    score: f64,
}

/// Scored cross product with global ranks assigned in both directions
#[derive(Debug)]
struct RankedPairs {
    scored: Vec<ScoredPair>,
    seller_order: Vec<Vec<usize>>,
    buyer_order: Vec<Vec<usize>>,
    rank_for_seller: Vec<u32>,
    rank_for_buyer: Vec<u32>,
}

/// Cross-join matching orchestrator
///
/// Scores every seller-buyer pair, ranks both directions independently
/// and keeps the top-k per side. Construction validates the request and
/// normalizes the weights once, so scoring never revisits either.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
    grades: GradeTable,
    topk: usize,
    bucket_threshold: Option<usize>,
}

impl Matcher {
    pub fn new(request: &MatchRequest, grades: GradeTable) -> Result<Self, EngineError> {
        if request.topk == 0 {
            return Err(EngineError::InvalidTopK(request.topk));
        }
        Ok(Self {
            weights: request.weights.normalized(),
            grades,
            topk: request.topk,
            bucket_threshold: request.bucket_threshold,
        })
    }

    /// The normalized weights this matcher scores with
    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Join records against the catalog and rank the full cross product
    pub fn run(&self, sellers: &[Seller], buyers: &[Buyer], catalog: &ProductCatalog) -> MatchOutput {
        let seller_cards = build_seller_cards(sellers, catalog);
        let buyer_cards = build_buyer_cards(buyers, catalog);
        self.rank_cards(&seller_cards, &buyer_cards)
    }

    /// Score and rank pre-joined cards, emitting both output tables
    pub fn rank_cards(&self, sellers: &[SellerCard], buyers: &[BuyerCard]) -> MatchOutput {
        let ranked = self.score_and_rank(sellers, buyers);
        let for_sellers = self.emit(
            &ranked.scored,
            &ranked.seller_order,
            &ranked.rank_for_seller,
            &ranked.rank_for_buyer,
            sellers,
            buyers,
        );
        let for_buyers = self.emit(
            &ranked.scored,
            &ranked.buyer_order,
            &ranked.rank_for_seller,
            &ranked.rank_for_buyer,
            sellers,
            buyers,
        );

        MatchOutput {
            for_sellers,
            for_buyers,
            pair_count: ranked.scored.len(),
        }
    }

    /// Rank the cross product and emit only the buyer-grouped table
    ///
    /// The seller-grouped side is never materialized, so no per-seller
    /// rows or explanation strings are built for it. Rank fields in the
    /// emitted rows still cover both directions.
    pub fn rank_cards_for_buyers(
        &self,
        sellers: &[SellerCard],
        buyers: &[BuyerCard],
    ) -> Vec<MatchPair> {
        let ranked = self.score_and_rank(sellers, buyers);
        self.emit(
            &ranked.scored,
            &ranked.buyer_order,
            &ranked.rank_for_seller,
            &ranked.rank_for_buyer,
            sellers,
            buyers,
        )
    }

    /// Score the cross product and assign global ranks in both directions
    ///
    /// Pairs are generated seller-major so within every per-seller and
    /// per-buyer group the candidates keep input order; the stable sort
    /// in rank_groups then breaks score ties by that order.
    fn score_and_rank(&self, sellers: &[SellerCard], buyers: &[BuyerCard]) -> RankedPairs {
        let use_buckets = self
            .bucket_threshold
            .map_or(false, |limit| sellers.len().saturating_mul(buyers.len()) > limit);

        let mut scored: Vec<ScoredPair> = Vec::new();
        for (s_idx, seller) in sellers.iter().enumerate() {
            for (b_idx, buyer) in buyers.iter().enumerate() {
                if use_buckets && !same_bucket(seller, buyer) {
                    continue;
                }
                let (features, score) = score_pair(seller, buyer, &self.weights, &self.grades);
                scored.push(ScoredPair {
                    s_idx,
                    b_idx,
                    features,
                    score,
                });
            }
        }

        let seller_order = rank_groups(&scored, sellers.len(), |p| p.s_idx);
        let buyer_order = rank_groups(&scored, buyers.len(), |p| p.b_idx);

        let mut rank_for_seller = vec![0u32; scored.len()];
        for group in &seller_order {
            for (position, &idx) in group.iter().enumerate() {
                rank_for_seller[idx] = position as u32 + 1;
            }
        }
        let mut rank_for_buyer = vec![0u32; scored.len()];
        for group in &buyer_order {
            for (position, &idx) in group.iter().enumerate() {
                rank_for_buyer[idx] = position as u32 + 1;
            }
        }

        RankedPairs {
            scored,
            seller_order,
            buyer_order,
            rank_for_seller,
            rank_for_buyer,
        }
    }

    /// Materialize the top-k rows of each group as output pairs
    fn emit(
        &self,
        scored: &[ScoredPair],
        order: &[Vec<usize>],
        rank_for_seller: &[u32],
        rank_for_buyer: &[u32],
        sellers: &[SellerCard],
        buyers: &[BuyerCard],
    ) -> Vec<MatchPair> {
        let mut rows = Vec::new();
        for group in order {
            for &idx in group.iter().take(self.topk) {
                let pair = &scored[idx];
                let seller = &sellers[pair.s_idx];
                let buyer = &buyers[pair.b_idx];
                rows.push(MatchPair {
                    seller_id: seller.id.clone(),
                    buyer_id: buyer.id.clone(),
                    features: pair.features,
                    score: pair.score,
                    explanation: build_explanation(&pair.features, seller.price, buyer.budget),
                    rank_for_seller: rank_for_seller[idx],
                    rank_for_buyer: rank_for_buyer[idx],
                });
            }
        }
        rows
    }
}

/// Group pair indices by entity and order each group best-score-first
///
/// The sort is stable, so equal scores keep their generation order.
fn rank_groups<F>(scored: &[ScoredPair], groups: usize, key: F) -> Vec<Vec<usize>>
where
    F: Fn(&ScoredPair) -> usize,
{
    let mut by_group: Vec<Vec<usize>> = vec![Vec::new(); groups];
    for (idx, pair) in scored.iter().enumerate() {
        by_group[key(pair)].push(idx);
    }
    for group in &mut by_group {
        group.sort_by(|&a, &b| {
            scored[b]
                .score
                .partial_cmp(&scored[a].score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    by_group
}

/// Bucketed generation keeps pairs whose major categories agree; records
/// without a resolved major category still cross everything
fn same_bucket(seller: &SellerCard, buyer: &BuyerCard) -> bool {
    match (&seller.category_major, &buyer.category_major) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Join seller records with the catalog and pre-parse their regions
pub fn build_seller_cards(sellers: &[Seller], catalog: &ProductCatalog) -> Vec<SellerCard> {
    sellers
        .iter()
        .map(|seller| {
            let meta = catalog.resolve(&seller.product_code);
            SellerCard {
                id: seller.id.clone(),
                product_code: seller.product_code.clone(),
                grade: seller.grade.clone(),
                price: seller.price,
                region: extract_region_parts(&seller.address),
                brand: meta.and_then(|m| m.brand.clone()),
                category_major: meta.and_then(|m| m.category_major.clone()),
                category_mid: meta.and_then(|m| m.category_mid.clone()),
                category_minor: meta.and_then(|m| m.category_minor.clone()),
            }
        })
        .collect()
}

/// Join buyer records with the catalog and pre-parse their regions
pub fn build_buyer_cards(buyers: &[Buyer], catalog: &ProductCatalog) -> Vec<BuyerCard> {
    buyers
        .iter()
        .map(|buyer| {
            let meta = catalog.resolve(&buyer.interested_product_code);
            BuyerCard {
                id: buyer.id.clone(),
                product_code: buyer.interested_product_code.clone(),
                grade: buyer.grade.clone(),
                budget: buyer.budget,
                region: extract_region_parts(&buyer.address),
                brand: meta.and_then(|m| m.brand.clone()),
                category_major: meta.and_then(|m| m.category_major.clone()),
                category_mid: meta.and_then(|m| m.category_mid.clone()),
                category_minor: meta.and_then(|m| m.category_minor.clone()),
            }
        })
        .collect()
}
