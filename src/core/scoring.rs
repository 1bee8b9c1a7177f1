use crate::core::region::region_score;
use crate::models::{BuyerCard, GradeTable, MatchWeights, PairFeatures, SellerCard};

/// Bonus for a matching brand, independent of the category level
const BRAND_BONUS: f64 = 0.25;
/// Category level scores; only the deepest matching level counts
const MINOR_CATEGORY_SCORE: f64 = 0.4;
const MID_CATEGORY_SCORE: f64 = 0.25;
const MAJOR_CATEGORY_SCORE: f64 = 0.15;

const GRADE_EQUAL_SCORE: f64 = 1.0;
const GRADE_ADJACENT_SCORE: f64 = 0.7;
const GRADE_DISTANT_SCORE: f64 = 0.4;
const GRADE_UNKNOWN_SCORE: f64 = 0.5;

/// Category/brand similarity (0-1)
///
/// The deepest matching catalog level wins (minor 0.4, mid 0.25,
/// major 0.15) and a matching brand adds 0.25 on top, capped at 1.0.
/// Missing values never match.
pub fn calculate_category_score(seller: &SellerCard, buyer: &BuyerCard) -> f64 {
    let mut score = 0.0;

    if same_value(&seller.brand, &buyer.brand) {
        score += BRAND_BONUS;
    }

    if same_value(&seller.category_minor, &buyer.category_minor) {
        score += MINOR_CATEGORY_SCORE;
    } else if same_value(&seller.category_mid, &buyer.category_mid) {
        score += MID_CATEGORY_SCORE;
    } else if same_value(&seller.category_major, &buyer.category_major) {
        score += MAJOR_CATEGORY_SCORE;
    }

    score.min(1.0)
}

#[inline]
fn same_value(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Price feasibility (0-1)
///
/// 0 when either side is missing or the buyer budget is below the asking
/// price, otherwise sqrt(price / budget) so a fuller budget use scores
/// higher while staying affordable.
#[inline]
pub fn calculate_price_fit(price: Option<f64>, budget: Option<f64>) -> f64 {
    let (price, budget) = match (price, budget) {
        (Some(p), Some(b)) => (p, b),
        _ => return 0.0,
    };

    if !price.is_finite() || !budget.is_finite() || price < 0.0 || budget <= 0.0 || budget < price {
        return 0.0;
    }

    (price / budget).sqrt().clamp(0.0, 1.0)
}

/// Grade compatibility (0-1) via the ordinal ladder
///
/// Equal ordinals score 1.0, one step apart 0.7, further 0.4. A label
/// outside the table keeps a neutral 0.5 as long as both labels are
/// present; a missing label on either side scores 0.
pub fn calculate_grade_score(seller: Option<&str>, buyer: Option<&str>, grades: &GradeTable) -> f64 {
    let s_label = seller.map(str::trim).unwrap_or("");
    let b_label = buyer.map(str::trim).unwrap_or("");

    match (grades.ordinal(s_label), grades.ordinal(b_label)) {
        (Some(a), Some(b)) => match a.abs_diff(b) {
            0 => GRADE_EQUAL_SCORE,
            1 => GRADE_ADJACENT_SCORE,
            _ => GRADE_DISTANT_SCORE,
        },
        _ => {
            if !s_label.is_empty() && !b_label.is_empty() {
                GRADE_UNKNOWN_SCORE
            } else {
                0.0
            }
        }
    }
}

/// Score one seller-buyer pair with already-normalized weights
///
/// An exact product-code match takes the full product weight and
/// replaces the category similarity in the blend; the other components
/// contribute their weighted scores unchanged.
pub fn score_pair(
    seller: &SellerCard,
    buyer: &BuyerCard,
    weights: &MatchWeights,
    grades: &GradeTable,
) -> (PairFeatures, f64) {
    let product_code_exact =
        !seller.product_code.is_empty() && seller.product_code == buyer.product_code;

    let cat_sim = calculate_category_score(seller, buyer);
    let price_fit = calculate_price_fit(seller.price, buyer.budget);
    let region_sim = region_score(&seller.region, &buyer.region);
    let grade_sim = calculate_grade_score(seller.grade.as_deref(), buyer.grade.as_deref(), grades);

    let product_part = if product_code_exact { 1.0 } else { cat_sim };
    let score = weights.product * product_part
        + weights.price * price_fit
        + weights.region * region_sim
        + weights.grade * grade_sim;

    let features = PairFeatures {
        product_code_exact,
        cat_sim,
        price_fit,
        region_sim,
        grade_sim,
    };
    (features, score)
}
