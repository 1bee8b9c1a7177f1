use crate::models::PairFeatures;

const REASON_SEPARATOR: &str = " · ";
/// Fallback reason when nothing else fires
const REASON_DEFAULT: &str = "기본 조건 일치";

/// Build the human-readable reason string for one scored pair
///
/// Reasons are appended in a fixed order: exact product code, category
/// similarity above 0.3, positive price fit (with both amounts), region
/// proximity at 0.6 or above, grade score at 0.7 or above. A pair with
/// no firing reason gets "기본 조건 일치".
pub fn build_explanation(features: &PairFeatures, price: Option<f64>, budget: Option<f64>) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if features.product_code_exact {
        reasons.push("동일 상품코드".to_string());
    }
    if features.cat_sim > 0.3 {
        reasons.push("카테고리/브랜드 유사".to_string());
    }
    if features.price_fit > 0.0 {
        // price_fit > 0 implies both amounts are present
        if let (Some(price), Some(budget)) = (price, budget) {
            reasons.push(format!(
                "예산 충족(양도 {}원 ≤ 양수 {}원)",
                format_won(price),
                format_won(budget)
            ));
        }
    }
    if features.region_sim >= 0.6 {
        let level = if features.region_sim == 1.0 {
            "시/구 동일"
        } else {
            "같은 시"
        };
        reasons.push(format!("지역 근접({})", level));
    }
    if features.grade_sim >= 0.7 {
        reasons.push("등급 적합".to_string());
    }

    if reasons.is_empty() {
        reasons.push(REASON_DEFAULT.to_string());
    }
    reasons.join(REASON_SEPARATOR)
}

/// Format a won amount with thousands separators, truncating fractions
fn format_won(amount: f64) -> String {
    let truncated = amount.trunc() as i64;
    let digits = truncated.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if truncated < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(
        exact: bool,
        cat_sim: f64,
        price_fit: f64,
        region_sim: f64,
        grade_sim: f64,
    ) -> PairFeatures {
        PairFeatures {
            product_code_exact: exact,
            cat_sim,
            price_fit,
            region_sim,
            grade_sim,
        }
    }

    #[test]
    fn test_all_reasons_in_order() {
        let explanation = build_explanation(
            &features(true, 0.65, 0.7, 1.0, 1.0),
            Some(25_000_000.0),
            Some(50_000_000.0),
        );
        assert_eq!(
            explanation,
            "동일 상품코드 · 카테고리/브랜드 유사 · \
             예산 충족(양도 25,000,000원 ≤ 양수 50,000,000원) · \
             지역 근접(시/구 동일) · 등급 적합"
        );
    }

    #[test]
    fn test_fallback_reason() {
        let explanation = build_explanation(&features(false, 0.0, 0.0, 0.0, 0.0), None, None);
        assert_eq!(explanation, "기본 조건 일치");
    }

    #[test]
    fn test_category_threshold_is_exclusive() {
        // 0.3 itself does not fire, only values above it
        let explanation = build_explanation(&features(false, 0.3, 0.0, 0.0, 0.0), None, None);
        assert_eq!(explanation, "기본 조건 일치");

        let explanation = build_explanation(&features(false, 0.4, 0.0, 0.0, 0.0), None, None);
        assert_eq!(explanation, "카테고리/브랜드 유사");
    }

    #[test]
    fn test_region_levels() {
        let same_city = build_explanation(&features(false, 0.0, 0.0, 0.6, 0.0), None, None);
        assert_eq!(same_city, "지역 근접(같은 시)");

        let same_district = build_explanation(&features(false, 0.0, 0.0, 1.0, 0.0), None, None);
        assert_eq!(same_district, "지역 근접(시/구 동일)");

        let contained = build_explanation(&features(false, 0.0, 0.0, 0.5, 0.0), None, None);
        assert_eq!(contained, "기본 조건 일치");
    }

    #[test]
    fn test_grade_threshold() {
        let adjacent = build_explanation(&features(false, 0.0, 0.0, 0.0, 0.7), None, None);
        assert_eq!(adjacent, "등급 적합");

        let neutral = build_explanation(&features(false, 0.0, 0.0, 0.0, 0.5), None, None);
        assert_eq!(neutral, "기본 조건 일치");
    }

    #[test]
    fn test_budget_reason_needs_amounts() {
        // a positive fit with missing amounts omits the budget reason
        let explanation = build_explanation(&features(false, 0.0, 0.5, 0.0, 0.0), None, None);
        assert_eq!(explanation, "기본 조건 일치");
    }

    #[test]
    fn test_won_formatting() {
        assert_eq!(format_won(0.0), "0");
        assert_eq!(format_won(999.0), "999");
        assert_eq!(format_won(1_000.0), "1,000");
        assert_eq!(format_won(25_000_000.0), "25,000,000");
        assert_eq!(format_won(1_234_567.89), "1,234,567");
    }
}
