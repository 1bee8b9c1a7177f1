// Criterion benchmarks for sajang-match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sajang_match::core::{
    build_buyer_cards, build_seller_cards, region_score_text, score_pair, Matcher,
};
use sajang_match::models::{
    Buyer, GradeTable, MatchRequest, MatchWeights, ProductCatalog, ProductMeta, Seller,
};

const ADDRESSES: [&str; 5] = [
    "서울특별시 강남구 역삼동",
    "서울특별시 마포구 합정동",
    "부산광역시 해운대구",
    "대전광역시 유성구",
    "인천광역시 연수구",
];

const GRADES: [&str; 4] = ["프리미엄", "스탠다드", "베이직", "일반"];

fn create_seller(id: usize) -> Seller {
    Seller {
        id: format!("S{}", id),
        name: format!("양도자 {}", id),
        address: ADDRESSES[id % ADDRESSES.len()].to_string(),
        product_code: format!("P00{}", id % 5 + 1),
        grade: Some(GRADES[id % GRADES.len()].to_string()),
        price: Some(20_000_000.0 + (id % 10) as f64 * 5_000_000.0),
    }
}

fn create_buyer(id: usize) -> Buyer {
    Buyer {
        id: format!("B{}", id),
        name: format!("양수자 {}", id),
        address: ADDRESSES[(id + 2) % ADDRESSES.len()].to_string(),
        interested_product_code: format!("P00{}", (id + 1) % 5 + 1),
        grade: Some(GRADES[(id + 1) % GRADES.len()].to_string()),
        budget: Some(30_000_000.0 + (id % 8) as f64 * 7_000_000.0),
    }
}

fn create_catalog() -> ProductCatalog {
    let majors = ["외식", "외식", "외식", "서비스", "도소매"];
    let mids = ["한식", "카페", "치킨", "청소", "편의점"];
    let minors = ["분식", "에스프레소바", "후라이드", "사무실청소", "프랜차이즈"];
    ProductCatalog::from_rows(
        (0..5)
            .map(|i| ProductMeta {
                code: format!("P00{}", i + 1),
                brand: Some(format!("브랜드{}", i + 1)),
                category_major: Some(majors[i].to_string()),
                category_mid: Some(mids[i].to_string()),
                category_minor: Some(minors[i].to_string()),
            })
            .collect(),
    )
}

fn bench_region_score(c: &mut Criterion) {
    c.bench_function("region_score_text", |b| {
        b.iter(|| {
            region_score_text(
                black_box("서울특별시 강남구 역삼동 123-45"),
                black_box("서울특별시 강남구 삼성동 67-8"),
            )
        });
    });
}

fn bench_score_pair(c: &mut Criterion) {
    let catalog = create_catalog();
    let seller_cards = build_seller_cards(&[create_seller(1)], &catalog);
    let buyer_cards = build_buyer_cards(&[create_buyer(1)], &catalog);
    let weights = MatchWeights::default().normalized();
    let grades = GradeTable::default();

    c.bench_function("score_pair", |b| {
        b.iter(|| {
            score_pair(
                black_box(&seller_cards[0]),
                black_box(&buyer_cards[0]),
                &weights,
                &grades,
            )
        });
    });
}

fn bench_matching(c: &mut Criterion) {
    let request = MatchRequest::default();
    let matcher = Matcher::new(&request, GradeTable::default()).expect("valid request");
    let catalog = create_catalog();

    let mut group = c.benchmark_group("matching");

    for side_count in [10, 50, 100, 500].iter() {
        let sellers: Vec<Seller> = (0..*side_count).map(create_seller).collect();
        let buyers: Vec<Buyer> = (0..*side_count).map(create_buyer).collect();

        group.bench_with_input(
            BenchmarkId::new("run", side_count),
            side_count,
            |b, _| {
                b.iter(|| {
                    matcher.run(
                        black_box(&sellers),
                        black_box(&buyers),
                        black_box(&catalog),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_card_building(c: &mut Criterion) {
    let catalog = create_catalog();
    let sellers: Vec<Seller> = (0..100).map(create_seller).collect();

    c.bench_function("build_seller_cards_100", |b| {
        b.iter(|| build_seller_cards(black_box(&sellers), black_box(&catalog)));
    });
}

criterion_group!(
    benches,
    bench_region_score,
    bench_score_pair,
    bench_matching,
    bench_card_building
);

criterion_main!(benches);
