// Lookup benchmarks over a synthetic catalog
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use skinmatch_core::{
    BrandMode, Catalog, CatalogColumns, Engine, Product, RecommendRequest, SearchRequest,
    SimilarityMatrix,
};

const BRANDS: [&str; 8] = [
    "Wardah", "Somethinc", "Avoskin", "Skintific", "Emina", "Scarlett", "Azarine", "Hanasui",
];
const CATEGORIES: [&str; 4] = ["Serum", "Toner", "Moisturizer", "Sunscreen"];
const INGREDIENTS: [&str; 6] = [
    "Niacinamide",
    "Hyaluronic Acid",
    "Retinol",
    "Ceramide",
    "Centella Asiatica",
    "Salicylic Acid",
];

fn generate_engine(n: usize) -> Engine {
    let mut rng = rand::rng();
    let products: Vec<Product> = (0..n)
        .map(|i| {
            Product::new(format!("Product {i}"), BRANDS[rng.random_range(0..BRANDS.len())])
                .with_category(CATEGORIES[rng.random_range(0..CATEGORIES.len())])
                .with_active_ingredients(format!(
                    "{}, {}",
                    INGREDIENTS[rng.random_range(0..INGREDIENTS.len())],
                    INGREDIENTS[rng.random_range(0..INGREDIENTS.len())]
                ))
                .with_benefits("Hydrating")
        })
        .collect();

    let mut data = vec![0.0f64; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let score: f64 = rng.random_range(0.0..1.0);
            data[i * n + j] = score;
            data[j * n + i] = score;
        }
    }

    let catalog = Catalog::new(products, CatalogColumns::all());
    let matrix = SimilarityMatrix::new(n, data).unwrap();
    Engine::new(catalog, matrix).unwrap()
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [100, 1000, 3000].iter() {
        let engine = generate_engine(*size);

        group.bench_with_input(BenchmarkId::new("top5", size), size, |b, &size| {
            let request = RecommendRequest::new(size / 2).top(5);
            b.iter(|| black_box(engine.recommend(&request).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("filtered", size), size, |b, &size| {
            let request = RecommendRequest::new(size / 2)
                .top(10)
                .category("Serum")
                .different_brand_only(true);
            b.iter(|| black_box(engine.recommend(&request).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [100, 1000, 3000].iter() {
        let engine = generate_engine(*size);

        group.bench_with_input(BenchmarkId::new("ingredient", size), size, |b, _| {
            let request = SearchRequest::new("niacinamide");
            b.iter(|| black_box(engine.search(&request)));
        });

        group.bench_with_input(BenchmarkId::new("same_brand", size), size, |b, _| {
            let request = SearchRequest::new("acid").brand_mode(BrandMode::SameAsFirst);
            b.iter(|| black_box(engine.search(&request)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_recommend, benchmark_search);
criterion_main!(benches);
