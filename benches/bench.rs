// Criterion benchmarks for Tripbook

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tripbook::core::{
    distance::{calculate_bounding_box, haversine_distance},
    CatalogQueryEngine, RouteOptimizer, SearchFilters, SortOrder,
};
use tripbook::models::{Attraction, Category, Coordinates, PriceLevel, SearchRequest};

fn create_attraction(id: usize, lat: f64, lon: f64) -> Attraction {
    let category = match id % 3 {
        0 => Category::Restaurant,
        1 => Category::Hotel,
        _ => Category::Attraction,
    };

    let mut attraction = Attraction::new(format!("Place {}", id), category);
    attraction.external_id = Some(id.to_string());
    attraction.city = if id % 2 == 0 { "Paris" } else { "Lyon" }.to_string();
    attraction.country = "France".to_string();
    attraction.coordinates = Some(Coordinates::new(lat, lon));
    attraction.rating = Some((id % 50) as f64 / 10.0);
    attraction.num_reviews = (id * 7 % 1000) as u32;
    attraction.num_likes = (id * 13 % 5000) as u64;
    attraction.price_level = PriceLevel::Moderate;
    attraction.target_profiles = vec!["tourist".to_string()];
    attraction
}

fn create_catalog(count: usize) -> Vec<Attraction> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.001) % 0.5;
            let lon_offset = (i as f64 * 0.0007) % 0.5;
            create_attraction(i, 48.8566 + lat_offset, 2.3522 + lon_offset)
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(48.8566),
                black_box(2.3522),
                black_box(48.8606),
                black_box(2.3376),
            )
        });
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(48.8566), black_box(2.3522), black_box(5.0)));
    });
}

fn bench_search(c: &mut Criterion) {
    let engine = CatalogQueryEngine::default();
    let request = SearchRequest {
        city: Some("paris".to_string()),
        min_rating: Some("2.5".to_string()),
        latitude: Some("48.9".to_string()),
        longitude: Some("2.4".to_string()),
        radius: Some("20".to_string()),
        ..Default::default()
    };
    let filters = SearchFilters::from_request(&request);
    let order = SortOrder::parse(Some("-rating"));

    let mut group = c.benchmark_group("search");

    for count in [100, 1000, 10000].iter() {
        let catalog = create_catalog(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &catalog, |b, catalog| {
            b.iter(|| engine.search(black_box(catalog), &filters, order, 1, Some(20)));
        });
    }

    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let optimizer = RouteOptimizer::new();

    let mut group = c.benchmark_group("route");

    for count in [10, 30, 100].iter() {
        let stops = create_catalog(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &stops, |b, stops| {
            b.iter(|| optimizer.optimize(black_box(stops)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_bounding_box,
    bench_search,
    bench_route
);
criterion_main!(benches);
