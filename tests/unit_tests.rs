// Unit tests for Tripbook

use serde_json::json;
use tripbook::core::{
    distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box},
    CatalogQueryEngine, CompilationAggregator, RawRecord, RecordNormalizer, RouteOptimizer,
    SearchFilters, SortOrder,
};
use tripbook::models::{
    Attraction, BudgetStatus, Category, Compilation, CompilationItem, Coordinates, PriceLevel,
    ProfileType, SearchRequest,
};

fn create_attraction(id: &str, category: Category, price: PriceLevel) -> Attraction {
    let mut attraction = Attraction::new(format!("Place {}", id), category);
    attraction.external_id = Some(id.to_string());
    attraction.city = "Lyon".to_string();
    attraction.country = "France".to_string();
    attraction.price_level = price;
    attraction
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(45.7640, 4.8357, 45.7640, 4.8357);
    assert!(distance < 0.01);
}

#[test]
fn test_one_degree_at_equator() {
    let distance = distance_km(
        Some(Coordinates::new(0.0, 0.0)),
        Some(Coordinates::new(0.0, 1.0)),
    )
    .unwrap();
    assert!((distance - 111.19).abs() <= 0.5, "got {}", distance);
}

#[test]
fn test_missing_coordinates_are_undefined() {
    assert!(distance_km(Some(Coordinates::new(0.0, 0.0)), None).is_none());
}

#[test]
fn test_point_within_bbox() {
    let bbox = calculate_bounding_box(45.7640, 4.8357, 10.0);

    assert!(is_within_bounding_box(45.7640, 4.8357, &bbox));
    assert!(is_within_bounding_box(45.76, 4.84, &bbox));
    assert!(!is_within_bounding_box(bbox.max_lat + 0.01, 4.8357, &bbox));
}

#[test]
fn test_fine_dining_label_is_restaurant() {
    let normalizer = RecordNormalizer::default();
    let raw = RawRecord::TripAdvisor(json!({
        "location_id": "77",
        "name": "Le Bistrot",
        "category": { "name": "Fine Dining Restaurant" }
    }));

    let attraction = normalizer.normalize(&raw).unwrap();
    assert_eq!(attraction.category, Category::Restaurant);
}

#[test]
fn test_bad_record_does_not_break_batch() {
    let normalizer = RecordNormalizer::default();
    let batch = normalizer.normalize_batch(vec![
        RawRecord::Catalog(json!({ "name": "Fourvière", "rating": "n/a", "num_reviews": "lots" })),
        RawRecord::Catalog(json!({ "description": "no name here" })),
        RawRecord::Catalog(json!({ "name": "Parc de la Tête d'Or", "latitude": 45.777, "longitude": 4.855 })),
    ]);

    assert_eq!(batch.attractions.len(), 2);
    assert_eq!(batch.rejected, 1);
    assert_eq!(batch.attractions[0].rating, None);
    assert_eq!(batch.attractions[0].num_reviews, 0);
    assert!(batch.attractions[1].coordinates.is_some());
}

#[test]
fn test_category_filter_over_mixed_catalog() {
    let catalog = vec![
        create_attraction("r1", Category::Restaurant, PriceLevel::Budget),
        create_attraction("h1", Category::Hotel, PriceLevel::Expensive),
        create_attraction("r2", Category::Restaurant, PriceLevel::Moderate),
        create_attraction("h2", Category::Hotel, PriceLevel::Luxury),
        create_attraction("r3", Category::Restaurant, PriceLevel::None),
    ];

    let request = SearchRequest {
        category: Some("hotel".to_string()),
        ..Default::default()
    };
    let filters = SearchFilters::from_request(&request);
    let page = CatalogQueryEngine::default().search(&catalog, &filters, SortOrder::DEFAULT, 1, None);

    assert_eq!(page.total_count, 2);
    assert!(page.results.iter().all(|a| a.category == Category::Hotel));
}

#[test]
fn test_unknown_ordering_falls_back_to_default() {
    assert_eq!(SortOrder::parse(Some("-sparkle")), SortOrder::DEFAULT);
}

#[test]
fn test_estimated_budget_for_one_moderate_item() {
    let mut compilation = Compilation::new("camille", ProfileType::Tourist);
    compilation
        .add_item(CompilationItem::new(create_attraction("1", Category::Restaurant, PriceLevel::Moderate)))
        .unwrap();

    let aggregator = CompilationAggregator::default();
    assert_eq!(aggregator.estimated_budget(&compilation), 75.0);
}

#[test]
fn test_budget_status_scenarios() {
    let aggregator = CompilationAggregator::default();

    assert_eq!(aggregator.status_for(70.0, 100.0), BudgetStatus::UnderBudget);
    assert_eq!(aggregator.status_for(71.0, 100.0), BudgetStatus::OnBudget);
    assert_eq!(aggregator.status_for(101.0, 100.0), BudgetStatus::OverBudget);
}

#[test]
fn test_route_over_collinear_points() {
    // One kilometer north is 1/111.195 degrees of latitude
    let km = 1.0 / 111.194_926_644_558_73;
    let point = |name: &str, at_km: f64| {
        let mut attraction = Attraction::new(name, Category::Attraction);
        attraction.coordinates = Some(Coordinates::new(at_km * km, 0.0));
        attraction
    };

    let route = RouteOptimizer::new().optimize(&[point("0", 0.0), point("3", 3.0), point("1", 1.0)]);
    let order: Vec<&str> = route.ordered.iter().map(|a| a.name.as_str()).collect();

    assert_eq!(order, vec!["0", "1", "3"]);
    assert!((route.total_distance_km - 3.0).abs() < 0.001);
}
