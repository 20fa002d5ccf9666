// Property tests for Tripbook

use proptest::prelude::*;
use std::collections::HashSet;

use tripbook::core::{
    distance::distance_km, CatalogQueryEngine, CompilationAggregator, RawRecord,
    RecordNormalizer, RouteOptimizer, SearchFilters, SortOrder,
};
use tripbook::models::{
    Attraction, Category, Compilation, CompilationItem, Coordinates, PriceLevel, ProfileType,
    SearchRequest,
};

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon))
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Restaurant),
        Just(Category::Hotel),
        Just(Category::Attraction),
        Just(Category::Other),
    ]
}

fn price_level() -> impl Strategy<Value = PriceLevel> {
    prop_oneof![
        Just(PriceLevel::None),
        Just(PriceLevel::Budget),
        Just(PriceLevel::Moderate),
        Just(PriceLevel::Expensive),
        Just(PriceLevel::Luxury),
    ]
}

prop_compose! {
    fn attraction()(
        name in "[ ]{0,2}[A-Za-z][A-Za-z ]{0,10}[ ]{0,2}",
        category in category(),
        city in prop::sample::select(vec!["Paris", "Lyon", "Nice", "Rome"]),
        point in prop::option::of((45.0f64..46.0, 4.0f64..5.0)),
        rating in prop::option::of(0.0f64..=5.0),
        num_reviews in 0u32..500,
        num_likes in 0u64..500,
        price in price_level(),
    ) -> Attraction {
        let mut attraction = Attraction::new(name, category);
        attraction.city = city.to_string();
        attraction.country = "France".to_string();
        attraction.coordinates = point.map(|(lat, lon)| Coordinates::new(lat, lon));
        attraction.rating = rating;
        attraction.num_reviews = num_reviews;
        attraction.num_likes = num_likes;
        attraction.price_level = price;
        attraction
    }
}

fn ordering() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "rating".to_string(),
        "-rating".to_string(),
        "name".to_string(),
        "-num_reviews".to_string(),
        "num_likes".to_string(),
    ]))
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in coordinates(), b in coordinates()) {
        let ab = distance_km(Some(a), Some(b)).unwrap();
        let ba = distance_km(Some(b), Some(a)).unwrap();
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero(a in coordinates()) {
        prop_assert!(distance_km(Some(a), Some(a)).unwrap().abs() < 1e-9);
    }

    #[test]
    fn normalizing_canonical_records_is_stable(mut record in attraction(), id in "[0-9]{1,6}") {
        record.external_id = Some(id);
        let normalizer = RecordNormalizer::default();
        let raw = RawRecord::Catalog(serde_json::to_value(&record).unwrap());
        prop_assert_eq!(normalizer.normalize(&raw).unwrap(), record);
    }

    #[test]
    fn extra_filters_never_grow_results(
        catalog in prop::collection::vec(attraction(), 0..40),
        city in prop::sample::select(vec!["par", "ly", "ni", "ro"]),
        min_rating in -1.0f64..7.0,
        category in prop::sample::select(vec!["restaurant", "hotel", "attraction"]),
    ) {
        let engine = CatalogQueryEngine::default();
        let mut request = SearchRequest::default();
        let mut previous = engine.filter_sorted(&catalog, &SearchFilters::from_request(&request), SortOrder::DEFAULT).len();

        request.city = Some(city.to_string());
        let count = engine.filter_sorted(&catalog, &SearchFilters::from_request(&request), SortOrder::DEFAULT).len();
        prop_assert!(count <= previous);
        previous = count;

        request.min_rating = Some(min_rating.to_string());
        let count = engine.filter_sorted(&catalog, &SearchFilters::from_request(&request), SortOrder::DEFAULT).len();
        prop_assert!(count <= previous);
        previous = count;

        request.category = Some(category.to_string());
        let count = engine.filter_sorted(&catalog, &SearchFilters::from_request(&request), SortOrder::DEFAULT).len();
        prop_assert!(count <= previous);
    }

    #[test]
    fn pages_concatenate_to_full_result(
        catalog in prop::collection::vec(attraction(), 0..60),
        page_size in 1usize..15,
        order in ordering(),
    ) {
        let engine = CatalogQueryEngine::default();
        let filters = SearchFilters::default();
        let order = SortOrder::parse(order.as_deref());
        let full = engine.filter_sorted(&catalog, &filters, order);

        let first = engine.search(&catalog, &filters, order, 1, Some(page_size));
        let mut collected = first.results.clone();
        for page in 2..=first.total_pages() {
            collected.extend(engine.search(&catalog, &filters, order, page, Some(page_size)).results);
        }

        prop_assert_eq!(first.total_count, full.len());
        prop_assert_eq!(collected, full);
    }

    #[test]
    fn adding_items_never_lowers_budget(
        items in prop::collection::vec((price_level(), prop::option::of(0.0f64..1000.0)), 1..30),
    ) {
        let aggregator = CompilationAggregator::default();
        let mut compilation = Compilation::new("owner", ProfileType::Tourist);
        let mut previous = aggregator.estimated_budget(&compilation);

        for (index, (price, cost)) in items.into_iter().enumerate() {
            let mut attraction = Attraction::new(format!("Stop {}", index), Category::Attraction);
            attraction.price_level = price;
            let mut item = CompilationItem::new(attraction);
            if let Some(cost) = cost {
                item = item.with_cost(cost);
            }
            compilation.add_item(item).unwrap();

            let current = aggregator.estimated_budget(&compilation);
            prop_assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn route_is_a_permutation(catalog in prop::collection::vec(attraction(), 0..25)) {
        let stops: Vec<Attraction> = catalog
            .into_iter()
            .enumerate()
            .map(|(index, mut a)| {
                a.external_id = Some(index.to_string());
                a
            })
            .collect();

        let route = RouteOptimizer::new().optimize(&stops);

        prop_assert_eq!(route.ordered.len(), stops.len());
        let keys: HashSet<String> = route.ordered.iter().map(Attraction::key).collect();
        prop_assert_eq!(keys.len(), stops.len());
        if let Some(first) = stops.first() {
            prop_assert_eq!(&route.ordered[0], first);
        }
    }
}
