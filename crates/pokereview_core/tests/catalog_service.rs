use chrono::NaiveDate;
use pokereview_core::{
    open_db_in_memory, CatalogService, CatalogServiceError, Category, Country, ErrorKind, Owner,
    Pokemon, Review, Reviewer,
};
use rusqlite::Connection;

fn born() -> NaiveDate {
    NaiveDate::from_ymd_opt(1903, 1, 1).unwrap()
}

struct Catalog {
    kanto: Country,
    ash: Owner,
    water: Category,
    teddy: Reviewer,
    squirtle: Pokemon,
}

fn setup(service: &CatalogService<'_>) -> Catalog {
    let kanto = service.create(&Country::new("Kanto")).unwrap();
    let ash = service
        .create_owner(kanto.id, &Owner::new("Ash", "Ketchum", 0))
        .unwrap();
    let water = service.create(&Category::new("Water")).unwrap();
    let teddy = service.create(&Reviewer::new("Teddy", "Smith")).unwrap();
    let squirtle = service
        .create_pokemon(ash.id, water.id, &Pokemon::new("Squirtle", born()))
        .unwrap();
    Catalog {
        kanto,
        ash,
        water,
        teddy,
        squirtle,
    }
}

fn open() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn error_kinds_map_to_status_codes() {
    assert_eq!(ErrorKind::Validation.status_code(), 400);
    assert_eq!(ErrorKind::NotFound.status_code(), 404);
    assert_eq!(ErrorKind::Duplicate.status_code(), 422);
    assert_eq!(ErrorKind::Conflict.status_code(), 422);
    assert_eq!(ErrorKind::Persistence.status_code(), 500);
}

#[test]
fn get_unknown_record_is_404() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();

    let err = service.get::<Pokemon>(404).unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "pokemon not found: 404");
}

#[test]
fn duplicate_create_is_422() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    service.create(&Category::new("Water")).unwrap();

    let err = service.create(&Category::new("water ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(err.status_code(), 422);
}

#[test]
fn blank_name_is_400() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();

    let err = service.create(&Country::new(" ")).unwrap_err();
    assert!(matches!(err, CatalogServiceError::Invalid(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn update_with_mismatched_ids_is_400_and_writes_nothing() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    let kanto = service.create(&Country::new("Kanto")).unwrap();

    let err = service
        .update(kanto.id + 1, &Country::with_id(kanto.id, "Johto"))
        .unwrap_err();
    assert!(matches!(err, CatalogServiceError::IdMismatch { .. }));
    assert_eq!(err.status_code(), 400);
    assert_eq!(service.get::<Country>(kanto.id).unwrap().name, "Kanto");
}

#[test]
fn update_unknown_record_is_404() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();

    let err = service
        .update(9, &Category::with_id(9, "Ghost"))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn create_owner_uses_country_from_request() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    let catalog = setup(&service);

    assert_eq!(catalog.ash.country_id, catalog.kanto.id);
    assert_eq!(
        service.country_by_owner(catalog.ash.id).unwrap(),
        catalog.kanto
    );

    let err = service
        .create_owner(404, &Owner::new("Brock", "Harrison", 0))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn squirtle_flow_links_and_rates() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    let catalog = setup(&service);

    assert_eq!(
        service.pokemon_by_owner(catalog.ash.id).unwrap(),
        vec![catalog.squirtle.clone()]
    );
    assert_eq!(
        service.pokemon_by_category(catalog.water.id).unwrap(),
        vec![catalog.squirtle.clone()]
    );
    assert_eq!(
        service.categories_of_pokemon(catalog.squirtle.id).unwrap(),
        vec![catalog.water.clone()]
    );
    assert_eq!(
        service.owners_of_pokemon(catalog.squirtle.id).unwrap(),
        vec![catalog.ash.clone()]
    );
    assert_eq!(service.pokemon_rating(catalog.squirtle.id).unwrap(), 0.0);

    let review = service
        .create_review(
            catalog.squirtle.id,
            catalog.teddy.id,
            &Review::new("Squirtle", "Wet", 4, 0, 0),
        )
        .unwrap();
    assert_eq!(review.pokemon_id, catalog.squirtle.id);
    assert_eq!(review.reviewer_id, catalog.teddy.id);
    assert_eq!(service.pokemon_rating(catalog.squirtle.id).unwrap(), 4.0);
    assert_eq!(
        service.reviews_of_pokemon(catalog.squirtle.id).unwrap(),
        vec![review.clone()]
    );
    assert_eq!(
        service.reviews_by_reviewer(catalog.teddy.id).unwrap(),
        vec![review.clone()]
    );
    assert_eq!(
        service.pokemon_of_review(review.id).unwrap(),
        catalog.squirtle
    );
    assert_eq!(service.reviewer_of_review(review.id).unwrap(), catalog.teddy);
    assert_eq!(
        service.owners_from_country(catalog.kanto.id).unwrap(),
        vec![catalog.ash]
    );
}

#[test]
fn relationship_queries_on_missing_anchor_are_404() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();

    assert_eq!(service.pokemon_by_category(404).unwrap_err().status_code(), 404);
    assert_eq!(service.owners_from_country(404).unwrap_err().status_code(), 404);
    assert_eq!(service.country_by_owner(404).unwrap_err().status_code(), 404);
    assert_eq!(service.pokemon_by_owner(404).unwrap_err().status_code(), 404);
    assert_eq!(service.pokemon_rating(404).unwrap_err().status_code(), 404);
    assert_eq!(service.reviews_of_pokemon(404).unwrap_err().status_code(), 404);
    assert_eq!(service.reviews_by_reviewer(404).unwrap_err().status_code(), 404);
    assert_eq!(service.pokemon_of_review(404).unwrap_err().status_code(), 404);
    assert_eq!(service.reviewer_of_review(404).unwrap_err().status_code(), 404);
}

#[test]
fn delete_flows_report_conflicts_and_cascade() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    let catalog = setup(&service);
    service
        .create_review(
            catalog.squirtle.id,
            catalog.teddy.id,
            &Review::new("Squirtle", "Wet", 5, 0, 0),
        )
        .unwrap();

    let err = service.delete_reviewer(catalog.teddy.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.status_code(), 422);

    let err = service.delete_country(catalog.kanto.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let removal = service.delete_pokemon(catalog.squirtle.id).unwrap();
    assert_eq!(removal.reviews_removed, 1);
    assert!(service.list::<Review>().unwrap().is_empty());

    assert_eq!(
        service.delete_reviewer(catalog.teddy.id).unwrap(),
        catalog.teddy
    );
    assert_eq!(service.delete_owner(catalog.ash.id).unwrap(), catalog.ash);
    assert_eq!(
        service.delete_country(catalog.kanto.id).unwrap(),
        catalog.kanto
    );
    assert_eq!(
        service.delete_category(catalog.water.id).unwrap(),
        catalog.water
    );
    assert_eq!(service.delete_category(catalog.water.id).unwrap_err().status_code(), 404);
}

#[test]
fn delete_review_returns_removed_record() {
    let conn = open();
    let service = CatalogService::try_new(&conn).unwrap();
    let catalog = setup(&service);
    let review = service
        .create_review(
            catalog.squirtle.id,
            catalog.teddy.id,
            &Review::new("Squirtle", "Wet", 5, 0, 0),
        )
        .unwrap();

    assert_eq!(service.delete_review(review.id).unwrap(), review);
    assert_eq!(service.get::<Review>(review.id).unwrap_err().status_code(), 404);
}
