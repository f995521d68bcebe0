use pokereview_core::{
    open_db, open_db_in_memory, seed_sample_catalog, CatalogService, Category, Country, Pokemon,
    Review, SeedSummary,
};

#[test]
fn seeding_empty_catalog_writes_sample_records() {
    let conn = open_db_in_memory().unwrap();

    let summary = seed_sample_catalog(&conn).unwrap();
    assert_eq!(
        summary,
        SeedSummary {
            countries: 3,
            categories: 3,
            owners: 3,
            reviewers: 3,
            pokemon: 3,
            reviews: 9,
        }
    );

    let service = CatalogService::try_new(&conn).unwrap();
    let pokemon = service.list::<Pokemon>().unwrap();
    let names = pokemon.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Pikachu", "Squirtle", "Venusaur"]);

    for entry in &pokemon {
        let rating = service.pokemon_rating(entry.id).unwrap();
        assert!((rating - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(service.owners_of_pokemon(entry.id).unwrap().len(), 1);
        assert_eq!(service.categories_of_pokemon(entry.id).unwrap().len(), 1);
    }
    assert_eq!(service.list::<Review>().unwrap().len(), 9);
}

#[test]
fn seeding_twice_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");

    let conn = open_db(&path).unwrap();
    assert!(!seed_sample_catalog(&conn).unwrap().is_empty());
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert!(seed_sample_catalog(&conn).unwrap().is_empty());
    let service = CatalogService::try_new(&conn).unwrap();
    assert_eq!(service.list::<Country>().unwrap().len(), 3);
}

#[test]
fn seeding_skips_catalog_with_existing_records() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::try_new(&conn).unwrap();
    service.create(&Category::new("Fire")).unwrap();

    assert!(seed_sample_catalog(&conn).unwrap().is_empty());
    assert_eq!(service.list::<Category>().unwrap().len(), 1);
    assert!(service.list::<Pokemon>().unwrap().is_empty());
}
