use chrono::NaiveDate;
use pokereview_core::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use pokereview_core::repo::country_repo::{CountryRepository, SqliteCountryRepository};
use pokereview_core::repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
use pokereview_core::repo::pokemon_repo::{PokemonRepository, SqlitePokemonRepository};
use pokereview_core::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use pokereview_core::repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
use pokereview_core::{
    open_db_in_memory, Category, Country, Owner, Pokemon, RepoError, Repository, Review,
    Reviewer,
};
use rusqlite::Connection;

struct Fixture {
    kanto: Country,
    ash: Owner,
    water: Category,
    squirtle: Pokemon,
}

fn born() -> NaiveDate {
    NaiveDate::from_ymd_opt(1903, 1, 1).unwrap()
}

fn setup(conn: &Connection) -> Fixture {
    let kanto = SqliteCountryRepository::try_new(conn)
        .unwrap()
        .create(&Country::new("Kanto"))
        .unwrap();
    let ash = SqliteOwnerRepository::try_new(conn)
        .unwrap()
        .create(&Owner::new("Ash", "Ketchum", kanto.id))
        .unwrap();
    let water = SqliteCategoryRepository::try_new(conn)
        .unwrap()
        .create(&Category::new("Water"))
        .unwrap();
    let squirtle = SqlitePokemonRepository::try_new(conn)
        .unwrap()
        .create_with_links(ash.id, water.id, &Pokemon::new("Squirtle", born()))
        .unwrap();

    Fixture {
        kanto,
        ash,
        water,
        squirtle,
    }
}

#[test]
fn create_with_links_joins_owner_and_category() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);

    let by_owner = SqliteOwnerRepository::try_new(&conn)
        .unwrap()
        .pokemon_by_owner(fixture.ash.id)
        .unwrap();
    assert_eq!(by_owner, vec![fixture.squirtle.clone()]);

    let by_category = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .pokemon_by_category(fixture.water.id)
        .unwrap();
    assert_eq!(by_category, vec![fixture.squirtle.clone()]);

    let pokemon = SqlitePokemonRepository::try_new(&conn).unwrap();
    assert_eq!(
        pokemon.categories_of_pokemon(fixture.squirtle.id).unwrap(),
        vec![fixture.water.clone()]
    );
    assert_eq!(
        pokemon.owners_of_pokemon(fixture.squirtle.id).unwrap(),
        vec![fixture.ash.clone()]
    );
}

#[test]
fn linking_twice_keeps_a_single_pair() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();

    categories
        .link_pokemon(fixture.water.id, fixture.squirtle.id)
        .unwrap();
    categories
        .link_pokemon(fixture.water.id, fixture.squirtle.id)
        .unwrap();

    assert_eq!(
        categories.pokemon_by_category(fixture.water.id).unwrap().len(),
        1
    );
}

#[test]
fn pokemon_can_join_several_owners_and_categories() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);
    let misty = SqliteOwnerRepository::try_new(&conn)
        .unwrap()
        .create(&Owner::new("Misty", "Waterflower", fixture.kanto.id))
        .unwrap();
    let leaf = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .create(&Category::new("Leaf"))
        .unwrap();

    SqliteOwnerRepository::try_new(&conn)
        .unwrap()
        .link_pokemon(misty.id, fixture.squirtle.id)
        .unwrap();
    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .link_pokemon(leaf.id, fixture.squirtle.id)
        .unwrap();

    let pokemon = SqlitePokemonRepository::try_new(&conn).unwrap();
    assert_eq!(
        pokemon.owners_of_pokemon(fixture.squirtle.id).unwrap(),
        vec![fixture.ash.clone(), misty]
    );
    assert_eq!(
        pokemon.categories_of_pokemon(fixture.squirtle.id).unwrap(),
        vec![fixture.water.clone(), leaf]
    );
}

#[test]
fn link_to_missing_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);

    let err = SqliteOwnerRepository::try_new(&conn)
        .unwrap()
        .link_pokemon(fixture.ash.id, 404)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "pokemon",
            id: 404
        }
    ));

    let err = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .link_pokemon(404, fixture.squirtle.id)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "category",
            id: 404
        }
    ));
}

#[test]
fn country_and_owner_navigate_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);
    let countries = SqliteCountryRepository::try_new(&conn).unwrap();

    assert_eq!(
        countries.owners_from_country(fixture.kanto.id).unwrap(),
        vec![fixture.ash.clone()]
    );
    assert_eq!(
        countries.country_by_owner(fixture.ash.id).unwrap(),
        Some(fixture.kanto.clone())
    );
    assert_eq!(
        SqliteOwnerRepository::try_new(&conn)
            .unwrap()
            .country_by_owner(fixture.ash.id)
            .unwrap(),
        Some(fixture.kanto.clone())
    );
    assert_eq!(countries.owner_count(fixture.kanto.id).unwrap(), 1);
    assert_eq!(countries.country_by_owner(404).unwrap(), None);
}

#[test]
fn reviews_resolve_their_pokemon_and_reviewer() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);
    let teddy = SqliteReviewerRepository::try_new(&conn)
        .unwrap()
        .create(&Reviewer::new("Teddy", "Smith"))
        .unwrap();
    let reviews = SqliteReviewRepository::try_new(&conn).unwrap();
    let review = reviews
        .create(&Review::new(
            "Squirtle",
            "Squirtle is the best pokemon, because it is wet",
            5,
            fixture.squirtle.id,
            teddy.id,
        ))
        .unwrap();

    assert_eq!(
        reviews.reviews_of_pokemon(fixture.squirtle.id).unwrap(),
        vec![review.clone()]
    );
    assert_eq!(
        reviews.pokemon_of_review(review.id).unwrap(),
        Some(fixture.squirtle.clone())
    );
    assert_eq!(reviews.reviewer_of_review(review.id).unwrap(), Some(teddy.clone()));
    assert_eq!(reviews.pokemon_of_review(404).unwrap(), None);

    let reviewers = SqliteReviewerRepository::try_new(&conn).unwrap();
    assert_eq!(
        reviewers.reviews_by_reviewer(teddy.id).unwrap(),
        vec![review]
    );
    assert_eq!(reviewers.review_count(teddy.id).unwrap(), 1);
}

#[test]
fn deleting_owner_drops_links_but_keeps_pokemon() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);

    SqliteOwnerRepository::try_new(&conn)
        .unwrap()
        .delete(&fixture.ash)
        .unwrap();

    let pokemon = SqlitePokemonRepository::try_new(&conn).unwrap();
    assert!(pokemon.exists(fixture.squirtle.id).unwrap());
    assert!(pokemon
        .owners_of_pokemon(fixture.squirtle.id)
        .unwrap()
        .is_empty());
}

#[test]
fn deleting_category_drops_links_but_keeps_pokemon() {
    let conn = open_db_in_memory().unwrap();
    let fixture = setup(&conn);

    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .delete(&fixture.water)
        .unwrap();

    let pokemon = SqlitePokemonRepository::try_new(&conn).unwrap();
    assert!(pokemon.exists(fixture.squirtle.id).unwrap());
    assert!(pokemon
        .categories_of_pokemon(fixture.squirtle.id)
        .unwrap()
        .is_empty());
}
