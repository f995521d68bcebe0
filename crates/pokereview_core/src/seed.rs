//! Deterministic sample catalog.
//!
//! # Invariants
//! - Seeding only runs against a catalog with no records at all.
//! - All sample rows are written in one transaction.

use crate::model::category::Category;
use crate::model::country::Country;
use crate::model::owner::Owner;
use crate::model::pokemon::Pokemon;
use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use crate::repo::pokemon_repo::create_linked_pokemon;
use crate::repo::record_repo::{Record, RepoError, RepoResult, Repository, SqliteRepository};
use chrono::NaiveDate;
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Counts of records written by [`seed_sample_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub countries: usize,
    pub categories: usize,
    pub owners: usize,
    pub reviewers: usize,
    pub pokemon: usize,
    pub reviews: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

struct SamplePokemon {
    name: &'static str,
    born: (i32, u32, u32),
    owner: usize,
    category: usize,
    reviews: &'static [(&'static str, &'static str, i64, usize)],
}

const COUNTRIES: &[&str] = &["Kanto", "Saffron City", "Millet Town"];
const CATEGORIES: &[&str] = &["Electric", "Water", "Leaf"];
const OWNERS: &[(&str, &str, &str, usize)] = &[
    ("Jack", "London", "Brocks Gym", 0),
    ("Harry", "Potter", "Mistys Gym", 1),
    ("Ash", "Ketchum", "Ashs Gym", 2),
];
const REVIEWERS: &[(&str, &str)] = &[
    ("Teddy", "Smith"),
    ("Taylor", "Jones"),
    ("Jessica", "McGregor"),
];
const POKEMON: &[SamplePokemon] = &[
    SamplePokemon {
        name: "Pikachu",
        born: (1903, 1, 1),
        owner: 0,
        category: 0,
        reviews: &[
            ("Pikachu", "Pikachu is the best pokemon, because it is electric", 5, 0),
            ("Pikachu, again", "Pikachu is the best at killing rocks", 5, 1),
            ("Pikachu never again", "Pikachu, pikachu, pikachu", 1, 2),
        ],
    },
    SamplePokemon {
        name: "Squirtle",
        born: (1903, 1, 1),
        owner: 1,
        category: 1,
        reviews: &[
            ("Squirtle", "Squirtle is the best pokemon, because it is wet", 5, 0),
            ("Squirtle in the rain", "Squirtle is the best at killing rocks", 5, 1),
            ("Squirtle squirt", "Squirtle, squirtle, squirtle", 1, 2),
        ],
    },
    SamplePokemon {
        name: "Venusaur",
        born: (1903, 1, 1),
        owner: 2,
        category: 2,
        reviews: &[
            ("Venusaur", "Venusaur is the best pokemon, because it is a plant", 5, 0),
            ("Venusaur in the garden", "Venusaur is the best at killing rocks", 5, 1),
            ("Venusaur wilted", "Venusaur, venusaur, venusaur", 1, 2),
        ],
    },
];

/// Writes the sample catalog when the store is empty.
///
/// Returns an empty summary, and writes nothing, when any record exists.
pub fn seed_sample_catalog(conn: &Connection) -> RepoResult<SeedSummary> {
    if !catalog_is_empty(conn)? {
        info!("event=catalog_seed module=seed status=skipped reason=not_empty");
        return Ok(SeedSummary::default());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let summary = write_sample_catalog(&tx)?;
    tx.commit()?;

    info!(
        "event=catalog_seed module=seed status=ok pokemon={} reviews={}",
        summary.pokemon, summary.reviews
    );
    Ok(summary)
}

fn write_sample_catalog(conn: &Connection) -> RepoResult<SeedSummary> {
    let countries = COUNTRIES
        .iter()
        .map(|name| repo::<Country>(conn).create(&Country::new(*name)))
        .collect::<RepoResult<Vec<_>>>()?;
    let categories = CATEGORIES
        .iter()
        .map(|name| repo::<Category>(conn).create(&Category::new(*name)))
        .collect::<RepoResult<Vec<_>>>()?;
    let owners = OWNERS
        .iter()
        .map(|(first, last, gym, country)| {
            let owner = Owner::new(*first, *last, countries[*country].id).at_gym(*gym);
            repo::<Owner>(conn).create(&owner)
        })
        .collect::<RepoResult<Vec<_>>>()?;
    let reviewers = REVIEWERS
        .iter()
        .map(|(first, last)| repo::<Reviewer>(conn).create(&Reviewer::new(*first, *last)))
        .collect::<RepoResult<Vec<_>>>()?;

    let mut summary = SeedSummary {
        countries: countries.len(),
        categories: categories.len(),
        owners: owners.len(),
        reviewers: reviewers.len(),
        ..SeedSummary::default()
    };

    for sample in POKEMON {
        let (year, month, day) = sample.born;
        let birth_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid sample birth date for {}", sample.name))
        })?;
        let pokemon = create_linked_pokemon(
            conn,
            owners[sample.owner].id,
            categories[sample.category].id,
            &Pokemon::new(sample.name, birth_date),
        )?;
        summary.pokemon += 1;

        for (title, text, rating, reviewer) in sample.reviews {
            repo::<Review>(conn).create(&Review::new(
                *title,
                *text,
                *rating,
                pokemon.id,
                reviewers[*reviewer].id,
            ))?;
            summary.reviews += 1;
        }
    }

    Ok(summary)
}

fn repo<E: Record>(conn: &Connection) -> SqliteRepository<'_, E> {
    SqliteRepository::attach(conn)
}

fn catalog_is_empty(conn: &Connection) -> RepoResult<bool> {
    Ok(SqliteRepository::<Country>::try_new(conn)?.count()? == 0
        && repo::<Category>(conn).count()? == 0
        && repo::<Owner>(conn).count()? == 0
        && repo::<Reviewer>(conn).count()? == 0
        && repo::<Pokemon>(conn).count()? == 0
        && repo::<Review>(conn).count()? == 0)
}
