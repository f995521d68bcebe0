//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pokereview_core` linkage and open the configured catalog.
//! - Print a deterministic catalog summary for quick local sanity checks.
//!
//! Settings come from `POKEREVIEW_*` environment variables; see
//! `pokereview_core::config`.

use log::error;
use pokereview_core::{
    init_logging, open_db, open_db_in_memory, seed_sample_catalog, CatalogConfig,
    CatalogService, Category, Country, Owner, Pokemon, Review, Reviewer,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("pokereview_core ping={}", pokereview_core::ping());
    println!("pokereview_core version={}", pokereview_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CatalogConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    if config.seed {
        let summary = seed_sample_catalog(&conn)?;
        if summary.is_empty() {
            println!("seed skipped: catalog is not empty");
        } else {
            println!(
                "seeded pokemon={} reviews={}",
                summary.pokemon, summary.reviews
            );
        }
    }

    let service = CatalogService::try_new(&conn)?;
    println!("countries={}", service.list::<Country>()?.len());
    println!("categories={}", service.list::<Category>()?.len());
    println!("owners={}", service.list::<Owner>()?.len());
    println!("reviewers={}", service.list::<Reviewer>()?.len());
    println!("reviews={}", service.list::<Review>()?.len());

    let pokemon = service.list::<Pokemon>()?;
    println!("pokemon={}", pokemon.len());
    for entry in &pokemon {
        println!(
            "  {} born={} rating={:.2}",
            entry.name,
            entry.birth_date,
            service.pokemon_rating(entry.id)?
        );
    }

    Ok(())
}
