use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use meow_service::{
    database,
    prelude::{CatRepository, Config, DatabaseConfig, NewCat, PgCatRepository},
};

#[derive(Subcommand)]
pub enum DbCommands {
    /// Apply pending schema migrations
    Migrate {
        /// Connection URL; falls back to the service configuration
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Replace every cat with the sample records
    Seed {
        /// Connection URL; falls back to the service configuration
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}

pub async fn execute(command: DbCommands) -> Result<()> {
    match command {
        DbCommands::Migrate { database_url } => migrate(database_url).await,
        DbCommands::Seed { database_url } => seed(database_url).await,
    }
}

async fn migrate(database_url: Option<String>) -> Result<()> {
    let config = resolve_database(database_url)?;
    let pool = database::create_pool(&config).await?;

    println!("{}", "Applying migrations...".bold());
    database::run_migrations(&pool).await?;

    for migration in database::MIGRATOR.iter() {
        println!("  {} {} {}", "✓".green(), migration.version, migration.description);
    }
    println!("{}", "Migrations complete.".green().bold());
    Ok(())
}

async fn seed(database_url: Option<String>) -> Result<()> {
    let config = resolve_database(database_url)?;
    let pool = database::create_pool(&config).await?;
    let repository = PgCatRepository::new(pool);

    println!("{}", "Start seeding...".bold());

    let removed = repository
        .delete_all()
        .await
        .context("Failed to clear the cats table")?;
    if removed > 0 {
        println!("  Removed {} existing cats", removed);
    }

    for cat in sample_cats() {
        let name = cat.name.clone();
        let created = repository
            .create(cat)
            .await
            .with_context(|| format!("Failed to create {name}"))?;
        println!("  {} Created cat with id: {}", "✓".green(), created.id.cyan());
    }

    println!("{}", "Seeding finished.".green().bold());
    Ok(())
}

/// `--database-url` wins; otherwise the `[database]` section of the service config
fn resolve_database(database_url: Option<String>) -> Result<DatabaseConfig> {
    if let Some(url) = database_url {
        return Ok(DatabaseConfig::with_url(url));
    }

    let config = Config::load().context("Failed to load service configuration")?;
    config
        .database
        .context("No database configured. Pass --database-url or set DATABASE_URL.")
}

fn sample_cats() -> Vec<NewCat> {
    vec![
        NewCat {
            name: "Luna".to_string(),
            age: Some(3),
            breed: "Persian".to_string(),
            image_url: Some("https://images.pexels.com/photos/1644767/pexels-photo-1644767.jpeg".to_string()),
        },
        NewCat {
            name: "Oliver".to_string(),
            age: Some(2),
            breed: "Siamese".to_string(),
            image_url: Some(
                "https://images.pexels.com/photos/357141/pexels-photo-357141.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
        },
        NewCat {
            name: "Milo".to_string(),
            age: Some(1),
            breed: "Maine Coon".to_string(),
            image_url: None,
        },
        NewCat {
            name: "Bella".to_string(),
            age: None,
            breed: "Ragdoll".to_string(),
            image_url: Some(
                "https://images.pexels.com/photos/208773/pexels-photo-208773.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use meow_service::cats::dto::{CreateCatRequest, CREATE_CAT};
    use meow_service::validation::{validate, FromPayload};
    use serde_json::{json, Map, Value};

    fn as_payload(cat: &NewCat) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("name".into(), json!(cat.name));
        payload.insert("breed".into(), json!(cat.breed));
        if let Some(age) = cat.age {
            payload.insert("age".into(), json!(age));
        }
        if let Some(url) = &cat.image_url {
            payload.insert("imageUrl".into(), json!(url));
        }
        payload
    }

    #[test]
    fn test_sample_cats_pass_create_validation() {
        for cat in sample_cats() {
            let payload = as_payload(&cat);
            assert!(validate(CREATE_CAT, &payload).is_ok(), "{} is invalid", cat.name);

            let request = CreateCatRequest::from_payload(&payload).unwrap();
            assert_eq!(NewCat::from(request), cat);
        }
    }

    #[test]
    fn test_explicit_url_skips_config() {
        let config = resolve_database(Some("postgres://localhost/cats".to_string())).unwrap();
        assert_eq!(config.url, "postgres://localhost/cats");
        assert!(!config.run_migrations);
    }
}
