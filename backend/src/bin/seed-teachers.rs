//! Register teacher usernames so they can manage announcements.
//!
//! Usage:
//!   DATABASE_URL=... ./seed-teachers mrodriguez mchen --display-name "Staff"
//!
//! Existing usernames are left untouched, so the command is safe to re-run.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use announcements_api::{
    db::{self, PgRecordStore},
    store::{RecordStore, TEACHERS},
};

#[derive(Parser)]
#[command(name = "seed-teachers", about = "Register teacher accounts for the announcements API")]
struct Args {
    /// Usernames to register
    #[arg(required = true)]
    usernames: Vec<String>,

    /// Display name stored alongside each username (defaults to the username)
    #[arg(long)]
    display_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let pool = db::create_pool(&database_url, 5)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;

    let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(pool));

    let mut created = 0;
    for username in &args.usernames {
        if store.find_one(TEACHERS, username).await?.is_some() {
            tracing::info!("Teacher {} already registered, skipping", username);
            continue;
        }

        let display_name = args.display_name.as_deref().unwrap_or(username);
        let Value::Object(record) = json!({
            "_id": username,
            "display_name": display_name,
        }) else {
            anyhow::bail!("teacher record is not a JSON object");
        };

        store
            .insert(TEACHERS, record)
            .await
            .with_context(|| format!("Failed to insert teacher {username}"))?;
        tracing::info!("Registered teacher {}", username);
        created += 1;
    }

    tracing::info!(
        "Done: {} registered, {} already present",
        created,
        args.usernames.len() - created
    );
    Ok(())
}
