//! Database seeder for local development.
//!
//! Runs pending migrations, seeds a demo koperasi with the default chart of
//! accounts and prints a development token for its administrator.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use koperasi_db::AccountRepository;
use koperasi_db::migration::{Migrator, MigratorTrait};
use koperasi_shared::types::{KoperasiId, TenantId, UserId};
use koperasi_shared::{AppConfig, JwtConfig, JwtService, RequestContext, Role};
use uuid::Uuid;

/// Demo tenant ID (stable across runs).
const DEMO_TENANT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
/// Demo koperasi ID (stable across runs).
const DEMO_KOPERASI_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
/// Demo administrator ID (stable across runs).
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = koperasi_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    println!("Running migrations...");
    Migrator::up(&db, None).await.context("Migration failed")?;

    let ctx = RequestContext::new(
        TenantId::from(DEMO_TENANT_ID),
        KoperasiId::from(DEMO_KOPERASI_ID),
        UserId::from(DEMO_USER_ID),
        Role::AdminTenant,
    );

    println!("Seeding default chart of accounts...");
    let created = AccountRepository::new(db)
        .seed_default_chart(ctx)
        .await
        .context("Failed to seed chart of accounts")?;
    if created == 0 {
        println!("  Chart already present, skipping...");
    } else {
        println!("  Created {created} accounts");
    }

    let jwt = JwtService::new(JwtConfig::from(&config.jwt));
    let token = jwt
        .generate_access_token(&ctx)
        .context("Failed to issue development token")?;

    println!("Seeding complete!");
    println!();
    println!("  tenant_id:   {}", ctx.tenant_id);
    println!("  koperasi_id: {}", ctx.koperasi_id);
    println!("  user_id:     {}", ctx.user_id);
    println!("  token:       {token}");

    Ok(())
}
