use db_migration::Migrator;
use sea_orm_migration::cli;

/// Manual schema management for the task items store, e.g. `up`, `down`,
/// `status`. Reads `DATABASE_URL`.
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
