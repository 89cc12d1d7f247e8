use sea_orm_migration::prelude::*;

use vahan_tag_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
