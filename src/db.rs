// connexion BD

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use sea_orm::sea_query::TableCreateStatement;
use std::env;

use crate::models::trade;

pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    // Par défaut: fichier SQLite local, créé au premier lancement
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://portfolio.db?mode=rwc".to_string());

    Database::connect(&database_url).await
}

/// Crée la table trades si elle n'existe pas encore (premier lancement)
pub async fn init_db(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement: TableCreateStatement = schema.create_table_from_entity(trade::Entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}
