use anyhow::{Context, Result};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Error when connect to db")
}

pub async fn init_mongo(uri: &str, database: &str) -> Result<Database> {
    let options = ClientOptions::parse(uri)
        .await
        .context("Error when parse MONGODB_URI")?;
    let client = Client::with_options(options).context("Error when connect to mongodb")?;

    Ok(client.database(database))
}
