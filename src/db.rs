use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

/// Lazy pool: nothing connects until the first query, so a database that is
/// down surfaces per request instead of stopping the server from starting.
pub fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)
}
