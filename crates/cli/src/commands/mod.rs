//! CLI subcommand implementations.

pub mod migrate;
pub mod user;

use secrecy::SecretString;

/// Read the database URL the API itself would use.
///
/// # Errors
///
/// Returns the name of the primary variable if neither is set.
pub fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();

    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "API_DATABASE_URL")
}
