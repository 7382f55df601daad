//! Connection configuration for the CLI tools and the live server.
//!
//! `DATABASE_URL` wins when present (hosted mode); otherwise the discrete
//! `PGHOST`/`PGPORT`/`PGUSER`/`PGPASSWORD`/`PGDATABASE` variables are used
//! (local mode). `WEMANAGE_ENV=production` turns on SSL without certificate
//! verification, which is what the hosted providers expect.

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use wemanage_core::{
    env_parse_with_default, env_string_with_default, ADMIN_DATABASE_NAME, DEFAULT_DATABASE_NAME,
};

use crate::error::StorageError;

/// Assembled connection settings.
#[derive(Clone)]
pub struct DbConfig {
    url: Option<String>,
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    /// Target database name (local mode; hosted mode takes it from the URL).
    pub database: String,
    production: bool,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("production", &self.production)
            .finish()
    }
}

impl DbConfig {
    /// Read connection settings from the environment.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            env_string_with_default("PGHOST", "localhost"),
            env_parse_with_default("PGPORT", 5432),
            env_string_with_default("PGUSER", "postgres"),
            std::env::var("PGPASSWORD").ok().filter(|v| !v.is_empty()),
            env_string_with_default("PGDATABASE", DEFAULT_DATABASE_NAME),
            env_string_with_default("WEMANAGE_ENV", "development") == "production",
        )
    }

    /// Assemble from explicit values. Split out of [`Self::from_env`] so the
    /// selection logic is testable without touching process environment.
    pub fn from_values(
        url: Option<String>,
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        database: String,
        production: bool,
    ) -> Self {
        Self { url, host, port, user, password, database, production }
    }

    /// Whether a single connection URI was provided (hosted mode).
    pub fn is_hosted(&self) -> bool {
        self.url.is_some()
    }

    /// Options for the target database.
    pub fn target_options(&self) -> Result<PgConnectOptions, StorageError> {
        match &self.url {
            Some(url) => {
                let opts: PgConnectOptions = url
                    .parse()
                    .map_err(|e| StorageError::Config(format!("malformed DATABASE_URL: {e}")))?;
                Ok(self.apply_ssl(opts))
            },
            None => Ok(self.apply_ssl(self.discrete_options().database(&self.database))),
        }
    }

    /// Options for the maintenance database, used by `init` in local mode to
    /// run `CREATE DATABASE`. Not available in hosted mode: hosted providers
    /// provision the database, only the target URI is known.
    pub fn admin_options(&self) -> Result<PgConnectOptions, StorageError> {
        if self.is_hosted() {
            return Err(StorageError::Config(
                "admin connection is not available when DATABASE_URL is set".to_owned(),
            ));
        }
        Ok(self.apply_ssl(self.discrete_options().database(ADMIN_DATABASE_NAME)))
    }

    /// Open ONE connection to the target database.
    ///
    /// CLI operations hold exactly one connection for their lifetime and
    /// close it explicitly on every exit path.
    pub async fn connect_target(&self) -> Result<PgConnection, StorageError> {
        Ok(PgConnection::connect_with(&self.target_options()?).await.map_err(StorageError::Database)?)
    }

    /// Open ONE connection to the maintenance database (local mode only).
    pub async fn connect_admin(&self) -> Result<PgConnection, StorageError> {
        Ok(PgConnection::connect_with(&self.admin_options()?).await.map_err(StorageError::Database)?)
    }

    fn discrete_options(&self) -> PgConnectOptions {
        let mut opts =
            PgConnectOptions::new().host(&self.host).port(self.port).username(&self.user);
        if let Some(password) = &self.password {
            opts = opts.password(password);
        }
        opts
    }

    fn apply_ssl(&self, opts: PgConnectOptions) -> PgConnectOptions {
        if self.production {
            // Require encrypts the link but skips certificate verification,
            // matching the hosted providers' self-signed chains.
            opts.ssl_mode(PgSslMode::Require)
        } else {
            opts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(production: bool) -> DbConfig {
        DbConfig::from_values(
            None,
            "db.example.test".to_owned(),
            5433,
            "app".to_owned(),
            Some("hunter2".to_owned()),
            "wemanageall".to_owned(),
            production,
        )
    }

    #[test]
    fn url_wins_over_discrete_parameters() {
        let config = DbConfig::from_values(
            Some("postgres://u:p@h:5432/db".to_owned()),
            "ignored".to_owned(),
            5432,
            "ignored".to_owned(),
            None,
            "ignored".to_owned(),
            false,
        );
        assert!(config.is_hosted());
        assert!(config.target_options().is_ok());
        assert!(config.admin_options().is_err());
    }

    #[test]
    fn discrete_parameters_build_target_and_admin_options() {
        let config = local(false);
        assert!(!config.is_hosted());
        let target = config.target_options().unwrap();
        assert_eq!(target.get_host(), "db.example.test");
        assert_eq!(target.get_port(), 5433);
        assert_eq!(target.get_database(), Some("wemanageall"));
        let admin = config.admin_options().unwrap();
        assert_eq!(admin.get_database(), Some("postgres"));
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        let config = DbConfig::from_values(
            Some("not a uri".to_owned()),
            String::new(),
            5432,
            String::new(),
            None,
            String::new(),
            false,
        );
        assert!(matches!(config.target_options(), Err(StorageError::Config(_))));
    }

    #[test]
    fn debug_redacts_secrets() {
        let s = format!("{:?}", local(true));
        assert!(!s.contains("hunter2"));
        assert!(s.contains("***"));
    }
}
