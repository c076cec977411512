use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Database {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
    /// Full connection string; when set it wins over the parts above.
    pub url: Option<String>,
}

impl Database {
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            ),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            user: "thunderbolts".into(),
            password: "password".into(),
            host: "localhost".into(),
            port: "5432".into(),
            database: "thunderbolts".into(),
            url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Pool {
    pub size: u32,
}

impl Default for Pool {
    fn default() -> Self {
        Self { size: 5 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[allow(unused)]
pub struct Settings {
    pub database: Database,
    pub server: Server,
    pub pool: Pool,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.user", "thunderbolts")?
            .set_default("database.password", "password")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", "5432")?
            .set_default("database.database", "thunderbolts")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("pool.size", 5)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_settings() {
        set_var("DATABASE_USER", "admin_2");
        set_var("SERVER_PORT", "9090");
        let settings = Settings::new().unwrap_or_default();
        println!("Settings = {:?}", settings);
        assert_eq!(settings.database.user, "admin_2");
        assert_eq!(settings.server.address(), "0.0.0.0:9090");
        assert_eq!(settings.pool.size, 5);
    }

    #[test]
    fn test_database_url_override() {
        set_var("DATABASE_URL", "postgres://admin:secret@db:5433/thunderbolts");
        let settings = Settings::new().unwrap_or_default();
        assert_eq!(
            settings.database.url(),
            "postgres://admin:secret@db:5433/thunderbolts"
        );
    }
}
