use std::env;
use anyhow::{bail, Context, Result};

/// Which table implementation backs the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Spanner,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "spanner" => Ok(StoreBackend::Spanner),
            other => bail!("STORE_BACKEND must be one of: memory, spanner, got '{}'", other),
        }
    }
}

/// Coordinates of the Spanner database holding the item table
#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub route_prefix: String,
    pub service_host: String,
    pub service_port: u16,
    pub store_backend: StoreBackend,
    pub item_table: String,
    pub spanner: Option<SpannerConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let route_prefix = normalize_prefix(
            &env::var("ROUTE_PREFIX").unwrap_or_else(|_| "/dev/picus".to_string()),
        );

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "8082".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string());

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::Spanner,
        };

        let item_table = env::var("ITEM_TABLE").unwrap_or_else(|_| "TestDB".to_string());
        if item_table.is_empty()
            || !item_table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("ITEM_TABLE must be a non-empty identifier of letters, digits and underscores, got '{}'", item_table);
        }

        let spanner = match store_backend {
            StoreBackend::Spanner => Some(SpannerConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Config {
            route_prefix,
            service_host,
            service_port,
            store_backend,
            item_table,
            spanner,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Route prefix: {}",
            if self.route_prefix.is_empty() { "(none)" } else { &self.route_prefix });
        tracing::info!("  Store backend: {:?}", self.store_backend);
        tracing::info!("  Item table: {}", self.item_table);
        if let Some(spanner) = &self.spanner {
            tracing::info!("  Spanner emulator: {}",
                spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", spanner.project);
            tracing::info!("  Spanner instance: {}", spanner.instance);
            tracing::info!("  Spanner database: {}", spanner.database);
        }
        tracing::info!("  Service listening on: {}", self.bind_addr());
    }
}

impl SpannerConfig {
    fn from_env() -> Result<Self> {
        let emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        Ok(SpannerConfig {
            emulator_host,
            project,
            instance,
            database,
        })
    }
}

/// Leading slash, no trailing slash; `""` mounts the routes at the root
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
