use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::statement::Statement;

use super::{ItemStore, StoreError};
use crate::config::SpannerConfig;
use crate::models::{Item, item_id};

/// Item table stored in Cloud Spanner, one row per item.
///
/// The whole item (including `id`) is kept as JSON in the `data` column.
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
    table: String,
}

fn backend_error<E: Display>(action: &'static str) -> impl FnOnce(E) -> StoreError {
    move |e| StoreError::Backend(format!("{}: {}", action, e))
}

impl SpannerStore {
    /// Connect to the configured database, provisioning the instance,
    /// database and item table first if they don't exist.
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own
    /// and connects to the emulator when set.
    pub async fn from_config(config: &SpannerConfig, table: &str) -> Result<Self> {
        auto_provision(config, table).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.project, config.instance, config.database
        );

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {} (table: {})",
            database_path,
            table
        );

        Ok(Self {
            inner: Arc::new(client),
            table: table.to_string(),
        })
    }
}

#[async_trait]
impl ItemStore for SpannerStore {
    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let sql = format!("SELECT data FROM {}", self.table);
        let statement = Statement::new(&sql);

        let mut tx = self
            .inner
            .single()
            .await
            .map_err(backend_error("Failed to create read transaction"))?;

        let mut result_set = tx
            .query(statement)
            .await
            .map_err(backend_error("Failed to scan items from Spanner"))?;

        let mut items = Vec::new();
        while let Some(row) = result_set
            .next()
            .await
            .map_err(backend_error("Failed to read scan results"))?
        {
            let data: String = row
                .column_by_name("data")
                .map_err(backend_error("Failed to read data column"))?;
            let item: Item = serde_json::from_str(&data)
                .context("Failed to deserialize stored item")?;
            items.push(item);
        }

        tracing::debug!("Scanned {} items from {}", items.len(), self.table);
        Ok(items)
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let sql = format!("SELECT data FROM {} WHERE id = @id", self.table);
        let mut statement = Statement::new(&sql);
        let key = id.to_string();
        statement.add_param("id", &key);

        let mut tx = self
            .inner
            .single()
            .await
            .map_err(backend_error("Failed to create read transaction"))?;

        let mut result_set = tx
            .query(statement)
            .await
            .map_err(backend_error("Failed to query item from Spanner"))?;

        match result_set
            .next()
            .await
            .map_err(backend_error("Failed to read query results"))?
        {
            Some(row) => {
                let data: String = row
                    .column_by_name("data")
                    .map_err(backend_error("Failed to read data column"))?;
                let item: Item = serde_json::from_str(&data)
                    .context("Failed to deserialize stored item")?;

                tracing::debug!("Read item with id: {}", id);
                Ok(Some(item))
            }
            None => {
                tracing::debug!("Item not found with id: {}", id);
                Ok(None)
            }
        }
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let id = item_id(&item)
            .ok_or_else(|| StoreError::Backend("item is missing a string `id` field".to_string()))?
            .to_string();
        let data = serde_json::to_string(&item).context("Failed to serialize item")?;

        let mutation = insert_or_update(&self.table, &["id", "data"], &[&id, &data]);

        self.inner
            .apply(vec![mutation])
            .await
            .map_err(backend_error("Failed to put item to Spanner"))?;

        tracing::debug!("Put item with id: {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let key = id.to_string();
        let mutation = delete(&self.table, Key::new(&key));

        self.inner
            .apply(vec![mutation])
            .await
            .map_err(backend_error("Failed to delete item from Spanner"))?;

        tracing::debug!("Deleted item with id: {}", id);
        Ok(())
    }

    /// Runs `SELECT 1` to verify the connection is alive
    async fn health_check(&self) -> Result<(), StoreError> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .map_err(backend_error("Failed to create health check transaction"))?;

        let mut result_set = tx
            .query(statement)
            .await
            .map_err(backend_error("Failed to execute health check query"))?;

        if result_set
            .next()
            .await
            .map_err(backend_error("Failed to read health check result"))?
            .is_some()
        {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(StoreError::Backend(
                "Health check query returned no results".to_string(),
            ))
        }
    }
}

/// Create the Spanner instance, database and item table when missing.
///
/// Lets local development against the emulator start from nothing.
async fn auto_provision(config: &SpannerConfig, table: &str) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = format!("{}/databases/{}", instance_path, config.database);

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path, table).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-east1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

fn create_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE {} (\n    id STRING(MAX) NOT NULL,\n    data JSON NOT NULL,\n) PRIMARY KEY (id)",
        table
    )
}

fn ddl_declares_table(statements: &[String], table: &str) -> bool {
    let plain = format!("CREATE TABLE {} ", table);
    let plain_paren = format!("CREATE TABLE {}(", table);
    let quoted = format!("CREATE TABLE `{}`", table);
    statements
        .iter()
        .any(|stmt| stmt.contains(&plain) || stmt.contains(&plain_paren) || stmt.contains(&quoted))
}

async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    if ddl_declares_table(&ddl_response.into_inner().statements, table) {
        tracing::info!("Table '{}' already exists", table);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", table);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl(table)],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", table);
    Ok(())
}
