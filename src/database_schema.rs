use crate::column_mapping::column_meta;
use crate::error::SchemaError;
use crate::name_transform::to_class_name;
use crate::types::{ColumnMeta, ForeignKeyMeta, TableMetadata};
use sea_query::{ForeignKeyCreateStatement, TableCreateStatement, TableForeignKey};
use sea_schema::sqlite::def::{Schema, TableDef};
use sea_schema::sqlite::discovery::SchemaDiscovery;
use sqlx::SqlitePool;
use tracing::debug;

/// Where table metadata comes from.
pub trait SchemaSource {
    /// Metadata for every table, with class names placed in `namespace`.
    fn all_metadata(&self, namespace: &str) -> Result<Vec<TableMetadata>, SchemaError>;
}

/// Reads the live schema of a SQLite database. Every call connects and
/// discovers afresh.
#[derive(Clone, Debug)]
pub struct SqliteSchemaSource {
    database_url: String,
}

impl SqliteSchemaSource {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    async fn discover(&self) -> Result<Schema, SchemaError> {
        let connection = SqlitePool::connect(&self.database_url)
            .await
            .map_err(|err| SchemaError::Connection(err.to_string()))?;

        let schema_discovery = SchemaDiscovery::new(connection.clone());
        let schema = schema_discovery
            .discover()
            .await
            .map_err(|err| SchemaError::Discovery(format!("{:?}", err)));

        connection.close().await;

        schema
    }
}

impl SchemaSource for SqliteSchemaSource {
    fn all_metadata(&self, namespace: &str) -> Result<Vec<TableMetadata>, SchemaError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SchemaError::Runtime)?;

        let schema: Schema = runtime.block_on(self.discover())?;

        debug!(tables = schema.tables.len(), "schema discovered");

        Ok(schema
            .tables
            .iter()
            .map(|table: &TableDef| table_metadata(&table.name, &table.write(), namespace))
            .collect())
    }
}

pub fn table_metadata(
    table_name: &str,
    table_create_stmt: &TableCreateStatement,
    namespace: &str,
) -> TableMetadata {
    let columns: Vec<ColumnMeta> = table_create_stmt
        .get_columns()
        .iter()
        .map(column_meta)
        .collect();

    let foreign_keys: Vec<ForeignKeyMeta> = table_create_stmt
        .get_foreign_key_create_stmts()
        .iter()
        .map(|fk: &ForeignKeyCreateStatement| fk.get_foreign_key())
        .filter_map(|fk: &TableForeignKey| parse_table_fk(fk, &columns, namespace))
        .collect();

    TableMetadata::new(table_name, namespace)
        .with_columns(columns)
        .with_foreign_keys(foreign_keys)
}

fn parse_table_fk(fk: &TableForeignKey, columns: &[ColumnMeta], namespace: &str) -> Option<ForeignKeyMeta> {
    let ref_table = fk.get_ref_table()?.to_string();
    let fk_columns = fk.get_columns();

    let optional = fk_columns.iter().any(|name| {
        columns
            .iter()
            .find(|column: &&ColumnMeta| column.column_name.eq(name))
            .map_or(true, |column| !column.not_null)
    });

    Some(ForeignKeyMeta {
        ref_class: format!("{}{}", namespace, to_class_name(&ref_table)),
        ref_table,
        columns: fk_columns,
        ref_columns: fk.get_ref_columns(),
        optional,
    })
}
