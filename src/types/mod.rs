pub mod column_meta;
pub mod foreign_key_meta;
pub mod table_meta;

pub use column_meta::ColumnMeta;
pub use foreign_key_meta::ForeignKeyMeta;
pub use table_meta::TableMetadata;
