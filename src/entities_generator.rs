use crate::column_mapping::{accessor_mapping, field_mapping};
use crate::error::EmitError;
use crate::name_transform::{class_file_path, rust_ident, rust_path_segments};
use crate::region::{close_marker, merge, open_marker};
use crate::rustfmt::format_file;
use crate::types::TableMetadata;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, info};

/// Name of the region in entity files that is carried over on update.
pub const CUSTOM_REGION: &str = "custom";

const HEADER: &str = "// Generated entity. Everything outside the `custom` region is rewritten on regeneration.";

pub trait EntityEmitter {
    /// Writes one entity file per table below `dir`.
    fn generate(&self, metadata: &[TableMetadata], dir: &Path) -> Result<(), EmitError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityWrite {
    Created,
    Regenerated,
    Updated,
    Skipped,
}

/// Emits entities as Rust structs.
///
/// What happens to a file that already exists is decided by three switches:
/// `regenerate_if_exists` rewrites it from scratch, `update_if_exists` keeps
/// the hand-written `custom` region and rewrites the rest, and with neither
/// set the file is left alone. `backup_existing` copies the old file to
/// `<file>~` before it is replaced.
#[derive(Clone, Debug)]
pub struct RustEntityEmitter {
    regenerate_if_exists: bool,
    update_if_exists: bool,
    backup_existing: bool,
    rustfmt: bool,
}

impl Default for RustEntityEmitter {
    fn default() -> Self {
        Self {
            regenerate_if_exists: false,
            update_if_exists: true,
            backup_existing: false,
            rustfmt: false,
        }
    }
}

impl RustEntityEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regenerate_if_exists(mut self, value: bool) -> Self {
        self.regenerate_if_exists = value;
        self
    }

    pub fn update_if_exists(mut self, value: bool) -> Self {
        self.update_if_exists = value;
        self
    }

    pub fn backup_existing(mut self, value: bool) -> Self {
        self.backup_existing = value;
        self
    }

    pub fn rustfmt(mut self, value: bool) -> Self {
        self.rustfmt = value;
        self
    }

    pub fn write_entity(&self, table: &TableMetadata, dir: &Path) -> Result<EntityWrite, EmitError> {
        let path = class_file_path(dir, &table.qualified_name());
        let template = render_entity(table)?;

        let (contents, action) = if !path.exists() {
            (template, EntityWrite::Created)
        } else if self.regenerate_if_exists {
            (template, EntityWrite::Regenerated)
        } else if self.update_if_exists {
            let existing = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
            let merged = merge(&template, &existing).map_err(|source| EmitError::Region {
                path: path.clone(),
                source,
            })?;

            (merged, EntityWrite::Updated)
        } else {
            debug!(path = %path.display(), "entity exists, skipped");
            return Ok(EntityWrite::Skipped);
        };

        if action != EntityWrite::Created && self.backup_existing {
            let backup = backup_path(&path);
            fs::copy(&path, &backup).map_err(|source| io_error(&backup, source))?;
        }

        write_file(&path, &contents)?;
        if self.rustfmt {
            format_file(&path);
        }

        info!(entity = %table.qualified_name(), path = %path.display(), ?action, "entity written");

        Ok(action)
    }
}

impl EntityEmitter for RustEntityEmitter {
    fn generate(&self, metadata: &[TableMetadata], dir: &Path) -> Result<(), EmitError> {
        for table in metadata {
            self.write_entity(table, dir)?;
        }

        Ok(())
    }
}

pub fn render_entity(table: &TableMetadata) -> Result<String, EmitError> {
    let name = class_ident(&table.class_name)?;

    let fields: Vec<TokenStream> = table
        .columns
        .iter()
        .map(field_mapping)
        .collect::<Result<_, _>>()?;

    let accessors: Vec<TokenStream> = table
        .columns
        .iter()
        .map(accessor_mapping)
        .collect::<Result<_, _>>()?;

    let table_name = &table.table_name;
    let class = table.qualified_name();
    let repository = optional_str(table.repository_class_name.as_deref());
    let sequence = optional_str(table.sequence_name.as_deref());
    let superclass = optional_str(table.superclass_name.as_deref());

    let primary_key: Vec<&str> = table
        .primary_key()
        .map(|column| column.column_name.as_str())
        .collect();

    let nullable: Vec<&str> = table
        .columns
        .iter()
        .filter(|column| !column.not_null)
        .map(|column| column.column_name.as_str())
        .collect();

    let id_generator = id_generator(table);

    let relations: Vec<TokenStream> = table
        .foreign_keys
        .iter()
        .flat_map(|fk| {
            let ref_class = &fk.ref_class;
            let optional = fk.optional;

            fk.column_pairs().map(move |(column, ref_column)| {
                quote! { (#column, #ref_class, #ref_column, #optional) }
            })
        })
        .collect();

    let superclass_impl: TokenStream = match &table.superclass_name {
        Some(superclass) => {
            let path = superclass_path(superclass)?;
            quote! {
                impl #path for #name {}
            }
        }
        None => quote! {},
    };

    let doc = format!("Entity `{}` mapped to table `{}`.", class, table_name);

    let tokens = quote! {
        #[doc = #doc]
        #[derive(Clone, Debug, PartialEq)]
        pub struct #name {
            #(#fields),*
        }

        impl #name {
            pub const TABLE: &'static str = #table_name;
            pub const CLASS: &'static str = #class;
            pub const REPOSITORY: Option<&'static str> = #repository;
            pub const SEQUENCE: Option<&'static str> = #sequence;
            pub const SUPERCLASS: Option<&'static str> = #superclass;
            pub const PRIMARY_KEY: &'static [&'static str] = &[#(#primary_key),*];
            pub const ID_GENERATOR: &'static str = #id_generator;
            pub const NULLABLE: &'static [&'static str] = &[#(#nullable),*];
            /// `(column, referenced class, referenced column, optional)`
            pub const RELATIONS: &'static [(&'static str, &'static str, &'static str, bool)] = &[#(#relations),*];

            #(#accessors)*
        }

        #superclass_impl
    };

    Ok(format!(
        "{}\n{}\n\n{}\n{}\n",
        HEADER,
        tokens,
        open_marker(CUSTOM_REGION),
        close_marker(CUSTOM_REGION)
    ))
}

/// `SEQUENCE` when a sequence is assigned, `IDENTITY` for an auto-increment
/// primary key, `NONE` otherwise.
fn id_generator(table: &TableMetadata) -> &'static str {
    if table.sequence_name.is_some() {
        "SEQUENCE"
    } else if table.primary_key().any(|column| column.auto_increment) {
        "IDENTITY"
    } else {
        "NONE"
    }
}

fn class_ident(class_name: &str) -> Result<Ident, EmitError> {
    rust_ident(class_name).ok_or_else(|| EmitError::InvalidIdentifier {
        what: "class",
        name: class_name.to_string(),
    })
}

/// `Base\Entity` -> `crate::base::Entity`
fn superclass_path(superclass: &str) -> Result<TokenStream, EmitError> {
    let invalid = || EmitError::InvalidIdentifier {
        what: "superclass",
        name: superclass.to_string(),
    };

    let segments: Vec<Ident> = rust_path_segments(superclass)
        .iter()
        .map(|segment| rust_ident(segment).ok_or_else(invalid))
        .collect::<Result<_, _>>()?;

    if segments.is_empty() {
        return Err(invalid());
    }

    Ok(quote! { crate #(:: #segments)* })
}

fn optional_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote! { Some(#value) },
        None => quote! { None },
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_os_string();
    backup.push("~");
    PathBuf::from(backup)
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    fs::write(path, contents.as_bytes()).map_err(|source| io_error(path, source))
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> EmitError {
    EmitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnMeta, ForeignKeyMeta};

    fn orders() -> TableMetadata {
        let mut table = TableMetadata::new("orders", "App\\Entities\\")
            .with_columns(vec![
                ColumnMeta::new("id", "id", quote! { i32 })
                    .primary_key()
                    .auto_increment(),
                ColumnMeta::new("customer_id", "customer_id", quote! { Option<i32> }),
                ColumnMeta::new("placed_at", "placed_at", quote! { String }).not_null(),
            ])
            .with_foreign_keys(vec![ForeignKeyMeta {
                columns: vec!["customer_id".into()],
                ref_table: "customers".into(),
                ref_columns: vec!["id".into()],
                ref_class: "App\\Entities\\Customers".into(),
                optional: true,
            }]);
        table.repository_class_name = Some("App\\Repositories\\Orders".into());
        table
    }

    #[test]
    fn renders_struct_and_constants() {
        let source = render_entity(&orders()).unwrap();

        assert!(source.starts_with(HEADER));
        assert!(source.contains("pub struct Orders"));
        assert!(source.contains("pub customer_id : Option < i32 >"));
        assert!(source.contains(r#"TABLE : & 'static str = "orders""#));
        assert!(source.contains(r#"Some ("App\\Repositories\\Orders")"#));
        assert!(source.contains(r#"("customer_id" , "App\\Entities\\Customers" , "id" , true)"#));
        assert!(source.contains("SEQUENCE : Option < & 'static str > = None"));
        assert!(source.contains(r#"NULLABLE : & 'static [& 'static str] = & ["customer_id"]"#));
        assert!(source.contains(r#"ID_GENERATOR : & 'static str = "IDENTITY""#));
        assert!(source.ends_with("// region: custom\n// endregion: custom\n"));
    }

    #[test]
    fn superclass_becomes_trait_impl() {
        let mut table = orders();
        table.superclass_name = Some("Base\\Entity".into());
        let source = render_entity(&table).unwrap();

        assert!(source.contains("impl crate :: base :: Entity for Orders { }"));
        assert!(source.contains(r#"SUPERCLASS : Option < & 'static str > = Some ("Base\\Entity")"#));
    }

    #[test]
    fn invalid_class_name_is_an_error() {
        let table = TableMetadata::new("order-items", "App\\");

        assert!(matches!(
            render_entity(&table),
            Err(EmitError::InvalidIdentifier { what: "class", .. })
        ));
    }

    #[test]
    fn id_generator_follows_sequence_and_auto_increment() {
        let mut table = orders();
        table.sequence_name = Some("SEQ_ORDERS".into());
        assert!(render_entity(&table).unwrap().contains(r#"ID_GENERATOR : & 'static str = "SEQUENCE""#));

        let plain = TableMetadata::new("tags", "App\\")
            .with_columns(vec![ColumnMeta::new("name", "name", quote! { String }).primary_key()]);
        let source = render_entity(&plain).unwrap();
        assert!(source.contains(r#"ID_GENERATOR : & 'static str = "NONE""#));
        assert!(source.contains("NULLABLE : & 'static [& 'static str] = & []"));
    }

    #[test]
    fn keyword_table_names() {
        let table = TableMetadata::new("type", "App\\")
            .with_columns(vec![ColumnMeta::new("type", "type", quote! { String }).not_null()]);
        let source = render_entity(&table).unwrap();
        assert!(source.contains("pub struct Type"));
        assert!(source.contains("pub r#type : String"));

        assert!(matches!(
            render_entity(&TableMetadata::new("self", "App\\")),
            Err(EmitError::InvalidIdentifier { what: "class", .. })
        ));
    }

    #[test]
    fn update_keeps_custom_region() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = RustEntityEmitter::new();
        let table = orders();

        assert_eq!(emitter.write_entity(&table, dir.path()).unwrap(), EntityWrite::Created);

        let path = dir.path().join("App/Entities/Orders.rs");
        let original = fs::read_to_string(&path).unwrap();
        let edited = original.replace(
            "// region: custom\n",
            "// region: custom\nimpl Orders { pub fn is_open(&self) -> bool { true } }\n",
        );
        fs::write(&path, &edited).unwrap();

        let mut changed = table.clone();
        changed.sequence_name = Some("SEQ_ORDERS".into());
        assert_eq!(emitter.write_entity(&changed, dir.path()).unwrap(), EntityWrite::Updated);

        let updated = fs::read_to_string(&path).unwrap();
        assert!(updated.contains("pub fn is_open(&self) -> bool { true }"));
        assert!(updated.contains(r#"Some ("SEQ_ORDERS")"#));
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn update_refuses_file_without_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App/Entities/Orders.rs");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "pub struct Orders;\n").unwrap();

        let err = RustEntityEmitter::new().write_entity(&orders(), dir.path()).unwrap_err();

        assert!(matches!(err, EmitError::Region { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "pub struct Orders;\n");
    }

    #[test]
    fn existing_file_is_skipped_without_update_or_regenerate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App/Entities/Orders.rs");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "keep me\n").unwrap();

        let emitter = RustEntityEmitter::new().update_if_exists(false);

        assert_eq!(emitter.write_entity(&orders(), dir.path()).unwrap(), EntityWrite::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me\n");
    }

    #[test]
    fn regenerate_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App/Entities/Orders.rs");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "old contents\n").unwrap();

        let emitter = RustEntityEmitter::new()
            .regenerate_if_exists(true)
            .backup_existing(true);

        assert_eq!(emitter.write_entity(&orders(), dir.path()).unwrap(), EntityWrite::Regenerated);
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old contents\n");
        assert!(fs::read_to_string(&path).unwrap().contains("pub struct Orders"));
    }
}
