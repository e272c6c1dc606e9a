use crate::error::EmitError;
use crate::name_transform::rust_ident;
use crate::types::ColumnMeta;
use heck::ToSnakeCase;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use sea_orm_codegen::Column;
use sea_query::{ColumnDef, ColumnSpec};

pub fn column_meta(column: &ColumnDef) -> ColumnMeta {
    let column_name = column.get_column_name();
    let column_spec: &Vec<ColumnSpec> = column.get_column_spec();
    let column_info: Column = Column::from(column);

    let not_null = column_spec
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::NotNull));
    let is_primary_key = column_spec
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::PrimaryKey));
    let auto_increment = column_spec
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::AutoIncrement));

    ColumnMeta {
        field_name: column_name.to_snake_case(),
        column_name,
        column_type: column_info.get_rs_type(),
        not_null: not_null || is_primary_key,
        is_primary_key,
        auto_increment,
    }
}

pub fn field_ident(column: &ColumnMeta) -> Result<Ident, EmitError> {
    rust_ident(&column.field_name).ok_or_else(|| EmitError::InvalidIdentifier {
        what: "field",
        name: column.field_name.clone(),
    })
}

pub fn field_mapping(column: &ColumnMeta) -> Result<TokenStream, EmitError> {
    let field_name = field_ident(column)?;
    let column_type = &column.column_type;
    let doc = format!("Column `{}`.", column.column_name);

    Ok(quote! {
        #[doc = #doc]
        pub #field_name: #column_type
    })
}

/// Getter and setter stubs for one column.
pub fn accessor_mapping(column: &ColumnMeta) -> Result<TokenStream, EmitError> {
    let field_name = field_ident(column)?;
    let setter_name = format_ident!("set_{}", column.field_name);
    let column_type = &column.column_type;

    Ok(quote! {
        pub fn #field_name(&self) -> &#column_type {
            &self.#field_name
        }

        pub fn #setter_name(&mut self, value: #column_type) -> &mut Self {
            self.#field_name = value;
            self
        }
    })
}
