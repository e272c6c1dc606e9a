use super::column_meta::ColumnMeta;
use super::foreign_key_meta::ForeignKeyMeta;
use crate::name_transform::to_class_name;

#[derive(Clone, Debug)]
pub struct TableMetadata {
    pub table_name: String,
    pub class_name: String, // PascalCase, derived from table_name
    pub namespace: String,  // normalized, ends with a separator
    pub columns: Vec<ColumnMeta>,
    pub foreign_keys: Vec<ForeignKeyMeta>,

    // filled in by the generator
    pub repository_class_name: Option<String>,
    pub sequence_name: Option<String>,
    pub superclass_name: Option<String>,
}

impl TableMetadata {
    pub fn new(table_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let table_name = table_name.into();

        Self {
            class_name: to_class_name(&table_name),
            table_name,
            namespace: namespace.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            repository_class_name: None,
            sequence_name: None,
            superclass_name: None,
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMeta>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_foreign_keys(mut self, foreign_keys: Vec<ForeignKeyMeta>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    /// `App\Entities\` + `Customers`
    pub fn qualified_name(&self) -> String {
        format!("{}{}", self.namespace, self.class_name)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter().filter(|column| column.is_primary_key)
    }
}
