#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKeyMeta {
    pub columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub ref_class: String, // qualified, same namespace as the owning table
    pub optional: bool,
}

impl ForeignKeyMeta {
    /// `(column, ref_column)` pairs in declaration order.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.ref_columns.iter().map(String::as_str))
    }
}
