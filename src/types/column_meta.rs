use proc_macro2::TokenStream;

#[derive(Clone, Debug)]
pub struct ColumnMeta {
    pub column_name: String, // as in the database
    pub field_name: String,  // snake_case
    pub column_type: TokenStream,
    pub not_null: bool,
    pub is_primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnMeta {
    pub fn new(
        column_name: impl Into<String>,
        field_name: impl Into<String>,
        column_type: TokenStream,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            field_name: field_name.into(),
            column_type,
            not_null: false,
            is_primary_key: false,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.not_null = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}
