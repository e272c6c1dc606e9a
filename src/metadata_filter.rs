use crate::name_transform::to_class_name;
use crate::types::TableMetadata;
use std::collections::HashSet;

/// Keeps the tables whose class name equals the class name of one of the
/// filter tokens. An empty filter keeps everything. Tokens matching no table
/// are dropped without complaint; result order is the order of `metadata`.
pub fn filter<S: AsRef<str>>(metadata: Vec<TableMetadata>, filter_names: &[S]) -> Vec<TableMetadata> {
    if filter_names.is_empty() {
        return metadata;
    }

    let wanted: HashSet<String> = filter_names
        .iter()
        .map(|name| to_class_name(name.as_ref()))
        .collect();

    metadata
        .into_iter()
        .filter(|table: &TableMetadata| wanted.contains(&table.class_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(names: &[&str]) -> Vec<TableMetadata> {
        names
            .iter()
            .map(|name| TableMetadata::new(*name, "App\\Entities\\"))
            .collect()
    }

    fn names(metadata: &[TableMetadata]) -> Vec<&str> {
        metadata.iter().map(|t| t.table_name.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let result = filter::<&str>(tables(&["orders", "customers", "order_items"]), &[]);
        assert_eq!(names(&result), vec!["orders", "customers", "order_items"]);
    }

    #[test]
    fn filter_token_goes_through_class_name_transform() {
        let result = filter(tables(&["order_items", "customers"]), &["order_items"]);
        assert_eq!(names(&result), vec!["order_items"]);
    }

    #[test]
    fn camel_case_token_does_not_match() {
        let result = filter(tables(&["order_items", "customers"]), &["orderItems"]);
        assert!(result.is_empty());
    }

    #[test]
    fn result_follows_metadata_order_not_filter_order() {
        let result = filter(tables(&["a", "b", "c"]), &["c", "a"]);
        assert_eq!(names(&result), vec!["a", "c"]);
    }

    #[test]
    fn unmatched_tokens_are_dropped() {
        let result = filter(tables(&["orders", "customers"]), &["orders", "invoices"]);
        assert_eq!(names(&result), vec!["orders"]);

        let result = filter(tables(&["orders", "customers"]), &["invoices"]);
        assert!(result.is_empty());
    }
}
