//! Destination-schema descriptor.
//!
//! The pipeline never declares table shapes statically. Instead it
//! introspects the destination table once per file (see
//! [`crate::store::table_schema`]) and carries the result around as a
//! [`TableSchema`] value, so fill and coercion logic work from one snapshot
//! rather than re-querying the store.

/// Identifier columns that must be authentically present in the source.
/// Enforced only for tables that actually carry the column, and never
/// auto-filled.
pub const REQUIRED_IDENTIFIERS: &[&str] = &["ProductID", "StoreID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Textual,
    Date,
}

#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnMeta>,
}

impl TableSchema {
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Required identifiers the destination table defines but `available`
    /// (the post-mapping source headers) lacks.
    pub fn missing_required(&self, available: &[String]) -> Vec<String> {
        REQUIRED_IDENTIFIERS
            .iter()
            .filter(|required| {
                self.contains(required) && !available.iter().any(|col| col == *required)
            })
            .map(|required| required.to_string())
            .collect()
    }
}

/// Maps a SQLite declared column type to the kind used by fill logic.
pub fn kind_from_declared_type(declared: &str) -> ColumnKind {
    let upper = declared.to_ascii_uppercase();
    const NUMERIC_MARKERS: &[&str] = &["INT", "REAL", "FLOA", "DOUB", "NUMERIC", "DECIMAL"];
    if NUMERIC_MARKERS.iter().any(|marker| upper.contains(marker)) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Textual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(columns: &[(&str, ColumnKind)]) -> TableSchema {
        TableSchema {
            table: "demand_forecast".to_string(),
            columns: columns
                .iter()
                .map(|(name, kind)| ColumnMeta {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }

    #[test]
    fn kind_from_declared_type_covers_sqlite_affinities() {
        assert_eq!(kind_from_declared_type("INTEGER"), ColumnKind::Numeric);
        assert_eq!(kind_from_declared_type("REAL"), ColumnKind::Numeric);
        assert_eq!(kind_from_declared_type("int"), ColumnKind::Numeric);
        assert_eq!(kind_from_declared_type("TEXT"), ColumnKind::Textual);
        assert_eq!(kind_from_declared_type(""), ColumnKind::Textual);
    }

    #[test]
    fn missing_required_only_reports_columns_the_table_has() {
        let schema = schema(&[
            ("ProductID", ColumnKind::Numeric),
            ("StoreID", ColumnKind::Numeric),
            ("Price", ColumnKind::Numeric),
        ]);
        let available = vec!["ProductID".to_string(), "Price".to_string()];
        assert_eq!(schema.missing_required(&available), vec!["StoreID"]);

        let no_store_id = TableSchema {
            table: "t".to_string(),
            columns: vec![ColumnMeta {
                name: "ProductID".to_string(),
                kind: ColumnKind::Numeric,
            }],
        };
        assert!(no_store_id.missing_required(&available).is_empty());
    }
}
