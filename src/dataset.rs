//! Declarations for the three retail datasets the pipeline ingests.
//!
//! Each dataset names its CSV file, destination table, the source-to-
//! destination column mapping, and which destination columns carry dates.
//! The mappings mirror the destination DDL in [`crate::store`], so they stay
//! hardcoded here rather than living in external configuration.

#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    /// Report key for this dataset, matching the destination table name.
    pub name: &'static str,
    /// CSV file name expected under the data directory.
    pub file: &'static str,
    pub table: &'static str,
    /// Source header → destination column renames. Matching is
    /// case-insensitive after whitespace normalization; unmapped headers
    /// pass through unchanged.
    pub column_map: &'static [(&'static str, &'static str)],
    /// Destination columns coerced to ISO dates during ingestion.
    pub date_columns: &'static [&'static str],
}

impl Dataset {
    /// Resolves a normalized source header to its destination column name.
    pub fn map_header(&self, header: &str) -> String {
        self.column_map
            .iter()
            .find(|(source, _)| source.eq_ignore_ascii_case(header))
            .map(|(_, dest)| dest.to_string())
            .unwrap_or_else(|| header.to_string())
    }
}

pub const DATASETS: &[Dataset] = &[
    Dataset {
        name: "demand_forecast",
        file: "demand_forecast.csv",
        table: "demand_forecast",
        column_map: &[
            ("Product ID", "ProductID"),
            ("Store ID", "StoreID"),
            ("Date", "Date"),
            ("Sales Quantity", "SalesQuantity"),
            ("Price", "Price"),
            ("Promotion", "Promotion"),
            ("Seasonality Factors", "Seasonality"),
            ("External Factors", "ExternalFactors"),
            ("Demand Trend", "DemandTrend"),
            ("Customer Segments", "CustomerSegment"),
        ],
        date_columns: &["Date"],
    },
    Dataset {
        name: "inventory_monitoring",
        file: "inventory_monitoring.csv",
        table: "inventory_monitoring",
        column_map: &[
            ("Product ID", "ProductID"),
            ("Store ID", "StoreID"),
            ("Stock Levels", "StockLevel"),
            ("Supplier Lead Time (days)", "SupplierLeadTimeDays"),
            ("Stockout Frequency", "StockoutFrequency"),
            ("Reorder Point", "ReorderPoint"),
            ("Expiry Date", "ExpiryDate"),
            ("Warehouse Capacity", "WarehouseCapacity"),
            ("Order Fulfillment Time (days)", "OrderFulfillmentTimeDays"),
        ],
        date_columns: &["ExpiryDate"],
    },
    Dataset {
        name: "pricing_optimization",
        file: "pricing_optimization.csv",
        table: "pricing_optimization",
        column_map: &[
            ("Product ID", "ProductID"),
            ("Store ID", "StoreID"),
            ("Price", "Price"),
            ("Competitor Prices", "CompetitorPrice"),
            ("Discounts", "DiscountPercentage"),
            ("Sales Volume", "SalesVolume"),
            ("Customer Reviews", "CustomerReviews"),
            ("Return Rate (%)", "ReturnRatePercentage"),
            ("Storage Cost", "StorageCost"),
            ("Elasticity Index", "ElasticityIndex"),
        ],
        date_columns: &[],
    },
];
