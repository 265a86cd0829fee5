pub mod aggregate;
pub mod chart;
pub mod classify;
pub mod color;
pub mod combine;
pub mod error;
pub mod io;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod stocks;
pub mod summary;
pub mod types;

pub use aggregate::{aggregate, Aggregation, AggregationBucket, Dimension, Tally, DEFAULT_TOP_N};
pub use chart::{build_chart_dataset, ChartCluster, ChartDataset, ChartSeries};
pub use classify::Classifier;
pub use color::color_for;
pub use combine::{
    build_marketplace_report, combine, DashboardDocument, MarketplaceReport, ReportContext,
    Status, Summary,
};
pub use error::ReportError;
pub use io::{load_raw_document, render_json, write_json};
pub use normalize::{normalize_document, MarketplaceData};
pub use period::{parse_timestamp, PeriodWindow, WINDOWS};
pub use pipeline::{build_document, run_report, ReportPaths};
pub use stocks::{roll_up_stocks, StockOptions, StockRollup, WarehouseBasis};
pub use summary::{summarize_period, PeriodSummary};
pub use types::RawDocument;
