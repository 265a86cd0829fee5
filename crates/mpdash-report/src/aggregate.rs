//! Revenue and unit-count rollups along one record dimension, with a nested
//! breakdown along a second.

use indexmap::IndexMap;
use mpdash_core::NormalizedRecord;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Default number of buckets kept for truncated dimensions.
pub const DEFAULT_TOP_N: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Warehouse,
    Region,
    Product,
}

impl Dimension {
    #[must_use]
    pub fn value_of(self, record: &NormalizedRecord) -> &str {
        match self {
            Dimension::Warehouse => &record.warehouse,
            Dimension::Region => &record.region_hint,
            Dimension::Product => &record.article,
        }
    }

    /// Output key holding a bucket's name.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            Dimension::Warehouse | Dimension::Region => "name",
            Dimension::Product => "article",
        }
    }

    /// Output key holding a breakdown along this dimension.
    #[must_use]
    pub fn breakdown_key(self) -> &'static str {
        match self {
            Dimension::Warehouse => "by_warehouse",
            Dimension::Region => "by_region",
            Dimension::Product => "by_product",
        }
    }

    /// Whether report aggregations along this dimension keep only the top N.
    #[must_use]
    pub fn is_truncated(self) -> bool {
        matches!(self, Dimension::Warehouse | Dimension::Region)
    }
}

/// Serializes a [`Decimal`] as a JSON number.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub(crate) struct Amount(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

/// Count and revenue accumulated under one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub name: String,
    pub count: u64,
    pub revenue: Decimal,
}

impl Tally {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: 0,
            revenue: Decimal::ZERO,
        }
    }

    fn add(&mut self, record: &NormalizedRecord) {
        self.count = self.count.saturating_add(record.quantity);
        self.revenue = self.revenue.saturating_add(record.revenue());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationBucket {
    pub primary: Dimension,
    pub secondary: Dimension,
    pub totals: Tally,
    /// Sorted by revenue descending, first-seen order on ties.
    pub breakdown: Vec<Tally>,
}

impl Serialize for AggregationBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let breakdown: Vec<TallyView<'_>> = self
            .breakdown
            .iter()
            .map(|tally| TallyView {
                dimension: self.secondary,
                tally,
            })
            .collect();

        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(self.primary.label_key(), &self.totals.name)?;
        map.serialize_entry("count", &self.totals.count)?;
        map.serialize_entry("revenue", &Amount(self.totals.revenue))?;
        map.serialize_entry(self.secondary.breakdown_key(), &breakdown)?;
        map.end()
    }
}

struct TallyView<'a> {
    dimension: Dimension,
    tally: &'a Tally,
}

impl Serialize for TallyView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.dimension.label_key(), &self.tally.name)?;
        map.serialize_entry("count", &self.tally.count)?;
        map.serialize_entry("revenue", &Amount(self.tally.revenue))?;
        map.end()
    }
}

/// Buckets sorted by revenue descending. Serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Aggregation {
    pub buckets: Vec<AggregationBucket>,
}

impl Aggregation {
    /// Keeps only the first `n` buckets.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.buckets.truncate(n);
        self
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.buckets
            .iter()
            .fold(0, |acc, b| acc.saturating_add(b.totals.count))
    }

    #[must_use]
    pub fn total_revenue(&self) -> Decimal {
        self.buckets
            .iter()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.totals.revenue))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AggregationBucket> {
        self.buckets.iter().find(|b| b.totals.name == name)
    }
}

fn sort_by_revenue_desc(tallies: &mut [Tally]) {
    tallies.sort_by(|a, b| b.revenue.cmp(&a.revenue));
}

/// Rolls `records` up by `primary`, with each bucket broken down by
/// `secondary`. Counts are unit quantities; revenue is `unit_price × quantity`.
#[must_use]
pub fn aggregate<'a, I>(records: I, primary: Dimension, secondary: Dimension) -> Aggregation
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut buckets: IndexMap<String, (Tally, IndexMap<String, Tally>)> = IndexMap::new();

    for record in records {
        let name = primary.value_of(record);
        let (totals, breakdown) = buckets
            .entry(name.to_owned())
            .or_insert_with(|| (Tally::new(name), IndexMap::new()));
        totals.add(record);

        let sub = secondary.value_of(record);
        breakdown
            .entry(sub.to_owned())
            .or_insert_with(|| Tally::new(sub))
            .add(record);
    }

    let mut buckets: Vec<AggregationBucket> = buckets
        .into_values()
        .map(|(totals, breakdown)| {
            let mut breakdown: Vec<Tally> = breakdown.into_values().collect();
            sort_by_revenue_desc(&mut breakdown);
            AggregationBucket {
                primary,
                secondary,
                totals,
                breakdown,
            }
        })
        .collect();
    buckets.sort_by(|a, b| b.totals.revenue.cmp(&a.totals.revenue));

    Aggregation { buckets }
}
