use mpdash_core::{ClusterTables, Marketplace, FALLBACK_CLUSTER};

/// Assigns warehouse names to geographic clusters using per-marketplace
/// keyword tables.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tables: ClusterTables,
}

impl Classifier {
    #[must_use]
    pub fn new(tables: ClusterTables) -> Self {
        Self { tables }
    }

    /// Returns the first cluster (in table order) with a keyword contained in
    /// the lower-cased warehouse name, or [`FALLBACK_CLUSTER`].
    #[must_use]
    pub fn classify(&self, warehouse: &str, marketplace: Marketplace) -> &str {
        let name = warehouse.to_lowercase();
        self.tables
            .for_marketplace(marketplace)
            .clusters
            .iter()
            .find(|cluster| cluster.keywords.iter().any(|kw| name.contains(kw.as_str())))
            .map_or(FALLBACK_CLUSTER, |cluster| cluster.name.as_str())
    }

    /// Clusters that lead the chart ordering for `marketplace`.
    #[must_use]
    pub fn priority(&self, marketplace: Marketplace) -> &[String] {
        &self.tables.for_marketplace(marketplace).priority
    }
}
