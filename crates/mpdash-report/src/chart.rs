//! Stacked-bar chart data: warehouses on the x axis grouped by cluster, one
//! series per article.

use mpdash_core::Marketplace;
use serde::Serialize;

use crate::classify::Classifier;
use crate::color::color_for;
use crate::stocks::WarehouseProducts;

pub const SERIES_BORDER_COLOR: &str = "#1a1a1a";
pub const SERIES_BORDER_WIDTH: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
    pub clusters: Vec<ChartCluster>,
}

/// One article's quantities, aligned with [`ChartDataset::labels`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    #[serde(rename = "label")]
    pub series_id: String,
    #[serde(rename = "data")]
    pub values: Vec<i64>,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
}

/// A contiguous run of labels belonging to one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartCluster {
    pub name: String,
    pub start_index: usize,
    pub end_index: usize,
    pub warehouse_count: usize,
    #[serde(rename = "total_stock")]
    pub total: i64,
}

/// Builds the chart for one marketplace's warehouse rows.
///
/// Priority clusters come first in declared order, the rest in byte order of
/// their names. Warehouses keep their incoming order inside a cluster. Series
/// whose values are all non-positive are dropped. Returns `None` when there
/// is nothing to chart.
#[must_use]
pub fn build_chart_dataset(
    warehouses: &[WarehouseProducts],
    articles: &[String],
    classifier: &Classifier,
    marketplace: Marketplace,
) -> Option<ChartDataset> {
    if warehouses.is_empty() || articles.is_empty() {
        return None;
    }

    let mut groups: Vec<(&str, Vec<&WarehouseProducts>)> = Vec::new();
    for warehouse in warehouses {
        let cluster = classifier.classify(&warehouse.name, marketplace);
        match groups.iter_mut().find(|(name, _)| *name == cluster) {
            Some((_, members)) => members.push(warehouse),
            None => groups.push((cluster, vec![warehouse])),
        }
    }

    let priority = classifier.priority(marketplace);
    let rank = |name: &str| {
        priority
            .iter()
            .position(|p| p == name)
            .unwrap_or(priority.len())
    };
    groups.sort_by(|(a, _), (b, _)| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));

    let mut labels = Vec::with_capacity(warehouses.len());
    let mut clusters = Vec::with_capacity(groups.len());
    for (name, members) in &groups {
        let start_index = labels.len();
        labels.extend(members.iter().map(|w| w.name.clone()));
        clusters.push(ChartCluster {
            name: (*name).to_string(),
            start_index,
            end_index: labels.len() - 1,
            warehouse_count: members.len(),
            total: members.iter().map(|w| w.products.values().sum::<i64>()).sum(),
        });
    }

    let ordered: Vec<&WarehouseProducts> = groups
        .iter()
        .flat_map(|(_, members)| members.iter().copied())
        .collect();

    let datasets = articles
        .iter()
        .filter_map(|article| {
            let values: Vec<i64> = ordered
                .iter()
                .map(|w| w.products.get(article).copied().unwrap_or(0))
                .collect();
            values.iter().any(|v| *v > 0).then(|| ChartSeries {
                series_id: article.clone(),
                values,
                background_color: color_for(article),
                border_color: SERIES_BORDER_COLOR,
                border_width: SERIES_BORDER_WIDTH,
            })
        })
        .collect();

    Some(ChartDataset {
        labels,
        datasets,
        clusters,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use mpdash_core::{Cluster, ClusterTable, ClusterTables, FALLBACK_CLUSTER};
    use serde_json::json;

    use super::*;

    fn row(name: &str, products: &[(&str, i64)]) -> WarehouseProducts {
        let products: BTreeMap<String, i64> = products
            .iter()
            .map(|(a, q)| ((*a).to_string(), *q))
            .collect();
        WarehouseProducts {
            name: name.to_string(),
            total: products.values().sum(),
            products,
        }
    }

    fn articles(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn two_cluster_scenario() {
        let warehouses = vec![
            row("Невинномысск", &[("SF0125", 5)]),
            row("Коледино", &[("SF0125", 10)]),
        ];
        let chart = build_chart_dataset(
            &warehouses,
            &articles(&["SF0125"]),
            &Classifier::default(),
            Marketplace::Wildberries,
        )
        .unwrap();

        assert_eq!(chart.labels, ["Коледино", "Невинномысск"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].series_id, "SF0125");
        assert_eq!(chart.datasets[0].values, [10, 5]);
        assert_eq!(chart.datasets[0].background_color, "#614701");
        assert_eq!(chart.clusters[0].name, "Центральный");
        assert_eq!(chart.clusters[1].name, "Южный + Северо-Кавказский");
        assert_eq!(chart.clusters[1].start_index, 1);
        assert_eq!(chart.clusters[1].end_index, 1);
    }

    #[test]
    fn clusters_ordered_by_priority_then_alphabet() {
        let warehouses = vec![
            row("Минск", &[("A", 1)]),
            row("Атлантида", &[("A", 1)]),
            row("Казань", &[("A", 1)]),
            row("Астана", &[("A", 1)]),
            row("Коледино", &[("A", 1)]),
            row("Подольск", &[("A", 2)]),
        ];
        let chart = build_chart_dataset(
            &warehouses,
            &articles(&["A"]),
            &Classifier::default(),
            Marketplace::Wildberries,
        )
        .unwrap();

        let names: Vec<&str> = chart.clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["Центральный", "Приволжский", FALLBACK_CLUSTER, "Беларусь", "Казахстан"]
        );
        assert_eq!(
            chart.labels,
            ["Коледино", "Подольск", "Казань", "Атлантида", "Минск", "Астана"]
        );
        assert_eq!(chart.clusters[0].warehouse_count, 2);
        assert_eq!(chart.clusters[0].total, 3);
    }

    #[test]
    fn series_align_with_labels_and_totals_match() {
        let warehouses = vec![
            row("Коледино", &[("SF0125", 10), ("SM0250", 3)]),
            row("Казань", &[("SM0250", 7)]),
            row("Екатеринбург", &[("SF0250", 4)]),
        ];
        let chart = build_chart_dataset(
            &warehouses,
            &articles(&["SF0125", "SF0250", "SM0250", "ZZ"]),
            &Classifier::default(),
            Marketplace::Wildberries,
        )
        .unwrap();

        assert_eq!(chart.datasets.len(), 3, "all-zero series dropped");
        for series in &chart.datasets {
            assert_eq!(series.values.len(), chart.labels.len());
        }
        let span: usize = chart
            .clusters
            .iter()
            .map(|c| c.end_index - c.start_index + 1)
            .sum();
        assert_eq!(span, chart.labels.len());

        let cluster_total: i64 = chart.clusters.iter().map(|c| c.total).sum();
        let series_total: i64 = chart.datasets.iter().flat_map(|s| s.values.iter()).sum();
        assert_eq!(cluster_total, series_total);
    }

    #[test]
    fn nothing_to_chart() {
        let classifier = Classifier::default();
        let mp = Marketplace::Ozon;
        assert!(build_chart_dataset(&[], &articles(&["A"]), &classifier, mp).is_none());
        assert!(build_chart_dataset(&[row("Казань", &[("A", 1)])], &[], &classifier, mp).is_none());
    }

    #[test]
    fn fixture_table_priority_is_honored() {
        let table = ClusterTable {
            priority: vec!["Zeta".to_string()],
            clusters: vec![
                Cluster {
                    name: "Alpha".to_string(),
                    keywords: vec!["a-".to_string()],
                },
                Cluster {
                    name: "Zeta".to_string(),
                    keywords: vec!["z-".to_string()],
                },
            ],
        };
        let classifier = Classifier::new(ClusterTables {
            wb: ClusterTable::default(),
            ozon: table,
        });
        let chart = build_chart_dataset(
            &[row("a-1", &[("X", 1)]), row("z-1", &[("X", 1)])],
            &articles(&["X"]),
            &classifier,
            Marketplace::Ozon,
        )
        .unwrap();
        assert_eq!(chart.labels, ["z-1", "a-1"]);
    }

    #[test]
    fn serializes_chart_keys() {
        let chart = build_chart_dataset(
            &[row("Коледино", &[("SF0125", 10)])],
            &articles(&["SF0125"]),
            &Classifier::default(),
            Marketplace::Wildberries,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({
                "labels": ["Коледино"],
                "datasets": [{
                    "label": "SF0125",
                    "data": [10],
                    "backgroundColor": "#614701",
                    "borderColor": "#1a1a1a",
                    "borderWidth": 1
                }],
                "clusters": [{
                    "name": "Центральный",
                    "start_index": 0,
                    "end_index": 0,
                    "warehouse_count": 1,
                    "total_stock": 10
                }]
            })
        );
    }
}
