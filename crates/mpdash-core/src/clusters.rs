//! Geographic cluster tables for warehouse classification.
//!
//! A table is an ordered list of clusters, each with an ordered list of
//! lowercase keyword substrings. Order is significant: classification returns
//! the first cluster with a matching keyword, so a name like
//! `"Санкт-Петербург Шушары"` resolves by declaration order rather than by
//! longest match. The `priority` list controls chart ordering only.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::marketplace::Marketplace;
use crate::ConfigError;

/// Cluster name returned when no keyword in the table matches.
pub const FALLBACK_CLUSTER: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTable {
    /// Clusters charted first, in this order; all others follow alphabetically.
    #[serde(default)]
    pub priority: Vec<String>,
    pub clusters: Vec<Cluster>,
}

/// One cluster table per marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTables {
    pub wb: ClusterTable,
    pub ozon: ClusterTable,
}

impl ClusterTables {
    #[must_use]
    pub fn for_marketplace(&self, marketplace: Marketplace) -> &ClusterTable {
        match marketplace {
            Marketplace::Wildberries => &self.wb,
            Marketplace::Ozon => &self.ozon,
        }
    }

    /// The tables compiled into the binary, matching the marketplaces'
    /// published warehouse-to-cluster assignments.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            wb: table_from(WB_PRIORITY, WB_CLUSTERS),
            ozon: table_from(OZON_PRIORITY, OZON_CLUSTERS),
        }
    }
}

impl Default for ClusterTables {
    fn default() -> Self {
        Self::builtin()
    }
}

type StaticCluster = (&'static str, &'static [&'static str]);

const WB_PRIORITY: &[&str] = &["Центральный", "Северо-Западный", "Приволжский", "Уральский"];

const WB_CLUSTERS: &[StaticCluster] = &[
    (
        "Центральный",
        &[
            "пушкино",
            "вёшки",
            "вешки",
            "иваново",
            "подольск",
            "радумля",
            "обухово",
            "чашниково",
            "воронеж",
            "истра",
            "коледино",
            "домодедово",
            "никольское",
            "тверь",
            "голицыно",
            "софьино",
            "ярославль",
            "цифровой",
            "рязань",
            "тюшевское",
            "сабурово",
            "владимир",
            "тула",
            "котовск",
            "электросталь",
            "белая дача",
            "щербинка",
            "чехов",
        ],
    ),
    (
        "Северо-Западный",
        &["вологда", "шушары", "красный бор", "санкт-петербург", "спб", "уткина"],
    ),
    (
        "Приволжский",
        &["ижевск", "кузнецк", "пенза", "самара", "новосемейкино", "сарапул", "казань"],
    ),
    ("Уральский", &["нижний тагил", "челябинск", "екатеринбург"]),
    (
        "Южный + Северо-Кавказский",
        &["крыловская", "краснодар", "волгоград", "невинномысск", "тихорецкая"],
    ),
    (
        "Дальневосточный + Сибирский",
        &["хабаровск", "барнаул", "владивосток", "юрга", "новосибирск"],
    ),
    ("Казахстан", &["байсерке", "атакент", "актобе", "астана"]),
    ("Беларусь", &["минск", "брест", "гродно"]),
    ("Узбекистан", &["ташкент"]),
    ("Армения", &["ереван"]),
    ("Грузия", &["тбилиси"]),
];

const OZON_PRIORITY: &[&str] = &[
    "Москва, МО и Дальние регионы",
    "Санкт-Петербург и СЗО",
    "Казань",
    "Краснодар",
];

const OZON_CLUSTERS: &[StaticCluster] = &[
    (
        "Москва, МО и Дальние регионы",
        &[
            "хоругвино",
            "ногинск",
            "пушкино",
            "софьино",
            "радумля",
            "павло",
            "слободское",
            "петровское",
            "жуковский",
            "домодедово",
            "гривно",
        ],
    ),
    (
        "Санкт-Петербург и СЗО",
        &["колпино", "шушары", "волхонка", "санкт-петербург", "спб", "бугры"],
    ),
    ("Казань", &["казань", "кзн", "столбище", "нижний новгород"]),
    ("Самара", &["самара"]),
    ("Уфа", &["уфа"]),
    ("Оренбург", &["оренбург"]),
    ("Краснодар", &["адыгейск", "южный обход", "новороссийск"]),
    ("Ростов", &["ростов"]),
    ("Воронеж", &["воронеж"]),
    ("Саратов", &["волгоград", "саратов"]),
    ("Невинномысск", &["невинномысск"]),
    ("Махачкала", &["махачкала"]),
    ("Красноярск", &["красноярск"]),
    ("Новосибирск", &["новосибирск"]),
    ("Омск", &["омск"]),
    ("Екатеринбург", &["екатеринбург"]),
    ("Пермь", &["пермь"]),
    ("Тюмень", &["тюмень"]),
    ("Дальний Восток", &["хабаровск"]),
    ("Тверь", &["тверь"]),
    ("Ярославль", &["ярославль"]),
    ("Калининград", &["калининград"]),
    ("Беларусь", &["минск"]),
    ("Астана", &["астана"]),
    ("Алматы", &["алматы"]),
    ("Армения", &["ереван"]),
];

fn table_from(priority: &[&str], clusters: &[StaticCluster]) -> ClusterTable {
    ClusterTable {
        priority: priority.iter().map(|s| (*s).to_string()).collect(),
        clusters: clusters
            .iter()
            .map(|(name, keywords)| Cluster {
                name: (*name).to_string(),
                keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            })
            .collect(),
    }
}

/// Load and validate cluster tables from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_cluster_tables(path: &Path) -> Result<ClusterTables, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ClustersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let tables: ClusterTables = serde_yaml::from_str(&content)?;

    validate_table("wb", &tables.wb)?;
    validate_table("ozon", &tables.ozon)?;

    Ok(tables)
}

fn validate_table(label: &str, table: &ClusterTable) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for cluster in &table.clusters {
        if cluster.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{label}: cluster name must be non-empty"
            )));
        }

        if cluster.name == FALLBACK_CLUSTER {
            return Err(ConfigError::Validation(format!(
                "{label}: cluster name '{FALLBACK_CLUSTER}' is reserved for unmatched warehouses"
            )));
        }

        if !seen_names.insert(cluster.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{label}: duplicate cluster name '{}'",
                cluster.name
            )));
        }

        if cluster.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{label}: cluster '{}' has no keywords",
                cluster.name
            )));
        }

        for keyword in &cluster.keywords {
            if keyword.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{label}: cluster '{}' has an empty keyword",
                    cluster.name
                )));
            }
            if *keyword != keyword.to_lowercase() {
                return Err(ConfigError::Validation(format!(
                    "{label}: keyword '{keyword}' in cluster '{}' must be lowercase",
                    cluster.name
                )));
            }
        }
    }

    let mut seen_priority = HashSet::new();
    for name in &table.priority {
        if !seen_names.contains(name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{label}: priority cluster '{name}' is not declared in clusters"
            )));
        }
        if !seen_priority.insert(name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{label}: priority cluster '{name}' listed twice"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "clusters_test.rs"]
mod tests;
