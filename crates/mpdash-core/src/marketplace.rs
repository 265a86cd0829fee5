use serde::{Deserialize, Serialize};

/// The marketplaces a report run knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[serde(rename = "wb")]
    Wildberries,
    Ozon,
}

impl Marketplace {
    /// Every marketplace, in the order they appear in the output document.
    pub const ALL: [Marketplace; 2] = [Marketplace::Wildberries, Marketplace::Ozon];

    /// Short key used in output object paths, e.g. `stocks.wb`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Marketplace::Wildberries => "wb",
            Marketplace::Ozon => "ozon",
        }
    }

    /// Human-readable name shown in the marketplace status list.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Marketplace::Wildberries => "Wildberries",
            Marketplace::Ozon => "Ozon",
        }
    }
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wb" | "wildberries" => Ok(Marketplace::Wildberries),
            "ozon" => Ok(Marketplace::Ozon),
            other => Err(format!("unknown marketplace '{other}'; expected wb or ozon")),
        }
    }
}
