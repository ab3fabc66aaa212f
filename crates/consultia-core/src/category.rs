//! Consulting categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Business area an expert or goal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vendas,
    Marketing,
    Pessoas,
    Processos,
    Financas,
    Estrategia,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Vendas,
        Category::Marketing,
        Category::Pessoas,
        Category::Processos,
        Category::Financas,
        Category::Estrategia,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendas => "vendas",
            Self::Marketing => "marketing",
            Self::Pessoas => "pessoas",
            Self::Processos => "processos",
            Self::Financas => "financas",
            Self::Estrategia => "estrategia",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vendas => "Vendas",
            Self::Marketing => "Marketing",
            Self::Pessoas => "Pessoas",
            Self::Processos => "Processos",
            Self::Financas => "Finanças",
            Self::Estrategia => "Estratégia",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_wire_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("juridico".parse::<Category>().is_err());
    }
}
