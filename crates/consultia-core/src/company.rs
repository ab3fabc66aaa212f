//! Company profile used to personalize consultations.

use serde::{Deserialize, Serialize};

/// Company size bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    #[default]
    Micro,
    Pequena,
    Media,
    Grande,
}

impl std::str::FromStr for CompanySize {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "micro" => Ok(Self::Micro),
            "pequena" => Ok(Self::Pequena),
            "media" => Ok(Self::Media),
            "grande" => Ok(Self::Grande),
            other => Err(crate::error::CoreError::UnknownVariant {
                kind: "company size",
                value: other.to_string(),
            }),
        }
    }
}

/// The user's company profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    pub owner_name: String,
    pub size: CompanySize,
    pub product_service: String,
    pub customer_pains: String,
    pub culture: String,
    pub user_role: String,
    pub daily_routine: String,
    pub additional_info: String,
}

impl Company {
    /// Returns true once the user has filled in at least the company name.
    pub fn is_configured(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
