use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sports with a fixed per-session counter schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "sport", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    Soccer,
    Football,
    Baseball,
    Volleyball,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Basketball,
        Sport::Soccer,
        Sport::Football,
        Sport::Baseball,
        Sport::Volleyball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basketball => "basketball",
            Self::Soccer => "soccer",
            Self::Football => "football",
            Self::Baseball => "baseball",
            Self::Volleyball => "volleyball",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == normalized)
            .ok_or_else(|| format!("unsupported sport '{}'", s))
    }
}
