use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consorcio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_conversation_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsorcioMember {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Building currently selected by the user; persisted with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveConsorcio {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<&Consorcio> for ActiveConsorcio {
    fn from(consorcio: &Consorcio) -> Self {
        Self {
            id: consorcio.id.clone(),
            name: Some(consorcio.name.clone()),
        }
    }
}
