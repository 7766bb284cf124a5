use serde::{Deserialize, Serialize};

/// Cultural heritage site as returned by `GET /sites`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Site {
    /// Explicit location, or "city, country" built from whichever parts exist
    pub fn display_location(&self) -> Option<String> {
        if let Some(location) = non_empty(&self.location) {
            return Some(location.to_string());
        }

        let parts: Vec<&str> = [&self.city, &self.country]
            .into_iter()
            .filter_map(non_empty)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OralHistory {
    pub title: Option<String>,
    pub story: Option<String>,
}

/// Body of `GET /oral-histories`
#[derive(Debug, Clone, Deserialize)]
pub struct OralHistoriesResponse {
    pub data: Vec<OralHistory>,
}

pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
