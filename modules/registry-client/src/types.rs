use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_CITY: &str = "Unknown City";
pub const UNKNOWN_STATE: &str = "Unknown State";

/// Rec-area names containing any of these are not postable sites.
pub const SITE_EXCLUSIONS: &[&str] = &["Field Office", "Trail", "Visitor Center", "Easement"];

// --- Normalized output ---

/// A named, geolocated protected area eligible for posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    /// "City, State", with "Unknown City" / "Unknown State" filling gaps.
    pub location: String,
}

impl Site {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Build a site from possibly-missing address parts. Empty strings count as missing.
    pub fn from_address(name: impl Into<String>, city: Option<&str>, state: Option<&str>) -> Self {
        let city = non_empty(city).unwrap_or(UNKNOWN_CITY);
        let state = non_empty(state).unwrap_or(UNKNOWN_STATE);
        Self::new(name, format!("{city}, {state}"))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// True when a rec-area name matches one of [`SITE_EXCLUSIONS`].
pub fn is_excluded(name: &str) -> bool {
    SITE_EXCLUSIONS.iter().any(|exclusion| name.contains(exclusion))
}

// --- NPS /parks ---

#[derive(Debug, Clone, Deserialize)]
pub struct NpsParksPage {
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub total: u64,
    #[serde(default)]
    pub data: Vec<NpsPark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpsPark {
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub addresses: Vec<NpsAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpsAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "stateCode", default)]
    pub state_code: Option<String>,
}

impl NpsPark {
    /// Only full "National Park" units are kept from the NPS registry.
    pub fn into_site(self) -> Option<Site> {
        if !self.full_name.contains("National Park") {
            return None;
        }
        let address = self.addresses.first();
        Some(Site::from_address(
            self.full_name.as_str(),
            address.and_then(|a| a.city.as_deref()),
            address.and_then(|a| a.state_code.as_deref()),
        ))
    }
}

// --- RIDB /recareas ---

#[derive(Debug, Clone, Deserialize)]
pub struct RidbRecAreasPage {
    #[serde(rename = "RECDATA", default)]
    pub rec_data: Vec<RecArea>,
    #[serde(rename = "METADATA")]
    pub metadata: RidbMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RidbMetadata {
    #[serde(rename = "RESULTS")]
    pub results: RidbResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RidbResults {
    #[serde(rename = "TOTAL_COUNT")]
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecArea {
    #[serde(rename = "RecAreaName")]
    pub name: String,
    #[serde(rename = "RECAREAADDRESS", default)]
    pub addresses: Vec<RecAreaAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecAreaAddress {
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "AddressStateCode", default)]
    pub state_code: Option<String>,
}

impl RecArea {
    pub fn into_site(self) -> Option<Site> {
        if is_excluded(&self.name) {
            return None;
        }
        let address = self.addresses.first();
        Some(Site::from_address(
            self.name.as_str(),
            address.and_then(|a| a.city.as_deref()),
            address.and_then(|a| a.state_code.as_deref()),
        ))
    }
}

/// The NPS API reports `total` as a decimal string ("474"); accept numbers too.
fn count_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
