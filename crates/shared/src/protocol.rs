use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{BreedInfo, PredictionId};

/// Explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// One `[breed, probability]` pair of the top-5 ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBreed(pub String, pub f64);

impl RankedBreed {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn probability(&self) -> f64 {
        self.1
    }
}

/// Successful body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction_id: PredictionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    pub breed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hindi_name: Option<String>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed_info: BreedInfo,
    #[serde(default, rename = "top_5", deserialize_with = "null_as_default")]
    pub top5: Vec<RankedBreed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl PredictionResult {
    pub fn localized_name(&self) -> Option<&str> {
        self.hindi_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub breed: String,
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<PredictionId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedCount {
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub my_predictions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_predictions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_breeds: Vec<BreedCount>,
}

impl StatsSnapshot {
    pub fn top_breed(&self) -> Option<&str> {
        self.top_breeds.first().map(|entry| entry.breed.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionStatus {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedProfile {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: BreedInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    pub breed1: BreedProfile,
    pub breed2: BreedProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedSummary {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hindi_name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreedListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub breeds: Vec<BreedSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

/// Body of `GET /api/breed/<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedDetail {
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: BreedInfo,
}
