//! Fixtures and an in-memory [`GovanshApi`] shared by the unit tests.

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{BreedInfo, PredictionId},
    protocol::{
        BreedCount, BreedDetail, BreedListResponse, BreedProfile, BreedSummary, CompareResult,
        HistoryEntry, PredictionResult, RankedBreed, SessionStatus, StatsSnapshot,
    },
};

use crate::{ClientError, ClientResult, GovanshApi, ImageFile, PredictOutcome};

/// Smallest payload the server sends: no localized name, one info field.
pub fn minimal_gir_result() -> PredictionResult {
    serde_json::from_value(serde_json::json!({
        "breed": "Gir",
        "confidence": 0.873,
        "top_5": [["Gir", 0.873], ["Sahiwal", 0.09]],
        "prediction_id": "p1",
        "timestamp": "t1",
        "breed_info": {"origin": "Gujarat"}
    }))
    .expect("minimal payload")
}

pub fn gir_result() -> PredictionResult {
    PredictionResult {
        prediction_id: PredictionId::from("GVS00042"),
        timestamp: "2024-03-01 10:15:00".into(),
        breed: "Gir".into(),
        hindi_name: Some("गिर".into()),
        confidence: 0.912,
        confidence_level: None,
        breed_info: gir_info(),
        top5: vec![
            RankedBreed("Gir".into(), 0.912),
            RankedBreed("Sahiwal".into(), 0.05),
            RankedBreed("Red Sindhi".into(), 0.038),
        ],
        model_version: Some("GOVANSH Heuristic v2.1".into()),
    }
}

pub fn gir_info() -> BreedInfo {
    [
        ("origin", "Gujarat"),
        ("type", "Dairy"),
        ("milk_yield", "12-20 L/day"),
        ("market_value", "₹50,000 - ₹1,50,000"),
        ("govt_scheme", "Rashtriya Gokul Mission"),
        ("special", "Heat tolerant"),
        ("climate", "Hot and dry"),
        ("hindi_name", "गिर"),
    ]
    .into_iter()
    .collect()
}

pub fn sample_image(name: &str) -> ImageFile {
    ImageFile::new(name, format!("bytes-of-{name}").into_bytes())
}

pub fn history_entry(breed: &str, id: &str) -> HistoryEntry {
    HistoryEntry {
        breed: breed.into(),
        confidence: 0.5,
        timestamp: "2024-03-01 09:00:00".into(),
        prediction_id: Some(PredictionId::from(id)),
    }
}

pub enum FakePredict {
    Outcome(PredictOutcome),
    TransportFailure(&'static str),
    Hang,
}

/// Scripted server; records which endpoints were called, in order.
#[derive(Default)]
pub struct FakeApi {
    pub session: Option<SessionStatus>,
    pub history: Vec<HistoryEntry>,
    pub stats: StatsSnapshot,
    pub predict_script: Mutex<VecDeque<FakePredict>>,
    pub compare: Option<CompareResult>,
    pub breeds: Vec<BreedSummary>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
    pub stats_unavailable: bool,
}

impl FakeApi {
    pub fn logged_in(username: &str) -> Self {
        Self {
            session: Some(SessionStatus {
                authenticated: true,
                username: Some(username.into()),
                email: None,
            }),
            stats: StatsSnapshot {
                my_predictions: 3,
                total_users: 10,
                total_predictions: 40,
                top_breeds: vec![BreedCount {
                    breed: "Gir".into(),
                    count: 12,
                }],
            },
            ..Self::default()
        }
    }

    pub fn with_predictions(self, script: impl IntoIterator<Item = FakePredict>) -> Self {
        *self.predict_script.lock().expect("script") = script.into_iter().collect();
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_compare(mut self, breed1: &str, breed2: &str) -> Self {
        self.compare = Some(CompareResult {
            breed1: BreedProfile {
                name: breed1.into(),
                info: gir_info(),
            },
            breed2: BreedProfile {
                name: breed2.into(),
                info: BreedInfo::default(),
            },
        });
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|call| **call == endpoint).count()
    }

    fn record(&self, endpoint: &'static str) {
        self.calls.lock().expect("calls").push(endpoint);
    }
}

#[async_trait]
impl GovanshApi for FakeApi {
    async fn session_status(&self) -> ClientResult<SessionStatus> {
        self.record("me");
        self.session.clone().ok_or(ClientError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        })
    }

    async fn history(&self) -> ClientResult<Vec<HistoryEntry>> {
        self.record("history");
        Ok(self.history.clone())
    }

    async fn stats(&self) -> ClientResult<StatsSnapshot> {
        self.record("stats");
        if self.stats_unavailable {
            return Err(ClientError::Api {
                status: 503,
                message: "Service Unavailable".into(),
            });
        }
        Ok(self.stats.clone())
    }

    async fn predict(&self, _image: ImageFile) -> ClientResult<PredictOutcome> {
        self.record("predict");
        let next = self.predict_script.lock().expect("script").pop_front();
        match next {
            Some(FakePredict::Outcome(outcome)) => Ok(outcome),
            Some(FakePredict::TransportFailure(reason)) => Err(ClientError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                reason,
            ))),
            Some(FakePredict::Hang) => futures::future::pending().await,
            None => Err(ClientError::Domain("no scripted prediction".into())),
        }
    }

    async fn compare(&self, _breed1: &str, _breed2: &str) -> ClientResult<CompareResult> {
        self.record("compare");
        self.compare
            .clone()
            .ok_or_else(|| ClientError::Domain("Breed not found".into()))
    }

    async fn breeds(&self) -> ClientResult<BreedListResponse> {
        self.record("breeds");
        Ok(BreedListResponse {
            total: self.breeds.len() as u64,
            breeds: self.breeds.clone(),
        })
    }

    async fn breed(&self, name: &str) -> ClientResult<BreedDetail> {
        self.record("breed");
        if name == "Gir" {
            Ok(BreedDetail {
                breed: name.into(),
                info: gir_info(),
            })
        } else {
            Err(ClientError::Domain("Breed not found".into()))
        }
    }
}
