//! Side-by-side comparison of two catalogue breeds.

use std::fmt;

use shared::protocol::{BreedProfile, CompareResult};
use tracing::{info, warn};

use crate::{
    error::{ClientError, ClientResult},
    render::{render_kv, FieldTable, KvPanel},
    GovanshApi,
};

pub const SAME_BREED_MESSAGE: &str = "Select two different breeds";
pub const COMPARE_FAILED_MESSAGE: &str = "Compare failed";

pub const COMPARE_FIELDS: FieldTable = &[
    ("origin", "Origin"),
    ("type", "Type"),
    ("milk_yield", "Milk Yield"),
    ("market_value", "Market Value"),
    ("climate", "Climate"),
    ("govt_scheme", "Govt Scheme"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePanel {
    pub name: String,
    pub localized_name: String,
    pub attributes: KvPanel,
}

impl From<&BreedProfile> for ComparePanel {
    fn from(profile: &BreedProfile) -> Self {
        Self {
            name: profile.name.clone(),
            localized_name: profile.info.get("hindi_name").unwrap_or_default().to_string(),
            attributes: render_kv(&profile.info, COMPARE_FIELDS),
        }
    }
}

impl fmt::Display for ComparePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.localized_name.is_empty() {
            writeln!(f, "{}", self.name)?;
        } else {
            writeln!(f, "{} {}", self.name, self.localized_name)?;
        }
        write!(f, "{}", self.attributes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareView {
    pub left: ComparePanel,
    pub right: ComparePanel,
}

impl From<&CompareResult> for CompareView {
    fn from(result: &CompareResult) -> Self {
        Self {
            left: ComparePanel::from(&result.breed1),
            right: ComparePanel::from(&result.breed2),
        }
    }
}

impl fmt::Display for CompareView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.left)?;
        write!(f, "{}", self.right)
    }
}

pub struct CompareController<'a> {
    api: &'a dyn GovanshApi,
}

impl<'a> CompareController<'a> {
    pub fn new(api: &'a dyn GovanshApi) -> Self {
        Self { api }
    }

    /// Identical names are rejected before any request goes out.
    pub async fn compare(&self, breed1: &str, breed2: &str) -> ClientResult<CompareView> {
        if breed1 == breed2 {
            return Err(ClientError::Selection(SAME_BREED_MESSAGE.to_string()));
        }
        info!(breed1, breed2, "comparing breeds");
        match self.api.compare(breed1, breed2).await {
            Ok(result) => Ok(CompareView::from(&result)),
            Err(err @ (ClientError::Domain(_) | ClientError::Unauthorized)) => Err(err),
            Err(ClientError::Api { status, .. }) => Err(ClientError::Api {
                status,
                message: COMPARE_FAILED_MESSAGE.to_string(),
            }),
            Err(err) => {
                warn!(error = %err, breed1, breed2, "compare request failed");
                Err(ClientError::Domain(COMPARE_FAILED_MESSAGE.to_string()))
            }
        }
    }
}
