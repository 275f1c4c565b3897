//! Breed catalogue browsing.

use std::fmt;

use shared::protocol::{BreedDetail, BreedSummary};

use crate::{
    error::ClientResult,
    render::{render_kv, KvPanel, ResultTab, PLACEHOLDER},
    GovanshApi,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueView {
    pub breeds: Vec<BreedSummary>,
    pub total: u64,
}

impl fmt::Display for CatalogueView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} breeds", self.total)?;
        for breed in &self.breeds {
            writeln!(
                f,
                "  {:<20}{:<16}{:<14}{}",
                breed.name,
                or_placeholder(&breed.hindi_name),
                or_placeholder(&breed.kind),
                or_placeholder(&breed.state)
            )?;
        }
        Ok(())
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

/// One breed profile laid out with the same four panels as a prediction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedProfileView {
    pub name: String,
    pub panels: Vec<(ResultTab, KvPanel)>,
}

impl From<&BreedDetail> for BreedProfileView {
    fn from(detail: &BreedDetail) -> Self {
        Self {
            name: detail.breed.clone(),
            panels: ResultTab::ALL
                .into_iter()
                .filter_map(|tab| tab.fields().map(|fields| (tab, render_kv(&detail.info, fields))))
                .collect(),
        }
    }
}

impl fmt::Display for BreedProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for (tab, panel) in &self.panels {
            writeln!(f, "\n[{}]", tab.label())?;
            write!(f, "{panel}")?;
        }
        Ok(())
    }
}

pub struct ExploreController<'a> {
    api: &'a dyn GovanshApi,
}

impl<'a> ExploreController<'a> {
    pub fn new(api: &'a dyn GovanshApi) -> Self {
        Self { api }
    }

    pub async fn catalogue(&self) -> ClientResult<CatalogueView> {
        let list = self.api.breeds().await?;
        Ok(CatalogueView {
            total: list.total.max(list.breeds.len() as u64),
            breeds: list.breeds,
        })
    }

    pub async fn profile(&self, name: &str) -> ClientResult<BreedProfileView> {
        let detail = self.api.breed(name).await?;
        Ok(BreedProfileView::from(&detail))
    }
}
