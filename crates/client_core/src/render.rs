//! Pure projection of a [`PredictionResult`] onto the result card's regions.
//!
//! Every informational panel is a static `(key, label)` table run through
//! [`render_kv`]; the same primitive backs the compare and explore views.

use std::{fmt, str::FromStr};

use shared::{
    domain::BreedInfo,
    protocol::{PredictionResult, RankedBreed},
};

/// Shown for any absent or empty value so row counts stay stable.
pub const PLACEHOLDER: &str = "-";
/// Headline colour when the server sends no confidence level.
pub const DEFAULT_CONFIDENCE_COLOR: &str = "inherit";

pub type FieldTable = &'static [(&'static str, &'static str)];

pub const OVERVIEW_FIELDS: FieldTable = &[
    ("origin", "Origin"),
    ("state", "State"),
    ("type", "Type"),
    ("category", "Category"),
    ("market_value", "Market Value"),
    ("govt_scheme", "Govt Scheme"),
];

pub const DETAILS_FIELDS: FieldTable = &[
    ("color", "Color"),
    ("horns", "Horns"),
    ("weight_male", "Weight (Male)"),
    ("weight_female", "Weight (Female)"),
    ("height", "Height"),
    ("lifespan", "Lifespan"),
];

pub const PRODUCTION_FIELDS: FieldTable = &[
    ("milk_yield", "Daily Milk Yield"),
    ("lactation", "Lactation Yield"),
    ("fat_content", "Fat Content"),
    ("gestation", "Gestation"),
    ("first_calving", "First Calving"),
    ("disease_resistance", "Disease Resistance"),
];

pub const CARE_FIELDS: FieldTable = &[
    ("feeding", "Feeding"),
    ("climate", "Climate"),
    ("special", "Special"),
    ("conservation", "Conservation"),
    ("market_value", "Market Value"),
    ("govt_scheme", "Govt Scheme"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultTab {
    #[default]
    Overview,
    Details,
    Production,
    Care,
    Top5,
}

impl ResultTab {
    pub const ALL: [ResultTab; 5] = [
        Self::Overview,
        Self::Details,
        Self::Production,
        Self::Care,
        Self::Top5,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Details => "details",
            Self::Production => "production",
            Self::Care => "care",
            Self::Top5 => "top5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Details => "Details",
            Self::Production => "Production",
            Self::Care => "Care",
            Self::Top5 => "Top 5",
        }
    }

    /// Field table behind this tab; `None` for the ranking tab.
    pub fn fields(self) -> Option<FieldTable> {
        match self {
            Self::Overview => Some(OVERVIEW_FIELDS),
            Self::Details => Some(DETAILS_FIELDS),
            Self::Production => Some(PRODUCTION_FIELDS),
            Self::Care => Some(CARE_FIELDS),
            Self::Top5 => None,
        }
    }
}

impl FromStr for ResultTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab `{s}`"))
    }
}

/// One decimal place, as every confidence readout in the product shows it.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KvPanel {
    pub rows: Vec<KvRow>,
}

impl KvPanel {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

impl fmt::Display for KvPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}: {}", row.label, row.value)?;
        }
        Ok(())
    }
}

pub fn render_kv(info: &BreedInfo, fields: FieldTable) -> KvPanel {
    KvPanel {
        rows: fields
            .iter()
            .map(|&(key, label)| KvRow {
                label,
                value: info.get(key).unwrap_or(PLACEHOLDER).to_string(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Top5Row {
    pub rank: usize,
    pub breed: String,
    pub probability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Top5Table {
    pub rows: Vec<Top5Row>,
}

impl fmt::Display for Top5Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<4}{:<24}{:>8}", "#", "Breed", "Prob")?;
        for row in &self.rows {
            writeln!(f, "{:<4}{:<24}{:>8}", row.rank, row.breed, row.probability)?;
        }
        Ok(())
    }
}

/// Ranks are 1-based and follow arrival order; the ranking is never re-sorted.
pub fn render_top5(ranking: &[RankedBreed]) -> Top5Table {
    Top5Table {
        rows: ranking
            .iter()
            .enumerate()
            .map(|(idx, entry)| Top5Row {
                rank: idx + 1,
                breed: entry.name().to_string(),
                probability: format_percent(entry.probability()),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub breed: String,
    pub localized_name: Option<String>,
    pub confidence: String,
    pub color: String,
    pub level: Option<String>,
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.breed)?;
        if let Some(name) = &self.localized_name {
            write!(f, " ({name})")?;
        }
        write!(f, "  confidence {}", self.confidence)?;
        if let Some(level) = &self.level {
            write!(f, " [{level}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub headline: Headline,
    pub overview: KvPanel,
    pub details: KvPanel,
    pub production: KvPanel,
    pub care: KvPanel,
    pub top5: Top5Table,
}

impl RenderedResult {
    pub fn panel(&self, tab: ResultTab) -> Option<&KvPanel> {
        match tab {
            ResultTab::Overview => Some(&self.overview),
            ResultTab::Details => Some(&self.details),
            ResultTab::Production => Some(&self.production),
            ResultTab::Care => Some(&self.care),
            ResultTab::Top5 => None,
        }
    }

    pub fn tab_text(&self, tab: ResultTab) -> String {
        match self.panel(tab) {
            Some(panel) => panel.to_string(),
            None => self.top5.to_string(),
        }
    }
}

pub fn render(result: &PredictionResult) -> RenderedResult {
    let info = &result.breed_info;
    let breed = if result.breed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        result.breed.clone()
    };
    let level = result.confidence_level.as_ref();

    RenderedResult {
        headline: Headline {
            breed,
            localized_name: result.localized_name().map(str::to_string),
            confidence: format_percent(result.confidence),
            color: level
                .and_then(|l| l.color.as_deref())
                .filter(|color| !color.is_empty())
                .unwrap_or(DEFAULT_CONFIDENCE_COLOR)
                .to_string(),
            level: level.and_then(|l| l.level.clone()),
        },
        overview: render_kv(info, OVERVIEW_FIELDS),
        details: render_kv(info, DETAILS_FIELDS),
        production: render_kv(info, PRODUCTION_FIELDS),
        care: render_kv(info, CARE_FIELDS),
        top5: render_top5(&result.top5),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
