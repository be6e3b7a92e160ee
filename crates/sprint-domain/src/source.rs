//! Source tracking
//!
//! A source is one cited origin for one claimed value. Sources are immutable
//! once recorded; claims reference them.

use crate::ids::SourceId;
use crate::trust::SourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cited source backing a claimed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier
    pub id: SourceId,

    /// Where the value was observed
    pub url: String,

    /// Source type tag, used for trust ranking
    pub source_type: SourceType,

    /// Title of the page or document
    pub title: String,

    /// When the source published or observed the value
    pub observed_at: DateTime<Utc>,

    /// The value this source claims, as written
    pub value: String,
}

impl Source {
    /// Create a new source with a generated identifier
    pub fn new(
        url: impl Into<String>,
        source_type: SourceType,
        title: impl Into<String>,
        observed_at: DateTime<Utc>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: SourceId::new(),
            url: url.into(),
            source_type,
            title: title.into(),
            observed_at,
            value: value.into(),
        }
    }

    /// Replace the generated identifier
    pub fn with_id(mut self, id: impl Into<SourceId>) -> Self {
        self.id = id.into();
        self
    }

    /// A source needs a URL and a non-blank value to count as evidence
    pub fn is_well_formed(&self) -> bool {
        !self.url.trim().is_empty() && !self.value.trim().is_empty()
    }
}
