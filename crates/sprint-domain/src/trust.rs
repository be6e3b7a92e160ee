//! Source trust hierarchy
//!
//! Every cited source carries a type tag. The trust table maps each type to a
//! rank (higher = more trusted). Ranks are configuration with documented
//! defaults, but must stay injective: no two types may share a rank.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Kind of origin a source comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Company press release or newsroom post
    PressRelease,
    /// SEC or other regulatory filing
    RegulatoryFiling,
    /// Reputable business press (TechCrunch, Bloomberg, ...)
    BusinessPress,
    /// Investor or company blog post
    InvestorBlog,
    /// Funding databases such as Crunchbase or PitchBook
    DataPlatform,
    /// Wikipedia
    Wikipedia,
    /// Generic company directories
    Directory,
    /// Social media (X, LinkedIn, ...)
    Social,
    /// Unclassified origin
    Unknown,
}

const BUSINESS_OUTLETS: &[&str] = &[
    "techcrunch",
    "bloomberg",
    "reuters",
    "forbes",
    "wsj.com",
    "ft.com",
    "theinformation",
    "axios",
    "cnbc",
    "businessinsider",
];

const INVESTOR_DOMAINS: &[&str] = &[
    "a16z.com",
    "sequoiacap",
    "accel.com",
    "greylock",
    "kleinerperkins",
    "benchmark.com",
    "lightspeedvp",
];

const PRESS_PATHS: &[&str] = &["/press/", "/news/", "/newsroom/", "/blog/"];

const SOCIAL_DOMAINS: &[&str] = &["twitter.com", "x.com", "linkedin.com"];

impl SourceType {
    /// All source types, most trusted first under the default table
    pub const ALL: [SourceType; 9] = [
        SourceType::PressRelease,
        SourceType::RegulatoryFiling,
        SourceType::BusinessPress,
        SourceType::InvestorBlog,
        SourceType::DataPlatform,
        SourceType::Wikipedia,
        SourceType::Directory,
        SourceType::Social,
        SourceType::Unknown,
    ];

    /// Get the canonical tag
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::PressRelease => "press_release",
            SourceType::RegulatoryFiling => "regulatory_filing",
            SourceType::BusinessPress => "business_press",
            SourceType::InvestorBlog => "investor_blog",
            SourceType::DataPlatform => "data_platform",
            SourceType::Wikipedia => "wikipedia",
            SourceType::Directory => "directory",
            SourceType::Social => "social",
            SourceType::Unknown => "unknown",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::PressRelease => "press release",
            SourceType::RegulatoryFiling => "regulatory filing",
            SourceType::BusinessPress => "business press",
            SourceType::InvestorBlog => "blog",
            SourceType::DataPlatform => "data platform",
            SourceType::Wikipedia => "Wikipedia",
            SourceType::Directory => "directory",
            SourceType::Social => "social media",
            SourceType::Unknown => "unknown source",
        }
    }

    /// Parse a collaborator tag, accepting the common aliases
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "press_release" | "company_press" | "official" | "press" | "newsroom" => {
                Some(SourceType::PressRelease)
            }
            "regulatory_filing" | "sec_filing" | "filing" | "regulatory" => {
                Some(SourceType::RegulatoryFiling)
            }
            "business_press" | "news" | "press_article" => Some(SourceType::BusinessPress),
            "investor_blog" | "blog" => Some(SourceType::InvestorBlog),
            "data_platform" | "database" | "crunchbase" | "pitchbook" => {
                Some(SourceType::DataPlatform)
            }
            "wikipedia" => Some(SourceType::Wikipedia),
            "directory" => Some(SourceType::Directory),
            "social" | "social_media" | "twitter" | "linkedin" => Some(SourceType::Social),
            "unknown" => Some(SourceType::Unknown),
            _ => None,
        }
    }

    /// Classify a source from its URL when no usable tag was supplied
    pub fn classify_url(url: &str) -> Self {
        let url = url.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|n| url.contains(n));
        // Entries with a dot are whole domains; bare names match anywhere.
        let is_outlet = BUSINESS_OUTLETS.iter().any(|n| {
            if n.contains('.') {
                host_matches(&url, n)
            } else {
                url.contains(n)
            }
        });

        if contains_any(PRESS_PATHS) && !is_outlet {
            return SourceType::PressRelease;
        }
        if url.contains("sec.gov") || url.contains("edgar") {
            return SourceType::RegulatoryFiling;
        }
        if is_outlet {
            return SourceType::BusinessPress;
        }
        if contains_any(INVESTOR_DOMAINS) {
            return SourceType::InvestorBlog;
        }
        if url.contains("crunchbase") || url.contains("pitchbook") {
            return SourceType::DataPlatform;
        }
        if url.contains("wikipedia.org") {
            return SourceType::Wikipedia;
        }
        if SOCIAL_DOMAINS.iter().any(|d| host_matches(&url, d)) {
            return SourceType::Social;
        }
        SourceType::Unknown
    }

    /// Whether this type belongs to the primary (press release / filing) tier
    pub fn is_primary(&self) -> bool {
        matches!(self, SourceType::PressRelease | SourceType::RegulatoryFiling)
    }

    /// Rank under the default trust table
    pub fn default_rank(&self) -> u32 {
        match self {
            SourceType::PressRelease => 100,
            SourceType::RegulatoryFiling => 95,
            SourceType::BusinessPress => 80,
            SourceType::InvestorBlog => 70,
            SourceType::DataPlatform => 60,
            SourceType::Wikipedia => 40,
            SourceType::Directory => 30,
            SourceType::Social => 20,
            SourceType::Unknown => 10,
        }
    }
}

/// Match a bare domain against the host part of a lowercase URL
fn host_matches(url: &str, domain: &str) -> bool {
    let rest = url.split("://").nth(1).unwrap_or(url);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    host == domain || host.ends_with(&format!(".{}", domain))
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source type: {}", s))
    }
}

/// Rank per source type
///
/// Deserializes from a map of tag → rank; types left out keep their default
/// rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct TrustTable {
    ranks: BTreeMap<SourceType, u32>,
}

impl Default for TrustTable {
    fn default() -> Self {
        Self {
            ranks: SourceType::ALL
                .iter()
                .map(|t| (*t, t.default_rank()))
                .collect(),
        }
    }
}

impl TrustTable {
    /// Get the rank for a source type
    pub fn rank(&self, source_type: SourceType) -> u32 {
        self.ranks
            .get(&source_type)
            .copied()
            .unwrap_or_else(|| source_type.default_rank())
    }

    /// Override the rank of one type
    pub fn with_rank(mut self, source_type: SourceType, rank: u32) -> Self {
        self.ranks.insert(source_type, rank);
        self
    }

    /// Types ordered from most to least trusted
    pub fn ordered(&self) -> Vec<(SourceType, u32)> {
        let mut entries: Vec<_> = SourceType::ALL.iter().map(|t| (*t, self.rank(*t))).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Check that ranks are injective
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for source_type in SourceType::ALL {
            let rank = self.rank(source_type);
            if !seen.insert(rank) {
                return Err(format!(
                    "trust rank {} assigned to more than one source type (including {})",
                    rank, source_type
                ));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, u32>> for TrustTable {
    type Error = String;

    fn try_from(raw: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let mut table = TrustTable::default();
        for (tag, rank) in raw {
            let source_type = SourceType::parse(&tag)
                .ok_or_else(|| format!("unknown source type in trust table: {}", tag))?;
            table.ranks.insert(source_type, rank);
        }
        Ok(table)
    }
}

impl From<TrustTable> for BTreeMap<String, u32> {
    fn from(table: TrustTable) -> Self {
        table
            .ranks
            .into_iter()
            .map(|(t, rank)| (t.as_str().to_string(), rank))
            .collect()
    }
}
