//! Job posting data structures.

use serde::{Deserialize, Serialize};

/// A single job posting as delivered by the feed.
///
/// `region` is kept as the raw wire string so the classification rules can
/// decide what to do with unrecognized codes (drop or fold into WW,
/// depending on the active ruleset).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Opaque unique identifier
    pub id: String,

    /// Posting title
    pub title: String,

    /// Hiring company (masked at render time for teaser postings)
    pub company: String,

    /// Raw region code (WW, EMEA, APAC, NA, LATAM); absent means WW
    #[serde(default)]
    pub region: Option<String>,

    /// Whether the role is genuinely location-unrestricted
    #[serde(default)]
    pub is_remote: bool,

    /// Free-text location, may be a placeholder meaning "unknown"
    #[serde(default)]
    pub location: Option<String>,

    /// Human-readable salary string (e.g. "€70k-90k", "$45/hr")
    #[serde(default)]
    pub salary: Option<String>,

    /// Annual USD lower bound
    #[serde(default)]
    pub salary_min: Option<u64>,

    /// Annual USD upper bound
    #[serde(default)]
    pub salary_max: Option<u64>,

    /// Comma-separated skill list, entries optionally scored "(0.95)"
    #[serde(default)]
    pub skills: Option<String>,

    /// Opaque seniority label, passed through unmodified
    #[serde(default)]
    pub seniority: Option<String>,

    /// Opaque applicant-tracking-system label, passed through unmodified
    #[serde(default)]
    pub ats: Option<String>,

    /// Verification freshness timestamp (ISO-ish string)
    #[serde(default)]
    pub verified_at: Option<String>,

    /// Collection timestamp (ISO-ish string)
    #[serde(default)]
    pub scraped_at: Option<String>,

    /// Direct apply link
    #[serde(default)]
    pub url: Option<String>,

    /// Access tier
    #[serde(default)]
    pub visibility: Visibility,
}

impl JobRecord {
    /// Whether identity-revealing fields must be withheld at render time.
    pub fn is_teaser(&self) -> bool {
        self.visibility == Visibility::Teaser
    }
}

/// Access tier of a posting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Company identity and apply destination withheld pending upgrade
    Teaser,
    /// Fully visible posting; unknown tiers fold here.
    /// Must stay the last variant for `#[serde(other)]`.
    #[default]
    #[serde(other)]
    Full,
}

/// Geographic region bucket code.
///
/// Variant order is the display order of sections in the overview document
/// and the iteration order of `BTreeMap<Region, _>` buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Worldwide remote
    Ww,
    /// North America
    Na,
    /// Europe, Middle East & Africa
    Emea,
    /// Asia-Pacific
    Apac,
    /// Latin America
    Latam,
}

impl Region {
    /// All regions in display order.
    pub const ALL: [Region; 5] = [
        Region::Ww,
        Region::Na,
        Region::Emea,
        Region::Apac,
        Region::Latam,
    ];

    /// Parse a wire code. Returns `None` for unrecognized codes.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "WW" => Some(Region::Ww),
            "NA" => Some(Region::Na),
            "EMEA" => Some(Region::Emea),
            "APAC" => Some(Region::Apac),
            "LATAM" => Some(Region::Latam),
            _ => None,
        }
    }

    /// Wire/display code for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Ww => "WW",
            Region::Na => "NA",
            Region::Emea => "EMEA",
            Region::Apac => "APAC",
            Region::Latam => "LATAM",
        }
    }

    /// Human-readable section name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Ww => "Worldwide Remote",
            Region::Na => "North America",
            Region::Emea => "EMEA",
            Region::Apac => "Asia-Pacific",
            Region::Latam => "Latin America",
        }
    }
}
