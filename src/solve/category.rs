use std::fmt;

use serde::{Deserialize, Serialize};

/// Terms that mark a query as being about smart-city problems at all.
const SMART_CITY_KEYWORDS: &[&str] = &[
    "traffic",
    "parking",
    "waste",
    "pollution",
    "energy",
    "water",
    "transport",
    "infrastructure",
    "urban",
    "city",
    "municipal",
    "public",
    "environment",
    "smart",
    "digital",
    "iot",
    "sensor",
    "monitoring",
    "management",
    "efficiency",
    "sustainability",
    "green",
    "renewable",
    "congestion",
    "mobility",
    "housing",
    "street",
    "lighting",
    "safety",
    "security",
    "governance",
    "citizen",
    "service",
    "village",
    "rural",
    "community",
    "development",
    "healthcare",
    "education",
    "connectivity",
    "road",
    "drainage",
    "irrigation",
    "power",
    "electricity",
];

/// Whether a query is in the solver's domain at all.
pub fn is_smart_city_query(query: &str) -> bool {
    let query = query.to_lowercase();
    SMART_CITY_KEYWORDS
        .iter()
        .any(|keyword| query.contains(keyword))
}

/// Problem categories with dedicated step templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemCategory {
    Traffic,
    Parking,
    Waste,
    Energy,
    Water,
    Transport,
    Pollution,
    Housing,
    Safety,
    Governance,
    Healthcare,
    Education,
    Connectivity,
    Infrastructure,
    General,
}

impl ProblemCategory {
    /// Classification order matters: the first category with a keyword
    /// hit wins, so "traffic congestion near parking lots" is traffic.
    const CLASSIFIER: &'static [(ProblemCategory, &'static [&'static str])] = &[
        (
            ProblemCategory::Traffic,
            &["traffic", "congestion", "jam", "flow", "signal", "vehicles"],
        ),
        (
            ProblemCategory::Parking,
            &["parking", "park", "space", "lot", "garage"],
        ),
        (
            ProblemCategory::Waste,
            &["waste", "garbage", "trash", "refuse", "recycling", "disposal"],
        ),
        (
            ProblemCategory::Energy,
            &["energy", "power", "electricity", "solar", "renewable", "grid"],
        ),
        (
            ProblemCategory::Water,
            &["water", "supply", "drainage", "sewage", "irrigation", "leak"],
        ),
        (
            ProblemCategory::Transport,
            &["transport", "bus", "metro", "public transport", "mobility", "transit"],
        ),
        (
            ProblemCategory::Pollution,
            &["pollution", "air quality", "noise", "emission", "contamination", "smog"],
        ),
        (
            ProblemCategory::Housing,
            &["housing", "residential", "accommodation", "shelter", "building"],
        ),
        (
            ProblemCategory::Safety,
            &["safety", "security", "crime", "surveillance", "emergency"],
        ),
        (
            ProblemCategory::Governance,
            &["governance", "administration", "service", "citizen", "digital"],
        ),
        (
            ProblemCategory::Healthcare,
            &["healthcare", "health", "medical", "clinic", "hospital", "doctor"],
        ),
        (
            ProblemCategory::Education,
            &["education", "school", "teacher", "learning", "student"],
        ),
        (
            ProblemCategory::Connectivity,
            &["connectivity", "internet", "network", "communication", "wifi"],
        ),
        (
            ProblemCategory::Infrastructure,
            &["road", "bridge", "construction", "infrastructure"],
        ),
    ];

    /// Classify a query into its main problem category.
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        for (category, keywords) in Self::CLASSIFIER {
            if keywords.iter().any(|keyword| query.contains(keyword)) {
                return *category;
            }
        }
        ProblemCategory::General
    }
}

impl fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemCategory::Traffic => "traffic",
            ProblemCategory::Parking => "parking",
            ProblemCategory::Waste => "waste",
            ProblemCategory::Energy => "energy",
            ProblemCategory::Water => "water",
            ProblemCategory::Transport => "transport",
            ProblemCategory::Pollution => "pollution",
            ProblemCategory::Housing => "housing",
            ProblemCategory::Safety => "safety",
            ProblemCategory::Governance => "governance",
            ProblemCategory::Healthcare => "healthcare",
            ProblemCategory::Education => "education",
            ProblemCategory::Connectivity => "connectivity",
            ProblemCategory::Infrastructure => "infrastructure",
            ProblemCategory::General => "general",
        };
        f.write_str(name)
    }
}
