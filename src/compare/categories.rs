use std::fmt;

use serde::{Deserialize, Serialize};

/// Sustainability categories mined from village descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Energy,
    Water,
    Waste,
    Transport,
    Agriculture,
    Healthcare,
    Education,
    Economy,
    Environment,
    Technology,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Energy,
        Category::Water,
        Category::Waste,
        Category::Transport,
        Category::Agriculture,
        Category::Healthcare,
        Category::Education,
        Category::Economy,
        Category::Environment,
        Category::Technology,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Energy => &[
                "solar",
                "renewable",
                "wind",
                "biogas",
                "electricity",
                "power",
                "energy",
                "generator",
                "battery",
                "grid",
            ],
            Category::Water => &[
                "water",
                "irrigation",
                "wells",
                "rainwater",
                "watershed",
                "drainage",
                "bore",
                "tank",
                "reservoir",
                "pipeline",
            ],
            Category::Waste => &[
                "waste",
                "recycling",
                "compost",
                "sewage",
                "sanitation",
                "garbage",
                "toilet",
                "latrine",
                "disposal",
                "collection",
            ],
            Category::Transport => &[
                "transport",
                "roads",
                "connectivity",
                "vehicles",
                "public transport",
                "bus",
                "railway",
                "highway",
                "bridge",
            ],
            Category::Agriculture => &[
                "organic",
                "farming",
                "crops",
                "agriculture",
                "sustainable farming",
                "fertilizer",
                "pesticide",
                "irrigation",
                "harvest",
            ],
            Category::Healthcare => &[
                "hospital",
                "clinic",
                "health",
                "medical",
                "healthcare",
                "doctor",
                "medicine",
                "pharmacy",
                "ambulance",
            ],
            Category::Education => &[
                "school",
                "education",
                "literacy",
                "training",
                "learning",
                "teacher",
                "college",
                "university",
                "library",
            ],
            Category::Economy => &[
                "employment",
                "income",
                "business",
                "economy",
                "livelihood",
                "market",
                "shop",
                "industry",
                "cooperative",
            ],
            Category::Environment => &[
                "forest",
                "trees",
                "pollution",
                "environment",
                "conservation",
                "green",
                "clean",
                "biodiversity",
                "wildlife",
            ],
            Category::Technology => &[
                "digital",
                "internet",
                "technology",
                "mobile",
                "computer",
                "wifi",
                "network",
                "online",
                "app",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Energy => "energy",
            Category::Water => "water",
            Category::Waste => "waste",
            Category::Transport => "transport",
            Category::Agriculture => "agriculture",
            Category::Healthcare => "healthcare",
            Category::Education => "education",
            Category::Economy => "economy",
            Category::Environment => "environment",
            Category::Technology => "technology",
        };
        f.write_str(name)
    }
}
