use std::collections::BTreeMap;

use super::categories::Category;

/// Categories where the target trails the reference village.
///
/// A category counts as a gap when the reference has features the
/// target lacks entirely, or simply has more of them.
pub fn gap_categories(
    target: &BTreeMap<Category, Vec<String>>,
    reference: &BTreeMap<Category, Vec<String>>,
) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| {
            let have = target.get(category).map(|v| v.len()).unwrap_or(0);
            let want = reference.get(category).map(|v| v.len()).unwrap_or(0);
            want > 0 && have < want
        })
        .collect()
}

/// Concrete technology suggestions for a gap category.
pub fn recommendations_for(category: Category) -> Vec<&'static str> {
    match category {
        Category::Energy => vec![
            "RENEWABLE ENERGY TECHNOLOGIES:",
            "  - Solar rooftop systems (3-5 kW for households)",
            "  - Community biogas plants using agricultural waste",
            "  - Micro wind turbines for areas with good wind patterns",
            "  - Solar street lighting with LED fixtures",
            "  - Battery storage systems for energy backup",
        ],
        Category::Water => vec![
            "WATER MANAGEMENT TECHNOLOGIES:",
            "  - Rainwater harvesting tanks (5000-10000L capacity)",
            "  - Drip irrigation systems for efficient farming",
            "  - Solar-powered water pumps",
            "  - Greywater recycling systems for households",
            "  - Smart water meters for usage monitoring",
        ],
        Category::Waste => vec![
            "WASTE MANAGEMENT TECHNOLOGIES:",
            "  - Composting units for organic waste",
            "  - Biogas digesters for kitchen waste",
            "  - Plastic shredding machines for recycling",
            "  - Vermiculture systems for organic fertilizer",
            "  - Mobile waste collection apps and scheduling",
        ],
        Category::Transport => vec![
            "SUSTAINABLE TRANSPORT SOLUTIONS:",
            "  - Electric rickshaws and auto-rickshaws",
            "  - Solar-powered bus stops with charging stations",
            "  - Bike-sharing programs with GPS tracking",
            "  - Carpooling apps for rural areas",
            "  - Electric vehicle charging infrastructure",
        ],
        Category::Agriculture => vec![
            "SMART AGRICULTURE TECHNOLOGIES:",
            "  - Precision farming with IoT sensors",
            "  - Organic certification and marketing platforms",
            "  - Drone-based crop monitoring",
            "  - Soil health testing kits",
            "  - Mobile apps for weather and market prices",
        ],
        Category::Healthcare => vec![
            "HEALTHCARE TECHNOLOGIES:",
            "  - Portable diagnostic devices (ECG, blood pressure)",
            "  - Telemedicine kiosks with video consultation",
            "  - Mobile health apps for vaccination tracking",
            "  - Water purification tablets and testing kits",
            "  - Solar-powered vaccine refrigerators",
        ],
        Category::Education => vec![
            "EDUCATIONAL TECHNOLOGIES:",
            "  - Solar-powered e-learning tablets",
            "  - Digital libraries with offline content",
            "  - Skill development through online platforms",
            "  - Virtual reality for immersive learning",
            "  - Satellite internet for remote connectivity",
        ],
        Category::Economy => vec![
            "ECONOMIC DEVELOPMENT TECH:",
            "  - E-commerce platforms for local products",
            "  - Microfinance mobile applications",
            "  - Digital payment systems (UPI, mobile wallets)",
            "  - Supply chain management software",
            "  - Online marketplaces for agricultural products",
        ],
        Category::Environment => vec![
            "ENVIRONMENTAL CONSERVATION TECH:",
            "  - Air quality monitoring sensors",
            "  - Tree plantation with native species selection",
            "  - Wetland restoration systems",
            "  - Carbon footprint tracking apps",
            "  - Biodiversity monitoring with camera traps",
        ],
        Category::Technology => vec![
            "DIGITAL INFRASTRUCTURE:",
            "  - Community Wi-Fi hotspots with solar power",
            "  - Digital literacy centers with tablets and computers",
            "  - Mobile banking and financial inclusion apps",
            "  - Telemedicine platforms for remote healthcare",
            "  - E-governance portals for citizen services",
        ],
    }
}

/// Fallback suggestions when no specific gaps were found.
pub fn general_recommendations() -> Vec<&'static str> {
    vec![
        "GENERAL SUSTAINABILITY ENHANCEMENTS:",
        "  - Smart meters for electricity and water monitoring",
        "  - Community-based renewable energy cooperatives",
        "  - Waste-to-energy conversion systems",
        "  - Green building certification programs",
        "  - Environmental education and awareness campaigns",
        "  - Sustainable tourism development platforms",
        "  - Local food processing and value addition units",
    ]
}

pub fn implementation_strategy() -> Vec<&'static str> {
    vec![
        "IMPLEMENTATION STRATEGY:",
        "  - Start with 1-2 pilot projects based on community priorities",
        "  - Seek government subsidies and schemes",
        "  - Partner with NGOs and social enterprises",
        "  - Involve local youth and self-help groups in implementation",
        "  - Monitor progress with measurable indicators",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(pairs: &[(Category, usize)]) -> BTreeMap<Category, Vec<String>> {
        let mut map = BTreeMap::new();
        for (category, n) in pairs {
            map.insert(*category, vec!["feature".to_string(); *n]);
        }
        map
    }

    #[test]
    fn missing_category_is_a_gap() {
        let target = features(&[]);
        let reference = features(&[(Category::Energy, 2)]);
        assert_eq!(gap_categories(&target, &reference), vec![Category::Energy]);
    }

    #[test]
    fn weaker_category_is_a_gap() {
        let target = features(&[(Category::Water, 1)]);
        let reference = features(&[(Category::Water, 3)]);
        assert_eq!(gap_categories(&target, &reference), vec![Category::Water]);
    }

    #[test]
    fn equal_or_stronger_category_is_not_a_gap() {
        let target = features(&[(Category::Waste, 2)]);
        let reference = features(&[(Category::Waste, 2)]);
        assert!(gap_categories(&target, &reference).is_empty());
    }

    #[test]
    fn every_category_has_recommendations() {
        for category in Category::ALL {
            let recs = recommendations_for(category);
            assert!(recs.len() > 1, "no recommendations for {}", category);
        }
    }
}
