use super::category::ProblemCategory;

/// Hard cap on assembled steps.
const MAX_STEPS: usize = 8;
/// Knowledge-base solutions are clipped when inlined as steps.
const MAX_INLINE_SOLUTION_LEN: usize = 100;

/// Base step template for a problem category.
fn base_steps(category: ProblemCategory) -> &'static [&'static str] {
    match category {
        ProblemCategory::Traffic => &[
            "Conduct traffic flow analysis and identify bottlenecks",
            "Install smart traffic signals with adaptive timing",
            "Implement an intelligent transportation system",
            "Deploy traffic monitoring cameras and sensors",
            "Create alternative route recommendations",
            "Monitor and optimize traffic patterns continuously",
        ],
        ProblemCategory::Parking => &[
            "Survey current parking capacity and utilization",
            "Install smart parking sensors and meters",
            "Develop a mobile app for parking availability",
            "Implement dynamic pricing based on demand",
            "Create designated parking zones",
            "Monitor usage and adjust policies accordingly",
        ],
        ProblemCategory::Waste => &[
            "Assess current waste generation and disposal patterns",
            "Install smart waste bins with fill-level sensors",
            "Implement waste segregation at source",
            "Optimize collection routes using sensor data",
            "Establish recycling and composting facilities",
            "Monitor waste reduction and recycling rates",
        ],
        ProblemCategory::Energy => &[
            "Conduct an energy audit and identify inefficiencies",
            "Install renewable energy sources (solar or wind)",
            "Deploy smart grid infrastructure",
            "Implement energy monitoring systems",
            "Create energy conservation programs",
            "Track energy consumption and savings",
        ],
        ProblemCategory::Water => &[
            "Assess water supply and demand patterns",
            "Install smart water meters and leak detection",
            "Implement rainwater harvesting systems",
            "Deploy water quality monitoring sensors",
            "Create water conservation programs",
            "Monitor water usage and quality continuously",
        ],
        ProblemCategory::Transport => &[
            "Analyze current transportation needs and gaps",
            "Establish efficient public transport routes",
            "Deploy GPS tracking for vehicles",
            "Implement a digital ticketing system",
            "Create an integrated transport network",
            "Monitor ridership and service quality",
        ],
        ProblemCategory::Connectivity => &[
            "Assess current connectivity infrastructure",
            "Install fiber optic or wireless networks",
            "Set up public Wi-Fi hotspots",
            "Implement digital service platforms",
            "Provide digital literacy training",
            "Monitor network performance and usage",
        ],
        ProblemCategory::Healthcare => &[
            "Assess healthcare needs and service gaps",
            "Establish mobile health clinics or telemedicine",
            "Deploy health monitoring systems",
            "Create health awareness programs",
            "Train local healthcare workers",
            "Monitor health outcomes and service delivery",
        ],
        _ => &[
            "Analyze the current situation and identify key issues",
            "Develop a comprehensive solution strategy",
            "Implement a pilot project with monitoring systems",
            "Scale up successful interventions",
            "Establish ongoing monitoring and evaluation",
            "Continuously improve based on feedback",
        ],
    }
}

/// Assemble numbered steps: the category template interleaved with
/// solutions mined from the knowledge base, capped at eight.
pub fn build_steps(category: ProblemCategory, knowledge_solutions: &[String]) -> Vec<String> {
    let mut steps = Vec::new();
    let mut step_num = 1;

    for (i, base) in base_steps(category).iter().enumerate() {
        steps.push(format!("Step {}: {}", step_num, base));
        step_num += 1;

        if let Some(solution) = knowledge_solutions.get(i) {
            steps.push(format!("Step {}: {}", step_num, inline(solution)));
            step_num += 1;
        }

        if step_num > MAX_STEPS {
            break;
        }
    }

    steps.truncate(MAX_STEPS);
    steps
}

/// Generic steps when retrieval found nothing relevant.
pub fn no_result_steps() -> Vec<String> {
    [
        "Research similar problems and solutions",
        "Consult with domain experts",
        "Develop a custom solution based on best practices",
        "Pilot test the solution",
        "Scale up if successful",
        "Monitor and evaluate continuously",
    ]
    .iter()
    .enumerate()
    .map(|(i, step)| format!("Step {}: {}", i + 1, step))
    .collect()
}

fn inline(solution: &str) -> String {
    if solution.chars().count() > MAX_INLINE_SOLUTION_LEN {
        let clipped: String = solution.chars().take(MAX_INLINE_SOLUTION_LEN).collect();
        format!("{}...", clipped)
    } else {
        solution.to_string()
    }
}
