use std::sync::OnceLock;

use regex::Regex;

/// Length caps for extracted problem and solution text.
const MAX_PROBLEM_LEN: usize = 200;
const MAX_SOLUTION_LEN: usize = 300;
const MIN_PART_LEN: usize = 10;
const MIN_SENTENCE_LEN: usize = 15;

/// Verbs that mark a sentence as describing a solution.
const SOLUTION_KEYWORDS: &[&str] = &[
    "implement",
    "establish",
    "create",
    "develop",
    "install",
    "deploy",
    "set up",
    "build",
    "construct",
];

fn marker_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:problem:|solution:|issue:|resolution:|challenge:|approach:)")
            .expect("static regex")
    })
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static regex"))
}

/// Pull a (problem, solution) pair out of a retrieved chunk.
///
/// Structured chunks use `problem:`/`solution:`-style markers; odd
/// segments after a marker are treated as problems, even ones as
/// solutions. Unstructured chunks are classified sentence by sentence
/// on solution verbs. Either side may come back empty.
pub fn extract_problem_solution(text: &str) -> (String, String) {
    let text = whitespace().replace_all(text.trim(), " ");

    let parts: Vec<&str> = marker_splitter().split(&text).collect();
    let mut problem = String::new();
    let mut solution = String::new();

    if parts.len() > 1 {
        for (i, part) in parts.iter().enumerate().skip(1) {
            let part = part.trim();
            if part.len() <= MIN_PART_LEN {
                continue;
            }
            if i % 2 == 1 {
                if problem.is_empty() {
                    problem = clip(part, MAX_PROBLEM_LEN);
                }
            } else if solution.is_empty() {
                solution = clip(part, MAX_SOLUTION_LEN);
            }
        }
    }

    if problem.is_empty() && solution.is_empty() {
        let mut problem_sentences = Vec::new();
        let mut solution_sentences = Vec::new();

        for sentence in sentence_splitter().split(&text) {
            let sentence = sentence.trim();
            if sentence.len() <= MIN_SENTENCE_LEN {
                continue;
            }
            let lower = sentence.to_lowercase();
            if SOLUTION_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                solution_sentences.push(sentence);
            } else {
                problem_sentences.push(sentence);
            }
        }

        solution = solution_sentences[..solution_sentences.len().min(2)].join(". ");
        problem = problem_sentences[..problem_sentences.len().min(2)].join(". ");
    }

    (problem.trim().to_string(), solution.trim().to_string())
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_markers_are_split() {
        let (problem, solution) = extract_problem_solution(
            "Problem: streets flood every monsoon season badly. \
             Solution: install storm drains along the main roads.",
        );
        assert!(problem.contains("flood"));
        assert!(solution.contains("storm drains"));
    }

    #[test]
    fn markers_are_case_insensitive() {
        let (problem, _) =
            extract_problem_solution("PROBLEM: garbage piles up near the market every week.");
        assert!(problem.contains("garbage"));
    }

    #[test]
    fn unstructured_text_is_classified_by_verbs() {
        let (problem, solution) = extract_problem_solution(
            "The village has no reliable electricity at night. \
             Install solar street lighting with battery backup.",
        );
        assert!(problem.contains("electricity"));
        assert!(solution.contains("solar street lighting"));
    }

    #[test]
    fn extraction_caps_lengths() {
        let long = format!("Problem: {} Solution: {}", "p".repeat(500), "s".repeat(500));
        let (problem, solution) = extract_problem_solution(&long);
        assert!(problem.chars().count() <= 200);
        assert!(solution.chars().count() <= 300);
    }

    #[test]
    fn short_noise_yields_nothing() {
        let (problem, solution) = extract_problem_solution("ok. fine. yes.");
        assert!(problem.is_empty());
        assert!(solution.is_empty());
    }
}
