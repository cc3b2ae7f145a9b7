use std::sync::Arc;

use serde::Serialize;

use super::category::{is_smart_city_query, ProblemCategory};
use super::extract::extract_problem_solution;
use super::steps::{build_steps, no_result_steps};
use crate::core::errors::AssistantError;
use crate::query::QueryEngine;

/// Problem/solution chunks retrieved per query.
const SOLVER_TOP_K: usize = 5;
/// A mined solution shorter than this is noise.
const MIN_SOLUTION_LEN: usize = 20;

/// A solution mined from the knowledge base.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeSolution {
    pub problem: String,
    pub solution: String,
    pub similarity_score: f32,
    pub source: String,
}

/// Step-by-step answer for a smart-city problem.
#[derive(Debug, Serialize)]
pub struct SolutionReport {
    pub query: String,
    pub category: ProblemCategory,
    pub steps: Vec<String>,
    pub knowledge_solutions: Vec<KnowledgeSolution>,
    /// Mean similarity of the mined solutions, 0 when none.
    pub confidence_score: f32,
    pub num_sources: usize,
}

/// Solver outcome: off-topic queries are rejected before retrieval.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solution {
    OffTopic { message: String },
    Report(SolutionReport),
}

pub struct SmartCitySolver {
    engine: Arc<QueryEngine>,
}

impl SmartCitySolver {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    /// Answer a smart-city problem with retrieval-backed steps.
    pub async fn solve(&self, query: &str) -> Result<Solution, AssistantError> {
        if !is_smart_city_query(query) {
            return Ok(Solution::OffTopic {
                message: "This query doesn't appear to be related to smart city problems. \
                          Please ask about urban infrastructure, city management, or \
                          municipal services."
                    .to_string(),
            });
        }

        let category = ProblemCategory::classify(query);
        tracing::info!("solving {} problem: {}", category, query);

        let hits = self.engine.search(query, SOLVER_TOP_K).await?;

        if hits.is_empty() {
            return Ok(Solution::Report(SolutionReport {
                query: query.to_string(),
                category,
                steps: no_result_steps(),
                knowledge_solutions: Vec::new(),
                confidence_score: 0.0,
                num_sources: 0,
            }));
        }

        let mut knowledge_solutions = Vec::new();
        for hit in &hits {
            let (problem, solution) = extract_problem_solution(&hit.text);
            if solution.len() > MIN_SOLUTION_LEN {
                knowledge_solutions.push(KnowledgeSolution {
                    problem,
                    solution,
                    similarity_score: hit.score,
                    source: hit.source.clone(),
                });
            }
        }

        let solution_texts: Vec<String> = knowledge_solutions
            .iter()
            .map(|sol| sol.solution.clone())
            .collect();
        let steps = build_steps(category, &solution_texts);

        let confidence_score = if knowledge_solutions.is_empty() {
            0.0
        } else {
            knowledge_solutions
                .iter()
                .map(|sol| sol.similarity_score)
                .sum::<f32>()
                / knowledge_solutions.len() as f32
        };

        Ok(Solution::Report(SolutionReport {
            query: query.to_string(),
            category,
            steps,
            confidence_score,
            num_sources: hits.len(),
            knowledge_solutions,
        }))
    }
}

impl SolutionReport {
    /// Plain-text rendering for the CLI.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Problem category: {}\n", self.category));
        out.push_str(&format!("Confidence score: {:.3}\n", self.confidence_score));
        out.push_str(&format!(
            "Sources found: {} relevant documents\n",
            self.num_sources
        ));

        if !self.knowledge_solutions.is_empty() {
            out.push_str(&format!(
                "\nKnowledge base solutions ({}):\n",
                self.knowledge_solutions.len()
            ));
            for (i, sol) in self.knowledge_solutions.iter().take(3).enumerate() {
                let preview: String = sol.solution.chars().take(150).collect();
                out.push_str(&format!(
                    "  {}. {} (similarity: {:.3})\n",
                    i + 1,
                    preview,
                    sol.similarity_score
                ));
            }
        }

        out.push_str("\nStep-by-step solution:\n");
        for step in &self.steps {
            out.push_str(&format!("  {}\n", step));
        }
        out
    }
}
