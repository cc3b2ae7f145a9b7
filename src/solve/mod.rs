//! Smart-city problem solver.
//!
//! Gates queries on a smart-city keyword list, classifies the problem
//! into a category, retrieves similar problem/solution chunks and
//! assembles numbered action steps from category templates interleaved
//! with knowledge-base solutions.

mod category;
mod extract;
mod solver;
mod steps;

pub use category::{is_smart_city_query, ProblemCategory};
pub use extract::extract_problem_solution;
pub use solver::{KnowledgeSolution, SmartCitySolver, Solution, SolutionReport};
pub use steps::{build_steps, no_result_steps};
