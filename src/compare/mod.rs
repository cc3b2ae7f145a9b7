//! Village/city sustainability comparison.
//!
//! Retrieved chunks for two entities are mined for category keywords;
//! the feature sets drive a comparison report and a recommendation list
//! for whichever categories the first entity is missing.

mod categories;
mod comparator;
mod features;
mod recommend;

pub use categories::Category;
pub use comparator::{ComparisonReport, VillageComparator};
pub use features::extract_features;
pub use recommend::recommendations_for;
