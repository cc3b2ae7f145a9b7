use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::errors::AssistantError;

/// Distance function for the flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Squared Euclidean distance; smaller is closer.
    L2,
    /// Inner product; larger is closer. Equals cosine similarity when
    /// the stored and query vectors are normalised.
    InnerProduct,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::L2 => "l2",
            Metric::InnerProduct => "inner_product",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AssistantError> {
        match raw {
            "l2" => Ok(Metric::L2),
            "inner_product" => Ok(Metric::InnerProduct),
            other => Err(AssistantError::BadRequest(format!(
                "unknown metric: {}",
                other
            ))),
        }
    }
}

/// L2-normalise a vector in place. Zero vectors are left untouched.
pub fn normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}

/// Brute-force similarity index over in-memory vectors.
pub struct FlatIndex {
    dimension: usize,
    metric: Metric,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: Metric) -> Self {
        Self {
            dimension,
            metric,
            vectors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Append vectors to the index. Inner-product indexes normalise on
    /// insert, so scores come out as cosine similarities.
    pub fn add_batch(&mut self, vectors: Vec<Vec<f32>>) -> Result<(), AssistantError> {
        for mut vec in vectors {
            if vec.len() != self.dimension {
                return Err(AssistantError::BadRequest(format!(
                    "vector dimension mismatch: got {}, expected {}",
                    vec.len(),
                    self.dimension
                )));
            }
            if self.metric == Metric::InnerProduct {
                normalize(&mut vec);
            }
            self.vectors.push(vec);
        }
        Ok(())
    }

    /// Return the `k` nearest stored vectors as `(position, distance)`
    /// pairs, best match first. For L2 the second element is a distance
    /// (ascending); for inner product it is a similarity (descending).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, AssistantError> {
        if query.len() != self.dimension {
            return Err(AssistantError::BadRequest(format!(
                "query dimension mismatch: got {}, expected {}",
                query.len(),
                self.dimension
            )));
        }
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let query = match self.metric {
            Metric::InnerProduct => {
                let mut q = query.to_vec();
                normalize(&mut q);
                q
            }
            Metric::L2 => query.to_vec(),
        };

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, stored)| (idx, self.pairwise(&query, stored)))
            .collect();

        match self.metric {
            Metric::L2 => {
                scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
            }
            Metric::InnerProduct => {
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            }
        }

        scored.truncate(k);
        Ok(scored)
    }

    fn pairwise(&self, query: &[f32], stored: &[f32]) -> f32 {
        match self.metric {
            Metric::L2 => query
                .iter()
                .zip(stored)
                .map(|(x, y)| (x - y) * (x - y))
                .sum(),
            Metric::InnerProduct => query.iter().zip(stored).map(|(x, y)| x * y).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_search_returns_closest_first() {
        let mut index = FlatIndex::new(2, Metric::L2);
        index
            .add_batch(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.1, 0.0]])
            .unwrap();

        let hits = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 2);
        assert!(hits[0].1 <= hits[1].1);
    }

    #[test]
    fn inner_product_search_is_cosine_over_normalised_vectors() {
        let mut index = FlatIndex::new(2, Metric::InnerProduct);
        // Same direction at a different magnitude should score 1.0.
        index
            .add_batch(vec![vec![2.0, 0.0], vec![0.0, 5.0]])
            .unwrap();

        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].0, 0);
        assert!((hits[0].1 - 1.0).abs() < 1e-5);
        assert!(hits[1].1.abs() < 1e-5);
    }

    #[test]
    fn k_larger_than_index_is_clamped() {
        let mut index = FlatIndex::new(1, Metric::L2);
        index.add_batch(vec![vec![1.0]]).unwrap();
        assert_eq!(index.search(&[0.0], 10).unwrap().len(), 1);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut index = FlatIndex::new(3, Metric::L2);
        assert!(index.add_batch(vec![vec![1.0, 2.0]]).is_err());
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = FlatIndex::new(2, Metric::L2);
        assert!(index.search(&[0.0, 0.0], 5).unwrap().is_empty());
    }
}
