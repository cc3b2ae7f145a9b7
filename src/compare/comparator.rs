use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::categories::Category;
use super::features::{extract_features, feature_count};
use super::recommend::{
    gap_categories, general_recommendations, implementation_strategy, recommendations_for,
};
use crate::core::errors::AssistantError;
use crate::generate::TextGenerator;
use crate::query::QueryEngine;

/// Chunks fetched per village before lexical filtering.
const ENTITY_TOP_K: usize = 8;
/// Chunks quoted in the generation prompt.
const PROMPT_CHUNKS: usize = 3;

/// Result of comparing two villages.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub village_a: String,
    pub village_b: String,
    pub features_a: BTreeMap<Category, Vec<String>>,
    pub features_b: BTreeMap<Category, Vec<String>>,
    pub feature_count_a: usize,
    pub feature_count_b: usize,
    pub more_sustainable: String,
    /// Generated or template-assembled comparison prose.
    pub narrative: String,
    /// Recommendation lines for `village_a`.
    pub recommendations: Vec<String>,
}

pub struct VillageComparator {
    engine: Arc<QueryEngine>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl VillageComparator {
    pub fn new(engine: Arc<QueryEngine>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { engine, generator }
    }

    /// Compare two villages from their retrieved chunks.
    pub async fn compare(
        &self,
        village_a: &str,
        village_b: &str,
    ) -> Result<ComparisonReport, AssistantError> {
        let chunks_a = self.village_chunks(village_a).await?;
        let chunks_b = self.village_chunks(village_b).await?;

        let features_a = extract_features(&chunks_a);
        let features_b = extract_features(&chunks_b);
        let count_a = feature_count(&features_a);
        let count_b = feature_count(&features_b);

        let more_sustainable = if count_a > count_b {
            village_a.to_string()
        } else {
            village_b.to_string()
        };

        let narrative = self
            .narrative(village_a, village_b, &chunks_a, &chunks_b)
            .await;
        let recommendations = build_recommendations(&features_a, &features_b);

        Ok(ComparisonReport {
            village_a: village_a.to_string(),
            village_b: village_b.to_string(),
            features_a,
            features_b,
            feature_count_a: count_a,
            feature_count_b: count_b,
            more_sustainable,
            narrative,
            recommendations,
        })
    }

    async fn village_chunks(&self, village: &str) -> Result<Vec<String>, AssistantError> {
        let hits = self.engine.retrieve_entity(village, ENTITY_TOP_K).await?;
        if hits.is_empty() {
            return Err(AssistantError::NotFound(format!(
                "no data found for {}; check the spelling or index more documents",
                village
            )));
        }
        Ok(hits.into_iter().map(|hit| hit.text).collect())
    }

    async fn narrative(
        &self,
        village_a: &str,
        village_b: &str,
        chunks_a: &[String],
        chunks_b: &[String],
    ) -> String {
        if let Some(generator) = &self.generator {
            let prompt = comparison_prompt(village_a, village_b, chunks_a, chunks_b);
            match generator.generate(&prompt).await {
                Ok(text) => return text,
                Err(err) => {
                    tracing::warn!("generation failed, using template narrative: {}", err);
                }
            }
        }
        fallback_narrative(village_a, village_b, chunks_a.len(), chunks_b.len())
    }
}

impl ComparisonReport {
    /// Plain-text report in the layout of the original assistant.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "SUSTAINABILITY COMPARISON: {} vs {}\n\n",
            self.village_a.to_uppercase(),
            self.village_b.to_uppercase()
        ));
        out.push_str("SUSTAINABILITY OVERVIEW:\n");
        out.push_str(&format!(
            "- {}: {} sustainability features identified\n",
            self.village_a, self.feature_count_a
        ));
        out.push_str(&format!(
            "- {}: {} sustainability features identified\n",
            self.village_b, self.feature_count_b
        ));
        out.push_str(&format!("- More sustainable: {}\n\n", self.more_sustainable));

        out.push_str(&self.narrative);
        out.push_str(&format!(
            "\n\nKEY SUSTAINABILITY RECOMMENDATIONS FOR {}:\n\n",
            self.village_a.to_uppercase()
        ));
        for line in &self.recommendations {
            out.push_str(line);
            out.push('\n');
        }

        out
    }
}

fn comparison_prompt(
    village_a: &str,
    village_b: &str,
    chunks_a: &[String],
    chunks_b: &[String],
) -> String {
    format!(
        "Compare the sustainability features of {a} and {b}.\n\n\
         {a} information:\n{info_a}\n\n\
         {b} information:\n{info_b}\n\n\
         Focus on sustainability aspects like:\n\
         - Energy systems and renewable sources\n\
         - Water management and conservation\n\
         - Waste management and sanitation\n\
         - Transportation and connectivity\n\
         - Environmental conservation\n\
         - Economic sustainability\n\n\
         Provide a structured comparison highlighting:\n\
         1. What {a} has that {b} lacks\n\
         2. What {b} has that {a} lacks\n\
         3. Sustainability recommendations for {a}\n\n\
         Answer:",
        a = village_a,
        b = village_b,
        info_a = chunks_a[..chunks_a.len().min(PROMPT_CHUNKS)].join(" "),
        info_b = chunks_b[..chunks_b.len().min(PROMPT_CHUNKS)].join(" "),
    )
}

fn fallback_narrative(village_a: &str, village_b: &str, n_chunks_a: usize, n_chunks_b: usize) -> String {
    format!(
        "Data available for {a}: {na} information chunks\n\
         Data available for {b}: {nb} information chunks\n\n\
         Available information suggests differences in:\n\
         - Infrastructure development\n\
         - Resource availability\n\
         - Sustainability initiatives\n\
         - Community programs",
        a = village_a,
        b = village_b,
        na = n_chunks_a,
        nb = n_chunks_b,
    )
}

fn build_recommendations(
    features_a: &BTreeMap<Category, Vec<String>>,
    features_b: &BTreeMap<Category, Vec<String>>,
) -> Vec<String> {
    let gaps = gap_categories(features_a, features_b);

    let mut lines: Vec<String> = Vec::new();
    for category in &gaps {
        lines.extend(
            recommendations_for(*category)
                .into_iter()
                .map(str::to_string),
        );
    }
    if lines.is_empty() {
        lines.extend(general_recommendations().into_iter().map(str::to_string));
    }

    lines.push(String::new());
    lines.extend(implementation_strategy().into_iter().map(str::to_string));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{chunk_documents, ChunkerConfig, Document};
    use crate::embedding::{EmbeddingProvider, HashEmbedder};
    use crate::index::{FlatIndex, Metric, StoredChunk};

    async fn engine(docs: &[(&str, &str)]) -> Arc<QueryEngine> {
        let documents: Vec<Document> = docs
            .iter()
            .map(|(name, text)| Document {
                filename: name.to_string(),
                text: text.to_string(),
            })
            .collect();
        let chunks = chunk_documents(&documents, &ChunkerConfig::default()).unwrap();

        let embedder = Arc::new(HashEmbedder::new(64));
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed(&texts).await.unwrap();

        let mut index = FlatIndex::new(64, Metric::InnerProduct);
        index.add_batch(vectors).unwrap();

        let stored = chunks
            .iter()
            .map(|c| StoredChunk {
                chunk_id: format!("{}:{}", c.source, c.chunk_index),
                text: c.text.clone(),
                source: c.source.clone(),
                chunk_index: c.chunk_index,
                total_chunks: c.total_chunks,
            })
            .collect();

        Arc::new(QueryEngine::new(index, stored, embedder).unwrap())
    }

    #[tokio::test]
    async fn comparison_identifies_the_stronger_village() {
        let engine = engine(&[
            (
                "punsari.txt",
                "Punsari has solar energy, clean water wells, waste recycling, \
                 a school with digital learning and a health clinic nearby.",
            ),
            ("plainville.txt", "Plainville is a settlement with open fields nearby."),
        ])
        .await;

        let comparator = VillageComparator::new(engine, None);
        let report = comparator.compare("Plainville", "Punsari").await.unwrap();

        assert_eq!(report.more_sustainable, "Punsari");
        assert!(report.feature_count_b > report.feature_count_a);
        // Gaps in Plainville should produce targeted recommendations.
        assert!(report
            .recommendations
            .iter()
            .any(|line| line.contains("TECHNOLOG") || line.contains("INFRASTRUCTURE")));

        let rendered = report.render();
        assert!(rendered.contains("SUSTAINABILITY COMPARISON"));
        assert!(rendered.contains("PLAINVILLE"));
    }

    #[tokio::test]
    async fn unknown_village_is_not_found() {
        let engine = engine(&[("punsari.txt", "Punsari has solar energy and wells.")]).await;
        let comparator = VillageComparator::new(engine, None);

        let result = comparator.compare("Atlantis", "Punsari").await;
        assert!(matches!(result, Err(AssistantError::NotFound(_))));
    }

    #[tokio::test]
    async fn template_narrative_is_used_without_a_generator() {
        let engine = engine(&[
            ("a.txt", "Alphaville runs entirely on solar power systems."),
            ("b.txt", "Betaville has rainwater harvesting and drip irrigation."),
        ])
        .await;
        let comparator = VillageComparator::new(engine, None);

        let report = comparator.compare("Alphaville", "Betaville").await.unwrap();
        assert!(report.narrative.contains("information chunks"));
    }
}
