//! End-to-end pipeline tests: index a document folder, persist, reload
//! and verify that search results survive the round trip.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use cityassist::corpus::ChunkerConfig;
use cityassist::embedding::HashEmbedder;
use cityassist::index::{build_index, open_index, ChunkStore, Metric, SqliteChunkStore};
use cityassist::query::QueryEngine;

const DIM: usize = 64;

fn write_corpus(dir: &PathBuf) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("punsari.txt"),
        "Punsari village in Gujarat has implemented smart governance with digital \
         services and solar energy. The village runs solar street lighting and a \
         local Wi-Fi network for its citizens.",
    )
    .unwrap();
    fs::write(
        dir.join("mawlynnong.txt"),
        "Mawlynnong in Meghalaya is known as Asia's cleanest village with excellent \
         waste management. Community members collect and compost garbage daily.",
    )
    .unwrap();
    fs::write(
        dir.join("dharnai.txt"),
        "Dharnai village in Bihar became India's first solar-powered village with \
         renewable energy and battery storage for the grid.",
    )
    .unwrap();
}

async fn build(tmp: &tempfile::TempDir, metric: Metric) -> SqliteChunkStore {
    let docs = tmp.path().join("docs");
    write_corpus(&docs);

    let store = SqliteChunkStore::open(tmp.path().join("index.db"))
        .await
        .unwrap();
    let embedder = HashEmbedder::new(DIM);
    build_index(&docs, &store, &embedder, &ChunkerConfig::default(), metric)
        .await
        .unwrap();
    store
}

async fn engine_from(store: &SqliteChunkStore) -> QueryEngine {
    let (index, chunks) = open_index(store).await.unwrap();
    QueryEngine::new(index, chunks, Arc::new(HashEmbedder::new(DIM))).unwrap()
}

#[tokio::test]
async fn counts_stay_aligned_after_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let store = build(&tmp, Metric::InnerProduct).await;

    let (index, chunks) = open_index(&store).await.unwrap();
    assert_eq!(index.len(), chunks.len());
    assert_eq!(store.count().await.unwrap(), chunks.len());
    assert_eq!(chunks.len(), 3);
}

#[tokio::test]
async fn search_results_survive_a_store_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let store = build(&tmp, Metric::InnerProduct).await;

    // First pass: query against the freshly built index.
    let engine = engine_from(&store).await;
    let first: Vec<_> = engine
        .search("solar energy village", 3)
        .await
        .unwrap()
        .into_iter()
        .map(|hit| (hit.source, hit.distance))
        .collect();
    assert!(!first.is_empty());
    drop(engine);
    drop(store);

    // Second pass: a brand new store handle over the same file.
    let store = SqliteChunkStore::open(tmp.path().join("index.db"))
        .await
        .unwrap();
    let engine = engine_from(&store).await;
    let second: Vec<_> = engine
        .search("solar energy village", 3)
        .await
        .unwrap()
        .into_iter()
        .map(|hit| (hit.source, hit.distance))
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn fixed_queries_rank_the_expected_villages_first() {
    let tmp = tempfile::tempdir().unwrap();
    let store = build(&tmp, Metric::InnerProduct).await;
    let engine = engine_from(&store).await;

    let hits = engine.search("waste compost garbage", 1).await.unwrap();
    assert_eq!(hits[0].source, "mawlynnong.txt");

    let hits = engine.search("smart governance digital services", 1).await.unwrap();
    assert_eq!(hits[0].source, "punsari.txt");
}

#[tokio::test]
async fn l2_round_trip_matches_too() {
    let tmp = tempfile::tempdir().unwrap();
    let store = build(&tmp, Metric::L2).await;
    let engine = engine_from(&store).await;

    let before: Vec<_> = engine
        .search("renewable battery grid", 2)
        .await
        .unwrap()
        .into_iter()
        .map(|hit| hit.source)
        .collect();

    let reopened = SqliteChunkStore::open(tmp.path().join("index.db"))
        .await
        .unwrap();
    let engine = engine_from(&reopened).await;
    let after: Vec<_> = engine
        .search("renewable battery grid", 2)
        .await
        .unwrap()
        .into_iter()
        .map(|hit| hit.source)
        .collect();

    assert_eq!(before, after);
    assert_eq!(before[0], "dharnai.txt");
}

#[tokio::test]
async fn entity_retrieval_works_over_a_persisted_index() {
    let tmp = tempfile::tempdir().unwrap();
    let store = build(&tmp, Metric::InnerProduct).await;
    let engine = engine_from(&store).await;

    let hits = engine.retrieve_entity("Dharnai", 8).await.unwrap();
    assert!(!hits.is_empty());
    assert!(hits
        .iter()
        .all(|hit| hit.text.contains("Dharnai") || hit.source.contains("dharnai")));
}
