use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use cityassist::compare::VillageComparator;
use cityassist::core::config::{AppConfig, AppPaths};
use cityassist::core::{logging, AssistantError};
use cityassist::corpus::ChunkerConfig;
use cityassist::embedding::{EmbeddingProvider, HashEmbedder, OpenAiCompatEmbedder};
use cityassist::generate::{OpenAiCompatGenerator, TextGenerator};
use cityassist::index::{build_index, open_index, ChunkStore, Metric, SqliteChunkStore};
use cityassist::query::QueryEngine;
use cityassist::solve::{SmartCitySolver, Solution};

#[derive(Parser, Debug)]
#[command(name = "cityassist", version, about = "Sustainable smart city assistant: retrieval core")]
struct Args {
    /// Data directory (indexes, logs). Defaults to CITYASSIST_DATA_DIR
    /// or the current directory in debug builds.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Corpus {
    /// Village descriptions; cosine similarity index.
    Villages,
    /// Problem/solution reports; L2 index.
    Problems,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a folder of .txt documents
    Index {
        /// Folder containing the documents
        #[arg(short, long)]
        docs: PathBuf,
        /// Which corpus this folder feeds
        #[arg(short, long, value_enum)]
        corpus: Corpus,
    },
    /// Search a corpus with a free-text query
    Query {
        #[arg(short, long)]
        query: String,
        #[arg(short, long, value_enum, default_value = "problems")]
        corpus: Corpus,
        /// Number of results
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Compare the sustainability of two villages
    Compare {
        village_a: String,
        village_b: String,
    },
    /// Get step-by-step guidance for a smart-city problem
    Solve {
        problem: String,
    },
    /// Build a small demo village index with sample data
    SeedDemo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let paths = match &args.data_dir {
        Some(dir) => AppPaths::with_data_dir(dir.clone()),
        None => AppPaths::new(),
    };
    std::fs::create_dir_all(&paths.data_dir)
        .with_context(|| format!("cannot create {}", paths.data_dir.display()))?;
    logging::init(&paths);

    let config = AppConfig::load(&paths).context("loading configuration")?;

    match args.command {
        Commands::Index { docs, corpus } => {
            let store = open_store(&paths, corpus).await?;
            let embedder = embedder(&config)?;
            let chunker = ChunkerConfig {
                chunk_size: config.chunk_size,
                overlap: config.chunk_overlap,
            };
            let n = build_index(&docs, &store, embedder.as_ref(), &chunker, metric(corpus)).await?;
            println!("indexed {} chunks from {}", n, docs.display());
        }

        Commands::Query { query, corpus, k } => {
            let engine = engine(&paths, &config, corpus).await?;
            let hits = engine.search(&query, k.unwrap_or(config.top_k)).await?;

            if hits.is_empty() {
                println!("no results");
            }
            for hit in hits {
                let preview: String = hit.text.chars().take(200).collect();
                println!(
                    "{}. {} (score {:.4}, chunk {})",
                    hit.rank, hit.source, hit.score, hit.chunk_index
                );
                println!("   {}\n", preview);
            }
        }

        Commands::Compare {
            village_a,
            village_b,
        } => {
            let engine = engine(&paths, &config, Corpus::Villages).await?;
            let comparator = VillageComparator::new(engine, generator(&config)?);
            let report = comparator.compare(&village_a, &village_b).await?;
            println!("{}", report.render());
        }

        Commands::Solve { problem } => {
            let engine = engine(&paths, &config, Corpus::Problems).await?;
            let solver = SmartCitySolver::new(engine);
            match solver.solve(&problem).await? {
                Solution::OffTopic { message } => println!("{}", message),
                Solution::Report(report) => println!("{}", report.render()),
            }
        }

        Commands::SeedDemo => {
            let docs_dir = seed_demo_corpus(&paths)?;
            let store = open_store(&paths, Corpus::Villages).await?;
            let embedder = embedder(&config)?;
            let chunker = ChunkerConfig {
                chunk_size: config.chunk_size,
                overlap: config.chunk_overlap,
            };
            let n = build_index(
                &docs_dir,
                &store,
                embedder.as_ref(),
                &chunker,
                Metric::InnerProduct,
            )
            .await?;
            println!("demo village index ready ({} chunks)", n);
        }
    }

    Ok(())
}

fn metric(corpus: Corpus) -> Metric {
    match corpus {
        Corpus::Villages => Metric::InnerProduct,
        Corpus::Problems => Metric::L2,
    }
}

async fn open_store(paths: &AppPaths, corpus: Corpus) -> Result<SqliteChunkStore, AssistantError> {
    let db_path = match corpus {
        Corpus::Villages => paths.village_db_path.clone(),
        Corpus::Problems => paths.problems_db_path.clone(),
    };
    SqliteChunkStore::open(db_path).await
}

fn embedder(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>, AssistantError> {
    if config.endpoint_base_url.is_empty() {
        tracing::info!("no endpoint configured, using the offline hash embedder");
        return Ok(Arc::new(HashEmbedder::new(config.embedding_dimension)));
    }

    let embedder = OpenAiCompatEmbedder::new(
        config.endpoint_base_url.clone(),
        config.embedding_model.clone(),
        config.embedding_dimension,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    Ok(Arc::new(embedder))
}

fn generator(config: &AppConfig) -> Result<Option<Arc<dyn TextGenerator>>, AssistantError> {
    if config.endpoint_base_url.is_empty() {
        return Ok(None);
    }
    let generator = OpenAiCompatGenerator::new(
        config.endpoint_base_url.clone(),
        config.generation_model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    Ok(Some(Arc::new(generator)))
}

async fn engine(
    paths: &AppPaths,
    config: &AppConfig,
    corpus: Corpus,
) -> Result<Arc<QueryEngine>, AssistantError> {
    let store = open_store(paths, corpus).await?;
    let (index, chunks) = open_index(&store).await?;

    // The engine must embed queries with the same provider the index
    // was built with; the stored metadata is the source of truth.
    let meta = store.meta().await?.ok_or_else(|| {
        AssistantError::NotFound("index metadata missing; rebuild the index".to_string())
    })?;
    let embedder: Arc<dyn EmbeddingProvider> = if meta.embedding_model == "hash" {
        Arc::new(HashEmbedder::new(meta.dimension))
    } else {
        embedder(config)?
    };

    Ok(Arc::new(QueryEngine::new(index, chunks, embedder)?))
}

/// Sample village corpus, useful for trying the comparator without
/// real data files.
fn seed_demo_corpus(paths: &AppPaths) -> Result<PathBuf, AssistantError> {
    const SAMPLES: &[(&str, &str)] = &[
        (
            "hiware_bazar.txt",
            "Hiware Bazar is a model village in Maharashtra known for water \
             conservation and renewable energy initiatives.",
        ),
        (
            "punsari.txt",
            "Punsari village in Gujarat has implemented smart governance with \
             digital services and solar energy.",
        ),
        (
            "mawlynnong.txt",
            "Mawlynnong in Meghalaya is known as Asia's cleanest village with \
             excellent waste management.",
        ),
        (
            "pothanikkad.txt",
            "Pothanikkad in Kerala has achieved 100% organic farming and \
             sustainable agriculture practices.",
        ),
        (
            "ralegan_siddhi.txt",
            "Ralegan Siddhi in Maharashtra is famous for watershed management \
             and water harvesting.",
        ),
        (
            "dharnai.txt",
            "Dharnai village in Bihar became India's first solar-powered \
             village with renewable energy.",
        ),
        (
            "shani_shingnapur.txt",
            "Shani Shingnapur in Maharashtra has digital banking and cashless \
             transactions.",
        ),
        (
            "kokrebellur.txt",
            "Kokrebellur in Karnataka is known for bird conservation and \
             eco-tourism.",
        ),
    ];

    let dir = paths.data_dir.join("demo_villages");
    std::fs::create_dir_all(&dir).map_err(AssistantError::internal)?;
    for (name, text) in SAMPLES {
        std::fs::write(dir.join(name), text).map_err(AssistantError::internal)?;
    }
    Ok(dir)
}
