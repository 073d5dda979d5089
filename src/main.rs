use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cinegraph::corpus::append_ratings;
use cinegraph::embed::HashedBowModel;
use cinegraph::pipeline::metrics_table;
use cinegraph::similarity::sample_matrix;
use cinegraph::{
    Approach, Decade, MovieTable, PartitionBuildPipeline, PartitionStore, PipelineConfig,
};

#[derive(Parser, Debug)]
#[command(name = "cinegraph", about = "Decade movie similarity graph pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build partitions from a cleaned movie table and persist them.
    Build {
        /// Path to the cleaned movie table (JSONL, one movie per line)
        #[arg(long)]
        table: PathBuf,
        /// Directory with IMDb titles.tsv and ratings.tsv for the join
        #[arg(long)]
        imdb_dir: Option<PathBuf>,
        /// Root directory of the partition store
        #[arg(long)]
        store: PathBuf,
        /// Decade start year; all decades when omitted
        #[arg(long)]
        decade: Option<u16>,
        /// Embedding approach
        #[arg(long, value_enum, default_value_t = Approach::Plots)]
        approach: Approach,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Vector width of the built-in hashed bag-of-words model
        #[arg(long, default_value_t = HashedBowModel::DEFAULT_DIMS)]
        dims: usize,
    },

    /// Print the metrics-joined movie table for a built partition.
    Report {
        /// Root directory of the partition store
        #[arg(long)]
        store: PathBuf,
        /// Path to the cleaned movie table (JSONL)
        #[arg(long)]
        table: PathBuf,
        /// Decade start year
        #[arg(long)]
        decade: u16,
        /// Embedding approach
        #[arg(long, value_enum, default_value_t = Approach::Plots)]
        approach: Approach,
    },

    /// Print a sampled similarity matrix table for a built partition.
    Matrix {
        /// Root directory of the partition store
        #[arg(long)]
        store: PathBuf,
        /// Path to the cleaned movie table (JSONL)
        #[arg(long)]
        table: PathBuf,
        /// Decade start year
        #[arg(long)]
        decade: u16,
        /// Embedding approach
        #[arg(long, value_enum, default_value_t = Approach::Plots)]
        approach: Approach,
        /// Number of movies to sample; defaults to the partition's config
        #[arg(long)]
        movies: Option<usize>,
        /// Sampling seed; defaults to the partition's config
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            table,
            imdb_dir,
            store,
            decade,
            approach,
            config,
            dims,
        } => {
            cmd_build(table, imdb_dir, store, decade, approach, config, dims)?;
        }
        Commands::Report {
            store,
            table,
            decade,
            approach,
        } => {
            cmd_report(store, table, decade, approach)?;
        }
        Commands::Matrix {
            store,
            table,
            decade,
            approach,
            movies,
            seed,
        } => {
            cmd_matrix(store, table, decade, approach, movies, seed)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_build(
    table_path: PathBuf,
    imdb_dir: Option<PathBuf>,
    store_path: PathBuf,
    decade: Option<u16>,
    approach: Approach,
    config_path: Option<PathBuf>,
    dims: usize,
) -> anyhow::Result<()> {
    // 1) Load config
    let config: PipelineConfig = if let Some(path) = config_path {
        let s = std::fs::read_to_string(path)?;
        serde_json::from_str(&s)?
    } else {
        PipelineConfig::default()
    };
    println!("Using config: {config:?}");

    // 2) Load the cleaned table
    println!("Loading movie table from {}...", table_path.display());
    let mut table = MovieTable::from_jsonl(&table_path)?;
    println!("Loaded {} movies.", table.len());

    // 3) Attach IMDb ratings when the join inputs are available
    if let Some(dir) = imdb_dir {
        println!("Joining IMDb ratings from {}...", dir.display());
        let matched = append_ratings(&mut table, &dir)?;
        println!("Matched {matched} ratings.");
    }

    // 4) Build and persist each requested partition
    let model = HashedBowModel::new(dims)?;
    let pipeline = PartitionBuildPipeline::new(config.clone(), &model);
    let store = PartitionStore::new(&store_path);

    let decades: Vec<Decade> = match decade {
        Some(year) => vec![Decade::from_start_year(year)?],
        None => Decade::all().collect(),
    };

    for decade in decades {
        let in_scope = table.for_decade(decade).rated();
        if in_scope.is_empty() {
            println!("{decade}: no rated movies, skipping.");
            continue;
        }

        let artifacts = pipeline.build(&table, decade, approach)?;
        store.save(&artifacts, &config)?;
        println!(
            "{decade}: {} embeddings, {} pairs, {} nodes, {} edges.",
            artifacts.embeddings.len(),
            artifacts.similarities.len(),
            artifacts.graph.node_count(),
            artifacts.graph.edge_count()
        );
    }

    println!("Done.");
    Ok(())
}

fn cmd_report(
    store_path: PathBuf,
    table_path: PathBuf,
    decade: u16,
    approach: Approach,
) -> anyhow::Result<()> {
    let decade = Decade::from_start_year(decade)?;
    let store = PartitionStore::new(&store_path);
    let (_, artifacts) = store.load(decade, approach)?;
    let table = MovieTable::from_jsonl(&table_path)?;

    let rows = metrics_table(&artifacts.graph, &table)?;
    for row in rows {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

fn cmd_matrix(
    store_path: PathBuf,
    table_path: PathBuf,
    decade: u16,
    approach: Approach,
    movies: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let decade = Decade::from_start_year(decade)?;
    let store = PartitionStore::new(&store_path);
    let (metadata, artifacts) = store.load(decade, approach)?;
    let table = MovieTable::from_jsonl(&table_path)?;

    let movies = movies.unwrap_or(metadata.config.matrix_sample_size);
    let seed = seed.unwrap_or(metadata.config.matrix_seed);
    let cells = sample_matrix(&artifacts.similarities, &table, movies, seed)?;
    for cell in cells {
        println!("{}", serde_json::to_string(&cell)?);
    }
    Ok(())
}
