use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch::{IndexBuilder, SearchConfig, SearchIndex, SearchRequest, Searcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "docsearch", version = docsearch::VERSION)]
#[command(about = "Static documentation search index", long_about = None)]
struct Args {
    /// JSON search configuration (tokenizer and scoring settings)
    #[arg(long, global = true, env = "DOCSEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search an index and print ranked documents
    Query {
        /// Index file (.json, .js or snapshot)
        #[arg(env = "DOCSEARCH_INDEX")]
        index: PathBuf,

        /// Query words
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(long, env = "DOCSEARCH_LIMIT")]
        limit: Option<usize>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Index every .rst, .md and .txt file under a directory
    Build {
        /// Source directory
        dir: PathBuf,

        /// Output file (.json or snapshot)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert a generated searchindex.js
    ImportSphinx {
        /// Path to searchindex.js
        input: PathBuf,

        /// Output file (.json or snapshot)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print document and term counts
    Stats {
        /// Index file (.json, .js or snapshot)
        #[arg(env = "DOCSEARCH_INDEX")]
        index: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SearchConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SearchConfig::default(),
    };

    match args.command {
        Command::Query {
            index,
            query,
            limit,
            json,
        } => {
            let index = SearchIndex::open(&index)?;
            let searcher = Searcher::new(Arc::new(index), config)?;

            let mut request = SearchRequest::new(query.join(" "));
            if let Some(limit) = limit {
                request = request.with_limit(limit);
            }
            let response = searcher.execute(&request);

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                for hit in &response.results {
                    println!("{:>8.3}  {:<40} {}", hit.score, hit.title, hit.path);
                }
                info!(
                    "{} of {} hits in {}ms",
                    response.results.len(),
                    response.total_hits,
                    response.took_ms
                );
            }
        }

        Command::Build { dir, output } => {
            let mut builder = IndexBuilder::new(&config.tokenizer);
            let added = builder
                .add_dir(&dir)
                .with_context(|| format!("failed to read {}", dir.display()))?;
            let index = builder.build()?;
            index.save(&output)?;
            info!("Indexed {} documents into {}", added, output.display());
        }

        Command::ImportSphinx { input, output } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let index = docsearch::sphinx::import_str(&text)?;
            index.save(&output)?;
            info!(
                "Imported {} documents into {}",
                index.documents().len(),
                output.display()
            );
        }

        Command::Stats { index } => {
            let stats = SearchIndex::open(&index)?.stats();
            println!("documents:   {}", stats.documents);
            println!("terms:       {}", stats.terms);
            println!("title terms: {}", stats.title_terms);
            println!("postings:    {}", stats.postings);
        }
    }

    Ok(())
}
