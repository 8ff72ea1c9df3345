use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use context_doc_chunker::{Chunk, ChunkOrdering, Chunker, ChunkingStats, Document};
use loader::DocumentLoader;
use settings::Overrides;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod loader;
mod settings;

#[derive(Parser)]
#[command(name = "doc-chunker")]
#[command(about = "Split Markdown documentation into overlapping, fence-aware chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML config file with a [chunker] table
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk documents and print chunk records as JSON
    Chunk(ChunkArgs),

    /// Print chunking statistics per document and in total
    Stats(StatsArgs),
}

#[derive(Args)]
struct ChunkArgs {
    /// Files or directories to chunk
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[command(flatten)]
    flags: ChunkFlags,

    /// Print one pretty JSON array instead of JSON Lines
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Files or directories to chunk
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[command(flatten)]
    flags: ChunkFlags,
}

#[derive(Args)]
struct ChunkFlags {
    /// Maximum chunk length in characters
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters
    #[arg(long)]
    chunk_overlap: Option<usize>,

    /// Emission order of text and code chunks
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Text chunks first, then code chunks
    TextFirst,
    /// Interleaved in document order
    Document,
}

impl OrderArg {
    const fn as_domain(self) -> ChunkOrdering {
        match self {
            Self::TextFirst => ChunkOrdering::TextFirst,
            Self::Document => ChunkOrdering::Document,
        }
    }
}

impl ChunkFlags {
    fn overrides(&self) -> Overrides {
        Overrides {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            ordering: self.order.map(OrderArg::as_domain),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Chunk(args) => run_chunk(&args, cli.config)?,
        Commands::Stats(args) => run_stats(&args, cli.config)?,
    }

    Ok(())
}

fn build_chunker(flags: &ChunkFlags, config_path: Option<PathBuf>) -> Result<Chunker> {
    let config = settings::resolve(config_path.as_deref(), flags.overrides())?;
    Ok(Chunker::new(config))
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        let loaded = DocumentLoader::new(path)
            .load()
            .with_context(|| format!("Failed to load documents from {}", path.display()))?;
        documents.extend(loaded);
    }
    Ok(documents)
}

fn run_chunk(args: &ChunkArgs, config_path: Option<PathBuf>) -> Result<()> {
    let chunker = build_chunker(&args.flags, config_path)?;
    let documents = load_all(&args.paths)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.pretty {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| chunker.chunk_document(doc))
            .collect();
        serde_json::to_writer_pretty(&mut out, &chunks)?;
        writeln!(out)?;
    } else {
        for doc in &documents {
            for chunk in chunker.chunk_document(doc) {
                serde_json::to_writer(&mut out, &chunk)?;
                writeln!(out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn run_stats(args: &StatsArgs, config_path: Option<PathBuf>) -> Result<()> {
    let chunker = build_chunker(&args.flags, config_path)?;
    let documents = load_all(&args.paths)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total = ChunkingStats::default();

    for doc in &documents {
        let stats = Chunker::get_stats(&chunker.chunk_document(doc));
        writeln!(out, "{}: {stats}", doc.id)?;
        total.merge(&stats);
    }
    writeln!(out, "Total ({} documents): {total}", documents.len())?;

    out.flush()?;
    Ok(())
}
