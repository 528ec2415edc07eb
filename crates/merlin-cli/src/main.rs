use anyhow::Context;
use clap::{Parser, Subcommand};
use merlin_lib::{
    GraphColorizer, GraphExporter, GraphPipeline, MarkerClassifier, MarkerTable,
    RunConfiguration,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "merlin")]
#[command(version = "0.1.0")]
#[command(about = "merlin: haplotype-colored k-mer linkage graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, color and export a linkage graph from reads
    Build {
        /// Input FASTA/FASTQ file (optionally gzipped)
        #[arg(short, long)]
        sequence: PathBuf,

        /// Marker table (`KMER VALUE` per line) restricting which k-mers become nodes
        #[arg(long)]
        markers: Option<PathBuf>,

        /// Haplotype A marker table
        #[arg(short = 'a', long)]
        hap_a: Option<PathBuf>,

        /// Haplotype B marker table
        #[arg(short = 'b', long)]
        hap_b: Option<PathBuf>,

        /// Output prefix; writes <prefix>.gfa and <prefix>.csv
        #[arg(short, long, default_value = "merlin")]
        output: PathBuf,

        /// K-mer length (1 to 32)
        #[arg(short, default_value = "21")]
        k: usize,

        /// Smallest accepted marker value
        #[arg(long, default_value = "0")]
        min: u64,

        /// Largest accepted marker value
        #[arg(long, default_value_t = u64::MAX)]
        max: u64,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,

        /// Memory budget in GiB for in-flight reads
        #[arg(short = 'm', long, default_value = "8")]
        memory: usize,

        /// Gzip-compress outputs
        #[arg(short = 'z', long)]
        compress: bool,

        /// Per-read debug logging
        #[arg(short, long)]
        debug: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let debug = match &cli.command {
        Commands::Build { debug, .. } => *debug,
    };

    // Initialize tracing: use RUST_LOG if set, otherwise info (or debug)
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Build {
            sequence,
            markers,
            hap_a,
            hap_b,
            output,
            k,
            min,
            max,
            threads,
            memory,
            compress,
            debug,
        } => {
            let config = RunConfiguration {
                k,
                threads,
                max_memory_gib: memory,
                min_value: min,
                max_value: max,
                sequence_path: sequence,
                marker_path: markers,
                hap_a_path: hap_a,
                hap_b_path: hap_b,
                output_prefix: output,
                compress,
                debug,
            };
            build_command(&config)?;
        }
    }

    Ok(())
}

/// Load marker tables, build the graph, color it and write it out
fn build_command(config: &RunConfiguration) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;
    config.print();

    let markers = load_table(config.marker_path.as_ref(), config.k)?;
    let hap_a = load_table(config.hap_a_path.as_ref(), config.k)?;
    let hap_b = load_table(config.hap_b_path.as_ref(), config.k)?;
    if hap_a.is_none() && hap_b.is_none() {
        warn!("No haplotype marker tables given; every node will be colored unknown");
    }

    let start = Instant::now();
    let (mut store, _stats) =
        GraphPipeline::new(config, markers.as_ref().map(as_classifier))?.run()?;
    info!("Graph built in {:.2?}", start.elapsed());

    GraphColorizer::new(
        hap_a.as_ref().map(as_classifier),
        hap_b.as_ref().map(as_classifier),
        config.bounds(),
    )
    .colorize(&mut store);

    let paths = GraphExporter::new(config.k, config.compress)
        .export(&store, &config.output_prefix)?;
    info!("Wrote {} and {}", paths.gfa.display(), paths.csv.display());
    info!("Done in {:.2?}", start.elapsed());

    Ok(())
}

fn load_table(path: Option<&PathBuf>, k: usize) -> anyhow::Result<Option<MarkerTable>> {
    path.map(|p| MarkerTable::load(p, k)).transpose()
}

fn as_classifier(table: &MarkerTable) -> &dyn MarkerClassifier {
    table
}
