mod summary;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use perfbudget_core::categorize::{
    Categorizer, FileTagCategorizer, FunctionListCategorizer, StaticCategorizer,
};
use perfbudget_core::{Analysis, Compiler, EngineConfig, StatMode, build_corpus};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Attribute compiler runtime to functions and categories from `perf report`
/// output collected over many input instances.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every statistics view as JSON
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Directory receiving `<view>.json` files
        #[arg(short, long, default_value = "stats")]
        out: PathBuf,

        /// Only write the named views (e.g. `aggregate_stats`)
        #[arg(long = "only", value_name = "VIEW")]
        only: Vec<StatMode>,
    },
    /// Print the heaviest functions and categories of each scope
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Rows per table
        #[arg(short = 'n', long, default_value_t = 20)]
        top: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CompilerArg {
    C2d,
    MiniC2d,
}

impl From<CompilerArg> for Compiler {
    fn from(arg: CompilerArg) -> Self {
        match arg {
            CompilerArg::C2d => Compiler::C2d,
            CompilerArg::MiniC2d => Compiler::MiniC2d,
        }
    }
}

#[derive(Args)]
struct InputArgs {
    /// Directory of `perf report` outputs, one per instance
    #[arg(long, default_value = "perf-report")]
    reports: PathBuf,

    /// Directory of execution logs, one per instance
    #[arg(long, default_value = "stdout/valid")]
    logs: PathBuf,

    /// JSON engine configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compiler preset selecting the retained module
    #[arg(long, value_enum)]
    compiler: Option<CompilerArg>,

    /// Retain samples from this module (overrides --compiler)
    #[arg(long)]
    module: Option<String>,

    /// Timeout sentinel in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Weight samples by raw self percentage instead of normalized share
    #[arg(long)]
    raw: bool,

    /// Tag index (`kind`/`name`/`path` objects) placing functions in files
    #[arg(long, requires = "category_files", conflicts_with = "category_functions")]
    tags: Option<PathBuf>,

    /// Category → source files table, used with --tags
    #[arg(long, requires = "tags")]
    category_files: Option<PathBuf>,

    /// Category → functions table
    #[arg(long)]
    category_functions: Option<PathBuf>,
}

/// Resolve the engine config: the config file (or defaults), then
/// `--compiler`, then `--module`, then `--timeout` and `--raw`.
fn engine_config(args: &InputArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(compiler) = args.compiler {
        config.module = Compiler::from(compiler).module_name().to_string();
    }
    if let Some(module) = &args.module {
        config.module.clone_from(module);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.raw {
        config.normalize = false;
    }
    Ok(config)
}

impl InputArgs {
    fn categorizer(&self) -> Result<Box<dyn Categorizer>> {
        if let (Some(tags), Some(files)) = (&self.tags, &self.category_files) {
            return Ok(Box::new(FileTagCategorizer::from_files(files, tags)?));
        }
        if let Some(functions) = &self.category_functions {
            return Ok(Box::new(FunctionListCategorizer::from_file(functions)?));
        }
        warn!("no category table given; every function will be uncategorized");
        Ok(Box::new(StaticCategorizer::new()))
    }

    fn analyze(&self) -> Result<Analysis> {
        let config = engine_config(self)?;
        let categorizer = self.categorizer()?;
        let corpus = build_corpus(&config, &self.reports, &self.logs, &categorizer)
            .with_context(|| format!("loading corpus from {}", self.reports.display()))?;
        Ok(Analysis::compute(corpus, &categorizer, &config)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the summary tables.
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { input, out, only } => {
            let analysis = input.analyze()?;
            if only.is_empty() {
                analysis.write_all(&out)?;
            } else {
                for mode in only {
                    analysis.write_view_file(mode, &out.join(mode.file_name()))?;
                }
            }
        }
        Commands::Summary { input, top } => {
            let analysis = input.analyze()?;
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            summary::write_summary(&mut writer, &analysis, top)?;
            writer.flush()?;
        }
    }
    Ok(())
}
