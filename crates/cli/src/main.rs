//! mta-trainerdesk CLI
//!
//! Command-line front door for the trainer desk core.
//! Resolves breadcrumb trails and exports listings as CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mta_trainerdesk_core::{
    format_receipt, format_rules, format_trail, student_records, trainer_records, AppConfig,
    BreadcrumbResolver, DirectorySink, DownloadReceipt, OutputFormat, ProfileExporter, Record,
    Role, StudentProfile, TabularExporter, TrainerProfile,
};
use serde_json::from_str;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Trainer desk CLI
#[derive(Parser)]
#[command(name = "mta-trainerdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Breadcrumb trails and CSV exports for the personal trainer app")]
#[command(long_about = r#"
mta-trainerdesk: Trainer Desk Utilities

Resolves navigation breadcrumbs for any app path and exports trainer and
student listings as spreadsheet-ready CSV (UTF-8 with BOM).

Output formats:
  - JSON (default) - Structured JSON for programmatic use
  - YAML - Human-readable YAML format
  - ANSI - Colorful terminal output
  - Summary - Plain text

Examples:
  mta-trainerdesk breadcrumb /personal/alunos/42/historico --role personal
  mta-trainerdesk routes --format ansi
  mta-trainerdesk export students --input alunos.json --out-dir exports
  mta-trainerdesk export records --input rows.json --name relatorio
"#)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json, global = true)]
    pub format: OutputFormatArg,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the breadcrumb trail for a path
    Breadcrumb {
        /// App path, e.g. /personal/alunos/42
        path: String,

        /// Role of the signed-in user
        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
    },

    /// List the breadcrumb label rules
    Routes,

    /// Export a JSON listing as CSV
    Export {
        /// Kind of listing in the input
        #[arg(value_enum)]
        kind: ExportKind,

        /// JSON array input file ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Download name without extension
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write the CSV into (default: from config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Ansi,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

/// Role argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    Admin,
    Personal,
    Aluno,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Personal => Role::Personal,
            RoleArg::Aluno => Role::Aluno,
        }
    }
}

/// Kind of listing to export
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ExportKind {
    /// Arbitrary flat JSON objects
    Records,
    /// Personal trainer profiles
    Trainers,
    /// Student profiles
    Students,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = AppConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    match &args.command {
        Commands::Breadcrumb { path, role } => run_breadcrumb(path, *role, &config, &args),
        Commands::Routes => run_routes(&config, &args),
        Commands::Export {
            kind,
            input,
            name,
            out_dir,
        } => run_export(*kind, input, name.as_deref(), out_dir.as_ref(), &config, &args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_resolver(config: &AppConfig) -> Result<BreadcrumbResolver> {
    BreadcrumbResolver::with_config(&config.breadcrumbs).context("Invalid breadcrumb configuration")
}

fn run_breadcrumb(path: &str, role: Option<RoleArg>, config: &AppConfig, args: &Args) -> Result<()> {
    let resolver = build_resolver(config)?;
    let trail = resolver.resolve(path, role.map(Role::from));

    let output = format_trail(&trail, args.format.clone().into())?;
    write_output(&output, args.output.as_ref())
}

fn run_routes(config: &AppConfig, args: &Args) -> Result<()> {
    let resolver = build_resolver(config)?;

    let output = format_rules(&resolver.rules(), args.format.clone().into())?;
    write_output(&output, args.output.as_ref())
}

fn run_export(
    kind: ExportKind,
    input: &Path,
    name: Option<&str>,
    out_dir: Option<&PathBuf>,
    config: &AppConfig,
    args: &Args,
) -> Result<()> {
    let text = read_input(input)?;
    let dir = out_dir
        .cloned()
        .unwrap_or_else(|| config.export.output_dir.clone());
    debug!(kind = ?kind, dir = %dir.display(), "exporting listing");

    // Show progress spinner
    let spinner = if args.verbose && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid spinner template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Exporting...");
        Some(pb)
    } else {
        None
    };

    let receipt = export_listing(kind, &text, name, DirectorySink::new(dir), config)?;

    if let Some(ref pb) = spinner {
        match receipt {
            Some(ref r) => pb.finish_with_message(format!("Exported {} rows", r.rows)),
            None => pb.finish_with_message("Nothing to export"),
        }
    }

    let output = format_receipt(receipt.as_ref(), args.format.clone().into())?;
    write_output(&output, args.output.as_ref())
}

fn export_listing(
    kind: ExportKind,
    text: &str,
    name: Option<&str>,
    sink: DirectorySink,
    config: &AppConfig,
) -> Result<Option<DownloadReceipt>> {
    let today = chrono::Local::now().date_naive();

    let receipt = match (kind, name) {
        (ExportKind::Records, name) => {
            let records: Vec<Record> = from_str(text).context("Input is not a JSON array of objects")?;
            TabularExporter::new(sink).export(&records, name.unwrap_or("export"))?
        }
        (ExportKind::Trainers, Some(name)) => {
            let profiles: Vec<TrainerProfile> =
                from_str(text).context("Input is not a JSON array of trainer profiles")?;
            TabularExporter::new(sink).export(&trainer_records(&profiles, &config.export), name)?
        }
        (ExportKind::Trainers, None) => {
            let profiles: Vec<TrainerProfile> =
                from_str(text).context("Input is not a JSON array of trainer profiles")?;
            ProfileExporter::new(sink, config.export.clone()).export_trainers(&profiles, today)?
        }
        (ExportKind::Students, Some(name)) => {
            let profiles: Vec<StudentProfile> =
                from_str(text).context("Input is not a JSON array of student profiles")?;
            TabularExporter::new(sink).export(&student_records(&profiles, &config.export), name)?
        }
        (ExportKind::Students, None) => {
            let profiles: Vec<StudentProfile> =
                from_str(text).context("Input is not a JSON array of student profiles")?;
            ProfileExporter::new(sink, config.export.clone()).export_students(&profiles, today)?
        }
    };

    Ok(receipt)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(output: &str, path: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        println!("{}", output);
    }
    Ok(())
}
