//! `stylemap` command-line host.
//!
//! Reads a JSON dump of a design document and runs the scan, theme export
//! and swatch planning steps against it.
//!
//! ```text
//! stylemap scan tokens.json
//! stylemap export tokens.json --select variable-color__tokens__brand
//! stylemap export tokens.json --all --format json -o theme.json
//! stylemap swatches tokens.json --all --json
//! ```

mod output;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use stylemap::{DocumentSnapshot, ExportConfig, ExportFormat, Session};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stylemap", version, about = "Group and export design-system styles")]
struct Cli {
    /// Export config (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mode used to pick variable values (overrides the config)
    #[arg(long, global = true, value_name = "NAME")]
    mode: Option<String>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the group tree of a document
    Scan {
        /// Document dump (JSON)
        document: PathBuf,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the selected groups as theme config
    Export {
        /// Document dump (JSON)
        document: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format (overrides the config)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Plan swatch cards for the selected groups
    Swatches {
        /// Document dump (JSON)
        document: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Group id to select (repeatable)
    #[arg(short, long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Select every group
    #[arg(long, conflicts_with = "select")]
    all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Js,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Js => ExportFormat::Js,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExportConfig::default(),
    };
    if let Some(mode) = &cli.mode {
        config.mode = Some(mode.clone());
    }
    Ok(config)
}

fn open_session(document: &Path, config: ExportConfig) -> Result<Session<DocumentSnapshot>> {
    let doc = DocumentSnapshot::from_path(document)
        .with_context(|| format!("loading document {}", document.display()))?;
    Ok(Session::with_config(doc, config))
}

fn selected_ids(session: &mut Session<DocumentSnapshot>, selection: &SelectionArgs) -> Result<Vec<String>> {
    if selection.all {
        return Ok(session.scan().groups.into_iter().map(|g| g.id).collect());
    }
    if selection.select.is_empty() {
        bail!("nothing selected: pass --select ID or --all");
    }
    Ok(selection.select.clone())
}

// Each fallback is already logged where it was recorded.
fn report_diagnostics(session: &Session<DocumentSnapshot>) {
    let count = session.diagnostics().count();
    if count > 0 {
        tracing::info!(fallbacks = count, "some values were replaced by defaults");
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Command::Scan { document, json } => {
            let mut session = open_session(&document, config)?;
            let scan = session.scan();
            report_diagnostics(&session);
            if json {
                serde_json::to_writer_pretty(&mut *out, &scan)?;
                writeln!(out)?;
            } else {
                output::write_tree(out, &scan)?;
            }
        }
        Command::Export {
            document,
            selection,
            format,
            output,
        } => {
            if let Some(format) = format {
                config.format = format.into();
            }
            let mut session = open_session(&document, config)?;
            let ids = selected_ids(&mut session, &selection)?;
            let theme = session.build_theme_export(&ids)?;
            report_diagnostics(&session);

            if theme.export.is_empty() {
                tracing::warn!("selection produced an empty theme");
            }
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", theme.primary()))
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "wrote theme");
                }
                None => writeln!(out, "{}", theme.primary())?,
            }
        }
        Command::Swatches {
            document,
            selection,
            json,
        } => {
            let batch_size = config.batch_size;
            let mut session = open_session(&document, config)?;
            let ids = selected_ids(&mut session, &selection)?;
            let plan = session.plan_swatches(&ids);
            report_diagnostics(&session);

            for batch in plan.batches(batch_size) {
                tracing::debug!(
                    current = batch.progress.current,
                    total = batch.progress.total,
                    "planned cards"
                );
            }
            if json {
                serde_json::to_writer_pretty(&mut *out, &plan)?;
                writeln!(out)?;
            } else {
                output::write_plan(out, &plan)?;
            }
        }
    }
    Ok(())
}
