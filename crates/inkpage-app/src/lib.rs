//! InkPage Application
//!
//! Command-line host for the annotation engine: opens page images, replays
//! an annotation script and exports the annotated document as a PDF.

mod pdf_writer;
mod script;

pub use pdf_writer::RasterPdfWriter;
pub use script::{Action, ReplayStats, Script};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkpage_core::HostConfig;
use inkpage_render::{
    DocumentSource, ExportSettings, RasterPagesSource, export_document, open_session,
};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Parser)]
#[command(name = "inkpage")]
#[command(about = "Freehand ink annotation for multi-page documents")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay an annotation script over page images and export a PDF.
    Annotate {
        /// Page images, in page order.
        #[arg(value_name = "PAGES", required = true)]
        pages: Vec<PathBuf>,
        /// JSON annotation script.
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Output file (default: annotated_<millis>.pdf).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Export pixels per page unit.
        #[arg(long, default_value_t = inkpage_render::DEFAULT_EXPORT_SCALE)]
        scale: f64,
    },
    /// Print page count and sizes as JSON.
    Info {
        #[arg(value_name = "PAGES", required = true)]
        pages: Vec<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    page_count: usize,
    pages: Vec<PageSizeOutput>,
}

#[derive(Debug, Serialize)]
struct PageSizeOutput {
    width: f64,
    height: f64,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Annotate {
            pages,
            script,
            output,
            scale,
        } => {
            let output = output.unwrap_or_else(|| PathBuf::from(default_output_name(SystemTime::now())));
            run_annotate(&pages, &script, &output, scale)
        }
        Commands::Info { pages } => run_info(&pages),
    }
}

/// `annotated_<unix-millis>.pdf`.
pub fn default_output_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("annotated_{millis}.pdf")
}

fn run_annotate(pages: &[PathBuf], script: &Path, output: &Path, scale: f64) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0) {
        anyhow::bail!("--scale must be a positive number");
    }

    let source = RasterPagesSource::open(pages).context("failed to open pages")?;
    let script = Script::load(script)?;
    let mut session =
        open_session(&source, script.viewport_width).context("failed to start session")?;

    let stats = script.replay(&mut session, HostConfig::default());
    log::info!(
        "Replayed {} action(s), {} without effect",
        stats.actions,
        stats.ignored
    );

    let registry = session.export_snapshot();
    let settings = ExportSettings {
        scale,
        ..ExportSettings::default()
    };
    let mut writer = RasterPdfWriter::for_export_scale(scale);
    let mut buffer = Vec::new();
    let summary = export_document(&source, &registry, &mut writer, &mut buffer, &settings, None)
        .context("export failed")?;

    std::fs::write(output, &buffer)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Saved {} page(s), {} stroke(s) to {}",
        summary.pages,
        summary.strokes,
        output.display()
    );
    Ok(())
}

fn run_info(pages: &[PathBuf]) -> Result<()> {
    let source = RasterPagesSource::open(pages).context("failed to open pages")?;
    let pages = (0..source.page_count())
        .map(|index| {
            let size = source.page_size(index)?;
            Ok(PageSizeOutput {
                width: size.width,
                height: size.height,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let payload = InfoOutput {
        page_count: pages.len(),
        pages,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
