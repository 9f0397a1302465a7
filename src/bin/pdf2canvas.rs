//! CLI binary for pdf-canvas.
//!
//! A thin shim that plays the platform around a [`PresentationHost`]: the
//! positional argument is the file selection, an indicatif spinner is the
//! busy indicator, and the "annotation surface" writes the loaded document
//! as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_canvas::export;
use pdf_canvas::{
    AnnotationSurface, DocumentDescriptor, DocumentLoader, FileChooser, HostObserver,
    LoadConfig, LoadError, LoadProgressCallback, PresentationHost, ProgressCallback,
    SelectedFile, SelectionOutcome,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── Terminal feedback: busy indicator + per-page log ─────────────────────────

/// Spinner while loading, switched to a page counter once the page count is
/// known. Hidden when progress output is disabled; errors are always printed.
struct TerminalFeedback {
    bar: ProgressBar,
}

impl TerminalFeedback {
    fn new(visible: bool) -> Arc<Self> {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        Arc::new(Self { bar })
    }
}

impl HostObserver for TerminalFeedback {
    fn on_loading_changed(&self, loading: bool) {
        if loading {
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS);
            self.bar.set_style(style);
            self.bar.set_prefix("Loading");
            self.bar.set_message("Opening PDF…");
            self.bar.enable_steady_tick(Duration::from_millis(80));
        } else {
            self.bar.finish_and_clear();
        }
    }

    fn on_load_failed(&self, error: &LoadError) {
        eprintln!("{} {}", red("✘"), bold("Failed to load PDF"));
        eprintln!("{error}");
    }
}

impl LoadProgressCallback for TerminalFeedback {
    fn on_load_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_rendered(&self, page_num: usize, total_pages: usize, light_background: bool) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(if light_background { "light" } else { "dark" }),
        ));
        self.bar.inc(1);
    }
}

// ── Platform stand-ins ───────────────────────────────────────────────────────

/// The file was chosen on the command line before the host existed.
struct ArgumentChooser {
    path: PathBuf,
}

impl FileChooser for ArgumentChooser {
    fn choose(&self, accept: &str) {
        debug!("Selected {} (accept: {accept})", self.path.display());
    }
}

/// Keeps the opened document so `main` can export it.
#[derive(Default)]
struct CapturingSurface {
    opened: Mutex<Option<Arc<DocumentDescriptor>>>,
}

impl CapturingSurface {
    fn take(&self) -> Option<Arc<DocumentDescriptor>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl AnnotationSurface for CapturingSurface {
    fn open_document(&self, document: Arc<DocumentDescriptor>) {
        *self.opened.lock().unwrap_or_else(PoisonError::into_inner) = Some(document);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print the canvas document as JSON
  pdf2canvas slides.pdf

  # Render for a 2x display and write to a file
  pdf2canvas --device-pixel-ratio 2 scan.pdf -o scan.canvas.json

  # Faster brightness sampling on very large pages
  pdf2canvas --sample-stride 8 poster.pdf -o poster.json

OUTPUT:
  {
    "name": "slides.pdf",
    "pages": [
      { "image": "data:image/png;base64,…",
        "bounds": { "x": 0.0, "y": 0.0, "width": 918.0, "height": 1188.0 },
        "assetId": "asset:…", "shapeId": "shape:…",
        "lightBackground": true }
    ],
    "sourceLen": 48213
  }

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to the pdfium shared library
  RUST_LOG                Override the log filter (e.g. pdf_canvas=debug)
"#;

/// Rasterise a PDF onto an annotation canvas and print the document as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2canvas",
    version,
    about = "Rasterise a PDF onto an annotation canvas",
    long_about = "Render every page of a PDF with pdfium, classify each page as light or dark, \
stack the pages vertically centred on the widest one, and emit the canvas document as JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "PDF2CANVAS_OUTPUT")]
    output: Option<PathBuf>,

    /// Physical pixels per layout unit of the target display.
    #[arg(long, env = "PDF2CANVAS_DEVICE_PIXEL_RATIO", default_value_t = 1.0)]
    device_pixel_ratio: f64,

    /// Sample every n-th pixel when classifying page brightness.
    #[arg(long, env = "PDF2CANVAS_SAMPLE_STRIDE", default_value_t = 1)]
    sample_stride: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2CANVAS_PASSWORD")]
    password: Option<String>,

    /// Emit compact single-line JSON.
    #[arg(long, env = "PDF2CANVAS_COMPACT")]
    compact: bool,

    /// Disable progress output.
    #[arg(long, env = "PDF2CANVAS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CANVAS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2CANVAS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; INFO logs would only
    // fight with it for the terminal.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Wire the host ────────────────────────────────────────────────────
    let feedback = TerminalFeedback::new(show_progress);
    let config = build_config(&cli, Arc::clone(&feedback) as ProgressCallback)?;
    let surface = Arc::new(CapturingSurface::default());

    let host = PresentationHost::new(
        DocumentLoader::new(config),
        Arc::new(ArgumentChooser {
            path: cli.input.clone(),
        }),
        Arc::clone(&surface) as Arc<dyn AnnotationSurface>,
        feedback as Arc<dyn HostObserver>,
    );

    host.request_file_selection();
    let outcome = host
        .on_file_selected(Some(SelectedFile::from_path(&cli.input)))
        .await;

    if outcome != SelectionOutcome::Opened {
        // The observer already reported the error.
        std::process::exit(1);
    }

    let document = surface
        .take()
        .context("Document loaded but never reached the surface")?;

    // ── Export ───────────────────────────────────────────────────────────
    let pretty = !cli.compact;
    if let Some(ref output_path) = cli.output {
        export::write_json(&document, output_path, pretty)
            .await
            .context("Failed to write output")?;
    } else {
        let json = export::to_json(&document, pretty).context("Failed to serialise document")?;
        write_line(&mut io::stdout().lock(), &json).context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        let light = document.pages.iter().filter(|p| p.light_background).count();
        eprintln!(
            "{}  {} pages ({} light, {} dark)  {}",
            green("✔"),
            bold(&document.page_count().to_string()),
            light,
            document.page_count() - light,
            dim(&format!(
                "{:.0}×{:.0} canvas",
                document.widest_width(),
                document.total_height()
            )),
        );
        if let Some(ref output_path) = cli.output {
            eprintln!("   →  {}", bold(&output_path.display().to_string()));
        }
    }

    Ok(())
}

/// Write `json` followed by a newline.
fn write_line(out: &mut impl Write, json: &str) -> io::Result<()> {
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Map CLI args to `LoadConfig`.
fn build_config(cli: &Cli, progress: ProgressCallback) -> Result<LoadConfig> {
    let mut builder = LoadConfig::builder()
        .device_pixel_ratio(cli.device_pixel_ratio)
        .sample_stride(cli.sample_stride)
        .progress_callback(progress);

    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }

    builder.build().context("Invalid configuration")
}
