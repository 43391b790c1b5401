//! CLI binary for quote-meme.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `IngestConfig` / `RenderConfig`, picks a quote and an image, and prints
//! the path of the rendered meme.

use anyhow::{bail, Context, Result};
use clap::Parser;
use quote_meme::catalog::{discover_images, discover_quote_files, load_quotes};
use quote_meme::select::{pick_random, seeded_rng};
use quote_meme::{
    ExtractionTool, IngestConfig, MemeEngine, OutputFormat, QuoteEngine, QuoteModel, RenderConfig,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────
// All decorated output goes to stderr, so colour follows whether stderr is a
// terminal.

fn paint(code: &str, s: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}
fn colour() -> bool {
    io::stderr().is_terminal()
}
fn green(s: &str) -> String {
    paint("32", s, colour())
}
fn dim(s: &str) -> String {
    paint("2", s, colour())
}
fn bold(s: &str) -> String {
    paint("1", s, colour())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Random quote on a random image from ./_data
  meme

  # Reproducible pick
  meme --seed 7

  # Your own caption and image
  meme --image photos/dog.jpg --body "Bark at the moon" --author Rex

  # Remote image, PNG output into ./out
  meme --image https://example.com/cat.png --body "Nap" --author Tom \
       --format png --output ./out

  # List every quote found under a data directory
  meme --list --data-dir ./quotes
  meme --list --json > quotes.json

QUOTE FILES:
  .txt   one "body - author" per line
  .csv   header row with body,author or quote,speaker
  .docx  one "body - author" per paragraph
  .pdf   text extracted with pdftotext or mutool, then one per line

ENVIRONMENT VARIABLES:
  MEME_DATA_DIR       Default for --data-dir
  MEME_OUTPUT_DIR     Default for --output
  MEME_FONT           TrueType font used for the caption
  MEME_PDF_TOOL       PDF text extraction command, e.g. "mutool draw -F txt -o {output} {input}"
  RUST_LOG            Overrides the log filter (e.g. quote_meme=debug)
"#;

/// Render quotes from documents onto images.
#[derive(Parser, Debug)]
#[command(
    name = "meme",
    version,
    about = "Render quotes from documents onto images",
    long_about = "Harvest quotes from .txt, .csv, .docx and .pdf files and draw them as \
captions over photos. With no caption arguments a random quote and a random image are \
taken from the data directory.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image path or HTTP/HTTPS URL. Random image from the data directory if omitted.
    #[arg(short, long)]
    image: Option<String>,

    /// Quote text. Requires --author.
    #[arg(short, long, requires = "author")]
    body: Option<String>,

    /// Quote author. Requires --body.
    #[arg(short, long, requires = "body")]
    author: Option<String>,

    /// Directory searched (recursively) for quote files and images.
    #[arg(long, env = "MEME_DATA_DIR", default_value = "./_data")]
    data_dir: PathBuf,

    /// Directory that receives rendered images.
    #[arg(short, long, env = "MEME_OUTPUT_DIR", default_value = "./static")]
    output: PathBuf,

    /// Scale images wider than this down to this width (0 keeps the original size).
    #[arg(long, env = "MEME_MAX_WIDTH", default_value_t = 500)]
    max_width: u32,

    /// Output image format.
    #[arg(long, env = "MEME_FORMAT", value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// TrueType/OpenType font for the caption. Searches system fonts if omitted.
    #[arg(long, env = "MEME_FONT")]
    font: Option<PathBuf>,

    /// PDF text extraction command. `{input}` and `{output}` are substituted.
    #[arg(long, env = "MEME_PDF_TOOL")]
    pdf_tool: Option<String>,

    /// Seed for the random quote/image pick.
    #[arg(long, env = "MEME_SEED")]
    seed: Option<u64>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "MEME_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Print every quote found under the data directory and exit.
    #[arg(long)]
    list: bool,

    /// With --list, print JSON instead of text.
    #[arg(long, requires = "list")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MEME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result path.
    #[arg(short, long, env = "MEME_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let quotes = QuoteEngine::new(&ingest_config(&cli)?);

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list {
        let all = load_all_quotes(&quotes, &cli.data_dir)?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&all).context("Failed to serialise quotes")?
            );
        } else {
            for q in &all {
                println!("{q}");
            }
            if !cli.quiet {
                eprintln!("{}", dim(&format!("{} quotes", all.len())));
            }
        }
        return Ok(());
    }

    // ── Pick caption and image ───────────────────────────────────────────
    let mut rng = seeded_rng(cli.seed);

    let quote = match (&cli.body, &cli.author) {
        (Some(body), Some(author)) => QuoteModel::new(body, author)
            .context("--body and --author must both contain non-whitespace text")?,
        _ => {
            let all = load_all_quotes(&quotes, &cli.data_dir)?;
            match pick_random(&all, &mut rng) {
                Some(q) => q.clone(),
                None => bail!("No quotes found under {}", cli.data_dir.display()),
            }
        }
    };

    let image = match &cli.image {
        Some(image) => image.clone(),
        None => {
            let images = discover_images(&cli.data_dir)
                .with_context(|| format!("Failed to scan {}", cli.data_dir.display()))?;
            match pick_random(&images, &mut rng) {
                Some(p) => p.to_string_lossy().into_owned(),
                None => bail!("No images found under {}", cli.data_dir.display()),
            }
        }
    };

    // ── Render ───────────────────────────────────────────────────────────
    let engine = MemeEngine::new(render_config(&cli)?).context("Failed to set up renderer")?;
    let path = engine
        .make_meme(&image, &quote)
        .await
        .context("Failed to render meme")?;

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), bold(&quote.to_string()));
    }
    println!("{}", path.display());
    Ok(())
}

fn ingest_config(cli: &Cli) -> Result<IngestConfig> {
    let mut config = IngestConfig::default();
    if let Some(ref cmd) = cli.pdf_tool {
        config.extraction_tool =
            ExtractionTool::from_command_line(cmd).context("Invalid --pdf-tool")?;
    }
    Ok(config)
}

/// Map CLI args to `RenderConfig`.
fn render_config(cli: &Cli) -> Result<RenderConfig> {
    let mut builder = RenderConfig::builder()
        .output_dir(&cli.output)
        .output_format(cli.format.into())
        .download_timeout_secs(cli.download_timeout);

    builder = match cli.max_width {
        0 => builder.no_max_width(),
        px => builder.max_width(px),
    };
    if let Some(ref font) = cli.font {
        builder = builder.font_path(font);
    }

    builder.build().context("Invalid configuration")
}

fn load_all_quotes(engine: &QuoteEngine, data_dir: &Path) -> Result<Vec<QuoteModel>> {
    let files = discover_quote_files(data_dir, engine)
        .with_context(|| format!("Failed to scan {}", data_dir.display()))?;
    Ok(load_quotes(engine, &files))
}
