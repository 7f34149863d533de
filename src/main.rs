//! lawpub - statute XML to EPUB

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lawpub::convert::revision_id_from_path;
use lawpub::images::{DEFAULT_API_BASE_URL, DEFAULT_MAX_IMAGE_HEIGHT};
use lawpub::{ConvertOptions, ImageOptions, convert_file};

#[derive(Parser)]
#[command(name = "lawpub")]
#[command(version, about = "Compile Japanese statute XML into EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    lawpub 322AC0000000049_20240401_505AC0000000017.xml -d law.epub
    lawpub law.xml -d law.epub --no-images")]
struct Cli {
    /// Statute XML file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Output EPUB file
    #[arg(short, long, value_name = "DEST")]
    dest: PathBuf,

    /// Do not download figures
    #[arg(long)]
    no_images: bool,

    /// CSS max-height for figures
    #[arg(long, value_name = "CSS", default_value = DEFAULT_MAX_IMAGE_HEIGHT)]
    max_image_height: String,

    /// Revision id for attachment downloads (default: from SOURCE filename)
    #[arg(long, value_name = "ID")]
    revision_id: Option<String>,

    /// Law API base URL
    #[arg(long, value_name = "URL", env = "LAWPUB_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Directory containing the pdfium shared library
    #[arg(long, value_name = "DIR", env = "LAWPUB_PDFIUM_DIR")]
    pdfium_dir: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match convert(&cli) {
        Ok(()) => {
            if !cli.quiet {
                println!("{} -> {}", cli.source.display(), cli.dest.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn convert(cli: &Cli) -> lawpub::Result<()> {
    let mut options = ConvertOptions::new();

    if !cli.no_images {
        let revision = cli
            .revision_id
            .clone()
            .or_else(|| revision_id_from_path(&cli.source));
        match revision {
            Some(revision) => {
                let mut images = ImageOptions::new(revision)
                    .with_max_image_height(&cli.max_image_height)
                    .with_api_base_url(&cli.api_base_url);
                if let Some(dir) = &cli.pdfium_dir {
                    images = images.with_pdfium_dir(dir);
                }
                options = options.with_images(images);
            }
            None => warn!(
                source = %cli.source.display(),
                "no revision id in source filename; figures disabled"
            ),
        }
    }

    convert_file(&cli.source, &cli.dest, &options)
}
