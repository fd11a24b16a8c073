//! Command line tool for latex-tip icon collections.
//!
//! # Usage
//!
//! ```bash
//! # List every icon name
//! latex-tip icons
//!
//! # List icons of one collection
//! latex-tip icons --collection fontawesome
//!
//! # Show core and registered collections
//! latex-tip collections
//!
//! # Register a collection (files are copied into the data directory)
//! latex-tip register material --css material.css --ttf MaterialIcons.ttf --prefix mi-
//!
//! # Remove it again
//! latex-tip unregister --prefix mi-
//!
//! # Render one icon to ./fa-comments.png
//! latex-tip render fa-comments --color darkred --size 128
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use latex_tip::{Error, Result, TipConfig};
use latex_tip_icons::collection::{CollectionRegistry, CollectionSpec, core_collections};
use latex_tip_icons::raster::BASE_SIZE;
use latex_tip_icons::{Diagnostics, GlyphRasterizer, IconCatalog, IconColor, IconFont, StylesheetIndex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "latex-tip")]
#[command(about = "Manage icon collections for LaTeX margin tips")]
struct Cli {
    /// Directory holding the collections and config.toml
    #[arg(long, env = "LATEX_TIP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available icon names
    Icons {
        /// Only list icons from this collection
        #[arg(long)]
        collection: Option<String>,
    },

    /// List core and registered collections
    Collections,

    /// Register a stylesheet/font pair as a collection
    Register {
        /// Collection directory name
        collection: String,

        /// Stylesheet file
        #[arg(long)]
        css: PathBuf,

        /// TrueType/OpenType font file
        #[arg(long)]
        ttf: PathBuf,

        /// Prefix for the icon names, e.g. "mi-"
        #[arg(long)]
        prefix: String,
    },

    /// Remove registered collections by prefix
    Unregister {
        #[arg(long)]
        prefix: String,
    },

    /// Render one icon to a PNG file
    Render {
        /// Icon name, e.g. "fa-comments"
        name: String,

        /// Named color
        #[arg(long, default_value = "black")]
        color: String,

        /// Image size in pixels
        #[arg(long, default_value_t = BASE_SIZE)]
        size: u32,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => TipConfig::from_env()?.data_dir,
    };

    match cli.command {
        Commands::Icons { collection } => {
            let catalog = IconCatalog::load(&data_dir, &mut Diagnostics::new())?;
            for (name, entry) in catalog.iter() {
                if collection.as_ref().is_none_or(|c| *c == entry.collection) {
                    println!("{name}");
                }
            }
        }
        Commands::Collections => {
            let registry = load_registry(&data_dir)?;
            for spec in core_collections().iter().chain(registry.entries()) {
                println!("{}\t{}\t{}\t{}", spec.prefix, spec.collection, spec.css, spec.ttf);
            }
        }
        Commands::Register {
            collection,
            css,
            ttf,
            prefix,
        } => register(&data_dir, collection, &css, &ttf, prefix)?,
        Commands::Unregister { prefix } => {
            let mut registry = load_registry(&data_dir)?;
            let removed = registry.remove_prefix(&prefix)?;
            registry.save()?;
            println!("removed {removed} collection(s) with prefix '{prefix}'");
        }
        Commands::Render {
            name,
            color,
            size,
            output,
        } => {
            let mut diagnostics = Diagnostics::new();
            let catalog = IconCatalog::load(&data_dir, &mut diagnostics)?;
            let entry = catalog.resolve(&name).ok_or_else(|| {
                latex_tip_icons::Error::invalid_value("name", format!("unknown icon '{name}'"))
            })?;
            let color = IconColor::resolve(&color, &mut diagnostics);

            let path = GlyphRasterizer::new().export_to(
                &entry.font,
                entry.character,
                size,
                &color,
                &output,
                &format!("{name}.png"),
            )?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn load_registry(data_dir: &Path) -> Result<CollectionRegistry> {
    let mut diagnostics = Diagnostics::new();
    Ok(CollectionRegistry::load(
        CollectionRegistry::path_in(data_dir),
        &mut diagnostics,
    )?)
}

/// Copy the files into `<data_dir>/<collection>/`, check them and add the
/// registry entry.
fn register(data_dir: &Path, collection: String, css: &Path, ttf: &Path, prefix: String) -> Result<()> {
    let mut registry = load_registry(data_dir)?;
    let collection_dir = data_dir.join(&collection);
    std::fs::create_dir_all(&collection_dir).map_err(|e| Error::io(&collection_dir, e))?;

    let css_name = install(css, &collection_dir)?;
    let ttf_name = install(ttf, &collection_dir)?;
    let spec = CollectionSpec::new(collection, css_name, ttf_name, prefix);

    let font = IconFont::from_file(spec.ttf_path(data_dir))?;
    let index = StylesheetIndex::from_file(spec.css_path(data_dir), &font, Some(&spec.prefix))?;
    if index.is_empty() {
        return Err(latex_tip_icons::Error::collection(
            &spec.collection,
            "the stylesheet defines no icon present in the font",
        )
        .into());
    }

    registry.add(spec)?;
    registry.save()?;
    println!("registered {} icons", index.len());
    Ok(())
}

/// Copy `file` into `dir` unless it is already there; return its file name.
fn install(file: &Path, dir: &Path) -> Result<String> {
    let name = file
        .file_name()
        .ok_or_else(|| {
            Error::io(
                file,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file name"),
            )
        })?
        .to_string_lossy()
        .into_owned();

    let target = dir.join(&name);
    if !target.is_file() || std::fs::canonicalize(file).ok() != std::fs::canonicalize(&target).ok() {
        std::fs::copy(file, &target).map_err(|e| Error::io(file, e))?;
    }
    Ok(name)
}
