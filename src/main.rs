use clap::{Parser, Subcommand};
use image_presets::imaging::RustBackend;
use image_presets::presets::ORIGINAL;
use image_presets::storage::{LocalStorage, Storage};
use image_presets::store::{self, Image, Upload, VariantConfig};
use image_presets::{config, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-presets")]
#[command(about = "Resized image variants on demand")]
#[command(long_about = "\
Resized image variants on demand

Originals live under <storage root>/images/. Asking for an image at a size
preset fits it to the preset's exact dimensions (scale to cover, center crop)
the first time, stores the result next to the original, and prints its URL.

  images/
  ├── photo.png                # original
  ├── photo-48x48.png          # icon, created by `get photo.png --size icon`
  └── photo-800x600.png        # big

Set RUST_LOG=debug to see cache hits and generated variants.

Run 'image-presets gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL of an image at a size, generating the variant if needed
    Get {
        /// Stored filename, relative to images/
        filename: String,
        /// Preset name, or "original"
        #[arg(long, short, default_value = ORIGINAL)]
        size: String,
    },
    /// Store a local file as a new original named NAME-<unix time>.<ext>
    Create {
        /// File to upload
        path: PathBuf,
        /// Name prefix for the stored file
        #[arg(long)]
        name: String,
    },
    /// Delete an original and all of its variants
    Delete {
        /// Stored filename, relative to images/
        filename: String,
    },
    /// List the configured size presets
    Presets,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Handles built from config for commands that touch storage.
struct Context {
    storage: LocalStorage,
    backend: RustBackend,
    variants: VariantConfig,
}

impl Context {
    fn load(config_dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::load_config(config_dir)?;
        let storage = LocalStorage::new(&config.storage.root, &config.storage.public_url);
        tracing::debug!(root = %storage.root().display(), "using local storage");
        Ok(Self {
            storage,
            backend: RustBackend::new(),
            variants: config.variant_config(),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Get { filename, size } => {
            let ctx = Context::load(&cli.config_dir)?;
            let variant =
                Image::new(filename).get_variant(&ctx.storage, &ctx.backend, &ctx.variants, &size)?;
            output::print_variant(&variant, cli.json)?;
        }
        Command::Create { path, name } => {
            let ctx = Context::load(&cli.config_dir)?;
            let upload = Upload::from_path(&path)?;
            let image = store::create(&ctx.storage, &ctx.backend, &ctx.variants, &upload, &name)?;
            let url = ctx.storage.url(&store::storage_key(image.name()));
            output::print_created(image.name(), &url, cli.json)?;
        }
        Command::Delete { filename } => {
            let ctx = Context::load(&cli.config_dir)?;
            let report = store::delete(&ctx.storage, &ctx.variants.presets, &filename)?;
            output::print_deleted(&report, cli.json)?;
        }
        Command::Presets => {
            let ctx = Context::load(&cli.config_dir)?;
            output::print_presets(&ctx.variants.presets, cli.json)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
