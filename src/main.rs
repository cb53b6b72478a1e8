use chrono::Utc;
use clap::{Parser, Subcommand};
use sfx_manifest::library::{self, Library};
use sfx_manifest::manifest::{self, ManifestError};
use sfx_manifest::{config, output, synth};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sfx-manifest")]
#[command(about = "Catalogue sound-effect libraries into JSON manifests")]
#[command(long_about = "\
Catalogue sound-effect libraries into JSON manifests

Each library is a folder under the audio root. Its first-level folders are
categories, deeper folders are subcategories, and every .ogg, .wav or .mp3
below them becomes one manifest record with a display name and tags.

Audio root structure:

  audio/
  ├── catalog.toml                 # Library overrides (optional)
  ├── Other/                       # Library
  │   ├── manifest.json            # Written by 'scan' / 'build'
  │   ├── RetroGames/              # Category
  │   │   └── bomb_jack_theme.ogg  # → \"Bomb Jack Theme\", tags: retro, arcade, ...
  │   └── Jingles/
  │       └── game_over.wav
  └── Foley/
      └── Footsteps/
          └── Gravel/              # Subcategory
              └── walk_01.wav

Tags come from the category, the subcategory, the library's identity tags and
its rule table. Run 'sfx-manifest rules <LIBRARY>' to see a rule table and
'sfx-manifest gen-config' to generate a documented catalog.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding one folder per library
    #[arg(long, default_value = "audio", global = true)]
    audio_root: PathBuf,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Catalog(CatalogCommand),
    /// Print a stock catalog.toml with all options documented
    GenConfig,
}

/// Commands that read the catalog from the audio root.
#[derive(Subcommand)]
enum CatalogCommand {
    /// Build and write one library's manifest
    Scan {
        /// Library name or folder, case-insensitive
        library: String,
    },
    /// Build and write every library's manifest
    Build,
    /// Compare freshly built manifests with the ones on disk without writing
    Check {
        /// Only check this library
        library: Option<String>,
    },
    /// List configured libraries
    Libraries,
    /// Print a library's identity tags, hooks and tag rules
    Rules { library: String },
    /// Show the name and tags a file would get
    Classify {
        library: String,
        /// Path relative to the library folder, e.g. RetroGames/theme.ogg
        relative_path: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        Command::Catalog(command) => run(command, &cli.audio_root),
    }
}

fn run(command: CatalogCommand, audio_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = config::load_config(audio_root)?;
    let libraries = library::libraries(&catalog);
    let now = Utc::now();

    match command {
        CatalogCommand::Scan { library } => {
            let library = lookup(&libraries, &library)?;
            let outcome = manifest::scan_library(library, audio_root, now, true)?;
            output::print_build_output(&[outcome]);
        }
        CatalogCommand::Build => {
            init_thread_pool(&catalog.processing);
            let outcomes = manifest::scan_libraries(&libraries, audio_root, now, true)?;
            output::print_build_output(&outcomes);
        }
        CatalogCommand::Check { library } => {
            init_thread_pool(&catalog.processing);
            let selected = match library {
                Some(name) => vec![lookup(&libraries, &name)?.clone()],
                None => libraries,
            };
            let outcomes = manifest::scan_libraries(&selected, audio_root, now, false)?;
            output::print_build_output(&outcomes);
        }
        CatalogCommand::Libraries => {
            let exists: Vec<bool> = libraries
                .iter()
                .map(|l| l.root(audio_root).is_dir())
                .collect();
            output::print_libraries(&libraries, &exists);
        }
        CatalogCommand::Rules { library } => {
            output::print_rules(lookup(&libraries, &library)?);
        }
        CatalogCommand::Classify {
            library,
            relative_path,
        } => {
            let library = lookup(&libraries, &library)?;
            let class = synth::classify_path(library, Path::new(&relative_path));
            output::print_classification(&relative_path, class.as_ref());
        }
    }

    Ok(())
}

fn lookup<'a>(libraries: &'a [Library], name: &str) -> Result<&'a Library, ManifestError> {
    library::find(libraries, name).ok_or_else(|| ManifestError::UnknownLibrary(name.to_string()))
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
