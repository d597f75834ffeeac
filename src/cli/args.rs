//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::inventory::DEFAULT_INDEX_URL;
use crate::version::Version;

/// netver - identify .NET runtimes and build the .NET Core build catalog.
#[derive(Debug, Parser)]
#[command(name = "netver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download pre-3.0 runtimes, probe them and print the build catalog
    Scrape(ScrapeArgs),

    /// Resolve a runtime identity from explicit signals
    Resolve(ResolveArgs),

    /// Run the probe program under a runtime and resolve what it reports
    Detect(DetectArgs),

    /// Show or export the build catalog
    Catalog(CatalogArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `scrape` command.
#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    /// Where runtimes are downloaded and extracted [default: ~/dotnets]
    #[arg(long, env = "NETVER_DOTNETS_PATH")]
    pub dotnets_path: Option<PathBuf>,

    /// Runtime identifier to fetch runtimes for [default: this machine's]
    #[arg(long)]
    pub rid: Option<String>,

    /// Only walk one release channel (e.g. 2.1)
    #[arg(long)]
    pub channel: Option<String>,

    /// Probe already extracted runtimes without touching the network
    #[arg(long)]
    pub offline: bool,

    /// Directory with the probe program built per target framework
    #[arg(long, default_value = "probe/bin/Release")]
    pub probe_root: PathBuf,

    /// File name of the probe program inside each target framework directory
    #[arg(long, default_value = "PrintVersion.dll")]
    pub probe_assembly: String,

    /// Parallel workers (0 = one per CPU)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Seconds a single probe may run
    #[arg(long, default_value_t = 60)]
    pub probe_timeout: u64,

    /// Seconds a single download may take
    #[arg(long, default_value_t = 600)]
    pub download_timeout: u64,

    /// Write the catalog here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Release metadata index
    #[arg(long, env = "NETVER_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
    pub index_url: String,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ResolveArgs {
    /// Framework description, e.g. ".NET Core 4.6.26919.02"
    #[arg(long)]
    pub description: Option<String>,

    /// Environment version reported by the runtime
    #[arg(long)]
    pub environment_version: Option<Version>,

    /// File version of the core library (build identifier)
    #[arg(long)]
    pub build_id: Option<Version>,

    /// Informational version of the core library
    #[arg(long)]
    pub informational_version: Option<String>,

    /// The runtime is Mono
    #[arg(long)]
    pub mono: bool,

    /// Mono's display name, e.g. "6.12.0.122 (tarball)"
    #[arg(long, requires = "mono")]
    pub mono_display_name: Option<String>,

    /// .NET Framework release code from the registry
    #[arg(long)]
    pub legacy_release: Option<u32>,

    /// JSON file of signals; flags override its fields
    #[arg(long)]
    pub signals: Option<PathBuf>,

    /// Catalog to resolve against instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// The dotnet host to run the probe with
    #[arg(long)]
    pub dotnet: PathBuf,

    /// The probe program
    #[arg(long)]
    pub probe: PathBuf,

    /// Seconds the probe may run
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Catalog to resolve against instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `catalog` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// Catalog file to show instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print the JSON Schema of the catalog format
    #[arg(long, conflicts_with = "json")]
    pub schema: bool,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
