//! CLI module - Command-line interface definitions and handlers

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::core::config::{Config, IdPosition, SearchBackend};
use crate::core::paths::expand_home;
use crate::core::render::{OutputFormat, RenderConfig};

/// idlink - resolve paths through renames using identifiers embedded in names.
#[derive(Parser, Debug)]
#[command(name = "idlink")]
#[command(
    author,
    version,
    about,
    long_about = r#"idlink keeps links to files alive after they are renamed or moved.

Entries carry a timestamp identifier in their name (e.g. 20230105T093512--plan.org).
When a path no longer exists, idlink rebuilds it segment by segment, following
renamed components by their identifier, and finally searches the store
directories for the identifier.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: paths, identifiers or names only, one per line

Examples:
    idlink resolve ~/archive/20230105T093512--plan.org
    idlink id new
    idlink id embed report.pdf
    idlink store scan.pdf --store-dir ~/archive
    idlink links notes.org --format md
"#
)]
pub struct Cli {
    /// Configuration file.
    #[arg(
        long,
        global = true,
        env = "IDLINK_CONFIG",
        value_name = "FILE",
        long_help = "Read configuration from FILE instead of the default location\n\
($XDG_CONFIG_HOME/idlink/config.toml or ~/.config/idlink/config.toml).\n\n\
An explicitly named file must exist; a missing default file means built-in defaults."
    )]
    pub config: Option<PathBuf>,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: use raw to feed resolved paths straight into other commands."
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\
RUST_LOG, when set, takes precedence."
    )]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, including which resolution stage\n\
matched and which search backend was selected. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Store directory (repeatable; overrides the configuration).
    #[arg(long = "store-dir", global = true, value_name = "DIR")]
    pub store_dirs: Vec<PathBuf>,

    /// Search directory (repeatable; overrides the configuration).
    #[arg(long = "search-dir", global = true, value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,

    /// Identifier position for new names (head/tail).
    #[arg(long, global = true, value_name = "POSITION")]
    pub position: Option<String>,

    /// Search backend (auto/fd/walk).
    #[arg(
        long,
        global = true,
        value_name = "BACKEND",
        long_help = "Select how entries are looked up by identifier.\n\n\
Supported values:\n\
- auto (default): fd when installed, else an in-process directory walk\n\
- fd: require fd/fdfind (falls back to walk with a warning)\n\
- walk: always walk directories in-process"
    )]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve paths, following renames through identifiers.
    #[command(
        long_about = "Resolve each PATH to an existing location.\n\n\
Stages, in order:\n\
- direct: the path exists as given\n\
- segment: rebuild the path one component at a time, following renamed entries\n\
- store: search every search directory recursively for the identifier\n\n\
Unresolvable paths are reported as NOT_FOUND items; the exit status stays 0.\n\n\
Examples:\n\
  idlink resolve ~/archive/20230105T093512--plan.org\n\
  idlink resolve old/path/a.txt --format raw\n"
    )]
    Resolve {
        /// Paths to resolve.
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Generate, extract, embed or strip identifiers.
    #[command(
        long_about = "Identifier codec commands. These operate on names only and never\n\
touch the filesystem."
    )]
    Id {
        #[command(subcommand)]
        action: IdCommands,
    },

    /// Rename entries in place so their names carry an identifier.
    #[command(
        long_about = "Rename each PATH so its name carries an identifier. Entries that\n\
already carry one are left alone. An existing target is never overwritten.\n\n\
Examples:\n\
  idlink tag report.pdf\n\
  idlink tag projects --position head\n"
    )]
    Tag {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Use this identifier instead of generating one (ignored unless valid).
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Move (or copy) entries into a store directory with an identifier.
    #[command(
        long_about = "Move each PATH into the first store directory (or --into DIR),\n\
embedding an identifier in its name.\n\n\
Examples:\n\
  idlink store scan.pdf\n\
  idlink store notes.org --copy --into ~/archive/notes\n"
    )]
    Store {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Destination directory (defaults to the first store directory).
        #[arg(long, value_name = "DIR")]
        into: Option<PathBuf>,

        /// Copy instead of moving (files only).
        #[arg(long)]
        copy: bool,
    },

    /// Find entries by identifier.
    #[command(
        long_about = "List every entry whose name contains ID, as returned by the search\n\
backend.\n\n\
Examples:\n\
  idlink find 20230105T093512 --recursive\n\
  idlink find 20230105T093512 --dir ~/archive\n"
    )]
    Find {
        #[arg(value_name = "ID")]
        id: String,

        /// Directory to search (defaults to the search directories).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },

    /// List entries that carry an identifier.
    #[command(
        long_about = "Walk DIR (default: every store directory) and emit one item per\n\
entry whose name carries an identifier, with its decomposed name.\n\n\
Examples:\n\
  idlink scan\n\
  idlink scan ~/archive --max-depth 1\n"
    )]
    Scan {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Maximum directory depth.
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Include hidden entries.
        #[arg(long)]
        hidden: bool,
    },

    /// List links in a text file with their resolution.
    #[command(
        long_about = "Parse [[type:target][description]] links and inline id: markers in FILE.\n\
Link types listed in `link_types` are resolved; others pass through unchanged.\n\n\
Example:\n\
  idlink links notes.org --format md\n"
    )]
    Links {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Check search tools and configured directories.
    #[command(
        long_about = "Report whether fd is installed, which search backend is selected,\n\
and whether each configured directory exists.\n\n\
Example:\n\
  idlink doctor\n"
    )]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum IdCommands {
    /// Generate a new identifier from the current local time.
    New,

    /// Extract the first identifier from TEXT.
    Extract {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Only accept identifiers written as id:IDENTIFIER.
        #[arg(long)]
        inline: bool,
    },

    /// Embed an identifier into NAME.
    #[command(
        long_about = "Print NAME with an identifier embedded. Names that already carry\n\
one are printed unchanged.\n\n\
Examples:\n\
  idlink id embed report.pdf\n\
  idlink id embed projects --dir --position head\n"
    )]
    Embed {
        #[arg(value_name = "NAME")]
        name: String,

        /// Treat NAME as a directory (no extension split).
        #[arg(long)]
        dir: bool,

        /// Use this identifier instead of generating one (ignored unless valid).
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Remove the identifier from NAME.
    Strip {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

impl Commands {
    /// Whether the command reads configuration. The string-only `id`
    /// commands run even when the config file is broken.
    pub fn needs_config(&self) -> bool {
        !matches!(
            self,
            Commands::Id {
                action: IdCommands::New | IdCommands::Extract { .. } | IdCommands::Strip { .. }
            }
        )
    }
}

/// Load configuration and apply command-line overrides
pub fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if !cli.store_dirs.is_empty() {
        config = config.with_store_dirs(cli.store_dirs.iter().map(|d| expand_home(d)).collect());
    }
    if !cli.search_dirs.is_empty() {
        config =
            config.with_search_dirs(cli.search_dirs.iter().map(|d| expand_home(d)).collect());
    }
    if let Some(position) = &cli.position {
        config.id_position = position.parse::<IdPosition>().map_err(|e| anyhow!(e))?;
    }
    if let Some(backend) = &cli.backend {
        config.search_backend = backend.parse::<SearchBackend>().map_err(|e| anyhow!(e))?;
    }

    debug!(?config, "Effective configuration");
    Ok(config)
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let config = if cli.command.needs_config() {
        build_config(&cli)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Resolve { paths } => {
            crate::resolve::api::run_resolve(&config, &paths, render_config)
        }

        Commands::Id { action } => match action {
            IdCommands::New => crate::ident::api::run_new(render_config),
            IdCommands::Extract { text, inline } => {
                crate::ident::api::run_extract(&text, inline, render_config)
            }
            IdCommands::Embed { name, dir, id } => crate::ident::api::run_embed(
                &name,
                dir,
                id.as_deref(),
                config.id_position,
                render_config,
            ),
            IdCommands::Strip { name } => crate::ident::api::run_strip(&name, render_config),
        },

        Commands::Tag { paths, id } => crate::filing::tag::run_tag(
            &paths,
            id.as_deref(),
            config.id_position,
            render_config,
        ),

        Commands::Store { paths, into, copy } => crate::filing::store::run_store(
            &config,
            &paths,
            into.as_deref(),
            copy,
            render_config,
        ),

        Commands::Find { id, dir, recursive } => crate::backends::search::run_find(
            &config,
            &id,
            dir.as_deref(),
            recursive,
            render_config,
        ),

        Commands::Scan {
            dir,
            max_depth,
            hidden,
        } => {
            let dirs = match dir {
                Some(d) => vec![expand_home(&d)],
                None => config.store_dirs.clone(),
            };
            crate::backends::scan::run_scan(&dirs, max_depth, hidden, render_config)
        }

        Commands::Links { file } => crate::links::api::run_links(&config, &file, render_config),

        Commands::Doctor => crate::backends::doctor::run_doctor(&config, render_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_codec_commands_skip_config() {
        let cli = Cli::parse_from(["idlink", "id", "strip", "a--20240101T120000.txt"]);
        assert!(!cli.command.needs_config());
        let cli = Cli::parse_from(["idlink", "id", "embed", "a.txt"]);
        assert!(cli.command.needs_config());
        let cli = Cli::parse_from(["idlink", "doctor"]);
        assert!(cli.command.needs_config());
    }

    #[test]
    fn test_overrides_apply() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "store_dirs = [\"/from/file\"]\n").unwrap();

        let cli = Cli::parse_from([
            "idlink",
            "--config",
            config_path.to_str().unwrap(),
            "--store-dir",
            "/a",
            "--position",
            "head",
            "--backend",
            "walk",
            "doctor",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.store_dirs, vec![PathBuf::from("/a")]);
        assert_eq!(config.id_position, IdPosition::Head);
        assert_eq!(config.search_backend, SearchBackend::Walk);
    }

    #[test]
    fn test_bad_position_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let cli = Cli::parse_from([
            "idlink",
            "--config",
            config_path.to_str().unwrap(),
            "--position",
            "middle",
            "doctor",
        ]);
        assert!(build_config(&cli).is_err());
    }
}
