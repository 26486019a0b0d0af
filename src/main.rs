use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use virtual_explorer::catalog::Variant;
use virtual_explorer::config::{load_config, load_config_from, Config};
use virtual_explorer::gestures::CommandRegistry;
use virtual_explorer::host::SystemHost;
use virtual_explorer::logging;
use virtual_explorer::plugin::{FavoritesPlugin, Lifecycle, PluginSettings};
use virtual_explorer::stdin_commands;

#[derive(Parser)]
#[command(
    name = "virtual-explorer",
    version,
    about = "Favorite paths and a virtual file explorer for screen-reader users"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file to use instead of the one in the data directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog flavor, overrides the config file
    #[arg(long, global = true, value_enum)]
    variant: Option<VariantArg>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum VariantArg {
    Basic,
    Extended,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Basic => Variant::Basic,
            VariantArg::Extended => Variant::Extended,
        }
    }
}

#[derive(clap::Subcommand)]
enum Command {
    /// Read JSONL commands from stdin (default)
    Run,
    /// Save a new favorite path
    Add {
        path: String,
        identifier: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Print saved paths, pinned first
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        identifier: String,
    },
    Rename {
        old_identifier: String,
        new_identifier: String,
    },
    /// Pin a path to the top of its list
    Fix {
        path: String,
        identifier: String,
    },
    Unfix {
        path: String,
        identifier: String,
    },
    RenameCategory {
        old: String,
        new: String,
    },
    /// Print the active gesture bindings
    Bindings,
}

fn resolve_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    if let Some(variant) = cli.variant {
        config.variant = variant.into();
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.to_string_lossy().into_owned());
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    // Must stay alive until exit so the log file gets flushed
    let _guard = logging::init(&config.log_dir());
    info!(
        event_type = "app_lifecycle",
        action = "started",
        variant = config.variant.name(),
        data_dir = %config.data_dir().display(),
        "virtual-explorer starting"
    );

    std::fs::create_dir_all(config.data_dir())
        .with_context(|| format!("Failed to create {}", config.data_dir().display()))?;

    let settings = PluginSettings::from_config(&config);
    let mut plugin = FavoritesPlugin::new(settings, SystemHost).context("Failed to open favorites")?;
    plugin.init().context("Failed to initialize favorites")?;

    // Dialog callbacks speak their own outcome; the exit code reflects it
    let outcome = match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let stdin = io::stdin();
            stdin_commands::run_commands(stdin.lock(), &mut plugin)
                .context("Failed to read commands from stdin")
        }
        Command::Add {
            path,
            identifier,
            category,
        } => plugin
            .add_path(&path, &identifier, category.as_deref())
            .map_err(Into::into),
        Command::List { category } => {
            for row in plugin.listing(category.as_deref()) {
                println!("{}", row);
            }
            Ok(())
        }
        Command::Delete { identifier } => plugin.delete_path(&identifier).map_err(Into::into),
        Command::Rename {
            old_identifier,
            new_identifier,
        } => plugin
            .rename_path(&old_identifier, &new_identifier)
            .map_err(Into::into),
        Command::Fix { path, identifier } => plugin.fix_path(&path, &identifier).map_err(Into::into),
        Command::Unfix { path, identifier } => {
            plugin.unfix_path(&path, &identifier).map_err(Into::into)
        }
        Command::RenameCategory { old, new } => {
            plugin.rename_category(&old, &new).map_err(Into::into)
        }
        Command::Bindings => {
            for (gesture, command) in plugin.bindings() {
                println!("{:<28} {}", gesture, command);
            }
            Ok(())
        }
    };

    plugin.terminate().context("Failed to close favorites")?;
    outcome
}
