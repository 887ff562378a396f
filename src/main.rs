use clap::{Parser, Subcommand};
use invite_media::config::{self, DEFAULT_CONFIG_FILE};
use invite_media::imaging::RustBackend;
use invite_media::migrate::{MigrationConfig, Migrator, RunSummary};
use invite_media::store::SqliteStore;
use invite_media::{diagnostics, output, sitemap};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status of a migration that completed with failed records.
const EXIT_PARTIAL_FAILURE: u8 = 2;

/// 0 for a clean run, 2 when any record failed.
fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.has_failures() {
        ExitCode::from(EXIT_PARTIAL_FAILURE)
    } else {
        ExitCode::SUCCESS
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            concat!(env!("CARGO_PKG_VERSION"), "-dev")
        } else {
            // Leaked once; called a single time at startup
            Box::leak(format!("{}-dev@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "invite-media")]
#[command(about = "Thumbnail, sitemap and diagnostics tooling for the invitation template shop")]
#[command(long_about = "\
Thumbnail, sitemap and diagnostics tooling for the invitation template shop

Reads the template catalogue from SQLite and the settings from a TOML file.

Layout:

  invite-media.toml               # Settings (run 'invite-media gen-config')
  data/invitations.db             # Template catalogue (read-only)
  public/                         # Document root
  └── uploads/templates/
      ├── bday.jpg                # Source thumbnail (/uploads/templates/bday.jpg)
      ├── bday-315w.webp          # Generated variants
      ├── bday-472w.webp
      └── bday-630w.webp

Exit status of 'migrate': 0 all good, 2 some templates failed, 1 fatal error.

Set RUST_LOG=debug for detailed logs on stderr.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate responsive WebP variants for every template thumbnail
    Migrate,
    /// Write sitemap.xml from static routes and active templates
    Sitemap {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Generation date used for lastmod (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// Report paths, database, encoder and lock state
    Diagnostics {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let app_config = config::load_config(&cli.config)?;
            let store = SqliteStore::open(&app_config.database)?;
            let backend = RustBackend::new();
            let migrator = Migrator::new(
                MigrationConfig::from_app_config(&app_config),
                &store,
                &backend,
            );

            output::print_lines(&output::format_migration_header());
            let summary = migrator.run(output::print_migration_event)?;
            output::print_lines(&output::format_summary(&summary));
            return Ok(exit_code(&summary));
        }
        Command::Sitemap { output: out, date } => {
            let app_config = config::load_config(&cli.config)?;
            let store = SqliteStore::open(&app_config.database)?;
            let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let xml = sitemap::generate_sitemap(&app_config.sitemap, &store, today)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, xml)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{}", xml),
            }
        }
        Command::Diagnostics { json } => {
            let (app_config, found) = config::load_config_or_default(&cli.config)?;
            let store = SqliteStore::open(&app_config.database);
            let report =
                diagnostics::collect(version_string(), &app_config, &cli.config, found, store);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_lines(&output::format_diagnostics(&report));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
