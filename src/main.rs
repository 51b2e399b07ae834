use clap::Parser;
use eyre::{Context, Result, eyre};
use log::{LevelFilter, error};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wp2md::importer::{DEFAULT_TABLE_PREFIX, validate_table_prefix};
use wp2md::sequential;
use wp2md::utils::ExportConfig;

const DEFAULT_CONTENT_DIRECTORY: &str = "posts";

/// Migrate WordPress posts from a SQLite export to Markdown files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the WordPress SQLite database.
    #[arg(value_name = "DB_PATH")]
    db_path: PathBuf,

    /// Directory to write markdown files into.
    /// Defaults to ./posts if not set in the environment or config.
    #[arg(long, value_name = "DIR", env = "CONTENT_DIRECTORY")]
    content_dir: Option<PathBuf>,

    /// WordPress table prefix (e.g. "wp_").
    #[arg(long, value_name = "PREFIX")]
    table_prefix: Option<String>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/wp2md/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug detail for each post.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default, Debug)]
struct FileConfig {
    content_directory: Option<PathBuf>,
    table_prefix: Option<String>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("wp2md/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn resolve_config(cli: Cli, file_cfg: FileConfig) -> Result<ExportConfig> {
    // CLI/env > config file > default
    let target_dir = cli
        .content_dir
        .or(file_cfg.content_directory)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIRECTORY));

    let table_prefix = cli
        .table_prefix
        .or(file_cfg.table_prefix)
        .unwrap_or_else(|| DEFAULT_TABLE_PREFIX.to_string());
    validate_table_prefix(&table_prefix)?;

    Ok(ExportConfig {
        db_path: cli.db_path,
        target_dir,
        table_prefix,
    })
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file_cfg = load_file_config(cli.config.as_deref())?;
    let config = resolve_config(cli, file_cfg)?;
    sequential::execute(&config)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wp2md").chain(args.iter().copied())).unwrap()
    }

    // Built directly so CONTENT_DIRECTORY in the test environment cannot leak in.
    fn bare_cli() -> Cli {
        Cli {
            db_path: PathBuf::from("site.db"),
            content_dir: None,
            table_prefix: None,
            config: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn db_path_is_required() {
        assert!(Cli::try_parse_from(["wp2md"]).is_err());
    }

    #[test]
    fn content_dir_falls_back_to_environment() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "content_dir")
            .unwrap();
        assert_eq!(arg.get_env(), Some(OsStr::new("CONTENT_DIRECTORY")));
        assert_eq!(arg.get_long(), Some("content-dir"));
    }

    #[test]
    fn cli_flag_wins_over_config_file() {
        let file_cfg = FileConfig {
            content_directory: Some(PathBuf::from("from-file")),
            table_prefix: Some("blog_".to_string()),
        };
        let config = resolve_config(
            cli(&["site.db", "--content-dir", "out", "--table-prefix", "x_"]),
            file_cfg,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("site.db"));
        assert_eq!(config.target_dir, PathBuf::from("out"));
        assert_eq!(config.table_prefix, "x_");
    }

    #[test]
    fn config_file_fills_gaps() {
        let file_cfg = FileConfig {
            content_directory: Some(PathBuf::from("from-file")),
            table_prefix: Some("blog_".to_string()),
        };
        let config = resolve_config(bare_cli(), file_cfg).unwrap();
        assert_eq!(config.target_dir, PathBuf::from("from-file"));
        assert_eq!(config.table_prefix, "blog_");
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = resolve_config(bare_cli(), FileConfig::default()).unwrap();
        assert_eq!(config.target_dir, PathBuf::from("posts"));
        assert_eq!(config.table_prefix, "wp_");
    }

    #[test]
    fn bad_prefix_is_fatal() {
        let file_cfg = FileConfig {
            content_directory: None,
            table_prefix: Some("wp; --".to_string()),
        };
        assert!(resolve_config(bare_cli(), file_cfg).is_err());
    }

    #[test]
    fn loads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "content_directory = \"content/posts\"\ntable_prefix = \"blog_\"\n",
        )
        .unwrap();
        let cfg = load_file_config(Some(&path)).unwrap();
        assert_eq!(cfg.content_directory, Some(PathBuf::from("content/posts")));
        assert_eq!(cfg.table_prefix.as_deref(), Some("blog_"));
    }

    #[test]
    fn missing_or_malformed_config_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file_config(Some(&dir.path().join("absent.toml"))).is_err());

        let path = dir.path().join("bad.toml");
        fs::write(&path, "content_directory = [").unwrap();
        assert!(load_file_config(Some(&path)).is_err());
    }
}
