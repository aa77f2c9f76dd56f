use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{Read as _, Write};
use std::path::{Path, PathBuf};
use stocklens::config::{self, AppConfig, Limits};
use stocklens::dataset::Datasets;
use stocklens::query::DashboardQuery;
use stocklens::render;

#[derive(Parser)]
#[command(
    name = "stocklens",
    version,
    about = "Inventory optimization dashboard over inventory and consumption snapshots"
)]
pub struct Cli {
    /// Path to a JSON settings file. Defaults to the platform config directory.
    #[arg(long, global = true, env = "STOCKLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Inventory table (CSV, Parquet, JSON or a spreadsheet workbook)
    #[arg(long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Consumption table (same formats as the inventory)
    #[arg(long, global = true)]
    pub consumption: Option<PathBuf>,

    /// Worksheet of the inventory workbook. Defaults to the first sheet.
    #[arg(long, global = true)]
    pub inventory_sheet: Option<String>,

    /// Worksheet of the consumption workbook. Defaults to the first sheet.
    #[arg(long, global = true)]
    pub consumption_sheet: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a one-shot report for a set of material IDs
    Report {
        /// Material IDs separated by commas or newlines
        #[arg(long, conflicts_with = "ids_file", required_unless_present = "ids_file")]
        ids: Option<String>,

        /// Read the material IDs from a file, or `-` for stdin
        #[arg(long)]
        ids_file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Open the interactive dashboard window
    Dashboard,
    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a settings file from the defaults and any command-line overrides
    Init {
        /// Replace an existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Show where settings and today's log file live
    Paths,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config::get_config_path)
    }

    /// Loads the settings file and applies command-line overrides.
    fn app_config(&self) -> Result<AppConfig> {
        let mut app_config = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => config::load_app_config(),
        };
        self.apply_overrides(&mut app_config);
        Ok(app_config)
    }

    fn apply_overrides(&self, app_config: &mut AppConfig) {
        if let Some(path) = &self.inventory {
            app_config.inventory_path.clone_from(path);
        }
        if let Some(path) = &self.consumption {
            app_config.consumption_path.clone_from(path);
        }
        if self.inventory_sheet.is_some() {
            app_config.inventory_sheet.clone_from(&self.inventory_sheet);
        }
        if self.consumption_sheet.is_some() {
            app_config.consumption_sheet.clone_from(&self.consumption_sheet);
        }
    }

    /// Loads both tables with the effective settings.
    fn load_datasets(&self) -> Result<(Datasets, Limits)> {
        let app_config = self.app_config()?;
        let limits = app_config.limits()?;
        let datasets = Datasets::load(&app_config.sources())?;
        Ok((datasets, limits))
    }
}

pub fn run(mut cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command.take().unwrap_or(Commands::Dashboard) {
        Commands::Report {
            ids,
            ids_file,
            format,
        } => {
            let (datasets, limits) = cli.load_datasets()?;
            let input = match (ids, ids_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_ids_file(&path)?,
                (None, None) => anyhow::bail!("Either --ids or --ids-file is required"),
            };

            let report = DashboardQuery::new(&datasets, limits).run(&input)?;
            match format {
                OutputFormat::Text => render::render_text(&report, out)?,
                OutputFormat::Json => writeln!(out, "{}", render::to_json(&report)?)?,
            }
            out.flush()?;
            Ok(())
        }
        Commands::Dashboard => {
            let (datasets, limits) = cli.load_datasets()?;
            stocklens::dashboard::run(datasets, limits)
        }
        Commands::Config { action } => run_config(&cli, action, out),
    }
}

fn run_config(cli: &Cli, action: ConfigAction, out: &mut impl Write) -> Result<()> {
    let path = cli.config_path();
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Settings file {} already exists; pass --force to replace it",
                    path.display()
                );
            }
            let mut app_config = AppConfig::default();
            cli.apply_overrides(&mut app_config);
            config::save_app_config(&app_config, &path)
                .with_context(|| format!("Failed to write settings to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Settings file written");
            writeln!(out, "Wrote settings to {}", path.display())?;
        }
        ConfigAction::Paths => {
            writeln!(out, "config: {}", path.display())?;
            match stocklens::logging::get_current_log_path() {
                Ok(log_path) => writeln!(out, "log:    {}", log_path.display())?,
                Err(e) => writeln!(out, "log:    unavailable ({e:#})")?,
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn read_ids_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read material IDs from stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read material IDs from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use std::ffi::OsStr;
    use tempfile::tempdir;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::try_parse_from([
            "stocklens",
            "--inventory",
            "inv.csv",
            "report",
            "--ids",
            "10,20",
            "--format",
            "json",
        ]);
        let Ok(cli) = cli else {
            panic!("arguments should parse");
        };
        assert_eq!(cli.inventory, Some(PathBuf::from("inv.csv")));
        let Some(Commands::Report { ids, format, .. }) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(ids.as_deref(), Some("10,20"));
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_report_needs_exactly_one_id_source() {
        assert!(Cli::try_parse_from(["stocklens", "report"]).is_err());
        assert!(
            Cli::try_parse_from([
                "stocklens",
                "report",
                "--ids",
                "1",
                "--ids-file",
                "ids.txt"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_no_subcommand_defaults_to_dashboard() {
        let Ok(cli) = Cli::try_parse_from(["stocklens", "--inventory-sheet", "Results"]) else {
            panic!("arguments should parse");
        };
        assert!(cli.command.is_none());
        assert_eq!(cli.inventory_sheet.as_deref(), Some("Results"));
        assert_eq!(cli.consumption_sheet, None);
    }

    fn write_settings(dir: &Path) -> Result<PathBuf> {
        let settings = dir.join("settings.json");
        std::fs::write(
            &settings,
            r#"{"inventory_path": "a.xlsx", "consumption_path": "b.xlsx", "top_locations": 3}"#,
        )?;
        Ok(settings)
    }

    #[test]
    fn test_overrides_apply_on_top_of_settings_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let settings = write_settings(temp_dir.path())?;

        let cli = Cli::try_parse_from([
            OsStr::new("stocklens"),
            OsStr::new("--config"),
            settings.as_os_str(),
            OsStr::new("--consumption"),
            OsStr::new("c.csv"),
        ])?;
        let app_config = cli.app_config()?;
        assert_eq!(app_config.inventory_path, PathBuf::from("a.xlsx"));
        assert_eq!(app_config.consumption_path, PathBuf::from("c.csv"));
        assert_eq!(app_config.top_locations, 3);
        Ok(())
    }

    #[test]
    fn test_sheet_overrides_stay_with_their_table() -> Result<()> {
        let temp_dir = tempdir()?;
        let settings = write_settings(temp_dir.path())?;

        let cli = Cli::try_parse_from([
            OsStr::new("stocklens"),
            OsStr::new("--config"),
            settings.as_os_str(),
            OsStr::new("--inventory-sheet"),
            OsStr::new("Results"),
        ])?;
        let sources = cli.app_config()?.sources();
        assert_eq!(sources.inventory_sheet.as_deref(), Some("Results"));
        assert_eq!(sources.consumption_sheet, None);

        let cli = Cli::try_parse_from([
            OsStr::new("stocklens"),
            OsStr::new("--config"),
            settings.as_os_str(),
            OsStr::new("--consumption-sheet"),
            OsStr::new("Movements"),
        ])?;
        let sources = cli.app_config()?.sources();
        assert_eq!(sources.inventory_sheet, None);
        assert_eq!(sources.consumption_sheet.as_deref(), Some("Movements"));
        Ok(())
    }

    #[test]
    fn test_config_init_writes_loadable_settings() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("stocklens").join("config.json");
        let args = [
            OsStr::new("stocklens"),
            OsStr::new("--config"),
            path.as_os_str(),
            OsStr::new("--consumption-sheet"),
            OsStr::new("Movements"),
            OsStr::new("config"),
            OsStr::new("init"),
        ];

        let mut out = Vec::new();
        run(Cli::try_parse_from(args)?, &mut out)?;
        assert!(String::from_utf8_lossy(&out).contains("Wrote settings"));

        let saved = config::load_config_from(&path)?;
        assert_eq!(saved.consumption_sheet.as_deref(), Some("Movements"));
        assert_eq!(saved.top_locations, config::DEFAULT_TOP_LOCATIONS);

        let again = run(Cli::try_parse_from(args)?, &mut Vec::new());
        assert!(again.is_err(), "an existing settings file needs --force");
        Ok(())
    }

    #[test]
    fn test_config_paths_lists_settings_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("config.json");
        let cli = Cli::try_parse_from([
            OsStr::new("stocklens"),
            OsStr::new("config"),
            OsStr::new("paths"),
            OsStr::new("--config"),
            path.as_os_str(),
        ])?;

        let mut out = Vec::new();
        run(cli, &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains(&path.display().to_string()), "{text}");
        assert!(text.contains("log:"));
        Ok(())
    }
}
