use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use directories::BaseDirs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RendererChoice};
use crate::parsers::load_entries;
use crate::services::{demo_entries, Aggregator, GridBuilder, YearCursor};
use crate::tui::{
    self,
    app::ViewOptions,
    theme::Theme,
    widgets::grid::{BlockRenderer, ContributionGridView},
    App,
};
use crate::types::{Entry, LevelThresholds};

/// Calendar contribution grid for habit and task completions
#[derive(Parser, Debug)]
#[command(name = "contribgrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive grid (default)
    Tui,

    /// Print the grid for one year
    Grid {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print per-day completion counts
    Counts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct GlobalArgs {
    /// Entry file or glob pattern (.json / .jsonl); repeat for more
    #[arg(
        short = 'd',
        long = "data",
        value_name = "PATTERN",
        action = ArgAction::Append,
        global = true
    )]
    data: Vec<String>,

    /// Use generated demo data instead of files
    #[arg(long, global = true)]
    demo: bool,

    /// Year to display (clamped to the current year)
    #[arg(short = 'y', long, global = true)]
    year: Option<i32>,

    /// Four comma-separated level thresholds, e.g. "1,2,4,6"
    #[arg(short = 't', long, value_name = "LIST", global = true)]
    thresholds: Option<LevelThresholds>,

    /// Config file (default ~/.contribgrid/config.json)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Square drawing style
    #[arg(long, value_enum, global = true)]
    renderer: Option<RendererChoice>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    quiet: u8,
}

/// Command-line flags merged over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    thresholds: LevelThresholds,
    renderer: RendererChoice,
    /// Patterns with `~` expanded
    data: Vec<String>,
    year: Option<i32>,
    demo: bool,
}

impl Settings {
    fn resolve(args: &GlobalArgs, config: &Config) -> Self {
        let data = if args.data.is_empty() {
            &config.data
        } else {
            &args.data
        };
        Self {
            thresholds: args.thresholds.unwrap_or(config.thresholds),
            renderer: args.renderer.unwrap_or(config.renderer),
            data: data.iter().map(|p| expand_home(p)).collect(),
            year: args.year,
            demo: args.demo,
        }
    }

    fn year(&self, today: NaiveDate) -> i32 {
        YearCursor::new(self.year.unwrap_or(today.year()), today).year()
    }

    fn entries(&self) -> anyhow::Result<Vec<Entry>> {
        if self.demo {
            return Ok(demo_entries(Local::now().naive_local()));
        }
        if self.data.is_empty() {
            bail!(
                "no entry files given: pass --data <PATTERN>, set \"data\" in the config file, or use --demo"
            );
        }
        Ok(load_entries(&self.data)?)
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let is_tui = matches!(self.command, None | Some(Commands::Tui));
        let log_file = if is_tui { Config::log_path() } else { None };
        init_tracing(self.global.verbose, self.global.quiet, log_file.as_deref())?;

        let config = Config::load(self.global.config.as_deref())?;
        let settings = Settings::resolve(&self.global, &config);
        debug!(?settings, "resolved settings");

        let entries = settings.entries()?;
        let today = Local::now().date_naive();

        match self.command {
            None | Some(Commands::Tui) => {
                // Detect before raw mode is entered
                let theme = Theme::from_choice(config.theme);
                let mut view = ViewOptions::from_config(&config, theme)?;
                view.renderer = settings.renderer;

                let app = App::new(
                    entries,
                    GridBuilder::new(settings.thresholds),
                    settings.year(today),
                    today,
                    view,
                );
                tui::run(app)
            }
            Some(Commands::Grid { json }) => {
                let completions = Aggregator::completions_local(&entries);
                let grid = GridBuilder::new(settings.thresholds).build(
                    &completions,
                    settings.year(today),
                    today,
                );

                if json {
                    println!("{}", serde_json::to_string_pretty(&grid)?);
                } else {
                    println!(
                        "{}: {} completions on {} days",
                        grid.year,
                        grid.total_count(),
                        grid.active_days()
                    );
                    println!();
                    // Colors do not survive plain text; shade glyphs do
                    let view = ContributionGridView::new(&grid)
                        .renderer(&BlockRenderer)
                        .square_size(config.square_width, config.square_spacing)
                        .show_header(false);
                    let width = view.full_width();
                    for line in view.to_plain_lines(width) {
                        println!("{}", line);
                    }
                }
                Ok(())
            }
            Some(Commands::Counts { json }) => {
                let completions = Aggregator::completions_local(&entries);
                let sorted = completions.iter_sorted();

                if json {
                    let map: BTreeMap<_, _> = sorted.into_iter().collect();
                    println!("{}", serde_json::to_string_pretty(&map)?);
                } else {
                    for (day, count) in &sorted {
                        println!("{}  {}", day, count);
                    }
                    println!(
                        "{} completions on {} days",
                        completions.total(),
                        completions.len()
                    );
                }
                Ok(())
            }
        }
    }
}

/// Set up `tracing` output.
///
/// `RUST_LOG` wins; otherwise the level follows `-v`/`-q` (default warn).
/// With `log_file`, output is appended there instead of stderr so it never
/// lands on the TUI screen.
pub fn init_tracing(verbose: u8, quiet: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);

    let init_result = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Replace a leading `~` with the home directory
fn expand_home(pattern: &str) -> String {
    let rest = match pattern.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return pattern.to_string(),
    };
    match BaseDirs::new() {
        Some(dirs) => format!("{}{}", dirs.home_dir().display(), rest),
        None => pattern.to_string(),
    }
}
