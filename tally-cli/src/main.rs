use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tally_core::{
    Budget, PeriodKind, Receipt, SpendingGoal, budget_progress, categorize_store, goal_progress,
    is_subscription_merchant, period_label, resolve_window,
};
use tally_finance::dashboard::{BudgetCard, GoalCard};
use tally_finance::{Dashboard, DashboardInput, SummaryView, parse_receipts_csv};
use tally_ingest::{
    parse_budgets_json, parse_goals_json, parse_merchants_json, parse_receipts_json,
    parse_summary_json,
};
use tracing::debug;

mod config;
mod logging;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Spending dashboard analytics from receipts, budgets and goals"
)]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spending dashboard for one week, month or year
    Dashboard {
        /// Receipts export: .csv, or a JSON list/page from the API (`-` reads JSON from stdin)
        #[arg(long)]
        receipts: PathBuf,

        /// Budgets JSON
        #[arg(long)]
        budgets: Option<PathBuf>,

        /// Spending goals JSON
        #[arg(long)]
        goals: Option<PathBuf>,

        /// week, month or year (default from config)
        #[arg(long)]
        period: Option<PeriodKind>,

        /// Periods from the current one; negative is the past
        #[arg(long, allow_negative_numbers = true, conflicts_with = "latest")]
        offset: Option<i32>,

        /// Open on the newest period with receipts (the default)
        #[arg(long)]
        latest: bool,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render a summary payload fetched from the API
    Summary {
        /// Summary endpoint JSON (`-` for stdin)
        #[arg(long)]
        summary: PathBuf,

        /// Top merchants endpoint JSON
        #[arg(long)]
        merchants: Option<PathBuf>,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Progress and projection for every budget
    Budgets {
        #[arg(long)]
        budgets: PathBuf,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Progress for every monthly spending goal
    Goals {
        #[arg(long)]
        goals: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Resolve a period window
    Window {
        #[arg(long)]
        period: Option<PeriodKind>,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Guess the category of a store name
    Categorize {
        #[arg(required = true, num_args = 1..)]
        store: Vec<String>,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Dashboard { receipts, budgets, goals, period, offset, latest, today, json } => {
            let cfg = config::load_config()?;
            let today = resolve_today(today, &cfg)?;
            let receipts = load_receipts(&receipts)?;
            let budgets = budgets.as_deref().map(load_budgets).transpose()?.unwrap_or_default();
            let goals = goals.as_deref().map(load_goals).transpose()?.unwrap_or_default();

            let input = DashboardInput {
                receipts: &receipts,
                budgets: &budgets,
                goals: &goals,
                kind: period.unwrap_or(cfg.dashboard.default_period),
                offset: if latest { None } else { offset },
            };
            let dash = Dashboard::assemble(input, today, &cfg.dashboard_config());
            emit(&dash, json, report::render_dashboard)?;
        }

        Command::Summary { summary, merchants, today, json } => {
            let cfg = config::load_config()?;
            let today = resolve_today(today, &cfg)?;
            let summary = parse_summary_json(&read(&summary)?)
                .with_context(|| format!("parsing {}", summary.display()))?;
            let merchants = match merchants {
                Some(p) => parse_merchants_json(&read(&p)?)
                    .with_context(|| format!("parsing {}", p.display()))?,
                None => Vec::new(),
            };
            let view = SummaryView::build(&summary, &merchants, today, &cfg.dashboard_config());
            emit(&view, json, report::render_summary)?;
        }

        Command::Budgets { budgets, today, json } => {
            let cfg = config::load_config()?;
            let today = resolve_today(today, &cfg)?;
            let cards: Vec<BudgetCard> = load_budgets(&budgets)?
                .into_iter()
                .map(|b| BudgetCard { progress: budget_progress(&b, today), budget: b })
                .collect();
            emit(&cards, json, |cards| {
                if cards.is_empty() {
                    return "No budgets.\n".to_string();
                }
                cards.iter().map(|c| report::render_budget(c) + "\n").collect()
            })?;
        }

        Command::Goals { goals, json } => {
            let cards: Vec<GoalCard> = load_goals(&goals)?
                .into_iter()
                .map(|g| GoalCard { progress: goal_progress(&g), goal: g })
                .collect();
            emit(&cards, json, |cards| {
                if cards.is_empty() {
                    return "No spending goals.\n".to_string();
                }
                cards.iter().map(|c| report::render_goal(c) + "\n").collect()
            })?;
        }

        Command::Window { period, offset, today } => {
            let cfg = config::load_config()?;
            let today = resolve_today(today, &cfg)?;
            let kind = period.unwrap_or(cfg.dashboard.default_period);
            let window = resolve_window(kind, offset, today);
            debug!(label = %period_label(kind, &window), "resolved window");
            println!("{}", report::render_window(kind, offset, &window));
        }

        Command::Categorize { store } => {
            let name = store.join(" ");
            let result = categorize_store(&name);
            println!("{name}: {} ({:?})", result.category, result.source);
            if is_subscription_merchant(&name) {
                println!("recurring subscription");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn resolve_today(flag: Option<NaiveDate>, cfg: &config::Config) -> Result<NaiveDate> {
    match flag {
        Some(d) => Ok(d),
        None => tally_core::time::today_in(&cfg.locale.timezone)
            .with_context(|| format!("resolving today in {}", cfg.locale.timezone)),
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, json: bool, text: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

/// File contents, or all of stdin for `-`.
fn read(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("read stdin")?;
        return Ok(buf);
    }
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_receipts(path: &Path) -> Result<Vec<Receipt>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let receipts = if is_csv {
        parse_receipts_csv(path)?
    } else {
        let page = parse_receipts_json(&read(path)?)
            .with_context(|| format!("parsing {}", path.display()))?;
        if page.total_pages.is_some_and(|n| n > 1) {
            tracing::warn!(pages = ?page.total_pages, "receipts file holds one page of several");
        }
        page.receipts
    };
    debug!(count = receipts.len(), path = %path.display(), "loaded receipts");
    Ok(receipts)
}

fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    parse_budgets_json(&read(path)?).with_context(|| format!("parsing {}", path.display()))
}

fn load_goals(path: &Path) -> Result<Vec<SpendingGoal>> {
    parse_goals_json(&read(path)?).with_context(|| format!("parsing {}", path.display()))
}
