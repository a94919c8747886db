//! Trade Journal
//!
//! Command-line front end over a JSON-backed trading journal.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use trade_journal::{
    aggregate::TradeWithPnl,
    analytics::strategy_breakdown,
    capital::{parse_initial_capital, CapitalPatch},
    config::Config,
    format::{
        format_currency, format_leverage, format_metric, format_percent, format_ratio,
        format_text, format_truncated,
    },
    journal::JournalView,
    pnl::EntryPreview,
    store::JournalStore,
    types::Trade,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "trade-journal")]
#[command(about = "P&L and performance metrics for a trading journal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "journal.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show capital and summary metrics
    Dashboard,
    /// List closed trades with running capital
    Log,
    /// List open positions with their risk
    Open,
    /// Net P&L per strategy
    Strategies,
    /// Add a trade from a JSON record
    Add {
        /// Trade record (camelCase keys); any id is replaced
        json: String,
    },
    /// Delete a trade by id
    Delete { id: String },
    /// Record a capital deposit
    Deposit { amount: f64 },
    /// Set the initial capital
    SetInitial {
        /// Unparsable input counts as zero
        amount: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;
    let store = open_store(&config)?;

    match cli.command {
        Commands::Dashboard => show_dashboard(&config, &store),
        Commands::Log => show_log(&config, &store),
        Commands::Open => show_open(&config, &store),
        Commands::Strategies => show_strategies(&config, &store),
        Commands::Add { json } => add_trade(&config, &store, &json),
        Commands::Delete { id } => delete_trade(&config, &store, &id),
        Commands::Deposit { amount } => deposit(&config, &store, amount),
        Commands::SetInitial { amount } => set_initial(&config, &store, &amount),
    }
}

/// Open the journal file, seeding capital from config when it does not exist.
fn open_store(config: &Config) -> anyhow::Result<JournalStore> {
    let path = Path::new(&config.store.path);
    let is_new = !path.exists();
    let store = JournalStore::open(path)
        .with_context(|| format!("Failed to open journal {}", path.display()))?
        .with_autosave(config.store.autosave);

    if is_new {
        store.update_capital(CapitalPatch {
            initial: Some(config.capital.initial),
            deposits: Some(config.capital.deposits),
        });
    }
    Ok(store)
}

/// Persist explicitly when write-through is off.
fn persist(config: &Config, store: &JournalStore) -> anyhow::Result<()> {
    if !config.store.autosave {
        store.save()?;
    }
    Ok(())
}

fn show_dashboard(config: &Config, store: &JournalStore) -> anyhow::Result<()> {
    let places = config.display.summary_precision;
    let view = JournalView::compute(&store.snapshot());
    let dashboard = view.dashboard;

    println!("\n📊 Dashboard\n");
    println!("Initial Capital:   {}", format_currency(Some(view.capital.initial), places));
    println!("Deposits:          {}", format_currency(Some(view.capital.deposits), places));
    println!("Current Capital:   {}", format_currency(Some(dashboard.current_capital), places));
    println!("Total P&L:         {}", format_currency(Some(dashboard.total_pnl), places));

    if !dashboard.has_trades() {
        println!("\nNo closed trades yet");
        return Ok(());
    }

    println!("Trades:            {}", dashboard.trade_count);
    println!("Win Rate:          {}", format_percent(Some(dashboard.win_rate), places));
    println!(
        "Profit Factor:     {}",
        format_metric(Some(dashboard.profit_factor), "", places)
    );
    println!("Average ROI:       {}", format_percent(dashboard.average_roi, places));
    println!("Average R:R:       {}", format_ratio(dashboard.average_rr_realized));
    println!(
        "Average Risk:      {}",
        format_percent(dashboard.average_account_risk_percent, places)
    );

    if !view.skipped.is_empty() {
        println!("\n⚠️  {} record(s) skipped:", view.skipped.len());
        for skipped in &view.skipped {
            println!("  {}: {}", skipped.id, skipped.reason);
        }
    }
    Ok(())
}

const LOG_HEADERS: [&str; 18] = [
    "Opened", "Pair", "Side", "Entry", "Exit", "Closed", "Size", "Lev", "Margin", "R:R",
    "Risk ($)", "Fees ($)", "P/L ($)", "Asset %", "Margin %", "Capital End", "Real. R:R", "Strategy",
];
const LOG_WIDTHS: [usize; 18] = [18, 12, 6, 14, 14, 18, 14, 5, 14, 6, 14, 14, 14, 12, 12, 16, 10, 12];

/// Trade log cells for one closed trade, in `LOG_HEADERS` order.
fn log_row(t: &TradeWithPnl, places: usize) -> [String; 18] {
    let setup = &t.trade.setup;
    let num = |v: f64| format_truncated(Some(v), places);
    [
        format_text(&setup.date_time),
        format_text(&setup.pair),
        setup.direction.to_string(),
        num(setup.entry_price),
        num(t.trade.exit_price),
        format_text(t.trade.close_date_time.as_deref().unwrap_or_default()),
        num(t.pnl.position_size),
        format_leverage(setup.leverage),
        num(setup.margin),
        format_text(&setup.risk_reward),
        num(t.pnl.risk_amount),
        num(t.trade.fees),
        num(t.pnl.pnl_net),
        format_percent(Some(t.pnl.pnl_asset_percent), places),
        format_percent(Some(t.pnl.pnl_margin_percent), places),
        num(t.capital_end),
        format_ratio(t.pnl.rr_realized),
        format_text(&setup.strategy),
    ]
}

fn print_log_line<S: AsRef<str>>(cells: &[S]) {
    let line = cells
        .iter()
        .zip(LOG_WIDTHS)
        .map(|(cell, width)| format!("{:>width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{line}");
}

fn show_log(config: &Config, store: &JournalStore) -> anyhow::Result<()> {
    let places = config.display.trade_log_precision;
    let view = JournalView::compute(&store.snapshot());
    let rule = "-".repeat(LOG_WIDTHS.iter().sum::<usize>() + LOG_WIDTHS.len() - 1);

    println!("\n📒 Trade Log\n");
    print_log_line(&LOG_HEADERS);
    println!("{rule}");
    for t in &view.closed {
        print_log_line(&log_row(t, places));
    }

    let totals = view.totals;
    println!("{rule}");
    println!(
        "Totals: margin {}  risk {}  fees {}  net P&L {}",
        format_truncated(Some(totals.margin), places),
        format_truncated(Some(totals.risk_amount), places),
        format_truncated(Some(totals.fees), places),
        format_truncated(Some(totals.pnl_net), places),
    );
    Ok(())
}

fn show_open(config: &Config, store: &JournalStore) -> anyhow::Result<()> {
    let places = config.display.summary_precision;
    let view = JournalView::compute(&store.snapshot());

    println!("\n📂 Open Positions: {}\n", view.open.len());
    for position in &view.open {
        let setup = &position.trade.setup;
        let metrics = &position.metrics;
        println!(
            "{} {} {} @ {} ({})",
            setup.id,
            format_text(&setup.pair),
            setup.direction,
            format_truncated(Some(setup.entry_price), config.display.trade_log_precision),
            format_leverage(setup.leverage),
        );
        println!(
            "  size {}  risk {}  stop {}  target {}  R:R {}",
            format_truncated(Some(metrics.position_size), config.display.trade_log_precision),
            format_currency(Some(metrics.risk_amount_actual), places),
            format_percent(metrics.stop_loss_percent, places),
            format_percent(metrics.take_profit_percent, places),
            format_ratio(metrics.rr_planned),
        );
    }
    Ok(())
}

fn show_strategies(config: &Config, store: &JournalStore) -> anyhow::Result<()> {
    let places = config.display.summary_precision;
    let view = JournalView::compute(&store.snapshot());

    println!("\n🧭 Strategies\n");
    println!("{:<24} {:>8} {:>16}", "Strategy", "Trades", "Net P&L");
    println!("{}", "-".repeat(50));
    for row in strategy_breakdown(&view.closed) {
        println!(
            "{:<24} {:>8} {:>16}",
            row.strategy,
            row.trade_count,
            format_currency(Some(row.pnl_net), places),
        );
    }
    Ok(())
}

fn add_trade(config: &Config, store: &JournalStore, json: &str) -> anyhow::Result<()> {
    let trade: Trade = serde_json::from_str(json).context("Invalid trade record")?;
    let preview = EntryPreview::for_trade(&trade);
    let id = store.add_trade(trade);
    persist(config, store)?;
    tracing::info!("Added trade {}", id);

    let places = config.display.summary_precision;
    println!("✅ Added trade {}", id);
    println!(
        "  position {}  size {}  risk {}",
        format_currency(Some(preview.position_value), places),
        format_truncated(Some(preview.position_size), config.display.trade_log_precision),
        format_currency(Some(preview.risk_amount), places),
    );
    Ok(())
}

fn delete_trade(config: &Config, store: &JournalStore, id: &str) -> anyhow::Result<()> {
    store.delete_trade(id)?;
    persist(config, store)?;
    println!("🗑️  Deleted trade {}", id);
    Ok(())
}

fn deposit(config: &Config, store: &JournalStore, amount: f64) -> anyhow::Result<()> {
    let capital = store.add_deposit(amount)?;
    persist(config, store)?;
    println!(
        "✅ Deposits now {}",
        format_currency(Some(capital.deposits), config.display.summary_precision)
    );
    Ok(())
}

fn set_initial(config: &Config, store: &JournalStore, raw: &str) -> anyhow::Result<()> {
    let capital = store.update_capital(CapitalPatch::initial(parse_initial_capital(raw)));
    persist(config, store)?;
    println!(
        "✅ Initial capital set to {}",
        format_currency(Some(capital.initial), config.display.summary_precision)
    );
    Ok(())
}
