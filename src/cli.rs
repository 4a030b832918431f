//! CLI definition, dispatch, and the single-pass trading pipeline.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};

use crate::adapters::alpaca_adapter::AlpacaAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::dry_run_adapter::DryRunAdapter;
use crate::adapters::env_config_adapter::EnvConfigAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report::SvgReportAdapter;
use crate::domain::config::{DataSource, TradingConfig};
use crate::domain::error::CrossgateError;
use crate::domain::gate::{decide_action, Action};
use crate::domain::indicator::sma::{moving_averages, MovingAverages};
use crate::domain::ohlcv::BarSeries;
use crate::domain::order::Order;
use crate::domain::risk::{daily_returns, summarize, RiskSummary};
use crate::domain::signal::{signal_from_averages, Decision};
use crate::domain::timeframe::Resolution;
use crate::logging::{init_logging, LogConfig};
use crate::ports::data_port::DataPort;
use crate::ports::order_port::OrderPort;
use crate::ports::report_port::{ChartLine, ChartPanel, ReportPort};

#[derive(Parser, Debug)]
#[command(name = "crossgate", about = "Moving-average crossover trader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch data, decide, submit the order and render charts
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Log the order instead of sending it
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        no_charts: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the current signal and gated action without trading
    Signal {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything the decision was based on, before any order or chart.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: BarSeries,
    pub averages: MovingAverages,
    pub decision: Decision,
    pub history: BarSeries,
    pub returns: Vec<f64>,
    pub risk: RiskSummary,
}

impl Analysis {
    pub fn action(&self) -> Action {
        decide_action(self.decision, &self.risk)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub decision: Decision,
    pub action: Action,
    pub risk: RiskSummary,
    pub bars: usize,
    pub history_bars: usize,
    pub order: Option<Order>,
}

pub fn run(cli: Cli) -> ExitCode {
    // a second init (e.g. from tests) keeps the existing subscriber
    let _ = init_logging(LogConfig::from_env());

    let result = match cli.command {
        Command::Run {
            config,
            dry_run,
            no_charts,
        } => run_trade(&config, dry_run, no_charts),
        Command::Validate { config } => run_validate(&config),
        Command::Signal { config } => run_signal(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// INI file overlaid with `CROSSGATE_*` / `APCA_*` environment variables,
/// validated and resolved into a [`TradingConfig`].
pub fn load_config(path: &Path) -> Result<TradingConfig, CrossgateError> {
    load_config_with_env(path, std::env::vars().collect())
}

/// [`load_config`] with an explicit variable map instead of the process
/// environment.
pub fn load_config_with_env(
    path: &Path,
    vars: HashMap<String, String>,
) -> Result<TradingConfig, CrossgateError> {
    info!("loading config from {}", path.display());
    let file = FileConfigAdapter::from_file(path)?;
    let config = EnvConfigAdapter::new(file, vars);
    TradingConfig::from_port(&config)
}

pub fn build_data_port(config: &TradingConfig) -> Result<Box<dyn DataPort>, CrossgateError> {
    match config.source {
        DataSource::Alpaca => {
            info!("setting up data feed");
            info!("accessing market via {}", config.broker.data_url);
            info!(key_id = %config.broker.credentials.key_id, "using Alpaca API key");
            Ok(Box::new(AlpacaAdapter::new(&config.broker)?))
        }
        DataSource::Csv => {
            info!("reading bars from {}", config.csv_dir.display());
            Ok(Box::new(CsvAdapter::new(config.csv_dir.clone())))
        }
    }
}

pub fn build_order_port(
    config: &TradingConfig,
    dry_run: bool,
) -> Result<Box<dyn OrderPort>, CrossgateError> {
    if dry_run {
        return Ok(Box::new(DryRunAdapter::new()));
    }
    // csv runs skip the credential check at validation time
    if config.broker.credentials.key_id.trim().is_empty() {
        return Err(CrossgateError::missing("alpaca", "key_id"));
    }
    if config.broker.credentials.secret_key.trim().is_empty() {
        return Err(CrossgateError::missing("alpaca", "secret_key"));
    }
    info!("accessing market via {}", config.broker.base_url);
    Ok(Box::new(AlpacaAdapter::new(&config.broker)?))
}

fn run_trade(config_path: &Path, dry_run: bool, no_charts: bool) -> Result<(), CrossgateError> {
    let config = load_config(config_path)?;
    let data = build_data_port(&config)?;
    let orders = build_order_port(&config, dry_run)?;
    let reporter = SvgReportAdapter::new(config.output_dir.clone());
    let reporter: Option<&dyn ReportPort> = if no_charts { None } else { Some(&reporter) };

    let summary = run_trade_pipeline(&config, data.as_ref(), orders.as_ref(), reporter)?;
    print_summary(&config, &summary, dry_run);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), CrossgateError> {
    let config = load_config(config_path)?;
    info!("config validated successfully");

    println!("Symbol:          {}", config.symbol);
    println!("Resolution:      {}", config.resolution);
    println!("Evaluation:      {} to {}", config.start_date, config.end_date);
    println!("History:         {} to {}", config.history_start, config.end_date);
    println!("Windows:         {} / {}", config.short_window, config.long_window);
    println!("Order:           {} shares, {}", config.quantity, config.time_in_force.as_str());
    println!("VaR confidence:  {:.2}", config.var_confidence);
    println!("Data source:     {:?}", config.source);
    println!("Broker:          {}", config.broker.base_url);
    println!("API key:         {}", config.broker.credentials.key_id);
    println!("Charts:          {}", config.output_dir.display());
    Ok(())
}

fn run_signal(config_path: &Path) -> Result<(), CrossgateError> {
    let config = load_config(config_path)?;
    let data = build_data_port(&config)?;
    let analysis = analyze(&config, data.as_ref())?;
    let action = analysis.action();

    println!("Decision:        {}", analysis.decision);
    println!("Gated action:    {}", action);
    println!("Mean return:     {:.6}", analysis.risk.mean);
    println!(
        "VaR ({:.0}%):       {:.4}%",
        analysis.risk.confidence * 100.0,
        analysis.risk.value_at_risk * 100.0
    );
    Ok(())
}

fn log_series(series: &BarSeries) {
    for bar in series.bars() {
        debug!(
            timestamp = %bar.timestamp,
            open = bar.open,
            high = bar.high,
            low = bar.low,
            close = bar.close,
            volume = bar.volume,
            "bar"
        );
    }
    if let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) {
        info!(
            "retrieved {} frames of symbol {} from {} to {}",
            series.len(),
            series.symbol(),
            first,
            last
        );
    } else {
        info!("retrieved 0 frames of symbol {}", series.symbol());
    }
}

/// Fetch both bar series and compute the decision and risk estimate.
///
/// Insufficient evaluation bars fail before the history request is made.
pub fn analyze(config: &TradingConfig, data: &dyn DataPort) -> Result<Analysis, CrossgateError> {
    let series = data.fetch_bars(
        &config.symbol,
        config.resolution,
        config.start_date,
        config.end_date,
    )?;
    log_series(&series);

    info!("defining signal generation");
    let averages = moving_averages(&series, config.short_window, config.long_window);
    let decision = signal_from_averages(&averages)?;

    info!("estimating value at risk using historical method");
    let history = data.fetch_bars(
        &config.symbol,
        Resolution::daily(),
        config.history_start,
        config.end_date,
    )?;
    log_series(&history);

    let returns = daily_returns(&history.closes())?;
    debug!(?returns, "daily returns");
    let risk = summarize(&returns, config.var_confidence);
    info!(
        mean = risk.mean,
        value_at_risk = risk.value_at_risk,
        confidence = risk.confidence,
        observations = risk.observations,
        "value at risk estimated"
    );

    Ok(Analysis {
        series,
        averages,
        decision,
        history,
        returns,
        risk,
    })
}

/// One full run: analyze, chart the returns, gate, submit, chart the feed.
///
/// Any error ends the run; no order is sent after a failure.
pub fn run_trade_pipeline(
    config: &TradingConfig,
    data: &dyn DataPort,
    orders: &dyn OrderPort,
    reporter: Option<&dyn ReportPort>,
) -> Result<RunSummary, CrossgateError> {
    let analysis = analyze(config, data)?;

    if let Some(reporter) = reporter {
        reporter.render_histogram(
            &format!("{}_var", config.symbol),
            &format!("{} Value at Risk, mean: {}", config.symbol, analysis.risk.mean),
            &analysis.returns,
            config.histogram_bins,
            "Daily change (%)",
            "Frequency",
        )?;
    }

    info!("executing trade");
    let action = analysis.action();
    let order = action.order(&config.symbol, config.quantity, config.time_in_force);
    if let Some(order) = &order {
        orders.submit(order)?;
    }
    info!("decision: {}", action);

    if let Some(reporter) = reporter {
        info!("analyzing trade");
        reporter.render_time_series(&format!("{}_feed", config.symbol), &feed_panels(config, &analysis))?;
    }

    Ok(RunSummary {
        decision: analysis.decision,
        action,
        risk: analysis.risk,
        bars: analysis.series.len(),
        history_bars: analysis.history.len(),
        order,
    })
}

fn feed_panels(config: &TradingConfig, analysis: &Analysis) -> Vec<ChartPanel> {
    vec![
        ChartPanel {
            title: format!("{} data feed, decision: {}", config.symbol, analysis.decision),
            y_label: "Price".to_string(),
            lines: vec![
                ChartLine::dense("close", &analysis.series.closes()),
                ChartLine::new("Short_MA", analysis.averages.short.as_options()),
                ChartLine::new("Long_MA", analysis.averages.long.as_options()),
            ],
        },
        ChartPanel {
            title: "Daily returns".to_string(),
            y_label: "% change".to_string(),
            lines: vec![ChartLine::dense("daily_return", &analysis.returns)],
        },
    ]
}

fn print_summary(config: &TradingConfig, summary: &RunSummary, dry_run: bool) {
    println!("\n=== {} ===", config.symbol);
    println!("Bars:            {} ({})", summary.bars, config.resolution);
    println!("History bars:    {}", summary.history_bars);
    println!("Decision:        {}", summary.decision);
    println!("Mean return:     {:.6}", summary.risk.mean);
    println!(
        "VaR ({:.0}%):       {:.4}%",
        summary.risk.confidence * 100.0,
        summary.risk.value_at_risk * 100.0
    );
    match &summary.order {
        Some(order) if dry_run => println!("Order:           {} (dry run)", order),
        Some(order) => println!("Order:           {}", order),
        None => println!("Order:           none"),
    }
}
