//! Command-line front end.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use stock_forecast::core::MissingValuePolicy;
use stock_forecast::models::ModelOrder;
use stock_forecast::pipeline::{
    ForecastPipeline, ForecastReport, PipelineConfig, Stock, Watchlist, DEFAULT_HORIZON,
};
use stock_forecast::provider::{CsvProvider, SeriesProvider, SyntheticProvider};
use stock_forecast::validation::{StationarityVerdict, DEFAULT_SIGNIFICANCE};

#[derive(Parser, Debug)]
#[command(name = "stock-forecast", version)]
#[command(about = "Stationarity checks and ARIMA forecasts for stock closing prices")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test stationarity and forecast closing prices for a stock
    Forecast(ForecastArgs),

    /// List the stocks on the watchlist
    Stocks,
}

#[derive(Args, Debug)]
pub struct ForecastArgs {
    /// Watchlist name or ticker (e.g. TCS or TCS.NS)
    #[arg(short, long)]
    pub stock: String,

    /// First day of history (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End of history, exclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Autoregressive order
    #[arg(short, default_value_t = 5, allow_negative_numbers = true)]
    pub p: i64,

    /// Differencing order
    #[arg(short, default_value_t = 1, allow_negative_numbers = true)]
    pub d: i64,

    /// Moving-average order
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    pub q: i64,

    /// Business days to forecast
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// ADF significance level
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE)]
    pub significance: f64,

    /// Prediction-interval level, e.g. 0.95
    #[arg(long)]
    pub interval: Option<f64>,

    /// Where closing prices come from
    #[arg(long, value_enum, default_value_t = Source::Synthetic)]
    pub source: Source,

    /// Directory of <TICKER>.csv files for --source csv
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Seed for --source synthetic
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fill missing closes from the previous day instead of dropping them
    #[arg(long)]
    pub forward_fill: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Synthetic,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Execute a parsed command, printing its output only when it succeeds.
pub fn run(cli: Cli) -> Result<()> {
    let watchlist = Watchlist::default();
    let output = match cli.command {
        Commands::Stocks => render_watchlist(&watchlist),
        Commands::Forecast(args) => forecast(&args, &watchlist)?,
    };
    print!("{output}");
    Ok(())
}

fn forecast(args: &ForecastArgs, watchlist: &Watchlist) -> Result<String> {
    let stock = watchlist
        .find(&args.stock)
        .cloned()
        .unwrap_or_else(|| Stock::new(args.stock.clone(), args.stock.clone()));
    let start = args.start.unwrap_or(watchlist.start());
    let end = args.end.unwrap_or(watchlist.end());

    let order = ModelOrder::try_from((args.p, args.d, args.q))?;
    let mut config = PipelineConfig::default()
        .with_order(order)
        .with_horizon(args.horizon)
        .with_significance(args.significance);
    if let Some(level) = args.interval {
        config = config.with_interval_level(level);
    }
    let pipeline = ForecastPipeline::new(config)?;

    let provider: Box<dyn SeriesProvider> = match args.source {
        Source::Synthetic => Box::new(SyntheticProvider::new(args.seed)),
        Source::Csv => {
            let policy = if args.forward_fill {
                MissingValuePolicy::ForwardFill
            } else {
                MissingValuePolicy::Drop
            };
            Box::new(CsvProvider::new(&args.data_dir).with_missing_values(policy))
        }
    };

    let report = pipeline.run_with(provider.as_ref(), &stock.ticker, start, end)?;
    match args.format {
        Format::Text => Ok(render_text(&stock, &report)),
        Format::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
    }
}

fn render_watchlist(watchlist: &Watchlist) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {}", "Name", "Ticker");
    for stock in watchlist.stocks() {
        let _ = writeln!(out, "{:<10} {}", stock.name, stock.ticker);
    }
    let _ = writeln!(
        out,
        "\nDefault window: {} .. {}",
        watchlist.start(),
        watchlist.end()
    );
    out
}

fn verdict_line(label: &str, verdict: &StationarityVerdict) -> String {
    let state = if verdict.is_stationary {
        "Stationary"
    } else {
        "NOT Stationary"
    };
    format!(
        "{label}: p-value {:.4} (statistic {:.3}, lags {}) -> {state}",
        verdict.p_value, verdict.statistic, verdict.lags
    )
}

/// Plain-text report: both verdicts, then one row per forecast day.
pub fn render_text(stock: &Stock, report: &ForecastReport) -> String {
    let mut out = String::new();
    let series = &report.actual_series;
    let _ = writeln!(out, "{} Stock Prediction ({})", stock.name, stock.ticker);
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        let _ = writeln!(
            out,
            "History: {} closes, {first} .. {last}, last close {:.2}",
            series.len(),
            series.last_value().unwrap_or(f64::NAN)
        );
    }
    let _ = writeln!(out, "Model: ARIMA{}", report.order);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", verdict_line("ADF", &report.verdict));
    let _ = writeln!(
        out,
        "{}",
        verdict_line("ADF after differencing", &report.diff_verdict)
    );
    let _ = writeln!(out);

    match (report.forecast_lower(), report.forecast_upper()) {
        (Some(lower), Some(upper)) => {
            let _ = writeln!(
                out,
                "{:<12} {:>12} {:>12} {:>12}",
                "Date", "Forecast", "Lower", "Upper"
            );
            for (i, (date, value)) in report.forecast.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:<12} {:>12.2} {:>12.2} {:>12.2}",
                    date.to_string(),
                    value,
                    lower[i],
                    upper[i]
                );
            }
        }
        _ => {
            let _ = writeln!(out, "{:<12} {:>12}", "Date", "Forecast");
            for (date, value) in report.forecast.iter() {
                let _ = writeln!(out, "{:<12} {:>12.2}", date.to_string(), value);
            }
        }
    }
    out
}
