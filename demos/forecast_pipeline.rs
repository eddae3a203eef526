//! Walk through each pipeline stage for the default watchlist.
//!
//! Run with: cargo run --example forecast_pipeline

use stock_forecast::core::future_business_days;
use stock_forecast::models::{ForecastEngine, Forecaster, ModelOrder};
use stock_forecast::pipeline::{ForecastPipeline, PipelineConfig, Watchlist};
use stock_forecast::provider::{SeriesProvider, SyntheticProvider};
use stock_forecast::transform::difference;
use stock_forecast::validation::StationarityChecker;

fn main() {
    println!("=== stock-forecast pipeline ===\n");

    let watchlist = Watchlist::default();
    let provider = SyntheticProvider::default();
    let stock = &watchlist.stocks()[0];

    // 1. Fetch closing prices
    let series = provider
        .fetch(&stock.ticker, watchlist.start(), watchlist.end())
        .unwrap();
    println!(
        "{} ({}): {} closes from {} to {}",
        stock.name,
        stock.ticker,
        series.len(),
        series.first_date().unwrap(),
        series.last_date().unwrap()
    );

    // 2. Stationarity of the prices and their differences
    let checker = StationarityChecker::default();
    let verdict = checker.check(&series).unwrap();
    println!(
        "\nADF p-value: {:.4} -> {}",
        verdict.p_value,
        if verdict.is_stationary { "Stationary" } else { "NOT Stationary" }
    );
    println!(
        "Critical values: 1% {:.3}, 5% {:.3}, 10% {:.3}",
        verdict.critical_values.cv_1pct,
        verdict.critical_values.cv_5pct,
        verdict.critical_values.cv_10pct
    );

    let differenced = difference(&series).unwrap();
    let diff_verdict = checker.check(&differenced).unwrap();
    println!("ADF after differencing: {:.4}", diff_verdict.p_value);

    // 3. Fit ARIMA(5,1,0)
    let engine = ForecastEngine::default();
    let model = engine.fit(&series, ModelOrder::default()).unwrap();
    println!("\n--- ARIMA{} ---", model.order());
    println!("AR coefficients: {:?}", model.ar_coefficients());
    if let (Some(aic), Some(bic)) = (model.aic(), model.bic()) {
        println!("AIC: {aic:.2}  BIC: {bic:.2}");
    }

    // 4. Date and print the forecast with 95% intervals
    let prediction = model.predict_with_intervals(10, 0.95).unwrap();
    let dates = future_business_days(series.last_date().unwrap(), 10).unwrap();
    let lower = prediction.lower.unwrap_or_default();
    let upper = prediction.upper.unwrap_or_default();
    println!("\n--- 10 business-day forecast ---");
    for (i, date) in dates.iter().enumerate() {
        println!(
            "  {date}: {:>9.2}  [{:>9.2}, {:>9.2}]",
            prediction.point[i], lower[i], upper[i]
        );
    }

    // 5. The same in one call for every stock
    println!("\n--- Watchlist summary ---");
    let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
    for stock in watchlist.stocks() {
        let report = pipeline
            .run_with(&provider, &stock.ticker, watchlist.start(), watchlist.end())
            .unwrap();
        println!(
            "  {:<8} p={:.4} diff p={:.4} next close {:.2}",
            stock.name,
            report.verdict.p_value,
            report.diff_verdict.p_value,
            report.forecast_values()[0]
        );
    }
}
