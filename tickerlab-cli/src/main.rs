//! TickerLab CLI: load one ticker, compute a statistic, write chart artifacts.
//!
//! Every chart command writes `{output_dir}/{SYMBOL}_{chart}.json` (the chart
//! description) and `{SYMBOL}_{chart}.csv` (the plotted series) and prints a
//! short summary. `beta`, `alpha`, and `summary` only print.
//!
//! Data comes from Yahoo Finance by default; `--source csv` reads
//! `{csv_dir}/{SYMBOL}.csv` and `--source synthetic` generates offline bars.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tickerlab_core::chart::{self, ChartSpec};
use tickerlab_core::data::{
    CsvProvider, DataProvider, LookbackPeriod, SyntheticProvider, YahooProvider,
    YahooQuoteProvider,
};
use tickerlab_core::domain::{BarSeries, Ticker};
use tickerlab_core::indicators::{
    Bollinger, Indicator, IndicatorFrame, MovingAverageKind, PsarStep, Trend,
};
use tickerlab_core::{profit_loss, stats, AnalysisConfig};

#[derive(Parser)]
#[command(
    name = "tickerlab",
    about = "TickerLab CLI: single-security technical analysis and charts"
)]
struct Cli {
    /// TOML file with analysis defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where bars come from.
    #[arg(long, global = true, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// Directory of {SYMBOL}.csv files for `--source csv`.
    #[arg(long = "csv", global = true, default_value = "data")]
    csv_dir: PathBuf,

    /// Lookback period, e.g. 1Y, 6MO, YTD, MAX. Overrides the config.
    #[arg(long, global = true)]
    period: Option<LookbackPeriod>,

    /// Directory for chart artifacts.
    #[arg(long, global = true, default_value = "charts")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaKind {
    Simple,
    Exponential,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as TOML with its fingerprint.
    Config,
    /// Print a one-screen overview: range, returns, beta/alpha, latest indicators.
    Summary {
        symbol: String,
        /// Skip the quote metadata request.
        #[arg(long, default_value_t = false)]
        no_fundamentals: bool,
    },
    /// Adjusted close price chart.
    AdjClose { symbol: String },
    /// OHLC candlestick chart.
    Candlestick { symbol: String },
    /// Adjusted close as a line chart.
    Line { symbol: String },
    /// Daily volume bars.
    Volume { symbol: String },
    /// Beta against a benchmark index.
    Beta {
        symbol: String,
        /// Benchmark symbol. Defaults to the config's benchmark_index.
        #[arg(long)]
        index: Option<String>,
    },
    /// Alpha against a benchmark index.
    Alpha {
        symbol: String,
        #[arg(long)]
        index: Option<String>,
        /// Risk-free rate as a fraction, e.g. 0.05.
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },
    /// Adjusted close with moving averages.
    MovingAverage {
        symbol: String,
        #[arg(long, value_enum)]
        kind: Option<MaKind>,
        /// Comma-separated windows, e.g. 20,50,200.
        #[arg(long, value_delimiter = ',')]
        windows: Vec<usize>,
    },
    /// MACD line, signal, and histogram.
    Macd {
        symbol: String,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
        #[arg(long)]
        signal: Option<usize>,
    },
    /// Parabolic SAR against the close.
    Psar {
        symbol: String,
        #[arg(long)]
        acceleration_step: Option<f64>,
        #[arg(long)]
        max_acceleration: Option<f64>,
        /// Print the last N bars of the engine trace.
        #[arg(long)]
        trace: Option<usize>,
    },
    /// Bollinger bands around the close.
    Bollinger {
        symbol: String,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        multiplier: Option<f64>,
    },
    /// RSI with overbought/oversold guides.
    Rsi {
        symbol: String,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        upper_band: Option<f64>,
        #[arg(long)]
        lower_band: Option<f64>,
    },
    /// Buy-and-hold profit/loss walk.
    ProfitLoss {
        symbol: String,
        #[arg(long)]
        investment: Option<f64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(period) = cli.period {
        config.period = period;
    }

    let session = Session::new(&cli, config)?;

    match cli.command {
        Commands::Config => run_config(&session.config),
        Commands::Summary {
            symbol,
            no_fundamentals,
        } => run_summary(&session, &symbol, !no_fundamentals),
        Commands::AdjClose { symbol } => {
            let t = session.load(&symbol)?;
            session.emit(&t, "adj_close", &chart::adj_close_chart(t.series()))
        }
        Commands::Candlestick { symbol } => {
            let t = session.load(&symbol)?;
            session.emit(&t, "candlestick", &chart::candlestick_chart(t.series()))
        }
        Commands::Line { symbol } => {
            let t = session.load(&symbol)?;
            session.emit(&t, "line", &chart::line_chart(t.series(), t.period()))
        }
        Commands::Volume { symbol } => {
            let t = session.load(&symbol)?;
            session.emit(&t, "volume", &chart::volume_chart(t.series(), t.period()))
        }
        Commands::Beta { symbol, index } => {
            let index = index.unwrap_or_else(|| session.config.benchmark_index.clone());
            run_beta(&session, &symbol, &index)
        }
        Commands::Alpha {
            symbol,
            index,
            risk_free_rate,
        } => {
            let mut config = session.config.clone();
            if let Some(index) = index {
                config.benchmark_index = index;
            }
            if let Some(r) = risk_free_rate {
                config.risk_free_rate = r;
            }
            config.validate()?;
            run_alpha(&session, &symbol, &config)
        }
        Commands::MovingAverage {
            symbol,
            kind,
            windows,
        } => {
            let mut ma = session.config.moving_average.clone();
            if let Some(kind) = kind {
                ma.kind = match kind {
                    MaKind::Simple => MovingAverageKind::Simple,
                    MaKind::Exponential => MovingAverageKind::Exponential,
                };
            }
            if !windows.is_empty() {
                ma.periods = windows;
            }
            let t = session.load(&symbol)?;
            let spec = chart::moving_average_chart(t.series(), ma.kind, &ma.periods)?;
            session.emit(&t, "moving_average", &spec)
        }
        Commands::Macd {
            symbol,
            fast,
            slow,
            signal,
        } => {
            let mut cfg = session.config.macd;
            cfg.fast = fast.unwrap_or(cfg.fast);
            cfg.slow = slow.unwrap_or(cfg.slow);
            cfg.signal = signal.unwrap_or(cfg.signal);
            let macd = cfg.indicator()?;
            let t = session.load(&symbol)?;
            let spec = chart::macd_chart(t.series(), &macd);
            let lines = macd.lines(t.series().bars());
            println!(
                "MACD {}/{}/{}: line {}  signal {}  histogram {}",
                cfg.fast,
                cfg.slow,
                cfg.signal,
                fmt_value(last_defined(&lines.macd)),
                fmt_value(last_defined(&lines.signal)),
                fmt_value(last_defined(&lines.histogram)),
            );
            session.emit(&t, "macd", &spec)
        }
        Commands::Psar {
            symbol,
            acceleration_step,
            max_acceleration,
            trace,
        } => {
            let mut cfg = session.config.psar;
            cfg.acceleration_step = acceleration_step.unwrap_or(cfg.acceleration_step);
            cfg.max_acceleration = max_acceleration.unwrap_or(cfg.max_acceleration);
            run_psar(&session, &symbol, cfg, trace)
        }
        Commands::Bollinger {
            symbol,
            window,
            multiplier,
        } => {
            let mut cfg = session.config.bollinger;
            cfg.period = window.unwrap_or(cfg.period);
            cfg.multiplier = multiplier.unwrap_or(cfg.multiplier);
            let bollinger = Bollinger::middle(cfg.period, cfg.multiplier)?;
            let t = session.load(&symbol)?;
            session.emit(&t, "bollinger", &chart::bollinger_chart(t.series(), &bollinger))
        }
        Commands::Rsi {
            symbol,
            window,
            upper_band,
            lower_band,
        } => {
            let mut cfg = session.config.rsi;
            cfg.window = window.unwrap_or(cfg.window);
            cfg.upper_band = upper_band.unwrap_or(cfg.upper_band);
            cfg.lower_band = lower_band.unwrap_or(cfg.lower_band);
            let rsi = cfg.indicator()?;
            let bands = cfg.bands()?;
            let t = session.load(&symbol)?;
            let values = rsi.compute(t.series().bars())?;
            let latest = last_defined(&values);
            let zone = match latest {
                Some(v) if v > bands.upper => " (overbought)",
                Some(v) if v < bands.lower => " (oversold)",
                _ => "",
            };
            println!("RSI({}): {}{zone}", cfg.window, fmt_value(latest));
            session.emit(&t, "rsi", &chart::rsi_chart(t.series(), &rsi, bands)?)
        }
        Commands::ProfitLoss { symbol, investment } => {
            let investment = investment.unwrap_or(session.config.investment);
            run_profit_loss(&session, &symbol, investment)
        }
    }
}

// ─── Session ────────────────────────────────────────────────────────

struct Session {
    config: AnalysisConfig,
    provider: Box<dyn DataProvider>,
    use_quotes: bool,
    output_dir: PathBuf,
}

impl Session {
    fn new(cli: &Cli, config: AnalysisConfig) -> Result<Self> {
        let provider: Box<dyn DataProvider> = match cli.source {
            Source::Yahoo => Box::new(YahooProvider::new()?),
            Source::Csv => Box::new(CsvProvider::new(&cli.csv_dir)),
            Source::Synthetic => Box::new(SyntheticProvider::new()),
        };
        info!(
            provider = provider.name(),
            period = %config.period,
            "session ready"
        );
        Ok(Self {
            config,
            provider,
            use_quotes: matches!(cli.source, Source::Yahoo),
            output_dir: cli.output_dir.clone(),
        })
    }

    fn load(&self, symbol: &str) -> Result<Ticker> {
        Ticker::load(symbol, self.config.period, self.provider.as_ref(), None)
            .with_context(|| format!("loading {symbol} ({})", self.config.period))
    }

    fn load_with_fundamentals(&self, symbol: &str) -> Result<Ticker> {
        let quotes = YahooQuoteProvider::new();
        Ticker::load(
            symbol,
            self.config.period,
            self.provider.as_ref(),
            Some(&quotes),
        )
        .with_context(|| format!("loading {symbol} ({})", self.config.period))
    }

    /// Write `{SYMBOL}_{name}.json` and `.csv` into the output directory.
    fn emit(&self, ticker: &Ticker, name: &str, spec: &ChartSpec) -> Result<()> {
        let stem = format!("{}_{name}", file_stem(ticker.symbol()));
        let json = self.output_dir.join(format!("{stem}.json"));
        let csv = self.output_dir.join(format!("{stem}.csv"));
        chart::write_chart_json(&json, spec)?;
        chart::write_chart_csv(&csv, spec)?;
        println!("{ticker}: {}", spec.title);
        println!("  wrote {}", json.display());
        println!("  wrote {}", csv.display());
        Ok(())
    }
}

/// Symbols like `^GSPC` or `BRK/B` made safe for file names.
fn file_stem(symbol: &str) -> String {
    symbol
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

// ─── Commands ───────────────────────────────────────────────────────

fn run_config(config: &AnalysisConfig) -> Result<()> {
    config.validate()?;
    println!("# fingerprint {}", config.fingerprint()?);
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_summary(session: &Session, symbol: &str, fundamentals: bool) -> Result<()> {
    let ticker = if fundamentals && session.use_quotes {
        session.load_with_fundamentals(symbol)?
    } else {
        session.load(symbol)?
    };
    let series = ticker.series();
    let cfg = &session.config;

    let mut frame = IndicatorFrame::new(series);
    for &w in &cfg.moving_average.periods {
        frame.attach(series, cfg.moving_average.kind.indicator(w)?.as_ref())?;
    }
    frame
        .attach(series, &cfg.psar.indicator()?)?
        .attach(series, &cfg.rsi.indicator()?)?
        .attach(series, &cfg.macd.indicator()?)?
        .attach(series, &Bollinger::upper(cfg.bollinger.period, cfg.bollinger.multiplier)?)?
        .attach(series, &Bollinger::lower(cfg.bollinger.period, cfg.bollinger.multiplier)?)?;

    let cum = stats::cumulative_returns(&stats::daily_returns(&series.adj_closes()));

    println!("{ticker}");
    println!("{}", "=".repeat(50));
    print_row("Bars", series.len().to_string());
    print_row("Source", session.provider.name().to_string());
    if let Some(last) = series.last() {
        print_row("Last close", format!("{:.2}", last.close));
        print_row("Last adj close", format!("{:.2}", last.adj_close));
    }
    print_row("Cumulative return", fmt_pct(last_defined(&cum)));

    match load_benchmark(session, &cfg.benchmark_index) {
        Ok(index) => {
            match stats::beta(series, &index) {
                Ok(b) => print_row(&format!("Beta vs {}", cfg.benchmark_index), format!("{b:.2}")),
                Err(e) => warn!(error = %e, "beta unavailable"),
            }
            match stats::alpha(series, &index, cfg.risk_free_rate) {
                Ok(a) => print_row(&format!("Alpha vs {}", cfg.benchmark_index), format!("{a:.4}")),
                Err(e) => warn!(error = %e, "alpha unavailable"),
            }
        }
        Err(e) => warn!(index = %cfg.benchmark_index, error = %e, "benchmark unavailable"),
    }

    println!();
    println!("{:<28} {:>14}", "Indicator", "Latest");
    println!("{}", "-".repeat(43));
    for name in frame.names() {
        println!("{:<28} {:>14}", name, fmt_value(frame.latest(name)));
    }

    let f = ticker.fundamentals();
    if !f.is_empty() {
        println!();
        println!("Fundamentals ({} fields)", f.len());
        for key in ["longName", "marketCap", "trailingPE", "dividendYield", "fiftyTwoWeekHigh"] {
            if let Some(v) = f.get(key) {
                print_row(key, v.to_string());
            }
        }
    }
    Ok(())
}

fn load_benchmark(session: &Session, index: &str) -> Result<BarSeries> {
    Ok(session.load(index)?.series().clone())
}

fn run_beta(session: &Session, symbol: &str, index: &str) -> Result<()> {
    let ticker = session.load(symbol)?;
    let benchmark = load_benchmark(session, index)?;
    let beta = stats::beta(ticker.series(), &benchmark)?;
    println!("{ticker}");
    print_row(&format!("Beta vs {index}"), format!("{beta:.2}"));
    Ok(())
}

fn run_alpha(session: &Session, symbol: &str, config: &AnalysisConfig) -> Result<()> {
    let ticker = session.load(symbol)?;
    let benchmark = load_benchmark(session, &config.benchmark_index)?;
    let alpha = stats::alpha(ticker.series(), &benchmark, config.risk_free_rate)?;
    println!("{ticker}");
    print_row(
        &format!("Alpha vs {} (rf {})", config.benchmark_index, config.risk_free_rate),
        format!("{alpha:.4}"),
    );
    Ok(())
}

fn run_psar(
    session: &Session,
    symbol: &str,
    cfg: tickerlab_core::config::PsarConfig,
    trace: Option<usize>,
) -> Result<()> {
    let psar = cfg.indicator()?;
    let ticker = session.load(symbol)?;
    let series = ticker.series();
    let steps = psar
        .trace(series.bars())
        .with_context(|| format!("{symbol}: parabolic SAR"))?;
    let reversals = steps.iter().filter(|s| s.reversed).count();

    if let Some(last) = steps.last() {
        println!(
            "PSAR({}, {}): {:.4}  trend {}  reversals {reversals}",
            cfg.acceleration_step,
            cfg.max_acceleration,
            last.value,
            trend_label(last),
        );
    }
    if let Some(n) = trace {
        print_trace(series, &steps[steps.len().saturating_sub(n)..]);
    }
    session.emit(&ticker, "psar", &chart::psar_chart(series, &psar)?)
}

fn run_profit_loss(session: &Session, symbol: &str, investment: f64) -> Result<()> {
    let ticker = session.load(symbol)?;
    let pl = profit_loss::simulate(ticker.series(), investment)?;
    let s = &pl.summary;

    println!("{ticker}");
    println!("{}", "=".repeat(50));
    print_row("Shares", s.shares.to_string());
    print_row("Invested", format!("{:.2}", s.invested));
    print_row("Current value", format!("{:.2}", s.current_value));
    print_row("Profit/loss", format!("{:.2}", s.profit_loss));
    print_row("% gain/loss (of value)", format!("{:.2}%", s.percent_gain_loss));
    print_row("% returns (of invested)", format!("{:.2}%", s.percentage_returns));
    print_row("Net price change", format!("{:.2}%", s.net_gains_or_losses));
    print_row("Total return", format!("{:.2}%", s.total_return));
    println!();

    session.emit(&ticker, "profit_loss", &chart::profit_loss_chart(&pl))
}

// ─── Output helpers ─────────────────────────────────────────────────

fn print_row(label: &str, value: String) {
    println!("  {label:<28} {value:>14}");
}

fn print_trace(series: &BarSeries, steps: &[PsarStep]) {
    println!();
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:<5} {:>6} {:>10} {:>4}",
        "Date", "High", "Low", "PSAR", "Trend", "AF", "EP", "Flag"
    );
    println!("{}", "-".repeat(76));
    for step in steps {
        let bar = &series.bars()[step.index];
        let flag = match (step.extended, step.reversed) {
            (_, true) => "REV",
            (true, false) => "EXT",
            _ => "",
        };
        println!(
            "{:<12} {:>10.4} {:>10.4} {:>10.4} {:<5} {:>6.3} {:>10.4} {:>4}",
            bar.date.to_string(),
            bar.high,
            bar.low,
            step.value,
            trend_label(step),
            step.state.acceleration_factor,
            step.state.extreme_point,
            flag,
        );
    }
    println!();
}

/// Trend in force for the next bar.
fn trend_label(step: &PsarStep) -> &'static str {
    match step.state.trend {
        Trend::Up => "up",
        Trend::Down => "down",
    }
}

fn last_defined(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| !v.is_nan())
}

fn fmt_value(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

fn fmt_pct(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}
