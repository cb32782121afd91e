//! Surebet calculator entry point.

use std::io::{self, Write};
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use surebet_calc::api::{create_router, AppState};
use surebet_calc::config::Config;
use surebet_calc::engine::{Calculation, Calculator, EngineProfile, Outcome, Profile};
use surebet_calc::error::CalcError;
use surebet_calc::metrics;
use surebet_calc::validation;
use surebet_calc::utils::{format_money, format_pct, shutdown_signal};

/// Surebet stake allocation calculator.
#[derive(Parser, Debug)]
#[command(name = "surebet-calc")]
#[command(about = "Split an investment across odds so every outcome pays the same")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate stakes and show the guaranteed profit.
    Calc {
        /// Total amount to split across outcomes.
        #[arg(short, long)]
        total: Decimal,

        /// Outcome as ODD[:TAX]; repeat once per leg (e.g. -o 2.1 -o 2.05:15).
        #[arg(short = 'o', long = "outcome", required = true)]
        outcomes: Vec<Outcome>,

        /// Engine profile (overrides PROFILE).
        #[arg(long)]
        profile: Option<Profile>,

        /// Fail when the input has validation issues.
        #[arg(long)]
        strict: bool,

        /// Print the calculation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Serve the calculator over HTTP.
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration decides the log format, so load it first
    let config = Config::load();
    match &config {
        Ok(c) => init_logging(args.verbose || c.verbose, c.log_json, &c.rust_log),
        Err(_) => init_logging(args.verbose, false, "info"),
    }
    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        CalcError::from(e)
    })?;

    match args.command {
        Command::Calc {
            total,
            outcomes,
            profile,
            strict,
            json,
        } => cmd_calc(config, total, outcomes, profile, strict, json),
        Command::Serve { port } => cmd_serve(config, port).await,
        Command::CheckConfig => cmd_check_config(config),
    }
}

/// Initialize the tracing subscriber; logs go to stderr.
fn init_logging(verbose: bool, json: bool, rust_log: &str) {
    let filter = if verbose {
        EnvFilter::new("surebet_calc=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(rust_log))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn resolve_profile(config: &Config, profile_override: Option<Profile>) -> EngineProfile {
    match profile_override {
        Some(name) => Config {
            profile: name,
            ..config.clone()
        }
        .engine_profile(),
        None => config.engine_profile(),
    }
}

/// Allocate stakes for one set of inputs.
fn cmd_calc(
    config: Config,
    total: Decimal,
    outcomes: Vec<Outcome>,
    profile_override: Option<Profile>,
    strict: bool,
    json: bool,
) -> anyhow::Result<()> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let calculator = Calculator::new(resolve_profile(&config, profile_override));

    if strict {
        validation::ensure_valid(calculator.profile(), total, &outcomes)?;
    } else {
        for issue in calculator.validate(total, &outcomes) {
            warn!(field = %issue.field(), "{}", issue);
        }
    }

    let calculation = calculator.calculate(total, &outcomes).map_err(CalcError::from)?;

    if json {
        let rendered = serde_json::to_string_pretty(&calculation).map_err(CalcError::from)?;
        println!("{}", rendered);
    } else {
        write_calculation(&mut io::stdout().lock(), &calculation).map_err(CalcError::from)?;
    }

    Ok(())
}

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Render a calculation as a text table.
fn write_calculation(out: &mut impl Write, calc: &Calculation) -> io::Result<()> {
    let rounding = calc.profile.rounding_enabled();

    writeln!(out, "{RULE}")?;
    writeln!(out, "SUREBET CALCULATOR")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Profile: {}", calc.profile.name)?;
    writeln!(out, "Total investment: {}", format_money(calc.total_investment))?;
    writeln!(out, "{THIN_RULE}")?;
    if rounding {
        writeln!(
            out,
            "{:>3}  {:>8}  {:>8}  {:>12}  {:>12}  {:>12}",
            "#", "Odd", "Tax", "Stake", "Rounded", "Return"
        )?;
    } else {
        writeln!(
            out,
            "{:>3}  {:>8}  {:>8}  {:>12}  {:>12}",
            "#", "Odd", "Tax", "Stake", "Return"
        )?;
    }

    for (i, row) in calc.rows.iter().enumerate() {
        let tax = format_pct(row.tax);
        if rounding {
            writeln!(
                out,
                "{:>3}  {:>8}  {:>8}  {:>12}  {:>12}  {:>12}",
                i + 1,
                format_money(row.odd),
                tax,
                format_money(row.value),
                format_money(row.recommended.unwrap_or_default()),
                format_money(row.exact_return),
            )?;
        } else {
            writeln!(
                out,
                "{:>3}  {:>8}  {:>8}  {:>12}  {:>12}",
                i + 1,
                format_money(row.odd),
                tax,
                format_money(row.value),
                format_money(row.exact_return),
            )?;
        }
    }

    writeln!(out, "{THIN_RULE}")?;
    let verdict = if calc.is_surebet() {
        "guaranteed"
    } else {
        "not guaranteed"
    };
    writeln!(
        out,
        "Profit: {} ({}, {})",
        format_money(calc.profit),
        format_pct(calc.roi),
        verdict
    )?;
    if let (Some(profit), Some(staked)) = (calc.recommended_profit, calc.recommended_total) {
        writeln!(
            out,
            "Profit with rounded stakes: {} (staked {})",
            format_money(profit),
            format_money(staked)
        )?;
    }
    match calc.margin {
        Some(margin) => writeln!(out, "Margin: {}", margin.round_dp(4))?,
        None => writeln!(out, "Margin: n/a")?,
    }
    if calc.degenerate {
        writeln!(out, "Not enough input yet: need a total and at least two outcomes.")?;
    }
    writeln!(out, "{RULE}")
}

/// Serve the calculator over HTTP until shutdown.
async fn cmd_serve(config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let profile = config.engine_profile();
    info!("Profile: {}", profile.name);
    match profile.rounding_unit {
        Some(unit) => info!("Rounding unit: {}", unit),
        None => info!("Rounding: disabled"),
    }
    info!("Minimum investment: {}", profile.minimum_investment);

    let mut app_state = AppState::new(profile);
    match metrics::install_prometheus() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    let port = port_override.unwrap_or(config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.map_err(CalcError::from)?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CalcError::from)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SUREBET CALCULATOR - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    let profile = config.engine_profile();
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Profile: {}", profile.name);
    match profile.rounding_unit {
        Some(unit) => println!("  Rounding Unit: {}", unit),
        None => println!("  Rounding: Disabled"),
    }
    println!("  Minimum Investment: {}", profile.minimum_investment);
    println!("  Port: {}", config.port);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
