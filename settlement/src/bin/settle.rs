//! Settlement command-line tool
//!
//! Reads a JSON array of expenses and prints people, balances, settlements or
//! a full report as JSON.

use anyhow::{bail, Context, Result};
use expense_ledger::{parse_expense, ExpenseRecord};
use serde_json::{json, Value};
use settlement::{Config, SettlementEngine};

const USAGE: &str = "usage: settle <people|balances|settlements|report> <expenses.json> [config.toml]";

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, input, config_path) = match args.as_slice() {
        [command, input] => (command, input, None),
        [command, input, config] => (command, input, Some(config)),
        _ => bail!(USAGE),
    };

    // Load configuration
    let config = match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => Config::from_env()?,
    };
    let scale = config.netting.amount_scale;
    let engine = SettlementEngine::new(config)?;

    let raw = std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?;
    let expenses = parse_expenses(&raw)?;
    tracing::info!(count = expenses.len(), "Loaded expenses from {}", input);

    let output = match command.as_str() {
        "people" => serde_json::to_value(engine.people(&expenses))?,
        "balances" => serde_json::to_value(engine.compute_balances(&expenses).rounded(scale))?,
        "settlements" => serde_json::to_value(engine.compute_settlements(&expenses))?,
        "report" => {
            let balances = engine.compute_balances(&expenses);
            let report = engine.settle_balances(&balances);
            let stats = engine.statistics(&balances, &report);
            json!({
                "balances": balances.rounded(scale),
                "settlements": report.plan,
                "residuals": report.residuals,
                "dust": report.dust,
                "stats": stats,
            })
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Validate every expense, naming the first one rejected
fn parse_expenses(raw: &str) -> Result<Vec<ExpenseRecord>> {
    let value: Value = serde_json::from_str(raw).context("expenses file is not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("expenses file must contain a JSON array");
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_expense(item).with_context(|| format!("expense {} rejected", index))
        })
        .collect()
}
