use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use quoteform_catalog::InMemoryCatalog;
use quoteform_form::{BudgetController, FormController, QuoteSummary, RulesConfig};

use super::money;
use crate::cli::QuoteArgs;

/// Exit status for a quote that was priced but did not validate.
const INVALID_QUOTE: u8 = 2;

pub fn run(args: QuoteArgs) -> anyhow::Result<ExitCode> {
    let config = match &args.rules {
        Some(path) => RulesConfig::from_path(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => RulesConfig::default(),
    };

    let summary = quote(config, args.product_id, args.customer, args.fields)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }

    Ok(if summary.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(INVALID_QUOTE)
    })
}

fn quote(
    config: RulesConfig,
    product_id: String,
    customer: Option<String>,
    fields: Vec<(String, serde_json::Value)>,
) -> anyhow::Result<QuoteSummary> {
    let catalog = Arc::new(InMemoryCatalog::with_default_products());
    let mut budget = BudgetController::new(catalog, FormController::from_config(&config));

    budget.select_product(&product_id)?;
    budget.set_customer_id(customer);
    for (key, value) in fields {
        tracing::debug!(%key, %value, "setting field");
        budget.update_field(key, value);
    }
    Ok(budget.summary()?)
}

fn render(summary: &QuoteSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}) - {}\n",
        summary.product_name,
        summary.product_id,
        summary.product_type.display_name()
    ));
    if let Some(customer) = &summary.customer_id {
        out.push_str(&format!("Cliente: {customer}\n"));
    }
    out.push_str(&format!("Preço base:  {:>14}\n", money(summary.base_price)));
    for adjustment in &summary.adjustments {
        out.push_str(&format!(
            "  {:<22} {:>14}\n",
            adjustment.label,
            money(adjustment.amount)
        ));
    }
    out.push_str(&format!("Preço final: {:>14}\n", money(summary.final_price)));
    if summary.savings > 0.0 {
        out.push_str(&format!("Economia:    {:>14}\n", money(summary.savings)));
    }
    for error in &summary.errors {
        out.push_str(&format!("erro: {error}\n"));
    }
    out
}
