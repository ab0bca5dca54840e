use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "quoteform", version)]
#[command(about = "Browse products and price quotes with the quoteform rules engine")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    Products(ProductsArgs),

    /// Fill a product's form and print the resulting quote
    Quote(QuoteArgs),
}

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Only products of this type (industrial, residential, corporate, ...)
    #[arg(long = "type", value_name = "TYPE")]
    pub product_type: Option<String>,

    /// Lowest unit price, inclusive
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest unit price, inclusive
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Id of the catalog product to quote
    pub product_id: String,

    /// Field value as KEY=VALUE; VALUE is read as JSON when it parses
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, Value)>,

    /// Customer requesting the quote
    #[arg(short, long, env = "QUOTEFORM_CUSTOMER")]
    pub customer: Option<String>,

    /// Rules configuration file (.json or .toml)
    #[arg(short, long, value_name = "FILE", env = "QUOTEFORM_RULES")]
    pub rules: Option<PathBuf>,

    /// Print the quote summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Split `KEY=VALUE`. Values that are valid JSON (`10`, `true`, `["a"]`)
/// keep their type; anything else is a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assignments_keep_json_types() {
        assert_eq!(parse_assignment("quantity=10").unwrap(), ("quantity".into(), json!(10)));
        assert_eq!(parse_assignment("installation=true").unwrap().1, json!(true));
        assert_eq!(
            parse_assignment(r#"compliance=["lgpd","soc2"]"#).unwrap().1,
            json!(["lgpd", "soc2"])
        );
        assert_eq!(parse_assignment("color=inox").unwrap().1, json!("inox"));
        assert_eq!(parse_assignment("notes=a=b").unwrap().1, json!("a=b"));
    }

    #[test]
    fn malformed_assignments() {
        assert!(parse_assignment("quantity").is_err());
        assert!(parse_assignment("=10").is_err());
    }

    #[test]
    fn parses_quote_command() {
        let cli = Cli::try_parse_from([
            "quoteform", "quote", "ind-001", "--set", "quantity=100", "-s", "voltage=380",
            "--customer", "acme", "--json",
        ])
        .unwrap();
        let Command::Quote(args) = cli.command else {
            panic!("expected quote");
        };
        assert_eq!(args.product_id, "ind-001");
        assert_eq!(args.fields.len(), 2);
        assert_eq!(args.customer.as_deref(), Some("acme"));
        assert!(args.json);
    }
}
