use std::process::ExitCode;

use anyhow::Context;
use quoteform_catalog::{InMemoryCatalog, Product, ProductCatalog, ProductType};

use super::money;
use crate::cli::ProductsArgs;

pub fn run(args: &ProductsArgs) -> anyhow::Result<ExitCode> {
    let catalog = InMemoryCatalog::with_default_products();
    let products = select(&catalog, args)?;
    tracing::info!(count = products.len(), "products listed");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(ExitCode::SUCCESS);
    }

    if products.is_empty() {
        println!("Nenhum produto encontrado");
        return Ok(ExitCode::SUCCESS);
    }
    for product in &products {
        println!(
            "{:<10} {:<28} {:<12} {:>14}",
            product.id,
            product.name,
            product.product_type.display_name(),
            money(product.base_price)
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn select(catalog: &dyn ProductCatalog, args: &ProductsArgs) -> anyhow::Result<Vec<Product>> {
    let mut products = if args.min_price.is_some() || args.max_price.is_some() {
        let min = args.min_price.unwrap_or(0.0);
        let max = args.max_price.unwrap_or(f64::MAX);
        catalog
            .find_by_price_range(min, max)
            .context("invalid price range")?
    } else {
        catalog.find_all()
    };

    if let Some(wanted) = &args.product_type {
        let wanted = ProductType::from(wanted.as_str());
        products.retain(|p| p.product_type == wanted);
    }
    Ok(products)
}
