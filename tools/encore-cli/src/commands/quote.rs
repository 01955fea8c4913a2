//! Shipping quote command.

use anyhow::{bail, Context as _, Result};
use encore_commerce::cart::Cart;
use encore_commerce::catalog::Catalog;
use encore_commerce::ProductSlug;
use encore_shipping::{ParcelInput, Quote, ShippingClient};
use serde::Serialize;

use super::{Outcome, QuoteArgs};
use crate::context::Context;
use crate::output::{format_brl, format_days};

/// One line of the quote table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub price: Option<f64>,
    pub delivery_days: Option<u32>,
    pub cheapest: bool,
    pub error: Option<String>,
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<Outcome> {
    let catalog = load_catalog(args.catalog.as_deref(), ctx)?;
    let cart = build_cart(&catalog, &args.slugs)?;
    let parcels: Vec<ParcelInput> = cart.parcels().iter().map(ParcelInput::from).collect();
    ctx.output.debug(&format!(
        "Quoting {} item(s) from {} to {}",
        cart.total_items(),
        ctx.config.shipping.origin_postal_code,
        args.postal_code
    ));

    let client = ShippingClient::new(ctx.config.shipping.clone(), ctx.transport());
    let quote = match client.calculate(&args.postal_code, &parcels).await {
        Ok(quote) => quote,
        Err(e) => {
            ctx.output.debug(&format!("Provider answer: {}", e.body()));
            return Err(e).context("Shipping quote failed");
        }
    };

    let rows = rows(&quote);
    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(Outcome::Success);
    }

    ctx.output.header(&format!("Shipping to {}", args.postal_code));
    print_rows(ctx, &rows);
    if !rows.iter().any(|r| r.error.is_none()) {
        ctx.output.warn("No service can deliver this shipment");
    }
    Ok(Outcome::Success)
}

fn load_catalog(path: Option<&str>, ctx: &Context) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::from_toml_str(storefront_api::CATALOG_TOML)?);
    };
    let path = ctx.resolve_path(path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    Catalog::from_toml_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

/// One unit per slug; repeated slugs add up.
fn build_cart(catalog: &Catalog, slugs: &[String]) -> Result<Cart> {
    if slugs.is_empty() {
        bail!("At least one --slug is required");
    }
    let mut cart = Cart::new();
    for slug in slugs {
        let product = catalog.require(&ProductSlug::new(slug.as_str()))?;
        cart.add(product)?;
    }
    Ok(cart)
}

/// Table rows in provider order, with the cheapest available option marked.
pub fn rows(quote: &Quote) -> Vec<QuoteRow> {
    let cheapest = quote.cheapest().map(|o| o.id);
    quote
        .options
        .iter()
        .map(|option| QuoteRow {
            id: option.id,
            name: option.name.clone(),
            company: option.company.as_ref().map(|c| c.name.clone()),
            price: option.charged_price().filter(|_| option.is_available()),
            delivery_days: option.delivery_time,
            cheapest: Some(option.id) == cheapest,
            error: option.error.clone(),
        })
        .collect()
}

fn print_rows(ctx: &Context, rows: &[QuoteRow]) {
    let widths = [2, 12, 12, 12, 8];
    ctx.output
        .table_row(&["", "Service", "Company", "Price", "Delivery"], &widths);
    for row in rows {
        let marker = if row.cheapest { "★" } else { "" };
        let price = match (&row.error, row.price) {
            (Some(_), _) | (None, None) => "-".to_string(),
            (None, Some(price)) => format_brl(price),
        };
        let delivery = format_days(row.delivery_days);
        let company = row.company.as_deref().unwrap_or("-");
        ctx.output.table_row(
            &[marker, &row.name, company, &price, &delivery],
            &widths,
        );
        if let Some(error) = &row.error {
            ctx.output.list_item(&format!("{}: {}", row.name, error));
        }
    }
}
