mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use storefront_core::{
    calculate_discount, format_price, load_catalog, CartAdmissionGate, Catalog, DiscountBadge,
    InMemoryCart, OrderLine, OrderSummary, RawPrice, Session, StorefrontConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront catalog pricing and cart admission rules")]
struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Format a raw price in the configured currency.
    Price { raw: String },
    /// Compute the discount of a price against its reference (MRP).
    Discount {
        #[arg(long)]
        reference: String,
        #[arg(long)]
        price: String,
    },
    /// Render product cards for every product in the catalog.
    List {
        #[arg(long, env = "STOREFRONT_CATALOG_PATH")]
        catalog: Option<PathBuf>,
    },
    /// Run an add-to-cart request through the admission gate.
    Add {
        product_id: String,
        /// Act as this signed-in user; omit to act anonymously.
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, env = "STOREFRONT_CATALOG_PATH")]
        catalog: Option<PathBuf>,
    },
    /// Total an order given `ID` or `ID:QTY` lines.
    Summary {
        #[arg(required = true)]
        lines: Vec<String>,
        #[arg(long, env = "STOREFRONT_CATALOG_PATH")]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storefront_core::load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(env = %config.env, currency = config.currency.code, "storefront starting");
    run(cli, &config).await
}

async fn run(cli: Cli, config: &StorefrontConfig) -> anyhow::Result<()> {
    let format = &config.currency;

    match cli.command {
        Commands::Price { raw } => {
            println!("{}", format_price(&RawPrice::Text(raw), format));
        }
        Commands::Discount { reference, price } => {
            let reference = RawPrice::Text(reference);
            let price = RawPrice::Text(price);
            let badge = DiscountBadge::new(&reference, &price, format);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&badge)?);
            } else if let Some(badge) = badge {
                println!("{} (save {})", badge.label(), badge.savings_display);
            } else {
                println!(
                    "no discount (computed {}%)",
                    calculate_discount(&reference, &price)
                );
            }
        }
        Commands::List { catalog } => {
            let catalog = open_catalog(catalog, config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                for product in &catalog.products {
                    println!("{}", render::render_card(product, format));
                }
            }
        }
        Commands::Add {
            product_id,
            user,
            quantity,
            catalog,
        } => {
            let catalog = open_catalog(catalog, config)?;
            let product = catalog
                .find(&product_id)
                .with_context(|| format!("product '{product_id}' not found in catalog"))?;
            let session = user.map_or_else(Session::anonymous, Session::authenticated);

            let mut cart = InMemoryCart::new();
            if let Some(capacity) = config.cart_capacity {
                cart = cart.with_capacity(capacity);
            }
            let gate = CartAdmissionGate::from_config(cart, config);

            let outcome = gate.request_add(&session, product, quantity).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if let Some(notification) = outcome.notification(product) {
                println!("[{}] {}", notification.kind, notification.message);
            }
        }
        Commands::Summary { lines, catalog } => {
            let catalog = open_catalog(catalog, config)?;
            let order = lines
                .iter()
                .map(|spec| {
                    let (id, qty) = render::parse_line_spec(spec)?;
                    let product = catalog
                        .find(&id)
                        .with_context(|| format!("product '{id}' not found in catalog"))?;
                    Ok(OrderLine::new(product.clone(), qty))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let summary = OrderSummary::from_lines(&order);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render::render_summary(&summary, format));
            }
        }
    }

    Ok(())
}

fn open_catalog(path: Option<PathBuf>, config: &StorefrontConfig) -> anyhow::Result<Catalog> {
    let path = path.unwrap_or_else(|| config.catalog_path.clone());
    load_catalog(&path).with_context(|| format!("loading catalog {}", path.display()))
}
