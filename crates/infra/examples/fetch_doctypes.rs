//! Example: list the doc types of a Frappe site
//!
//! Configuration comes from `FRAPLIN_*` environment variables or a
//! `fraplin.{json,toml}` file, see `fraplin_infra::config`.
//!
//! ```bash
//! FRAPLIN_SITE_URL=https://erp.example.com \
//! FRAPLIN_API_TOKEN=key:secret \
//!     cargo run -p fraplin-infra --example fetch_doctypes -- Customer
//! ```
//!
//! Any extra arguments are doc type names to describe field by field.

use fraplin_domain::DocTypeInfo;
use fraplin_infra::observability::{init_logging, LoggingConfig};
use fraplin_infra::{config, FrappeSiteClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::text());

    let config = config::load()?;
    let client = FrappeSiteClient::from_config(&config)?;

    let catalog = client
        .get_doc_types([DocTypeInfo::new("Customer").with_description("Parties buying from us")])
        .await?;

    println!("{} doc types on {}", catalog.len(), client.base_url());
    for doc_type in &catalog {
        println!(
            "  {:<40} {:>3} fields ({} custom)",
            doc_type.name,
            doc_type.fields.len(),
            doc_type.custom_fields().count()
        );
    }

    for name in std::env::args().skip(1) {
        let Some(doc_type) = catalog.get(&name) else {
            println!("\n{name}: not found");
            continue;
        };
        println!("\n{name}");
        for field in &doc_type.fields {
            println!(
                "  {:>4} {:<32} {:<16} {}",
                field.idx,
                field.fieldname,
                field.fieldtype,
                if field.is_custom { "custom" } else { "" }
            );
        }
    }

    Ok(())
}
