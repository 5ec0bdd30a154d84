//! Handler for the `products` command.

use anyhow::Context;
use booking_catalog::{CatalogArgs, CatalogWriter, ProductGenerator};

pub fn run_products(args: CatalogArgs) -> anyhow::Result<()> {
    let generator = match args.seed {
        Some(seed) => ProductGenerator::new(seed),
        None => ProductGenerator::from_entropy(),
    };

    let metrics = CatalogWriter::new(generator)
        .write(&args.output, args.count)
        .with_context(|| format!("Failed to write product catalog to {:?}", args.output))?;

    println!("{}", args.output.display());
    tracing::info!(
        "Wrote {} products ({} bytes)",
        metrics.rows_written,
        metrics.file_size_bytes
    );
    Ok(())
}
