//! CLI argument definitions for the catalog writer.

use crate::writer::DEFAULT_PRODUCT_COUNT;
use clap::Args;
use std::path::PathBuf;

/// Arguments for writing the product reference CSV.
#[derive(Args, Clone, Debug)]
pub struct CatalogArgs {
    /// Output CSV file
    #[arg(long, short = 'o', default_value = "demo_products.csv")]
    pub output: PathBuf,

    /// Number of products to write
    #[arg(long, default_value_t = DEFAULT_PRODUCT_COUNT)]
    pub count: u64,

    /// Random seed for deterministic generation (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}
