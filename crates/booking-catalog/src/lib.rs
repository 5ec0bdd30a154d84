//! Product reference dataset for booking-events.
//!
//! Downstream consumers join booking events against this file by
//! `product_id`. The ids cover exactly the range the event generator draws
//! from.
//!
//! # Example
//!
//! ```ignore
//! use booking_catalog::{CatalogWriter, ProductGenerator};
//!
//! let mut writer = CatalogWriter::new(ProductGenerator::new(42));
//! let metrics = writer.write("demo_products.csv", 100_001)?;
//! ```

pub mod args;
mod error;
pub mod product;
mod writer;

pub use args::CatalogArgs;
pub use error::CatalogError;
pub use product::{ProductGenerator, ProductRecord};
pub use writer::{CatalogMetrics, CatalogWriter, DEFAULT_PRODUCT_COUNT, HEADERS};
