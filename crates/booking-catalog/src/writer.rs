//! CSV writer for the product reference dataset.

use crate::error::CatalogError;
use crate::product::ProductGenerator;
use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default number of products, covering the whole event product id range.
pub const DEFAULT_PRODUCT_COUNT: u64 = 100_001;

/// Metrics from a catalog write.
#[derive(Debug, Clone, Default)]
pub struct CatalogMetrics {
    /// Number of products written.
    pub rows_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl CatalogMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes generated products to a CSV file with a header row.
pub struct CatalogWriter {
    generator: ProductGenerator,
}

impl CatalogWriter {
    pub fn new(generator: ProductGenerator) -> Self {
        Self { generator }
    }

    /// Write `count` products to `output_path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        count: u64,
    ) -> Result<CatalogMetrics, CatalogError> {
        let start_time = Instant::now();
        let mut metrics = CatalogMetrics::default();

        let output_path = output_path.as_ref();
        info!(
            "Writing product catalog '{}' with {} products",
            output_path.display(),
            count
        );

        let file = File::create(output_path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = Writer::from_writer(buf_writer);

        for _ in 0..count {
            writer.serialize(self.generator.next_product())?;
            metrics.rows_written += 1;

            if metrics.rows_written % 10000 == 0 {
                debug!("Written {} products", metrics.rows_written);
            }
        }

        // An empty catalog still gets its header row.
        if count == 0 {
            writer.write_record(HEADERS)?;
        }

        writer.flush()?;
        drop(writer);

        metrics.file_size_bytes = std::fs::metadata(output_path)?.len();
        metrics.total_duration = start_time.elapsed();

        info!(
            "Catalog complete: {} products, {} bytes in {:?} ({:.2} rows/sec)",
            metrics.rows_written,
            metrics.file_size_bytes,
            metrics.total_duration,
            metrics.rows_per_second()
        );

        Ok(metrics)
    }
}

/// Column names, matching the field order of `ProductRecord`.
pub const HEADERS: &[&str] = &[
    "product_id",
    "booking_country",
    "booking_city",
    "property_type",
    "are_pets_allowed",
    "has_wifi",
    "has_parking",
];

#[cfg(test)]
mod tests {
    use super::*;
    use booking_generator::PRODUCT_ID_MIN;
    use tempfile::TempDir;

    #[test]
    fn test_metrics() {
        let metrics = CatalogMetrics {
            rows_written: 1000,
            total_duration: Duration::from_secs(10),
            file_size_bytes: 100000,
        };

        assert_eq!(metrics.rows_per_second(), 100.0);
    }

    #[test]
    fn test_write_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("products.csv");

        let mut writer = CatalogWriter::new(ProductGenerator::new(42));
        let metrics = writer.write(&path, 25).unwrap();

        assert_eq!(metrics.rows_written, 25);
        assert!(metrics.file_size_bytes > 0);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, HEADERS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0][0], PRODUCT_ID_MIN.to_string());
        assert_eq!(rows[24][0], (PRODUCT_ID_MIN + 24).to_string());
        for row in &rows {
            assert!(["SP", "PT", "IT"].contains(&&row[1]));
            assert!(["0", "1"].contains(&&row[4]));
        }
    }

    #[test]
    fn test_write_empty_catalog_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        let metrics = CatalogWriter::new(ProductGenerator::new(1))
            .write(&path, 0)
            .unwrap();

        assert_eq!(metrics.rows_written, 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), HEADERS.join(","));
    }
}
