//! Synthetic booking event generator.
//!
//! This crate provides the `EventGenerator` which produces booking-domain
//! events (searches, bookings, cancellations, refunds) with fields drawn from
//! fixed weighted distributions. A seeded generator is reproducible; the
//! publisher uses an entropy-seeded one.
//!
//! # Example
//!
//! ```rust
//! use booking_generator::EventGenerator;
//!
//! let mut generator = EventGenerator::new(42);
//! let batch = generator.generate_batch(3);
//! assert_eq!(batch.len(), 3);
//! for record in &batch {
//!     assert!(record.end_datetime > record.start_datetime);
//! }
//! ```

pub mod generator;
pub mod generators;
pub mod record;

// Re-exports for convenience
pub use generator::{EventGenerator, EventRecordIterator, PRODUCT_ID_MIN};
pub use record::EventRecord;
