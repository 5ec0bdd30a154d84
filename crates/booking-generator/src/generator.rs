//! Main generator for producing booking event records.

use crate::generators::numeric::{generate_floored_normal, generate_int_range};
use crate::generators::timestamp::{generate_event_time, generate_stay};
use crate::generators::uuid::generate_uuid_v4;
use crate::generators::{pick_uniform, WeightedTable};
use crate::record::{
    Browser, CardIssuer, Currency, Device, EventRecord, EventType, Os, UserLocation,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;

pub const EVENT_TYPES: &[(EventType, u32)] = &[
    (EventType::Booking, 25),
    (EventType::Search, 60),
    (EventType::Cancellation, 10),
    (EventType::Refund, 5),
];

pub const DEVICES: &[(Device, u32)] = &[
    (Device::Desktop, 30),
    (Device::Mobile, 55),
    (Device::Tablet, 5),
    (Device::SmartTv, 5),
    (Device::Smartwatch, 5),
];

pub const BROWSERS: &[(Browser, u32)] = &[
    (Browser::Chrome, 65),
    (Browser::Brave, 5),
    (Browser::Firefox, 10),
    (Browser::Safari, 20),
];

pub const OPERATING_SYSTEMS: &[(Os, u32)] = &[(Os::Windows, 7), (Os::MacOs, 2), (Os::Linux, 1)];

pub const USER_LOCATIONS: &[(UserLocation, u32)] = &[
    (UserLocation::Spain, 6),
    (UserLocation::Portugal, 3),
    (UserLocation::Italy, 1),
];

pub const CURRENCIES: &[(Currency, u32)] = &[
    (Currency::Usd, 40),
    (Currency::Eur, 30),
    (Currency::Gbp, 10),
    (Currency::Jpy, 10),
    (Currency::Cny, 10),
];

pub const CARD_ISSUERS: &[(CardIssuer, u32)] = &[
    (CardIssuer::Visa, 40),
    (CardIssuer::Mastercard, 30),
    (CardIssuer::AmericanExpress, 20),
    (CardIssuer::Discover, 10),
];

/// Returning users. 123456 appears twice, so it is drawn twice as often.
pub const USER_IDS: &[u32] = &[
    123456, 234567, 345678, 456789, 567890, 678901, 789012, 890123, 901234, 101234, 112345,
    123456, 134567, 145678, 156789, 167890, 178901, 189012, 190123, 201234,
];

pub const CARD_IDS: &[u32] = &[
    123456, 234567, 345678, 456789, 567890, 678901, 789012, 890123, 901234,
];

/// Inclusive product id range, shared with the product catalog.
pub const PRODUCT_ID_MIN: u32 = 3_278_123;
pub const PRODUCT_ID_MAX: u32 = 3_378_123;

pub const PRICE_MEAN: f64 = 750.0;
pub const PRICE_STD_DEV: f64 = 90.0;
pub const PRICE_FLOOR: i64 = 20;

/// Days ahead of generation time the stay may start (inclusive).
pub const START_OFFSET_DAYS: (i64, i64) = (3, 67);
/// Length of the stay in days (inclusive).
pub const STAY_LENGTH_DAYS: (i64, i64) = (1, 20);

/// Samplers built once from the constant tables above.
#[derive(Debug, Clone)]
struct EventDistributions {
    event_types: WeightedTable<EventType>,
    devices: WeightedTable<Device>,
    browsers: WeightedTable<Browser>,
    operating_systems: WeightedTable<Os>,
    user_locations: WeightedTable<UserLocation>,
    currencies: WeightedTable<Currency>,
    card_issuers: WeightedTable<CardIssuer>,
    price: Normal<f64>,
}

impl EventDistributions {
    fn new() -> Self {
        Self {
            event_types: constant_table(EVENT_TYPES),
            devices: constant_table(DEVICES),
            browsers: constant_table(BROWSERS),
            operating_systems: constant_table(OPERATING_SYSTEMS),
            user_locations: constant_table(USER_LOCATIONS),
            currencies: constant_table(CURRENCIES),
            card_issuers: constant_table(CARD_ISSUERS),
            price: Normal::new(PRICE_MEAN, PRICE_STD_DEV)
                .expect("price standard deviation is finite and positive"),
        }
    }
}

fn constant_table<T: Copy>(table: &[(T, u32)]) -> WeightedTable<T> {
    WeightedTable::new(table).expect("constant weight table has a positive total")
}

/// Generator that produces booking event records.
///
/// A generator built with [`EventGenerator::new`] is deterministic: two
/// generators with the same seed yield the same event ids and categorical
/// fields. Timestamps still follow the clock unless the `*_at` variants are
/// used.
pub struct EventGenerator {
    rng: StdRng,
    distributions: EventDistributions,
    utc: bool,
}

impl EventGenerator {
    /// Create a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            distributions: EventDistributions::new(),
            utc: true,
        }
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            distributions: EventDistributions::new(),
            utc: true,
        }
    }

    /// Render `event_time` in UTC (`true`, the default) or local time.
    pub fn with_utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Generate the next record using the wall clock.
    pub fn next_record(&mut self) -> EventRecord {
        self.next_record_at(Utc::now())
    }

    /// Generate the next record as if the current time were `now`.
    pub fn next_record_at(&mut self, now: DateTime<Utc>) -> EventRecord {
        let rng = &mut self.rng;
        let dist = &self.distributions;
        let (start_datetime, end_datetime) =
            generate_stay(rng, now, START_OFFSET_DAYS, STAY_LENGTH_DAYS);

        EventRecord {
            event_time: generate_event_time(now, self.utc),
            event_id: generate_uuid_v4(rng),
            event_type: dist.event_types.sample(rng),
            device: dist.devices.sample(rng),
            browser: dist.browsers.sample(rng),
            os: dist.operating_systems.sample(rng),
            product_id: generate_int_range(rng, PRODUCT_ID_MIN.into(), PRODUCT_ID_MAX.into())
                as u32,
            user_id: pick_uniform(rng, USER_IDS),
            user_location: dist.user_locations.sample(rng),
            start_datetime,
            end_datetime,
            price: generate_floored_normal(rng, &dist.price, PRICE_FLOOR),
            currency: dist.currencies.sample(rng),
            card_id: pick_uniform(rng, CARD_IDS),
            card_issuer: dist.card_issuers.sample(rng),
        }
    }

    /// Lazily generate `count` records, reading the clock per record.
    pub fn records(&mut self, count: usize) -> EventRecordIterator<'_> {
        EventRecordIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Generate a batch of exactly `n` records.
    pub fn generate_batch(&mut self, n: usize) -> Vec<EventRecord> {
        self.records(n).collect()
    }

    /// Generate a batch of exactly `n` records stamped with the same `now`.
    pub fn generate_batch_at(&mut self, n: usize, now: DateTime<Utc>) -> Vec<EventRecord> {
        (0..n).map(|_| self.next_record_at(now)).collect()
    }
}

/// Iterator that lazily generates event records.
pub struct EventRecordIterator<'a> {
    generator: &'a mut EventGenerator,
    remaining: usize,
}

impl Iterator for EventRecordIterator<'_> {
    type Item = EventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EventRecordIterator<'_> {}
