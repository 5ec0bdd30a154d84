//! Product reference records.

use booking_generator::generators::{pick_uniform, WeightedTable};
use booking_generator::PRODUCT_ID_MIN;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Country {
    #[serde(rename = "SP")]
    Spain,
    #[serde(rename = "PT")]
    Portugal,
    #[serde(rename = "IT")]
    Italy,
}

impl Country {
    /// Cities a product in this country can be booked in.
    pub fn cities(self) -> &'static [&'static str] {
        match self {
            Country::Spain => &[
                "Barcelona",
                "Madrid",
                "Sevilla",
                "Valencia",
                "Granada",
                "Malaga",
                "Bilbao",
                "Alicante",
                "Cordoba",
                "San Sebastian",
            ],
            Country::Portugal => &[
                "Lisbon", "Porto", "Sintra", "Faro", "Cascais", "Braga", "Coimbra", "Aveiro",
                "Funchal", "Évora",
            ],
            Country::Italy => &[
                "Rome", "Venice", "Florence", "Milan", "Naples", "Verona", "Bologna", "Turin",
                "Pisa", "Palermo",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Hotel,
    Apartment,
    Villa,
    Hostel,
    Resort,
    Room,
}

pub const COUNTRIES: &[(Country, u32)] = &[
    (Country::Spain, 7),
    (Country::Portugal, 2),
    (Country::Italy, 1),
];

pub const PROPERTY_TYPES: &[(PropertyType, u32)] = &[
    (PropertyType::Hotel, 40),
    (PropertyType::Apartment, 30),
    (PropertyType::Villa, 5),
    (PropertyType::Hostel, 10),
    (PropertyType::Resort, 10),
    (PropertyType::Room, 5),
];

/// Amenity flags are written as 0/1 and are off 70% of the time.
pub const FLAG: &[(u8, u32)] = &[(0, 7), (1, 3)];

/// One row of the product reference file. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub product_id: u64,
    pub booking_country: Country,
    pub booking_city: &'static str,
    pub property_type: PropertyType,
    pub are_pets_allowed: u8,
    pub has_wifi: u8,
    pub has_parking: u8,
}

#[derive(Debug, Clone)]
struct ProductTables {
    countries: WeightedTable<Country>,
    property_types: WeightedTable<PropertyType>,
    flag: WeightedTable<u8>,
}

impl ProductTables {
    fn new() -> Self {
        Self {
            countries: constant_table(COUNTRIES),
            property_types: constant_table(PROPERTY_TYPES),
            flag: constant_table(FLAG),
        }
    }
}

fn constant_table<T: Copy>(table: &[(T, u32)]) -> WeightedTable<T> {
    WeightedTable::new(table).expect("constant weight table has a positive total")
}

/// Generator for consecutive product records starting at [`PRODUCT_ID_MIN`].
pub struct ProductGenerator {
    rng: StdRng,
    tables: ProductTables,
    index: u64,
}

impl ProductGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            tables: ProductTables::new(),
            index: 0,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            tables: ProductTables::new(),
            index: 0,
        }
    }

    /// Get the current product index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    pub fn next_product(&mut self) -> ProductRecord {
        let rng = &mut self.rng;
        let tables = &self.tables;
        let booking_country = tables.countries.sample(rng);

        let product = ProductRecord {
            product_id: u64::from(PRODUCT_ID_MIN) + self.index,
            booking_country,
            booking_city: pick_uniform(rng, booking_country.cities()),
            property_type: tables.property_types.sample(rng),
            are_pets_allowed: tables.flag.sample(rng),
            has_wifi: tables.flag.sample(rng),
            has_parking: tables.flag.sample(rng),
        };
        self.index += 1;
        product
    }
}
