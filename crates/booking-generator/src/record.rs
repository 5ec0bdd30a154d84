//! The booking event record and its categorical fields.

use crate::generators::timestamp::serde_format;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Booking,
    Search,
    Cancellation,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
    SmartTv,
    Smartwatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Brave,
    Firefox,
    Safari,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Windows,
    #[serde(rename = "Mac OS")]
    MacOs,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserLocation {
    Spain,
    Portugal,
    Italy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardIssuer {
    Visa,
    Mastercard,
    #[serde(rename = "American Express")]
    AmericanExpress,
    Discover,
}

/// One synthetic booking-domain event.
///
/// Field order is the wire order: the JSON encoding follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(with = "serde_format")]
    pub event_time: NaiveDateTime,
    pub event_id: Uuid,
    pub event_type: EventType,
    pub device: Device,
    pub browser: Browser,
    pub os: Os,
    pub product_id: u32,
    pub user_id: u32,
    pub user_location: UserLocation,
    #[serde(with = "serde_format")]
    pub start_datetime: NaiveDateTime,
    #[serde(with = "serde_format")]
    pub end_datetime: NaiveDateTime,
    pub price: i64,
    pub currency: Currency,
    pub card_id: u32,
    pub card_issuer: CardIssuer,
}

impl EventRecord {
    /// Encode as compact JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
