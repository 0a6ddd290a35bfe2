use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::db::repository::{ListParams, Record};

use super::pax::{ApartmentType, OccupancySelection, PaxComposition, RoomType, StayPeriod};

/// Hotel and the AED nightly rates entered for this quote.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HotelChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    pub name: String,
    pub rate: f64,
    #[serde(default)]
    pub extra_bed_rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourType {
    #[default]
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "private")]
    Private,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TourSelection {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub cost_per_person: f64,
    #[serde(rename = "type", default)]
    pub tour_type: TourType,
    /// Flat vehicle cost for private tours, split across paying pax.
    #[serde(default)]
    pub transfer_cost: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AddOns {
    #[serde(default)]
    pub include_visa: bool,
    #[serde(default)]
    pub include_airport_transfer: bool,
    #[serde(default)]
    pub manual_transfer_cost: Option<f64>,
}

/// Everything the pricing engine needs for one quote. Built once per
/// "generate" action and never mutated.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuoteDraft {
    #[serde(default)]
    pub client_name: String,
    pub stay: StayPeriod,
    #[serde(default)]
    pub pax: PaxComposition,
    pub occupancy: OccupancySelection,
    pub hotel: Option<HotelChoice>,
    #[serde(default)]
    pub tours: Vec<TourSelection>,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub inclusions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub struct Money {
    pub aed: f64,
    pub usd: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OptionKind {
    Room(RoomType),
    Apartment(ApartmentType),
}

/// Per-person prices for one occupancy choice.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PricingOption {
    pub label: String,
    pub kind: OptionKind,
    pub hotel_per_person: f64,
    pub adult: Money,
    pub cwb: Option<Money>,
    pub cnb: Option<Money>,
    pub group_total: Money,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TourLine {
    pub name: String,
    /// Ticket plus private transfer share.
    pub per_person: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct VisaCharge {
    pub adult_aed: f64,
    pub child_aed: f64,
    /// Visa-only note for infants, outside the per-person totals.
    pub infant_usd: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct TransferCharge {
    pub total_aed: f64,
    pub per_adult_aed: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuoteCalculation {
    pub stay: StayPeriod,
    pub nights: u32,
    pub pax: PaxComposition,
    pub hotel_name: String,
    pub hotel_rate: f64,
    pub extra_bed_rate: f64,
    pub tours: Vec<TourLine>,
    pub tours_per_person: f64,
    pub visa: Option<VisaCharge>,
    pub airport_transfer: Option<TransferCharge>,
    pub options: Vec<PricingOption>,
    pub special_double: bool,
    /// A child with bed is charged the extra-bed rate on at least one option.
    pub extra_bed_required: bool,
    pub exchange_rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Confirmed,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Confirmed => "confirmed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

/// Stored quote. Draft, calculation and both renderings are always written
/// together so the documents match the draft they came from.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SavedQuote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub reference: String,
    pub draft: QuoteDraft,
    pub calculation: QuoteCalculation,
    pub html: String,
    pub breakdown: String,
    #[serde(default)]
    pub status: QuoteStatus,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for SavedQuote {
    const COLLECTION: &'static str = "Quotes";
    const LABEL: &'static str = "Quote";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ObjectId>) {
        self.id = id;
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn list_filter(params: &ListParams) -> Document {
        match &params.status {
            Some(status) => doc! { "status": status },
            None => doc! {},
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub draft: QuoteDraft,
    pub reference: Option<String>,
    pub bank_account_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuoteResponse {
    pub calculation: QuoteCalculation,
    pub html: String,
    pub breakdown: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusUpdate {
    pub status: QuoteStatus,
}
