use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::db::repository::{ListParams, Record};
use crate::models::quote::TourType;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: Option<String>,
    pub star_rating: Option<u8>,
    /// AED per room per night.
    pub rate_per_night: f64,
    #[serde(default)]
    pub extra_bed_rate: f64,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Tour {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub cost_per_person: f64,
    #[serde(rename = "type", default)]
    pub tour_type: TourType,
    pub transfer_cost: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Inclusion {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub label: String,
    pub description: Option<String>,
    #[serde(default)]
    pub default_selected: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BankAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub iban: Option<String>,
    pub swift: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "AED".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItineraryItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_id: String,
    pub day: u32,
    /// "HH:MM", sorts lexically.
    pub time: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be a non-negative number", field))
    }
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

impl Record for Hotel {
    const COLLECTION: &'static str = "Hotels";
    const LABEL: &'static str = "Hotel";

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

    fn sort() -> Document {
        doc! { "name": 1 }
    }

    fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        non_negative("rate_per_night", self.rate_per_night)?;
        non_negative("extra_bed_rate", self.extra_bed_rate)
    }
}

impl Record for Tour {
    const COLLECTION: &'static str = "Tours";
    const LABEL: &'static str = "Tour";

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

    fn sort() -> Document {
        doc! { "name": 1 }
    }

    fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        non_negative("cost_per_person", self.cost_per_person)?;
        match self.transfer_cost {
            Some(cost) => non_negative("transfer_cost", cost),
            None => Ok(()),
        }
    }
}

impl Record for Inclusion {
    const COLLECTION: &'static str = "Inclusions";
    const LABEL: &'static str = "Inclusion";

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

    fn sort() -> Document {
        doc! { "label": 1 }
    }

    fn validate(&self) -> Result<(), String> {
        required("label", &self.label)
    }
}

impl Record for BankAccount {
    const COLLECTION: &'static str = "BankAccounts";
    const LABEL: &'static str = "Bank account";

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

    fn validate(&self) -> Result<(), String> {
        required("bank_name", &self.bank_name)?;
        required("account_name", &self.account_name)?;
        required("account_number", &self.account_number)
    }
}

impl Record for ItineraryItem {
    const COLLECTION: &'static str = "ItineraryItems";
    const LABEL: &'static str = "Itinerary item";

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

    fn sort() -> Document {
        doc! { "day": 1, "time": 1 }
    }

    fn list_filter(params: &ListParams) -> Document {
        match &params.quote_id {
            Some(quote_id) => doc! { "quote_id": quote_id },
            None => doc! {},
        }
    }

    fn validate(&self) -> Result<(), String> {
        required("quote_id", &self.quote_id)?;
        required("title", &self.title)?;
        if self.day == 0 {
            return Err("day must start at 1".to_string());
        }
        Ok(())
    }
}
