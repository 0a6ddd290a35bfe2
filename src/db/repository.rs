use std::fmt;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::db::mongo::Store;

#[derive(Debug)]
pub enum StoreError {
    InvalidId(String),
    NotFound(&'static str),
    Invalid(String),
    Database(mongodb::error::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidId(id) => write!(f, "Invalid ID: {}", id),
            StoreError::NotFound(label) => write!(f, "{} not found", label),
            StoreError::Invalid(reason) => write!(f, "Invalid record: {}", reason),
            StoreError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Query-string filters shared by the list endpoints. Each record type
/// decides which ones it honours.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ListParams {
    pub quote_id: Option<String>,
    pub status: Option<String>,
}

/// A document stored in its own collection with an `_id` and timestamps.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
    /// Used in "<label> not found" messages.
    const LABEL: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: Option<ObjectId>);
    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>);
    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn sort() -> Document {
        doc! { "created_at": -1 }
    }

    fn list_filter(_params: &ListParams) -> Document {
        doc! {}
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

pub async fn list<T: Record>(store: &Store, params: &ListParams) -> Result<Vec<T>, StoreError> {
    let collection = store.collection::<T>(T::COLLECTION);
    let cursor = collection
        .find(T::list_filter(params))
        .sort(T::sort())
        .await?;
    Ok(cursor.try_collect::<Vec<T>>().await?)
}

pub async fn get<T: Record>(store: &Store, id: &str) -> Result<T, StoreError> {
    let oid = parse_id(id)?;
    let collection = store.collection::<T>(T::COLLECTION);
    collection
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(StoreError::NotFound(T::LABEL))
}

/// Insert and return the record as stored, with its new id.
pub async fn create<T: Record>(store: &Store, mut record: T) -> Result<T, StoreError> {
    record.validate().map_err(StoreError::Invalid)?;

    let now = Utc::now();
    record.set_id(None);
    record.set_timestamps(Some(now), now);

    let collection = store.collection::<T>(T::COLLECTION);
    let result = collection.insert_one(&record).await?;
    record.set_id(result.inserted_id.as_object_id());
    Ok(record)
}

/// Replace the record with `id`, keeping its creation time.
pub async fn update<T: Record>(store: &Store, id: &str, mut record: T) -> Result<T, StoreError> {
    record.validate().map_err(StoreError::Invalid)?;

    let existing: T = get(store, id).await?;
    let oid = parse_id(id)?;
    record.set_id(Some(oid));
    record.set_timestamps(existing.created_at(), Utc::now());

    replace(store, &record).await?;
    Ok(record)
}

/// Write back a record that already carries its id.
pub async fn replace<T: Record>(store: &Store, record: &T) -> Result<(), StoreError> {
    let oid = record.id().ok_or(StoreError::NotFound(T::LABEL))?;
    let collection = store.collection::<T>(T::COLLECTION);
    let result = collection.replace_one(doc! { "_id": oid }, record).await?;
    if result.matched_count == 0 {
        return Err(StoreError::NotFound(T::LABEL));
    }
    Ok(())
}

pub async fn delete<T: Record>(store: &Store, id: &str) -> Result<(), StoreError> {
    let oid = parse_id(id)?;
    let collection = store.collection::<T>(T::COLLECTION);
    let result = collection.delete_one(doc! { "_id": oid }).await?;
    if result.deleted_count == 0 {
        return Err(StoreError::NotFound(T::LABEL));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_id(&oid.to_hex()).unwrap(), oid);
        assert!(matches!(
            parse_id("not-an-id"),
            Err(StoreError::InvalidId(id)) if id == "not-an-id"
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(StoreError::NotFound("Hotel").to_string(), "Hotel not found");
        assert_eq!(
            StoreError::Invalid("name is required".to_string()).to_string(),
            "Invalid record: name is required"
        );
    }
}
