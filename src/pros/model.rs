//! PRO record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::GeoPoint;
use crate::models::{CreateProRequest, UpdateProRequest};
use crate::store::{Document, DocumentStore, StoreError};

/// Collection holding PRO documents.
pub const PROS_COLLECTION: &str = "pros";

// == Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Veterinari,
    PetSitter,
    TaxiPet,
    Toelettatori,
    Parchi,
    Allevatori,
    Educatori,
    Pensioni,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Veterinari => "veterinari",
            Category::PetSitter => "pet_sitter",
            Category::TaxiPet => "taxi_pet",
            Category::Toelettatori => "toelettatori",
            Category::Parchi => "parchi",
            Category::Allevatori => "allevatori",
            Category::Educatori => "educatori",
            Category::Pensioni => "pensioni",
        }
    }
}

// == Statuses ==
/// Moderation state; only approved PROs are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProStatus::Pending => "pending",
            ProStatus::Approved => "approved",
            ProStatus::Rejected => "rejected",
        }
    }
}

/// Billing state maintained by the payment integrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

// == Service ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// == Pro ==
/// A professional provider as stored in the `pros` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pro {
    pub display_name: String,
    pub categories: Vec<Category>,
    pub geo: GeoPoint,
    /// Derived from `geo` on every write
    #[serde(default)]
    pub geohash: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub status: ProStatus,
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

fn default_visible() -> bool {
    true
}

impl Pro {
    /// Builds a new, pending PRO from a validated create request.
    pub fn from_create(req: CreateProRequest, now: DateTime<Utc>) -> Self {
        Self {
            display_name: req.display_name,
            categories: req.categories,
            geohash: req.geo.geohash(),
            geo: req.geo,
            services: req.services,
            visible: req.visible.unwrap_or(true),
            bio: req.bio,
            phone_number: req.phone_number,
            email: req.email,
            website: req.website,
            address: req.address,
            status: ProStatus::Pending,
            subscription_status: SubscriptionStatus::Inactive,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Applies the fields present in a validated update request.
    pub fn apply_update(&mut self, req: UpdateProRequest, now: DateTime<Utc>) {
        if let Some(display_name) = req.display_name {
            self.display_name = display_name;
        }
        if let Some(categories) = req.categories {
            self.categories = categories;
        }
        if let Some(geo) = req.geo {
            self.geo = geo;
        }
        if let Some(services) = req.services {
            self.services = services;
        }
        if let Some(visible) = req.visible {
            self.visible = visible;
        }
        self.bio = req.bio.or(self.bio.take());
        self.phone_number = req.phone_number.or(self.phone_number.take());
        self.email = req.email.or(self.email.take());
        self.website = req.website.or(self.website.take());
        self.address = req.address.or(self.address.take());
        self.geohash = self.geo.geohash();
        self.updated_at = now;
    }

    /// Hides the PRO and marks it deleted; the document itself is kept.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.visible = false;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Serializes into a store document, recomputing the geohash first.
    pub fn to_document(&self, id: &str) -> Result<Document, StoreError> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::Backend(format!(
                    "PRO serialized to a non-object: {other}"
                )))
            }
        };
        fields.insert("geohash".to_string(), Value::String(self.geo.geohash()));
        Ok(Document::new(id, fields))
    }

    pub fn from_document(document: &Document) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(Value::Object(document.fields.clone()))?)
    }
}

// == Import ==
/// Writes seed PROs, each a JSON object carrying a string `id`, through the
/// typed model so `geohash` is derived from `geo`.
///
/// Every document is parsed before any is written. Returns the number of
/// PROs written.
pub async fn import_pros(store: &dyn DocumentStore, documents: Value) -> Result<usize, StoreError> {
    let Value::Array(items) = documents else {
        return Err(StoreError::Backend("seed data must be a JSON array".to_string()));
    };

    let mut pros = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(mut fields) = item else {
            return Err(StoreError::Backend("seed documents must be objects".to_string()));
        };
        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            _ => return Err(StoreError::Backend("seed document without string id".to_string())),
        };
        let pro: Pro = serde_json::from_value(Value::Object(fields))?;
        pros.push((id, pro));
    }

    for (id, pro) in &pros {
        store.put(PROS_COLLECTION, pro.to_document(id)?).await?;
    }
    Ok(pros.len())
}
