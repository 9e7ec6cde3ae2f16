//! Request DTOs for the PRO directory API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;
use url::Url;

use crate::geo::GeoPoint;
use crate::pros::{Category, Service};

const DISPLAY_NAME_LEN: (usize, usize) = (2, 80);
const SERVICE_NAME_LEN: (usize, usize) = (2, 80);
const SERVICE_DURATION_MIN: (u32, u32) = (5, 600);
const MAX_SERVICE_DESCRIPTION: usize = 500;
const MAX_BIO: usize = 1000;
const MAX_PHONE: usize = 20;
const MAX_ADDRESS: usize = 200;

/// Query string for `GET /api/pros`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProsQuery {
    /// Search centre latitude
    #[serde(default, alias = "nearLat")]
    pub lat: Option<f64>,
    /// Search centre longitude
    #[serde(default, alias = "nearLng")]
    pub lng: Option<f64>,
    /// Search radius in kilometres
    #[serde(default, alias = "radiusKm")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query string for `POST /api/internal/cache/invalidate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateParams {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Body of `POST /api/pros`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProRequest {
    pub display_name: String,
    pub categories: Vec<Category>,
    pub geo: GeoPoint,
    pub services: Vec<Service>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CreateProRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_display_name(&self.display_name)
            .or_else(|| validate_categories(&self.categories))
            .or_else(|| self.geo.validate())
            .or_else(|| validate_services(&self.services))
            .or_else(|| {
                validate_optional(
                    &self.bio,
                    &self.phone_number,
                    &self.email,
                    &self.website,
                    &self.address,
                )
            })
    }
}

/// Body of `PUT /api/pros/:id`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub geo: Option<GeoPoint>,
    #[serde(default)]
    pub services: Option<Vec<Service>>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl UpdateProRequest {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .and_then(validate_display_name)
            .or_else(|| self.categories.as_deref().and_then(validate_categories))
            .or_else(|| self.geo.and_then(|geo| geo.validate()))
            .or_else(|| self.services.as_deref().and_then(validate_services))
            .or_else(|| {
                validate_optional(
                    &self.bio,
                    &self.phone_number,
                    &self.email,
                    &self.website,
                    &self.address,
                )
            })
    }
}

// == Field Validators ==
fn validate_display_name(name: &str) -> Option<String> {
    let len = name.chars().count();
    if len < DISPLAY_NAME_LEN.0 || len > DISPLAY_NAME_LEN.1 {
        return Some(format!(
            "displayName must be {}-{} characters",
            DISPLAY_NAME_LEN.0, DISPLAY_NAME_LEN.1
        ));
    }
    None
}

fn validate_categories(categories: &[Category]) -> Option<String> {
    categories
        .is_empty()
        .then(|| "At least one category is required".to_string())
}

fn validate_services(services: &[Service]) -> Option<String> {
    if services.is_empty() {
        return Some("At least one service is required".to_string());
    }
    for service in services {
        if service.id.is_empty() {
            return Some("Service id cannot be empty".to_string());
        }
        let name_len = service.name.chars().count();
        if name_len < SERVICE_NAME_LEN.0 || name_len > SERVICE_NAME_LEN.1 {
            return Some(format!(
                "Service name must be {}-{} characters",
                SERVICE_NAME_LEN.0, SERVICE_NAME_LEN.1
            ));
        }
        if !service.price.is_finite() || service.price < 0.0 {
            return Some("Service price must be zero or positive".to_string());
        }
        if service.duration_min < SERVICE_DURATION_MIN.0 || service.duration_min > SERVICE_DURATION_MIN.1 {
            return Some(format!(
                "Service duration must be {}-{} minutes",
                SERVICE_DURATION_MIN.0, SERVICE_DURATION_MIN.1
            ));
        }
        if service
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_SERVICE_DESCRIPTION)
        {
            return Some(format!(
                "Service description exceeds {} characters",
                MAX_SERVICE_DESCRIPTION
            ));
        }
    }
    None
}

fn validate_optional(
    bio: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    website: &Option<String>,
    address: &Option<String>,
) -> Option<String> {
    let too_long = |value: &Option<String>, max: usize| {
        value.as_ref().is_some_and(|v| v.chars().count() > max)
    };

    if too_long(bio, MAX_BIO) {
        return Some(format!("bio exceeds {} characters", MAX_BIO));
    }
    if too_long(phone, MAX_PHONE) {
        return Some(format!("phoneNumber exceeds {} characters", MAX_PHONE));
    }
    if too_long(address, MAX_ADDRESS) {
        return Some(format!("address exceeds {} characters", MAX_ADDRESS));
    }
    if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
        return Some("email is not a valid address".to_string());
    }
    if website.as_deref().is_some_and(|w| !is_valid_website(w)) {
        return Some("website must be an http(s) URL".to_string());
    }
    None
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    // Every dot-separated label is non-empty and there are at least two
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_valid_website(website: &str) -> bool {
    match Url::parse(website) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
