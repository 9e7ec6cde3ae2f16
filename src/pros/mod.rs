//! PRO Module
//!
//! Professional provider records and the cached listing built over them.

mod listing;
mod model;

pub use listing::{
    fetch_listing, ListingCache, ListingPlan, ListingSettings, ProListing, SearchArea,
    SharedListingCache,
};
pub use model::{
    import_pros, Category, Pro, ProStatus, Service, SubscriptionStatus, PROS_COLLECTION,
};
