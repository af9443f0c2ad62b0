//! Form payloads accepted by the mutating endpoints.
//!
//! Every field is optional at the extractor level so that a missing field is
//! reported by the handler with the documented message instead of an
//! extractor rejection.

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBakedGoodForm {
    pub name: Option<String>,
    /// Whole number; `"3.0"` is accepted, `"3.5"` is not.
    pub price: Option<String>,
    pub bakery_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBakeryForm {
    pub name: Option<String>,
}
