use super::handlers::{baked_goods, bakeries, health};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` document. `/` is added outside and
/// stays undocumented.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path; handlers sharing a path go together.
    let router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(bakeries::list_bakeries))
        .routes(routes!(bakeries::get_bakery, bakeries::patch_bakery))
        .routes(routes!(baked_goods::baked_goods_by_price))
        .routes(routes!(baked_goods::most_expensive_baked_good))
        .routes(routes!(baked_goods::create_baked_good))
        .routes(routes!(baked_goods::delete_baked_good));

    let mut bakeries_tag = Tag::new("bakeries");
    bakeries_tag.description = Some("Bakeries and the baked goods they own".to_string());

    let mut baked_goods_tag = Tag::new("baked_goods");
    baked_goods_tag.description = Some("Baked goods, their prices and owning bakery".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service and database status".to_string());

    // utoipa-axum 0.1 has no `get_openapi_mut`; split, set tags, and reassemble.
    let (axum_router, mut openapi) = router.split_for_parts();
    openapi.tags = Some(vec![bakeries_tag, baked_goods_tag, health_tag]);

    OpenApiRouter::with_openapi(openapi).merge(OpenApiRouter::from(axum_router))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    let Some(start) = author.find('<') else {
        let name = author.trim();
        return (if name.is_empty() { None } else { Some(name) }, None);
    };

    let name = author[..start].trim();
    let email = author[start + 1..].trim_end_matches('>').trim();
    (
        Some(name).filter(|name| !name.is_empty()),
        Some(email).filter(|email| !email.is_empty()),
    )
}
