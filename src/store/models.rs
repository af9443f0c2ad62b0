//! Records returned by the repository and their JSON shapes.
//!
//! Serialization is bounded in depth: a bakery lists its baked goods without
//! their back-reference, and a baked good embeds a flat summary of its bakery
//! without that bakery's goods. Both shapes are built by hand in
//! [`BakeryWithGoods::to_response`] and [`BakedGoodWithBakery::to_response`].

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Bakery {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BakedGood {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub bakery_id: Option<i64>,
}

/// A bakery together with every baked good it owns.
#[derive(Debug, Clone)]
pub struct BakeryWithGoods {
    pub bakery: Bakery,
    pub baked_goods: Vec<BakedGood>,
}

/// A baked good together with its owning bakery, if it has one.
#[derive(Debug, Clone)]
pub struct BakedGoodWithBakery {
    pub baked_good: BakedGood,
    pub bakery: Option<Bakery>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BakeryResponse {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub baked_goods: Vec<BakedGoodSummary>,
}

/// Baked good as listed under its bakery (no `bakery` key).
#[derive(Debug, Serialize, ToSchema)]
pub struct BakedGoodSummary {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub bakery_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BakedGoodResponse {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub bakery_id: Option<i64>,
    pub bakery: Option<BakerySummary>,
}

/// Bakery as embedded in a baked good (no `baked_goods` key).
#[derive(Debug, Serialize, ToSchema)]
pub struct BakerySummary {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// ISO-8601 without offset; fractional seconds only when present.
pub(crate) fn iso8601(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

impl Bakery {
    fn to_summary(&self) -> BakerySummary {
        BakerySummary {
            id: self.id,
            name: self.name.clone(),
            created_at: iso8601(self.created_at),
            updated_at: iso8601(self.updated_at),
        }
    }
}

impl BakedGood {
    fn to_summary(&self) -> BakedGoodSummary {
        BakedGoodSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            created_at: iso8601(self.created_at),
            updated_at: iso8601(self.updated_at),
            bakery_id: self.bakery_id,
        }
    }
}

impl BakeryWithGoods {
    #[must_use]
    pub fn to_response(&self) -> BakeryResponse {
        BakeryResponse {
            id: self.bakery.id,
            name: self.bakery.name.clone(),
            created_at: iso8601(self.bakery.created_at),
            updated_at: iso8601(self.bakery.updated_at),
            baked_goods: self.baked_goods.iter().map(BakedGood::to_summary).collect(),
        }
    }
}

impl BakedGoodWithBakery {
    #[must_use]
    pub fn to_response(&self) -> BakedGoodResponse {
        let good = &self.baked_good;
        BakedGoodResponse {
            id: good.id,
            name: good.name.clone(),
            price: good.price,
            created_at: iso8601(good.created_at),
            updated_at: iso8601(good.updated_at),
            bakery_id: good.bakery_id,
            bakery: self.bakery.as_ref().map(Bakery::to_summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn timestamp(h: u32, m: u32, s: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(h, m, s))
    }

    fn bakery() -> Bakery {
        Bakery {
            id: 1,
            name: Some("Delightful donuts".to_string()),
            created_at: timestamp(9, 30, 0),
            updated_at: None,
        }
    }

    fn good(id: i64, price: i64) -> BakedGood {
        BakedGood {
            id,
            name: Some(format!("good-{id}")),
            price: Some(price),
            created_at: timestamp(10, 0, 0),
            updated_at: None,
            bakery_id: Some(1),
        }
    }

    #[test]
    fn timestamps_render_iso8601_or_null() {
        assert_eq!(
            iso8601(timestamp(9, 30, 5)).as_deref(),
            Some("2024-03-01T09:30:05")
        );
        let with_micros = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_micro_opt(9, 30, 5, 120_000));
        assert_eq!(
            iso8601(with_micros).as_deref(),
            Some("2024-03-01T09:30:05.120")
        );
        assert_eq!(iso8601(None), None);
    }

    #[test]
    fn bakery_shape_omits_back_reference() -> serde_json::Result<()> {
        let record = BakeryWithGoods {
            bakery: bakery(),
            baked_goods: vec![good(1, 5), good(2, 7)],
        };
        let value = serde_json::to_value(record.to_response())?;

        let goods = value["baked_goods"].as_array().cloned().unwrap_or_default();
        assert_eq!(goods.len(), 2);
        for item in goods {
            assert!(item.get("bakery").is_none());
            assert_eq!(item["bakery_id"], json!(1));
        }
        assert_eq!(value["created_at"], json!("2024-03-01T09:30:00"));
        assert_eq!(value["updated_at"], Value::Null);
        Ok(())
    }

    #[test]
    fn baked_good_shape_embeds_flat_bakery() -> serde_json::Result<()> {
        let record = BakedGoodWithBakery {
            baked_good: good(3, 12),
            bakery: Some(bakery()),
        };
        let value = serde_json::to_value(record.to_response())?;

        assert_eq!(value["price"], json!(12));
        assert_eq!(value["bakery"]["id"], json!(1));
        assert_eq!(value["bakery"]["name"], json!("Delightful donuts"));
        assert!(value["bakery"].get("baked_goods").is_none());
        Ok(())
    }

    #[test]
    fn missing_bakery_serializes_as_null() -> serde_json::Result<()> {
        let mut orphan = good(4, 1);
        orphan.bakery_id = None;
        let record = BakedGoodWithBakery {
            baked_good: orphan,
            bakery: None,
        };
        let value = serde_json::to_value(record.to_response())?;
        assert_eq!(value["bakery"], Value::Null);
        assert_eq!(value["bakery_id"], Value::Null);
        Ok(())
    }

    #[test]
    fn keys_keep_declaration_order() -> serde_json::Result<()> {
        let record = BakedGoodWithBakery {
            baked_good: good(5, 2),
            bakery: Some(bakery()),
        };
        let body = serde_json::to_string(&record.to_response())?;
        let order = [
            "\"id\"",
            "\"name\"",
            "\"price\"",
            "\"created_at\"",
            "\"updated_at\"",
            "\"bakery_id\"",
            "\"bakery\"",
        ];
        let positions: Vec<usize> = order.iter().filter_map(|key| body.find(key)).collect();
        assert_eq!(positions.len(), order.len());
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    }
}
