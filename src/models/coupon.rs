use crate::entities::{DiscountType, coupon_entity};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponResponse {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_nights: i32,
    pub max_uses: Option<i32>,
    pub uses_count: i32,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<coupon_entity::Model> for CouponResponse {
    fn from(c: coupon_entity::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            discount_type: c.discount_type,
            discount_value: c.discount_value,
            min_nights: c.min_nights,
            max_uses: c.max_uses,
            uses_count: c.uses_count,
            valid_from: c.valid_from,
            valid_until: c.valid_until,
            is_active: c.is_active,
            description_it: c.description_it,
            description_en: c.description_en,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default = "default_min_nights")]
    pub min_nights: i32,
    pub max_uses: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
}

fn default_min_nights() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

/// Partial update. Nullable columns take `Some(None)` to clear them.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_nights: Option<i32>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub max_uses: Option<Option<i32>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub valid_from: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub valid_until: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
}

/// Distinguishes a missing field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer>(
        value: &Option<Option<T>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T: Deserialize<'de>, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<T>>, D::Error> {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CouponValidationQuery {
    pub nights: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponValidationResponse {
    pub valid: bool,
    pub code: String,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_nights: Option<i32>,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null_from_missing() {
        let req: UpdateCouponRequest =
            serde_json::from_str(r#"{"max_uses": null, "min_nights": 2}"#).unwrap();
        assert_eq!(req.max_uses, Some(None));
        assert_eq!(req.valid_until, None);
        assert_eq!(req.min_nights, Some(2));
    }

    #[test]
    fn test_unknown_discount_type_is_rejected() {
        let result: Result<CreateCouponRequest, _> = serde_json::from_str(
            r#"{"code": "x", "discount_type": "bogus", "discount_value": 5}"#,
        );
        assert!(result.is_err());
    }
}
