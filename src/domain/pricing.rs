//! Price arithmetic for a stay.
//!
//! Money is `rust_decimal::Decimal` throughout; amounts are rounded to cents
//! with banker's rounding only where a division happens (percentage coupons).

use crate::domain::Stay;
use crate::entities::{DiscountType, coupon_entity, upsell_entity};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use uuid::Uuid;

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Provider amounts are integer minor units.
pub fn to_minor_units(amount: Decimal) -> i64 {
    (round_money(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(0)
}

/// Sum of the nightly rate for every night of the stay, using the per-date
/// override when one exists.
pub fn room_subtotal(
    stay: &Stay,
    default_price: Decimal,
    custom_prices: &HashMap<NaiveDate, Decimal>,
) -> Decimal {
    stay.night_dates()
        .map(|night| custom_prices.get(&night).copied().unwrap_or(default_price))
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsellSelection {
    pub applied: Vec<Uuid>,
    pub total: Decimal,
}

/// Keeps requested upsells that exist, are active and fit the stay length.
/// Unknown or ineligible ids are dropped without error; duplicates count once.
pub fn select_upsells(
    requested: &[Uuid],
    available: &[upsell_entity::Model],
    nights: i64,
) -> UpsellSelection {
    let mut selection = UpsellSelection::default();
    for id in requested {
        if selection.applied.contains(id) {
            continue;
        }
        let Some(upsell) = available.iter().find(|u| u.id == *id) else {
            continue;
        };
        if !upsell.is_active || nights < i64::from(upsell.min_nights) {
            continue;
        }
        selection.applied.push(upsell.id);
        selection.total += upsell.price;
    }
    selection
}

pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    Inactive,
    BelowMinNights { min_nights: i32 },
    UsageExhausted,
    NotYetValid,
    Expired,
}

impl std::fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponRejection::Inactive => write!(f, "Coupon is not active"),
            CouponRejection::BelowMinNights { min_nights } => {
                write!(f, "Coupon requires a stay of at least {min_nights} nights")
            }
            CouponRejection::UsageExhausted => write!(f, "Coupon usage limit reached"),
            CouponRejection::NotYetValid => write!(f, "Coupon is not valid yet"),
            CouponRejection::Expired => write!(f, "Coupon has expired"),
        }
    }
}

pub fn check_coupon(
    coupon: &coupon_entity::Model,
    nights: i64,
    today: NaiveDate,
) -> Result<(), CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }
    if nights < i64::from(coupon.min_nights) {
        return Err(CouponRejection::BelowMinNights {
            min_nights: coupon.min_nights,
        });
    }
    if let Some(max_uses) = coupon.max_uses
        && coupon.uses_count >= max_uses
    {
        return Err(CouponRejection::UsageExhausted);
    }
    if let Some(valid_from) = coupon.valid_from
        && today < valid_from
    {
        return Err(CouponRejection::NotYetValid);
    }
    if let Some(valid_until) = coupon.valid_until
        && today > valid_until
    {
        return Err(CouponRejection::Expired);
    }
    Ok(())
}

impl DiscountType {
    /// Percentage applies to room and upsells; a fixed amount never exceeds
    /// the room portion so add-ons are always charged.
    pub fn discount(&self, value: Decimal, room_price: Decimal, subtotal: Decimal) -> Decimal {
        match self {
            DiscountType::Percentage => round_money(subtotal * value / Decimal::ONE_HUNDRED),
            DiscountType::Fixed => value.min(room_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub nights: i64,
    pub room_price: Decimal,
    pub upsells_total: Decimal,
    pub applied_upsells: Vec<Uuid>,
    pub coupon_code: Option<String>,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
}

impl PriceBreakdown {
    /// `coupon` must already have passed [`check_coupon`].
    pub fn compose(
        nights: i64,
        room_price: Decimal,
        upsells: UpsellSelection,
        coupon: Option<&coupon_entity::Model>,
    ) -> Self {
        let subtotal = room_price + upsells.total;
        let discount_amount = coupon
            .map(|c| c.discount_type.discount(c.discount_value, room_price, subtotal))
            .unwrap_or(Decimal::ZERO);
        Self {
            nights,
            room_price,
            upsells_total: upsells.total,
            applied_upsells: upsells.applied,
            coupon_code: coupon.map(|c| c.code.clone()),
            discount_amount,
            total_price: (subtotal - discount_amount).max(Decimal::ZERO),
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.room_price + self.upsells_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn upsell(slug: &str, price: Decimal, min_nights: i32, is_active: bool) -> upsell_entity::Model {
        upsell_entity::Model {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title_it: slug.to_string(),
            title_en: slug.to_string(),
            description_it: String::new(),
            description_en: String::new(),
            price,
            min_nights,
            is_active,
            order: 0,
            icon: "gift".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn coupon(discount_type: DiscountType, value: Decimal) -> coupon_entity::Model {
        coupon_entity::Model {
            id: Uuid::new_v4(),
            code: "ESTATE".to_string(),
            discount_type,
            discount_value: value,
            min_nights: 1,
            max_uses: None,
            uses_count: 0,
            valid_from: None,
            valid_until: None,
            is_active: true,
            description_it: None,
            description_en: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subtotal_without_overrides_is_nights_times_rate() {
        let stay = Stay::new(d("2026-09-10"), d("2026-09-14")).unwrap();
        assert_eq!(room_subtotal(&stay, dec!(80), &HashMap::new()), dec!(320));
    }

    #[test]
    fn test_subtotal_mixes_default_and_custom_prices() {
        // nonna: 80 default, 120 on 2026-06-01
        let stay = Stay::new(d("2026-05-31"), d("2026-06-02")).unwrap();
        let mut custom = HashMap::new();
        custom.insert(d("2026-06-01"), dec!(120));
        custom.insert(d("2026-06-02"), dec!(500)); // check-out day is not a night
        assert_eq!(room_subtotal(&stay, dec!(80), &custom), dec!(200));
    }

    #[test]
    fn test_upsell_below_min_nights_is_dropped() {
        let cleaning = upsell("pulizia-extra", dec!(40), 7, true);
        let transfer = upsell("transfer-aeroporto", dec!(60), 0, true);
        let selection = select_upsells(&[cleaning.id, transfer.id], &[cleaning, transfer.clone()], 3);
        assert_eq!(selection.applied, vec![transfer.id]);
        assert_eq!(selection.total, dec!(60));
    }

    #[test]
    fn test_upsell_unknown_inactive_and_duplicate_ids() {
        let dinner = upsell("cena-tipica", dec!(45), 0, true);
        let disabled = upsell("late-checkout", dec!(20), 0, false);
        let selection = select_upsells(
            &[Uuid::new_v4(), dinner.id, dinner.id, disabled.id],
            &[dinner.clone(), disabled],
            2,
        );
        assert_eq!(selection.applied, vec![dinner.id]);
        assert_eq!(selection.total, dec!(45));
    }

    #[test]
    fn test_percentage_coupon_on_room_price() {
        let c = coupon(DiscountType::Percentage, dec!(10));
        let breakdown = PriceBreakdown::compose(2, dec!(200), UpsellSelection::default(), Some(&c));
        assert_eq!(breakdown.discount_amount, dec!(20));
        assert_eq!(breakdown.total_price, dec!(180));
        assert_eq!(breakdown.coupon_code.as_deref(), Some("ESTATE"));
    }

    #[test]
    fn test_fixed_coupon_is_capped_to_room_price() {
        let c = coupon(DiscountType::Fixed, dec!(500));
        let upsells = UpsellSelection {
            applied: vec![Uuid::new_v4()],
            total: dec!(50),
        };
        let breakdown = PriceBreakdown::compose(2, dec!(200), upsells, Some(&c));
        assert_eq!(breakdown.discount_amount, dec!(200));
        // add-ons are still charged
        assert_eq!(breakdown.total_price, dec!(50));
    }

    #[test]
    fn test_percentage_coupon_includes_upsells_and_rounds() {
        let c = coupon(DiscountType::Percentage, dec!(15));
        let upsells = UpsellSelection {
            applied: vec![Uuid::new_v4()],
            total: dec!(33.33),
        };
        let breakdown = PriceBreakdown::compose(1, dec!(80), upsells, Some(&c));
        // 113.33 * 0.15 = 16.9995
        assert_eq!(breakdown.discount_amount, dec!(17.00));
        assert_eq!(breakdown.total_price, dec!(96.33));
    }

    #[test]
    fn test_total_never_negative() {
        let c = coupon(DiscountType::Percentage, dec!(100));
        let breakdown = PriceBreakdown::compose(1, dec!(80), UpsellSelection::default(), Some(&c));
        assert_eq!(breakdown.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_coupon_eligibility_rules() {
        let today = d("2026-10-16");
        let mut c = coupon(DiscountType::Fixed, dec!(20));
        assert!(check_coupon(&c, 1, today).is_ok());

        c.min_nights = 3;
        assert_eq!(
            check_coupon(&c, 2, today),
            Err(CouponRejection::BelowMinNights { min_nights: 3 })
        );
        c.min_nights = 1;

        c.max_uses = Some(5);
        c.uses_count = 5;
        assert_eq!(check_coupon(&c, 2, today), Err(CouponRejection::UsageExhausted));
        c.uses_count = 4;
        assert!(check_coupon(&c, 2, today).is_ok());

        c.valid_from = Some(d("2026-10-17"));
        assert_eq!(check_coupon(&c, 2, today), Err(CouponRejection::NotYetValid));
        c.valid_from = Some(today);
        c.valid_until = Some(today);
        assert!(check_coupon(&c, 2, today).is_ok());
        c.valid_until = Some(d("2026-10-15"));
        assert_eq!(check_coupon(&c, 2, today), Err(CouponRejection::Expired));

        c.valid_until = None;
        c.is_active = false;
        assert_eq!(check_coupon(&c, 2, today), Err(CouponRejection::Inactive));
    }

    #[test]
    fn test_normalize_coupon_code() {
        assert_eq!(normalize_coupon_code("  estate10 "), "ESTATE10");
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec!(200)), 20000);
        assert_eq!(to_minor_units(dec!(96.335)), 9634);
        assert_eq!(to_minor_units(Decimal::ZERO), 0);
    }
}
