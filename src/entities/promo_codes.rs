use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 100 % expressed in basis points
pub const FULL_PERCENT_BP: i64 = 10_000;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is in basis points (1250 = 12.5 %)
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// `discount_value` is in cents
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// Waives the whole order amount
    #[sea_orm(string_value = "free_ticket")]
    FreeTicket,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
            DiscountType::FreeTicket => write!(f, "free_ticket"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(30))")]
#[serde(rename_all = "snake_case")]
pub enum ApplicableTo {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "specific_events")]
    SpecificEvents,
    #[sea_orm(string_value = "specific_categories")]
    SpecificCategories,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "promo_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub applicable_to: ApplicableTo,
    pub max_uses: Option<i64>,
    pub max_uses_per_user: i64,
    pub current_uses: i64,
    pub min_order_amount: Option<i64>, // cents
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Active, inside the validity window (both ends inclusive) and under the global cap.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.valid_from <= now
            && now <= self.valid_until
            && self.max_uses.is_none_or(|max| self.current_uses < max)
    }

    pub fn meets_minimum(&self, order_amount: i64) -> bool {
        self.min_order_amount.is_none_or(|min| order_amount >= min)
    }

    /// Discount in cents for an order of `order_amount` cents.
    ///
    /// Zero when the code is not valid at `now` or the order is below the
    /// minimum amount. Never negative and never more than `order_amount`.
    pub fn calculate_discount(&self, order_amount: i64, now: DateTime<Utc>) -> i64 {
        if order_amount <= 0 || !self.is_valid(now) || !self.meets_minimum(order_amount) {
            return 0;
        }

        let discount = match self.discount_type {
            DiscountType::Percentage => percentage_of(order_amount, self.discount_value),
            DiscountType::Fixed => self.discount_value.min(order_amount),
            DiscountType::FreeTicket => order_amount,
        };

        discount.clamp(0, order_amount)
    }

    /// Whether the code can be used for an event, given the code's link rows.
    pub fn applies_to(
        &self,
        event_id: i64,
        category_id: Option<i64>,
        linked_events: &[i64],
        linked_categories: &[i64],
    ) -> bool {
        match self.applicable_to {
            ApplicableTo::All => true,
            ApplicableTo::SpecificEvents => linked_events.contains(&event_id),
            ApplicableTo::SpecificCategories => {
                category_id.is_some_and(|c| linked_categories.contains(&c))
            }
        }
    }
}

/// `amount * bp / 10000`, rounded half-up to the cent.
fn percentage_of(amount: i64, bp: i64) -> i64 {
    let amount = amount as i128;
    let bp = bp.max(0) as i128;
    let scaled = amount * bp;
    let half = (FULL_PERCENT_BP / 2) as i128;
    ((scaled + half) / FULL_PERCENT_BP as i128) as i64
}

/// Canonical form of a code as stored and looked up.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(discount_type: DiscountType, value: i64) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            code: "SPRING".to_string(),
            description: None,
            discount_type,
            discount_value: value,
            applicable_to: ApplicableTo::All,
            max_uses: None,
            max_uses_per_user: 1,
            current_uses: 0,
            min_order_amount: None,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_inactive_code_never_discounts() {
        let mut c = code(DiscountType::FreeTicket, 0);
        c.is_active = false;
        let now = Utc::now();
        for amount in [0, 1, 999, 50_000, i32::MAX as i64] {
            assert_eq!(c.calculate_discount(amount, now), 0);
        }
    }

    #[test]
    fn test_percentage_never_exceeds_amount() {
        let now = Utc::now();
        for bp in [0, 1, 1250, 3333, 5000, 9999, FULL_PERCENT_BP] {
            let c = code(DiscountType::Percentage, bp);
            for amount in [1, 3, 99, 1001, 123_457] {
                let d = c.calculate_discount(amount, now);
                assert!(d <= amount, "bp={bp} amount={amount} discount={d}");
                assert!(d >= 0);
            }
        }
    }

    #[test]
    fn test_percentage_rounds_half_up_to_cent() {
        let now = Utc::now();
        // 12.5 % of $10.01 = 125.125 cents
        assert_eq!(code(DiscountType::Percentage, 1250).calculate_discount(1001, now), 125);
        // 50 % of 3 cents = 1.5 cents
        assert_eq!(code(DiscountType::Percentage, 5000).calculate_discount(3, now), 2);
        assert_eq!(code(DiscountType::Percentage, FULL_PERCENT_BP).calculate_discount(4200, now), 4200);
    }

    #[test]
    fn test_percentage_above_full_is_capped() {
        let now = Utc::now();
        assert_eq!(code(DiscountType::Percentage, 15_000).calculate_discount(2000, now), 2000);
    }

    #[test]
    fn test_fixed_is_capped_at_order_amount() {
        let c = code(DiscountType::Fixed, 5000);
        let now = Utc::now();
        assert_eq!(c.calculate_discount(3000, now), 3000);
        assert_eq!(c.calculate_discount(8000, now), 5000);
    }

    #[test]
    fn test_free_ticket_waives_full_amount() {
        let c = code(DiscountType::FreeTicket, 0);
        assert_eq!(c.calculate_discount(7450, Utc::now()), 7450);
    }

    #[test]
    fn test_exhausted_code_is_invalid_inside_window() {
        let mut c = code(DiscountType::Fixed, 500);
        c.max_uses = Some(10);
        c.current_uses = 10;
        let now = Utc::now();
        assert!(!c.is_valid(now));
        assert_eq!(c.calculate_discount(1000, now), 0);

        c.current_uses = 9;
        assert!(c.is_valid(now));
    }

    #[test]
    fn test_validity_window_is_inclusive() {
        let c = code(DiscountType::Fixed, 500);
        assert!(c.is_valid(c.valid_from));
        assert!(c.is_valid(c.valid_until));
        assert!(!c.is_valid(c.valid_from - Duration::seconds(1)));
        assert!(!c.is_valid(c.valid_until + Duration::seconds(1)));
    }

    #[test]
    fn test_minimum_order_amount() {
        let mut c = code(DiscountType::Fixed, 500);
        c.min_order_amount = Some(2000);
        let now = Utc::now();
        assert_eq!(c.calculate_discount(1999, now), 0);
        assert_eq!(c.calculate_discount(2000, now), 500);
    }

    #[test]
    fn test_non_positive_amount() {
        let c = code(DiscountType::FreeTicket, 0);
        assert_eq!(c.calculate_discount(0, Utc::now()), 0);
        assert_eq!(c.calculate_discount(-100, Utc::now()), 0);
    }

    #[test]
    fn test_applicability() {
        let mut c = code(DiscountType::Fixed, 100);
        assert!(c.applies_to(7, None, &[], &[]));

        c.applicable_to = ApplicableTo::SpecificEvents;
        assert!(c.applies_to(7, None, &[3, 7], &[]));
        assert!(!c.applies_to(8, Some(1), &[3, 7], &[1]));

        c.applicable_to = ApplicableTo::SpecificCategories;
        assert!(c.applies_to(8, Some(1), &[], &[1, 2]));
        assert!(!c.applies_to(8, None, &[], &[1, 2]));
        assert!(!c.applies_to(8, Some(5), &[8], &[1, 2]));
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  summer25 "), "SUMMER25");
    }
}
