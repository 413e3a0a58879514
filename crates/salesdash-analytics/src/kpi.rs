use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::filter::FilteredSubset;

/// Headline numbers for a filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KpiSummary {
    /// Sum of `total_price`, truncated toward zero.
    pub total_sales: i64,
    /// Mean of the non-null review scores, 1 decimal place; 0 when there are none.
    pub average_rating: Decimal,
    /// `average_rating` rounded to a whole number of stars.
    pub star_count: u32,
    /// Mean `total_price`, 2 decimal places; 0 for an empty subset.
    pub average_order_value: Decimal,
}

/// Compute the KPI summary. Never fails; empty input gives all zeros.
#[must_use]
pub fn summarize(subset: &FilteredSubset) -> KpiSummary {
    let prices: Vec<Decimal> = subset.iter().map(|r| r.order.total_price).collect();
    let scores: Vec<Decimal> = subset.iter().filter_map(|r| r.order.review_score).collect();

    let total = saturating_sum(prices.iter().copied());
    let total_sales = total.trunc().to_i64().unwrap_or(i64::MAX);

    let average_rating = mean(&scores).map_or(Decimal::ZERO, |m| round_half_even(m, 1));
    let star_count = round_half_even(average_rating, 0)
        .max(Decimal::ZERO)
        .to_u32()
        .unwrap_or(0);

    let average_order_value = mean(&prices).map_or(Decimal::ZERO, |m| round_half_even(m, 2));

    KpiSummary {
        total_sales,
        average_rating,
        star_count,
        average_order_value,
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    saturating_sum(values.iter().copied()).checked_div(Decimal::from(values.len()))
}

/// Sum that clamps at the `Decimal` bounds instead of panicking.
fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn round_half_even(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use salesdash_core::OrderRecord;

    use super::*;

    fn order(price: &str, score: Option<&str>) -> OrderRecord {
        OrderRecord {
            customer_city: "sao paulo".to_string(),
            customer_segment: Some("Mid Value Customers".to_string()),
            order_purchase_timestamp: NaiveDateTime::parse_from_str(
                "2017-01-05 10:00:00",
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap(),
            total_price: price.parse().unwrap(),
            review_score: score.map(|s| s.parse().unwrap()),
            product_category_name_english: "toys".to_string(),
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn empty_subset_is_all_zero() {
        let kpis = summarize(&FilteredSubset::default());
        assert_eq!(
            kpis,
            KpiSummary {
                total_sales: 0,
                average_rating: Decimal::ZERO,
                star_count: 0,
                average_order_value: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn total_sales_truncates_instead_of_rounding() {
        let subset: FilteredSubset = [order("10.60", None), order("20.39", None)]
            .into_iter()
            .collect();
        // 30.99 -> 30
        assert_eq!(summarize(&subset).total_sales, 30);
    }

    #[test]
    fn rating_ignores_null_scores() {
        let subset: FilteredSubset = [
            order("10", Some("5")),
            order("10", None),
            order("10", Some("4")),
        ]
        .into_iter()
        .collect();
        let kpis = summarize(&subset);
        assert_eq!(kpis.average_rating, dec("4.5"));
        // 4.5 rounds half to even
        assert_eq!(kpis.star_count, 4);
    }

    #[test]
    fn all_null_scores_give_zero_rating_and_no_stars() {
        let subset: FilteredSubset = [order("10", None), order("30", None)]
            .into_iter()
            .collect();
        let kpis = summarize(&subset);
        assert_eq!(kpis.average_rating, Decimal::ZERO);
        assert_eq!(kpis.star_count, 0);
        assert_eq!(kpis.average_order_value, dec("20"));
        assert_eq!(kpis.total_sales, 40);
    }

    #[test]
    fn rating_rounds_to_one_decimal() {
        let subset: FilteredSubset = [
            order("1", Some("5")),
            order("1", Some("4")),
            order("1", Some("4")),
        ]
        .into_iter()
        .collect();
        let kpis = summarize(&subset);
        // 13 / 3 = 4.333..
        assert_eq!(kpis.average_rating, dec("4.3"));
        assert_eq!(kpis.star_count, 4);
    }

    #[test]
    fn star_count_rounds_up_above_half() {
        let subset: FilteredSubset = [order("1", Some("5")), order("1", Some("4.2"))]
            .into_iter()
            .collect();
        let kpis = summarize(&subset);
        assert_eq!(kpis.average_rating, dec("4.6"));
        assert_eq!(kpis.star_count, 5);
    }

    #[test]
    fn average_order_value_rounds_to_two_decimals() {
        let subset: FilteredSubset = [order("10.00", None), order("10.00", None), order("10.01", None)]
            .into_iter()
            .collect();
        // 30.01 / 3 = 10.00333..
        assert_eq!(summarize(&subset).average_order_value, dec("10.00"));
    }

    #[test]
    fn huge_prices_saturate_instead_of_overflowing() {
        let huge = "70000000000000000000000000000";
        let subset: FilteredSubset = [order(huge, Some("5")), order(huge, Some("4"))]
            .into_iter()
            .collect();
        let kpis = summarize(&subset);
        assert_eq!(kpis.total_sales, i64::MAX);
        assert_eq!(kpis.average_order_value, round_half_even(Decimal::MAX / Decimal::TWO, 2));
        assert_eq!(kpis.average_rating, dec("4.5"));
    }
}
