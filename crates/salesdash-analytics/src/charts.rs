use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::filter::FilteredSubset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub day: u32,
    pub total_sales: Decimal,
}

/// Sales per product category, ascending by total, ties by category label.
///
/// Returns an empty vector for an empty subset.
#[must_use]
pub fn aggregate_by_category(subset: &FilteredSubset) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in subset.iter() {
        let total = totals
            .entry(row.order.product_category_name_english.as_str())
            .or_default();
        *total = total.saturating_add(row.order.total_price);
    }

    // BTreeMap yields labels in order, so a stable sort on the total keeps
    // equal totals ordered by label.
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_sales)| CategoryTotal {
            category: category.to_string(),
            total_sales,
        })
        .collect();
    out.sort_by(|a, b| a.total_sales.cmp(&b.total_sales));
    out
}

/// Sales per day of month, ascending by day.
///
/// Days without orders are left out rather than reported as zero.
#[must_use]
pub fn aggregate_by_day(subset: &FilteredSubset) -> Vec<DayTotal> {
    let mut totals: BTreeMap<u32, Decimal> = BTreeMap::new();
    for row in subset.iter() {
        let total = totals.entry(row.order_purchase_day).or_default();
        *total = total.saturating_add(row.order.total_price);
    }

    totals
        .into_iter()
        .map(|(day, total_sales)| DayTotal { day, total_sales })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use salesdash_core::OrderRecord;

    use super::*;

    fn order(category: &str, ts: &str, price: &str) -> OrderRecord {
        OrderRecord {
            customer_city: "sao paulo".to_string(),
            customer_segment: Some("Mid Value Customers".to_string()),
            order_purchase_timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            total_price: price.parse().unwrap(),
            review_score: None,
            product_category_name_english: category.to_string(),
        }
    }

    fn subset() -> FilteredSubset {
        [
            order("toys", "2017-01-05 10:00:00", "100.50"),
            order("perfumery", "2017-01-05 18:00:00", "20.00"),
            order("toys", "2017-02-17 09:00:00", "9.50"),
            order("bed_bath_table", "2017-01-31 09:00:00", "20.00"),
            order("housewares", "2017-03-02 09:00:00", "75.25"),
        ]
        .into_iter()
        .collect()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn category_totals_sorted_ascending_with_label_ties() {
        let totals = aggregate_by_category(&subset());
        let got: Vec<(&str, Decimal)> = totals
            .iter()
            .map(|t| (t.category.as_str(), t.total_sales))
            .collect();
        assert_eq!(
            got,
            vec![
                ("bed_bath_table", dec("20.00")),
                ("perfumery", dec("20.00")),
                ("housewares", dec("75.25")),
                ("toys", dec("110.00")),
            ]
        );
    }

    #[test]
    fn day_totals_sorted_by_day_and_sparse() {
        let totals = aggregate_by_day(&subset());
        let got: Vec<(u32, Decimal)> = totals.iter().map(|t| (t.day, t.total_sales)).collect();
        assert_eq!(
            got,
            vec![
                (2, dec("75.25")),
                (5, dec("120.50")),
                (17, dec("9.50")),
                (31, dec("20.00")),
            ]
        );
    }

    #[test]
    fn totals_match_subset_sum() {
        let subset = subset();
        let expected: Decimal = subset.iter().map(|r| r.order.total_price).sum();
        let by_category: Decimal = aggregate_by_category(&subset)
            .iter()
            .map(|t| t.total_sales)
            .sum();
        let by_day: Decimal = aggregate_by_day(&subset).iter().map(|t| t.total_sales).sum();
        assert_eq!(by_category, expected);
        assert_eq!(by_day, expected);
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let huge = "70000000000000000000000000000";
        let subset: FilteredSubset = [
            order("toys", "2017-01-05 10:00:00", huge),
            order("toys", "2017-01-05 11:00:00", huge),
        ]
        .into_iter()
        .collect();
        assert_eq!(aggregate_by_category(&subset)[0].total_sales, Decimal::MAX);
        assert_eq!(aggregate_by_day(&subset)[0].total_sales, Decimal::MAX);
    }

    #[test]
    fn empty_subset_gives_empty_aggregates() {
        let empty = FilteredSubset::default();
        assert!(aggregate_by_category(&empty).is_empty());
        assert!(aggregate_by_day(&empty).is_empty());
    }
}
