use chrono::Datelike;
use salesdash_core::{Dataset, FilterCriteria, OrderRecord};

/// An order that survived filtering, with its day of month attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredOrder {
    pub order: OrderRecord,
    pub order_purchase_day: u32,
}

/// Rows of the dataset matching a [`FilterCriteria`].
///
/// Owns copies of the matching rows; the base dataset is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredSubset {
    rows: Vec<FilteredOrder>,
}

impl FilteredSubset {
    #[must_use]
    pub fn rows(&self) -> &[FilteredOrder] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilteredOrder> {
        self.rows.iter()
    }
}

impl FromIterator<OrderRecord> for FilteredSubset {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|order| FilteredOrder {
                    order_purchase_day: order.order_purchase_timestamp.day(),
                    order,
                })
                .collect(),
        }
    }
}

/// Keep the orders whose city, segment and purchase date all match.
///
/// Dates are compared at day granularity, so every order placed on
/// `date_range.end` is included whatever its time of day. Empty city or
/// segment sets match nothing; orders with no segment never match.
#[must_use]
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> FilteredSubset {
    dataset
        .records()
        .iter()
        .filter(|order| matches(order, criteria))
        .cloned()
        .collect()
}

fn matches(order: &OrderRecord, criteria: &FilterCriteria) -> bool {
    criteria.cities.contains(&order.customer_city)
        && order
            .customer_segment
            .as_ref()
            .is_some_and(|segment| criteria.segments.contains(segment))
        && criteria.date_range.contains(order.order_date())
}
