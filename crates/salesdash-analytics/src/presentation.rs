//! Display-ready views of the dashboard: formatted KPI strings and bar chart
//! specs a renderer can draw without further computation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::charts::{CategoryTotal, DayTotal};
use crate::kpi::KpiSummary;

pub const DASHBOARD_TITLE: &str = "Sales Performance Dashboard";
pub const BAR_COLOR: &str = "#E36414";
pub const STAR_GLYPH: &str = "⭐";
pub const NO_DATA_NOTICE: &str = "No data available for the selected filters.";

const PLACEHOLDER_LABEL: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    Auto,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: Decimal,
    /// Text drawn next to the bar, when the chart annotates its values.
    pub annotation: Option<String>,
}

/// Everything a renderer needs to draw one bar chart.
///
/// `bars` are in display order. For horizontal charts the value runs along x.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub orientation: Orientation,
    pub tick_mode: TickMode,
    pub color: String,
    /// Upper bound of the value axis, if fixed.
    pub value_axis_max: Option<Decimal>,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub(crate) fn new(
        title: &str,
        x_label: &str,
        y_label: &str,
        orientation: Orientation,
        color: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            orientation,
            tick_mode: TickMode::Auto,
            color: color.to_string(),
            value_axis_max: None,
            bars: Vec::new(),
        }
    }

    pub(crate) fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = if bars.is_empty() {
            vec![Bar {
                label: PLACEHOLDER_LABEL.to_string(),
                value: Decimal::ZERO,
                annotation: None,
            }]
        } else {
            bars
        };
        self
    }

    /// True when the only bar is the zero-valued stand-in for an empty aggregate.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.bars.as_slice(), [bar] if bar.label == PLACEHOLDER_LABEL && bar.value.is_zero())
    }
}

/// "Sales by Product Line": one horizontal bar per category, in aggregate order.
#[must_use]
pub fn product_line_chart(totals: &[CategoryTotal]) -> BarChart {
    let bars = totals
        .iter()
        .map(|t| Bar {
            label: t.category.clone(),
            value: t.total_sales,
            annotation: None,
        })
        .collect();
    BarChart::new(
        "Sales by Product Line",
        "Total Sales",
        "Product Category",
        Orientation::Horizontal,
        BAR_COLOR,
    )
    .with_bars(bars)
}

/// "Sales by Day": one vertical bar per day that had sales.
#[must_use]
pub fn daily_sales_chart(totals: &[DayTotal]) -> BarChart {
    let bars = totals
        .iter()
        .map(|t| Bar {
            label: t.day.to_string(),
            value: t.total_sales,
            annotation: None,
        })
        .collect();
    let mut chart = BarChart::new("Sales by Day", "Day", "Sales", Orientation::Vertical, BAR_COLOR)
        .with_bars(bars);
    chart.tick_mode = TickMode::Linear;
    chart
}

/// KPI values as the dashboard shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiDisplay {
    pub total_sales: String,
    pub average_rating: String,
    pub average_sales_per_order: String,
}

impl From<&KpiSummary> for KpiDisplay {
    fn from(kpis: &KpiSummary) -> Self {
        Self {
            total_sales: format_total_sales(kpis.total_sales),
            average_rating: format_rating(kpis.average_rating, kpis.star_count),
            average_sales_per_order: format_currency(kpis.average_order_value),
        }
    }
}

/// `R$ 1,234`
#[must_use]
pub fn format_total_sales(total: i64) -> String {
    let digits = total.unsigned_abs().to_string();
    let sign = if total < 0 { "-" } else { "" };
    format!("R$ {sign}{}", group_thousands(&digits))
}

/// `R$ 1,234.50`, rounded half to even at the cent.
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("R$ {sign}{}.{frac_part}", group_thousands(int_part))
}

/// Star glyphs followed by the one-decimal rating, e.g. `⭐⭐⭐⭐ 4.3`.
#[must_use]
pub fn format_rating(rating: Decimal, star_count: u32) -> String {
    let stars = star_glyphs(star_count);
    if stars.is_empty() {
        format!("{rating:.1}")
    } else {
        format!("{stars} {rating:.1}")
    }
}

#[must_use]
pub fn star_glyphs(count: u32) -> String {
    STAR_GLYPH.repeat(count as usize)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
