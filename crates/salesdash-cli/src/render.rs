//! Plain-text rendering of dashboard views for the terminal.

use std::fmt::Write as _;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use salesdash_analytics::{BarChart, Dashboard, KpiDisplay, DASHBOARD_TITLE};
use salesdash_core::FilterCriteria;

const BAR_GLYPH: char = '█';

/// Draw `chart` as horizontal text bars at most `width` cells long.
///
/// Bars scale against the chart's fixed axis maximum when it has one,
/// otherwise against the largest bar. Values past the axis maximum are
/// clipped to `width`.
pub(crate) fn render_bar_chart(chart: &BarChart, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    let _ = writeln!(out, "{} vs {}", chart.y_label, chart.x_label);

    let label_width = chart
        .bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    let scale_max = chart.value_axis_max.unwrap_or_else(|| {
        chart
            .bars
            .iter()
            .map(|b| b.value)
            .max()
            .unwrap_or(Decimal::ZERO)
    });

    for bar in &chart.bars {
        let cells = bar_cells(bar.value, scale_max, width);
        let text = bar
            .annotation
            .clone()
            .unwrap_or_else(|| bar.value.normalize().to_string());
        let _ = writeln!(
            out,
            "{:<label_width$} | {}{} {}",
            bar.label,
            BAR_GLYPH.to_string().repeat(cells),
            " ".repeat(width - cells),
            text
        );
    }
    out
}

fn bar_cells(value: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }
    let ratio = (value / max).min(Decimal::ONE);
    (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width)
}

pub(crate) fn render_criteria(criteria: &FilterCriteria) -> String {
    let join = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "(none)".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "cities: {}\nsegments: {}\ndates: {} to {}",
        join(&criteria.cities),
        join(&criteria.segments),
        criteria.date_range.start,
        criteria.date_range.end
    )
}

pub(crate) fn render_kpis(kpis: &KpiDisplay) -> String {
    format!(
        "{:<24}{}\n{:<24}{}\n{:<24}{}",
        "Total Sales",
        kpis.total_sales,
        "Average Rating",
        kpis.average_rating,
        "Average Sales per Order",
        kpis.average_sales_per_order
    )
}

pub(crate) fn render_dashboard(dashboard: &Dashboard, width: usize) -> String {
    format!(
        "{DASHBOARD_TITLE}\n\n{}\n({} orders)\n\n{}\n\n---\n\n{}\n{}",
        render_criteria(&dashboard.criteria),
        dashboard.row_count,
        render_kpis(&dashboard.kpi_display()),
        render_bar_chart(&dashboard.daily_sales_chart(), width),
        render_bar_chart(&dashboard.product_line_chart(), width),
    )
}
