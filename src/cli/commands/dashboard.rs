use anyhow::Result;
use common::AnalyticsSnapshot;
use compute::panels::CatalogPanel;
use compute::session::{Dashboard, Section};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::forecast::thousands;
use crate::cli::output::{OutputFormat, Table, render};

pub fn dashboard(session: &mut Dashboard, group_id: &str, format: OutputFormat) -> Result<String> {
    trace!("Entering dashboard command");
    session.navigate(Section::Dashboard);
    let panel = session.analytics();
    panel.select(group_id)?;

    let snapshot = panel.analytics()?;
    debug!("Analytics loaded for {}", snapshot.group_name);
    render(format, &snapshot, render_text)
}

fn money(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}

fn render_text(snapshot: &AnalyticsSnapshot) -> String {
    let mut out = format!("Analytics for {} ({})\n\n", snapshot.group_name, snapshot.group_id);

    for kpi in &snapshot.kpis {
        out.push_str(&format!("{}: {} ({})\n", kpi.title, kpi.value, kpi.change));
    }

    let mut trend = Table::new(["MONTH", "SALES", "TARGET", "GROWTH"]);
    for point in &snapshot.sales_trend {
        trend.row([
            point.month.clone(),
            thousands(point.sales),
            thousands(point.target),
            format!("{:+.1}%", point.growth),
        ]);
    }
    out.push_str("\nSales trend\n");
    out.push_str(&trend.render());

    let mut mix = Table::new(["PRODUCT", "UNITS", "SHARE"]);
    for product in &snapshot.product_mix {
        mix.row([
            product.name.clone(),
            thousands(product.value),
            format!("{}%", product.percentage),
        ]);
    }
    out.push_str("\nProduct mix\n");
    out.push_str(&mix.render());

    let mut channels = Table::new(["CHANNEL", "REVENUE", "ORDERS", "AVG ORDER"]);
    for channel in &snapshot.channels {
        channels.row([
            channel.channel.clone(),
            money(channel.revenue),
            thousands(channel.orders),
            money(channel.avg_order),
        ]);
    }
    out.push_str("\nChannel performance\n");
    out.push_str(&channels.render());

    let accuracy: Vec<String> = snapshot
        .accuracy
        .iter()
        .map(|week| format!("{} {:.1}%", week.week, week.accuracy))
        .collect();
    out.push_str("\nForecast accuracy: ");
    out.push_str(&accuracy.join(", "));
    out
}
