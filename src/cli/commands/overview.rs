use anyhow::Result;
use common::OverviewSnapshot;
use compute::session::{Dashboard, Section};
use tracing::trace;

use super::forecast::thousands;
use crate::cli::output::{OutputFormat, Table, render};

pub fn overview(session: &mut Dashboard, format: OutputFormat) -> Result<String> {
    trace!("Entering overview command");
    session.navigate(Section::Overview);
    render(format, &session.overview(), render_text)
}

fn render_text(overview: &OverviewSnapshot) -> String {
    let counts = &overview.status_counts;
    let mut out = format!(
        "Executive summary\n\n\
         Total sales groups: {} ({} ready, {} needs data, {} forecasted)\n\
         Active forecasts: {}\n\
         Average accuracy: {:.1}%\n\
         Last data update: {} ago\n\n",
        overview.total_groups,
        counts.ready,
        counts.needs_data,
        counts.forecasted,
        overview.active_forecasts,
        overview.average_accuracy,
        overview.last_data_update,
    );

    let mut sales = Table::new(["MONTH", "SALES", "FORECAST"]);
    for row in &overview.sales {
        sales.row([row.month.clone(), thousands(row.sales), thousands(row.forecast)]);
    }
    out.push_str(&sales.render());

    out.push_str("\nRecent activity\n");
    for item in &overview.recent_activity {
        out.push_str(&format!(
            "- {} {} ({}, {})\n",
            item.kind, item.title, item.date, item.status
        ));
    }

    out.push_str("\nNotifications\n");
    let notifications: Vec<String> = overview
        .notifications
        .iter()
        .map(|n| format!("- {}", n))
        .collect();
    out.push_str(&notifications.join("\n"));
    out
}
