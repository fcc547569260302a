use anyhow::Result;
use common::{HistoryDetail, HistorySummary};
use compute::panels::CatalogPanel;
use compute::session::{Dashboard, Section};
use model::ForecastRecord;
use serde::Serialize;
use tracing::{debug, trace};

use super::forecast::thousands;
use crate::cli::output::{OutputFormat, Table, render};

#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub group_id: String,
    pub group_name: String,
    pub summary: HistorySummary,
    pub records: Vec<ForecastRecord>,
}

pub fn history(
    session: &mut Dashboard,
    group_id: &str,
    view: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    trace!("Entering history command");
    session.navigate(Section::History);
    let panel = session.history_panel();
    panel.select(group_id)?;

    if let Some(record_id) = view {
        debug!("Opening history record {}", record_id);
        let detail = panel.view(record_id)?.clone();
        return render(format, &detail, render_detail);
    }

    let group_name = panel
        .selected()
        .map(|g| g.name().to_string())
        .unwrap_or_default();
    let output = HistoryOutput {
        group_id: group_id.to_string(),
        group_name,
        summary: panel.summary()?,
        records: panel.records()?,
    };
    render(format, &output, render_history)
}

fn render_history(output: &HistoryOutput) -> String {
    let summary = &output.summary;
    let percent = |value: Option<f64>| {
        value
            .map(|v| format!("{:.1}%", v))
            .unwrap_or_else(|| "-".to_string())
    };

    let mut out = format!(
        "Forecast history for {} ({})\n\n\
         Total forecasts: {}\n\
         Average accuracy: {}\n\
         Best accuracy: {}{}\n\
         Average growth: {}\n\
         Latest run: {}\n\n",
        output.group_name,
        output.group_id,
        summary.total,
        percent(summary.average_accuracy),
        percent(summary.best_accuracy),
        summary
            .best_accuracy_on
            .map(|d| format!(" on {}", d.format("%b %-d, %Y")))
            .unwrap_or_default(),
        summary
            .average_growth
            .map(|v| format!("{:+.1}%", v))
            .unwrap_or_else(|| "-".to_string()),
        summary
            .latest_run
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "-".to_string()),
    );

    let mut table = Table::new(["ID", "DATE", "HORIZON", "MODEL", "ACCURACY", "GROWTH"]);
    for record in &output.records {
        table.row([
            record.id.clone(),
            record.display_date(),
            record.horizon.short_label().to_string(),
            record.model_version.clone(),
            record.display_accuracy(),
            record.display_growth(),
        ]);
    }
    out.push_str(table.render().trim_end());
    out
}

fn render_detail(detail: &HistoryDetail) -> String {
    let record = &detail.record;
    let mut out = format!(
        "Forecast {} generated on {}\n\
         Horizon: {}\n\
         Model: {}\n\
         Accuracy: {}\n\
         Growth: {}\n\n",
        record.id,
        record.display_date(),
        record.horizon.label(),
        record.model_version,
        record.display_accuracy(),
        record.display_growth(),
    );

    let mut table = Table::new(["MONTH", "ACTUAL", "FORECAST"]);
    for row in &detail.performance {
        table.row([row.month.clone(), thousands(row.sales), thousands(row.forecast)]);
    }
    out.push_str(table.render().trim_end());
    out
}
