use anyhow::Result;
use common::ForecastSummary;
use compute::panels::CatalogPanel;
use compute::session::{Dashboard, Section};
use model::{ForecastOptions, ForecastRecord};
use serde::Serialize;
use tracing::{debug, error, info, trace};

use crate::cli::output::{OutputFormat, Table, render};

#[derive(Debug, Serialize)]
pub struct ForecastOutput {
    pub summary: ForecastSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<ForecastRecord>,
}

pub async fn forecast(
    session: &mut Dashboard,
    group_id: &str,
    options: ForecastOptions,
    save: bool,
    format: OutputFormat,
) -> Result<String> {
    trace!("Entering forecast command");
    session.navigate(Section::Forecast);
    let panel = session.forecast();

    panel.select(group_id)?;
    panel.configure(options)?;
    debug!(?options, "Forecast configured");

    if let Err(e) = panel.generate() {
        error!("Failed to start forecast for group '{}': {}", group_id, e);
        return Err(e.into());
    }
    info!("Generating forecast, this takes a moment");
    let summary = panel.finish_generation().await?.clone();

    let saved = if save {
        let record = panel.save_to_history()?;
        info!("Forecast saved to history as record {}", record.id);
        Some(record)
    } else {
        None
    };

    render(format, &ForecastOutput { summary, saved }, render_text)
}

fn render_text(output: &ForecastOutput) -> String {
    let summary = &output.summary;
    let options = &summary.options;
    let mut out = format!(
        "Forecast for {} ({})\n\
         Horizon: {}  Calendar effects: {}  Price effects: {}\n\
         Model: {}\n\n\
         Expected growth: {:+.1}%\n\
         Uncertainty: ±{:.1}% (95% confidence interval)\n\
         Accuracy: {:.1}%\n\
         Peak month: {} ({} units expected)\n\n",
        summary.group_name,
        summary.group_id,
        options.horizon.label(),
        on_off(options.include_calendar),
        on_off(options.include_price),
        summary.model_version,
        summary.expected_growth,
        summary.uncertainty,
        summary.accuracy,
        summary.peak_month,
        thousands(summary.peak_units),
    );

    let mut table = Table::new(["MONTH", "BASELINE", "CORRECTED", "LOWER", "UPPER"]);
    for point in &summary.forecast {
        table.row([
            point.month.clone(),
            thousands(point.baseline),
            thousands(point.corrected),
            thousands(point.lower),
            thousands(point.upper),
        ]);
    }
    out.push_str(table.render().trim_end());

    if let Some(record) = &output.saved {
        out.push_str(&format!(
            "\n\nSaved to history as record {} ({})",
            record.id,
            record.display_date()
        ));
    }
    out
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// `33700` as `33,700`.
pub(crate) fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(33700), "33,700");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
