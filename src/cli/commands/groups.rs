use anyhow::Result;
use common::CatalogView;
use compute::filter::{CatalogFilter, SearchFields};
use compute::session::Dashboard;
use tracing::{debug, info, trace};

use crate::cli::output::{OutputFormat, Table, render};

pub fn groups(
    session: &Dashboard,
    search: &str,
    categories: &[String],
    search_tags: bool,
    format: OutputFormat,
) -> Result<String> {
    trace!("Entering groups command");
    let fields = if search_tags {
        SearchFields::NAME_AND_TAGS
    } else {
        SearchFields::NAME
    };

    let mut filter = CatalogFilter::new(fields);
    filter.set_search_term(search);
    for category in categories {
        // Repeating a category must not toggle it back off
        if !filter.is_category_active(category) {
            filter.toggle_category(category);
        }
    }
    debug!(search, ?categories, search_tags, "Filtering catalog");

    let view = session.catalog().view(&filter);
    info!("{} sales groups match", view.groups.len());
    render(format, &view, render_text)
}

fn render_text(view: &CatalogView) -> String {
    let chips: Vec<String> = view
        .categories
        .iter()
        .map(|chip| {
            if chip.active {
                format!("[{}]", chip.name)
            } else {
                chip.name.clone()
            }
        })
        .collect();

    let mut out = format!("Categories: {}\n", chips.join(" "));
    if !view.search_term.is_empty() {
        out.push_str(&format!("Search: \"{}\"\n", view.search_term));
    }
    out.push('\n');

    if let Some(message) = &view.empty_message {
        out.push_str(message);
        return out;
    }

    let mut table = Table::new(["ID", "NAME", "STATUS", "TIME SPAN", "LAST UPLOAD", "TAGS"]);
    for group in &view.groups {
        table.row([
            group.id.clone(),
            group.name.clone(),
            group.status_label.clone(),
            group.time_span.clone(),
            group.last_upload.clone(),
            group.tags.join(", "),
        ]);
    }
    out.push_str(table.render().trim_end());
    out
}
