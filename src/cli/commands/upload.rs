use anyhow::Result;
use common::GroupCard;
use compute::panels::CatalogPanel;
use compute::session::{Dashboard, Section};
use tracing::{debug, error, info, trace};

use crate::cli::output::{OutputFormat, render};

/// Form values for the upload command. Without `group` a new group is created.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub group: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
}

pub async fn upload(
    session: &mut Dashboard,
    request: UploadRequest,
    format: OutputFormat,
) -> Result<String> {
    trace!("Entering upload command");
    session.navigate(Section::Upload);
    let panel = session.upload();

    match &request.group {
        Some(id) => {
            panel.select(id)?;
            debug!("Uploading data for existing group {}", id);
        }
        None => {
            panel.create_new()?;
            debug!("Uploading data for a new group");
        }
    }

    let draft = panel.draft_mut();
    if let Some(name) = request.name {
        draft.name = name;
    }
    if let Some(description) = request.description {
        draft.description = description;
    }
    if let Some(tags) = request.tags {
        draft.tags = tags;
    }

    if let Err(e) = panel.upload() {
        error!("Upload rejected: {}", e);
        return Err(e.into());
    }
    info!("Validating uploaded data");
    let group = panel.finish_upload().await?;
    info!("Upload complete for {}", group.name());

    render(format, &GroupCard::from(&group), render_text)
}

fn render_text(card: &GroupCard) -> String {
    format!(
        "Upload complete\n\
         ID: {}\n\
         Name: {}\n\
         Status: {}\n\
         Last upload: {}\n\
         Tags: {}",
        card.id,
        card.name,
        card.status_label,
        card.last_upload,
        if card.tags.is_empty() {
            "-".to_string()
        } else {
            card.tags.join(", ")
        },
    )
}
