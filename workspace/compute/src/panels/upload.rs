use model::{GroupStatus, PipelineEvent, SalesGroup, parse_tag_list};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{ComputeError, Result};
use crate::filter::SearchFields;
use crate::panels::{CatalogPanel, PanelWizard};
use crate::simulation::PendingTask;
use crate::wizard::{UploadStep, Wizard};

/// Relative upload time shown right after a confirmed upload.
const JUST_NOW: &str = "just now";

/// The editable group form of the upload step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDraft {
    pub name: String,
    pub description: String,
    /// Comma separated tag text, e.g. `"Milk, importation"`.
    pub tags: String,
}

impl UploadDraft {
    /// Pre-fills the form from an existing group.
    pub fn from_group(group: &SalesGroup) -> Self {
        Self {
            name: group.name().to_string(),
            description: group.description().unwrap_or_default().to_string(),
            tags: group.tags().join(", "),
        }
    }

    /// Parsed tag list: trimmed, blanks dropped, duplicates removed.
    pub fn parse_tags(&self) -> Result<Vec<String>> {
        Ok(parse_tag_list(&self.tags)?)
    }

    fn validate(&self) -> Result<ValidatedDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ComputeError::Validation(
                "Sales group name cannot be empty".to_string(),
            ));
        }
        Ok(ValidatedDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            tags: self.parse_tags()?,
        })
    }
}

#[derive(Debug, Clone)]
struct ValidatedDraft {
    name: String,
    description: String,
    tags: Vec<String>,
}

/// The upload panel: select -> upload.
///
/// Searches names and tags. "Create new" skips the catalog and starts the
/// upload step with a blank draft for a provisional group.
#[derive(Debug)]
pub struct UploadPanel {
    catalog: Catalog,
    wizard: Wizard<UploadStep>,
    draft: UploadDraft,
    creating: bool,
    delay: Duration,
    pending: Option<PendingTask<ValidatedDraft>>,
    complete: bool,
}

impl UploadPanel {
    pub fn new(catalog: Catalog, delay: Duration) -> Self {
        Self {
            catalog,
            wizard: Wizard::new(SearchFields::NAME_AND_TAGS),
            draft: UploadDraft::default(),
            creating: false,
            delay,
            pending: None,
            complete: false,
        }
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut UploadDraft {
        &mut self.draft
    }

    /// Whether the upload step targets a group that is not in the catalog yet.
    pub fn is_creating(&self) -> bool {
        self.creating
    }

    /// Starts the upload step for a brand new group.
    pub fn create_new(&mut self) -> Result<UploadStep> {
        let provisional = SalesGroup::new(
            self.catalog.next_id(),
            "",
            GroupStatus::NeedsData,
            Vec::new(),
        )?;
        debug!(id = provisional.id(), "Creating a new sales group");

        let step = self.wizard.select(provisional)?;
        self.draft = UploadDraft::default();
        self.creating = true;
        self.complete = false;
        Ok(step)
    }

    /// Starts the simulated upload. The draft is validated first.
    #[instrument(skip(self), fields(creating = self.creating))]
    pub fn upload(&mut self) -> Result<()> {
        if self.wizard.step() != UploadStep::Upload {
            return Err(ComputeError::Navigation(
                "Choose or create a sales group before uploading".to_string(),
            ));
        }
        let validated = self.draft.validate()?;

        if let Some(previous) = self.pending.take() {
            warn!("Replacing an upload that was still pending");
            previous.cancel();
        }

        info!(name = %validated.name, "Uploading sales data");
        self.complete = false;
        self.pending = Some(PendingTask::schedule(
            format!("Upload for {}", validated.name),
            self.delay,
            move || validated,
        ));
        Ok(())
    }

    pub fn is_uploading(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Waits for the pending upload and applies it to the catalog.
    ///
    /// A new group is inserted as ready; an existing group is updated from
    /// the draft and runs through the upload transition.
    pub async fn finish_upload(&mut self) -> Result<SalesGroup> {
        let task = self
            .pending
            .take()
            .ok_or_else(|| ComputeError::Validation("No upload is in progress".to_string()))?;
        let validated = task.wait().await?;
        let current = self.wizard.require_selected()?.clone();

        let group = if self.creating {
            let status = current.status().apply(PipelineEvent::UploadSucceeded)?;
            let group = SalesGroup::new(current.id(), validated.name, status, validated.tags)?
                .with_description(validated.description)
                .with_last_upload(JUST_NOW);
            self.catalog.insert(group.clone())?;
            self.creating = false;
            group
        } else {
            let existing = self.catalog.get(current.id())?;
            let updated = SalesGroup::new(
                existing.id(),
                validated.name,
                existing.status(),
                validated.tags,
            )?
            .with_time_span(existing.time_span())
            .with_description(validated.description)
            .with_last_upload(JUST_NOW);
            self.catalog.update(updated)?;
            self.catalog
                .apply_event(existing.id(), PipelineEvent::UploadSucceeded)?;
            self.catalog.get(existing.id())?
        };

        info!(id = group.id(), "Upload complete");
        self.wizard.replace_selected(group.clone());
        self.complete = true;
        Ok(group)
    }

    /// Leaves the completion screen to upload another file for the same group.
    pub fn upload_another(&mut self) {
        self.complete = false;
    }
}

impl PanelWizard for UploadPanel {
    type Step = UploadStep;

    fn wizard(&self) -> &Wizard<UploadStep> {
        &self.wizard
    }

    fn wizard_mut(&mut self) -> &mut Wizard<UploadStep> {
        &mut self.wizard
    }
}

impl CatalogPanel for UploadPanel {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    fn on_select(&mut self) {
        if let Some(group) = self.wizard.selected() {
            self.draft = UploadDraft::from_group(group);
        }
        self.creating = false;
        self.complete = false;
    }

    fn on_back(&mut self, _step: UploadStep) {
        self.draft = UploadDraft::default();
        self.creating = false;
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_services;

    fn panel() -> (UploadPanel, Catalog) {
        let (catalog, _) = fixture_services();
        (
            UploadPanel::new(catalog.clone(), Duration::from_millis(2000)),
            catalog,
        )
    }

    #[test]
    fn test_draft_tag_parsing() {
        let draft = UploadDraft {
            name: "X".to_string(),
            description: String::new(),
            tags: " Milk, , importation,Milk ".to_string(),
        };
        assert_eq!(draft.parse_tags().unwrap(), vec!["Milk", "importation"]);

        let reserved = UploadDraft {
            tags: "Milk, All".to_string(),
            ..draft
        };
        assert!(matches!(
            reserved.parse_tags(),
            Err(ComputeError::ReservedTag(_))
        ));
    }

    #[test]
    fn test_search_covers_tags() {
        let (mut panel, _) = panel();
        panel.set_search_term("import");
        let view = panel.catalog_view();
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].name, "Al Marai Butter 500gm");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_prefills_draft() {
        let (mut panel, _) = panel();
        assert_eq!(panel.select("6").unwrap(), UploadStep::Upload);
        assert_eq!(
            panel.draft(),
            &UploadDraft {
                name: "Al Marai Butter 500gm".to_string(),
                description: String::new(),
                tags: "Butter, importation".to_string(),
            }
        );
        assert!(!panel.is_creating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_keeps_existing_description() {
        let group = SalesGroup::new(
            "1",
            "Cream 200ml",
            GroupStatus::Ready,
            vec!["Cream".to_string()],
        )
        .unwrap()
        .with_description("Weekly export");
        let catalog = Catalog::new(vec![group]).unwrap();
        let mut panel = UploadPanel::new(catalog.clone(), Duration::from_millis(2000));

        panel.select("1").unwrap();
        assert_eq!(panel.draft().description, "Weekly export");
        panel.upload().unwrap();
        let uploaded = panel.finish_upload().await.unwrap();

        assert_eq!(uploaded.description(), Some("Weekly export"));
        assert_eq!(catalog.get("1").unwrap().description(), Some("Weekly export"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_existing_group_marks_it_ready() {
        let (mut panel, catalog) = panel();
        panel.select("3").unwrap();
        panel.draft_mut().description = "Weekly export".to_string();

        panel.upload().unwrap();
        assert!(panel.is_uploading());
        let group = panel.finish_upload().await.unwrap();

        assert!(panel.is_complete());
        assert_eq!(group.status(), GroupStatus::Ready);
        assert_eq!(group.last_upload(), "just now");
        assert_eq!(group.time_span(), "Jun 2023 - Nov 2024");
        assert_eq!(catalog.get("3").unwrap(), group);
        assert_eq!(catalog.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_new_inserts_ready_group() {
        let (mut panel, catalog) = panel();
        assert_eq!(panel.create_new().unwrap(), UploadStep::Upload);
        assert!(panel.is_creating());
        assert_eq!(panel.draft(), &UploadDraft::default());

        // blank names are rejected before anything is scheduled
        assert!(matches!(panel.upload(), Err(ComputeError::Validation(_))));
        assert!(!panel.is_uploading());

        let draft = panel.draft_mut();
        draft.name = "Labneh 400g".to_string();
        draft.tags = "Cheese, importation".to_string();
        panel.upload().unwrap();
        let group = panel.finish_upload().await.unwrap();

        assert_eq!(group.id(), "7");
        assert_eq!(group.status(), GroupStatus::Ready);
        assert_eq!(catalog.len(), 7);
        assert!(catalog.categories().contains(&"Cheese".to_string()));
        assert!(!panel.is_creating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_cancels_upload() {
        let (mut panel, catalog) = panel();
        panel.select("6").unwrap();
        panel.upload().unwrap();

        assert_eq!(panel.back().unwrap(), UploadStep::Select);
        assert!(panel.selected().is_none());
        assert!(panel.finish_upload().await.is_err());

        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert_eq!(catalog.get("6").unwrap().status(), GroupStatus::NeedsData);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_requires_upload_step() {
        let (mut panel, _) = panel();
        assert!(matches!(panel.upload(), Err(ComputeError::Navigation(_))));
    }
}
