use async_trait::async_trait;
use common::CatalogView;
use model::{ForecastRecord, GroupStatus, PipelineEvent, SalesGroup};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

use crate::error::{ComputeError, Result};
use crate::filter::CatalogFilter;
use crate::tags::TagIndex;

/// Supplies the initial list of sales groups.
///
/// This is the seam where a real backend would plug in; the built-in
/// implementations read the fixture catalog or a local file.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short description used in logs and errors.
    fn describe(&self) -> String;

    /// Loads every sales group from the source.
    async fn load(&self) -> Result<Vec<SalesGroup>>;
}

/// The built-in mock catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl CatalogSource for FixtureSource {
    fn describe(&self) -> String {
        "fixtures".to_string()
    }

    async fn load(&self) -> Result<Vec<SalesGroup>> {
        Ok(common::fixtures::mock_sales_groups())
    }
}

/// A JSON or YAML file holding a list of sales groups.
///
/// The format is picked from the extension: `.yaml`/`.yml` is YAML,
/// anything else is JSON.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Vec<SalesGroup>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let groups: Vec<SalesGroup> = if self.is_yaml() {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        debug!("Read {} sales groups from file", groups.len());
        Ok(groups)
    }
}

#[derive(Debug)]
struct CatalogState {
    groups: Vec<SalesGroup>,
    index: TagIndex,
}

impl CatalogState {
    fn position(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id() == id)
    }

    fn reindex(&mut self) {
        self.index = TagIndex::build(&self.groups);
    }
}

/// The shared sales group catalog.
///
/// One instance is created per session and handed to every panel, so an
/// upload confirmed in one panel is visible in all others. Clones share the
/// same underlying state.
#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogState>>,
}

impl Catalog {
    /// Creates a catalog, rejecting duplicate ids.
    pub fn new(groups: Vec<SalesGroup>) -> Result<Self> {
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.id()) {
                return Err(ComputeError::DuplicateGroup(group.id().to_string()));
            }
        }

        let index = TagIndex::build(&groups);
        Ok(Self {
            inner: Arc::new(RwLock::new(CatalogState { groups, index })),
        })
    }

    /// Loads a catalog from `source`. An empty source is an error.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self> {
        let description = source.describe();
        info!("Loading sales group catalog from {}", description);

        let groups = source.load().await?;
        if groups.is_empty() {
            warn!("Catalog source {} is empty", description);
            return Err(ComputeError::EmptyCatalog(description));
        }

        let catalog = Self::new(groups)?;
        info!("Loaded {} sales groups", catalog.len());
        Ok(catalog)
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// All groups in catalog order.
    pub fn list(&self) -> Vec<SalesGroup> {
        self.read().groups.clone()
    }

    pub fn len(&self) -> usize {
        self.read().groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().groups.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<SalesGroup> {
        let state = self.read();
        state
            .position(id)
            .map(|p| state.groups[p].clone())
            .ok_or_else(|| ComputeError::UnknownGroup(id.to_string()))
    }

    /// Distinct tags in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        self.read().index.categories().to_vec()
    }

    /// Groups matching `filter`, answered through the tag index.
    pub fn filtered(&self, filter: &CatalogFilter) -> Vec<SalesGroup> {
        let state = self.read();
        state
            .index
            .filter(
                &state.groups,
                filter.search_term(),
                filter.selection(),
                filter.fields(),
            )
            .into_iter()
            .cloned()
            .collect()
    }

    /// The selection screen for a panel's filter.
    pub fn view(&self, filter: &CatalogFilter) -> CatalogView {
        let filtered = self.filtered(filter);
        filter.view(&self.categories(), &filtered)
    }

    /// Adds a new group at the end of the catalog.
    #[instrument(skip(self, group), fields(id = group.id(), name = group.name()))]
    pub fn insert(&self, group: SalesGroup) -> Result<()> {
        let mut state = self.write();
        if state.position(group.id()).is_some() {
            return Err(ComputeError::DuplicateGroup(group.id().to_string()));
        }
        state.groups.push(group);
        state.reindex();
        info!("Sales group added to catalog");
        Ok(())
    }

    /// Replaces the group with the same id.
    #[instrument(skip(self, group), fields(id = group.id()))]
    pub fn update(&self, group: SalesGroup) -> Result<()> {
        let mut state = self.write();
        let position = state
            .position(group.id())
            .ok_or_else(|| ComputeError::UnknownGroup(group.id().to_string()))?;
        state.groups[position] = group;
        state.reindex();
        debug!("Sales group updated");
        Ok(())
    }

    /// Runs a pipeline event through the group's status state machine.
    #[instrument(skip(self))]
    pub fn apply_event(&self, id: &str, event: PipelineEvent) -> Result<GroupStatus> {
        let mut state = self.write();
        let position = state
            .position(id)
            .ok_or_else(|| ComputeError::UnknownGroup(id.to_string()))?;

        let group = &mut state.groups[position];
        let next = group
            .status()
            .apply(event)
            .map_err(|e| ComputeError::from_status(id, e))?;
        group.set_status(next);
        info!(status = %next, "Sales group status updated");
        Ok(next)
    }

    /// A fresh id: one past the largest numeric id, skipping any id in use.
    pub fn next_id(&self) -> String {
        let state = self.read();
        let mut candidate = state
            .groups
            .iter()
            .filter_map(|g| g.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        while state.position(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// Forecast history per sales group.
///
/// Every group shows the seed rows; runs saved during the session are listed
/// before them, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    seed: Arc<Vec<ForecastRecord>>,
    saved: Arc<RwLock<HashMap<String, Vec<ForecastRecord>>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose groups all start with the fixture history rows.
    pub fn with_fixture_rows() -> Self {
        Self {
            seed: Arc::new(common::fixtures::mock_history()),
            saved: Arc::default(),
        }
    }

    pub fn records(&self, group_id: &str) -> Vec<ForecastRecord> {
        let saved = self.saved.read().unwrap_or_else(PoisonError::into_inner);
        saved
            .get(group_id)
            .into_iter()
            .flat_map(|records| records.iter().rev())
            .chain(self.seed.iter())
            .cloned()
            .collect()
    }

    pub fn find(&self, group_id: &str, record_id: &str) -> Result<ForecastRecord> {
        self.records(group_id)
            .into_iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| ComputeError::UnknownRecord(record_id.to_string()))
    }

    /// Next free numeric record id for the group.
    pub fn next_record_id(&self, group_id: &str) -> String {
        let next = self
            .records(group_id)
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        next.to_string()
    }

    #[instrument(skip(self, record), fields(record_id = %record.id))]
    pub fn save(&self, group_id: &str, record: ForecastRecord) -> Result<()> {
        let mut saved = self.saved.write().unwrap_or_else(PoisonError::into_inner);
        let records = saved.entry(group_id.to_string()).or_default();
        if records.iter().any(|r| r.id == record.id) || self.seed.iter().any(|r| r.id == record.id)
        {
            return Err(ComputeError::Validation(format!(
                "Forecast record '{}' already exists for group '{}'",
                record.id, group_id
            )));
        }
        records.push(record);
        info!("Forecast saved to history");
        Ok(())
    }
}
