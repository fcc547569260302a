//! Dashboard panels built on the shared catalog.
//!
//! Each panel owns its filter, wizard and pending simulation. The catalog
//! and history store are shared between panels.

pub mod dashboard;
pub mod forecast;
pub mod history;
pub mod upload;

use common::CatalogView;
use model::SalesGroup;

use crate::catalog::Catalog;
use crate::error::Result;

pub(crate) use sealed::PanelWizard;

pub use dashboard::DashboardPanel;
pub use forecast::ForecastPanel;
pub use history::HistoryPanel;
pub use upload::{UploadDraft, UploadPanel};

mod sealed {
    use crate::wizard::{Wizard, WizardStep};

    /// Direct wizard access. Only panels inside this crate may move a wizard
    /// between steps; callers go through the panel operations.
    pub trait PanelWizard {
        type Step: WizardStep;

        fn wizard(&self) -> &Wizard<Self::Step>;
        fn wizard_mut(&mut self) -> &mut Wizard<Self::Step>;
    }
}

/// A panel whose first step picks a sales group from the filtered catalog.
///
/// Implementors only expose their catalog handle and wizard; filtering,
/// selection and back navigation come from the provided methods. The wizard
/// itself is not reachable from outside the crate:
///
/// ```compile_fail
/// use compute::panels::{CatalogPanel, ForecastPanel};
///
/// fn skip_generation(panel: &mut ForecastPanel) {
///     panel.wizard_mut().advance().ok();
/// }
/// ```
pub trait CatalogPanel: PanelWizard {
    fn catalog(&self) -> &Catalog;

    /// Aborts any simulation the panel has in flight.
    fn cancel_pending(&mut self) {}

    /// Called after a group was picked on the selection step.
    fn on_select(&mut self) {}

    /// Called after the wizard moved back one step.
    fn on_back(&mut self, _step: Self::Step) {}

    fn step(&self) -> Self::Step {
        self.wizard().step()
    }

    fn selected(&self) -> Option<&SalesGroup> {
        self.wizard().selected()
    }

    fn set_search_term(&mut self, term: &str) {
        self.wizard_mut().filter_mut().set_search_term(term);
    }

    fn toggle_category(&mut self, tag_or_sentinel: &str) {
        self.wizard_mut().filter_mut().toggle_category(tag_or_sentinel);
    }

    fn clear_categories(&mut self) {
        self.wizard_mut().filter_mut().clear_all();
    }

    /// The selection screen for the panel's current filter.
    fn catalog_view(&self) -> CatalogView {
        self.catalog().view(self.wizard().filter())
    }

    /// Picks the group with `id` and moves past the selection step.
    fn select(&mut self, id: &str) -> Result<Self::Step> {
        let group = self.catalog().get(id)?;
        let step = self.wizard_mut().select(group)?;
        self.on_select();
        Ok(step)
    }

    /// Moves one step back, abandoning any pending simulation.
    fn back(&mut self) -> Result<Self::Step> {
        self.cancel_pending();
        let step = self.wizard_mut().back()?;
        self.on_back(step);
        Ok(step)
    }
}
