//! Linear step machines layered over the catalog filter.
//!
//! Every panel starts at a selection step where the user filters the catalog
//! and picks exactly one sales group. Picking a group moves to the next step;
//! going back to the selection step drops the group but keeps the filter.

use model::SalesGroup;
use std::fmt;
use tracing::debug;

use crate::error::{ComputeError, Result};
use crate::filter::{CatalogFilter, SearchFields};

/// A step of a panel wizard.
pub trait WizardStep: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The entry step where a group is chosen.
    const SELECT: Self;

    fn next(self) -> Option<Self>;
    fn previous(self) -> Option<Self>;

    fn is_select(self) -> bool {
        self == Self::SELECT
    }
}

macro_rules! wizard_steps {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $id:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            const ORDER: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            fn position(self) -> usize {
                Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
            }
        }

        impl WizardStep for $name {
            const SELECT: Self = $name::Select;

            fn next(self) -> Option<Self> {
                Self::ORDER.get(self.position() + 1).copied()
            }

            fn previous(self) -> Option<Self> {
                self.position().checked_sub(1).map(|p| Self::ORDER[p])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wizard_steps!(
    /// select -> configure -> results
    ForecastStep { Select => "select", Configure => "configure", Results => "results" }
);
wizard_steps!(
    /// select -> upload
    UploadStep { Select => "select", Upload => "upload" }
);
wizard_steps!(
    /// select -> analytics
    AnalyticsStep { Select => "select", Analytics => "analytics" }
);
wizard_steps!(
    /// select -> history
    HistoryStep { Select => "select", History => "history" }
);

/// Filter and step state of one panel.
#[derive(Debug, Clone)]
pub struct Wizard<S: WizardStep> {
    step: S,
    selected: Option<SalesGroup>,
    filter: CatalogFilter,
}

impl<S: WizardStep> Wizard<S> {
    pub fn new(fields: SearchFields) -> Self {
        Self {
            step: S::SELECT,
            selected: None,
            filter: CatalogFilter::new(fields),
        }
    }

    pub fn step(&self) -> S {
        self.step
    }

    pub fn selected(&self) -> Option<&SalesGroup> {
        self.selected.as_ref()
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut CatalogFilter {
        &mut self.filter
    }

    /// Picks a group on the selection step and moves past it.
    pub fn select(&mut self, group: SalesGroup) -> Result<S> {
        if !self.step.is_select() {
            return Err(ComputeError::Navigation(format!(
                "A sales group can only be chosen on the select step, not on '{}'",
                self.step
            )));
        }
        debug!(group = group.id(), "Sales group selected");
        self.selected = Some(group);
        self.advance()
    }

    /// Moves one step forward. Leaving the selection step needs a group.
    pub fn advance(&mut self) -> Result<S> {
        if self.selected.is_none() {
            return Err(ComputeError::Navigation(
                "Select a sales group before continuing".to_string(),
            ));
        }
        let next = self.step.next().ok_or_else(|| {
            ComputeError::Navigation(format!("'{}' is the last step", self.step))
        })?;
        self.step = next;
        Ok(next)
    }

    /// Moves one step back, dropping the group when reaching the selection step.
    pub fn back(&mut self) -> Result<S> {
        let previous = self.step.previous().ok_or_else(|| {
            ComputeError::Navigation("Already on the select step".to_string())
        })?;
        self.step = previous;
        if previous.is_select() {
            self.selected = None;
        }
        Ok(previous)
    }

    /// Returns to the selection step. The filter is kept.
    pub fn reset(&mut self) {
        self.step = S::SELECT;
        self.selected = None;
    }

    pub fn require_selected(&self) -> Result<&SalesGroup> {
        self.selected.as_ref().ok_or_else(|| {
            ComputeError::Navigation("No sales group is selected".to_string())
        })
    }

    /// Swaps in a fresher copy of the selected group, e.g. after a status change.
    pub fn replace_selected(&mut self, group: SalesGroup) {
        if self.selected.is_some() {
            self.selected = Some(group);
        }
    }
}
