use common::{CatalogView, CategoryChip, EMPTY_CATALOG_MESSAGE, GroupCard};
use model::{ALL_CATEGORIES, SalesGroup};
use tracing::{debug, trace};

/// Which fields of a sales group the free-text search looks at.
///
/// Panels differ here: the upload panel also matches tag text, the others
/// match the name only. Each panel opts in explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    pub name: bool,
    pub tags: bool,
}

impl SearchFields {
    pub const NAME: SearchFields = SearchFields {
        name: true,
        tags: false,
    };

    pub const NAME_AND_TAGS: SearchFields = SearchFields {
        name: true,
        tags: true,
    };
}

impl Default for SearchFields {
    fn default() -> Self {
        Self::NAME
    }
}

/// The set of selected category tags.
///
/// An empty selection means "no restriction"; that is the state in which the
/// "All" sentinel is shown as active. Selection order is kept for display
/// but does not take part in equality.
#[derive(Debug, Clone, Default)]
pub struct CategorySelection {
    selected: Vec<String>,
}

impl PartialEq for CategorySelection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|tag| other.contains(tag))
    }
}

impl Eq for CategorySelection {}

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection by toggling each value in turn.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for tag in tags {
            selection.toggle(tag.as_ref());
        }
        selection
    }

    /// Toggles a tag in or out of the selection. The "All" sentinel clears
    /// the whole selection instead.
    pub fn toggle(&mut self, tag_or_sentinel: &str) {
        if tag_or_sentinel == ALL_CATEGORIES {
            self.clear();
            return;
        }

        if let Some(pos) = self.selected.iter().position(|t| t == tag_or_sentinel) {
            self.selected.remove(pos);
            trace!(tag = tag_or_sentinel, "Category toggled off");
        } else {
            self.selected.push(tag_or_sentinel.to_string());
            trace!(tag = tag_or_sentinel, "Category toggled on");
        }
    }

    /// "All" is active iff nothing is selected; a real tag iff it is selected.
    pub fn is_active(&self, tag_or_sentinel: &str) -> bool {
        if tag_or_sentinel == ALL_CATEGORIES {
            self.selected.is_empty()
        } else {
            self.contains(tag_or_sentinel)
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.selected.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

/// Case-insensitive search against the enabled fields.
///
/// `term_lower` must already be lowercased. An empty term matches everything;
/// a non-empty term matches nothing when no field is enabled.
pub fn matches_search(group: &SalesGroup, term_lower: &str, fields: SearchFields) -> bool {
    if term_lower.is_empty() {
        return true;
    }
    (fields.name && group.name().to_lowercase().contains(term_lower))
        || (fields.tags
            && group
                .tags()
                .iter()
                .any(|tag| tag.to_lowercase().contains(term_lower)))
}

/// OR semantics: a group matches if any of its tags is selected.
pub fn matches_categories(group: &SalesGroup, selection: &CategorySelection) -> bool {
    selection.is_empty() || group.tags().iter().any(|tag| selection.contains(tag))
}

/// Returns the groups matching both the search term and the category
/// selection, in source order.
pub fn filter<'a>(
    groups: &'a [SalesGroup],
    search_term: &str,
    selection: &CategorySelection,
    fields: SearchFields,
) -> Vec<&'a SalesGroup> {
    let term_lower = search_term.to_lowercase();
    let filtered: Vec<&SalesGroup> = groups
        .iter()
        .filter(|g| matches_search(g, &term_lower, fields) && matches_categories(g, selection))
        .collect();

    debug!(
        total = groups.len(),
        matched = filtered.len(),
        search_term,
        categories = selection.len(),
        "Filtered catalog"
    );
    filtered
}

/// Distinct tags across the catalog in first-seen order.
pub fn available_categories(groups: &[SalesGroup]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for tag in groups.iter().flat_map(|g| g.tags()) {
        if !categories.contains(tag) {
            categories.push(tag.clone());
        }
    }
    categories
}

/// Search and category state owned by one panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    search_term: String,
    selection: CategorySelection,
    fields: SearchFields,
}

impl CatalogFilter {
    pub fn new(fields: SearchFields) -> Self {
        Self {
            search_term: String::new(),
            selection: CategorySelection::new(),
            fields,
        }
    }

    /// Replaces the search term verbatim.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn toggle_category(&mut self, tag_or_sentinel: &str) {
        self.selection.toggle(tag_or_sentinel);
    }

    pub fn is_category_active(&self, tag_or_sentinel: &str) -> bool {
        self.selection.is_active(tag_or_sentinel)
    }

    /// Same as toggling the "All" sentinel.
    pub fn clear_all(&mut self) {
        self.selection.clear();
    }

    /// Whether the "Clear" affordance should be offered.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn fields(&self) -> SearchFields {
        self.fields
    }

    pub fn apply<'a>(&self, groups: &'a [SalesGroup]) -> Vec<&'a SalesGroup> {
        filter(groups, &self.search_term, &self.selection, self.fields)
    }

    /// The category bar: the "All" sentinel followed by `categories`.
    pub fn category_chips(&self, categories: &[String]) -> Vec<CategoryChip> {
        std::iter::once(ALL_CATEGORIES)
            .chain(categories.iter().map(String::as_str))
            .map(|name| CategoryChip {
                name: name.to_string(),
                active: self.is_category_active(name),
            })
            .collect()
    }

    /// Builds the selection screen from an already filtered list.
    pub fn view<'a>(
        &self,
        categories: &[String],
        filtered: impl IntoIterator<Item = &'a SalesGroup>,
    ) -> CatalogView {
        let groups: Vec<GroupCard> = filtered.into_iter().map(GroupCard::from).collect();
        let empty_message = groups
            .is_empty()
            .then(|| EMPTY_CATALOG_MESSAGE.to_string());

        CatalogView {
            search_term: self.search_term.clone(),
            categories: self.category_chips(categories),
            show_clear: self.has_selection(),
            groups,
            empty_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{milk_and_juice, names};
    use common::fixtures::mock_sales_groups;

    #[test]
    fn test_no_filters_is_identity() {
        let groups = mock_sales_groups();
        let filtered = filter(&groups, "", &CategorySelection::new(), SearchFields::NAME);
        assert_eq!(filtered.len(), groups.len());
        assert!(filtered.iter().zip(groups.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_single_category() {
        let groups = milk_and_juice();
        let selection = CategorySelection::from_tags(["Milk"]);
        let filtered = filter(&groups, "", &selection, SearchFields::NAME);
        assert_eq!(names(&filtered), vec!["APM 1L"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let groups = mock_sales_groups();
        let filtered = filter(&groups, "apm", &CategorySelection::new(), SearchFields::NAME);
        assert_eq!(names(&filtered), vec!["APM 1L", "APM 1.5L"]);

        let filtered = filter(&groups, "MARAI", &CategorySelection::new(), SearchFields::NAME);
        assert_eq!(names(&filtered), vec!["Al Marai Butter 500gm"]);
    }

    #[test]
    fn test_categories_use_or_semantics() {
        let groups = milk_and_juice();
        let selection = CategorySelection::from_tags(["Milk", "Juice"]);
        let filtered = filter(&groups, "", &selection, SearchFields::NAME);
        assert_eq!(names(&filtered), vec!["APM 1L", "BJ MS 1L"]);
    }

    #[test]
    fn test_search_and_category_must_both_match() {
        let groups = mock_sales_groups();
        let selection = CategorySelection::from_tags(["Juice"]);
        let filtered = filter(&groups, "1L", &selection, SearchFields::NAME);
        assert_eq!(names(&filtered), vec!["AMJ MS 1L", "BJ MS 1L"]);

        let filtered = filter(&groups, "apm", &selection, SearchFields::NAME);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_unknown_tag_yields_nothing() {
        let groups = mock_sales_groups();
        let selection = CategorySelection::from_tags(["Yogurt"]);
        assert!(filter(&groups, "", &selection, SearchFields::NAME).is_empty());
    }

    #[test]
    fn test_tag_search_only_when_enabled() {
        let groups = mock_sales_groups();
        let none = CategorySelection::new();

        assert!(filter(&groups, "import", &none, SearchFields::NAME).is_empty());
        let filtered = filter(&groups, "import", &none, SearchFields::NAME_AND_TAGS);
        assert_eq!(names(&filtered), vec!["Al Marai Butter 500gm"]);

        let nothing = SearchFields {
            name: false,
            tags: false,
        };
        assert!(filter(&groups, "apm", &none, nothing).is_empty());
        assert_eq!(filter(&groups, "", &none, nothing).len(), groups.len());
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let groups = mock_sales_groups();
        let selection = CategorySelection::from_tags(["Butter", "Milk"]);
        let filtered = filter(&groups, "", &selection, SearchFields::NAME);
        assert_eq!(
            names(&filtered),
            vec!["APM 1L", "APM 1.5L", "BPM 1L", "Al Marai Butter 500gm"]
        );
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut selection = CategorySelection::from_tags(["Milk"]);
        let before = selection.clone();

        selection.toggle("Juice");
        assert!(selection.is_active("Juice"));
        selection.toggle("Juice");
        assert_eq!(selection, before);

        selection.toggle("Milk");
        selection.toggle("Milk");
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_twice_restores_multi_tag_selection() {
        let mut filter = CatalogFilter::new(SearchFields::NAME);
        filter.toggle_category("Milk");
        filter.toggle_category("Juice");
        let before = filter.clone();

        filter.toggle_category("Milk");
        assert!(!filter.is_category_active("Milk"));
        filter.toggle_category("Milk");

        assert_eq!(filter.selection(), before.selection());
        assert_eq!(filter, before);
        assert_ne!(
            CategorySelection::from_tags(["Milk", "Juice"]),
            CategorySelection::from_tags(["Milk"])
        );
    }

    #[test]
    fn test_all_sentinel() {
        let mut selection = CategorySelection::new();
        assert!(selection.is_active(ALL_CATEGORIES));

        selection.toggle("Milk");
        assert!(!selection.is_active(ALL_CATEGORIES));
        assert!(selection.is_active("Milk"));

        selection.toggle(ALL_CATEGORIES);
        assert!(selection.is_empty());
        assert!(selection.is_active(ALL_CATEGORIES));

        // clearing an empty selection is a no-op
        selection.toggle(ALL_CATEGORIES);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_catalog_filter_state() {
        let mut filter = CatalogFilter::new(SearchFields::NAME);
        assert!(!filter.has_selection());

        filter.set_search_term("  APM ");
        assert_eq!(filter.search_term(), "  APM ");

        filter.toggle_category("Milk");
        filter.toggle_category("Juice");
        assert!(filter.has_selection());
        assert!(filter.is_category_active("Juice"));

        filter.clear_all();
        assert!(!filter.has_selection());
        assert!(filter.is_category_active(ALL_CATEGORIES));
        assert_eq!(filter.search_term(), "  APM ");
    }

    #[test]
    fn test_available_categories_first_seen_order() {
        let categories = available_categories(&mock_sales_groups());
        assert_eq!(categories, vec!["Milk", "Juice", "Butter", "importation"]);
    }

    #[test]
    fn test_view_reports_empty_message() {
        let groups = mock_sales_groups();
        let mut filter = CatalogFilter::new(SearchFields::NAME);
        filter.toggle_category("Yogurt");

        let categories = available_categories(&groups);
        let view = filter.view(&categories, filter.apply(&groups));

        assert!(view.groups.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_CATALOG_MESSAGE));
        assert!(view.show_clear);
        assert_eq!(view.categories[0].name, ALL_CATEGORIES);
        assert!(!view.categories[0].active);
        // selected tag that no group carries is not listed as a chip
        assert!(view.categories.iter().all(|c| c.name != "Yogurt"));
    }
}
