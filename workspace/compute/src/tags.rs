use model::SalesGroup;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::filter::{CategorySelection, SearchFields, matches_search};

/// Inverted index from tag to the positions of the groups carrying it.
///
/// Answers the category half of a filter without rescanning every group's
/// tags. Positions refer to the slice the index was built from, so the index
/// must be rebuilt whenever that slice changes.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    postings: HashMap<String, Vec<usize>>,
    /// Tags in first-seen order.
    order: Vec<String>,
    len: usize,
}

impl TagIndex {
    /// Builds the index for `groups`.
    #[instrument(skip(groups), fields(num_groups = groups.len()))]
    pub fn build(groups: &[SalesGroup]) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        let mut order = Vec::new();

        for (position, group) in groups.iter().enumerate() {
            for tag in group.tags() {
                let entry = postings.entry(tag.clone()).or_insert_with(|| {
                    order.push(tag.clone());
                    Vec::new()
                });
                entry.push(position);
            }
        }

        debug!("Indexed {} distinct tags", order.len());
        Self {
            postings,
            order,
            len: groups.len(),
        }
    }

    /// Number of groups covered by the index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct tags in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    /// Positions of the groups carrying `tag`, ascending.
    pub fn positions(&self, tag: &str) -> &[usize] {
        self.postings.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions matching the selection (union over the selected tags),
    /// ascending. `None` means the selection places no restriction.
    pub fn positions_for(&self, selection: &CategorySelection) -> Option<Vec<usize>> {
        if selection.is_empty() {
            return None;
        }
        let mut positions: Vec<usize> = selection
            .iter()
            .flat_map(|tag| self.positions(tag).iter().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        Some(positions)
    }

    /// Same result as [`crate::filter::filter`] on the indexed slice.
    ///
    /// `groups` must be the slice the index was built from.
    pub fn filter<'a>(
        &self,
        groups: &'a [SalesGroup],
        search_term: &str,
        selection: &CategorySelection,
        fields: SearchFields,
    ) -> Vec<&'a SalesGroup> {
        debug_assert_eq!(groups.len(), self.len, "tag index is stale");
        let term_lower = search_term.to_lowercase();

        match self.positions_for(selection) {
            None => groups
                .iter()
                .filter(|g| matches_search(g, &term_lower, fields))
                .collect(),
            Some(positions) => positions
                .into_iter()
                .filter_map(|p| groups.get(p))
                .filter(|g| matches_search(g, &term_lower, fields))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{available_categories, filter};
    use crate::testing::names;
    use common::fixtures::mock_sales_groups;

    #[test]
    fn test_index_positions() {
        let groups = mock_sales_groups();
        let index = TagIndex::build(&groups);

        assert_eq!(index.len(), 6);
        assert_eq!(index.positions("Milk"), &[0, 1, 2]);
        assert_eq!(index.positions("importation"), &[5]);
        assert!(index.positions("Yogurt").is_empty());
        assert_eq!(index.categories(), available_categories(&groups).as_slice());
    }

    #[test]
    fn test_positions_for_union_is_sorted() {
        let groups = mock_sales_groups();
        let index = TagIndex::build(&groups);

        assert!(index.positions_for(&CategorySelection::new()).is_none());
        let selection = CategorySelection::from_tags(["Butter", "Juice", "importation"]);
        assert_eq!(index.positions_for(&selection), Some(vec![3, 4, 5]));
    }

    #[test]
    fn test_index_filter_matches_scan() {
        let groups = mock_sales_groups();
        let index = TagIndex::build(&groups);

        let selections = [
            vec![],
            vec!["Milk"],
            vec!["Juice", "Milk"],
            vec!["importation"],
            vec!["Yogurt"],
        ];
        let terms = ["", "apm", "1L", "butter", "import", "zzz"];

        for tags in &selections {
            let selection = CategorySelection::from_tags(tags);
            for term in terms {
                for fields in [SearchFields::NAME, SearchFields::NAME_AND_TAGS] {
                    let scanned = filter(&groups, term, &selection, fields);
                    let indexed = index.filter(&groups, term, &selection, fields);
                    assert_eq!(
                        names(&indexed),
                        names(&scanned),
                        "term={:?} tags={:?} fields={:?}",
                        term,
                        tags,
                        fields
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_index() {
        let index = TagIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.categories().is_empty());
    }
}
