//! Free-text search over entity collections

use loan_shared::utils::matches_search;

/// Entities that expose the text fields a search box filters on
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, term: &str) -> bool {
        matches_search(term, self.search_fields())
    }
}

/// Keep the items whose search fields contain `term`, case-insensitively.
/// A blank term keeps everything; an empty result is a valid empty page.
pub fn filter_by_search<T: Searchable>(items: Vec<T>, term: Option<&str>) -> Vec<T> {
    match term {
        Some(term) if !term.trim().is_empty() => items.into_iter().filter(|i| i.matches(term)).collect(),
        _ => items,
    }
}
