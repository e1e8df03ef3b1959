use std::collections::HashSet;

use super::models::WebsiteEntry;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Keeps entries whose title or description contains `search_text`
/// (case-insensitive) and whose category equals `category` exactly, unless
/// `category` is [`ALL_CATEGORIES`]. Input order is preserved.
pub fn filter_entries(
    entries: &[WebsiteEntry],
    search_text: &str,
    category: &str,
) -> Vec<WebsiteEntry> {
    let needle = search_text.to_lowercase();
    entries
        .iter()
        .filter(|entry| matches_search(entry, &needle) && matches_category(entry, category))
        .cloned()
        .collect()
}

fn matches_search(entry: &WebsiteEntry, needle: &str) -> bool {
    needle.is_empty()
        || entry.fields.title.to_lowercase().contains(needle)
        || entry.fields.description.to_lowercase().contains(needle)
}

fn matches_category(entry: &WebsiteEntry, category: &str) -> bool {
    category == ALL_CATEGORIES || entry.fields.category == category
}

/// `"all"` followed by each distinct category in first-seen order.
pub fn category_facets(entries: &[WebsiteEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut facets = vec![ALL_CATEGORIES.to_string()];
    for entry in entries {
        if seen.insert(entry.fields.category.as_str()) {
            facets.push(entry.fields.category.clone());
        }
    }
    facets
}

/// Button label for a facet: first character upper-cased.
pub fn facet_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
