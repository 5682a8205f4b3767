//! Utility functions

use chrono::{NaiveDate, Utc};

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(2).collect();
        if visible.is_empty() {
            format!("***{}", domain)
        } else {
            format!("{}***{}", visible, domain)
        }
    } else {
        "***".to_string()
    }
}

/// Case-insensitive substring match of `term` against any of `fields`.
/// A blank term matches everything.
pub fn matches_search<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
