//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an item count with its noun, e.g. `1 item`, `3 items`.
///
/// Usage in templates: `{{ cart.total_items|item_count }}`
#[askama::filter_fn]
pub fn item_count(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(item_count_label(&count.to_string()))
}

fn item_count_label(count: &str) -> String {
    if count == "1" {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count_label() {
        assert_eq!(item_count_label("0"), "0 items");
        assert_eq!(item_count_label("1"), "1 item");
        assert_eq!(item_count_label("12"), "12 items");
    }
}
