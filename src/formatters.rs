//! Display strings for the presentation layer: status lines, the totals
//! readout, and the numeric column formats used by the item list.

use std::path::Path;

/// Status-bar totals, e.g. "Total items: 12 (showing 4)"
pub fn format_totals(total: usize, showing: usize) -> String {
    format!("Total items: {total} (showing {showing})")
}

/// Status line after a search; a blank query means everything is visible
pub fn format_search_status(query: &str, matches: usize) -> String {
    let query = query.trim();
    if query.is_empty() {
        "Showing all items".to_string()
    } else {
        format!("Found {matches} item(s) matching '{query}'")
    }
}

/// Label next to the icon picker: the file name, or a placeholder
pub fn icon_label(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return "No icon selected".to_string();
    }
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Price columns show two decimals
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Weight column shows three decimals
pub fn format_weight(value: f64) -> String {
    format!("{value:.3}")
}

/// Round a display value down to the whole unit
pub fn round_down(value: f64) -> f64 {
    value.floor()
}
