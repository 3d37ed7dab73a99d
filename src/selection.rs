/// Keeps `current` while it is still in the catalog, otherwise falls back to
/// the first product (or nothing for an empty catalog).
pub fn reconcile_selection(current: Option<&str>, catalog: &[String]) -> Option<String> {
    match current {
        Some(name) if catalog.iter().any(|product| product == name) => Some(name.to_string()),
        _ => catalog.first().cloned(),
    }
}

/// Selection to use once `removed` leaves the catalog.
pub fn selection_after_removal(
    current: Option<&str>,
    removed: &str,
    catalog: &[String],
) -> Option<String> {
    if current == Some(removed) {
        return catalog.iter().find(|product| *product != removed).cloned();
    }
    current.map(str::to_string)
}
