//! Column labels of the form `"name (units)"`.

/// Split `"T_1 (C)"` into `("T_1", "C")`. Labels without units keep an empty unit.
pub fn split_unit(label: &str) -> (String, String) {
    label
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .map(|(name, units)| (name.to_string(), units.to_string()))
        .unwrap_or_else(|| (label.to_string(), String::new()))
}

/// Inverse of [`split_unit`].
pub fn join_unit(name: &str, units: &str) -> String {
    if units.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({units})")
    }
}

/// Original label → `(name, units)` for every label, in order.
pub fn units_mapping<S: AsRef<str>>(labels: &[S]) -> Vec<(String, (String, String))> {
    labels
        .iter()
        .map(|label| (label.as_ref().to_string(), split_unit(label.as_ref())))
        .collect()
}
