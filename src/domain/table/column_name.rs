use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Unnamed").unwrap());

/// Name given to a column whose header cell was blank.
pub fn placeholder_name(position: usize) -> String {
    format!("Unnamed: {}", position)
}

/// True for names that do not identify a real column: empty (or whitespace
/// only) names and the `Unnamed...` names produced by [`placeholder_name`].
pub fn is_placeholder_column_name(name: &str) -> bool {
    name.trim().is_empty() || PLACEHOLDER_PATTERN.is_match(name)
}

/// Turn a raw header row into unique column names.
///
/// Blank cells get a placeholder name. Repeated names get a numeric suffix
/// (`a`, `a.1`, `a.2`), skipping suffixes that would collide with a name
/// already in the header.
pub fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.trim().is_empty() {
                placeholder_name(idx)
            } else {
                name
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(named.len());
    let mut result = Vec::with_capacity(named.len());

    for name in named {
        if taken.insert(name.clone()) {
            result.push(name);
            continue;
        }

        let mut suffix = 1;
        loop {
            let candidate = format!("{}.{}", name, suffix);
            if taken.insert(candidate.clone()) {
                result.push(candidate);
                break;
            }
            suffix += 1;
        }
    }

    result
}
