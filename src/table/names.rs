use std::collections::{HashMap, HashSet};

/// Make column names unique by suffixing repeats with `.1`, `.2`, ...
///
/// The first occurrence keeps its name. A suffix that collides with a name
/// already taken is skipped.
pub fn dedupe_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut taken = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();

    names
        .into_iter()
        .map(|name| {
            if taken.insert(name.clone()) {
                return name;
            }
            let suffix = next_suffix.entry(name.clone()).or_insert(1);
            loop {
                let candidate = format!("{name}.{suffix}");
                *suffix += 1;
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
