use std::collections::HashMap;

/// Smallest value per key, one entry per distinct key, keys in first-seen order.
///
/// When several records share a group's minimum the value is the same either
/// way; which record supplied it is not tracked.
pub fn grouped_min<'a, I>(pairs: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();

    for (key, value) in pairs {
        match index.get(key) {
            Some(&i) => {
                if value < groups[i].1 {
                    groups[i].1 = value;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push((key.to_string(), value));
            }
        }
    }

    groups
}

/// Occurrences of each key (exact, case-sensitive match), in first-seen order.
pub fn frequency<'a, I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }

    counts
}
