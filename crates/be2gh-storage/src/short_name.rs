//! Short, human-friendly names derived from UUIDs.
//!
//! BE shows each entity by the shortest prefix of its UUID that no sibling
//! shares, never shorter than [`MIN_PREFIX`] characters. Nested entities
//! join their parent's short name with `/`.

/// Minimum prefix length.
pub const MIN_PREFIX: usize = 3;

/// Shortest prefix of `uuid` (at least [`MIN_PREFIX`] chars) not shared by
/// any of `siblings`. `uuid` itself may appear in `siblings`.
pub fn unique_prefix<'a>(uuid: &'a str, siblings: &[&str]) -> &'a str {
    let boundaries: Vec<usize> = uuid
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(uuid.len()))
        .collect();

    for (count, &end) in boundaries.iter().enumerate() {
        if count + 1 < MIN_PREFIX {
            continue;
        }
        let prefix = &uuid[..end];
        let clash = siblings
            .iter()
            .any(|other| *other != uuid && other.starts_with(prefix));
        if !clash {
            return prefix;
        }
    }
    uuid
}

/// Joins a parent short name and a child prefix.
pub fn join(parent: &str, child: &str) -> String {
    format!("{parent}/{child}")
}
