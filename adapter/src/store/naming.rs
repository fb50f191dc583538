pub const NAME_PREFIX: &str = "mission_";
pub const NAME_SUFFIX: &str = ".geojson";
const ID_LEN: usize = 32;

pub fn generate_name() -> String {
    format!("{}{:032x}{}", NAME_PREFIX, rand::random::<u128>(), NAME_SUFFIX)
}

/// Only names this module could have generated are accepted, which rules out
/// path separators and `..` before any filesystem access.
pub fn is_valid_name(name: &str) -> bool {
    name.strip_prefix(NAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(NAME_SUFFIX))
        .map(|id| {
            id.len() == ID_LEN
                && id
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
        .unwrap_or(false)
}
