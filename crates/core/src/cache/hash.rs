//! Cache key generation for nutrition entries.

use sha2::{Digest, Sha256};

/// Tag bytes written ahead of the restaurant field.
const RESTAURANT_ABSENT: u8 = 0;
const RESTAURANT_PRESENT: u8 = 1;

/// Compute the primary key for a (query, restaurant, source) triple.
///
/// Callers pass already-normalized values; hashing does not normalize.
/// Every text field is length-prefixed and the restaurant carries a presence
/// tag, so no choice of field contents can alias another triple.
pub fn compute_cache_key(query: &str, restaurant: Option<&str>, source: &str) -> String {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, query);
    match restaurant {
        Some(name) => {
            hasher.update([RESTAURANT_PRESENT]);
            update_field(&mut hasher, name);
        }
        None => hasher.update([RESTAURANT_ABSENT]),
    }
    update_field(&mut hasher, source);
    hex::encode(hasher.finalize())
}

fn update_field(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
}
