use recordgate_crypto::{HashResult, PasswordHasher};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::Attributes;

/// Replaces changed password attributes with their hash.
///
/// An attribute named in `password_attributes` is hashed when its value is
/// not null and differs from its value in `original`. An unchanged value is
/// already a hash from the last write and is passed through. Non-string
/// values are hashed from their JSON text. The plaintext is wiped once hashed.
pub fn hash_password_attributes(
    attributes: Attributes,
    original: &Attributes,
    password_attributes: &[String],
    hasher: &dyn PasswordHasher,
) -> HashResult<Attributes> {
    if password_attributes.is_empty() || attributes.is_empty() {
        return Ok(attributes);
    }

    let mut result = Attributes::new();
    for (key, value) in attributes {
        let designated = password_attributes.iter().any(|name| *name == key);
        if !designated || value.is_null() || original.get(&key) == Some(&value) {
            result.insert(key, value);
            continue;
        }

        let plaintext = Zeroizing::new(match value {
            Value::String(text) => text,
            other => other.to_string(),
        });
        result.insert(key, Value::String(hasher.hash(&plaintext)?));
    }

    Ok(result)
}
