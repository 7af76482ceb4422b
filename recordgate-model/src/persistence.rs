use serde_json::Value;

use crate::Attributes;

/// The storage capability a record writes through.
///
/// Both operations report ordinary failures (constraint violations, missing
/// rows) as `false` instead of erroring; the record passes the result on
/// without interpreting it.
pub trait Persistence {
    /// Inserts a new row. The store may write a generated primary key back
    /// into `attributes`.
    fn insert(&mut self, table: &str, attributes: &mut Attributes) -> bool;

    /// Updates the row whose `primary_key` column equals `key`.
    fn update(
        &mut self,
        table: &str,
        primary_key: &str,
        key: &Value,
        attributes: &Attributes,
    ) -> bool;
}
