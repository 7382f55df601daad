use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the `session` table.
///
/// The layout is fixed for compatibility with the deployed web sessions:
/// `sid` is the cookie id, `sess` the opaque JSON session payload, `expire`
/// a UTC timestamp without time zone at microsecond precision. Identity
/// lives inside `sess`; the table carries no foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub sid: String,
    pub sess: serde_json::Value,
    pub expire: NaiveDateTime,
}

impl SessionRecord {
    pub fn new(sid: String, sess: serde_json::Value, expire: NaiveDateTime) -> Self {
        Self { sid, sess, expire }
    }
}
