//! Settings Models

use uuid::Uuid;

/// A single store setting.
#[derive(Debug, Clone)]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: Option<String>,
    /// Input kind hint for the admin surface, e.g. `text` or `textarea`.
    pub kind: String,
}
