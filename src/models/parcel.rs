use serde::{Deserialize, Serialize};

/// A geographic parcel, persistent across planning years. Identified by
/// `prefix`/`suffix`/`name`; `prefix` x `suffix` is unique per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parcel {
    pub id: Option<i64>,
    pub user_id: i64,
    pub prefix: i64,
    pub suffix: i64,
    pub name: String,
}

impl Parcel {
    pub fn new(user_id: i64, prefix: i64, suffix: i64, name: &str) -> Self {
        Self {
            id: None,
            user_id,
            prefix,
            suffix,
            name: name.to_string(),
        }
    }

    /// Short label in the form used throughout lists, e.g. `01-2 Am Hof`.
    pub fn label(&self) -> String {
        format!("{:02}-{} {}", self.prefix, self.suffix, self.name)
    }
}
