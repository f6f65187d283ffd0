use schemars::JsonSchema;
use std::fmt::Debug;

use serde::Serialize;
use utility::id::{HasId, Id};

pub mod seat;
pub mod train;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

/// Trims `value` and returns it, or `None` if nothing but whitespace is left.
pub fn non_blank<S: AsRef<str>>(value: S) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::non_blank;

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  Kiel Hbf "), Some("Kiel Hbf".to_owned()));
        assert_eq!(non_blank(" \t "), None);
        assert_eq!(non_blank(""), None);
    }
}
