//! Serde support for [`Tree`].
//!
//! A node serializes as `{ "id", "children", "content"? }`. Parent links are
//! never written; they are derived again while deserializing.

use std::collections::HashSet;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tree::{Tree, TreeId};

impl<T: Serialize> Serialize for Tree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node.borrow();
        let field_count = if node.content.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Tree", field_count)?;
        state.serialize_field("id", &node.id)?;
        state.serialize_field("children", &node.children)?;
        match &node.content {
            Some(content) => state.serialize_field("content", content)?,
            None => state.skip_field("content")?,
        }
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct TreeRecord<T> {
    id: TreeId<T>,
    children: Vec<Tree<T>>,
    #[serde(default)]
    content: Option<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Children arrive fully built (their own links already wired);
        // only the links from them to this node remain.
        let record = TreeRecord::<T>::deserialize(deserializer)?;

        let mut sibling_ids = HashSet::new();
        for child in &record.children {
            if !sibling_ids.insert(child.id()) {
                return Err(D::Error::custom(format!(
                    "duplicate child {} under {}",
                    child.id(),
                    record.id
                )));
            }
        }

        Ok(Tree::from_parts(record.id, record.content, record.children))
    }
}
