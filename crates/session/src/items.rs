//! Splits connect item replies into successes and a joined error.

use std::fmt;

use tonconnect_protocol::ConnectItemReply;

use crate::error::ItemError;

/// Ordered, non-empty list of per-item failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemErrors(Vec<ItemError>);

impl ItemErrors {
    /// Joins `errors`; an empty list yields `None`.
    pub fn join(errors: Vec<ItemError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the error recorded for `item`, if any.
    pub fn for_item(&self, item: &str) -> Option<&ItemError> {
        self.0.iter().find(|e| e.item() == item)
    }
}

impl fmt::Display for ItemErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ItemErrors {}

impl<'a> IntoIterator for &'a ItemErrors {
    type Item = &'a ItemError;
    type IntoIter = std::slice::Iter<'a, ItemError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Partitions `items` into the replies without an error and the joined
/// error of those that failed. Input order is kept on both sides.
pub fn split_items(items: Vec<ConnectItemReply>) -> (Vec<ConnectItemReply>, Option<ItemErrors>) {
    let mut ok = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for item in items {
        match &item.error {
            Some(err) => errors.push(ItemError::from_wire(&item.name, err)),
            None => ok.push(item),
        }
    }
    (ok, ItemErrors::join(errors))
}
