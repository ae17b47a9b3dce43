use alloc::vec::Vec;

use crate::region::data::DirectoryEntry;

/// Live entries of one directory in on-disk order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<DirectoryEntry>,
}

impl Listing {
    /// A repeated name replaces the earlier entry in its position
    pub(crate) fn insert(&mut self, entry: DirectoryEntry) {
        match self.entries.iter().position(|e| e.matches(entry.name())) {
            Some(index) => {
                warn!("Duplicate directory entry {}, later one wins", entry.name());
                self.entries[index] = entry;
            }
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    pub fn iter(&self) -> core::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nothing but "." and ".."
    pub(crate) fn is_vacant(&self) -> bool {
        self.entries.iter().all(|entry| entry.is_dot())
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a DirectoryEntry;
    type IntoIter = core::slice::Iter<'a, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Listing {
    type Item = DirectoryEntry;
    type IntoIter = alloc::vec::IntoIter<DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
