pub(crate) mod entry_iter;
mod listing;

use alloc::vec;
use core::fmt::Debug;

use super::cache::SingleCluster;
use super::file::File;
use crate::error::{DataError, Error, InputError, OperationError};
use crate::region::data::attributes::Attributes;
use crate::region::data::timestamp::DateTime;
use crate::region::data::{self, DirectoryEntry, Label, RawEntry, Slot, DOT, DOTDOT, ENTRY_SIZE};
use crate::types::ClusterID;
use crate::Fat32;
use entry_iter::{SlotIter, SlotRef};
pub use listing::Listing;

/// A directory bound to its first cluster, root alias already resolved
pub struct Directory<'a, IO> {
    fs: &'a mut Fat32<IO>,
    cluster: ClusterID,
}

impl<'a, E: Debug, IO: crate::io::IO<Error = E>> Directory<'a, IO> {
    pub(crate) fn new(fs: &'a mut Fat32<IO>, cluster: ClusterID) -> Self {
        let cluster = fs.parameters().resolve(cluster);
        Self { fs, cluster }
    }

    pub fn cluster(&self) -> ClusterID {
        self.cluster
    }

    pub fn is_root(&self) -> bool {
        self.cluster == self.fs.parameters().root_cluster
    }

    fn slots(&mut self) -> SlotIter<'_, IO, SingleCluster> {
        let Fat32 { store, fat, .. } = &mut *self.fs;
        SlotIter::new(store, fat, self.cluster)
    }

    /// Live entries across the whole chain, halting at end of directory
    pub fn walk(&mut self) -> Result<Listing, Error<E>> {
        let mut listing = Listing::default();
        let mut slots = self.slots();
        while let Some((_, slot)) = slots.next()? {
            match Slot::parse(&slot) {
                Slot::EndOfDirectory => break,
                Slot::Entry(entry) => listing.insert(entry),
                Slot::Free | Slot::LongName => continue,
            }
        }
        Ok(listing)
    }

    pub fn find(&mut self, name: &str) -> Result<DirectoryEntry, Error<E>> {
        let listing = self.walk()?;
        listing.get(name).cloned().ok_or(OperationError::NotFound.into())
    }

    /// Volume-ID entry, only meaningful on the root directory
    pub fn label(&mut self) -> Result<Option<Label>, Error<E>> {
        let mut slots = self.slots();
        while let Some((_, slot)) = slots.next()? {
            if slot[0] == data::END_OF_DIRECTORY {
                break;
            }
            if let Some(label) = data::volume_label(&slot) {
                return Ok(Some(label));
            }
        }
        Ok(None)
    }

    pub fn open(mut self, name: &str) -> Result<Directory<'a, IO>, Error<E>> {
        let entry = self.find(name)?;
        if !entry.is_directory() {
            return Err(OperationError::NotADirectory.into());
        }
        trace!("Open directory {} on cluster {}", entry.name(), entry.first_cluster());
        Ok(Directory::new(self.fs, entry.first_cluster()))
    }

    pub fn open_file(mut self, name: &str) -> Result<File<'a, IO>, Error<E>> {
        let entry = self.find(name)?;
        if entry.is_directory() {
            return Err(OperationError::IsADirectory.into());
        }
        trace!("Open file {} size {}", entry.name(), entry.size());
        Ok(File::new(self.fs, entry))
    }

    /// First free or end-of-directory slot within the allocated chain
    fn vacant_slot(&mut self) -> Result<Option<(SlotRef, bool)>, Error<E>> {
        let mut slots = self.slots();
        while let Some((slot_ref, slot)) = slots.next()? {
            match slot[0] {
                data::END_OF_DIRECTORY => return Ok(Some((slot_ref, true))),
                data::FREE => return Ok(Some((slot_ref, false))),
                _ => continue,
            }
        }
        Ok(None)
    }

    fn release(&mut self, cluster: ClusterID) -> Result<(), Error<E>> {
        let Fat32 { store, fat, .. } = &mut *self.fs;
        fat.set_entry(store, cluster, 0)
    }

    fn abandon(&mut self, cluster: ClusterID) -> Result<(), Error<E>> {
        warn!("Directory {} has no room left, releasing cluster {}", self.cluster, cluster);
        self.release(cluster)?;
        Err(OperationError::DirectoryFull.into())
    }

    /// New cluster content first, then the sentinel, the parent slot last
    fn link(
        &mut self,
        cluster: ClusterID,
        content: &[u8],
        slot: SlotRef,
        sentinel: Option<SlotRef>,
        entry: &RawEntry,
    ) -> Result<(), Error<E>> {
        let params = *self.fs.parameters();
        let store = &mut self.fs.store;
        store.write(params.cluster_offset(cluster)?, content)?;
        if let Some(next) = sentinel {
            store.write(next.offset(&params)?, &[data::END_OF_DIRECTORY; ENTRY_SIZE])?;
        }
        store.write(slot.offset(&params)?, &entry.to_bytes())
    }

    /// Create an empty subdirectory.
    ///
    /// The directory chain is never grown, a directory without a vacant slot
    /// fails with `DirectoryFull` and the claimed cluster is released again.
    pub fn create_dir(&mut self, name: &str) -> Result<(), Error<E>> {
        data::validate_name(name)?;
        let directory = Attributes::new(true);
        let mut entry = RawEntry::new(name, directory, ClusterID::ROOT_ALIAS, 0)?;
        let mut dot = RawEntry::new(DOT, directory, ClusterID::ROOT_ALIAS, 0)?;
        let parent = match self.is_root() {
            true => ClusterID::ROOT_ALIAS,
            false => self.cluster,
        };
        let mut dotdot = RawEntry::new(DOTDOT, directory, parent, 0)?;
        if self.walk()?.get(name).is_some() {
            return Err(OperationError::AlreadyExists.into());
        }

        let params = *self.fs.parameters();
        let cluster = {
            let Fat32 { store, fat, .. } = &mut *self.fs;
            fat.allocate_free(store)?
        };
        let vacant = match self.vacant_slot() {
            Ok(vacant) => vacant,
            Err(error) => {
                self.release(cluster)?;
                return Err(error);
            }
        };
        let (slot, sentinel) = match vacant {
            Some((slot, true)) => match slot.successor(&params) {
                Some(next) => (slot, Some(next)),
                None => return self.abandon(cluster),
            },
            Some((slot, false)) => (slot, None),
            None => return self.abandon(cluster),
        };
        debug!("Create directory {} on cluster {} at slot {:?}", name, cluster, slot);

        let now = DateTime::now();
        for raw in [&mut entry, &mut dot, &mut dotdot] {
            raw.stamp(now);
        }
        entry.set_first_cluster(cluster);
        dot.set_first_cluster(cluster);
        let mut content = vec![0u8; params.bytes_per_cluster() as usize];
        content[..ENTRY_SIZE].copy_from_slice(&dot.to_bytes());
        content[ENTRY_SIZE..2 * ENTRY_SIZE].copy_from_slice(&dotdot.to_bytes());

        if let Err(error) = self.link(cluster, &content, slot, sentinel, &entry) {
            warn!("Create directory {} failed, releasing cluster {}", name, cluster);
            if let Err(release) = self.release(cluster) {
                warn!("Release of cluster {} failed: {:?}", cluster, release);
            }
            return Err(error);
        }
        self.fs.store.flush()
    }

    /// Last live slot holding `target`, matching by name and first cluster
    fn slot_of(&mut self, target: &DirectoryEntry) -> Result<Option<SlotRef>, Error<E>> {
        let mut found = None;
        let mut slots = self.slots();
        while let Some((slot_ref, slot)) = slots.next()? {
            match Slot::parse(&slot) {
                Slot::EndOfDirectory => break,
                Slot::Entry(entry) if entry.matches(target.name()) => {
                    if entry.first_cluster() == target.first_cluster() {
                        found = Some(slot_ref);
                    }
                }
                _ => continue,
            }
        }
        Ok(found)
    }

    /// Remove an empty subdirectory, marking its slot free and releasing its chain
    pub fn remove_dir(&mut self, name: &str) -> Result<(), Error<E>> {
        if matches!(name, DOT | DOTDOT) {
            return Err(InputError::InvalidName.into());
        }
        let target = self.find(name)?;
        if !target.is_directory() {
            return Err(OperationError::NotADirectory.into());
        }
        let cluster = target.first_cluster();
        if !cluster.valid() || cluster == self.cluster {
            return Err(DataError::InvalidCluster(cluster.into()).into());
        }
        if !Directory::new(&mut *self.fs, cluster).walk()?.is_vacant() {
            return Err(OperationError::NotEmpty.into());
        }
        self.remove_entry(&target)
    }

    /// Frees the slot of `target` found on a rescan, then its chain
    fn remove_entry(&mut self, target: &DirectoryEntry) -> Result<(), Error<E>> {
        let cluster = target.first_cluster();
        let slot = match self.slot_of(target)? {
            Some(slot) => slot,
            None => {
                warn!("Slot of {} vanished before removal", target.name());
                return Err(DataError::RemovalIncomplete.into());
            }
        };
        debug!("Remove directory {} on cluster {} at slot {:?}", target.name(), cluster, slot);
        let offset = slot.offset(self.fs.parameters())?;
        let Fat32 { store, fat, .. } = &mut *self.fs;
        store.write(offset, &[data::FREE])?;
        fat.free_chain(store, cluster)?;
        store.flush()
    }
}
