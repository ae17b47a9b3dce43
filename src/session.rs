use alloc::string::String;
use core::fmt::Debug;

use crate::error::{Error, OperationError};
use crate::region::data::{DOT, DOTDOT};
use crate::types::ClusterID;
use crate::{io, Directory, Fat32};

/// Present working directory of an interactive session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    cluster: ClusterID,
    path: String,
}

impl Session {
    pub fn new<IO>(fs: &Fat32<IO>) -> Self
    where
        IO: io::IO,
    {
        Self { cluster: fs.parameters().root_cluster, path: String::from("/") }
    }

    pub fn cwd(&self) -> ClusterID {
        self.cluster
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn directory<'a, IO: io::IO>(&self, fs: &'a mut Fat32<IO>) -> Directory<'a, IO> {
        fs.directory(self.cluster)
    }

    /// Cluster of directory `name` relative to the working directory
    pub fn lookup<E, IO>(&self, fs: &mut Fat32<IO>, name: &str) -> Result<ClusterID, Error<E>>
    where
        E: Debug,
        IO: io::IO<Error = E>,
    {
        let root = fs.parameters().root_cluster;
        match name {
            DOT => return Ok(self.cluster),
            // root carries no dot entries
            DOTDOT if self.cluster == root => return Ok(root),
            _ => (),
        }
        let entry = self.directory(fs).find(name)?;
        if !entry.is_directory() {
            return Err(OperationError::NotADirectory.into());
        }
        Ok(fs.parameters().resolve(entry.first_cluster()))
    }

    /// Single component only, ".." at root stays at root
    pub fn change_directory<E, IO>(&mut self, fs: &mut Fat32<IO>, name: &str) -> Result<(), Error<E>>
    where
        E: Debug,
        IO: io::IO<Error = E>,
    {
        self.cluster = self.lookup(fs, name)?;
        match name {
            DOT => (),
            DOTDOT => match self.path.rfind('/') {
                Some(0) | None => self.path.truncate(1),
                Some(index) => self.path.truncate(index),
            },
            _ => {
                if !self.path.ends_with('/') {
                    self.path.push('/');
                }
                self.path.push_str(&name.to_ascii_uppercase());
            }
        }
        trace!("Working directory {} on cluster {}", self.path, self.cluster);
        Ok(())
    }
}
