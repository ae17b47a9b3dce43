pub(crate) mod attributes;
pub(crate) mod timestamp;

use core::mem::transmute;

use heapless::String;

use crate::endian::Little as LE;
use crate::error::InputError;
use crate::types::ClusterID;
use attributes::Attributes;
use timestamp::{DateTime, Timestamp};

pub(crate) const ENTRY_SIZE: usize = 32;
pub(crate) type RawSlot = [u8; ENTRY_SIZE];

pub(crate) const END_OF_DIRECTORY: u8 = 0x00;
pub(crate) const FREE: u8 = 0xE5;
// 0xE5 is a legal first character in some code pages, escaped on disk
const KANJI_ESCAPE: u8 = 0x05;

const NAME_LENGTH: usize = 8;
const EXTENSION_LENGTH: usize = 3;
const ILLEGAL: &[u8] = b"\"*+,./:;<=>?[\\]|";

pub(crate) type Name = String<24>;
/// Volume label as found in the root directory
pub type Label = String<22>;

pub(crate) const DOT: &str = ".";
pub(crate) const DOTDOT: &str = "..";

/// 8.3 short directory entry
#[derive(Copy, Clone, Debug, Default)]
#[repr(C, packed(1))]
pub(crate) struct RawEntry {
    pub name: [u8; NAME_LENGTH],
    pub extension: [u8; EXTENSION_LENGTH],
    pub attributes: u8,
    _nt_reserved: u8,
    create_10ms_increment: u8,
    create_timestamp: LE<u32>,
    last_accessed_date: LE<u16>,
    pub first_cluster_high: LE<u16>,
    last_modified_timestamp: LE<u32>,
    pub first_cluster_low: LE<u16>,
    pub file_size: LE<u32>,
}

impl RawEntry {
    pub fn from_bytes(bytes: &RawSlot) -> Self {
        unsafe { transmute(*bytes) }
    }

    pub fn to_bytes(self) -> RawSlot {
        unsafe { transmute(self) }
    }

    /// Encode a short entry, "." and ".." are taken verbatim
    pub fn new(
        name: &str,
        attributes: Attributes,
        first_cluster: ClusterID,
        size: u32,
    ) -> Result<Self, InputError> {
        let mut entry = Self {
            name: [b' '; NAME_LENGTH],
            extension: [b' '; EXTENSION_LENGTH],
            attributes: attributes.into(),
            file_size: size.into(),
            ..Default::default()
        };
        entry.set_first_cluster(first_cluster);
        match name {
            DOT | DOTDOT => entry.name[..name.len()].copy_from_slice(name.as_bytes()),
            _ => {
                validate_name(name)?;
                for (i, byte) in name.bytes().enumerate() {
                    entry.name[i] = byte.to_ascii_uppercase();
                }
            }
        }
        Ok(entry)
    }

    pub fn stamp(&mut self, datetime: DateTime) {
        let timestamp: u32 = datetime.timestamp.into();
        self.create_timestamp = timestamp.into();
        self.create_10ms_increment = datetime.centiseconds();
        self.last_modified_timestamp = timestamp.into();
        self.last_accessed_date = datetime.timestamp.date().into();
    }

    pub fn set_first_cluster(&mut self, cluster: ClusterID) {
        self.first_cluster_high = cluster.high().into();
        self.first_cluster_low = cluster.low().into();
    }

    pub fn first_cluster(&self) -> ClusterID {
        ClusterID::from_halves(self.first_cluster_high.to_ne(), self.first_cluster_low.to_ne())
    }

    fn display_name(&self, directory: bool) -> Name {
        let mut name = Name::new();
        let mut bytes = self.name;
        if bytes[0] == KANJI_ESCAPE {
            bytes[0] = FREE;
        }
        push_trimmed(&mut name, &bytes);
        let extension = self.extension;
        if !directory && trimmed(&extension).next().is_some() {
            name.push('.').ok();
            push_trimmed(&mut name, &extension);
        }
        name
    }
}

fn trimmed(field: &[u8]) -> impl Iterator<Item = u8> + '_ {
    let length = field.iter().rposition(|&byte| byte != b' ').map_or(0, |i| i + 1);
    field[..length].iter().copied()
}

// Bytes above 0x7F are taken as Latin-1, two UTF-8 bytes each
fn push_trimmed<const N: usize>(string: &mut String<N>, field: &[u8]) {
    for byte in trimmed(field) {
        string.push(byte as char).ok();
    }
}

/// Short name rules for entries this driver creates
pub(crate) fn validate_name(name: &str) -> Result<(), InputError> {
    if name.is_empty() || name.len() > NAME_LENGTH || name.starts_with('.') {
        return Err(InputError::InvalidName);
    }
    let legal = |&byte: &u8| byte.is_ascii_graphic() && !ILLEGAL.contains(&byte);
    if !name.as_bytes().iter().all(legal) {
        return Err(InputError::InvalidName);
    }
    Ok(())
}

/// Decoded live short entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    name: Name,
    attributes: Attributes,
    first_cluster: ClusterID,
    size: u32,
    modified: Timestamp,
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// Stored start cluster, 0 on ".." entries refers to root
    pub fn first_cluster(&self) -> ClusterID {
        self.first_cluster
    }

    /// Declared size, always 0 for directories
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn modified(&self) -> Timestamp {
        self.modified
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        self.name.as_str().eq_ignore_ascii_case(name)
    }

    pub fn is_volume_label(&self) -> bool {
        self.attributes.is_volume_label()
    }

    pub(crate) fn is_dot(&self) -> bool {
        matches!(self.name.as_str(), DOT | DOTDOT)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    EndOfDirectory,
    Free,
    LongName,
    Entry(DirectoryEntry),
}

/// Volume-ID slots spell the label across name and extension
pub(crate) fn volume_label(bytes: &RawSlot) -> Option<Label> {
    match Slot::parse(bytes) {
        Slot::Entry(entry) if entry.is_volume_label() => (),
        _ => return None,
    }
    let mut label = Label::new();
    push_trimmed(&mut label, &bytes[..NAME_LENGTH + EXTENSION_LENGTH]);
    Some(label)
}

impl Slot {
    pub fn parse(bytes: &RawSlot) -> Self {
        let attributes = Attributes::from(bytes[11]);
        match bytes[0] {
            END_OF_DIRECTORY => return Self::EndOfDirectory,
            FREE => return Self::Free,
            _ if attributes.is_long_name() => return Self::LongName,
            _ => (),
        }
        let raw = RawEntry::from_bytes(bytes);
        let directory = attributes.is_directory();
        Self::Entry(DirectoryEntry {
            name: raw.display_name(directory),
            attributes,
            first_cluster: raw.first_cluster(),
            size: if directory { 0 } else { raw.file_size.to_ne() },
            modified: raw.last_modified_timestamp.to_ne().into(),
        })
    }
}
