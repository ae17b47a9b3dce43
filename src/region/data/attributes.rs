use core::fmt::{Display, Formatter, Result};

use bitfield::bitfield;
use derive_more::Into;

bitfield! {
    #[derive(Copy, Clone, Default, Debug, Into, PartialEq, Eq)]
    pub struct Attributes(u8);
    pub read_only, set_read_only: 0, 0;
    pub hidden, set_hidden: 1, 1;
    pub system, set_system: 2, 2;
    pub volume_id, set_volume_id: 3, 3;
    pub directory, set_directory: 4, 4;
    pub archive, set_archive: 5, 5;
}

impl Attributes {
    pub(crate) const LONG_NAME: u8 = 0x0F;

    pub fn new(directory: bool) -> Self {
        let mut attributes = Self::default();
        if directory {
            attributes.set_directory(1);
        } else {
            attributes.set_archive(1);
        }
        attributes
    }

    pub fn is_directory(&self) -> bool {
        self.directory() > 0
    }

    /// Exact match, other attribute combinations are ordinary entries
    pub fn is_long_name(&self) -> bool {
        self.0 == Self::LONG_NAME
    }

    pub fn is_volume_label(&self) -> bool {
        !self.is_long_name() && self.volume_id() > 0
    }
}

impl From<u8> for Attributes {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let names = [
            (self.read_only(), "ATTR_READ_ONLY"),
            (self.hidden(), "ATTR_HIDDEN"),
            (self.system(), "ATTR_SYSTEM"),
            (self.volume_id(), "ATTR_VOLUME_ID"),
            (self.directory(), "ATTR_DIRECTORY"),
            (self.archive(), "ATTR_ARCHIVE"),
        ];
        let mut first = true;
        for (_, name) in names.iter().filter(|(bit, _)| *bit > 0) {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", name)?;
            first = false;
        }
        if first {
            write!(f, "NONE")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Attributes;

    #[test]
    fn test_attributes() {
        let attributes = Attributes::new(true);
        assert!(attributes.is_directory());
        assert_eq!(u8::from(attributes), 0x10);
        assert_eq!(format!("{}", attributes), "ATTR_DIRECTORY");

        let attributes = Attributes::from(0x0F);
        assert!(attributes.is_long_name());
        assert!(!attributes.is_volume_label());

        for bits in [0x1F, 0x2F, 0x3F] {
            assert!(!Attributes::from(bits).is_long_name());
        }

        assert!(Attributes::from(0x08).is_volume_label());
        assert!(Attributes::from(0x28).is_volume_label());
        assert_eq!(format!("{}", Attributes::from(0x21)), "ATTR_READ_ONLY ATTR_ARCHIVE");
        assert_eq!(format!("{}", Attributes::default()), "NONE");
    }
}
