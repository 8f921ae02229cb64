//! Kind detection and dispatch over the three container formats.

use std::fs;
use std::path::Path;

use tracing::debug;
use xvrec_bcm::{BcmFile, BCM_SIGNATURE};
use xvrec_bdm::{BdmFile, BDM_SIGNATURE};
use xvrec_bsa::{BsaFile, BSA_SIGNATURE};
use xvrec_common::{ContainerHeader, Endian};

use crate::{Error, Result};

/// The container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Bcm,
    Bdm,
    Bsa,
}

impl ContainerKind {
    /// Get all kinds.
    pub const fn all() -> [ContainerKind; 3] {
        [ContainerKind::Bcm, ContainerKind::Bdm, ContainerKind::Bsa]
    }

    /// The 4-byte signature of this kind.
    pub const fn magic(&self) -> &'static [u8; 4] {
        match self {
            ContainerKind::Bcm => BCM_SIGNATURE,
            ContainerKind::Bdm => BDM_SIGNATURE,
            ContainerKind::Bsa => BSA_SIGNATURE,
        }
    }

    /// Short upper-case name (`BCM`, `BDM`, `BSA`).
    pub const fn name(&self) -> &'static str {
        match self {
            ContainerKind::Bcm => "BCM",
            ContainerKind::Bdm => "BDM",
            ContainerKind::Bsa => "BSA",
        }
    }

    /// Suffix of the comment sidecar (`_BCM.cmnt`), if this kind has one.
    pub const fn comment_suffix(&self) -> Option<&'static str> {
        match self {
            ContainerKind::Bcm => Some("_BCM.cmnt"),
            ContainerKind::Bdm => Some("_BDM.cmnt"),
            ContainerKind::Bsa => None,
        }
    }

    /// Detect the kind from the leading signature.
    pub fn detect(data: &[u8]) -> Option<ContainerKind> {
        Self::all()
            .into_iter()
            .find(|kind| data.starts_with(kind.magic()))
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A loaded container of any kind.
#[derive(Debug, Clone)]
pub enum AnyContainer {
    Bcm(BcmFile),
    Bdm(BdmFile),
    Bsa(BsaFile),
}

impl AnyContainer {
    /// Read a container from disk, choosing the format by its signature.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse container data, choosing the format by its signature.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let kind = ContainerKind::detect(data).ok_or_else(|| Error::UnknownKind {
            magic: data.iter().take(4).copied().collect(),
        })?;
        debug!(%kind, bytes = data.len(), "detected container");

        Ok(match kind {
            ContainerKind::Bcm => AnyContainer::Bcm(BcmFile::parse(data)?),
            ContainerKind::Bdm => AnyContainer::Bdm(BdmFile::parse(data)?),
            ContainerKind::Bsa => AnyContainer::Bsa(BsaFile::parse(data)?),
        })
    }

    /// The kind of this container.
    pub fn kind(&self) -> ContainerKind {
        match self {
            AnyContainer::Bcm(_) => ContainerKind::Bcm,
            AnyContainer::Bdm(_) => ContainerKind::Bdm,
            AnyContainer::Bsa(_) => ContainerKind::Bsa,
        }
    }

    /// The header as loaded (or as last saved).
    pub fn header(&self) -> &ContainerHeader {
        match self {
            AnyContainer::Bcm(file) => file.header(),
            AnyContainer::Bdm(file) => file.header(),
            AnyContainer::Bsa(file) => file.header(),
        }
    }

    /// Byte order of the source file.
    pub fn endian(&self) -> Endian {
        match self {
            AnyContainer::Bcm(file) => file.endian(),
            AnyContainer::Bdm(file) => file.endian(),
            AnyContainer::Bsa(file) => file.endian(),
        }
    }

    /// Number of entries (entry slots for BSA).
    pub fn entry_count(&self) -> usize {
        match self {
            AnyContainer::Bcm(file) => file.entry_count(),
            AnyContainer::Bdm(file) => file.entry_count(),
            AnyContainer::Bsa(file) => file.entry_count(),
        }
    }

    /// Encode the container (always little-endian, data start 16).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(match self {
            AnyContainer::Bcm(file) => file.to_bytes()?,
            AnyContainer::Bdm(file) => file.to_bytes()?,
            AnyContainer::Bsa(file) => file.to_bytes()?,
        })
    }

    /// Write the container to disk. See [`to_bytes`](Self::to_bytes).
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        match self {
            AnyContainer::Bcm(file) => file.save(path)?,
            AnyContainer::Bdm(file) => file.save(path)?,
            AnyContainer::Bsa(file) => file.save(path)?,
        }
        Ok(())
    }

    /// Load comments from the sidecar next to `path`. No-op for BSA.
    pub fn load_comments<P: AsRef<Path>>(&mut self, path: P) {
        match self {
            AnyContainer::Bcm(file) => file.load_comments(path),
            AnyContainer::Bdm(file) => file.load_comments(path),
            AnyContainer::Bsa(_) => {}
        }
    }

    /// Save comments next to `path` if any were loaded. No-op for BSA.
    pub fn save_comments<P: AsRef<Path>>(&self, path: P) {
        match self {
            AnyContainer::Bcm(file) => file.save_comments(path),
            AnyContainer::Bdm(file) => file.save_comments(path),
            AnyContainer::Bsa(_) => {}
        }
    }

    /// Whether comments were loaded.
    pub fn has_comments(&self) -> bool {
        match self {
            AnyContainer::Bcm(file) => file.has_comments(),
            AnyContainer::Bdm(file) => file.has_comments(),
            AnyContainer::Bsa(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xvrec_bcm::{BcmEntry, BcmEntryData};
    use xvrec_bdm::BdmEntry;
    use xvrec_bsa::BsaEntry;
    use xvrec_common::comment::{sidecar_path, Commented};

    #[test]
    fn test_detect() {
        assert_eq!(ContainerKind::detect(b"#BCM\xFE\xFF"), Some(ContainerKind::Bcm));
        assert_eq!(ContainerKind::detect(b"#BDM"), Some(ContainerKind::Bdm));
        assert_eq!(ContainerKind::detect(b"#BSA"), Some(ContainerKind::Bsa));
        assert_eq!(ContainerKind::detect(b"#BAC"), None);
        assert_eq!(ContainerKind::detect(b"#B"), None);
    }

    #[test]
    fn test_unknown_kind() {
        let err = AnyContainer::parse(b"#EAN\xFE\xFF\0\0").unwrap_err();
        assert!(matches!(err, Error::UnknownKind { ref magic } if magic == b"#EAN"));
    }

    #[test]
    fn test_parse_dispatches_by_signature() {
        let mut bdm = BdmFile::new();
        bdm.entries_mut().push(BdmEntry::new(7));
        let bdm_bytes = bdm.to_bytes().unwrap();

        let container = AnyContainer::parse(&bdm_bytes).unwrap();
        assert_eq!(container.kind(), ContainerKind::Bdm);
        assert_eq!(container.entry_count(), 1);
        assert_eq!(container.to_bytes().unwrap(), bdm_bytes);

        let mut bsa = BsaFile::new();
        bsa.entries_mut().push(Some(BsaEntry::new()));
        let container = AnyContainer::parse(&bsa.to_bytes().unwrap()).unwrap();
        assert_eq!(container.kind(), ContainerKind::Bsa);
        assert!(!container.has_comments());
    }

    #[test]
    fn test_format_errors_are_wrapped() {
        let mut bytes = BcmFile::new().to_bytes().unwrap();
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());

        let err = AnyContainer::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::Bcm(_)));
    }

    #[test]
    fn test_comment_suffix_matches_sidecar() {
        for kind in ContainerKind::all() {
            let Some(suffix) = kind.comment_suffix() else {
                continue;
            };
            let path = sidecar_path(std::path::Path::new("skill.bcm"), kind.name());
            assert!(path.to_string_lossy().ends_with(suffix));
        }
    }

    #[test]
    fn test_open_save_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skill.bcm");

        let mut bcm = BcmFile::new();
        bcm.entries_mut().push(BcmEntry::new(BcmEntryData::default()));
        bcm.entries_mut()[0].set_comment("root");
        bcm.set_has_comments(true);
        bcm.save(&path).unwrap();
        bcm.save_comments(&path);

        let mut container = AnyContainer::open(&path).unwrap();
        container.load_comments(&path);
        assert!(container.has_comments());
        assert_eq!(container.endian(), Endian::Little);
        assert_eq!(container.header().data_start, 16);

        let out = dir.path().join("copy.bcm");
        container.save(&out).unwrap();
        container.save_comments(&out);
        assert!(dir.path().join("copy_BCM.cmnt").exists());
    }
}
