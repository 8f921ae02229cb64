//! BDM file handling.

use std::fs;
use std::path::Path;

use tracing::debug;
use xvrec_common::header::{read_preamble, write_preamble};
use xvrec_common::{comment, BinaryReader, ContainerHeader, Endian};

use crate::entry::{BdmEntry, LegacyBdmEntry, BDM_ENTRY_SIZE, LEGACY_BDM_ENTRY_SIZE};
use crate::Result;

/// Signature at the start of every BDM file.
pub const BDM_SIGNATURE: &[u8; 4] = b"#BDM";

/// Kind name used for the comment sidecar (`<name>_BDM.cmnt`).
const COMMENT_KIND: &str = "BDM";

/// Which entry layout a loaded file used on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BdmLayout {
    /// The current 100-byte sub-entry layout.
    #[default]
    Canonical,
    /// The older 76-byte sub-entry layout, upgraded on load.
    Legacy,
}

impl BdmLayout {
    /// Encoded size of one entry in this layout.
    pub const fn entry_size(&self) -> usize {
        match self {
            BdmLayout::Canonical => BDM_ENTRY_SIZE,
            BdmLayout::Legacy => LEGACY_BDM_ENTRY_SIZE,
        }
    }
}

/// A BDM file. Entries are always held in canonical form.
#[derive(Debug, Clone, Default)]
pub struct BdmFile {
    header: ContainerHeader,
    endian: Endian,
    source_layout: BdmLayout,
    entries: Vec<BdmEntry>,
    has_comments: bool,
}

impl BdmFile {
    /// Create an empty BDM file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a BDM file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse BDM data from bytes, upgrading legacy entries.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (reader, header) = read_preamble(data, BDM_SIGNATURE)?;
        let count = header.num_entries as usize;

        let canonical = read_table(reader.clone(), count, BdmLayout::Canonical, BdmEntry::read);
        let (entries, source_layout) = match canonical {
            Ok(entries) => (entries, BdmLayout::Canonical),
            Err(e) if e.is_layout() => {
                debug!(error = %e, "canonical BDM layout overran, retrying with legacy layout");
                let legacy =
                    read_table(reader.clone(), count, BdmLayout::Legacy, LegacyBdmEntry::read)?;
                let entries = legacy.into_iter().map(BdmEntry::from).collect();
                (entries, BdmLayout::Legacy)
            }
            Err(e) => return Err(e.into()),
        };

        debug!(
            entries = count,
            layout = ?source_layout,
            endian = reader.endian().name(),
            "parsed BDM"
        );

        Ok(Self {
            header,
            endian: reader.endian(),
            source_layout,
            entries,
            has_comments: false,
        })
    }

    /// Encode the file in the canonical layout.
    ///
    /// The output is always little-endian with data starting at 16, even if
    /// this file was loaded from a big-endian or legacy source.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = self.header;
        let mut writer = write_preamble(BDM_SIGNATURE, &mut header, self.entries.len())?;

        for entry in &self.entries {
            entry.write(&mut writer)?;
        }

        Ok(writer.into_inner())
    }

    /// Write the file to disk (canonical, little-endian; not atomic).
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = self.to_bytes()?;
        fs::write(path, data)?;

        self.header.canonicalize(self.entries.len())?;
        self.endian = Endian::Little;
        Ok(())
    }

    /// Load entry comments from the sidecar next to `path`.
    ///
    /// Failures are logged, never returned.
    pub fn load_comments<P: AsRef<Path>>(&mut self, path: P) {
        if comment::load(path.as_ref(), COMMENT_KIND, &mut self.entries) {
            self.has_comments = true;
        }
    }

    /// Save entry comments next to `path`, if any were loaded or enabled.
    ///
    /// Failures are logged, never returned.
    pub fn save_comments<P: AsRef<Path>>(&self, path: P) {
        if self.has_comments {
            comment::save(path.as_ref(), COMMENT_KIND, &self.entries);
        }
    }

    /// Whether comments were loaded or enabled.
    pub fn has_comments(&self) -> bool {
        self.has_comments
    }

    /// Enable or disable writing comments.
    pub fn set_has_comments(&mut self, has_comments: bool) {
        self.has_comments = has_comments;
    }

    /// The layout the entries were stored in when loaded.
    ///
    /// Informational only: saves always use [`BdmLayout::Canonical`].
    pub fn source_layout(&self) -> BdmLayout {
        self.source_layout
    }

    /// The header as loaded (or as last saved).
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Byte order of the source file.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Get the entries.
    pub fn entries(&self) -> &[BdmEntry] {
        &self.entries
    }

    /// Get mutable access to the entries.
    pub fn entries_mut(&mut self) -> &mut Vec<BdmEntry> {
        &mut self.entries
    }

    /// Find an entry by id.
    pub fn find(&self, id: u32) -> Option<&BdmEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Get the number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Decode `count` consecutive entries of `layout`, all or nothing.
fn read_table<'a, T>(
    mut reader: BinaryReader<'a>,
    count: usize,
    layout: BdmLayout,
    read: impl Fn(&mut BinaryReader<'a>) -> xvrec_common::Result<T>,
) -> xvrec_common::Result<Vec<T>> {
    let mut entries = Vec::with_capacity(count.min(reader.remaining() / layout.entry_size()));
    for _ in 0..count {
        entries.push(read(&mut reader)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BdmSubEntry, Error, LegacyBdmSubEntry, BDM_SUB_ENTRY_COUNT};
    use xvrec_common::comment::Commented;
    use xvrec_common::BinaryWriter;

    fn legacy_sub_entry(seed: u16) -> LegacyBdmSubEntry {
        LegacyBdmSubEntry {
            damage_type: seed,
            damage_amount: seed * 100,
            acb_type: 3,
            cue_id: seed as i16 - 5,
            effect_id_2: -1,
            pushback_strength: f32::from(seed) * 0.25,
            knockback_duration: 20 + seed,
            knockback_strength_y: 1.5,
            victim_invincibility_time: 12,
            transformation_type: seed % 3,
            stumble_type: seed as u8,
            camera_shake_type: 1,
            camera_shake_time: 8,
            ..Default::default()
        }
    }

    fn legacy_entries(count: u32) -> Vec<LegacyBdmEntry> {
        (0..count)
            .map(|id| LegacyBdmEntry {
                id: 100 + id,
                sub_entries: std::array::from_fn(|i| legacy_sub_entry(id as u16 * 10 + i as u16)),
            })
            .collect()
    }

    fn legacy_bytes(entries: &[LegacyBdmEntry], endian: Endian) -> Vec<u8> {
        let mut writer = BinaryWriter::new(endian);
        writer.write_bytes(BDM_SIGNATURE);
        writer
            .write_record(&ContainerHeader {
                endianness_check: 0xFFFE,
                u_06: 0,
                num_entries: entries.len() as u32,
                data_start: 16,
            })
            .unwrap();
        for entry in entries {
            writer.write_u32(entry.id).unwrap();
            writer.write_records(&entry.sub_entries).unwrap();
        }
        writer.into_inner()
    }

    fn canonical_file(count: u32) -> BdmFile {
        let mut bdm = BdmFile::new();
        for id in 0..count {
            let mut entry = BdmEntry::new(id);
            entry.sub_entries[0] = BdmSubEntry {
                damage_amount: 500,
                ki_damage: 30,
                user_bpe_id: 7,
                u_60: 0xDEAD_BEEF,
                ..Default::default()
            };
            entry.sub_entries[9].knockback_strength_z = -2.0;
            bdm.entries_mut().push(entry);
        }
        bdm
    }

    #[test]
    fn test_canonical_roundtrip_is_byte_identical() {
        let bytes = canonical_file(3).to_bytes().unwrap();
        assert_eq!(bytes.len(), 16 + 3 * BdmLayout::Canonical.entry_size());

        let parsed = BdmFile::parse(&bytes).unwrap();
        assert_eq!(parsed.source_layout(), BdmLayout::Canonical);
        assert_eq!(parsed.entries()[2].sub_entries[0].u_60, 0xDEAD_BEEF);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_legacy_file_is_upgraded() {
        let legacy = legacy_entries(3);
        let parsed = BdmFile::parse(&legacy_bytes(&legacy, Endian::Little)).unwrap();

        let bytes = legacy_bytes(&legacy, Endian::Little);
        assert_eq!(bytes.len(), 16 + 3 * BdmLayout::Legacy.entry_size());

        assert_eq!(parsed.source_layout(), BdmLayout::Legacy);
        assert_eq!(parsed.entry_count(), 3);
        assert_eq!(parsed.entries()[1].id, 101);
        let sub = &parsed.entries()[1].sub_entries[4];
        assert_eq!(sub.damage_type, 14);
        assert_eq!(sub.stumble_type, 14);
        assert_eq!(sub.camera_shake_time, 8);
        assert_eq!(sub.ki_damage, 0);
    }

    #[test]
    fn test_legacy_matches_hand_converted_canonical() {
        let legacy = legacy_entries(2);

        let mut converted = BdmFile::new();
        for entry in &legacy {
            let mut canonical = BdmEntry::new(entry.id);
            for (dst, src) in canonical.sub_entries.iter_mut().zip(&entry.sub_entries) {
                *dst = BdmSubEntry {
                    damage_type: src.damage_type,
                    damage_amount: src.damage_amount,
                    acb_type: src.acb_type,
                    cue_id: src.cue_id,
                    effect_id_2: src.effect_id_2,
                    pushback_strength: src.pushback_strength,
                    knockback_duration: src.knockback_duration,
                    knockback_strength_y: src.knockback_strength_y,
                    victim_invincibility_time: src.victim_invincibility_time,
                    transformation_type: src.transformation_type,
                    stumble_type: u16::from(src.stumble_type),
                    camera_shake_type: u16::from(src.camera_shake_type),
                    camera_shake_time: src.camera_shake_time,
                    ..Default::default()
                };
            }
            converted.entries_mut().push(canonical);
        }

        let from_legacy = BdmFile::parse(&legacy_bytes(&legacy, Endian::Big)).unwrap();
        let from_canonical = BdmFile::parse(&converted.to_bytes().unwrap()).unwrap();
        assert_eq!(from_legacy.endian(), Endian::Big);
        assert_eq!(from_legacy.entries(), from_canonical.entries());
    }

    #[test]
    fn test_legacy_source_saves_canonical() {
        let parsed = BdmFile::parse(&legacy_bytes(&legacy_entries(2), Endian::Big)).unwrap();
        let saved = parsed.to_bytes().unwrap();

        assert_eq!(saved.len(), 16 + 2 * BDM_ENTRY_SIZE);
        assert_eq!(&saved[4..6], &Endian::LITTLE_MARKER);

        let reparsed = BdmFile::parse(&saved).unwrap();
        assert_eq!(reparsed.source_layout(), BdmLayout::Canonical);
        assert_eq!(reparsed.entries(), parsed.entries());
    }

    #[test]
    fn test_fits_neither_layout() {
        let bytes = legacy_bytes(&legacy_entries(2), Endian::Little);
        let err = BdmFile::parse(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, Error::Common(ref e) if e.is_layout()));
    }

    #[test]
    fn test_empty_table() {
        let bytes = BdmFile::new().to_bytes().unwrap();
        assert_eq!(bytes.len(), 16);

        let parsed = BdmFile::parse(&bytes).unwrap();
        assert_eq!(parsed.source_layout(), BdmLayout::Canonical);
        assert_eq!(parsed.entry_count(), 0);
    }

    #[test]
    fn test_comments_follow_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skill.bdm");
        std::fs::write(&path, legacy_bytes(&legacy_entries(2), Endian::Little)).unwrap();
        std::fs::write(dir.path().join("skill_BDM.cmnt"), "light\nheavy\n").unwrap();

        let mut bdm = BdmFile::open(&path).unwrap();
        bdm.load_comments(&path);

        assert!(bdm.has_comments());
        assert_eq!(bdm.find(101).map(|e| e.display_comment()), Some(" - heavy".to_string()));
        assert_eq!(bdm.entries()[0].sub_entries.len(), BDM_SUB_ENTRY_COUNT);
    }
}
