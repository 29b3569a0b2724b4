use std::io::{Cursor, Read};

use bytes::Bytes;
use zip::ZipArchive;

use crate::services::ingest::{EntryFailure, IngestError, IngestLimits};

/// A file entry of the archive that looks like an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    index: usize,
    /// Full path inside the archive
    pub path: String,
    /// Last path component
    pub file_name: String,
    /// Lower-cased, without the dot
    pub extension: String,
}

/// An opened zip archive together with its image entries, in archive order
pub struct ImageArchive {
    zip: ZipArchive<Cursor<Bytes>>,
    entries: Vec<ImageEntry>,
    max_entry_bytes: usize,
}

impl std::fmt::Debug for ImageArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageArchive")
            .field("entries", &self.entries)
            .finish()
    }
}

impl ImageArchive {
    /// Parse `data` as a zip archive and keep the non-directory entries whose
    /// extension is one of `limits.image_extensions`.
    ///
    /// Fails with `ArchiveParse` for malformed containers and `NoImages` when
    /// nothing qualifies. Entry contents are not read here.
    pub fn open(data: Bytes, limits: &IngestLimits) -> Result<Self, IngestError> {
        let extensions = &limits.image_extensions;
        let mut zip = ZipArchive::new(Cursor::new(data))
            .map_err(|e| IngestError::ArchiveParse(e.to_string()))?;

        let mut entries = Vec::new();
        for index in 0..zip.len() {
            let entry = zip
                .by_index_raw(index)
                .map_err(|e| IngestError::ArchiveParse(e.to_string()))?;

            if entry.is_dir() {
                continue;
            }

            let path = entry.name().to_string();
            let file_name = base_name(&path).to_string();
            match extension_of(&file_name) {
                Some(extension) if extensions.contains(&extension) => entries.push(ImageEntry {
                    index,
                    path,
                    file_name,
                    extension,
                }),
                _ => continue,
            }
        }

        if entries.is_empty() {
            return Err(IngestError::NoImages);
        }

        Ok(Self {
            zip,
            entries,
            max_entry_bytes: limits.max_entry_bytes,
        })
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Decompress one entry, stopping once it grows past `max_entry_bytes`.
    /// The size in the entry header is only a hint and is never trusted.
    pub fn read(&mut self, entry: &ImageEntry) -> Result<Vec<u8>, EntryFailure> {
        let limit = self.max_entry_bytes;
        let file = self
            .zip
            .by_index(entry.index)
            .map_err(|e| EntryFailure::Read(e.to_string()))?;

        let hint = usize::try_from(file.size()).unwrap_or(limit).min(limit);
        let mut data = Vec::with_capacity(hint);
        file.take(limit as u64 + 1)
            .read_to_end(&mut data)
            .map_err(|e| EntryFailure::Read(e.to_string()))?;

        if data.len() > limit {
            return Err(EntryFailure::Read(format!(
                "entry is larger than {} bytes once decompressed",
                limit
            )));
        }

        Ok(data)
    }
}

/// Last component of an archive path. Zip paths use `/`, but archives built on
/// Windows sometimes carry `\`.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Lower-cased extension without the dot. Dotfiles such as `.png` have none.
pub fn extension_of(file_name: &str) -> Option<String> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}
