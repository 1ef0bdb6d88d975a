//! Package assembly: SQLite collection plus media inside a zip archive.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use deckgen_cards::{Deck, Template};
use deckgen_config::ModelsConfig;
use rusqlite::{Connection, params};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::collection::CollectionMeta;
use crate::error::PackageError;
use crate::note::NoteRow;
use crate::schema::{SCHEMA, SCHEMA_VERSION};

/// Archive entry holding the collection database.
pub const COLLECTION_ENTRY: &str = "collection.anki2";

/// Archive entry holding the media index.
pub const MEDIA_ENTRY: &str = "media";

/// Writes decks as Anki packages.
pub struct PackageWriter<'a> {
    models: &'a ModelsConfig,
    media_root: PathBuf,
    timestamp_ms: Option<i64>,
}

impl<'a> PackageWriter<'a> {
    /// Create a writer resolving media references relative to `media_root`.
    pub fn new(models: &'a ModelsConfig, media_root: impl Into<PathBuf>) -> Self {
        Self {
            models,
            media_root: media_root.into(),
            timestamp_ms: None,
        }
    }

    /// Use a fixed creation time (milliseconds since the epoch) instead of the clock.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Write `deck` to `output`.
    ///
    /// The package is assembled in a temporary file next to `output` and moved
    /// into place once complete. Media files missing under the media root are
    /// logged and left out of the archive.
    pub fn write(&self, deck: &Deck, output: &Path) -> Result<(), PackageError> {
        let timestamp_ms = self.timestamp_ms.unwrap_or_else(now_ms);

        let workdir = tempfile::tempdir()?;
        let db_path = workdir.path().join(COLLECTION_ENTRY);
        self.write_collection(deck, &db_path, timestamp_ms)?;
        let collection = fs::read(&db_path)?;

        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut zip = ZipWriter::new(NamedTempFile::new_in(parent)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(COLLECTION_ENTRY, options)?;
        zip.write_all(&collection)?;

        let media = self.collect_media(deck);
        let index: BTreeMap<String, &str> = media
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (i.to_string(), name.as_str()))
            .collect();
        zip.start_file(MEDIA_ENTRY, options)?;
        zip.write_all(serde_json::to_string(&index)?.as_bytes())?;

        for (i, (_, path)) in media.iter().enumerate() {
            zip.start_file(i.to_string(), options)?;
            zip.write_all(&fs::read(path)?)?;
        }

        let temp = zip.finish()?;
        temp.persist(output)?;

        tracing::debug!(
            path = %output.display(),
            notes = deck.cards.len(),
            media = media.len(),
            "Wrote package"
        );
        Ok(())
    }

    fn write_collection(
        &self,
        deck: &Deck,
        db_path: &Path,
        timestamp_ms: i64,
    ) -> Result<(), PackageError> {
        let timestamp = timestamp_ms / 1000;
        let meta = CollectionMeta::new(self.models, deck.id, &deck.name, timestamp)?;

        let mut conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO col VALUES (NULL, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
            params![
                timestamp,
                timestamp_ms,
                timestamp_ms,
                SCHEMA_VERSION,
                meta.conf,
                meta.models,
                meta.decks,
                meta.dconf,
            ],
        )?;

        let mut next_id = timestamp_ms;
        for (position, card) in (1i64..).zip(&deck.cards) {
            let row = NoteRow::new(deck.id, card);
            let model_id = match card.template {
                Template::Basic => self.models.basic.id,
                Template::Cloze => self.models.cloze.id,
            };

            let note_id = next_id;
            next_id += 1;
            tx.execute(
                "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')",
                params![
                    note_id, row.guid, model_id, timestamp, row.tags, row.flds, row.sfld, row.csum,
                ],
            )?;

            for ord in &row.ords {
                tx.execute(
                    "INSERT INTO cards VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                    params![next_id, note_id, deck.id, ord, timestamp, position],
                )?;
                next_id += 1;
            }
        }
        tx.commit()?;
        conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    /// Media payloads in sorted reference order, keyed by archive file name.
    ///
    /// Missing files and file names already taken by an earlier reference are
    /// skipped with a warning.
    fn collect_media(&self, deck: &Deck) -> Vec<(String, PathBuf)> {
        let mut seen = HashSet::new();
        let mut media = Vec::new();
        for reference in &deck.media {
            let path = self.media_root.join(reference);
            if !path.is_file() {
                tracing::warn!(
                    path = %path.display(),
                    deck = %deck.name,
                    "Media file not found, skipping"
                );
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if !seen.insert(name.clone()) {
                tracing::warn!(
                    path = %path.display(),
                    name = %name,
                    "Media file name already packaged, skipping"
                );
                continue;
            }
            media.push((name, path));
        }
        media
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
