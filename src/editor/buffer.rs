use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use ropey::Rope;
use tracing::debug;

use super::error::{BufferError, STREAM_PATH};

/// XML text held as a single rope of characters.
///
/// The rope is the only copy of the document: no tree or index is kept
/// beside it. Offsets handed out by cursors are char indices into it.
pub struct XmlBuffer {
    rope: Rope,
    revision: u64,
    dirty: bool,
}

impl XmlBuffer {
    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            revision: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Counter bumped by every change to the text.
    ///
    /// Anchors remember the revision they were taken at, so a caller can
    /// tell whether the buffer moved underneath them.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the buffer has been edited since the last load or save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace the contents with the file at `path`.
    ///
    /// # Errors
    /// Returns [`BufferError::NotFound`] if the file cannot be opened or
    /// read, including when it is not valid UTF-8; the previous contents
    /// are kept in that case.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref();
        let not_found = |source| BufferError::NotFound {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(not_found)?;
        let text = read_all(&mut file).map_err(not_found)?;
        self.replace(&text);
        debug!(path = %path.display(), chars = self.len_chars(), "loaded XML");
        Ok(())
    }

    /// Replace the contents with everything `reader` yields.
    ///
    /// # Errors
    /// Returns [`BufferError::NotFound`] if reading fails part way.
    pub fn read_from(&mut self, mut reader: impl Read) -> Result<(), BufferError> {
        let text = read_all(&mut reader).map_err(|source| BufferError::NotFound {
            path: PathBuf::from(STREAM_PATH),
            source,
        })?;
        self.replace(&text);
        Ok(())
    }

    /// Write the whole buffer to `path`, creating or truncating it.
    ///
    /// # Errors
    /// Returns [`BufferError::WriteDenied`] if the file cannot be created or
    /// the write does not complete.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref();
        let denied = |source| BufferError::WriteDenied {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(denied)?;
        self.write_chunks(BufWriter::new(file)).map_err(denied)?;
        self.dirty = false;
        debug!(path = %path.display(), chars = self.len_chars(), "saved XML");
        Ok(())
    }

    /// Write the whole buffer to `writer`.
    ///
    /// # Errors
    /// Returns [`BufferError::WriteDenied`] if any chunk fails to write.
    pub fn write_to(&self, writer: impl Write) -> Result<(), BufferError> {
        self.write_chunks(writer)
            .map_err(|source| BufferError::WriteDenied {
                path: PathBuf::from(STREAM_PATH),
                source,
            })
    }

    // --- Crate-internal access for cursors and edits ---

    pub(super) const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Char index of the first occurrence of `needle`, if any.
    ///
    /// Scans chunk by chunk, carrying the last `needle.len() - 1` bytes over
    /// so matches straddling a chunk boundary are still seen.
    pub(super) fn locate(&self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let carry = needle.len() - 1;
        let mut window = String::new();
        let mut window_start = 0;
        for chunk in self.rope.chunks() {
            window.push_str(chunk);
            if let Some(byte_idx) = window.find(needle) {
                return Some(self.rope.byte_to_char(window_start + byte_idx));
            }
            let mut keep_from = window.len().saturating_sub(carry);
            while !window.is_char_boundary(keep_from) {
                keep_from -= 1;
            }
            window.drain(..keep_from);
            window_start += keep_from;
        }
        None
    }

    pub(super) fn insert_at(&mut self, char_idx: usize, text: &str) {
        self.rope.insert(char_idx, text);
        self.touch();
    }

    pub(super) fn remove_chars(&mut self, char_idx: usize, len: usize) {
        self.rope.remove(char_idx..char_idx + len);
        self.touch();
    }

    // --- Private helpers ---

    fn replace(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.revision += 1;
        self.dirty = false;
    }

    const fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    fn write_chunks(&self, mut writer: impl Write) -> std::io::Result<()> {
        for chunk in self.rope.chunks() {
            writer.write_all(chunk.as_bytes())?;
        }
        writer.flush()
    }
}

impl Default for XmlBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for XmlBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlBuffer")
            .field("rope", &format_args!("Rope({} chars)", self.rope.len_chars()))
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn read_all(reader: &mut impl Read) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
