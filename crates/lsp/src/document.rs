// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! Open documents are held as ropes so that incremental edits stay cheap on
//! large scripts. The splitter works in byte offsets while LSP positions are
//! line plus UTF-16 code unit, so [`Document`] owns both conversions.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqltools_lsp::DocumentStore;
//! use tower_lsp::lsp_types::Url;
//!
//! let store = DocumentStore::new();
//! let uri = Url::parse("file:///test.sql").unwrap();
//!
//! store.open_document(uri.clone(), "SELECT 1;".into(), 1, "sql".into()).await?;
//! let doc = store.get_document(&uri).await.unwrap();
//! assert_eq!(doc.text(), "SELECT 1;");
//! ```

use std::collections::HashMap;
use std::ops::Range as ByteRange;
use std::sync::Arc;

use ropey::Rope;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{
    Position, Range, TextDocumentContentChangeEvent, Url, VersionedTextDocumentIdentifier,
};

/// Document metadata
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document URI
    pub uri: Url,

    /// Language identifier (e.g., "sql", "mysql", "pgsql")
    pub language_id: String,

    /// Document version, incremented by the client on each change
    pub version: i32,
}

/// A document managed by the server
#[derive(Debug, Clone)]
pub struct Document {
    metadata: DocumentMetadata,
    content: Rope,
}

impl Document {
    /// Create a new document
    pub fn new(uri: Url, content: String, version: i32, language_id: String) -> Self {
        Self {
            metadata: DocumentMetadata {
                uri,
                language_id,
                version,
            },
            content: Rope::from_str(&content),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.metadata.uri
    }

    pub fn language_id(&self) -> &str {
        &self.metadata.language_id
    }

    pub fn version(&self) -> i32 {
        self.metadata.version
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Number of lines, counting a trailing empty line
    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Full document content
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Line content without its line ending
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        let text = self.content.line(line).to_string();
        Some(text.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Byte offset of an LSP position.
    ///
    /// `character` counts UTF-16 code units. Returns `None` when the line
    /// does not exist or the column runs past the end of the line.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        byte_offset(&self.content, position)
    }

    /// LSP position of a byte offset, clamped to the end of the document
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len_bytes());
        let char_idx = self.content.byte_to_char(offset);
        let line = self.content.char_to_line(char_idx);
        let line_start = self.content.line_to_char(line);
        let character = self.content.char_to_utf16_cu(char_idx)
            - self.content.char_to_utf16_cu(line_start);

        Position::new(line as u32, character as u32)
    }

    /// LSP range of a byte range
    pub fn range_of(&self, range: &ByteRange<usize>) -> Range {
        Range::new(self.position_at(range.start), self.position_at(range.end))
    }

    /// Apply content changes in order.
    ///
    /// A change with a range replaces that range; `range_length` is ignored
    /// because it is deprecated in the protocol. A change without a range
    /// replaces the whole document. If any change in the batch is invalid the
    /// document is left untouched.
    pub fn apply_changes(
        &mut self,
        changes: &[TextDocumentContentChangeEvent],
        new_version: i32,
    ) -> Result<(), DocumentError> {
        let mut content = self.content.clone();
        for change in changes {
            match change.range {
                Some(range) => {
                    let invalid = || DocumentError::InvalidRange {
                        start: range.start,
                        end: range.end,
                    };
                    let start = char_at(&content, range.start).ok_or_else(invalid)?;
                    let end = char_at(&content, range.end).ok_or_else(invalid)?;
                    if start > end {
                        return Err(invalid());
                    }

                    content.remove(start..end);
                    content.insert(start, &change.text);
                }
                None => {
                    content = Rope::from_str(&change.text);
                }
            }
        }

        self.content = content;
        self.metadata.version = new_version;
        Ok(())
    }
}

/// Byte offset of an LSP position in `rope`
///
/// Lines break on `\n`, `\r\n` and `\r` only, matching the protocol.
pub(crate) fn byte_offset(rope: &Rope, position: Position) -> Option<usize> {
    char_at(rope, position).map(|char_idx| rope.char_to_byte(char_idx))
}

/// Char index of an LSP position, `None` past the line's content
fn char_at(rope: &Rope, position: Position) -> Option<usize> {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return None;
    }

    let line_start = rope.line_to_char(line);
    let mut line_end = line_start + rope.line(line).len_chars();
    if line_end > line_start && rope.char(line_end - 1) == '\n' {
        line_end -= 1;
    }
    if line_end > line_start && rope.char(line_end - 1) == '\r' {
        line_end -= 1;
    }

    let start_cu = rope.char_to_utf16_cu(line_start);
    let end_cu = rope.char_to_utf16_cu(line_end);
    let target = start_cu + position.character as usize;
    if target > end_cu {
        return None;
    }
    Some(rope.utf16_cu_to_char(target))
}

/// Thread-safe store of all open documents
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Url, Document>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a document
    pub async fn open_document(
        &self,
        uri: Url,
        content: String,
        version: i32,
        language_id: String,
    ) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;
        let document = Document::new(uri.clone(), content, version, language_id);
        docs.insert(uri, document);
        Ok(())
    }

    /// Returns true if the document was open
    pub async fn close_document(&self, uri: &Url) -> bool {
        let mut docs = self.documents.write().await;
        docs.remove(uri).is_some()
    }

    pub async fn update_document(
        &self,
        identifier: &VersionedTextDocumentIdentifier,
        changes: &[TextDocumentContentChangeEvent],
    ) -> Result<(), DocumentError> {
        let mut docs = self.documents.write().await;
        let document = docs
            .get_mut(&identifier.uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(identifier.uri.clone()))?;

        document.apply_changes(changes, identifier.version)
    }

    pub async fn get_document(&self, uri: &Url) -> Option<Document> {
        let docs = self.documents.read().await;
        docs.get(uri).cloned()
    }

    pub async fn has_document(&self, uri: &Url) -> bool {
        let docs = self.documents.read().await;
        docs.contains_key(uri)
    }

    pub async fn list_uris(&self) -> Vec<Url> {
        let docs = self.documents.read().await;
        docs.keys().cloned().collect()
    }

    pub async fn document_count(&self) -> usize {
        let docs = self.documents.read().await;
        docs.len()
    }
}

/// Document-related errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Url),

    /// Range outside the document or reversed
    #[error("Invalid range: start={start:?}, end={end:?}")]
    InvalidRange { start: Position, end: Position },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_uri() -> Url {
        Url::parse("file:///test.sql").unwrap()
    }

    fn edit(range: Range, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(range),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new(
            create_test_uri(),
            "SELECT 1;\nSELECT 2;".to_string(),
            1,
            "sql".to_string(),
        );

        assert_eq!(doc.version(), 1);
        assert_eq!(doc.language_id(), "sql");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line(1).as_deref(), Some("SELECT 2;"));
        assert_eq!(doc.line(2), None);
    }

    #[test]
    fn test_offset_and_position_ascii() {
        let doc = Document::new(
            create_test_uri(),
            "SELECT 1;\nSELECT 2;".to_string(),
            1,
            "sql".to_string(),
        );

        assert_eq!(doc.offset_at(Position::new(1, 7)), Some(17));
        assert_eq!(doc.position_at(17), Position::new(1, 7));
        assert_eq!(doc.offset_at(Position::new(5, 0)), None);
        assert_eq!(doc.offset_at(Position::new(0, 40)), None);
    }

    #[test]
    fn test_offset_and_position_utf16() {
        // 'é' is 2 bytes / 1 code unit, '😀' is 4 bytes / 2 code units
        let doc = Document::new(
            create_test_uri(),
            "SELECT 'é😀', 1;".to_string(),
            1,
            "sql".to_string(),
        );

        let comma = "SELECT 'é😀'".len();
        assert_eq!(doc.position_at(comma), Position::new(0, 12));
        assert_eq!(doc.offset_at(Position::new(0, 12)), Some(comma));
    }

    #[test]
    fn test_offset_at_stops_before_line_break() {
        let doc = Document::new(create_test_uri(), "SELECT 1;\r\nX".to_string(), 1, "sql".to_string());

        assert_eq!(doc.offset_at(Position::new(0, 9)), Some(9));
        assert_eq!(doc.offset_at(Position::new(0, 10)), None);
        assert_eq!(doc.offset_at(Position::new(0, 11)), None);
        assert_eq!(doc.offset_at(Position::new(1, 1)), Some(12));
    }

    #[test]
    fn test_only_protocol_line_breaks_count() {
        // U+2028, NEL, VT and FF are ordinary characters for LSP clients
        let text = "SELECT 'a\u{2028}b\u{85}c\u{0B}d\u{0C}e';\nSELECT 2;\rSELECT 3;";
        let doc = Document::new(create_test_uri(), text.to_string(), 1, "sql".to_string());

        assert_eq!(doc.line_count(), 3);
        let second = text.find("SELECT 2").unwrap();
        let third = text.find("SELECT 3").unwrap();
        assert_eq!(doc.position_at(second), Position::new(1, 0));
        assert_eq!(doc.position_at(third), Position::new(2, 0));
        assert_eq!(doc.offset_at(Position::new(2, 0)), Some(third));
    }

    #[test]
    fn test_position_at_clamps_to_end() {
        let doc = Document::new(create_test_uri(), "SELECT 1".to_string(), 1, "sql".to_string());
        assert_eq!(doc.position_at(1000), Position::new(0, 8));
    }

    #[test]
    fn test_apply_changes_full() {
        let mut doc = Document::new(create_test_uri(), "old".to_string(), 1, "sql".to_string());
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new content".to_string(),
        }];

        doc.apply_changes(&changes, 2).unwrap();

        assert_eq!(doc.text(), "new content");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_apply_changes_incremental() {
        let mut doc = Document::new(
            create_test_uri(),
            "SELECT * FROM users".to_string(),
            1,
            "sql".to_string(),
        );

        let range = Range::new(Position::new(0, 7), Position::new(0, 8));
        doc.apply_changes(&[edit(range, "id")], 2).unwrap();

        assert_eq!(doc.text(), "SELECT id FROM users");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_apply_changes_across_lines() {
        let mut doc = Document::new(
            create_test_uri(),
            "SELECT 1;\nSELECT 2;\n".to_string(),
            1,
            "sql".to_string(),
        );

        let range = Range::new(Position::new(0, 8), Position::new(1, 8));
        doc.apply_changes(&[edit(range, "")], 2).unwrap();

        assert_eq!(doc.text(), "SELECT 1;\n");
    }

    #[test]
    fn test_apply_changes_invalid_range() {
        let mut doc = Document::new(create_test_uri(), "SELECT *".to_string(), 1, "sql".to_string());

        let range = Range::new(Position::new(0, 0), Position::new(10, 0));
        let result = doc.apply_changes(&[edit(range, "x")], 2);

        assert!(matches!(result, Err(DocumentError::InvalidRange { .. })));
        assert_eq!(doc.text(), "SELECT *");
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_apply_changes_is_all_or_nothing() {
        let mut doc = Document::new(create_test_uri(), "SELECT 1".to_string(), 1, "sql".to_string());

        let changes = vec![
            edit(Range::new(Position::new(0, 7), Position::new(0, 8)), "2"),
            edit(Range::new(Position::new(3, 0), Position::new(3, 0)), "x"),
        ];
        let result = doc.apply_changes(&changes, 2);

        assert!(matches!(result, Err(DocumentError::InvalidRange { .. })));
        assert_eq!(doc.text(), "SELECT 1");
        assert_eq!(doc.version(), 1);
    }

    #[tokio::test]
    async fn test_document_store_open_close() {
        let store = DocumentStore::new();
        let uri = create_test_uri();

        store
            .open_document(uri.clone(), "SELECT 1".to_string(), 1, "sql".to_string())
            .await
            .unwrap();
        assert!(store.has_document(&uri).await);
        assert_eq!(store.document_count().await, 1);

        assert!(store.close_document(&uri).await);
        assert!(!store.has_document(&uri).await);
        assert!(!store.close_document(&uri).await);
    }

    #[tokio::test]
    async fn test_document_store_update() {
        let store = DocumentStore::new();
        let uri = create_test_uri();

        store
            .open_document(uri.clone(), "old".to_string(), 1, "sql".to_string())
            .await
            .unwrap();

        let identifier = VersionedTextDocumentIdentifier {
            uri: uri.clone(),
            version: 2,
        };
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new".to_string(),
        }];
        store.update_document(&identifier, &changes).await.unwrap();

        let doc = store.get_document(&uri).await.unwrap();
        assert_eq!(doc.text(), "new");
        assert_eq!(doc.version(), 2);
    }

    #[tokio::test]
    async fn test_document_store_update_unknown_document() {
        let store = DocumentStore::new();
        let identifier = VersionedTextDocumentIdentifier {
            uri: create_test_uri(),
            version: 2,
        };

        let result = store.update_document(&identifier, &[]).await;
        assert!(matches!(result, Err(DocumentError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_document_store_list_uris() {
        let store = DocumentStore::new();
        let uri1 = Url::parse("file:///test1.sql").unwrap();
        let uri2 = Url::parse("file:///test2.sql").unwrap();

        for uri in [&uri1, &uri2] {
            store
                .open_document(uri.clone(), "SELECT 1".to_string(), 1, "sql".to_string())
                .await
                .unwrap();
        }

        let uris = store.list_uris().await;
        assert_eq!(uris.len(), 2);
        assert!(uris.contains(&uri1));
        assert!(uris.contains(&uri2));
    }
}
