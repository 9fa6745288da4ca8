//! Open documents and source change application.
//!
//! A [`Workspace`] owns the in-memory text of every open document, keyed by the path the
//! analysis service uses for it. Each document remembers:
//! - its LF-normalized text (a `Rope`), which is what edits are applied to
//! - its detected line ending, used to reproduce the on-disk text
//! - a [`LineEndingOffsets`] table for the on-disk text, which converts the service's offsets
//!
//! [`Workspace::apply_source_change`] applies a whole multi-file change and translates the
//! change's caret and linked-edit positions into the edited documents.

use crate::change::{LinkedEditSuggestion, Position, SourceChange, SourceFileEdit};
use crate::error::ChangeError;
use ropey::Rope;
use source_edit::{
    AppliedEdits, EditError, LineEnding, LineEndingOffsets, SourceEdit, apply_edits, normalize,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

/// Opaque identifier for an open document in a [`Workspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Options for [`Workspace::apply_source_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Ids of edits to leave out.
    pub excluded: HashSet<String>,
    /// Restore every touched document if any file fails to apply.
    pub atomic: bool,
    /// Open an empty document for file edits that announce a new file.
    pub create_new_files: bool,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            excluded: HashSet::new(),
            atomic: false,
            create_new_files: true,
        }
    }
}

/// Per-document summary of an applied change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDocument {
    /// Document id.
    pub id: DocumentId,
    /// Document path.
    pub path: String,
    /// Edits supplied for the document.
    pub supplied: usize,
    /// Edits applied (supplied minus excluded).
    pub applied: usize,
    /// Whether the document was created by the change.
    pub created: bool,
}

/// A position translated into a document's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition {
    /// Document id.
    pub document: DocumentId,
    /// Character offset in the document's normalized text.
    pub offset: usize,
}

/// A linked edit group translated into document buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLinkedEditGroup {
    /// One character range per resolvable position.
    pub ranges: Vec<(DocumentId, Range<usize>)>,
    /// Values offered for the group.
    pub suggestions: Vec<LinkedEditSuggestion>,
}

/// Result of [`Workspace::apply_source_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// The change's message.
    pub message: String,
    /// Documents that received a batch, in change order.
    pub documents: Vec<AppliedDocument>,
    /// Where the caret goes, if the change names a resolvable selection.
    pub selection: Option<ResolvedPosition>,
    /// Linked edit groups with at least one resolvable position.
    pub linked_edit_groups: Vec<ResolvedLinkedEditGroup>,
}

impl ChangeOutcome {
    /// Total number of edits applied across all documents.
    pub fn applied_edits(&self) -> usize {
        self.documents.iter().map(|document| document.applied).sum()
    }
}

struct Document {
    path: String,
    text: Rope,
    line_ending: LineEnding,
    offsets: LineEndingOffsets,
    version: u64,
}

impl Document {
    fn from_raw(path: String, raw_text: &str) -> Self {
        Self {
            path,
            text: Rope::from_str(&normalize(raw_text)),
            line_ending: LineEnding::detect_in_text(raw_text),
            offsets: LineEndingOffsets::from_original(raw_text),
            version: 0,
        }
    }

    fn text_for_saving(&self) -> String {
        self.line_ending.apply_to_text(&self.text.to_string())
    }

    fn mark_modified(&mut self) {
        self.offsets = LineEndingOffsets::from_original(&self.text_for_saving());
        self.version = self.version.saturating_add(1);
    }

    fn translate_range(
        &self,
        batch: Option<&AppliedEdits>,
        range: Range<usize>,
    ) -> Result<Range<usize>, EditError> {
        match batch {
            Some(applied) => applied.translate_range(range, &self.offsets),
            None => {
                let start = self.offsets.to_converted(range.start)?;
                let end = self.offsets.to_converted(range.end)?;
                Ok(start..end.max(start))
            }
        }
    }
}

/// All edits a change makes to one file, in change order.
struct FileBatch<'a> {
    path: &'a str,
    creates_file: bool,
    edits: Vec<SourceEdit>,
}

/// Group file edits by path, keeping the first appearance order of each path.
fn merge_file_edits(file_edits: &[SourceFileEdit]) -> Vec<FileBatch<'_>> {
    let mut batches: Vec<FileBatch<'_>> = Vec::with_capacity(file_edits.len());
    let mut index_by_path: HashMap<&str, usize> = HashMap::new();
    for file_edit in file_edits {
        match index_by_path.get(file_edit.file.as_str()) {
            Some(&idx) => {
                let batch = &mut batches[idx];
                batch.creates_file |= file_edit.creates_file();
                batch.edits.extend(file_edit.edits.iter().cloned());
            }
            None => {
                index_by_path.insert(&file_edit.file, batches.len());
                batches.push(FileBatch {
                    path: &file_edit.file,
                    creates_file: file_edit.creates_file(),
                    edits: file_edit.edits.clone(),
                });
            }
        }
    }
    batches
}

/// A collection of open documents.
#[derive(Default)]
pub struct Workspace {
    next_document_id: u64,
    documents: BTreeMap<DocumentId, Document>,
    path_to_document: HashMap<String, DocumentId>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("document_count", &self.documents.len())
            .field("next_document_id", &self.next_document_id)
            .finish()
    }
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Open a document from its on-disk text (any line ending).
    pub fn open_document(
        &mut self,
        path: impl Into<String>,
        raw_text: &str,
    ) -> Result<DocumentId, ChangeError> {
        let path = path.into();
        if self.path_to_document.contains_key(&path) {
            return Err(ChangeError::PathAlreadyOpen(path));
        }

        let id = DocumentId(self.next_document_id);
        self.next_document_id = self.next_document_id.saturating_add(1);
        tracing::debug!(path = %path, id = id.get(), "opening document");
        self.path_to_document.insert(path.clone(), id);
        self.documents.insert(id, Document::from_raw(path, raw_text));
        Ok(id)
    }

    /// Close a document.
    pub fn close_document(&mut self, id: DocumentId) -> Result<(), ChangeError> {
        let document = self
            .documents
            .remove(&id)
            .ok_or(ChangeError::DocumentNotFound(id))?;
        self.path_to_document.remove(&document.path);
        Ok(())
    }

    /// Find the document open for `path`.
    pub fn document_id_for_path(&self, path: &str) -> Option<DocumentId> {
        self.path_to_document.get(path).copied()
    }

    fn document(&self, id: DocumentId) -> Result<&Document, ChangeError> {
        self.documents
            .get(&id)
            .ok_or(ChangeError::DocumentNotFound(id))
    }

    /// Path of a document.
    pub fn document_path(&self, id: DocumentId) -> Result<&str, ChangeError> {
        Ok(&self.document(id)?.path)
    }

    /// LF-normalized text of a document.
    pub fn document_text(&self, id: DocumentId) -> Result<String, ChangeError> {
        Ok(self.document(id)?.text.to_string())
    }

    /// Text of a document in its detected line ending.
    pub fn document_text_for_saving(&self, id: DocumentId) -> Result<String, ChangeError> {
        Ok(self.document(id)?.text_for_saving())
    }

    /// Detected line ending of a document.
    pub fn document_line_ending(&self, id: DocumentId) -> Result<LineEnding, ChangeError> {
        Ok(self.document(id)?.line_ending)
    }

    /// Offset table converting the document's on-disk offsets to normalized offsets.
    pub fn document_offsets(&self, id: DocumentId) -> Result<&LineEndingOffsets, ChangeError> {
        Ok(&self.document(id)?.offsets)
    }

    /// Number of changes applied to a document since it was opened.
    pub fn document_version(&self, id: DocumentId) -> Option<u64> {
        self.documents.get(&id).map(|document| document.version)
    }

    /// Apply a multi-file source change.
    ///
    /// - Every file edit is resolved to an open document before anything is mutated; a file that
    ///   is not open fails the change with [`ChangeError::MissingFile`], unless it is announced as
    ///   new and `options.create_new_files` is set, in which case an empty document is opened.
    /// - Each file's batch goes through [`source_edit::apply_edits`] with the document's offset
    ///   table as converter. Several file edits for the same path are merged into one batch, in
    ///   change order.
    /// - On an engine error the affected path is reported. With `options.atomic` every touched
    ///   document is restored first; otherwise documents keep the edits applied so far.
    /// - The selection and linked edit positions are translated once all batches are applied.
    ///   Positions that cannot be resolved are dropped.
    pub fn apply_source_change(
        &mut self,
        change: &SourceChange,
        options: &ChangeOptions,
    ) -> Result<ChangeOutcome, ChangeError> {
        tracing::info!(
            message = %change.message,
            files = change.edits.len(),
            edits = change.edit_count(),
            "applying source change"
        );

        let file_batches = merge_file_edits(&change.edits);
        if file_batches.len() < change.edits.len() {
            tracing::debug!(
                files = file_batches.len(),
                file_edits = change.edits.len(),
                "merged file edits targeting the same path"
            );
        }

        for file_batch in &file_batches {
            let creatable = file_batch.creates_file && options.create_new_files;
            if self.document_id_for_path(file_batch.path).is_none() && !creatable {
                tracing::warn!(path = %file_batch.path, "source change targets a file that is not open");
                return Err(ChangeError::MissingFile(file_batch.path.to_string()));
            }
        }

        let mut targets = Vec::with_capacity(file_batches.len());
        let mut snapshots: BTreeMap<DocumentId, Rope> = BTreeMap::new();
        for file_batch in &file_batches {
            let (id, created) = match self.document_id_for_path(file_batch.path) {
                Some(id) => (id, false),
                None => (self.open_document(file_batch.path, "")?, true),
            };
            let document = self.document(id)?;
            snapshots.insert(id, document.text.clone());
            targets.push((id, created));
        }

        let mut documents = Vec::with_capacity(targets.len());
        let mut batches: HashMap<DocumentId, AppliedEdits> = HashMap::new();
        for (file_batch, &(id, created)) in file_batches.iter().zip(&targets) {
            let document = self
                .documents
                .get_mut(&id)
                .ok_or(ChangeError::DocumentNotFound(id))?;

            match apply_edits(
                &mut document.text,
                &file_batch.edits,
                &options.excluded,
                &document.offsets,
            ) {
                Ok(applied) => {
                    if applied.is_empty() && !file_batch.edits.is_empty() {
                        tracing::debug!(path = %document.path, "every edit of the file was excluded");
                    }
                    documents.push(AppliedDocument {
                        id,
                        path: document.path.clone(),
                        supplied: file_batch.edits.len(),
                        applied: applied.len(),
                        created,
                    });
                    batches.insert(id, applied);
                }
                Err(source) => {
                    let path = document.path.clone();
                    tracing::warn!(path = %path, error = %source, "failed to apply source change");
                    if options.atomic {
                        self.restore(snapshots, &targets);
                    } else {
                        self.finish(&snapshots);
                    }
                    return Err(ChangeError::Edit { path, source });
                }
            }
        }

        let selection = change
            .selection
            .as_ref()
            .and_then(|position| self.resolve_position(position, &batches));

        let linked_edit_groups = change
            .linked_edit_groups
            .iter()
            .filter_map(|group| {
                let ranges: Vec<_> = group
                    .positions
                    .iter()
                    .filter_map(|position| self.resolve_range(position, group.length, &batches))
                    .collect();
                (!ranges.is_empty()).then(|| ResolvedLinkedEditGroup {
                    ranges,
                    suggestions: group.suggestions.clone(),
                })
            })
            .collect();

        self.finish(&snapshots);

        let outcome = ChangeOutcome {
            message: change.message.clone(),
            documents,
            selection,
            linked_edit_groups,
        };
        tracing::info!(
            documents = outcome.documents.len(),
            applied = outcome.applied_edits(),
            "source change applied"
        );
        Ok(outcome)
    }

    fn resolve_range(
        &self,
        position: &Position,
        length: usize,
        batches: &HashMap<DocumentId, AppliedEdits>,
    ) -> Option<(DocumentId, Range<usize>)> {
        let Some(id) = self.document_id_for_path(&position.file) else {
            tracing::warn!(path = %position.file, "dropping position in a file that is not open");
            return None;
        };
        let document = self.documents.get(&id)?;
        let range = position.offset..position.offset.saturating_add(length);
        match document.translate_range(batches.get(&id), range) {
            Ok(range) => Some((id, range)),
            Err(err) => {
                tracing::warn!(
                    path = %position.file,
                    offset = position.offset,
                    error = %err,
                    "dropping untranslatable position"
                );
                None
            }
        }
    }

    fn resolve_position(
        &self,
        position: &Position,
        batches: &HashMap<DocumentId, AppliedEdits>,
    ) -> Option<ResolvedPosition> {
        self.resolve_range(position, 0, batches)
            .map(|(document, range)| ResolvedPosition {
                document,
                offset: range.start,
            })
    }

    /// Refresh every document whose text differs from its snapshot.
    fn finish(&mut self, snapshots: &BTreeMap<DocumentId, Rope>) {
        for (id, snapshot) in snapshots {
            if let Some(document) = self.documents.get_mut(id)
                && document.text != *snapshot
            {
                document.mark_modified();
            }
        }
    }

    /// Put every snapshot back and close documents the change created.
    fn restore(&mut self, snapshots: BTreeMap<DocumentId, Rope>, targets: &[(DocumentId, bool)]) {
        for (id, snapshot) in snapshots {
            if let Some(document) = self.documents.get_mut(&id) {
                document.text = snapshot;
            }
        }
        for &(id, created) in targets {
            if created && let Some(document) = self.documents.remove(&id) {
                self.path_to_document.remove(&document.path);
            }
        }
    }
}
