//! The editing session: the single owner of the current value.
//!
//! ## Learning: Candidate, Check, Commit
//!
//! A change never touches the current value directly:
//!
//! ```text
//! current ──clone──▶ candidate ──edit──▶ normalize ──gate──▶ accepted? ──▶ current
//!                                                      │
//!                                                      └──▶ rejected: dropped
//! ```
//!
//! Because the candidate is a separate value, a rejected or failed edit
//! needs no rollback; it is simply dropped.

use inkpad_doc::{BlockKind, DocResult, EditKind, History, Mark, Selection, Value};
use tokio::sync::broadcast;

use crate::command::{self, Command};
use crate::config::{Config, ImageConfig};
use crate::event::{EventBus, SessionEvent};
use crate::gate;
use crate::image::{self, Intake, Transfer};
use crate::persistence::PersistenceController;
use crate::store::Store;
use crate::CoreResult;

/// What happened to a proposed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The change was accepted and is now the current value
    Applied,
    /// The gate turned the change away
    Rejected { proposed: usize, ceiling: usize },
    /// The change produced no difference, or could not be applied
    Unchanged,
}

impl ChangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ChangeOutcome::Applied)
    }
}

/// An editing session.
pub struct Session {
    value: Value,
    ceiling: usize,
    /// Last text typed into the ceiling input
    ceiling_input: String,
    persistence: PersistenceController,
    history: History,
    images: ImageConfig,
    events: EventBus,
    modified: bool,
}

impl Session {
    /// Opens a session on `store`, restoring the last snapshot.
    pub fn open(store: Box<dyn Store>, config: &Config) -> Self {
        let persistence = PersistenceController::new(store, config.storage.key.clone());
        let value = persistence.restore();
        let ceiling = config.gate.ceiling;
        tracing::info!(
            "Opened session: {} top-level nodes, ceiling {}",
            value.top_level_node_count(),
            ceiling
        );

        Self {
            value,
            ceiling,
            ceiling_input: ceiling.to_string(),
            persistence,
            history: History::new(config.editor.undo_limit),
            images: config.images.clone(),
            events: EventBus::new(),
            modified: false,
        }
    }

    // ==================== State ====================

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn ceiling_input(&self) -> &str {
        &self.ceiling_input
    }

    /// True after any change attempt since the last save or cancel.
    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn image_config(&self) -> &ImageConfig {
        &self.images
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ==================== Queries ====================

    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.value.has_mark(mark)
    }

    pub fn has_block(&self, kind: &BlockKind) -> bool {
        self.value.has_block(kind)
    }

    /// Whether the toolbar button for `kind` shows as active.
    pub fn is_block_active(&self, kind: &BlockKind) -> bool {
        command::is_block_active(&self.value, kind)
    }

    // ==================== Changes ====================

    /// Proposes a change made by `edit` on a copy of the current value.
    ///
    /// The copy is normalized and checked against the ceiling. Only an
    /// accepted copy replaces the current value. A change that alters the
    /// document is recorded in history.
    pub fn change<F>(&mut self, kind: EditKind, edit: F) -> ChangeOutcome
    where
        F: FnOnce(&mut Value) -> DocResult<()>,
    {
        self.modified = true;

        let mut candidate = self.value.clone();
        if let Err(e) = edit(&mut candidate) {
            tracing::warn!("Edit failed: {}", e);
            return ChangeOutcome::Unchanged;
        }
        candidate.normalize();

        if candidate == self.value {
            return ChangeOutcome::Unchanged;
        }

        if let Some(outcome) = self.reject(&candidate) {
            return outcome;
        }

        let previous = std::mem::replace(&mut self.value, candidate);
        if previous.document() != self.value.document() {
            self.history.push(previous, kind);
        }
        self.events.emit(SessionEvent::Changed);
        ChangeOutcome::Applied
    }

    /// Returns the rejection outcome if the gate turns `candidate` away.
    fn reject(&self, candidate: &Value) -> Option<ChangeOutcome> {
        let verdict = gate::evaluate(candidate, self.ceiling);
        if verdict.accepted {
            return None;
        }
        tracing::debug!(
            "Rejected change: {} top-level nodes over ceiling {}",
            verdict.proposed,
            verdict.ceiling
        );
        self.events.emit(SessionEvent::Rejected {
            proposed: verdict.proposed,
            ceiling: verdict.ceiling,
        });
        Some(ChangeOutcome::Rejected {
            proposed: verdict.proposed,
            ceiling: verdict.ceiling,
        })
    }

    /// Moves the selection.
    pub fn select(&mut self, selection: Selection) -> ChangeOutcome {
        self.change(EditKind::Other, |value| value.select(selection))
    }

    /// Inserts an image at `target`, or at the current selection.
    ///
    /// A target captured before an async read may no longer exist once the
    /// read finishes; the current selection is used instead.
    pub fn insert_image(&mut self, src: impl Into<String>, target: Option<Selection>) -> ChangeOutcome {
        let src = src.into();
        tracing::debug!("Inserting image ({} bytes of src)", src.len());
        let target = target.filter(|target| {
            let valid = self.value.check_point(target.anchor).is_ok()
                && self.value.check_point(target.focus).is_ok();
            if !valid {
                tracing::debug!("Image target {:?} is gone, using the selection", target);
            }
            valid
        });
        self.change(EditKind::Other, |value| value.insert_image(src, target))
    }

    /// Handles the text of the image URL prompt. Empty input does nothing.
    pub fn submit_image_url(&mut self, input: Option<&str>) -> ChangeOutcome {
        match input.map(str::trim) {
            Some(url) if !url.is_empty() => self.insert_image(url, None),
            _ => ChangeOutcome::Unchanged,
        }
    }

    /// Handles a paste. Image files are returned for the caller to read;
    /// image URLs are inserted; other text is typed in.
    pub fn paste(&mut self, transfer: Transfer) -> (ChangeOutcome, Vec<std::path::PathBuf>) {
        match image::classify(transfer, &self.images.extensions) {
            Intake::ReadFiles(files) => (ChangeOutcome::Unchanged, files),
            Intake::InsertUrl(url) => (self.insert_image(url, None), Vec::new()),
            Intake::PassThrough(Transfer::Text(text)) => (
                self.change(EditKind::Other, |value| value.insert_text(&text)),
                Vec::new(),
            ),
            Intake::PassThrough(Transfer::Files(_)) => (ChangeOutcome::Unchanged, Vec::new()),
        }
    }

    /// Handles a drop at `target`. Without a target the drop is ignored.
    /// Image files are returned for the caller to read and then insert at
    /// the same target.
    pub fn drop_transfer(
        &mut self,
        transfer: Transfer,
        target: Option<Selection>,
    ) -> (ChangeOutcome, Vec<std::path::PathBuf>) {
        let Some(target) = target else {
            return (ChangeOutcome::Unchanged, Vec::new());
        };
        match image::classify(transfer, &self.images.extensions) {
            Intake::ReadFiles(files) => (ChangeOutcome::Unchanged, files),
            Intake::InsertUrl(url) => (self.insert_image(url, Some(target)), Vec::new()),
            Intake::PassThrough(_) => (ChangeOutcome::Unchanged, Vec::new()),
        }
    }

    /// Reports a file that could not be inserted.
    pub fn skip_image(&self, name: impl Into<String>, reason: impl Into<String>) {
        let (name, reason) = (name.into(), reason.into());
        tracing::warn!("Skipping image {}: {}", name, reason);
        self.events.emit(SessionEvent::ImageSkipped { name, reason });
    }

    // ==================== Ceiling ====================

    /// Updates the ceiling from the text of the ceiling input.
    ///
    /// Returns the new ceiling, or `None` if the text was not a
    /// non-negative integer and the ceiling was left alone.
    pub fn set_ceiling_input(&mut self, input: &str) -> Option<usize> {
        self.ceiling_input = input.to_string();
        let ceiling = gate::parse_ceiling(input)?;
        self.set_ceiling(ceiling);
        Some(ceiling)
    }

    pub fn set_ceiling(&mut self, ceiling: usize) {
        if ceiling != self.ceiling {
            tracing::debug!("Ceiling {} -> {}", self.ceiling, ceiling);
            self.ceiling = ceiling;
            self.events.emit(SessionEvent::CeilingChanged(ceiling));
        }
    }

    // ==================== Persistence ====================

    /// Saves the current document. Failures are logged and reported as an
    /// event; the session carries on.
    pub fn save(&mut self) -> CoreResult<()> {
        match self.persistence.save(&self.value) {
            Ok(()) => {
                self.modified = false;
                self.events.emit(SessionEvent::Saved);
                Ok(())
            }
            Err(e) => {
                self.events.emit(SessionEvent::SaveFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Discards unsaved edits and restores the last snapshot. Not gated.
    pub fn cancel(&mut self) {
        let current = std::mem::take(&mut self.value);
        self.value = self.persistence.cancel(current);
        self.history.clear();
        self.modified = false;
        tracing::info!("Cancelled edits, restored last snapshot");
        self.events.emit(SessionEvent::Cancelled);
    }

    // ==================== History ====================

    /// Steps back one change, if the restored value passes the gate.
    pub fn undo(&mut self) -> ChangeOutcome {
        let Some(previous) = self.history.peek_undo() else {
            return ChangeOutcome::Unchanged;
        };
        self.modified = true;
        if let Some(outcome) = self.reject(previous) {
            return outcome;
        }

        let current = self.value.clone();
        if let Some(previous) = self.history.commit_undo(current) {
            self.value = previous;
        }
        self.events.emit(SessionEvent::HistoryMoved);
        ChangeOutcome::Applied
    }

    /// Re-applies an undone change, if it passes the gate.
    pub fn redo(&mut self) -> ChangeOutcome {
        let Some(next) = self.history.peek_redo() else {
            return ChangeOutcome::Unchanged;
        };
        self.modified = true;
        if let Some(outcome) = self.reject(next) {
            return outcome;
        }

        let current = self.value.clone();
        if let Some(next) = self.history.commit_redo(current) {
            self.value = next;
        }
        self.events.emit(SessionEvent::HistoryMoved);
        ChangeOutcome::Applied
    }

    // ==================== Commands ====================

    /// Runs a command.
    ///
    /// `PromptImage` and `BrowseImage` need user input and are handled by the
    /// UI, which comes back with `InsertImage`.
    pub fn execute(&mut self, command: Command) -> ChangeOutcome {
        tracing::trace!("Executing {}", command.display_name());
        match command {
            Command::Save => {
                // Errors are already logged and emitted
                let _ = self.save();
                ChangeOutcome::Unchanged
            }
            Command::Cancel => {
                self.cancel();
                ChangeOutcome::Applied
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::SetCeiling(input) => {
                self.set_ceiling_input(&input);
                ChangeOutcome::Unchanged
            }
            Command::PromptImage | Command::BrowseImage => ChangeOutcome::Unchanged,
            command => match command.edit_kind() {
                Some(kind) => self.change(kind, |value| command.apply(value)),
                None => ChangeOutcome::Unchanged,
            },
        }
    }
}
