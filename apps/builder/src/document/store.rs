//! Document Store — owns the single [`DocumentModel`] and is its only writer.
//!
//! Every mutation goes through one entry point per field or section. A
//! successful mutation yields a [`ChangeEvent`] that is delivered synchronously
//! to every subscribed [`DocumentObserver`] (the live preview and the
//! persistence coordinator in a running session) before the call returns.
//! A rejected mutation leaves the model untouched and notifies no one.

use serde::Serialize;
use tracing::debug;

use crate::document::collections::{editor_for, EditorSurface, SectionKind};
use crate::document::model::{AnalysisResults, DocumentModel, ScalarField};
use crate::document::EditError;

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    Field { field: ScalarField },
    Skills,
    EntryAdded { section: SectionKind, index: usize },
    EntryUpdated { section: SectionKind, index: usize, field: String },
    EntryRemoved { section: SectionKind, index: usize },
    Analysis,
}

/// How the editing surface has to follow the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "section", rename_all = "snake_case")]
pub enum SurfaceUpdate {
    /// Inputs already show the new value; nothing to rebuild.
    InPlace,
    /// Row indices shifted or grew: the section's editor must be rebuilt.
    Rebuild(SectionKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    #[serde(flatten)]
    pub kind: ChangeKind,
    pub surface: SurfaceUpdate,
}

impl ChangeEvent {
    fn in_place(kind: ChangeKind) -> Self {
        Self {
            kind,
            surface: SurfaceUpdate::InPlace,
        }
    }

    fn rebuild(kind: ChangeKind, section: SectionKind) -> Self {
        Self {
            kind,
            surface: SurfaceUpdate::Rebuild(section),
        }
    }
}

/// Subscriber notified after every applied mutation.
pub trait DocumentObserver: Send {
    fn on_change(&mut self, model: &DocumentModel, event: &ChangeEvent);
}

pub struct DocumentStore {
    model: DocumentModel,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl DocumentStore {
    pub fn new(model: DocumentModel) -> Self {
        Self {
            model,
            observers: Vec::new(),
        }
    }

    /// Observers are called in subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn DocumentObserver>) {
        self.observers.push(observer);
    }

    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn surface(&self, section: SectionKind) -> EditorSurface {
        editor_for(section).surface(&self.model)
    }

    pub fn set_field(&mut self, field: ScalarField, value: &str) -> ChangeEvent {
        self.model.set_scalar(field, value);
        self.commit(ChangeEvent::in_place(ChangeKind::Field { field }))
    }

    /// Replaces skills from the raw delimited input.
    pub fn set_skills(&mut self, input: &str) -> ChangeEvent {
        self.model.set_skills_input(input);
        self.commit(ChangeEvent::in_place(ChangeKind::Skills))
    }

    pub fn add_entry(&mut self, section: SectionKind) -> ChangeEvent {
        let index = editor_for(section).add(&mut self.model);
        self.commit(ChangeEvent::rebuild(
            ChangeKind::EntryAdded { section, index },
            section,
        ))
    }

    pub fn update_entry(
        &mut self,
        section: SectionKind,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<ChangeEvent, EditError> {
        editor_for(section).update_field(&mut self.model, index, field, value)?;
        Ok(self.commit(ChangeEvent::in_place(ChangeKind::EntryUpdated {
            section,
            index,
            field: field.to_string(),
        })))
    }

    pub fn remove_entry(
        &mut self,
        section: SectionKind,
        index: usize,
    ) -> Result<ChangeEvent, EditError> {
        editor_for(section).remove(&mut self.model, index)?;
        Ok(self.commit(ChangeEvent::rebuild(
            ChangeKind::EntryRemoved { section, index },
            section,
        )))
    }

    /// Applies the analysis collaborator's output: the summary is overwritten
    /// and the keyword / verb suggestions are attached.
    pub fn apply_analysis(&mut self, summary: String, results: AnalysisResults) -> ChangeEvent {
        self.model.summary = (!summary.is_empty()).then_some(summary);
        self.model.analysis_results = Some(results);
        self.commit(ChangeEvent::in_place(ChangeKind::Analysis))
    }

    fn commit(&mut self, event: ChangeEvent) -> ChangeEvent {
        debug!(?event, observers = self.observers.len(), "document changed");
        for observer in self.observers.iter_mut() {
            observer.on_change(&self.model, &event);
        }
        event
    }
}
