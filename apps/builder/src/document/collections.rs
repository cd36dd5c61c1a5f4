//! Collection Editors — generic add / update / remove over one repeated-entry
//! section of the [`DocumentModel`].
//!
//! One editor per section, parameterized by the section's field descriptors,
//! an accessor into the model and a default-record template. Indices handed
//! out are always `0..len` contiguous: records are appended at the end and
//! removal shifts every later record down by one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::model::{
    CertificationEntry, DocumentModel, EducationEntry, ExperienceEntry, ProjectEntry,
};
use crate::document::EditError;

// ────────────────────────────────────────────────────────────────────────────
// Section descriptors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Projects,
    Certifications,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    pub fn descriptor(&self) -> &'static SectionDescriptor {
        match self {
            SectionKind::Experience => &EXPERIENCE,
            SectionKind::Education => &EDUCATION,
            SectionKind::Projects => &PROJECTS,
            SectionKind::Certifications => &CERTIFICATIONS,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EditError::UnknownSection(s.to_string()))
    }
}

/// One input of a section editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Placeholder / label shown on the empty input.
    pub label: &'static str,
    pub multiline: bool,
}

impl FieldDescriptor {
    const fn line(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            multiline: false,
        }
    }

    const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            multiline: true,
        }
    }
}

#[derive(Debug)]
pub struct SectionDescriptor {
    pub kind: SectionKind,
    pub fields: &'static [FieldDescriptor],
}

impl SectionDescriptor {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

static EXPERIENCE: SectionDescriptor = SectionDescriptor {
    kind: SectionKind::Experience,
    fields: &[
        FieldDescriptor::line("role", "Role"),
        FieldDescriptor::line("company", "Company"),
        FieldDescriptor::line("period", "Period"),
        FieldDescriptor::text("details", "Details..."),
    ],
};

static EDUCATION: SectionDescriptor = SectionDescriptor {
    kind: SectionKind::Education,
    fields: &[
        FieldDescriptor::line("degree", "Degree"),
        FieldDescriptor::line("school", "School"),
        FieldDescriptor::line("period", "Period"),
    ],
};

static PROJECTS: SectionDescriptor = SectionDescriptor {
    kind: SectionKind::Projects,
    fields: &[
        FieldDescriptor::line("title", "Project Title"),
        FieldDescriptor::line("period", "Period"),
        FieldDescriptor::line("technologies", "Technologies"),
        FieldDescriptor::text("description", "Description..."),
    ],
};

static CERTIFICATIONS: SectionDescriptor = SectionDescriptor {
    kind: SectionKind::Certifications,
    fields: &[
        FieldDescriptor::line("name", "Certification"),
        FieldDescriptor::line("issuer", "Issuer"),
        FieldDescriptor::line("date", "Date"),
    ],
};

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// A repeated-entry record whose fields are addressable by name.
pub trait SectionRecord: Clone + Default + Send + Sync + 'static {
    fn field(&self, name: &str) -> Option<&str>;
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;
}

impl SectionRecord for ExperienceEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "role" => Some(&self.role),
            "company" => Some(&self.company),
            "period" => Some(&self.period),
            "details" => Some(&self.details),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "role" => Some(&mut self.role),
            "company" => Some(&mut self.company),
            "period" => Some(&mut self.period),
            "details" => Some(&mut self.details),
            _ => None,
        }
    }
}

impl SectionRecord for EducationEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "degree" => Some(&self.degree),
            "school" => Some(&self.school),
            "period" => Some(&self.period),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "degree" => Some(&mut self.degree),
            "school" => Some(&mut self.school),
            "period" => Some(&mut self.period),
            _ => None,
        }
    }
}

impl SectionRecord for ProjectEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "period" => Some(&self.period),
            "technologies" => Some(&self.technologies),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "period" => Some(&mut self.period),
            "technologies" => Some(&mut self.technologies),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl SectionRecord for CertificationEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "issuer" => Some(&self.issuer),
            "date" => Some(&self.date),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "issuer" => Some(&mut self.issuer),
            "date" => Some(&mut self.date),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editor surface (what the UI must show for a section)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorInput {
    pub field: &'static str,
    pub label: &'static str,
    pub multiline: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorRow {
    /// Index the row's inputs and delete button are bound to.
    pub index: usize,
    pub inputs: Vec<EditorInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSurface {
    pub section: SectionKind,
    pub rows: Vec<EditorRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Editors
// ────────────────────────────────────────────────────────────────────────────

/// Object-safe view of a [`CollectionEditor`], so callers can dispatch on a
/// [`SectionKind`] without knowing the record type.
pub trait SectionEditor: Send + Sync {
    /// Appends a copy of the template; returns the new record's index.
    fn add(&self, model: &mut DocumentModel) -> usize;
    fn update_field(
        &self,
        model: &mut DocumentModel,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), EditError>;
    fn remove(&self, model: &mut DocumentModel, index: usize) -> Result<(), EditError>;
    fn surface(&self, model: &DocumentModel) -> EditorSurface;
}

pub struct CollectionEditor<R: SectionRecord> {
    descriptor: &'static SectionDescriptor,
    records: fn(&DocumentModel) -> &Vec<R>,
    records_mut: fn(&mut DocumentModel) -> &mut Vec<R>,
    template: R,
}

impl<R: SectionRecord> CollectionEditor<R> {
    pub fn new(
        descriptor: &'static SectionDescriptor,
        records: fn(&DocumentModel) -> &Vec<R>,
        records_mut: fn(&mut DocumentModel) -> &mut Vec<R>,
        template: R,
    ) -> Self {
        Self {
            descriptor,
            records,
            records_mut,
            template,
        }
    }

    fn check_index(&self, len: usize, index: usize) -> Result<(), EditError> {
        if index < len {
            Ok(())
        } else {
            Err(EditError::IndexOutOfBounds {
                section: self.descriptor.kind,
                index,
                len,
            })
        }
    }
}

impl<R: SectionRecord> SectionEditor for CollectionEditor<R> {
    fn add(&self, model: &mut DocumentModel) -> usize {
        let records = (self.records_mut)(model);
        records.push(self.template.clone());
        records.len() - 1
    }

    fn update_field(
        &self,
        model: &mut DocumentModel,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), EditError> {
        if !self.descriptor.has_field(field) {
            return Err(EditError::UnknownSectionField {
                section: self.descriptor.kind,
                field: field.to_string(),
            });
        }
        let records = (self.records_mut)(model);
        self.check_index(records.len(), index)?;
        let slot = records[index]
            .field_mut(field)
            .ok_or_else(|| EditError::UnknownSectionField {
                section: self.descriptor.kind,
                field: field.to_string(),
            })?;
        *slot = value.to_string();
        Ok(())
    }

    fn remove(&self, model: &mut DocumentModel, index: usize) -> Result<(), EditError> {
        let records = (self.records_mut)(model);
        self.check_index(records.len(), index)?;
        records.remove(index);
        Ok(())
    }

    fn surface(&self, model: &DocumentModel) -> EditorSurface {
        let rows = (self.records)(model)
            .iter()
            .enumerate()
            .map(|(index, record)| EditorRow {
                index,
                inputs: self
                    .descriptor
                    .fields
                    .iter()
                    .map(|f| EditorInput {
                        field: f.name,
                        label: f.label,
                        multiline: f.multiline,
                        value: record.field(f.name).unwrap_or_default().to_string(),
                    })
                    .collect(),
            })
            .collect();
        EditorSurface {
            section: self.descriptor.kind,
            rows,
        }
    }
}

/// Returns the editor bound to `kind`.
pub fn editor_for(kind: SectionKind) -> Box<dyn SectionEditor> {
    match kind {
        SectionKind::Experience => Box::new(CollectionEditor::new(
            kind.descriptor(),
            |m| &m.experience,
            |m| &mut m.experience,
            ExperienceEntry::default(),
        )),
        SectionKind::Education => Box::new(CollectionEditor::new(
            kind.descriptor(),
            |m| &m.education,
            |m| &mut m.education,
            EducationEntry::default(),
        )),
        SectionKind::Projects => Box::new(CollectionEditor::new(
            kind.descriptor(),
            |m| &m.projects,
            |m| &mut m.projects,
            ProjectEntry::default(),
        )),
        SectionKind::Certifications => Box::new(CollectionEditor::new(
            kind.descriptor(),
            |m| &m.certifications,
            |m| &mut m.certifications,
            CertificationEntry::default(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn experience(role: &str) -> ExperienceEntry {
        ExperienceEntry {
            role: role.to_string(),
            ..Default::default()
        }
    }

    fn model_with_experience(roles: &[&str]) -> DocumentModel {
        DocumentModel {
            experience: roles.iter().map(|r| experience(r)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_appends_template_at_last_index() {
        let mut model = model_with_experience(&["E0"]);
        let editor = editor_for(SectionKind::Experience);
        let index = editor.add(&mut model);
        assert_eq!(index, 1);
        assert_eq!(model.experience[1], ExperienceEntry::default());
    }

    #[test]
    fn test_update_field_overwrites_only_that_record() {
        let mut model = model_with_experience(&["E0", "E1"]);
        let editor = editor_for(SectionKind::Experience);
        editor
            .update_field(&mut model, 1, "company", "Acme")
            .unwrap();
        assert_eq!(model.experience[1].company, "Acme");
        assert_eq!(model.experience[0].company, "");
    }

    #[test]
    fn test_update_field_out_of_bounds_is_rejected() {
        let mut model = model_with_experience(&["E0"]);
        let before = model.clone();
        let err = editor_for(SectionKind::Experience)
            .update_field(&mut model, 1, "role", "x")
            .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfBounds {
                section: SectionKind::Experience,
                index: 1,
                len: 1
            }
        );
        assert_eq!(model, before);
    }

    #[test]
    fn test_update_unknown_field_is_rejected() {
        let mut model = model_with_experience(&["E0"]);
        let err = editor_for(SectionKind::Experience)
            .update_field(&mut model, 0, "degree", "x")
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownSectionField { .. }));
    }

    #[test]
    fn test_remove_middle_shifts_later_records_down() {
        let mut model = model_with_experience(&["E0", "E1", "E2"]);
        let editor = editor_for(SectionKind::Experience);
        editor.remove(&mut model, 1).unwrap();
        assert_eq!(model.experience, vec![experience("E0"), experience("E2")]);
        // E2 is now addressable at index 1
        editor.update_field(&mut model, 1, "period", "2020").unwrap();
        assert_eq!(model.experience[1].role, "E2");
        assert_eq!(model.experience[1].period, "2020");
    }

    #[test]
    fn test_remove_out_of_bounds_is_rejected() {
        let mut model = DocumentModel::default();
        assert!(editor_for(SectionKind::Education).remove(&mut model, 0).is_err());
    }

    #[test]
    fn test_mixed_operation_sequence_keeps_indices_contiguous() {
        let mut model = DocumentModel::default();
        let editor = editor_for(SectionKind::Projects);
        for i in 0..5 {
            let index = editor.add(&mut model);
            editor
                .update_field(&mut model, index, "title", &format!("P{i}"))
                .unwrap();
        }
        editor.remove(&mut model, 0).unwrap();
        editor.remove(&mut model, 2).unwrap();
        editor.update_field(&mut model, 1, "title", "P2-renamed").unwrap();

        let titles: Vec<_> = model.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["P1", "P2-renamed", "P4"]);

        let surface = editor.surface(&model);
        let indices: Vec<_> = surface.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_surface_describes_inputs_in_field_order() {
        let model = DocumentModel::builtin();
        let surface = editor_for(SectionKind::Experience).surface(&model);
        assert_eq!(surface.rows.len(), 2);
        let fields: Vec<_> = surface.rows[0].inputs.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["role", "company", "period", "details"]);
        assert!(surface.rows[0].inputs[3].multiline);
        assert_eq!(surface.rows[0].inputs[0].value, "Senior Frontend Developer");
    }

    #[test]
    fn test_every_descriptor_field_is_addressable() {
        let mut model = DocumentModel::default();
        for kind in SectionKind::ALL {
            let editor = editor_for(kind);
            let index = editor.add(&mut model);
            for field in kind.descriptor().fields {
                editor
                    .update_field(&mut model, index, field.name, "v")
                    .unwrap();
            }
            assert_eq!(editor.surface(&model).rows.len(), 1);
        }
    }

    #[test]
    fn test_section_kind_from_str() {
        assert_eq!("projects".parse::<SectionKind>(), Ok(SectionKind::Projects));
        assert!("awards".parse::<SectionKind>().is_err());
    }
}
