//! Projection Renderer — pure mapping from [`DocumentModel`] to a renderable
//! document tree (header + ordered section blocks).
//!
//! Rules:
//! - The header always carries name and title ("" when unset) and a contact line
//!   that joins location / email / phone / website, skipping blank ones.
//! - A section contributes a block only when its data is non-empty.
//! - Record fields fall back to "", never to the editor's placeholder text.
//!
//! Calling [`project`] twice on the same model yields equal trees.

pub mod html;
pub mod preview;

use serde::Serialize;

use crate::document::model::DocumentModel;

pub use preview::LivePreview;

/// Separator for the contact line and the inline skills list.
pub const SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Presentation class of the container (`theme-<name>`); never affects content.
    pub theme_class: String,
    pub header: HeaderBlock,
    pub sections: Vec<SectionBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub title: String,
    pub contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

impl BlockKind {
    pub fn heading(&self) -> &'static str {
        match self {
            BlockKind::Summary => "SUMMARY",
            BlockKind::Skills => "SKILLS",
            BlockKind::Experience => "EXPERIENCE",
            BlockKind::Education => "EDUCATION",
            BlockKind::Projects => "PROJECTS",
            BlockKind::Certifications => "CERTIFICATIONS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionBlock {
    pub kind: BlockKind,
    pub heading: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph { text: String },
    Inline { items: Vec<String> },
    Entries { entries: Vec<EntryBlock> },
}

/// One record of a repeated-entry section: `primary — secondary`, a right-hand
/// period, and optional multi-line body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryBlock {
    pub primary: String,
    pub secondary: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn block(kind: BlockKind, body: SectionBody) -> SectionBlock {
    SectionBlock {
        kind,
        heading: kind.heading(),
        body,
    }
}

fn entries<T>(
    kind: BlockKind,
    records: &[T],
    to_entry: impl Fn(&T) -> EntryBlock,
) -> Option<SectionBlock> {
    (!records.is_empty()).then(|| {
        block(
            kind,
            SectionBody::Entries {
                entries: records.iter().map(to_entry).collect(),
            },
        )
    })
}

/// Projects the model into its renderable document tree.
pub fn project(model: &DocumentModel) -> RenderedDocument {
    let contact = [
        model.location.as_deref(),
        model.email.as_deref(),
        model.phone.as_deref(),
        model.website.as_deref(),
    ]
    .into_iter()
    .filter(|v| !is_blank(*v))
    .flatten()
    .collect::<Vec<_>>()
    .join(SEPARATOR);

    let header = HeaderBlock {
        name: model.name.clone().unwrap_or_default(),
        title: model.title.clone().unwrap_or_default(),
        contact,
    };

    let mut sections = Vec::new();

    if let Some(summary) = model.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        sections.push(block(
            BlockKind::Summary,
            SectionBody::Paragraph {
                text: summary.to_string(),
            },
        ));
    }

    if !model.skills.is_empty() {
        sections.push(block(
            BlockKind::Skills,
            SectionBody::Inline {
                items: model.skills.clone(),
            },
        ));
    }

    sections.extend(entries(BlockKind::Experience, &model.experience, |e| {
        EntryBlock {
            primary: e.role.clone(),
            secondary: e.company.clone(),
            period: e.period.clone(),
            body: Some(e.details.clone()),
        }
    }));
    sections.extend(entries(BlockKind::Education, &model.education, |e| {
        EntryBlock {
            primary: e.degree.clone(),
            secondary: e.school.clone(),
            period: e.period.clone(),
            body: None,
        }
    }));
    sections.extend(entries(BlockKind::Projects, &model.projects, |p| {
        EntryBlock {
            primary: p.title.clone(),
            secondary: p.technologies.clone(),
            period: p.period.clone(),
            body: Some(p.description.clone()),
        }
    }));
    sections.extend(entries(
        BlockKind::Certifications,
        &model.certifications,
        |c| EntryBlock {
            primary: c.name.clone(),
            secondary: c.issuer.clone(),
            period: c.date.clone(),
            body: None,
        },
    ));

    RenderedDocument {
        theme_class: format!("theme-{}", model.theme_or_default()),
        header,
        sections,
    }
}

#[cfg(test)]
impl RenderedDocument {
    pub fn section(&self, kind: BlockKind) -> Option<&SectionBlock> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}
