//! Partial documents as they arrive from share links, the remote store or the
//! local cache, and the shallow merge that lays them over the defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::model::{
    normalize_skills, AnalysisResults, CertificationEntry, DocumentModel, EducationEntry,
    ExperienceEntry, ProjectEntry,
};

/// Every top-level field of [`DocumentModel`], each distinguishing three states:
///
/// - `None` — key absent, the default stays.
/// - `Some(None)` — key present with `null`: scalars are unset, sections become
///   empty, analysis results are cleared.
/// - `Some(Some(v))` — key present, `v` replaces the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDocument {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub experience: Option<Option<Vec<ExperienceEntry>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub education: Option<Option<Vec<EducationEntry>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub projects: Option<Option<Vec<ProjectEntry>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Option<Vec<CertificationEntry>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub analysis_results: Option<Option<AnalysisResults>>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PartialDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Shallow merge: each present top-level field replaces the one in `base`.
    pub fn merge_over(self, mut base: DocumentModel) -> DocumentModel {
        fn scalar(slot: &mut Option<String>, value: Option<Option<String>>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn section<T>(slot: &mut Vec<T>, value: Option<Option<Vec<T>>>) {
            if let Some(value) = value {
                *slot = value.unwrap_or_default();
            }
        }

        scalar(&mut base.name, self.name);
        scalar(&mut base.title, self.title);
        scalar(&mut base.location, self.location);
        scalar(&mut base.email, self.email);
        scalar(&mut base.phone, self.phone);
        scalar(&mut base.website, self.website);
        scalar(&mut base.summary, self.summary);
        scalar(&mut base.theme, self.theme);

        if let Some(skills) = self.skills {
            base.skills = normalize_skills(skills.unwrap_or_default());
        }
        section(&mut base.experience, self.experience);
        section(&mut base.education, self.education);
        section(&mut base.projects, self.projects);
        section(&mut base.certifications, self.certifications);

        if let Some(results) = self.analysis_results {
            base.analysis_results = results;
        }
        base
    }
}

impl From<DocumentModel> for PartialDocument {
    fn from(model: DocumentModel) -> Self {
        Self {
            name: Some(model.name),
            title: Some(model.title),
            location: Some(model.location),
            email: Some(model.email),
            phone: Some(model.phone),
            website: Some(model.website),
            summary: Some(model.summary),
            theme: Some(model.theme),
            skills: Some(Some(model.skills)),
            experience: Some(Some(model.experience)),
            education: Some(Some(model.education)),
            projects: Some(Some(model.projects)),
            certifications: Some(Some(model.certifications)),
            analysis_results: Some(model.analysis_results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_fields_keep_defaults() {
        let partial = PartialDocument::from_json(r#"{"name": "Ada Lovelace"}"#).unwrap();
        let merged = partial.merge_over(DocumentModel::builtin());

        let mut expected = DocumentModel::builtin();
        expected.name = Some("Ada Lovelace".to_string());
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_present_sections_replace_wholesale() {
        let partial =
            PartialDocument::from_json(r#"{"experience": [{"role": "Analyst", "company": "X"}]}"#)
                .unwrap();
        let merged = partial.merge_over(DocumentModel::builtin());
        assert_eq!(merged.experience.len(), 1);
        assert_eq!(merged.experience[0].role, "Analyst");
        assert_eq!(merged.experience[0].details, "");
        // untouched section keeps the default
        assert_eq!(merged.education, DocumentModel::builtin().education);
    }

    #[test]
    fn test_null_section_becomes_empty_never_null() {
        let partial = PartialDocument::from_json(r#"{"education": null, "phone": null}"#).unwrap();
        let merged = partial.merge_over(DocumentModel::builtin());
        assert!(merged.education.is_empty());
        assert_eq!(merged.phone, None);
    }

    #[test]
    fn test_skills_are_normalized_on_merge() {
        let partial = PartialDocument::from_json(r#"{"skills": ["", " Rust ", "SQL"]}"#).unwrap();
        let merged = partial.merge_over(DocumentModel::default());
        assert_eq!(merged.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let partial = PartialDocument::from_json(r#"{"color": "red"}"#).unwrap();
        assert_eq!(partial, PartialDocument::default());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(PartialDocument::from_json("[1, 2, 3]").is_err());
        assert!(PartialDocument::from_json(r#"{"name": 42}"#).is_err());
    }

    #[test]
    fn test_full_partial_reproduces_model() {
        let mut model = DocumentModel::builtin();
        model.phone = None;
        let merged = PartialDocument::from(model.clone()).merge_over(DocumentModel::builtin());
        assert_eq!(merged, model);
    }
}
