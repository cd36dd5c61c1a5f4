//! Document Model — the canonical resume data held for one editing session.
//!
//! The serialized form is the complete state: nothing derived is stored here,
//! and `serde_json::to_string` → `from_str` reconstructs an equal model. Unset
//! scalars serialize as `null` so that laying a snapshot over the defaults
//! keeps them unset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::EditError;

/// Delimiter of the raw skills input ("Rust, SQL, Kafka").
pub const SKILLS_DELIMITER: char = ',';

/// Theme applied when the model carries none.
pub const DEFAULT_THEME: &str = "modern";

// ────────────────────────────────────────────────────────────────────────────
// Repeated-entry records
// ────────────────────────────────────────────────────────────────────────────

// `#[serde(default)]` on every record backfills absent fields with "" so a
// record is never partially defined, whatever the payload looked like.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub period: String,
    /// Multi-line free text, usually "• ..." bullets separated by newlines.
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub title: String,
    pub period: String,
    pub technologies: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

/// Output of the external analysis collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResults {
    pub missing_keywords: Vec<String>,
    pub suggested_verbs: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub certifications: Vec<CertificationEntry>,

    #[serde(default)]
    pub analysis_results: Option<AnalysisResults>,
}

impl DocumentModel {
    /// The built-in sample resume a fresh session starts from.
    pub fn builtin() -> Self {
        Self {
            name: Some("John Doe".to_string()),
            title: Some("Software Engineer".to_string()),
            location: Some("San Francisco, CA".to_string()),
            email: Some("john.doe@email.com".to_string()),
            phone: Some("(123) 456-7890".to_string()),
            website: Some("linkedin.com/in/johndoe".to_string()),
            summary: Some(
                "Innovative and deadline-driven Software Engineer with 5+ years of experience \
                 designing and developing user-centered applications from initial concept to \
                 final, polished deliverable."
                    .to_string(),
            ),
            theme: None,
            skills: ["JavaScript", "React", "Node.js", "Python", "SQL", "Agile Methodologies"]
                .into_iter()
                .map(String::from)
                .collect(),
            experience: vec![
                ExperienceEntry {
                    role: "Senior Frontend Developer".to_string(),
                    company: "Tech Solutions Inc.".to_string(),
                    period: "2021 - Present".to_string(),
                    details: "• Led the development of a new client-facing dashboard, improving user engagement by 25%.\n\
                              • Optimized application performance, resulting in a 40% reduction in page load times."
                        .to_string(),
                },
                ExperienceEntry {
                    role: "Software Developer".to_string(),
                    company: "Web Innovators".to_string(),
                    period: "2018 - 2021".to_string(),
                    details: "• Developed and maintained 5+ responsive websites using React and Redux.\n\
                              • Collaborated with a team of 10 developers in an Agile environment."
                        .to_string(),
                },
            ],
            education: vec![EducationEntry {
                degree: "B.S. in Computer Science".to_string(),
                school: "State University".to_string(),
                period: "2014 - 2018".to_string(),
            }],
            projects: Vec::new(),
            certifications: Vec::new(),
            analysis_results: None,
        }
    }

    /// Sets a scalar field from raw input. An empty value unsets the field so it
    /// renders as an omission.
    pub fn set_scalar(&mut self, field: ScalarField, value: &str) {
        let slot = match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Title => &mut self.title,
            ScalarField::Location => &mut self.location,
            ScalarField::Email => &mut self.email,
            ScalarField::Phone => &mut self.phone,
            ScalarField::Website => &mut self.website,
            ScalarField::Summary => &mut self.summary,
            ScalarField::Theme => &mut self.theme,
        };
        *slot = (!value.is_empty()).then(|| value.to_string());
    }

    /// Replaces `skills` from the raw delimited input.
    pub fn set_skills_input(&mut self, input: &str) {
        self.skills = parse_skills(input);
    }

    /// The skills as the editor shows them in its single text input.
    pub fn skills_input(&self) -> String {
        self.skills.join(", ")
    }

    pub fn theme_or_default(&self) -> &str {
        self.theme
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_THEME)
    }
}

/// Splits the delimited skills input, trims each token and drops empty ones.
pub fn parse_skills(input: &str) -> Vec<String> {
    normalize_skills(input.split(SKILLS_DELIMITER))
}

pub(crate) fn normalize_skills<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(normalize_skills(raw.unwrap_or_default()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar field addressing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarField {
    Name,
    Title,
    Location,
    Email,
    Phone,
    Website,
    Summary,
    Theme,
}

impl ScalarField {
    pub const ALL: [ScalarField; 8] = [
        ScalarField::Name,
        ScalarField::Title,
        ScalarField::Location,
        ScalarField::Email,
        ScalarField::Phone,
        ScalarField::Website,
        ScalarField::Summary,
        ScalarField::Theme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Title => "title",
            ScalarField::Location => "location",
            ScalarField::Email => "email",
            ScalarField::Phone => "phone",
            ScalarField::Website => "website",
            ScalarField::Summary => "summary",
            ScalarField::Theme => "theme",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| EditError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_skills_empty_input() {
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn test_parse_skills_trims_and_drops_blanks() {
        assert_eq!(parse_skills("A, B, ,C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_skills_input_round_trips_through_parse() {
        let model = DocumentModel::builtin();
        assert_eq!(parse_skills(&model.skills_input()), model.skills);
    }

    #[test]
    fn test_set_scalar_empty_unsets() {
        let mut model = DocumentModel::builtin();
        model.set_scalar(ScalarField::Phone, "");
        assert_eq!(model.phone, None);
        model.set_scalar(ScalarField::Phone, "555");
        assert_eq!(model.phone.as_deref(), Some("555"));
    }

    #[test]
    fn test_scalar_field_from_str() {
        assert_eq!("website".parse::<ScalarField>(), Ok(ScalarField::Website));
        assert_eq!(
            "skills".parse::<ScalarField>(),
            Err(EditError::UnknownField("skills".to_string()))
        );
    }

    #[test]
    fn test_serialized_model_reconstructs_equal() {
        let mut model = DocumentModel::builtin();
        model.theme = Some("classic".to_string());
        model.analysis_results = Some(AnalysisResults {
            missing_keywords: vec!["Kubernetes".to_string()],
            suggested_verbs: vec!["Spearheaded".to_string()],
        });
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"analysisResults\""));
        assert!(json.contains("\"missingKeywords\""));
        let back: DocumentModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_deserialize_backfills_record_fields_and_null_sections() {
        let json = r#"{
            "experience": [{"role": "Engineer"}],
            "education": null,
            "skills": ["Rust", "  ", " Go "]
        }"#;
        let model: DocumentModel = serde_json::from_str(json).unwrap();
        assert_eq!(
            model.experience,
            vec![ExperienceEntry {
                role: "Engineer".to_string(),
                ..Default::default()
            }]
        );
        assert!(model.education.is_empty());
        assert!(model.projects.is_empty());
        assert_eq!(model.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_theme_or_default() {
        let mut model = DocumentModel::default();
        assert_eq!(model.theme_or_default(), "modern");
        model.theme = Some("minimal".to_string());
        assert_eq!(model.theme_or_default(), "minimal");
    }
}
