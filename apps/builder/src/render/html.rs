//! HTML serialisation of a [`RenderedDocument`]: the markup the browser preview
//! shows and the body handed to exporters.

use std::fmt::Write;

use crate::render::{EntryBlock, RenderedDocument, SectionBlock, SectionBody, SEPARATOR};

/// Escapes text for element content and double-quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inner markup of the preview container (header + sections).
pub fn to_html(doc: &RenderedDocument) -> String {
    let mut html = String::new();

    // `write!` into a String cannot fail.
    let _ = write!(
        html,
        "<div class=\"border-b pb-3 text-center\">\
         <div class=\"text-3xl font-bold\">{}</div>\
         <div class=\"text-lg text-gray-700\">{}</div>\
         <div class=\"text-xs text-gray-500 mt-1\">{}</div>\
         </div>",
        escape(&doc.header.name),
        escape(&doc.header.title),
        escape(&doc.header.contact),
    );

    for section in &doc.sections {
        push_section(&mut html, section);
    }
    html
}

/// The preview wrapped in its themed container.
pub fn to_container_html(doc: &RenderedDocument) -> String {
    format!(
        "<div id=\"preview\" class=\"{}\">{}</div>",
        escape(&doc.theme_class),
        to_html(doc)
    )
}

fn push_section(html: &mut String, section: &SectionBlock) {
    let _ = write!(
        html,
        "<div class=\"mt-3\"><h3 class=\"font-semibold text-sm tracking-wider\">{}</h3>",
        section.heading
    );
    match &section.body {
        SectionBody::Paragraph { text } => {
            let _ = write!(
                html,
                "<p class=\"text-sm text-gray-700 mt-1\">{}</p>",
                escape(text)
            );
        }
        SectionBody::Inline { items } => {
            let joined = items
                .iter()
                .map(|i| escape(i))
                .collect::<Vec<_>>()
                .join(&escape(SEPARATOR));
            let _ = write!(html, "<div class=\"mt-1 text-sm\">{joined}</div>");
        }
        SectionBody::Entries { entries } => {
            for entry in entries {
                push_entry(html, entry);
            }
        }
    }
    html.push_str("</div>");
}

fn push_entry(html: &mut String, entry: &EntryBlock) {
    let _ = write!(
        html,
        "<div class=\"mt-2\">\
         <div class=\"flex justify-between text-sm font-medium\">\
         <span>{} &mdash; {}</span><span class=\"text-gray-500\">{}</span>\
         </div>",
        escape(&entry.primary),
        escape(&entry.secondary),
        escape(&entry.period),
    );
    if let Some(body) = &entry.body {
        let _ = write!(
            html,
            "<div class=\"text-sm text-gray-700 mt-1 whitespace-pre-line\">{}</div>",
            escape(body)
        );
    }
    html.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::DocumentModel;
    use crate::render::project;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape(r#"<b>"R&D"</b> 'x'"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; &#39;x&#39;"
        );
    }

    #[test]
    fn test_html_contains_sections_in_order() {
        let html = to_html(&project(&DocumentModel::builtin()));
        let summary = html.find("SUMMARY").unwrap();
        let skills = html.find("SKILLS").unwrap();
        let experience = html.find("EXPERIENCE").unwrap();
        let education = html.find("EDUCATION").unwrap();
        assert!(summary < skills && skills < experience && experience < education);
        assert!(!html.contains("PROJECTS"));
        assert!(html.contains("Senior Frontend Developer &mdash; Tech Solutions Inc."));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let model = DocumentModel {
            name: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let html = to_html(&project(&model));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_container_carries_theme_class() {
        let mut model = DocumentModel::default();
        model.theme = Some("minimal".to_string());
        let html = to_container_html(&project(&model));
        assert!(html.starts_with("<div id=\"preview\" class=\"theme-minimal\">"));
    }
}
