//! Preview renderer: turns a `Document` into presentational HTML.
//!
//! `render` is pure: the same document always produces the same `Markup`, and
//! nothing from a previous render leaks into the next one. The returned
//! `Markup` also lists every addressable region it contains, which is what the
//! highlight coordinator checks against instead of parsing HTML.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::document::{Document, EducationEntry, ExperienceEntry, TemplateId};

pub const PLACEHOLDER_HTML: &str = r#"<div class="placeholder-text"><i class="fas fa-file-alt fa-3x"></i><h3>Your Resume Preview</h3><p>Start typing to see your resume appear here!</p></div>"#;

/// An addressable element of the rendered preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewTarget {
    /// A statically identified element, e.g. `#contact-email`.
    Element { selector: &'static str },
    /// The `index`-th entry (by position in the full list) inside a section container.
    Entry {
        container: &'static str,
        index: usize,
    },
}

impl PreviewTarget {
    pub fn selector(&self) -> String {
        match self {
            PreviewTarget::Element { selector } => selector.to_string(),
            PreviewTarget::Entry { container, index } => {
                format!(r#"{container} [data-index="{index}"]"#)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub html: String,
    regions: BTreeSet<PreviewTarget>,
}

impl Markup {
    pub fn placeholder() -> Self {
        Self {
            html: PLACEHOLDER_HTML.to_string(),
            regions: BTreeSet::new(),
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        self.html == PLACEHOLDER_HTML
    }

    pub fn contains(&self, target: &PreviewTarget) -> bool {
        self.regions.contains(target)
    }
}

/// CSS class of the preview container for the selected template.
pub fn container_class(template: TemplateId) -> String {
    format!("resume-preview {}", template.css_class())
}

/// The preview container element with `inner_html` inside, as a rasterizer sees it.
pub fn preview_subtree(template: TemplateId, inner_html: &str) -> String {
    format!(
        r#"<div id="resume-preview" class="{}">{inner_html}</div>"#,
        container_class(template)
    )
}

/// Renders the preview for `document`.
pub fn render(document: &Document) -> Markup {
    if document.is_blank_header() {
        return Markup::placeholder();
    }

    let mut out = Builder::default();
    render_header(&mut out, document);

    if !document.summary.is_empty() {
        out.region("#summary-section");
        out.html.push_str(&format!(
            r#"<div class="resume-section" id="summary-section"><h3 class="resume-section-title">Summary</h3><p>{}</p></div>"#,
            multiline(&document.summary)
        ));
    }

    if document.experience.iter().any(ExperienceEntry::is_renderable) {
        out.html.push_str(
            r#"<div class="resume-section" id="experience-section"><h3 class="resume-section-title">Experience</h3>"#,
        );
        for (i, exp) in document.experience.iter().enumerate() {
            if exp.is_renderable() {
                out.entry("#experience-section", i);
                out.html.push_str(&format!(
                    r#"<div class="experience-item" data-index="{i}"><div class="item-header"><div class="item-title">{}</div><div class="item-date">{}</div></div><div class="item-subtitle">{}</div><div class="item-description"><p>{}</p></div></div>"#,
                    escape(&exp.title),
                    escape(&exp.dates),
                    escape(&exp.company),
                    multiline(&exp.description)
                ));
            }
        }
        out.html.push_str("</div>");
    }

    if document.education.iter().any(EducationEntry::is_renderable) {
        out.html.push_str(
            r#"<div class="resume-section" id="education-section"><h3 class="resume-section-title">Education</h3>"#,
        );
        for (i, edu) in document.education.iter().enumerate() {
            if edu.is_renderable() {
                out.entry("#education-section", i);
                out.html.push_str(&format!(
                    r#"<div class="education-item" data-index="{i}"><div class="item-header"><div class="item-title">{}</div><div class="item-date">{}</div></div><div class="item-subtitle">{}</div></div>"#,
                    escape(&edu.degree),
                    escape(&edu.dates),
                    escape(&edu.school)
                ));
            }
        }
        out.html.push_str("</div>");
    }

    if !document.skills.is_empty() {
        out.region("#skills-section");
        let badges: String = parse_skills(&document.skills)
            .into_iter()
            .map(|skill| format!(r#"<span class="skill-badge">{}</span>"#, escape(skill)))
            .collect();
        out.html.push_str(&format!(
            r#"<div class="resume-section" id="skills-section"><h3 class="resume-section-title">Skills</h3><div class="skills-container">{badges}</div></div>"#
        ));
    }

    out.finish()
}

fn render_header(out: &mut Builder, document: &Document) {
    out.region(".resume-name");
    out.region(".resume-title");
    out.html.push_str(&format!(
        r#"<div class="resume-header"><h1 class="resume-name">{}</h1><h2 class="resume-title">{}</h2><div class="resume-contact">"#,
        escape(&document.full_name),
        escape(&document.job_title)
    ));

    // Presence is decided on the raw value; links are shortened for display only.
    let contacts: [(&'static str, &str, &str, &str, &str); 5] = [
        (
            "#contact-email",
            "contact-email",
            "fas fa-envelope",
            document.email.as_str(),
            document.email.as_str(),
        ),
        (
            "#contact-phone",
            "contact-phone",
            "fas fa-phone",
            document.phone.as_str(),
            document.phone.as_str(),
        ),
        (
            "#contact-location",
            "contact-location",
            "fas fa-map-marker-alt",
            document.location.as_str(),
            document.location.as_str(),
        ),
        (
            "#contact-linkedin",
            "contact-linkedin",
            "fab fa-linkedin",
            document.linkedin.as_str(),
            display_link(&document.linkedin),
        ),
        (
            "#contact-website",
            "contact-website",
            "fas fa-globe",
            document.website.as_str(),
            display_link(&document.website),
        ),
    ];
    for (selector, id, icon, raw, shown) in contacts {
        if raw.is_empty() {
            continue;
        }
        out.region(selector);
        out.html.push_str(&format!(
            r#"<span id="{id}"><i class="{icon}"></i> {}</span>"#,
            escape(shown)
        ));
    }
    out.html.push_str("</div></div>");
}

/// Splits the comma-separated skills field into trimmed, non-empty badges.
pub fn parse_skills(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strips a leading `http://` or `https://` and then a leading `www.` for display.
pub fn display_link(url: &str) -> &str {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn multiline(s: &str) -> String {
    escape(s).replace('\n', "<br>")
}

#[derive(Default)]
struct Builder {
    html: String,
    regions: BTreeSet<PreviewTarget>,
}

impl Builder {
    fn region(&mut self, selector: &'static str) {
        self.regions.insert(PreviewTarget::Element { selector });
    }

    fn entry(&mut self, container: &'static str, index: usize) {
        self.regions.insert(PreviewTarget::Entry { container, index });
    }

    fn finish(self) -> Markup {
        Markup {
            html: self.html,
            regions: self.regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Document {
        Document {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_header_renders_placeholder_only() {
        let doc = Document {
            phone: "555-0100".to_string(),
            summary: "Hidden".to_string(),
            skills: "Rust".to_string(),
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let markup = render(&doc);
        assert!(markup.is_placeholder());
        assert_eq!(markup.html, PLACEHOLDER_HTML);
        assert!(!markup.contains(&PreviewTarget::Element {
            selector: "#summary-section"
        }));
    }

    #[test]
    fn test_any_header_field_leaves_placeholder() {
        let doc = Document {
            email: "a@b.c".to_string(),
            ..Default::default()
        };
        let markup = render(&doc);
        assert!(!markup.is_placeholder());
        assert!(markup.html.contains(r#"<span id="contact-email">"#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = Document {
            full_name: "Ada".to_string(),
            summary: "Line one\nLine two".to_string(),
            skills: "Math, Engines".to_string(),
            ..Default::default()
        };
        assert_eq!(render(&doc), render(&doc));
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let doc = Document {
            full_name: "Ada".to_string(),
            summary: "Summary".to_string(),
            skills: "Math".to_string(),
            experience: vec![ExperienceEntry {
                title: "Analyst".to_string(),
                ..Default::default()
            }],
            education: vec![EducationEntry {
                degree: "Tutoring".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render(&doc).html;
        let header = html.find("resume-header").unwrap();
        let summary = html.find("summary-section").unwrap();
        let experience = html.find("experience-section").unwrap();
        let education = html.find("education-section").unwrap();
        let skills = html.find("skills-section").unwrap();
        assert!(header < summary && summary < experience);
        assert!(experience < education && education < skills);
    }

    #[test]
    fn test_skills_become_trimmed_badges() {
        assert_eq!(parse_skills("Go, Rust,  ,Python"), vec!["Go", "Rust", "Python"]);

        let mut doc = named("Ada");
        doc.skills = "Go, Rust,  ,Python".to_string();
        let html = render(&doc).html;
        assert_eq!(html.matches(r#"class="skill-badge""#).count(), 3);
        assert!(html.contains(r#"<span class="skill-badge">Rust</span>"#));
    }

    #[test]
    fn test_empty_optional_sections_are_omitted() {
        let markup = render(&named("Ada"));
        assert!(!markup.html.contains("summary-section"));
        assert!(!markup.html.contains("skills-section"));
        assert!(!markup.html.contains("experience-section"));
        assert!(!markup.html.contains("contact-phone"));
    }

    #[test]
    fn test_untitled_entries_are_skipped_but_indices_kept() {
        let mut doc = named("Ada");
        doc.experience = vec![
            ExperienceEntry {
                company: "Draft only".to_string(),
                ..Default::default()
            },
            ExperienceEntry {
                title: "Analyst".to_string(),
                company: "Babbage & Co".to_string(),
                ..Default::default()
            },
        ];
        let markup = render(&doc);
        assert!(markup.html.contains(r#"data-index="1""#));
        assert!(!markup.html.contains(r#"data-index="0""#));
        assert!(!markup.html.contains("Draft only"));
        assert!(markup.html.contains("Babbage &amp; Co"));
        assert!(markup.contains(&PreviewTarget::Entry {
            container: "#experience-section",
            index: 1
        }));
    }

    #[test]
    fn test_section_omitted_when_no_entry_has_primary_field() {
        let mut doc = named("Ada");
        doc.education = vec![EducationEntry {
            school: "Home".to_string(),
            ..Default::default()
        }];
        assert!(!render(&doc).html.contains("education-section"));
    }

    #[test]
    fn test_link_prefixes_are_stripped_for_display_only() {
        let mut doc = named("Ada");
        doc.linkedin = "https://www.linkedin.com/in/ada".to_string();
        doc.website = "http://ada.dev".to_string();
        let html = render(&doc).html;
        assert!(html.contains("</i> linkedin.com/in/ada</span>"));
        assert!(html.contains("</i> ada.dev</span>"));
        assert_eq!(doc.linkedin, "https://www.linkedin.com/in/ada");
    }

    #[test]
    fn test_display_link_variants() {
        assert_eq!(display_link("www.example.com"), "example.com");
        assert_eq!(display_link("https://example.com/www."), "example.com/www.");
        assert_eq!(display_link("example.com"), "example.com");
        assert_eq!(display_link("ftp://www.example.com"), "ftp://www.example.com");
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        let mut doc = named("Ada");
        doc.summary = "First\nSecond".to_string();
        assert!(render(&doc).html.contains("<p>First<br>Second</p>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let doc = named("<script>alert('x')</script>");
        let html = render(&doc).html;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_container_class_tracks_template() {
        assert_eq!(
            container_class(TemplateId::Minimal),
            "resume-preview template-3"
        );
    }

    #[test]
    fn test_bare_link_prefix_still_renders_contact() {
        let doc = Document {
            full_name: "Ada".to_string(),
            linkedin: "https://www.".to_string(),
            ..Default::default()
        };
        let markup = render(&doc);
        assert!(markup
            .html
            .contains(r#"<span id="contact-linkedin"><i class="fab fa-linkedin"></i> </span>"#));
        assert!(markup.contains(&PreviewTarget::Element {
            selector: "#contact-linkedin"
        }));
    }

    #[test]
    fn test_preview_subtree_carries_template_class() {
        let subtree = preview_subtree(TemplateId::Tech, "<p>x</p>");
        assert_eq!(
            subtree,
            r#"<div id="resume-preview" class="resume-preview template-7"><p>x</p></div>"#
        );
    }

    #[test]
    fn test_entry_selector_format() {
        let target = PreviewTarget::Entry {
            container: "#education-section",
            index: 2,
        };
        assert_eq!(target.selector(), r#"#education-section [data-index="2"]"#);
    }
}
