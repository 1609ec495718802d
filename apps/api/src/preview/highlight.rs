//! Highlight coordinator: links the focused form control to its preview region.
//!
//! At most one region is highlighted at a time. A control without a mapping, or
//! one whose region is absent from the current preview, leaves nothing
//! highlighted and is not an error.

use serde::Serialize;
use tracing::debug;

use crate::form::Control;
use crate::models::document::Section;
use crate::preview::render::{Markup, PreviewTarget};

const SCALAR_TARGETS: [(&str, &str); 9] = [
    ("fullName", ".resume-name"),
    ("jobTitle", ".resume-title"),
    ("email", "#contact-email"),
    ("phone", "#contact-phone"),
    ("location", "#contact-location"),
    ("linkedin", "#contact-linkedin"),
    ("website", "#contact-website"),
    ("summary", "#summary-section"),
    ("skills", "#skills-section"),
];

/// Preview container declared for each repeatable section.
pub fn section_target(section: Section) -> &'static str {
    match section {
        Section::Experience => "#experience-section",
        Section::Education => "#education-section",
    }
}

/// Maps a control to its preview region, if one is declared.
pub fn resolve_target(control: &Control) -> Option<PreviewTarget> {
    match control {
        Control::Scalar(name) => SCALAR_TARGETS
            .iter()
            .find(|(mapped, _)| mapped == name)
            .map(|&(_, selector)| PreviewTarget::Element { selector }),
        Control::Entry { section, index, .. } => Some(PreviewTarget::Entry {
            container: section_target(*section),
            index: *index,
        }),
    }
}

/// The outcome of a focus event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightChange {
    pub target: PreviewTarget,
    pub selector: String,
    /// The highlighted region should be scrolled to the centre of the preview.
    pub scroll_into_view: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightCoordinator {
    highlighted: Option<PreviewTarget>,
}

impl HighlightCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<&PreviewTarget> {
        self.highlighted.as_ref()
    }

    /// Highlights the region for `control` in `markup`, replacing any earlier highlight.
    pub fn focus(&mut self, control: &Control, markup: &Markup) -> Option<HighlightChange> {
        self.highlighted = None;
        let target = resolve_target(control)?;
        if !markup.contains(&target) {
            debug!(selector = %target.selector(), "Focused control has no rendered preview region");
            return None;
        }
        self.highlighted = Some(target.clone());
        Some(HighlightChange {
            selector: target.selector(),
            target,
            scroll_into_view: true,
        })
    }

    pub fn blur(&mut self) {
        self.highlighted = None;
    }

    /// Drops the highlight if the region no longer exists after a re-render.
    pub fn retain_in(&mut self, markup: &Markup) {
        if let Some(target) = &self.highlighted {
            if !markup.contains(target) {
                self.highlighted = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Document, ExperienceEntry};
    use crate::preview::render::render;

    fn preview() -> Markup {
        render(&Document {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            experience: vec![
                ExperienceEntry {
                    title: "Analyst".to_string(),
                    ..Default::default()
                },
                ExperienceEntry::default(),
            ],
            ..Default::default()
        })
    }

    #[test]
    fn test_scalar_focus_highlights_mapped_element() {
        let mut coordinator = HighlightCoordinator::new();
        let change = coordinator
            .focus(&Control::Scalar("email"), &preview())
            .unwrap();
        assert_eq!(change.selector, "#contact-email");
        assert!(change.scroll_into_view);
        assert_eq!(
            coordinator.highlighted(),
            Some(&PreviewTarget::Element {
                selector: "#contact-email"
            })
        );
    }

    #[test]
    fn test_entry_focus_uses_container_and_position() {
        let mut coordinator = HighlightCoordinator::new();
        let control = Control::entry(Section::Experience, 0, "company").unwrap();
        let change = coordinator.focus(&control, &preview()).unwrap();
        assert_eq!(change.selector, r#"#experience-section [data-index="0"]"#);
    }

    #[test]
    fn test_missing_region_is_a_silent_noop() {
        let mut coordinator = HighlightCoordinator::new();
        let markup = preview();
        assert!(coordinator
            .focus(&Control::Scalar("phone"), &markup)
            .is_none());
        let untitled = Control::entry(Section::Experience, 1, "title").unwrap();
        assert!(coordinator.focus(&untitled, &markup).is_none());
        assert!(coordinator.highlighted().is_none());
    }

    #[test]
    fn test_only_one_region_highlighted() {
        let mut coordinator = HighlightCoordinator::new();
        let markup = preview();
        coordinator.focus(&Control::Scalar("fullName"), &markup);
        coordinator.focus(&Control::Scalar("email"), &markup);
        assert_eq!(
            coordinator.highlighted(),
            Some(&PreviewTarget::Element {
                selector: "#contact-email"
            })
        );
        coordinator.focus(&Control::Scalar("phone"), &markup);
        assert!(coordinator.highlighted().is_none());
    }

    #[test]
    fn test_blur_clears_highlight() {
        let mut coordinator = HighlightCoordinator::new();
        coordinator.focus(&Control::Scalar("fullName"), &preview());
        coordinator.blur();
        assert!(coordinator.highlighted().is_none());
    }

    #[test]
    fn test_retain_drops_vanished_region() {
        let mut coordinator = HighlightCoordinator::new();
        coordinator.focus(&Control::Scalar("email"), &preview());
        coordinator.retain_in(&Markup::placeholder());
        assert!(coordinator.highlighted().is_none());
    }
}
