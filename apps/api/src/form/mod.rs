//! Form binding: the editable controls behind the wizard.
//!
//! `FormState` holds raw control values keyed by their stable control names,
//! plus the ordered repeatable entries. `extract_document` and `populate` are
//! the two directions between the form and the `Document`.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::document::{Document, EducationEntry, ExperienceEntry, Section, TemplateId};

pub const SCALAR_CONTROLS: [&str; 9] = [
    "fullName", "jobTitle", "email", "phone", "location", "linkedin", "website", "summary",
    "skills",
];

pub const EXPERIENCE_CONTROLS: [&str; 4] = [
    "experience-title",
    "experience-company",
    "experience-dates",
    "experience-description",
];

pub const EDUCATION_CONTROLS: [&str; 3] =
    ["education-degree", "education-school", "education-dates"];

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("unknown form control '{0}'")]
    UnknownControl(String),

    #[error("control '{0}' belongs to a repeatable entry and needs an index")]
    MissingIndex(String),

    #[error("{section} entry {index} does not exist ({len} entries)")]
    EntryOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },
}

pub fn section_controls(section: Section) -> &'static [&'static str] {
    match section {
        Section::Experience => &EXPERIENCE_CONTROLS,
        Section::Education => &EDUCATION_CONTROLS,
    }
}

/// A resolved reference to one form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Scalar(&'static str),
    Entry {
        section: Section,
        index: usize,
        name: &'static str,
    },
}

impl Control {
    /// Resolves a control name (and entry position for repeatable controls).
    pub fn resolve(name: &str, index: Option<usize>) -> Result<Self, FormError> {
        if let Some(&scalar) = SCALAR_CONTROLS.iter().find(|&&c| c == name) {
            return Ok(Control::Scalar(scalar));
        }
        for section in [Section::Experience, Section::Education] {
            if let Some(&entry_name) = section_controls(section).iter().find(|&&c| c == name) {
                let index = index.ok_or_else(|| FormError::MissingIndex(name.to_string()))?;
                return Ok(Control::Entry {
                    section,
                    index,
                    name: entry_name,
                });
            }
        }
        Err(FormError::UnknownControl(name.to_string()))
    }

    /// Resolves an entry control from its section and short field name (`title`, `degree`, ...).
    pub fn entry(section: Section, index: usize, field: &str) -> Result<Self, FormError> {
        let name = format!("{section}-{field}");
        Self::resolve(&name, Some(index))
    }
}

/// One dynamically added row of a repeatable section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepeaterItem {
    values: BTreeMap<&'static str, String>,
}

impl RepeaterItem {
    fn blank(section: Section) -> Self {
        let values = section_controls(section)
            .iter()
            .map(|&name| (name, String::new()))
            .collect();
        Self { values }
    }

    fn value(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    fn from_experience(entry: &ExperienceEntry) -> Self {
        let mut item = Self::blank(Section::Experience);
        item.set("experience-title", entry.title.as_str());
        item.set("experience-company", entry.company.as_str());
        item.set("experience-dates", entry.dates.as_str());
        item.set("experience-description", entry.description.as_str());
        item
    }

    fn from_education(entry: &EducationEntry) -> Self {
        let mut item = Self::blank(Section::Education);
        item.set("education-degree", entry.degree.as_str());
        item.set("education-school", entry.school.as_str());
        item.set("education-dates", entry.dates.as_str());
        item
    }

    fn to_experience(&self) -> ExperienceEntry {
        ExperienceEntry {
            title: self.value("experience-title"),
            company: self.value("experience-company"),
            dates: self.value("experience-dates"),
            description: self.value("experience-description"),
        }
    }

    fn to_education(&self) -> EducationEntry {
        EducationEntry {
            degree: self.value("education-degree"),
            school: self.value("education-school"),
            dates: self.value("education-dates"),
        }
    }
}

/// A row to append to a repeatable section. Pre-filled rows name their section
/// through their data, so a row can only land in its own container.
#[derive(Debug, Clone)]
pub enum NewEntry<'a> {
    Blank(Section),
    Experience(&'a ExperienceEntry),
    Education(&'a EducationEntry),
}

impl NewEntry<'_> {
    pub fn section(&self) -> Section {
        match self {
            NewEntry::Blank(section) => *section,
            NewEntry::Experience(_) => Section::Experience,
            NewEntry::Education(_) => Section::Education,
        }
    }
}

/// The full set of form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    scalars: BTreeMap<&'static str, String>,
    experience: Vec<RepeaterItem>,
    education: Vec<RepeaterItem>,
    template: TemplateId,
}

impl FormState {
    pub fn new() -> Self {
        let mut form = Self::default();
        form.reset();
        form
    }

    /// Restores every scalar control to its default and empties both containers.
    pub fn reset(&mut self) {
        self.scalars = SCALAR_CONTROLS
            .iter()
            .map(|&name| (name, String::new()))
            .collect();
        self.experience.clear();
        self.education.clear();
        self.template = TemplateId::default();
    }

    pub fn value(&self, control: &Control) -> Option<&str> {
        match control {
            Control::Scalar(name) => self.scalars.get(name).map(String::as_str),
            Control::Entry {
                section,
                index,
                name,
            } => self
                .container(*section)
                .get(*index)
                .and_then(|item| item.values.get(name))
                .map(String::as_str),
        }
    }

    pub fn set_value(&mut self, control: &Control, value: impl Into<String>) -> Result<(), FormError> {
        match control {
            Control::Scalar(name) => {
                self.scalars.insert(*name, value.into());
            }
            Control::Entry {
                section,
                index,
                name,
            } => {
                let container = self.container_mut(*section);
                let len = container.len();
                let item = container.get_mut(*index).ok_or(FormError::EntryOutOfRange {
                    section: *section,
                    index: *index,
                    len,
                })?;
                item.set(*name, value);
            }
        }
        Ok(())
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn select_template(&mut self, template: TemplateId) {
        self.template = template;
    }

    pub fn entry_count(&self, section: Section) -> usize {
        self.container(section).len()
    }

    /// Appends a row to its section's container and returns its position.
    pub fn add_entry(&mut self, entry: NewEntry<'_>) -> usize {
        let section = entry.section();
        let item = match entry {
            NewEntry::Blank(section) => RepeaterItem::blank(section),
            NewEntry::Experience(data) => RepeaterItem::from_experience(data),
            NewEntry::Education(data) => RepeaterItem::from_education(data),
        };
        let container = self.container_mut(section);
        container.push(item);
        container.len() - 1
    }

    pub fn remove_entry(&mut self, section: Section, index: usize) -> Result<(), FormError> {
        let container = self.container_mut(section);
        if index >= container.len() {
            return Err(FormError::EntryOutOfRange {
                section,
                index,
                len: container.len(),
            });
        }
        container.remove(index);
        Ok(())
    }

    /// Adds one blank row to every empty repeatable section.
    pub fn ensure_initial_entries(&mut self) {
        for section in [Section::Experience, Section::Education] {
            if self.entry_count(section) == 0 {
                self.add_entry(NewEntry::Blank(section));
            }
        }
    }

    /// Reads every control into a fully populated `Document`.
    pub fn extract_document(&self) -> Document {
        let scalar = |name: &str| self.scalars.get(name).cloned().unwrap_or_default();
        Document {
            full_name: scalar("fullName"),
            job_title: scalar("jobTitle"),
            email: scalar("email"),
            phone: scalar("phone"),
            location: scalar("location"),
            linkedin: scalar("linkedin"),
            website: scalar("website"),
            summary: scalar("summary"),
            skills: scalar("skills"),
            experience: self.experience.iter().map(RepeaterItem::to_experience).collect(),
            education: self.education.iter().map(RepeaterItem::to_education).collect(),
            template: self.template,
        }
    }

    /// Writes a `Document` into the controls, replacing both containers in full.
    ///
    /// Each repeatable section ends up with at least one row.
    pub fn populate(&mut self, document: &Document) {
        let scalars = [
            ("fullName", &document.full_name),
            ("jobTitle", &document.job_title),
            ("email", &document.email),
            ("phone", &document.phone),
            ("location", &document.location),
            ("linkedin", &document.linkedin),
            ("website", &document.website),
            ("summary", &document.summary),
            ("skills", &document.skills),
        ];
        for (name, value) in scalars {
            self.scalars.insert(name, value.clone());
        }

        self.experience = document
            .experience
            .iter()
            .map(RepeaterItem::from_experience)
            .collect();
        self.education = document
            .education
            .iter()
            .map(RepeaterItem::from_education)
            .collect();
        self.ensure_initial_entries();
        self.template = document.template;

        debug!(
            experience = self.experience.len(),
            education = self.education.len(),
            "Form populated from document"
        );
    }

    fn container(&self, section: Section) -> &Vec<RepeaterItem> {
        match section {
            Section::Experience => &self.experience,
            Section::Education => &self.education,
        }
    }

    fn container_mut(&mut self, section: Section) -> &mut Vec<RepeaterItem> {
        match section {
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
        }
    }
}
