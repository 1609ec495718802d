//! Wizard session: the single owner of the form, wizard, preview and highlight.
//!
//! Every method is a plain call: the HTTP layer translates requests into these
//! calls and never touches the components directly. After any change to the
//! form the preview is re-rendered from the freshly extracted document.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::form::{Control, FormError, FormState, NewEntry};
use crate::models::document::{Document, Section, TemplateId};
use crate::persistence::{PersistenceAdapter, StorageError};
use crate::preview::{container_class, render, HighlightChange, HighlightCoordinator, Markup};
use crate::wizard::{StepChange, Wizard, WizardView};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub html: String,
    pub container_class: String,
}

/// Everything a client needs to redraw after a call.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub document: Document,
    pub wizard: WizardView,
    pub preview: PreviewView,
    pub highlight: Option<String>,
}

pub struct WizardSession {
    form: FormState,
    wizard: Wizard,
    highlight: HighlightCoordinator,
    preview: Markup,
    persistence: PersistenceAdapter,
}

impl WizardSession {
    pub fn new(persistence: PersistenceAdapter, total_steps: usize) -> Self {
        Self {
            form: FormState::new(),
            wizard: Wizard::new(total_steps),
            highlight: HighlightCoordinator::new(),
            preview: Markup::placeholder(),
            persistence,
        }
    }

    /// Loads the stored document, or starts a blank one when `new_document` is set.
    ///
    /// A new document clears the storage slot and returns the wizard to step 1
    /// whatever was stored before.
    pub async fn load(&mut self, new_document: bool) -> Result<(), SessionError> {
        self.highlight.blur();
        if new_document {
            self.persistence.reset().await?;
            self.form.reset();
            self.form.ensure_initial_entries();
            self.wizard.reset();
            info!("Started a new document");
        } else {
            match self.persistence.load().await? {
                Some(document) => self.form.populate(&document),
                None => {
                    self.form.reset();
                    self.form.ensure_initial_entries();
                }
            }
        }
        self.refresh();
        Ok(())
    }

    pub fn document(&self) -> Document {
        self.form.extract_document()
    }

    pub fn preview(&self) -> &Markup {
        &self.preview
    }

    pub fn template(&self) -> TemplateId {
        self.form.template()
    }

    /// Applies a single control edit, re-renders, and schedules a debounced save.
    pub fn edit(&mut self, control: &Control, value: impl Into<String>) -> Result<(), SessionError> {
        self.form.set_value(control, value)?;
        self.refresh();
        self.persistence.schedule_save(self.form.extract_document());
        Ok(())
    }

    /// Appends a blank entry and returns its position.
    pub fn add_entry(&mut self, section: Section) -> usize {
        let index = self.form.add_entry(NewEntry::Blank(section));
        self.refresh();
        self.persistence.schedule_save(self.form.extract_document());
        debug!(%section, index, "Added entry");
        index
    }

    /// Removes an entry by position; the document is saved immediately.
    pub async fn remove_entry(&mut self, section: Section, index: usize) -> Result<(), SessionError> {
        self.form.remove_entry(section, index)?;
        self.highlight.blur();
        self.refresh();
        self.persistence.save(&self.form.extract_document()).await?;
        debug!(%section, index, "Removed entry");
        Ok(())
    }

    /// Switches the visual template; the choice is saved immediately.
    pub async fn select_template(&mut self, template: TemplateId) -> Result<(), SessionError> {
        self.form.select_template(template);
        self.refresh();
        self.persistence.save(&self.form.extract_document()).await?;
        info!(%template, "Template selected");
        Ok(())
    }

    pub fn next_step(&mut self) -> Option<StepChange> {
        self.wizard.next()
    }

    pub fn previous_step(&mut self) -> Option<StepChange> {
        self.wizard.previous()
    }

    pub fn jump_to_step(&mut self, step: usize) -> Option<StepChange> {
        self.wizard.jump_to(step)
    }

    pub fn focus(&mut self, control: &Control) -> Option<HighlightChange> {
        self.highlight.focus(control, &self.preview)
    }

    pub fn blur(&mut self) {
        self.highlight.blur();
    }

    /// Writes any pending debounced save now.
    pub async fn flush(&self) -> Result<(), SessionError> {
        Ok(self.persistence.flush().await?)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            document: self.form.extract_document(),
            wizard: self.wizard.view(),
            preview: PreviewView {
                html: self.preview.html.clone(),
                container_class: container_class(self.form.template()),
            },
            highlight: self.highlight.highlighted().map(|t| t.selector()),
        }
    }

    fn refresh(&mut self) {
        self.preview = render(&self.form.extract_document());
        self.highlight.retain_in(&self.preview);
    }
}
