//! Wizard controller: a linear stepper over a fixed number of form steps.
//!
//! `current_step` is the only state. Every derived view (which content is
//! visible, which steps are completed, progress) is recomputed from it.

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// A successful step transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepChange {
    pub from: usize,
    pub to: usize,
    /// next/previous bring the form region into view; jumps do not.
    pub scroll_to_form: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step: usize,
    pub status: StepStatus,
}

/// Everything a UI needs to draw the stepper for the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub current_step: usize,
    pub total_steps: usize,
    pub steps: Vec<StepView>,
    pub visible_content: String,
    pub progress: f64,
    pub show_previous: bool,
    pub next_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    current_step: usize,
    total_steps: usize,
}

impl Wizard {
    /// A wizard over `total_steps` steps (at least one), starting at step 1.
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 1,
            total_steps: total_steps.max(1),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn reset(&mut self) {
        self.current_step = 1;
    }

    pub fn next(&mut self) -> Option<StepChange> {
        if self.current_step >= self.total_steps {
            return None;
        }
        Some(self.move_to(self.current_step + 1, true))
    }

    pub fn previous(&mut self) -> Option<StepChange> {
        if self.current_step <= 1 {
            return None;
        }
        Some(self.move_to(self.current_step - 1, true))
    }

    /// Jumps back to an earlier or completed step. Anything else is rejected
    /// without changing state.
    pub fn jump_to(&mut self, step: usize) -> Option<StepChange> {
        if step == 0 || step > self.total_steps {
            debug!(step, "Rejected jump to a step outside the wizard");
            return None;
        }
        if step < self.current_step || self.status(step) == StepStatus::Completed {
            return Some(self.move_to(step, false));
        }
        debug!(
            step,
            current = self.current_step,
            "Rejected jump to a locked step"
        );
        None
    }

    pub fn status(&self, step: usize) -> StepStatus {
        match step.cmp(&self.current_step) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }

    /// Fraction of the wizard completed, `(current - 1) / (N - 1)` clamped to [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_steps <= 1 {
            return 1.0;
        }
        let progress = (self.current_step - 1) as f64 / (self.total_steps - 1) as f64;
        progress.clamp(0.0, 1.0)
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            current_step: self.current_step,
            total_steps: self.total_steps,
            steps: (1..=self.total_steps)
                .map(|step| StepView {
                    step,
                    status: self.status(step),
                })
                .collect(),
            visible_content: content_id(self.current_step),
            progress: self.progress(),
            show_previous: self.current_step > 1,
            next_label: if self.current_step == self.total_steps {
                "Finish"
            } else {
                "Next"
            },
        }
    }

    fn move_to(&mut self, step: usize, scroll_to_form: bool) -> StepChange {
        let from = self.current_step;
        self.current_step = step;
        debug!(from, to = step, "Wizard step changed");
        StepChange {
            from,
            to: step,
            scroll_to_form,
        }
    }
}

/// Identifier of the content region shown for `step`.
pub fn content_id(step: usize) -> String {
    format!("step-{step}")
}
