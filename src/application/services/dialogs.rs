//! Flyweight dialog scenario
//!
//! Two dialogs draw overlapping icon sets obtained from one shared factory.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{Dialog, IconFactory};

/// Output from running the dialog scenario.
#[derive(Debug, Clone)]
pub struct DialogReport {
    /// Keys held by the factory after drawing, in first-request order
    pub active_keys: Vec<String>,
    pub lines: Vec<String>,
}

/// Service drawing dialogs from a shared icon factory.
pub struct DialogScenario {
    factory: Arc<IconFactory>,
}

impl DialogScenario {
    pub fn new(factory: Arc<IconFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &IconFactory {
        &self.factory
    }

    /// FileSelection(go, stop, select) and CommitTransaction(select, stop, undo).
    #[instrument(level = "debug", skip(self))]
    pub fn run(&self) -> DialogReport {
        let f = &self.factory;
        let dialogs = [
            Dialog::file_selection(f.get_icon("go"), f.get_icon("stop"), f.get_icon("select")),
            Dialog::commit_transaction(f.get_icon("select"), f.get_icon("stop"), f.get_icon("undo")),
        ];
        self.draw_all(&dialogs)
    }

    /// Draw a single dialog with the given icon keys laid out from the origin.
    #[instrument(level = "debug", skip(self))]
    pub fn run_custom(&self, keys: &[String], x_increment: i32) -> DialogReport {
        let icons = keys.iter().map(|k| self.factory.get_icon(k)).collect();
        let dialog = Dialog::new("Custom", icons, (0, 0), x_increment);
        self.draw_all(std::slice::from_ref(&dialog))
    }

    fn draw_all(&self, dialogs: &[Dialog]) -> DialogReport {
        let mut lines = Vec::new();
        for dialog in dialogs {
            lines.push(format!("drawing {}:", dialog.title()));
            lines.extend(dialog.draw().iter().map(|b| format!("   {}", b)));
        }
        lines.push(self.factory.report());

        let active_keys = self.factory.active_keys();
        debug!("dialogs: {} flyweights shared", active_keys.len());
        DialogReport { active_keys, lines }
    }
}
