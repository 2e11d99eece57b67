use std::collections::{BTreeMap, VecDeque};

use super::display_log::DisplayLog;
use super::mode::Mode;

/// Everything the view renders: named panes and pending alerts.
#[derive(Debug, Default)]
pub struct ViewState {
    panes: BTreeMap<String, DisplayLog>,
    alerts: VecDeque<String>,
}

impl ViewState {
    pub fn new<I, S>(pane_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            panes: pane_ids
                .into_iter()
                .map(|id| (id.into(), DisplayLog::new()))
                .collect(),
            alerts: VecDeque::new(),
        }
    }

    pub fn has_pane(&self, id: &str) -> bool {
        self.panes.contains_key(id)
    }

    pub fn pane(&self, id: &str) -> Option<&DisplayLog> {
        self.panes.get(id)
    }

    pub fn panes(&self) -> impl Iterator<Item = (&str, &DisplayLog)> {
        self.panes.iter().map(|(id, log)| (id.as_str(), log))
    }

    /// Returns false when the pane does not exist.
    pub fn append_to(&mut self, id: &str, message: impl Into<String>) -> bool {
        match self.panes.get_mut(id) {
            Some(log) => {
                log.append(message);
                true
            }
            None => false,
        }
    }

    pub fn push_alert(&mut self, text: impl Into<String>) {
        self.alerts.push_back(text.into());
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn acknowledge_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }

    pub fn mode(&self) -> Mode {
        if self.alerts.is_empty() {
            Mode::Normal
        } else {
            Mode::Alert
        }
    }
}
