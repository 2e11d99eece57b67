use std::cell::RefCell;
use std::rc::Rc;

use super::failure::{BootstrapFailure, SetupFault};
use crate::model::view::ViewState;

/// Append-only target for status messages.
pub trait DisplaySink {
    fn append(&mut self, message: &str);
}

/// Resolves a display target by name.
pub trait DisplaySurface {
    fn locate(&self, target: &str) -> Result<Box<dyn DisplaySink>, SetupFault>;
}

/// Surfaces one failure to the user. Must not fail itself.
pub trait ErrorSink {
    fn report(&self, failure: &BootstrapFailure);
}

/// Panes of the terminal view, addressed by id.
#[derive(Debug, Clone)]
pub struct PaneSurface {
    view: Rc<RefCell<ViewState>>,
}

impl PaneSurface {
    pub fn new(view: Rc<RefCell<ViewState>>) -> Self {
        Self { view }
    }
}

impl DisplaySurface for PaneSurface {
    fn locate(&self, target: &str) -> Result<Box<dyn DisplaySink>, SetupFault> {
        if !self.view.borrow().has_pane(target) {
            return Err(SetupFault::SurfaceMissing(target.to_string()));
        }

        Ok(Box::new(PaneSink {
            view: Rc::clone(&self.view),
            pane: target.to_string(),
        }))
    }
}

#[derive(Debug)]
pub struct PaneSink {
    view: Rc<RefCell<ViewState>>,
    pane: String,
}

impl DisplaySink for PaneSink {
    fn append(&mut self, message: &str) {
        // Panes are fixed at startup, so a located pane cannot disappear.
        if !self.view.borrow_mut().append_to(&self.pane, message) {
            tracing::warn!("pane {} vanished, dropped message", self.pane);
        }
    }
}

/// Modal alert overlay. Queues the alert and returns immediately; the view
/// keeps it on screen until the user acknowledges it.
#[derive(Debug, Clone)]
pub struct AlertSink {
    view: Rc<RefCell<ViewState>>,
}

impl AlertSink {
    pub fn new(view: Rc<RefCell<ViewState>>) -> Self {
        Self { view }
    }
}

impl ErrorSink for AlertSink {
    fn report(&self, failure: &BootstrapFailure) {
        let text = match failure.function() {
            Some(function) if matches!(failure, BootstrapFailure::Call(_)) => {
                format!("{function}: {failure}")
            }
            _ => failure.to_string(),
        };
        tracing::error!(function = failure.function(), "bootstrap failed: {failure}");
        self.view.borrow_mut().push_alert(text);
    }
}
