/// Interaction modes of the view host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Panes are visible and keys are routed to the host.
    #[default]
    Normal,
    /// A modal alert is shown and waits for acknowledgment.
    Alert,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Alert => "ALERT",
        }
    }
}
