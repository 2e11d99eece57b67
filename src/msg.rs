use crossterm::event::KeyEvent;

use crate::lifecycle::LifecycleEvent;

/// All possible messages that drive state transitions.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Key(KeyEvent),
    Resize(u16, u16),

    // -- Lifecycle
    Lifecycle(LifecycleEvent),

    // -- Host calls
    /// A host worker settled its call; the executor has work to poll.
    HostSettled,
}
