//! Bluetooth connection indicator
//!
//! The icon is visible while the phone is disconnected. A connected to
//! disconnected transition asks for a vibration; the state peeked at startup
//! and repeated disconnect reports never do.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionIndicator {
    connected: Option<bool>,
}

impl ConnectionIndicator {
    /// Last known connection state, `None` before the first report.
    pub fn connected(&self) -> Option<bool> {
        self.connected
    }

    pub fn icon_hidden(&self) -> bool {
        self.connected.unwrap_or(false)
    }

    /// Take the current state without alerting.
    pub fn reconcile(&mut self, connected: bool) {
        self.connected = Some(connected);
    }

    /// Record a reported state change. Returns `true` if the connection was
    /// just lost.
    pub fn update(&mut self, connected: bool) -> bool {
        let lost = self.connected == Some(true) && !connected;
        self.connected = Some(connected);
        lost
    }
}
