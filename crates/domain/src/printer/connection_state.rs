use serde::{Deserialize, Serialize};

/// Connection state for a printer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No socket is held
    #[default]
    Disconnected,
    /// A socket is open and was usable at the last operation
    Connected,
    /// Stale socket released, replacement being opened
    Reconnecting,
}

impl ConnectionState {
    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if in the middle of a recovery cycle
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Reconnecting)
    }

    /// Transition to connected state
    pub fn to_connected(&self) -> Result<Self, &'static str> {
        match self {
            Self::Disconnected | Self::Reconnecting => Ok(Self::Connected),
            Self::Connected => Err("Already connected"),
        }
    }

    /// Transition to reconnecting state
    pub fn to_reconnecting(&self) -> Result<Self, &'static str> {
        match self {
            Self::Connected | Self::Disconnected => Ok(Self::Reconnecting),
            Self::Reconnecting => Err("Reconnect already in progress"),
        }
    }

    /// Transition to disconnected state
    pub fn to_disconnected(&self) -> Self {
        Self::Disconnected
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_disconnected() {
        let state = ConnectionState::default();
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(!state.is_connected());
    }

    #[test]
    fn test_transition_disconnected_to_connected() {
        let next = ConnectionState::Disconnected.to_connected().unwrap();
        assert_eq!(next, ConnectionState::Connected);
        assert!(next.is_connected());
    }

    #[test]
    fn test_cannot_connect_twice() {
        assert!(ConnectionState::Connected.to_connected().is_err());
    }

    #[test]
    fn test_recovery_cycle() {
        let reconnecting = ConnectionState::Connected.to_reconnecting().unwrap();
        assert!(reconnecting.is_transitioning());
        let back = reconnecting.to_connected().unwrap();
        assert_eq!(back, ConnectionState::Connected);
    }

    #[test]
    fn test_cannot_nest_reconnects() {
        assert!(ConnectionState::Reconnecting.to_reconnecting().is_err());
    }

    #[test]
    fn test_to_disconnected_from_any_state() {
        assert_eq!(
            ConnectionState::Connected.to_disconnected(),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::Reconnecting.to_disconnected(),
            ConnectionState::Disconnected
        );
    }
}
