pub mod admin;
pub mod listing;

use crate::core::catalog::models::WebsiteEntry;

/// Handed out when a load starts; only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct VersionClock {
    latest: u64,
}

impl VersionClock {
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// Outcome of the latest catalog load. A failed load is never shown as an
/// empty catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(Vec<WebsiteEntry>),
    Failed(String),
}

impl LoadState {
    pub fn entries(&self) -> &[WebsiteEntry] {
        match self {
            Self::Loaded(entries) => entries,
            Self::Loading | Self::Failed(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut clock = VersionClock::default();
        let first = clock.begin();
        assert!(clock.is_current(first));
        let second = clock.begin();
        assert!(!clock.is_current(first));
        assert!(clock.is_current(second));
    }

    #[test]
    fn non_loaded_states_expose_no_entries() {
        assert!(LoadState::Loading.entries().is_empty());
        assert!(LoadState::Failed("down".to_string()).entries().is_empty());
    }
}
