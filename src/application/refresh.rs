// Last-request-wins sequencing for view refreshes
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues one ticket per refresh; only the newest ticket's result may be
/// shown. One sequencer belongs to one page view.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Run one refresh of `page` under a fresh ticket. A result that finishes
    /// after a newer refresh began is discarded, errors included.
    pub async fn run<T, E, F>(&self, page: &str, refresh: F) -> Result<Latest<T>, E>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin();
        let result = refresh.await;

        if !self.is_current(ticket) {
            match &result {
                Err(e) => tracing::warn!("Dropping failed {} refresh after a newer one: {}", page, e),
                Ok(_) => tracing::debug!("Dropping stale {} refresh", page),
            }
            return Ok(Latest::Superseded);
        }

        result.map(Latest::Current)
    }
}

/// Outcome of a sequenced refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Latest<T> {
    Current(T),
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let seq = RequestSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[tokio::test]
    async fn test_run_discards_result_behind_newer_ticket() {
        let seq = RequestSequencer::new();
        let stale = seq
            .run("families", async {
                seq.begin();
                Ok::<_, String>(1)
            })
            .await;
        assert_eq!(stale, Ok(Latest::Superseded));

        let failed = seq.run("families", async { Err::<u32, _>("down".to_string()) }).await;
        assert_eq!(failed, Err("down".to_string()));
    }

    #[test]
    fn test_sequencers_are_independent() {
        let families = RequestSequencer::new();
        let students = RequestSequencer::new();
        let f = families.begin();
        students.begin();
        assert!(families.is_current(f));
    }
}
