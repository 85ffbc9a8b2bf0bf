//! Race session: owns the race event bus

use tracing::{info, warn};

use crate::race_events::{RaceEventBus, RaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    /// Finish published, some listeners were busy and still need it
    Finishing,
    Finished,
}

#[derive(Debug)]
pub struct RaceSession {
    id: RaceId,
    state: SessionState,
    events: RaceEventBus,
}

impl RaceSession {
    pub fn new(id: RaceId) -> Self {
        Self {
            id,
            state: SessionState::Running,
            events: RaceEventBus::new(),
        }
    }

    pub fn id(&self) -> RaceId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn events(&self) -> &RaceEventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut RaceEventBus {
        &mut self.events
    }

    /// Notify listeners that the race finished; returns how many were
    /// notified by this call.
    ///
    /// The first call publishes. Listeners that were busy at that moment are
    /// retried by later calls until all have been notified, then the session
    /// is `Finished` and further calls do nothing.
    pub fn finish(&mut self) -> usize {
        let notified = match self.state {
            SessionState::Finished => return 0,
            SessionState::Running => {
                let notified = self.events.publish_finished(self.id);
                info!(race = self.id.0, notified, "race finished");
                notified
            }
            SessionState::Finishing => self.events.deliver_pending(),
        };

        let waiting = self.events.pending_count();
        self.state = if waiting == 0 {
            SessionState::Finished
        } else {
            warn!(race = self.id.0, waiting, "race finish still pending for busy listeners");
            SessionState::Finishing
        };
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race_events::{ListenerControl, RaceFinishListener};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Flag(u32);

    impl RaceFinishListener for Flag {
        fn on_race_finished(&mut self, _race: RaceId) -> ListenerControl {
            self.0 += 1;
            ListenerControl::Keep
        }
    }

    #[test]
    fn test_finish_is_one_shot() {
        let mut session = RaceSession::new(RaceId(3));
        let flag = Rc::new(RefCell::new(Flag(0)));
        let as_dyn: Rc<RefCell<dyn RaceFinishListener>> = flag.clone();
        session.events_mut().subscribe(Rc::downgrade(&as_dyn));

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.finish(), 1);
        assert_eq!(session.finish(), 0);
        assert!(session.is_finished());
        assert_eq!(flag.borrow().0, 1);
    }

    #[test]
    fn test_busy_listener_notified_on_retry() {
        let mut session = RaceSession::new(RaceId(5));
        let flag = Rc::new(RefCell::new(Flag(0)));
        let as_dyn: Rc<RefCell<dyn RaceFinishListener>> = flag.clone();
        session.events_mut().subscribe(Rc::downgrade(&as_dyn));

        let guard = flag.borrow_mut();
        assert_eq!(session.finish(), 0);
        assert_eq!(session.state(), SessionState::Finishing);
        assert!(!session.is_finished());
        drop(guard);

        assert_eq!(session.finish(), 1);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.finish(), 0);
        assert_eq!(flag.borrow().0, 1);
    }
}
