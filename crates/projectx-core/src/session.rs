//! Presentation sessions: independently closable views of some text.
//!
//! A [`SessionManager`] owns the registry of live sessions. The actual view
//! is drawn by a [`Presenter`]; when the user dismisses it, the caller reports
//! that through [`SessionManager::notify_closed`], which drops the entry.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Identity of a presentation session. Never reused within one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle of a session: `Created -> Visible -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Visible,
    Closed,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub handle: SessionHandle,
    pub title: String,
    pub content: String,
    pub state: SessionState,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to present {title:?}: {source}")]
    Present {
        title: String,
        #[source]
        source: std::io::Error,
    },
}

/// Draws a session for the user.
pub trait Presenter {
    /// Make `content` visible under `title`. Must not block until the view is closed.
    fn show(&mut self, handle: SessionHandle, title: &str, content: &str) -> std::io::Result<()>;
}

/// Owns the presenter and the registry of visible sessions.
///
/// All mutation goes through `&mut self`, so a manager is driven from a single
/// thread and needs no locking.
pub struct SessionManager<P: Presenter> {
    presenter: P,
    sessions: HashMap<SessionHandle, Session>,
    next_id: u64,
}

impl<P: Presenter> SessionManager<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            sessions: HashMap::new(),
            next_id: 0,
        }
    }

    /// Present `content` under `title` and register the new session.
    ///
    /// If the presenter fails nothing is registered, but the handle is still
    /// consumed.
    pub fn open(
        &mut self,
        content: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<SessionHandle, SessionError> {
        let handle = SessionHandle(self.next_id);
        self.next_id += 1;

        let mut session = Session {
            handle,
            title: title.into(),
            content: content.into(),
            state: SessionState::Created,
        };

        if let Err(source) = self
            .presenter
            .show(handle, &session.title, &session.content)
        {
            tracing::warn!(%handle, title = %session.title, error = %source, "presenter failed");
            return Err(SessionError::Present {
                title: session.title,
                source,
            });
        }

        session.state = SessionState::Visible;
        tracing::debug!(%handle, title = %session.title, live = self.sessions.len() + 1, "session opened");
        self.sessions.insert(handle, session);
        Ok(handle)
    }

    /// Record that the user closed the session's view.
    ///
    /// Returns `true` if the session was live and has now been dropped;
    /// repeated notifications for the same handle return `false`.
    pub fn notify_closed(&mut self, handle: SessionHandle) -> bool {
        match self.sessions.remove(&handle) {
            Some(_) => {
                tracing::debug!(%handle, live = self.sessions.len(), "session closed");
                true
            }
            None => false,
        }
    }

    /// Current state of `handle`, or `None` if this manager never issued it.
    pub fn state(&self, handle: SessionHandle) -> Option<SessionState> {
        if let Some(session) = self.sessions.get(&handle) {
            Some(session.state)
        } else if handle.0 < self.next_id {
            Some(SessionState::Closed)
        } else {
            None
        }
    }

    pub fn get(&self, handle: SessionHandle) -> Option<&Session> {
        self.sessions.get(&handle)
    }

    /// Handles of all live sessions, in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = SessionHandle> + '_ {
        self.sessions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct RecordingPresenter {
        shown: Vec<(SessionHandle, String, String)>,
        fail: bool,
    }

    impl Presenter for RecordingPresenter {
        fn show(
            &mut self,
            handle: SessionHandle,
            title: &str,
            content: &str,
        ) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "display gone",
                ));
            }
            self.shown.push((handle, title.to_string(), content.to_string()));
            Ok(())
        }
    }

    #[test]
    fn open_registers_visible_session() {
        let mut manager = SessionManager::new(RecordingPresenter::default());
        let handle = manager.open("hello\n", "paper - Parsed Text").unwrap();

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.state(handle), Some(SessionState::Visible));
        let session = manager.get(handle).unwrap();
        assert_eq!(session.title, "paper - Parsed Text");
        assert_eq!(session.content, "hello\n");
        assert_eq!(
            manager.presenter().shown,
            vec![(handle, "paper - Parsed Text".into(), "hello\n".into())]
        );
    }

    #[test]
    fn each_close_removes_exactly_one() {
        let mut manager = SessionManager::new(RecordingPresenter::default());
        let handles: Vec<_> = (0..4)
            .map(|i| manager.open(format!("text {i}"), "same title").unwrap())
            .collect();
        assert_eq!(manager.len(), 4);

        // Handles are distinct even when title and content collide.
        let unique: HashSet<SessionHandle> = handles.iter().copied().collect();
        assert_eq!(unique.len(), 4);

        for (closed, handle) in [handles[2], handles[0], handles[3], handles[1]]
            .into_iter()
            .enumerate()
        {
            assert!(manager.notify_closed(handle));
            assert_eq!(manager.len(), 3 - closed);
            assert_eq!(manager.state(handle), Some(SessionState::Closed));
        }
        assert!(manager.is_empty());
    }

    #[test]
    fn double_close_is_noop() {
        let mut manager = SessionManager::new(RecordingPresenter::default());
        let a = manager.open("a", "A").unwrap();
        let b = manager.open("b", "B").unwrap();

        assert!(manager.notify_closed(a));
        assert!(!manager.notify_closed(a));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.handles().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn unknown_handle_has_no_state() {
        let mut manager = SessionManager::new(RecordingPresenter::default());
        let mut other = SessionManager::new(RecordingPresenter::default());
        other.open("x", "X").unwrap();
        let foreign = other.open("y", "Y").unwrap();

        assert_eq!(manager.state(foreign), None);
        assert!(!manager.notify_closed(foreign));
        manager.open("z", "Z").unwrap();
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn presenter_failure_registers_nothing() {
        let mut manager = SessionManager::new(RecordingPresenter {
            fail: true,
            ..Default::default()
        });
        let err = manager.open("text", "Broken").unwrap_err();
        assert!(err.to_string().contains("Broken"), "{err}");
        assert!(manager.is_empty());
    }

    #[test]
    fn handle_display() {
        let mut manager = SessionManager::new(RecordingPresenter::default());
        manager.open("a", "A").unwrap();
        let second = manager.open("b", "B").unwrap();
        assert_eq!(second.to_string(), "session-1");
    }
}
