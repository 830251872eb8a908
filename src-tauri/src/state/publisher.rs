use serde::Serialize;
use tokio::sync::watch;

/// Progress of one user action as the frontend sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum UiState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Latest-value broadcast of a screen state.
///
/// Subscribers only ever see the most recent value; intermediate states
/// published while nobody is looking are dropped.
#[derive(Debug)]
pub struct StatePublisher<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> StatePublisher<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn publish(&self, state: S) {
        self.tx.send_replace(state);
    }

    pub fn current(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Modify the state in place; subscribers are notified only when
    /// `modify` returns true.
    pub fn transition(&self, modify: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(modify)
    }
}

impl<T: Clone> StatePublisher<UiState<T>> {
    /// Move to `Loading` unless already there. Returns false when another
    /// action is still running.
    pub fn begin(&self) -> bool {
        self.transition(|state| {
            if state.is_loading() {
                false
            } else {
                *state = UiState::Loading;
                true
            }
        })
    }
}

impl<T: Clone> Default for StatePublisher<UiState<T>> {
    fn default() -> Self {
        Self::new(UiState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn begin_refuses_a_second_loading() {
        let publisher: StatePublisher<UiState<u32>> = StatePublisher::default();
        assert!(publisher.begin());
        assert!(!publisher.begin());

        publisher.publish(UiState::Error("boom".to_string()));
        assert!(publisher.begin());
    }

    #[tokio::test]
    async fn subscribers_see_the_latest_value() {
        let publisher: StatePublisher<UiState<u32>> = StatePublisher::default();
        let mut rx = publisher.subscribe();

        publisher.publish(UiState::Loading);
        publisher.publish(UiState::Success(7));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), UiState::Success(7));
        assert_eq!(publisher.current(), UiState::Success(7));
    }

    #[test]
    fn serializes_with_status_tag() {
        let idle: UiState<u32> = UiState::Idle;
        assert_eq!(serde_json::to_value(&idle).unwrap(), json!({ "status": "idle" }));
        assert_eq!(
            serde_json::to_value(UiState::Error::<u32>("nope".to_string())).unwrap(),
            json!({ "status": "error", "data": "nope" })
        );
        assert_eq!(
            serde_json::to_value(UiState::Success(3)).unwrap(),
            json!({ "status": "success", "data": 3 })
        );
    }
}
