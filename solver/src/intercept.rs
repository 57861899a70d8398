//! Interception of the host's move pipeline.
//!
//! The host advances puzzles through its own move function, including the
//! opponent's scripted replies. Wrapping that function is what lets the
//! controller notice "a move just happened that needs a new evaluation"
//! without polling. The wrapper is a plain decorator around an injected
//! [`MoveSink`], so it can be exercised without a live host.

use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;

use crate::board::{BoardError, HostMove};

/// The host's move-pipeline endpoint.
pub trait MoveSink: Send + Sync {
    fn submit(&self, mv: &HostMove) -> Result<(), BoardError>;
}

/// Decorator around the host's move function. Transparent to the host: the
/// inner sink is always invoked first and its result returned unchanged.
///
/// Moves not carrying the `auto_played` tag were made by the host itself
/// (the opponent's reply inside the host's puzzle logic) and are reported to
/// the controller. Tagged moves are the controller's own submissions and are
/// left alone; that tag is the sole re-entrancy guard.
pub struct MoveProxy {
    inner: Box<dyn MoveSink>,
    observed_tx: mpsc::UnboundedSender<HostMove>,
}

impl MoveSink for MoveProxy {
    fn submit(&self, mv: &HostMove) -> Result<(), BoardError> {
        let result = self.inner.submit(mv);
        if !mv.auto_played {
            let _ = self.observed_tx.send(mv.clone());
        }
        result
    }
}

/// Installs the proxy around the host sink at most once per controller
/// lifetime. Repeat calls return the proxy already in place.
pub struct Interceptor {
    observed_tx: mpsc::UnboundedSender<HostMove>,
    installed: OnceLock<Arc<MoveProxy>>,
}

impl Interceptor {
    pub(crate) fn new(observed_tx: mpsc::UnboundedSender<HostMove>) -> Self {
        Self {
            observed_tx,
            installed: OnceLock::new(),
        }
    }

    pub fn install(&self, sink: Box<dyn MoveSink>) -> Arc<MoveProxy> {
        self.installed
            .get_or_init(|| {
                Arc::new(MoveProxy {
                    inner: sink,
                    observed_tx: self.observed_tx.clone(),
                })
            })
            .clone()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        calls: Arc<Mutex<Vec<HostMove>>>,
        reject: bool,
    }

    impl MoveSink for RecordingSink {
        fn submit(&self, mv: &HostMove) -> Result<(), BoardError> {
            self.calls.lock().unwrap().push(mv.clone());
            if self.reject {
                Err(BoardError::Rejected("scripted".into()))
            } else {
                Ok(())
            }
        }
    }

    fn proxy_with_sink(
        reject: bool,
    ) -> (
        Interceptor,
        Arc<MoveProxy>,
        Arc<Mutex<Vec<HostMove>>>,
        mpsc::UnboundedReceiver<HostMove>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let interceptor = Interceptor::new(tx);
        let proxy = interceptor.install(Box::new(RecordingSink {
            calls: calls.clone(),
            reject,
        }));
        (interceptor, proxy, calls, rx)
    }

    #[test]
    fn test_forwards_to_inner_sink_and_returns_result() {
        let (_i, proxy, calls, _rx) = proxy_with_sink(true);
        let mv = HostMove::new("e2", "e4", None);
        assert!(matches!(proxy.submit(&mv), Err(BoardError::Rejected(_))));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_untagged_move_is_observed() {
        let (_i, proxy, _calls, mut rx) = proxy_with_sink(false);
        let mv = HostMove::new("e7", "e5", None);
        proxy.submit(&mv).unwrap();
        let observed = rx.try_recv().unwrap();
        assert_eq!(observed.from, "e7");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_tagged_move_is_not_observed() {
        let (_i, proxy, calls, mut rx) = proxy_with_sink(false);
        let mut mv = HostMove::new("e2", "e4", None);
        mv.user_generated = true;
        mv.auto_played = true;
        proxy.submit(&mv).unwrap();
        // Still reaches the host, but never loops back to the controller.
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_install_is_idempotent() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let interceptor = Interceptor::new(tx);
        assert!(!interceptor.is_installed());

        let first_calls = Arc::new(Mutex::new(Vec::new()));
        let second_calls = Arc::new(Mutex::new(Vec::new()));
        let first = interceptor.install(Box::new(RecordingSink {
            calls: first_calls.clone(),
            reject: false,
        }));
        let second = interceptor.install(Box::new(RecordingSink {
            calls: second_calls.clone(),
            reject: false,
        }));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(interceptor.is_installed());

        // The first sink stays wired; the second install changed nothing.
        second.submit(&HostMove::new("e2", "e4", None)).unwrap();
        assert_eq!(first_calls.lock().unwrap().len(), 1);
        assert!(second_calls.lock().unwrap().is_empty());
    }
}
