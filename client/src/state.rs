use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::games::snake::GameSnapshot;

#[derive(Clone, Debug)]
struct Notice {
    message: String,
    expires_at: Instant,
}

/// State shared between the game runner and the render loop: the latest
/// engine snapshot plus a transient notice with a display deadline.
#[derive(Clone)]
pub struct SharedState {
    snapshot: Arc<Mutex<Option<GameSnapshot>>>,
    notice: Arc<Mutex<Option<Notice>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
            notice: Arc::new(Mutex::new(None)),
        }
    }

    pub fn publish(&self, snapshot: GameSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn set_notice(&self, message: String, ttl: Duration) {
        *self.notice.lock().unwrap() = Some(Notice {
            message,
            expires_at: Instant::now() + ttl,
        });
    }

    /// Returns the current notice, dropping it once its deadline passes.
    pub fn notice(&self) -> Option<String> {
        let mut notice = self.notice.lock().unwrap();
        match notice.as_ref() {
            Some(current) if current.expires_at > Instant::now() => {
                Some(current.message.clone())
            }
            Some(_) => {
                *notice = None;
                None
            }
            None => None,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
