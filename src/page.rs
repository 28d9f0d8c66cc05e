//! Page load scheduling.
//!
//! [`PageLoad`] keeps an explicit ordered list of callbacks to run when the
//! page's load event fires. A callback registered later runs before the ones
//! already registered, so existing handlers keep running after newer logic.

use log::debug;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

type LoadHandler = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct LoadState {
    loaded: bool,
    handlers: VecDeque<LoadHandler>,
}

#[derive(Default)]
pub struct PageLoad {
    state: Mutex<LoadState>,
}

impl PageLoad {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `handler` for the load event. Runs immediately if the page
    /// has already loaded.
    pub fn on_load<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.lock();
        if state.loaded {
            drop(state);
            debug!("Page already loaded, running handler now");
            handler();
            return;
        }
        state.handlers.push_front(Box::new(handler));
    }

    /// Fire the load event. Only the first call runs handlers.
    pub fn fire(&self) {
        let handlers = {
            let mut state = self.lock();
            if state.loaded {
                return;
            }
            state.loaded = true;
            std::mem::take(&mut state.handlers)
        };

        debug!("Page loaded, running {} handler(s)", handlers.len());
        for handler in handlers {
            handler();
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn pending(&self) -> usize {
        self.lock().handlers.len()
    }
}
