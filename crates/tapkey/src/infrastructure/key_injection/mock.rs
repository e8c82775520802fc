//! Recording key injector for tests.
//!
//! Records every pressed [`KeyDescriptor`] instead of touching the OS, so
//! tests can assert exactly which keys were pressed and in what order.
//!
//! ```ignore
//! let injector = Arc::new(RecordingInjector::new());
//! // ... run the engine ...
//! assert_eq!(injector.pressed_actions(), vec!["right"]);
//! ```
//!
//! Set `should_fail = true` to make every press return
//! [`InjectionError::PermissionDenied`].

use std::sync::Mutex;

use async_trait::async_trait;
use tapkey_core::KeyDescriptor;

use crate::application::dispatch_tag::{InjectionError, KeyInjector};

/// An injector that records calls without pressing anything.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    /// Every descriptor passed to `press`, in call order.
    pub pressed: Mutex<Vec<KeyDescriptor>>,
    /// When `true`, every press fails.
    pub should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector whose presses all fail.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Action names of the recorded presses.
    pub fn pressed_actions(&self) -> Vec<&'static str> {
        self.pressed
            .lock()
            .map(|p| p.iter().map(|k| k.action).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl KeyInjector for RecordingInjector {
    async fn press(&self, key: &KeyDescriptor) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::PermissionDenied("mock failure".into()));
        }
        if let Ok(mut pressed) = self.pressed.lock() {
            pressed.push(*key);
        }
        Ok(())
    }
}
