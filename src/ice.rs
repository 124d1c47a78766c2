//! Internal compiler errors.
//!
//! An internal compiler error (ICE) is a bug in a pass, never a problem with the input.
//! It is logged, handed to the installed [`Reporter`], and then the thread panics.

use std::panic::Location;
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Error, Debug, Clone)]
#[error("internal compiler error: {message}\n  at {location}")]
pub struct InternalCompilerError {
    pub message: String,
    pub location: &'static Location<'static>,
}

pub type Reporter = Arc<dyn Fn(&InternalCompilerError) + Send + Sync>;

static REPORTER: RwLock<Option<Reporter>> = RwLock::new(None);

/// Installs the sink that receives every internal compiler error before the panic.
/// The sink may itself call [`set_reporter`] or [`take_reporter`].
/// Returns the previously installed reporter.
pub fn set_reporter(
    reporter: impl Fn(&InternalCompilerError) + Send + Sync + 'static,
) -> Option<Reporter> {
    let mut slot = REPORTER.write().unwrap_or_else(|e| e.into_inner());
    slot.replace(Arc::new(reporter))
}

/// Removes the installed reporter.
pub fn take_reporter() -> Option<Reporter> {
    let mut slot = REPORTER.write().unwrap_or_else(|e| e.into_inner());
    slot.take()
}

/// Reports an internal compiler error at the caller's location and panics.
#[cold]
#[track_caller]
pub fn ice(message: impl Into<String>) -> ! {
    let error = InternalCompilerError {
        message: message.into(),
        location: Location::caller(),
    };
    tracing::error!(location = %error.location, "{}", error.message);
    // The lock is released before the call, so the reporter may install another one.
    let reporter = REPORTER.read().unwrap_or_else(|e| e.into_inner()).clone();
    if let Some(reporter) = reporter {
        reporter(&error);
    }
    panic!("{error}");
}

/// Reports an internal compiler error with a formatted message and panics.
#[macro_export]
macro_rules! ice {
    ($($arg:tt)*) => {
        $crate::ice::ice(::std::format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes the tests that install a reporter.
    static REPORTER_TESTS: Mutex<()> = Mutex::new(());

    #[test]
    #[should_panic(expected = "internal compiler error: broken invariant 7")]
    fn ice_panics_with_message() {
        crate::ice!("broken invariant {}", 7);
    }

    #[test]
    fn reporter_sees_location() {
        let _serial = REPORTER_TESTS.lock().unwrap_or_else(|e| e.into_inner());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _ = set_reporter(move |e| {
            sink.lock()
                .unwrap()
                .push((e.message.clone(), e.location.file().to_string()))
        });
        let result = std::panic::catch_unwind(|| ice("reported to the sink"));
        let _ = take_reporter();
        assert!(result.is_err());
        let seen = seen.lock().unwrap();
        // Other tests may raise errors while the reporter is installed.
        assert!(seen
            .iter()
            .any(|(message, file)| message == "reported to the sink" && file.ends_with("ice.rs")));
    }

    #[test]
    fn reporter_can_uninstall_itself() {
        let _serial = REPORTER_TESTS.lock().unwrap_or_else(|e| e.into_inner());
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        let _ = set_reporter(move |e| {
            if e.message == "uninstall the reporter" {
                *sink.lock().unwrap() += 1;
                let _ = take_reporter();
            }
        });
        let result = std::panic::catch_unwind(|| ice("uninstall the reporter"));
        assert!(result.is_err());
        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(take_reporter().is_none());
    }
}
