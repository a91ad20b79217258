//! Process-wide error reporting.
//!
//! The kernel installs a panic hook on construction so that failures anywhere
//! in the process are reported through the logging facade before the default
//! hook runs. Hosts use [`ErrorHandler::report`] for errors that reach the
//! process entry point.
use std::error::Error as StdError;
use std::panic;
use std::sync::Once;

use crate::kernel::error::Error;

static INSTALL: Once = Once::new();

pub struct ErrorHandler;

impl ErrorHandler {
    /// Install the panic hook. Safe to call any number of times.
    pub fn initialize() {
        INSTALL.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                log::error!("Unhandled panic: {}", info);
                previous(info);
            }));
            log::debug!("Installed process-wide panic reporting");
        });
    }

    pub fn is_initialized() -> bool {
        INSTALL.is_completed()
    }

    /// Log `error` and each of its sources
    pub fn report(error: &Error) {
        log::error!("{}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
    }

    /// `error` and its sources as a single line, for terminal output
    pub fn describe(error: &Error) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
