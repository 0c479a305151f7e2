use crate::thread::get_thread_name;
use chrono::Local;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::fmt::Arguments;
use std::io::Write;
use std::{fmt, thread};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Severity {
    Verbose,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Verbose => write!(f, "verbose"),
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

pub struct Message {
    severity: Severity,
    crate_name: String,
    message: String,
    time: chrono::DateTime<Local>,
    thread: thread::ThreadId,
}

impl Message {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn thread(&self) -> thread::ThreadId {
        self.thread
    }
}

/// Implement a "sink". This receives log messages from the global logger and process them.
/// E.g: print to a file
pub trait Sink: Send {
    fn log(&self, message: &Message);
}

lazy_static! {
    static ref SINKS: Mutex<Vec<Box<dyn Sink>>> = Mutex::new(Vec::new());
}

#[doc(hidden)]
pub fn internal_log(severity: Severity, crate_name: &str, args: Arguments) {
    let message = Message {
        severity,
        crate_name: crate_name.to_string(),
        message: args.to_string(),
        time: Local::now(),
        thread: thread::current().id(),
    };

    for sink in SINKS.lock().iter() {
        sink.log(&message);
    }

    if matches!(message.severity, Severity::Fatal) {
        panic!("{}", message.message);
    }
}

/** Sink API */

/**
 * Register a new sink
 */
pub fn register_sink(sink: Box<dyn Sink>) {
    SINKS.lock().push(sink);
}

/** Default logging macros */
#[macro_export]
macro_rules! ze_verbose {
    ($($arg:tt)*) => ({
        $crate::logger::internal_log($crate::logger::Severity::Verbose, env!("CARGO_PKG_NAME"), format_args!($($arg)*));
    })
}

#[macro_export]
macro_rules! ze_info {
    ($($arg:tt)*) => ({
        $crate::logger::internal_log($crate::logger::Severity::Info, env!("CARGO_PKG_NAME"), format_args!($($arg)*));
    })
}

#[macro_export]
macro_rules! ze_warn {
    ($($arg:tt)*) => ({
        $crate::logger::internal_log($crate::logger::Severity::Warn, env!("CARGO_PKG_NAME"), format_args!($($arg)*));
    })
}

#[macro_export]
macro_rules! ze_error {
    ($($arg:tt)*) => ({
        $crate::logger::internal_log($crate::logger::Severity::Error, env!("CARGO_PKG_NAME"), format_args!($($arg)*));
    })
}

#[macro_export]
macro_rules! ze_fatal {
    ($($arg:tt)*) => ({
        $crate::logger::internal_log($crate::logger::Severity::Fatal, env!("CARGO_PKG_NAME"), format_args!($($arg)*));
        unreachable!();
    })
}

/** Default sinks */
#[derive(Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn log(&self, message: &Message) {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        let thread_name = match get_thread_name(message.thread) {
            None => "Unknown Thread".to_string(),
            Some(str) => str.as_ref().clone(),
        };

        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(match message.severity {
            Severity::Verbose => Color::Cyan,
            Severity::Info => Color::White,
            Severity::Warn => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::Fatal => Color::Rgb(255, 15, 15),
        })));

        let _ = writeln!(
            &mut stdout,
            "[{}] [{}/{}] ({}) {}",
            message.time.format("%H:%M:%S"),
            message.severity,
            thread_name,
            message.crate_name,
            message.message
        );
        let _ = stdout.reset();
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use crate::logger::{register_sink, Message, Severity, Sink};
    use std::sync::{Arc, Mutex};

    struct CaptureSink {
        marker: &'static str,
        messages: Arc<Mutex<Vec<(Severity, String, String)>>>,
    }

    impl Sink for CaptureSink {
        fn log(&self, message: &Message) {
            if message.message().contains(self.marker) {
                self.messages.lock().unwrap().push((
                    message.severity(),
                    message.crate_name().to_string(),
                    message.message().to_string(),
                ));
            }
        }
    }

    #[test]
    fn macros_reach_registered_sinks() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        register_sink(Box::new(CaptureSink {
            marker: "macros_reach_registered_sinks",
            messages: messages.clone(),
        }));

        crate::ze_info!("macros_reach_registered_sinks {}", 1);
        crate::ze_warn!("macros_reach_registered_sinks {}", 2);
        crate::ze_error!("macros_reach_registered_sinks {}", 3);

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].0, Severity::Info);
        assert_eq!(messages[1].0, Severity::Warn);
        assert_eq!(messages[2].0, Severity::Error);
        assert_eq!(messages[0].1, "ze_core");
        assert_eq!(messages[2].2, "macros_reach_registered_sinks 3");
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Verbose.to_string(), "verbose");
        assert_eq!(Severity::Fatal.to_string(), "fatal");
    }
}
