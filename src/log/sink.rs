//! Output sink strategy
//!
//! The facade formats once and hands the same bytes to every sink. A sink
//! must not let its own failure leak into another sink, and it must return
//! in bounded time when called from interrupt context.

/// Destination for formatted log output.
pub trait LogSink {
    /// Accepts one formatted message. Failures are absorbed by the sink.
    fn write(&self, bytes: &[u8]);

    /// Brings the sink to its initial state. Called by `Logger::init`.
    fn init(&self) {}

    /// Commits buffered output, if the sink buffers at all.
    fn flush(&self) {}
}

/// A sink slot with nothing attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    #[inline(always)]
    fn write(&self, _bytes: &[u8]) {}
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn write(&self, bytes: &[u8]) {
        (**self).write(bytes)
    }

    fn init(&self) {
        (**self).init()
    }

    fn flush(&self) {
        (**self).flush()
    }
}

impl<S: LogSink> LogSink for Option<S> {
    fn write(&self, bytes: &[u8]) {
        if let Some(sink) = self {
            sink.write(bytes);
        }
    }

    fn init(&self) {
        if let Some(sink) = self {
            sink.init();
        }
    }

    fn flush(&self) {
        if let Some(sink) = self {
            sink.flush();
        }
    }
}
