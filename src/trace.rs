//! Optional structured tracing.
//!
//! With the `tracing` feature, [`trace_event!`] forwards to
//! [`tracing::trace!`] under the `persistent_set` target. Without it the
//! macro expands to nothing and its arguments are not evaluated.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($argument:tt)*) => {
        tracing::trace!(target: "persistent_set", $($argument)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($argument:tt)*) => {};
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    #[rstest]
    fn test_trace_event_accepts_structured_fields() {
        let length = 3_usize;
        let inserted = true;
        trace_event!(length, inserted, "insert");
        assert_eq!(length, 3);
        assert!(inserted);
    }
}
