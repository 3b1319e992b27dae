//! Shared shape of the crate's error types.

/// Defines an error struct carrying a message and the source location
/// where it was created.
///
/// The generated type displays as `"<prefix>: <message> at <file>:<line>"`
/// and its `new` constructor records the caller's location.
macro_rules! location_error {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{}: {} at {}:{}", $prefix, message, file, line)]
        pub struct $name {
            /// Error message.
            pub message: String,
            /// Line number where error occurred.
            pub line: u32,
            /// Source file where error occurred.
            pub file: &'static str,
        }

        impl $name {
            /// Creates a new error with caller location tracking.
            #[track_caller]
            #[tracing::instrument(skip(message))]
            pub fn new(message: impl Into<String>) -> Self {
                let loc = std::panic::Location::caller();
                Self {
                    message: message.into(),
                    line: loc.line(),
                    file: loc.file(),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    location_error!(
        /// Error used to exercise the macro.
        SampleError,
        "Sample error"
    );

    #[test]
    fn test_new_records_caller_location() {
        let err = SampleError::new("boom");
        let line = line!() - 1;
        assert_eq!(err.message, "boom");
        assert_eq!(err.file, file!());
        assert_eq!(err.line, line);
        assert_eq!(
            err.to_string(),
            format!("Sample error: boom at {}:{}", file!(), line)
        );
    }
}
