//! Elaboration error types.
//!
//! All violations detected during elaboration or generation surface as an
//! [`ElabError`]; elaboration is all-or-nothing and no partial output is
//! produced. Messages carry the offending signal's display label so the
//! caller can locate the statement without a separate lookup.

/// Errors detected while elaborating a fragment.
#[derive(Debug, thiserror::Error)]
pub enum ElabError {
    /// Operator or assignment widths/signs are incompatible and no
    /// implicit extension or truncation rule applies.
    #[error("width mismatch: {reason}")]
    WidthMismatch {
        /// Description of the incompatibility.
        reason: String,
    },

    /// Slice bounds out of range, or a zero-width value used where at
    /// least one bit is required.
    #[error("range error: {reason}")]
    Range {
        /// Description of the offending range.
        reason: String,
    },

    /// A signal is driven by two or more unconditional combinational
    /// statements (or driven both combinationally and synchronously).
    #[error("signal `{signal}` has multiple drivers: {reason}")]
    MultipleDriver {
        /// Display label of the conflicting signal.
        signal: String,
        /// Description of the conflicting drivers.
        reason: String,
    },

    /// Conditional drivers whose exclusivity cannot be statically
    /// confirmed. Ambiguity fails closed rather than picking a winner.
    #[error("cannot prove a single driver for signal `{signal}`: {reason}")]
    AmbiguousDriver {
        /// Display label of the conflicting signal.
        signal: String,
        /// Why exclusivity could not be confirmed.
        reason: String,
    },

    /// Instance or memory port arity/width mismatch.
    #[error("port binding error: {reason}")]
    PortBinding {
        /// Description of the mismatch.
        reason: String,
    },
}
