//! Construction-time error types for the IR.
//!
//! Misuse that is detectable at the point of construction (rather than
//! during elaboration) is reported immediately as an [`IrError`].

/// Errors raised while building IR objects.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// A constant value does not fit the explicitly supplied bit vector.
    #[error("constant {value} does not fit in a {width}-bit {signedness} vector",
        signedness = if *.signed { "signed" } else { "unsigned" })]
    ConstantOverflow {
        /// The constant value.
        value: i128,
        /// The requested width.
        width: u32,
        /// Whether the requested type was signed.
        signed: bool,
    },

    /// An assignment target is not built purely from assignable leaves.
    ///
    /// Valid targets are signals, slices of valid targets, and
    /// concatenations of valid targets.
    #[error("assignment target is not an lvalue: {reason}")]
    NotAssignable {
        /// Description of the offending sub-expression.
        reason: String,
    },

    /// A case statement was built with more than one default arm.
    #[error("case statement has more than one default arm")]
    DuplicateDefault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_overflow_message() {
        let err = IrError::ConstantOverflow {
            value: 300,
            width: 8,
            signed: false,
        };
        assert_eq!(
            format!("{err}"),
            "constant 300 does not fit in a 8-bit unsigned vector"
        );
    }

    #[test]
    fn not_assignable_message() {
        let err = IrError::NotAssignable {
            reason: "operator node".to_string(),
        };
        assert!(format!("{err}").contains("not an lvalue"));
    }

    #[test]
    fn duplicate_default_message() {
        let err = IrError::DuplicateDefault;
        assert!(format!("{err}").contains("default"));
    }
}
