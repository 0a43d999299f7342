//! Behavioral statements.
//!
//! Statements describe *what is driven*, never *how often*: the same
//! [`Statement`] tree means continuous re-evaluation when placed in a
//! fragment's combinational list and update-on-clock-edge when placed in
//! its synchronous list.
//!
//! Statements with construction-time invariants (`Assign` lvalue checks,
//! duplicate case defaults) are built through
//! [`Design`](crate::design::Design) methods, which fail immediately on
//! misuse rather than deferring to elaboration.

use crate::constant::Constant;
use crate::error::IrError;
use crate::ids::ExprId;
use serde::{Deserialize, Serialize};

/// One arm of a case statement, matching a single constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseArm {
    /// The value this arm matches.
    pub match_value: Constant,
    /// The statements active when the arm matches.
    pub body: Vec<Statement>,
}

/// An entry supplied to [`Statement::case`]: either a concrete match
/// value or the default arm.
///
/// The default may appear at any position in the entry list but matches
/// only when no value arm does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaseEntry {
    /// A concrete match value with its body.
    Value(Constant, Vec<Statement>),
    /// The default arm.
    Default(Vec<Statement>),
}

/// A behavioral statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Drives `target` with `value`.
    ///
    /// `target` must be an lvalue expression: a signal, a slice of an
    /// lvalue, or a concatenation of lvalues. Built through
    /// [`Design::assign`](crate::design::Design::assign), which enforces this.
    Assign {
        /// The driven lvalue expression.
        target: ExprId,
        /// The value expression.
        value: ExprId,
    },
    /// Activates `then_body` when `condition` is non-zero, `else_body`
    /// otherwise.
    If {
        /// The condition expression.
        condition: ExprId,
        /// Statements active when the condition holds.
        then_body: Vec<Statement>,
        /// Statements active otherwise (may be empty).
        else_body: Vec<Statement>,
    },
    /// Matches `subject` against `arms` in declaration order; the first
    /// matching arm is active. The default body is active when no arm
    /// matches.
    Case {
        /// The expression being matched.
        subject: ExprId,
        /// The value arms, in declaration order.
        arms: Vec<CaseArm>,
        /// The default body, if one was supplied.
        default: Option<Vec<Statement>>,
    },
}

impl Statement {
    /// Builds an if statement with no else branch.
    pub fn when(condition: ExprId, then_body: Vec<Statement>) -> Statement {
        Statement::If {
            condition,
            then_body,
            else_body: Vec::new(),
        }
    }

    /// Builds an if/else statement.
    pub fn when_else(
        condition: ExprId,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    ) -> Statement {
        Statement::If {
            condition,
            then_body,
            else_body,
        }
    }

    /// Builds a case statement from an ordered entry list.
    ///
    /// Value arms keep their declaration order (first match wins). A
    /// [`CaseEntry::Default`] may sit anywhere in the list; a second one
    /// fails immediately with [`IrError::DuplicateDefault`].
    pub fn case(subject: ExprId, entries: Vec<CaseEntry>) -> Result<Statement, IrError> {
        let mut arms = Vec::new();
        let mut default = None;
        for entry in entries {
            match entry {
                CaseEntry::Value(match_value, body) => arms.push(CaseArm { match_value, body }),
                CaseEntry::Default(body) => {
                    if default.is_some() {
                        return Err(IrError::DuplicateDefault);
                    }
                    default = Some(body);
                }
            }
        }
        Ok(Statement::Case {
            subject,
            arms,
            default,
        })
    }
}
