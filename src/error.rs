// ABOUTME: Runtime error type for evaluation failures in the Monkey interpreter

use thiserror::Error;

/// Errors produced while evaluating a program. Evaluation returns
/// `Result<Value, EvalError>`, so any error unwinds the whole enclosing
/// expression and statement chain until the driver reports it.
///
/// The `Display` strings are stable: test suites match on them exactly, and
/// drivers render them as `ERROR: <message>`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: String,
        operand: &'static str,
    },

    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("argument to '{builtin}' not supported: got={actual}")]
    UnsupportedArgument {
        builtin: &'static str,
        actual: &'static str,
    },

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongNumberOfArguments { want: usize, got: usize },

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),

    #[error("index operator not supported: {0}")]
    IndexOperatorNotSupported(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("macro literal may only appear as the value of a top-level let statement")]
    MacroOutsideDefinition,

    #[error("macros must return a quoted expression, got={0}")]
    NonQuoteMacroResult(&'static str),
}

impl EvalError {
    pub fn unknown_prefix(operator: &str, operand: &'static str) -> Self {
        EvalError::UnknownPrefixOperator {
            operator: operator.to_string(),
            operand,
        }
    }

    pub fn unknown_infix(left: &'static str, operator: &str, right: &'static str) -> Self {
        EvalError::UnknownInfixOperator {
            operator: operator.to_string(),
            left,
            right,
        }
    }

    pub fn type_mismatch(left: &'static str, operator: &str, right: &'static str) -> Self {
        EvalError::TypeMismatch {
            operator: operator.to_string(),
            left,
            right,
        }
    }

    pub fn wrong_arguments(want: usize, got: usize) -> Self {
        EvalError::WrongNumberOfArguments { want, got }
    }
}
