//! Collection operations: len, first, last, rest, push
//!
//! Functions over arrays (and, for `len`, strings). All of them are
//! non-mutating: `rest` and `push` build fresh arrays and leave their
//! argument untouched.

use crate::error::EvalError;
use crate::value::Value;

/// Returns the length of an array or string as an integer.
pub fn builtin_len(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::wrong_arguments(1, args.len()));
    }

    match &args[0] {
        Value::String(value) => Ok(Value::Integer(value.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "len",
            actual: other.type_name(),
        }),
    }
}

/// Returns the first element of an array, or null if the array is empty.
pub fn builtin_first(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::wrong_arguments(1, args.len()));
    }

    match &args[0] {
        Value::Array(elements) => Ok(elements.first().cloned().unwrap_or(Value::Null)),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "first",
            actual: other.type_name(),
        }),
    }
}

/// Returns the last element of an array, or null if the array is empty.
pub fn builtin_last(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::wrong_arguments(1, args.len()));
    }

    match &args[0] {
        Value::Array(elements) => Ok(elements.last().cloned().unwrap_or(Value::Null)),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "last",
            actual: other.type_name(),
        }),
    }
}

/// Returns a new array holding every element after the first, or null if the
/// array is empty.
pub fn builtin_rest(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::wrong_arguments(1, args.len()));
    }

    match &args[0] {
        Value::Array(elements) if !elements.is_empty() => {
            Ok(Value::Array(elements[1..].to_vec()))
        }
        Value::Array(_) => Ok(Value::Null),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "rest",
            actual: other.type_name(),
        }),
    }
}

/// Returns a new array with the second argument appended.
pub fn builtin_push(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::wrong_arguments(2, args.len()));
    }

    match &args[0] {
        Value::Array(elements) => {
            let mut pushed = elements.clone();
            pushed.push(args[1].clone());
            Ok(Value::Array(pushed))
        }
        other => Err(EvalError::UnsupportedArgument {
            builtin: "push",
            actual: other.type_name(),
        }),
    }
}
