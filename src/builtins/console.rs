//! Console output operations: puts, print, println
//!
//! - `puts`: each argument's inspection on its own line
//! - `print`: inspections joined by single spaces, no newline
//! - `println`: like `print` with a trailing newline
//!
//! All three return null.

use crate::error::EvalError;
use crate::value::Value;

pub fn builtin_puts(args: &[Value]) -> Result<Value, EvalError> {
    for arg in args {
        println!("{}", arg);
    }
    Ok(Value::Null)
}

pub fn builtin_print(args: &[Value]) -> Result<Value, EvalError> {
    print!("{}", joined(args));
    Ok(Value::Null)
}

pub fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", joined(args));
    Ok(Value::Null)
}

fn joined(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
