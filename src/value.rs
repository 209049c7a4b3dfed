// ABOUTME: Runtime value types for the Monkey interpreter

use crate::ast::{BlockStatement, Expression, Identifier};
use crate::env::Environment;
use crate::error::EvalError;
use fnv::FnvHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

/// Signature shared by all builtin functions.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// The closed set of runtime values. Functions and macros retain a shared
/// reference to their defining environment (closures), and `Quote` carries an
/// unevaluated AST fragment across the macro-expansion boundary.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Value>),
    Hash(HashMap<HashKey, HashPair>),
    Function {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
    Builtin(BuiltinFn),
    ReturnValue(Box<Value>),
    Quote(Expression),
    Macro {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        env: Rc<Environment>,
    },
}

/// Key under which a hashable value is stored in a hash. Two hashable values
/// are equal iff their type tags and hashed payloads match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: &'static str,
    pub value: u64,
}

/// The original key together with the stored value, so hashes can render
/// themselves without reversing the hash function.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

impl Value {
    /// The type tag reported in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function { .. } => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Quote(_) => "QUOTE",
            Value::Macro { .. } => "MACRO",
        }
    }

    /// Stable hash key for the hashable subset of values: integers hash as
    /// their bit pattern, booleans as 0/1, strings via FNV-1a 64. Everything
    /// else returns `None` and is rejected as a hash key by the evaluator.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey {
                object_type: self.type_name(),
                value: *value as u64,
            }),
            Value::Boolean(value) => Some(HashKey {
                object_type: self.type_name(),
                value: *value as u64,
            }),
            Value::String(value) => {
                let mut hasher = FnvHasher::default();
                hasher.write(value.as_bytes());
                Some(HashKey {
                    object_type: self.type_name(),
                    value: hasher.finish(),
                })
            }
            _ => None,
        }
    }
}

fn join_inspected(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Value {
    /// The human-readable `inspect` rendering: strings print raw, floats with
    /// six decimal places, quotes as `QUOTE(<node>)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:.6}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => write!(f, "[{}]", join_inspected(elements)),
            Value::Hash(pairs) => {
                let rendered = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", rendered)
            }
            Value::Function {
                parameters, body, ..
            } => {
                let params = parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fn({}) {{\n{}}}\n", params, body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::ReturnValue(value) => write!(f, "{}", value),
            Value::Quote(node) => write!(f, "QUOTE({})", node),
            Value::Macro {
                parameters, body, ..
            } => {
                let params = parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "macro({}) {{\n{}}}\n", params, body)
            }
        }
    }
}
