// ABOUTME: Tree-walking evaluator executing the expanded Monkey AST

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::builtins;
use crate::env::Environment;
use crate::error::EvalError;
use crate::macros;
use crate::value::{HashPair, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Evaluates a whole program. A `return` anywhere at the top level stops
/// evaluation and yields the unwrapped value; errors unwind immediately via
/// the `Result` channel.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::Null;
    for statement in &program.statements {
        match eval_statement(statement, env)? {
            Value::ReturnValue(value) => return Ok(*value),
            value => result = value,
        }
    }
    Ok(result)
}

/// Evaluates a block. Unlike [`eval_program`] this does NOT unwrap a
/// `ReturnValue`: the wrapper must travel upward through nested blocks so
/// that only the enclosing function application (or program) unwraps it.
pub fn eval_block(block: &BlockStatement, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::Null;
    for statement in &block.statements {
        result = eval_statement(statement, env)?;
        if matches!(result, Value::ReturnValue(_)) {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match statement {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env)?;
            env.set(name.value.clone(), value);
            Ok(Value::Null)
        }
        Statement::Return { value, .. } => {
            let value = match value {
                Some(expression) => eval_expression(expression, env)?,
                None => Value::Null,
            };
            Ok(Value::ReturnValue(Box::new(value)))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
    }
}

pub fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match expression {
        Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
        Expression::FloatLiteral { value, .. } => Ok(Value::Float(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(Value::Boolean(*value)),
        Expression::StringLiteral { value, .. } => Ok(Value::String(value.clone())),
        Expression::Identifier(identifier) => eval_identifier(identifier, env),
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env)?;
            eval_prefix_expression(operator, right)
        }
        Expression::Infix {
            operator,
            left,
            right,
            ..
        } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix_expression(operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, env)?;
            if is_truthy(&condition) {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Ok(Value::Null)
            }
        }
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Ok(Value::Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        }),
        Expression::Call {
            function,
            arguments,
            ..
        } => {
            // quote receives its argument unevaluated
            if is_call_to(function, "quote") {
                if arguments.len() != 1 {
                    return Err(EvalError::wrong_arguments(1, arguments.len()));
                }
                return macros::quote(arguments[0].clone(), env);
            }
            let function = eval_expression(function, env)?;
            let mut args = Vec::with_capacity(arguments.len());
            for argument in arguments {
                args.push(eval_expression(argument, env)?);
            }
            apply_function(function, args)
        }
        Expression::ArrayLiteral { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                values.push(eval_expression(element, env)?);
            }
            Ok(Value::Array(values))
        }
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env),
        Expression::Index { left, index, .. } => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index_expression(left, index)
        }
        Expression::MacroLiteral { .. } => Err(EvalError::MacroOutsideDefinition),
    }
}

fn is_call_to(function: &Expression, name: &str) -> bool {
    matches!(function, Expression::Identifier(identifier) if identifier.value == name)
}

fn eval_identifier(identifier: &Identifier, env: &Rc<Environment>) -> Result<Value, EvalError> {
    if let Some(value) = env.get(&identifier.value) {
        return Ok(value);
    }
    if let Some(builtin) = builtins::lookup(&identifier.value) {
        return Ok(builtin);
    }
    Err(EvalError::IdentifierNotFound(identifier.value.clone()))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Result<Value, EvalError> {
    match operator {
        "!" => Ok(eval_bang_operator(right)),
        "-" => eval_minus_operator(right),
        _ => Err(EvalError::unknown_prefix(operator, right.type_name())),
    }
}

fn eval_bang_operator(right: Value) -> Value {
    match right {
        Value::Boolean(value) => Value::Boolean(!value),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus_operator(right: Value) -> Result<Value, EvalError> {
    match right {
        Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
        Value::Float(value) => Ok(Value::Float(-value)),
        other => Err(EvalError::unknown_prefix("-", other.type_name())),
    }
}

/// Infix dispatch. Matching numeric operands stay in their own domain, any
/// float operand promotes the other side, strings support concatenation and
/// content equality, and everything else falls back to identity comparison
/// for `==`/`!=` or an error.
fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::Float(l), Value::Float(r)) => eval_float_infix(operator, *l, *r),
        (Value::Integer(l), Value::Float(r)) => eval_float_infix(operator, *l as f64, *r),
        (Value::Float(l), Value::Integer(r)) => eval_float_infix(operator, *l, *r as f64),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ => match operator {
            "==" => Ok(Value::Boolean(values_identical(&left, &right))),
            "!=" => Ok(Value::Boolean(!values_identical(&left, &right))),
            _ if left.type_name() != right.type_name() => Err(EvalError::type_mismatch(
                left.type_name(),
                operator,
                right.type_name(),
            )),
            _ => Err(EvalError::unknown_infix(
                left.type_name(),
                operator,
                right.type_name(),
            )),
        },
    }
}

/// Identity comparison for the canonical singletons. `true`, `false` and
/// `null` are interned conceptually, so comparing the payload is identity;
/// all other values are distinct objects and never identical.
fn values_identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Result<Value, EvalError> {
    match operator {
        "+" => Ok(Value::Integer(left.wrapping_add(right))),
        "-" => Ok(Value::Integer(left.wrapping_sub(right))),
        "*" => Ok(Value::Integer(left.wrapping_mul(right))),
        "/" => {
            if right == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Integer(left.wrapping_div(right)))
            }
        }
        "<" => Ok(Value::Boolean(left < right)),
        ">" => Ok(Value::Boolean(left > right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        _ => Err(EvalError::unknown_infix("INTEGER", operator, "INTEGER")),
    }
}

fn eval_float_infix(operator: &str, left: f64, right: f64) -> Result<Value, EvalError> {
    match operator {
        "+" => Ok(Value::Float(left + right)),
        "-" => Ok(Value::Float(left - right)),
        "*" => Ok(Value::Float(left * right)),
        "/" => Ok(Value::Float(left / right)),
        "<" => Ok(Value::Boolean(left < right)),
        ">" => Ok(Value::Boolean(left > right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        _ => Err(EvalError::unknown_infix("FLOAT", operator, "FLOAT")),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Result<Value, EvalError> {
    match operator {
        "+" => Ok(Value::String(format!("{}{}", left, right))),
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        _ => Err(EvalError::unknown_infix("STRING", operator, "STRING")),
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Boolean(false) | Value::Null)
}

fn apply_function(function: Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match function {
        Value::Function {
            parameters,
            body,
            env,
        } => {
            if parameters.len() != args.len() {
                return Err(EvalError::wrong_arguments(parameters.len(), args.len()));
            }
            let call_env = Environment::new_enclosed(env);
            for (parameter, arg) in parameters.iter().zip(args) {
                call_env.set(parameter.value.clone(), arg);
            }
            let evaluated = eval_block(&body, &call_env)?;
            Ok(unwrap_return_value(evaluated))
        }
        Value::Builtin(function) => function(&args),
        other => Err(EvalError::NotAFunction(other.type_name())),
    }
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(inner) => *inner,
        other => other,
    }
}

fn eval_hash_literal(
    pairs: &[(Expression, Expression)],
    env: &Rc<Environment>,
) -> Result<Value, EvalError> {
    let mut map = HashMap::with_capacity(pairs.len());
    for (key_expression, value_expression) in pairs {
        let key = eval_expression(key_expression, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| EvalError::UnusableHashKey(key.type_name()))?;
        let value = eval_expression(value_expression, env)?;
        map.insert(hash_key, HashPair { key, value });
    }
    Ok(Value::Hash(map))
}

fn eval_index_expression(left: Value, index: Value) -> Result<Value, EvalError> {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => {
            if i < 0 || i as usize >= elements.len() {
                Ok(Value::Null)
            } else {
                Ok(elements[i as usize].clone())
            }
        }
        (Value::Hash(pairs), index) => {
            let key = index
                .hash_key()
                .ok_or_else(|| EvalError::UnusableHashKey(index.type_name()))?;
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null))
        }
        (left, _) => Err(EvalError::IndexOperatorNotSupported(left.type_name())),
    }
}
