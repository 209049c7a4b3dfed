// ABOUTME: Macro engine: definition collection, call-site expansion, quote/unquote

use crate::ast::{self, BlockStatement, Expression, Identifier, Program, Statement};
use crate::env::Environment;
use crate::error::EvalError;
use crate::eval;
use crate::token::{Token, TokenKind};
use crate::value::Value;
use std::rc::Rc;

/// First pass: collects every top-level `let <name> = macro(...) { ... };`
/// into the macro environment and removes it from the program, so no macro
/// value ever reaches the evaluator. Only top-level definitions count;
/// macro literals anywhere else are left in place.
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    let statements = std::mem::take(&mut program.statements);
    program.statements = statements
        .into_iter()
        .filter(|statement| !try_define_macro(statement, env))
        .collect();
}

fn try_define_macro(statement: &Statement, env: &Rc<Environment>) -> bool {
    if let Statement::Let {
        name,
        value:
            Expression::MacroLiteral {
                parameters, body, ..
            },
        ..
    } = statement
    {
        env.set(
            name.value.clone(),
            Value::Macro {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            },
        );
        true
    } else {
        false
    }
}

/// Second pass: walks the (definition-free) program bottom-up and replaces
/// every call to a defined macro with the AST its body returns. Arguments are
/// handed to the body unevaluated, wrapped as quote values; the body must
/// evaluate to a quote, whose inner node replaces the call site.
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Result<Program, EvalError> {
    ast::modify_program(program, &mut |expression| {
        let Some((parameters, body, macro_env, arguments)) = macro_call(&expression, env) else {
            return Ok(expression);
        };

        if parameters.len() != arguments.len() {
            return Err(EvalError::wrong_arguments(parameters.len(), arguments.len()));
        }

        let eval_env = Environment::new_enclosed(macro_env);
        for (parameter, argument) in parameters.iter().zip(arguments) {
            eval_env.set(parameter.value.clone(), Value::Quote(argument));
        }

        match unwrap_return_value(eval::eval_block(&body, &eval_env)?) {
            Value::Quote(node) => Ok(node),
            other => Err(EvalError::NonQuoteMacroResult(other.type_name())),
        }
    })
}

/// Resolves a call expression to a macro binding by callee name. Returns the
/// macro's definition plus the unevaluated argument expressions.
fn macro_call(
    expression: &Expression,
    env: &Rc<Environment>,
) -> Option<(
    Vec<Identifier>,
    BlockStatement,
    Rc<Environment>,
    Vec<Expression>,
)> {
    if let Expression::Call {
        function,
        arguments,
        ..
    } = expression
    {
        if let Expression::Identifier(identifier) = function.as_ref() {
            if let Some(Value::Macro {
                parameters,
                body,
                env: macro_env,
            }) = env.get(&identifier.value)
            {
                return Some((parameters, body, macro_env, arguments.clone()));
            }
        }
    }
    None
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(inner) => *inner,
        other => other,
    }
}

/// Implements `quote(expr)`: substitutes every `unquote(e)` call inside the
/// fragment with the AST form of evaluating `e` against `env`, then wraps the
/// result as a quote value. The substitution is a single bottom-up walk.
pub fn quote(expression: Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let processed = eval_unquote_calls(expression, env)?;
    Ok(Value::Quote(processed))
}

fn eval_unquote_calls(
    expression: Expression,
    env: &Rc<Environment>,
) -> Result<Expression, EvalError> {
    ast::modify_expression(expression, &mut |expression| {
        let Expression::Call {
            ref function,
            ref arguments,
            ..
        } = expression
        else {
            return Ok(expression);
        };
        if !matches!(function.as_ref(), Expression::Identifier(identifier) if identifier.value == "unquote")
        {
            return Ok(expression);
        }
        if arguments.len() != 1 {
            return Err(EvalError::wrong_arguments(1, arguments.len()));
        }
        let value = eval::eval_expression(&arguments[0], env)?;
        value_to_expression(value)
    })
}

/// Converts an evaluation result back into an AST node so it can be spliced
/// into the quoted fragment. Integers, booleans and quotes have a natural
/// AST form; anything else is rejected.
fn value_to_expression(value: Value) -> Result<Expression, EvalError> {
    match value {
        Value::Integer(value) => Ok(Expression::IntegerLiteral {
            token: Token::new(TokenKind::Int, value.to_string()),
            value,
        }),
        Value::Boolean(value) => {
            let token = if value {
                Token::new(TokenKind::True, "true")
            } else {
                Token::new(TokenKind::False, "false")
            };
            Ok(Expression::BooleanLiteral { token, value })
        }
        Value::Quote(node) => Ok(node),
        other => Err(EvalError::UnsupportedArgument {
            builtin: "unquote",
            actual: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(input: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(parser.errors(), &[] as &[String], "input: {}", input);
        program
    }

    #[test]
    fn test_define_macros_removes_only_macro_definitions() {
        let input = "let number = 1;
let function = fn(x, y) { x + y };
let mymacro = macro(x, y) { x + y; };";

        let mut program = parse(input);
        let env = Environment::new();
        define_macros(&mut program, &env);

        assert_eq!(program.statements.len(), 2);
        assert!(env.get("number").is_none());
        assert!(env.get("function").is_none());
        assert!(matches!(env.get("mymacro"), Some(Value::Macro { .. })));
    }

    #[test]
    fn test_defined_macro_captures_parameters_and_body() {
        let mut program = parse("let mymacro = macro(x, y) { x + y; };");
        let env = Environment::new();
        define_macros(&mut program, &env);

        match env.get("mymacro") {
            Some(Value::Macro {
                parameters, body, ..
            }) => {
                assert_eq!(parameters.len(), 2);
                assert_eq!(parameters[0].value, "x");
                assert_eq!(parameters[1].value, "y");
                assert_eq!(body.to_string(), "(x + y)");
            }
            other => panic!("expected macro binding, got {:?}", other),
        }
    }

    #[test]
    fn test_expand_macros_rewrites_call_sites() {
        let tests = [
            (
                "let infixExpression = macro() { quote(1 + 2); }; infixExpression();",
                "(1 + 2)",
            ),
            (
                "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); }; reverse(2 + 2, 10 - 5);",
                "((10 - 5) - (2 + 2))",
            ),
        ];

        for (input, expected) in tests {
            let mut program = parse(input);
            let env = Environment::new();
            define_macros(&mut program, &env);
            let expanded = expand_macros(program, &env).unwrap();
            assert_eq!(expanded.to_string(), expected);
        }
    }

    #[test]
    fn test_expand_macros_reports_non_quote_results() {
        let mut program = parse("let bad = macro() { 1 + 2; }; bad();");
        let env = Environment::new();
        define_macros(&mut program, &env);
        assert_eq!(
            expand_macros(program, &env),
            Err(EvalError::NonQuoteMacroResult("INTEGER"))
        );
    }
}
