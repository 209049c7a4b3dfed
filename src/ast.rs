// ABOUTME: Abstract syntax tree for Monkey programs
// Statements and expressions are closed sum types; every node keeps the token
// it originated from. Nodes render themselves back to canonical source, with
// prefix and infix forms fully parenthesized.

use crate::token::Token;
use std::fmt;

/// A parsed program: the top-level sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
}

/// A `{ ... }` statement sequence, as used by `if` arms and function and
/// macro bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    FloatLiteral {
        token: Token,
        value: f64,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    ArrayLiteral {
        token: Token,
        elements: Vec<Expression>,
    },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    MacroLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Statement::Return { value: Some(v), .. } => write!(f, "return {};", v),
            Statement::Return { value: None, .. } => write!(f, "return;"),
            Statement::Expression { expression, .. } => write!(f, "{}", expression),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::IntegerLiteral { token, .. }
            | Expression::FloatLiteral { token, .. }
            | Expression::BooleanLiteral { token, .. }
            | Expression::StringLiteral { token, .. } => write!(f, "{}", token.literal),
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral {
                parameters, body, ..
            } => write!(f, "fn({}) {}", join(parameters, ", "), body),
            Expression::MacroLiteral {
                parameters, body, ..
            } => write!(f, "macro({}) {}", join(parameters, ", "), body),
            Expression::Call {
                function,
                arguments,
                ..
            } => write!(f, "{}({})", function, join(arguments, ", ")),
            Expression::ArrayLiteral { elements, .. } => {
                write!(f, "[{}]", join(elements, ", "))
            }
            Expression::HashLiteral { pairs, .. } => {
                let rendered = pairs
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", rendered)
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

/// Rebuilds a program bottom-up, passing every expression node through `f`
/// after its children have been rebuilt. The macro engine uses this both to
/// splice `unquote` results into quoted fragments and to replace macro call
/// sites with their expansions.
pub fn modify_program<E>(
    program: Program,
    f: &mut impl FnMut(Expression) -> Result<Expression, E>,
) -> Result<Program, E> {
    let statements = program
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect::<Result<Vec<_>, E>>()?;
    Ok(Program { statements })
}

fn modify_statement<E>(
    statement: Statement,
    f: &mut impl FnMut(Expression) -> Result<Expression, E>,
) -> Result<Statement, E> {
    Ok(match statement {
        Statement::Let { token, name, value } => Statement::Let {
            token,
            name,
            value: modify_expression(value, f)?,
        },
        Statement::Return { token, value } => Statement::Return {
            token,
            value: value.map(|v| modify_expression(v, f)).transpose()?,
        },
        Statement::Expression { token, expression } => Statement::Expression {
            token,
            expression: modify_expression(expression, f)?,
        },
    })
}

fn modify_block<E>(
    block: BlockStatement,
    f: &mut impl FnMut(Expression) -> Result<Expression, E>,
) -> Result<BlockStatement, E> {
    let statements = block
        .statements
        .into_iter()
        .map(|statement| modify_statement(statement, f))
        .collect::<Result<Vec<_>, E>>()?;
    Ok(BlockStatement {
        token: block.token,
        statements,
    })
}

pub fn modify_expression<E>(
    expression: Expression,
    f: &mut impl FnMut(Expression) -> Result<Expression, E>,
) -> Result<Expression, E> {
    let rebuilt = match expression {
        Expression::Prefix {
            token,
            operator,
            right,
        } => Expression::Prefix {
            token,
            operator,
            right: Box::new(modify_expression(*right, f)?),
        },
        Expression::Infix {
            token,
            operator,
            left,
            right,
        } => Expression::Infix {
            token,
            operator,
            left: Box::new(modify_expression(*left, f)?),
            right: Box::new(modify_expression(*right, f)?),
        },
        Expression::Index { token, left, index } => Expression::Index {
            token,
            left: Box::new(modify_expression(*left, f)?),
            index: Box::new(modify_expression(*index, f)?),
        },
        Expression::If {
            token,
            condition,
            consequence,
            alternative,
        } => Expression::If {
            token,
            condition: Box::new(modify_expression(*condition, f)?),
            consequence: modify_block(consequence, f)?,
            alternative: alternative.map(|a| modify_block(a, f)).transpose()?,
        },
        Expression::FunctionLiteral {
            token,
            parameters,
            body,
        } => Expression::FunctionLiteral {
            token,
            parameters,
            body: modify_block(body, f)?,
        },
        Expression::MacroLiteral {
            token,
            parameters,
            body,
        } => Expression::MacroLiteral {
            token,
            parameters,
            body: modify_block(body, f)?,
        },
        Expression::Call {
            token,
            function,
            arguments,
        } => Expression::Call {
            token,
            function: Box::new(modify_expression(*function, f)?),
            arguments: arguments
                .into_iter()
                .map(|argument| modify_expression(argument, f))
                .collect::<Result<Vec<_>, E>>()?,
        },
        Expression::ArrayLiteral { token, elements } => Expression::ArrayLiteral {
            token,
            elements: elements
                .into_iter()
                .map(|element| modify_expression(element, f))
                .collect::<Result<Vec<_>, E>>()?,
        },
        Expression::HashLiteral { token, pairs } => Expression::HashLiteral {
            token,
            pairs: pairs
                .into_iter()
                .map(|(key, value)| {
                    Ok((modify_expression(key, f)?, modify_expression(value, f)?))
                })
                .collect::<Result<Vec<_>, E>>()?,
        },
        leaf => leaf,
    };
    f(rebuilt)
}
