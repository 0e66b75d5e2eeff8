use crate::{
    error::{CompileError, raised_at},
    frontend::{
        SourceFile,
        ast::{
            AddOperator, Block, CompUnit, EqOperator, Expression, ExpressionKind, FuncDef,
            FuncType, Identifier, MulOperator, RelOperator, Stmt, StmtKind, UnaryOperator,
        },
        lexer::{Keyword, Lexer, Span, Token, TokenKind, parse_integer_literal},
    },
};

macro_rules! parse_error {
    ($span:expr, $($message:tt)+) => {
        CompileError::Parse {
            span: $span,
            message: format!($($message)+),
            raised_at: raised_at!(),
        }
    };
}

/// Deepest expression tree the parser will build. Later stages walk the tree
/// recursively, so this bounds their stack use too.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

#[derive(Debug)]
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    depth: usize,
}

impl<'source> Parser<'source> {
    pub fn parse_comp_unit(source_file: &'source SourceFile) -> Result<CompUnit, CompileError> {
        let mut parser = Self {
            lexer: Lexer::new(source_file),
            depth: 0,
        };

        let func_def = parser.parse_function_definition()?;

        if let Some(trailing) = parser.lexer.next()? {
            return Err(parse_error!(
                trailing.span,
                "Expected end of file after function definition but found `{}`",
                parser.lexer.source().value_of_span(trailing.span)
            ));
        }

        Ok(CompUnit { func_def })
    }

    fn expect_peek(&mut self, expecting: &str) -> Result<Token, CompileError> {
        match self.lexer.peek()? {
            Some(token) => Ok(token),
            None => Err(parse_error!(
                self.lexer.eof_span(),
                "Expected {expecting} but reached end of file"
            )),
        }
    }

    fn expect_next(&mut self, expecting: &str) -> Result<Token, CompileError> {
        match self.lexer.next()? {
            Some(token) => Ok(token),
            None => Err(parse_error!(
                self.lexer.eof_span(),
                "Expected {expecting} but reached end of file"
            )),
        }
    }

    fn expect_next_to_be(&mut self, kind: TokenKind, expecting: &str) -> Result<Token, CompileError> {
        let token = self.expect_next(expecting)?;

        if token.kind != kind {
            return Err(parse_error!(
                token.span,
                "Expected {expecting} but found `{}`",
                self.lexer.source().value_of_span(token.span)
            ));
        }

        Ok(token)
    }

    /// Called once for every expression node that will sit above the one
    /// being parsed next
    fn descend(&mut self, span: Span) -> Result<(), CompileError> {
        self.depth += 1;

        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(parse_error!(
                span,
                "Expression is nested more than {MAX_EXPRESSION_DEPTH} levels deep"
            ));
        }

        Ok(())
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, CompileError> {
        self.expect_next_to_be(TokenKind::Keyword(keyword), &format!("`{keyword}`"))
    }

    /// int main() { ... }
    fn parse_function_definition(&mut self) -> Result<FuncDef, CompileError> {
        let (func_type, type_span) = self.parse_function_type()?;
        let ident = self.parse_identifier()?;

        self.expect_next_to_be(TokenKind::OpenParen, "`(`")?;
        self.expect_next_to_be(TokenKind::CloseParen, "`)`")?;

        let block = self.parse_block()?;

        Ok(FuncDef {
            span: type_span.to(block.span),
            func_type,
            ident,
            block,
        })
    }

    // int
    fn parse_function_type(&mut self) -> Result<(FuncType, Span), CompileError> {
        let token = self.expect_keyword(Keyword::Int)?;

        Ok((FuncType::Int, token.span))
    }

    // main
    fn parse_identifier(&mut self) -> Result<Identifier, CompileError> {
        let token = self.expect_next_to_be(TokenKind::Identifier, "identifier")?;

        Ok(Identifier {
            span: token.span,
            name: self.lexer.source().value_of_span(token.span).to_owned(),
        })
    }

    fn parse_block(&mut self) -> Result<Block, CompileError> {
        let open_brace = self.expect_next_to_be(TokenKind::OpenBrace, "`{`")?;
        let statement = self.parse_statement()?;
        let close_brace = self.expect_next_to_be(TokenKind::CloseBrace, "`}`")?;

        Ok(Block::new(
            open_brace.span.to(close_brace.span),
            statement,
            [],
        ))
    }

    // return 1 + 2;
    fn parse_statement(&mut self) -> Result<Stmt, CompileError> {
        let return_keyword = self.expect_keyword(Keyword::Return)?;
        let expression = self.parse_expression()?;
        let semicolon = self.expect_next_to_be(TokenKind::Semicolon, "`;`")?;

        Ok(Stmt {
            span: return_keyword.span.to(semicolon.span),
            kind: StmtKind::Return(expression),
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, CompileError> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_logical_and_expression()?;

        while self.expect_peek("logical or operator or `;`")?.kind == TokenKind::LogicalOr {
            let operator_token = self.expect_next_to_be(TokenKind::LogicalOr, "`||`")?;
            self.descend(operator_token.span)?;
            let rhs = self.parse_logical_and_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::LOr {
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_logical_and_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_equality_expression()?;

        while self.expect_peek("logical and operator or `;`")?.kind == TokenKind::LogicalAnd {
            let operator_token = self.expect_next_to_be(TokenKind::LogicalAnd, "`&&`")?;
            self.descend(operator_token.span)?;
            let rhs = self.parse_equality_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::LAnd {
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_equality_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_relational_expression()?;

        while self
            .expect_peek("equality operator or `;`")?
            .kind
            .is_equality_operator()
        {
            let operator_token = self.expect_next("equality operator")?;
            self.descend(operator_token.span)?;

            let operator = match operator_token.kind {
                TokenKind::DoubleEquals => EqOperator::Eq,
                TokenKind::NotEquals => EqOperator::Ne,
                _ => unreachable!(),
            };
            let rhs = self.parse_relational_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::Eq {
                    operator,
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_relational_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_term_expression()?;

        while self
            .expect_peek("relational operator or `;`")?
            .kind
            .is_relational_operator()
        {
            let operator_token = self.expect_next("relational operator")?;
            self.descend(operator_token.span)?;

            let operator = match operator_token.kind {
                TokenKind::LessThan => RelOperator::Lt,
                TokenKind::LessThanOrEqualTo => RelOperator::Le,
                TokenKind::GreaterThan => RelOperator::Gt,
                TokenKind::GreaterThanOrEqualTo => RelOperator::Ge,
                _ => unreachable!(),
            };
            let rhs = self.parse_term_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::Rel {
                    operator,
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_term_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_factor_expression()?;

        while self
            .expect_peek("term operator or `;`")?
            .kind
            .is_term_operator()
        {
            let operator_token = self.expect_next("term operator")?;
            self.descend(operator_token.span)?;

            let operator = match operator_token.kind {
                TokenKind::Plus => AddOperator::Add,
                TokenKind::Minus => AddOperator::Sub,
                _ => unreachable!(),
            };
            let rhs = self.parse_factor_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::Add {
                    operator,
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_factor_expression(&mut self) -> Result<Expression, CompileError> {
        let depth = self.depth;
        let mut expression = self.parse_unary_expression()?;

        while self
            .expect_peek("factor operator or `;`")?
            .kind
            .is_factor_operator()
        {
            let operator_token = self.expect_next("factor operator")?;
            self.descend(operator_token.span)?;

            let operator = match operator_token.kind {
                TokenKind::Asterisk => MulOperator::Mul,
                TokenKind::Divide => MulOperator::Div,
                TokenKind::Modulus => MulOperator::Mod,
                _ => unreachable!(),
            };
            let rhs = self.parse_unary_expression()?;

            expression = Expression {
                span: expression.span.to(rhs.span),
                kind: ExpressionKind::Mul {
                    operator,
                    lhs: Box::new(expression),
                    rhs: Box::new(rhs),
                },
            }
        }

        self.depth = depth;
        Ok(expression)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, CompileError> {
        if self.expect_peek("expression")?.kind.is_unary_operator() {
            let operator_token = self.expect_next("unary operator")?;
            self.descend(operator_token.span)?;

            let operator = match operator_token.kind {
                TokenKind::Plus => UnaryOperator::Plus,
                TokenKind::Minus => UnaryOperator::Minus,
                TokenKind::Bang => UnaryOperator::Not,
                _ => unreachable!("Unexpected unary operator"),
            };
            let operand = self.parse_unary_expression()?;
            self.depth -= 1;

            return Ok(Expression {
                span: operator_token.span.to(operand.span),
                kind: ExpressionKind::Unary {
                    operator,
                    operand: Box::new(operand),
                },
            });
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, CompileError> {
        // Grouping never produces a node of its own
        if self.expect_peek("expression")?.kind == TokenKind::OpenParen {
            let open_paren = self.expect_next_to_be(TokenKind::OpenParen, "`(`")?;
            self.descend(open_paren.span)?;

            let expression = self.parse_expression()?;
            self.expect_next_to_be(TokenKind::CloseParen, "`)`")?;
            self.depth -= 1;

            return Ok(expression);
        }

        self.parse_number()
    }

    fn parse_number(&mut self) -> Result<Expression, CompileError> {
        let token = self.expect_next("expression")?;
        let text = self.lexer.source().value_of_span(token.span);

        if token.kind != TokenKind::IntegerLiteral {
            return Err(parse_error!(
                token.span,
                "Expected expression but found `{text}`"
            ));
        }

        let value = parse_integer_literal(text)
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| {
                parse_error!(token.span, "Integer literal `{text}` does not fit in i32")
            })?;

        Ok(Expression {
            span: token.span,
            kind: ExpressionKind::Number(value),
        })
    }
}
