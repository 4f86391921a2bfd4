use crate::ast::{GrammarKind, Node};
use crate::parser::Parser;
use crate::parser_diagnostics::{expected_list, ParseError};
use crate::token::{Token, TokenKind};
use bstr::BStr;

/// Parses a module from raw source bytes and returns the grammar tree
/// together with the first diagnostic, if any. The tree borrows every
/// token lexeme from `source`.
pub fn parse(source: &[u8]) -> (Node<'_>, Option<ParseError>) {
    let mut parser = Parser::new(source);
    let module = parser.parse_module();
    (module, parser.err)
}

/// Context for the expression routine. Later modes accept strictly
/// fewer constructs; the `>=` comparisons in `parse_expr` rely on
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ExprMode {
    /// permits commas and all operators
    Regular,
    /// like `Regular`, but `while` is not absorbed as an identifier
    DoWhileRegular,
    /// no top-level commas
    Assignment,
    /// member access, calls, `new`, literals and identifiers only
    LeftHandSide,
    /// `LeftHandSide` with object literals also rejected
    ClassLeftHandSide,
}

impl<'s> Parser<'s> {
    fn new(source: &'s [u8]) -> Parser<'s> {
        let mut parser = Parser {
            source,
            pos: 0,
            // dummy value, replaced by the first bump
            next_token: Token {
                kind: TokenKind::Eof,
                text: BStr::new(b""),
            },
            prev_line_terminator: false,
            err: None,
        };
        parser.bump();
        parser
    }

    /// Latches the first diagnostic and poisons the look-ahead so all
    /// further productions are inert.
    fn fail(&mut self, context: &'static str, expected: &[TokenKind]) {
        if self.err.is_some() || self.next_token.kind == TokenKind::Error {
            return;
        }
        let found = self.next_token.text.to_owned();
        let offset = self.pos - self.next_token.text.len();
        self.err = Some(if expected.is_empty() {
            ParseError::UnexpectedToken {
                found,
                context,
                offset,
            }
        } else {
            ParseError::ExpectedToken {
                expected: expected_list(expected),
                found,
                context,
                offset,
            }
        });
        self.next_token = Token {
            kind: TokenKind::Error,
            text: BStr::new(b""),
        };
    }

    /// Consumes the look-ahead when it has the given kind, discarding
    /// it from the tree; fails otherwise.
    fn consume(&mut self, context: &'static str, kind: TokenKind) -> bool {
        if self.next_token.kind != kind {
            self.fail(context, &[kind]);
            return false;
        }
        self.bump();
        true
    }

    /// Consumes the look-ahead into a leaf node.
    fn parse_token(&mut self) -> Node<'s> {
        let token = self.bump();
        Node::Token {
            kind: token.kind,
            text: token.text,
        }
    }

    fn parse_module(&mut self) -> Node<'s> {
        let mut nodes = Vec::new();
        loop {
            match self.next_token.kind {
                TokenKind::Error | TokenKind::Eof => {
                    return Node::tree(GrammarKind::Module, nodes);
                }
                TokenKind::Import | TokenKind::Export => {
                    self.fail("module", &[]);
                    nodes.push(Node::error());
                }
                _ => nodes.push(self.parse_stmt()),
            }
        }
    }

    fn parse_stmt(&mut self) -> Node<'s> {
        let mut nodes = Vec::new();
        match self.next_token.kind {
            TokenKind::OpenBrace => return self.parse_block_stmt("block statement"),
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                self.parse_var_decl(&mut nodes);
            }
            // ContinueStatement : continue [no LineTerminator here] LabelIdentifier? ;
            TokenKind::Continue | TokenKind::Break => {
                nodes.push(self.parse_token());
                if !self.prev_line_terminator
                    && matches!(
                        self.next_token.kind,
                        TokenKind::Ident | TokenKind::Yield | TokenKind::Await
                    )
                {
                    nodes.push(self.parse_token());
                }
            }
            // ReturnStatement : return [no LineTerminator here] Expression? ;
            TokenKind::Return => {
                nodes.push(self.parse_token());
                if !self.prev_line_terminator
                    && !matches!(
                        self.next_token.kind,
                        TokenKind::Semicolon
                            | TokenKind::CloseBrace
                            | TokenKind::Error
                            | TokenKind::Eof
                    )
                {
                    nodes.push(self.parse_expr(ExprMode::Regular));
                }
            }
            TokenKind::If => {
                nodes.push(self.parse_token());
                if !self.consume("if statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
                if !self.consume("if statement", TokenKind::CloseParen) {
                    return Node::error();
                }
                nodes.push(self.parse_stmt());
                if self.next_token.kind == TokenKind::Else {
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_stmt());
                }
            }
            TokenKind::With => {
                nodes.push(self.parse_token());
                if !self.consume("with statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
                if !self.consume("with statement", TokenKind::CloseParen) {
                    return Node::error();
                }
                nodes.push(self.parse_stmt());
            }
            // IterationStatement : do Statement while ( Expression ) ;
            TokenKind::Do => {
                nodes.push(self.parse_token());
                nodes.push(self.parse_stmt());
                if self.next_token.kind != TokenKind::While {
                    self.fail("do statement", &[TokenKind::While]);
                    return Node::error();
                }
                nodes.push(self.parse_token());
                if !self.consume("do statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
                if !self.consume("do statement", TokenKind::CloseParen) {
                    return Node::error();
                }
            }
            TokenKind::While => {
                nodes.push(self.parse_token());
                if !self.consume("while statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
                if !self.consume("while statement", TokenKind::CloseParen) {
                    return Node::error();
                }
                nodes.push(self.parse_stmt());
            }
            TokenKind::For => {
                nodes.push(self.parse_token());
                if self.next_token.kind == TokenKind::Await {
                    nodes.push(self.parse_token());
                }
                if !self.consume("for statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                if matches!(
                    self.next_token.kind,
                    TokenKind::Var | TokenKind::Let | TokenKind::Const
                ) {
                    let mut decl = Vec::new();
                    self.parse_var_decl(&mut decl);
                    nodes.push(Node::tree(GrammarKind::Stmt, decl));
                } else {
                    nodes.push(self.parse_expr(ExprMode::LeftHandSide));
                }
                if self.next_token.kind == TokenKind::Semicolon {
                    self.bump();
                    nodes.push(self.parse_expr(ExprMode::Regular));
                    if !self.consume("for statement", TokenKind::Semicolon) {
                        return Node::error();
                    }
                    nodes.push(self.parse_expr(ExprMode::Regular));
                } else if self.next_token.kind == TokenKind::In {
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_expr(ExprMode::Regular));
                } else if self.next_token.kind == TokenKind::Ident && self.next_token.text == "of"
                {
                    // note: a single assignment expression, no commas
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_expr(ExprMode::Assignment));
                } else {
                    self.fail(
                        "for statement",
                        &[TokenKind::In, TokenKind::Of, TokenKind::Semicolon],
                    );
                    return Node::error();
                }
                if !self.consume("for statement", TokenKind::CloseParen) {
                    return Node::error();
                }
                nodes.push(self.parse_stmt());
            }
            TokenKind::Ident | TokenKind::Yield | TokenKind::Await => {
                // expression or labelled statement: parse an expression
                // first and retract it when a lone identifier turns out
                // to be followed by ':'
                let expr = self.parse_expr(ExprMode::DoWhileRegular);
                if self.next_token.kind == TokenKind::Colon && expr.children().len() == 1 {
                    let mut children = expr.into_children();
                    nodes.push(children.pop().unwrap());
                    self.bump(); // the ':' does not appear in the tree
                    nodes.push(self.parse_stmt());
                } else {
                    nodes.push(expr);
                }
            }
            TokenKind::Switch => {
                nodes.push(self.parse_token());
                if !self.consume("switch statement", TokenKind::OpenParen) {
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
                if !self.consume("switch statement", TokenKind::CloseParen) {
                    return Node::error();
                }

                // case block
                if !self.consume("switch statement", TokenKind::OpenBrace) {
                    return Node::error();
                }
                while !matches!(self.next_token.kind, TokenKind::Error | TokenKind::Eof) {
                    if self.next_token.kind == TokenKind::CloseBrace {
                        self.bump();
                        break;
                    }

                    let mut clause = Vec::new();
                    if self.next_token.kind == TokenKind::Case {
                        clause.push(self.parse_token());
                        clause.push(self.parse_expr(ExprMode::Regular));
                    } else if self.next_token.kind == TokenKind::Default {
                        clause.push(self.parse_token());
                    } else {
                        self.fail(
                            "switch statement",
                            &[TokenKind::Case, TokenKind::Default],
                        );
                        return Node::error();
                    }
                    if !self.consume("switch statement", TokenKind::Colon) {
                        return Node::error();
                    }
                    while !matches!(
                        self.next_token.kind,
                        TokenKind::Case
                            | TokenKind::Default
                            | TokenKind::CloseBrace
                            | TokenKind::Error
                            | TokenKind::Eof
                    ) {
                        clause.push(self.parse_stmt());
                    }
                    nodes.push(Node::tree(GrammarKind::Clause, clause));
                }
            }
            TokenKind::Function => {
                self.parse_func_decl(&mut nodes);
            }
            TokenKind::Async => {
                // async function
                nodes.push(self.parse_token());
                if self.next_token.kind != TokenKind::Function {
                    self.fail("async function statement", &[TokenKind::Function]);
                    return Node::error();
                }
                self.parse_func_decl(&mut nodes);
            }
            TokenKind::Class => {
                self.parse_class_decl(&mut nodes);
            }
            // ThrowStatement : throw [no LineTerminator here] Expression ;
            TokenKind::Throw => {
                nodes.push(self.parse_token());
                if self.prev_line_terminator {
                    self.fail("throw statement", &[]);
                    return Node::error();
                }
                nodes.push(self.parse_expr(ExprMode::Regular));
            }
            TokenKind::Try => {
                nodes.push(self.parse_token());
                nodes.push(self.parse_block_stmt("try statement"));

                if self.next_token.kind == TokenKind::Catch {
                    nodes.push(self.parse_token());
                    if self.next_token.kind == TokenKind::OpenParen {
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_binding());
                        if self.next_token.kind != TokenKind::CloseParen {
                            self.fail("catch statement", &[TokenKind::CloseParen]);
                            return Node::error();
                        }
                        nodes.push(self.parse_token());
                    }
                    nodes.push(self.parse_block_stmt("catch statement"));
                }
                if self.next_token.kind == TokenKind::Finally {
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_block_stmt("finally statement"));
                }
            }
            TokenKind::Debugger => {
                nodes.push(self.parse_token());
            }
            TokenKind::Semicolon => {
                // empty statement
            }
            TokenKind::Error => return Node::error(),
            _ => {
                let expr = self.parse_expr(ExprMode::DoWhileRegular);
                if !expr.children().is_empty() {
                    nodes.push(expr);
                } else {
                    self.fail("statement", &[]);
                    return Node::error();
                }
            }
        }
        if self.next_token.kind == TokenKind::Semicolon {
            self.bump();
        }
        Node::tree(GrammarKind::Stmt, nodes)
    }

    // VariableDeclarationList : VariableDeclaration ( , VariableDeclaration )*
    fn parse_var_decl(&mut self, nodes: &mut Vec<Node<'s>>) {
        // the look-ahead is var, let or const
        nodes.push(self.parse_token());
        loop {
            nodes.push(self.parse_binding());
            if self.next_token.kind == TokenKind::Eq {
                nodes.push(self.parse_token());
                nodes.push(self.parse_expr(ExprMode::Assignment));
            }
            if self.next_token.kind != TokenKind::Comma {
                break;
            }
            nodes.push(self.parse_token());
        }
    }

    fn parse_func_decl(&mut self, nodes: &mut Vec<Node<'s>>) {
        // the look-ahead is function
        nodes.push(self.parse_token());
        if self.next_token.kind == TokenKind::Mul {
            nodes.push(self.parse_token());
        }
        if matches!(
            self.next_token.kind,
            TokenKind::Ident | TokenKind::Yield | TokenKind::Await
        ) {
            nodes.push(self.parse_token());
        }
        self.parse_func_params("function declaration", nodes);
        nodes.push(self.parse_block_stmt("function declaration"));
    }

    fn parse_func_params(&mut self, context: &'static str, nodes: &mut Vec<Node<'s>>) {
        if !self.consume(context, TokenKind::OpenParen) {
            return;
        }

        while self.next_token.kind != TokenKind::CloseParen {
            let mut param = Vec::new();
            // BindingRestElement
            if self.next_token.kind == TokenKind::Ellipsis {
                param.push(self.parse_token());
                param.push(self.parse_binding());
                nodes.push(Node::tree(GrammarKind::Param, param));
                break;
            }

            // BindingElement with an optional initialiser
            param.push(self.parse_binding());
            if self.next_token.kind == TokenKind::Eq {
                param.push(self.parse_token());
                param.push(self.parse_expr(ExprMode::Assignment));
            }
            nodes.push(Node::tree(GrammarKind::Param, param));

            if self.next_token.kind == TokenKind::Comma {
                self.bump();
            } else if self.next_token.kind == TokenKind::CloseParen {
                break;
            } else {
                self.fail(context, &[TokenKind::Comma, TokenKind::CloseParen]);
                return;
            }
        }
        self.consume(context, TokenKind::CloseParen);
    }

    fn parse_block_stmt(&mut self, context: &'static str) -> Node<'s> {
        if self.next_token.kind != TokenKind::OpenBrace {
            self.fail(context, &[TokenKind::OpenBrace]);
            return Node::error();
        }
        let mut nodes = Vec::new();
        nodes.push(self.parse_token());
        while !matches!(self.next_token.kind, TokenKind::Error | TokenKind::Eof) {
            if self.next_token.kind == TokenKind::CloseBrace {
                nodes.push(self.parse_token());
                break;
            }
            nodes.push(self.parse_stmt());
        }
        Node::tree(GrammarKind::Stmt, nodes)
    }

    fn parse_class_decl(&mut self, nodes: &mut Vec<Node<'s>>) {
        // the look-ahead is class
        nodes.push(self.parse_token());
        if matches!(
            self.next_token.kind,
            TokenKind::Ident | TokenKind::Yield | TokenKind::Await
        ) {
            nodes.push(self.parse_token());
        }
        if self.next_token.kind == TokenKind::Extends {
            nodes.push(self.parse_token());
            nodes.push(self.parse_expr(ExprMode::ClassLeftHandSide));
        }

        if !self.consume("class statement", TokenKind::OpenBrace) {
            return;
        }
        while !matches!(self.next_token.kind, TokenKind::Error | TokenKind::Eof) {
            if self.next_token.kind == TokenKind::Semicolon {
                self.bump();
                continue;
            } else if self.next_token.kind == TokenKind::CloseBrace {
                break;
            }

            let method = if self.next_token.kind == TokenKind::Static {
                let static_token = self.parse_token();
                let mut method = self.parse_method_def();
                if let Node::Tree { children, .. } = &mut method {
                    children.insert(0, static_token);
                }
                method
            } else {
                self.parse_method_def()
            };
            nodes.push(method);
        }
        self.consume("class statement", TokenKind::CloseBrace);
    }

    /// Consumes the name-like prefix of a method definition: any run
    /// of `*`, `async`, `get`, `set`, identifiers, keywords, string
    /// or numeric names, and bracketed computed names, stopping at
    /// the `(` of the parameter list or at the element's follower.
    fn parse_method_def_start(&mut self, context: &'static str, nodes: &mut Vec<Node<'s>>) {
        loop {
            let kind = self.next_token.kind;
            if matches!(kind, TokenKind::Mul | TokenKind::String | TokenKind::Numeric)
                || kind.is_identifier()
            {
                nodes.push(self.parse_token());
            } else if kind == TokenKind::OpenBracket {
                // ComputedPropertyName
                nodes.push(self.parse_token());
                nodes.push(self.parse_expr(ExprMode::LeftHandSide));
                if self.next_token.kind != TokenKind::CloseBracket {
                    self.fail(context, &[TokenKind::CloseBracket]);
                    return;
                }
                nodes.push(self.parse_token());
            } else {
                if nodes.is_empty() {
                    self.fail(
                        context,
                        &[
                            TokenKind::Mul,
                            TokenKind::Get,
                            TokenKind::Set,
                            TokenKind::Async,
                            TokenKind::Ident,
                            TokenKind::String,
                            TokenKind::Numeric,
                            TokenKind::OpenBracket,
                        ],
                    );
                }
                return;
            }
        }
    }

    fn parse_method_def(&mut self) -> Node<'s> {
        let mut nodes = Vec::new();
        self.parse_method_def_start("method definition", &mut nodes);
        self.parse_func_params("method definition", &mut nodes);
        nodes.push(self.parse_block_stmt("method definition"));
        Node::tree(GrammarKind::Method, nodes)
    }

    /// BindingIdentifier, ArrayBindingPattern or ObjectBindingPattern.
    fn parse_binding(&mut self) -> Node<'s> {
        let mut nodes = Vec::new();
        match self.next_token.kind {
            TokenKind::Ident | TokenKind::Yield | TokenKind::Await => {
                nodes.push(self.parse_token());
            }
            TokenKind::OpenBracket => {
                nodes.push(self.parse_token());
                loop {
                    // elision
                    while self.next_token.kind == TokenKind::Comma {
                        nodes.push(self.parse_token());
                    }
                    // BindingRestElement
                    if self.next_token.kind == TokenKind::Ellipsis {
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_binding());
                        if self.next_token.kind != TokenKind::CloseBracket {
                            self.fail("array binding pattern", &[TokenKind::CloseBracket]);
                            return Node::error();
                        }
                        break;
                    }

                    // BindingElement with an optional initialiser
                    nodes.push(self.parse_binding());
                    if self.next_token.kind == TokenKind::Eq {
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_expr(ExprMode::Assignment));
                    }

                    if self.next_token.kind == TokenKind::CloseBracket {
                        break;
                    } else if self.next_token.kind != TokenKind::Comma {
                        self.fail("array binding pattern", &[TokenKind::Comma]);
                        return Node::error();
                    }
                    nodes.push(self.parse_token());
                }
                nodes.push(self.parse_token());
            }
            TokenKind::OpenBrace => {
                nodes.push(self.parse_token());
                loop {
                    // BindingRestProperty
                    if self.next_token.kind == TokenKind::Ellipsis {
                        nodes.push(self.parse_token());
                        if !matches!(
                            self.next_token.kind,
                            TokenKind::Ident | TokenKind::Yield | TokenKind::Await
                        ) {
                            self.fail(
                                "object binding pattern",
                                &[TokenKind::Ident, TokenKind::Yield, TokenKind::Await],
                            );
                            return Node::error();
                        }
                        nodes.push(self.parse_token());
                        if self.next_token.kind != TokenKind::CloseBrace {
                            self.fail("object binding pattern", &[TokenKind::CloseBrace]);
                            return Node::error();
                        }
                        break;
                    }

                    if self.next_token.kind == TokenKind::OpenBracket {
                        // ComputedPropertyName; at this position a '['
                        // cannot open an array pattern
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_expr(ExprMode::Assignment));
                        if self.next_token.kind != TokenKind::CloseBracket {
                            self.fail("object binding pattern", &[TokenKind::CloseBracket]);
                            return Node::error();
                        }
                        nodes.push(self.parse_token());
                        if self.next_token.kind != TokenKind::Colon {
                            self.fail("object binding pattern", &[TokenKind::Colon]);
                            return Node::error();
                        }
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_binding());
                    } else {
                        // BindingProperty: parse a binding first and
                        // turn it into a property name if ':' follows
                        let prev = self.parse_binding();
                        nodes.extend(prev.into_children());
                        if self.next_token.kind == TokenKind::Colon {
                            nodes.push(self.parse_token());
                            nodes.push(self.parse_binding());
                        }
                    }
                    if self.next_token.kind == TokenKind::Eq {
                        nodes.push(self.parse_token());
                        nodes.push(self.parse_expr(ExprMode::Assignment));
                    }

                    if self.next_token.kind == TokenKind::CloseBrace {
                        break;
                    } else if self.next_token.kind != TokenKind::Comma {
                        self.fail("object binding pattern", &[TokenKind::Comma]);
                        return Node::error();
                    }
                    nodes.push(self.parse_token());
                }
                nodes.push(self.parse_token());
            }
            _ => {
                self.fail("binding", &[]);
                return Node::error();
            }
        }
        Node::tree(GrammarKind::Binding, nodes)
    }

    fn parse_expr(&mut self, et: ExprMode) -> Node<'s> {
        let mut nodes = Vec::new();

        // a '/' or '/=' where an expression must begin is a regular
        // expression literal
        if matches!(self.next_token.kind, TokenKind::Div | TokenKind::DivEq) {
            self.rescan_regexp();
        }

        loop {
            match self.next_token.kind {
                TokenKind::Or
                | TokenKind::And
                | TokenKind::BitOr
                | TokenKind::BitXor
                | TokenKind::BitAnd
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::EqEqEq
                | TokenKind::NotEqEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::LtLt
                | TokenKind::GtGt
                | TokenKind::GtGtGt
                | TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Mod
                | TokenKind::Exp
                | TokenKind::Not
                | TokenKind::BitNot
                | TokenKind::Incr
                | TokenKind::Decr
                | TokenKind::Instanceof
                | TokenKind::In
                | TokenKind::Typeof
                | TokenKind::Void
                | TokenKind::Delete => {
                    if et >= ExprMode::LeftHandSide {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                    nodes.push(self.parse_token());
                }
                TokenKind::Eq
                | TokenKind::MulEq
                | TokenKind::DivEq
                | TokenKind::ModEq
                | TokenKind::ExpEq
                | TokenKind::AddEq
                | TokenKind::SubEq
                | TokenKind::LtLtEq
                | TokenKind::GtGtEq
                | TokenKind::GtGtGtEq
                | TokenKind::BitAndEq
                | TokenKind::BitXorEq
                | TokenKind::BitOrEq => {
                    // the left-hand side is allowed to be a full
                    // assignment expression here, which is a superset
                    if et >= ExprMode::LeftHandSide {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_expr(ExprMode::Assignment));
                    if et >= ExprMode::Assignment || self.next_token.kind != TokenKind::Comma {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                }
                TokenKind::New
                | TokenKind::Dot
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Numeric
                | TokenKind::String
                | TokenKind::Template
                | TokenKind::RegExp
                | TokenKind::Await
                | TokenKind::Ident => {
                    nodes.push(self.parse_token());
                }
                TokenKind::Comma => {
                    if et >= ExprMode::Assignment {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                    nodes.push(self.parse_token());
                }
                // ConditionalExpression : ShortCircuitExpression ? AssignmentExpression : AssignmentExpression
                TokenKind::Question => {
                    if et >= ExprMode::LeftHandSide {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_expr(ExprMode::Assignment));
                    if self.next_token.kind != TokenKind::Colon {
                        self.fail("conditional expression", &[TokenKind::Colon]);
                        return Node::error();
                    }
                    nodes.push(self.parse_token());
                    nodes.push(self.parse_expr(ExprMode::Assignment));
                    if et >= ExprMode::Assignment || self.next_token.kind != TokenKind::Comma {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                }
                TokenKind::OpenBracket => {
                    // array literal and [expression]
                    nodes.push(self.parse_token());
                    while !matches!(
                        self.next_token.kind,
                        TokenKind::CloseBracket | TokenKind::Error | TokenKind::Eof
                    ) {
                        if matches!(
                            self.next_token.kind,
                            TokenKind::Ellipsis | TokenKind::Comma
                        ) {
                            nodes.push(self.parse_token());
                        } else {
                            nodes.push(self.parse_expr(ExprMode::Assignment));
                        }
                    }
                    nodes.push(self.parse_token());
                }
                TokenKind::OpenBrace => {
                    if et == ExprMode::ClassLeftHandSide {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }

                    // object literal
                    nodes.push(self.parse_token());
                    while !matches!(
                        self.next_token.kind,
                        TokenKind::CloseBrace | TokenKind::Error | TokenKind::Eof
                    ) {
                        if self.next_token.kind == TokenKind::Ellipsis {
                            nodes.push(self.parse_token());
                            nodes.push(self.parse_expr(ExprMode::Assignment));
                        } else if self.next_token.kind == TokenKind::Comma {
                            nodes.push(self.parse_token());
                        } else {
                            let mut method = Vec::new();
                            self.parse_method_def_start("object literal", &mut method);
                            if matches!(self.next_token.kind, TokenKind::Eq | TokenKind::Colon) {
                                // property with an initialiser
                                nodes.append(&mut method);
                                nodes.push(self.parse_token());
                                nodes.push(self.parse_expr(ExprMode::Assignment));
                            } else if !matches!(
                                self.next_token.kind,
                                TokenKind::Comma | TokenKind::CloseBrace
                            ) {
                                self.parse_func_params("method definition", &mut method);
                                method.push(self.parse_block_stmt("method definition"));
                                nodes.push(Node::tree(GrammarKind::Method, method));
                            } else {
                                // identifier reference or shorthand
                                nodes.append(&mut method);
                            }
                        }
                    }
                    nodes.push(self.parse_token());
                }
                TokenKind::OpenParen => {
                    // arguments, parenthesized expression and arrow parameter list
                    nodes.push(self.parse_token());
                    while !matches!(
                        self.next_token.kind,
                        TokenKind::CloseParen | TokenKind::Error | TokenKind::Eof
                    ) {
                        if self.next_token.kind == TokenKind::Ellipsis {
                            nodes.push(self.parse_token());
                            nodes.push(self.parse_binding());
                        } else if self.next_token.kind == TokenKind::Comma {
                            nodes.push(self.parse_token());
                        } else {
                            nodes.push(self.parse_expr(ExprMode::Assignment));
                        }
                    }
                    nodes.push(self.parse_token());
                }
                TokenKind::Class => {
                    self.parse_class_decl(&mut nodes);
                }
                TokenKind::Function => {
                    self.parse_func_decl(&mut nodes);
                }
                TokenKind::Arrow => {
                    if et >= ExprMode::LeftHandSide {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                    nodes.push(self.parse_token());
                    if self.next_token.kind == TokenKind::OpenBrace {
                        nodes.push(self.parse_block_stmt("arrow function"));
                    } else {
                        nodes.push(self.parse_expr(ExprMode::Assignment));
                    }
                    if et >= ExprMode::Assignment || self.next_token.kind != TokenKind::Comma {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                }
                TokenKind::Async => {
                    // async function expression or async arrow
                    nodes.push(self.parse_token());
                    if !self.prev_line_terminator {
                        if self.next_token.kind == TokenKind::Function {
                            self.parse_func_decl(&mut nodes);
                        } else if et >= ExprMode::LeftHandSide {
                            self.fail("async function statement", &[TokenKind::Function]);
                            return Node::error();
                        } else if self.next_token.kind == TokenKind::Arrow {
                            nodes.push(self.parse_token());
                            if self.next_token.kind == TokenKind::OpenBrace {
                                nodes.push(self.parse_block_stmt("arrow function"));
                            } else {
                                nodes.push(self.parse_expr(ExprMode::Assignment));
                            }
                            if et >= ExprMode::Assignment
                                || self.next_token.kind != TokenKind::Comma
                            {
                                return Node::tree(GrammarKind::Expr, nodes);
                            }
                        } else {
                            self.fail(
                                "async function statement",
                                &[TokenKind::Function, TokenKind::Arrow],
                            );
                            return Node::error();
                        }
                    }
                }
                // YieldExpression : yield [no LineTerminator here] *? AssignmentExpression
                TokenKind::Yield => {
                    nodes.push(self.parse_token());
                    if !self.prev_line_terminator {
                        if self.next_token.kind == TokenKind::Mul {
                            nodes.push(self.parse_token());
                            nodes.push(self.parse_expr(ExprMode::Assignment));
                        } else {
                            let expr = self.parse_expr(ExprMode::Assignment);
                            if !expr.children().is_empty() {
                                nodes.push(expr);
                            }
                        }
                    }
                    if et >= ExprMode::Assignment || self.next_token.kind != TokenKind::Comma {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                }
                _ => {
                    let kind = self.next_token.kind;
                    if kind.is_identifier()
                        && (kind != TokenKind::While || et != ExprMode::DoWhileRegular)
                    {
                        // keywords are allowed in identifier position
                        nodes.push(self.parse_token());
                    } else {
                        return Node::tree(GrammarKind::Expr, nodes);
                    }
                }
            }
        }
    }
}
