use crate::token::TokenKind;
use bstr::BStr;
use serde::Serialize;
use std::fmt;

/// The grammar class of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GrammarKind {
    /// Placeholder emitted for the production that failed.
    Error,
    Module,
    Token,
    Comment,
    Binding,
    Clause,
    Method,
    Param,
    Expr,
    Stmt,
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrammarKind::Error => "Error",
            GrammarKind::Module => "Module",
            GrammarKind::Token => "Token",
            GrammarKind::Comment => "Comment",
            GrammarKind::Binding => "Binding",
            GrammarKind::Clause => "Clause",
            GrammarKind::Method => "Method",
            GrammarKind::Param => "Param",
            GrammarKind::Expr => "Expr",
            GrammarKind::Stmt => "Stmt",
        };
        f.write_str(s)
    }
}

/// A node of the grammar tree.
///
/// Leaves carry the token kind and its lexeme, borrowed from the
/// source buffer; interior nodes carry an ordered child list in the
/// left-to-right order the tokens were consumed. The tree is built
/// bottom-up in a single pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Node<'s> {
    Token { kind: TokenKind, text: &'s BStr },
    Tree { kind: GrammarKind, children: Vec<Node<'s>> },
}

impl<'s> Node<'s> {
    pub(crate) fn tree(kind: GrammarKind, children: Vec<Node<'s>>) -> Node<'s> {
        Node::Tree { kind, children }
    }

    /// The empty node standing in for a failed production.
    pub(crate) fn error() -> Node<'s> {
        Node::Tree {
            kind: GrammarKind::Error,
            children: Vec::new(),
        }
    }

    pub fn grammar(&self) -> GrammarKind {
        match self {
            Node::Token { .. } => GrammarKind::Token,
            Node::Tree { kind, .. } => *kind,
        }
    }

    pub fn children(&self) -> &[Node<'s>] {
        match self {
            Node::Token { .. } => &[],
            Node::Tree { children, .. } => children,
        }
    }

    pub(crate) fn into_children(self) -> Vec<Node<'s>> {
        match self {
            Node::Token { .. } => Vec::new(),
            Node::Tree { children, .. } => children,
        }
    }

    /// The token kind and lexeme of a leaf, or `None` for an interior
    /// node.
    pub fn token(&self) -> Option<(TokenKind, &'s BStr)> {
        match self {
            Node::Token { kind, text } => Some((*kind, *text)),
            Node::Tree { .. } => None,
        }
    }

    /// Preorder traversal of the node and all of its descendants.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Node<'s>),
    {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

/// Canonical textual form: a leaf renders as its lexeme, an interior
/// node as `Kind( child child … )`, and the module as its children
/// joined by spaces without a wrapper.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Token { text, .. } => write!(f, "{}", text),
            Node::Tree { kind, children } => {
                if *kind != GrammarKind::Module {
                    write!(f, "{}(", kind)?;
                }
                for (i, child) in children.iter().enumerate() {
                    if 0 < i {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", child)?;
                }
                if *kind != GrammarKind::Module {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}
