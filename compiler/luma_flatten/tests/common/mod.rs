//! Syntax tree builders and output normalization shared by the
//! integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use luma_ir::{SyntaxKind as K, SyntaxNode};

pub fn name(text: &str) -> SyntaxNode {
    SyntaxNode::leaf(K::Name, text)
}

pub fn num(text: &str) -> SyntaxNode {
    SyntaxNode::leaf(K::Number, text)
}

pub fn string(text: &str) -> SyntaxNode {
    SyntaxNode::leaf(K::String, text)
}

pub fn token(kind: K) -> SyntaxNode {
    SyntaxNode::token(kind)
}

pub fn node(kind: K, children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::node(kind, children)
}

pub fn chunk(statements: Vec<SyntaxNode>) -> SyntaxNode {
    node(K::Chunk, statements)
}

pub fn local(names: &[&str], values: Vec<SyntaxNode>) -> SyntaxNode {
    let names = node(K::NameList, names.iter().map(|n| name(n)).collect());
    if values.is_empty() {
        node(K::LocalAssignment, vec![names])
    } else {
        node(K::LocalAssignment, vec![names, node(K::ExprList, values)])
    }
}

pub fn assign(targets: Vec<SyntaxNode>, values: Vec<SyntaxNode>) -> SyntaxNode {
    node(
        K::Assignment,
        vec![node(K::VarList, targets), node(K::ExprList, values)],
    )
}

/// `base[key]` as an assignment target.
pub fn field_target(base: SyntaxNode, key: SyntaxNode) -> SyntaxNode {
    node(K::AssignmentVar, vec![base, node(K::Index, vec![key])])
}

/// `base[key]` as an expression.
pub fn index(base: SyntaxNode, key: SyntaxNode) -> SyntaxNode {
    node(K::Var, vec![base, node(K::Index, vec![key])])
}

pub fn call(callee: SyntaxNode, args: Vec<SyntaxNode>) -> SyntaxNode {
    node(K::Var, vec![callee, node(K::Call, args)])
}

pub fn method_call(receiver: SyntaxNode, method: &str, args: Vec<SyntaxNode>) -> SyntaxNode {
    let mut children = vec![name(method)];
    children.extend(args);
    node(K::Var, vec![receiver, node(K::ColCall, children)])
}

pub fn binary(kind: K, lhs: SyntaxNode, rhs: SyntaxNode) -> SyntaxNode {
    node(kind, vec![lhs, rhs])
}

pub fn function(params: &[&str], varargs: bool, body: Vec<SyntaxNode>) -> SyntaxNode {
    let mut list: Vec<SyntaxNode> = params.iter().map(|p| name(p)).collect();
    if varargs {
        list.push(token(K::DotDotDot));
    }
    node(K::Function, vec![node(K::ParamList, list), chunk(body)])
}

pub fn table(fields: Vec<Vec<SyntaxNode>>) -> SyntaxNode {
    node(
        K::Table,
        fields.into_iter().map(|f| node(K::Field, f)).collect(),
    )
}

pub fn ret(values: Vec<SyntaxNode>) -> SyntaxNode {
    node(K::Return, values)
}

/// Replace synthesized register names (`v1F`) with `r0`, `r1`, ... in
/// order of first appearance.
pub fn normalize(text: &str) -> String {
    let mut seen: Vec<String> = Vec::new();
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let boundary = i == 0 || !chars[i - 1].is_ascii_alphanumeric();
        if boundary && chars[i] == 'v' {
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end], '0'..='9' | 'A'..='F') {
                end += 1;
            }
            let terminated = end == chars.len() || !chars[end].is_ascii_alphanumeric();
            if end > i + 1 && terminated {
                let token: String = chars[i..end].iter().collect();
                let index = match seen.iter().position(|s| *s == token) {
                    Some(index) => index,
                    None => {
                        seen.push(token);
                        seen.len() - 1
                    }
                };
                out.push_str(&format!("r{index}"));
                i = end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
