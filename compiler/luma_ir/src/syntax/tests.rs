use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builders() {
    let name = SyntaxNode::leaf(SyntaxKind::Name, "x").at(3, 7);
    assert_eq!(name.text(), "x");
    assert_eq!((name.line, name.column), (3, 7));
    assert!(name.is(SyntaxKind::Name));

    let ret = SyntaxNode::node(SyntaxKind::Return, vec![name.clone()]);
    assert_eq!(ret.child(0), Some(&name));
    assert_eq!(ret.child(1), None);
    assert_eq!(ret.text(), "");
    assert_eq!(SyntaxNode::token(SyntaxKind::Break).children.len(), 0);
}

#[test]
fn kind_display_is_variant_name() {
    assert_eq!(SyntaxKind::ColCall.to_string(), "ColCall");
}
