//! Function literals.

use luma_diagnostic::CompilationFailure;
use luma_ir::{ExprNode, ParameterList, StaticType, SyntaxKind, SyntaxNode};

use super::scope::ScopeKind;
use super::Flattener;

impl Flattener<'_> {
    /// Lower a `Function` node. Methods get an implicit leading `self`.
    pub(super) fn flatten_function(
        &mut self,
        node: &SyntaxNode,
        method: bool,
    ) -> Result<ExprNode, CompilationFailure> {
        self.expect_kind(node, SyntaxKind::Function)?;
        let params = self.child(node, 0, "parameters")?;
        let body = self.child(node, 1, "body")?;
        self.expect_kind(params, SyntaxKind::ParamList)?;

        let (names, varargs) = match params.children.split_last() {
            Some((last, names)) if last.is(SyntaxKind::DotDotDot) => (names, true),
            _ => (params.children.as_slice(), false),
        };
        for name in names {
            if !name.is(SyntaxKind::Name) {
                return Err(self.bad_input(name, format!("unexpected {} in parameter list", name.kind)));
            }
        }

        let mut ids = Vec::with_capacity(names.len() + usize::from(method));
        let block = self.scoped(ScopeKind::Function { varargs }, |this, steps| {
            let implicit = method.then_some("self");
            for name in implicit.into_iter().chain(names.iter().map(SyntaxNode::text)) {
                let id = this.declare(name);
                this.vars.record_write(id, StaticType::Object);
                ids.push(id);
            }
            this.flatten_statements(body, steps)
        })?;
        tracing::trace!(params = ids.len(), varargs, "lowered function");
        Ok(ExprNode::function(ParameterList::new(ids, varargs), block))
    }
}
