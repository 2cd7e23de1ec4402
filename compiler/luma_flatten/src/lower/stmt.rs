//! Statements and control flow.

use luma_diagnostic::CompilationFailure;
use luma_ir::{
    ExprList, ExprNode, FlatExpr, IfClause, InvocationMethod, ListNode, StaticType, SyntaxKind,
    SyntaxNode, VoidNode,
};

use super::scope::ScopeKind;
use super::Flattener;

impl Flattener<'_> {
    /// Lower every statement of a `Chunk` node into `steps`.
    pub(super) fn flatten_statements(
        &mut self,
        chunk: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        self.expect_kind(chunk, SyntaxKind::Chunk)?;
        for statement in &chunk.children {
            if self.options.emit_line_numbers && statement.line > 0 {
                steps.push(VoidNode::line_number(statement.line));
            }
            luma_stack::ensure_sufficient_stack(|| self.flatten_statement(statement, steps))?;
        }
        Ok(())
    }

    fn flatten_statement(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        match statement.kind {
            SyntaxKind::Assignment => self.flatten_assignment(statement, steps),
            SyntaxKind::LocalAssignment => self.flatten_local_assignment(statement, steps),
            SyntaxKind::Var => self.flatten_call_statement(statement, steps),
            SyntaxKind::Do => {
                let body = self.child(statement, 0, "body")?;
                let block = self.flatten_block(body, ScopeKind::Block)?;
                steps.push(VoidNode::Block(block));
                Ok(())
            }
            SyntaxKind::If => self.flatten_if(statement, steps),
            SyntaxKind::While => self.flatten_while(statement, steps),
            SyntaxKind::Repeat => self.flatten_repeat(statement, steps),
            SyntaxKind::For => self.flatten_numeric_for(statement, steps),
            SyntaxKind::ForIn => self.flatten_generic_for(statement, steps),
            SyntaxKind::Return => {
                let values = self.flatten_expr_list(&statement.children, steps)?;
                steps.push(VoidNode::Return(values.into_node()));
                Ok(())
            }
            SyntaxKind::Break => {
                if !self.in_loop() {
                    return Err(self.bad_input(statement, "`break` outside a loop"));
                }
                steps.push(VoidNode::break_always());
                Ok(())
            }
            SyntaxKind::LocalFunction => self.flatten_local_function(statement, steps),
            SyntaxKind::FunctionDecl => self.flatten_function_decl(statement, steps),
            SyntaxKind::Goto | SyntaxKind::Label => Err(self.unsupported(
                statement,
                format!("{} statements are not supported", statement.kind),
            )),
            other => Err(self.bad_input(statement, format!("unknown statement: {other}"))),
        }
    }

    fn flatten_call_statement(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let is_call = statement
            .children
            .last()
            .is_some_and(|suffix| matches!(suffix.kind, SyntaxKind::Call | SyntaxKind::ColCall));
        if !is_call || statement.children.len() < 2 {
            return Err(self.bad_input(statement, "expression is not a statement"));
        }
        let call = self.flatten_access(statement, steps)?;
        steps.push(VoidNode::Discard(call));
        Ok(())
    }

    fn flatten_if(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let mut clauses = Vec::with_capacity(statement.children.len());
        for (i, arm) in statement.children.iter().enumerate() {
            match arm.kind {
                SyntaxKind::Condition => {
                    let condition_node = self.child(arm, 0, "condition")?;
                    let body_node = self.child(arm, 1, "body")?;
                    let mut condition_steps = Vec::new();
                    let condition = self.flatten_scalar(condition_node, &mut condition_steps)?;
                    let body = self.flatten_block(body_node, ScopeKind::Block)?;
                    clauses.push(IfClause {
                        condition: FlatExpr::new(condition_steps, condition),
                        body,
                    });
                }
                SyntaxKind::Chunk if i > 0 && i + 1 == statement.children.len() => {
                    let body = self.flatten_block(arm, ScopeKind::Block)?;
                    clauses.push(IfClause {
                        condition: FlatExpr::bare(ExprNode::Bool(true)),
                        body,
                    });
                }
                other => {
                    return Err(self.bad_input(arm, format!("unexpected {other} in `if` statement")))
                }
            }
        }
        if clauses.is_empty() {
            return Err(self.bad_input(statement, "malformed If: missing condition"));
        }
        steps.push(VoidNode::IfElseChain(clauses));
        Ok(())
    }

    fn flatten_while(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let condition_node = self.child(statement, 0, "condition")?;
        let body_node = self.child(statement, 1, "body")?;
        let body = self.scoped(ScopeKind::Loop, |this, body| {
            let condition = this.flatten_scalar(condition_node, body)?;
            body.push(VoidNode::break_if(condition, false));
            this.flatten_statements(body_node, body)
        })?;
        steps.push(VoidNode::Loop(body));
        Ok(())
    }

    /// The `until` condition is evaluated inside the body's scope.
    fn flatten_repeat(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let body_node = self.child(statement, 0, "body")?;
        let condition_node = self.child(statement, 1, "condition")?;
        let body = self.scoped(ScopeKind::Loop, |this, body| {
            this.flatten_statements(body_node, body)?;
            let condition = this.flatten_scalar(condition_node, body)?;
            body.push(VoidNode::break_if(condition, true));
            Ok(())
        })?;
        steps.push(VoidNode::Loop(body));
        Ok(())
    }

    /// `for i = from, to [, step] do ... end`
    ///
    /// The counter is an integer when both `from` and `step` are, a float
    /// otherwise.
    fn flatten_numeric_for(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let count = statement.children.len();
        if count != 4 && count != 5 {
            return Err(self.bad_input(statement, "malformed For: expected 4 or 5 children"));
        }
        let name = &statement.children[0];
        self.expect_kind(name, SyntaxKind::Name)?;
        let body_node = &statement.children[count - 1];

        let mut bounds = self.flatten_scalars(&statement.children[1..count - 1], steps)?;
        let step = if bounds.len() == 3 {
            bounds.pop().unwrap_or(ExprNode::Number(1.0))
        } else {
            ExprNode::Number(1.0)
        };
        let (Some(to), Some(from)) = (bounds.pop(), bounds.pop()) else {
            return Err(self.bad_input(statement, "malformed For: missing bounds"));
        };
        let from = self.numeric_bound(from);
        let to = self.numeric_bound(to);
        let step = self.numeric_bound(step);

        let counter_type = if from.type_info(&self.vars) == StaticType::Integer
            && step.type_info(&self.vars) == StaticType::Integer
        {
            StaticType::Integer
        } else {
            StaticType::Number
        };

        let mut counter = None;
        let body = self.scoped(ScopeKind::Loop, |this, body| {
            let id = this.declare(name.text());
            this.vars.record_write(id, counter_type);
            counter = Some(id);
            this.flatten_statements(body_node, body)
        })?;
        let Some(counter) = counter else {
            return Err(self.bad_input(statement, "malformed For: missing counter"));
        };

        steps.push(VoidNode::ForRangeLoop {
            counter,
            from,
            to,
            step,
            body,
        });
        Ok(())
    }

    /// Coerce a loop bound to a number. Anything reading a variable is
    /// coerced, since later writes may still widen its type.
    fn numeric_bound(&self, bound: ExprNode) -> ExprNode {
        if bound.depends_on_variables() {
            ExprNode::invocation(bound, InvocationMethod::ToNumber, ExprList::empty())
        } else {
            ExprNode::to_number(bound, &self.vars)
        }
    }

    /// `for a, b in explist do ... end`
    fn flatten_generic_for(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let names = self.child(statement, 0, "names")?;
        let exprs = self.child(statement, 1, "iterator")?;
        let body_node = self.child(statement, 2, "body")?;
        self.expect_kind(names, SyntaxKind::NameList)?;
        self.expect_kind(exprs, SyntaxKind::ExprList)?;
        for name in &names.children {
            self.expect_kind(name, SyntaxKind::Name)?;
        }
        if names.children.is_empty() {
            return Err(self.bad_input(names, "malformed ForIn: no loop variables"));
        }

        let iterator = self.flatten_expr_list(&exprs.children, steps)?;

        let mut variables = Vec::with_capacity(names.children.len());
        let body = self.scoped(ScopeKind::Loop, |this, body| {
            for name in &names.children {
                let id = this.declare(name.text());
                this.vars.record_write(id, StaticType::Object);
                variables.push(id);
            }
            this.flatten_statements(body_node, body)
        })?;

        steps.push(VoidNode::ForEachLoop {
            variables,
            iterator: iterator.into_node(),
            body,
        });
        Ok(())
    }

    /// `local function f` is visible inside its own body.
    fn flatten_local_function(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let name = self.child(statement, 0, "name")?;
        let function = self.child(statement, 1, "function")?;
        self.expect_kind(name, SyntaxKind::Name)?;

        let id = self.declare(name.text());
        steps.push(VoidNode::Declare(id));
        self.vars.record_write(id, StaticType::Function);
        let value = self.flatten_function(function, false)?;
        steps.push(VoidNode::Write { target: id, value });
        Ok(())
    }

    /// `function a.b.c:m() ... end`
    fn flatten_function_decl(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let func_name = self.child(statement, 0, "name")?;
        let function = self.child(statement, 1, "function")?;
        self.expect_kind(func_name, SyntaxKind::FuncName)?;

        let (path, method) = match func_name.children.split_last() {
            Some((last, rest)) if last.is(SyntaxKind::MethodName) => {
                let method = self.child(last, 0, "method name")?;
                (rest, Some(method))
            }
            _ => (func_name.children.as_slice(), None),
        };
        for segment in path {
            self.expect_kind(segment, SyntaxKind::Name)?;
        }
        if let Some(method) = method {
            self.expect_kind(method, SyntaxKind::Name)?;
        }
        let Some((root, fields)) = path.split_first() else {
            return Err(self.bad_input(func_name, "malformed FuncName: empty name"));
        };

        let root = self.resolve(root.text());
        if fields.is_empty() && method.is_none() {
            let value = self.flatten_function(function, false)?;
            self.write_variable(root, value, steps);
            return Ok(());
        }

        // Every segment but the last is read; the last one is written.
        let (key, prefix) = match method {
            Some(method) => (method, fields),
            None => match fields.split_last() {
                Some((last, prefix)) => (last, prefix),
                None => return Err(self.bad_input(func_name, "malformed FuncName")),
            },
        };
        let mut table = ExprNode::name(root);
        for field in prefix {
            let indexed = ExprNode::index(table, ExprNode::string(field.text()));
            table = self.materialize(indexed, steps);
        }
        let value = self.flatten_function(function, method.is_some())?;
        steps.push(VoidNode::Discard(ListNode::invocation(
            table,
            InvocationMethod::SetIndex,
            ExprList::of(vec![ExprNode::string(key.text()), value]),
        )));
        Ok(())
    }
}
