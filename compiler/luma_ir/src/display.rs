//! Human-readable IR rendering for logs and test failures.
//!
//! ```text
//! local $1
//! $1 := 10
//! v3 = add($1, 1)
//! if lt(v3, 20) then
//!   discard call($2, v3)
//! end
//! ```

use std::fmt::{self, Display, Formatter, Write as _};

use crate::{AsmBlock, ExprList, ExprNode, Invocation, ListNode, LogicalOp, VoidNode};

struct Printer<'a, 'b> {
    f: &'a mut Formatter<'b>,
    indent: usize,
}

impl<'a, 'b> Printer<'a, 'b> {
    fn new(f: &'a mut Formatter<'b>) -> Self {
        Printer { f, indent: 0 }
    }

    fn newline(&mut self) -> fmt::Result {
        self.f.write_char('\n')?;
        write!(self.f, "{:1$}", "", self.indent * 2)
    }

    /// Statements of `block`, one per line, one level deeper.
    fn nested(&mut self, block: &AsmBlock) -> fmt::Result {
        self.indent += 1;
        for step in &block.steps {
            self.newline()?;
            self.void(step)?;
        }
        self.indent -= 1;
        Ok(())
    }

    fn end(&mut self) -> fmt::Result {
        self.newline()?;
        self.f.write_str("end")
    }

    fn void(&mut self, node: &VoidNode) -> fmt::Result {
        match node {
            VoidNode::Assign { target, value } => {
                write!(self.f, "{target} = ")?;
                self.expr(value)
            }
            VoidNode::AssignArray { target, value } => {
                write!(self.f, "{target} = ")?;
                self.list(value)
            }
            VoidNode::Block(block) => {
                self.f.write_str("do")?;
                self.nested(block)?;
                self.end()
            }
            VoidNode::BreakIf { condition, is_true } => {
                if matches!(condition, ExprNode::Bool(true)) && *is_true {
                    return self.f.write_str("break");
                }
                self.f
                    .write_str(if *is_true { "break if " } else { "break unless " })?;
                self.expr(condition)
            }
            VoidNode::Declare(id) => write!(self.f, "local {id}"),
            VoidNode::Write { target, value } => {
                write!(self.f, "{target} := ")?;
                self.expr(value)
            }
            VoidNode::Discard(list) => {
                self.f.write_str("discard ")?;
                self.list(list)
            }
            VoidNode::IfElseChain(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        self.newline()?;
                    }
                    self.f.write_str(if i == 0 { "if" } else { "elseif" })?;
                    if clause.condition.steps.is_empty() {
                        self.f.write_char(' ')?;
                    } else {
                        self.indent += 1;
                        for step in &clause.condition.steps {
                            self.newline()?;
                            self.void(step)?;
                        }
                        self.newline()?;
                        self.f.write_str("? ")?;
                        self.indent -= 1;
                    }
                    self.expr(&clause.condition.value)?;
                    self.f.write_str(" then")?;
                    self.nested(&clause.body)?;
                }
                self.end()
            }
            VoidNode::Loop(body) => {
                self.f.write_str("loop")?;
                self.nested(body)?;
                self.end()
            }
            VoidNode::ForEachLoop {
                variables,
                iterator,
                body,
            } => {
                self.f.write_str("for ")?;
                for (i, var) in variables.iter().enumerate() {
                    if i > 0 {
                        self.f.write_str(", ")?;
                    }
                    write!(self.f, "{var}")?;
                }
                self.f.write_str(" in ")?;
                self.list(iterator)?;
                self.f.write_str(" do")?;
                self.nested(body)?;
                self.end()
            }
            VoidNode::ForRangeLoop {
                counter,
                from,
                to,
                step,
                body,
            } => {
                write!(self.f, "for {counter} = ")?;
                self.expr(from)?;
                self.f.write_str(", ")?;
                self.expr(to)?;
                self.f.write_str(", ")?;
                self.expr(step)?;
                self.f.write_str(" do")?;
                self.nested(body)?;
                self.end()
            }
            VoidNode::Return(list) => {
                self.f.write_str("return ")?;
                self.list(list)
            }
            VoidNode::LineNumber(line) => write!(self.f, "line {line}"),
        }
    }

    fn expr(&mut self, node: &ExprNode) -> fmt::Result {
        match node {
            ExprNode::Number(value) => write!(self.f, "{value}"),
            ExprNode::String(value) => write!(self.f, "{value:?}"),
            ExprNode::Bool(value) => write!(self.f, "{value}"),
            ExprNode::Nil => self.f.write_str("nil"),
            ExprNode::Table(table) => {
                self.f.write_char('{')?;
                for (i, (key, value)) in table.entries.iter().enumerate() {
                    if i > 0 {
                        self.f.write_str(", ")?;
                    }
                    self.f.write_char('[')?;
                    self.expr(key)?;
                    self.f.write_str("] = ")?;
                    self.list(value)?;
                }
                self.f.write_char('}')
            }
            ExprNode::Function(function) => {
                self.f.write_str("function(")?;
                for (i, param) in function.params.params.iter().enumerate() {
                    if i > 0 {
                        self.f.write_str(", ")?;
                    }
                    write!(self.f, "{param}")?;
                }
                if function.params.varargs {
                    if !function.params.params.is_empty() {
                        self.f.write_str(", ")?;
                    }
                    self.f.write_str("...")?;
                }
                self.f.write_char(')')?;
                self.nested(&function.body)?;
                self.end()
            }
            ExprNode::Name(id) => write!(self.f, "{id}"),
            ExprNode::Register(register) => write!(self.f, "{register}"),
            ExprNode::Invocation(invocation) => self.invocation(invocation),
            ExprNode::Not(operand) => {
                self.f.write_str("not ")?;
                self.expr(operand)
            }
            ExprNode::Logical(logical) => {
                self.f.write_char('(')?;
                self.expr(&logical.first)?;
                self.f.write_str(match logical.op {
                    LogicalOp::And => " and ",
                    LogicalOp::Or => " or ",
                })?;
                self.expr(&logical.second)?;
                self.f.write_char(')')
            }
            ExprNode::Select(select) => {
                write!(self.f, "select {} ", select.n)?;
                self.list(&select.source)
            }
        }
    }

    fn invocation(&mut self, invocation: &Invocation) -> fmt::Result {
        write!(self.f, "{}(", invocation.method)?;
        self.expr(&invocation.object)?;
        if !invocation.arguments.is_empty() {
            self.f.write_str(", ")?;
            self.expr_list_items(&invocation.arguments)?;
        }
        self.f.write_char(')')
    }

    fn list(&mut self, node: &ListNode) -> fmt::Result {
        match node {
            ListNode::Expr(expr) => self.expr(expr),
            ListNode::Varargs => self.f.write_str("..."),
            ListNode::ArrayRegister(register) => write!(self.f, "{register}"),
            ListNode::ExprList(list) => {
                self.f.write_char('[')?;
                self.expr_list_items(list)?;
                self.f.write_char(']')
            }
            ListNode::Invocation(invocation) => self.invocation(invocation),
        }
    }

    fn expr_list_items(&mut self, list: &ExprList) -> fmt::Result {
        let mut first = true;
        for expr in list.leading() {
            if !first {
                self.f.write_str(", ")?;
            }
            first = false;
            self.expr(expr)?;
        }
        if let Some(tail) = list.trailing() {
            if !first {
                self.f.write_str(", ")?;
            }
            self.list(tail)?;
        }
        Ok(())
    }
}

impl Display for ExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Printer::new(f).expr(self)
    }
}

impl Display for ListNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Printer::new(f).list(self)
    }
}

impl Display for ExprList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        printer.f.write_char('[')?;
        printer.expr_list_items(self)?;
        printer.f.write_char(']')
    }
}

impl Display for VoidNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Printer::new(f).void(self)
    }
}

impl Display for AsmBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                printer.newline()?;
            }
            printer.void(step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
