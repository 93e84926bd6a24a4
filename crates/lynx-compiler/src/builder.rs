//! Method builder and local slot management for codegen.

use std::collections::HashMap;

use lynx_bytecode::{Instruction as BC, Method, Prim};
use lynx_syntax::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use lynx_syntax::error::{error, Error, Result};
use lynx_syntax::types::Type;

use crate::compiler::{expr_type, Compiler};

pub(crate) struct MethodBuilder {
    name: String,
    descriptor: String,
    arity: usize,
    code: Vec<BC>,
    locals: Locals,
    // Declared return type; selects the return instruction
    ret: Type,
}

impl MethodBuilder {
    pub(crate) fn new(name: String, descriptor: String, arity: usize, ret: Type) -> Self {
        Self {
            name,
            descriptor,
            arity,
            code: Vec::new(),
            locals: Locals::new(),
            ret,
        }
    }

    pub(crate) fn finish(self) -> Method {
        Method {
            name: self.name,
            descriptor: self.descriptor,
            arity: self.arity,
            local_count: self.locals.max_alloc as usize,
            code: self.code,
        }
    }

    pub(crate) fn emit(&mut self, i: BC) -> usize {
        self.code.push(i);
        self.code.len() - 1
    }

    fn here(&self) -> usize {
        self.code.len()
    }

    fn patch_to_here(&mut self, at: usize) -> Result<()> {
        let tgt = self.here();
        match &mut self.code[at] {
            BC::Jump(x) | BC::JumpIfFalse(x) => {
                *x = tgt;
                Ok(())
            }
            other => error(format!("cannot patch at {:?}", other)),
        }
    }

    pub(crate) fn declare_param(&mut self, name: String, ty: Type) -> Result<()> {
        self.locals.declare(name, ty)?;
        Ok(())
    }

    /// Insert a representation change when a value of type `from` flows
    /// into a position of type `to`.
    pub(crate) fn adapt(&mut self, from: &Type, to: &Type) {
        if from.is_primitive() && !to.is_primitive() {
            self.emit(BC::Box(prim_of(from)));
        } else if !from.is_primitive() && to.is_primitive() {
            self.emit(BC::Unbox(prim_of(to)));
        }
    }

    pub(crate) fn emit_stmt(&mut self, c: &Compiler, s: &Stmt) -> Result<()> {
        match &s.kind {
            StmtKind::Print { value } => {
                self.emit_expr(c, value)?;
                self.adapt(&expr_type(value)?, &Type::Object);
                self.emit(BC::Print);
                Ok(())
            }
            StmtKind::Var {
                name,
                init,
                declared,
                ..
            } => {
                let ty = declared_type(declared)?;
                self.emit_expr(c, init)?;
                self.adapt(&expr_type(init)?, &ty);
                let slot = self.locals.declare(name.clone(), ty)?;
                self.emit(BC::StoreLocal(slot));
                Ok(())
            }
            StmtKind::Assign { name, value } => {
                match self.locals.resolve(name) {
                    Some((slot, ty)) => {
                        self.emit_expr(c, value)?;
                        self.adapt(&expr_type(value)?, &ty);
                        self.emit(BC::StoreLocal(slot));
                    }
                    None => {
                        let ty = c.field_type(name)?;
                        self.emit_expr(c, value)?;
                        self.adapt(&expr_type(value)?, &ty);
                        self.emit(BC::PutField(name.clone()));
                    }
                }
                Ok(())
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.emit_expr(c, cond)?;
                let jf_at = self.emit(BC::JumpIfFalse(0));
                for s in then_body {
                    self.emit_stmt(c, s)?;
                }
                let jend_at = self.emit(BC::Jump(0));
                self.patch_to_here(jf_at)?;
                for s in else_body {
                    self.emit_stmt(c, s)?;
                }
                self.patch_to_here(jend_at)
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                self.emit_expr(c, iterable)?;
                let component = match expr_type(iterable)? {
                    Type::List(comp) => (*comp).clone(),
                    _ => Type::Object,
                };
                self.emit(BC::GetIter);
                let iter_slot = self.locals.alloc_temp();
                self.emit(BC::StoreLocal(iter_slot));
                let var_slot = self.locals.declare(var.clone(), component.clone())?;
                let head = self.here();
                self.emit(BC::LoadLocal(iter_slot));
                self.emit(BC::IterHasNext);
                let jf_at = self.emit(BC::JumpIfFalse(0));
                self.emit(BC::LoadLocal(iter_slot));
                self.emit(BC::IterNext);
                self.emit(BC::CheckCast(component.clone()));
                if component.is_primitive() {
                    self.emit(BC::Unbox(prim_of(&component)));
                }
                self.emit(BC::StoreLocal(var_slot));
                for s in body {
                    self.emit_stmt(c, s)?;
                }
                self.emit(BC::Jump(head));
                self.patch_to_here(jf_at)
            }
            StmtKind::Return { value, .. } => {
                match value {
                    Some(e) => {
                        self.emit_expr(c, e)?;
                        let ret = self.ret.clone();
                        self.adapt(&expr_type(e)?, &ret);
                        if self.ret.is_primitive() {
                            self.emit(BC::IReturn);
                        } else {
                            self.emit(BC::AReturn);
                        }
                    }
                    None => {
                        self.emit(BC::ReturnVoid);
                    }
                }
                Ok(())
            }
            StmtKind::Call(e) => {
                self.emit_expr(c, e)?;
                if expr_type(e)? != Type::Void {
                    self.emit(BC::Pop);
                }
                Ok(())
            }
            StmtKind::FunctionDef(_) => {
                error("function definitions must appear at the top level")
            }
            StmtKind::SyntaxError { .. } => error("cannot compile an unvalidated tree"),
        }
    }

    pub(crate) fn emit_expr(&mut self, c: &Compiler, e: &Expr) -> Result<()> {
        match &e.kind {
            ExprKind::IntLiteral(n) => {
                self.emit(BC::PushInt(*n));
                Ok(())
            }
            ExprKind::StringLiteral(s) => {
                self.emit(BC::PushStr(s.clone()));
                Ok(())
            }
            ExprKind::BoolLiteral(b) => {
                self.emit(BC::PushBool(*b));
                Ok(())
            }
            ExprKind::NullLiteral => {
                self.emit(BC::PushNull);
                Ok(())
            }
            ExprKind::ListLiteral(items) => {
                for item in items {
                    self.emit_expr(c, item)?;
                    // list elements live boxed
                    self.adapt(&expr_type(item)?, &Type::Object);
                }
                self.emit(BC::MakeList(items.len()));
                Ok(())
            }
            ExprKind::Identifier(name) => {
                match self.locals.resolve(name) {
                    Some((slot, _)) => {
                        self.emit(BC::LoadLocal(slot));
                    }
                    None => {
                        c.field_type(name)?;
                        self.emit(BC::GetField(name.clone()));
                    }
                }
                Ok(())
            }
            ExprKind::Parenthesized(inner) => self.emit_expr(c, inner),
            ExprKind::Unary { op, operand } => {
                self.emit_expr(c, operand)?;
                self.emit(match op {
                    UnaryOp::Neg => BC::INeg,
                    UnaryOp::Not => BC::BoolNot,
                });
                Ok(())
            }
            ExprKind::Binary { op, lhs, rhs } => self.emit_binary(c, e, *op, lhs, rhs),
            ExprKind::Call { name, args } => {
                let info = c.fn_info(name)?;
                for (a, param) in args.iter().zip(&info.params) {
                    self.emit_expr(c, a)?;
                    self.adapt(&expr_type(a)?, param);
                }
                self.emit(BC::Call(info.index, args.len()));
                Ok(())
            }
            ExprKind::SyntaxError { .. } => error("cannot compile an unvalidated tree"),
        }
    }

    fn emit_binary(
        &mut self,
        c: &Compiler,
        e: &Expr,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<()> {
        if op.is_equality() {
            self.emit_expr(c, lhs)?;
            self.adapt(&expr_type(lhs)?, &Type::Object);
            self.emit_expr(c, rhs)?;
            self.adapt(&expr_type(rhs)?, &Type::Object);
            self.emit(BC::RefCmp {
                negate: op == BinaryOp::Ne,
            });
            return Ok(());
        }
        if op.is_additive() && e.ty == Some(Type::String) {
            // concatenation stringifies both sides
            self.emit_expr(c, lhs)?;
            self.adapt(&expr_type(lhs)?, &Type::Object);
            self.emit(BC::ToString);
            self.emit_expr(c, rhs)?;
            self.adapt(&expr_type(rhs)?, &Type::Object);
            self.emit(BC::ToString);
            self.emit(BC::Concat);
            return Ok(());
        }
        self.emit_expr(c, lhs)?;
        self.emit_expr(c, rhs)?;
        self.emit(match op {
            BinaryOp::Add => BC::IAdd,
            BinaryOp::Sub => BC::ISub,
            BinaryOp::Mul => BC::IMul,
            BinaryOp::Div => BC::IDiv,
            BinaryOp::Lt => BC::ICmp(lynx_bytecode::CmpOp::Lt),
            BinaryOp::Le => BC::ICmp(lynx_bytecode::CmpOp::Le),
            BinaryOp::Gt => BC::ICmp(lynx_bytecode::CmpOp::Gt),
            BinaryOp::Ge => BC::ICmp(lynx_bytecode::CmpOp::Ge),
            BinaryOp::Eq | BinaryOp::Ne => unreachable!("handled above"),
        });
        Ok(())
    }
}

pub(crate) fn prim_of(ty: &Type) -> Prim {
    match ty {
        Type::Bool => Prim::Bool,
        _ => Prim::Int,
    }
}

fn declared_type(declared: &Option<Type>) -> Result<Type> {
    declared
        .clone()
        .ok_or_else(|| Error::new("cannot compile an unvalidated tree"))
}

// Slots are handed out monotonically and never reused, so a method's
// local count is simply the high-water mark.
struct Locals {
    slots: HashMap<String, (u16, Type)>,
    next: u16,
    max_alloc: u16,
}

impl Locals {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next: 0,
            max_alloc: 0,
        }
    }

    fn declare(&mut self, name: String, ty: Type) -> Result<u16> {
        let idx = self.next;
        self.next = self
            .next
            .checked_add(1)
            .ok_or_else(|| Error::new("too many locals"))?;
        self.slots.insert(name, (idx, ty));
        self.max_alloc = self.max_alloc.max(idx + 1);
        Ok(idx)
    }

    fn resolve(&self, name: &str) -> Option<(u16, Type)> {
        self.slots.get(name).cloned()
    }

    fn alloc_temp(&mut self) -> u16 {
        let idx = self.next;
        self.next += 1;
        self.max_alloc = self.max_alloc.max(idx + 1);
        idx
    }
}
