//! Main interpreter engine.

use std::collections::HashMap;
use std::rc::Rc;

use lynx_syntax::ast::{BinaryOp, Expr, ExprKind, FunctionDef, Program, Stmt, StmtKind, UnaryOp};
use lynx_syntax::error::{error, Result};

use crate::env::Env;
use crate::flow::Flow;
use crate::value::Value;

/// The result of running a program: everything it printed, plus the value
/// of a bare-expression program.
#[derive(Debug, Clone)]
pub struct Execution {
    pub output: String,
    pub value: Option<Value>,
}

pub struct Interpreter {
    /// Function definitions registered while running
    functions: HashMap<String, FunctionDef>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Run a validated program to completion.
    ///
    /// The tree must have passed validation; executing a tree that still
    /// carries syntax-error nodes is reported as a host error.
    pub fn run(&mut self, program: &Program) -> Result<Execution> {
        let mut env = Env::new();
        if let Some(expr) = &program.expression {
            let value = self.eval_expr(&mut env, expr)?;
            return Ok(Execution {
                output: env.take_output(),
                value: Some(value),
            });
        }
        for stmt in &program.statements {
            if let StmtKind::FunctionDef(f) = &stmt.kind {
                self.functions.insert(f.name.clone(), f.clone());
            }
        }
        for stmt in &program.statements {
            match self.exec_stmt(&mut env, stmt)? {
                Flow::Continue => {}
                Flow::Return(_) => return error("'return' outside of function"),
            }
        }
        Ok(Execution {
            output: env.take_output(),
            value: None,
        })
    }

    fn exec_block(&mut self, env: &mut Env, body: &[Stmt]) -> Result<Flow> {
        for s in body {
            match self.exec_stmt(env, s)? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    fn exec_stmt(&mut self, env: &mut Env, stmt: &Stmt) -> Result<Flow> {
        match &stmt.kind {
            StmtKind::Print { value } => {
                let v = self.eval_expr(env, value)?;
                env.print(&v);
                Ok(Flow::Continue)
            }
            StmtKind::Var { name, init, .. } => {
                let v = self.eval_expr(env, init)?;
                env.define(name.clone(), v);
                Ok(Flow::Continue)
            }
            StmtKind::Assign { name, value } => {
                let v = self.eval_expr(env, value)?;
                env.assign(name, v)?;
                Ok(Flow::Continue)
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let branch = match self.eval_expr(env, cond)? {
                    Value::Bool(true) => then_body,
                    Value::Bool(false) => else_body,
                    other => return error(format!("if condition must be bool, got {}", other)),
                };
                env.push_scope();
                let flow = self.exec_block(env, branch);
                env.pop_scope();
                flow
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                let items = match self.eval_expr(env, iterable)? {
                    Value::List(items) => items,
                    other => return error(format!("for source must be a list, got {}", other)),
                };
                env.push_scope();
                for item in items.iter() {
                    env.define(var.clone(), item.clone());
                    match self.exec_block(env, body) {
                        Ok(Flow::Continue) => {}
                        other => {
                            env.pop_scope();
                            return other;
                        }
                    }
                }
                env.pop_scope();
                Ok(Flow::Continue)
            }
            StmtKind::FunctionDef(f) => {
                self.functions.insert(f.name.clone(), f.clone());
                Ok(Flow::Continue)
            }
            StmtKind::Return { value, .. } => {
                let v = match value {
                    Some(e) => self.eval_expr(env, e)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(v))
            }
            StmtKind::Call(e) => {
                self.eval_expr(env, e)?;
                Ok(Flow::Continue)
            }
            StmtKind::SyntaxError { .. } => error("cannot execute a program with syntax errors"),
        }
    }

    fn eval_expr(&mut self, env: &mut Env, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),
            ExprKind::StringLiteral(s) => Ok(Value::Str(Rc::from(s.as_str()))),
            ExprKind::BoolLiteral(b) => Ok(Value::Bool(*b)),
            ExprKind::NullLiteral => Ok(Value::Null),
            ExprKind::ListLiteral(items) => {
                let mut vals = Vec::with_capacity(items.len());
                for item in items {
                    vals.push(self.eval_expr(env, item)?);
                }
                Ok(Value::List(Rc::new(vals)))
            }
            ExprKind::Identifier(name) => env
                .get(name)
                .ok_or_else(|| format!("unknown variable '{}'", name).into()),
            ExprKind::Parenthesized(inner) => self.eval_expr(env, inner),
            ExprKind::Unary { op, operand } => {
                let v = self.eval_expr(env, operand)?;
                match (op, v) {
                    (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (_, other) => error(format!("invalid operand for unary operator: {}", other)),
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let l = self.eval_expr(env, lhs)?;
                let r = self.eval_expr(env, rhs)?;
                self.eval_binary(*op, l, r)
            }
            ExprKind::Call { name, args } => {
                let f = match self.functions.get(name) {
                    Some(f) => f.clone(),
                    None => return error(format!("unknown function '{}'", name)),
                };
                let mut vals = Vec::with_capacity(args.len());
                for a in args {
                    vals.push(self.eval_expr(env, a)?);
                }
                self.call_function(env, &f, vals)
            }
            ExprKind::SyntaxError { .. } => error("cannot evaluate a syntax-error expression"),
        }
    }

    fn call_function(&mut self, env: &mut Env, f: &FunctionDef, args: Vec<Value>) -> Result<Value> {
        env.push_scope();
        for (param, val) in f.params.iter().zip(args) {
            env.define(param.name.clone(), val);
        }
        let mut result = Value::Null;
        for s in &f.body {
            match self.exec_stmt(env, s) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Return(v)) => {
                    result = v;
                    break;
                }
                Err(e) => {
                    env.pop_scope();
                    return Err(e);
                }
            }
        }
        env.pop_scope();
        Ok(result)
    }

    fn eval_binary(&mut self, op: BinaryOp, l: Value, r: Value) -> Result<Value> {
        match op {
            BinaryOp::Add => match (&l, &r) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
                // a string operand turns either additive operator into
                // concatenation
                (Value::Str(_), _) | (_, Value::Str(_)) => Ok(concat(&l, &r)),
                _ => error(format!("invalid operands for +: {} and {}", l, r)),
            },
            BinaryOp::Sub => match (&l, &r) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
                (Value::Str(_), _) | (_, Value::Str(_)) => Ok(concat(&l, &r)),
                _ => error(format!("invalid operands for -: {} and {}", l, r)),
            },
            BinaryOp::Mul => int_op(op, l, r, |a, b| Ok(Value::Int(a.wrapping_mul(b)))),
            BinaryOp::Div => int_op(op, l, r, |a, b| {
                if b == 0 {
                    error("division by zero")
                } else {
                    Ok(Value::Int(a.wrapping_div(b)))
                }
            }),
            BinaryOp::Lt => int_op(op, l, r, |a, b| Ok(Value::Bool(a < b))),
            BinaryOp::Le => int_op(op, l, r, |a, b| Ok(Value::Bool(a <= b))),
            BinaryOp::Gt => int_op(op, l, r, |a, b| Ok(Value::Bool(a > b))),
            BinaryOp::Ge => int_op(op, l, r, |a, b| Ok(Value::Bool(a >= b))),
            BinaryOp::Eq => Ok(Value::Bool(l.identity_eq(&r))),
            BinaryOp::Ne => Ok(Value::Bool(!l.identity_eq(&r))),
        }
    }
}

fn concat(l: &Value, r: &Value) -> Value {
    Value::Str(Rc::from(format!("{}{}", l, r).as_str()))
}

fn int_op(
    op: BinaryOp,
    l: Value,
    r: Value,
    f: impl FnOnce(i64, i64) -> Result<Value>,
) -> Result<Value> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => f(a, b),
        (l, r) => error(format!(
            "invalid operands for {:?}: {} and {}",
            op, l, r
        )),
    }
}
