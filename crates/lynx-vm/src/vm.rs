//! The bytecode execution engine.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

use lynx_bytecode::{ClassFile, CmpOp, Instruction as BC, Method, Prim};
use lynx_syntax::error::{error, Result};
use lynx_syntax::types::Type;

use crate::obj::{ref_eq, Obj, Slot};

pub struct Vm {
    /// Class fields holding the program's top-level variables
    fields: HashMap<String, Slot>,
    output: String,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            output: String::new(),
        }
    }

    /// Everything the program printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Execute a class file's `main`, returning the boxed value of an
    /// expression-mode program and `None` otherwise.
    pub fn run(&mut self, class: &ClassFile) -> Result<Option<Rc<Obj>>> {
        self.fields.clear();
        for f in &class.fields {
            // JVM-style defaults: primitive slots zero, references null
            let slot = if f.descriptor == "I" {
                Slot::Int(0)
            } else {
                Slot::Ref(Rc::new(Obj::Null))
            };
            self.fields.insert(f.name.clone(), slot);
        }
        match self.exec_method(class, &class.main, Vec::new())? {
            Some(slot) => Ok(Some(boxed(slot))),
            None => Ok(None),
        }
    }

    fn exec_method(
        &mut self,
        class: &ClassFile,
        method: &Method,
        args: Vec<Slot>,
    ) -> Result<Option<Slot>> {
        let mut locals = args;
        locals.resize(method.local_count.max(locals.len()), Slot::Int(0));
        let mut stack: Vec<Slot> = Vec::new();
        let mut ip = 0usize;
        loop {
            let inst = match method.code.get(ip) {
                Some(i) => i,
                None => return error(format!("fell off the end of '{}'", method.name)),
            };
            match inst {
                BC::PushInt(n) => stack.push(Slot::Int(*n)),
                BC::PushStr(s) => stack.push(Slot::Ref(Rc::new(Obj::Str(s.clone())))),
                BC::PushBool(b) => stack.push(Slot::Bool(*b)),
                BC::PushNull => stack.push(Slot::Ref(Rc::new(Obj::Null))),
                BC::IAdd => {
                    let (a, b) = pop_int_pair(&mut stack)?;
                    stack.push(Slot::Int(a.wrapping_add(b)));
                }
                BC::ISub => {
                    let (a, b) = pop_int_pair(&mut stack)?;
                    stack.push(Slot::Int(a.wrapping_sub(b)));
                }
                BC::IMul => {
                    let (a, b) = pop_int_pair(&mut stack)?;
                    stack.push(Slot::Int(a.wrapping_mul(b)));
                }
                BC::IDiv => {
                    let (a, b) = pop_int_pair(&mut stack)?;
                    if b == 0 {
                        return error("division by zero");
                    }
                    stack.push(Slot::Int(a.wrapping_div(b)));
                }
                BC::INeg => {
                    let n = pop_int(&mut stack)?;
                    stack.push(Slot::Int(n.wrapping_neg()));
                }
                BC::BoolNot => {
                    let b = pop_bool(&mut stack)?;
                    stack.push(Slot::Bool(!b));
                }
                BC::ICmp(op) => {
                    let (a, b) = pop_int_pair(&mut stack)?;
                    let r = match op {
                        CmpOp::Lt => a < b,
                        CmpOp::Le => a <= b,
                        CmpOp::Gt => a > b,
                        CmpOp::Ge => a >= b,
                    };
                    stack.push(Slot::Bool(r));
                }
                BC::RefCmp { negate } => {
                    let b = pop_ref(&mut stack)?;
                    let a = pop_ref(&mut stack)?;
                    stack.push(Slot::Bool(ref_eq(&a, &b) != *negate));
                }
                BC::Box(_) => {
                    let slot = pop(&mut stack)?;
                    stack.push(Slot::Ref(boxed(slot)));
                }
                BC::Unbox(prim) => {
                    let r = pop_ref(&mut stack)?;
                    match (prim, &*r) {
                        (Prim::Int, Obj::Int(n)) => stack.push(Slot::Int(*n)),
                        (Prim::Bool, Obj::Bool(b)) => stack.push(Slot::Bool(*b)),
                        (_, Obj::Null) => return error("unboxed a null reference"),
                        (_, other) => return error(format!("cannot unbox {}", other)),
                    }
                }
                BC::ToString => {
                    let r = pop_ref(&mut stack)?;
                    let s = match &*r {
                        Obj::Str(_) => r,
                        other => Rc::new(Obj::Str(other.to_string())),
                    };
                    stack.push(Slot::Ref(s));
                }
                BC::Concat => {
                    let b = pop_str(&mut stack)?;
                    let a = pop_str(&mut stack)?;
                    stack.push(Slot::Ref(Rc::new(Obj::Str(format!("{}{}", a, b)))));
                }
                BC::MakeList(n) => {
                    let mut items = Vec::with_capacity(*n);
                    for _ in 0..*n {
                        items.push(pop_ref(&mut stack)?);
                    }
                    items.reverse();
                    stack.push(Slot::Ref(Rc::new(Obj::List(items))));
                }
                BC::GetIter => {
                    let r = pop_ref(&mut stack)?;
                    match &*r {
                        Obj::List(_) => stack.push(Slot::Ref(Rc::new(Obj::Iter {
                            list: r.clone(),
                            pos: Cell::new(0),
                        }))),
                        other => return error(format!("cannot iterate {}", other)),
                    }
                }
                BC::IterHasNext => {
                    let r = pop_ref(&mut stack)?;
                    match &*r {
                        Obj::Iter { list, pos } => {
                            let len = list_len(list)?;
                            stack.push(Slot::Bool(pos.get() < len));
                        }
                        other => return error(format!("expected iterator, got {}", other)),
                    }
                }
                BC::IterNext => {
                    let r = pop_ref(&mut stack)?;
                    match &*r {
                        Obj::Iter { list, pos } => {
                            let item = match &**list {
                                Obj::List(items) => items.get(pos.get()).cloned(),
                                _ => None,
                            };
                            match item {
                                Some(item) => {
                                    pos.set(pos.get() + 1);
                                    stack.push(Slot::Ref(item));
                                }
                                None => return error("iterator exhausted"),
                            }
                        }
                        other => return error(format!("expected iterator, got {}", other)),
                    }
                }
                BC::CheckCast(ty) => {
                    let r = pop_ref(&mut stack)?;
                    if !cast_ok(ty, &r) {
                        return error(format!("cannot cast {} to {}", r, ty));
                    }
                    stack.push(Slot::Ref(r));
                }
                BC::LoadLocal(i) => {
                    let slot = locals
                        .get(*i as usize)
                        .cloned()
                        .ok_or_else(|| lynx_syntax::error::Error::new("local out of range"))?;
                    stack.push(slot);
                }
                BC::StoreLocal(i) => {
                    let slot = pop(&mut stack)?;
                    let i = *i as usize;
                    if i >= locals.len() {
                        return error("local out of range");
                    }
                    locals[i] = slot;
                }
                BC::GetField(name) => {
                    let slot = self
                        .fields
                        .get(name)
                        .cloned()
                        .ok_or_else(|| {
                            lynx_syntax::error::Error::new(format!("no such field '{}'", name))
                        })?;
                    stack.push(slot);
                }
                BC::PutField(name) => {
                    let slot = pop(&mut stack)?;
                    self.fields.insert(name.clone(), slot);
                }
                BC::Print => {
                    let r = pop_ref(&mut stack)?;
                    let _ = writeln!(self.output, "{}", r);
                }
                BC::Jump(t) => {
                    ip = *t;
                    continue;
                }
                BC::JumpIfFalse(t) => {
                    if !pop_bool(&mut stack)? {
                        ip = *t;
                        continue;
                    }
                }
                BC::Call(idx, argc) => {
                    let callee = class
                        .methods
                        .get(*idx)
                        .ok_or_else(|| lynx_syntax::error::Error::new("bad method index"))?;
                    if stack.len() < *argc {
                        return error("stack underflow");
                    }
                    let args = stack.split_off(stack.len() - argc);
                    if let Some(v) = self.exec_method(class, callee, args)? {
                        stack.push(v);
                    }
                }
                BC::IReturn | BC::AReturn => return Ok(Some(pop(&mut stack)?)),
                BC::ReturnVoid => return Ok(None),
                BC::Pop => {
                    pop(&mut stack)?;
                }
                BC::Halt => return Ok(None),
            }
            ip += 1;
        }
    }
}

fn boxed(slot: Slot) -> Rc<Obj> {
    match slot {
        Slot::Int(n) => Rc::new(Obj::Int(n)),
        Slot::Bool(b) => Rc::new(Obj::Bool(b)),
        Slot::Ref(r) => r,
    }
}

fn cast_ok(ty: &Type, r: &Rc<Obj>) -> bool {
    match (&**r, ty) {
        (Obj::Null, _) => true,
        (_, Type::Object) => true,
        (Obj::Int(_), Type::Int) => true,
        (Obj::Bool(_), Type::Bool) => true,
        (Obj::Str(_), Type::String) => true,
        (Obj::List(_), Type::List(_)) => true,
        _ => false,
    }
}

fn list_len(list: &Rc<Obj>) -> Result<usize> {
    match &**list {
        Obj::List(items) => Ok(items.len()),
        other => error(format!("expected list, got {}", other)),
    }
}

fn pop(stack: &mut Vec<Slot>) -> Result<Slot> {
    stack.pop().ok_or_else(|| "stack underflow".into())
}

fn pop_int(stack: &mut Vec<Slot>) -> Result<i64> {
    match pop(stack)? {
        Slot::Int(n) => Ok(n),
        other => error(format!("expected int slot, got {:?}", other)),
    }
}

fn pop_int_pair(stack: &mut Vec<Slot>) -> Result<(i64, i64)> {
    let b = pop_int(stack)?;
    let a = pop_int(stack)?;
    Ok((a, b))
}

fn pop_bool(stack: &mut Vec<Slot>) -> Result<bool> {
    match pop(stack)? {
        Slot::Bool(b) => Ok(b),
        other => error(format!("expected bool slot, got {:?}", other)),
    }
}

fn pop_ref(stack: &mut Vec<Slot>) -> Result<Rc<Obj>> {
    match pop(stack)? {
        Slot::Ref(r) => Ok(r),
        other => error(format!("expected reference slot, got {:?}", other)),
    }
}

fn pop_str(stack: &mut Vec<Slot>) -> Result<Rc<Obj>> {
    let r = pop_ref(stack)?;
    match &*r {
        Obj::Str(_) => Ok(r),
        other => error(format!("expected string, got {}", other)),
    }
}
