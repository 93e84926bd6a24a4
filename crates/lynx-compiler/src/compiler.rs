//! Bytecode compiler from validated AST to a class file.
//!
//! Top-level statements compile into `main`, top-level `var` declarations
//! become class fields, and every function definition becomes a method.
//! A bare-expression program compiles into a `main` that returns its
//! boxed value.

use std::collections::HashMap;

use lynx_bytecode::{method_descriptor, type_descriptor, ClassFile, Field, Instruction as BC, Method};
use lynx_syntax::ast::{Expr, Program, StmtKind};
use lynx_syntax::error::{Error, Result};
use lynx_syntax::types::Type;

use crate::builder::MethodBuilder;

/// Call-site facts about a compiled function.
#[derive(Debug, Clone)]
pub(crate) struct FnInfo {
    pub index: usize,
    pub params: Vec<Type>,
    pub ret: Type,
}

pub struct Compiler {
    fns: HashMap<String, FnInfo>,
    field_types: HashMap<String, Type>,
}

/// Compile a validated program in one call.
pub fn compile(program: &Program) -> Result<ClassFile> {
    Compiler::new().compile_program(program)
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            fns: HashMap::new(),
            field_types: HashMap::new(),
        }
    }

    pub(crate) fn fn_info(&self, name: &str) -> Result<FnInfo> {
        self.fns
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new(format!("undefined function '{}'", name)))
    }

    pub(crate) fn field_type(&self, name: &str) -> Result<Type> {
        self.field_types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new(format!("undefined variable '{}'", name)))
    }

    pub fn compile_program(mut self, program: &Program) -> Result<ClassFile> {
        if let Some(expr) = &program.expression {
            return self.compile_expression_main(expr);
        }

        // First pass: collect function signatures and field declarations
        // so call sites and global reads resolve in any order.
        let mut fields = Vec::new();
        for stmt in &program.statements {
            match &stmt.kind {
                StmtKind::FunctionDef(f) => {
                    let params: Vec<Type> = (0..f.params.len()).map(|i| f.param_type(i)).collect();
                    let ret = f.declared_return_type();
                    self.fns.insert(
                        f.name.clone(),
                        FnInfo {
                            index: self.fns.len(),
                            params,
                            ret,
                        },
                    );
                }
                StmtKind::Var { name, declared, .. } => {
                    let ty = declared
                        .clone()
                        .ok_or_else(|| Error::new("cannot compile an unvalidated tree"))?;
                    fields.push(Field {
                        name: name.clone(),
                        descriptor: type_descriptor(&ty).to_string(),
                    });
                    self.field_types.insert(name.clone(), ty);
                }
                _ => {}
            }
        }

        // Second pass: compile the methods.
        let mut methods: Vec<Option<Method>> = vec![None; self.fns.len()];
        for stmt in &program.statements {
            if let StmtKind::FunctionDef(f) = &stmt.kind {
                let info = self.fn_info(&f.name)?;
                let descriptor = method_descriptor(&info.params, &info.ret);
                let mut b = MethodBuilder::new(
                    f.name.clone(),
                    descriptor,
                    f.params.len(),
                    info.ret.clone(),
                );
                for (i, p) in f.params.iter().enumerate() {
                    b.declare_param(p.name.clone(), f.param_type(i))?;
                }
                for s in &f.body {
                    b.emit_stmt(&self, s)?;
                }
                if info.ret == Type::Void {
                    b.emit(BC::ReturnVoid);
                }
                methods[info.index] = Some(b.finish());
            }
        }
        let methods = methods
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::new("function registered but never compiled"))?;

        // Top-level statements become main; vars store into fields.
        let mut b = MethodBuilder::new("main".to_string(), "()V".to_string(), 0, Type::Void);
        for stmt in &program.statements {
            match &stmt.kind {
                StmtKind::FunctionDef(_) => {}
                StmtKind::Var {
                    name,
                    init,
                    declared,
                    ..
                } => {
                    let ty = declared
                        .clone()
                        .ok_or_else(|| Error::new("cannot compile an unvalidated tree"))?;
                    b.emit_expr(&self, init)?;
                    b.adapt(&expr_type(init)?, &ty);
                    b.emit(BC::PutField(name.clone()));
                }
                _ => b.emit_stmt(&self, stmt)?,
            }
        }
        b.emit(BC::Halt);

        Ok(ClassFile {
            name: "Main".to_string(),
            fields,
            methods,
            main: b.finish(),
        })
    }

    fn compile_expression_main(self, expr: &Expr) -> Result<ClassFile> {
        let mut b = MethodBuilder::new(
            "main".to_string(),
            "()Ljava/lang/Object;".to_string(),
            0,
            Type::Object,
        );
        b.emit_expr(&self, expr)?;
        b.adapt(&expr_type(expr)?, &Type::Object);
        b.emit(BC::AReturn);
        Ok(ClassFile {
            name: "Main".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            main: b.finish(),
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn expr_type(e: &Expr) -> Result<Type> {
    e.ty
        .clone()
        .ok_or_else(|| Error::new("cannot compile an unvalidated tree"))
}
