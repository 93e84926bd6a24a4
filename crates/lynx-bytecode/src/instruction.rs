//! The Lynx bytecode instruction set.
//!
//! The machine is stack based and distinguishes unboxed primitive slots
//! (ints and bools, both carried as `I`) from references to heap objects.
//! Explicit `Box`/`Unbox` instructions move values between the two
//! representations; the compiler inserts them wherever a primitive flows
//! into an object-typed position.

/// Primitive slot categories for boxing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    Int,
    Bool,
}

/// Ordering comparisons over unboxed ints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // Constants
    PushInt(i64),
    PushStr(String),
    PushBool(bool),
    PushNull,

    // Integer arithmetic (unboxed operands)
    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,
    BoolNot,
    ICmp(CmpOp),

    // Reference identity comparison; `negate` selects `!=`
    RefCmp { negate: bool },

    // Representation changes
    Box(Prim),
    Unbox(Prim),
    ToString,
    Concat,

    // Lists and iteration
    MakeList(usize),
    GetIter,
    IterHasNext,
    IterNext,
    CheckCast(lynx_syntax::types::Type),

    // Locals and fields (fields hold top-level program variables)
    LoadLocal(u16),
    StoreLocal(u16),
    GetField(String),
    PutField(String),

    // Output
    Print,

    // Control flow (absolute instruction index targets)
    Jump(usize),
    JumpIfFalse(usize),

    // Calls and returns; return selection follows the declared type
    Call(usize, usize),
    IReturn,
    AReturn,
    ReturnVoid,

    // Stack management
    Pop,

    // Program control
    Halt,
}
