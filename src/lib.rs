pub mod asm;
pub mod ast;
pub mod disasm;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod value;

pub mod isa {
    pub mod x86_16; // 16-bit x86-style subset: registers, mnemonics, opcodes
}

pub use asm::{assemble, encode};
pub use ast::{Instruction, Operand};
pub use disasm::{decode, disassemble};
pub use error::{AsmError, Expected};
pub use isa::x86_16::{is_register, Mnemonic, Register};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, render};
pub use value::{format_number, is_value, parse_number, Literal, Radix};
