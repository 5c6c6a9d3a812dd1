//! In-memory instruction representation shared by parser, encoder and
//! decoder.

use crate::isa::x86_16::{Mnemonic, Register};
use crate::value::Literal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Reg(Register),
    Imm(Literal),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(imm) => write!(f, "{imm}"),
        }
    }
}

/// One instruction: mnemonic plus operands in source order.
///
/// Operand order is semantically significant (destination before source for
/// the two-operand forms) and is preserved through every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            operands: Vec::new(),
        }
    }

    pub fn with_operands(mnemonic: Mnemonic, operands: Vec<Operand>) -> Self {
        Self { mnemonic, operands }
    }

    pub fn push(&mut self, operand: Operand) {
        self.operands.push(operand);
    }
}

impl fmt::Display for Instruction {
    /// Canonical text: mnemonic, then operands joined with `", "`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i == 0 {
                write!(f, " {operand}")?;
            } else {
                write!(f, ", {operand}")?;
            }
        }
        Ok(())
    }
}
