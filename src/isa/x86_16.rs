//! The 16-bit x86-style subset: registers, mnemonics, and the opcode
//! constants shared by the encoder and the decoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand-size override prefix carried by every encoding except `jmp`.
pub const PREFIX_OPSIZE: u8 = 0x66;

pub const OP_MOV_RR: u8 = 0x89;
pub const OP_MOV_RI_BASE: u8 = 0xB8; // 0xB8 + ordinal(dst)
pub const OP_ADD_RR: u8 = 0x01;
pub const OP_ADD_RI8: u8 = 0x83; // sign-extended imm8
pub const OP_ADD_RI16: u8 = 0x81;
pub const OP_ADD_AX_I16: u8 = 0x05; // implicit ax destination
pub const OP_GRP_NOT: u8 = 0xF7;
pub const OP_SHR_BY1: u8 = 0xD1;
pub const OP_SHR_I8: u8 = 0xC1;
pub const OP_JMP_REL32: u8 = 0xE9;

/// Base offsets for register fields embedded in an operand byte.
pub const MODRM_REG_BASE: u8 = 0xC0;
pub const NOT_REG_BASE: u8 = 0xD0;
pub const SHR_REG_BASE: u8 = 0xE8;

/// Encoded length of the `jmp` instruction; near-jump displacements are
/// stored relative to the byte following it.
pub const JMP_LEN: i64 = 4;

/// The four registers of the subset. The discriminant is the encoding
/// ordinal, so the ordinal table and its inverse cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
}

impl Register {
    pub const ALL: [Register; 4] = [Register::Ax, Register::Cx, Register::Dx, Register::Bx];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Register> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Register by lowercase name. Callers normalize case beforehand.
    pub fn from_name(name: &str) -> Option<Register> {
        match name {
            "ax" => Some(Register::Ax),
            "cx" => Some(Register::Cx),
            "dx" => Some(Register::Dx),
            "bx" => Some(Register::Bx),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Ax => "ax",
            Register::Cx => "cx",
            Register::Dx => "dx",
            Register::Bx => "bx",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Is `text` one of the four register names?
pub fn is_register(text: &str) -> bool {
    Register::from_name(text).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    Mov,
    Add,
    Not,
    Shr,
    Jmp,
}

impl Mnemonic {
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        match name {
            "mov" => Some(Mnemonic::Mov),
            "add" => Some(Mnemonic::Add),
            "not" => Some(Mnemonic::Not),
            "shr" => Some(Mnemonic::Shr),
            "jmp" => Some(Mnemonic::Jmp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::Add => "add",
            Mnemonic::Not => "not",
            Mnemonic::Shr => "shr",
            Mnemonic::Jmp => "jmp",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_roundtrip() {
        for reg in Register::ALL {
            assert_eq!(Register::from_ordinal(reg.ordinal()), Some(reg));
        }
        assert_eq!(Register::from_ordinal(4), None);
    }

    #[test]
    fn name_roundtrip() {
        for reg in Register::ALL {
            assert_eq!(Register::from_name(reg.name()), Some(reg));
        }
        assert!(!is_register("sp"));
        assert!(is_register("dx"));
    }

    #[test]
    fn mnemonic_names() {
        for m in [
            Mnemonic::Mov,
            Mnemonic::Add,
            Mnemonic::Not,
            Mnemonic::Shr,
            Mnemonic::Jmp,
        ] {
            assert_eq!(Mnemonic::from_name(m.name()), Some(m));
        }
        assert_eq!(Mnemonic::from_name("sub"), None);
    }
}
