//! Instruction encoder: [`Instruction`] in, machine-code bytes out.

use crate::ast::{Instruction, Operand};
use crate::error::AsmError;
use crate::isa::x86_16::{
    Mnemonic, Register, JMP_LEN, MODRM_REG_BASE, NOT_REG_BASE, OP_ADD_AX_I16, OP_ADD_RI16,
    OP_ADD_RI8, OP_ADD_RR, OP_GRP_NOT, OP_JMP_REL32, OP_MOV_RI_BASE, OP_MOV_RR, OP_SHR_BY1,
    OP_SHR_I8, PREFIX_OPSIZE, SHR_REG_BASE,
};
use std::fmt::Write as _;

/// Encode one instruction into machine-code bytes.
///
/// Any mnemonic/operand shape outside the documented forms fails with
/// [`AsmError::UnknownCommand`].
pub fn encode(instr: &Instruction) -> Result<Vec<u8>, AsmError> {
    match (instr.mnemonic, instr.operands.as_slice()) {
        (Mnemonic::Mov, [Operand::Reg(dst), Operand::Reg(src)]) => {
            Ok(vec![PREFIX_OPSIZE, OP_MOV_RR, modrm(*dst, *src)])
        }
        (Mnemonic::Mov, [Operand::Reg(dst), Operand::Imm(imm)]) => {
            let [lo, hi] = (imm.value as u16).to_le_bytes();
            Ok(vec![PREFIX_OPSIZE, OP_MOV_RI_BASE + dst.ordinal(), lo, hi])
        }
        (Mnemonic::Add, [Operand::Reg(dst), Operand::Reg(src)]) => {
            Ok(vec![PREFIX_OPSIZE, OP_ADD_RR, modrm(*dst, *src)])
        }
        (Mnemonic::Add, [Operand::Reg(dst), Operand::Imm(imm)]) => {
            Ok(encode_add_imm(*dst, imm.value))
        }
        (Mnemonic::Not, [Operand::Reg(reg)]) => {
            Ok(vec![PREFIX_OPSIZE, OP_GRP_NOT, NOT_REG_BASE + reg.ordinal()])
        }
        (Mnemonic::Shr, [Operand::Reg(reg)]) => Ok(encode_shr(*reg, 1)),
        (Mnemonic::Shr, [Operand::Reg(reg), Operand::Imm(imm)]) => {
            Ok(encode_shr(*reg, (imm.value & 0xff) as u8))
        }
        (Mnemonic::Jmp, [Operand::Imm(imm)]) => {
            // Near jump: store the displacement from the end of the encoded
            // instruction to the absolute target.
            let disp = imm.value.wrapping_sub(JMP_LEN) as u32;
            let [b0, b1, b2, b3] = disp.to_le_bytes();
            Ok(vec![OP_JMP_REL32, b0, b1, b2, b3])
        }
        _ => Err(AsmError::UnknownCommand {
            mnemonic: instr.mnemonic,
        }),
    }
}

/// Register/register modrm byte: both operands live above 0xC0.
fn modrm(dst: Register, src: Register) -> u8 {
    MODRM_REG_BASE + 8 * src.ordinal() + dst.ordinal()
}

fn encode_add_imm(dst: Register, value: i64) -> Vec<u8> {
    let val = value as u16;
    if val < 0x80 {
        vec![PREFIX_OPSIZE, OP_ADD_RI8, MODRM_REG_BASE + dst.ordinal(), val as u8]
    } else if val < 0xff80 {
        let [lo, hi] = val.to_le_bytes();
        if dst == Register::Ax {
            // Shorter accumulator form.
            vec![PREFIX_OPSIZE, OP_ADD_AX_I16, lo, hi]
        } else {
            vec![PREFIX_OPSIZE, OP_ADD_RI16, MODRM_REG_BASE + dst.ordinal(), lo, hi]
        }
    } else {
        // Values >= 0xff80 are small negatives; the sign-extending imm8
        // form reaches them.
        vec![PREFIX_OPSIZE, OP_ADD_RI8, MODRM_REG_BASE + dst.ordinal(), (val & 0xff) as u8]
    }
}

fn encode_shr(reg: Register, count: u8) -> Vec<u8> {
    if count == 1 {
        vec![PREFIX_OPSIZE, OP_SHR_BY1, SHR_REG_BASE + reg.ordinal()]
    } else {
        vec![PREFIX_OPSIZE, OP_SHR_I8, SHR_REG_BASE + reg.ordinal(), count]
    }
}

/// Encode one instruction and render it as lowercase hex text, two digits
/// per byte, no separators.
pub fn assemble(instr: &Instruction) -> Result<String, AsmError> {
    Ok(to_hex(&encode(instr)?))
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(text, "{b:02x}");
    }
    text
}
