//! Byte-stream decoder: hex text in, ordered [`Instruction`]s out.
//!
//! The decoder is an explicit finite-state machine that exactly inverts the
//! encoder in `asm.rs`. There is no resynchronization: the first malformed
//! byte aborts the whole decode.

use crate::ast::{Instruction, Operand};
use crate::error::AsmError;
use crate::isa::x86_16::{
    Mnemonic, Register, JMP_LEN, MODRM_REG_BASE, NOT_REG_BASE, OP_ADD_AX_I16, OP_ADD_RI16,
    OP_ADD_RI8, OP_ADD_RR, OP_GRP_NOT, OP_JMP_REL32, OP_MOV_RI_BASE, OP_MOV_RR, OP_SHR_BY1,
    OP_SHR_I8, PREFIX_OPSIZE, SHR_REG_BASE,
};
use crate::value::Literal;

/// Decoder states. Each operand-bearing state consumes the remaining bytes
/// of its instruction in one step and returns to `NewInstruction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NewInstruction,
    PrefixSeen,
    MovRegReg,
    MovRegImm { opcode: u8 },
    AddRegReg,
    AddRegImm8,
    AddRegImm16,
    AddAxImm16,
    NotReg,
    ShrRegBy1,
    ShrRegImm8,
    JmpOperand,
}

/// Decode hex text into the instructions it encodes.
pub fn disassemble(hex: &str) -> Result<Vec<Instruction>, AsmError> {
    decode(&split_bytes(hex)?)
}

/// Split hex text into byte values, two digits per byte. A trailing odd
/// half-byte is silently dropped.
fn split_bytes(hex: &str) -> Result<Vec<u8>, AsmError> {
    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair).map_err(|_| AsmError::NotANumber {
                literal: String::from_utf8_lossy(pair).into_owned(),
            })?;
            u8::from_str_radix(digits, 16).map_err(|_| AsmError::NotANumber {
                literal: digits.to_string(),
            })
        })
        .collect()
}

/// Walk the byte sequence left to right, emitting one instruction per
/// completed state-machine cycle.
pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>, AsmError> {
    let mut out = Vec::new();
    let mut state = State::NewInstruction;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let byte = bytes[pos];
        pos += 1;

        state = match state {
            State::NewInstruction => match byte {
                PREFIX_OPSIZE => State::PrefixSeen,
                OP_JMP_REL32 => State::JmpOperand,
                _ => return Err(AsmError::UnsupportedOpcode { byte }),
            },
            State::PrefixSeen => match byte {
                OP_MOV_RR => State::MovRegReg,
                0xB8..=0xBB => State::MovRegImm { opcode: byte },
                OP_ADD_RR => State::AddRegReg,
                OP_ADD_RI8 => State::AddRegImm8,
                OP_ADD_RI16 => State::AddRegImm16,
                OP_ADD_AX_I16 => State::AddAxImm16,
                OP_GRP_NOT => State::NotReg,
                OP_SHR_BY1 => State::ShrRegBy1,
                OP_SHR_I8 => State::ShrRegImm8,
                _ => return Err(AsmError::UnsupportedOpcode { byte }),
            },
            State::MovRegReg => {
                let (dst, src) = split_modrm(byte)?;
                out.push(Instruction::with_operands(
                    Mnemonic::Mov,
                    vec![Operand::Reg(dst), Operand::Reg(src)],
                ));
                State::NewInstruction
            }
            State::MovRegImm { opcode } => {
                let dst = register_field(opcode, OP_MOV_RI_BASE)?;
                let hi = take(bytes, &mut pos)?;
                let val = u16::from_le_bytes([byte, hi]);
                out.push(Instruction::with_operands(
                    Mnemonic::Mov,
                    vec![Operand::Reg(dst), Operand::Imm(Literal::hex(val as i64))],
                ));
                State::NewInstruction
            }
            State::AddRegReg => {
                let (dst, src) = split_modrm(byte)?;
                out.push(Instruction::with_operands(
                    Mnemonic::Add,
                    vec![Operand::Reg(dst), Operand::Reg(src)],
                ));
                State::NewInstruction
            }
            State::AddRegImm8 => {
                let dst = register_field(byte, MODRM_REG_BASE)?;
                let mut val = take(bytes, &mut pos)? as u16;
                // Re-widen the sign-extended imm8 into the 16-bit immediate.
                if val >= 0x80 {
                    val |= 0xff00;
                }
                out.push(Instruction::with_operands(
                    Mnemonic::Add,
                    vec![Operand::Reg(dst), Operand::Imm(Literal::hex(val as i64))],
                ));
                State::NewInstruction
            }
            State::AddRegImm16 => {
                let dst = register_field(byte, MODRM_REG_BASE)?;
                let lo = take(bytes, &mut pos)?;
                let hi = take(bytes, &mut pos)?;
                let val = u16::from_le_bytes([lo, hi]);
                out.push(Instruction::with_operands(
                    Mnemonic::Add,
                    vec![Operand::Reg(dst), Operand::Imm(Literal::hex(val as i64))],
                ));
                State::NewInstruction
            }
            State::AddAxImm16 => {
                let hi = take(bytes, &mut pos)?;
                let val = u16::from_le_bytes([byte, hi]);
                out.push(Instruction::with_operands(
                    Mnemonic::Add,
                    vec![
                        Operand::Reg(Register::Ax),
                        Operand::Imm(Literal::hex(val as i64)),
                    ],
                ));
                State::NewInstruction
            }
            State::NotReg => {
                let reg = register_field(byte, NOT_REG_BASE)?;
                out.push(Instruction::with_operands(
                    Mnemonic::Not,
                    vec![Operand::Reg(reg)],
                ));
                State::NewInstruction
            }
            State::ShrRegBy1 => {
                let reg = register_field(byte, SHR_REG_BASE)?;
                out.push(Instruction::with_operands(
                    Mnemonic::Shr,
                    vec![Operand::Reg(reg), Operand::Imm(Literal::hex(1))],
                ));
                State::NewInstruction
            }
            State::ShrRegImm8 => {
                let reg = register_field(byte, SHR_REG_BASE)?;
                let count = take(bytes, &mut pos)?;
                out.push(Instruction::with_operands(
                    Mnemonic::Shr,
                    vec![Operand::Reg(reg), Operand::Imm(Literal::hex(count as i64))],
                ));
                State::NewInstruction
            }
            State::JmpOperand => {
                let b1 = take(bytes, &mut pos)?;
                let b2 = take(bytes, &mut pos)?;
                let b3 = take(bytes, &mut pos)?;
                let raw = u32::from_le_bytes([byte, b1, b2, b3]);
                // Undo the displacement bias to recover the absolute target.
                let target = raw.wrapping_add(JMP_LEN as u32);
                out.push(Instruction::with_operands(
                    Mnemonic::Jmp,
                    vec![Operand::Imm(Literal::hex(target as i64))],
                ));
                State::NewInstruction
            }
        };
    }

    match state {
        State::NewInstruction => Ok(out),
        _ => Err(AsmError::TruncatedStream),
    }
}

fn take(bytes: &[u8], pos: &mut usize) -> Result<u8, AsmError> {
    let byte = bytes
        .get(*pos)
        .copied()
        .ok_or(AsmError::TruncatedStream)?;
    *pos += 1;
    Ok(byte)
}

/// Recover both registers of a two-register modrm byte. Valid only because
/// the register space has exactly 4 entries; a source field above 3 means
/// the byte was not produced by our encoder.
fn split_modrm(byte: u8) -> Result<(Register, Register), AsmError> {
    let v = byte
        .checked_sub(MODRM_REG_BASE)
        .ok_or(AsmError::BadRegister { byte })?;
    let dst = Register::from_ordinal(v % 4).ok_or(AsmError::BadRegister { byte })?;
    let src = Register::from_ordinal(v / 8).ok_or(AsmError::BadRegister { byte })?;
    Ok((dst, src))
}

fn register_field(byte: u8, base: u8) -> Result<Register, AsmError> {
    byte.checked_sub(base)
        .and_then(Register::from_ordinal)
        .ok_or(AsmError::BadRegister { byte })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_trailing_half_byte_is_dropped() {
        assert_eq!(split_bytes("6689c8a").unwrap(), vec![0x66, 0x89, 0xc8]);
    }

    #[test]
    fn non_hex_input_is_rejected() {
        assert_eq!(
            split_bytes("66zz").unwrap_err(),
            AsmError::NotANumber {
                literal: "zz".to_string()
            }
        );
    }

    #[test]
    fn modrm_inverts_encoder_formula() {
        // 0xc0 + 8*src + dst for all 16 register pairs.
        for src in Register::ALL {
            for dst in Register::ALL {
                let byte = 0xc0 + 8 * src.ordinal() + dst.ordinal();
                assert_eq!(split_modrm(byte).unwrap(), (dst, src));
            }
        }
        assert!(split_modrm(0xf8).is_err());
        assert!(split_modrm(0x40).is_err());
    }
}
