use crate::isa::x86_16::Mnemonic;
use std::fmt;
use thiserror::Error;

/// The token category a grammar state was waiting for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Mnemonic,
    Register,
    Number,
    RegisterOrNumber,
    EndOfLine,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Expected::Mnemonic => "an instruction mnemonic",
            Expected::Register => "a register",
            Expected::Number => "a number",
            Expected::RegisterOrNumber => "a register or a number",
            Expected::EndOfLine => "no further tokens",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("unexpected token `{token}`: expected {expected}")]
    Syntax { token: String, expected: Expected },

    #[error("unsupported instruction `{mnemonic}`")]
    UnsupportedMnemonic { mnemonic: String },

    #[error("unsupported instruction: opcode byte {byte:#04x}")]
    UnsupportedOpcode { byte: u8 },

    #[error("byte {byte:#04x} does not encode a register operand")]
    BadRegister { byte: u8 },

    #[error("unknown operand combination for `{mnemonic}`")]
    UnknownCommand { mnemonic: Mnemonic },

    #[error("`{literal}` is not a number")]
    NotANumber { literal: String },

    #[error("byte stream ends in the middle of an instruction")]
    TruncatedStream,
}
