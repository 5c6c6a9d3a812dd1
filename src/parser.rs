//! Grammar parser: token stream in, [`Instruction`] out, and the inverse
//! rendering back to canonical text.

use crate::ast::{Instruction, Operand};
use crate::error::{AsmError, Expected};
use crate::isa::x86_16::{Mnemonic, Register};
use crate::lexer::END_OF_LINE;
use crate::value::Literal;

/// Expectation automaton state, advanced one token at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Register { then: AfterRegister },
    Number,
    OptionalNumber,
    RegisterOrNumber,
    Nothing,
}

/// Where the automaton goes after the mandatory first register operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterRegister {
    RegisterOrNumber,
    OptionalNumber,
    Nothing,
}

impl AfterRegister {
    fn into_expect(self) -> Expect {
        match self {
            AfterRegister::RegisterOrNumber => Expect::RegisterOrNumber,
            AfterRegister::OptionalNumber => Expect::OptionalNumber,
            AfterRegister::Nothing => Expect::Nothing,
        }
    }
}

/// Operand grammar per mnemonic.
fn initial_expectation(mnemonic: Mnemonic) -> Expect {
    match mnemonic {
        Mnemonic::Mov | Mnemonic::Add => Expect::Register {
            then: AfterRegister::RegisterOrNumber,
        },
        Mnemonic::Not => Expect::Register {
            then: AfterRegister::Nothing,
        },
        Mnemonic::Shr => Expect::Register {
            then: AfterRegister::OptionalNumber,
        },
        Mnemonic::Jmp => Expect::Number,
    }
}

fn expected_of(state: Expect) -> Expected {
    match state {
        Expect::Register { .. } => Expected::Register,
        Expect::Number | Expect::OptionalNumber => Expected::Number,
        Expect::RegisterOrNumber => Expected::RegisterOrNumber,
        Expect::Nothing => Expected::EndOfLine,
    }
}

fn expect_register(token: &str, lower: &str) -> Result<Register, AsmError> {
    Register::from_name(lower).ok_or_else(|| AsmError::Syntax {
        token: token.to_string(),
        expected: Expected::Register,
    })
}

fn expect_number(token: &str, lower: &str) -> Result<Literal, AsmError> {
    lower.parse::<Literal>().map_err(|_| AsmError::Syntax {
        token: token.to_string(),
        expected: Expected::Number,
    })
}

/// Parse one tokenized line into an instruction.
///
/// Single-space and single-tab tokens are skipped in every state. Operand
/// tokens are normalized to lowercase before matching.
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Instruction, AsmError> {
    let mut tokens = tokens
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| *t != " " && *t != "\t");

    let first = tokens.next().unwrap_or(END_OF_LINE);
    if first == END_OF_LINE {
        return Err(AsmError::Syntax {
            token: first.to_string(),
            expected: Expected::Mnemonic,
        });
    }
    let lower = first.to_lowercase();
    let mnemonic = Mnemonic::from_name(&lower)
        .ok_or(AsmError::UnsupportedMnemonic { mnemonic: lower })?;

    let mut instr = Instruction::new(mnemonic);
    let mut state = initial_expectation(mnemonic);

    for token in tokens {
        let lower = token.to_lowercase();
        state = match state {
            Expect::Register { then } => {
                let reg = expect_register(token, &lower)?;
                instr.push(Operand::Reg(reg));
                then.into_expect()
            }
            Expect::Number => {
                let imm = expect_number(token, &lower)?;
                instr.push(Operand::Imm(imm));
                Expect::Nothing
            }
            Expect::OptionalNumber => {
                // End of line here means the default operand stays omitted.
                if token == END_OF_LINE {
                    return Ok(instr);
                }
                if token == "," {
                    Expect::Number
                } else {
                    return Err(AsmError::Syntax {
                        token: token.to_string(),
                        expected: Expected::Number,
                    });
                }
            }
            Expect::RegisterOrNumber => {
                if token == "," {
                    // Separator before the second operand.
                    Expect::RegisterOrNumber
                } else if let Some(reg) = Register::from_name(&lower) {
                    instr.push(Operand::Reg(reg));
                    Expect::Nothing
                } else if let Ok(imm) = lower.parse::<Literal>() {
                    instr.push(Operand::Imm(imm));
                    Expect::Nothing
                } else {
                    return Err(AsmError::Syntax {
                        token: token.to_string(),
                        expected: Expected::RegisterOrNumber,
                    });
                }
            }
            Expect::Nothing => {
                if token == END_OF_LINE {
                    return Ok(instr);
                }
                return Err(AsmError::Syntax {
                    token: token.to_string(),
                    expected: Expected::EndOfLine,
                });
            }
        };
    }

    // The token stream ended without an end-of-line marker (the lexer's
    // marker was disabled). Accept only states where the grammar is complete.
    match state {
        Expect::Nothing | Expect::OptionalNumber => Ok(instr),
        other => Err(AsmError::Syntax {
            token: END_OF_LINE.to_string(),
            expected: expected_of(other),
        }),
    }
}

/// Render an instruction back to canonical text.
pub fn render(instr: &Instruction) -> String {
    instr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::value::Radix;

    fn parse_line(line: &str) -> Result<Instruction, AsmError> {
        parse(&tokenize(line))
    }

    #[test]
    fn parses_two_register_form() {
        let instr = parse_line("mov ax, cx").unwrap();
        assert_eq!(instr.mnemonic, Mnemonic::Mov);
        assert_eq!(
            instr.operands,
            vec![Operand::Reg(Register::Ax), Operand::Reg(Register::Cx)]
        );
    }

    #[test]
    fn parses_immediate_and_normalizes_case() {
        let instr = parse_line("MOV BX, 0X10").unwrap();
        assert_eq!(
            instr.operands,
            vec![
                Operand::Reg(Register::Bx),
                Operand::Imm(Literal::new(16, Radix::Hex)),
            ]
        );
    }

    #[test]
    fn shr_count_is_optional() {
        let bare = parse_line("shr ax").unwrap();
        assert_eq!(bare.operands, vec![Operand::Reg(Register::Ax)]);

        let counted = parse_line("shr ax, 2").unwrap();
        assert_eq!(counted.operands.len(), 2);
    }

    #[test]
    fn missing_second_operand_is_a_syntax_error() {
        let err = parse_line("mov ax").unwrap_err();
        assert_eq!(
            err,
            AsmError::Syntax {
                token: "\n".to_string(),
                expected: Expected::RegisterOrNumber,
            }
        );
    }

    #[test]
    fn malformed_literal_is_a_syntax_error_not_a_number_error() {
        let err = parse_line("mov ax, 0xzz").unwrap_err();
        assert_eq!(
            err,
            AsmError::Syntax {
                token: "0xzz".to_string(),
                expected: Expected::RegisterOrNumber,
            }
        );
    }

    #[test]
    fn unknown_mnemonic_fails() {
        let err = parse_line("sub ax, cx").unwrap_err();
        assert_eq!(
            err,
            AsmError::UnsupportedMnemonic {
                mnemonic: "sub".to_string()
            }
        );
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse_line("not ax cx").unwrap_err();
        assert_eq!(
            err,
            AsmError::Syntax {
                token: "cx".to_string(),
                expected: Expected::EndOfLine,
            }
        );
    }

    #[test]
    fn jmp_requires_a_number() {
        assert!(parse_line("jmp 0x10").is_ok());
        let err = parse_line("jmp ax").unwrap_err();
        assert_eq!(
            err,
            AsmError::Syntax {
                token: "ax".to_string(),
                expected: Expected::Number,
            }
        );
    }

    #[test]
    fn empty_line_expects_a_mnemonic() {
        let err = parse_line("   ").unwrap_err();
        assert!(matches!(
            err,
            AsmError::Syntax {
                expected: Expected::Mnemonic,
                ..
            }
        ));
    }
}
