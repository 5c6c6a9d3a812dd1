use pretty_assertions::assert_eq;
use x86ad_rs::{disasm, AsmError};

fn render_all(hex: &str) -> Vec<String> {
    disasm::disassemble(hex)
        .unwrap()
        .iter()
        .map(|i| i.to_string())
        .collect()
}

#[test]
fn mov_reg_reg() {
    assert_eq!(render_all("6689c8"), vec!["mov ax, cx"]);
    assert_eq!(render_all("6689d3"), vec!["mov bx, dx"]);
}

#[test]
fn mov_reg_imm_renders_hex() {
    assert_eq!(render_all("66b81000"), vec!["mov ax, 0x10"]);
    assert_eq!(render_all("66bb3412"), vec!["mov bx, 0x1234"]);
    assert_eq!(render_all("66b90000"), vec!["mov cx, 0x0"]);
}

#[test]
fn add_forms_decode_to_the_same_mnemonic() {
    assert_eq!(render_all("6601da"), vec!["add dx, bx"]);
    assert_eq!(render_all("6683c07f"), vec!["add ax, 0x7f"]);
    assert_eq!(render_all("6681c38000"), vec!["add bx, 0x80"]);
    // implicit accumulator destination
    assert_eq!(render_all("66058000"), vec!["add ax, 0x80"]);
}

#[test]
fn add_imm8_sign_extends_high_values() {
    assert_eq!(render_all("6683c180"), vec!["add cx, 0xff80"]);
    assert_eq!(render_all("6683c0ff"), vec!["add ax, 0xffff"]);
    assert_eq!(render_all("6683c07f"), vec!["add ax, 0x7f"]);
}

#[test]
fn not_and_shr() {
    assert_eq!(render_all("66f7d2"), vec!["not dx"]);
    // the by-one form decodes with an explicit count
    assert_eq!(render_all("66d1e8"), vec!["shr ax, 0x1"]);
    assert_eq!(render_all("66c1eb02"), vec!["shr bx, 0x2"]);
}

#[test]
fn jmp_recovers_the_absolute_target() {
    assert_eq!(render_all("e90c000000"), vec!["jmp 0x10"]);
    assert_eq!(render_all("e900000000"), vec!["jmp 0x4"]);
    assert_eq!(render_all("e9fcffffff"), vec!["jmp 0x0"]);
}

#[test]
fn decodes_a_concatenated_stream_in_order() {
    assert_eq!(
        render_all("6689c8e90c00000066f7d066b81000"),
        vec!["mov ax, cx", "jmp 0x10", "not ax", "mov ax, 0x10"]
    );
}

#[test]
fn unknown_leading_byte_fails() {
    assert_eq!(
        disasm::disassemble("ff").unwrap_err(),
        AsmError::UnsupportedOpcode { byte: 0xff }
    );
}

#[test]
fn unknown_opcode_after_prefix_fails() {
    assert_eq!(
        disasm::disassemble("6690").unwrap_err(),
        AsmError::UnsupportedOpcode { byte: 0x90 }
    );
}

#[test]
fn error_discards_earlier_instructions() {
    // One good instruction followed by garbage: the whole decode fails.
    assert!(disasm::disassemble("6689c8ff").is_err());
}

#[test]
fn truncated_stream_fails() {
    assert_eq!(
        disasm::disassemble("66").unwrap_err(),
        AsmError::TruncatedStream
    );
    assert_eq!(
        disasm::disassemble("66b810").unwrap_err(),
        AsmError::TruncatedStream
    );
    assert_eq!(
        disasm::disassemble("e90c0000").unwrap_err(),
        AsmError::TruncatedStream
    );
}

#[test]
fn bad_register_field_fails() {
    // 0xf8 after 66 89 asks for source ordinal 7
    assert_eq!(
        disasm::disassemble("6689f8").unwrap_err(),
        AsmError::BadRegister { byte: 0xf8 }
    );
}

#[test]
fn odd_trailing_half_byte_is_ignored() {
    assert_eq!(render_all("6689c8a"), vec!["mov ax, cx"]);
}

#[test]
fn uppercase_hex_is_accepted() {
    assert_eq!(render_all("6689C8"), vec!["mov ax, cx"]);
}
