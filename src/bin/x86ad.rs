use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use x86ad_rs::{asm, disasm, lexer, parser, Instruction};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble and disassemble a tiny 16-bit x86-style instruction subset"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble source text into hex-encoded machine code
    Asm {
        /// Input assembly file (one instruction per line)
        #[arg(short, long)]
        input: PathBuf,
        /// Output file for the hex-encoded bytes
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Disassemble hex-encoded machine code back to source text
    Disasm {
        /// Input file with hex-encoded bytes
        #[arg(short, long)]
        input: PathBuf,
        /// Output file for the recovered source text
        #[arg(short, long)]
        output: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Asm { input, output } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            // The whole result is built before anything is written, so a
            // failing line never leaves a partial output file behind.
            let mut hex = String::new();
            for (idx, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let tokens = lexer::tokenize(line);
                let instr =
                    parser::parse(&tokens).with_context(|| format!("line {}", idx + 1))?;
                let encoded =
                    asm::assemble(&instr).with_context(|| format!("line {}", idx + 1))?;
                tracing::debug!(line = idx + 1, instr = %instr, bytes = %encoded, "assembled");
                hex.push_str(&encoded);
            }
            fs::write(&output, hex).with_context(|| format!("writing {}", output.display()))?;
        }
        Command::Disasm {
            input,
            output,
            format,
        } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let mut instrs: Vec<Instruction> = Vec::new();
            for (idx, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let decoded =
                    disasm::disassemble(line).with_context(|| format!("line {}", idx + 1))?;
                tracing::debug!(line = idx + 1, count = decoded.len(), "disassembled");
                instrs.extend(decoded);
            }
            let rendered = match format {
                OutputFormat::Text => {
                    let mut s = String::new();
                    for instr in &instrs {
                        s.push_str(&instr.to_string());
                        s.push('\n');
                    }
                    s
                }
                OutputFormat::Json => {
                    let mut s = serde_json::to_string_pretty(&instrs)?;
                    s.push('\n');
                    s
                }
            };
            fs::write(&output, rendered)
                .with_context(|| format!("writing {}", output.display()))?;
        }
    }

    Ok(())
}
