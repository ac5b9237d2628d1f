//! allude_disasm 命令行入口
//!
//! 从文件或标准输入读取十六进制指令字（或 RV32 ELF 文件），
//! 输出反汇编清单。

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use allude_disasm::Result;
use allude_disasm::isa::IsaConfig;
use allude_disasm::listing::{disassemble_stream, parse_hex};
use allude_disasm::loader::ElfText;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "allude_disasm_cli",
    version,
    about = "RV32I + Zicsr disassembler"
)]
struct Cli {
    /// Input file: one hex word per line, `address:word` allowed (default: stdin)
    input: Option<PathBuf>,

    /// Treat the input as an RV32 ELF file and disassemble its executable sections
    #[arg(long, requires = "input")]
    elf: bool,

    /// Start address for lines without an explicit address (hex)
    #[arg(long, default_value = "0x0", value_parser = parse_hex)]
    pc: u32,

    /// Disable the Zicsr extension; CSR instructions print as ????
    #[arg(long)]
    no_zicsr: bool,

    /// Print the instruction table summary and exit
    #[arg(long)]
    summary: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = if cli.no_zicsr {
        IsaConfig::new()
    } else {
        IsaConfig::default()
    };

    if cli.summary {
        print!("{}", config.summary());
        return Ok(());
    }

    let disasm = config.build()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match (cli.input, cli.elf) {
        (Some(path), true) => {
            let text = ElfText::parse(&path)?;
            writeln!(out, "entry: 0x{:08x}", text.entry)?;
            for section in &text.sections {
                log::debug!(
                    "{}: {} bytes at 0x{:08x}",
                    section.name,
                    section.data.len(),
                    section.addr
                );
            }
            for line in text.listing(&disasm) {
                writeln!(out, "{}", line)?;
            }
        }
        (Some(path), false) => {
            let reader = BufReader::new(File::open(&path)?);
            let n = disassemble_stream(reader, &mut out, &disasm, cli.pc)?;
            log::info!("{} instruction(s) from {}", n, path.display());
        }
        (None, _) => {
            let n = disassemble_stream(io::stdin().lock(), &mut out, &disasm, cli.pc)?;
            log::info!("{} instruction(s) from stdin", n);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
