//! ELF 输入
//!
//! 从 RV32 ELF 文件中取出可执行节（`SHF_EXECINSTR`）用于反汇编。
//!
//! # 示例
//!
//! ```no_run
//! use allude_disasm::isa::IsaConfig;
//! use allude_disasm::loader::ElfText;
//!
//! let disasm = IsaConfig::default().build().expect("默认表合法");
//! let text = ElfText::parse("program.elf").expect("Failed to parse ELF");
//! for line in text.listing(&disasm) {
//!     println!("{}", line);
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use elf::ElfBytes;
use elf::abi::{EM_RISCV, SHF_EXECINSTR, SHT_PROGBITS};
use elf::endian::AnyEndian;

use crate::error::{DisasmError, Result};
use crate::isa::Disassembler;
use crate::listing::{ListingLine, disassemble_bytes};

/// 一个可执行节
#[derive(Debug, Clone)]
pub struct TextSection {
    /// 节名称（无字符串表时为空）
    pub name: String,
    /// 加载地址
    pub addr: u32,
    /// 节内容
    pub data: Vec<u8>,
}

/// ELF 文件中的全部可执行节
#[derive(Debug, Clone)]
pub struct ElfText {
    /// 入口点地址
    pub entry: u32,
    /// 可执行节（按节头表顺序）
    pub sections: Vec<TextSection>,
}

impl ElfText {
    /// 解析 ELF 文件
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        log::info!("Loaded {} ({} bytes)", path.as_ref().display(), data.len());
        Self::parse_bytes(&data)
    }

    /// 从字节数组解析 ELF（使用 elf crate）
    pub fn parse_bytes(data: &[u8]) -> Result<Self> {
        let elf_file = ElfBytes::<AnyEndian>::minimal_parse(data)
            .map_err(|e| DisasmError::ElfParse(format!("Failed to parse ELF: {}", e)))?;

        let header = &elf_file.ehdr;

        // 检查机器类型
        if header.e_machine != EM_RISCV {
            return Err(DisasmError::ElfParse(format!(
                "Not a RISC-V ELF (machine type: 0x{:x}, expected 0x{:x})",
                header.e_machine, EM_RISCV
            )));
        }

        // 检查是否为 32 位
        if header.class != elf::file::Class::ELF32 {
            return Err(DisasmError::ElfParse("Only 32-bit ELF is supported".into()));
        }

        let (shdrs, strtab) = elf_file
            .section_headers_with_strtab()
            .map_err(|e| DisasmError::ElfParse(format!("Failed to read section headers: {}", e)))?;
        let Some(shdrs) = shdrs else {
            return Err(DisasmError::ElfParse("No section headers".into()));
        };

        let mut sections = Vec::new();
        for shdr in shdrs.iter() {
            if shdr.sh_type != SHT_PROGBITS || shdr.sh_flags & (SHF_EXECINSTR as u64) == 0 {
                continue;
            }

            let name = strtab
                .as_ref()
                .and_then(|strtab| strtab.get(shdr.sh_name as usize).ok())
                .unwrap_or_default()
                .to_string();

            let (section_data, compression) = elf_file.section_data(&shdr).map_err(|e| {
                DisasmError::ElfParse(format!("Failed to read section {}: {}", name, e))
            })?;
            if compression.is_some() {
                log::warn!("skipping compressed section {}", name);
                continue;
            }

            log::info!(
                "  {}: 0x{:08x} - 0x{:08x}",
                name,
                shdr.sh_addr,
                shdr.sh_addr + shdr.sh_size
            );
            sections.push(TextSection {
                name,
                addr: shdr.sh_addr as u32,
                data: section_data.to_vec(),
            });
        }

        if sections.is_empty() {
            log::warn!("no executable sections found");
        }

        Ok(ElfText {
            entry: header.e_entry as u32,
            sections,
        })
    }

    /// 反汇编全部可执行节
    pub fn listing(&self, disasm: &Disassembler) -> Vec<ListingLine> {
        self.sections
            .iter()
            .flat_map(|section| disassemble_bytes(disasm, section.addr, &section.data))
            .collect()
    }
}
