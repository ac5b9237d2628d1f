//! 反汇编清单
//!
//! 把十六进制文本或原始字节转换为 `地址: 指令字 汇编` 形式的清单行。
//!
//! 文本输入每行一条指令，格式为 `word` 或 `address:word`，均为十六进制，
//! 可带 `0x` 前缀；空行与 `#` 开头的注释行被跳过。

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{DisasmError, Result};
use crate::isa::Disassembler;

/// 一行输入解析出的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingInput {
    /// 行内显式给出的地址
    pub addr: Option<u32>,
    /// 指令字
    pub word: u32,
}

/// 一行反汇编清单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub addr: u32,
    pub word: u32,
    pub text: String,
}

impl fmt::Display for ListingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}: {:08x} {}", self.addr, self.word, self.text)
    }
}

/// 解析十六进制字段，最多一个 `0x`/`0X` 前缀
pub fn parse_hex(field: &str) -> std::result::Result<u32, String> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    if digits.is_empty() {
        return Err(format!("empty hex field '{}'", field));
    }
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex '{}': {}", field, e))
}

/// 解析一行输入
///
/// 空行与注释返回 `Ok(None)`，`line_no` 只用于错误信息
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ListingInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (addr, word) = match line.split_once(':') {
        Some((addr, word)) => (Some(addr.trim()), word.trim()),
        None => (None, line),
    };

    let addr = addr
        .map(parse_hex)
        .transpose()
        .map_err(|reason| DisasmError::parse(line_no, reason))?;
    let word = parse_hex(word).map_err(|reason| DisasmError::parse(line_no, reason))?;

    Ok(Some(ListingInput { addr, word }))
}

/// 逐行反汇编文本输入并写出清单
///
/// 没有显式地址的行使用上一条地址 + 4（首行为 `start_pc`）。
/// 无法解析的行（包括非 UTF-8 内容）记录 warn 日志后跳过，
/// 只有读写失败才中止。返回写出的行数
pub fn disassemble_stream<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    disasm: &Disassembler,
    start_pc: u32,
) -> Result<usize> {
    let mut pc = start_pc;
    let mut written = 0;

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_no = idx + 1;
        let input = match std::str::from_utf8(&bytes)
            .map_err(|e| DisasmError::parse(line_no, format!("invalid UTF-8: {}", e)))
            .and_then(|line| parse_line(line, line_no))
        {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("skipping input: {}", e);
                continue;
            }
        };

        let addr = input.addr.unwrap_or(pc);
        let text = disasm.disassemble(addr, input.word);
        writeln!(writer, "{}", ListingLine { addr, word: input.word, text })?;

        pc = addr.wrapping_add(4);
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// 反汇编一段小端序字节
///
/// 末尾不足 4 字节的部分被忽略
pub fn disassemble_bytes(disasm: &Disassembler, base: u32, data: &[u8]) -> Vec<ListingLine> {
    let chunks = data.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        log::warn!(
            "ignoring {} trailing byte(s) after 0x{:08x}",
            chunks.remainder().len(),
            base.wrapping_add((data.len() - chunks.remainder().len()) as u32)
        );
    }

    chunks
        .enumerate()
        .map(|(i, chunk)| {
            let addr = base.wrapping_add((i * 4) as u32);
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            ListingLine {
                addr,
                word,
                text: disasm.disassemble(addr, word),
            }
        })
        .collect()
}
