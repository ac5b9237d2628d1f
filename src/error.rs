//! 错误类型
//!
//! 解码本身不会失败（无法识别的编码输出 `????`），
//! 这里的错误只来自表配置、输入解析与文件读取。

use std::io;

use thiserror::Error;

/// 反汇编器错误
#[derive(Error, Debug)]
pub enum DisasmError {
    /// 文件或流读写失败
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// ELF 文件无法解析或不是 RV32 目标
    #[error("ELF parse error: {0}")]
    ElfParse(String),

    /// 表项的 match 值超出了 mask 覆盖的位
    #[error(
        "malformed table entry {decoder}:{name}: \
         match 0x{match_val:08x} not covered by mask 0x{mask:08x}"
    )]
    MalformedEntry {
        decoder: String,
        name: &'static str,
        mask: u32,
        match_val: u32,
    },

    /// 表项被扫描顺序中更早的表项完全遮蔽，永远不会被匹配
    #[error("table entry {name} is unreachable: shadowed by earlier entry {earlier}")]
    ShadowedEntry {
        name: &'static str,
        earlier: &'static str,
    },

    /// 解码器声明的分桶 opcode 超出 7 位 opcode 空间
    #[error("decoder {decoder} declares opcode 0x{opcode:x} outside the 7-bit opcode space")]
    InvalidOpcode { decoder: String, opcode: u32 },

    /// 表项可能的 opcode 都不在解码器声明的分桶中，永远不会被匹配
    #[error("table entry {decoder}:{name} is unreachable: no declared opcode can match it")]
    UncoveredEntry {
        decoder: String,
        name: &'static str,
    },

    /// 十六进制输入行无法解析
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl DisasmError {
    /// 创建输入解析错误
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DisasmError>;
