//! 解码器框架
//!
//! `InstrDecoder` 抽象一张有序的指令定义表，`Disassembler` 按注册顺序
//! 串联多张表并把结果渲染为汇编文本。

use std::fmt::{self, Write};
use std::sync::Arc;

use crate::error::{DisasmError, Result};
use crate::isa::fields::opcode;
use crate::isa::instr::DecodedInstr;
use crate::isa::instr_def::{InstrDef, OPCODE_MASK};
use crate::isa::names::UNKNOWN;

/// 指令解码器 trait
///
/// 实现此 trait 以提供一张按顺序匹配的指令定义表
pub trait InstrDecoder: Send + Sync {
    /// 解码器名称
    fn name(&self) -> &str;

    /// 指令定义表（按匹配顺序）
    fn instrs(&self) -> &[InstrDef];

    /// 尝试解码指令
    ///
    /// 返回 `Some(decoded)` 如果能解码，否则返回 `None`
    fn decode(&self, pc: u32, raw: u32) -> Option<DecodedInstr>;

    /// 此解码器处理的 opcode 列表
    ///
    /// 用于优化：只对特定 opcode 调用相应解码器。`None` 表示处理全部 opcode
    fn handled_opcodes(&self) -> Option<&[u32]> {
        None
    }
}

/// 反汇编器（解码器注册表）
///
/// 管理多个解码器，按注册顺序先匹配者胜出
pub struct Disassembler {
    /// 注册的解码器列表（按注册顺序）
    decoders: Vec<Arc<dyn InstrDecoder>>,
    /// 按 opcode 分桶的解码器索引，桶内保持注册顺序
    opcode_map: [Vec<usize>; 128],
}

impl Disassembler {
    /// 创建空的反汇编器（任何指令都输出 `????`）
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
            opcode_map: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// 注册一个解码器
    ///
    /// 表中存在非法表项，或表项被已注册的更早表项完全遮蔽时返回 Err，
    /// 此时注册表保持不变
    pub fn register(&mut self, decoder: Arc<dyn InstrDecoder>) -> Result<()> {
        self.validate(decoder.as_ref())?;

        let idx = self.decoders.len();
        match decoder.handled_opcodes() {
            Some(opcodes) => {
                // validate 已保证 opcode < 128
                for &op in opcodes {
                    self.opcode_map[op as usize].push(idx);
                }
            }
            None => {
                for bucket in &mut self.opcode_map {
                    bucket.push(idx);
                }
            }
        }

        log::debug!(
            "registered decoder {} ({} entries)",
            decoder.name(),
            decoder.instrs().len()
        );
        self.decoders.push(decoder);
        Ok(())
    }

    /// 检查解码器的表项能否加入当前扫描序列
    fn validate(&self, decoder: &dyn InstrDecoder) -> Result<()> {
        let opcodes = decoder.handled_opcodes();
        if let Some(&op) = opcodes.into_iter().flatten().find(|&&op| op > OPCODE_MASK) {
            return Err(DisasmError::InvalidOpcode {
                decoder: decoder.name().to_string(),
                opcode: op,
            });
        }

        let earlier: Vec<&InstrDef> = self.entries().collect();

        for (i, def) in decoder.instrs().iter().enumerate() {
            if !def.is_well_formed() {
                return Err(DisasmError::MalformedEntry {
                    decoder: decoder.name().to_string(),
                    name: def.name,
                    mask: def.mask,
                    match_val: def.match_val,
                });
            }

            // 表项只会在它可能的 opcode 所在的桶里被尝试
            if let Some(opcodes) = opcodes {
                let op_mask = def.mask & OPCODE_MASK;
                let reachable = opcodes
                    .iter()
                    .any(|&op| (op & op_mask) == (def.match_val & op_mask));
                if !reachable {
                    return Err(DisasmError::UncoveredEntry {
                        decoder: decoder.name().to_string(),
                        name: def.name,
                    });
                }
            }

            let before = earlier.iter().copied().chain(&decoder.instrs()[..i]);
            for prev in before {
                if prev.shadows(def) {
                    return Err(DisasmError::ShadowedEntry {
                        name: def.name,
                        earlier: prev.name,
                    });
                }
            }
        }
        Ok(())
    }

    /// 按扫描顺序遍历所有已注册的表项
    pub fn entries(&self) -> impl Iterator<Item = &InstrDef> + '_ {
        self.decoders.iter().flat_map(|d| d.instrs().iter())
    }

    /// 解码指令
    ///
    /// 仅按 opcode 分桶的解码器尝试，命中即返回
    pub fn decode(&self, pc: u32, raw: u32) -> Option<DecodedInstr> {
        let decoded = self.opcode_map[opcode(raw) as usize]
            .iter()
            .find_map(|&idx| self.decoders[idx].decode(pc, raw));

        if decoded.is_none() {
            log::trace!("no table entry matches 0x{:08x} at 0x{:08x}", raw, pc);
        }
        decoded
    }

    /// 反汇编为文本，未识别的编码返回 `"????"`
    pub fn disassemble(&self, pc: u32, raw: u32) -> String {
        self.decode(pc, raw)
            .map_or_else(|| UNKNOWN.to_string(), |decoded| decoded.to_string())
    }

    /// 反汇编到调用方提供的定长缓冲区
    ///
    /// 行为同 `snprintf`：最多写入 `out.len() - 1` 字节文本并以 NUL 结尾，
    /// 超出部分截断。返回写入的文本字节数（不含 NUL）
    pub fn disassemble_into(&self, pc: u32, raw: u32, out: &mut [u8]) -> usize {
        write_line(self.decode(pc, raw), out)
    }

    /// 获取已注册的解码器数量
    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }

    /// 列出所有已注册的解码器名称
    pub fn decoder_names(&self) -> Vec<&str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }
}

impl Default for Disassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Disassembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disassembler")
            .field("decoders", &self.decoder_names())
            .finish()
    }
}

/// 截断写入定长缓冲区的 `fmt::Write` 实现
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len() - self.len;
        let n = s.len().min(room);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

/// 将解码结果（或 `????`）写入定长缓冲区，返回文本字节数
pub(crate) fn write_line(decoded: Option<DecodedInstr>, out: &mut [u8]) -> usize {
    let Some(capacity) = out.len().checked_sub(1) else {
        return 0;
    };

    let mut writer = SliceWriter {
        buf: &mut out[..capacity],
        len: 0,
    };
    let rendered = match decoded {
        Some(decoded) => write!(writer, "{}", decoded),
        None => writer.write_str(UNKNOWN),
    };
    // 已写入的前缀仍然有效，照常以 NUL 结尾
    if let Err(e) = rendered {
        log::warn!("formatting stopped early: {}", e);
    }

    let len = writer.len;
    out[len] = 0;
    len
}
