//! RISC-V ISA 定义与反汇编
//!
//! 本模块提供表驱动的 RV32I + Zicsr 反汇编：
//! - `fields`: 指令字段与立即数提取
//! - `InstrDef`: 统一的指令定义（mask/match/助记符/格式）
//! - `InstrFormat` / `Operands`: 格式处理器与解码出的字段
//! - `DecodedInstr`: 解码结果，`Display` 即汇编文本
//! - `Disassembler`: 解码器注册表，按顺序先匹配者胜出
//! - `IsaConfig`: ISA 配置构建器，支持表检查

mod config;
mod decoder;
pub mod fields;
mod format;
mod instr;
mod instr_def;
pub mod names;
mod rv32i;
mod zicsr;

pub use config::{IsaConfig, IsaExtension, Overlap};
pub use decoder::{Disassembler, InstrDecoder};
pub use format::{InstrFormat, Operands};
pub use instr::DecodedInstr;
pub use instr_def::{
    EXACT_MASK, FENCE_MASK, FUNCT3_MASK, FUNCT7_MASK, I_TYPE_MASK, InstrDef, OPCODE_MASK,
    R_TYPE_MASK, TableDrivenDecoder, i_match, r_match,
};
pub use names::UNKNOWN;
pub use rv32i::{
    EBREAK_ENCODING, ECALL_ENCODING, FENCE_I_ENCODING, NOP_ENCODING, RET_ENCODING, RV32I_DECODER,
    RV32I_INSTRS, RV32I_OPCODES,
};
pub use zicsr::{ZICSR_DECODER, ZICSR_INSTRS, ZICSR_OPCODES};

/// 默认扫描顺序：RV32I 之后是 Zicsr
static DEFAULT_DECODERS: [&TableDrivenDecoder; 2] = [&RV32I_DECODER, &ZICSR_DECODER];

/// 便捷函数：使用默认 RV32I + Zicsr 表解码指令
///
/// 无需构建 `Disassembler`，适合单条指令的场景
pub fn decode(pc: u32, raw: u32) -> Option<DecodedInstr> {
    DEFAULT_DECODERS
        .iter()
        .find_map(|decoder| decoder.decode(pc, raw))
}

/// 便捷函数：反汇编为文本，未识别的编码返回 `"????"`
pub fn disassemble(pc: u32, raw: u32) -> String {
    decode(pc, raw).map_or_else(|| UNKNOWN.to_string(), |decoded| decoded.to_string())
}

/// 便捷函数：反汇编到定长缓冲区，语义同 [`Disassembler::disassemble_into`]
pub fn disassemble_into(pc: u32, raw: u32, out: &mut [u8]) -> usize {
    decoder::write_line(decode(pc, raw), out)
}

#[cfg(test)]
mod tests;
