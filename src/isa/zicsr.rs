//! Zicsr 扩展（CSR 操作指令）定义表
//!
//! 包含 6 条 CSR 操作指令：
//! - CSRRW, CSRRS, CSRRC (寄存器版本)
//! - CSRRWI, CSRRSI, CSRRCI (立即数版本)
//!
//! 与 ECALL/EBREAK 共用 SYSTEM opcode，但 funct3 均非零，
//! 注册顺序上排在 RV32I 之后。

use crate::isa::fields::OP_SYSTEM;
use crate::isa::format::InstrFormat::{Csr, CsrImm};
use crate::isa::instr_def::{I_TYPE_MASK, InstrDef, TableDrivenDecoder, i_match};

// ========== Zicsr 指令定义表 ==========

/// Zicsr 指令定义表
///
/// CSR 指令编码格式（I-type 变体）：
/// ```text
/// 31       20 19    15 14  12 11   7 6      0
/// ┌──────────┬────────┬──────┬──────┬────────┐
/// │   csr    │rs1/zimm│funct3│  rd  │ opcode │
/// │  12-bit  │ 5-bit  │3-bit │5-bit │ 7-bit  │
/// └──────────┴────────┴──────┴──────┴────────┘
///           SYSTEM (opcode = 0x73)
///
/// funct3:
///   001 = CSRRW
///   010 = CSRRS
///   011 = CSRRC
///   101 = CSRRWI
///   110 = CSRRSI
///   111 = CSRRCI
/// ```
pub static ZICSR_INSTRS: &[InstrDef] = &[
    InstrDef::new("csrrw", I_TYPE_MASK, i_match(0b001, OP_SYSTEM), Csr),
    InstrDef::new("csrrs", I_TYPE_MASK, i_match(0b010, OP_SYSTEM), Csr),
    InstrDef::new("csrrc", I_TYPE_MASK, i_match(0b011, OP_SYSTEM), Csr),
    // zimm 复用 rs1 字段
    InstrDef::new("csrrwi", I_TYPE_MASK, i_match(0b101, OP_SYSTEM), CsrImm),
    InstrDef::new("csrrsi", I_TYPE_MASK, i_match(0b110, OP_SYSTEM), CsrImm),
    InstrDef::new("csrrci", I_TYPE_MASK, i_match(0b111, OP_SYSTEM), CsrImm),
];

/// Zicsr 扩展的 opcode 列表
pub static ZICSR_OPCODES: [u32; 1] = [OP_SYSTEM];

// ========== 解码器实例 ==========

/// Zicsr 解码器（基于 TableDrivenDecoder）
pub static ZICSR_DECODER: TableDrivenDecoder =
    TableDrivenDecoder::new("Zicsr", ZICSR_INSTRS, Some(&ZICSR_OPCODES));
