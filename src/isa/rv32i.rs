//! RV32I 基础指令集定义表
//!
//! 表项按声明顺序匹配，先匹配者胜出。`nop`/`ret` 等精确匹配的伪指令
//! 必须位于对应的通用指令（`addi`/`jalr`）之前，否则永远不会被选中。

use crate::isa::fields::*;
use crate::isa::format::InstrFormat::*;
use crate::isa::instr_def::{
    EXACT_MASK, FENCE_MASK, I_TYPE_MASK, InstrDef, OPCODE_MASK, R_TYPE_MASK, TableDrivenDecoder,
    i_match, r_match,
};

/// `addi zero, zero, 0`
pub const NOP_ENCODING: u32 = 0x0000_0013;
/// `jalr zero, 0(ra)`
pub const RET_ENCODING: u32 = 0x0000_8067;
pub const FENCE_I_ENCODING: u32 = 0x0000_100F;
pub const ECALL_ENCODING: u32 = 0x0000_0073;
pub const EBREAK_ENCODING: u32 = 0x0010_0073;

// ========== RV32I 指令定义表 ==========

/// RV32I 指令定义表
pub static RV32I_INSTRS: &[InstrDef] = &[
    // ========== 伪指令（精确匹配，优先于通用形式）==========
    InstrDef::new("nop", EXACT_MASK, NOP_ENCODING, OpcodeOnly),
    InstrDef::new("ret", EXACT_MASK, RET_ENCODING, OpcodeOnly),

    // ========== U-type ==========
    InstrDef::new("lui", OPCODE_MASK, OP_LUI, Upper),
    InstrDef::new("auipc", OPCODE_MASK, OP_AUIPC, Upper),

    // ========== J-type ==========
    InstrDef::new("jal", OPCODE_MASK, OP_JAL, Jump),

    // ========== I-type (JALR) ==========
    InstrDef::new("jalr", I_TYPE_MASK, i_match(0b000, OP_JALR), JumpReg),

    // ========== B-type ==========
    InstrDef::new("beq", I_TYPE_MASK, i_match(0b000, OP_BRANCH), Branch),
    InstrDef::new("bne", I_TYPE_MASK, i_match(0b001, OP_BRANCH), Branch),
    InstrDef::new("blt", I_TYPE_MASK, i_match(0b100, OP_BRANCH), Branch),
    InstrDef::new("bge", I_TYPE_MASK, i_match(0b101, OP_BRANCH), Branch),
    InstrDef::new("bltu", I_TYPE_MASK, i_match(0b110, OP_BRANCH), Branch),
    InstrDef::new("bgeu", I_TYPE_MASK, i_match(0b111, OP_BRANCH), Branch),

    // ========== Load ==========
    InstrDef::new("lb", I_TYPE_MASK, i_match(0b000, OP_LOAD), Load),
    InstrDef::new("lh", I_TYPE_MASK, i_match(0b001, OP_LOAD), Load),
    InstrDef::new("lw", I_TYPE_MASK, i_match(0b010, OP_LOAD), Load),
    InstrDef::new("lbu", I_TYPE_MASK, i_match(0b100, OP_LOAD), Load),
    InstrDef::new("lhu", I_TYPE_MASK, i_match(0b101, OP_LOAD), Load),

    // ========== Store ==========
    InstrDef::new("sb", I_TYPE_MASK, i_match(0b000, OP_STORE), Store),
    InstrDef::new("sh", I_TYPE_MASK, i_match(0b001, OP_STORE), Store),
    InstrDef::new("sw", I_TYPE_MASK, i_match(0b010, OP_STORE), Store),

    // ========== I-type ALU ==========
    InstrDef::new("addi", I_TYPE_MASK, i_match(0b000, OP_IMM), AluImm),
    InstrDef::new("slti", I_TYPE_MASK, i_match(0b010, OP_IMM), AluImm),
    InstrDef::new("sltiu", I_TYPE_MASK, i_match(0b011, OP_IMM), AluImm),
    InstrDef::new("xori", I_TYPE_MASK, i_match(0b100, OP_IMM), AluImm),
    InstrDef::new("ori", I_TYPE_MASK, i_match(0b110, OP_IMM), AluImm),
    InstrDef::new("andi", I_TYPE_MASK, i_match(0b111, OP_IMM), AluImm),

    // ========== 立即数移位（funct7 区分逻辑/算术右移）==========
    InstrDef::new("slli", R_TYPE_MASK, r_match(0b0000000, 0b001, OP_IMM), ShiftImm),
    InstrDef::new("srli", R_TYPE_MASK, r_match(0b0000000, 0b101, OP_IMM), ShiftImm),
    InstrDef::new("srai", R_TYPE_MASK, r_match(0b0100000, 0b101, OP_IMM), ShiftImm),

    // ========== R-type ==========
    InstrDef::new("add", R_TYPE_MASK, r_match(0b0000000, 0b000, OP_REG), Reg),
    InstrDef::new("sub", R_TYPE_MASK, r_match(0b0100000, 0b000, OP_REG), Reg),
    InstrDef::new("sll", R_TYPE_MASK, r_match(0b0000000, 0b001, OP_REG), Reg),
    InstrDef::new("slt", R_TYPE_MASK, r_match(0b0000000, 0b010, OP_REG), Reg),
    InstrDef::new("sltu", R_TYPE_MASK, r_match(0b0000000, 0b011, OP_REG), Reg),
    InstrDef::new("xor", R_TYPE_MASK, r_match(0b0000000, 0b100, OP_REG), Reg),
    InstrDef::new("srl", R_TYPE_MASK, r_match(0b0000000, 0b101, OP_REG), Reg),
    InstrDef::new("sra", R_TYPE_MASK, r_match(0b0100000, 0b101, OP_REG), Reg),
    InstrDef::new("or", R_TYPE_MASK, r_match(0b0000000, 0b110, OP_REG), Reg),
    InstrDef::new("and", R_TYPE_MASK, r_match(0b0000000, 0b111, OP_REG), Reg),

    // ========== Fence ==========
    InstrDef::new("fence", FENCE_MASK, OP_MISC_MEM, Fence),
    InstrDef::new("fence.i", EXACT_MASK, FENCE_I_ENCODING, OpcodeOnly),

    // ========== 系统 ==========
    InstrDef::new("ecall", EXACT_MASK, ECALL_ENCODING, OpcodeOnly),
    InstrDef::new("ebreak", EXACT_MASK, EBREAK_ENCODING, OpcodeOnly),
];

/// RV32I 基础指令集的 opcode 列表
#[rustfmt::skip]
pub static RV32I_OPCODES: [u32; 11] = [
    OP_LUI, OP_AUIPC, OP_JAL, OP_JALR, OP_BRANCH,
    OP_LOAD, OP_STORE, OP_MISC_MEM, OP_IMM, OP_REG, OP_SYSTEM,
];

// ========== 解码器实例 ==========

/// RV32I 解码器（基于 TableDrivenDecoder）
pub static RV32I_DECODER: TableDrivenDecoder =
    TableDrivenDecoder::new("RV32I", RV32I_INSTRS, Some(&RV32I_OPCODES));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::InstrDecoder;

    fn text(raw: u32) -> String {
        RV32I_DECODER.decode(0, raw).unwrap().to_string()
    }

    #[test]
    fn test_rv32i_coverage() {
        // 40 条基础指令 + fence.i + nop/ret
        assert_eq!(RV32I_INSTRS.len(), 43);
    }

    #[test]
    fn test_pseudo_before_generic() {
        let pos = |name: &str| RV32I_INSTRS.iter().position(|d| d.name == name).unwrap();
        assert!(pos("nop") < pos("addi"));
        assert!(pos("ret") < pos("jalr"));
    }

    #[test]
    fn test_decode_loads_and_stores() {
        assert_eq!(text(0x00412083), "lw\tra,4(sp)");
        assert_eq!(text(0xFFF44503), "lbu\ta0,-1(s0)");
        assert_eq!(text(0x00112423), "sw\tra,8(sp)");
        assert_eq!(text(0xFE112E23), "sw\tra,-4(sp)");
    }

    #[test]
    fn test_decode_shifts() {
        assert_eq!(text(0x00359593), "slli\ta1,a1,0x3");
        assert_eq!(text(0x0015D593), "srli\ta1,a1,0x1");
        assert_eq!(text(0x41F5D593), "srai\ta1,a1,0x1f");
        // funct7 非法的移位不匹配任何表项
        assert!(RV32I_DECODER.decode(0, 0x20359593).is_none());
    }

    #[test]
    fn test_decode_register_ops() {
        assert_eq!(text(0x002081B3), "add\tgp,ra,sp");
        assert_eq!(text(0x402081B3), "sub\tgp,ra,sp");
        assert_eq!(text(0x4020D1B3), "sra\tgp,ra,sp");
        assert_eq!(text(0x0020F1B3), "and\tgp,ra,sp");
    }

    #[test]
    fn test_decode_system() {
        assert_eq!(text(ECALL_ENCODING), "ecall");
        assert_eq!(text(EBREAK_ENCODING), "ebreak");
        assert_eq!(text(FENCE_I_ENCODING), "fence.i");
    }
}
