//! 指令格式与字段解码
//!
//! 每种格式对应一个字段提取过程（格式处理器），产出 `Operands`。
//! 格式集合是封闭的，新增格式需要同时扩展 `Operands` 与文本渲染。

use crate::isa::fields::*;

/// 指令格式（决定提取哪些字段以及如何书写操作数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrFormat {
    /// U-type: `rd,imm20`
    Upper,
    /// J-type: `rd,target`
    Jump,
    /// I-type（JALR）: `offset(rs1)`
    JumpReg,
    /// I-type 访存: `rd,offset(rs1)`
    Load,
    /// I-type 算术: `rd,rs1,imm`
    AluImm,
    /// 立即数移位: `rd,rs1,shamt`
    ShiftImm,
    /// B-type: `rs1,rs2,target`
    Branch,
    /// S-type: `rs2,offset(rs1)`
    Store,
    /// R-type: `rd,rs1,rs2`
    Reg,
    /// FENCE: `pred,succ`
    Fence,
    /// 无操作数（伪指令与系统指令）
    OpcodeOnly,
    /// CSR 寄存器形式: `rd,csr,rs1`
    Csr,
    /// CSR 立即数形式: `rd,csr,zimm`
    CsrImm,
}

/// 解码后的操作数字段
///
/// 只保存对应格式需要的字段，生命周期仅限一次解码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
    Upper { rd: u8, imm: u32 },
    Jump { rd: u8, offset: i32 },
    JumpReg { rs1: u8, offset: i32 },
    Load { rd: u8, rs1: u8, offset: i32 },
    AluImm { rd: u8, rs1: u8, imm: i32 },
    ShiftImm { rd: u8, rs1: u8, shamt: u8 },
    Branch { rs1: u8, rs2: u8, offset: i32 },
    Store { rs1: u8, rs2: u8, offset: i32 },
    Reg { rd: u8, rs1: u8, rs2: u8 },
    Fence { pred: u8, succ: u8 },
    None,
    Csr { rd: u8, csr: u16, rs1: u8 },
    CsrImm { rd: u8, csr: u16, zimm: u32 },
}

impl InstrFormat {
    /// 按格式从指令字中提取字段
    ///
    /// 返回 `None` 表示该编码虽匹配 mask/match 但本格式无法解释，
    /// 调度器会继续尝试后续匹配项。目前所有格式都总能成功。
    pub fn extract(self, raw: u32) -> Option<Operands> {
        let operands = match self {
            InstrFormat::Upper => Operands::Upper {
                rd: rd(raw),
                imm: imm_u(raw),
            },
            InstrFormat::Jump => Operands::Jump {
                rd: rd(raw),
                offset: imm_j(raw),
            },
            InstrFormat::JumpReg => Operands::JumpReg {
                rs1: rs1(raw),
                offset: imm_i(raw),
            },
            InstrFormat::Load => Operands::Load {
                rd: rd(raw),
                rs1: rs1(raw),
                offset: imm_i(raw),
            },
            InstrFormat::AluImm => Operands::AluImm {
                rd: rd(raw),
                rs1: rs1(raw),
                imm: imm_i(raw),
            },
            InstrFormat::ShiftImm => Operands::ShiftImm {
                rd: rd(raw),
                rs1: rs1(raw),
                shamt: shamt(raw),
            },
            InstrFormat::Branch => Operands::Branch {
                rs1: rs1(raw),
                rs2: rs2(raw),
                offset: imm_b(raw),
            },
            InstrFormat::Store => Operands::Store {
                rs1: rs1(raw),
                rs2: rs2(raw),
                offset: imm_s(raw),
            },
            InstrFormat::Reg => Operands::Reg {
                rd: rd(raw),
                rs1: rs1(raw),
                rs2: rs2(raw),
            },
            InstrFormat::Fence => Operands::Fence {
                pred: pred(raw),
                succ: succ(raw),
            },
            InstrFormat::OpcodeOnly => Operands::None,
            InstrFormat::Csr => Operands::Csr {
                rd: rd(raw),
                csr: csr_addr(raw),
                rs1: rs1(raw),
            },
            InstrFormat::CsrImm => Operands::CsrImm {
                rd: rd(raw),
                csr: csr_addr(raw),
                zimm: csr_zimm(raw),
            },
        };
        Some(operands)
    }
}

impl Operands {
    /// PC 相对跳转/分支的偏移量
    pub fn pc_offset(&self) -> Option<i32> {
        match *self {
            Operands::Jump { offset, .. } | Operands::Branch { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_store_swaps_register_roles() {
        // sw x1, 8(x2): rs2 是被存储的值，rs1 是基址
        let ops = InstrFormat::Store.extract(0x00112423).unwrap();
        assert_eq!(ops, Operands::Store { rs1: 2, rs2: 1, offset: 8 });
    }

    #[test]
    fn test_extract_jump_reg_ignores_rd() {
        // jalr x5, -4(x6)
        let raw = 0xFFC302E7;
        assert_eq!(
            InstrFormat::JumpReg.extract(raw),
            Some(Operands::JumpReg { rs1: 6, offset: -4 })
        );
    }

    #[test]
    fn test_extract_opcode_only() {
        assert_eq!(InstrFormat::OpcodeOnly.extract(0x00100073), Some(Operands::None));
    }

    #[test]
    fn test_pc_offset() {
        let jump = InstrFormat::Jump.extract(0x004000EF).unwrap();
        assert_eq!(jump.pc_offset(), Some(4));
        let load = InstrFormat::Load.extract(0x00412083).unwrap();
        assert_eq!(load.pc_offset(), None);
    }
}
