//! 解码结果与汇编文本渲染
//!
//! 文本格式遵循 RISC-V 汇编习惯：助记符后接制表符，
//! 操作数之间以逗号分隔且不带空格，例如 `addi\ta1,a1,-1`。

use std::fmt;

use crate::isa::format::Operands;
use crate::isa::names::{csr_name, fence_flags, reg_name};

/// 一条已解码的指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstr {
    /// 取指地址（只影响跳转/分支目标）
    pub pc: u32,
    /// 原始指令字
    pub raw: u32,
    /// 助记符
    pub mnemonic: &'static str,
    /// 提取出的操作数
    pub operands: Operands,
}

impl DecodedInstr {
    /// PC 相对跳转/分支的绝对目标地址（32 位回绕）
    pub fn target(&self) -> Option<u32> {
        self.operands
            .pc_offset()
            .map(|offset| self.pc.wrapping_add(offset as u32))
    }
}

/// 按 C `%#x` 的规则书写十六进制：非零值带 `0x` 前缀，零写作 `0`
struct AltHex(u32);

impl fmt::Display for AltHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            f.write_str("0")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

/// 渲染汇编文本
///
/// 跳转/分支目标是 32 位回绕后的绝对地址，按无符号十进制书写：
/// 位于 0 的 `beq zero,zero,-16` 输出 `4294967280`，不会输出负数
impl fmt::Display for DecodedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic;
        let target = self.target().unwrap_or_default();
        match self.operands {
            Operands::Upper { rd, imm } => {
                write!(f, "{}\t{},{}", m, reg_name(rd), AltHex(imm))
            }
            Operands::Jump { rd, .. } => {
                write!(f, "{}\t{},{}", m, reg_name(rd), target)
            }
            Operands::JumpReg { rs1, offset } => {
                write!(f, "{}\t{}({})", m, offset, reg_name(rs1))
            }
            Operands::Load { rd, rs1, offset } => {
                write!(f, "{}\t{},{}({})", m, reg_name(rd), offset, reg_name(rs1))
            }
            Operands::AluImm { rd, rs1, imm } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rd), reg_name(rs1), imm)
            }
            Operands::ShiftImm { rd, rs1, shamt } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rd), reg_name(rs1), AltHex(shamt.into()))
            }
            Operands::Branch { rs1, rs2, .. } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rs1), reg_name(rs2), target)
            }
            Operands::Store { rs1, rs2, offset } => {
                write!(f, "{}\t{},{}({})", m, reg_name(rs2), offset, reg_name(rs1))
            }
            Operands::Reg { rd, rs1, rs2 } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rd), reg_name(rs1), reg_name(rs2))
            }
            // iorw,iorw 是默认的完整屏障，省略操作数
            Operands::Fence { pred: 0xF, succ: 0xF } => f.write_str(m),
            Operands::Fence { pred, succ } => {
                write!(f, "{}\t{},{}", m, fence_flags(pred), fence_flags(succ))
            }
            Operands::None => f.write_str(m),
            Operands::Csr { rd, csr, rs1 } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rd), csr_name(csr), reg_name(rs1))
            }
            Operands::CsrImm { rd, csr, zimm } => {
                write!(f, "{}\t{},{},{}", m, reg_name(rd), csr_name(csr), zimm)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pc: u32, mnemonic: &'static str, operands: Operands) -> String {
        DecodedInstr { pc, raw: 0, mnemonic, operands }.to_string()
    }

    #[test]
    fn test_alt_hex() {
        assert_eq!(AltHex(0).to_string(), "0");
        assert_eq!(AltHex(0x3c025).to_string(), "0x3c025");
    }

    #[test]
    fn test_render_upper_zero_immediate() {
        assert_eq!(render(0, "lui", Operands::Upper { rd: 10, imm: 0 }), "lui\ta0,0");
    }

    #[test]
    fn test_render_branch_target() {
        let text = render(0x100, "bne", Operands::Branch { rs1: 5, rs2: 0, offset: -8 });
        assert_eq!(text, "bne\tt0,zero,248");
    }

    #[test]
    fn test_target_wraps_around() {
        let instr = DecodedInstr {
            pc: 0xFFFF_FFFC,
            raw: 0,
            mnemonic: "jal",
            operands: Operands::Jump { rd: 0, offset: 8 },
        };
        assert_eq!(instr.target(), Some(4));
        assert_eq!(instr.to_string(), "jal\tzero,4");
    }

    #[test]
    fn test_high_target_is_unsigned() {
        let text = render(0, "beq", Operands::Branch { rs1: 0, rs2: 0, offset: -16 });
        assert_eq!(text, "beq\tzero,zero,4294967280");
        let text = render(0x8000_0000, "jal", Operands::Jump { rd: 1, offset: 4 });
        assert_eq!(text, "jal\tra,2147483652");
    }

    #[test]
    fn test_render_fence_partial() {
        let text = render(0, "fence", Operands::Fence { pred: 0b1010, succ: 0b0101 });
        assert_eq!(text, "fence\tir,ow");
        assert_eq!(render(0, "fence", Operands::Fence { pred: 0xF, succ: 0xF }), "fence");
    }

    #[test]
    fn test_render_csr_imm() {
        let text = render(0, "csrrwi", Operands::CsrImm { rd: 0, csr: 0x001, zimm: 31 });
        assert_eq!(text, "csrrwi\tzero,fflags,31");
    }
}
