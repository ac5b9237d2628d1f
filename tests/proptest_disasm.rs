//! 反汇编器的性质测试
//!
//! 任意 32 位指令字都必须得到确定、非空的文本，
//! 且 PC 相对目标与定长缓冲区输出遵循统一的规则。

use proptest::prelude::*;

use allude_disasm::isa::{self, IsaConfig, Operands, UNKNOWN, fields};

const OP_IMM: u32 = 0x13;
const OP_JAL: u32 = 0x6F;
const OP_BRANCH: u32 = 0x63;

/// 把 opcode 替换为给定值
fn with_opcode(raw: u32, opcode: u32) -> u32 {
    (raw & !0x7F) | opcode
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5000))]

    /// 任意指令字都能得到非空文本，不会 panic
    #[test]
    fn disassemble_is_total(pc in any::<u32>(), raw in any::<u32>()) {
        let text = isa::disassemble(pc, raw);
        prop_assert!(!text.is_empty());
        if isa::decode(pc, raw).is_none() {
            prop_assert_eq!(text, UNKNOWN);
        }
    }

    /// 相同输入总是得到相同输出
    #[test]
    fn disassemble_is_deterministic(pc in any::<u32>(), raw in any::<u32>()) {
        prop_assert_eq!(isa::disassemble(pc, raw), isa::disassemble(pc, raw));
    }

    /// 默认配置构建的反汇编器与便捷函数结果一致
    #[test]
    fn registry_matches_free_functions(pc in any::<u32>(), raw in any::<u32>()) {
        let disasm = IsaConfig::default().build().unwrap();
        prop_assert_eq!(disasm.disassemble(pc, raw), isa::disassemble(pc, raw));
    }

    /// 关闭 Zicsr 只会让 CSR 指令变成 `????`
    #[test]
    fn rv32i_only_is_a_subset(raw in any::<u32>()) {
        let rv32i = IsaConfig::new().build().unwrap();
        let text = rv32i.disassemble(0, raw);
        if text != UNKNOWN {
            prop_assert_eq!(text, isa::disassemble(0, raw));
        }
    }

    /// I 型立即数符号扩展，范围为 [-2048, 2047]
    #[test]
    fn i_immediate_is_sign_extended(raw in any::<u32>()) {
        let imm = fields::imm_i(raw);
        prop_assert!((-2048..=2047).contains(&imm));
        prop_assert_eq!(imm < 0, raw & 0x8000_0000 != 0);
        prop_assert_eq!(imm as u32 & 0xFFF, raw >> 20);
    }

    /// 只有 ALU 立即数解码为 AluImm，立即数与字段提取一致
    #[test]
    fn alu_imm_operand_matches_field(raw in any::<u32>()) {
        let raw = with_opcode(raw, OP_IMM);
        if let Some(decoded) = isa::decode(0, raw) {
            if let Operands::AluImm { imm, .. } = decoded.operands {
                prop_assert_eq!(imm, fields::imm_i(raw));
            }
        }
    }

    /// jal 的目标为 pc 加偏移（32 位回绕）
    #[test]
    fn jal_target_wraps(pc in any::<u32>(), raw in any::<u32>()) {
        let raw = with_opcode(raw, OP_JAL);
        let decoded = isa::decode(pc, raw).unwrap();
        let expected = pc.wrapping_add(fields::imm_j(raw) as u32);
        prop_assert_eq!(decoded.target(), Some(expected));
        let suffix = format!(",{}", expected);
        prop_assert!(decoded.to_string().ends_with(&suffix));
    }

    /// 分支目标同样为 pc 加偏移，且偏移为偶数
    #[test]
    fn branch_target_wraps(pc in any::<u32>(), raw in any::<u32>()) {
        let raw = with_opcode(raw, OP_BRANCH);
        if let Some(decoded) = isa::decode(pc, raw) {
            let offset = fields::imm_b(raw);
            prop_assert_eq!(offset & 1, 0);
            prop_assert_eq!(decoded.target(), Some(pc.wrapping_add(offset as u32)));
        }
    }

    /// 定长缓冲区：最多 cap - 1 字节文本加 NUL，内容为完整文本的前缀
    #[test]
    fn disassemble_into_truncates(raw in any::<u32>(), cap in 0usize..48) {
        let full = isa::disassemble(0x1000, raw);
        let mut buf = vec![0xAAu8; cap];
        let n = isa::disassemble_into(0x1000, raw, &mut buf);

        if cap == 0 {
            prop_assert_eq!(n, 0);
        } else {
            prop_assert_eq!(n, full.len().min(cap - 1));
            prop_assert_eq!(&buf[..n], &full.as_bytes()[..n]);
            prop_assert_eq!(buf[n], 0);
        }
    }
}
