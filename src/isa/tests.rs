//! ISA 模块测试

use super::*;

fn all_entries() -> impl Iterator<Item = &'static InstrDef> {
    RV32I_INSTRS.iter().chain(ZICSR_INSTRS.iter())
}

#[test]
fn test_scenario_lui() {
    assert_eq!(disassemble(0, 0x3c025537), "lui\ta0,0x3c025");
}

#[test]
fn test_scenario_ebreak() {
    assert_eq!(disassemble(0, 0x00100073), "ebreak");
    assert_eq!(disassemble(0, 0x00000073), "ecall");
}

#[test]
fn test_scenario_addi_negative() {
    assert_eq!(disassemble(0, 0xfff58593), "addi\ta1,a1,-1");
}

#[test]
fn test_sign_extension_boundary() {
    assert_eq!(disassemble(0, 0x7FF58593), "addi\ta1,a1,2047");
    assert_eq!(disassemble(0, 0x80058593), "addi\ta1,a1,-2048");
}

#[test]
fn test_nop_wins_over_addi() {
    assert_eq!(disassemble(0, NOP_ENCODING), "nop");
    // 只要有一个字段不同就回到通用形式
    assert_eq!(disassemble(0, 0x00000093), "addi\tra,zero,0");
}

#[test]
fn test_ret_wins_over_jalr() {
    assert_eq!(disassemble(0, RET_ENCODING), "ret");
    assert_eq!(disassemble(0, 0x000080E7), "jalr\t0(ra)");
    assert_eq!(disassemble(0, 0x00408067), "jalr\t4(ra)");
}

#[test]
fn test_jal_target_is_pc_relative() {
    // jal ra, +4
    assert_eq!(disassemble(0x1000, 0x004000EF), "jal\tra,4100");
    // jal zero, -4
    assert_eq!(disassemble(0x1000, 0xFFDFF06F), "jal\tzero,4092");
}

#[test]
fn test_branch_target_is_pc_relative() {
    // beq ra, sp, +8
    assert_eq!(disassemble(0x2000, 0x00208463), "beq\tra,sp,8200");
    // blt sp, gp, -8
    assert_eq!(disassemble(20, 0xFE314CE3), "blt\tsp,gp,12");
}

#[test]
fn test_branch_target_wraps() {
    // beq zero, zero, -16 位于地址 0
    assert_eq!(disassemble(0, 0xFE0008E3), "beq\tzero,zero,4294967280");
}

#[test]
fn test_fence_forms() {
    assert_eq!(disassemble(0, 0x0FF0000F), "fence");
    assert_eq!(disassemble(0, 0x0210000F), "fence\tr,w");
    assert_eq!(disassemble(0, 0x0330000F), "fence\trw,rw");
    assert_eq!(disassemble(0, FENCE_I_ENCODING), "fence.i");
}

#[test]
fn test_csr_names_in_operands() {
    assert_eq!(disassemble(0, 0xC0059573), "csrrw\ta0,cycle,a1");
    assert_eq!(disassemble(0, 0x7FF59573), "csrrw\ta0,????,a1");
    assert_eq!(disassemble(0, 0xC8202573), "csrrs\ta0,instreth,zero");
}

#[test]
fn test_upper_immediates() {
    assert_eq!(disassemble(0, 0x00000517), "auipc\ta0,0");
    assert_eq!(disassemble(0, 0xFFFFF0B7), "lui\tra,0xfffff");
}

#[test]
fn test_unmatched_words() {
    assert_eq!(disassemble(0, 0x00000000), UNKNOWN);
    assert_eq!(disassemble(0, 0xFFFFFFFF), UNKNOWN);
    // mret 属于特权指令，不在表中
    assert_eq!(disassemble(0, 0x30200073), UNKNOWN);
    assert!(decode(0, 0x30200073).is_none());
}

#[test]
fn test_every_entry_is_well_formed() {
    for def in all_entries() {
        assert!(def.is_well_formed(), "{:?}", def);
    }
}

#[test]
fn test_match_value_decodes_to_its_own_mnemonic() {
    let entries: Vec<&InstrDef> = all_entries().collect();

    for def in &entries {
        let text = disassemble(0, def.match_val);
        let winner = entries.iter().find(|d| d.matches(def.match_val)).unwrap();

        assert!(text.starts_with(winner.name), "{} -> {}", def.name, text);
        if winner.name != def.name {
            // 只有精确匹配的伪指令可以抢先
            assert_eq!(winner.mask, EXACT_MASK, "{} shadowed by {}", def.name, winner.name);
        }
    }
}

#[test]
fn test_default_table_order_matches_disassembler() {
    let disasm = IsaConfig::default().build().unwrap();
    let names: Vec<&str> = disasm.entries().map(|d| d.name).collect();
    let expected: Vec<&str> = all_entries().map(|d| d.name).collect();
    assert_eq!(names, expected);
    assert_eq!(names.first(), Some(&"nop"));
    assert_eq!(names.last(), Some(&"csrrci"));
}

#[test]
fn test_free_functions_agree_with_disassembler() {
    let disasm = IsaConfig::default().build().unwrap();
    let samples = [
        0x3c025537, 0x00100073, 0xfff58593, 0x004000EF, 0x0210000F, 0xC0059573, 0x0023D2F3,
        0x00000013, 0x00008067, 0x12345678, 0x00000000,
    ];
    for raw in samples {
        assert_eq!(disassemble(0x400, raw), disasm.disassemble(0x400, raw));
    }
}

#[test]
fn test_disassemble_into_free_function() {
    let mut buf = [0u8; 32];
    let n = disassemble_into(0, 0x3c025537, &mut buf);
    assert_eq!(&buf[..n], b"lui\ta0,0x3c025");
    assert_eq!(buf[n], 0);
}
