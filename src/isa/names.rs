//! 寄存器、CSR 与 FENCE 标志的名称表
//!
//! 所有表均为只读静态数据，查询函数对任意输入都有定义。

/// 未知 CSR 或无法解码的指令使用的占位文本
pub const UNKNOWN: &str = "????";

/// 整数寄存器的 ABI 名称
pub static ABI_REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", // x0  - x7
    "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5", // x8  - x15
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", // x16 - x23
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6", // x24 - x31
];

/// 寄存器编号 -> ABI 名称（只取低 5 位）
#[inline]
pub fn reg_name(index: u8) -> &'static str {
    ABI_REG_NAMES[(index & 0x1F) as usize]
}

// ========== CSR 地址常量 ==========

pub const CSR_FFLAGS: u16 = 0x001;
pub const CSR_FRM: u16 = 0x002;
pub const CSR_FCSR: u16 = 0x003;
pub const CSR_CYCLE: u16 = 0xC00;
pub const CSR_TIME: u16 = 0xC01;
pub const CSR_INSTRET: u16 = 0xC02;
pub const CSR_CYCLEH: u16 = 0xC80;
pub const CSR_TIMEH: u16 = 0xC81;
pub const CSR_INSTRETH: u16 = 0xC82;

/// CSR 名称表项
#[derive(Debug, Clone, Copy)]
pub struct CsrName {
    pub addr: u16,
    pub name: &'static str,
}

/// 用户态 CSR 名称表（RISC-V User-Level ISA 的浮点与计数器 CSR）
#[rustfmt::skip]
pub static CSR_NAMES: &[CsrName] = &[
    CsrName { addr: CSR_FFLAGS,   name: "fflags" },
    CsrName { addr: CSR_FRM,      name: "frm" },
    CsrName { addr: CSR_FCSR,     name: "fcsr" },
    CsrName { addr: CSR_CYCLE,    name: "cycle" },
    CsrName { addr: CSR_TIME,     name: "time" },
    CsrName { addr: CSR_INSTRET,  name: "instret" },
    CsrName { addr: CSR_CYCLEH,   name: "cycleh" },
    CsrName { addr: CSR_TIMEH,    name: "timeh" },
    CsrName { addr: CSR_INSTRETH, name: "instreth" },
];

/// CSR 地址 -> 名称，未收录的地址返回 `"????"`
pub fn csr_name(addr: u16) -> &'static str {
    CSR_NAMES
        .iter()
        .find(|entry| entry.addr == addr)
        .map_or(UNKNOWN, |entry| entry.name)
}

/// FENCE 标志组合，下标即 4-bit 掩码（i = 8, o = 4, r = 2, w = 1）
#[rustfmt::skip]
pub static FENCE_FLAGS: [&str; 16] = [
    "", "w", "r", "rw", "o", "ow", "or", "orw",
    "i", "iw", "ir", "irw", "io", "iow", "ior", "iorw",
];

/// pred/succ 掩码 -> "iorw" 字母组合（只取低 4 位）
#[inline]
pub fn fence_flags(mask: u8) -> &'static str {
    FENCE_FLAGS[(mask & 0xF) as usize]
}
