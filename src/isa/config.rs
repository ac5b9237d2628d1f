//! ISA 配置与表检查
//!
//! 选择启用的指令集扩展，报告表项重叠情况，并构建反汇编器

use std::collections::BTreeSet;
use std::sync::Arc;

use super::decoder::Disassembler;
use super::instr_def::InstrDef;
use super::rv32i::{RV32I_DECODER, RV32I_INSTRS};
use super::zicsr::{ZICSR_DECODER, ZICSR_INSTRS};
use crate::error::Result;

/// 支持的 ISA 扩展
///
/// 声明顺序即扫描顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IsaExtension {
    /// RV32I 基础整数指令集（必选）
    RV32I,
    /// Zicsr 扩展：CSR 操作指令
    Zicsr,
}

impl IsaExtension {
    /// 该扩展的指令定义表
    pub fn instrs(self) -> &'static [InstrDef] {
        match self {
            IsaExtension::RV32I => RV32I_INSTRS,
            IsaExtension::Zicsr => ZICSR_INSTRS,
        }
    }
}

impl std::fmt::Display for IsaExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IsaExtension::RV32I => write!(f, "RV32I"),
            IsaExtension::Zicsr => write!(f, "_Zicsr"),
        }
    }
}

/// 两条可能匹配同一指令字的表项，排在前面的胜出
#[derive(Debug, Clone)]
pub struct Overlap {
    pub winner: (IsaExtension, &'static str),
    pub loser: (IsaExtension, &'static str),
    /// 同时匹配两者的示例指令编码
    pub example_raw: u32,
}

impl std::fmt::Display for Overlap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "重叠: {}:{} 优先于 {}:{} (示例: 0x{:08X})",
            self.winner.0, self.winner.1, self.loser.0, self.loser.1, self.example_raw
        )
    }
}

/// ISA 配置构建器
///
/// # 示例
///
/// ```
/// use allude_disasm::isa::IsaConfig;
///
/// let disasm = IsaConfig::new()
///     .with_zicsr_extension()
///     .build()
///     .expect("默认表合法");
/// assert_eq!(disasm.disassemble(0, 0x00100073), "ebreak");
/// ```
#[derive(Debug, Clone)]
pub struct IsaConfig {
    extensions: BTreeSet<IsaExtension>,
}

impl IsaConfig {
    /// 创建新的 ISA 配置（只有 RV32I）
    pub fn new() -> Self {
        let mut extensions = BTreeSet::new();
        extensions.insert(IsaExtension::RV32I);
        Self { extensions }
    }

    /// 启用 Zicsr 扩展（CSR 操作指令）
    pub fn with_zicsr_extension(mut self) -> Self {
        self.extensions.insert(IsaExtension::Zicsr);
        self
    }

    /// 关闭 Zicsr 扩展，CSR 指令将输出 `????`
    pub fn without_zicsr_extension(mut self) -> Self {
        self.extensions.remove(&IsaExtension::Zicsr);
        self
    }

    /// 获取已启用的扩展（按扫描顺序）
    pub fn enabled_extensions(&self) -> impl Iterator<Item = IsaExtension> + '_ {
        self.extensions.iter().copied()
    }

    /// 按扫描顺序列出所有表项
    fn entries(&self) -> Vec<(IsaExtension, &'static InstrDef)> {
        self.enabled_extensions()
            .flat_map(|ext| ext.instrs().iter().map(move |def| (ext, def)))
            .collect()
    }

    /// 列出所有靠表项顺序消解的重叠
    ///
    /// 例如 `nop` 与 `addi`、`ret` 与 `jalr`
    pub fn detect_overlaps(&self) -> Vec<Overlap> {
        let entries = self.entries();
        let mut overlaps = Vec::new();

        for (i, (ext1, def1)) in entries.iter().enumerate() {
            for (ext2, def2) in entries.iter().skip(i + 1) {
                if def1.overlaps(def2) {
                    // 生成一个同时满足两者 mask/match 的示例
                    let example = (def1.match_val & def1.mask) | (def2.match_val & def2.mask);
                    overlaps.push(Overlap {
                        winner: (*ext1, def1.name),
                        loser: (*ext2, def2.name),
                        example_raw: example,
                    });
                }
            }
        }

        overlaps
    }

    /// 获取 ISA 字符串（如 "RV32I_Zicsr"）
    pub fn isa_string(&self) -> String {
        self.enabled_extensions().map(|ext| ext.to_string()).collect()
    }

    /// 构建反汇编器
    ///
    /// 表项非法或被遮蔽时返回错误
    pub fn build(&self) -> Result<Disassembler> {
        let mut disasm = Disassembler::new();
        for ext in self.enabled_extensions() {
            match ext {
                IsaExtension::RV32I => disasm.register(Arc::new(RV32I_DECODER))?,
                IsaExtension::Zicsr => disasm.register(Arc::new(ZICSR_DECODER))?,
            }
        }
        log::debug!("built disassembler for {}", self.isa_string());
        Ok(disasm)
    }

    /// 配置摘要
    pub fn summary(&self) -> String {
        let mut s = format!("ISA: {}\n", self.isa_string());
        s.push_str(&format!("指令表项数: {}\n", self.entries().len()));

        match self.build() {
            Ok(_) => s.push_str("状态: ✓ 表合法\n"),
            Err(e) => s.push_str(&format!("状态: ✗ {}\n", e)),
        }

        let overlaps = self.detect_overlaps();
        s.push_str(&format!("按顺序消解的重叠: {}\n", overlaps.len()));
        for o in &overlaps {
            s.push_str(&format!("  - {}\n", o));
        }

        s
    }
}

impl Default for IsaConfig {
    /// RV32I + Zicsr
    fn default() -> Self {
        Self::new().with_zicsr_extension()
    }
}
