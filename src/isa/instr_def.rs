//! 指令定义结构
//!
//! 统一的指令定义，同时用于解码和表合法性检查

use super::decoder::InstrDecoder;
use super::format::InstrFormat;
use super::instr::DecodedInstr;

/// 指令定义
///
/// 一处定义，两处使用：
/// - 解码：通过 mask/match 匹配后按 format 提取字段
/// - 表检查：通过 mask/match 判断两条定义是否重叠、后者是否被前者遮蔽
#[derive(Clone, Copy)]
pub struct InstrDef {
    /// 助记符（同时用于调试和冲突报告）
    pub name: &'static str,
    /// 匹配掩码：哪些位需要检查
    pub mask: u32,
    /// 匹配值：这些位应该是什么
    pub match_val: u32,
    /// 指令格式：决定字段提取与操作数书写方式
    pub format: InstrFormat,
}

impl InstrDef {
    /// 创建新的指令定义
    pub const fn new(name: &'static str, mask: u32, match_val: u32, format: InstrFormat) -> Self {
        Self {
            name,
            mask,
            match_val,
            format,
        }
    }

    /// 检查指令是否匹配此定义
    #[inline]
    pub fn matches(&self, raw: u32) -> bool {
        (raw & self.mask) == self.match_val
    }

    /// 解码指令
    ///
    /// 格式处理器拒绝时返回 `None`
    #[inline]
    pub fn decode_instr(&self, pc: u32, raw: u32) -> Option<DecodedInstr> {
        self.format.extract(raw).map(|operands| DecodedInstr {
            pc,
            raw,
            mnemonic: self.name,
            operands,
        })
    }

    /// match 值是否完全落在 mask 内
    ///
    /// 不满足时该定义永远无法匹配任何指令字
    pub fn is_well_formed(&self) -> bool {
        self.mask != 0 && (self.match_val & self.mask) == self.match_val
    }

    /// 检查两个指令定义是否重叠
    ///
    /// 两个定义重叠当且仅当存在某个指令字同时匹配两者
    pub fn overlaps(&self, other: &InstrDef) -> bool {
        let common_mask = self.mask & other.mask;
        (self.match_val & common_mask) == (other.match_val & common_mask)
    }

    /// 排在前面的 `self` 是否完全遮蔽排在后面的 `later`
    ///
    /// 即所有匹配 `later` 的指令字都已先被 `self` 匹配，`later` 成为死表项
    pub fn shadows(&self, later: &InstrDef) -> bool {
        (self.mask & !later.mask) == 0 && (later.match_val & self.mask) == self.match_val
    }
}

impl std::fmt::Debug for InstrDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrDef")
            .field("name", &self.name)
            .field("mask", &format_args!("0x{:08X}", self.mask))
            .field("match_val", &format_args!("0x{:08X}", self.match_val))
            .field("format", &self.format)
            .finish()
    }
}

// ========== 掩码常量 ==========

/// opcode 字段 [6:0]
pub const OPCODE_MASK: u32 = 0x0000007F;

/// funct3 字段 [14:12]
pub const FUNCT3_MASK: u32 = 0x00007000;

/// funct7 字段 [31:25]
pub const FUNCT7_MASK: u32 = 0xFE000000;

/// FENCE：排除 pred/succ 字段 [27:20]
pub const FENCE_MASK: u32 = 0xF00FFFFF;

/// 精确匹配整个指令（伪指令、ECALL/EBREAK、FENCE.I）
pub const EXACT_MASK: u32 = 0xFFFFFFFF;

/// I/S/B-type 指令的 mask（检查 opcode + funct3）
pub const I_TYPE_MASK: u32 = OPCODE_MASK | FUNCT3_MASK;

/// R-type 与立即数移位指令的 mask（检查 opcode + funct3 + funct7）
pub const R_TYPE_MASK: u32 = OPCODE_MASK | FUNCT3_MASK | FUNCT7_MASK;

// ========== 辅助函数：构造 match 值 ==========

/// 构造 I-type 的 match 值
#[inline]
pub const fn i_match(funct3: u32, opcode: u32) -> u32 {
    (funct3 << 12) | opcode
}

/// 构造 R-type 的 match 值
#[inline]
pub const fn r_match(funct7: u32, funct3: u32, opcode: u32) -> u32 {
    (funct7 << 25) | (funct3 << 12) | opcode
}

// ========== 表驱动解码器 ==========

/// 按顺序扫描匹配 `raw` 的表项，返回第一个被 `decode` 接受的结果
///
/// `decode` 返回 `None` 时继续尝试后续匹配项
fn first_decodable<F>(instrs: &[InstrDef], raw: u32, decode: F) -> Option<DecodedInstr>
where
    F: FnMut(&InstrDef) -> Option<DecodedInstr>,
{
    instrs.iter().filter(|def| def.matches(raw)).find_map(decode)
}

/// 表驱动解码器
///
/// 按声明顺序扫描 InstrDef 数组，先匹配者胜出
#[derive(Clone, Copy)]
pub struct TableDrivenDecoder {
    /// 解码器名称
    name: &'static str,
    /// 指令定义表
    instrs: &'static [InstrDef],
    /// 处理的 opcode（用于分桶）
    opcodes: Option<&'static [u32]>,
}

impl TableDrivenDecoder {
    /// 创建新的表驱动解码器
    pub const fn new(
        name: &'static str,
        instrs: &'static [InstrDef],
        opcodes: Option<&'static [u32]>,
    ) -> Self {
        Self { name, instrs, opcodes }
    }
}

impl InstrDecoder for TableDrivenDecoder {
    fn name(&self) -> &str {
        self.name
    }

    fn instrs(&self) -> &[InstrDef] {
        self.instrs
    }

    fn decode(&self, pc: u32, raw: u32) -> Option<DecodedInstr> {
        first_decodable(self.instrs, raw, |def| def.decode_instr(pc, raw))
    }

    fn handled_opcodes(&self) -> Option<&[u32]> {
        self.opcodes
    }
}

impl std::fmt::Debug for TableDrivenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDrivenDecoder")
            .field("name", &self.name)
            .field("instrs", &self.instrs.len())
            .finish()
    }
}
