//! allude_disasm: RV32I + Zicsr 表驱动反汇编库
//!
//! 把 32 位 RISC-V 指令字转换为一行汇编文本。解码是纯函数：
//! 相同的 `(pc, 指令字)` 总是得到相同的文本，未识别的编码输出 `????`。
//!
//! # 模块结构
//!
//! - `isa`: 指令表、字段提取、格式化与反汇编器
//! - `listing`: 十六进制文本与原始字节的清单输出
//! - `loader`: 从 RV32 ELF 文件读取可执行节
//! - `error`: 错误类型
//!
//! # 示例
//!
//! ```
//! assert_eq!(allude_disasm::isa::disassemble(0, 0xfff58593), "addi\ta1,a1,-1");
//! ```

pub mod error;
pub mod isa;
pub mod listing;
pub mod loader;

pub use error::{DisasmError, Result};
pub use isa::{DecodedInstr, Disassembler, IsaConfig};
