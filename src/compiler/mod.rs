/// 编译器 - 把脚本模型 + 负载配置转换为 k6 脚本
mod assembler;
mod options;
mod step;

pub use assembler::{IMPORT_PREAMBLE, ScriptAssembler, compile};
pub use options::{LoadProfile, MAIN_SCENARIO, Options, Scenario, StageOptions, compile_options};
pub use step::{DEFAULT_CHECK_EXPRESSION, DEFAULT_CHECK_LABEL, build_request_params, emit_step};
