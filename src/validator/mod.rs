/// 校验模块 - 编译前的结构检查
mod config;
mod script;

pub use config::validate_config;
pub use script::validate;
