/// 脚本模型 - 编译器的输入数据，本身不含行为
pub mod config;
pub mod script;
pub mod step;

pub use config::{Configuration, Executor, Stage};
pub use script::Script;
pub use step::{AuthConfig, CheckAssertion, Extractor, Header, Method, Step};
