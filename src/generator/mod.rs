pub mod http;

pub use http::HttpGenerator;

/// 为单个 URL 生成快速开始脚本
pub fn generate_from_url(url: &str) -> crate::Result<crate::model::Script> {
    HttpGenerator::generate(url)
}
