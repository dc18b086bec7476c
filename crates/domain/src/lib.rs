//! 内容付费平台核心领域模型
//!
//! 包含内容、用户、购买、播放进度等核心实体，以及访问控制策略和
//! 目录查询过滤模型。

pub mod access;
pub mod catalog;
pub mod entities;
pub mod errors;
pub mod repositories;

// 重新导出常用类型
pub use access::*;
pub use catalog::*;
pub use entities::*;
pub use errors::*;
pub use repositories::*;
