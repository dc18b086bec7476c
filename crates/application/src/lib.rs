//! 应用层
//!
//! 编排领域模型和仓储接口，实现目录浏览、用户注册登录、
//! 内容购买、播放进度和管理端内容维护等用例服务。

pub mod clock;
pub mod dto;
pub mod error;
pub mod password;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::*;
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
