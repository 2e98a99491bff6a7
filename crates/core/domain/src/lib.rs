pub mod data;

pub use data::{EnumItem, ParameterDescriptor, ParameterValue, ValueBatch};

use std::fmt;

/// 门户账号凭据：启动时提供一次，进程生命周期内不可变。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    // 密码不进入日志。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 门户签发的 bearer token。重新认证时整体替换，不做字段级修改。
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// 门户会话 ID。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已建立的会话：token 与绑定到该 token 的会话 ID。
///
/// 由主循环持有；保活任务只拿到一份不可变拷贝。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub id: SessionId,
}

/// 当前桥接的安装（系统列表的第一项）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationTarget {
    pub system_id: i64,
    pub gateway_id: i64,
    pub name: String,
    pub software_version: String,
}
