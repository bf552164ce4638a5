use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        CouponId, CouponKind, DocumentId, NodeGroupId, NodeId, NodeProtocol, SubscribeGroupId,
        SubscribeId, UserId,
    },
    error::{ApiError, CODE_OK},
};

/// Active filter values keyed by filter field. Ordered so query strings are stable.
pub type Filters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(list: Vec<T>, total: u64) -> Self {
        Self { list, total }
    }

    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wrapper around every admin API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.code == CODE_OK {
            Ok(self.data)
        } else {
            Err(ApiError::new(self.code, self.msg))
        }
    }
}

impl Envelope<()> {
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest<I> {
    pub id: I,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteRequest<I> {
    pub ids: Vec<I>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCouponRequest {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    pub discount: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub expire_time: i64,
    #[serde(default)]
    pub user_limit: i64,
    #[serde(default)]
    pub subscribe: Vec<SubscribeId>,
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCouponRequest {
    pub id: CouponId,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    pub discount: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub expire_time: i64,
    #[serde(default)]
    pub user_limit: i64,
    #[serde(default)]
    pub subscribe: Vec<SubscribeId>,
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub show: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub show: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    pub name: String,
    pub server_addr: String,
    #[serde(default)]
    pub speed_limit: i64,
    #[serde(default = "unit_ratio")]
    pub traffic_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<NodeGroupId>,
    pub protocol: NodeProtocol,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNodeRequest {
    pub id: NodeId,
    pub name: String,
    pub server_addr: String,
    #[serde(default)]
    pub speed_limit: i64,
    #[serde(default = "unit_ratio")]
    pub traffic_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<NodeGroupId>,
    pub protocol: NodeProtocol,
    #[serde(default)]
    pub config: serde_json::Value,
    pub enable: bool,
}

fn unit_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscribeGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscribeGroupRequest {
    pub id: SubscribeGroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer_id: Option<UserId>,
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer_id: Option<UserId>,
    pub enable: bool,
}
