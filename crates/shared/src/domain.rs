use std::{fmt, hash::Hash};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(CouponId);
id_newtype!(DocumentId);
id_newtype!(NodeId);
id_newtype!(NodeGroupId);
id_newtype!(SubscribeId);
id_newtype!(SubscribeGroupId);
id_newtype!(UserId);

/// A record addressed by a stable id on the admin API.
pub trait Entity {
    type Id: Copy
        + Eq
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CouponKind {
    Percentage,
    Amount,
}

impl TryFrom<u8> for CouponKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Percentage),
            2 => Ok(Self::Amount),
            other => Err(format!("unknown coupon type {other}")),
        }
    }
}

impl From<CouponKind> for u8 {
    fn from(value: CouponKind) -> Self {
        match value {
            CouponKind::Percentage => 1,
            CouponKind::Amount => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeProtocol {
    Shadowsocks,
    Vmess,
    Vless,
    Trojan,
}

impl NodeProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shadowsocks => "shadowsocks",
            Self::Vmess => "vmess",
            Self::Vless => "vless",
            Self::Trojan => "trojan",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    pub discount: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub used_count: i64,
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

impl Coupon {
    /// `None` means the coupon has no usage cap.
    pub fn remaining(&self) -> Option<i64> {
        (self.count != 0).then(|| self.count - self.used_count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub show: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerNode {
    pub id: NodeId,
    pub name: String,
    pub server_addr: String,
    #[serde(default)]
    pub speed_limit: i64,
    #[serde(default = "default_traffic_ratio")]
    pub traffic_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<NodeGroupId>,
    pub protocol: NodeProtocol,
    #[serde(default)]
    pub config: serde_json::Value,
    pub enable: bool,
}

fn default_traffic_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGroup {
    pub id: NodeGroupId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeSummary {
    pub id: SubscribeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeGroup {
    pub id: SubscribeGroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer_id: Option<UserId>,
    pub enable: bool,
    #[serde(default)]
    pub created_at: i64,
}

macro_rules! entity {
    ($record:ty, $id:ty) => {
        impl Entity for $record {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

entity!(Coupon, CouponId);
entity!(Document, DocumentId);
entity!(ServerNode, NodeId);
entity!(NodeGroup, NodeGroupId);
entity!(SubscribeSummary, SubscribeId);
entity!(SubscribeGroup, SubscribeGroupId);
entity!(User, UserId);
