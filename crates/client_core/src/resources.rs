//! The admin resources exposed under `/v1/admin/`.

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Coupon, Document, Entity, ServerNode, SubscribeGroup, User},
    protocol::{
        CreateCouponRequest, CreateDocumentRequest, CreateNodeRequest,
        CreateSubscribeGroupRequest, CreateUserRequest, UpdateCouponRequest,
        UpdateDocumentRequest, UpdateNodeRequest, UpdateSubscribeGroupRequest, UpdateUserRequest,
    },
};

pub trait Resource: Send + Sync + 'static {
    type Row: Entity + DeserializeOwned + Send + 'static;
    type Create: Serialize + DeserializeOwned + Send + Sync;
    type Update: Serialize + DeserializeOwned + Send + Sync;

    /// Path segment below `/v1/admin/`.
    const PATH: &'static str;
}

pub struct Coupons;
pub struct Documents;
pub struct Nodes;
pub struct SubscribeGroups;
pub struct Users;

impl Resource for Coupons {
    type Row = Coupon;
    type Create = CreateCouponRequest;
    type Update = UpdateCouponRequest;
    const PATH: &'static str = "coupon";
}

impl Resource for Documents {
    type Row = Document;
    type Create = CreateDocumentRequest;
    type Update = UpdateDocumentRequest;
    const PATH: &'static str = "document";
}

impl Resource for Nodes {
    type Row = ServerNode;
    type Create = CreateNodeRequest;
    type Update = UpdateNodeRequest;
    const PATH: &'static str = "server";
}

impl Resource for SubscribeGroups {
    type Row = SubscribeGroup;
    type Create = CreateSubscribeGroupRequest;
    type Update = UpdateSubscribeGroupRequest;
    const PATH: &'static str = "subscribe/group";
}

impl Resource for Users {
    type Row = User;
    type Create = CreateUserRequest;
    type Update = UpdateUserRequest;
    const PATH: &'static str = "user";
}
