// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(
    clippy::cognitive_complexity,
    clippy::identity_op,
    clippy::unreadable_literal
)]

//! Requests that can be sent to the server during the authorization-key
//! handshake, each represented by a `struct`. All of them implement
//! [`Identifiable`] and [`Serializable`]; the type the server sends back is
//! named by the associated [`RemoteCall::Return`].
//!
//! [`Identifiable`]: crate::Identifiable
//! [`RemoteCall::Return`]: crate::RemoteCall::Return

use super::enums;
use crate::{Identifiable, RemoteCall, Serializable};

/// `req_pq_multi#be7e8ef1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReqPqMulti {
    pub nonce: [u8; 16],
}

impl Identifiable for ReqPqMulti {
    const CONSTRUCTOR_ID: u32 = 0xbe7e_8ef1;
}

impl Serializable for ReqPqMulti {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
    }
}

impl RemoteCall for ReqPqMulti {
    type Return = enums::ResPq;
}

/// `req_DH_params#d712e4be`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReqDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub p: String,
    pub q: String,
    pub public_key_fingerprint: i64,
    pub encrypted_data: String,
}

impl Identifiable for ReqDhParams {
    const CONSTRUCTOR_ID: u32 = 0xd712_e4be;
}

impl Serializable for ReqDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.public_key_fingerprint.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for ReqDhParams {
    type Return = enums::ServerDhParams;
}

/// `set_client_DH_params#f5045f1f`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClientDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_data: String,
}

impl Identifiable for SetClientDhParams {
    const CONSTRUCTOR_ID: u32 = 0xf504_5f1f;
}

impl Serializable for SetClientDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for SetClientDhParams {
    type Return = enums::SetClientDhParamsAnswer;
}

/// `invokeAfterMsg#cb9f372d`, wraps another already-serialized request so
/// the server executes it only after `msg_id` has been handled. The inner
/// query is embedded verbatim, since it is already a complete, framed
/// message body rather than a plain TL value.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeAfterMsg {
    pub msg_id: i64,
    pub query: Vec<u8>,
}

impl Identifiable for InvokeAfterMsg {
    const CONSTRUCTOR_ID: u32 = 0xcb9f_372d;
}

impl Serializable for InvokeAfterMsg {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_id.serialize(buf);
        buf.extend(self.query.iter().copied());
    }
}

/// `updates.getState#edd4882a`. Carries no fields; the server answers with
/// the session's current `pts`/`qts`/`date`/`seq`, which only an
/// authenticated, correctly-keyed session can produce. Used as a
/// lightweight probe of whether the authorization key is still valid on a
/// given data center, independent of pulling any actual update gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetState;

impl Identifiable for GetState {
    const CONSTRUCTOR_ID: u32 = 0xedd4_882a;
}

impl Serializable for GetState {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
    }
}

impl RemoteCall for GetState {
    type Return = enums::updates::State;
}

/// `updates.getDifference#19c2f763`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetDifference {
    pub pts: i32,
    pub qts: i32,
    pub date: i32,
}

impl Identifiable for GetDifference {
    const CONSTRUCTOR_ID: u32 = 0x19c2_f763;
}

impl Serializable for GetDifference {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.pts.serialize(buf);
        self.qts.serialize(buf);
        self.date.serialize(buf);
    }
}

impl RemoteCall for GetDifference {
    type Return = enums::updates::Difference;
}

/// `updates.getChannelDifference#03173d78`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetChannelDifference {
    pub force: bool,
    pub channel: enums::InputChannel,
    pub pts: i32,
    pub limit: i32,
}

impl Identifiable for GetChannelDifference {
    const CONSTRUCTOR_ID: u32 = 0x0317_3d78;
}

impl Serializable for GetChannelDifference {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.force.serialize(buf);
        self.channel.serialize(buf);
        self.pts.serialize(buf);
        self.limit.serialize(buf);
    }
}

impl RemoteCall for GetChannelDifference {
    type Return = enums::updates::ChannelDifference;
}
