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

//! Bare constructors used while negotiating an authorization key, while
//! running the session layer's housekeeping chatter (acks, salts, bad
//! message notifications) and while reporting RPC errors back to the
//! caller. Unlike a code-generated schema, only the handful this crate's
//! callers actually exchange are defined here.

use crate::deserialize::{Buffer, Result as DeResult};
use crate::{Deserializable, Identifiable, Serializable};

/// `resPQ#05162463`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResPQ {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub pq: Vec<u8>,
    pub server_public_key_fingerprints: Vec<i64>,
}

impl Identifiable for ResPQ {
    const CONSTRUCTOR_ID: u32 = 0x0516_2463;
}

impl Deserializable for ResPQ {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            pq: Deserializable::deserialize(buf)?,
            server_public_key_fingerprints: Deserializable::deserialize(buf)?,
        })
    }
}

/// `p_q_inner_data#83c95aec`.
#[derive(Debug, Clone, PartialEq)]
pub struct PQInnerData {
    pub pq: Vec<u8>,
    pub p: String,
    pub q: String,
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce: [u8; 32],
}

impl Identifiable for PQInnerData {
    const CONSTRUCTOR_ID: u32 = 0x83c9_5aec;
}

impl Serializable for PQInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.pq.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce.serialize(buf);
    }
}

/// `server_DH_params_fail#79cb045d`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDhParamsFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash: [u8; 16],
}

impl Identifiable for ServerDhParamsFail {
    const CONSTRUCTOR_ID: u32 = 0x79cb_045d;
}

impl Deserializable for ServerDhParamsFail {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash: Deserializable::deserialize(buf)?,
        })
    }
}

/// `server_DH_params_ok#d0e8075c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDhParamsOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_answer: Vec<u8>,
}

impl Identifiable for ServerDhParamsOk {
    const CONSTRUCTOR_ID: u32 = 0xd0e8_075c;
}

impl Deserializable for ServerDhParamsOk {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            encrypted_answer: Deserializable::deserialize(buf)?,
        })
    }
}

/// `server_DH_inner_data#b5890dba`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub g: i32,
    pub dh_prime: Vec<u8>,
    pub g_a: Vec<u8>,
    pub server_time: i32,
}

impl Identifiable for ServerDhInnerData {
    const CONSTRUCTOR_ID: u32 = 0xb589_0dba;
}

impl Deserializable for ServerDhInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            g: Deserializable::deserialize(buf)?,
            dh_prime: Deserializable::deserialize(buf)?,
            g_a: Deserializable::deserialize(buf)?,
            server_time: Deserializable::deserialize(buf)?,
        })
    }
}

/// `client_DH_inner_data#6643b654`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub retry_id: i64,
    pub g_b: String,
}

impl Identifiable for ClientDhInnerData {
    const CONSTRUCTOR_ID: u32 = 0x6643_b654;
}

impl Serializable for ClientDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.retry_id.serialize(buf);
        self.g_b.serialize(buf);
    }
}

/// `dh_gen_ok#3bcbf734`.
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash1: [u8; 16],
}

impl Identifiable for DhGenOk {
    const CONSTRUCTOR_ID: u32 = 0x3bcb_f734;
}

impl Deserializable for DhGenOk {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash1: Deserializable::deserialize(buf)?,
        })
    }
}

/// `dh_gen_retry#46dc1fb9`.
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenRetry {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash2: [u8; 16],
}

impl Identifiable for DhGenRetry {
    const CONSTRUCTOR_ID: u32 = 0x46dc_1fb9;
}

impl Deserializable for DhGenRetry {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash2: Deserializable::deserialize(buf)?,
        })
    }
}

/// `dh_gen_fail#a69dae02`.
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash3: [u8; 16],
}

impl Identifiable for DhGenFail {
    const CONSTRUCTOR_ID: u32 = 0xa69d_ae02;
}

impl Deserializable for DhGenFail {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash3: Deserializable::deserialize(buf)?,
        })
    }
}

/// `rpc_error#2144ca19`, carried back by the server whenever a request fails.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub error_code: i32,
    pub error_message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = 0x2144_ca19;
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            error_code: Deserializable::deserialize(buf)?,
            error_message: Deserializable::deserialize(buf)?,
        })
    }
}

/// `msgs_ack#59b4c751`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgsAck {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsAck {
    const CONSTRUCTOR_ID: u32 = 0x59b4_c751;
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_ids.serialize(buf);
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_ids: Deserializable::deserialize(buf)?,
        })
    }
}

/// `pong#347773c5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pong {
    pub msg_id: i64,
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: u32 = 0x3477_73c5;
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_id: Deserializable::deserialize(buf)?,
            ping_id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `bad_msg_notification#a7eff811`.
#[derive(Debug, Clone, PartialEq)]
pub struct BadMsgNotification {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
}

impl Identifiable for BadMsgNotification {
    const CONSTRUCTOR_ID: u32 = 0xa7ef_f811;
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            bad_msg_id: Deserializable::deserialize(buf)?,
            bad_msg_seqno: Deserializable::deserialize(buf)?,
            error_code: Deserializable::deserialize(buf)?,
        })
    }
}

/// `bad_server_salt#edab447b`.
#[derive(Debug, Clone, PartialEq)]
pub struct BadServerSalt {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
    pub new_server_salt: i64,
}

impl Identifiable for BadServerSalt {
    const CONSTRUCTOR_ID: u32 = 0xedab_447b;
}

impl Deserializable for BadServerSalt {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            bad_msg_id: Deserializable::deserialize(buf)?,
            bad_msg_seqno: Deserializable::deserialize(buf)?,
            error_code: Deserializable::deserialize(buf)?,
            new_server_salt: Deserializable::deserialize(buf)?,
        })
    }
}

/// `msg_detailed_info#276d3ec6`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgDetailedInfo {
    pub msg_id: i64,
    pub answer_msg_id: i64,
    pub bytes: i32,
    pub status: i32,
}

impl Identifiable for MsgDetailedInfo {
    const CONSTRUCTOR_ID: u32 = 0x276d_3ec6;
}

impl Deserializable for MsgDetailedInfo {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_id: Deserializable::deserialize(buf)?,
            answer_msg_id: Deserializable::deserialize(buf)?,
            bytes: Deserializable::deserialize(buf)?,
            status: Deserializable::deserialize(buf)?,
        })
    }
}

/// `msg_new_detailed_info#809db6df`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgNewDetailedInfo {
    pub answer_msg_id: i64,
    pub bytes: i32,
    pub status: i32,
}

impl Identifiable for MsgNewDetailedInfo {
    const CONSTRUCTOR_ID: u32 = 0x809d_b6df;
}

impl Deserializable for MsgNewDetailedInfo {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            answer_msg_id: Deserializable::deserialize(buf)?,
            bytes: Deserializable::deserialize(buf)?,
            status: Deserializable::deserialize(buf)?,
        })
    }
}

/// `new_session_created#9ec20908`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionCreated {
    pub first_msg_id: i64,
    pub unique_id: i64,
    pub server_salt: i64,
}

impl Identifiable for NewSessionCreated {
    const CONSTRUCTOR_ID: u32 = 0x9ec2_0908;
}

impl Deserializable for NewSessionCreated {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            first_msg_id: Deserializable::deserialize(buf)?,
            unique_id: Deserializable::deserialize(buf)?,
            server_salt: Deserializable::deserialize(buf)?,
        })
    }
}

/// `future_salt#0949d9dc`, never exchanged on its own but always nested
/// inside a [`FutureSalts`] answer.
#[derive(Debug, Clone, PartialEq)]
pub struct FutureSalt {
    pub valid_since: i32,
    pub valid_until: i32,
    pub salt: i64,
}

impl Identifiable for FutureSalt {
    const CONSTRUCTOR_ID: u32 = 0x0949_d9dc;
}

impl Deserializable for FutureSalt {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            valid_since: Deserializable::deserialize(buf)?,
            valid_until: Deserializable::deserialize(buf)?,
            salt: Deserializable::deserialize(buf)?,
        })
    }
}

/// `future_salts#ae500895`.
#[derive(Debug, Clone, PartialEq)]
pub struct FutureSalts {
    pub req_msg_id: i64,
    pub now: i32,
    pub salts: Vec<FutureSalt>,
}

impl Identifiable for FutureSalts {
    const CONSTRUCTOR_ID: u32 = 0xae50_0895;
}

impl Deserializable for FutureSalts {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let req_msg_id = Deserializable::deserialize(buf)?;
        let now = Deserializable::deserialize(buf)?;
        let count = i32::deserialize(buf)?;
        let mut salts = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            let id = u32::deserialize(buf)?;
            if id != FutureSalt::CONSTRUCTOR_ID {
                return Err(crate::deserialize::Error::UnexpectedConstructor { id });
            }
            salts.push(FutureSalt::deserialize(buf)?);
        }
        Ok(Self {
            req_msg_id,
            now,
            salts,
        })
    }
}

/// `msgs_state_req#da69fb52`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgsStateReq {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsStateReq {
    const CONSTRUCTOR_ID: u32 = 0xda69_fb52;
}

impl Deserializable for MsgsStateReq {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_ids: Deserializable::deserialize(buf)?,
        })
    }
}

/// `msg_resend_req#7d861a08`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgResendReq {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgResendReq {
    const CONSTRUCTOR_ID: u32 = 0x7d86_1a08;
}

impl Deserializable for MsgResendReq {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_ids: Deserializable::deserialize(buf)?,
        })
    }
}

/// `msgs_all_info#8cc0d131`.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgsAllInfo {
    pub msg_ids: Vec<i64>,
    pub info: Vec<u8>,
}

impl Identifiable for MsgsAllInfo {
    const CONSTRUCTOR_ID: u32 = 0x8cc0_d131;
}

impl Deserializable for MsgsAllInfo {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_ids: Deserializable::deserialize(buf)?,
            info: Deserializable::deserialize(buf)?,
        })
    }
}

// --- Update dispatcher: peers, users, chats and messages ---
//
// Only the fields the gap-recovery state machine and the entity cache
// actually look at are kept; this is a hand-picked subset of the real
// peer/message schema, not the full thing.

/// `peerUser#59511722`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerUser {
    pub user_id: i64,
}

impl Identifiable for PeerUser {
    const CONSTRUCTOR_ID: u32 = 0x5951_1722;
}

impl Deserializable for PeerUser {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            user_id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `peerChat#36c6019a`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerChat {
    pub chat_id: i64,
}

impl Identifiable for PeerChat {
    const CONSTRUCTOR_ID: u32 = 0x36c6_019a;
}

impl Deserializable for PeerChat {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            chat_id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `peerChannel#a2a5371e`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerChannel {
    pub channel_id: i64,
}

impl Identifiable for PeerChannel {
    const CONSTRUCTOR_ID: u32 = 0xa2a5_371e;
}

impl Deserializable for PeerChannel {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            channel_id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `userEmpty#d3bc4b7a`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEmpty {
    pub id: i64,
}

impl Identifiable for UserEmpty {
    const CONSTRUCTOR_ID: u32 = 0xd3bc_4b7a;
}

impl Deserializable for UserEmpty {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `user#215c4438`, trimmed to the fields the hash cache needs to build
/// `InputUser`/`InputPeer` values from `min` constructors later on.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub access_hash: i64,
    pub bot: bool,
}

impl Identifiable for User {
    const CONSTRUCTOR_ID: u32 = 0x215c_4438;
}

impl Deserializable for User {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
            access_hash: Deserializable::deserialize(buf)?,
            bot: Deserializable::deserialize(buf)?,
        })
    }
}

/// `chatEmpty#29562865`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEmpty {
    pub id: i64,
}

impl Identifiable for ChatEmpty {
    const CONSTRUCTOR_ID: u32 = 0x2956_2865;
}

impl Deserializable for ChatEmpty {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `chat#41cbf256`, a small group chat. Unlike channels, these never need
/// an access hash to be referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
}

impl Identifiable for Chat {
    const CONSTRUCTOR_ID: u32 = 0x41cb_f256;
}

impl Deserializable for Chat {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `channel#0a8c93a9`, covers both broadcast channels and megagroups.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: i64,
    pub access_hash: i64,
}

impl Identifiable for Channel {
    const CONSTRUCTOR_ID: u32 = 0x0a8c_93a9;
}

impl Deserializable for Channel {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
            access_hash: Deserializable::deserialize(buf)?,
        })
    }
}

/// `messageEmpty#90a6ca84`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEmpty {
    pub id: i32,
}

impl Identifiable for MessageEmpty {
    const CONSTRUCTOR_ID: u32 = 0x90a6_ca84;
}

impl Deserializable for MessageEmpty {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
        })
    }
}

/// `message#85d6cde7`, trimmed down to what the update dispatcher and the
/// entity cache need: its peer (to detect which channel a `pts` belongs
/// to) and enough of the body to be useful to a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i32,
    pub peer_id: super::enums::Peer,
    /// `0` when the message has no known sender (e.g. channel posts).
    pub from_id: i64,
    pub date: i32,
    pub message: String,
    pub out: bool,
}

impl Identifiable for Message {
    const CONSTRUCTOR_ID: u32 = 0x85d6_cde7;
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
            peer_id: Deserializable::deserialize(buf)?,
            from_id: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
            message: Deserializable::deserialize(buf)?,
            out: Deserializable::deserialize(buf)?,
        })
    }
}

// --- Update dispatcher: individual update constructors ---
//
// Every variant here carries a `pts`/`pts_count` (or `qts`) pair needed by
// the gap-recovery state machine; constructors that never carry sequence
// information are out of scope for a crate whose whole purpose is to keep
// that counter consistent.

/// `updateNewMessage#1f2b0afd`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNewMessage {
    pub message: super::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateNewMessage {
    const CONSTRUCTOR_ID: u32 = 0x1f2b_0afd;
}

impl Deserializable for UpdateNewMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateEditMessage#e40370a3`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEditMessage {
    pub message: super::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateEditMessage {
    const CONSTRUCTOR_ID: u32 = 0xe403_70a3;
}

impl Deserializable for UpdateEditMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateDeleteMessages#a20db0e5`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDeleteMessages {
    pub messages: Vec<i32>,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateDeleteMessages {
    const CONSTRUCTOR_ID: u32 = 0xa20d_b0e5;
}

impl Deserializable for UpdateDeleteMessages {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            messages: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateReadHistoryInbox#9961fd42`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReadHistoryInbox {
    pub peer: super::enums::Peer,
    pub max_id: i32,
    pub still_unread_count: i32,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateReadHistoryInbox {
    const CONSTRUCTOR_ID: u32 = 0x9961_fd42;
}

impl Deserializable for UpdateReadHistoryInbox {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            peer: Deserializable::deserialize(buf)?,
            max_id: Deserializable::deserialize(buf)?,
            still_unread_count: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateReadHistoryOutbox#9d956929`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReadHistoryOutbox {
    pub peer: super::enums::Peer,
    pub max_id: i32,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateReadHistoryOutbox {
    const CONSTRUCTOR_ID: u32 = 0x9d95_6929;
}

impl Deserializable for UpdateReadHistoryOutbox {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            peer: Deserializable::deserialize(buf)?,
            max_id: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateNewEncryptedMessage#12bcbd9a`, carries a secret chat message in
/// its still-encrypted form; the dispatcher only cares about `qts` here,
/// the message body is handed back to the caller opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNewEncryptedMessage {
    pub chat_id: i32,
    pub message_data: Vec<u8>,
    pub qts: i32,
}

impl Identifiable for UpdateNewEncryptedMessage {
    const CONSTRUCTOR_ID: u32 = 0x12bc_bd9a;
}

impl Deserializable for UpdateNewEncryptedMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            chat_id: Deserializable::deserialize(buf)?,
            message_data: Deserializable::deserialize(buf)?,
            qts: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateNewChannelMessage#62ba04d9`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNewChannelMessage {
    pub message: super::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateNewChannelMessage {
    const CONSTRUCTOR_ID: u32 = 0x62ba_04d9;
}

impl Deserializable for UpdateNewChannelMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateEditChannelMessage#1b3f4df7`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEditChannelMessage {
    pub message: super::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateEditChannelMessage {
    const CONSTRUCTOR_ID: u32 = 0x1b3f_4df7;
}

impl Deserializable for UpdateEditChannelMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateReadChannelInbox#330b5424`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReadChannelInbox {
    pub channel_id: i64,
    pub max_id: i32,
    pub pts: i32,
}

impl Identifiable for UpdateReadChannelInbox {
    const CONSTRUCTOR_ID: u32 = 0x330b_5424;
}

impl Deserializable for UpdateReadChannelInbox {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            channel_id: Deserializable::deserialize(buf)?,
            max_id: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateDeleteChannelMessages#c32d5b12`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDeleteChannelMessages {
    pub channel_id: i64,
    pub messages: Vec<i32>,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateDeleteChannelMessages {
    const CONSTRUCTOR_ID: u32 = 0xc32d_5b12;
}

impl Deserializable for UpdateDeleteChannelMessages {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            channel_id: Deserializable::deserialize(buf)?,
            messages: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateChannelTooLong#108d941f`. `pts` is `0` when the server omitted
/// it, in which case the entry's last known `pts` is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateChannelTooLong {
    pub channel_id: i64,
    pub pts: i32,
}

impl Identifiable for UpdateChannelTooLong {
    const CONSTRUCTOR_ID: u32 = 0x108d_941f;
}

impl Deserializable for UpdateChannelTooLong {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            channel_id: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updatePinnedChannelMessages#5bb98608`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePinnedChannelMessages {
    pub channel_id: i64,
    pub messages: Vec<i32>,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdatePinnedChannelMessages {
    const CONSTRUCTOR_ID: u32 = 0x5bb9_8608;
}

impl Deserializable for UpdatePinnedChannelMessages {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            channel_id: Deserializable::deserialize(buf)?,
            messages: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateChatParticipant#d087663a`, a secret-chat membership change.
/// Like `updateNewEncryptedMessage`, only its `qts` matters here.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateChatParticipant {
    pub qts: i32,
}

impl Identifiable for UpdateChatParticipant {
    const CONSTRUCTOR_ID: u32 = 0xd087_663a;
}

impl Deserializable for UpdateChatParticipant {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            qts: Deserializable::deserialize(buf)?,
        })
    }
}

// --- Update dispatcher: the wrapping `Updates` shapes ---

/// `updateShortMessage#313bc7f8`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateShortMessage {
    pub out: bool,
    pub id: i32,
    pub user_id: i64,
    pub message: String,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortMessage {
    const CONSTRUCTOR_ID: u32 = 0x313b_c7f8;
}

impl Deserializable for UpdateShortMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            out: Deserializable::deserialize(buf)?,
            id: Deserializable::deserialize(buf)?,
            user_id: Deserializable::deserialize(buf)?,
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateShortChatMessage#4d6deea5`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateShortChatMessage {
    pub out: bool,
    pub id: i32,
    pub from_id: i64,
    pub chat_id: i64,
    pub message: String,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortChatMessage {
    const CONSTRUCTOR_ID: u32 = 0x4d6d_eea5;
}

impl Deserializable for UpdateShortChatMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            out: Deserializable::deserialize(buf)?,
            id: Deserializable::deserialize(buf)?,
            from_id: Deserializable::deserialize(buf)?,
            chat_id: Deserializable::deserialize(buf)?,
            message: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateShort#78d4dec1`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateShort {
    pub update: super::enums::Update,
    pub date: i32,
}

impl Identifiable for UpdateShort {
    const CONSTRUCTOR_ID: u32 = 0x78d4_dec1;
}

impl Deserializable for UpdateShort {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            update: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updatesCombined#725b04c3`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatesCombined {
    pub updates: Vec<super::enums::Update>,
    pub users: Vec<super::enums::User>,
    pub chats: Vec<super::enums::Chat>,
    pub date: i32,
    pub seq_start: i32,
    pub seq: i32,
}

impl Identifiable for UpdatesCombined {
    const CONSTRUCTOR_ID: u32 = 0x725b_04c3;
}

impl Deserializable for UpdatesCombined {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            updates: Deserializable::deserialize(buf)?,
            users: Deserializable::deserialize(buf)?,
            chats: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
            seq_start: Deserializable::deserialize(buf)?,
            seq: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updates#74ae4240`, the same as `updatesCombined` but with `seq_start`
/// always equal to `seq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Updates {
    pub updates: Vec<super::enums::Update>,
    pub users: Vec<super::enums::User>,
    pub chats: Vec<super::enums::Chat>,
    pub date: i32,
    pub seq: i32,
}

impl Identifiable for Updates {
    const CONSTRUCTOR_ID: u32 = 0x74ae_4240;
}

impl Deserializable for Updates {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            updates: Deserializable::deserialize(buf)?,
            users: Deserializable::deserialize(buf)?,
            chats: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
            seq: Deserializable::deserialize(buf)?,
        })
    }
}

/// `updateShortSentMessage#9015e101`, the server's ack for a message we
/// sent ourselves; it still carries `pts`/`pts_count` so the dispatcher
/// can keep the account-wide counter in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateShortSentMessage {
    pub out: bool,
    pub id: i32,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortSentMessage {
    const CONSTRUCTOR_ID: u32 = 0x9015_e101;
}

impl Deserializable for UpdateShortSentMessage {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            out: Deserializable::deserialize(buf)?,
            id: Deserializable::deserialize(buf)?,
            pts: Deserializable::deserialize(buf)?,
            pts_count: Deserializable::deserialize(buf)?,
            date: Deserializable::deserialize(buf)?,
        })
    }
}

/// `inputPeerUser#dde8a54c`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPeerUser {
    pub user_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputPeerUser {
    const CONSTRUCTOR_ID: u32 = 0xdde8_a54c;
}

impl Serializable for InputPeerUser {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.user_id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

/// `inputPeerChat#35a95cb9`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPeerChat {
    pub chat_id: i64,
}

impl Identifiable for InputPeerChat {
    const CONSTRUCTOR_ID: u32 = 0x35a9_5cb9;
}

impl Serializable for InputPeerChat {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.chat_id.serialize(buf);
    }
}

/// `inputPeerChannel#27bcbbfc`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPeerChannel {
    pub channel_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputPeerChannel {
    const CONSTRUCTOR_ID: u32 = 0x27bc_bbfc;
}

impl Serializable for InputPeerChannel {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.channel_id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

/// `inputUser#f21158c6`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputUser {
    pub user_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputUser {
    const CONSTRUCTOR_ID: u32 = 0xf211_58c6;
}

impl Serializable for InputUser {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.user_id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

/// `inputChannelEmpty#ee8c1e86`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChannelEmpty;

impl Identifiable for InputChannelEmpty {
    const CONSTRUCTOR_ID: u32 = 0xee8c_1e86;
}

impl Serializable for InputChannelEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
    }
}

/// `inputChannel#f35aec28`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChannel {
    pub channel_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputChannel {
    const CONSTRUCTOR_ID: u32 = 0xf35a_ec28;
}

impl Serializable for InputChannel {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.channel_id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

/// Update-namespace service objects: the session snapshot returned by
/// `updates.getState` and the two flavors of difference the server sends
/// back when asked to fill in a gap.
pub mod updates {
    use super::super::enums;
    use crate::deserialize::{Buffer, Result as DeResult};
    use crate::{Deserializable, Identifiable};

    /// `updates.state#a56c2a3e`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct State {
        pub pts: i32,
        pub qts: i32,
        pub date: i32,
        pub seq: i32,
        pub unread_count: i32,
    }

    impl Identifiable for State {
        const CONSTRUCTOR_ID: u32 = 0xa56c_2a3e;
    }

    impl Deserializable for State {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                pts: Deserializable::deserialize(buf)?,
                qts: Deserializable::deserialize(buf)?,
                date: Deserializable::deserialize(buf)?,
                seq: Deserializable::deserialize(buf)?,
                unread_count: Deserializable::deserialize(buf)?,
            })
        }
    }

    /// `updates.differenceEmpty#5d75a138`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DifferenceEmpty {
        pub date: i32,
        pub seq: i32,
    }

    impl Identifiable for DifferenceEmpty {
        const CONSTRUCTOR_ID: u32 = 0x5d75_a138;
    }

    impl Deserializable for DifferenceEmpty {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                date: Deserializable::deserialize(buf)?,
                seq: Deserializable::deserialize(buf)?,
            })
        }
    }

    /// `updates.difference#00f49ca0`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Difference {
        pub new_messages: Vec<enums::Message>,
        pub other_updates: Vec<enums::Update>,
        pub chats: Vec<enums::Chat>,
        pub users: Vec<enums::User>,
        pub state: State,
    }

    impl Identifiable for Difference {
        const CONSTRUCTOR_ID: u32 = 0x00f4_9ca0;
    }

    impl Deserializable for Difference {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                new_messages: Deserializable::deserialize(buf)?,
                other_updates: Deserializable::deserialize(buf)?,
                chats: Deserializable::deserialize(buf)?,
                users: Deserializable::deserialize(buf)?,
                state: State::deserialize(buf)?,
            })
        }
    }

    /// `updates.differenceSlice#a8fb1981`, like `Difference` but the
    /// server still has more updates left that weren't included.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DifferenceSlice {
        pub new_messages: Vec<enums::Message>,
        pub other_updates: Vec<enums::Update>,
        pub chats: Vec<enums::Chat>,
        pub users: Vec<enums::User>,
        pub intermediate_state: State,
    }

    impl Identifiable for DifferenceSlice {
        const CONSTRUCTOR_ID: u32 = 0xa8fb_1981;
    }

    impl Deserializable for DifferenceSlice {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                new_messages: Deserializable::deserialize(buf)?,
                other_updates: Deserializable::deserialize(buf)?,
                chats: Deserializable::deserialize(buf)?,
                users: Deserializable::deserialize(buf)?,
                intermediate_state: State::deserialize(buf)?,
            })
        }
    }

    /// `updates.differenceTooLong#4afe8f6d`, the account-wide equivalent
    /// of `updateChannelTooLong`: start over from this `pts`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DifferenceTooLong {
        pub pts: i32,
    }

    impl Identifiable for DifferenceTooLong {
        const CONSTRUCTOR_ID: u32 = 0x4afe_8f6d;
    }

    impl Deserializable for DifferenceTooLong {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                pts: Deserializable::deserialize(buf)?,
            })
        }
    }

    /// `updates.channelDifferenceEmpty#3e11affb`. `timeout` is `0` when
    /// the server did not suggest one.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChannelDifferenceEmpty {
        pub pts: i32,
        pub timeout: i32,
    }

    impl Identifiable for ChannelDifferenceEmpty {
        const CONSTRUCTOR_ID: u32 = 0x3e11_affb;
    }

    impl Deserializable for ChannelDifferenceEmpty {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                pts: Deserializable::deserialize(buf)?,
                timeout: Deserializable::deserialize(buf)?,
            })
        }
    }

    /// `updates.channelDifferenceTooLong#a4bcc6fe`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChannelDifferenceTooLong {
        pub pts: i32,
        pub timeout: i32,
    }

    impl Identifiable for ChannelDifferenceTooLong {
        const CONSTRUCTOR_ID: u32 = 0xa4bc_c6fe;
    }

    impl Deserializable for ChannelDifferenceTooLong {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                pts: Deserializable::deserialize(buf)?,
                timeout: Deserializable::deserialize(buf)?,
            })
        }
    }

    /// `updates.channelDifference#2064674e`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChannelDifference {
        pub final_: bool,
        pub pts: i32,
        pub timeout: i32,
        pub new_messages: Vec<enums::Message>,
        pub other_updates: Vec<enums::Update>,
        pub chats: Vec<enums::Chat>,
        pub users: Vec<enums::User>,
    }

    impl Identifiable for ChannelDifference {
        const CONSTRUCTOR_ID: u32 = 0x2064_674e;
    }

    impl Deserializable for ChannelDifference {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            Ok(Self {
                final_: Deserializable::deserialize(buf)?,
                pts: Deserializable::deserialize(buf)?,
                timeout: Deserializable::deserialize(buf)?,
                new_messages: Deserializable::deserialize(buf)?,
                other_updates: Deserializable::deserialize(buf)?,
                chats: Deserializable::deserialize(buf)?,
                users: Deserializable::deserialize(buf)?,
            })
        }
    }
}
