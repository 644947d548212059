// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hand-written constructors for the authorization-key handshake and the
//! update dispatcher, grouped the way generated schema code would be:
//! bare [`types`], [`functions`] that can be sent as requests, and the
//! boxed [`enums`] that tie a set of types together under one TL type.

pub mod enums;
pub mod functions;
pub mod types;

/// The MTProto layer these definitions were written against.
pub const LAYER: i32 = 181;

/// Looks up the human-readable name of a constructor id, for diagnostics
/// such as attaching the request that caused an `rpc_error` to the error
/// message. Falls back to the hex id for constructors outside this crate's
/// schema, since only the authorization-key handshake and session-layer
/// service objects are defined here rather than the full Telegram API.
pub fn name_for_id(id: u32) -> String {
    use crate::Identifiable;
    match id {
        functions::ReqPqMulti::CONSTRUCTOR_ID => "req_pq_multi".to_owned(),
        functions::ReqDhParams::CONSTRUCTOR_ID => "req_DH_params".to_owned(),
        functions::SetClientDhParams::CONSTRUCTOR_ID => "set_client_DH_params".to_owned(),
        functions::InvokeAfterMsg::CONSTRUCTOR_ID => "invokeAfterMsg".to_owned(),
        types::ResPQ::CONSTRUCTOR_ID => "resPQ".to_owned(),
        types::PQInnerData::CONSTRUCTOR_ID => "p_q_inner_data".to_owned(),
        types::ServerDhParamsFail::CONSTRUCTOR_ID => "server_DH_params_fail".to_owned(),
        types::ServerDhParamsOk::CONSTRUCTOR_ID => "server_DH_params_ok".to_owned(),
        types::ServerDhInnerData::CONSTRUCTOR_ID => "server_DH_inner_data".to_owned(),
        types::ClientDhInnerData::CONSTRUCTOR_ID => "client_DH_inner_data".to_owned(),
        types::DhGenOk::CONSTRUCTOR_ID => "dh_gen_ok".to_owned(),
        types::DhGenRetry::CONSTRUCTOR_ID => "dh_gen_retry".to_owned(),
        types::DhGenFail::CONSTRUCTOR_ID => "dh_gen_fail".to_owned(),
        types::RpcError::CONSTRUCTOR_ID => "rpc_error".to_owned(),
        types::MsgsAck::CONSTRUCTOR_ID => "msgs_ack".to_owned(),
        types::Pong::CONSTRUCTOR_ID => "pong".to_owned(),
        types::BadMsgNotification::CONSTRUCTOR_ID => "bad_msg_notification".to_owned(),
        types::BadServerSalt::CONSTRUCTOR_ID => "bad_server_salt".to_owned(),
        types::MsgDetailedInfo::CONSTRUCTOR_ID => "msg_detailed_info".to_owned(),
        types::MsgNewDetailedInfo::CONSTRUCTOR_ID => "msg_new_detailed_info".to_owned(),
        types::NewSessionCreated::CONSTRUCTOR_ID => "new_session_created".to_owned(),
        types::FutureSalt::CONSTRUCTOR_ID => "future_salt".to_owned(),
        types::FutureSalts::CONSTRUCTOR_ID => "future_salts".to_owned(),
        types::MsgsStateReq::CONSTRUCTOR_ID => "msgs_state_req".to_owned(),
        types::MsgResendReq::CONSTRUCTOR_ID => "msg_resend_req".to_owned(),
        types::MsgsAllInfo::CONSTRUCTOR_ID => "msgs_all_info".to_owned(),
        functions::GetDifference::CONSTRUCTOR_ID => "updates.getDifference".to_owned(),
        functions::GetChannelDifference::CONSTRUCTOR_ID => {
            "updates.getChannelDifference".to_owned()
        }
        types::UpdateNewMessage::CONSTRUCTOR_ID => "updateNewMessage".to_owned(),
        types::UpdateNewChannelMessage::CONSTRUCTOR_ID => "updateNewChannelMessage".to_owned(),
        types::UpdateChannelTooLong::CONSTRUCTOR_ID => "updateChannelTooLong".to_owned(),
        _ => format!("0x{id:08x}"),
    }
}
