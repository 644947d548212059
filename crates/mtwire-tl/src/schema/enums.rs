// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(clippy::unreadable_literal)]

//! Boxed types: each of these can be represented by more than one bare
//! [`types`](super::types) constructor, and the variant actually present on
//! the wire is picked by reading its constructor id first.

use super::types;
use crate::deserialize::{Buffer, Deserializable, Error as DeError, Result as DeResult};
use crate::{Identifiable, Serializable};

/// Implements `From<bare constructor> for boxed enum variant`, mirroring what
/// the bare-to-boxed promotion generated by a real `.tl` schema would produce.
macro_rules! impl_from {
    ($ty:path => $enum:ident :: $variant:ident) => {
        impl From<$ty> for $enum {
            fn from(x: $ty) -> Self {
                Self::$variant(x)
            }
        }
    };
}

/// `ResPQ`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResPq {
    Pq(types::ResPQ),
}

impl Deserializable for ResPq {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::ResPQ::CONSTRUCTOR_ID => Self::Pq(types::ResPQ::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::ResPQ => ResPq::Pq);

/// `P_Q_inner_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum PQInnerData {
    Data(types::PQInnerData),
}

impl Serializable for PQInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Data(x) => x.serialize(buf),
        }
    }
}

impl_from!(types::PQInnerData => PQInnerData::Data);

/// `Server_DH_Params`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerDhParams {
    Fail(types::ServerDhParamsFail),
    Ok(types::ServerDhParamsOk),
}

impl Deserializable for ServerDhParams {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::ServerDhParamsFail::CONSTRUCTOR_ID => {
                Self::Fail(types::ServerDhParamsFail::deserialize(buf)?)
            }
            types::ServerDhParamsOk::CONSTRUCTOR_ID => {
                Self::Ok(types::ServerDhParamsOk::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::ServerDhParamsFail => ServerDhParams::Fail);
impl_from!(types::ServerDhParamsOk => ServerDhParams::Ok);

/// `Server_DH_inner_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerDhInnerData {
    Data(types::ServerDhInnerData),
}

impl Deserializable for ServerDhInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::ServerDhInnerData::CONSTRUCTOR_ID => {
                Self::Data(types::ServerDhInnerData::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::ServerDhInnerData => ServerDhInnerData::Data);

/// `Client_DH_Inner_Data`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientDhInnerData {
    Data(types::ClientDhInnerData),
}

impl Serializable for ClientDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Data(x) => x.serialize(buf),
        }
    }
}

impl_from!(types::ClientDhInnerData => ClientDhInnerData::Data);

/// `Set_client_DH_params_answer`.
#[derive(Debug, Clone, PartialEq)]
pub enum SetClientDhParamsAnswer {
    DhGenOk(types::DhGenOk),
    DhGenRetry(types::DhGenRetry),
    DhGenFail(types::DhGenFail),
}

impl Deserializable for SetClientDhParamsAnswer {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::DhGenOk::CONSTRUCTOR_ID => Self::DhGenOk(types::DhGenOk::deserialize(buf)?),
            types::DhGenRetry::CONSTRUCTOR_ID => {
                Self::DhGenRetry(types::DhGenRetry::deserialize(buf)?)
            }
            types::DhGenFail::CONSTRUCTOR_ID => {
                Self::DhGenFail(types::DhGenFail::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::DhGenOk => SetClientDhParamsAnswer::DhGenOk);
impl_from!(types::DhGenRetry => SetClientDhParamsAnswer::DhGenRetry);
impl_from!(types::DhGenFail => SetClientDhParamsAnswer::DhGenFail);

/// `MsgsAck`.
#[derive(Debug, Clone, PartialEq)]
pub enum MsgsAck {
    MsgsAck(types::MsgsAck),
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::MsgsAck::CONSTRUCTOR_ID => Self::MsgsAck(types::MsgsAck::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::MsgsAck(x) => x.serialize(buf),
        }
    }
}

impl_from!(types::MsgsAck => MsgsAck::MsgsAck);

/// `Pong`.
#[derive(Debug, Clone, PartialEq)]
pub enum Pong {
    Pong(types::Pong),
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::Pong::CONSTRUCTOR_ID => Self::Pong(types::Pong::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::Pong => Pong::Pong);

/// `BadMsgNotification`.
#[derive(Debug, Clone, PartialEq)]
pub enum BadMsgNotification {
    BadMsgNotification(types::BadMsgNotification),
    BadServerSalt(types::BadServerSalt),
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::BadMsgNotification::CONSTRUCTOR_ID => {
                Self::BadMsgNotification(types::BadMsgNotification::deserialize(buf)?)
            }
            types::BadServerSalt::CONSTRUCTOR_ID => {
                Self::BadServerSalt(types::BadServerSalt::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::BadMsgNotification => BadMsgNotification::BadMsgNotification);
impl_from!(types::BadServerSalt => BadMsgNotification::BadServerSalt);

/// `MsgDetailedInfo`.
#[derive(Debug, Clone, PartialEq)]
pub enum MsgDetailedInfo {
    MsgDetailedInfo(types::MsgDetailedInfo),
    MsgNewDetailedInfo(types::MsgNewDetailedInfo),
}

impl Deserializable for MsgDetailedInfo {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::MsgDetailedInfo::CONSTRUCTOR_ID => {
                Self::MsgDetailedInfo(types::MsgDetailedInfo::deserialize(buf)?)
            }
            types::MsgNewDetailedInfo::CONSTRUCTOR_ID => {
                Self::MsgNewDetailedInfo(types::MsgNewDetailedInfo::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::MsgDetailedInfo => MsgDetailedInfo::MsgDetailedInfo);
impl_from!(types::MsgNewDetailedInfo => MsgDetailedInfo::MsgNewDetailedInfo);

/// `NewSession`.
#[derive(Debug, Clone, PartialEq)]
pub enum NewSession {
    NewSessionCreated(types::NewSessionCreated),
}

impl Deserializable for NewSession {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::NewSessionCreated::CONSTRUCTOR_ID => {
                Self::NewSessionCreated(types::NewSessionCreated::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::NewSessionCreated => NewSession::NewSessionCreated);

/// `FutureSalts`.
#[derive(Debug, Clone, PartialEq)]
pub enum FutureSalts {
    FutureSalts(types::FutureSalts),
}

impl Deserializable for FutureSalts {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::FutureSalts::CONSTRUCTOR_ID => {
                Self::FutureSalts(types::FutureSalts::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::FutureSalts => FutureSalts::FutureSalts);

/// `RpcError`, boxed the same way the other service objects are even
/// though it only ever has one variant, since it always arrives prefixed
/// by its constructor id inside a `rpc_result`.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    RpcError(types::RpcError),
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::RpcError::CONSTRUCTOR_ID => Self::RpcError(types::RpcError::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::RpcError => RpcError::RpcError);

/// `Peer`.
#[derive(Debug, Clone, PartialEq)]
pub enum Peer {
    User(types::PeerUser),
    Chat(types::PeerChat),
    Channel(types::PeerChannel),
}

impl Deserializable for Peer {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::PeerUser::CONSTRUCTOR_ID => Self::User(types::PeerUser::deserialize(buf)?),
            types::PeerChat::CONSTRUCTOR_ID => Self::Chat(types::PeerChat::deserialize(buf)?),
            types::PeerChannel::CONSTRUCTOR_ID => {
                Self::Channel(types::PeerChannel::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl Serializable for Peer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::User(u) => {
                types::PeerUser::CONSTRUCTOR_ID.serialize(buf);
                u.user_id.serialize(buf);
            }
            Self::Chat(c) => {
                types::PeerChat::CONSTRUCTOR_ID.serialize(buf);
                c.chat_id.serialize(buf);
            }
            Self::Channel(c) => {
                types::PeerChannel::CONSTRUCTOR_ID.serialize(buf);
                c.channel_id.serialize(buf);
            }
        }
    }
}

impl_from!(types::PeerUser => Peer::User);
impl_from!(types::PeerChat => Peer::Chat);
impl_from!(types::PeerChannel => Peer::Channel);

/// `User`.
#[derive(Debug, Clone, PartialEq)]
pub enum User {
    Empty(types::UserEmpty),
    User(types::User),
}

impl User {
    pub fn id(&self) -> i64 {
        match self {
            Self::Empty(u) => u.id,
            Self::User(u) => u.id,
        }
    }
}

impl Deserializable for User {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::UserEmpty::CONSTRUCTOR_ID => Self::Empty(types::UserEmpty::deserialize(buf)?),
            types::User::CONSTRUCTOR_ID => Self::User(types::User::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::UserEmpty => User::Empty);
impl_from!(types::User => User::User);

/// `Chat`.
#[derive(Debug, Clone, PartialEq)]
pub enum Chat {
    Empty(types::ChatEmpty),
    Chat(types::Chat),
    Channel(types::Channel),
}

impl Chat {
    pub fn id(&self) -> i64 {
        match self {
            Self::Empty(c) => c.id,
            Self::Chat(c) => c.id,
            Self::Channel(c) => c.id,
        }
    }
}

impl Deserializable for Chat {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::ChatEmpty::CONSTRUCTOR_ID => Self::Empty(types::ChatEmpty::deserialize(buf)?),
            types::Chat::CONSTRUCTOR_ID => Self::Chat(types::Chat::deserialize(buf)?),
            types::Channel::CONSTRUCTOR_ID => Self::Channel(types::Channel::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::ChatEmpty => Chat::Empty);
impl_from!(types::Chat => Chat::Chat);
impl_from!(types::Channel => Chat::Channel);

/// `Message`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Empty(types::MessageEmpty),
    Message(types::Message),
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::MessageEmpty::CONSTRUCTOR_ID => {
                Self::Empty(types::MessageEmpty::deserialize(buf)?)
            }
            types::Message::CONSTRUCTOR_ID => Self::Message(types::Message::deserialize(buf)?),
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::MessageEmpty => Message::Empty);
impl_from!(types::Message => Message::Message);

/// `Update`. Only constructors that carry a `pts`/`qts` pair are modeled,
/// since those are the only ones the gap-recovery state machine needs to
/// see; anything else fails to deserialize with `UnexpectedConstructor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    NewMessage(types::UpdateNewMessage),
    EditMessage(types::UpdateEditMessage),
    DeleteMessages(types::UpdateDeleteMessages),
    ReadHistoryInbox(types::UpdateReadHistoryInbox),
    ReadHistoryOutbox(types::UpdateReadHistoryOutbox),
    NewEncryptedMessage(types::UpdateNewEncryptedMessage),
    NewChannelMessage(types::UpdateNewChannelMessage),
    EditChannelMessage(types::UpdateEditChannelMessage),
    ReadChannelInbox(types::UpdateReadChannelInbox),
    DeleteChannelMessages(types::UpdateDeleteChannelMessages),
    ChannelTooLong(types::UpdateChannelTooLong),
    PinnedChannelMessages(types::UpdatePinnedChannelMessages),
    ChatParticipant(types::UpdateChatParticipant),
}

impl Deserializable for Update {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::UpdateNewMessage::CONSTRUCTOR_ID => {
                Self::NewMessage(types::UpdateNewMessage::deserialize(buf)?)
            }
            types::UpdateEditMessage::CONSTRUCTOR_ID => {
                Self::EditMessage(types::UpdateEditMessage::deserialize(buf)?)
            }
            types::UpdateDeleteMessages::CONSTRUCTOR_ID => {
                Self::DeleteMessages(types::UpdateDeleteMessages::deserialize(buf)?)
            }
            types::UpdateReadHistoryInbox::CONSTRUCTOR_ID => {
                Self::ReadHistoryInbox(types::UpdateReadHistoryInbox::deserialize(buf)?)
            }
            types::UpdateReadHistoryOutbox::CONSTRUCTOR_ID => {
                Self::ReadHistoryOutbox(types::UpdateReadHistoryOutbox::deserialize(buf)?)
            }
            types::UpdateNewEncryptedMessage::CONSTRUCTOR_ID => {
                Self::NewEncryptedMessage(types::UpdateNewEncryptedMessage::deserialize(buf)?)
            }
            types::UpdateNewChannelMessage::CONSTRUCTOR_ID => {
                Self::NewChannelMessage(types::UpdateNewChannelMessage::deserialize(buf)?)
            }
            types::UpdateEditChannelMessage::CONSTRUCTOR_ID => {
                Self::EditChannelMessage(types::UpdateEditChannelMessage::deserialize(buf)?)
            }
            types::UpdateReadChannelInbox::CONSTRUCTOR_ID => {
                Self::ReadChannelInbox(types::UpdateReadChannelInbox::deserialize(buf)?)
            }
            types::UpdateDeleteChannelMessages::CONSTRUCTOR_ID => {
                Self::DeleteChannelMessages(types::UpdateDeleteChannelMessages::deserialize(buf)?)
            }
            types::UpdateChannelTooLong::CONSTRUCTOR_ID => {
                Self::ChannelTooLong(types::UpdateChannelTooLong::deserialize(buf)?)
            }
            types::UpdatePinnedChannelMessages::CONSTRUCTOR_ID => {
                Self::PinnedChannelMessages(types::UpdatePinnedChannelMessages::deserialize(buf)?)
            }
            types::UpdateChatParticipant::CONSTRUCTOR_ID => {
                Self::ChatParticipant(types::UpdateChatParticipant::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::UpdateNewMessage => Update::NewMessage);
impl_from!(types::UpdateEditMessage => Update::EditMessage);
impl_from!(types::UpdateDeleteMessages => Update::DeleteMessages);
impl_from!(types::UpdateReadHistoryInbox => Update::ReadHistoryInbox);
impl_from!(types::UpdateReadHistoryOutbox => Update::ReadHistoryOutbox);
impl_from!(types::UpdateNewEncryptedMessage => Update::NewEncryptedMessage);
impl_from!(types::UpdateNewChannelMessage => Update::NewChannelMessage);
impl_from!(types::UpdateEditChannelMessage => Update::EditChannelMessage);
impl_from!(types::UpdateReadChannelInbox => Update::ReadChannelInbox);
impl_from!(types::UpdateDeleteChannelMessages => Update::DeleteChannelMessages);
impl_from!(types::UpdateChannelTooLong => Update::ChannelTooLong);
impl_from!(types::UpdatePinnedChannelMessages => Update::PinnedChannelMessages);
impl_from!(types::UpdateChatParticipant => Update::ChatParticipant);

/// `Updates`.
#[derive(Debug, Clone, PartialEq)]
pub enum Updates {
    TooLong,
    UpdateShortMessage(types::UpdateShortMessage),
    UpdateShortChatMessage(types::UpdateShortChatMessage),
    UpdateShort(types::UpdateShort),
    Combined(types::UpdatesCombined),
    Updates(types::Updates),
    UpdateShortSentMessage(types::UpdateShortSentMessage),
}

impl Identifiable for Updates {
    // `updatesTooLong` has no body, so this is only meaningful for the
    // `TooLong` variant; the others carry their own constructor ids.
    const CONSTRUCTOR_ID: u32 = 0xe317_af7e;
}

impl Deserializable for Updates {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        use crate::Identifiable as _;
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::CONSTRUCTOR_ID => Self::TooLong,
            types::UpdateShortMessage::CONSTRUCTOR_ID => {
                Self::UpdateShortMessage(types::UpdateShortMessage::deserialize(buf)?)
            }
            types::UpdateShortChatMessage::CONSTRUCTOR_ID => {
                Self::UpdateShortChatMessage(types::UpdateShortChatMessage::deserialize(buf)?)
            }
            types::UpdateShort::CONSTRUCTOR_ID => {
                Self::UpdateShort(types::UpdateShort::deserialize(buf)?)
            }
            types::UpdatesCombined::CONSTRUCTOR_ID => {
                Self::Combined(types::UpdatesCombined::deserialize(buf)?)
            }
            types::Updates::CONSTRUCTOR_ID => Self::Updates(types::Updates::deserialize(buf)?),
            types::UpdateShortSentMessage::CONSTRUCTOR_ID => {
                Self::UpdateShortSentMessage(types::UpdateShortSentMessage::deserialize(buf)?)
            }
            _ => return Err(DeError::UnexpectedConstructor { id }),
        })
    }
}

impl_from!(types::UpdateShortMessage => Updates::UpdateShortMessage);
impl_from!(types::UpdateShortChatMessage => Updates::UpdateShortChatMessage);
impl_from!(types::UpdateShort => Updates::UpdateShort);
impl_from!(types::UpdatesCombined => Updates::Combined);
impl_from!(types::Updates => Updates::Updates);
impl_from!(types::UpdateShortSentMessage => Updates::UpdateShortSentMessage);

/// `InputChannel`.
#[derive(Debug, Clone, PartialEq)]
pub enum InputChannel {
    Empty,
    Channel(types::InputChannel),
}

impl Serializable for InputChannel {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => types::InputChannelEmpty.serialize(buf),
            Self::Channel(c) => c.serialize(buf),
        }
    }
}

impl_from!(types::InputChannel => InputChannel::Channel);

/// `InputPeer`, only ever sent by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum InputPeer {
    Empty,
    PeerSelf,
    User(types::InputPeerUser),
    Chat(types::InputPeerChat),
    Channel(types::InputPeerChannel),
}

impl Identifiable for InputPeer {
    const CONSTRUCTOR_ID: u32 = 0x7f3b_18ea;
}

impl Serializable for InputPeer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => Self::CONSTRUCTOR_ID.serialize(buf),
            Self::PeerSelf => 0x7da0_7ec9u32.serialize(buf),
            Self::User(u) => u.serialize(buf),
            Self::Chat(c) => c.serialize(buf),
            Self::Channel(c) => c.serialize(buf),
        }
    }
}

impl_from!(types::InputPeerUser => InputPeer::User);
impl_from!(types::InputPeerChat => InputPeer::Chat);
impl_from!(types::InputPeerChannel => InputPeer::Channel);

/// `InputUser`, only ever sent by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum InputUser {
    Empty,
    UserSelf,
    User(types::InputUser),
}

impl Identifiable for InputUser {
    const CONSTRUCTOR_ID: u32 = 0xb98a_db0c;
}

impl Serializable for InputUser {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => Self::CONSTRUCTOR_ID.serialize(buf),
            Self::UserSelf => 0xf7c1_b13fu32.serialize(buf),
            Self::User(u) => u.serialize(buf),
        }
    }
}

impl_from!(types::InputUser => InputUser::User);

/// Update-namespace boxed service objects, mirroring [`types::updates`].
pub mod updates {
    use super::super::types::updates as types;
    use crate::deserialize::{Buffer, Error as DeError, Result as DeResult};
    use crate::{Deserializable, Identifiable};

    /// `updates.State`.
    #[derive(Debug, Clone, PartialEq)]
    pub enum State {
        State(types::State),
    }

    impl Deserializable for State {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::State::CONSTRUCTOR_ID => Self::State(types::State::deserialize(buf)?),
                _ => return Err(DeError::UnexpectedConstructor { id }),
            })
        }
    }

    impl_from!(types::State => State::State);

    /// `updates.Difference`.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Difference {
        Empty(types::DifferenceEmpty),
        Difference(types::Difference),
        Slice(types::DifferenceSlice),
        TooLong(types::DifferenceTooLong),
    }

    impl Deserializable for Difference {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::DifferenceEmpty::CONSTRUCTOR_ID => {
                    Self::Empty(types::DifferenceEmpty::deserialize(buf)?)
                }
                types::Difference::CONSTRUCTOR_ID => {
                    Self::Difference(types::Difference::deserialize(buf)?)
                }
                types::DifferenceSlice::CONSTRUCTOR_ID => {
                    Self::Slice(types::DifferenceSlice::deserialize(buf)?)
                }
                types::DifferenceTooLong::CONSTRUCTOR_ID => {
                    Self::TooLong(types::DifferenceTooLong::deserialize(buf)?)
                }
                _ => return Err(DeError::UnexpectedConstructor { id }),
            })
        }
    }

    impl_from!(types::DifferenceEmpty => Difference::Empty);
    impl_from!(types::Difference => Difference::Difference);
    impl_from!(types::DifferenceSlice => Difference::Slice);
    impl_from!(types::DifferenceTooLong => Difference::TooLong);

    /// `updates.ChannelDifference`.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ChannelDifference {
        Empty(types::ChannelDifferenceEmpty),
        TooLong(types::ChannelDifferenceTooLong),
        Difference(types::ChannelDifference),
    }

    impl Deserializable for ChannelDifference {
        fn deserialize(buf: Buffer) -> DeResult<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::ChannelDifferenceEmpty::CONSTRUCTOR_ID => {
                    Self::Empty(types::ChannelDifferenceEmpty::deserialize(buf)?)
                }
                types::ChannelDifferenceTooLong::CONSTRUCTOR_ID => {
                    Self::TooLong(types::ChannelDifferenceTooLong::deserialize(buf)?)
                }
                types::ChannelDifference::CONSTRUCTOR_ID => {
                    Self::Difference(types::ChannelDifference::deserialize(buf)?)
                }
                _ => return Err(DeError::UnexpectedConstructor { id }),
            })
        }
    }

    impl_from!(types::ChannelDifferenceEmpty => ChannelDifference::Empty);
    impl_from!(types::ChannelDifferenceTooLong => ChannelDifference::TooLong);
    impl_from!(types::ChannelDifference => ChannelDifference::Difference);
}
