// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Defines the contract a session store must satisfy: everything a client
//! needs to resume a connection and its update stream without replaying the
//! authorization-key handshake or losing track of which updates it has
//! already seen.

use std::io;
use std::time::SystemTime;

#[cfg(feature = "impl-serde")]
use serde_derive::{Deserialize, Serialize};

/// Account-wide update state, as understood by [`crate::MessageBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "impl-serde", derive(Serialize, Deserialize))]
pub struct UpdateState {
    pub pts: i32,
    pub qts: i32,
    pub date: i32,
    pub seq: i32,
}

/// Per-channel persistent timestamp, stored independently of [`UpdateState`]
/// because the set of known channels grows over the lifetime of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "impl-serde", derive(Serialize, Deserialize))]
pub struct ChannelState {
    pub channel_id: i64,
    pub pts: i32,
}

/// A cached entity (user or chat) along with its access hash, as needed to
/// keep [`crate::ChatHashCache`] warm across reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "impl-serde", derive(Serialize, Deserialize))]
pub struct EntityHash {
    pub id: i64,
    pub access_hash: i64,
    pub is_channel: bool,
}

/// A server salt valid for a particular time window, as returned by `future_salts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "impl-serde", derive(Serialize, Deserialize))]
pub struct ServerSalt {
    pub salt: i64,
    pub valid_since: i32,
    pub valid_until: i32,
}

/// Everything a client needs to resume a session without a fresh handshake
/// or a full update replay.
///
/// Implementations are free to choose their own durability and concurrency
/// story (in-memory, a file on disk, a database row); the only requirement
/// is that a write has been made durable by the time the call returns, so
/// that a crash right after does not silently roll the session back.
pub trait Session {
    fn set_dc_id(&mut self, dc_id: i32);
    fn get_dc_id(&self) -> Option<i32>;

    fn set_auth_key(&mut self, dc_id: i32, auth_key: [u8; 256], created_at: SystemTime);
    fn get_auth_key(&self, dc_id: i32) -> Option<([u8; 256], SystemTime)>;

    fn set_time_offset(&mut self, offset: i32);
    fn get_time_offset(&self) -> i32;

    /// Records a salt as returned by the server. Implementations should
    /// deduplicate by `valid_since`.
    fn add_server_salt(&mut self, salt: ServerSalt);
    /// Returns a salt that is valid at `now`, if any is known.
    fn get_server_salt(&self, now: i32) -> Option<ServerSalt>;
    fn get_all_server_salts(&self) -> Vec<ServerSalt>;
    /// Evicts salts that expired before `now` and returns how many remain.
    fn get_server_salts_count(&mut self, now: i32) -> usize;

    fn set_state(&mut self, state: UpdateState);
    fn get_state(&self) -> UpdateState;

    fn set_channel_pts(&mut self, channel_id: i64, pts: i32);
    fn get_channel_pts(&self, channel_id: i64) -> Option<i32>;
    fn get_all_channel_pts(&self) -> Vec<ChannelState>;

    fn upsert_entity(&mut self, entity: EntityHash);
    fn get_entity(&self, id: i64) -> Option<EntityHash>;

    /// Discards every piece of state known to the session (used when logging out).
    fn clear(&mut self);

    /// Flushes pending writes to durable storage. Implementations backed by
    /// storage that is already durable on every mutating call (such as a
    /// synchronously-written file) may make this a no-op.
    fn save(&mut self) -> io::Result<()>;
}
