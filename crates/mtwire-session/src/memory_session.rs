// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::collections::HashMap;
use std::io;
use std::time::SystemTime;

use crate::session::{ChannelState, EntityHash, ServerSalt, UpdateState};
use crate::Session;

/// A session implementation kept only in memory. Every write is already
/// durable the moment it returns, so [`Session::save`] is a no-op; state is
/// lost once the process exits, which is expected for throwaway or
/// test-only clients.
#[derive(Default)]
pub struct MemorySession {
    dc_id: Option<i32>,
    auth_keys: HashMap<i32, ([u8; 256], SystemTime)>,
    time_offset: i32,
    salts: Vec<ServerSalt>,
    state: UpdateState,
    channel_pts: HashMap<i64, i32>,
    entities: HashMap<i64, EntityHash>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Session for MemorySession {
    fn set_dc_id(&mut self, dc_id: i32) {
        self.dc_id = Some(dc_id);
    }

    fn get_dc_id(&self) -> Option<i32> {
        self.dc_id
    }

    fn set_auth_key(&mut self, dc_id: i32, auth_key: [u8; 256], created_at: SystemTime) {
        self.auth_keys.insert(dc_id, (auth_key, created_at));
    }

    fn get_auth_key(&self, dc_id: i32) -> Option<([u8; 256], SystemTime)> {
        self.auth_keys.get(&dc_id).copied()
    }

    fn set_time_offset(&mut self, offset: i32) {
        self.time_offset = offset;
    }

    fn get_time_offset(&self) -> i32 {
        self.time_offset
    }

    fn add_server_salt(&mut self, salt: ServerSalt) {
        if !self.salts.iter().any(|s| s.valid_since == salt.valid_since) {
            self.salts.push(salt);
        }
    }

    fn get_server_salt(&self, now: i32) -> Option<ServerSalt> {
        self.salts
            .iter()
            .copied()
            .find(|s| s.valid_since <= now && now < s.valid_until)
    }

    fn get_all_server_salts(&self) -> Vec<ServerSalt> {
        self.salts.clone()
    }

    fn get_server_salts_count(&mut self, now: i32) -> usize {
        self.salts.retain(|s| s.valid_until > now);
        self.salts.len()
    }

    fn set_state(&mut self, state: UpdateState) {
        self.state = state;
    }

    fn get_state(&self) -> UpdateState {
        self.state
    }

    fn set_channel_pts(&mut self, channel_id: i64, pts: i32) {
        self.channel_pts.insert(channel_id, pts);
    }

    fn get_channel_pts(&self, channel_id: i64) -> Option<i32> {
        self.channel_pts.get(&channel_id).copied()
    }

    fn get_all_channel_pts(&self) -> Vec<ChannelState> {
        self.channel_pts
            .iter()
            .map(|(&channel_id, &pts)| ChannelState { channel_id, pts })
            .collect()
    }

    fn upsert_entity(&mut self, entity: EntityHash) {
        self.entities.insert(entity.id, entity);
    }

    fn get_entity(&self, id: i64) -> Option<EntityHash> {
        self.entities.get(&id).copied()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn save(&mut self) -> io::Result<()> {
        Ok(())
    }
}
