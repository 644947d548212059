// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A mock `Instant` that can be advanced deterministically, so that deadline
//! logic can be exercised without actually sleeping.

use super::*;
use super::defs;
use crate::session::UpdateState;
use std::cell::Cell;
use std::ops::Add;
use std::time::Duration as StdDuration;

thread_local! {
    static NOW: Cell<StdDuration> = Cell::new(StdDuration::ZERO);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Instant(StdDuration);

impl Instant {
    pub(super) fn now() -> Self {
        Self(NOW.with(|now| now.get()))
    }
}

impl Add<StdDuration> for Instant {
    type Output = Instant;

    fn add(self, rhs: StdDuration) -> Instant {
        Instant(self.0 + rhs)
    }
}

fn advance(by: StdDuration) {
    NOW.with(|now| now.set(now.get() + by));
}

fn new_message_box() -> MessageBox {
    MessageBox::load(
        UpdateState {
            pts: 1,
            qts: 1,
            date: 1,
            seq: 0,
        },
        Vec::new(),
    )
}

fn update_new_message(pts: i32, pts_count: i32) -> tl::enums::Update {
    tl::types::UpdateNewMessage {
        message: tl::types::Message {
            id: 1,
            peer_id: tl::types::PeerUser { user_id: 42 }.into(),
            from_id: 42,
            date: 1,
            message: "hi".into(),
            out: false,
        }
        .into(),
        pts,
        pts_count,
    }
    .into()
}

fn updates_combined(
    updates: Vec<tl::enums::Update>,
    seq_start: i32,
    seq: i32,
) -> tl::enums::Updates {
    tl::types::UpdatesCombined {
        updates,
        users: Vec::new(),
        chats: Vec::new(),
        date: 1,
        seq_start,
        seq,
    }
    .into()
}

#[test]
fn fresh_message_box_is_empty_without_load() {
    let mb = MessageBox::new();
    assert!(mb.is_empty());
}

#[test]
fn loaded_message_box_is_not_empty() {
    let mb = new_message_box();
    assert!(!mb.is_empty());
}

#[test]
fn in_order_update_applies_and_advances_pts() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    let updates = updates_combined(vec![update_new_message(2, 1)], 0, 0);
    let (result, _, _) = mb.process_updates(updates, &chat_hashes).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(mb.session_state().pts, 2);
}

#[test]
fn already_seen_update_is_ignored() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    // Local pts is 1; an update claiming pts 1 with count 1 would require local pts 0,
    // so this one is already accounted for and should be dropped silently.
    let updates = updates_combined(vec![update_new_message(1, 1)], 0, 0);
    let (result, _, _) = mb.process_updates(updates, &chat_hashes).unwrap();
    assert!(result.is_empty());
    assert_eq!(mb.session_state().pts, 1);
}

#[test]
fn out_of_order_update_creates_possible_gap() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    // Local pts is 1; this claims the previous pts was 9, well ahead of what we know.
    let updates = updates_combined(vec![update_new_message(10, 1)], 0, 0);
    let (result, _, _) = mb.process_updates(updates, &chat_hashes).unwrap();
    assert!(result.is_empty());
    assert_eq!(mb.session_state().pts, 1);
    assert!(!mb.possible_gaps.is_empty());
}

#[test]
fn gap_resolves_once_missing_updates_arrive() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    let first = updates_combined(vec![update_new_message(10, 1)], 0, 0);
    mb.process_updates(first, &chat_hashes).unwrap();
    assert!(!mb.possible_gaps.is_empty());

    // The missing link: local pts (1) + count (8) == 9, and the gap wants pts 10.
    let second = updates_combined(vec![update_new_message(9, 8)], 0, 0);
    let (result, _, _) = mb.process_updates(second, &chat_hashes).unwrap();
    // Both the unblocking update and the previously gapped one should come out.
    assert_eq!(result.len(), 2);
    assert_eq!(mb.session_state().pts, 10);
    assert!(mb.possible_gaps.is_empty());
}

#[test]
fn seq_gap_in_combined_updates_triggers_get_difference() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    // seq is 0 locally; jumping straight to seq_start 5 is a gap.
    let updates = updates_combined(vec![update_new_message(2, 1)], 5, 5);
    let err = mb.process_updates(updates, &chat_hashes);
    assert!(err.is_err());
    assert!(mb.get_difference().is_some());
}

#[test]
fn unknown_channel_update_asks_for_channel_difference() {
    let mut mb = new_message_box();
    mb.try_set_channel_state(100, 5);
    let mut chat_hashes = ChatHashCache::new(Some((42, false)));
    let _ = chat_hashes.extend(
        &[],
        &[tl::types::Channel {
            id: 100,
            access_hash: 0xdead_beef,
        }
        .into()],
    );

    let update: tl::enums::Update = tl::types::UpdateChannelTooLong {
        channel_id: 100,
        pts: 20,
    }
    .into();
    let updates = updates_combined(vec![update], 0, 0);
    mb.process_updates(updates, &chat_hashes).unwrap();

    let request = mb.get_channel_difference(&chat_hashes);
    assert!(request.is_some());
    assert_eq!(request.unwrap().pts, 5);
}

#[test]
fn channel_polling_bound_evicts_the_oldest_tracked_channel() {
    let mut mb = new_message_box();
    for id in 0..defs::MAX_CHANNEL_POLLING as i64 {
        mb.try_set_channel_state(id, 1);
    }
    assert!(mb.map.contains_key(&Entry::Channel(0)));

    mb.try_set_channel_state(defs::MAX_CHANNEL_POLLING as i64, 1);

    assert!(!mb.map.contains_key(&Entry::Channel(0)));
    assert!(mb.map.contains_key(&Entry::Channel(1)));
    assert!(mb.map.contains_key(&Entry::Channel(defs::MAX_CHANNEL_POLLING as i64)));
    assert_eq!(mb.channel_order.len(), defs::MAX_CHANNEL_POLLING);
}

#[test]
fn re_tracking_an_existing_channel_does_not_evict() {
    let mut mb = new_message_box();
    for id in 0..defs::MAX_CHANNEL_POLLING as i64 {
        mb.try_set_channel_state(id, 1);
    }
    mb.try_set_channel_state(0, 999);

    assert!(mb.map.contains_key(&Entry::Channel(0)));
    // The pts was not overwritten; `try_set_channel_state` only sets state for new entries.
    assert_eq!(mb.map[&Entry::Channel(0)].pts, 1);
    assert_eq!(mb.channel_order.len(), defs::MAX_CHANNEL_POLLING);
}

#[test]
fn check_deadlines_returns_now_while_getting_difference() {
    let mut mb = new_message_box();
    let chat_hashes = ChatHashCache::new(Some((42, false)));

    let updates = updates_combined(vec![update_new_message(2, 1)], 5, 5);
    mb.process_updates(updates, &chat_hashes).unwrap_err();
    assert!(mb.get_difference().is_some());

    let now = Instant::now();
    advance(StdDuration::from_secs(1));
    let deadline = mb.check_deadlines();
    assert!(deadline >= now);
}
