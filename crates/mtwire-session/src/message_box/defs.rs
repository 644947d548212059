// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#[cfg(test)]
use super::tests::Instant;
use mtwire_tl as tl;
use std::time::Duration;
#[cfg(not(test))]
use web_time::Instant;

/// Telegram sends `seq` equal to `0` when "it doesn't matter", so we use that value too.
pub(super) const NO_SEQ: i32 = 0;

/// It has been observed that Telegram may send updates with `qts` equal to `0` (for
/// example with `ChatParticipant`), interleaved with non-zero `qts` values. This
/// presumably means that the ordering should be "ignored" in that case.
///
/// One can speculate this is done because the field is not optional in the TL definition.
///
/// Not ignoring the `pts` information in those updates can lead to failures resolving gaps.
pub(super) const NO_PTS: i32 = 0;

/// Non-update types like applied difference slices can contain `pts` that should still be
/// processed. Because there's no `date`, a value of `0` is used as the sentinel value for
/// the `date` when constructing the dummy `Updates` (in order to handle them uniformly).
pub(super) const NO_DATE: i32 = 0;

// > It may be useful to wait up to 0.5 seconds
pub(super) const POSSIBLE_GAP_TIMEOUT: Duration = Duration::from_millis(500);

/// After how long without updates the client will "timeout".
///
/// When this timeout occurs, the client will attempt to fetch updates by itself, ignoring all the
/// updates that arrive in the meantime. After all updates are fetched when this happens, the
/// client will resume normal operation, and the timeout will reset.
///
/// Documentation recommends 15 minutes without updates (https://core.telegram.org/api/updates).
pub(super) const NO_UPDATES_TIMEOUT: Duration = Duration::from_secs(15 * 60);

pub(super) const BOT_CHANNEL_DIFF_LIMIT: i32 = 100_000;
pub(super) const USER_CHANNEL_DIFF_LIMIT: i32 = 100;

/// How many channels can have their own tracked `pts` at once. Bounds the
/// work `MessageBox` is willing to do on `getChannelDifference` polling;
/// channels beyond this are tracked on a least-recently-set basis.
pub(super) const MAX_CHANNEL_POLLING: usize = 10;

/// A sortable entry key identifying one of the message boxes tracked by [`super::MessageBox`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Entry {
    /// Account-wide persistent timestamp, covering private chats and small group chats.
    AccountWide,
    /// Account-wide secondary persistent timestamp, covering secret chats and a handful of bot updates.
    SecretChats,
    /// Channel-specific persistent timestamp.
    Channel(i64),
}

/// Per-entry local state.
#[derive(Debug, Clone, Copy)]
pub(super) struct State {
    pub(super) pts: i32,
    pub(super) deadline: Instant,
}

/// Represents the information needed to correctly order and apply a specific update.
#[derive(Debug)]
pub(super) struct PtsInfo {
    pub(super) entry: Entry,
    pub(super) pts: i32,
    pub(super) pts_count: i32,
}

// > ### Recovering gaps
// > […] Manually obtaining updates is also required in the following situations:
// > • Loss of sync: a gap was found in `seq` / `pts` / `qts` (as described above).
// >   It may be useful to wait up to 0.5 seconds in this situation and abort the sync in case a new update
// >   arrives, that fills the gap.
//
// This is really easy to trigger by spamming messages in a channel (with as little as 3 members works), because
// the updates produced by the RPC request take a while to arrive (whereas the read update comes faster alone).
#[derive(Debug)]
pub(super) struct PossibleGap {
    pub(super) deadline: Instant,
    /// Pending updates (those with a larger PTS, producing the gap which may later be filled).
    pub(super) updates: Vec<tl::enums::Update>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Gap;
