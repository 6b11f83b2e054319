//! The exclusion slot.
//!
//! # try_enter
//!
//! ```text
//! no bound regions                      → Ignored
//! predicate rejects requester           → release requester's claims, Ignored
//! requester already holds what it asks  → record probe, Granted
//! conflicting holders (see below)       → expire each once; any left → Denied
//! an older waiter wants the same thing  → Denied
//! otherwise                             → claim, raise signals if newly held, Granted
//! ```
//!
//! A holder denied a further cell because another holder claims it is in
//! conflict: both are already inside.  The denial stands, and the first
//! denial of each conflict is reported as a [`SlotConflict`].
//!
//! Conflicts depend on the request's policy:
//!
//! | Request        | Conflicts with                                        |
//! |----------------|-------------------------------------------------------|
//! | `Whole`        | every other holder                                    |
//! | `PathCrossing` | another whole holder, or another claim on that cell   |

use tracing::{debug, warn};

use mz_agent::GroupLookup;
use mz_core::{BlockPos, GroupId, RegionId, SlotId, Tick};
use mz_spatial::{ExclusionPolicy, RegionKey, RegionStore};

use crate::admission::AdmissionPredicate;
use crate::expiry::{ExpiryDelays, Fate, Holder};
use crate::registry::{ReleaseReason, SlotConflict, SlotEvents, SlotRelease};
use crate::signal::{SignalSink, emit};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnterResult {
    /// The requester holds the slot (or the requested cell) and may proceed.
    Granted,
    /// Another group holds it.  The requester must stop before the region.
    Denied,
    /// The slot does not apply to the requester.  It may proceed.
    Ignored,
}

impl EnterResult {
    #[inline]
    pub fn may_proceed(self) -> bool {
        self != EnterResult::Denied
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnterResult::Granted => "granted",
            EnterResult::Denied => "denied",
            EnterResult::Ignored => "ignored",
        }
    }
}

impl std::fmt::Display for EnterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnterRequest {
    pub group: GroupId,
    pub policy: ExclusionPolicy,
    /// Unit cell the group is about to enter.
    pub block: BlockPos,
}

/// Everything a slot reads but does not own.
#[derive(Copy, Clone)]
pub struct LockContext<'a> {
    pub now: Tick,
    pub groups: &'a dyn GroupLookup,
    pub regions: &'a RegionStore,
    pub delays: ExpiryDelays,
}

#[derive(Clone, Debug)]
struct Member {
    region: RegionId,
    key: RegionKey,
    predicate: String,
}

/// A group recently denied entry.
#[derive(Copy, Clone, Debug)]
struct Waiter {
    group: GroupId,
    whole: bool,
    block: BlockPos,
    /// First denial of the current wait.
    since: Tick,
    /// Latest denial.
    last: Tick,
}

impl Waiter {
    #[inline]
    fn is_waiting(&self, now: Tick) -> bool {
        now.since(self.last) <= 1
    }

    #[inline]
    fn wants(&self, whole: bool, block: BlockPos) -> bool {
        whole || self.whole || self.block == block
    }
}

#[derive(Clone, Debug)]
pub struct Slot {
    id: SlotId,
    name: String,
    members: Vec<Member>,
    member_ids: Vec<RegionId>,
    predicate: AdmissionPredicate,
    holders: Vec<Holder>,
    waiting: Vec<Waiter>,
}

impl Slot {
    pub(crate) fn new(id: SlotId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            member_ids: Vec::new(),
            predicate: AdmissionPredicate::always(),
            holders: Vec::new(),
            waiting: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Shared name, empty for an anonymous slot.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn has_regions(&self) -> bool {
        !self.members.is_empty()
    }

    /// Bound regions, ordered by region key.
    pub fn regions(&self) -> &[RegionId] {
        &self.member_ids
    }

    pub fn keys(&self) -> impl Iterator<Item = &RegionKey> {
        self.members.iter().map(|m| &m.key)
    }

    pub fn predicate(&self) -> &AdmissionPredicate {
        &self.predicate
    }

    pub fn holders(&self) -> &[Holder] {
        &self.holders
    }

    pub fn is_held(&self) -> bool {
        !self.holders.is_empty()
    }

    /// The group holding the whole slot, if any.  At most one exists.
    pub fn owner(&self) -> Option<GroupId> {
        self.holders.iter().find(|h| h.whole).map(|h| h.group)
    }

    pub fn holder(&self, group: GroupId) -> Option<&Holder> {
        self.holders.iter().find(|h| h.group == group)
    }

    /// Whether a group other than the current holders was denied during
    /// `now` or the tick before.
    pub fn is_contended(&self, now: Tick) -> bool {
        self.waiting
            .iter()
            .any(|w| w.is_waiting(now) && self.holder(w.group).is_none())
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Bind a region.  Statements are recomputed eagerly; if the slot is
    /// held the new region's signal is raised straight away.
    pub(crate) fn bind(&mut self, region: RegionId, key: RegionKey, predicate: &str, signals: &mut dyn SignalSink) {
        if self.member_ids.contains(&region) {
            return;
        }
        let pos = self.members.partition_point(|m| m.key <= key);
        self.members.insert(pos, Member { region, key, predicate: predicate.to_string() });
        self.refresh_members();
        if self.is_held() {
            emit(signals, [&key], true);
        }
    }

    /// Unbind a region.  Its signal is lowered if the slot was held.
    /// Returns whether the slot is now empty.
    pub(crate) fn unbind(&mut self, region: RegionId, signals: &mut dyn SignalSink) -> bool {
        if let Some(pos) = self.members.iter().position(|m| m.region == region) {
            let removed = self.members.remove(pos);
            self.refresh_members();
            if self.is_held() {
                emit(signals, [&removed.key], false);
            }
        }
        if self.members.is_empty() {
            self.holders.clear();
            self.waiting.clear();
        }
        self.members.is_empty()
    }

    fn refresh_members(&mut self) {
        self.member_ids = self.members.iter().map(|m| m.region).collect();
        self.predicate = AdmissionPredicate::parse(
            self.members.iter().map(|m| m.predicate.as_str()).filter(|s| !s.trim().is_empty()),
        );
    }

    // ── Entry ─────────────────────────────────────────────────────────────

    pub fn try_enter(
        &mut self,
        req: EnterRequest,
        ctx: &LockContext<'_>,
        signals: &mut dyn SignalSink,
        events: &mut SlotEvents,
    ) -> EnterResult {
        if self.members.is_empty() {
            return EnterResult::Ignored;
        }

        if !self.predicate.admits(req.group, ctx.groups) {
            self.waiting.retain(|w| w.group != req.group);
            if let Some(pos) = self.holders.iter().position(|h| h.group == req.group) {
                self.release_at(pos, ReleaseReason::Rejected, ctx.now, signals, &mut events.released);
            }
            return EnterResult::Ignored;
        }

        let whole = req.policy == ExclusionPolicy::Whole;
        if let Some(h) = self.holders.iter_mut().find(|h| h.group == req.group) {
            if h.whole || (!whole && h.cells.contains_key(&req.block)) {
                h.probe(ctx.now);
                h.conflict = None;
                if !h.whole {
                    h.cells.insert(req.block, ctx.now);
                }
                return EnterResult::Granted;
            }
        }

        // Resolve conflicts, expiring stale holders once each.
        let since = self.note_waiting(&req, ctx.now);
        let delay = ctx.delays.for_contention(true);
        let mut i = 0;
        let mut blocked_by = None;
        while i < self.holders.len() {
            let h = &self.holders[i];
            let conflicts = h.group != req.group && (whole || h.claims(req.block));
            if !conflicts {
                i += 1;
                continue;
            }
            let fate = self.holders[i].evaluate(ctx.now, &self.member_ids, ctx.groups, ctx.regions, delay);
            match fate {
                Fate::Keep => {
                    blocked_by = Some(self.holders[i].group);
                    break;
                }
                Fate::Expired => self.release_at(i, ReleaseReason::Expired, ctx.now, signals, &mut events.released),
                Fate::Removed => self.release_at(i, ReleaseReason::Removed, ctx.now, signals, &mut events.released),
            }
        }
        if let Some(holder) = blocked_by {
            debug!(slot = %self.name, group = %req.group, %holder, tick = %ctx.now, "slot denied");
            self.note_conflict(&req, holder, ctx.now, events);
            return EnterResult::Denied;
        }

        // Groups that have waited longer go first.
        let ahead = self
            .waiting
            .iter()
            .find(|w| w.group != req.group && w.since < since && w.is_waiting(ctx.now) && w.wants(whole, req.block))
            .map(|w| w.group);
        if let Some(waiter) = ahead {
            debug!(slot = %self.name, group = %req.group, %waiter, tick = %ctx.now, "slot denied to older waiter");
            return EnterResult::Denied;
        }

        self.waiting.retain(|w| w.group != req.group);
        let was_held = self.is_held();
        match self.holders.iter_mut().find(|h| h.group == req.group) {
            Some(h) => {
                // Existing crossing claim: widen it.
                h.probe(ctx.now);
                h.conflict = None;
                if whole {
                    h.whole = true;
                    h.cells.clear();
                } else {
                    h.cells.insert(req.block, ctx.now);
                }
            }
            None => {
                let mut h = Holder::new(req.group, whole, ctx.now);
                if !whole {
                    h.cells.insert(req.block, ctx.now);
                }
                self.holders.push(h);
            }
        }
        if !was_held {
            emit(signals, self.members.iter().map(|m| &m.key), true);
        }
        debug!(slot = %self.name, group = %req.group, policy = %req.policy, tick = %ctx.now, "slot granted");
        EnterResult::Granted
    }

    /// Record `req` as waiting and return the tick its wait began.
    fn note_waiting(&mut self, req: &EnterRequest, now: Tick) -> Tick {
        let whole = req.policy == ExclusionPolicy::Whole;
        match self.waiting.iter_mut().find(|w| w.group == req.group) {
            Some(w) => {
                if !w.is_waiting(now) {
                    w.since = now;
                }
                w.last = now;
                w.whole = whole;
                w.block = req.block;
                w.since
            }
            None => {
                self.waiting.push(Waiter { group: req.group, whole, block: req.block, since: now, last: now });
                now
            }
        }
    }

    /// A holder blocked by another holder is in conflict.  Only the first
    /// denial against a given holder is reported.
    fn note_conflict(&mut self, req: &EnterRequest, other: GroupId, now: Tick, events: &mut SlotEvents) {
        let Some(h) = self.holders.iter_mut().find(|h| h.group == req.group) else {
            return;
        };
        if h.conflict == Some(other) {
            return;
        }
        h.conflict = Some(other);
        warn!(slot = %self.name, group = %req.group, %other, block = %req.block, tick = %now, "slot conflict");
        events.conflicts.push(SlotConflict { slot: self.id, group: req.group, other, block: req.block, tick: now });
    }

    // ── Release ───────────────────────────────────────────────────────────

    fn release_at(
        &mut self,
        pos: usize,
        reason: ReleaseReason,
        now: Tick,
        signals: &mut dyn SignalSink,
        released: &mut Vec<SlotRelease>,
    ) {
        let h = self.holders.remove(pos);
        debug!(slot = %self.name, group = %h.group, ?reason, tick = %now, "slot released");
        released.push(SlotRelease { slot: self.id, group: h.group, reason, tick: now });
        if self.holders.is_empty() {
            emit(signals, self.members.iter().map(|m| &m.key), false);
        }
    }

    /// Release every claim held by `group`.
    pub(crate) fn release_group(
        &mut self,
        group: GroupId,
        reason: ReleaseReason,
        now: Tick,
        signals: &mut dyn SignalSink,
        released: &mut Vec<SlotRelease>,
    ) {
        self.waiting.retain(|w| w.group != group);
        if let Some(pos) = self.holders.iter().position(|h| h.group == group) {
            self.release_at(pos, reason, now, signals, released);
        }
    }

    /// Per-tick expiry sweep.
    pub(crate) fn sweep(&mut self, ctx: &LockContext<'_>, signals: &mut dyn SignalSink, released: &mut Vec<SlotRelease>) {
        self.waiting.retain(|w| w.is_waiting(ctx.now));
        if self.holders.is_empty() {
            return;
        }
        let delay = ctx.delays.for_contention(self.is_contended(ctx.now));
        let mut i = 0;
        while i < self.holders.len() {
            match self.holders[i].evaluate(ctx.now, &self.member_ids, ctx.groups, ctx.regions, delay) {
                Fate::Keep => i += 1,
                Fate::Expired => self.release_at(i, ReleaseReason::Expired, ctx.now, signals, released),
                Fate::Removed => self.release_at(i, ReleaseReason::Removed, ctx.now, signals, released),
            }
        }
    }
}
