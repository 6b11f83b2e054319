//! Plain data row types written by output backends.

/// One slot request made by the tick loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub tick:     u64,
    pub world:    u32,
    pub group:    u32,
    pub region:   u32,
    /// Distance from the group's front to the region boundary.
    pub distance: f64,
    /// Unit cell the group was about to enter.
    pub entry:    (i32, i32, i32),
    /// `granted`, `denied` or `ignored`.
    pub result:   &'static str,
}

/// One holder released from a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseRow {
    pub tick:   u64,
    pub world:  u32,
    pub slot:   u32,
    pub group:  u32,
    /// `expired`, `removed` or `rejected`.
    pub reason: &'static str,
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:     u64,
    /// Groups that had a planned segment.
    pub moving:   u64,
    pub granted:  u64,
    pub denied:   u64,
    pub released: u64,
}
