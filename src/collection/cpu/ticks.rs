//! Normalization of platform tick counters into a canonical ordering.
//!
//! Every platform enumerates its CPU accounting states differently (macOS
//! reports `user, system, idle, nice`, FreeBSD reports `user, nice, sys, intr,
//! idle`, and so on). Everything downstream of this module only ever sees a
//! [`TickVector`], whose first four slots are always `user, nice, system, idle`.

use std::fmt;

use indexmap::IndexMap;

use crate::collection::error::{CollectionError, CollectionResult};

/// Raw tick counters keyed by the platform's own name for each state, in the
/// order the platform reported them.
pub type NativeTicks = IndexMap<&'static str, u64>;

/// The position of the idle counter in a [`TickVector`].
pub const IDLE_INDEX: usize = 3;

/// The number of states every platform must report.
pub const MANDATORY_STATES: usize = 4;

/// A canonical CPU accounting state.
///
/// The declaration order is the canonical order; the first four variants are
/// mandatory and always occupy positions 0 to 3 of a [`TickVector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuState {
    User,
    Nice,
    System,
    Idle,
    IoWait,
    Irq,
    SoftIrq,
    Steal,
}

impl CpuState {
    pub const MANDATORY: [CpuState; MANDATORY_STATES] =
        [CpuState::User, CpuState::Nice, CpuState::System, CpuState::Idle];

    /// Classifies a platform-native state name. Returns [`None`] for states
    /// with no canonical counterpart.
    pub fn from_native(name: &str) -> Option<CpuState> {
        let state = match name.to_ascii_lowercase().as_str() {
            "user" | "usr" => CpuState::User,
            "nice" => CpuState::Nice,
            "system" | "sys" | "kernel" => CpuState::System,
            "idle" => CpuState::Idle,
            "iowait" | "wait" => CpuState::IoWait,
            "irq" | "intr" | "interrupt" => CpuState::Irq,
            "softirq" => CpuState::SoftIrq,
            "steal" => CpuState::Steal,
            _ => return None,
        };

        Some(state)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CpuState::User => "user",
            CpuState::Nice => "nice",
            CpuState::System => "system",
            CpuState::Idle => "idle",
            CpuState::IoWait => "iowait",
            CpuState::Irq => "irq",
            CpuState::SoftIrq => "softirq",
            CpuState::Steal => "steal",
        }
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mapping from a platform's native state set to the canonical order.
///
/// Built once per tick source; building it is where an incompatible platform
/// gets rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickLayout {
    /// Native state names, in canonical order.
    slots: Vec<&'static str>,
}

impl TickLayout {
    /// Creates a layout from the state names a platform reports.
    ///
    /// The result places `user, nice, system, idle` first, then any
    /// recognised extras in [`CpuState`] order, then any unrecognised states in
    /// the order they were given.
    pub fn from_native_states(native: &[&'static str]) -> CollectionResult<TickLayout> {
        let mut known: Vec<(CpuState, &'static str)> = Vec::with_capacity(native.len());
        let mut unknown: Vec<&'static str> = Vec::new();

        for &name in native {
            match CpuState::from_native(name) {
                Some(state) => {
                    if known.iter().any(|(existing, _)| *existing == state) {
                        log::warn!("tick state '{name}' maps onto '{state}' twice; ignoring it");
                    } else {
                        known.push((state, name));
                    }
                }
                None => unknown.push(name),
            }
        }

        if let Some(&missing) = CpuState::MANDATORY
            .iter()
            .find(|mandatory| !known.iter().any(|(state, _)| state == *mandatory))
        {
            return Err(CollectionError::UnsupportedPlatformState { missing });
        }

        known.sort_by_key(|(state, _)| *state);

        let slots: Vec<_> = known
            .into_iter()
            .map(|(_, name)| name)
            .chain(unknown)
            .collect();

        log::debug!("canonical tick layout: {slots:?}");

        Ok(TickLayout { slots })
    }

    /// The native state names in canonical order.
    pub fn native_names(&self) -> &[&'static str] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reorders one sample into a [`TickVector`].
    pub fn normalize(&self, native: &NativeTicks) -> CollectionResult<TickVector> {
        let ticks = self
            .slots
            .iter()
            .map(|name| {
                native.get(name).copied().ok_or_else(|| {
                    CollectionError::tick_source(format!("the sample has no '{name}' counter"))
                })
            })
            .collect::<CollectionResult<Vec<_>>>()?;

        Ok(TickVector { ticks })
    }
}

/// Builds a layout from a single sample and normalizes it.
///
/// Prefer building a [`TickLayout`] once and reusing it; this is for callers
/// holding a one-off mapping.
pub fn normalize(native: &NativeTicks) -> CollectionResult<TickVector> {
    let names: Vec<_> = native.keys().copied().collect();
    TickLayout::from_native_states(&names)?.normalize(native)
}

/// Cumulative tick counters in canonical order: `user, nice, system, idle`,
/// followed by any extra states the platform provides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickVector {
    ticks: Vec<u64>,
}

impl TickVector {
    pub fn user(&self) -> u64 {
        self.ticks[CpuState::User as usize]
    }

    pub fn nice(&self) -> u64 {
        self.ticks[CpuState::Nice as usize]
    }

    pub fn system(&self) -> u64 {
        self.ticks[CpuState::System as usize]
    }

    pub fn idle(&self) -> u64 {
        self.ticks[IDLE_INDEX]
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.ticks
    }
}

/// All four mandatory counters at zero.
impl Default for TickVector {
    fn default() -> Self {
        TickVector::from([0; MANDATORY_STATES])
    }
}

impl From<[u64; MANDATORY_STATES]> for TickVector {
    fn from(ticks: [u64; MANDATORY_STATES]) -> Self {
        TickVector {
            ticks: ticks.to_vec(),
        }
    }
}

impl TryFrom<Vec<u64>> for TickVector {
    type Error = CollectionError;

    /// Wraps counters that are already in canonical order.
    fn try_from(ticks: Vec<u64>) -> Result<Self, Self::Error> {
        match CpuState::MANDATORY.get(ticks.len()) {
            Some(&missing) => Err(CollectionError::UnsupportedPlatformState { missing }),
            None => Ok(TickVector { ticks }),
        }
    }
}

impl std::ops::Deref for TickVector {
    type Target = [u64];

    fn deref(&self) -> &Self::Target {
        &self.ticks
    }
}
