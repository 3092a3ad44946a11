use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::region::Region;

/// Reading of a single regional routing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingControlState {
    /// Traffic should be routed to this region.
    On,
    /// Traffic should not be routed to this region.
    Off,
}

impl RoutingControlState {
    /// Returns the canonical string used by the routing-control service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }
}

impl fmt::Display for RoutingControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingControlState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" => Ok(Self::On),
            "Off" => Ok(Self::Off),
            _ => Err(()),
        }
    }
}

/// Routing-control readings keyed by the region that owns each control.
///
/// The `error` flag is the aggregate sentinel: once any read in the pass that
/// produced this map failed, the readings are not trustworthy as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingControlStates {
    readings: BTreeMap<Region, RoutingControlState>,
    error: bool,
}

impl RoutingControlStates {
    /// Empty, error-free readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the reading for a region's control.
    pub fn insert(&mut self, region: Region, state: RoutingControlState) {
        self.readings.insert(region, state);
    }

    /// Sets the error sentinel.
    pub fn mark_error(&mut self) {
        self.error = true;
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, region: impl Into<Region>, state: RoutingControlState) -> Self {
        self.insert(region.into(), state);
        self
    }

    /// Builder-style [`mark_error`](Self::mark_error).
    #[must_use]
    pub fn with_error(mut self) -> Self {
        self.mark_error();
        self
    }

    /// True when any read contributing to these readings failed.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Reading for a region, if one was obtained.
    #[must_use]
    pub fn get(&self, region: &Region) -> Option<RoutingControlState> {
        self.readings.get(region).copied()
    }

    /// Number of regions with a reading.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True when no reading was obtained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Regions whose routing control reads `On`, in region order.
    #[must_use]
    pub fn regions_on(&self) -> Vec<&Region> {
        self.readings
            .iter()
            .filter(|(_, state)| **state == RoutingControlState::On)
            .map(|(region, _)| region)
            .collect()
    }
}
