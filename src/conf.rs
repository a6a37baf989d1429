//! Resolver configuration.
//!
//! [`ResolveConfig`] collects everything that influences how patiently
//! host names are resolved and how SRV results are picked. The defaults
//! reproduce the behaviour tunnel clients have traditionally shown: ten
//! tries four seconds apart, thrice as many if the machine has just booted,
//! and the last SRV record wins.

use std::cmp;
use std::time::Duration;

//------------ DefMinMax -----------------------------------------------------

/// The default, minimum, and maximum values for a config variable.
#[derive(Clone, Copy, Debug)]
struct DefMinMax<T> {
    /// The default value.
    def: T,

    /// The minimum value.
    min: T,

    /// The maximum value.
    max: T,
}

impl<T: Copy + Ord> DefMinMax<T> {
    /// Creates a new value.
    const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    fn default(self) -> T {
        self.def
    }

    /// Trims the given value to fit into the minimum/maximum range.
    fn limit(self, value: T) -> T {
        cmp::max(self.min, cmp::min(self.max, value))
    }
}

//------------ Configuration Constants ---------------------------------------

/// Configuration limits for the number of tries per host name.
const MAX_TRIES: DefMinMax<u32> = DefMinMax::new(10, 1, 100);

/// Configuration limits for the multiplier applied at boot time.
const BOOT_MULTIPLIER: DefMinMax<u32> = DefMinMax::new(3, 1, 10);

/// Configuration limits for the pause between two tries.
const RETRY_INTERVAL: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_secs(4),
    Duration::ZERO,
    Duration::from_secs(60),
);

//------------ SrvSelection --------------------------------------------------

/// How a single target is picked from an SRV answer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SrvSelection {
    /// Use the last SRV record and the last address of its target, in the
    /// order the answers arrived.
    #[default]
    Last,

    /// Use the SRV record with the lowest priority, preferring higher
    /// weights among equal priorities, and the first address of its
    /// target.
    ///
    /// Unlike RFC 2782, weights are not applied randomly. The result
    /// therefore is the same for every run on the same answer.
    Priority,
}

//------------ ResolveConfig -------------------------------------------------

/// Configuration for endpoint resolution.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolveConfig {
    /// Number of tries for resolving a host name.
    max_tries: u32,

    /// Factor applied to `max_tries` when started at boot.
    boot_multiplier: u32,

    /// Pause before each try but the first.
    retry_interval: Duration,

    /// Whether the process was started while the machine was booting.
    started_at_boot: bool,

    /// How to pick the SRV target.
    srv_selection: SrvSelection,
}

impl ResolveConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the number of tries for resolving a host name.
    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Sets the number of tries for resolving a host name.
    ///
    /// If this value is too small or too large, it will be capped.
    pub fn set_max_tries(&mut self, value: u32) {
        self.max_tries = MAX_TRIES.limit(value)
    }

    /// Returns the factor applied to the number of tries at boot time.
    pub fn boot_multiplier(&self) -> u32 {
        self.boot_multiplier
    }

    /// Sets the factor applied to the number of tries at boot time.
    ///
    /// If this value is too small or too large, it will be capped.
    pub fn set_boot_multiplier(&mut self, value: u32) {
        self.boot_multiplier = BOOT_MULTIPLIER.limit(value)
    }

    /// Returns the pause between two tries.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Sets the pause between two tries.
    ///
    /// If this value is too large, it will be capped.
    pub fn set_retry_interval(&mut self, value: Duration) {
        self.retry_interval = RETRY_INTERVAL.limit(value)
    }

    /// Returns whether the process was started at boot time.
    pub fn started_at_boot(&self) -> bool {
        self.started_at_boot
    }

    /// Sets whether the process was started at boot time.
    ///
    /// At boot, the network and DNS may not be ready yet. Resolution then
    /// tries longer and also retries if a name wasn’t found.
    pub fn set_started_at_boot(&mut self, value: bool) {
        self.started_at_boot = value
    }

    /// Returns how SRV targets are picked.
    pub fn srv_selection(&self) -> SrvSelection {
        self.srv_selection
    }

    /// Sets how SRV targets are picked.
    pub fn set_srv_selection(&mut self, value: SrvSelection) {
        self.srv_selection = value
    }

    /// Returns the effective number of tries for one host name.
    ///
    /// This is the configured number of tries, multiplied by the boot
    /// multiplier if started at boot. It is never zero.
    pub fn effective_tries(&self) -> u32 {
        let tries = MAX_TRIES.limit(self.max_tries);
        if self.started_at_boot {
            tries * BOOT_MULTIPLIER.limit(self.boot_multiplier)
        } else {
            tries
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_tries: MAX_TRIES.default(),
            boot_multiplier: BOOT_MULTIPLIER.default(),
            retry_interval: RETRY_INTERVAL.default(),
            started_at_boot: false,
            srv_selection: SrvSelection::default(),
        }
    }
}

//============ Testing =======================================================
