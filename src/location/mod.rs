mod platform;
mod replay;
mod source;
#[cfg(test)]
pub mod testing;

pub use platform::{LocationPlatform, PlatformError, Reading, WatchOptions};
pub use replay::{ReplayError, ReplayPlatform};
pub use source::{LocationSource, LocationStatus, TierOptions};
