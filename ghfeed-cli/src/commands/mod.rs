//! CLI command implementations

pub mod check;
pub mod feed;
pub mod target;

pub use check::CheckArgs;
pub use feed::FeedArgs;
pub use target::TargetArgs;
