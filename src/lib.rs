//! Restyle drives per-frame interpolation of view style properties.
//!
//! A style producer returns a property tree mixing static values with animations. The engine
//! merges each new tree with the animations still in flight, commits static values and
//! per-frame animation values to a view sink, and reuses or rebuilds bindings based on a
//! dependency fingerprint:
//!
//! - Build trees from [`AnimationNode`]s ([`timing`], [`spring`] or custom [`FrameAnimation`]s)
//! - Drive them with a [`StyleUpdater`], or let a [`StyleBinding`] manage the lifecycle
//! - Play JSON [`StyleScript`]s against a simulated display with [`play`]
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod binding;
pub mod playback;
pub mod script;
pub mod style;
pub mod updater;

pub use crate::foundation::core::{PropertyMap, REMOVED, Timestamp, ViewDescriptor, ViewRef};
pub use crate::foundation::error::{RestyleError, RestyleResult};
pub use crate::foundation::shared::{SharedId, SharedValue};

pub use crate::animation::ease::Ease;
pub use crate::animation::node::{
    AnimationNode, Completions, Composite, FrameAnimation, StartPhase, StyleTree, Terminal,
};
pub use crate::animation::spring::{SpringConfig, spring};
pub use crate::animation::timing::timing;
pub use crate::binding::fingerprint::{DepValue, Fingerprint};
pub use crate::binding::producer::{Producer, ProducerCaps};
pub use crate::binding::runtime::{LocalMapperRuntime, MapperId, MapperMetadata, MapperRuntime};
pub use crate::binding::style_binding::{BindOutcome, BindingOpts, StrategyKind, StyleBinding};
pub use crate::playback::{PlaybackOpts, PlaybackStats, play};
pub use crate::script::StyleScript;
pub use crate::style::color::{COLOR_PROPS, ColorNormalizer, HexColorNormalizer};
pub use crate::updater::scheduler::{FrameScheduler, ManualFrameScheduler};
pub use crate::updater::sink::{Commit, CommitSink, InMemoryCommitSink};
pub use crate::updater::state::AnimatedState;
pub use crate::updater::strategy::{Adapter, CommitStrategy};
pub use crate::updater::style_updater::{StyleUpdater, UpdaterParts};
