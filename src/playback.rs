use crate::binding::runtime::LocalMapperRuntime;
use crate::binding::style_binding::StyleBinding;
use crate::foundation::core::{PropertyMap, Timestamp, ViewDescriptor, ViewRef};
use crate::foundation::error::RestyleResult;
use crate::script::StyleScript;
use crate::updater::scheduler::{FrameScheduler, ManualFrameScheduler};
use crate::updater::sink::CommitSink;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::debug;

/// Options for [`play`].
#[derive(Clone, Debug)]
pub struct PlaybackOpts {
    /// Stop after this many frames even if animations are still running.
    pub max_frames: u64,
    /// Clock reading of the simulated display when playback starts.
    pub start: Timestamp,
    /// Views every commit is addressed to.
    pub targets: Vec<ViewDescriptor>,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            max_frames: 600,
            start: Timestamp(0.0),
            targets: vec![ViewDescriptor::new(1, "View")],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Frames the simulated display delivered.
    pub frames: u64,
    /// Calls that reached the sink.
    pub commits: usize,
    /// Whether every animation finished within `max_frames`.
    pub settled: bool,
}

struct CountingSink {
    inner: Rc<dyn CommitSink>,
    count: Cell<usize>,
}

impl CommitSink for CountingSink {
    fn commit(
        &self,
        targets: &[ViewDescriptor],
        props: &PropertyMap,
        views: Option<&BTreeSet<ViewRef>>,
    ) {
        self.count.set(self.count.get() + 1);
        self.inner.commit(targets, props, views);
    }
}

/// Bind `script` and drive it with a simulated display at the script's frame rate.
#[tracing::instrument(skip_all, fields(fps = script.frames_per_second))]
pub fn play(
    script: &StyleScript,
    opts: &PlaybackOpts,
    sink: Rc<dyn CommitSink>,
) -> RestyleResult<PlaybackStats> {
    let sched = Rc::new(ManualFrameScheduler::new(opts.start));
    let runtime = Rc::new(LocalMapperRuntime::new());
    let counting = Rc::new(CountingSink {
        inner: sink,
        count: Cell::new(0),
    });

    let mut binding = StyleBinding::new(
        runtime.clone(),
        script.opts.clone(),
        counting.clone(),
        sched.clone(),
    );
    runtime.watch(binding.active());
    binding.view_targets().set(opts.targets.clone());
    binding.register(script.producer("script")?, None, Vec::new())?;

    let interval = script.frame_interval_ms();
    let mut frames = 0;
    while sched.pending() > 0 && frames < opts.max_frames {
        sched.advance_by(interval);
        frames += 1;
    }
    let settled = sched.pending() == 0;
    debug!(frames, settled, end = sched.now().0, "playback finished");
    binding.teardown();

    Ok(PlaybackStats {
        frames,
        commits: counting.count.get(),
        settled,
    })
}

#[cfg(test)]
#[path = "../tests/unit/playback.rs"]
mod tests;
