// Tick source - the external periodic callback contract
// The core never assumes a tick rate; consumers read wall-clock time
// from the tick argument instead of counting invocations

/// Handle identifying a registered tick callback
pub type TickHandle = u64;

/// A tick callback; receives the current wall-clock time in milliseconds
pub type TickCallback = Box<dyn FnMut(u64)>;

/// Something that periodically invokes registered callbacks
///
/// Production hosts back this with a render loop or timer; tests drive a
/// `ManualTickSource` explicitly. Cancelling only stops future ticks, a
/// tick already in flight completes.
pub trait TickSource {
    fn register(&mut self, callback: TickCallback) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

/// Tick source driven explicitly by the caller
///
/// `fire(now_ms)` invokes every registered callback once with the supplied
/// time, which makes timing tests fully deterministic.
#[derive(Default)]
pub struct ManualTickSource {
    callbacks: Vec<(TickHandle, TickCallback)>,
    next_handle: TickHandle,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every registered callback with the given time
    pub fn fire(&mut self, now_ms: u64) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(now_ms);
        }
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl TickSource for ManualTickSource {
    fn register(&mut self, callback: TickCallback) -> TickHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.callbacks.push((handle, callback));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.callbacks.retain(|(h, _)| *h != handle);
    }
}
