use tracing::trace;

/// Transaction-aware accumulator for formatted log lines.
///
/// Lines appended outside a transaction go straight to the stable log,
/// readable via `get_log`. Opening a transaction pushes a frame; lines
/// appended while a frame is open stay pending in that frame until the
/// matching `commit` folds them into the parent frame (or into the stable
/// log for the outermost frame) or `roll_back` discards them. Frames nest
/// to any depth.
///
/// This is a plain owned value with `&mut self` mutation; callers that
/// need cross-thread sharing wrap it in their own `Mutex`.
#[derive(Debug)]
pub struct LogBuffer {
    stable: Vec<String>,
    frames: Vec<Vec<String>>,
    enabled: bool,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    /// An empty, enabled buffer with no open transaction.
    pub fn new() -> Self {
        Self {
            stable: Vec::new(),
            frames: Vec::new(),
            enabled: true,
        }
    }

    /// Append one log line.
    ///
    /// Goes to the innermost open frame, or to the stable log when no
    /// transaction is open. A no-op while the buffer is disabled.
    pub fn append(&mut self, entry: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let entry = entry.into();
        trace!(depth = self.frames.len(), "buffering log entry");
        match self.frames.last_mut() {
            Some(frame) => frame.push(entry),
            None => self.stable.push(entry),
        }
    }

    /// Open a transaction frame. Frames nest without limit.
    pub fn begin_transaction(&mut self) {
        self.frames.push(Vec::new());
        trace!(depth = self.frames.len(), "transaction frame opened");
    }

    /// Commit the innermost frame: its entries are folded, in order, into
    /// the parent frame, or into the stable log if it was the outermost.
    ///
    /// With no frame open this is a no-op. Hosts that emulate nested
    /// transactions with savepoints issue extra outermost commits; those
    /// must not corrupt the buffer.
    pub fn commit(&mut self) {
        let Some(frame) = self.frames.pop() else {
            trace!("commit with no open frame ignored");
            return;
        };
        trace!(entries = frame.len(), depth = self.frames.len(), "frame committed");
        match self.frames.last_mut() {
            Some(parent) => parent.extend(frame),
            None => self.stable.extend(frame),
        }
    }

    /// Discard the innermost frame and everything appended under it.
    /// Entries in ancestor frames and the stable log are untouched.
    ///
    /// With no frame open this is a no-op, mirroring `commit`.
    pub fn roll_back(&mut self) {
        match self.frames.pop() {
            Some(frame) => {
                trace!(entries = frame.len(), depth = self.frames.len(), "frame rolled back")
            }
            None => trace!("rollback with no open frame ignored"),
        }
    }

    /// The stable log, one entry per line. Pending frames are invisible.
    /// Does not mutate state; use `clear_log` to reset.
    pub fn get_log(&self) -> String {
        self.stable.join("\n")
    }

    /// Empty the stable log. Open frames keep their pending entries.
    pub fn clear_log(&mut self) {
        self.stable.clear();
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop accepting entries. Appends while disabled are dropped; existing
    /// stable and pending entries are kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of entries visible in the stable log.
    pub fn stable_len(&self) -> usize {
        self.stable.len()
    }

    /// Nesting depth of currently open transaction frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
