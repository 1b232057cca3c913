/// Host-fulfilled asynchronous resource loads.
///
/// The frame loop never blocks on I/O: composing a scene enqueues
/// `LoadRequest`s, the host fetches them on its own schedule and pushes
/// completions back, and the next frame drains whatever has arrived.
///
/// Every request is stamped with the queue's liveness epoch. Rebuilding the
/// scene (or tearing it down) advances the epoch, so a completion for a
/// request issued against an earlier scene is dropped at the boundary instead
/// of firing into state that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Stable key identifying what the resource is for (e.g. `texture:ground`).
    pub key: String,
    /// Where the host should fetch it from (path or URL; opaque here).
    pub source: String,
    /// Liveness epoch the request was issued under.
    pub epoch: u64,
}

#[derive(Debug)]
pub struct LoadQueue<T> {
    epoch: u64,
    pending: Vec<LoadRequest>,
    completed: Vec<(LoadRequest, T)>,
}

impl<T> Default for LoadQueue<T> {
    fn default() -> Self {
        Self {
            epoch: 0,
            pending: Vec::new(),
            completed: Vec::new(),
        }
    }
}

impl<T> LoadQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate every outstanding request. Completions stamped with an
    /// older epoch will be discarded when drained.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.pending.clear();
        self.epoch
    }

    pub fn request(&mut self, key: impl Into<String>, source: impl Into<String>) -> LoadRequest {
        let request = LoadRequest {
            key: key.into(),
            source: source.into(),
            epoch: self.epoch,
        };
        self.pending.push(request.clone());
        request
    }

    /// Requests the host has not picked up yet.
    pub fn pending(&self) -> &[LoadRequest] {
        &self.pending
    }

    /// Hand the outstanding requests to the host for fetching.
    pub fn take_pending(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Host entry point: deliver a fetched resource. Never fails; staleness
    /// is resolved at drain time.
    pub fn complete(&mut self, request: LoadRequest, payload: T) {
        self.completed.push((request, payload));
    }

    /// Frame entry point: take the completions that are still live. Stale
    /// completions (older epoch) are silently dropped.
    pub fn drain_live(&mut self) -> Vec<(LoadRequest, T)> {
        let epoch = self.epoch;
        let mut live = Vec::new();
        for (request, payload) in self.completed.drain(..) {
            if request.epoch == epoch {
                live.push((request, payload));
            }
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::LoadQueue;

    #[test]
    fn completions_round_trip_through_the_queue() {
        let mut queue: LoadQueue<&str> = LoadQueue::new();
        let request = queue.request("texture:ground", "ground.png");
        assert_eq!(queue.pending().len(), 1);

        for request in queue.take_pending() {
            queue.complete(request, "pixels");
        }
        assert!(queue.pending().is_empty());

        let live = queue.drain_live();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].0, request);
        assert_eq!(live[0].1, "pixels");
    }

    #[test]
    fn stale_epoch_completions_are_dropped() {
        let mut queue: LoadQueue<&str> = LoadQueue::new();
        let request = queue.request("font", "font.json");

        // Scene rebuilt while the host was still fetching.
        queue.advance_epoch();
        queue.complete(request, "glyphs");

        assert!(queue.drain_live().is_empty());
    }

    #[test]
    fn advance_epoch_clears_unfetched_requests() {
        let mut queue: LoadQueue<()> = LoadQueue::new();
        queue.request("texture:map", "map.png");
        queue.advance_epoch();
        assert!(queue.pending().is_empty());
    }
}
