use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tgw_protocol::{NativeApi, RequestId, SendError, SendResult};

/// Busy code the futures API returns on a rate-limited query.
const THROTTLED: i32 = -3;

#[derive(Debug)]
struct State<R> {
    opened: Vec<String>,
    requests: Vec<(R, RequestId)>,
    refusals: VecDeque<i32>,
    close_count: u32,
}

/// Recording transport. Clones share state, so a test keeps one handle and
/// moves the other into the session.
///
/// Refusals are consumed in order by the next `send` calls; a refused
/// request is not recorded.
#[derive(Debug)]
pub struct ScriptedApi<R> {
    state: Arc<Mutex<State<R>>>,
}

impl<R> Clone for ScriptedApi<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> Default for ScriptedApi<R> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                opened: Vec::new(),
                requests: Vec::new(),
                refusals: VecDeque::new(),
                close_count: 0,
            })),
        }
    }
}

impl<R> ScriptedApi<R> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State<R>> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Refuse the next `n` sends with the throttled return code.
    pub fn throttle_next(&self, n: usize) {
        let mut st = self.lock();
        st.refusals.extend(std::iter::repeat(THROTTLED).take(n));
    }

    /// Refuse the next send with `code`.
    pub fn refuse_next_with(&self, code: i32) {
        self.lock().refusals.push_back(code);
    }

    pub fn opened(&self) -> Vec<String> {
        self.lock().opened.clone()
    }

    pub fn close_count(&self) -> u32 {
        self.lock().close_count
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn clear(&self) {
        self.lock().requests.clear();
    }
}

impl<R: Clone> ScriptedApi<R> {
    pub fn requests(&self) -> Vec<R> {
        self.lock().requests.iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn requests_with_ids(&self) -> Vec<(R, RequestId)> {
        self.lock().requests.clone()
    }

    /// Take everything recorded so far.
    pub fn drain(&self) -> Vec<R> {
        std::mem::take(&mut self.lock().requests)
            .into_iter()
            .map(|(r, _)| r)
            .collect()
    }
}

impl<R> NativeApi<R> for ScriptedApi<R> {
    fn open(&mut self, address: &str) {
        self.lock().opened.push(address.to_string());
    }

    fn send(&mut self, request: R, request_id: RequestId) -> SendResult {
        let mut st = self.lock();
        if let Some(code) = st.refusals.pop_front() {
            return Err(SendError { code });
        }
        st.requests.push((request, request_id));
        Ok(())
    }

    fn close(&mut self) {
        self.lock().close_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_are_consumed_in_order() {
        let handle = ScriptedApi::<u8>::new();
        let mut api = handle.clone();
        handle.throttle_next(1);
        handle.refuse_next_with(-2);

        assert_eq!(api.send(1, 1), Err(SendError { code: -3 }));
        assert_eq!(api.send(2, 2), Err(SendError { code: -2 }));
        assert_eq!(api.send(3, 3), Ok(()));
        assert_eq!(handle.requests_with_ids(), vec![(3, 3)]);
    }

    #[test]
    fn drain_empties_the_log() {
        let handle = ScriptedApi::<u8>::new();
        let mut api = handle.clone();
        api.send(7, 1).unwrap();
        assert_eq!(handle.drain(), vec![7]);
        assert_eq!(handle.request_count(), 0);
    }
}
