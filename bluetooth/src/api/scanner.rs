// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::scan_filter::ScanFilter;
use crate::scan_record::ScanResult;
use crate::Error;

/// Concrete types implementing this trait produce scan results from a
/// radio. The environment supplies the implementation; everything above
/// it is platform neutral.
#[async_trait]
pub trait LeScanner {
    /// Begin scanning for nearby advertisements.
    fn start_scan(&mut self) -> Result<(), Error>;

    /// Stop scanning for nearby advertisements.
    fn stop_scan(&mut self) -> Result<(), Error>;

    /// Poll the next discovered advertisement.
    async fn next_scan_result(&mut self) -> Result<ScanResult, Error>;
}

/// Receives the scan results that pass a listener's filters. Invoked on
/// whatever thread drives the dispatcher; implementations must be
/// prepared to be called concurrently.
pub trait ScanCallback: Send + Sync {
    fn on_scan_result(&self, result: &ScanResult);
}

/// Opaque handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

struct Listener {
    filters: Vec<ScanFilter>,
    callback: Arc<dyn ScanCallback>,
}

impl Listener {
    /// An empty filter list means the listener wants everything.
    fn accepts(&self, result: &ScanResult) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|filter| filter.matches(result))
    }
}

/// Fans incoming scan results out to registered listeners, applying each
/// listener's filters. One advertisement is typically evaluated against
/// many filters, so this is the hot path the matcher was built for.
#[derive(Default)]
pub struct ScanDispatcher {
    inner: Mutex<DispatcherState>,
}

#[derive(Default)]
struct DispatcherState {
    next_id: u32,
    listeners: HashMap<u32, Listener>,
}

impl ScanDispatcher {
    pub fn new() -> Self {
        ScanDispatcher::default()
    }

    pub fn register(
        &self,
        filters: Vec<ScanFilter>,
        callback: Arc<dyn ScanCallback>,
    ) -> ListenerId {
        let mut state = self.inner.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, Listener { filters, callback });
        debug!(listener = id, "registered scan listener");
        ListenerId(id)
    }

    /// Returns false when the handle was already gone.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let removed = self.inner.lock().unwrap().listeners.remove(&id.0).is_some();
        if !removed {
            warn!(listener = id.0, "unregistering unknown scan listener");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    /// Deliver one scan result to every listener whose filters accept
    /// it. The lock is held only to snapshot the matching callbacks, not
    /// across the callback invocations. Returns the delivery count.
    pub fn dispatch(&self, result: &ScanResult) -> usize {
        let matched: Vec<Arc<dyn ScanCallback>> = {
            let state = self.inner.lock().unwrap();
            state
                .listeners
                .values()
                .filter(|listener| listener.accepts(result))
                .map(|listener| Arc::clone(&listener.callback))
                .collect()
        };
        debug!(deliveries = matched.len(), "dispatching scan result");
        for callback in &matched {
            callback.on_scan_result(result);
        }
        matched.len()
    }
}

/// Drive a scanner into a dispatcher until the scanner reports an error.
/// The terminating error is returned so the caller can distinguish a
/// deliberate stop from a failure.
pub async fn pump<S: LeScanner + Send>(
    scanner: &mut S,
    dispatcher: &ScanDispatcher,
) -> Error {
    loop {
        match scanner.next_scan_result().await {
            Ok(result) => {
                dispatcher.dispatch(&result);
            }
            Err(err) => return err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressType, BleAddress};
    use crate::scan_record::{data_types, ScanRecord};
    use std::collections::VecDeque;
    use std::sync::mpsc;

    struct ChannelCallback {
        tx: Mutex<mpsc::Sender<ScanResult>>,
    }

    impl ScanCallback for ChannelCallback {
        fn on_scan_result(&self, result: &ScanResult) {
            self.tx.lock().unwrap().send(result.clone()).unwrap();
        }
    }

    fn channel_callback() -> (Arc<ChannelCallback>, mpsc::Receiver<ScanResult>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(ChannelCallback { tx: Mutex::new(tx) }), rx)
    }

    fn named_result(name: &str) -> ScanResult {
        let mut payload = vec![(name.len() + 1) as u8, data_types::COMPLETE_LOCAL_NAME];
        payload.extend_from_slice(name.as_bytes());
        ScanResult::new(
            Some(BleAddress::parse("01:02:03:AB:CD:EF", AddressType::Public).unwrap()),
            Some(-50),
            Some(ScanRecord::parse(&payload)),
        )
    }

    #[test]
    fn empty_filter_list_receives_everything() {
        let dispatcher = ScanDispatcher::new();
        let (callback, rx) = channel_callback();
        dispatcher.register(Vec::new(), callback);

        assert_eq!(dispatcher.dispatch(&named_result("anything")), 1);
        assert_eq!(rx.try_recv().unwrap(), named_result("anything"));
    }

    #[test]
    fn filters_select_listeners() {
        let dispatcher = ScanDispatcher::new();

        let (wants_a, rx_a) = channel_callback();
        let filter_a = ScanFilter::builder().device_name("aa").build().unwrap();
        dispatcher.register(vec![filter_a], wants_a);

        let (wants_b, rx_b) = channel_callback();
        let filter_b = ScanFilter::builder().device_name("bb").build().unwrap();
        dispatcher.register(vec![filter_b], wants_b);

        assert_eq!(dispatcher.dispatch(&named_result("aa")), 1);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn any_filter_in_the_list_suffices() {
        let dispatcher = ScanDispatcher::new();
        let (callback, rx) = channel_callback();
        let filters = vec![
            ScanFilter::builder().device_name("aa").build().unwrap(),
            ScanFilter::builder().device_name("bb").build().unwrap(),
        ];
        dispatcher.register(filters, callback);

        assert_eq!(dispatcher.dispatch(&named_result("bb")), 1);
        assert!(rx.try_recv().is_ok());
        assert_eq!(dispatcher.dispatch(&named_result("cc")), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unregister_stops_delivery() {
        let dispatcher = ScanDispatcher::new();
        let (callback, rx) = channel_callback();
        let id = dispatcher.register(Vec::new(), callback);

        assert!(dispatcher.unregister(id));
        assert!(!dispatcher.unregister(id));
        assert_eq!(dispatcher.dispatch(&named_result("aa")), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(dispatcher.listener_count(), 0);
    }

    struct ScriptedScanner {
        started: bool,
        results: VecDeque<ScanResult>,
    }

    #[async_trait]
    impl LeScanner for ScriptedScanner {
        fn start_scan(&mut self) -> Result<(), Error> {
            self.started = true;
            Ok(())
        }

        fn stop_scan(&mut self) -> Result<(), Error> {
            if !self.started {
                return Err(Error::FailedPrecondition(String::from(
                    "scanning hasn't started",
                )));
            }
            self.started = false;
            Ok(())
        }

        async fn next_scan_result(&mut self) -> Result<ScanResult, Error> {
            match self.results.pop_front() {
                Some(result) => Ok(result),
                None => Err(Error::FailedPrecondition(String::from(
                    "scan source exhausted",
                ))),
            }
        }
    }

    #[test]
    fn pump_delivers_until_the_scanner_runs_dry() {
        let mut scanner = ScriptedScanner {
            started: false,
            results: VecDeque::from([named_result("aa"), named_result("bb"), named_result("aa")]),
        };
        scanner.start_scan().unwrap();

        let dispatcher = ScanDispatcher::new();
        let (callback, rx) = channel_callback();
        let filter = ScanFilter::builder().device_name("aa").build().unwrap();
        dispatcher.register(vec![filter], callback);

        let err = futures::executor::block_on(pump(&mut scanner, &dispatcher));
        assert!(matches!(err, Error::FailedPrecondition(_)));

        assert_eq!(rx.try_iter().count(), 2);
        scanner.stop_scan().unwrap();
    }
}
