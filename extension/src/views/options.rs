// Options page state: Loading -> Ready(checked), Ready -> Ready on each toggle.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;
use crate::services::storage::SettingsStore;
use crate::settings::Settings;

pub const ENABLE_FEATURE_CHECKBOX_ID: &str = "enableFeature";

/// Checked state of a checkbox nobody has touched
const NATIVE_DEFAULT: bool = false;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigState {
    Loading,
    Ready { checked: bool },
}

impl ConfigState {
    pub fn checked(&self) -> bool {
        match self {
            Self::Loading => NATIVE_DEFAULT,
            Self::Ready { checked } => *checked,
        }
    }
}

/// Owns the page's view of `enableFeature` for one page load.
pub struct OptionsController {
    store: Rc<dyn SettingsStore>,
    state: Cell<ConfigState>,
    // Bumped by every toggle; only the latest toggle may roll back
    generation: Cell<u64>,
}

impl OptionsController {
    pub fn new(store: Rc<dyn SettingsStore>) -> Self {
        Self {
            store,
            state: Cell::new(ConfigState::Loading),
            generation: Cell::new(0),
        }
    }

    pub fn state(&self) -> ConfigState {
        self.state.get()
    }

    pub fn checked(&self) -> bool {
        self.state.get().checked()
    }

    /// Read the stored value. Nothing is written, even when the key is absent.
    /// A failed read still leaves the page usable with the native default.
    /// A toggle that lands while the read is pending wins over the read.
    pub async fn load(&self) -> Result<bool> {
        let stored = Settings::new(self.store.as_ref()).enable_feature().await;

        let (checked, result) = match stored {
            Ok(value) => {
                let checked = value.unwrap_or(NATIVE_DEFAULT);
                (checked, Ok(checked))
            }
            Err(err) => (NATIVE_DEFAULT, Err(err)),
        };

        if self.state.get() != ConfigState::Loading {
            log::debug!("Options load superseded by a toggle");
            return result.map(|_| self.checked());
        }

        log::debug!("Options loaded: enableFeature={}", checked);
        self.state.set(ConfigState::Ready { checked });
        result
    }

    /// Apply a user toggle: exactly one write per call. A failed write rolls
    /// the state back to what it was before the toggle, unless a later toggle
    /// has been made since.
    pub async fn toggle(&self, checked: bool) -> Result<()> {
        let previous = self.state.get();
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(ConfigState::Ready { checked });

        if let Err(err) = Settings::new(self.store.as_ref())
            .set_enable_feature(checked)
            .await
        {
            if self.generation.get() == generation {
                self.state.set(previous);
            }
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::storage::MemoryStore;
    use crate::settings::ENABLE_FEATURE_KEY;
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Holds the next read and queued writes until their gate is released.
    /// A write gate carries whether that write succeeds.
    #[derive(Default)]
    struct GatedStore {
        inner: MemoryStore,
        read_gate: RefCell<Option<oneshot::Receiver<()>>>,
        write_gates: RefCell<VecDeque<(oneshot::Receiver<()>, bool)>>,
    }

    impl GatedStore {
        fn gate_read(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.read_gate.borrow_mut() = Some(rx);
            tx
        }

        fn gate_write(&self, succeeds: bool) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.write_gates.borrow_mut().push_back((rx, succeeds));
            tx
        }
    }

    #[async_trait(?Send)]
    impl SettingsStore for GatedStore {
        async fn get(&self, key: &str) -> Result<Option<Value>> {
            let gate = self.read_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> Result<()> {
            let gate = self.write_gates.borrow_mut().pop_front();
            if let Some((gate, succeeds)) = gate {
                let _ = gate.await;
                if !succeeds {
                    return Err(Error::Storage("write rejected".into()));
                }
            }
            self.inner.set(key, value).await
        }
    }

    fn controller() -> (Rc<MemoryStore>, OptionsController) {
        let store = Rc::new(MemoryStore::new());
        let controller = OptionsController::new(store.clone());
        (store, controller)
    }

    #[test]
    fn starts_loading_and_unchecked() {
        let (_, ctrl) = controller();
        assert_eq!(ctrl.state(), ConfigState::Loading);
        assert!(!ctrl.checked());
    }

    #[test]
    fn load_reflects_stored_false() {
        let (store, ctrl) = controller();
        block_on(store.set(ENABLE_FEATURE_KEY, json!(false))).unwrap();

        assert!(!block_on(ctrl.load()).unwrap());
        assert_eq!(ctrl.state(), ConfigState::Ready { checked: false });
    }

    #[test]
    fn load_reflects_stored_true() {
        let (store, ctrl) = controller();
        block_on(store.set(ENABLE_FEATURE_KEY, json!(true))).unwrap();

        assert!(block_on(ctrl.load()).unwrap());
        assert!(ctrl.checked());
    }

    #[test]
    fn load_with_absent_value_keeps_default_and_does_not_write() {
        let (store, ctrl) = controller();

        assert!(!block_on(ctrl.load()).unwrap());
        assert_eq!(ctrl.state(), ConfigState::Ready { checked: false });
        assert_eq!(store.writes(), 0);
        assert_eq!(store.peek(ENABLE_FEATURE_KEY), None);
    }

    #[test]
    fn failed_load_falls_back_to_default() {
        let (store, ctrl) = controller();
        store.set_unavailable(true);

        assert!(block_on(ctrl.load()).is_err());
        assert_eq!(ctrl.state(), ConfigState::Ready { checked: false });
    }

    #[test]
    fn every_toggle_writes_once() {
        let (store, ctrl) = controller();
        block_on(ctrl.load()).unwrap();

        block_on(ctrl.toggle(true)).unwrap();
        block_on(ctrl.toggle(false)).unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(store.peek(ENABLE_FEATURE_KEY), Some(json!(false)));
        assert_eq!(ctrl.state(), ConfigState::Ready { checked: false });
    }

    #[test]
    fn failed_write_rolls_back() {
        let (store, ctrl) = controller();
        block_on(store.set(ENABLE_FEATURE_KEY, json!(true))).unwrap();
        block_on(ctrl.load()).unwrap();

        store.set_unavailable(true);
        assert!(block_on(ctrl.toggle(false)).is_err());
        assert_eq!(ctrl.state(), ConfigState::Ready { checked: true });

        store.set_unavailable(false);
        assert_eq!(store.peek(ENABLE_FEATURE_KEY), Some(json!(true)));
    }

    #[test]
    fn toggle_during_pending_load_is_kept() {
        let store = Rc::new(GatedStore::default());
        block_on(store.inner.set(ENABLE_FEATURE_KEY, json!(false))).unwrap();
        let release_read = store.gate_read();
        let ctrl = OptionsController::new(store.clone());

        block_on(async {
            let toggle_then_release = async {
                ctrl.toggle(true).await.unwrap();
                release_read.send(()).unwrap();
            };
            let (loaded, ()) = futures::join!(ctrl.load(), toggle_then_release);
            assert!(loaded.unwrap());
        });

        assert_eq!(ctrl.state(), ConfigState::Ready { checked: true });
        assert_eq!(store.inner.peek(ENABLE_FEATURE_KEY), Some(json!(true)));
    }

    #[test]
    fn failed_toggle_does_not_undo_a_later_one() {
        let store = Rc::new(GatedStore::default());
        let ctrl = OptionsController::new(store.clone());
        block_on(ctrl.load()).unwrap();

        let release_first = store.gate_write(false);
        let release_second = store.gate_write(true);

        block_on(async {
            let releases = async {
                release_second.send(()).unwrap();
                release_first.send(()).unwrap();
            };
            let (first, second, ()) =
                futures::join!(ctrl.toggle(true), ctrl.toggle(true), releases);
            assert!(first.is_err());
            assert!(second.is_ok());
        });

        assert_eq!(ctrl.state(), ConfigState::Ready { checked: true });
        assert_eq!(store.inner.peek(ENABLE_FEATURE_KEY), Some(json!(true)));
    }

    #[test]
    fn failed_latest_toggle_rolls_back() {
        let store = Rc::new(GatedStore::default());
        let ctrl = OptionsController::new(store.clone());
        block_on(ctrl.load()).unwrap();

        let release = store.gate_write(false);
        release.send(()).unwrap();
        assert!(block_on(ctrl.toggle(true)).is_err());

        assert_eq!(ctrl.state(), ConfigState::Ready { checked: false });
        assert_eq!(store.inner.writes(), 0);
    }
}
