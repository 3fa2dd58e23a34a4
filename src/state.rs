use crate::config::CurveSettings;
use crate::notify::Notifier;
use crate::store::AlarmStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<AlarmStore>>,
    pub notifier: Arc<dyn Notifier>,
    pub curves: CurveSettings,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        store: AlarmStore,
        notifier: Arc<dyn Notifier>,
        curves: CurveSettings,
    ) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            notifier,
            curves,
        }
    }
}
