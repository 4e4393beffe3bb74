use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

/// Emitted when the watched config file changes on disk; the host re-reads
/// the file and rebuilds its layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    Changed,
}

pub struct ConfigWatcher {
    file: PathBuf,
    reload_tx: Sender<ConfigEvent>,
    poll_interval: Duration,
}

impl ConfigWatcher {
    pub fn spawn(file: PathBuf, reload_tx: Sender<ConfigEvent>) {
        Self::spawn_with_interval(file, reload_tx, Duration::from_secs(1))
    }

    pub fn spawn_with_interval(
        file: PathBuf,
        reload_tx: Sender<ConfigEvent>,
        poll_interval: Duration,
    ) {
        thread::Builder::new()
            .name("config-watcher".to_string())
            .spawn(move || {
                let actor = ConfigWatcher {
                    file,
                    reload_tx,
                    poll_interval,
                };
                if let Err(e) = actor.run() {
                    warn!("config-watcher: error: {e:?}");
                }
            })
            .expect("failed to spawn config-watcher thread");
    }

    fn run(self) -> notify::Result<()> {
        let (tx, rx) = crossbeam_channel::unbounded::<notify::Result<Event>>();

        let mut watcher = PollWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            NotifyConfig::default()
                .with_poll_interval(self.poll_interval)
                .with_compare_contents(true),
        )?;

        watcher.watch(&self.file, RecursiveMode::NonRecursive)?;

        info!("watching {:?}", self.file);

        for res in rx {
            match res {
                Ok(event) => {
                    if self.is_relevant(&event) {
                        debug!("change detected: {:?}", event.kind);
                        if self.reload_tx.send(ConfigEvent::Changed).is_err() {
                            debug!("reload receiver dropped, exiting");
                            break;
                        }
                    } else {
                        debug!("ignoring unrelated event: {:?}", event.kind);
                    }
                }
                Err(e) => {
                    warn!("watch error: {e:?}");
                }
            }
        }

        Ok(())
    }

    fn is_relevant(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => event
                .paths
                .iter()
                .any(|p| p == &self.file || p.file_name() == self.file.file_name()),
            _ => false,
        }
    }
}
