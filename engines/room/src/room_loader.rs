use std::{
    io,
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::Instant,
};

use anyhow::anyhow;
use lib_gltf_model::{load_model, Model};
use log::{debug, info};

/// Loads a room model on a background thread.
pub struct RoomLoader {
    path: PathBuf,
    receiver: Receiver<anyhow::Result<Model>>,
}

impl RoomLoader {
    /// Starts loading the model at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the loader thread cannot be spawned.
    pub fn spawn(path: PathBuf) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let thread_path = path.clone();

        thread::Builder::new()
            .name("room loader".into())
            .spawn(move || {
                info!("loading room from {}", thread_path.display());
                let start = Instant::now();
                let result = load_model(&thread_path);
                debug!("room loader finished after {:?}", start.elapsed());
                // nobody waits for the result if the game loop has already stopped
                let _ignored = sender.send(result);
            })?;

        Ok(Self { path, receiver })
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the loaded model (or the reason it failed) once it's ready.
    pub fn poll(&self) -> Option<anyhow::Result<Model>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!(
                "room loader for {} stopped without a result",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wait_for(loader: &RoomLoader) -> anyhow::Result<Model> {
        for _ in 0..500 {
            if let Some(result) = loader.poll() {
                return result;
            }
            thread::sleep(Duration::from_millis(10));
        }
        Err(anyhow!("loader timed out"))
    }

    #[test]
    fn missing_model_reports_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = RoomLoader::spawn(dir.path().join("missing.glb")).unwrap();

        let error = wait_for(&loader).unwrap_err();

        assert!(
            format!("{error:#}").contains("missing.glb"),
            "error names the file: {error:#}"
        );
    }
}
