//! Motion Context - Process-wide owner of the pipeline
//!
//! Lifecycle: `init` loads the active profile and the configured backend,
//! `reload_profile` / `reload_backend` swap them on request, `shutdown`
//! releases everything. Nothing here is global state.

use std::sync::Arc;

use super::action::{ActionMapper, InputInjector, Profile, ProfileHandle, ProfileStore, ProfileWatcher};
use super::clock::Clock;
use super::config::{BackendConfig, MotionConfig};
use super::error::{MotionError, MotionResult};
use super::model::{MatchingBackend, TemplateMatcher, UnavailableBackend};
use super::pipeline::{MotionPipeline, PipelineStatus};
use super::recording::{PersistenceHandle, RecordingStore};

pub struct MotionContext {
    config: MotionConfig,
    pipeline: MotionPipeline,
    profiles: ProfileStore,
    watcher: Option<ProfileWatcher>,
}

impl MotionContext {
    pub fn init(
        config: MotionConfig,
        injector: Arc<dyn InputInjector>,
        clock: Arc<dyn Clock>,
    ) -> MotionResult<Self> {
        config.validate()?;

        let profiles = ProfileStore::new(config.paths.profiles_dir());
        let profile = load_or_empty(&profiles, &config.paths.active_profile)?;

        let backend = build_backend(&config).unwrap_or_else(|e| {
            log::warn!("Starting without a matching backend: {}", e);
            Box::new(UnavailableBackend::new(e.to_string()))
        });

        let mapper = ActionMapper::new(ProfileHandle::new(profile), injector);
        let pipeline = MotionPipeline::new(&config, backend, mapper, clock)?;

        log::info!(
            "Motion context ready (profile '{}', data dir {:?})",
            config.paths.active_profile,
            config.paths.data_dir
        );

        Ok(Self {
            config,
            pipeline,
            profiles,
            watcher: None,
        })
    }

    pub fn with_persistence(mut self, handle: PersistenceHandle) -> Self {
        self.pipeline = self.pipeline.with_persistence(handle);
        self
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &MotionPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut MotionPipeline {
        &mut self.pipeline
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Hot-reload the active profile file on change
    pub fn watch_profile(&mut self) -> MotionResult<()> {
        let path = self.profiles.path_for(&self.config.paths.active_profile);
        self.watcher = Some(ProfileWatcher::start(path, self.pipeline.profile_handle())?);
        Ok(())
    }

    /// Load `name` (or re-read the active profile) and swap it in.
    /// Nothing changes unless the profile loads and, when watching, the
    /// watcher moves to the new file.
    pub fn reload_profile(&mut self, name: Option<&str>) -> MotionResult<Arc<Profile>> {
        let name = name.unwrap_or(&self.config.paths.active_profile).to_string();
        let profile = self.profiles.load(&name)?;

        let switching = name != self.config.paths.active_profile;
        if switching && self.watcher.is_some() {
            let path = self.profiles.path_for(&name);
            self.watcher = Some(ProfileWatcher::start(path, self.pipeline.profile_handle())?);
        }

        let previous = self.pipeline.reload_profile(profile);
        if switching {
            self.config.paths.active_profile = name;
        }
        Ok(previous)
    }

    /// Rebuild the configured backend. On failure the current one stays.
    pub fn reload_backend(&mut self) -> MotionResult<()> {
        let backend = build_backend(&self.config)?;
        self.pipeline.replace_backend(backend);
        Ok(())
    }

    pub fn status(&self) -> PipelineStatus {
        self.pipeline.status()
    }

    /// Stop watching, abort any recording, and report final counters
    pub fn shutdown(mut self) -> PipelineStatus {
        self.watcher = None;
        if self.pipeline.recording_session().is_some() {
            if let Err(e) = self.pipeline.cancel_recording() {
                log::warn!("Recording not stopped cleanly: {}", e);
            }
        }

        let status = self.pipeline.status();
        log::info!(
            "Motion context shut down: {} frames, {} rejected, {} triggers",
            status.frames_processed,
            status.frames_rejected,
            status.triggers
        );
        status
    }
}

fn load_or_empty(profiles: &ProfileStore, name: &str) -> MotionResult<Profile> {
    match profiles.load(name) {
        Ok(profile) => Ok(profile),
        Err(MotionError::ProfileNotFound(path)) => {
            log::warn!("Profile {:?} not found, starting with no mappings", path);
            Ok(Profile::new(name))
        }
        Err(e) => Err(e),
    }
}

/// Construct the backend selected in the configuration
pub fn build_backend(config: &MotionConfig) -> MotionResult<Box<dyn MatchingBackend>> {
    let target = config.recognition.target_frame_count;

    match &config.backend {
        BackendConfig::Template { templates_dir, distance_scale } => {
            let dir = templates_dir
                .clone()
                .unwrap_or_else(|| config.paths.recordings_dir());
            let recordings = RecordingStore::new(dir).load_all()?;
            let matcher = TemplateMatcher::from_recordings(&recordings, target, *distance_scale)?;
            Ok(Box::new(matcher))
        }
        #[cfg(feature = "onnx")]
        BackendConfig::Onnx { model_path, labels, apply_softmax } => {
            let classifier = super::model::OnnxClassifier::load(model_path, labels.clone(), *apply_softmax)
                .map_err(|e| MotionError::MatchingBackendUnavailable(e.0))?;
            Ok(Box::new(classifier))
        }
        #[cfg(not(feature = "onnx"))]
        BackendConfig::Onnx { .. } => Err(MotionError::MatchingBackendUnavailable(
            "built without the `onnx` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::action::{ActionDescriptor, LoggingInjector};
    use crate::logic::clock::ManualClock;
    use crate::logic::recording::RecordedGesture;
    use crate::logic::sequence::resample;
    use crate::logic::testing::{normalized, wave_stream};
    use std::path::PathBuf;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn config_in(dir: &std::path::Path) -> MotionConfig {
        let mut config = MotionConfig::default();
        config.paths.data_dir = dir.to_path_buf();
        config
    }

    fn init(config: MotionConfig) -> MotionContext {
        MotionContext::init(config, Arc::new(LoggingInjector), Arc::new(ManualClock::new(0))).unwrap()
    }

    #[test]
    fn test_init_without_data_succeeds() {
        let dir = tempdir().unwrap();
        let ctx = init(config_in(dir.path()));

        let status = ctx.status();
        assert_eq!(status.active_profile, "default");
        assert_eq!(status.engine.backend, "template");
        assert!(ctx.pipeline().engine().backend_labels().is_empty());
    }

    #[test]
    fn test_missing_onnx_model_starts_unavailable() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.backend = BackendConfig::Onnx {
            model_path: PathBuf::from("/nonexistent/model.onnx"),
            labels: vec!["wave".into()],
            apply_softmax: true,
        };

        let mut ctx = init(config);
        assert_eq!(ctx.status().engine.backend, "unavailable");
        assert!(ctx.reload_backend().is_err());
        assert_eq!(ctx.status().engine.backend, "unavailable");
    }

    #[test]
    fn test_templates_loaded_from_recordings() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        let seq = resample(&normalized(&wave_stream(45, 0, 33)), 60).unwrap();
        let recording = RecordedGesture::new("wave", 60, vec![seq], Uuid::new_v4());
        RecordingStore::new(config.paths.recordings_dir()).save(&recording).unwrap();

        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.labels(), vec!["wave"]);
    }

    #[test]
    fn test_reload_backend_picks_up_new_recordings() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let mut ctx = init(config.clone());
        assert!(ctx.pipeline().engine().backend_labels().is_empty());

        let seq = resample(&normalized(&wave_stream(45, 0, 33)), 60).unwrap();
        let recording = RecordedGesture::new("pinch", 60, vec![seq], Uuid::new_v4());
        RecordingStore::new(config.paths.recordings_dir()).save(&recording).unwrap();

        ctx.reload_backend().unwrap();
        assert_eq!(ctx.pipeline().engine().backend_labels(), vec!["pinch"]);
    }

    #[test]
    fn test_reload_profile_by_name() {
        let dir = tempdir().unwrap();
        let mut ctx = init(config_in(dir.path()));

        let gaming = Profile::new("gaming").with_mapping("fist", ActionDescriptor::Char('w'));
        ctx.profiles().save(&gaming).unwrap();

        let previous = ctx.reload_profile(Some("gaming")).unwrap();
        assert_eq!(previous.name, "default");
        assert_eq!(ctx.status().active_profile, "gaming");
        assert_eq!(ctx.config().paths.active_profile, "gaming");

        assert!(matches!(ctx.reload_profile(Some("missing")), Err(MotionError::ProfileNotFound(_))));
        assert_eq!(ctx.status().active_profile, "gaming");
    }

    #[test]
    fn test_reload_profile_moves_watcher() {
        let dir = tempdir().unwrap();
        let mut ctx = init(config_in(dir.path()));
        ctx.profiles().save(&Profile::new("default")).unwrap();
        ctx.profiles().save(&Profile::new("media")).unwrap();
        ctx.watch_profile().unwrap();

        let watched = |ctx: &MotionContext| ctx.watcher.as_ref().map(|w| w.path().to_path_buf());
        assert_eq!(watched(&ctx), Some(ctx.profiles().path_for("default")));

        // failed load: profile, config and watcher untouched
        assert!(ctx.reload_profile(Some("missing")).is_err());
        assert_eq!(ctx.config().paths.active_profile, "default");
        assert_eq!(watched(&ctx), Some(ctx.profiles().path_for("default")));

        ctx.reload_profile(Some("media")).unwrap();
        assert_eq!(ctx.status().active_profile, "media");
        assert_eq!(watched(&ctx), Some(ctx.profiles().path_for("media")));
    }

    #[test]
    fn test_shutdown_cancels_recording() {
        let dir = tempdir().unwrap();
        let mut ctx = init(config_in(dir.path()));
        ctx.pipeline_mut().start_recording("wave").unwrap();

        let status = ctx.shutdown();
        assert_eq!(status.mode, crate::logic::pipeline::PipelineMode::Recognition);
        assert!(status.recording_state.is_none());
    }
}
