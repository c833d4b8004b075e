// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use seguro_defeso::{
    core::biometry::{
        BiometricError, BoundingBox, CameraSource, CameraStream, FaceDescriptor, FaceDetection,
        FaceDetector, Frame,
    },
    utils::{clock::FixedClock, config::Config},
    Application,
};
use tempfile::TempDir;

pub const FRAME_W: u32 = 640;
pub const FRAME_H: u32 = 480;

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// 128-float descriptor filled with `value`.
pub fn descriptor(value: f32) -> FaceDescriptor {
    FaceDescriptor::new(vec![value; 128]).unwrap()
}

/// Well framed face: 40% of the frame width, centered.
pub fn good_face(value: f32) -> FaceDetection {
    face_at(BoundingBox::new(192.0, 90.0, 256.0, 300.0), value)
}

/// Face too small to pass the gate.
pub fn distant_face(value: f32) -> FaceDetection {
    face_at(BoundingBox::new(300.0, 220.0, 40.0, 45.0), value)
}

pub fn face_at(bounding_box: BoundingBox, value: f32) -> FaceDetection {
    FaceDetection {
        bounding_box,
        landmarks: Vec::new(),
        descriptor: descriptor(value),
        score: 0.92,
    }
}

/// Detector that replays a script, one entry per frame, repeating the last
/// entry once the script runs out.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Option<FaceDetection>>>,
    last: Mutex<Option<FaceDetection>>,
    load_error: Option<BiometricError>,
    pub loads: AtomicUsize,
    pub frames_seen: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Option<FaceDetection>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            load_error: None,
            loads: AtomicUsize::new(0),
            frames_seen: AtomicUsize::new(0),
        }
    }

    pub fn always(detection: Option<FaceDetection>) -> Self {
        Self::new(vec![detection])
    }

    pub fn failing_load(error: BiometricError) -> Self {
        Self {
            load_error: Some(error),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl FaceDetector for ScriptedDetector {
    async fn load_models(&self) -> Result<(), BiometricError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.load_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn detect_faces(&self, _frame: &Frame) -> Result<Vec<FaceDetection>, BiometricError> {
        self.frames_seen.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        let detection = match next {
            Some(entry) => {
                *self.last.lock() = entry.clone();
                entry
            }
            None => self.last.lock().clone(),
        };
        Ok(detection.into_iter().collect())
    }
}

/// Front camera double that records whether its stream was stopped.
pub struct FakeCamera {
    pub opened: AtomicUsize,
    pub stopped: Arc<AtomicBool>,
    open_error: Option<BiometricError>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            opened: AtomicUsize::new(0),
            stopped: Arc::new(AtomicBool::new(false)),
            open_error: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            open_error: Some(BiometricError::PermissionDenied),
            ..Self::new()
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

struct FakeStream {
    stopped: Arc<AtomicBool>,
}

#[async_trait]
impl CameraStream for FakeStream {
    async fn next_frame(&mut self) -> Result<Frame, BiometricError> {
        Ok(Frame::new(FRAME_W, FRAME_H, vec![0; 16]))
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CameraSource for FakeCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, BiometricError> {
        if let Some(e) = &self.open_error {
            return Err(e.clone());
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            stopped: self.stopped.clone(),
        }))
    }
}

pub struct TestContext {
    pub app: Application,
    pub clock: Arc<FixedClock>,
    pub detector: Arc<ScriptedDetector>,
    pub dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_detector(ScriptedDetector::always(Some(good_face(0.1)))).await
    }

    pub async fn with_detector(detector: ScriptedDetector) -> Self {
        Self::build(detector, test_config).await
    }

    pub async fn build(detector: ScriptedDetector, configure: impl FnOnce(&TempDir) -> Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(at(2026, 10, 1)));
        let detector = Arc::new(detector);

        let app = Application::with_clock(configure(&dir), detector.clone(), clock.clone())
            .await
            .unwrap();

        Self {
            app,
            clock,
            detector,
            dir,
        }
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.path = dir.path().join("store.redb").to_string_lossy().into_owned();
    config.storage.encryption_key = "chave-de-teste".to_string();
    config.biometry.policy.required_streak = 5;
    config.biometry.capture_frame_budget = Some(200);
    config
}
