//! Cropper lifecycle: load, interact, then exactly one terminal outcome.
//!
//! A [`Cropper`] is created when the crop view opens and dropped when it
//! closes. It owns the scroll lock for its whole life and reports back to the
//! host through [`CropperHost`]: either `on_crop_complete` with the encoded
//! result or `on_cancel`, never both and never twice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CropperConfig;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::export::{export_region, ExportError};
use crate::geometry::{GeometryError, ImageDimensions};
use crate::interaction::{CropEngine, PointerEvent, ScrollLock, ScrollLockGuard};

/// Callbacks the host provides.
pub trait CropperHost {
    /// The user confirmed; `data_uri` is a `data:image/jpeg;base64,` string.
    fn on_crop_complete(&mut self, data_uri: String);

    /// The user dismissed the cropper.
    fn on_cancel(&mut self);
}

/// Errors surfaced by the cropper lifecycle.
#[derive(Debug, Error, PartialEq)]
pub enum CropperError {
    /// A terminal outcome has already been reported.
    #[error("Cropper is already closed")]
    Closed,

    /// The image bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The display measurement cannot carry a region.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The crop could not be extracted or encoded.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What the cropper currently shows.
#[derive(Debug)]
pub enum ImageState {
    /// Nothing loaded yet.
    Pending,
    /// The image could not be used; no handles are shown.
    Failed(String),
    Ready {
        source: DecodedImage,
        engine: CropEngine,
    },
}

/// How the cropper ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Cancelled,
}

pub struct Cropper<H: CropperHost, L: ScrollLock> {
    host: H,
    config: CropperConfig,
    image: ImageState,
    outcome: Option<Outcome>,
    scroll: ScrollLockGuard<L>,
}

impl<H: CropperHost, L: ScrollLock> Cropper<H, L> {
    /// Open a cropper. The scroll lock is taken immediately and held until a
    /// terminal outcome or drop.
    pub fn new(host: H, scroll_lock: L, config: CropperConfig) -> Self {
        Self {
            host,
            config: config.validated(),
            image: ImageState::Pending,
            outcome: None,
            scroll: ScrollLockGuard::acquire(scroll_lock),
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_closed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll.is_held()
    }

    /// Decode `bytes` and show them at the given display size.
    ///
    /// On failure the cropper drops to [`ImageState::Failed`] and hides its
    /// handles; a later successful load recovers.
    pub fn load_image(
        &mut self,
        bytes: &[u8],
        display_width: f64,
        display_height: f64,
    ) -> Result<(), CropperError> {
        self.ensure_open()?;
        match decode_image(bytes) {
            Ok(source) => self.load_decoded(source, display_width, display_height),
            Err(err) => {
                self.image = ImageState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Show an already decoded image. Its size is the natural size.
    pub fn load_decoded(
        &mut self,
        source: DecodedImage,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), CropperError> {
        self.ensure_open()?;
        if source.is_empty() {
            self.image = ImageState::Failed(DecodeError::EmptyImage.to_string());
            return Err(DecodeError::EmptyImage.into());
        }

        match ImageDimensions::new(display_width, display_height, source.width, source.height) {
            Ok(dims) => {
                let engine = CropEngine::new(dims, &self.config);
                tracing::debug!(
                    natural_width = source.width,
                    natural_height = source.height,
                    display_width,
                    display_height,
                    "cropper image ready"
                );
                self.image = ImageState::Ready { source, engine };
                Ok(())
            }
            Err(err) => {
                self.image = ImageState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Handles are drawn only for a usable image on an open cropper.
    pub fn handles_visible(&self) -> bool {
        !self.is_closed() && matches!(self.image, ImageState::Ready { .. })
    }

    pub fn engine(&self) -> Option<&CropEngine> {
        match &self.image {
            ImageState::Ready { engine, .. } => Some(engine),
            _ => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut CropEngine> {
        if self.is_closed() {
            return None;
        }
        match &mut self.image {
            ImageState::Ready { engine, .. } => Some(engine),
            _ => None,
        }
    }

    /// Forward a pointer event. Events with nothing to act on are dropped.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        self.engine_mut()
            .map(|engine| engine.handle_event(event))
            .unwrap_or(false)
    }

    /// Follow a layout change of the displayed image.
    pub fn relayout(
        &mut self,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), CropperError> {
        match self.engine_mut() {
            Some(engine) => Ok(engine.relayout(display_width, display_height)?),
            None => Ok(()),
        }
    }

    /// Encode the committed region without reporting anything to the host.
    ///
    /// Safe to call repeatedly; a failure changes no state.
    pub fn export(&self) -> Result<String, CropperError> {
        let ImageState::Ready { source, engine } = &self.image else {
            return Err(ExportError::MissingSource.into());
        };
        let cropped = export_region(
            source,
            engine.committed_region(),
            engine.dimensions(),
            &self.config,
        )?;
        Ok(cropped.to_data_uri(self.config.jpeg_quality)?)
    }

    /// Export and report the result through `on_crop_complete`.
    ///
    /// A failed export leaves the cropper open so the user can retry.
    pub fn confirm(&mut self) -> Result<(), CropperError> {
        self.ensure_open()?;
        let data_uri = self.export().inspect_err(|err| {
            tracing::warn!(%err, "crop export failed");
        })?;

        self.finish(Outcome::Completed);
        self.host.on_crop_complete(data_uri);
        Ok(())
    }

    /// Discard the selection and report `on_cancel`.
    ///
    /// Returns `false` if a terminal outcome was already reported.
    pub fn cancel(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.image = ImageState::Pending;
        self.finish(Outcome::Cancelled);
        self.host.on_cancel();
        true
    }

    fn ensure_open(&self) -> Result<(), CropperError> {
        if self.is_closed() {
            Err(CropperError::Closed)
        } else {
            Ok(())
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.scroll.release();
        tracing::debug!(?outcome, "cropper closed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use image::{Rgb, RgbImage};

    use super::*;
    use crate::decode::fixtures::png_bytes;
    use crate::geometry::{CropShape, Edge, Point};
    use crate::interaction::testing::RecordingLock;
    use crate::interaction::{Handle, PointerInput};

    #[derive(Debug, Clone, PartialEq)]
    enum HostEvent {
        Complete(String),
        Cancel,
    }

    #[derive(Default, Clone)]
    struct RecordingHost {
        events: Rc<RefCell<Vec<HostEvent>>>,
    }

    impl CropperHost for RecordingHost {
        fn on_crop_complete(&mut self, data_uri: String) {
            self.events.borrow_mut().push(HostEvent::Complete(data_uri));
        }

        fn on_cancel(&mut self) {
            self.events.borrow_mut().push(HostEvent::Cancel);
        }
    }

    fn source(width: u32, height: u32) -> DecodedImage {
        DecodedImage::from_rgb_image(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 90])
        }))
    }

    type TestCropper = Cropper<RecordingHost, RecordingLock>;

    fn open(config: CropperConfig) -> (TestCropper, RecordingHost, RecordingLock) {
        let host = RecordingHost::default();
        let lock = RecordingLock::default();
        let cropper = Cropper::new(host.clone(), lock.clone(), config);
        (cropper, host, lock)
    }

    fn down(handle: Handle, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            handle,
            input: PointerInput::new(x, y),
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move(PointerInput::new(x, y))
    }

    #[test]
    fn test_scroll_locked_while_open() {
        let (cropper, _, lock) = open(CropperConfig::new());
        assert!(cropper.is_scroll_locked());
        assert_eq!(*lock.log.borrow(), vec!["lock"]);
        drop(cropper);
        assert_eq!(*lock.log.borrow(), vec!["lock", "unlock"]);
    }

    #[test]
    fn test_no_handles_before_load() {
        let (mut cropper, _, _) = open(CropperConfig::new());
        assert!(!cropper.handles_visible());
        assert!(cropper.engine().is_none());
        assert!(!cropper.handle_event(down(Handle::Corner(0), 0.0, 0.0)));
        assert_eq!(
            cropper.export(),
            Err(CropperError::Export(ExportError::MissingSource))
        );
    }

    #[test]
    fn test_load_image_bytes() {
        let (mut cropper, _, _) = open(CropperConfig::new());
        cropper.load_image(&png_bytes(64, 48), 32.0, 24.0).unwrap();
        assert!(cropper.handles_visible());

        let dims = cropper.engine().unwrap().dimensions();
        assert_eq!((dims.natural_width, dims.natural_height), (64, 48));
    }

    #[test]
    fn test_undecodable_image_falls_back() {
        let (mut cropper, host, _) = open(CropperConfig::new());
        let err = cropper.load_image(b"not an image", 400.0, 300.0).unwrap_err();
        assert_eq!(err, CropperError::Decode(DecodeError::InvalidFormat));
        assert!(matches!(cropper.image_state(), ImageState::Failed(_)));
        assert!(!cropper.handles_visible());

        // A valid image afterwards recovers
        cropper.load_decoded(source(80, 60), 80.0, 60.0).unwrap();
        assert!(cropper.handles_visible());
        assert!(host.events.borrow().is_empty());
    }

    #[test]
    fn test_zero_display_size_falls_back() {
        let (mut cropper, _, _) = open(CropperConfig::new());
        let err = cropper.load_decoded(source(80, 60), 0.0, 60.0).unwrap_err();
        assert!(matches!(err, CropperError::Geometry(_)));
        assert!(!cropper.handles_visible());
    }

    #[test]
    fn test_confirm_reports_once() {
        let (mut cropper, host, lock) = open(CropperConfig::with_shape(CropShape::Rect));
        cropper.load_decoded(source(800, 600), 400.0, 300.0).unwrap();

        cropper.confirm().unwrap();
        assert_eq!(cropper.outcome(), Some(Outcome::Completed));
        assert!(!cropper.is_scroll_locked());
        assert_eq!(*lock.log.borrow(), vec!["lock", "unlock"]);

        assert_eq!(cropper.confirm(), Err(CropperError::Closed));
        assert!(!cropper.cancel());

        let events = host.events.borrow();
        assert_eq!(events.len(), 1);
        match &events[0] {
            HostEvent::Complete(uri) => assert!(uri.starts_with("data:image/jpeg;base64,")),
            HostEvent::Cancel => panic!("expected completion"),
        }
    }

    #[test]
    fn test_confirmed_output_size() {
        let (mut cropper, host, _) = open(CropperConfig::with_shape(CropShape::Rect));
        cropper.load_decoded(source(800, 600), 400.0, 300.0).unwrap();
        cropper.confirm().unwrap();

        let events = host.events.borrow();
        let HostEvent::Complete(uri) = &events[0] else {
            panic!("expected completion");
        };
        let payload = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
        use base64::Engine as _;
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        // Initial 80% rectangle of an 800x600 image
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn test_cancel_mid_drag() {
        let (mut cropper, host, lock) = open(CropperConfig::new());
        cropper.load_decoded(source(800, 600), 400.0, 300.0).unwrap();

        assert!(cropper.handle_event(down(Handle::Corner(0), 100.0, 100.0)));
        assert!(cropper.handle_event(moved(140.0, 130.0)));
        assert!(cropper.cancel());

        // The release arriving after cancel is ignored
        assert!(!cropper.handle_event(PointerEvent::Up));
        assert_eq!(cropper.confirm(), Err(CropperError::Closed));
        assert!(!cropper.cancel());

        assert_eq!(*host.events.borrow(), vec![HostEvent::Cancel]);
        assert_eq!(cropper.outcome(), Some(Outcome::Cancelled));
        assert!(!cropper.handles_visible());
        assert_eq!(*lock.log.borrow(), vec!["lock", "unlock"]);
    }

    #[test]
    fn test_failed_confirm_stays_open() {
        let (mut cropper, host, _) = open(CropperConfig::new());
        assert_eq!(
            cropper.confirm(),
            Err(CropperError::Export(ExportError::MissingSource))
        );
        assert!(!cropper.is_closed());
        assert!(cropper.is_scroll_locked());
        assert!(host.events.borrow().is_empty());

        cropper.load_decoded(source(100, 100), 100.0, 100.0).unwrap();
        cropper.confirm().unwrap();
        assert_eq!(host.events.borrow().len(), 1);
    }

    #[test]
    fn test_export_uses_committed_region() {
        let (mut cropper, _, _) = open(CropperConfig::with_shape(CropShape::Rect));
        cropper.load_decoded(source(800, 600), 400.0, 300.0).unwrap();
        let before = cropper.export().unwrap();

        cropper.handle_event(down(Handle::Edge(Edge::Right), 0.0, 0.0));
        cropper.handle_event(moved(-100.0, 0.0));
        // Still dragging: the committed region is unchanged
        assert_eq!(cropper.export().unwrap(), before);

        cropper.handle_event(PointerEvent::Up);
        assert_ne!(cropper.export().unwrap(), before);
    }

    #[test]
    fn test_relayout_forwards_to_engine() {
        let (mut cropper, _, _) = open(CropperConfig::new());
        cropper.load_decoded(source(800, 600), 400.0, 300.0).unwrap();
        cropper.relayout(200.0, 150.0).unwrap();

        let engine = cropper.engine().unwrap();
        assert_eq!(engine.dimensions().display_width, 200.0);
        assert_eq!(engine.region().corners()[2], Point::new(190.0, 140.0));
    }

    #[test]
    fn test_load_after_close_rejected() {
        let (mut cropper, _, _) = open(CropperConfig::new());
        cropper.cancel();
        assert_eq!(
            cropper.load_decoded(source(10, 10), 10.0, 10.0),
            Err(CropperError::Closed)
        );
    }
}
