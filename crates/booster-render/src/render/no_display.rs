//! Stand-in display session for builds without the `display` feature.
//!
//! Headless painting never touches this module. An interactive painter built
//! without the feature fails on its first frame with
//! [`PaintError::DisplayInit`], the same way a missing window server would.

use std::convert::Infallible;

use image::RgbImage;

use crate::config::PainterConfig;
use crate::error::PaintError;

/// Uninhabited: a session can never be opened in this build.
pub(crate) struct DisplaySession {
    never: Infallible,
}

impl DisplaySession {
    pub(crate) fn new() -> Result<Self, PaintError> {
        Err(PaintError::DisplayInit(
            "booster-render was built without the `display` feature".to_owned(),
        ))
    }

    pub(crate) fn is_open(&self) -> bool {
        match self.never {}
    }

    pub(crate) fn open_window(&mut self, _config: &PainterConfig) -> Result<(), PaintError> {
        match self.never {}
    }

    pub(crate) fn present(&mut self, _frame: &RgbImage, _fps: u32) -> Result<(), PaintError> {
        match self.never {}
    }

    pub(crate) fn close_window(&mut self) {
        match self.never {}
    }
}
