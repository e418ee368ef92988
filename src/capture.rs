use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::navigation::{Navigator, Screen};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraPermission {
    /// The permission prompt has not resolved yet.
    Undetermined,
    Denied,
    Granted,
}

/// What the scan tab shows for a given permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanTabView {
    Loading,
    PermissionRequired,
    Ready,
}

impl From<CameraPermission> for ScanTabView {
    fn from(permission: CameraPermission) -> Self {
        match permission {
            CameraPermission::Undetermined => ScanTabView::Loading,
            CameraPermission::Denied => ScanTabView::PermissionRequired,
            CameraPermission::Granted => ScanTabView::Ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedImage {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

/// A camera able to take one still picture on demand.
pub trait CaptureDevice {
    fn take_picture(&mut self) -> impl Future<Output = Result<CapturedImage>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Navigated(CapturedImage),
    /// The camera is not mounted yet; the press is ignored.
    NoDevice,
    /// The device failed. Logged only; the user has to press again.
    Failed(String),
}

/// Shutter press on the scan tab: take a picture, then open the results.
///
/// The picture itself is not analysed; success is only a signal to proceed.
pub async fn capture<D: CaptureDevice>(
    device: Option<&mut D>,
    navigator: &dyn Navigator,
) -> CaptureOutcome {
    let Some(device) = device else {
        return CaptureOutcome::NoDevice;
    };

    match device.take_picture().await {
        Ok(image) => {
            log_info!(
                "captured {}x{} still at {}",
                image.width,
                image.height,
                image.uri
            );
            navigator.navigate(Screen::NutritionResults);
            CaptureOutcome::Navigated(image)
        }
        Err(err) => {
            log_error!("Failed to take picture: {err:?}");
            CaptureOutcome::Failed(err.to_string())
        }
    }
}
