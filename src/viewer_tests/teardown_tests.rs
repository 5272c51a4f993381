use std::sync::atomic::AtomicBool;

use super::fakes::{DeviceCalls, FakeDevice, FakeSurface, TEST_RESOLUTION, test_config};
use crate::{
    error::{CaptureError, DisplayError, ErrorStack, ViewerError},
    lifecycle::CaptureSession,
    viewer::{ExitReason, run_capture},
};

fn torn_down_once() -> DeviceCalls {
    DeviceCalls {
        enable: 1,
        start: 1,
        stop: 1,
        disable: 1,
        polls: 0,
    }
}

#[test]
fn test_window_close_tears_down_once() {
    let (device, calls) = FakeDevice::new();
    let quit = AtomicBool::new(false);

    let result = run_capture(
        device,
        &test_config(),
        |_| Ok(FakeSurface::new(TEST_RESOLUTION, 3).0),
        &quit,
    );
    assert_eq!(result.unwrap(), ExitReason::WindowClosed);
    assert_eq!(
        *calls.lock().unwrap(),
        DeviceCalls {
            polls: 3,
            ..torn_down_once()
        }
    );
}

#[test]
fn test_interrupt_tears_down_once() {
    let (device, calls) = FakeDevice::new();
    let quit = AtomicBool::new(true);

    let result = run_capture(
        device,
        &test_config(),
        |_| Ok(FakeSurface::new(TEST_RESOLUTION, usize::MAX).0),
        &quit,
    );
    assert_eq!(result.unwrap(), ExitReason::Interrupted);
    assert_eq!(*calls.lock().unwrap(), torn_down_once());
}

#[test]
fn test_start_failure_tears_down_once() {
    let (device, calls) = FakeDevice::new();
    let device = device.failing_start();
    let quit = AtomicBool::new(false);
    let mut surface_opened = false;

    let result = run_capture(
        device,
        &test_config(),
        |_| {
            surface_opened = true;
            Ok(FakeSurface::new(TEST_RESOLUTION, 0).0)
        },
        &quit,
    );
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ViewerError::Capture(CaptureError::StartStreams(_))
    ));
    assert!(
        ErrorStack::new(&err)
            .into_string()
            .starts_with("Failed to start video stream.")
    );
    assert!(!surface_opened);
    assert_eq!(*calls.lock().unwrap(), torn_down_once());
}

#[test]
fn test_enable_failure_releases_nothing() {
    let (device, calls) = FakeDevice::new();
    let device = device.failing_enable();
    let quit = AtomicBool::new(false);

    let result = run_capture(
        device,
        &test_config(),
        |_| Ok(FakeSurface::new(TEST_RESOLUTION, 0).0),
        &quit,
    );
    assert!(matches!(
        result,
        Err(ViewerError::Capture(CaptureError::EnableInput(_)))
    ));
    assert_eq!(
        *calls.lock().unwrap(),
        DeviceCalls {
            enable: 1,
            ..Default::default()
        }
    );
}

#[test]
fn test_display_failure_tears_down_once() {
    let (device, calls) = FakeDevice::new();
    let quit = AtomicBool::new(false);

    let result = run_capture::<_, FakeSurface, _>(
        device,
        &test_config(),
        |_| {
            Err(DisplayError::CreateWindow(minifb::Error::WindowCreate(
                "no display".to_string(),
            )))
        },
        &quit,
    );
    assert!(matches!(
        result,
        Err(ViewerError::Display(DisplayError::CreateWindow(_)))
    ));
    assert_eq!(*calls.lock().unwrap(), torn_down_once());
}

#[test]
fn test_explicit_stop_then_drop() {
    let (device, calls) = FakeDevice::new();
    let mut session = CaptureSession::start(device, &test_config().capture).unwrap();
    session.stop();
    session.stop();
    drop(session);
    assert_eq!(*calls.lock().unwrap(), torn_down_once());
}
