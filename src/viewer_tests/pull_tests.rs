use std::sync::atomic::AtomicBool;

use super::fakes::{
    FakeDevice, FakeSurface, SurfaceLog, TEST_RESOLUTION, WHITE, frame_error, test_config,
    uyvy_frame,
};
use crate::{
    frame::Resolution,
    lifecycle::{CaptureSession, ViewerState},
    viewer::{ExitReason, Ticker, run_pull_loop},
};

fn run(device: FakeDevice, ticks: usize) -> (ExitReason, SurfaceLog) {
    let config = test_config();
    let quit = AtomicBool::new(false);
    let mut session = CaptureSession::start(device, &config.capture).unwrap();
    let (mut surface, log) = FakeSurface::new(TEST_RESOLUTION, ticks);
    let mut ticker = Ticker::new(config.display.tick_interval());

    let reason = run_pull_loop(&mut session, &mut surface, &quit, &mut ticker).unwrap();
    let log = std::mem::take(&mut *log.lock().unwrap());
    (reason, log)
}

#[test]
fn test_displays_converted_frame() {
    let (device, _calls) = FakeDevice::new();
    let device = device.with_script([Ok(Some(uyvy_frame(TEST_RESOLUTION, 255)))]);

    let (reason, log) = run(device, 1);
    assert_eq!(reason, ExitReason::WindowClosed);
    assert_eq!(log.presented.len(), 1);
    assert!(log.presented[0].iter().all(|pixel| *pixel == WHITE));
    assert_eq!(log.pumps, 0);
}

#[test]
fn test_no_frame_keeps_previous_image() {
    let (device, calls) = FakeDevice::new();
    let device = device.with_script([
        Ok(Some(uyvy_frame(TEST_RESOLUTION, 255))),
        Ok(None),
        Ok(None),
    ]);

    let (reason, log) = run(device, 20);
    assert_eq!(reason, ExitReason::WindowClosed);
    assert_eq!(calls.lock().unwrap().polls, 20);
    assert_eq!(log.presented.len(), 1);
    assert_eq!(log.pumps, 19);
}

#[test]
fn test_malformed_frames_are_skipped() {
    let (device, _calls) = FakeDevice::new();
    let wrong_size = Resolution {
        width: 8,
        height: 2,
    };
    let mut odd_stride = uyvy_frame(TEST_RESOLUTION, 0);
    odd_stride.bytes_per_row = 2;
    let device = device.with_script([
        Ok(Some(uyvy_frame(wrong_size, 255))),
        Err(frame_error()),
        Ok(Some(odd_stride)),
        Ok(Some(uyvy_frame(TEST_RESOLUTION, 0))),
    ]);

    let (reason, log) = run(device, 4);
    assert_eq!(reason, ExitReason::WindowClosed);
    assert_eq!(log.presented.len(), 1);
    assert!(log.presented[0].iter().all(|pixel| *pixel == 0));
    assert_eq!(log.pumps, 3);
}

#[test]
fn test_latest_frame_replaces_displayed_image() {
    let (device, _calls) = FakeDevice::new();
    let device = device.with_script([
        Ok(Some(uyvy_frame(TEST_RESOLUTION, 255))),
        Ok(Some(uyvy_frame(TEST_RESOLUTION, 0))),
    ]);

    let (_, log) = run(device, 2);
    assert_eq!(log.presented.len(), 2);
    assert!(log.presented[0].iter().all(|pixel| *pixel == WHITE));
    assert!(log.presented[1].iter().all(|pixel| *pixel == 0));
}

#[test]
fn test_no_frames_after_stop() {
    let config = test_config();
    let (device, calls) = FakeDevice::new();
    let device = device.with_script([Ok(Some(uyvy_frame(TEST_RESOLUTION, 255)))]);
    let mut session = CaptureSession::start(device, &config.capture).unwrap();
    assert_eq!(session.state(), ViewerState::Running);

    session.stop();
    assert_eq!(session.state(), ViewerState::Stopped);
    assert!(session.poll_frame().unwrap().is_none());
    assert_eq!(calls.lock().unwrap().polls, 0);
}
