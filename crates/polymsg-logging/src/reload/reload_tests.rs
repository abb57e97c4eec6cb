#![allow(non_snake_case)]

use super::*;
use tracing_subscriber::prelude::*;

fn installed() -> (ReloadHandle, impl tracing::Subscriber) {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    let subscriber = tracing_subscriber::registry().with(filter);
    let reload_handle = ReloadHandle::new();
    reload_handle.set_handle(handle);
    (reload_handle, subscriber)
}

#[test]
fn ReloadHandle___new___not_initialized() {
    let handle = ReloadHandle::new();

    assert!(!handle.is_initialized());
    assert_eq!(handle.current_level(), None);
}

#[test]
fn ReloadHandle___reload_without_handle___not_initialized_error() {
    let handle = ReloadHandle::default();

    let result = handle.reload_level(LogLevel::Debug);

    assert_eq!(result, Err(LoggingError::NotInitialized));
}

#[test]
fn ReloadHandle___reload_level___updates_current_filter() {
    let (handle, _subscriber) = installed();

    handle.reload_level(LogLevel::Warn).unwrap();

    assert!(handle.is_initialized());
    assert_eq!(handle.current_level(), Some(LevelFilter::WARN));
}

#[test]
fn ReloadHandle___reload_to_off___filter_off() {
    let (handle, _subscriber) = installed();

    handle.reload_level(LogLevel::Off).unwrap();

    assert_eq!(handle.current_level(), Some(LevelFilter::OFF));
}

#[test]
fn ReloadHandle___subscriber_dropped___reload_fails() {
    let (handle, subscriber) = installed();
    drop(subscriber);

    let result = handle.reload_level(LogLevel::Debug);

    assert!(matches!(result, Err(LoggingError::Reload(_))));
}

#[test]
fn ReloadHandle___global___same_instance() {
    let first = ReloadHandle::global() as *const ReloadHandle;
    let second = ReloadHandle::global() as *const ReloadHandle;

    assert_eq!(first, second);
}
