//! Typed accessor tests.

use std::time::Duration;

use chrono::{TimeZone, Utc};

use crate::error::CastError;
use crate::registry::DotEnv;

fn registry_with(pairs: &[(&str, &str)]) -> DotEnv {
    let env = DotEnv::new();
    for (key, value) in pairs {
        env.set(key, *value);
    }
    env
}

#[test]
fn test_scalar_accessors_parse_strings() {
    let env = registry_with(&[
        ("ENVREG_ACC_NAME", "service"),
        ("ENVREG_ACC_DEBUG", "true"),
        ("ENVREG_ACC_RETRIES", "-3"),
        ("ENVREG_ACC_WORKERS", "16"),
        ("ENVREG_ACC_RATIO", "0.75"),
        ("ENVREG_ACC_MASK", "0x1F"),
    ]);

    assert_eq!(env.get_string("ENVREG_ACC_NAME"), "service");
    assert!(env.get_bool("ENVREG_ACC_DEBUG"));
    assert_eq!(env.get_int("ENVREG_ACC_RETRIES"), -3);
    assert_eq!(env.get_i32("ENVREG_ACC_RETRIES"), -3);
    assert_eq!(env.get_uint("ENVREG_ACC_WORKERS"), 16);
    assert_eq!(env.get_u32("ENVREG_ACC_WORKERS"), 16);
    assert_eq!(env.get_f64("ENVREG_ACC_RATIO"), 0.75);
    assert_eq!(env.get_int("ENVREG_ACC_MASK"), 31);
}

#[test]
fn test_typed_values_set_programmatically() {
    let env = DotEnv::new();
    env.set("ENVREG_TYPED_INT", 42_i64);
    env.set("ENVREG_TYPED_BOOL", false);
    env.set("ENVREG_TYPED_TIMEOUT", Duration::from_millis(1500));
    env.set("ENVREG_TYPED_LIST", vec!["a", "b"]);

    assert_eq!(env.get_int("ENVREG_TYPED_INT"), 42);
    assert_eq!(env.get_string("ENVREG_TYPED_INT"), "42");
    assert!(!env.get_bool("ENVREG_TYPED_BOOL"));
    assert_eq!(
        env.get_duration("ENVREG_TYPED_TIMEOUT"),
        Duration::from_millis(1500)
    );
    assert_eq!(env.get_string("ENVREG_TYPED_TIMEOUT"), "1.5s");
    assert_eq!(env.get_string_slice("ENVREG_TYPED_LIST"), vec!["a", "b"]);
}

#[test]
fn test_duration_and_time_accessors() {
    let env = registry_with(&[
        ("ENVREG_ACC_TIMEOUT", "1h30m"),
        ("ENVREG_ACC_NANOS", "250"),
        ("ENVREG_ACC_STARTED", "2024-03-01T12:30:00Z"),
    ]);

    assert_eq!(
        env.get_duration("ENVREG_ACC_TIMEOUT"),
        Duration::from_secs(90 * 60)
    );
    assert_eq!(env.get_duration("ENVREG_ACC_NANOS"), Duration::from_nanos(250));
    assert_eq!(
        env.get_time("ENVREG_ACC_STARTED"),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    );
}

#[test]
fn test_slice_accessors_strip_brackets_and_trim() {
    let env = registry_with(&[
        ("ENVREG_ACC_PORTS", "[80, 443 ,8080]"),
        ("ENVREG_ACC_HOSTS", "a.example, b.example"),
        ("ENVREG_ACC_NONE", ""),
    ]);

    assert_eq!(env.get_int_slice("ENVREG_ACC_PORTS"), vec![80, 443, 8080]);
    assert_eq!(
        env.get_string_slice("ENVREG_ACC_HOSTS"),
        vec!["a.example", "b.example"]
    );
    assert!(env.get_string_slice("ENVREG_ACC_NONE").is_empty());
}

#[test]
fn test_size_in_bytes_accessor() {
    let env = registry_with(&[
        ("ENVREG_ACC_CACHE", "12 MB"),
        ("ENVREG_ACC_LIMIT", "1gb"),
        ("ENVREG_ACC_RAW", "512"),
        ("ENVREG_ACC_JUNK", "lots"),
    ]);

    assert_eq!(env.get_size_in_bytes("ENVREG_ACC_CACHE"), 12 * 1024 * 1024);
    assert_eq!(env.get_size_in_bytes("ENVREG_ACC_LIMIT"), 1 << 30);
    assert_eq!(env.get_size_in_bytes("ENVREG_ACC_RAW"), 512);
    assert_eq!(env.get_size_in_bytes("ENVREG_ACC_JUNK"), 0);
}

#[test]
fn test_lenient_accessors_fall_back_to_zero() {
    let env = registry_with(&[
        ("ENVREG_ACC_BAD_INT", "twelve"),
        ("ENVREG_ACC_BIG", "5000000000"),
        ("ENVREG_ACC_BAD_DURATION", "soon"),
    ]);

    assert_eq!(env.get_int("ENVREG_ACC_BAD_INT"), 0);
    assert_eq!(env.get_i32("ENVREG_ACC_BIG"), 0);
    assert_eq!(env.get_int("ENVREG_ACC_BIG"), 5_000_000_000);
    assert_eq!(env.get_duration("ENVREG_ACC_BAD_DURATION"), Duration::ZERO);
    assert!(!env.get_bool("ENVREG_ACC_MISSING"));
    assert!(env.get_int_slice("ENVREG_ACC_MISSING").is_empty());
}

#[test]
fn test_try_get_reports_cast_failures() {
    let env = registry_with(&[("ENVREG_TRY_PORT", "http"), ("ENVREG_TRY_OK", "7")]);

    assert!(matches!(
        env.try_get::<u16>("ENVREG_TRY_PORT"),
        Err(CastError::Invalid { .. })
    ));
    assert_eq!(env.try_get::<u16>("ENVREG_TRY_OK"), Ok(Some(7)));
    assert_eq!(env.try_get::<u16>("ENVREG_TRY_MISSING"), Ok(None));
}
