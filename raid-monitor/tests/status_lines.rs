use raid_monitor::{MonitorError, ParseError, evaluate, parse_status_line};
use raid_types::HealthVerdict;

fn verdict(line: &str) -> HealthVerdict {
    let record = parse_status_line(line, "vg/lv").unwrap();
    evaluate(&record, "vg/lv").unwrap()
}

fn parse_error(line: &str) -> ParseError {
    match parse_status_line(line, "vg/lv") {
        Err(MonitorError::Parse { source, .. }) => source,
        other => panic!("expected parse error for {line:?}, got {other:?}"),
    }
}

#[test]
fn failure_is_reported_at_first_dead_device() {
    assert_eq!(verdict("raid1 2 AD 1024/2048"), HealthVerdict::NeedsRepair { index: 1 });
    assert_eq!(verdict("raid10 6 aAaDDD 1/2"), HealthVerdict::NeedsRepair { index: 3 });
    assert_eq!(verdict("raid1 3 AD 1/1"), HealthVerdict::NeedsRepair { index: 1 });
}

#[test]
fn short_healthy_string_is_out_of_bounds() {
    let record = parse_status_line("raid1 3 AA 1/1", "vg/lv").unwrap();
    assert!(matches!(
        evaluate(&record, "vg/lv"),
        Err(MonitorError::HealthBounds {
            expected: 3,
            found: 2,
            ..
        })
    ));
}

#[test]
fn sync_state_follows_literal_ratio_text() {
    assert_eq!(verdict("raid1 2 AA 2048/2048"), HealthVerdict::InSync(true));
    assert_eq!(verdict("raid1 2 AA 1000/2048"), HealthVerdict::InSync(false));
    assert_eq!(verdict("raid1 2 AA 04/4"), HealthVerdict::InSync(false));
}

#[test]
fn parse_errors_match_examples() {
    assert!(matches!(parse_error("raid1 abc AA 10/10"), ParseError::BadCount { .. }));
    assert!(matches!(
        parse_error("raid1 2 AA 20481024"),
        ParseError::MissingSeparator { .. }
    ));
    assert!(matches!(
        parse_error("raid1  2\tAA 1/1 extra"),
        ParseError::TokenCount { found: 5 }
    ));
}

#[test]
fn whitespace_between_fields_is_flexible() {
    let record = parse_status_line("  raid4\t3   AAa  7/9 ", "vg/lv").unwrap();
    assert_eq!(record.raid_type, "raid4");
    assert_eq!(record.device_count, 3);
    assert_eq!(record.health, "AAa");
}
