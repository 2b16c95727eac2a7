use printflow_governor::protocol::ack::{AckParser, AdvancedAck, ParsedAck};
use proptest::prelude::*;

#[test]
fn test_parse_full_advanced_ack() {
    assert_eq!(
        AckParser::parse("ok N0 P7 B15"),
        ParsedAck::Advanced(AdvancedAck {
            line_number: Some(0),
            planner_buffer_avail: 7,
            command_buffer_avail: 15,
        })
    );
}

#[test]
fn test_parse_large_line_numbers() {
    assert_eq!(
        AckParser::parse("ok N123456 P3 B9"),
        ParsedAck::Advanced(AdvancedAck {
            line_number: Some(123_456),
            planner_buffer_avail: 3,
            command_buffer_avail: 9,
        })
    );
}

#[test]
fn test_parse_plain_ok() {
    assert_eq!(AckParser::parse("ok"), ParsedAck::Plain);
}

#[test]
fn test_parse_resend_request_is_not_an_ack() {
    assert_eq!(AckParser::parse("Resend:5"), ParsedAck::NotAnAck);
}

#[test]
fn test_parse_temperature_report_is_not_an_ack() {
    assert_eq!(AckParser::parse("T:209.8 /210.0 B:60.1 /60.0"), ParsedAck::NotAnAck);
}

#[test]
fn test_parse_trailing_whitespace() {
    assert_eq!(
        AckParser::parse("ok N7 P2 B4 \r"),
        ParsedAck::Advanced(AdvancedAck {
            line_number: Some(7),
            planner_buffer_avail: 2,
            command_buffer_avail: 4,
        })
    );
}

proptest! {
    #[test]
    fn parse_never_panics(line in "\\PC{0,120}") {
        let _ = AckParser::parse(&line);
    }

    #[test]
    fn well_formed_acks_parse_exactly(n in 0u32..1_000_000, p in 0u16..512, b in 0u16..512) {
        let rendered = format!("ok N{} P{} B{}", n, p, b);
        prop_assert_eq!(
            AckParser::parse(&rendered),
            ParsedAck::Advanced(AdvancedAck {
                line_number: Some(n),
                planner_buffer_avail: p,
                command_buffer_avail: b,
            })
        );
    }

    #[test]
    fn acks_without_buffer_fields_never_parse_as_advanced(n in 0u32..1_000_000) {
        let rendered = format!("ok N{}", n);
        prop_assert_eq!(AckParser::parse(&rendered), ParsedAck::Plain);
    }
}
