//! Acknowledgment line parser
//!
//! Parses firmware acknowledgment lines of the shape
//! `ok [N<digits> ]P<digits> B<digits>` into structured records. The `N`
//! field echoes the acknowledged line number, `P` reports free planner
//! buffer slots, and `B` reports free command buffer slots.
//!
//! Parsing is pure and infallible: a line that does not match the grammar
//! is classified, never rejected with an error.

use serde::{Deserialize, Serialize};

/// Fields extracted from an advanced acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedAck {
    /// Acknowledged line number, when the firmware echoes one.
    ///
    /// Absent means the acknowledgment carries no sequencing information;
    /// accounting and triggering must skip it.
    pub line_number: Option<u32>,
    /// Planner buffer slots reported free.
    pub planner_buffer_avail: u16,
    /// Command buffer slots reported free.
    pub command_buffer_avail: u16,
}

/// Classification of a received response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAck {
    /// The line is not an acknowledgment at all (status report, resend
    /// request, echo, ...).
    NotAnAck,
    /// A plain `ok` with no usable buffer fields.
    Plain,
    /// An `ok` carrying planner/command buffer availability.
    Advanced(AdvancedAck),
}

/// Acknowledgment line parser
pub struct AckParser;

impl AckParser {
    /// Parse a raw response line.
    ///
    /// Field letters are case-sensitive and whitespace-delimited; the `ok`
    /// token must open the line. Unrecognised tokens after `ok` are
    /// ignored, so firmware variants that append extra fields still parse.
    pub fn parse(line: &str) -> ParsedAck {
        let mut tokens = line.split_ascii_whitespace();

        if tokens.next() != Some("ok") {
            return ParsedAck::NotAnAck;
        }

        let mut line_number: Option<u32> = None;
        let mut planner_avail: Option<u16> = None;
        let mut command_avail: Option<u16> = None;

        for token in tokens {
            if let Some(digits) = token.strip_prefix('N') {
                line_number = digits.parse().ok().or(line_number);
            } else if let Some(digits) = token.strip_prefix('P') {
                planner_avail = digits.parse().ok().or(planner_avail);
            } else if let Some(digits) = token.strip_prefix('B') {
                command_avail = digits.parse().ok().or(command_avail);
            }
        }

        match (planner_avail, command_avail) {
            (Some(planner_buffer_avail), Some(command_buffer_avail)) => {
                ParsedAck::Advanced(AdvancedAck {
                    line_number,
                    planner_buffer_avail,
                    command_buffer_avail,
                })
            }
            // An ok without both buffer fields carries nothing to act on.
            _ => ParsedAck::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calibration_line() {
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
    fn test_parse_plain_ok() {
        assert_eq!(AckParser::parse("ok"), ParsedAck::Plain);
        assert_eq!(AckParser::parse("  ok  "), ParsedAck::Plain);
    }

    #[test]
    fn test_parse_advanced_without_line_number() {
        assert_eq!(
            AckParser::parse("ok P4 B9"),
            ParsedAck::Advanced(AdvancedAck {
                line_number: None,
                planner_buffer_avail: 4,
                command_buffer_avail: 9,
            })
        );
    }

    #[test]
    fn test_parse_non_acknowledgments() {
        assert_eq!(AckParser::parse("Resend:5"), ParsedAck::NotAnAck);
        assert_eq!(AckParser::parse("echo:busy: processing"), ParsedAck::NotAnAck);
        assert_eq!(AckParser::parse("T:210.0 /210.0"), ParsedAck::NotAnAck);
        assert_eq!(AckParser::parse(""), ParsedAck::NotAnAck);
        // `ok` must be its own token
        assert_eq!(AckParser::parse("okay"), ParsedAck::NotAnAck);
    }

    #[test]
    fn test_field_letters_are_case_sensitive() {
        assert_eq!(AckParser::parse("ok n5 p7 b15"), ParsedAck::Plain);
    }

    #[test]
    fn test_partial_fields_degrade_to_plain() {
        assert_eq!(AckParser::parse("ok N12"), ParsedAck::Plain);
        assert_eq!(AckParser::parse("ok P7"), ParsedAck::Plain);
        assert_eq!(AckParser::parse("ok B15"), ParsedAck::Plain);
    }

    #[test]
    fn test_unrecognised_tokens_are_ignored() {
        assert_eq!(
            AckParser::parse("ok N42 P7 B15 C0"),
            ParsedAck::Advanced(AdvancedAck {
                line_number: Some(42),
                planner_buffer_avail: 7,
                command_buffer_avail: 15,
            })
        );
    }

    #[test]
    fn test_malformed_digits_do_not_count() {
        // Nx is not a number; the ok still parses but carries no sequence
        assert_eq!(
            AckParser::parse("ok Nx P7 B15"),
            ParsedAck::Advanced(AdvancedAck {
                line_number: None,
                planner_buffer_avail: 7,
                command_buffer_avail: 15,
            })
        );
    }
}
