//! Scenario file parsing.
//!
//! Lines look like `HH:MM:SS.ss>COMMAND TEXT`. Comment lines (`#`) and
//! lines too short to hold a timestamp are ignored. Malformed lines are
//! skipped one by one and reported as diagnostics.

use serde::{Deserialize, Serialize};

use super::timeline::ScheduledCommand;

/// Why one scenario line was skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineDiagnostic {
    /// 1-based line number in the file.
    pub line_number: usize,
    pub text: String,
    pub reason: String,
}

/// Result of parsing one scenario document.
#[derive(Debug, Clone, Default)]
pub struct ParsedScenario {
    pub commands: Vec<ScheduledCommand>,
    /// Comment and short lines.
    pub ignored: usize,
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Parse a scenario document, adding `time_offset` to every timestamp.
pub fn parse_scenario(content: &str, time_offset: f64, min_line_length: usize) -> ParsedScenario {
    let mut parsed = ParsedScenario::default();

    for (i, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.len() <= min_line_length || trimmed.starts_with('#') {
            parsed.ignored += 1;
            continue;
        }

        match parse_line(trimmed) {
            Ok((seconds, text)) => parsed
                .commands
                .push(ScheduledCommand::new(seconds + time_offset, text)),
            Err(reason) => parsed.diagnostics.push(LineDiagnostic {
                line_number: i + 1,
                text: trimmed.to_string(),
                reason,
            }),
        }
    }
    parsed
}

fn parse_line(line: &str) -> Result<(f64, &str), String> {
    let pos = line
        .find('>')
        .ok_or_else(|| "missing '>' after timestamp".to_string())?;
    let seconds = parse_timestamp(&line[..pos])?;
    let text = line[pos + 1..].trim();
    if text.is_empty() {
        return Err("no command after timestamp".into());
    }
    Ok((seconds, text))
}

/// Seconds from an `HH:MM:SS[.ss]` timestamp.
pub fn parse_timestamp(stamp: &str) -> Result<f64, String> {
    let parts: Vec<&str> = stamp.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(format!("timestamp '{}' is not HH:MM:SS", stamp.trim()));
    }
    let hours: u32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid hours '{}'", parts[0]))?;
    let minutes: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid minutes '{}'", parts[1]))?;
    let seconds: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| format!("invalid seconds '{}'", parts[2]))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid seconds '{}'", parts[2]));
    }
    Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("00:00:05.00").unwrap(), 5.0);
        assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
        assert_eq!(parse_timestamp(" 00:01:02.5 ").unwrap(), 62.5);
        assert!(parse_timestamp("00:05").is_err());
        assert!(parse_timestamp("aa:00:00").is_err());
        assert!(parse_timestamp("00:00:NaN").is_err());
        assert!(parse_timestamp("00:00:-4").is_err());
    }

    #[test]
    fn parses_commands_with_offset() {
        let doc = "00:00:00.00>CRE KL001,A320,52.0,4.5,090,10000,250\n\
                   00:00:05.00>ALT KL001,20000\n";
        let parsed = parse_scenario(doc, 100.0, 12);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.commands.len(), 2);
        assert_eq!(parsed.commands[0].trigger_time, 100.0);
        assert_eq!(parsed.commands[0].text, "CRE KL001,A320,52.0,4.5,090,10000,250");
        assert_eq!(parsed.commands[1].trigger_time, 105.0);
    }

    #[test]
    fn comments_and_short_lines_ignored() {
        let doc = "# a comment that is long enough\n\n00:00:01>OP\n00:00:02.00>HOLD\r\n";
        let parsed = parse_scenario(doc, 0.0, 12);
        // "00:00:01>OP" is 11 characters, too short to count.
        assert_eq!(parsed.ignored, 3);
        assert_eq!(parsed.commands.len(), 1);
        assert_eq!(parsed.commands[0].text, "HOLD");
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn malformed_lines_reported_and_skipped() {
        let doc = "this line has no delimiter\n\
                   00:xx:00.00>ECHO bad time\n\
                   00:00:03.00>ECHO good\n\
                   00:00:04.00:00>ECHO four parts\n";
        let parsed = parse_scenario(doc, 0.0, 12);
        assert_eq!(parsed.commands.len(), 1);
        assert_eq!(parsed.commands[0].text, "ECHO good");
        let lines: Vec<usize> = parsed.diagnostics.iter().map(|d| d.line_number).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert!(parsed.diagnostics[0].reason.contains('>'));
    }

    #[test]
    fn only_first_delimiter_splits() {
        let parsed = parse_scenario("00:00:00.00>ECHO a>b", 0.0, 12);
        assert_eq!(parsed.commands[0].text, "ECHO a>b");
    }
}
