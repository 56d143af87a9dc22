//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin (may span lines)
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }
    serde_json::from_str(input).map_err(|e| CliError::invalid_input(format!("Invalid JSON: {}", e)))
}

fn ok_envelope(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn error_envelope(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_envelope(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;

    #[test]
    fn test_parse_multiline_request() {
        let value = parse_request("{\n  \"name\": {}\n}\n").unwrap();
        assert!(value["name"].is_object());
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert_eq!(parse_request("  \n").unwrap_err().code(), &CliErrorCode::InvalidInput);
        assert_eq!(parse_request("{").unwrap_err().code(), &CliErrorCode::InvalidInput);
    }

    #[test]
    fn test_envelopes() {
        let ok = ok_envelope(serde_json::json!({"sql": ""}));
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["data"]["sql"], "");

        let err = error_envelope("ADMIN_RESOLUTION_FAILED", "missing");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "ADMIN_RESOLUTION_FAILED");
        assert_eq!(err["message"], "missing");
    }
}
