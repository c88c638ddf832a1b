use cf_core::CaseFileError;
use std::fmt::Display;
use std::io::Write;

fn map_error(code: &'static str, error: impl Display) -> CaseFileError {
    CaseFileError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: CaseFileError) -> i32 {
    let mut stdout = std::io::stdout();
    write_error(&mut stdout, &error);
    1
}

pub(crate) fn write_error(writer: &mut dyn Write, error: &CaseFileError) {
    let message = serde_json::to_string(&error.message).unwrap_or_else(|_| "\"\"".to_string());
    let _ = writeln!(writer, "RESULT:ERROR");
    let _ = writeln!(writer, "ERROR_CODE:{}", error.code);
    let _ = writeln!(writer, "ERROR_MSG_JSON:{}", message);
}

pub(crate) fn map_tui_io(error: std::io::Error) -> CaseFileError {
    map_error("TUI_IO", error)
}

pub(crate) fn map_agent_io(error: std::io::Error) -> CaseFileError {
    map_error("CLI_AGENT_IO", error)
}

pub(crate) fn map_cli_case_path(error: std::io::Error) -> CaseFileError {
    map_error("CLI_CASE_PATH", error)
}

pub(crate) fn map_cli_case_read(error: std::io::Error) -> CaseFileError {
    map_error("CLI_CASE_READ", error)
}

pub(crate) fn map_cli_case_scan(error: walkdir::Error) -> CaseFileError {
    map_error("CLI_CASE_SCAN", error)
}

pub(crate) fn map_case_invalid(error: serde_json::Error) -> CaseFileError {
    map_error("STORY_CASE_INVALID", error)
}

pub(crate) fn map_cli_config_read(error: std::io::Error) -> CaseFileError {
    map_error("CLI_CONFIG_READ", error)
}

pub(crate) fn map_cli_config_invalid(error: toml::de::Error) -> CaseFileError {
    map_error("CLI_CONFIG_INVALID", error)
}
