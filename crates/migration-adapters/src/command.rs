//! Subprocesos locales.
//!
//! Los comandos se pasan a `sh -c` tal cual (con pipes y redirecciones). Un
//! código de salida distinto de cero se convierte en `StepActionError` con el
//! código y el stderr capturado.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};
use migration_core::StepActionError;

#[derive(Debug, Clone)]
pub struct LocalCommand {
    script: String,
    input: Option<String>,
    cwd: Option<PathBuf>,
}

impl LocalCommand {
    pub fn shell(script: impl Into<String>) -> Self {
        Self { script: script.into(),
               input: None,
               cwd: None }
    }

    /// Texto enviado por stdin (el pipe se cierra después).
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Ejecuta y devuelve stdout.
    pub fn run(&self) -> Result<String, StepActionError> {
        info!("running: {}", self.script);
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
           .arg(&self.script)
           .stdin(if self.input.is_some() { Stdio::piped() } else { Stdio::null() })
           .stdout(Stdio::piped())
           .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        let mut child = cmd.spawn()
                           .map_err(|e| StepActionError::new(format!("could not start `{}`: {e}", self.script)))?;
        // El hijo se espera siempre, aunque falle la escritura de stdin.
        let mut write_error = None;
        if let (Some(input), Some(mut stdin)) = (&self.input, child.stdin.take()) {
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                if e.kind() == ErrorKind::BrokenPipe {
                    debug!("`{}` closed stdin before reading all input", self.script);
                }
                write_error = Some(e);
            }
        }
        let output = child.wait_with_output()
                          .map_err(|e| StepActionError::new(format!("could not wait for `{}`: {e}", self.script)))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(StepActionError::command(format!("command `{}` failed", self.script),
                                                output.status.code(),
                                                stderr));
        }
        if let Some(e) = write_error {
            return Err(StepActionError::command(format!("could not write stdin of `{}`: {e}", self.script),
                                                None,
                                                stderr));
        }
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim_end());
        }
        Ok(stdout)
    }
}

/// Comillas simples de shell si hace falta.
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
               && arg.chars()
                     .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | ':' | '=' | '+' | ','));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = LocalCommand::shell("echo hello").run().unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn feeds_stdin() {
        let out = LocalCommand::shell("cat").input("Dump -s -T -C /tmp/x").run().unwrap();
        assert_eq!(out, "Dump -s -T -C /tmp/x");
    }

    #[test]
    fn non_zero_exit_carries_code_and_stderr() {
        let err = LocalCommand::shell("echo boom >&2; exit 3").run().unwrap_err();
        assert_eq!(err.exit_code, Some(3));
        assert_eq!(err.stderr.as_deref().map(str::trim), Some("boom"));
    }

    #[test]
    fn early_exit_reports_child_status_not_stdin_error() {
        let err = LocalCommand::shell("exit 7").input("x").run().unwrap_err();
        assert_eq!(err.exit_code, Some(7));

        // Entrada mayor que el buffer del pipe: la escritura falla con BrokenPipe.
        let big = "Dump -s -T -C /tmp/dump\n".repeat(64 * 1024);
        let err = LocalCommand::shell("echo 'tace: not found' >&2; exit 127").input(big).run().unwrap_err();
        assert_eq!(err.exit_code, Some(127));
        assert_eq!(err.stderr.as_deref().map(str::trim), Some("tace: not found"));
        assert!(err.message.contains("failed"));
    }

    #[test]
    fn unread_input_with_clean_exit_is_an_error() {
        let big = "x".repeat(1024 * 1024);
        let err = LocalCommand::shell("exit 0").input(big).run().unwrap_err();
        assert!(err.message.contains("could not write stdin"));
        assert_eq!(err.exit_code, None);
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = LocalCommand::shell("pwd").current_dir(dir.path()).run().unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(std::path::PathBuf::from(out.trim()).canonicalize().unwrap(), expected);
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("/data/ws/acedb-dump"), "/data/ws/acedb-dump");
        assert_eq!(quote("a b"), "'a b'");
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
    }
}
