use std::io::{self, Write};

/// Writes `text` to stdout as-is. A reader that closed the pipe early
/// (`levelup check rows.csv | head`) is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), text, false)
}

/// Like [`write_stdout_text`] with a trailing newline.
pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), text, true)
}

fn write_tolerating_closed_pipe<W: Write>(
    writer: &mut W,
    text: &str,
    newline: bool,
) -> io::Result<()> {
    let written = writer
        .write_all(text.as_bytes())
        .and_then(|()| {
            if newline {
                writer.write_all(b"\n")
            } else {
                Ok(())
            }
        })
        .and_then(|()| writer.flush());

    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::write_tolerating_closed_pipe;

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn appends_newline_on_request() {
        let mut buffer = Vec::new();
        assert!(write_tolerating_closed_pipe(&mut buffer, "rows", true).is_ok());
        assert_eq!(buffer, b"rows\n");
    }

    #[test]
    fn closed_pipe_is_not_an_error() {
        let mut writer = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(write_tolerating_closed_pipe(&mut writer, "rows", true).is_ok());
    }

    #[test]
    fn other_write_failures_surface() {
        let mut writer = FailingWriter(io::ErrorKind::PermissionDenied);
        assert!(write_tolerating_closed_pipe(&mut writer, "rows", false).is_err());
    }
}
