use crate::reconcile::OutputLine;
use std::io::Write;

/// Append-only destination for freeze output.
pub trait LineSink {
    fn emit(&mut self, line: OutputLine) -> std::io::Result<()>;
}

impl LineSink for Vec<OutputLine> {
    fn emit(&mut self, line: OutputLine) -> std::io::Result<()> {
        self.push(line);
        Ok(())
    }
}

/// Writes each line, newline-terminated, to any `Write` as it is emitted.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for TextSink<W> {
    fn emit(&mut self, line: OutputLine) -> std::io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sink_terminates_lines() {
        let mut sink = TextSink::new(Vec::new());
        sink.emit(OutputLine::Passthrough("# header".to_owned()))
            .unwrap();
        sink.emit(OutputLine::FindLinks("http://dist/".to_owned()))
            .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "# header\n-f http://dist/\n");
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<OutputLine> = Vec::new();
        sink.emit(OutputLine::Passthrough(String::new())).unwrap();
        assert_eq!(sink.len(), 1);
    }
}
