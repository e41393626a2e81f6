use domain::CommandStream;
use std::fmt::Write;

use super::wrap::Font;

/// Appends ZPL commands in order. Each field placement is closed with `^FS`
/// before the next one starts.
pub struct ZplBuilder {
    buffer: String,
}

impl ZplBuilder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn start_label(mut self, width: u32, length: u32) -> Self {
        // ^XA start, ^MMT tear-off mode, ^PW print width, ^LL label length, ^LS label shift
        let _ = write!(
            self.buffer,
            "^XA\n^MMT\n^PW{width}\n^LL{length}\n^LS0\n\n"
        );
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        let _ = writeln!(self.buffer, "REM *** {text} ***");
        self
    }

    pub fn text_field(mut self, x: u32, y: u32, font: Font, text: &str) -> Self {
        // ^FO origin, ^A0N scalable font, ^FD data, ^FS field separator
        let _ = write!(
            self.buffer,
            "^FO{x},{y}^A0N,{},{}^FD{text}^FS\n\n",
            font.height, font.width
        );
        self
    }

    pub fn qr_code(mut self, x: u32, y: u32, magnification: u32, payload: &str) -> Self {
        // ^BQN,2: QR model 2. "QA," = error correction Q, automatic input mode
        let _ = write!(
            self.buffer,
            "^FO{x},{y}^BQN,2,{magnification}^FDQA,{payload}^FS\n\n"
        );
        self
    }

    pub fn end_label(mut self) -> Self {
        self.buffer.push_str("^XZ");
        self
    }

    pub fn build(self) -> CommandStream {
        CommandStream::new(self.buffer)
    }
}

impl Default for ZplBuilder {
    fn default() -> Self {
        Self::new()
    }
}
