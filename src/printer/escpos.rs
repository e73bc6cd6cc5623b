//! ESC/POS byte encoding over a character device.
//!
//! The printer is expected on a write-only device node such as
//! `/dev/usb/lp0`. Opening resets the device and selects font A.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::app::Result;
use crate::printer::PrinterPort;
use crate::render::{transliterate, Justification};

const ESC: u8 = 0x1b;

pub struct EscPosPrinter<W: Write> {
    device: W,
}

impl EscPosPrinter<File> {
    /// Open the device node and reset the printer to a known state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let device = OpenOptions::new().write(true).open(path)?;
        Self::over(device)
    }
}

impl<W: Write> EscPosPrinter<W> {
    /// Wrap an already-open writer. Used directly in tests.
    pub fn over(device: W) -> Result<Self> {
        let mut printer = Self { device };
        printer.raw(&[ESC, b'@'])?; // initialize
        printer.raw(&[ESC, b'M', 0])?; // font A
        Ok(printer)
    }

    fn raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.device.write_all(bytes)?;
        Ok(())
    }
}

impl<W: Write + Send> PrinterPort for EscPosPrinter<W> {
    fn set_justification(&mut self, justification: Justification) -> Result<()> {
        let n = match justification {
            Justification::Left => 0,
            Justification::Right => 2,
        };
        self.raw(&[ESC, b'a', n])
    }

    fn set_underline(&mut self, on: bool) -> Result<()> {
        self.raw(&[ESC, b'-', on as u8])
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.raw(bytes)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.raw(&transliterate(text))?;
        self.raw(b"\n")
    }

    fn close(&mut self) -> Result<()> {
        self.device.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::dispatch;
    use crate::render::PrintDirective;

    fn bytes_of(printer: EscPosPrinter<Vec<u8>>) -> Vec<u8> {
        printer.device
    }

    #[test]
    fn opening_resets_and_selects_font_a() {
        let printer = EscPosPrinter::over(Vec::new()).unwrap();
        assert_eq!(bytes_of(printer), vec![ESC, b'@', ESC, b'M', 0]);
    }

    #[test]
    fn justification_encodes_esc_a() {
        let mut printer = EscPosPrinter::over(Vec::new()).unwrap();
        printer.set_justification(Justification::Right).unwrap();
        printer.set_justification(Justification::Left).unwrap();
        let bytes = bytes_of(printer);
        assert_eq!(&bytes[5..], &[ESC, b'a', 2, ESC, b'a', 0]);
    }

    #[test]
    fn underline_encodes_esc_dash() {
        let mut printer = EscPosPrinter::over(Vec::new()).unwrap();
        printer.set_underline(true).unwrap();
        printer.set_underline(false).unwrap();
        let bytes = bytes_of(printer);
        assert_eq!(&bytes[5..], &[ESC, b'-', 1, ESC, b'-', 0]);
    }

    #[test]
    fn write_line_appends_newline() {
        let mut printer = EscPosPrinter::over(Vec::new()).unwrap();
        printer.write_line("abc").unwrap();
        let bytes = bytes_of(printer);
        assert_eq!(&bytes[5..], b"abc\n");
    }

    #[test]
    fn dispatch_replays_directives_in_order() {
        let mut printer = EscPosPrinter::over(Vec::new()).unwrap();
        let directives = vec![
            PrintDirective::Justify(Justification::Left),
            PrintDirective::WriteRaw(b"hi".to_vec()),
            PrintDirective::WriteLine(String::new()),
        ];
        dispatch(&mut printer, &directives).unwrap();
        let bytes = bytes_of(printer);
        assert_eq!(&bytes[5..], &[ESC, b'a', 0, b'h', b'i', b'\n']);
    }
}
