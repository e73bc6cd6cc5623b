pub mod escpos;

use crate::app::Result;
use crate::render::{Justification, PrintDirective};

pub use escpos::EscPosPrinter;

/// An opened receipt printer. Implementations translate each operation into
/// whatever the device understands.
pub trait PrinterPort {
    fn set_justification(&mut self, justification: Justification) -> Result<()>;
    fn set_underline(&mut self, on: bool) -> Result<()>;
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn write_line(&mut self, text: &str) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Replay a rendered directive sequence onto a port.
pub fn dispatch(port: &mut (dyn PrinterPort + Send), directives: &[PrintDirective]) -> Result<()> {
    for directive in directives {
        match directive {
            PrintDirective::Justify(justification) => port.set_justification(*justification)?,
            PrintDirective::Underline(on) => port.set_underline(*on)?,
            PrintDirective::WriteRaw(bytes) => port.write(bytes)?,
            PrintDirective::WriteLine(text) => port.write_line(text)?,
        }
    }
    Ok(())
}
