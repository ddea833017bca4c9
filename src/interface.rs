//! Serial port wrapper to support platform-specific functionality, and the
//! [Transport] contract shared with the raw-USB backing in
//! [`crate::usb_transport`].

use std::time::Duration;

use crate::error::Error;

/// Desired level of the modem-control lines a [Transport] exposes.
///
/// `None` leaves the corresponding line untouched: a caller that only wants
/// to drop DTR must not cause RTS to flip, so every backing implementation
/// has to treat unset fields as "leave as-is" rather than "set low".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub dtr: Option<bool>,
    pub rts: Option<bool>,
    pub brk: Option<bool>,
}

/// USB vendor/product identifiers of the adapter behind a [Transport], when
/// known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportInfo {
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

/// Common contract every byte-stream backing to a target device must
/// satisfy, whether it's a serial port handed to us by the OS or a raw USB
/// bulk endpoint we drive by hand.
///
/// The trait never interprets the bytes flowing over it; SLIP framing and
/// command semantics live above this layer.
pub trait Transport {
    /// Read until either `buf` is filled, `timeout` elapses, or (if given) a
    /// `stop` predicate evaluated on the bytes read so far returns `true`.
    /// Returns the number of bytes actually read; callers distinguish a
    /// short read from a filled buffer by comparing against `buf.len()`.
    fn read_exact_until(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
        stop: Option<&dyn Fn(&[u8]) -> bool>,
    ) -> Result<usize, Error>;

    /// Write every byte of `data`, blocking until the backing accepts it.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Apply only the signal levels present in `signals`; absent fields
    /// preserve whatever the line was previously set to.
    fn set_signals(&mut self, signals: Signals) -> Result<(), Error>;

    /// Renegotiate the line speed without closing the underlying handle.
    fn set_baud(&mut self, baud: u32) -> Result<(), Error>;

    /// Discard any bytes the backing has buffered but not yet delivered.
    fn clear_input(&mut self) -> Result<(), Error>;

    /// VID/PID of the adapter, when the backing can report one.
    fn info(&self) -> TransportInfo;

    /// Release the underlying handle. Implementations that hold no resource
    /// beyond what `Drop` already reclaims may no-op.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(feature = "serialport")]
use std::io::Read;
#[cfg(all(feature = "serialport", unix))]
use std::os::fd::{AsRawFd, RawFd};

#[cfg(feature = "serialport")]
use miette::{Context, Result};
#[cfg(feature = "serialport")]
use serialport::{FlowControl, SerialPort, SerialPortInfo};

#[cfg(all(feature = "serialport", unix))]
pub type Port = serialport::TTYPort;
#[cfg(all(feature = "serialport", windows))]
pub type Port = serialport::COMPort;

/// Wrapper around SerialPort where platform-specific modifications can be
/// implemented.
#[cfg(feature = "serialport")]
pub struct Interface {
    /// Hardware serial port used for communication
    pub serial_port: Port,
}

/// Open a serial port
#[cfg(feature = "serialport")]
fn open_port(port_info: &SerialPortInfo) -> Result<Port> {
    serialport::new(&port_info.port_name, 115_200)
        .flow_control(FlowControl::None)
        .open_native()
        .map_err(Error::from)
        .wrap_err_with(|| format!("Failed to open serial port {}", port_info.port_name))
}

#[cfg(feature = "serialport")]
impl Interface {
    pub fn new(port_info: &SerialPortInfo) -> Result<Self> {
        Ok(Self {
            serial_port: open_port(port_info)?,
        })
    }

    /// Set the level of the DTR pin
    pub fn write_data_terminal_ready(&mut self, pin_state: bool) -> serialport::Result<()> {
        self.serial_port.write_data_terminal_ready(pin_state)
    }

    /// Set the level of the RTS pin
    pub fn write_request_to_send(&mut self, pin_state: bool) -> serialport::Result<()> {
        self.serial_port.write_request_to_send(pin_state)
    }

    /// Turn an [Interface] into a [SerialPort]
    pub fn into_serial(self) -> Box<dyn SerialPort> {
        Box::new(self.serial_port)
    }

    /// Turn an [Interface] into a `&`[SerialPort]
    pub fn serial_port(&self) -> &dyn SerialPort {
        &self.serial_port
    }

    /// Turn an [Interface] into a  `&mut `[SerialPort]
    pub fn serial_port_mut(&mut self) -> &mut dyn SerialPort {
        &mut self.serial_port
    }
}

// Note(dbuga): this `impl` is necessary because using `dyn SerialPort` as `dyn
// Read` requires trait_upcasting which isn't stable yet.
#[cfg(feature = "serialport")]
impl Read for Interface {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.serial_port.read(buf)
    }
}

#[cfg(all(feature = "serialport", unix))]
impl AsRawFd for Interface {
    fn as_raw_fd(&self) -> RawFd {
        self.serial_port.as_raw_fd()
    }
}

#[cfg(feature = "serialport")]
impl Transport for Interface {
    fn read_exact_until(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
        stop: Option<&dyn Fn(&[u8]) -> bool>,
    ) -> Result<usize, Error> {
        self.serial_port.set_timeout(timeout).map_err(Error::from)?;

        let mut read = 0;
        while read < buf.len() {
            match self.serial_port.read(&mut buf[read..read + 1]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(Error::from(std::io::Error::from(e))),
            }
            if let Some(stop) = stop {
                if stop(&buf[..read]) {
                    break;
                }
            }
        }

        Ok(read)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        self.serial_port
            .write_all(data)
            .map_err(|e| Error::from(std::io::Error::from(e)))
    }

    fn set_signals(&mut self, signals: Signals) -> Result<(), Error> {
        if let Some(dtr) = signals.dtr {
            self.serial_port
                .write_data_terminal_ready(dtr)
                .map_err(Error::from)?;
        }
        if let Some(rts) = signals.rts {
            self.serial_port
                .write_request_to_send(rts)
                .map_err(Error::from)?;
        }
        if let Some(brk) = signals.brk {
            if brk {
                self.serial_port.set_break().map_err(Error::from)?;
            } else {
                self.serial_port.clear_break().map_err(Error::from)?;
            }
        }
        Ok(())
    }

    fn set_baud(&mut self, baud: u32) -> Result<(), Error> {
        self.serial_port.set_baud_rate(baud).map_err(Error::from)
    }

    fn clear_input(&mut self) -> Result<(), Error> {
        self.serial_port
            .clear(serialport::ClearBuffer::Input)
            .map_err(Error::from)
    }

    fn info(&self) -> TransportInfo {
        // The OS serial stack doesn't surface VID/PID once a port is open;
        // callers that need it read it from `SerialPortInfo` at enumeration
        // time, before constructing this `Interface`.
        TransportInfo::default()
    }
}
