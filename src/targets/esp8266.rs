use std::ops::Range;

#[cfg(feature = "serialport")]
use crate::connection::Connection;
use crate::{
    Error,
    flasher::FlashData,
    image_format::ImageFormat,
    targets::{Chip, ReadEFuse, SpiRegisters, Target, XtalFrequency, efuse},
};

pub(crate) const CHIP_DETECT_MAGIC_VALUES: &[u32] = &[0xfff0_c101];

/// The ESP8266 ROM predates the chip-id register at 0x40001000 used by later
/// families as a fallback to magic-value detection, so this value is never
/// read off hardware. It exists only so `Chip::id()` has something to return.
pub(crate) const CHIP_ID: u16 = 0xffff;

#[allow(clippy::single_range_in_vec_init)]
const FLASH_RANGES: &[Range<u32>] = &[
    0x4020_0000..0x4030_0000, // IROM
];

#[cfg(feature = "serialport")]
const UART_CLKDIV_REG: u32 = 0x6000_0014;
#[cfg(feature = "serialport")]
const UART_CLKDIV_MASK: u32 = 0xfffff;
#[cfg(feature = "serialport")]
const XTAL_CLK_DIVIDER: u32 = 2;

/// ESP8266 Target
///
/// Predates the unified chip-id scheme and the ESP-IDF application image
/// format entirely: it's detected solely by its UART date register magic
/// value, and boots its own legacy image header.
pub struct Esp8266;

impl Esp8266 {
    /// Check if the magic value contains the specified value
    pub fn has_magic_value(value: u32) -> bool {
        CHIP_DETECT_MAGIC_VALUES.contains(&value)
    }
}

impl ReadEFuse for Esp8266 {
    fn efuse_reg(&self) -> u32 {
        0x3ff0_0050
    }

    fn block0_offset(&self) -> u32 {
        0
    }

    fn block_size(&self, _block: usize) -> u32 {
        0
    }
}

impl Target for Esp8266 {
    fn chip(&self) -> Chip {
        Chip::Esp8266
    }

    fn addr_is_flash(&self, addr: u32) -> bool {
        FLASH_RANGES.iter().any(|range| range.contains(&addr))
    }

    #[cfg(feature = "serialport")]
    fn chip_features(&self, _connection: &mut Connection) -> Result<Vec<&'static str>, Error> {
        Ok(vec!["WiFi"])
    }

    #[cfg(feature = "serialport")]
    fn major_chip_version(&self, _connection: &mut Connection) -> Result<u32, Error> {
        Err(Error::UnsupportedFeature {
            chip: Chip::Esp8266,
            feature: "reading the major chip version".into(),
        })
    }

    #[cfg(feature = "serialport")]
    fn minor_chip_version(&self, _connection: &mut Connection) -> Result<u32, Error> {
        Err(Error::UnsupportedFeature {
            chip: Chip::Esp8266,
            feature: "reading the minor chip version".into(),
        })
    }

    #[cfg(feature = "serialport")]
    fn crystal_freq(&self, connection: &mut Connection) -> Result<XtalFrequency, Error> {
        let uart_div = connection.read_reg(UART_CLKDIV_REG)? & UART_CLKDIV_MASK;
        let est_xtal = (connection.baud()? * uart_div) / 1_000_000 / XTAL_CLK_DIVIDER;
        let norm_xtal = if est_xtal > 33 {
            XtalFrequency::_40Mhz
        } else {
            XtalFrequency::_26Mhz
        };

        Ok(norm_xtal)
    }

    fn flash_image<'a>(
        &self,
        _elf_data: &'a [u8],
        _flash_data: FlashData,
        _chip_revision: Option<(u32, u32)>,
        _xtal_freq: XtalFrequency,
    ) -> Result<ImageFormat<'a>, Error> {
        // The ESP8266 boots its own legacy bootloader image header, distinct
        // from the ESP-IDF format every other target here produces.
        Err(Error::UnsupportedFeature {
            chip: Chip::Esp8266,
            feature: "building an ESP-IDF application image".into(),
        })
    }

    #[cfg(feature = "serialport")]
    fn mac_address(&self, connection: &mut Connection) -> Result<String, Error> {
        let word0 = self.read_efuse(connection, efuse::esp8266::WORD0)?;
        let word1 = self.read_efuse(connection, efuse::esp8266::WORD1)?;
        let word3 = self.read_efuse(connection, efuse::esp8266::WORD3)?;

        // Determine the OUI portion of the MAC address.
        let mut bytes = if word3 != 0 {
            vec![
                ((word3 >> 16) & 0xff) as u8,
                ((word3 >> 8) & 0xff) as u8,
                (word3 & 0xff) as u8,
            ]
        } else if ((word1 >> 16) & 0xff) == 0 {
            vec![0x18, 0xfe, 0x34]
        } else {
            vec![0xac, 0xd0, 0x74]
        };

        // Add the remaining NIC portion of the MAC address.
        bytes.push(((word1 >> 8) & 0xff) as u8);
        bytes.push((word1 & 0xff) as u8);
        bytes.push(((word0 >> 24) & 0xff) as u8);

        Ok(bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":"))
    }

    fn spi_registers(&self) -> SpiRegisters {
        SpiRegisters {
            base: 0x6000_0200,
            usr_offset: 0x1c,
            usr1_offset: 0x20,
            usr2_offset: 0x24,
            w0_offset: 0x40,
            mosi_length_offset: None,
            miso_length_offset: None,
        }
    }

    fn supported_build_targets(&self) -> &[&str] {
        &["xtensa-esp8266-none-elf"]
    }
}
