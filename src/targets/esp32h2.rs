use std::collections::HashMap;

#[cfg(feature = "serialport")]
use crate::connection::Connection;
use crate::{
    Error,
    flasher::{FlashData, FlashFrequency},
    image_format::{IdfBootloaderFormat, ImageFormat},
    targets::{Chip, ReadEFuse, SpiRegisters, Target, XtalFrequency, efuse},
};

pub(crate) const CHIP_ID: u16 = 16;

const CHIP_DETECT_MAGIC_VALUES: &[u32] = &[0xD7B7_3E80];

/// ESP32-H2 Target
pub struct Esp32h2;

impl Esp32h2 {
    /// Check if the magic value contains the specified value.
    pub fn has_magic_value(value: u32) -> bool {
        CHIP_DETECT_MAGIC_VALUES.contains(&value)
    }
}

impl ReadEFuse for Esp32h2 {
    fn efuse_reg(&self) -> u32 {
        0x600B_0800
    }

    fn block0_offset(&self) -> u32 {
        0x2C
    }

    fn block_size(&self, block: usize) -> u32 {
        efuse::esp32h2::BLOCK_SIZES[block]
    }
}

impl Target for Esp32h2 {
    fn chip(&self) -> Chip {
        Chip::Esp32h2
    }

    fn addr_is_flash(&self, addr: u32) -> bool {
        const FLASH_RANGES: &[std::ops::Range<u32>] = &[
            0x4200_0000..0x4280_0000, // IROM
            0x3c00_0000..0x3c80_0000, // DROM
        ];
        FLASH_RANGES.iter().any(|range| range.contains(&addr))
    }

    #[cfg(feature = "serialport")]
    fn chip_features(&self, _connection: &mut Connection) -> Result<Vec<&'static str>, Error> {
        Ok(vec!["BLE"])
    }

    #[cfg(feature = "serialport")]
    fn major_chip_version(&self, connection: &mut Connection) -> Result<u32, Error> {
        self.read_efuse(connection, efuse::esp32h2::WAFER_VERSION_MAJOR)
    }

    #[cfg(feature = "serialport")]
    fn minor_chip_version(&self, connection: &mut Connection) -> Result<u32, Error> {
        self.read_efuse(connection, efuse::esp32h2::WAFER_VERSION_MINOR)
    }

    #[cfg(feature = "serialport")]
    fn crystal_freq(&self, _connection: &mut Connection) -> Result<XtalFrequency, Error> {
        // Fixed frequency
        Ok(XtalFrequency::_32Mhz)
    }

    fn flash_frequency_encodings(&self) -> HashMap<FlashFrequency, u8> {
        use FlashFrequency::*;

        let encodings = [(_12Mhz, 0x2), (_16Mhz, 0x1), (_24Mhz, 0x0), (_48Mhz, 0xF)];

        HashMap::from(encodings)
    }

    fn flash_image<'a>(
        &self,
        elf_data: &'a [u8],
        flash_data: FlashData,
        _chip_revision: Option<(u32, u32)>,
        xtal_freq: XtalFrequency,
    ) -> Result<ImageFormat<'a>, Error> {
        if xtal_freq != XtalFrequency::_32Mhz {
            return Err(Error::UnsupportedFeature {
                chip: Chip::Esp32h2,
                feature: "the selected crystal frequency".into(),
            });
        }

        Ok(IdfBootloaderFormat::new(elf_data, &flash_data, None, None, None, None)?.into())
    }

    fn spi_registers(&self) -> SpiRegisters {
        SpiRegisters {
            base: 0x6000_3000,
            usr_offset: 0x18,
            usr1_offset: 0x1C,
            usr2_offset: 0x20,
            w0_offset: 0x58,
            mosi_length_offset: Some(0x24),
            miso_length_offset: Some(0x28),
        }
    }

    fn supported_build_targets(&self) -> &[&str] {
        &["riscv32imac-unknown-none-elf", "riscv32imac-esp-espidf"]
    }
}
