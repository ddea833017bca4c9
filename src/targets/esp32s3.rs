#[cfg(feature = "serialport")]
use crate::connection::Connection;
use crate::{
    Error,
    flasher::FlashData,
    image_format::{IdfBootloaderFormat, ImageFormat},
    targets::{Chip, ReadEFuse, SpiRegisters, Target, XtalFrequency, efuse},
};

pub(crate) const CHIP_ID: u16 = 9;

const CHIP_DETECT_MAGIC_VALUES: &[u32] = &[0x9];

/// ESP32-S3 Target
pub struct Esp32s3;

impl Esp32s3 {
    /// Check if the magic value contains the specified value
    pub fn has_magic_value(value: u32) -> bool {
        CHIP_DETECT_MAGIC_VALUES.contains(&value)
    }
}

impl ReadEFuse for Esp32s3 {
    fn efuse_reg(&self) -> u32 {
        0x6000_7000
    }

    fn block0_offset(&self) -> u32 {
        0x2C
    }

    fn block_size(&self, block: usize) -> u32 {
        efuse::esp32s3::BLOCK_SIZES[block]
    }
}

impl Target for Esp32s3 {
    fn chip(&self) -> Chip {
        Chip::Esp32s3
    }

    fn addr_is_flash(&self, addr: u32) -> bool {
        const FLASH_RANGES: &[std::ops::Range<u32>] = &[
            0x4200_0000..0x4400_0000, // IROM
            0x3c00_0000..0x3e00_0000, // DROM
        ];
        FLASH_RANGES.iter().any(|range| range.contains(&addr))
    }

    #[cfg(feature = "serialport")]
    fn chip_features(&self, _connection: &mut Connection) -> Result<Vec<&'static str>, Error> {
        Ok(vec!["WiFi", "BLE"])
    }

    #[cfg(feature = "serialport")]
    fn major_chip_version(&self, connection: &mut Connection) -> Result<u32, Error> {
        self.read_efuse(connection, efuse::esp32s3::WAFER_VERSION_MAJOR)
    }

    #[cfg(feature = "serialport")]
    fn minor_chip_version(&self, connection: &mut Connection) -> Result<u32, Error> {
        let hi = self.read_efuse(connection, efuse::esp32s3::WAFER_VERSION_MINOR_HI)?;
        let lo = self.read_efuse(connection, efuse::esp32s3::WAFER_VERSION_MINOR_LO)?;

        Ok((hi << 3) + lo)
    }

    #[cfg(feature = "serialport")]
    fn crystal_freq(&self, _connection: &mut Connection) -> Result<XtalFrequency, Error> {
        // Fixed frequency
        Ok(XtalFrequency::_40Mhz)
    }

    fn flash_image<'a>(
        &self,
        elf_data: &'a [u8],
        flash_data: FlashData,
        _chip_revision: Option<(u32, u32)>,
        xtal_freq: XtalFrequency,
    ) -> Result<ImageFormat<'a>, Error> {
        if xtal_freq != XtalFrequency::_40Mhz {
            return Err(Error::UnsupportedFeature {
                chip: Chip::Esp32s3,
                feature: "the selected crystal frequency".into(),
            });
        }

        Ok(IdfBootloaderFormat::new(elf_data, &flash_data, None, None, None, None)?.into())
    }

    fn spi_registers(&self) -> SpiRegisters {
        SpiRegisters {
            base: 0x6000_2000,
            usr_offset: 0x18,
            usr1_offset: 0x1C,
            usr2_offset: 0x20,
            w0_offset: 0x58,
            mosi_length_offset: Some(0x24),
            miso_length_offset: Some(0x28),
        }
    }

    fn supported_build_targets(&self) -> &[&str] {
        &["xtensa-esp32s3-none-elf", "xtensa-esp32s3-espidf"]
    }
}

#[cfg(feature = "serialport")]
impl super::RtcWdtReset for Esp32s3 {
    fn wdt_wprotect(&self) -> u32 {
        0x6000_80B0
    }

    fn wdt_config0(&self) -> u32 {
        0x6000_8098
    }

    fn wdt_config1(&self) -> u32 {
        0x6000_809C
    }

    fn can_rtc_wdt_reset(&self, connection: &mut Connection) -> Result<bool, Error> {
        const GPIO_STRAP: u32 = 0x6000_4038;
        const OPTION1: u32 = 0x6000_812C;
        const GPIO_STRAP_SPI_BOOT_MASK: u32 = 1 << 3; // Not download mode
        const FORCE_DOWNLOAD_BOOT_MASK: u32 = 0x1;

        Ok(
            connection.read_reg(GPIO_STRAP)? & GPIO_STRAP_SPI_BOOT_MASK == 0 // GPIO0 low
                && connection.read_reg(OPTION1)? & FORCE_DOWNLOAD_BOOT_MASK == 0,
        )
    }
}

#[cfg(feature = "serialport")]
impl super::UsbOtg for Esp32s3 {
    fn uartdev_buf_no(&self) -> u32 {
        0x3FCE_F14C
    }

    fn uartdev_buf_no_usb_otg(&self) -> u32 {
        3
    }
}
