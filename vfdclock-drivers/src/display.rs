//! MAX6921 VFD driver
//!
//! 20/24-output serial-interfaced tube driver. Data is clocked in on DIN
//! (SPI mode 0, MSB first) and appears on the outputs when LOAD goes high.
//! Holding LOAD low during the shift keeps the previous frame on the tube
//! until the new one is complete.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use vfdclock_core::frame::Frame;
use vfdclock_core::traits::FrameTransmitter;

/// Errors from the MAX6921 transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max6921Error<SpiE, PinE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// LOAD pin could not be driven
    Load(PinE),
}

/// MAX6921 on an SPI bus with a LOAD (latch) pin
pub struct Max6921<SPI, LOAD> {
    spi: SPI,
    load: LOAD,
}

impl<SPI, LOAD> Max6921<SPI, LOAD>
where
    SPI: SpiBus<u8>,
    LOAD: OutputPin,
{
    /// Wrap a configured SPI bus and LOAD pin
    pub fn new(spi: SPI, load: LOAD) -> Self {
        Self { spi, load }
    }

    /// Idle LOAD high and blank every output
    pub fn begin(&mut self) -> Result<(), Max6921Error<SPI::Error, LOAD::Error>> {
        self.load.set_high().map_err(Max6921Error::Load)?;
        self.clear()
    }
}

impl<SPI, LOAD> FrameTransmitter for Max6921<SPI, LOAD>
where
    SPI: SpiBus<u8>,
    LOAD: OutputPin,
{
    type Error = Max6921Error<SPI::Error, LOAD::Error>;

    fn transmit(&mut self, frame: Frame) -> Result<(), Self::Error> {
        self.load.set_low().map_err(Max6921Error::Load)?;

        let shifted = self
            .spi
            .write(&frame.to_bytes())
            .and_then(|()| self.spi.flush())
            .map_err(Max6921Error::Spi);

        // Latch even after a failed shift so LOAD never stays low
        self.load.set_high().map_err(Max6921Error::Load)?;
        shifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use heapless::Vec;
    use vfdclock_core::frame::PinMap;
    use vfdclock_core::segment::encode;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        LoadLow,
        LoadHigh,
        Byte(u8),
        Flush,
    }

    type Log = core::cell::RefCell<Vec<Event, 64>>;

    struct MockSpi<'a> {
        log: &'a Log,
        fail: bool,
    }

    impl ErrorType for MockSpi<'_> {
        type Error = ErrorKind;
    }

    impl SpiBus<u8> for MockSpi<'_> {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), ErrorKind> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let mut log = self.log.borrow_mut();
            for &b in words {
                let _ = log.push(Event::Byte(b));
            }
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), ErrorKind> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), ErrorKind> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ErrorKind> {
            let _ = self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    struct MockPin<'a> {
        log: &'a Log,
    }

    impl embedded_hal::digital::ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let _ = self.log.borrow_mut().push(Event::LoadLow);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let _ = self.log.borrow_mut().push(Event::LoadHigh);
            Ok(())
        }
    }

    #[test]
    fn test_transmit_latches_three_bytes() {
        let log = Log::default();
        let mut driver = Max6921::new(
            MockSpi {
                log: &log,
                fail: false,
            },
            MockPin { log: &log },
        );

        let pins = PinMap::iv21();
        driver.transmit(pins.pack(7, encode('1'))).unwrap();

        // OUT11 grid, anodes on OUT8 (B) and OUT5 (C)
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::LoadLow,
                Event::Byte(0x00),
                Event::Byte(0x09),
                Event::Byte(0x20),
                Event::Flush,
                Event::LoadHigh,
            ]
        );
    }

    #[test]
    fn test_begin_blanks_outputs() {
        let log = Log::default();
        let mut driver = Max6921::new(
            MockSpi {
                log: &log,
                fail: false,
            },
            MockPin { log: &log },
        );

        driver.begin().unwrap();
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::LoadHigh,
                Event::LoadLow,
                Event::Byte(0),
                Event::Byte(0),
                Event::Byte(0),
                Event::Flush,
                Event::LoadHigh,
            ]
        );
    }

    #[test]
    fn test_spi_error_still_raises_load() {
        let log = Log::default();
        let mut driver = Max6921::new(
            MockSpi {
                log: &log,
                fail: true,
            },
            MockPin { log: &log },
        );

        let result = driver.transmit(Frame::from_bits(0xFFFFFF));
        assert_eq!(result, Err(Max6921Error::Spi(ErrorKind::Other)));
        assert_eq!(log.borrow().last(), Some(&Event::LoadHigh));
    }
}
