//! Simulated nRF24L01+ and other test doubles

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use calliope_radio::broadcast::DatagramRadio;
use calliope_radio::nrf24::register;
use calliope_radio::{SendOutcome, TxPower, PACKET_SIZE};
use embedded_hal::digital::{self, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::{self, Operation, SpiDevice};

const TX_FIFO_DEPTH: usize = 3;
const RX_FIFO_DEPTH: usize = 3;

/// Register file and FIFOs of an nRF24L01+
pub struct Chip {
    pub registers: [u8; 0x20],
    pub rx_address: [u8; 5],
    pub tx_address: [u8; 5],
    pub tx_fifo: VecDeque<[u8; PACKET_SIZE]>,
    pub rx_fifo: VecDeque<[u8; PACKET_SIZE]>,
    /// Packets that went on air, oldest first
    pub sent: Vec<[u8; PACKET_SIZE]>,
    /// Single-byte register writes, oldest first
    pub writes: Vec<(u8, u8)>,
    pub ce: bool,
    /// Keep queued packets in the TX FIFO instead of sending them
    pub hold_tx: bool,
    /// No chip on the bus: MISO stays low
    pub absent: bool,
}

impl Chip {
    fn new() -> Self {
        let mut registers = [0u8; 0x20];
        // reset values from the datasheet
        registers[register::CONFIG as usize] = 0x08;
        registers[register::EN_AA as usize] = 0x3F;
        registers[register::EN_RXADDR as usize] = 0x03;
        registers[register::SETUP_AW as usize] = 0x03;
        registers[register::SETUP_RETR as usize] = 0x03;
        registers[register::RF_CH as usize] = 0x02;
        registers[register::RF_SETUP as usize] = 0x0E;
        Self {
            registers,
            rx_address: [0xE7; 5],
            tx_address: [0xE7; 5],
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            sent: Vec::new(),
            writes: Vec::new(),
            ce: false,
            hold_tx: false,
            absent: false,
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Puts a packet into the RX FIFO as if it had arrived over the air
    pub fn deliver(&mut self, packet: [u8; PACKET_SIZE]) {
        if self.rx_fifo.len() < RX_FIFO_DEPTH {
            self.rx_fifo.push_back(packet);
            self.registers[register::STATUS as usize] |= 1 << 6;
        }
    }

    /// Number of writes to `register`
    pub fn write_count(&self, register: u8) -> usize {
        self.writes.iter().filter(|(r, _)| *r == register).count()
    }

    fn powered_up(&self) -> bool {
        self.register(register::CONFIG) & 0b10 != 0
    }

    fn primary_rx(&self) -> bool {
        self.register(register::CONFIG) & 0b01 != 0
    }

    fn status(&self) -> u8 {
        let pipe = if self.rx_fifo.is_empty() { 0b111 } else { 0 };
        let tx_full = (self.tx_fifo.len() >= TX_FIFO_DEPTH) as u8;
        (self.register(register::STATUS) & 0x70) | (pipe << 1) | tx_full
    }

    fn fifo_status(&self) -> u8 {
        let rx_empty = self.rx_fifo.is_empty() as u8;
        let tx_empty = (self.tx_fifo.is_empty() as u8) << 4;
        let tx_full = ((self.tx_fifo.len() >= TX_FIFO_DEPTH) as u8) << 5;
        rx_empty | tx_empty | tx_full
    }

    /// Sends queued packets when the chip is an enabled transmitter
    fn pump(&mut self) {
        if self.ce && self.powered_up() && !self.primary_rx() && !self.hold_tx {
            while let Some(packet) = self.tx_fifo.pop_front() {
                self.sent.push(packet);
                self.registers[register::STATUS as usize] |= 1 << 5;
            }
        }
    }

    /// Shifts one byte in and returns the byte shifted out
    fn exchange(&mut self, frame: &mut SpiFrame, mosi: u8) -> u8 {
        if self.absent {
            return 0;
        }
        let Some(command) = frame.command else {
            frame.command = Some(mosi);
            return self.status();
        };
        let index = frame.data.len();
        frame.data.push(mosi);
        match command {
            0x00..=0x1F => {
                let reg = command & 0x1F;
                match reg {
                    register::RX_ADDR_P0 => self.rx_address.get(index).copied().unwrap_or(0),
                    register::TX_ADDR => self.tx_address.get(index).copied().unwrap_or(0),
                    register::STATUS => self.status(),
                    register::FIFO_STATUS => self.fifo_status(),
                    _ => self.register(reg),
                }
            }
            0x61 => self
                .rx_fifo
                .front()
                .map_or(0, |packet| packet[index % PACKET_SIZE]),
            _ => 0,
        }
    }

    /// Applies a command once chip select goes high
    fn finish(&mut self, frame: SpiFrame) {
        if self.absent {
            return;
        }
        let Some(command) = frame.command else {
            return;
        };
        match command {
            0x20..=0x3F => {
                let reg = command & 0x1F;
                match reg {
                    register::RX_ADDR_P0 => self.rx_address.copy_from_slice(&frame.data[..5]),
                    register::TX_ADDR => self.tx_address.copy_from_slice(&frame.data[..5]),
                    register::STATUS => self.registers[reg as usize] &= !(frame.data[0] & 0x70),
                    _ => {
                        self.registers[reg as usize] = frame.data[0];
                        self.writes.push((reg, frame.data[0]));
                    }
                }
                self.pump();
            }
            0xA0 => {
                if self.tx_fifo.len() < TX_FIFO_DEPTH {
                    let mut packet = [0u8; PACKET_SIZE];
                    packet.copy_from_slice(&frame.data[..PACKET_SIZE]);
                    self.tx_fifo.push_back(packet);
                }
                self.pump();
            }
            0x61 => {
                self.rx_fifo.pop_front();
            }
            0xE1 => self.tx_fifo.clear(),
            0xE2 => self.rx_fifo.clear(),
            _ => {}
        }
    }
}

/// Bytes clocked during one chip-select period
#[derive(Default)]
struct SpiFrame {
    command: Option<u8>,
    data: Vec<u8>,
}

pub type SharedChip = Rc<RefCell<Chip>>;

pub fn chip() -> SharedChip {
    Rc::new(RefCell::new(Chip::new()))
}

/// SPI device with the simulated chip behind it
pub struct FakeSpi(pub SharedChip);

impl spi::ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        let mut frame = SpiFrame::default();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        chip.exchange(&mut frame, byte);
                    }
                }
                Operation::Read(buf) => {
                    for slot in buf.iter_mut() {
                        *slot = chip.exchange(&mut frame, 0xFF);
                    }
                }
                Operation::Transfer(read, write) => {
                    for i in 0..read.len().max(write.len()) {
                        let out = write.get(i).copied().unwrap_or(0xFF);
                        let miso = chip.exchange(&mut frame, out);
                        if let Some(slot) = read.get_mut(i) {
                            *slot = miso;
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for slot in buf.iter_mut() {
                        *slot = chip.exchange(&mut frame, *slot);
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }
        chip.finish(frame);
        Ok(())
    }
}

/// Chip-enable line of the simulated chip
pub struct FakeCe(pub SharedChip);

impl digital::ErrorType for FakeCe {
    type Error = Infallible;
}

impl OutputPin for FakeCe {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().ce = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        chip.ce = true;
        chip.pump();
        Ok(())
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Everything the broadcaster did, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Group(u8),
    Power(u8),
    Send(String),
    Sleep(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Radio that records calls and answers with scripted outcomes
pub struct RecordingRadio {
    pub log: EventLog,
    /// Outcome of each `send`, by call index; missing entries are `Queued`
    pub script: Vec<Result<SendOutcome, &'static str>>,
    pub fail_group: bool,
    /// Every payload handed to `send`, whatever the scripted outcome
    pub attempted: Vec<String>,
    sends: usize,
}

impl RecordingRadio {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            script: Vec::new(),
            fail_group: false,
            attempted: Vec::new(),
            sends: 0,
        }
    }
}

impl DatagramRadio for RecordingRadio {
    type Error = &'static str;

    async fn set_group(&mut self, group: u8) -> Result<(), Self::Error> {
        if self.fail_group {
            return Err("group rejected");
        }
        self.log.borrow_mut().push(Event::Group(group));
        Ok(())
    }

    async fn set_tx_power(&mut self, power: TxPower) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Power(power.level()));
        Ok(())
    }

    async fn send(&mut self, payload: &[u8]) -> Result<SendOutcome, Self::Error> {
        let scripted = self.script.get(self.sends).copied();
        let outcome = scripted.unwrap_or(Ok(SendOutcome::Queued));
        self.sends += 1;
        let text = String::from_utf8(payload.to_vec()).expect("payload is text");
        self.attempted.push(text.clone());
        if outcome == Ok(SendOutcome::Queued) {
            self.log.borrow_mut().push(Event::Send(text));
        }
        outcome
    }
}

/// Delay that records the requested pauses in the event log
pub struct RecordingDelay(pub EventLog);

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::Sleep(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Event::Sleep(ms));
    }
}
