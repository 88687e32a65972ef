//! Interrupt-driven UART transport.
//!
//! [`Uart`] pairs two [`RingBuffer`](crate::ring::RingBuffer)s with a board
//! supplied [`UartPort`]: the UART interrupt is the producer of the RX ring
//! and the consumer of the TX ring; foreground code holds the other ends.
//!
//! ## Data flow
//!
//! ```text
//!              RX FIFO ──on_interrupt()──► RX ring ──read()/read_into()──► app
//!  UART pins
//!              TX FIFO ◄──on_interrupt()── TX ring ◄──write()/print()───── app
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! static SERIAL_SLOT: IsrSlot<Serial> = IsrSlot::new();
//! type Serial = Uart<Uart0, UART_BUFFER_SIZE, UART_BUFFER_SIZE>;
//!
//! // Board init:
//! let serial: &'static Serial = SERIAL.init(Uart::new(Uart0::take(), UartConfig::new(115_200)));
//! serial.begin(&SERIAL_SLOT)?;
//!
//! #[interrupt]
//! fn UART0() {
//!     SERIAL_SLOT.dispatch(|uart| uart.on_interrupt());
//! }
//!
//! // Main loop:
//! if let Some(cmd) = serial.read() {
//!     match cmd {
//!         b'y' => serial.print(format_args!("Turning LED on\n")),
//!         b'n' => serial.print(format_args!("Turning LED off\n")),
//!         _ => serial.print(format_args!("Unrecognized command. Enter 'y' or 'n'.\n")),
//!     };
//! }
//! ```

mod config;
mod driver;
mod port;

pub use config::{DataBits, FifoLevel, FlowControl, Parity, StopBits, UartConfig, MAX_BAUD_RATE};
pub use driver::{Uart, END_FLUSH_TIMEOUT_MS};
pub use port::{InterruptMask, UartPort};
