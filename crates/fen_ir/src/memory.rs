//! On-chip memories and their ports.

use crate::ids::SignalId;
use serde::{Deserialize, Serialize};

/// Behavior of a read observing a same-cycle write to the same address
/// through the same port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteMode {
    /// The read returns the value stored before the write.
    ReadFirst,
    /// The read returns the newly written value.
    WriteFirst,
    /// The read output holds its previous value during a write.
    NoChange,
}

/// One access port of a memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryPort {
    /// The address signal.
    pub address: SignalId,
    /// The signal carrying read data.
    pub data_read: SignalId,
    /// Write-enable signal; required iff `data_write` is present.
    pub write_enable: Option<SignalId>,
    /// Write-data signal; required iff `write_enable` is present.
    pub data_write: Option<SignalId>,
    /// When `true` (the default), reads are registered on the clock
    /// edge; when `false`, reads are asynchronous.
    pub synchronous_read: bool,
    /// Optional read-enable gating a synchronous read.
    pub read_enable: Option<SignalId>,
    /// Write lane width in bits; `0` (the default) writes whole words.
    /// When non-zero, the write-enable carries one bit per lane.
    pub write_granularity: u32,
    /// Same-cycle read/write behavior. Defaults to [`WriteMode::WriteFirst`].
    pub write_mode: WriteMode,
}

impl MemoryPort {
    /// Creates a synchronous read-only port.
    pub fn read(address: SignalId, data_read: SignalId) -> Self {
        Self {
            address,
            data_read,
            write_enable: None,
            data_write: None,
            synchronous_read: true,
            read_enable: None,
            write_granularity: 0,
            write_mode: WriteMode::WriteFirst,
        }
    }

    /// Adds write capability to the port.
    pub fn with_write(mut self, write_enable: SignalId, data_write: SignalId) -> Self {
        self.write_enable = Some(write_enable);
        self.data_write = Some(data_write);
        self
    }

    /// Makes the read asynchronous (combinational).
    pub fn asynchronous(mut self) -> Self {
        self.synchronous_read = false;
        self
    }

    /// Gates the synchronous read with an enable signal.
    pub fn with_read_enable(mut self, read_enable: SignalId) -> Self {
        self.read_enable = Some(read_enable);
        self
    }

    /// Sets a per-lane write granularity in bits.
    pub fn with_granularity(mut self, bits: u32) -> Self {
        self.write_granularity = bits;
        self
    }

    /// Sets the same-cycle read/write behavior.
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }
}

/// A memory: `depth` words of `width` bits each, with any number of
/// access ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Word width in bits.
    pub width: u32,
    /// Number of words.
    pub depth: u32,
    /// Optional initial contents, one value per word starting at
    /// address 0. May be shorter than `depth`.
    pub init: Option<Vec<i128>>,
    /// The access ports.
    pub ports: Vec<MemoryPort>,
}

impl Memory {
    /// Creates a memory with no ports and no initial contents.
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            width,
            depth,
            init: None,
            ports: Vec::new(),
        }
    }

    /// Sets the initial contents.
    pub fn with_init(mut self, init: Vec<i128>) -> Self {
        self.init = Some(init);
        self
    }

    /// Adds an access port.
    pub fn with_port(mut self, port: MemoryPort) -> Self {
        self.ports.push(port);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults() {
        let port = MemoryPort::read(SignalId::from_raw(0), SignalId::from_raw(1));
        assert!(port.synchronous_read);
        assert!(port.write_enable.is_none());
        assert_eq!(port.write_granularity, 0);
        assert_eq!(port.write_mode, WriteMode::WriteFirst);
    }

    #[test]
    fn write_port_pairs_enable_and_data() {
        let port = MemoryPort::read(SignalId::from_raw(0), SignalId::from_raw(1))
            .with_write(SignalId::from_raw(2), SignalId::from_raw(3));
        assert_eq!(port.write_enable, Some(SignalId::from_raw(2)));
        assert_eq!(port.data_write, Some(SignalId::from_raw(3)));
    }

    #[test]
    fn memory_builder() {
        let mem = Memory::new(32, 256)
            .with_init(vec![1, 2, 3])
            .with_port(MemoryPort::read(SignalId::from_raw(0), SignalId::from_raw(1)).asynchronous());
        assert_eq!(mem.width, 32);
        assert_eq!(mem.depth, 256);
        assert_eq!(mem.init.as_deref(), Some(&[1, 2, 3][..]));
        assert!(!mem.ports[0].synchronous_read);
    }

    #[test]
    fn write_modes_distinct() {
        assert_ne!(WriteMode::ReadFirst, WriteMode::WriteFirst);
        assert_ne!(WriteMode::WriteFirst, WriteMode::NoChange);
        assert_ne!(WriteMode::ReadFirst, WriteMode::NoChange);
    }
}
