use bitflags::bitflags;

bitflags! {
    /// Conversions a record type opts into.
    ///
    /// Every wire format is built on plain-data conversion, so any
    /// format flag also grants [`PLAIN`](Capabilities::PLAIN).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// `to_plain` and `from_plain`.
        const PLAIN     = 1 << 0;
        /// Text format, JSON.
        const JSON      = 1 << 1;
        /// Binary map-oriented format, MessagePack.
        const MSGPACK   = 1 << 2;
        /// Human-readable structured text, YAML.
        const YAML      = 1 << 3;
    }
}

impl Capabilities {
    /// Whether a record with these capabilities may use `required`.
    #[inline]
    pub const fn supports(self, required: Capabilities) -> bool {
        if required.bits() == Self::PLAIN.bits() {
            !self.is_empty()
        } else {
            self.contains(required)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Capabilities;

    #[test]
    fn formats_imply_plain() {
        assert!(Capabilities::MSGPACK.supports(Capabilities::PLAIN));
        assert!(Capabilities::PLAIN.supports(Capabilities::PLAIN));
        assert!(!Capabilities::PLAIN.supports(Capabilities::JSON));
        assert!(!Capabilities::empty().supports(Capabilities::PLAIN));
        assert!((Capabilities::JSON | Capabilities::YAML).supports(Capabilities::YAML));
    }
}
