use super::Symbol;

/// Split a byte into its 8 symbols, bit 0 first
pub fn byte_symbols(byte: u8) -> impl Iterator<Item = Symbol> {
    (0..8).map(move |bit| Symbol::from_bit(byte >> bit))
}
