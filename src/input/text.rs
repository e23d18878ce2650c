use super::Symbol;

/// ASCII '1' and '0' carry a symbol, any other character carries none
pub fn char_symbol(ch: u8) -> Option<Symbol> {
    match ch {
        b'1' => Some(Symbol::One),
        b'0' => Some(Symbol::Zero),
        _ => None,
    }
}
