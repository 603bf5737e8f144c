use crate::element::CollationElement;

const BASE_CJK_CORE: u32 = 0xFB40;
const BASE_CJK_EXTENDED: u32 = 0xFB80;
const BASE_OTHER: u32 = 0xFBC0;

/// Derived weights for a character with no table entry:
/// `[.AAAA.0020.0002][.BBBB.0000.0000]`, where AAAA is the block base plus the
/// high bits of the code point and BBBB carries the low 15 bits.
pub fn implicit_weights(c: char) -> [CollationElement; 2] {
    let cp = c as u32;

    #[allow(clippy::cast_possible_truncation)]
    let aaaa = (implicit_base(cp) + (cp >> 15)) as u16;
    #[allow(clippy::cast_possible_truncation)]
    let bbbb = ((cp & 0x7FFF) | 0x8000) as u16;

    [
        CollationElement::new([aaaa, 0x0020, 0x0002], false),
        CollationElement::new([bbbb, 0, 0], false),
    ]
}

fn implicit_base(cp: u32) -> u32 {
    match cp {
        0x4E00..=0x9FFF | 0xF900..=0xFAFF => BASE_CJK_CORE,
        0x3400..=0x4DBF | 0x20000..=0x2A6DF | 0x2A700..=0x2B73F | 0x2B740..=0x2B81F => {
            BASE_CJK_EXTENDED
        }
        _ => BASE_OTHER,
    }
}
